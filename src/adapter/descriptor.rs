//! Return type descriptors
//!
//! Rust has no runtime generic reflection, so a declared method states its
//! return type explicitly as a [`TypeDescriptor`]. Call adapter factories
//! inspect it once, when the method is declared.

use std::any::TypeId;
use std::fmt;

/// The erased head of a generic type, e.g. `ServiceCall` in `ServiceCall<User>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawType {
    name: &'static str,
}

impl RawType {
    /// The wrapper type produced by [`ServiceCallAdapter`](crate::adapter::ServiceCallAdapter)
    pub const SERVICE_CALL: RawType = RawType::named("ServiceCall");

    pub const fn named(name: &'static str) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Description of a declared return type or one of its type arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// A plain Rust type
    Concrete { id: TypeId, name: &'static str },
    /// A generic type used without type arguments
    Raw(RawType),
    /// A generic type with its type arguments
    Parameterized {
        raw: RawType,
        args: Vec<TypeDescriptor>,
    },
    /// A type argument known only by its upper bound (`? extends T`)
    Wildcard { upper: Box<TypeDescriptor> },
}

impl TypeDescriptor {
    /// Descriptor for a concrete Rust type
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeDescriptor::Concrete {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn raw(raw: RawType) -> Self {
        TypeDescriptor::Raw(raw)
    }

    pub fn parameterized(raw: RawType, args: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        TypeDescriptor::Parameterized {
            raw,
            args: args.into_iter().collect(),
        }
    }

    pub fn wildcard(upper: TypeDescriptor) -> Self {
        TypeDescriptor::Wildcard {
            upper: Box::new(upper),
        }
    }

    /// `ServiceCall<payload>`
    pub fn service_call(payload: TypeDescriptor) -> Self {
        Self::parameterized(RawType::SERVICE_CALL, [payload])
    }

    /// `ServiceCall<T>` for a concrete payload type
    pub fn service_call_of<T: ?Sized + 'static>() -> Self {
        Self::service_call(Self::of::<T>())
    }

    /// The generic head of this type, if it has one.
    ///
    /// A wildcard has no head of its own: `? extends ServiceCall<T>` is not a
    /// `ServiceCall`.
    pub fn raw_type(&self) -> Option<RawType> {
        match self {
            TypeDescriptor::Raw(raw) => Some(*raw),
            TypeDescriptor::Parameterized { raw, .. } => Some(*raw),
            TypeDescriptor::Concrete { .. } | TypeDescriptor::Wildcard { .. } => None,
        }
    }

    /// True if type arguments are present
    pub fn is_parameterized(&self) -> bool {
        matches!(self, TypeDescriptor::Parameterized { args, .. } if !args.is_empty())
    }

    /// The type argument at `index`, with wildcards replaced by their upper bound
    pub fn parameter_upper_bound(&self, index: usize) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Parameterized { args, .. } => {
                args.get(index).map(|arg| arg.upper_bound())
            }
            _ => None,
        }
    }

    /// This type with any wildcard layers stripped
    pub fn upper_bound(&self) -> &TypeDescriptor {
        let mut current = self;
        while let TypeDescriptor::Wildcard { upper } = current {
            current = upper.as_ref();
        }
        current
    }

    /// True if this descriptor is exactly the concrete type `T`
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        matches!(self, TypeDescriptor::Concrete { id, .. } if *id == TypeId::of::<T>())
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Concrete { name, .. } => f.write_str(name),
            TypeDescriptor::Raw(raw) => f.write_str(raw.name()),
            TypeDescriptor::Parameterized { raw, args } => {
                write!(f, "{}<", raw.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")
            }
            TypeDescriptor::Wildcard { upper } => write!(f, "? extends {}", upper),
        }
    }
}
