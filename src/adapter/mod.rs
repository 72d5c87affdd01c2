//! Call adapters
//!
//! A [`CallAdapterFactory`] is asked once per declared service method
//! whether it recognizes the method's return type. A match yields a
//! [`CallAdapter`], which then wraps every call created for that method.
//!
//! ```text
//! declare method ─► factory.get(return type) ─► Matched(adapter)
//!                                             ├► NotMatched    (try next factory)
//!                                             └► ConfigError   (fail declaration)
//! ```

pub mod descriptor;
pub mod service;

pub use descriptor::{RawType, TypeDescriptor};
pub use service::{ServiceCallAdapter, ServiceCallAdapterFactory};

use crate::config::ClientConfig;
use crate::error::AdapterError;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A marker attached to a declared method (e.g. a header hint).
///
/// Factories receive a method's annotations; the built-in factory ignores them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub name: String,
    pub value: Option<String>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// Outcome of asking one factory about one return type
#[derive(Debug)]
pub enum AdapterMatch<A> {
    /// The factory handles this return type
    Matched(A),
    /// Not this factory's type; another factory may match
    NotMatched,
    /// The factory's type, but declared incorrectly
    ConfigError(AdapterError),
}

impl<A> AdapterMatch<A> {
    /// Ask another factory only if this one did not match.
    /// Configuration errors are not fallen through.
    pub fn or_else(self, next: impl FnOnce() -> AdapterMatch<A>) -> AdapterMatch<A> {
        match self {
            AdapterMatch::NotMatched => next(),
            other => other,
        }
    }

    /// Treat "no factory matched" as an error
    pub fn into_result(self, return_type: &TypeDescriptor) -> Result<A, AdapterError> {
        match self {
            AdapterMatch::Matched(adapter) => Ok(adapter),
            AdapterMatch::NotMatched => Err(AdapterError::NoAdapter {
                return_type: return_type.to_string(),
            }),
            AdapterMatch::ConfigError(err) => Err(err),
        }
    }
}

/// Wraps calls for one declared method
pub trait CallAdapter: Send + Sync + fmt::Debug {
    /// The payload type calls are decoded into
    fn response_type(&self) -> &TypeDescriptor;
}

/// Decides, per declared return type, whether and how to adapt calls
pub trait CallAdapterFactory: Send + Sync + fmt::Debug {
    type Adapter: CallAdapter;

    /// Identity of this factory instance
    fn id(&self) -> FactoryId;

    fn get(
        &self,
        return_type: &TypeDescriptor,
        annotations: &[Annotation],
        config: &ClientConfig,
    ) -> AdapterMatch<Self::Adapter>;
}

/// Process-unique identity of a factory instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FactoryId(u64);

impl FactoryId {
    /// Mint an identifier no other factory has
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        FactoryId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FactoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "factory#{}", self.0)
    }
}
