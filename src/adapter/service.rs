//! Adapter producing [`ServiceCall`] wrappers

use crate::adapter::{
    AdapterMatch, Annotation, CallAdapter, CallAdapterFactory, FactoryId, RawType, TypeDescriptor,
};
use crate::call::{Call, ServiceCall};
use crate::config::ClientConfig;
use crate::error::AdapterError;
use tracing::debug;

/// Adapts underlying calls into [`ServiceCall`]s.
///
/// Created once per declared method and shared by all of its invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCallAdapter {
    response_type: TypeDescriptor,
}

impl ServiceCallAdapter {
    pub fn new(response_type: TypeDescriptor) -> Self {
        Self { response_type }
    }

    /// Wrap a freshly created call. No I/O happens here.
    pub fn adapt<T: Send + 'static>(&self, call: Box<dyn Call<T>>) -> ServiceCall<T> {
        ServiceCall::new(call)
    }
}

impl CallAdapter for ServiceCallAdapter {
    fn response_type(&self) -> &TypeDescriptor {
        &self.response_type
    }
}

/// Recognizes `ServiceCall<T>` return types.
///
/// Every instance is a distinct factory: equality is identity, and a clone
/// is the same factory.
#[derive(Debug, Clone)]
pub struct ServiceCallAdapterFactory {
    id: FactoryId,
}

impl ServiceCallAdapterFactory {
    pub fn new() -> Self {
        Self {
            id: FactoryId::next(),
        }
    }
}

impl Default for ServiceCallAdapterFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ServiceCallAdapterFactory {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceCallAdapterFactory {}

impl CallAdapterFactory for ServiceCallAdapterFactory {
    type Adapter = ServiceCallAdapter;

    fn id(&self) -> FactoryId {
        self.id
    }

    fn get(
        &self,
        return_type: &TypeDescriptor,
        _annotations: &[Annotation],
        _config: &ClientConfig,
    ) -> AdapterMatch<ServiceCallAdapter> {
        if return_type.raw_type() != Some(RawType::SERVICE_CALL) {
            return AdapterMatch::NotMatched;
        }

        match return_type.parameter_upper_bound(0) {
            Some(payload) => {
                debug!(factory = %self.id, payload = %payload, "Matched ServiceCall return type");
                AdapterMatch::Matched(ServiceCallAdapter::new(payload.clone()))
            }
            None => AdapterMatch::ConfigError(AdapterError::MissingPayloadType {
                raw: RawType::SERVICE_CALL.name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Repo;

    fn get(return_type: &TypeDescriptor) -> AdapterMatch<ServiceCallAdapter> {
        ServiceCallAdapterFactory::new().get(return_type, &[], &ClientConfig::default())
    }

    #[test]
    fn test_matches_parameterized_service_call() {
        match get(&TypeDescriptor::service_call_of::<Repo>()) {
            AdapterMatch::Matched(adapter) => assert!(adapter.response_type().is::<Repo>()),
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_unparameterized_service_call_is_config_error() {
        let result = get(&TypeDescriptor::raw(RawType::SERVICE_CALL));
        assert!(matches!(
            result,
            AdapterMatch::ConfigError(AdapterError::MissingPayloadType { raw: "ServiceCall" })
        ));
    }

    #[test]
    fn test_other_types_do_not_match() {
        assert!(matches!(
            get(&TypeDescriptor::of::<String>()),
            AdapterMatch::NotMatched
        ));
        assert!(matches!(
            get(&TypeDescriptor::parameterized(
                RawType::named("Future"),
                [TypeDescriptor::of::<Repo>()]
            )),
            AdapterMatch::NotMatched
        ));
        // Only the declared type's own head counts, not a wildcard's bound
        assert!(matches!(
            get(&TypeDescriptor::wildcard(
                TypeDescriptor::service_call_of::<Repo>()
            )),
            AdapterMatch::NotMatched
        ));
    }

    #[test]
    fn test_identity_equality() {
        let a = ServiceCallAdapterFactory::new();
        let b = ServiceCallAdapterFactory::new();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_ne!(a.id(), b.id());
    }
}
