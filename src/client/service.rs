//! Service client
//!
//! Owns the client configuration, the interceptor pipeline and the registered
//! call adapter factories. Declared methods resolve their adapter here.

use crate::adapter::{
    AdapterMatch, Annotation, CallAdapter, CallAdapterFactory, ServiceCallAdapter,
    ServiceCallAdapterFactory, TypeDescriptor,
};
use crate::auth::{AuthRequestInterceptor, AuthTokenProvider};
use crate::call::HttpCall;
use crate::client::method::{MethodSpec, ServiceMethod};
use crate::config::ClientConfig;
use crate::error::{AdapterError, ConfigError, Result};
use crate::http::{Interceptor, Pipeline, Request, ReqwestTransport, Transport};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Factories that produce [`ServiceCallAdapter`]s
///
/// The adapter type is fixed, so every factory in a client's chain yields the
/// same `ServiceCall<T>` wrapper. Falling through to another factory lets it
/// recognize a different declared return type (or resolve the payload
/// differently), but not hand back a different wrapper type. Supporting other
/// wrappers would need a factory chain per adapter type.
pub type SharedAdapterFactory = Arc<dyn CallAdapterFactory<Adapter = ServiceCallAdapter>>;

/// HTTP service client
#[derive(Clone)]
pub struct ServiceClient {
    config: Arc<ClientConfig>,
    pipeline: Arc<Pipeline>,
    factories: Arc<[SharedAdapterFactory]>,
}

impl ServiceClient {
    /// Start configuring a client
    pub fn builder(config: ClientConfig) -> ServiceClientBuilder {
        ServiceClientBuilder {
            config,
            interceptors: Vec::new(),
            transport: None,
            factories: Vec::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    /// Number of registered call adapter factories
    pub fn factory_count(&self) -> usize {
        self.factories.len()
    }

    /// Find the adapter for a declared return type.
    ///
    /// Factories are asked in registration order. The first match wins; a
    /// configuration error stops the search.
    pub fn call_adapter(
        &self,
        return_type: &TypeDescriptor,
        annotations: &[Annotation],
    ) -> std::result::Result<ServiceCallAdapter, AdapterError> {
        self.factories
            .iter()
            .fold(AdapterMatch::NotMatched, |found, factory| {
                found.or_else(|| factory.get(return_type, annotations, &self.config))
            })
            .into_result(return_type)
    }

    /// Declare a service method returning `ServiceCall<T>`.
    ///
    /// Fails immediately if no factory accepts the declared return type, or
    /// if the declared payload names a type other than `T`.
    #[instrument(skip(self, spec), fields(method = %spec.method(), path = %spec.path()))]
    pub fn method<T>(&self, spec: MethodSpec) -> std::result::Result<ServiceMethod<T>, AdapterError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let adapter = self.call_adapter(spec.return_type(), spec.annotations())?;

        let payload = adapter.response_type();
        if matches!(payload, TypeDescriptor::Concrete { .. }) && !payload.is::<T>() {
            return Err(AdapterError::PayloadMismatch {
                declared: payload.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            });
        }

        debug!(payload = %payload, "Declared service method");
        Ok(ServiceMethod::new(self.clone(), spec, Arc::new(adapter)))
    }

    /// Create an underlying call bound to this client's pipeline
    pub fn new_call<T>(&self, request: Request) -> HttpCall<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        HttpCall::new(Arc::clone(&self.pipeline), Arc::new(request))
    }
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("base_url", &self.config.base_url)
            .field("interceptors", &self.pipeline.interceptor_count())
            .field("factories", &self.factories.len())
            .finish()
    }
}

/// Builder for [`ServiceClient`]
pub struct ServiceClientBuilder {
    config: ClientConfig,
    interceptors: Vec<Arc<dyn Interceptor>>,
    transport: Option<Arc<dyn Transport>>,
    factories: Vec<SharedAdapterFactory>,
}

impl ServiceClientBuilder {
    /// Append an interceptor; interceptors run in the order they are added
    pub fn interceptor(self, interceptor: impl Interceptor + 'static) -> Self {
        self.shared_interceptor(Arc::new(interceptor))
    }

    pub fn shared_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Append an [`AuthRequestInterceptor`] backed by `provider`
    pub fn auth(self, provider: Arc<dyn AuthTokenProvider>) -> Self {
        self.interceptor(AuthRequestInterceptor::from_shared(provider))
    }

    /// Replace the default reqwest transport
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Register a call adapter factory. Registering the same instance twice
    /// keeps a single registration.
    pub fn call_adapter_factory(mut self, factory: SharedAdapterFactory) -> Self {
        if self.factories.iter().any(|f| f.id() == factory.id()) {
            debug!(factory = %factory.id(), "Call adapter factory already registered");
        } else {
            self.factories.push(factory);
        }
        self
    }

    /// Build the client
    ///
    /// Installs a [`ServiceCallAdapterFactory`] if none was registered and a
    /// [`ReqwestTransport`] if no transport was given.
    pub fn build(mut self) -> Result<ServiceClient> {
        Url::parse(&self.config.base_url).map_err(|e| ConfigError::Invalid {
            message: format!("invalid base URL '{}': {}", self.config.base_url, e),
        })?;

        let transport = match self.transport.take() {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };

        if self.factories.is_empty() {
            self.factories
                .push(Arc::new(ServiceCallAdapterFactory::new()));
        }

        info!(
            base_url = %self.config.base_url,
            interceptors = self.interceptors.len(),
            factories = self.factories.len(),
            "Service client ready"
        );

        Ok(ServiceClient {
            config: Arc::new(self.config),
            pipeline: Arc::new(Pipeline::new(self.interceptors, transport)),
            factories: self.factories.into(),
        })
    }
}
