//! Interceptor pipeline
//!
//! Interceptors run in registration order. Each one receives a [`Chain`]
//! positioned just after itself; calling [`Chain::proceed`] hands a request
//! to the next interceptor, and after the last one to the transport.

use crate::error::{CallError, CallResult};
use crate::http::{Request, Response, Transport};
// async_trait required for dyn-compatibility with Arc<dyn Interceptor>
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A request/response pipeline stage
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Inspect or rewrite the pending request, then usually call
    /// `chain.proceed(..)` and return (or rewrite) its response.
    async fn intercept(&self, chain: Chain<'_>) -> CallResult<Response>;
}

/// The remaining pipeline as seen by one interceptor
pub struct Chain<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    transport: &'a dyn Transport,
    cancel: &'a CancellationToken,
    request: Arc<Request>,
}

impl<'a> Chain<'a> {
    /// Create a chain that starts at the first interceptor
    pub fn new(
        interceptors: &'a [Arc<dyn Interceptor>],
        transport: &'a dyn Transport,
        cancel: &'a CancellationToken,
        request: Arc<Request>,
    ) -> Self {
        Self {
            interceptors,
            transport,
            cancel,
            request,
        }
    }

    /// The request in flight at this stage
    pub fn request(&self) -> &Arc<Request> {
        &self.request
    }

    /// Forward a request (the original or a rewritten copy) to the next stage
    pub async fn proceed(&self, request: Arc<Request>) -> CallResult<Response> {
        if self.cancel.is_cancelled() {
            return Err(CallError::Canceled);
        }

        match self.interceptors.split_first() {
            Some((next, rest)) => {
                let chain = Chain {
                    interceptors: rest,
                    transport: self.transport,
                    cancel: self.cancel,
                    request,
                };
                next.intercept(chain).await
            }
            None => self.transport.execute(request).await,
        }
    }

    /// Run the whole pipeline for the request this chain was created with
    pub async fn start(self) -> CallResult<Response> {
        let request = Arc::clone(&self.request);
        self.proceed(request).await
    }
}

/// The interceptors and transport a client sends every call through
#[derive(Clone)]
pub struct Pipeline {
    interceptors: Vec<Arc<dyn Interceptor>>,
    transport: Arc<dyn Transport>,
}

impl Pipeline {
    pub fn new(interceptors: Vec<Arc<dyn Interceptor>>, transport: Arc<dyn Transport>) -> Self {
        Self {
            interceptors,
            transport,
        }
    }

    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    /// Run a request through every interceptor and the transport
    pub async fn execute(
        &self,
        request: Arc<Request>,
        cancel: &CancellationToken,
    ) -> CallResult<Response> {
        Chain::new(&self.interceptors, self.transport.as_ref(), cancel, request)
            .start()
            .await
    }
}
