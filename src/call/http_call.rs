//! The underlying network call
//!
//! An `HttpCall<T>` sends one request through a client's pipeline and decodes
//! a successful JSON body into `T`. Calls are single use; `clone_call` gives a
//! fresh one for the same request.

use crate::call::{Call, ServiceResponse};
use crate::error::{CallError, CallResult};
use crate::http::{Pipeline, Request};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

pub struct HttpCall<T> {
    pipeline: Arc<Pipeline>,
    request: Arc<Request>,
    executed: AtomicBool,
    cancel: CancellationToken,
    _payload: PhantomData<fn() -> T>,
}

impl<T> HttpCall<T>
where
    T: DeserializeOwned + Send + 'static,
{
    pub fn new(pipeline: Arc<Pipeline>, request: Arc<Request>) -> Self {
        Self {
            pipeline,
            request,
            executed: AtomicBool::new(false),
            cancel: CancellationToken::new(),
            _payload: PhantomData,
        }
    }

    /// Execute on a background task and hand the result to `callback`
    pub fn enqueue<F>(self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(CallResult<ServiceResponse<T>>) + Send + 'static,
    {
        tokio::spawn(async move {
            let result = self.execute().await;
            callback(result);
        })
    }
}

#[async_trait]
impl<T> Call<T> for HttpCall<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn request(&self) -> &Arc<Request> {
        &self.request
    }

    #[instrument(skip(self), fields(method = %self.request.method(), url = %self.request.url()))]
    async fn execute(&self) -> CallResult<ServiceResponse<T>> {
        if self.executed.swap(true, Ordering::SeqCst) {
            return Err(CallError::AlreadyExecuted);
        }

        let response = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("Call canceled");
                return Err(CallError::Canceled);
            }
            result = self.pipeline.execute(Arc::clone(&self.request), &self.cancel) => result?,
        };

        ServiceResponse::from_response(response)
    }

    fn cancel(&self) {
        self.cancel.cancel();
    }

    fn is_executed(&self) -> bool {
        self.executed.load(Ordering::SeqCst)
    }

    fn is_canceled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn clone_call(&self) -> Box<dyn Call<T>> {
        Box::new(HttpCall::<T>::new(
            Arc::clone(&self.pipeline),
            Arc::clone(&self.request),
        ))
    }
}

impl<T> std::fmt::Debug for HttpCall<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCall")
            .field("method", self.request.method())
            .field("url", &self.request.url().as_str())
            .field("executed", &self.executed.load(Ordering::SeqCst))
            .field("canceled", &self.cancel.is_cancelled())
            .finish()
    }
}
