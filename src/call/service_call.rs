//! The wrapper type exposed to application code

use crate::call::{Call, ServiceResponse};
use crate::error::{CallError, CallResult};
use crate::http::Request;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;

/// A single service invocation.
///
/// Owns its underlying call exclusively. Execution state is tracked by the
/// wrapper itself, so a fresh `ServiceCall` always starts out neither
/// executed nor canceled. Not meant to be driven from several tasks at once.
pub struct ServiceCall<T> {
    inner: Box<dyn Call<T>>,
    executed: AtomicBool,
    canceled: AtomicBool,
}

impl<T: Send + 'static> ServiceCall<T> {
    pub(crate) fn new(inner: Box<dyn Call<T>>) -> Self {
        Self {
            inner,
            executed: AtomicBool::new(false),
            canceled: AtomicBool::new(false),
        }
    }

    /// The request this call will send, before interception
    pub fn request(&self) -> &Arc<Request> {
        self.inner.request()
    }

    /// Send the request and wait for the decoded response
    pub async fn execute(&self) -> CallResult<ServiceResponse<T>> {
        if self.executed.swap(true, Ordering::SeqCst) {
            return Err(CallError::AlreadyExecuted);
        }
        self.inner.execute().await
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

    /// Cancel the call; an in-flight execution resolves to `CallError::Canceled`
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
        self.inner.cancel();
    }

    pub fn is_executed(&self) -> bool {
        self.executed.load(Ordering::SeqCst)
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }

    /// A new, unexecuted call for the same request
    pub fn clone_call(&self) -> ServiceCall<T> {
        ServiceCall::new(self.inner.clone_call())
    }
}

impl<T> std::fmt::Debug for ServiceCall<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCall")
            .field("method", self.inner.request().method())
            .field("url", &self.inner.request().url().as_str())
            .field("executed", &self.executed.load(Ordering::SeqCst))
            .field("canceled", &self.canceled.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::Url;
    use reqwest::header::HeaderMap;
    use std::sync::atomic::AtomicUsize;

    /// Underlying call that reports itself as already used
    struct Stale {
        request: Arc<Request>,
        executions: Arc<AtomicUsize>,
        cancels: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Call<u32> for Stale {
        fn request(&self) -> &Arc<Request> {
            &self.request
        }

        async fn execute(&self) -> CallResult<ServiceResponse<u32>> {
            self.executions.fetch_add(1, Ordering::SeqCst);
            let response = crate::http::Response::new(
                Arc::clone(&self.request),
                reqwest::StatusCode::OK,
                HeaderMap::new(),
                b"42".to_vec(),
            );
            ServiceResponse::from_response(response)
        }

        fn cancel(&self) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
        }

        fn is_executed(&self) -> bool {
            true
        }

        fn is_canceled(&self) -> bool {
            true
        }

        fn clone_call(&self) -> Box<dyn Call<u32>> {
            Box::new(Stale {
                request: Arc::clone(&self.request),
                executions: Arc::clone(&self.executions),
                cancels: Arc::clone(&self.cancels),
            })
        }
    }

    fn stale() -> (Stale, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let executions = Arc::new(AtomicUsize::new(0));
        let cancels = Arc::new(AtomicUsize::new(0));
        let request = Request::get(Url::parse("https://api.example.com/n").unwrap())
            .build()
            .unwrap();
        (
            Stale {
                request: Arc::new(request),
                executions: Arc::clone(&executions),
                cancels: Arc::clone(&cancels),
            },
            executions,
            cancels,
        )
    }

    #[test]
    fn test_fresh_wrapper_ignores_underlying_state() {
        let (inner, _, _) = stale();
        let call = ServiceCall::new(Box::new(inner));
        assert!(!call.is_executed());
        assert!(!call.is_canceled());
    }

    #[tokio::test]
    async fn test_execute_once() {
        let (inner, executions, _) = stale();
        let call = ServiceCall::new(Box::new(inner));

        let response = call.execute().await.unwrap();
        assert_eq!(response.body(), Some(&42));
        assert!(call.is_executed());

        assert!(matches!(
            call.execute().await,
            Err(CallError::AlreadyExecuted)
        ));
        assert_eq!(executions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_delegates() {
        let (inner, _, cancels) = stale();
        let call = ServiceCall::new(Box::new(inner));

        call.cancel();
        assert!(call.is_canceled());
        assert_eq!(cancels.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clone_call_is_fresh() {
        let (inner, executions, _) = stale();
        let call = ServiceCall::new(Box::new(inner));
        call.execute().await.unwrap();

        let clone = call.clone_call();
        assert!(!clone.is_executed());
        assert!(Arc::ptr_eq(clone.request(), call.request()));
        clone.execute().await.unwrap();
        assert_eq!(executions.load(Ordering::SeqCst), 2);
    }
}
