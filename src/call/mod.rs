//! Calls
//!
//! [`Call`] is the underlying single-use network call; [`ServiceCall`] is the
//! wrapper that call adapters hand to application code.

pub mod http_call;
pub mod response;
pub mod service_call;

pub use http_call::HttpCall;
pub use response::ServiceResponse;
pub use service_call::ServiceCall;

use crate::error::CallResult;
use crate::http::Request;
// async_trait required for dyn-compatibility with Box<dyn Call<T>>
use async_trait::async_trait;
use std::sync::Arc;

/// An underlying network call producing a `ServiceResponse<T>`
#[async_trait]
pub trait Call<T>: Send + Sync {
    /// The request this call sends
    fn request(&self) -> &Arc<Request>;

    /// Send the request; fails with `AlreadyExecuted` on a second attempt
    async fn execute(&self) -> CallResult<ServiceResponse<T>>;

    /// Cancel the call, in flight or not
    fn cancel(&self);

    fn is_executed(&self) -> bool;

    fn is_canceled(&self) -> bool;

    /// A new, unexecuted call for the same request
    fn clone_call(&self) -> Box<dyn Call<T>>;
}
