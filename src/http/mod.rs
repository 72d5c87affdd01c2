//! HTTP pipeline
//!
//! Immutable requests, buffered responses, the interceptor chain and the
//! transport that terminates it.

pub mod chain;
pub mod request;
pub mod response;
pub mod transport;

pub use chain::{Chain, Interceptor, Pipeline};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use transport::{ReqwestTransport, Transport};

pub use reqwest::{Method, StatusCode, Url};
