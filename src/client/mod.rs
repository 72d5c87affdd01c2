//! Service client and declared methods

pub mod method;
pub mod service;

pub use method::{CallArgs, MethodSpec, ServiceMethod};
pub use service::{ServiceClient, ServiceClientBuilder, SharedAdapterFactory};
