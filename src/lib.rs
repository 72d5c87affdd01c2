//! Typed service calls over reqwest
//!
//! Declare service methods that return [`ServiceCall<T>`](call::ServiceCall),
//! send them through an interceptor pipeline, and attach bearer tokens from
//! a pluggable provider.
//!
//! ## Pieces
//!
//! - **Call adapters**: a [`ServiceCallAdapterFactory`](adapter::ServiceCallAdapterFactory)
//!   inspects each declared return type once and produces the adapter that
//!   wraps every call of that method
//! - **Auth interceptor**: [`AuthRequestInterceptor`](auth::AuthRequestInterceptor)
//!   adds `Authorization: Bearer <token>` whenever the
//!   [`AuthTokenProvider`](auth::AuthTokenProvider) has a token
//! - **Configuration** via TOML files and environment variables
//!
//! ## Example
//!
//! ```ignore
//! let client = ServiceClient::builder(ClientConfig::new("https://api.example.com"))
//!     .auth(Arc::new(StaticTokenProvider::new("token")))
//!     .build()?;
//!
//! let get_user = client.method::<User>(MethodSpec::get(
//!     "/users/{id}",
//!     TypeDescriptor::service_call_of::<User>(),
//! ))?;
//!
//! let response = get_user.call_with(CallArgs::new().path("id", 42))?.execute().await?;
//! ```

pub mod adapter;
pub mod auth;
pub mod call;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod util;

// Re-export main types
pub use adapter::{AdapterMatch, ServiceCallAdapter, ServiceCallAdapterFactory, TypeDescriptor};
pub use auth::{AuthRequestInterceptor, AuthTokenProvider};
pub use call::{ServiceCall, ServiceResponse};
pub use client::{CallArgs, MethodSpec, ServiceClient, ServiceMethod};
pub use config::{AppConfig, ClientConfig, load_config};
pub use error::{AppError, Result};
