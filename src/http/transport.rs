//! Request dispatch
//!
//! The transport is the last stage of the interceptor chain. All I/O,
//! connection pooling and timeouts belong to reqwest.

use crate::config::ClientConfig;
use crate::error::CallResult;
use crate::http::{Request, Response};
// async_trait required for dyn-compatibility with Arc<dyn Transport>
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Sends a fully intercepted request over the network
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Arc<Request>) -> CallResult<Response>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Create a transport from client configuration
    pub fn new(config: &ClientConfig) -> CallResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { http })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    async fn execute(&self, request: Arc<Request>) -> CallResult<Response> {
        let mut builder = self
            .http
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone());
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        debug!(status = status.as_u16(), bytes = body.len(), "Response received");

        Ok(Response::new(request, status, headers, body.to_vec()))
    }
}
