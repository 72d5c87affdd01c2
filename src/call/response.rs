//! Typed call result

use crate::error::CallResult;
use crate::http::Response;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

/// Result of a completed call: the decoded payload on 2xx, the raw error
/// body otherwise.
#[derive(Debug, Clone)]
pub struct ServiceResponse<T> {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<T>,
    error_body: Option<Vec<u8>>,
}

impl<T: DeserializeOwned> ServiceResponse<T> {
    /// Decode a raw response
    pub fn from_response(response: Response) -> CallResult<Self> {
        let status = response.status();
        let headers = response.headers().clone();

        if response.is_success() {
            let body = response.json()?;
            Ok(Self {
                status,
                headers,
                body: Some(body),
                error_body: None,
            })
        } else {
            Ok(Self {
                status,
                headers,
                body: None,
                error_body: Some(response.into_body()),
            })
        }
    }
}

impl<T> ServiceResponse<T> {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// True for 2xx statuses
    pub fn is_successful(&self) -> bool {
        self.status.is_success()
    }

    pub fn body(&self) -> Option<&T> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<T> {
        self.body
    }

    pub fn error_body(&self) -> Option<&[u8]> {
        self.error_body.as_deref()
    }
}
