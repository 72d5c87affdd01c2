//! Buffered HTTP response

use crate::error::CallResult;
use crate::http::Request;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// A fully buffered response, together with the request that produced it
/// (as seen by the transport, after every interceptor ran).
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    request: Arc<Request>,
}

impl Response {
    pub fn new(
        request: Arc<Request>,
        status: StatusCode,
        headers: HeaderMap,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            request,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    pub fn request(&self) -> &Arc<Request> {
        &self.request
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON. An empty body decodes as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> CallResult<T> {
        let data = if self.body.is_empty() {
            serde_json::from_slice(b"null")?
        } else {
            serde_json::from_slice(&self.body)?
        };
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;

    fn response(status: u16, body: &str) -> Response {
        let request = Request::get(Url::parse("https://api.example.com/").unwrap())
            .build()
            .unwrap();
        Response::new(
            Arc::new(request),
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            body.as_bytes().to_vec(),
        )
    }

    #[test]
    fn test_json_decoding() {
        let value: serde_json::Value = response(200, r#"{"id": 7}"#).json().unwrap();
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        let value: Option<u32> = response(204, "").json().unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let result: CallResult<serde_json::Value> = response(200, "{oops").json();
        assert!(matches!(result, Err(crate::error::CallError::Decode(_))));
    }

    #[test]
    fn test_status_helpers() {
        assert!(response(201, "").is_success());
        assert!(!response(404, "missing").is_success());
        assert_eq!(response(404, "missing").text(), "missing");
    }
}
