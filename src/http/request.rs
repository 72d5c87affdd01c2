//! Immutable outgoing request and its copy-on-write builder

use crate::error::{CallError, CallResult};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;

/// An outgoing HTTP request.
///
/// Requests are immutable once built and travel through the interceptor
/// chain as `Arc<Request>`. Rewriting one means building a new request with
/// [`Request::to_builder`]; the original is left untouched.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl Request {
    /// Start building a request
    pub fn builder(method: Method, url: Url) -> RequestBuilder {
        RequestBuilder {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            error: None,
        }
    }

    /// Start building a GET request
    pub fn get(url: Url) -> RequestBuilder {
        Self::builder(Method::GET, url)
    }

    /// Start building a request from a URL string
    pub fn parse(method: Method, url: &str) -> CallResult<RequestBuilder> {
        let url = Url::parse(url)
            .map_err(|e| CallError::InvalidRequest(format!("invalid URL '{}': {}", url, e)))?;
        Ok(Self::builder(method, url))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// First value of a header, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// A builder pre-populated with a copy of this request
    pub fn to_builder(&self) -> RequestBuilder {
        RequestBuilder {
            method: self.method.clone(),
            url: self.url.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            error: None,
        }
    }
}

/// Builder for [`Request`].
///
/// Invalid header names or values are remembered and reported by
/// [`RequestBuilder::build`], so calls can be chained freely.
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    error: Option<CallError>,
}

impl RequestBuilder {
    /// Set a header, replacing any existing values with the same name
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let Some((name, value)) = self.parse_header(name, value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Append a header value, keeping existing values with the same name
    pub fn add_header(mut self, name: &str, value: &str) -> Self {
        if let Some((name, value)) = self.parse_header(name, value) {
            self.headers.append(name, value);
        }
        self
    }

    /// Remove all values of a header
    pub fn remove_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn url(mut self, url: Url) -> Self {
        self.url = url;
        self
    }

    /// Set a raw body
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize a JSON body and set the content type
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                self.body = Some(bytes);
            }
            Err(e) => self.remember(CallError::Decode(e)),
        }
        self
    }

    /// Finish the request
    pub fn build(self) -> CallResult<Request> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        })
    }

    fn parse_header(&mut self, name: &str, value: &str) -> Option<(HeaderName, HeaderValue)> {
        let parsed_name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(n) => n,
            Err(_) => {
                self.remember(CallError::InvalidRequest(format!(
                    "invalid header name '{}'",
                    name
                )));
                return None;
            }
        };
        match HeaderValue::from_str(value) {
            Ok(v) => Some((parsed_name, v)),
            Err(_) => {
                // The value may be a credential, keep it out of the message
                self.remember(CallError::InvalidRequest(format!(
                    "invalid value for header '{}'",
                    name
                )));
                None
            }
        }
    }

    fn remember(&mut self, err: CallError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://api.example.com/users/1").unwrap()
    }

    #[test]
    fn test_build_get_request() {
        let request = Request::get(url())
            .header("Accept", "application/json")
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.url().path(), "/users/1");
        assert_eq!(request.header("accept"), Some("application/json"));
        assert!(request.body().is_none());
    }

    #[test]
    fn test_to_builder_leaves_original_untouched() {
        let original = Request::get(url()).header("X-Trace", "a").build().unwrap();
        let copy = original
            .to_builder()
            .header("X-Trace", "b")
            .header("Authorization", "Bearer t")
            .build()
            .unwrap();

        assert_eq!(original.header("X-Trace"), Some("a"));
        assert!(original.header("Authorization").is_none());
        assert_eq!(copy.header("X-Trace"), Some("b"));
        assert_eq!(copy.header("Authorization"), Some("Bearer t"));
    }

    #[test]
    fn test_header_replace_and_append() {
        let request = Request::get(url())
            .add_header("Accept", "text/plain")
            .add_header("Accept", "application/json")
            .build()
            .unwrap();
        assert_eq!(request.headers().get_all("accept").iter().count(), 2);

        let request = request
            .to_builder()
            .header("Accept", "application/json")
            .build()
            .unwrap();
        assert_eq!(request.headers().get_all("accept").iter().count(), 1);

        let request = request.to_builder().remove_header("Accept").build().unwrap();
        assert!(request.header("accept").is_none());
    }

    #[test]
    fn test_json_body() {
        let request = Request::builder(Method::POST, url())
            .json(&serde_json::json!({"name": "ada"}))
            .build()
            .unwrap();

        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body(), Some(br#"{"name":"ada"}"#.as_slice()));
    }

    #[test]
    fn test_invalid_header_value_reported_at_build() {
        let result = Request::get(url())
            .header("Authorization", "Bearer bad\nvalue")
            .build();

        match result {
            Err(CallError::InvalidRequest(msg)) => {
                assert!(msg.contains("Authorization"));
                assert!(!msg.contains("bad"));
            }
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_invalid_url() {
        let result = Request::parse(Method::GET, "not a url");
        assert!(matches!(result, Err(CallError::InvalidRequest(_))));
    }
}
