//! Declared service methods

use crate::adapter::{Annotation, CallAdapter, ServiceCallAdapter, TypeDescriptor};
use crate::call::ServiceCall;
use crate::client::ServiceClient;
use crate::error::{CallError, CallResult};
use crate::http::{Method, Request};
use crate::util::QueryBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;

/// Declaration of one service operation
#[derive(Debug, Clone)]
pub struct MethodSpec {
    method: Method,
    path: String,
    return_type: TypeDescriptor,
    annotations: Vec<Annotation>,
    headers: Vec<(String, String)>,
}

impl MethodSpec {
    /// `path` may contain `{name}` placeholders filled per call
    pub fn new(method: Method, path: impl Into<String>, return_type: TypeDescriptor) -> Self {
        Self {
            method,
            path: path.into(),
            return_type,
            annotations: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>, return_type: TypeDescriptor) -> Self {
        Self::new(Method::GET, path, return_type)
    }

    pub fn post(path: impl Into<String>, return_type: TypeDescriptor) -> Self {
        Self::new(Method::POST, path, return_type)
    }

    pub fn put(path: impl Into<String>, return_type: TypeDescriptor) -> Self {
        Self::new(Method::PUT, path, return_type)
    }

    pub fn delete(path: impl Into<String>, return_type: TypeDescriptor) -> Self {
        Self::new(Method::DELETE, path, return_type)
    }

    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Header sent with every call of this method
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn return_type(&self) -> &TypeDescriptor {
        &self.return_type
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Per-call arguments: path parameters, query, headers and body
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    path: Vec<(String, String)>,
    query: QueryBuilder,
    headers: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the `{name}` placeholder (value is percent-encoded)
    pub fn path(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.path.push((name.into(), value.to_string()));
        self
    }

    pub fn query(mut self, key: &str, value: impl Display) -> Self {
        self.query = self.query.param(key, value);
        self
    }

    pub fn optional_query<T: Display>(mut self, key: &str, value: Option<T>) -> Self {
        self.query = self.query.optional(key, value);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> CallResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// A declared method with its resolved adapter
pub struct ServiceMethod<T> {
    client: ServiceClient,
    spec: MethodSpec,
    adapter: Arc<ServiceCallAdapter>,
    _payload: PhantomData<fn() -> T>,
}

impl<T> ServiceMethod<T>
where
    T: DeserializeOwned + Send + 'static,
{
    pub(crate) fn new(
        client: ServiceClient,
        spec: MethodSpec,
        adapter: Arc<ServiceCallAdapter>,
    ) -> Self {
        Self {
            client,
            spec,
            adapter,
            _payload: PhantomData,
        }
    }

    pub fn spec(&self) -> &MethodSpec {
        &self.spec
    }

    pub fn response_type(&self) -> &TypeDescriptor {
        self.adapter.response_type()
    }

    /// Create a call without arguments
    pub fn call(&self) -> CallResult<ServiceCall<T>> {
        self.call_with(CallArgs::default())
    }

    /// Create a call. Nothing is sent until the call is executed.
    pub fn call_with(&self, args: CallArgs) -> CallResult<ServiceCall<T>> {
        let path = expand_path(&self.spec.path, &args.path)?;
        let url = append_query(self.client.config().endpoint(&path), args.query.build());

        let mut builder = Request::parse(self.spec.method.clone(), &url)?;
        for (name, value) in self.spec.headers.iter().chain(args.headers.iter()) {
            builder = builder.header(name, value);
        }
        if let Some(body) = &args.body {
            builder = builder.json(body);
        }
        let request = builder.build()?;

        let call = self.client.new_call::<T>(request);
        Ok(self.adapter.adapt(Box::new(call)))
    }
}

impl<T> Clone for ServiceMethod<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            spec: self.spec.clone(),
            adapter: Arc::clone(&self.adapter),
            _payload: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for ServiceMethod<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceMethod")
            .field("spec", &self.spec)
            .field("adapter", &self.adapter)
            .finish()
    }
}

/// Append a `?a=b` query string, joining with `&` when the URL already has a query
fn append_query(mut url: String, query: String) -> String {
    match query.strip_prefix('?') {
        Some(params) if url.contains('?') => {
            if !url.ends_with('?') && !url.ends_with('&') {
                url.push('&');
            }
            url.push_str(params);
        }
        _ => url.push_str(&query),
    }
    url
}

/// Substitute `{name}` placeholders; every placeholder must be filled
fn expand_path(template: &str, params: &[(String, String)]) -> CallResult<String> {
    let mut path = template.to_string();
    for (name, value) in params {
        let placeholder = format!("{{{}}}", name);
        if !path.contains(&placeholder) {
            return Err(CallError::InvalidRequest(format!(
                "path '{}' has no parameter '{}'",
                template, name
            )));
        }
        path = path.replace(&placeholder, &urlencoding::encode(value));
    }

    if let Some(start) = path.find('{') {
        let rest = &path[start..];
        let name = rest.split('}').next().unwrap_or(rest);
        return Err(CallError::InvalidRequest(format!(
            "missing value for path parameter '{}}}' in '{}'",
            name, template
        )));
    }

    Ok(path)
}
