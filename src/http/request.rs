//! Incoming request as seen by routes and handlers.
//!
//! # Responsibilities
//! - Expose method, path, query, headers and buffered body
//! - Carry the path variables of the matched route
//! - Parse form data on demand
//! - Generate request IDs for the transport layer
//!
//! # Design Decisions
//! - The body is buffered by the transport before dispatch; handlers are synchronous
//! - Variables are attached by the dispatcher, never by handlers

use axum::body::{Body, Bytes};
use axum::http::{header, request::Parts, HeaderMap, HeaderValue, Method, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::form::{Form, FormError};
use crate::routing::Vars;

/// Header carrying the per-request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// A request handed to the router.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    vars: Vars,
}

impl Request {
    /// Create a request with no headers and an empty body.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            vars: Vars::default(),
        }
    }

    /// Build from transport request parts and a buffered body.
    pub fn from_parts(parts: Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            vars: Vars::default(),
        }
    }

    /// Rebuild a transport request from the method, URI, headers and body.
    pub fn into_http(self) -> axum::http::Request<Body> {
        let mut request = axum::http::Request::new(Body::from(self.body));
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.headers_mut() = self.headers;
        request
    }

    pub fn with_header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Path component of the URI, still percent-encoded.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Path and query as sent by the client.
    pub fn request_uri(&self) -> &str {
        self.uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| self.uri.path())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Variables captured by the matched route.
    pub fn vars(&self) -> &Vars {
        &self.vars
    }

    /// Shorthand for `vars().get(name)`.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name)
    }

    pub(crate) fn set_vars(&mut self, vars: Vars) {
        self.vars = vars;
    }

    /// ID assigned by the request-id layer, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
    }

    /// Parse form values from the body and the query string.
    ///
    /// The body is only read for POST, PUT and PATCH requests with an
    /// `application/x-www-form-urlencoded` content type.
    pub fn form(&self) -> Result<Form, FormError> {
        let mut form = Form::default();

        if self.has_form_body() {
            let body = std::str::from_utf8(&self.body).map_err(|_| FormError::InvalidBody)?;
            form.extend_encoded(body)?;
        }
        if let Some(query) = self.query() {
            form.extend_encoded(query)?;
        }
        Ok(form)
    }

    /// First form value for `key`; parse errors read as absent.
    pub fn form_value(&self, key: &str) -> Option<String> {
        self.form().ok()?.get(key).map(str::to_string)
    }

    fn has_form_body(&self) -> bool {
        let body_method = matches!(self.method, Method::POST | Method::PUT | Method::PATCH);
        let urlencoded = self
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| {
                ct.split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .eq_ignore_ascii_case("application/x-www-form-urlencoded")
            })
            .unwrap_or(false);
        body_method && urlencoded
    }
}

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}
