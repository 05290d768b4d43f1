//! Response sink written by handlers.
//!
//! # Responsibilities
//! - Hold status, headers and body bytes produced by handlers
//! - Let middleware write before and after the wrapped handler
//! - Convert into an axum response for the transport
//!
//! # Design Decisions
//! - Body is buffered; handlers are synchronous and responses are small
//! - `text/plain` is assumed when a non-empty body has no content type

use std::borrow::Cow;
use std::fmt;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Response produced by a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    /// Empty `200 OK` response.
    pub fn new() -> Self {
        Self::with_status(StatusCode::OK)
    }

    pub fn with_status(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// `200 OK` with a plain-text body.
    pub fn text(body: impl Into<String>) -> Self {
        let mut response = Self::new();
        response
            .headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
        response.body = body.into().into_bytes();
        response
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, lossily decoded.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Append bytes to the body.
    pub fn write(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    /// Insert bytes before the current body.
    pub fn prepend(&mut self, bytes: &[u8]) {
        self.body.splice(0..0, bytes.iter().copied());
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for Response {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s.as_bytes());
        Ok(())
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        let Self {
            status,
            mut headers,
            body,
        } = self;
        if !body.is_empty() && !headers.contains_key(header::CONTENT_TYPE) {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
        }
        (status, headers, Body::from(body)).into_response()
    }
}
