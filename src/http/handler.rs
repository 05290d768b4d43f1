//! Handler capability and handler errors.

use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;

use crate::http::{Request, Response};

/// Result returned by handlers and middleware.
pub type HandlerResult = Result<Response, HandlerError>;

/// Shared, type-erased handler.
pub type BoxHandler = Arc<dyn Handler>;

/// Anything that can answer a request.
///
/// Implemented for plain closures and fn items with the signature
/// `Fn(&Request) -> HandlerResult`; stateful handlers implement it directly.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, request: &Request) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
{
    fn handle(&self, request: &Request) -> HandlerResult {
        self(request)
    }
}

/// Failure raised by a handler or middleware.
///
/// Passed through the dispatcher unmodified; the transport decides what to
/// write back.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Failure with an explicit status for the client.
    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },

    /// I/O failure inside a handler.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other failure.
    #[error("Internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn internal(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Internal(err.into())
    }

    /// Status the transport should answer with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Status { status, .. } => *status,
            Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
