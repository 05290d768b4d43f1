//! Request logging middleware.
//! Logs the request URI of every request it wraps, then hands off.

use std::time::Instant;

use crate::http::{Handler, HandlerResult, Request};
use crate::routing::middleware::{from_fn, Middleware};

/// Log each request with its URI, outcome and elapsed time.
pub fn request_log() -> impl Middleware {
    from_fn(|request: &Request, next: &dyn Handler| -> HandlerResult {
        let start = Instant::now();
        tracing::info!(
            request_id = request.request_id().unwrap_or("unknown"),
            method = %request.method(),
            request_uri = %request.request_uri(),
            "Request received"
        );

        let result = next.handle(request);
        match &result {
            Ok(response) => tracing::debug!(
                request_uri = %request.request_uri(),
                status = response.status().as_u16(),
                elapsed = ?start.elapsed(),
                "Request handled"
            ),
            Err(e) => tracing::warn!(
                request_uri = %request.request_uri(),
                error = %e,
                elapsed = ?start.elapsed(),
                "Request failed"
            ),
        }
        result
    })
}
