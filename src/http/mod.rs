//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → request.rs (buffer body, build Request)
//!     → [routing layer dispatches to handler]
//!     → response.rs (status, headers, body)
//!     → static assets when no route matched (optional)
//!     → Send to client
//! ```

pub mod form;
pub mod handler;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use form::{Form, FormError};
pub use handler::{BoxHandler, Handler, HandlerError, HandlerResult};
pub use request::{MakeRequestUuidV4, Request, X_REQUEST_ID};
pub use response::Response;
pub use server::HttpServer;
