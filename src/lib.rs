//! Minimal HTTP router library.
//!
//! Routes are registered on a [`Router`] tree (patterns, methods, names,
//! subrouters and middleware), frozen into a [`Dispatcher`], and served by
//! [`HttpServer`] over axum.

pub mod config;
pub mod demo;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ServerConfig;
pub use http::{Handler, HandlerError, HandlerResult, HttpServer, Request, Response};
pub use lifecycle::Shutdown;
pub use routing::{DispatchError, Dispatcher, RouteError, Router};
