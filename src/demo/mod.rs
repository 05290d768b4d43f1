//! Demo programs mounted by the server.
//!
//! # Responsibilities
//! - `mux`: path variables, method matching, named routes, subrouters and
//!   router-level middleware
//! - `stdlib`: handler shapes, form parsing and a single wrapped handler;
//!   everything else falls through to the static asset directory
//!
//! Both return an unfrozen [`Router`]; the caller freezes it.

pub mod mux;
pub mod stdlib;

use crate::config::Variant;
use crate::routing::{RouteError, Router};

/// Build the router for a demo program.
pub fn build(variant: Variant) -> Result<Router, RouteError> {
    match variant {
        Variant::Mux => mux::router(),
        Variant::Std => stdlib::router(),
    }
}

/// Asset directory used by a variant when none is configured.
pub fn default_assets_dir(variant: Variant) -> Option<&'static str> {
    match variant {
        Variant::Mux => None,
        Variant::Std => Some(stdlib::ASSETS_DIR),
    }
}
