//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     pattern string
//!     → pattern.rs (compile literal and {var} segments)
//!     → route.rs (pattern + method set + name + handler)
//!     → router.rs (ordered entries, subrouters, middleware)
//!     → dispatch.rs (freeze as immutable Dispatcher)
//!
//! Incoming Request (method, path)
//!     → dispatch.rs (depth-first walk in registration order)
//!     → matcher.rs (strip subrouter prefixes, check methods)
//!     → middleware.rs (wrap handler, root middleware outermost)
//!     → handler invoked, or explicit NoRouteMatched
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in the hot path (literal and single-segment variables only)
//! - Deterministic: same input always matches same route
//! - First match wins (registration order, no specificity ranking)

pub mod dispatch;
pub mod matcher;
pub mod middleware;
pub mod pattern;
pub mod route;
pub mod router;
pub mod vars;

pub use dispatch::{DispatchError, Dispatcher, RouteInfo, RouteMatch};
pub use middleware::{BoxMiddleware, Middleware};
pub use pattern::{Pattern, PatternError, Segment, UrlError};
pub use route::{Route, RouteHandle, RouteId};
pub use router::{RouteError, Router};
pub use vars::Vars;
