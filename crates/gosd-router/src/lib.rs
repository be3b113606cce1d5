//! Radix tree router for the gosd API front.
//!
//! Routes are stored in a tree of `/`-separated segments. Each route maps an
//! HTTP method to an arbitrary value `T` (the server routes to its endpoint
//! catalogue), and the whole tree can be mounted under an API prefix such as
//! `/v4`.
//!
//! # Features
//!
//! - **Path Parameters**: Express style (`/devices/:deviceId`) or brace style
//!   (`/devices/{deviceId}`)
//! - **Static Priority**: `/devices/me` wins over `/devices/:deviceId`
//! - **Prefix Mounting**: paths outside the prefix are reported separately
//!   from paths that simply have no route
//!
//! # Example
//!
//! ```rust
//! use gosd_router::{Lookup, MethodRouter, Router};
//! use http::Method;
//!
//! let mut router = Router::with_prefix("/v4");
//! router.insert("/devices/:deviceId", MethodRouter::new().get("deviceGroup"));
//!
//! match router.lookup(&Method::GET, "/v4/devices/herolte") {
//!     Lookup::Matched(m) => {
//!         assert_eq!(*m.value, "deviceGroup");
//!         assert_eq!(m.params.get("deviceId"), Some("herolte"));
//!     }
//!     other => panic!("unexpected lookup: {other:?}"),
//! }
//!
//! assert!(matches!(router.lookup(&Method::GET, "/v4/nothing"), Lookup::Unmatched));
//! assert!(matches!(router.lookup(&Method::GET, "/"), Lookup::OutsidePrefix));
//! ```

mod method_router;
mod node;
mod params;
mod router;

pub use method_router::MethodRouter;
pub use node::{Node, SegmentKind};
pub use params::Params;
pub use router::Router;

/// A matched route with its routed value and extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The value registered for the matched path and method
    pub value: &'a T,
    /// Extracted path parameters
    pub params: Params,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(value: &'a T, params: Params) -> Self {
        Self { value, params }
    }
}

/// Outcome of routing a request path through a prefixed [`Router`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<'a, T> {
    /// A route matched both path and method.
    Matched(RouteMatch<'a, T>),
    /// The path lies under the API prefix but nothing handles it.
    Unmatched,
    /// The path is not under the API prefix at all.
    OutsidePrefix,
}
