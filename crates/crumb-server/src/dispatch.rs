//! URL pattern dispatch for prepared routes.
//!
//! Route URLs are matched segment by segment. A segment written `:name` or
//! `{name}` captures one path segment; anything else must match literally.
//! When several patterns match a path, the one with literal segments
//! furthest to the left wins, so `/users/me` beats `/users/:id`.
//!
//! # Example
//!
//! ```rust
//! use crumb_core::HttpMethod;
//! use crumb_extract::{RouteRequest, RouteResponse};
//! use crumb_router::{prepare_routes, sync_handler, RouteOptions, RouteRegistry};
//! use crumb_server::{Dispatch, RouteTable};
//! use http::Method;
//!
//! let mut registry = RouteRegistry::new();
//! registry.create_route(RouteOptions::new(
//!     HttpMethod::Get,
//!     "/users/:id",
//!     sync_handler(|_: &RouteRequest, _: &RouteResponse| Ok(())),
//! ));
//! let table = RouteTable::new(prepare_routes(&mut registry, None));
//!
//! match table.dispatch(&Method::GET, "/users/42") {
//!     Dispatch::Matched { params, .. } => assert_eq!(params.get("id"), Some("42")),
//!     other => panic!("unexpected {other:?}"),
//! }
//! assert!(matches!(table.dispatch(&Method::GET, "/nope"), Dispatch::NotFound));
//! ```

use crumb_core::{HttpMethod, Params};
use crumb_router::{PreparedRoute, PreparedRoutes, WrappedRoute};
use http::Method;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if let Some(name) = raw.strip_prefix(':') {
            return Self::Param(name.to_string());
        }
        match raw.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
            Some(name) => Self::Param(name.to_string()),
            None => Self::Literal(raw.to_string()),
        }
    }

    fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

#[derive(Debug)]
struct Pattern {
    url: String,
    segments: Vec<Segment>,
    methods: PreparedRoute,
}

impl Pattern {
    fn new(url: String, methods: PreparedRoute) -> Self {
        let segments = split(&url).map(Segment::parse).collect();
        Self {
            url,
            segments,
            methods,
        }
    }

    fn capture(&self, path: &[&str]) -> Option<Params> {
        if path.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, actual) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(expected) if expected == actual => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => params.push(name.as_str(), *actual),
            }
        }
        Some(params)
    }

    /// Literal positions, left to right. Compares greater when more specific.
    fn specificity(&self) -> Vec<bool> {
        self.segments.iter().map(Segment::is_literal).collect()
    }
}

/// Outcome of looking up a request in a [`RouteTable`].
#[derive(Debug)]
pub enum Dispatch<'a> {
    /// A route accepts this method and path.
    Matched {
        /// The URL pattern that matched.
        url: &'a str,
        /// The wrapped route to invoke.
        route: &'a WrappedRoute,
        /// Captured path parameters.
        params: Params,
    },
    /// The path is known but no matching pattern accepts the method.
    MethodNotAllowed {
        /// Methods accepted by the matching patterns.
        allowed: Vec<HttpMethod>,
    },
    /// No pattern matches the path.
    NotFound,
}

/// Prepared routes indexed for dispatch.
#[derive(Debug, Default)]
pub struct RouteTable {
    patterns: Vec<Pattern>,
}

impl RouteTable {
    /// Builds a table from prepared routes.
    #[must_use]
    pub fn new(routes: PreparedRoutes) -> Self {
        let patterns = routes
            .into_iter()
            .map(|(url, methods)| Pattern::new(url, methods))
            .collect();
        Self { patterns }
    }

    /// Returns the number of URL patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if the table has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Finds the route for a method and path.
    #[must_use]
    pub fn dispatch(&self, method: &Method, path: &str) -> Dispatch<'_> {
        let segments: Vec<&str> = split(path).collect();
        let method = HttpMethod::try_from(method).ok();

        let mut best: Option<(&Pattern, &WrappedRoute, Params)> = None;
        let mut allowed: Vec<HttpMethod> = Vec::new();
        let mut path_known = false;

        for pattern in &self.patterns {
            let Some(params) = pattern.capture(&segments) else {
                continue;
            };
            path_known = true;

            let Some(route) = method.and_then(|m| pattern.methods.get(&m)) else {
                for m in pattern.methods.keys() {
                    if !allowed.contains(m) {
                        allowed.push(*m);
                    }
                }
                continue;
            };

            let better = best
                .as_ref()
                .map_or(true, |(current, _, _)| pattern.specificity() > current.specificity());
            if better {
                best = Some((pattern, route, params));
            }
        }

        match best {
            Some((pattern, route, params)) => Dispatch::Matched {
                url: &pattern.url,
                route,
                params,
            },
            None if path_known => Dispatch::MethodNotAllowed { allowed },
            None => Dispatch::NotFound,
        }
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}
