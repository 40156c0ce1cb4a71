//! Route registry
//!
//! The endpoint table is fixed at build time. Each entry builds its own
//! router; an entry that fails is logged and left unmounted while the
//! remaining entries are still attempted.

use axum::Router;

use crate::api::{routes, ApiContext};
use crate::error::RouteError;

/// Builds the router mounted under an endpoint
pub type Register = fn(&ApiContext) -> Result<Router, RouteError>;

#[derive(Clone, Copy)]
pub struct RouteEntry {
    pub endpoint: &'static str,
    pub register: Register,
}

/// Every endpoint group the server exposes, in mount order
pub const ROUTES: &[RouteEntry] = &[
    RouteEntry {
        endpoint: "/api/test",
        register: routes::test::router,
    },
    RouteEntry {
        endpoint: "/api/audio/v1",
        register: routes::audio::router,
    },
];

/// Outcome of one registry pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistryReport {
    pub mounted: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

/// `/segment[/segment...]`, no trailing slash, not already mounted.
/// Anything else would make `Router::nest` panic.
fn check_endpoint(endpoint: &str, mounted: &[&str]) -> Result<(), RouteError> {
    let well_formed = endpoint.len() > 1
        && endpoint.starts_with('/')
        && !endpoint.ends_with('/')
        && endpoint[1..].split('/').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        });

    if !well_formed || mounted.contains(&endpoint) {
        return Err(RouteError::InvalidEndpoint(endpoint.to_string()));
    }
    Ok(())
}

/// Mount every entry onto `router`
pub fn mount(mut router: Router, entries: &[RouteEntry], ctx: &ApiContext) -> (Router, RegistryReport) {
    let mut report = RegistryReport::default();

    for entry in entries {
        let built = check_endpoint(entry.endpoint, &report.mounted).and_then(|_| (entry.register)(ctx));
        match built {
            Ok(routes) => {
                router = router.nest(entry.endpoint, routes);
                report.mounted.push(entry.endpoint);
                tracing::info!("[✅] API ENDPOINT:{} Registered", entry.endpoint);
            }
            Err(e) => {
                tracing::error!("[❌] Error occurred while registering API endpoint {}: {}", entry.endpoint, e);
                report.failed.push((entry.endpoint, e.to_string()));
            }
        }
    }

    (router, report)
}
