//! Route table and path matching.

use crate::error::RouteNotFound;
use crate::pages::{PageKind, ResourceKind};

/// One entry of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub label: &'static str,
    pub page: PageKind,
}

impl Route {
    const fn new(path: &'static str, label: &'static str, page: PageKind) -> Self {
        Self { path, label, page }
    }

    /// `/` matches only itself; other patterns match themselves and anything
    /// below them on a segment boundary. Case-sensitive.
    pub fn matches(&self, path: &str) -> bool {
        if self.path == "/" {
            return path == "/";
        }
        match path.strip_prefix(self.path) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// The dashboard routes, in match order.
pub const ROUTES: &[Route] = &[
    Route::new("/", "Home", PageKind::Home),
    Route::new("/allec2", "EC2", PageKind::Resource(ResourceKind::Ec2)),
    Route::new("/alllambda", "Lambda", PageKind::Resource(ResourceKind::Lambda)),
    Route::new("/Table", "Table", PageKind::Resource(ResourceKind::Inventory)),
    Route::new("/allodcr", "ODCR", PageKind::Resource(ResourceKind::CapacityReservations)),
    Route::new("/organizations", "Organizations", PageKind::Resource(ResourceKind::Organizations)),
    Route::new("/allrds", "RDS", PageKind::Resource(ResourceKind::Rds)),
    Route::new("/allvpcs", "VPCs", PageKind::Resource(ResourceKind::Vpcs)),
    Route::new(
        "/allnetworkinterfaces",
        "Network Interfaces",
        PageKind::Resource(ResourceKind::NetworkInterfaces),
    ),
    Route::new("/allsubnets", "Subnets", PageKind::Resource(ResourceKind::Subnets)),
    Route::new("/refresh", "Refresh", PageKind::Refresh),
    Route::new("/allusers", "IAM Users", PageKind::Resource(ResourceKind::IamUsers)),
    Route::new("/allroles", "IAM Roles", PageKind::Resource(ResourceKind::IamRoles)),
    Route::new(
        "/allattachedpolicys",
        "Attached Policies",
        PageKind::Resource(ResourceKind::IamAttachedPolicies),
    ),
    Route::new("/allris", "Reserved Instances", PageKind::Resource(ResourceKind::ReservedInstances)),
    Route::new("/alls3", "S3", PageKind::Resource(ResourceKind::S3Buckets)),
    Route::new("/alllightsail", "Lightsail", PageKind::Resource(ResourceKind::Lightsail)),
];

/// Ordered, immutable list of routes.
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    routes: &'static [Route],
}

impl Default for RouteTable {
    fn default() -> Self {
        Self { routes: ROUTES }
    }
}

impl RouteTable {
    pub fn new(routes: &'static [Route]) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &'static [Route] {
        self.routes
    }

    /// First route matching `path`.
    pub fn resolve(&self, path: &str) -> Result<&'static Route, RouteNotFound> {
        let path = normalize_path(path);
        self.routes
            .iter()
            .find(|route| route.matches(&path))
            .ok_or(RouteNotFound { path })
    }

    /// Position of the route matching `path`, for sidebar highlighting.
    pub fn index_of(&self, path: &str) -> Option<usize> {
        let path = normalize_path(path);
        self.routes.iter().position(|route| route.matches(&path))
    }
}

/// Add a leading `/`, drop any query string or fragment.
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
