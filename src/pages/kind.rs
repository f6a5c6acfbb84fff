//! Which page a route renders.

/// A resource listing served by the inventory API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Ec2,
    Lambda,
    Inventory,
    CapacityReservations,
    Organizations,
    Rds,
    Vpcs,
    NetworkInterfaces,
    Subnets,
    IamUsers,
    IamRoles,
    IamAttachedPolicies,
    ReservedInstances,
    S3Buckets,
    Lightsail,
}

impl ResourceKind {
    /// Value of the `function` query parameter the backend dispatches on.
    pub fn entry_type(&self) -> &'static str {
        match self {
            ResourceKind::Ec2 => "ec2",
            ResourceKind::Lambda => "lambda",
            ResourceKind::Inventory => "all",
            ResourceKind::CapacityReservations => "odcr",
            ResourceKind::Organizations => "org",
            ResourceKind::Rds => "rds",
            ResourceKind::Vpcs => "vpc",
            ResourceKind::NetworkInterfaces => "network-interfaces",
            ResourceKind::Subnets => "subnet",
            ResourceKind::IamUsers => "iam-users",
            ResourceKind::IamRoles => "iam-roles",
            ResourceKind::IamAttachedPolicies => "iam-attached-policys",
            ResourceKind::ReservedInstances => "ri",
            ResourceKind::S3Buckets => "s3-buckets",
            ResourceKind::Lightsail => "lightsail",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Ec2 => "EC2 Instances",
            ResourceKind::Lambda => "Lambda Functions",
            ResourceKind::Inventory => "Inventory Table",
            ResourceKind::CapacityReservations => "Capacity Reservations",
            ResourceKind::Organizations => "Organizations",
            ResourceKind::Rds => "RDS Instances",
            ResourceKind::Vpcs => "VPCs",
            ResourceKind::NetworkInterfaces => "Network Interfaces",
            ResourceKind::Subnets => "Subnets",
            ResourceKind::IamUsers => "IAM Users",
            ResourceKind::IamRoles => "IAM Roles",
            ResourceKind::IamAttachedPolicies => "IAM Attached Policies",
            ResourceKind::ReservedInstances => "Reserved Instances",
            ResourceKind::S3Buckets => "S3 Buckets",
            ResourceKind::Lightsail => "Lightsail",
        }
    }
}

/// Page component a route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// Static welcome page.
    Home,
    /// Fetch-and-render table.
    Resource(ResourceKind),
    /// Triggers a backend inventory refresh.
    Refresh,
}

impl PageKind {
    pub fn title(&self) -> &'static str {
        match self {
            PageKind::Home => "Home",
            PageKind::Resource(kind) => kind.title(),
            PageKind::Refresh => "Refresh Inventory",
        }
    }

    /// Whether opening the page triggers an API call.
    pub fn fetches(&self) -> bool {
        !matches!(self, PageKind::Home)
    }

    /// The `function` query value, if the page calls the API.
    pub fn entry_type(&self) -> Option<&'static str> {
        match self {
            PageKind::Home => None,
            PageKind::Resource(kind) => Some(kind.entry_type()),
            PageKind::Refresh => Some("cron"),
        }
    }
}
