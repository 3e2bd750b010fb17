//! Resource kinds recognized in a template

use std::fmt;

/// Closed set of resource kinds; anything else is [`ResourceKind::Unknown`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Server,
    Port,
    Network,
    Subnet,
    Router,
    RouterInterface,
    FloatingIp,
    Unknown,
}

impl ResourceKind {
    /// The seven recognized kinds, in classifier/summary order
    pub const KNOWN: [ResourceKind; 7] = [
        ResourceKind::Server,
        ResourceKind::Port,
        ResourceKind::Network,
        ResourceKind::Subnet,
        ResourceKind::Router,
        ResourceKind::RouterInterface,
        ResourceKind::FloatingIp,
    ];

    /// Exact match on a resource `type` tag
    pub fn from_type_tag(tag: &str) -> Self {
        match tag {
            "OS::Nova::Server" => ResourceKind::Server,
            "OS::Neutron::Port" => ResourceKind::Port,
            "OS::Neutron::Net" => ResourceKind::Network,
            "OS::Neutron::Subnet" => ResourceKind::Subnet,
            "OS::Neutron::Router" => ResourceKind::Router,
            "OS::Neutron::RouterInterface" => ResourceKind::RouterInterface,
            "OS::Neutron::FloatingIP" => ResourceKind::FloatingIp,
            _ => ResourceKind::Unknown,
        }
    }

    pub fn type_tag(&self) -> Option<&'static str> {
        match self {
            ResourceKind::Server => Some("OS::Nova::Server"),
            ResourceKind::Port => Some("OS::Neutron::Port"),
            ResourceKind::Network => Some("OS::Neutron::Net"),
            ResourceKind::Subnet => Some("OS::Neutron::Subnet"),
            ResourceKind::Router => Some("OS::Neutron::Router"),
            ResourceKind::RouterInterface => Some("OS::Neutron::RouterInterface"),
            ResourceKind::FloatingIp => Some("OS::Neutron::FloatingIP"),
            ResourceKind::Unknown => None,
        }
    }

    /// Prefix of DOT node identifiers (`port3`, `routerInterface0`, ...)
    ///
    /// Servers are clusters, so their identifiers are `cluster_server<index>`.
    pub fn node_prefix(&self) -> &'static str {
        match self {
            ResourceKind::Server => "server",
            ResourceKind::Port => "port",
            ResourceKind::Network => "net",
            ResourceKind::Subnet => "subnet",
            ResourceKind::Router => "router",
            ResourceKind::RouterInterface => "routerInterface",
            ResourceKind::FloatingIp => "floating",
            ResourceKind::Unknown => "unknown",
        }
    }

    /// Prefix of the placeholder label used before a name is known
    pub fn placeholder_prefix(&self) -> &'static str {
        match self {
            ResourceKind::RouterInterface => "ri",
            ResourceKind::FloatingIp => "fip",
            other => other.node_prefix(),
        }
    }

    /// Plural heading used in the resource count summary
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Server => "Servers",
            ResourceKind::Port => "Ports",
            ResourceKind::Network => "Nets",
            ResourceKind::Subnet => "Subnets",
            ResourceKind::Router => "Routers",
            ResourceKind::RouterInterface => "RouterInterfaces",
            ResourceKind::FloatingIp => "FloatingIPs",
            ResourceKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_tag() {
            Some(tag) => write!(f, "{}", tag),
            None => write!(f, "unknown resource"),
        }
    }
}
