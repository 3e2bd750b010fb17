//! Typed graph nodes, one struct per resource kind

use super::label::placeholder;
use super::{Reference, ResourceKind};

/// Fields shared by every node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBase {
    /// Position within the node's kind, in declaration order
    pub index: usize,
    pub long_label: String,
    pub short_label: String,
    pub broken: bool,
    /// Problems that made the node broken
    pub issues: Vec<String>,
}

impl NodeBase {
    pub fn new(kind: ResourceKind, index: usize) -> Self {
        let label = placeholder(kind, index);
        Self {
            index,
            long_label: label.clone(),
            short_label: label,
            broken: false,
            issues: Vec::new(),
        }
    }
}

/// Common access to the shared node fields
pub trait Node {
    const KIND: ResourceKind;

    fn base(&self) -> &NodeBase;

    fn index(&self) -> usize {
        self.base().index
    }

    fn short_label(&self) -> &str {
        &self.base().short_label
    }

    fn is_broken(&self) -> bool {
        self.base().broken
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerNode {
    pub base: NodeBase,
    /// One slot per entry of the server's `networks` list
    pub ports: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortNode {
    pub base: NodeBase,
    pub network: Reference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkNode {
    pub base: NodeBase,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubnetNode {
    pub base: NodeBase,
    pub network: Reference,
    pub cidr: Option<String>,
    pub gateway_ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouterNode {
    pub base: NodeBase,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouterInterfaceNode {
    pub base: NodeBase,
    pub router: Reference,
    pub subnet: Reference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingIpNode {
    pub base: NodeBase,
    pub port: Reference,
}

macro_rules! impl_node {
    ($($ty:ty => $kind:expr),* $(,)?) => {
        $(
            impl Node for $ty {
                const KIND: ResourceKind = $kind;

                fn base(&self) -> &NodeBase {
                    &self.base
                }
            }
        )*
    };
}

impl_node! {
    ServerNode => ResourceKind::Server,
    PortNode => ResourceKind::Port,
    NetworkNode => ResourceKind::Network,
    SubnetNode => ResourceKind::Subnet,
    RouterNode => ResourceKind::Router,
    RouterInterfaceNode => ResourceKind::RouterInterface,
    FloatingIpNode => ResourceKind::FloatingIp,
}
