//! The assembled node graph handed from building to emission

use super::nodes::*;
use super::{Reference, ResourceKind};

/// Kind-qualified node identity; indices are only unique within a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub kind: ResourceKind,
    pub index: usize,
}

impl NodeId {
    pub fn new(kind: ResourceKind, index: usize) -> Self {
        Self { kind, index }
    }
}

/// A resolved reference between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

/// All nodes of one template, per kind in declaration order
#[derive(Debug, Clone, Default)]
pub struct Graph {
    servers: Vec<ServerNode>,
    ports: Vec<PortNode>,
    networks: Vec<NetworkNode>,
    subnets: Vec<SubnetNode>,
    routers: Vec<RouterNode>,
    router_interfaces: Vec<RouterInterfaceNode>,
    floating_ips: Vec<FloatingIpNode>,
}

impl Graph {
    pub fn new(
        servers: Vec<ServerNode>,
        ports: Vec<PortNode>,
        networks: Vec<NetworkNode>,
        subnets: Vec<SubnetNode>,
        routers: Vec<RouterNode>,
        router_interfaces: Vec<RouterInterfaceNode>,
        floating_ips: Vec<FloatingIpNode>,
    ) -> Self {
        Self {
            servers,
            ports,
            networks,
            subnets,
            routers,
            router_interfaces,
            floating_ips,
        }
    }

    pub fn servers(&self) -> &[ServerNode] {
        &self.servers
    }

    pub fn ports(&self) -> &[PortNode] {
        &self.ports
    }

    pub fn networks(&self) -> &[NetworkNode] {
        &self.networks
    }

    pub fn subnets(&self) -> &[SubnetNode] {
        &self.subnets
    }

    pub fn routers(&self) -> &[RouterNode] {
        &self.routers
    }

    pub fn router_interfaces(&self) -> &[RouterInterfaceNode] {
        &self.router_interfaces
    }

    pub fn floating_ips(&self) -> &[FloatingIpNode] {
        &self.floating_ips
    }

    /// Total number of nodes across all kinds
    pub fn node_count(&self) -> usize {
        self.servers.len()
            + self.ports.len()
            + self.networks.len()
            + self.subnets.len()
            + self.routers.len()
            + self.router_interfaces.len()
            + self.floating_ips.len()
    }

    /// Number of nodes marked broken
    pub fn broken_count(&self) -> usize {
        fn broken<N: Node>(nodes: &[N]) -> usize {
            nodes.iter().filter(|n| n.is_broken()).count()
        }
        broken(&self.servers)
            + broken(&self.ports)
            + broken(&self.networks)
            + broken(&self.subnets)
            + broken(&self.routers)
            + broken(&self.router_interfaces)
            + broken(&self.floating_ips)
    }

    /// Every resolved reference, broken nodes included.
    ///
    /// Order: server→port, port→network, subnet→network,
    /// router interface→subnet, router interface→router, floating IP→port.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        let mut push = |source: NodeId, target_kind: ResourceKind, reference: &Reference| {
            if let Reference::Resolved(index) = reference {
                edges.push(Edge {
                    source,
                    target: NodeId::new(target_kind, *index),
                });
            }
        };

        for server in &self.servers {
            let source = NodeId::new(ResourceKind::Server, server.index());
            for port in &server.ports {
                push(source, ResourceKind::Port, port);
            }
        }
        for port in &self.ports {
            let source = NodeId::new(ResourceKind::Port, port.index());
            push(source, ResourceKind::Network, &port.network);
        }
        for subnet in &self.subnets {
            let source = NodeId::new(ResourceKind::Subnet, subnet.index());
            push(source, ResourceKind::Network, &subnet.network);
        }
        for ri in &self.router_interfaces {
            let source = NodeId::new(ResourceKind::RouterInterface, ri.index());
            push(source, ResourceKind::Subnet, &ri.subnet);
            push(source, ResourceKind::Router, &ri.router);
        }
        for fip in &self.floating_ips {
            let source = NodeId::new(ResourceKind::FloatingIp, fip.index());
            push(source, ResourceKind::Port, &fip.port);
        }
        edges
    }

    /// Owning server per port index: the first server (in order) with a slot
    /// resolving to that port.
    pub fn port_owners(&self) -> Vec<Option<usize>> {
        let mut owners = vec![None; self.ports.len()];
        for server in &self.servers {
            for slot in &server.ports {
                if let Some(owner) = slot.index().and_then(|i| owners.get_mut(i)) {
                    if owner.is_none() {
                        *owner = Some(server.index());
                    }
                }
            }
        }
        owners
    }
}
