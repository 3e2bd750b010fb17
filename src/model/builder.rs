//! Node builders: validate each raw resource and turn it into a typed node
//!
//! Builders never fail. A missing field or unresolved reference marks the node
//! broken, is recorded on the node and in [`Diagnostics`], and building carries
//! on with the remaining fields and resources.

use crate::diagnostics::Diagnostics;
use crate::document::{RawResource, Value};

use super::classify::Classified;
use super::graph::Graph;
use super::label::{short_label, LabelRule, ShortLabel};
use super::nodes::*;
use super::resolve::{find_index_by_name, Reference};
use super::ResourceKind;

/// Validation state for the node currently being built
struct NodeCheck<'r, 'd> {
    kind: ResourceKind,
    /// Key the resource is declared under in `resources`
    resource: &'r str,
    base: NodeBase,
    diagnostics: &'d mut Diagnostics,
}

impl<'r, 'd> NodeCheck<'r, 'd> {
    fn new(
        kind: ResourceKind,
        resource: &RawResource<'r>,
        index: usize,
        diagnostics: &'d mut Diagnostics,
    ) -> Self {
        Self {
            kind,
            resource: resource.name,
            base: NodeBase::new(kind, index),
            diagnostics,
        }
    }

    /// Mark the node broken and record why
    fn fail(&mut self, message: String) {
        tracing::debug!(resource = self.resource, kind = %self.kind, "{}", message);
        self.base.broken = true;
        self.diagnostics.warn(self.kind, message.clone());
        self.base.issues.push(message);
    }

    fn properties<'a>(&mut self, resource: &RawResource<'a>) -> Option<&'a Value> {
        let props = resource.properties();
        if props.is_none() {
            self.fail(format!("missing properties in {} object", self.kind));
        }
        props
    }

    fn field<'a>(&mut self, holder: &'a Value, field: &str, location: &str) -> Option<&'a Value> {
        let value = holder.get(field);
        if value.is_none() {
            self.fail(format!("missing {} in {}{} object", field, location, self.kind));
        }
        value
    }

    /// A required scalar; only its presence is checked. A present `null` is kept as `None`.
    fn scalar(&mut self, props: &Value, field: &str) -> Option<String> {
        match self.field(props, field, "")? {
            Value::Null => None,
            Value::Text(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    fn text<'a>(&mut self, props: &'a Value, field: &str) -> Option<&'a str> {
        let value = self.field(props, field, "")?;
        let text = value.as_str();
        if text.is_none() {
            self.fail(format!(
                "{} in {} object is {}, expected text",
                field,
                self.kind,
                value.shape_name()
            ));
        }
        text
    }

    /// Consume the `name` property into both labels
    fn name(&mut self, props: &Value) {
        let Some(name) = self.text(props, "name") else {
            return;
        };
        self.base.long_label = name.to_string();
        self.base.short_label = match short_label(LabelRule::for_kind(self.kind), name) {
            ShortLabel::Cut(label) => label,
            ShortLabel::FullName(label) => {
                self.diagnostics.warn(
                    self.kind,
                    format!(
                        "Name of {} object unexpected, using full name instead: {}",
                        self.kind, name
                    ),
                );
                label
            }
        };
    }

    /// Resolve `holder.<field>.get_resource` against the `target` bucket.
    fn reference(
        &mut self,
        holder: &Value,
        field: &str,
        location: &str,
        target: ResourceKind,
        bucket: &[RawResource<'_>],
    ) -> Reference {
        let Some(link) = self.field(holder, field, location) else {
            return Reference::Unresolved;
        };
        let Some(raw) = link.get("get_resource") else {
            self.fail(format!(
                "missing get_resource in {} in {}{} object",
                field, location, self.kind
            ));
            return Reference::Unresolved;
        };
        let Some(name) = raw.as_str() else {
            self.fail(format!(
                "get_resource in {} in {}{} object is {}, expected text",
                field,
                location,
                self.kind,
                raw.shape_name()
            ));
            return Reference::Unresolved;
        };

        let resolved = find_index_by_name(bucket, name);
        if !resolved.is_resolved() {
            self.fail(format!(
                "{} {} for {} object {} not found",
                target_title(target),
                name,
                self.kind,
                self.base.short_label
            ));
        }
        resolved
    }

    fn finish(self) -> NodeBase {
        self.base
    }
}

fn target_title(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Server => "Server",
        ResourceKind::Port => "Port",
        ResourceKind::Network => "Net",
        ResourceKind::Subnet => "Subnet",
        ResourceKind::Router => "Router",
        ResourceKind::RouterInterface => "RouterInterface",
        ResourceKind::FloatingIp => "FloatingIP",
        ResourceKind::Unknown => "Resource",
    }
}

pub fn build_server(
    resource: &RawResource<'_>,
    index: usize,
    ports: &[RawResource<'_>],
    diagnostics: &mut Diagnostics,
) -> ServerNode {
    let mut check = NodeCheck::new(ResourceKind::Server, resource, index, diagnostics);
    let mut port_refs = Vec::new();

    if let Some(props) = check.properties(resource) {
        check.name(props);
        if let Some(networks) = check.field(props, "networks", "") {
            match networks.as_list() {
                Some(entries) => {
                    for entry in entries {
                        port_refs.push(check.reference(
                            entry,
                            "port",
                            "networks in ",
                            ResourceKind::Port,
                            ports,
                        ));
                    }
                }
                None => check.fail(format!(
                    "networks in {} object is {}, expected list",
                    ResourceKind::Server,
                    networks.shape_name()
                )),
            }
        }
    }

    ServerNode {
        base: check.finish(),
        ports: port_refs,
    }
}

pub fn build_port(
    resource: &RawResource<'_>,
    index: usize,
    networks: &[RawResource<'_>],
    diagnostics: &mut Diagnostics,
) -> PortNode {
    let mut check = NodeCheck::new(ResourceKind::Port, resource, index, diagnostics);
    let mut network = Reference::Unresolved;

    if let Some(props) = check.properties(resource) {
        check.name(props);
        network = check.reference(props, "network", "", ResourceKind::Network, networks);
    }

    PortNode {
        base: check.finish(),
        network,
    }
}

pub fn build_network(
    resource: &RawResource<'_>,
    index: usize,
    diagnostics: &mut Diagnostics,
) -> NetworkNode {
    let mut check = NodeCheck::new(ResourceKind::Network, resource, index, diagnostics);
    if let Some(props) = check.properties(resource) {
        check.name(props);
    }
    NetworkNode {
        base: check.finish(),
    }
}

pub fn build_subnet(
    resource: &RawResource<'_>,
    index: usize,
    networks: &[RawResource<'_>],
    diagnostics: &mut Diagnostics,
) -> SubnetNode {
    let mut check = NodeCheck::new(ResourceKind::Subnet, resource, index, diagnostics);
    let mut network = Reference::Unresolved;
    let mut cidr = None;
    let mut gateway_ip = None;

    if let Some(props) = check.properties(resource) {
        check.name(props);
        cidr = check.scalar(props, "cidr");
        gateway_ip = check.scalar(props, "gateway_ip");
        network = check.reference(props, "network", "", ResourceKind::Network, networks);
    }

    SubnetNode {
        base: check.finish(),
        network,
        cidr,
        gateway_ip,
    }
}

pub fn build_router(
    resource: &RawResource<'_>,
    index: usize,
    diagnostics: &mut Diagnostics,
) -> RouterNode {
    let mut check = NodeCheck::new(ResourceKind::Router, resource, index, diagnostics);
    if let Some(props) = check.properties(resource) {
        check.name(props);
    }
    RouterNode {
        base: check.finish(),
    }
}

pub fn build_router_interface(
    resource: &RawResource<'_>,
    index: usize,
    routers: &[RawResource<'_>],
    subnets: &[RawResource<'_>],
    diagnostics: &mut Diagnostics,
) -> RouterInterfaceNode {
    let mut check = NodeCheck::new(ResourceKind::RouterInterface, resource, index, diagnostics);
    let mut router = Reference::Unresolved;
    let mut subnet = Reference::Unresolved;

    if let Some(props) = check.properties(resource) {
        router = check.reference(props, "router", "", ResourceKind::Router, routers);
        subnet = check.reference(props, "subnet", "", ResourceKind::Subnet, subnets);
    }

    RouterInterfaceNode {
        base: check.finish(),
        router,
        subnet,
    }
}

pub fn build_floating_ip(
    resource: &RawResource<'_>,
    index: usize,
    ports: &[RawResource<'_>],
    diagnostics: &mut Diagnostics,
) -> FloatingIpNode {
    let mut check = NodeCheck::new(ResourceKind::FloatingIp, resource, index, diagnostics);
    let mut port = Reference::Unresolved;

    if let Some(props) = check.properties(resource) {
        port = check.reference(props, "port_id", "", ResourceKind::Port, ports);
    }

    FloatingIpNode {
        base: check.finish(),
        port,
    }
}

/// Build every node, referenced kinds before the kinds that reference them.
pub fn build_graph(classified: &Classified<'_>, diagnostics: &mut Diagnostics) -> Graph {
    let networks = classified
        .networks
        .iter()
        .enumerate()
        .map(|(i, r)| build_network(r, i, diagnostics))
        .collect();
    let routers = classified
        .routers
        .iter()
        .enumerate()
        .map(|(i, r)| build_router(r, i, diagnostics))
        .collect();
    let ports = classified
        .ports
        .iter()
        .enumerate()
        .map(|(i, r)| build_port(r, i, &classified.networks, diagnostics))
        .collect();
    let subnets = classified
        .subnets
        .iter()
        .enumerate()
        .map(|(i, r)| build_subnet(r, i, &classified.networks, diagnostics))
        .collect();
    let servers = classified
        .servers
        .iter()
        .enumerate()
        .map(|(i, r)| build_server(r, i, &classified.ports, diagnostics))
        .collect();
    let router_interfaces = classified
        .router_interfaces
        .iter()
        .enumerate()
        .map(|(i, r)| {
            build_router_interface(r, i, &classified.routers, &classified.subnets, diagnostics)
        })
        .collect();
    let floating_ips = classified
        .floating_ips
        .iter()
        .enumerate()
        .map(|(i, r)| build_floating_ip(r, i, &classified.ports, diagnostics))
        .collect();

    Graph::new(
        servers,
        ports,
        networks,
        subnets,
        routers,
        router_interfaces,
        floating_ips,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{parse_document, Mapping};
    use crate::model::classify::classify;

    fn resources(yaml: &str) -> Value {
        let (doc, _) = parse_document(yaml, None).unwrap();
        doc.get("resources").cloned().unwrap()
    }

    fn bucket<'a>(resources: &'a Mapping) -> Vec<RawResource<'a>> {
        resources.iter().map(|(k, v)| RawResource::new(k, v)).collect()
    }

    #[test]
    fn test_port_resolves_network() {
        let nets = resources(
            r#"
resources:
  n0: {type: OS::Neutron::Net, properties: {name: "other:x"}}
  n1: {type: OS::Neutron::Net, properties: {name: "net-a:x"}}
"#,
        );
        let port = resources(
            r#"
resources:
  p: {type: OS::Neutron::Port, properties: {name: "a:b:c:d", network: {get_resource: "net-a:x"}}}
"#,
        );
        let nets = bucket(nets.as_map().unwrap());
        let ports = bucket(port.as_map().unwrap());
        let mut diags = Diagnostics::new();
        let node = build_port(&ports[0], 0, &nets, &mut diags);
        assert_eq!(node.network, Reference::Resolved(1));
        assert_eq!(node.base.long_label, "a:b:c:d");
        assert_eq!(node.base.short_label, "a:b:c");
        assert!(!node.base.broken);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_port_missing_network_is_broken() {
        let port = resources(
            r#"
resources:
  p: {type: OS::Neutron::Port, properties: {name: "a:b:c"}}
"#,
        );
        let ports = bucket(port.as_map().unwrap());
        let mut diags = Diagnostics::new();
        let node = build_port(&ports[0], 0, &[], &mut diags);
        assert!(node.base.broken);
        assert_eq!(node.network, Reference::Unresolved);
        assert_eq!(
            node.base.issues,
            vec!["missing network in OS::Neutron::Port object".to_string()]
        );
        assert_eq!(diags.warnings().count(), 1);
    }

    #[test]
    fn test_missing_get_resource() {
        let port = resources(
            r#"
resources:
  p: {type: OS::Neutron::Port, properties: {name: "a:b:c", network: {name: "n"}}}
"#,
        );
        let ports = bucket(port.as_map().unwrap());
        let mut diags = Diagnostics::new();
        let node = build_port(&ports[0], 0, &[], &mut diags);
        assert!(node.base.broken);
        assert_eq!(
            node.base.issues,
            vec!["missing get_resource in network in OS::Neutron::Port object".to_string()]
        );
    }

    #[test]
    fn test_missing_properties_keeps_placeholders() {
        let body = Value::Map(
            vec![("type", Value::from("OS::Neutron::Subnet"))]
                .into_iter()
                .collect(),
        );
        let res = RawResource::new("s", &body);
        let mut diags = Diagnostics::new();
        let node = build_subnet(&res, 2, &[], &mut diags);
        assert!(node.base.broken);
        assert_eq!(node.base.long_label, "subnet2");
        assert_eq!(node.base.short_label, "subnet2");
        assert_eq!(node.cidr, None);
        assert_eq!(
            node.base.issues,
            vec!["missing properties in OS::Neutron::Subnet object".to_string()]
        );
    }

    #[test]
    fn test_subnet_reports_every_missing_field() {
        let subnet = resources(
            r#"
resources:
  s: {type: OS::Neutron::Subnet, properties: {name: "sub"}}
"#,
        );
        let subnets = bucket(subnet.as_map().unwrap());
        let mut diags = Diagnostics::new();
        let node = build_subnet(&subnets[0], 0, &[], &mut diags);
        assert!(node.base.broken);
        assert_eq!(
            node.base.issues,
            vec![
                "missing cidr in OS::Neutron::Subnet object".to_string(),
                "missing gateway_ip in OS::Neutron::Subnet object".to_string(),
                "missing network in OS::Neutron::Subnet object".to_string(),
            ]
        );
        // short-name fallback is advisory only
        assert_eq!(diags.warnings().count(), 4);
        assert_eq!(node.base.short_label, "sub");
    }

    #[test]
    fn test_subnet_null_gateway_is_healthy() {
        let doc = resources(
            r#"
resources:
  n: {type: OS::Neutron::Net, properties: {name: "lan:x"}}
  s: {type: OS::Neutron::Subnet, properties: {name: "sub:x", cidr: 10.0.0.0/24, gateway_ip: null, network: {get_resource: "lan:x"}}}
"#,
        );
        let c = classify(doc.as_map().unwrap());
        let mut diags = Diagnostics::new();
        let node = build_subnet(&c.subnets[0], 0, &c.networks, &mut diags);
        assert!(!node.base.broken);
        assert!(node.base.issues.is_empty());
        assert_eq!(node.cidr.as_deref(), Some("10.0.0.0/24"));
        assert_eq!(node.gateway_ip, None);
        assert_eq!(node.network, Reference::Resolved(0));
    }

    #[test]
    fn test_non_text_get_resource_is_wrong_shape() {
        let port = resources(
            r#"
resources:
  p: {type: OS::Neutron::Port, properties: {name: "a:b:c", network: {get_resource: [n]}}}
"#,
        );
        let ports = bucket(port.as_map().unwrap());
        let mut diags = Diagnostics::new();
        let node = build_port(&ports[0], 0, &[], &mut diags);
        assert!(node.base.broken);
        assert_eq!(node.network, Reference::Unresolved);
        assert_eq!(
            node.base.issues,
            vec!["get_resource in network in OS::Neutron::Port object is list, expected text"
                .to_string()]
        );
    }

    #[test]
    fn test_router_interface_missing_subnet() {
        let doc = resources(
            r#"
resources:
  r: {type: OS::Neutron::Router, properties: {name: "r:1"}}
  ri: {type: OS::Neutron::RouterInterface, properties: {router: {get_resource: "r:1"}}}
"#,
        );
        let c = classify(doc.as_map().unwrap());
        let mut diags = Diagnostics::new();
        let ri = build_router_interface(
            &c.router_interfaces[0],
            0,
            &c.routers,
            &c.subnets,
            &mut diags,
        );
        assert!(ri.base.broken);
        assert_eq!(ri.router, Reference::Resolved(0));
        assert_eq!(ri.subnet, Reference::Unresolved);
        assert_eq!(
            ri.base.issues,
            vec!["missing subnet in OS::Neutron::RouterInterface object".to_string()]
        );
    }

    #[test]
    fn test_router_interface_unknown_subnet() {
        let doc = resources(
            r#"
resources:
  r: {type: OS::Neutron::Router, properties: {name: "r:1"}}
  ri: {type: OS::Neutron::RouterInterface, properties: {router: {get_resource: "r:1"}, subnet: {get_resource: gone}}}
"#,
        );
        let c = classify(doc.as_map().unwrap());
        let mut diags = Diagnostics::new();
        let ri = build_router_interface(
            &c.router_interfaces[0],
            0,
            &c.routers,
            &c.subnets,
            &mut diags,
        );
        assert!(ri.base.broken);
        assert_eq!(ri.subnet, Reference::Unresolved);
        assert_eq!(
            ri.base.issues,
            vec!["Subnet gone for OS::Neutron::RouterInterface object ri0 not found".to_string()]
        );
    }

    #[test]
    fn test_floating_ip_port_without_get_resource() {
        let doc = resources(
            r#"
resources:
  fip: {type: OS::Neutron::FloatingIP, properties: {port_id: "p:1:x"}}
"#,
        );
        let c = classify(doc.as_map().unwrap());
        let mut diags = Diagnostics::new();
        let fip = build_floating_ip(&c.floating_ips[0], 0, &c.ports, &mut diags);
        assert!(fip.base.broken);
        assert_eq!(fip.port, Reference::Unresolved);
        assert_eq!(
            fip.base.issues,
            vec!["missing get_resource in port_id in OS::Neutron::FloatingIP object".to_string()]
        );
        assert_eq!(diags.warnings().count(), 1);
    }

    #[test]
    fn test_non_text_name_is_wrong_shape() {
        let net = resources(
            r#"
resources:
  n: {type: OS::Neutron::Net, properties: {name: [a, b]}}
"#,
        );
        let nets = bucket(net.as_map().unwrap());
        let mut diags = Diagnostics::new();
        let node = build_network(&nets[0], 0, &mut diags);
        assert!(node.base.broken);
        assert_eq!(node.base.long_label, "net0");
        assert_eq!(
            node.base.issues,
            vec!["name in OS::Neutron::Net object is list, expected text".to_string()]
        );
    }

    #[test]
    fn test_server_keeps_slot_per_network_entry() {
        let doc = resources(
            r#"
resources:
  p0: {type: OS::Neutron::Port, properties: {name: "p0:x:y"}}
  p1: {type: OS::Neutron::Port, properties: {name: "p1:x:y"}}
  s:
    type: OS::Nova::Server
    properties:
      name: "web:01"
      networks:
        - port: {get_resource: "p1:x:y"}
        - fixed_ip: 10.0.0.5
        - port: {get_resource: "nope"}
        - port: {get_resource: "p0:x:y"}
"#,
        );
        let c = classify(doc.as_map().unwrap());
        let mut diags = Diagnostics::new();
        let node = build_server(&c.servers[0], 0, &c.ports, &mut diags);
        assert!(node.base.broken);
        assert_eq!(node.base.short_label, "web");
        assert_eq!(
            node.ports,
            vec![
                Reference::Resolved(1),
                Reference::Unresolved,
                Reference::Unresolved,
                Reference::Resolved(0),
            ]
        );
        assert_eq!(
            node.base.issues,
            vec![
                "missing port in networks in OS::Nova::Server object".to_string(),
                "Port nope for OS::Nova::Server object web not found".to_string(),
            ]
        );
    }

    #[test]
    fn test_server_networks_not_a_list() {
        let doc = resources(
            r#"
resources:
  s: {type: OS::Nova::Server, properties: {name: "web", networks: {port: x}}}
"#,
        );
        let c = classify(doc.as_map().unwrap());
        let mut diags = Diagnostics::new();
        let node = build_server(&c.servers[0], 0, &c.ports, &mut diags);
        assert!(node.base.broken);
        assert!(node.ports.is_empty());
        assert_eq!(
            node.base.issues,
            vec!["networks in OS::Nova::Server object is mapping, expected list".to_string()]
        );
    }

    #[test]
    fn test_router_interface_and_floating_ip_labels_are_synthetic() {
        let doc = resources(
            r#"
resources:
  r: {type: OS::Neutron::Router, properties: {name: "r:1"}}
  s: {type: OS::Neutron::Subnet, properties: {name: "s:1", cidr: 10.0.0.0/24, gateway_ip: 10.0.0.1, network: {get_resource: n}}}
  ri: {type: OS::Neutron::RouterInterface, properties: {name: ignored, router: {get_resource: "r:1"}, subnet: {get_resource: "s:1"}}}
  fip: {type: OS::Neutron::FloatingIP, properties: {port_id: {get_resource: missing}}}
"#,
        );
        let c = classify(doc.as_map().unwrap());
        let mut diags = Diagnostics::new();
        let ri = build_router_interface(
            &c.router_interfaces[0],
            0,
            &c.routers,
            &c.subnets,
            &mut diags,
        );
        assert_eq!(ri.base.short_label, "ri0");
        assert_eq!(ri.router, Reference::Resolved(0));
        assert_eq!(ri.subnet, Reference::Resolved(0));
        assert!(!ri.base.broken);

        let fip = build_floating_ip(&c.floating_ips[0], 0, &c.ports, &mut diags);
        assert_eq!(fip.base.short_label, "fip0");
        assert!(fip.base.broken);
        assert_eq!(
            fip.base.issues,
            vec!["Port missing for OS::Neutron::FloatingIP object fip0 not found".to_string()]
        );
    }

    #[test]
    fn test_build_graph_indices_follow_bucket_order() {
        let doc = resources(
            r#"
resources:
  a: {type: OS::Neutron::Net, properties: {name: "a:1"}}
  p: {type: OS::Neutron::Port, properties: {name: "p:1:x", network: {get_resource: "b:1"}}}
  b: {type: OS::Neutron::Net, properties: {name: "b:1"}}
"#,
        );
        let c = classify(doc.as_map().unwrap());
        let mut diags = Diagnostics::new();
        let graph = build_graph(&c, &mut diags);
        let labels: Vec<(usize, &str)> = graph
            .networks()
            .iter()
            .map(|n| (n.base.index, n.base.long_label.as_str()))
            .collect();
        assert_eq!(labels, vec![(0, "a:1"), (1, "b:1")]);
        assert_eq!(graph.ports()[0].network, Reference::Resolved(1));
    }
}
