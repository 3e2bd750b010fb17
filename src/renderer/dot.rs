//! DOT generation from a built graph
//!
//! Output is deterministic: kinds in a fixed order, nodes in index order within
//! each kind, edges in a fixed relation order, then the legend.

use crate::model::{Graph, Node, Reference, ResourceKind};
use crate::stylesheet::Stylesheet;

use super::DotConfig;

/// Build DOT statements incrementally
pub struct DotBuilder<'s> {
    config: DotConfig,
    stylesheet: &'s Stylesheet,
    lines: Vec<String>,
    indent: usize,
}

impl<'s> DotBuilder<'s> {
    pub fn new(config: DotConfig, stylesheet: &'s Stylesheet) -> Self {
        Self {
            config,
            stylesheet,
            lines: vec![],
            indent: 0,
        }
    }

    fn push(&mut self, line: String) {
        let indent = if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        };
        self.lines.push(format!("{}{}", indent, line));
    }

    /// Open a block such as `graph heat {` or `subgraph cluster_x {`
    pub fn open(&mut self, header: &str) {
        self.push(format!("{} {{", header));
        self.indent += 1;
    }

    pub fn close(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.push("}".to_string());
    }

    pub fn attribute(&mut self, key: &str, value: &str) {
        self.push(format!("{}={};", key, value));
    }

    /// Open a filled cluster with a quoted label
    pub fn open_cluster(&mut self, id: &str, label: &str, fill: Option<&str>) {
        self.open(&format!("subgraph {}", id));
        self.attribute("label", &quote(label));
        if let Some(fill) = fill {
            self.attribute("fillcolor", &dot_id(fill));
            self.attribute("style", "filled");
        }
    }

    /// A node statement for a node of `kind`
    pub fn node(&mut self, id: &str, kind: ResourceKind, broken: bool, label: &str) {
        let style = self.stylesheet.node_style(kind, broken);
        let mut attrs = Vec::new();
        if let Some(shape) = style.shape {
            attrs.push(format!("shape={}", dot_id(&shape)));
        }
        if let Some(fill) = style.fill {
            attrs.push("style=filled".to_string());
            attrs.push(format!("fillcolor={}", dot_id(&fill)));
        }
        attrs.push(format!("label={}", quote(label)));
        self.push(format!("{} [{}];", id, attrs.join(",")));
    }

    pub fn graph_node<N: Node>(&mut self, node: &N) {
        self.node(
            &node_id(N::KIND, node.index()),
            N::KIND,
            node.is_broken(),
            node.short_label(),
        );
    }

    /// An edge from `source` to the node of `kind` behind `reference`.
    ///
    /// Unresolved references point at the `<prefix>Unresolved` sentinel.
    pub fn edge(&mut self, source: &str, kind: ResourceKind, reference: Reference) {
        match reference {
            Reference::Resolved(index) => {
                self.push(format!("{} -- {};", source, node_id(kind, index)));
            }
            Reference::Unresolved => {
                let attrs = self.unresolved_attrs();
                self.push(format!("{} -- {} {};", source, unresolved_id(kind), attrs));
            }
        }
    }

    /// Like [`DotBuilder::edge`], with the referenced node written first
    pub fn edge_reversed(&mut self, kind: ResourceKind, reference: Reference, target: &str) {
        match reference {
            Reference::Resolved(index) => {
                self.push(format!("{} -- {};", node_id(kind, index), target));
            }
            Reference::Unresolved => {
                let attrs = self.unresolved_attrs();
                self.push(format!("{} -- {} {};", unresolved_id(kind), target, attrs));
            }
        }
    }

    fn unresolved_attrs(&self) -> String {
        format!(
            "[style=dashed,color={}]",
            dot_id(&self.stylesheet.unresolved_color())
        )
    }

    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// DOT identifier of a node: node prefix followed by the index
pub fn node_id(kind: ResourceKind, index: usize) -> String {
    format!("{}{}", kind.node_prefix(), index)
}

/// Sentinel identifier standing in for an unresolved target of `kind`
pub fn unresolved_id(kind: ResourceKind) -> String {
    format!("{}Unresolved", kind.node_prefix())
}

/// Attribute value as a bare DOT identifier when possible, quoted otherwise
fn dot_id(value: &str) -> String {
    let bare = value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if bare {
        value.to_string()
    } else {
        quote(value)
    }
}

/// Quote a label as a DOT string
fn quote(label: &str) -> String {
    let escaped = label.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// Render a built graph as a DOT `graph` block
pub fn render_dot(graph: &Graph, config: &DotConfig, stylesheet: &Stylesheet) -> String {
    let mut dot = DotBuilder::new(config.clone(), stylesheet);
    dot.open(&format!("graph {}", dot_id(&config.graph_name)));

    let owners = graph.port_owners();
    write_servers(&mut dot, graph, &owners);
    for port in graph.ports() {
        if owners.get(port.index()).copied().flatten().is_none() {
            dot.graph_node(port);
        }
    }
    for net in graph.networks() {
        dot.graph_node(net);
    }
    for subnet in graph.subnets() {
        dot.graph_node(subnet);
    }
    for router in graph.routers() {
        dot.graph_node(router);
    }
    for ri in graph.router_interfaces() {
        dot.graph_node(ri);
    }
    for fip in graph.floating_ips() {
        dot.graph_node(fip);
    }

    write_edges(&mut dot, graph);

    if config.legend {
        write_legend(&mut dot);
    }

    dot.close();
    dot.finish()
}

/// One cluster per server holding the ports it owns
fn write_servers(dot: &mut DotBuilder<'_>, graph: &Graph, owners: &[Option<usize>]) {
    for server in graph.servers() {
        let fill = if server.is_broken() {
            Some(dot.stylesheet.broken_fill())
        } else {
            dot.stylesheet.fill(ResourceKind::Server)
        };
        dot.open_cluster(
            &format!("cluster_{}", node_id(ResourceKind::Server, server.index())),
            server.short_label(),
            fill.as_deref(),
        );
        for slot in &server.ports {
            let Some(index) = slot.index() else {
                continue;
            };
            if owners.get(index).copied().flatten() != Some(server.index()) {
                continue;
            }
            if let Some(port) = graph.ports().get(index) {
                dot.graph_node(port);
            }
        }
        dot.close();
    }
}

fn write_edges(dot: &mut DotBuilder<'_>, graph: &Graph) {
    for port in graph.ports() {
        dot.edge(
            &node_id(ResourceKind::Port, port.index()),
            ResourceKind::Network,
            port.network,
        );
    }
    for subnet in graph.subnets() {
        dot.edge(
            &node_id(ResourceKind::Subnet, subnet.index()),
            ResourceKind::Network,
            subnet.network,
        );
    }
    for ri in graph.router_interfaces() {
        let id = node_id(ResourceKind::RouterInterface, ri.index());
        dot.edge_reversed(ResourceKind::Subnet, ri.subnet, &id);
        dot.edge(&id, ResourceKind::Router, ri.router);
    }
    for fip in graph.floating_ips() {
        dot.edge_reversed(
            ResourceKind::Port,
            fip.port,
            &node_id(ResourceKind::FloatingIp, fip.index()),
        );
    }
}

/// Fixed legend: one healthy exemplar per kind
pub fn write_legend(dot: &mut DotBuilder<'_>) {
    dot.open_cluster("cluster_legend", "Legend", None);

    let server_fill = dot.stylesheet.fill(ResourceKind::Server);
    dot.open_cluster("cluster_legend_server", "server", server_fill.as_deref());
    dot.node(&legend_id(ResourceKind::Port), ResourceKind::Port, false, "port");
    dot.close();

    for (kind, label) in [
        (ResourceKind::Network, "net"),
        (ResourceKind::Subnet, "subnet"),
        (ResourceKind::Router, "router"),
        (ResourceKind::RouterInterface, "router interface"),
        (ResourceKind::FloatingIp, "floating ip"),
    ] {
        dot.node(&legend_id(kind), kind, false, label);
    }

    dot.close();
}

fn legend_id(kind: ResourceKind) -> String {
    format!("{}legend", kind.node_prefix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NetworkNode, NodeBase, PortNode, ServerNode};
    use pretty_assertions::assert_eq;

    fn flat() -> DotConfig {
        DotConfig::new().with_pretty_print(false).with_legend(false)
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[test]
    fn test_dot_id_quotes_hex_colors() {
        assert_eq!(dot_id("lightblue1"), "lightblue1");
        assert_eq!(dot_id("#224422"), "\"#224422\"");
        assert_eq!(dot_id("0.5 0.2 1"), "\"0.5 0.2 1\"");
    }

    #[test]
    fn test_node_statement_healthy_and_broken() {
        let style = Stylesheet::default();
        let mut dot = DotBuilder::new(flat(), &style);
        dot.node("net0", ResourceKind::Network, false, "n:a");
        dot.node("net1", ResourceKind::Network, true, "n:b");
        dot.node("subnet0", ResourceKind::Subnet, false, "s");
        assert_eq!(
            dot.finish(),
            "net0 [shape=box,style=filled,fillcolor=lawngreen,label=\"n:a\"];\n\
             net1 [shape=box,style=filled,fillcolor=red,label=\"n:b\"];\n\
             subnet0 [shape=octagon,label=\"s\"];\n"
        );
    }

    #[test]
    fn test_unresolved_edges_use_sentinel() {
        let style = Stylesheet::default();
        let mut dot = DotBuilder::new(flat(), &style);
        dot.edge("port0", ResourceKind::Network, Reference::Unresolved);
        dot.edge_reversed(ResourceKind::Port, Reference::Unresolved, "floating0");
        dot.edge("port1", ResourceKind::Network, Reference::Resolved(2));
        assert_eq!(
            dot.finish(),
            "port0 -- netUnresolved [style=dashed,color=red];\n\
             portUnresolved -- floating0 [style=dashed,color=red];\n\
             port1 -- net2;\n"
        );
    }

    #[test]
    fn test_graph_name_is_quoted_when_needed() {
        let graph = Graph::default();
        let config = flat().with_graph_name("my stack");
        let out = render_dot(&graph, &config, &Stylesheet::default());
        assert_eq!(out, "graph \"my stack\" {\n}\n");

        let config = flat().with_graph_name("stack_1");
        let out = render_dot(&graph, &config, &Stylesheet::default());
        assert!(out.starts_with("graph stack_1 {\n"));
    }

    #[test]
    fn test_pretty_print_indents_blocks() {
        let style = Stylesheet::default();
        let mut dot = DotBuilder::new(DotConfig::default(), &style);
        dot.open("graph g");
        dot.open_cluster("cluster_a", "a", Some("blue"));
        dot.close();
        dot.close();
        assert_eq!(
            dot.finish(),
            "graph g {\n  subgraph cluster_a {\n    label=\"a\";\n    fillcolor=blue;\n    style=filled;\n  }\n}\n"
        );
    }

    #[test]
    fn test_ports_declared_once() {
        let port = |i: usize| PortNode {
            base: NodeBase::new(ResourceKind::Port, i),
            network: Reference::Resolved(0),
        };
        let server = |i: usize, ports: Vec<Reference>| ServerNode {
            base: NodeBase::new(ResourceKind::Server, i),
            ports,
        };
        let graph = Graph::new(
            vec![
                server(0, vec![Reference::Resolved(0)]),
                server(1, vec![Reference::Resolved(0), Reference::Unresolved]),
            ],
            vec![port(0), port(1)],
            vec![NetworkNode {
                base: NodeBase::new(ResourceKind::Network, 0),
            }],
            vec![],
            vec![],
            vec![],
            vec![],
        );
        let out = render_dot(&graph, &flat(), &Stylesheet::default());
        assert_eq!(
            out,
            "graph heat {\n\
             subgraph cluster_server0 {\n\
             label=\"server0\";\n\
             fillcolor=lightblue1;\n\
             style=filled;\n\
             port0 [shape=ellipse,style=filled,fillcolor=white,label=\"port0\"];\n\
             }\n\
             subgraph cluster_server1 {\n\
             label=\"server1\";\n\
             fillcolor=lightblue1;\n\
             style=filled;\n\
             }\n\
             port1 [shape=ellipse,style=filled,fillcolor=white,label=\"port1\"];\n\
             net0 [shape=box,style=filled,fillcolor=lawngreen,label=\"net0\"];\n\
             port0 -- net0;\n\
             port1 -- net0;\n\
             }\n"
        );
    }

    #[test]
    fn test_legend_block() {
        let style = Stylesheet::default();
        let mut dot = DotBuilder::new(DotConfig::new().with_pretty_print(false), &style);
        write_legend(&mut dot);
        insta::assert_snapshot!(dot.finish().trim_end(), @r#"
subgraph cluster_legend {
label="Legend";
subgraph cluster_legend_server {
label="server";
fillcolor=lightblue1;
style=filled;
portlegend [shape=ellipse,style=filled,fillcolor=white,label="port"];
}
netlegend [shape=box,style=filled,fillcolor=lawngreen,label="net"];
subnetlegend [shape=octagon,label="subnet"];
routerlegend [shape=diamond,style=filled,fillcolor=lightpink1,label="router"];
routerInterfacelegend [shape=triangle,label="router interface"];
floatinglegend [shape=egg,label="floating ip"];
}
"#);
    }
}
