//! Configuration for DOT rendering

/// Configuration options for DOT output
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Name of the top-level `graph` block
    pub graph_name: String,

    /// Whether to indent statements nested in subgraphs
    pub pretty_print: bool,

    /// Whether to append the legend subgraph
    pub legend: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            graph_name: "heat".to_string(),
            pretty_print: true,
            legend: true,
        }
    }
}

impl DotConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_graph_name(mut self, name: impl Into<String>) -> Self {
        self.graph_name = name.into();
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_legend(mut self, legend: bool) -> Self {
        self.legend = legend;
        self
    }
}
