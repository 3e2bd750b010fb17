//! heat2dot - render Heat orchestration templates as Graphviz DOT graphs
//!
//! The pipeline decodes a template, sorts its resources by type, builds one
//! typed node per resource with references resolved by name, and writes the
//! resulting graph as DOT text for an external layout engine.
//!
//! # Example
//!
//! ```rust
//! use heat2dot::convert;
//!
//! let conversion = convert(r#"
//! resources:
//!   net:
//!     type: OS::Neutron::Net
//!     properties:
//!       name: "net-a:extra"
//! "#).unwrap();
//!
//! assert!(conversion.dot.starts_with("graph heat {"));
//! assert!(conversion.dot.contains(r#"label="net-a:extra""#));
//! ```

pub mod diagnostics;
pub mod document;
pub mod error;
pub mod model;
pub mod renderer;
pub mod stylesheet;

pub use diagnostics::{Diagnostic, Diagnostics, Level};
pub use document::{parse_document, DocumentFormat, Value};
pub use error::ConvertError;
pub use model::{Graph, Reference, ResourceKind};
pub use renderer::{render_dot, DotConfig};
pub use stylesheet::Stylesheet;

/// Configuration for the complete conversion pipeline
#[derive(Debug, Clone, Default)]
pub struct ConvertConfig {
    /// DOT output configuration
    pub dot: DotConfig,
    /// Shapes and colors per resource kind
    pub stylesheet: Stylesheet,
    /// Decode with this format instead of trying JSON then YAML
    pub format: Option<DocumentFormat>,
}

impl ConvertConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the DOT configuration
    pub fn with_dot(mut self, config: DotConfig) -> Self {
        self.dot = config;
        self
    }

    /// Set the stylesheet
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Force the input format
    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// Output of a successful conversion
#[derive(Debug)]
pub struct Conversion {
    /// DOT text
    pub dot: String,
    pub graph: Graph,
    pub diagnostics: Diagnostics,
}

/// Convert template text to DOT with default configuration
pub fn convert(source: &str) -> Result<Conversion, ConvertError> {
    convert_with_config(source, &ConvertConfig::default())
}

/// Convert template text to DOT
pub fn convert_with_config(
    source: &str,
    config: &ConvertConfig,
) -> Result<Conversion, ConvertError> {
    convert_with_diagnostics(source, config, &mut Diagnostics::new())
}

/// Convert template text to DOT, collecting into `diagnostics`.
///
/// On success the collected entries move into the returned [`Conversion`].
/// On a fatal error they stay in `diagnostics`, so whatever was reported
/// before the failure is still available.
pub fn convert_with_diagnostics(
    source: &str,
    config: &ConvertConfig,
    diagnostics: &mut Diagnostics,
) -> Result<Conversion, ConvertError> {
    let (doc, format) = parse_document(source, config.format)?;
    diagnostics.info(format!("Parsed as {}", format));
    convert_document(&doc, config, diagnostics)
}

/// Convert an already-decoded template.
///
/// `diagnostics` may already hold entries (such as the detected format);
/// conversion messages are appended after them.
pub fn convert_document(
    doc: &Value,
    config: &ConvertConfig,
    diagnostics: &mut Diagnostics,
) -> Result<Conversion, ConvertError> {
    if let Some(version) = doc.get("heat_template_version") {
        diagnostics.info(format!("heat_template_version {}", version));
    }

    let resources = doc.get("resources").ok_or(ConvertError::NoResources)?;
    let resources = resources
        .as_map()
        .ok_or(ConvertError::ResourcesNotMapping {
            found: resources.shape_name(),
        })?;

    let classified = model::classify(resources);
    tracing::debug!(
        recognized = classified.recognized(),
        untyped = classified.untyped,
        unknown = classified.unknown.len(),
        "classified resources"
    );
    classified.report(diagnostics);

    let graph = model::build_graph(&classified, diagnostics);
    tracing::debug!(
        nodes = graph.node_count(),
        broken = graph.broken_count(),
        "built graph"
    );

    let dot = render_dot(&graph, &config.dot, &config.stylesheet);
    diagnostics.info("Exiting");

    Ok(Conversion {
        dot,
        graph,
        diagnostics: std::mem::take(diagnostics),
    })
}
