//! Visual encoding of resource kinds
//!
//! Each kind has a fixed shape and a healthy fill color; broken nodes are
//! always filled with the broken color. The defaults are embedded as TOML and
//! can be overridden entry by entry from a user stylesheet.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::ResourceKind;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Shapes and fill colors keyed by node prefix (`port`, `net`, ...)
#[derive(Debug, Clone)]
pub struct Stylesheet {
    pub name: Option<String>,
    pub description: Option<String>,
    pub shapes: HashMap<String, String>,
    /// Healthy fills, plus the special `broken` and `unresolved` entries
    pub fills: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    shape: HashMap<String, String>,
    #[serde(default)]
    fill: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

const DEFAULT_STYLE: &str = r#"
[shape]
port = "ellipse"
net = "box"
subnet = "octagon"
router = "diamond"
routerInterface = "triangle"
floating = "egg"

[fill]
server = "lightblue1"
port = "white"
net = "lawngreen"
router = "lightpink1"
broken = "red"
unresolved = "red"
"#;

const BROKEN: &str = "broken";
const UNRESOLVED: &str = "unresolved";

/// Resolved attributes for one node statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStyle {
    pub shape: Option<String>,
    /// `Some` means the node is drawn filled
    pub fill: Option<String>,
}

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string. Entries it leaves out keep their defaults.
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let mut style = Self::default();
        let overrides = Self::parse(content)?;
        style.name = overrides.name;
        style.description = overrides.description;
        style.shapes.extend(overrides.shapes);
        style.fills.extend(overrides.fills);
        Ok(style)
    }

    fn parse(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            shapes: parsed.shape,
            fills: parsed.fill,
        })
    }

    pub fn shape(&self, kind: ResourceKind) -> Option<String> {
        self.shapes.get(kind.node_prefix()).cloned()
    }

    /// Healthy fill of `kind`; `None` for kinds drawn unfilled
    pub fn fill(&self, kind: ResourceKind) -> Option<String> {
        self.fill_entry(kind.node_prefix())
    }

    fn fill_entry(&self, key: &str) -> Option<String> {
        self.fills.get(key).cloned()
    }

    pub fn broken_fill(&self) -> String {
        self.fill_entry(BROKEN)
            .unwrap_or_else(|| "red".to_string())
    }

    /// Color of edges that point at an unresolved reference
    pub fn unresolved_color(&self) -> String {
        self.fill_entry(UNRESOLVED)
            .unwrap_or_else(|| "red".to_string())
    }

    pub fn node_style(&self, kind: ResourceKind, broken: bool) -> NodeStyle {
        NodeStyle {
            shape: self.shape(kind),
            fill: if broken {
                Some(self.broken_fill())
            } else {
                self.fill(kind)
            },
        }
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::parse(DEFAULT_STYLE).expect("Default style should be valid TOML")
    }
}
