//! Typed resource model: classification, reference resolution, node building
//! and the assembled graph.

pub mod builder;
pub mod classify;
pub mod graph;
pub mod kind;
pub mod label;
pub mod nodes;
pub mod resolve;

pub use builder::build_graph;
pub use classify::{classify, Classified};
pub use graph::{Edge, Graph, NodeId};
pub use kind::ResourceKind;
pub use label::{LabelRule, ShortLabel};
pub use nodes::*;
pub use resolve::{find_index_by_name, Reference};
