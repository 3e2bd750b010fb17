//! DOT renderer for generating output from a built graph

pub mod config;
pub mod dot;

pub use config::DotConfig;
pub use dot::{render_dot, DotBuilder};
