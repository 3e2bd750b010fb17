//! Short display labels derived from resource names

use super::ResourceKind;

/// How a kind's short label is cut from its full name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRule {
    /// Text before the first `:`
    FirstSegment,
    /// First `n` `:`-separated segments; the full name if there are fewer
    Segments(usize),
    /// Always `<prefix><index>`, the name is never consulted
    Synthetic,
}

impl LabelRule {
    pub fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Server => LabelRule::FirstSegment,
            ResourceKind::Port => LabelRule::Segments(3),
            ResourceKind::Network | ResourceKind::Subnet | ResourceKind::Router => {
                LabelRule::Segments(2)
            }
            ResourceKind::RouterInterface
            | ResourceKind::FloatingIp
            | ResourceKind::Unknown => LabelRule::Synthetic,
        }
    }
}

/// Result of shortening a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortLabel {
    Cut(String),
    /// The name had too few segments and is used whole
    FullName(String),
}

impl ShortLabel {
    pub fn into_string(self) -> String {
        match self {
            ShortLabel::Cut(s) | ShortLabel::FullName(s) => s,
        }
    }
}

/// Shorten `name` per `rule`. `Synthetic` rules return the name unchanged.
pub fn short_label(rule: LabelRule, name: &str) -> ShortLabel {
    match rule {
        LabelRule::FirstSegment => {
            ShortLabel::Cut(name.split(':').next().unwrap_or_default().to_string())
        }
        LabelRule::Segments(n) => {
            let segments: Vec<&str> = name.split(':').collect();
            if segments.len() < n {
                ShortLabel::FullName(name.to_string())
            } else {
                ShortLabel::Cut(segments[..n].join(":"))
            }
        }
        LabelRule::Synthetic => ShortLabel::Cut(name.to_string()),
    }
}

/// `<prefix><index>` label used until a name is consumed
pub fn placeholder(kind: ResourceKind, index: usize) -> String {
    format!("{}{}", kind.placeholder_prefix(), index)
}
