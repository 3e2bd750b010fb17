//! Name-based lookup of `get_resource` targets

use crate::document::RawResource;

/// Target of a reference: a position in the target kind's bucket, or nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reference {
    Resolved(usize),
    #[default]
    Unresolved,
}

impl Reference {
    pub fn index(&self) -> Option<usize> {
        match self {
            Reference::Resolved(i) => Some(*i),
            Reference::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Reference::Resolved(_))
    }
}

impl From<Option<usize>> for Reference {
    fn from(index: Option<usize>) -> Self {
        match index {
            Some(i) => Reference::Resolved(i),
            None => Reference::Unresolved,
        }
    }
}

/// Position of the first resource in `bucket` whose `properties.name` equals `name`.
///
/// Entries without a textual name never match.
pub fn find_index_by_name(bucket: &[RawResource<'_>], name: &str) -> Reference {
    bucket
        .iter()
        .position(|r| r.property_name() == Some(name))
        .into()
}
