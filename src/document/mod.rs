//! Template document model: decoded value tree and input decoding

pub mod format;
pub mod value;

pub use format::{parse_document, DocumentFormat};
pub use value::{Mapping, RawResource, Value};
