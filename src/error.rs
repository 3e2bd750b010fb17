//! Fatal conversion errors
//!
//! Problems with individual resources are never errors; they are recorded on the
//! affected node and in [`crate::Diagnostics`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// The input could not be decoded by any attempted format
    #[error("parsing unsuccessful{}{}", decoder_note("JSON", .json), decoder_note("YAML", .yaml))]
    Decode {
        json: Option<String>,
        yaml: Option<String>,
    },

    #[error("failed to find resources mapping")]
    NoResources,

    #[error("resources must be a mapping, found {found}")]
    ResourcesNotMapping { found: &'static str },
}

fn decoder_note(format: &str, message: &Option<String>) -> String {
    match message {
        Some(m) => format!("; {} parse failure: {}", format, m),
        None => String::new(),
    }
}
