//! Decoding template text into a [`Value`] tree

use std::fmt;

use crate::error::ConvertError;

use super::Value;

/// Serialization a template was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "JSON"),
            DocumentFormat::Yaml => write!(f, "YAML"),
        }
    }
}

/// Decode `text`, either with the forced `format` or by trying JSON then YAML.
pub fn parse_document(
    text: &str,
    format: Option<DocumentFormat>,
) -> Result<(Value, DocumentFormat), ConvertError> {
    match format {
        Some(DocumentFormat::Json) => decode_json(text)
            .map(|v| (v, DocumentFormat::Json))
            .map_err(|e| ConvertError::Decode {
                json: Some(e),
                yaml: None,
            }),
        Some(DocumentFormat::Yaml) => decode_yaml(text)
            .map(|v| (v, DocumentFormat::Yaml))
            .map_err(|e| ConvertError::Decode {
                json: None,
                yaml: Some(e),
            }),
        None => match decode_json(text) {
            Ok(v) => Ok((v, DocumentFormat::Json)),
            Err(json_err) => {
                tracing::debug!("JSON decode failed: {}", json_err);
                match decode_yaml(text) {
                    Ok(v) => Ok((v, DocumentFormat::Yaml)),
                    Err(yaml_err) => Err(ConvertError::Decode {
                        json: Some(json_err),
                        yaml: Some(yaml_err),
                    }),
                }
            }
        },
    }
}

fn decode_json(text: &str) -> Result<Value, String> {
    serde_json::from_str::<serde_json::Value>(text)
        .map(Value::from)
        .map_err(|e| e.to_string())
}

fn decode_yaml(text: &str) -> Result<Value, String> {
    serde_yaml::from_str::<serde_yaml::Value>(text)
        .map(Value::from)
        .map_err(|e| e.to_string())
}
