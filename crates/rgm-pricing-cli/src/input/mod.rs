pub mod file;
pub mod stdin;

use serde_json::Value;

/// Decode a form or replay document.
///
/// YAML documents are read as YAML; everything else is JSON first with YAML
/// as the fallback, reporting the JSON error when both fail.
pub fn parse_document(text: &str, yaml: bool) -> Result<Value, Box<dyn std::error::Error>> {
    if yaml {
        return Ok(serde_yaml::from_str(text)?);
    }
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_yaml::from_str(text).map_err(|_| json_err.into()),
    }
}
