//! Parsing of the platform → version patterns mapping

use indexmap::IndexMap;
use thiserror::Error;

/// Version patterns per platform name, in input order
pub type PlatformDependencies = IndexMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid platform dependencies, expected an object of string arrays: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a JSON object such as `{"PAPER": ["1.20.x"], "VELOCITY": ["3.3.0"]}`.
///
/// Blank input is an empty mapping.
pub fn parse_platform_dependencies(input: &str) -> Result<PlatformDependencies, InputError> {
    if input.trim().is_empty() {
        return Ok(PlatformDependencies::new());
    }

    Ok(serde_json::from_str(input)?)
}
