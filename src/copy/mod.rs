//! Marketing copy for a product name, best effort.
//!
//! A failing text model never fails the request: [`generate_copy`] logs the
//! error and hands back [`CopyResult::Unavailable`], which the form UI shows
//! as a fixed placeholder.

pub mod client;
pub mod prompt;

use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::error;

pub use client::{CopyGenerator, GeminiClient};
pub use prompt::build_prompt;

/// Text shown in place of the description when the model call fails.
pub const UNAVAILABLE_PLACEHOLDER: &str = "(AI description unavailable — check GEMINI_API_KEY)";

/// Outcome of one copy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyResult {
    /// One or more description variants.
    Variants(Vec<String>),
    /// The model call failed; rendered as [`UNAVAILABLE_PLACEHOLDER`].
    Unavailable,
}

impl Serialize for CopyResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CopyResult::Variants(variants) => variants.serialize(serializer),
            CopyResult::Unavailable => serializer.serialize_str(UNAVAILABLE_PLACEHOLDER),
        }
    }
}

/// Interprets raw model output.
///
/// A JSON array of strings yields its elements (possibly none) and a JSON
/// string yields itself. Anything else, including non-JSON text, is kept whole as a single
/// variant rather than treated as an error.
pub fn parse_copy_response(raw: &str) -> Vec<String> {
    let text = raw.trim();
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) if items.iter().all(Value::is_string) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Ok(Value::String(s)) => vec![s],
        _ => vec![text.to_owned()],
    }
}

/// Asks `generator` for copy about `product_name`, degrading on failure.
pub fn generate_copy(generator: &dyn CopyGenerator, product_name: &str) -> CopyResult {
    let prompt = build_prompt(product_name);
    match generator.generate(&prompt) {
        Ok(raw) => CopyResult::Variants(parse_copy_response(&raw)),
        Err(err) => {
            error!(generator = generator.name(), error = %format!("{err:#}"), "copy generation failed");
            CopyResult::Unavailable
        }
    }
}
