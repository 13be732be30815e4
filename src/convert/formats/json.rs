//! JSON extractor.

use serde_json::Value;

use super::Extracted;
use crate::model::NO_TITLE;

/// JSON carries no title; the caller falls back to the file name. Content is
/// the compact re-serialization of the parsed document.
pub fn extract(value: &Value) -> Extracted {
    Extracted {
        title: NO_TITLE.to_string(),
        content: value.to_string(),
    }
}
