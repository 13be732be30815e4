//! Plain text extractor.

use super::Extracted;
use crate::model::NO_TITLE;

/// Plain text carries no title; content is the text exactly as read.
pub fn extract(text: &str) -> Extracted {
    Extracted {
        title: NO_TITLE.to_string(),
        content: text.to_string(),
    }
}
