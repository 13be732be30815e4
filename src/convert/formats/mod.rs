//! Supported source formats.
//!
//! [`SourceFormat`] is picked from a file's extension and knows how to load
//! the file into [`RawData`]. Each `RawData` variant carries the loaded data
//! of exactly one format, and [`RawData::extract`] hands it to that format's
//! extractor:
//! - `markdown` - rendered HTML, title from the first `<h1>`
//! - `json` - parsed value, re-serialized as content
//! - `text` - raw text, unmodified

pub mod json;
pub mod markdown;
pub mod text;

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::convert::error::ConvertError;
use crate::model::NO_TITLE;

/// Closed set of input formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.md`
    Markdown,
    /// `.json`
    Json,
    /// `.txt`
    PlainText,
}

impl SourceFormat {
    /// Selects the format from the file extension alone.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnsupportedFormat`] for any extension other
    /// than `md`, `json` or `txt` (including no extension at all).
    pub fn from_path(path: &Path) -> Result<Self, ConvertError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("md") => Ok(Self::Markdown),
            Some("json") => Ok(Self::Json),
            Some("txt") => Ok(Self::PlainText),
            _ => Err(ConvertError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Returns the identifier used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::PlainText => "text",
        }
    }

    /// Loads `path` with this format's read strategy.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Read`] if the file cannot be read as UTF-8
    /// text, or [`ConvertError::Parse`] if a `.json` file is not valid JSON.
    pub fn read(self, path: &Path) -> Result<RawData, ConvertError> {
        let text = fs::read_to_string(path).map_err(|source| ConvertError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let raw = match self {
            Self::Markdown => RawData::Markdown(markdown::render(&text)),
            Self::Json => {
                let value = serde_json::from_str(&text).map_err(|source| ConvertError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
                RawData::Json(value)
            }
            Self::PlainText => RawData::Text(text),
        };
        Ok(raw)
    }
}

/// Data loaded from a source file, tagged with its format.
#[derive(Debug, Clone, PartialEq)]
pub enum RawData {
    /// Markdown already rendered to HTML
    Markdown(String),

    /// Parsed JSON document
    Json(Value),

    /// Plain text as read
    Text(String),
}

impl RawData {
    /// Format this data was loaded as.
    pub fn format(&self) -> SourceFormat {
        match self {
            Self::Markdown(_) => SourceFormat::Markdown,
            Self::Json(_) => SourceFormat::Json,
            Self::Text(_) => SourceFormat::PlainText,
        }
    }

    /// Runs the extractor matching this data's format.
    pub fn extract(&self) -> Extracted {
        match self {
            Self::Markdown(html) => markdown::extract(html),
            Self::Json(value) => json::extract(value),
            Self::Text(text) => text::extract(text),
        }
    }

    /// The data as record content, without any extraction applied.
    pub fn to_content(&self) -> String {
        match self {
            Self::Markdown(html) => html.clone(),
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Title and content derived from one source document.
///
/// `title` may be the [`NO_TITLE`] placeholder, meaning the format carried no
/// title and the caller should pick one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// Document title or the placeholder
    pub title: String,

    /// Cleaned document body
    pub content: String,
}

impl Extracted {
    /// Whether a usable title was found in the document itself.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty() && self.title != NO_TITLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("a/b.md")).unwrap(),
            SourceFormat::Markdown
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("b.json")).unwrap(),
            SourceFormat::Json
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("my note.txt")).unwrap(),
            SourceFormat::PlainText
        );
    }

    #[test]
    fn test_unsupported_extensions() {
        for name in ["report.pdf", "README", "notes.MD", "archive.md.bak"] {
            let err = SourceFormat::from_path(Path::new(name)).unwrap_err();
            match err {
                ConvertError::UnsupportedFormat { path } => assert_eq!(path, PathBuf::from(name)),
                other => panic!("unexpected error for {name}: {other}"),
            }
        }
    }

    #[test]
    fn test_raw_data_dispatch() {
        let raw = RawData::Text("hello".to_string());
        assert_eq!(raw.format(), SourceFormat::PlainText);
        assert_eq!(raw.extract().content, "hello");

        let raw = RawData::Json(serde_json::json!({"a": 1}));
        assert_eq!(raw.format(), SourceFormat::Json);
        assert_eq!(raw.to_content(), r#"{"a":1}"#);
    }

    #[test]
    fn test_has_title() {
        let extracted = Extracted {
            title: NO_TITLE.to_string(),
            content: String::new(),
        };
        assert!(!extracted.has_title());

        let extracted = Extracted {
            title: "Real".to_string(),
            content: String::new(),
        };
        assert!(extracted.has_title());
    }
}
