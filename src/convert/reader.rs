//! Source file reader.
//!
//! [`FileReader`] loads one source file with the read strategy of its
//! [`SourceFormat`] and turns metadata plus content into a validated
//! [`PromptRecord`].

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::convert::error::ConvertError;
use crate::convert::formats::{RawData, SourceFormat};
use crate::model::{Metadata, PromptRecord, DEFAULT_OWNER_ID, NO_TITLE};

/// A loaded source file.
#[derive(Debug, Clone)]
pub struct FileReader {
    path: PathBuf,
    data: RawData,
    default_owner: i64,
}

impl FileReader {
    /// Loads `path`, choosing the read strategy from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnsupportedFormat`] for unknown extensions and
    /// the read/parse errors of [`SourceFormat::read`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let format = SourceFormat::from_path(path)?;
        let data = format.read(path)?;

        debug!(path = %path.display(), format = format.name(), "Loaded source file");

        Ok(Self {
            path: path.to_path_buf(),
            data,
            default_owner: DEFAULT_OWNER_ID,
        })
    }

    /// Sets the owner used when metadata does not name one.
    pub fn with_owner_id(mut self, owner_id: i64) -> Self {
        self.default_owner = owner_id;
        self
    }

    /// Source file this reader loaded.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loaded data, tagged with its format.
    pub fn data(&self) -> &RawData {
        &self.data
    }

    /// Format selected from the file extension.
    pub fn format(&self) -> SourceFormat {
        self.data.format()
    }

    /// File name without its extension, or the [`NO_TITLE`] placeholder if
    /// the path has none.
    pub fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| NO_TITLE.to_string())
    }

    /// Validates `metadata` and builds a record from it.
    ///
    /// Absent or empty metadata is replaced by `{"title": <file stem>}`.
    /// Absent or empty `content` falls back to the loaded data as-is.
    ///
    /// Returns `None` (after logging the reason) when the metadata does not
    /// validate; callers treat that as a skipped file.
    pub fn process(
        &self,
        metadata: Option<Map<String, Value>>,
        content: Option<String>,
    ) -> Option<PromptRecord> {
        let metadata = match metadata {
            Some(map) if !map.is_empty() => map,
            _ => {
                let mut map = Map::new();
                map.insert("title".to_string(), Value::String(self.file_stem()));
                map
            }
        };

        let metadata = match Metadata::from_map(metadata, self.default_owner) {
            Ok(metadata) => metadata,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Invalid metadata");
                return None;
            }
        };

        let content = content
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| self.data.to_content());

        match PromptRecord::new(metadata, content) {
            Ok(record) => Some(record),
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Invalid record");
                None
            }
        }
    }
}
