//! Record writer.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::convert::error::ConvertError;
use crate::model::PromptRecord;

/// Writes `record` as the full contents of `path`, creating or overwriting
/// the file. Missing parent directories are created first.
///
/// # Errors
///
/// Returns [`ConvertError::Serialize`] if the record cannot be encoded and
/// [`ConvertError::Write`] if any filesystem step fails.
pub fn write_record(record: &PromptRecord, path: &Path) -> Result<(), ConvertError> {
    let json = record.to_json()?;

    let write_err = |source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, json).map_err(write_err)?;

    debug!(path = %path.display(), title = record.title(), "Wrote record");
    Ok(())
}
