//! Prompt conversion pipeline.
//!
//! This module provides the [`ConvertPipeline`] driver that runs the
//! per-file stages (Read → Extract → Process → Write) one file at a time:
//! - Read strategy and extractor chosen by file extension
//! - Title fallback to the source file stem
//! - Deterministic output placement under the configured output root
//! - Per-file error isolation in batch mode, logged via `tracing`

use serde_json::{Map, Value};
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::config::ConvertConfig;
use crate::convert::error::ConvertError;
use crate::convert::reader::FileReader;
use crate::convert::writer::write_record;

// ============================================================================
// Pipeline Types
// ============================================================================

/// Result of converting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Record written to this path
    Written(PathBuf),

    /// Metadata failed validation; nothing was written
    Skipped,
}

/// A file that could not be converted during a batch run.
#[derive(Debug, Clone)]
pub struct FailedFile {
    /// Source file (or directory) that failed
    pub path: PathBuf,

    /// Rendered error
    pub error: String,
}

/// Summary of a batch run.
#[derive(Debug, Default, Clone)]
pub struct BatchReport {
    /// Output files written
    pub written: Vec<PathBuf>,

    /// Source files skipped because their metadata did not validate
    pub skipped: Vec<PathBuf>,

    /// Source files that failed with an error
    pub failed: Vec<FailedFile>,

    /// Wall time of the whole run (milliseconds)
    pub duration_ms: u64,
}

impl BatchReport {
    /// Number of source files attempted.
    pub fn total(&self) -> usize {
        self.written.len() + self.skipped.len() + self.failed.len()
    }

    /// True when files were attempted and none of them produced output.
    pub fn all_failed(&self) -> bool {
        self.total() > 0 && self.written.is_empty()
    }
}

// ============================================================================
// Pipeline Driver
// ============================================================================

/// Synchronous conversion pipeline.
///
/// # Example
///
/// ```ignore
/// use prompt_normalizer::{ConvertConfig, ConvertPipeline};
///
/// let pipeline = ConvertPipeline::new(
///     ConvertConfig::default().with_output_root("processed_prompts"),
/// );
/// let report = pipeline.convert_tree("prompts".as_ref())?;
/// println!("{} written, {} failed", report.written.len(), report.failed.len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConvertPipeline {
    config: ConvertConfig,
}

impl ConvertPipeline {
    /// Creates a pipeline driven by `config`.
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    /// Settings this pipeline runs with.
    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Converts a single source file.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] for unsupported extensions and for any read,
    /// parse or write failure. Invalid metadata is not an error: it yields
    /// [`FileOutcome::Skipped`].
    #[instrument(skip_all, fields(path = %source.display()))]
    pub fn convert_file(&self, source: &Path) -> Result<FileOutcome, ConvertError> {
        // ====================================================================
        // Stage 1: Read
        // ====================================================================

        let reader = FileReader::open(source)?.with_owner_id(self.config.owner_id);

        // ====================================================================
        // Stage 2: Extract
        // ====================================================================

        let extracted = reader.data().extract();
        let title = if extracted.has_title() {
            extracted.title
        } else {
            reader.file_stem()
        };
        debug!(format = reader.format().name(), title = %title, "Extracted document");

        // ====================================================================
        // Stage 3: Process
        // ====================================================================

        let mut metadata = Map::new();
        metadata.insert("title".to_string(), Value::String(title));

        let Some(record) = reader.process(Some(metadata), Some(extracted.content)) else {
            return Ok(FileOutcome::Skipped);
        };

        // ====================================================================
        // Stage 4: Write
        // ====================================================================

        let output = self.output_path_for(source, record.title())?;
        write_record(&record, &output)?;

        info!(output = %output.display(), "Converted file");
        Ok(FileOutcome::Written(output))
    }

    /// Computes `<output_root>/<source parent dir name>/<title>.json`, with
    /// spaces in the title replaced by underscores.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::NoParentDirectory`] if no parent directory
    /// name can be determined for `source`, and
    /// [`ConvertError::PathTraversal`] if the title is not a plain file name
    /// (contains a separator, is `.`/`..`, or is absolute).
    pub fn output_path_for(&self, source: &Path, title: &str) -> Result<PathBuf, ConvertError> {
        let file_name = output_file_name(title)?;

        let parent = parent_dir_name(source)
            .or_else(|| {
                source
                    .canonicalize()
                    .ok()
                    .and_then(|absolute| parent_dir_name(&absolute))
            })
            .ok_or_else(|| ConvertError::NoParentDirectory {
                path: source.to_path_buf(),
            })?;

        Ok(self
            .config
            .output_root
            .join(parent)
            .join(file_name))
    }

    /// Creates `<output_root>/<name>` for every eligible immediate
    /// subdirectory of `root` and returns those subdirectories, sorted.
    ///
    /// Hidden directories, names in the exclusion list and the output root
    /// itself are not eligible.
    pub fn mirror_directories(&self, root: &Path) -> Result<Vec<PathBuf>, ConvertError> {
        let output_root = self.config.output_root.canonicalize().ok();

        let mut dirs = Vec::new();
        for entry in fs::read_dir(root)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }

            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if self.config.is_excluded(&name) {
                debug!(dir = %path.display(), "Skipping excluded directory");
                continue;
            }
            if output_root.is_some() && path.canonicalize().ok() == output_root {
                debug!(dir = %path.display(), "Skipping output directory");
                continue;
            }

            dirs.push(path);
        }
        dirs.sort();

        for dir in &dirs {
            if let Some(name) = dir.file_name() {
                fs::create_dir_all(self.config.output_root.join(name))?;
            }
        }

        Ok(dirs)
    }

    /// Converts every regular file directly inside `dir`.
    ///
    /// Per-file failures are logged and recorded in the report; only failure
    /// to list `dir` itself is returned as an error.
    pub fn convert_directory(&self, dir: &Path) -> Result<BatchReport, ConvertError> {
        let start = Instant::now();
        let mut report = BatchReport::default();

        self.convert_files_in(dir, &mut report)?;

        report.duration_ms = start.elapsed().as_millis() as u64;
        log_summary(&report);
        Ok(report)
    }

    /// Mirrors the subdirectories of `root` under the output root and
    /// converts the files of each one.
    ///
    /// A subdirectory that cannot be listed is recorded as a failure and the
    /// run continues.
    pub fn convert_tree(&self, root: &Path) -> Result<BatchReport, ConvertError> {
        let start = Instant::now();
        let mut report = BatchReport::default();

        let dirs = self.mirror_directories(root)?;
        info!(root = %root.display(), directories = dirs.len(), "Converting tree");

        for dir in dirs {
            if let Err(e) = self.convert_files_in(&dir, &mut report) {
                error!(dir = %dir.display(), error = %e, "Failed to read directory");
                report.failed.push(FailedFile {
                    path: dir,
                    error: e.to_string(),
                });
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        log_summary(&report);
        Ok(report)
    }

    fn convert_files_in(&self, dir: &Path, report: &mut BatchReport) -> Result<(), ConvertError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        for path in files {
            match self.convert_file(&path) {
                Ok(FileOutcome::Written(output)) => report.written.push(output),
                Ok(FileOutcome::Skipped) => {
                    warn!(path = %path.display(), "Skipped file with invalid metadata");
                    report.skipped.push(path);
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to convert file");
                    report.failed.push(FailedFile {
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Builds `<title>.json`, rejecting titles that would not stay a single
/// path component inside the mirrored directory.
fn output_file_name(title: &str) -> Result<String, ConvertError> {
    let stem = title.replace(' ', "_");
    let rejected = || ConvertError::PathTraversal {
        title: title.to_string(),
    };

    if stem.contains(['/', '\\']) || stem == "." || stem == ".." {
        return Err(rejected());
    }

    let file_name = format!("{stem}.json");
    let mut components = Path::new(&file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(file_name),
        _ => Err(rejected()),
    }
}

fn parent_dir_name(path: &Path) -> Option<OsString> {
    path.parent()
        .and_then(|parent| parent.file_name())
        .map(|name| name.to_os_string())
}

fn log_summary(report: &BatchReport) {
    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        duration_ms = report.duration_ms,
        "Conversion finished"
    );
}

// ============================================================================
// Tests
// ============================================================================
