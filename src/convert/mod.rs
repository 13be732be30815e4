//! Conversion module - turns prompt source files into prompt records.
//!
//! This module provides the file-to-record pipeline:
//! - **Formats**: [`SourceFormat`] selection by extension and per-format extractors
//! - **Reader**: Loading and metadata validation via [`FileReader`]
//! - **Writer**: Record persistence via [`write_record`]
//! - **Pipeline**: Single-file and batch driver via [`pipeline::ConvertPipeline`]
//! - **Errors**: [`ConvertError`] taxonomy shared by all stages

pub mod error;
pub mod formats;
pub mod pipeline;
pub mod reader;
pub mod writer;

// Re-export commonly used types
pub use error::ConvertError;
pub use formats::{Extracted, RawData, SourceFormat};
pub use pipeline::{BatchReport, ConvertPipeline, FailedFile, FileOutcome};
pub use reader::FileReader;
pub use writer::write_record;
