pub mod config;
pub mod convert;
pub mod model;

// Re-export common types for convenience
pub use config::{ConfigError, ConvertConfig};
pub use convert::{
    BatchReport, ConvertError, ConvertPipeline, Extracted, FailedFile, FileOutcome, FileReader,
    RawData, SourceFormat,
};
pub use model::{FieldUpdate, Metadata, PromptRecord, ValidationError};
