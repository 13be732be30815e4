use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

use prompt_normalizer::{ConvertConfig, ConvertPipeline, FileOutcome};

/// Normalize Markdown, JSON and plain-text prompts into JSON prompt records.
#[derive(Parser, Debug)]
#[command(name = "prompt-normalizer", version, about)]
struct Cli {
    /// Source file, or root directory whose subdirectories hold prompts
    input: PathBuf,

    /// Output root (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Subdirectory name to skip; repeat for several (replaces the configured list)
    #[arg(long = "exclude", value_name = "NAME")]
    exclude: Vec<String>,

    /// Owner id for records whose metadata names none
    #[arg(long, value_name = "ID")]
    owner_id: Option<i64>,

    /// JSON config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Convert only the files directly inside INPUT instead of its subdirectories
    #[arg(long)]
    flat: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Conversion aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => ConvertConfig::from_json_file(path)?,
        None => ConvertConfig::default(),
    };
    if let Some(output) = cli.output {
        config = config.with_output_root(output);
    }
    if !cli.exclude.is_empty() {
        config = config.with_exclude_dirs(cli.exclude);
    }
    if let Some(owner_id) = cli.owner_id {
        config = config.with_owner_id(owner_id);
    }

    let pipeline = ConvertPipeline::new(config);

    if cli.input.is_file() {
        return Ok(match pipeline.convert_file(&cli.input)? {
            FileOutcome::Written(_) => ExitCode::SUCCESS,
            FileOutcome::Skipped => ExitCode::FAILURE,
        });
    }

    let report = if cli.flat {
        pipeline.convert_directory(&cli.input)?
    } else {
        pipeline.convert_tree(&cli.input)?
    };

    // Best effort: only a run where nothing converted counts as a failure.
    Ok(if report.all_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
