use std::path::PathBuf;

use clap::Parser;

use super::logging::LogDestination;

/// Score résumés against a job description using the similarity service.
#[derive(Debug, Clone, Parser)]
#[command(name = "resume-analyzer", version)]
pub struct Cli {
    /// Similarity endpoint (defaults to the local service).
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Directory that receives `similarity_report.xlsx`.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Give up on the service after this many seconds (default: wait forever).
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Accept self-signed TLS certificates from the service.
    #[arg(long)]
    pub insecure: bool,

    /// Optional RON settings file.
    #[arg(long, default_value = ".analyzer_settings.ron")]
    pub settings: PathBuf,

    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log_destination: LogDestination,

    /// error, warn, info, debug or trace.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
