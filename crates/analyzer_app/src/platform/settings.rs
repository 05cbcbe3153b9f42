use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use analyzer_engine::{EngineConfig, SubmitSettings};
use analyzer_logging::{analyzer_info, analyzer_warn};
use serde::{Deserialize, Serialize};

use super::cli::Cli;

/// Optional settings file; every field falls back to the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub endpoint: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub accept_invalid_certs: Option<bool>,
}

pub fn load_settings(path: &Path) -> AppSettings {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppSettings::default();
        }
        Err(err) => {
            analyzer_warn!("Failed to read settings from {:?}: {}", path, err);
            return AppSettings::default();
        }
    };

    match ron::from_str(&content) {
        Ok(settings) => {
            analyzer_info!("Loaded settings from {:?}", path);
            settings
        }
        Err(err) => {
            analyzer_warn!("Failed to parse settings from {:?}: {}", path, err);
            AppSettings::default()
        }
    }
}

/// Command-line flags win over the settings file, which wins over defaults.
pub fn engine_config(cli: &Cli, settings: &AppSettings, cwd: &Path) -> EngineConfig {
    let defaults = SubmitSettings::default();
    let submit = SubmitSettings {
        endpoint: cli
            .endpoint
            .clone()
            .or_else(|| settings.endpoint.clone())
            .unwrap_or(defaults.endpoint),
        connect_timeout: settings
            .connect_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.connect_timeout),
        request_timeout: cli
            .timeout_secs
            .or(settings.timeout_secs)
            .map(Duration::from_secs),
        accept_invalid_certs: cli.insecure || settings.accept_invalid_certs.unwrap_or(false),
        ..defaults
    };

    let output_dir = cli
        .output_dir
        .clone()
        .or_else(|| settings.output_dir.clone())
        .map(|dir| if dir.is_absolute() { dir } else { cwd.join(dir) })
        .unwrap_or_else(|| cwd.to_path_buf());

    EngineConfig {
        submit,
        output_dir,
        ..EngineConfig::default_with_output(PathBuf::new())
    }
}
