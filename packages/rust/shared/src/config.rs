//! Application configuration for the Lattes parser.
//!
//! User config lives at `~/.lattes/lattes.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LattesError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "lattes.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".lattes";

// ---------------------------------------------------------------------------
// Config structs (matching lattes.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Keyword extraction settings.
    #[serde(default)]
    pub keywords: KeywordsConfig,

    /// Batch parsing settings.
    #[serde(default)]
    pub batch: BatchConfig,

    /// Report output settings.
    #[serde(default)]
    pub reports: ReportsConfig,
}

/// `[keywords]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordsConfig {
    /// How many ranked keywords go into the researcher report.
    #[serde(default = "default_top")]
    pub top: usize,

    /// Built-in stopword lists to union (`english`, `portuguese`).
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Extra newline-separated stopword files.
    #[serde(default)]
    pub stopword_files: Vec<PathBuf>,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            top: default_top(),
            languages: default_languages(),
            stopword_files: Vec::new(),
        }
    }
}

fn default_top() -> usize {
    20
}
fn default_languages() -> Vec<String> {
    vec!["english".into(), "portuguese".into()]
}

/// `[batch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Documents parsed at the same time.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// File extension that marks a curriculum document in a directory.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            extension: default_extension(),
        }
    }
}

fn default_concurrency() -> usize {
    4
}
fn default_extension() -> String {
    "html".into()
}

/// Output format for tabular reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Markdown,
}

impl ReportFormat {
    /// File extension conventionally used for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// `[reports]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Directory reports are written into when no explicit path is given.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Default report format.
    #[serde(default)]
    pub format: ReportFormat,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: ReportFormat::default(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.lattes/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LattesError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.lattes/lattes.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LattesError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| LattesError::config(format!("failed to parse {}: {e}", path.display())))?;

    if config.batch.concurrency == 0 {
        return Err(LattesError::config("batch.concurrency must be at least 1"));
    }
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| LattesError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LattesError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LattesError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
