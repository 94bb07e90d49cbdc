use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ImportError, Result};

/// Name of the configuration file stored inside the `.eventgraph` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Highest configuration schema version this build reads.
pub const CONFIG_VERSION: u32 = 1;

/// Name of the hidden directory holding importer settings.
pub const EVENTGRAPH_DIR: &str = ".eventgraph";

/// How much detail the text report prints per entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Short,
    Long,
}

/// Importer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// File path or URL imported when none is given on the command line.
    pub default_source: Option<String>,
    /// Maximum number of unresolved references tolerated before the import
    /// fails. `None` tolerates any number.
    pub max_unresolved: Option<usize>,
    /// Overall timeout for fetching a payload over HTTP, in seconds.
    pub fetch_timeout_secs: u64,
    /// Detail level of the text report.
    pub display: DisplayMode,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            default_source: None,
            max_unresolved: None,
            fetch_timeout_secs: 30,
            display: DisplayMode::Short,
        }
    }
}

/// Returns the path to the `.eventgraph` directory within the given root.
pub fn get_eventgraph_dir(root: &Path) -> PathBuf {
    root.join(EVENTGRAPH_DIR)
}

/// Returns the path to `config.json` within the `.eventgraph` directory.
pub fn get_config_path(root: &Path) -> PathBuf {
    get_eventgraph_dir(root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk, falling back to defaults when the file
/// does not exist.
///
/// A file written by a newer schema version is rejected rather than read
/// with fields silently dropped.
pub fn load_config(root: &Path) -> Result<ImporterConfig> {
    let config_path = get_config_path(root);

    let contents = match fs::read_to_string(&config_path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ImporterConfig::default()),
        Err(e) => return Err(config_error("cannot read", &config_path, e)),
    };

    let config: ImporterConfig = serde_json::from_str(&contents)
        .map_err(|e| config_error("cannot parse", &config_path, e))?;

    if config.version > CONFIG_VERSION {
        return Err(ImportError::Config {
            message: format!(
                "{} has version {}, this build understands up to {}",
                config_path.display(),
                config.version,
                CONFIG_VERSION
            ),
        });
    }

    Ok(config)
}

/// Saves the configuration to disk, creating `.eventgraph/` if needed.
///
/// The file is written next to its final location and renamed into place.
pub fn save_config(root: &Path, config: &ImporterConfig) -> Result<()> {
    let dir = get_eventgraph_dir(root);
    fs::create_dir_all(&dir).map_err(|e| config_error("cannot create", &dir, e))?;

    let config_path = get_config_path(root);
    let staged = config_path.with_extension("json.new");

    let json = serde_json::to_string_pretty(config)?;
    fs::write(&staged, json).map_err(|e| config_error("cannot write", &staged, e))?;
    fs::rename(&staged, &config_path).map_err(|e| config_error("cannot replace", &config_path, e))?;

    Ok(())
}

fn config_error(action: &str, path: &Path, err: impl fmt::Display) -> ImportError {
    ImportError::Config {
        message: format!("{} {}: {}", action, path.display(), err),
    }
}

/// Returns `true` when `source` should be fetched over HTTP rather than read
/// from disk.
pub fn is_remote_source(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
