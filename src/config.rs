use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;

/// Name of the per-project configuration file looked up in the scan root.
pub const CONFIG_FILE_NAME: &str = "import-graph.toml";

const DEFAULT_INCLUDE_DIR: &str = "(src|pages)";
const DEFAULT_INCLUDE_FILE: &str = r"\.(t|j)sx?$";

/// Configuration loaded from `import-graph.toml`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ImportGraphConfig {
    /// Base directory to scan, relative to the config file's directory.
    pub root: Option<PathBuf>,
    /// Regex a directory's root-relative path must match to be descended into.
    pub include_dir: String,
    /// Regex a file's root-relative path must match to be indexed.
    pub include_file: String,
    /// Whether files directly under the root are indexed.
    pub include_root: bool,
    /// Additional glob patterns to exclude from indexing.
    pub exclude: Option<Vec<String>>,
    /// Specifier prefix rewrites, e.g. `"@/" = "src/"`.
    pub aliases: BTreeMap<String, String>,
}

impl Default for ImportGraphConfig {
    fn default() -> Self {
        Self {
            root: None,
            include_dir: DEFAULT_INCLUDE_DIR.to_owned(),
            include_file: DEFAULT_INCLUDE_FILE.to_owned(),
            include_root: false,
            exclude: None,
            aliases: BTreeMap::new(),
        }
    }
}

impl ImportGraphConfig {
    /// Load configuration from `import-graph.toml` in the given root directory.
    ///
    /// Returns a default configuration if the file does not exist or cannot be parsed.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_file(&config_path) {
            Ok(config) => config,
            Err(err) => {
                warn!("{err}. Using defaults.");
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit file. Unlike [`ImportGraphConfig::load`],
    /// a missing or malformed file is an error.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str::<Self>(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Compile the inclusion patterns into [`ScanRules`].
    pub fn scan_rules(&self) -> Result<ScanRules, ConfigError> {
        Ok(ScanRules {
            include_dir: compile("include_dir", &self.include_dir)?,
            include_file: compile("include_file", &self.include_file)?,
            include_root: self.include_root,
            exclude: self
                .exclude
                .iter()
                .flatten()
                .map(|pattern| {
                    glob::Pattern::new(pattern).map_err(|source| ConfigError::Glob {
                        pattern: pattern.clone(),
                        source,
                    })
                })
                .collect::<Result<_, _>>()?,
        })
    }
}

fn compile(option: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::Pattern {
        option,
        pattern: pattern.to_owned(),
        source,
    })
}

/// Compiled directory/file inclusion rules used by the scanner.
#[derive(Debug, Clone)]
pub struct ScanRules {
    pub include_dir: Regex,
    pub include_file: Regex,
    pub include_root: bool,
    pub exclude: Vec<glob::Pattern>,
}

impl Default for ScanRules {
    fn default() -> Self {
        ImportGraphConfig::default()
            .scan_rules()
            .expect("default patterns are valid")
    }
}
