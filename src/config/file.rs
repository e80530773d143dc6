//! Config file discovery, loading, and fragment assembly

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::resolve::{ConfigurationError, FragmentSpec};

use super::preset::{Preset, PRESET_NAMES};
use super::toml_schema::ResolintToml;

/// Error type for configuration loading and validation
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading the file
    Io(io::Error),
    /// TOML parsing error
    Parse(toml::de::Error),
    /// `extends` names a preset that does not exist
    UnknownPreset(String),
    /// A fragment failed resolver validation (bad glob or rule identifier)
    Invalid(ConfigurationError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config file: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse config file: {e}"),
            ConfigError::UnknownPreset(name) => write!(
                f,
                "unknown preset `{name}` in extends (known presets: {})",
                PRESET_NAMES.join(", ")
            ),
            ConfigError::Invalid(e) => write!(f, "invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::UnknownPreset(_) => None,
            ConfigError::Invalid(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<ConfigurationError> for ConfigError {
    fn from(e: ConfigurationError) -> Self {
        ConfigError::Invalid(e)
    }
}

/// Search upward from `start_dir` for a file with the given name.
///
/// If `stop_at_git_root` is true, stops searching when a `.git` directory is
/// found. Returns `None` if the file is not found.
pub fn find_file_upward(
    start_dir: &Path,
    filename: &str,
    stop_at_git_root: bool,
) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let file_path = current.join(filename);
        if file_path.exists() {
            return Some(file_path);
        }

        if stop_at_git_root && current.join(".git").exists() {
            return None;
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Find resolint.toml by searching upward from the given directory.
///
/// Stops at the first `resolint.toml` found, or at the git repository root
/// (directory containing `.git`), whichever comes first.
///
/// Returns `None` if no config file is found.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    find_file_upward(start_dir, "resolint.toml", true)
}

/// Load and parse resolint.toml from the given path.
pub fn load_config(path: &Path) -> Result<ResolintToml, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ResolintToml = toml::from_str(&content)?;
    Ok(config)
}

/// Build the ordered fragment sequence from a parsed config: preset
/// fragments named in `extends` first (in `extends` order), then the local
/// `[[fragment]]` tables in file order.
pub fn assemble_fragments(config: ResolintToml) -> Result<Vec<FragmentSpec>, ConfigError> {
    let ResolintToml {
        extends, fragments, ..
    } = config;

    let mut specs = vec![];

    for name in extends {
        let preset =
            Preset::parse(&name).ok_or_else(|| ConfigError::UnknownPreset(name.clone()))?;
        specs.extend(preset.fragments());
    }

    for (idx, table) in fragments.into_iter().enumerate() {
        specs.push(table.into_spec(format!("fragment {}", idx + 1)));
    }

    Ok(specs)
}
