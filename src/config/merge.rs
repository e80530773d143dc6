//! Walk-option merging
//!
//! Priority: CLI args > resolint.toml > defaults

use super::toml_schema::WalkSection;

/// Effective file-walking options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkConfig {
    /// Skip hidden files and directories
    pub skip_hidden: bool,
    /// Respect .gitignore files
    pub follow_gitignore: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            skip_hidden: true,
            follow_gitignore: true,
        }
    }
}

/// CLI options that can override config file settings.
///
/// Uses `Option<T>` to distinguish "not specified" from "explicitly set".
#[derive(Debug, Default)]
pub struct CliWalkOptions {
    /// If Some(true), include hidden files (inverted in config)
    pub hidden: Option<bool>,
    /// If Some(true), do not read .gitignore files (inverted in config)
    pub no_gitignore: Option<bool>,
}

/// Merge walk options from CLI, TOML, and defaults.
///
/// Priority: CLI > TOML > defaults
pub fn merge_walk_config(cli: &CliWalkOptions, toml: Option<&WalkSection>) -> WalkConfig {
    let defaults = WalkConfig::default();

    WalkConfig {
        skip_hidden: cli
            .hidden
            .map(|include| !include)
            .or_else(|| toml.and_then(|t| t.skip_hidden))
            .unwrap_or(defaults.skip_hidden),
        follow_gitignore: cli
            .no_gitignore
            .map(|no| !no)
            .or_else(|| toml.and_then(|t| t.follow_gitignore))
            .unwrap_or(defaults.follow_gitignore),
    }
}
