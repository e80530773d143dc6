//! Configuration file support for resolint.
//!
//! This module provides:
//! - Loading the fragment sequence from `resolint.toml`
//! - Config file discovery (search upward from current directory)
//! - Splicing shared rule-set presets named in `extends`
//! - Merging CLI args, config file, and defaults for walk options
//! - Template generation with `--init`

mod file;
mod init;
mod merge;
mod preset;
mod toml_schema;

pub use file::{assemble_fragments, find_config_file, find_file_upward, load_config, ConfigError};
pub use init::{generate_init_file, generate_init_file_in, RESOLINT_TOML_TEMPLATE};
pub use merge::{merge_walk_config, CliWalkOptions, WalkConfig};
pub use preset::{Preset, PRESET_NAMES};
pub use toml_schema::{FragmentTable, ResolintToml, RuleEntry, WalkSection};
