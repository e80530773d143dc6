//! TOML schema definitions for resolint.toml

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::resolve::{FragmentSpec, RuleSetting, Severity};

/// Root structure for resolint.toml
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ResolintToml {
    /// Shared rule-set presets, spliced ahead of the local fragments
    #[serde(default)]
    pub extends: Vec<String>,

    /// File-walking options
    #[serde(default)]
    pub walk: WalkSection,

    /// Ordered local fragments (`[[fragment]]` tables)
    #[serde(default, rename = "fragment")]
    pub fragments: Vec<FragmentTable>,
}

/// `[walk]` section in resolint.toml
#[derive(Debug, Default, Clone, Deserialize)]
pub struct WalkSection {
    /// Skip hidden files and directories (default: true)
    pub skip_hidden: Option<bool>,

    /// Respect .gitignore files (default: true)
    pub follow_gitignore: Option<bool>,
}

/// One `[[fragment]]` table.
///
/// Table order in the file is the override order.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FragmentTable {
    /// Glob patterns this fragment applies to; omitted = every file
    pub files: Option<Vec<String>>,

    /// Glob patterns excluded from all rule evaluation
    #[serde(default)]
    pub ignores: Vec<String>,

    /// Rule identifier to setting
    #[serde(default)]
    pub rules: BTreeMap<String, RuleEntry>,
}

impl FragmentTable {
    /// Convert into an uncompiled fragment carrying a source label for
    /// audit output.
    pub fn into_spec(self, source: String) -> FragmentSpec {
        FragmentSpec {
            source,
            files: self.files,
            ignores: self.ignores,
            rules: self
                .rules
                .into_iter()
                .map(|(rule, entry)| (rule, entry.into()))
                .collect(),
        }
    }
}

/// A rule setting as written in TOML: a bare severity string, or a
/// `[severity, options]` pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RuleEntry {
    Bare(Severity),
    WithOptions(Severity, toml::Value),
}

impl From<RuleEntry> for RuleSetting {
    fn from(entry: RuleEntry) -> Self {
        match entry {
            RuleEntry::Bare(severity) => RuleSetting::bare(severity),
            RuleEntry::WithOptions(severity, options) => {
                RuleSetting::with_options(severity, options)
            }
        }
    }
}
