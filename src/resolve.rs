//! Effective configuration resolution over an ordered fragment sequence.
//!
//! A [`Resolver`] is built once from a list of [`FragmentSpec`]s (glob
//! patterns are compiled and rule identifiers validated at that point) and
//! then answers, per target path, which rule settings apply. Later fragments
//! override earlier ones per rule identifier; ignore patterns exclude a path
//! from all rule evaluation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Rule identifiers are lowercase kebab-case segments, optionally namespaced:
/// `final-newline`, `core/no-debug-print`.
const RULE_ID_PATTERN: &str = r"^[a-z0-9][a-z0-9_-]*(/[a-z0-9][a-z0-9_-]*)*$";

/// Severity token for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Off,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule setting: a severity plus optional structured options.
///
/// Options are opaque to the resolver. On override they are replaced
/// wholesale, never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetting {
    pub severity: Severity,
    pub options: Option<toml::Value>,
}

impl RuleSetting {
    pub fn bare(severity: Severity) -> Self {
        Self {
            severity,
            options: None,
        }
    }

    pub fn with_options(severity: Severity, options: toml::Value) -> Self {
        Self {
            severity,
            options: Some(options),
        }
    }
}

impl fmt::Display for RuleSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.options {
            None => write!(f, "{}", self.severity),
            Some(options) => write!(f, "{} {}", self.severity, format_options(options)),
        }
    }
}

/// Render a rule's options value on a single line, inline-table style.
fn format_options(value: &toml::Value) -> String {
    match value {
        toml::Value::Table(table) => {
            let fields: Vec<String> = table
                .iter()
                .map(|(k, v)| format!("{k} = {}", format_options(v)))
                .collect();
            format!("{{ {} }}", fields.join(", "))
        }
        toml::Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(format_options).collect();
            format!("[{}]", rendered.join(", "))
        }
        toml::Value::String(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}

/// One uncompiled configuration fragment.
///
/// `files` of `None` means the fragment applies to every path. Order of
/// fragments is significant; order of rules within a fragment is not.
#[derive(Debug, Clone, Default)]
pub struct FragmentSpec {
    /// Where the fragment came from, for audit output ("core/base",
    /// "fragment 2", ...).
    pub source: String,
    pub files: Option<Vec<String>>,
    pub ignores: Vec<String>,
    pub rules: BTreeMap<String, RuleSetting>,
}

/// Construction-time validation failure for a fragment sequence.
#[derive(Debug)]
pub enum ConfigurationError {
    /// A glob pattern failed to compile.
    Glob {
        pattern: String,
        source: globset::Error,
    },
    /// A rule identifier is not lowercase kebab-case (optionally namespaced).
    RuleId(String),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::Glob { pattern, source } => {
                write!(f, "invalid glob pattern `{pattern}`: {source}")
            }
            ConfigurationError::RuleId(rule) => {
                write!(f, "invalid rule identifier `{rule}`")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigurationError::Glob { source, .. } => Some(source),
            ConfigurationError::RuleId(_) => None,
        }
    }
}

/// A fragment with its glob patterns compiled.
#[derive(Debug, Clone)]
struct Fragment {
    source: String,
    files: Option<GlobSet>,
    ignores: GlobSet,
    rules: BTreeMap<String, RuleSetting>,
}

impl Fragment {
    fn applies_to(&self, path: &Path) -> bool {
        match &self.files {
            None => true,
            Some(set) => set.is_match(path),
        }
    }
}

/// A rule entry in an [`EffectiveConfig`], with the fragment that set it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRule {
    pub setting: RuleSetting,
    /// Index of the winning fragment in the resolver's sequence.
    pub fragment: usize,
    /// Source label of the winning fragment.
    pub source: String,
}

/// One step in a rule's override trail.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    pub fragment: usize,
    pub source: String,
    pub setting: RuleSetting,
}

/// The fully resolved rule mapping for one target path.
///
/// Rules iterate sorted by identifier, so rendering is deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectiveConfig {
    rules: BTreeMap<String, ResolvedRule>,
    ignored: bool,
}

impl EffectiveConfig {
    fn ignored() -> Self {
        Self {
            rules: BTreeMap::new(),
            ignored: true,
        }
    }

    /// True when an ignore pattern excluded the path entirely.
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn get(&self, rule: &str) -> Option<&ResolvedRule> {
        self.rules.get(rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedRule)> {
        self.rules.iter().map(|(rule, entry)| (rule.as_str(), entry))
    }

    /// Count rules at (error, warn, off).
    pub fn severity_counts(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for entry in self.rules.values() {
            match entry.setting.severity {
                Severity::Error => counts.0 += 1,
                Severity::Warn => counts.1 += 1,
                Severity::Off => counts.2 += 1,
            }
        }
        counts
    }
}

/// Resolves effective configurations from a validated fragment sequence.
///
/// Construction compiles every glob and validates every rule identifier, so
/// resolution itself cannot fail. `resolve` reads no external state and may
/// be called concurrently.
#[derive(Debug, Clone)]
pub struct Resolver {
    fragments: Vec<Fragment>,
}

impl Resolver {
    pub fn new(specs: Vec<FragmentSpec>) -> Result<Self, ConfigurationError> {
        // Known-good literal pattern.
        let rule_id = Regex::new(RULE_ID_PATTERN).unwrap();

        let mut fragments = Vec::with_capacity(specs.len());
        for spec in specs {
            for rule in spec.rules.keys() {
                if !rule_id.is_match(rule) {
                    return Err(ConfigurationError::RuleId(rule.clone()));
                }
            }

            let files = match spec.files {
                None => None,
                Some(patterns) => Some(compile_globs(&patterns)?),
            };
            let ignores = compile_globs(&spec.ignores)?;

            fragments.push(Fragment {
                source: spec.source,
                files,
                ignores,
                rules: spec.rules,
            });
        }

        Ok(Self { fragments })
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Number of distinct rule identifiers across all fragments.
    pub fn distinct_rule_count(&self) -> usize {
        self.fragments
            .iter()
            .flat_map(|f| f.rules.keys())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Compute the effective configuration for one target path.
    ///
    /// Fragments are visited in sequence order. An ignore match (on the path
    /// or any ancestor directory) short-circuits to an empty configuration;
    /// otherwise each applicable fragment's rules merge in with
    /// last-writer-wins per rule identifier.
    pub fn resolve(&self, path: &Path) -> EffectiveConfig {
        let mut rules: BTreeMap<String, ResolvedRule> = BTreeMap::new();

        for (idx, fragment) in self.fragments.iter().enumerate() {
            if ignored_by(&fragment.ignores, path) {
                return EffectiveConfig::ignored();
            }
            if !fragment.applies_to(path) {
                continue;
            }
            for (rule, setting) in &fragment.rules {
                rules.insert(
                    rule.clone(),
                    ResolvedRule {
                        setting: setting.clone(),
                        fragment: idx,
                        source: fragment.source.clone(),
                    },
                );
            }
        }

        EffectiveConfig {
            rules,
            ignored: false,
        }
    }

    /// The override trail for one rule on one path: every applicable fragment
    /// that sets the rule, in sequence order. The last entry is the winner.
    /// Empty for ignored paths.
    pub fn trace(&self, path: &Path, rule: &str) -> Vec<TraceEntry> {
        let mut trail = vec![];

        for (idx, fragment) in self.fragments.iter().enumerate() {
            if ignored_by(&fragment.ignores, path) {
                return vec![];
            }
            if !fragment.applies_to(path) {
                continue;
            }
            if let Some(setting) = fragment.rules.get(rule) {
                trail.push(TraceEntry {
                    fragment: idx,
                    source: fragment.source.clone(),
                    setting: setting.clone(),
                });
            }
        }

        trail
    }
}

fn compile_globs(patterns: &[String]) -> Result<GlobSet, ConfigurationError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigurationError::Glob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigurationError::Glob {
        pattern: patterns.join(", "),
        source,
    })
}

/// Ignore patterns exclude directories as well as files: `**/dist` must
/// exclude `dist/x.js`. Test the path and each ancestor against the set.
fn ignored_by(ignores: &GlobSet, path: &Path) -> bool {
    if ignores.is_empty() {
        return false;
    }

    let mut current = Some(path);
    while let Some(p) = current {
        if p.as_os_str().is_empty() {
            break;
        }
        if ignores.is_match(p) {
            return true;
        }
        current = p.parent();
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(entries: &[(&str, Severity)]) -> BTreeMap<String, RuleSetting> {
        entries
            .iter()
            .map(|(rule, severity)| (rule.to_string(), RuleSetting::bare(*severity)))
            .collect()
    }

    fn frag(files: Option<&[&str]>, entries: &[(&str, Severity)]) -> FragmentSpec {
        FragmentSpec {
            source: "test".into(),
            files: files.map(|pats| pats.iter().map(|p| p.to_string()).collect()),
            ignores: vec![],
            rules: rules(entries),
        }
    }

    fn ignore_frag(patterns: &[&str]) -> FragmentSpec {
        FragmentSpec {
            source: "test".into(),
            files: None,
            ignores: patterns.iter().map(|p| p.to_string()).collect(),
            rules: BTreeMap::new(),
        }
    }

    #[test]
    fn test_empty_fragment_sequence_yields_empty_config() {
        let resolver = Resolver::new(vec![]).unwrap();
        let effective = resolver.resolve(Path::new("a.ts"));

        assert!(effective.is_empty());
        assert!(!effective.is_ignored());
    }

    #[test]
    fn test_unmatched_path_yields_empty_config() {
        let resolver = Resolver::new(vec![frag(
            Some(&["**/*.tsx"]),
            &[("no-unused-vars", Severity::Error)],
        )])
        .unwrap();

        let effective = resolver.resolve(Path::new("a.ts"));
        assert!(effective.is_empty());
    }

    #[test]
    fn test_later_fragment_overrides_earlier() {
        let resolver = Resolver::new(vec![
            frag(Some(&["**/*.ts"]), &[("no-unused-vars", Severity::Error)]),
            frag(Some(&["**/*.ts"]), &[("no-unused-vars", Severity::Off)]),
        ])
        .unwrap();

        let effective = resolver.resolve(Path::new("a.ts"));
        assert_eq!(effective.len(), 1);
        assert_eq!(
            effective.get("no-unused-vars").unwrap().setting.severity,
            Severity::Off
        );
        assert_eq!(effective.get("no-unused-vars").unwrap().fragment, 1);
    }

    #[test]
    fn test_ignore_dominates_other_fragments() {
        let resolver = Resolver::new(vec![
            ignore_frag(&["**/dist"]),
            frag(None, &[("no-eval", Severity::Error)]),
        ])
        .unwrap();

        let effective = resolver.resolve(Path::new("dist/x.js"));
        assert!(effective.is_empty());
        assert!(effective.is_ignored());
    }

    #[test]
    fn test_ignore_in_later_fragment_still_dominates() {
        let resolver = Resolver::new(vec![
            frag(None, &[("no-eval", Severity::Error)]),
            ignore_frag(&["**/generated"]),
        ])
        .unwrap();

        let effective = resolver.resolve(Path::new("generated/out.rs"));
        assert!(effective.is_empty());
        assert!(effective.is_ignored());
    }

    #[test]
    fn test_patternless_fragment_applies_universally() {
        let resolver = Resolver::new(vec![
            frag(None, &[("a", Severity::Error)]),
            frag(Some(&["**/*.tsx"]), &[("b", Severity::Warn)]),
        ])
        .unwrap();

        let effective = resolver.resolve(Path::new("x.ts"));
        assert_eq!(effective.len(), 1);
        assert_eq!(effective.get("a").unwrap().setting.severity, Severity::Error);
        assert!(effective.get("b").is_none());
    }

    #[test]
    fn test_specific_fragment_overrides_universal() {
        let resolver = Resolver::new(vec![
            frag(None, &[("max-line-length", Severity::Error)]),
            frag(Some(&["**/*.md"]), &[("max-line-length", Severity::Off)]),
        ])
        .unwrap();

        let effective = resolver.resolve(Path::new("docs/notes.md"));
        assert_eq!(
            effective.get("max-line-length").unwrap().setting.severity,
            Severity::Off
        );

        let effective = resolver.resolve(Path::new("src/lib.rs"));
        assert_eq!(
            effective.get("max-line-length").unwrap().setting.severity,
            Severity::Error
        );
    }

    #[test]
    fn test_empty_rule_fragment_is_noop_layer() {
        let resolver = Resolver::new(vec![
            frag(None, &[("a", Severity::Warn)]),
            frag(Some(&["**/*.rs"]), &[]),
        ])
        .unwrap();

        let effective = resolver.resolve(Path::new("src/lib.rs"));
        assert_eq!(effective.len(), 1);
        assert_eq!(effective.get("a").unwrap().setting.severity, Severity::Warn);
    }

    #[test]
    fn test_options_replaced_wholesale_on_override() {
        let old: toml::Value = toml::from_str("max = 120\ntabs = true").unwrap();
        let new: toml::Value = toml::from_str("max = 80").unwrap();

        let mut first = frag(None, &[]);
        first
            .rules
            .insert("max-line-length".into(), RuleSetting::with_options(Severity::Warn, old));
        let mut second = frag(None, &[]);
        second
            .rules
            .insert("max-line-length".into(), RuleSetting::with_options(Severity::Error, new.clone()));

        let resolver = Resolver::new(vec![first, second]).unwrap();
        let effective = resolver.resolve(Path::new("a.rs"));
        let resolved = effective.get("max-line-length").unwrap();

        // No deep merge: the winning options carry no trace of `tabs`.
        assert_eq!(resolved.setting.options, Some(new));
        assert_eq!(resolved.setting.severity, Severity::Error);
    }

    #[test]
    fn test_severity_only_override_drops_options() {
        let options: toml::Value = toml::from_str("max = 120").unwrap();

        let mut first = frag(None, &[]);
        first
            .rules
            .insert("max-line-length".into(), RuleSetting::with_options(Severity::Warn, options));
        let second = frag(None, &[("max-line-length", Severity::Error)]);

        let resolver = Resolver::new(vec![first, second]).unwrap();
        let effective = resolver.resolve(Path::new("a.rs"));

        assert_eq!(effective.get("max-line-length").unwrap().setting.options, None);
    }

    #[test]
    fn test_repeated_resolution_is_identical() {
        let resolver = Resolver::new(vec![
            frag(None, &[("a", Severity::Error), ("b", Severity::Warn)]),
            frag(Some(&["**/*.ts"]), &[("a", Severity::Off)]),
        ])
        .unwrap();

        let first = resolver.resolve(Path::new("x.ts"));
        let second = resolver.resolve(Path::new("x.ts"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_ignore_matches_ancestor_directories() {
        let resolver = Resolver::new(vec![
            ignore_frag(&["**/node_modules"]),
            frag(None, &[("a", Severity::Error)]),
        ])
        .unwrap();

        assert!(resolver
            .resolve(Path::new("node_modules/pkg/index.js"))
            .is_ignored());
        assert!(resolver
            .resolve(Path::new("apps/web/node_modules/pkg/index.js"))
            .is_ignored());
        assert!(!resolver.resolve(Path::new("apps/web/index.js")).is_ignored());
    }

    #[test]
    fn test_invalid_glob_fails_at_construction() {
        let mut spec = frag(None, &[("a", Severity::Error)]);
        spec.files = Some(vec!["src/[".into()]);

        let err = Resolver::new(vec![spec]).unwrap_err();
        assert!(matches!(err, ConfigurationError::Glob { .. }));
    }

    #[test]
    fn test_invalid_ignore_glob_fails_at_construction() {
        let mut spec = ignore_frag(&[]);
        spec.ignores = vec!["{unclosed".into()];

        let err = Resolver::new(vec![spec]).unwrap_err();
        assert!(matches!(err, ConfigurationError::Glob { .. }));
    }

    #[test]
    fn test_invalid_rule_id_fails_at_construction() {
        let spec = frag(None, &[("Not A Rule!", Severity::Error)]);

        let err = Resolver::new(vec![spec]).unwrap_err();
        assert!(matches!(err, ConfigurationError::RuleId(_)));
    }

    #[test]
    fn test_namespaced_rule_ids_accepted() {
        let spec = frag(
            None,
            &[("core/no-debug-print", Severity::Warn), ("final-newline", Severity::Error)],
        );
        assert!(Resolver::new(vec![spec]).is_ok());
    }

    #[test]
    fn test_trace_records_override_trail_in_order() {
        let resolver = Resolver::new(vec![
            frag(None, &[("a", Severity::Error)]),
            frag(Some(&["**/*.ts"]), &[("a", Severity::Warn)]),
            frag(Some(&["**/*.tsx"]), &[("a", Severity::Off)]),
        ])
        .unwrap();

        let trail = resolver.trace(Path::new("x.ts"), "a");
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].fragment, 0);
        assert_eq!(trail[0].setting.severity, Severity::Error);
        assert_eq!(trail[1].fragment, 1);
        assert_eq!(trail[1].setting.severity, Severity::Warn);

        // The trail winner matches resolve().
        let effective = resolver.resolve(Path::new("x.ts"));
        assert_eq!(
            effective.get("a").unwrap().setting,
            trail.last().unwrap().setting
        );
    }

    #[test]
    fn test_trace_empty_for_ignored_path() {
        let resolver = Resolver::new(vec![
            frag(None, &[("a", Severity::Error)]),
            ignore_frag(&["**/vendor"]),
        ])
        .unwrap();

        assert!(resolver.trace(Path::new("vendor/lib.js"), "a").is_empty());
    }

    #[test]
    fn test_severity_counts() {
        let resolver = Resolver::new(vec![frag(
            None,
            &[
                ("a", Severity::Error),
                ("b", Severity::Error),
                ("c", Severity::Warn),
                ("d", Severity::Off),
            ],
        )])
        .unwrap();

        let effective = resolver.resolve(Path::new("x.rs"));
        assert_eq!(effective.severity_counts(), (2, 1, 1));
    }

    #[test]
    fn test_distinct_rule_count_across_fragments() {
        let resolver = Resolver::new(vec![
            frag(None, &[("a", Severity::Error), ("b", Severity::Warn)]),
            frag(None, &[("b", Severity::Off), ("c", Severity::Error)]),
        ])
        .unwrap();

        assert_eq!(resolver.distinct_rule_count(), 3);
        assert_eq!(resolver.fragment_count(), 2);
    }

    #[test]
    fn test_rule_setting_display() {
        assert_eq!(RuleSetting::bare(Severity::Error).to_string(), "error");

        let options: toml::Value = toml::from_str("max = 120").unwrap();
        assert_eq!(
            RuleSetting::with_options(Severity::Warn, options).to_string(),
            "warn { max = 120 }"
        );
    }
}
