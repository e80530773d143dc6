//! Built-in shared rule-sets, spliced into the fragment sequence via
//! `extends`.
//!
//! A preset expands to one or more fragments that the resolver treats like
//! any other: later fragments (including the user's own) override them per
//! rule. `core/base` covers universal file hygiene, `core/style` layers
//! stylistic checks on top, and `core/strict` escalates for CI use.

use std::collections::BTreeMap;

use crate::resolve::{FragmentSpec, RuleSetting, Severity};

/// Available shared rule-set presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Universal file hygiene plus ignores for common build output
    Base,
    /// Stylistic checks layered over base concerns
    Style,
    /// Escalated severities and extra checks for CI
    Strict,
}

/// Known preset names, for error messages.
pub const PRESET_NAMES: &[&str] = &["core/base", "core/style", "core/strict"];

impl Preset {
    /// Parse a preset name from `extends`. The `core/` namespace prefix is
    /// optional.
    pub fn parse(name: &str) -> Option<Self> {
        match name.strip_prefix("core/").unwrap_or(name) {
            "base" => Some(Preset::Base),
            "style" => Some(Preset::Style),
            "strict" => Some(Preset::Strict),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Base => "core/base",
            Preset::Style => "core/style",
            Preset::Strict => "core/strict",
        }
    }

    /// Expand to the preset's fragments, in splice order.
    pub fn fragments(&self) -> Vec<FragmentSpec> {
        match self {
            Preset::Base => vec![
                FragmentSpec {
                    source: self.name().into(),
                    files: None,
                    ignores: vec![
                        "**/target".into(),
                        "**/node_modules".into(),
                        "**/dist".into(),
                    ],
                    rules: BTreeMap::new(),
                },
                FragmentSpec {
                    source: self.name().into(),
                    files: None,
                    ignores: vec![],
                    rules: table(&[
                        ("final-newline", bare(Severity::Error)),
                        ("no-trailing-whitespace", bare(Severity::Error)),
                        ("unix-line-endings", bare(Severity::Error)),
                        ("no-leading-blank-lines", bare(Severity::Warn)),
                        ("max-blank-lines", limit(Severity::Warn, 2)),
                    ]),
                },
            ],
            Preset::Style => vec![FragmentSpec {
                source: self.name().into(),
                files: None,
                ignores: vec![],
                rules: table(&[
                    ("no-fullwidth-space", bare(Severity::Warn)),
                    ("no-zero-width-chars", bare(Severity::Warn)),
                    ("no-code-fence-remnant", bare(Severity::Warn)),
                    ("max-line-length", limit(Severity::Warn, 100)),
                ]),
            }],
            Preset::Strict => vec![FragmentSpec {
                source: self.name().into(),
                files: None,
                ignores: vec![],
                rules: table(&[
                    ("no-todo", bare(Severity::Error)),
                    ("no-fixme", bare(Severity::Error)),
                    ("no-debug-print", bare(Severity::Error)),
                    ("no-secret-literal", bare(Severity::Error)),
                    ("max-blank-lines", limit(Severity::Error, 1)),
                    ("max-line-length", limit(Severity::Error, 120)),
                ]),
            }],
        }
    }
}

fn bare(severity: Severity) -> RuleSetting {
    RuleSetting::bare(severity)
}

/// A setting with a `{ max = n }` options table.
fn limit(severity: Severity, max: i64) -> RuleSetting {
    let mut options = toml::map::Map::new();
    options.insert("max".into(), toml::Value::Integer(max));
    RuleSetting::with_options(severity, toml::Value::Table(options))
}

fn table(entries: &[(&str, RuleSetting)]) -> BTreeMap<String, RuleSetting> {
    entries
        .iter()
        .map(|(rule, setting)| (rule.to_string(), setting.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Resolver;
    use std::path::Path;

    #[test]
    fn test_parse_known_presets() {
        assert_eq!(Preset::parse("core/base"), Some(Preset::Base));
        assert_eq!(Preset::parse("base"), Some(Preset::Base));
        assert_eq!(Preset::parse("core/style"), Some(Preset::Style));
        assert_eq!(Preset::parse("core/strict"), Some(Preset::Strict));
        assert_eq!(Preset::parse("core/unknown"), None);
        assert_eq!(Preset::parse(""), None);
    }

    #[test]
    fn test_preset_names_round_trip() {
        for name in PRESET_NAMES {
            let preset = Preset::parse(name).unwrap();
            assert_eq!(preset.name(), *name);
        }
    }

    #[test]
    fn test_base_expands_to_ignores_then_rules() {
        let fragments = Preset::Base.fragments();
        assert_eq!(fragments.len(), 2);
        assert!(!fragments[0].ignores.is_empty());
        assert!(fragments[0].rules.is_empty());
        assert!(fragments[1].ignores.is_empty());
        assert!(fragments[1].rules.contains_key("final-newline"));
    }

    #[test]
    fn test_every_preset_compiles() {
        for name in PRESET_NAMES {
            let fragments = Preset::parse(name).unwrap().fragments();
            assert!(Resolver::new(fragments).is_ok(), "preset {name} must compile");
        }
    }

    #[test]
    fn test_base_ignores_build_output() {
        let resolver = Resolver::new(Preset::Base.fragments()).unwrap();
        assert!(resolver.resolve(Path::new("target/debug/main.rs")).is_ignored());
        assert!(resolver
            .resolve(Path::new("web/node_modules/pkg/index.js"))
            .is_ignored());
        assert!(!resolver.resolve(Path::new("src/main.rs")).is_ignored());
    }

    #[test]
    fn test_strict_escalates_base_limits() {
        let mut fragments = Preset::Base.fragments();
        fragments.extend(Preset::Strict.fragments());
        let resolver = Resolver::new(fragments).unwrap();

        let effective = resolver.resolve(Path::new("src/main.rs"));
        let blank_lines = effective.get("max-blank-lines").unwrap();
        assert_eq!(blank_lines.setting.severity, Severity::Error);
        assert_eq!(
            blank_lines
                .setting
                .options
                .as_ref()
                .and_then(|v| v.get("max"))
                .and_then(|v| v.as_integer()),
            Some(1)
        );
    }
}
