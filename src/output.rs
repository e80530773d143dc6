use std::path::Path;

use similar::{ChangeTag, TextDiff};

use crate::colors::Colors;
use crate::config::WalkConfig;
use crate::resolve::{EffectiveConfig, TraceEntry};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Normal,
    Quiet,
}

/// Resolved run options.
pub struct Config {
    /// Coverage check: report files with no applicable rules, exit 1 if any
    pub check_only: bool,
    /// Print the override trail for this rule instead of full reports
    pub explain: Option<String>,
    pub output_mode: OutputMode,
    pub walk: WalkConfig,
}

pub struct OutputContext {
    pub mode: OutputMode,
    pub colors: Colors,
    pub verbose: bool,
    pub show_progress: bool,
}

impl OutputContext {
    pub fn new(mode: OutputMode, use_colors: bool, verbose: bool, show_progress: bool) -> Self {
        Self {
            mode,
            colors: Colors::new(use_colors),
            verbose,
            show_progress,
        }
    }
}

pub struct RunResult {
    pub files_resolved: usize,
    pub files_ignored: usize,
    pub files_uncovered: usize,
}

impl RunResult {
    pub fn has_uncovered(&self) -> bool {
        self.files_uncovered > 0
    }
}

/// Render an effective configuration as stable, diffable text: one
/// `rule = setting` line per rule, sorted by rule identifier.
pub fn render_effective(effective: &EffectiveConfig) -> String {
    if effective.is_ignored() {
        return "(ignored)\n".to_string();
    }

    let mut out = String::new();
    for (rule, resolved) in effective.iter() {
        out.push_str(&format!("{rule} = {}\n", resolved.setting));
    }
    out
}

pub fn print_file_report(path: &Path, effective: &EffectiveConfig, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        println!("{}", path.display());
        return;
    }

    let (errors, warns, offs) = effective.severity_counts();
    println!(
        "{}{}{}: {} rules ({} error, {} warn, {} off)",
        ctx.colors.info,
        path.display(),
        ctx.colors.reset(),
        effective.len(),
        errors,
        warns,
        offs
    );

    for (rule, resolved) in effective.iter() {
        println!(
            "  {}{}{}  {}  [{}]",
            ctx.colors.severity(resolved.setting.severity),
            resolved.setting,
            ctx.colors.reset(),
            rule,
            resolved.source
        );
    }
}

pub fn print_explain(path: &Path, rule: &str, trail: &[TraceEntry], ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        if !trail.is_empty() {
            println!("{}", path.display());
        }
        return;
    }

    if trail.is_empty() {
        println!(
            "{}: {}{rule} not configured{}",
            path.display(),
            ctx.colors.dim,
            ctx.colors.reset()
        );
        return;
    }

    println!("{}: {rule}", path.display());
    for (step, entry) in trail.iter().enumerate() {
        let marker = if step + 1 == trail.len() {
            "  <- effective"
        } else {
            ""
        };
        println!(
            "  fragment {} ({}): {}{}{}{marker}",
            entry.fragment,
            entry.source,
            ctx.colors.severity(entry.setting.severity),
            entry.setting,
            ctx.colors.reset()
        );
    }
}

pub fn print_ignored(path: &Path, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }
    println!(
        "{}Ignored:{} {}",
        ctx.colors.dim,
        ctx.colors.reset(),
        path.display()
    );
}

pub fn print_uncovered(path: &Path, config: &Config, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        println!("{}", path.display());
        return;
    }

    if config.check_only {
        println!(
            "{}Error:{} {} (no rules apply)",
            ctx.colors.error,
            ctx.colors.reset(),
            path.display()
        );
    } else {
        println!(
            "{}{}{}: no rules apply",
            ctx.colors.info,
            path.display(),
            ctx.colors.reset()
        );
    }
}

pub fn print_covered(path: &Path, effective: &EffectiveConfig, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet {
        return;
    }
    println!(
        "{}Covered:{} {} ({} rules)",
        ctx.colors.success,
        ctx.colors.reset(),
        path.display(),
        effective.len()
    );
}

/// Print a unified diff between two rendered effective configurations.
pub fn print_config_diff(label_a: &str, label_b: &str, rendered_a: &str, rendered_b: &str) {
    let diff = TextDiff::from_lines(rendered_a, rendered_b);

    println!("--- {label_a}");
    println!("+++ {label_b}");

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            println!();
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                print!("{sign}{change}");
            }
        }
    }
}

pub fn print_summary(result: &RunResult, config: &Config, ctx: &OutputContext) {
    if ctx.mode == OutputMode::Quiet || config.explain.is_some() {
        return;
    }

    if config.check_only {
        if result.files_uncovered > 0 {
            println!();
            println!(
                "{}{} files with no applicable rules{}",
                ctx.colors.error,
                result.files_uncovered,
                ctx.colors.reset()
            );
        }
        return;
    }

    println!();
    let mut parts = vec![format!(
        "{}{} files resolved{}",
        ctx.colors.success,
        result.files_resolved,
        ctx.colors.reset()
    )];
    if result.files_ignored > 0 {
        parts.push(format!(
            "{}{} ignored{}",
            ctx.colors.dim,
            result.files_ignored,
            ctx.colors.reset()
        ));
    }
    if result.files_uncovered > 0 {
        parts.push(format!(
            "{}{} uncovered{}",
            ctx.colors.warning,
            result.files_uncovered,
            ctx.colors.reset()
        ));
    }
    println!("{}", parts.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{FragmentSpec, Resolver, RuleSetting, Severity};
    use std::collections::BTreeMap;

    fn resolver(entries: &[(&str, Severity)]) -> Resolver {
        let rules: BTreeMap<String, RuleSetting> = entries
            .iter()
            .map(|(rule, severity)| (rule.to_string(), RuleSetting::bare(*severity)))
            .collect();
        Resolver::new(vec![FragmentSpec {
            source: "test".into(),
            files: None,
            ignores: vec![],
            rules,
        }])
        .unwrap()
    }

    #[test]
    fn test_render_effective_is_sorted_and_stable() {
        let resolver = resolver(&[("zeta", Severity::Warn), ("alpha", Severity::Error)]);
        let effective = resolver.resolve(Path::new("a.rs"));

        let rendered = render_effective(&effective);
        assert_eq!(rendered, "alpha = error\nzeta = warn\n");
        assert_eq!(rendered, render_effective(&effective));
    }

    #[test]
    fn test_render_effective_empty() {
        let resolver = resolver(&[]);
        let effective = resolver.resolve(Path::new("a.rs"));

        assert_eq!(render_effective(&effective), "");
    }

    #[test]
    fn test_render_effective_ignored() {
        let resolver = Resolver::new(vec![FragmentSpec {
            source: "test".into(),
            files: None,
            ignores: vec!["**/vendor".into()],
            rules: BTreeMap::new(),
        }])
        .unwrap();

        let effective = resolver.resolve(Path::new("vendor/x.js"));
        assert_eq!(render_effective(&effective), "(ignored)\n");
    }
}
