pub mod colors;
pub mod config;
mod output;
pub mod progress;
pub mod resolve;
pub mod walker;

pub use colors::{should_use_colors, Colors};
pub use config::{
    assemble_fragments, find_config_file, generate_init_file, load_config, merge_walk_config,
    CliWalkOptions, ConfigError, Preset, ResolintToml, WalkConfig, RESOLINT_TOML_TEMPLATE,
};
pub use output::{
    print_config_diff, render_effective, Config, OutputContext, OutputMode, RunResult,
};
pub use progress::ProgressReporter;
pub use resolve::{
    ConfigurationError, EffectiveConfig, FragmentSpec, ResolvedRule, Resolver, RuleSetting,
    Severity, TraceEntry,
};
pub use walker::walk_paths;

use std::io;
use std::path::Path;

/// Main entry point: resolve every file under the given paths and report.
pub fn run(
    resolver: &Resolver,
    paths: &[String],
    config: &Config,
    ctx: &OutputContext,
) -> io::Result<RunResult> {
    let mut result = RunResult {
        files_resolved: 0,
        files_ignored: 0,
        files_uncovered: 0,
    };

    // Count files for progress bar (2-pass approach)
    let file_count: u64 = walk_paths(paths, &config.walk).filter(|r| r.is_ok()).count() as u64;

    let progress = ProgressReporter::new(file_count, ctx.show_progress);

    for path in walk_paths(paths, &config.walk) {
        let path = path?;

        if let Some(name) = path.file_name() {
            progress.set_message(&name.to_string_lossy());
        }

        process_file(&path, resolver, config, &mut result, ctx);

        progress.inc();
    }

    progress.finish();

    output::print_summary(&result, config, ctx);

    Ok(result)
}

fn process_file(
    path: &Path,
    resolver: &Resolver,
    config: &Config,
    result: &mut RunResult,
    ctx: &OutputContext,
) {
    let effective = resolver.resolve(path);

    if effective.is_ignored() {
        result.files_ignored += 1;
        if ctx.verbose {
            output::print_ignored(path, ctx);
        }
        return;
    }

    if let Some(rule) = &config.explain {
        result.files_resolved += 1;
        let trail = resolver.trace(path, rule);
        output::print_explain(path, rule, &trail, ctx);
        return;
    }

    if effective.is_empty() {
        result.files_uncovered += 1;
        output::print_uncovered(path, config, ctx);
        return;
    }

    result.files_resolved += 1;

    if config.check_only {
        if ctx.verbose {
            output::print_covered(path, &effective, ctx);
        }
        return;
    }

    output::print_file_report(path, &effective, ctx);
}
