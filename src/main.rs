use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use resolint::{
    assemble_fragments, find_config_file, generate_init_file, load_config, merge_walk_config,
    print_config_diff, render_effective, run, should_use_colors, CliWalkOptions, Config,
    ConfigError, OutputContext, OutputMode, ResolintToml, Resolver,
};

#[derive(Parser)]
#[command(name = "resolint")]
#[command(version, about = "A lint configuration resolver for flat-config fragments")]
struct Cli {
    /// Target files or directories
    #[arg(required_unless_present = "init")]
    paths: Vec<String>,

    /// Coverage check: exit 1 if any file has no applicable rules
    #[arg(short, long)]
    check: bool,

    /// Diff the effective configurations of exactly two paths
    #[arg(short, long)]
    diff: bool,

    /// Print the override trail for RULE instead of full reports
    #[arg(long, value_name = "RULE")]
    explain: Option<String>,

    /// Output only file paths
    #[arg(short, long)]
    quiet: bool,

    /// Also report ignored and covered files as they are classified
    #[arg(short, long)]
    verbose: bool,

    /// Include hidden files and directories
    #[arg(long)]
    hidden: bool,

    /// Do not read .gitignore files
    #[arg(long)]
    no_gitignore: bool,

    /// Force colored output
    #[arg(long)]
    color: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Generate a template resolint.toml configuration file
    #[arg(long)]
    init: bool,

    /// Specify config file path (overrides auto-discovery)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Handle --init command
    if cli.init {
        return handle_init();
    }

    // Load configuration; structural errors halt immediately
    let toml_config = match load_configuration(&cli.config, cli.quiet) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    // Merge walk options: CLI > TOML > defaults
    let walk = merge_walk_config(&build_walk_options(&cli), Some(&toml_config.walk));

    // Splice presets and compile the fragment sequence
    let resolver = match build_resolver(toml_config) {
        Ok(resolver) => resolver,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    if cli.diff {
        return handle_diff(&resolver, &cli.paths);
    }

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    let config = Config {
        check_only: cli.check,
        explain: cli.explain.clone(),
        output_mode,
        walk,
    };

    let use_colors = should_use_colors(cli.color, cli.no_color);
    let ctx = OutputContext::new(
        output_mode,
        use_colors,
        cli.verbose,
        !cli.no_progress && !cli.quiet,
    );

    match run(&resolver, &cli.paths, &config, &ctx) {
        Ok(result) => {
            if config.check_only && result.has_uncovered() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn handle_init() -> ExitCode {
    match generate_init_file() {
        Ok(path) => {
            println!("Created {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Diff the effective configurations of exactly two paths.
fn handle_diff(resolver: &Resolver, paths: &[String]) -> ExitCode {
    let [a, b] = paths else {
        eprintln!("Error: --diff requires exactly two paths");
        return ExitCode::from(1);
    };

    let rendered_a = render_effective(&resolver.resolve(Path::new(a)));
    let rendered_b = render_effective(&resolver.resolve(Path::new(b)));

    if rendered_a == rendered_b {
        println!("No differences in effective configuration");
    } else {
        print_config_diff(a, b, &rendered_a, &rendered_b);
    }

    ExitCode::SUCCESS
}

fn load_configuration(
    explicit_path: &Option<PathBuf>,
    quiet: bool,
) -> Result<ResolintToml, ConfigError> {
    if let Some(path) = explicit_path {
        let config = load_config(path)?;
        if !quiet {
            eprintln!("Using config: {}", path.display());
        }
        return Ok(config);
    }

    let discovered = std::env::current_dir()
        .ok()
        .and_then(|d| find_config_file(&d));

    match discovered {
        Some(path) => {
            let config = load_config(&path)?;
            if !quiet {
                eprintln!("Using config: {}", path.display());
            }
            Ok(config)
        }
        None => {
            if !quiet {
                eprintln!("No resolint.toml found, using the core/base preset");
            }
            Ok(ResolintToml {
                extends: vec!["core/base".into()],
                ..Default::default()
            })
        }
    }
}

fn build_resolver(toml_config: ResolintToml) -> Result<Resolver, ConfigError> {
    let specs = assemble_fragments(toml_config)?;
    Ok(Resolver::new(specs)?)
}

fn build_walk_options(cli: &Cli) -> CliWalkOptions {
    // Boolean flags in clap are always present (default false), so we
    // treat false as "not set" for proper merging with the config file.
    CliWalkOptions {
        hidden: cli.hidden.then_some(true),
        no_gitignore: cli.no_gitignore.then_some(true),
    }
}
