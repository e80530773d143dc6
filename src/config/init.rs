//! Template generation for `--init` command

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Template resolint.toml with documentation
pub const RESOLINT_TOML_TEMPLATE: &str = r#"# resolint.toml - Lint configuration for resolint
# https://github.com/resolint/resolint
#
# Configuration is an ordered list of fragments. Fragments are applied in
# order, and later fragments override earlier ones per rule. Presets named
# in `extends` are spliced ahead of the fragments below.

extends = ["core/base"]

[walk]
# Skip hidden files and directories.
# Default: true
# skip_hidden = true

# Respect .gitignore files when walking targets.
# Default: true
# follow_gitignore = true

# Paths matching an ignore pattern (or inside a matching directory) are
# excluded from all rule evaluation.
[[fragment]]
ignores = ["**/dist", "**/node_modules"]

# Rules apply to files matching `files`; omit `files` to apply everywhere.
# A setting is a severity ("off", "warn", "error") or [severity, options].
[[fragment]]
files = ["**/*.rs"]

[fragment.rules]
"no-debug-print" = "warn"
"max-line-length" = ["warn", { max = 120 }]

# Override or add rules here
[[fragment]]

[fragment.rules]
"#;

/// Generate resolint.toml in the specified directory (or current directory
/// if None).
///
/// Returns an error if resolint.toml already exists.
pub fn generate_init_file_in(dir: Option<&Path>) -> io::Result<PathBuf> {
    let path = dir.map_or_else(|| PathBuf::from("resolint.toml"), |d| d.join("resolint.toml"));

    if path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "resolint.toml already exists",
        ));
    }

    fs::write(&path, RESOLINT_TOML_TEMPLATE)?;
    Ok(path)
}

/// Generate resolint.toml in the current directory.
///
/// Returns an error if resolint.toml already exists.
pub fn generate_init_file() -> io::Result<PathBuf> {
    generate_init_file_in(None)
}
