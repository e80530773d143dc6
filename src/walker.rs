use ignore::WalkBuilder;
use std::io;
use std::path::PathBuf;

use crate::config::WalkConfig;

/// Walk paths and yield target file paths according to the walk options.
///
/// Output is sorted so reports and diffs are stable across runs.
pub fn walk_paths(
    paths: &[String],
    config: &WalkConfig,
) -> impl Iterator<Item = io::Result<PathBuf>> {
    let mut files = vec![];
    let mut errors = vec![];

    for path in paths {
        let walker = WalkBuilder::new(path)
            .hidden(config.skip_hidden)
            .git_ignore(config.follow_gitignore)
            .git_global(config.follow_gitignore)
            .git_exclude(config.follow_gitignore)
            .build();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                        files.push(strip_current_dir(entry.into_path()));
                    }
                }
                Err(e) => {
                    errors.push(io::Error::other(e.to_string()));
                }
            }
        }
    }

    files.sort();
    errors.into_iter().map(Err).chain(files.into_iter().map(Ok))
}

/// Drop a leading `./` component so fragment patterns like `src/*.rs` match
/// targets walked from `.`.
fn strip_current_dir(path: PathBuf) -> PathBuf {
    match path.strip_prefix(".") {
        Ok(stripped) if !stripped.as_os_str().is_empty() => stripped.to_path_buf(),
        _ => path,
    }
}
