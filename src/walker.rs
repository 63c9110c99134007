use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ScanRules;
use crate::error::ScanError;
use crate::graph::node::to_slash;

/// Walk the scan root and collect candidate source files.
///
/// - Directories are descended into only when their root-relative path matches
///   `rules.include_dir`.
/// - Files must match `rules.include_file`; files directly under the root are
///   additionally gated by `rules.include_root`.
/// - Glob `rules.exclude` patterns drop matching files.
///
/// Entries are visited in lexical file-name order so repeated runs over the same
/// tree produce the same file list. Any traversal error aborts the scan.
pub fn walk_project(root: &Path, rules: &ScanRules) -> Result<Vec<PathBuf>, ScanError> {
    let dir_root = root.to_path_buf();
    let include_dir = rules.include_dir.clone();

    let walker = ignore::WalkBuilder::new(root)
        // Source trees are taken as-is: no .gitignore, hidden-file or parent filters.
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            if !is_dir || entry.depth() == 0 {
                return true;
            }
            let relative = entry.path().strip_prefix(&dir_root).unwrap_or(entry.path());
            include_dir.is_match(&to_slash(relative))
        })
        .build();

    let mut files = Vec::new();

    for result in walker {
        let entry = result.map_err(|source| ScanError::Walk {
            root: root.to_path_buf(),
            source,
        })?;

        if entry.depth() == 0 || entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        if entry.depth() == 1 && !rules.include_root {
            continue;
        }

        let path = entry.path();
        let relative = to_slash(path.strip_prefix(root).unwrap_or(path));
        if !rules.include_file.is_match(&relative) {
            continue;
        }

        if is_excluded_by_config(path, &rules.exclude) {
            continue;
        }

        debug!("scanned {}", relative);
        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Returns true if `path` matches any exclusion pattern from config.
fn is_excluded_by_config(path: &Path, patterns: &[glob::Pattern]) -> bool {
    let path_str = path.to_string_lossy();

    for matcher in patterns {
        if matcher.matches(&path_str) {
            return true;
        }
        // Also check if any component matches the pattern directly.
        for component in path.components() {
            if let Some(s) = component.as_os_str().to_str()
                && matcher.matches(s)
            {
                return true;
            }
        }
    }

    false
}
