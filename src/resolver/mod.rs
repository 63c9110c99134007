use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::graph::node::{SourceFile, is_feature_segment, to_slash};

/// Turns raw module specifiers into canonical module ids.
///
/// Resolution is purely lexical: the file system is never consulted, so a
/// specifier pointing at a file that was not scanned still yields an id (and
/// later an edge that matches no node).
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    /// `/`-separated scan root with a trailing `/`.
    root_prefix: String,
    /// Specifier prefix → replacement, applied before anything else.
    aliases: BTreeMap<String, String>,
}

impl ModuleResolver {
    pub fn new(root: &Path, aliases: BTreeMap<String, String>) -> Self {
        let mut root_prefix = to_slash(root);
        if !root_prefix.ends_with('/') {
            root_prefix.push('/');
        }
        Self {
            root_prefix,
            aliases,
        }
    }

    /// Resolve `specifier` as written in `importer`.
    ///
    /// 1. Alias prefixes are rewritten to root-relative ids.
    /// 2. Relative specifiers (leading `.`) are joined with the importer's
    ///    directory and normalized, then the root prefix is stripped.
    /// 3. Anything else has the root prefix stripped if present and is
    ///    otherwise kept as an external package specifier.
    /// 4. A bare feature directory `src/<segment>` points at its `index` entry.
    pub fn resolve(&self, specifier: &str, importer: &SourceFile) -> String {
        let resolved = if let Some(aliased) = self.apply_alias(specifier) {
            aliased
        } else if specifier.starts_with('.') {
            let dir = importer.path.parent().unwrap_or(Path::new(""));
            let joined: PathBuf = dir.join(specifier).clean();
            self.strip_root(&to_slash(&joined))
        } else {
            self.strip_root(specifier)
        };

        if is_feature_dir(&resolved) {
            format!("{resolved}/index")
        } else {
            resolved
        }
    }

    /// Longest matching alias prefix wins.
    fn apply_alias(&self, specifier: &str) -> Option<String> {
        let (prefix, target) = self
            .aliases
            .iter()
            .filter(|(prefix, _)| !prefix.is_empty() && specifier.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())?;
        let rewritten = format!("{target}{}", &specifier[prefix.len()..]);
        Some(self.strip_root(&to_slash(&PathBuf::from(rewritten).clean())))
    }

    fn strip_root(&self, path: &str) -> String {
        path.strip_prefix(&self.root_prefix)
            .unwrap_or(path)
            .to_owned()
    }
}

/// True when `id` is exactly `src/<segment>` and the segment names a directory.
fn is_feature_dir(id: &str) -> bool {
    matches!(
        id.split('/').collect::<Vec<_>>().as_slice(),
        ["src", segment] if is_feature_segment(segment)
    )
}
