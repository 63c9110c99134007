use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Structural classification of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// The `index` entry file of a directory directly under `src/`.
    Feature,
    /// A file under the top-level `pages` directory.
    Page,
    /// Any other source file.
    File,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Feature => "Feature",
            NodeKind::Page => "Page",
            NodeKind::File => "File",
        }
    }
}

/// Attributes persisted on every graph node.
///
/// `file` carries the canonical module id and is the attribute edges match on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAttrs {
    pub name: String,
    pub file: String,
    pub feature: bool,
    pub module: String,
    pub spec: bool,
    pub pact: bool,
    pub page: bool,
    pub fixture: bool,
}

/// A scanned source file together with everything derived from its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Root-relative, `/`-separated, extension-stripped identifier.
    pub id: String,
    pub name: String,
    /// PascalCase name of the top-level source subdirectory.
    pub module: String,
    pub kind: NodeKind,
    pub spec: bool,
    pub pact: bool,
    pub fixture: bool,
}

impl SourceFile {
    /// Classify `path` relative to the scan `root`.
    ///
    /// Pure function of the two paths: the same input always yields the same
    /// id, name and labels.
    pub fn classify(path: &Path, root: &Path) -> Self {
        let id = canonical_id(path, root);
        let parts: Vec<&str> = id.split('/').collect();

        let name = match parts.as_slice() {
            [.., parent, "index"] => (*parent).to_owned(),
            [.., last] => (*last).to_owned(),
            [] => String::new(),
        };

        let module_segment = parts.get(1).or(parts.first()).copied().unwrap_or_default();
        let module = pascal_case(module_segment);

        let kind = if is_feature_entry(&id) {
            NodeKind::Feature
        } else if id.starts_with("pages") {
            NodeKind::Page
        } else {
            NodeKind::File
        };

        Self {
            path: path.to_path_buf(),
            name,
            module,
            kind,
            spec: id.contains("/specs/"),
            pact: id.contains("/pacts/"),
            fixture: id.contains("/fixtures/"),
            id,
        }
    }

    /// Ordered label set: kind, grouping id (plain files only), then Spec, Pact, Fixture.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = vec![self.kind.label().to_owned()];
        if self.kind == NodeKind::File && !self.module.is_empty() {
            labels.push(self.module.clone());
        }
        if self.spec {
            labels.push("Spec".to_owned());
        }
        if self.pact {
            labels.push("Pact".to_owned());
        }
        if self.fixture {
            labels.push("Fixture".to_owned());
        }
        labels
    }

    pub fn attrs(&self) -> NodeAttrs {
        NodeAttrs {
            name: self.name.clone(),
            file: self.id.clone(),
            feature: self.kind == NodeKind::Feature,
            module: self.module.clone(),
            spec: self.spec,
            pact: self.pact,
            page: self.kind == NodeKind::Page,
            fixture: self.fixture,
        }
    }
}

/// Root-relative path with the final extension removed, joined with `/`.
pub fn canonical_id(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    to_slash(&relative.with_extension(""))
}

/// True when `id` is exactly `src/<segment>/index`.
pub fn is_feature_entry(id: &str) -> bool {
    matches!(
        id.split('/').collect::<Vec<_>>().as_slice(),
        ["src", segment, "index"] if is_feature_segment(segment)
    )
}

/// A feature directory name: non-empty, no `.` (so `styles.css` is a file).
pub fn is_feature_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains('.')
}

/// Render a path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => out.push('/'),
            Component::Prefix(prefix) => out.push_str(&prefix.as_os_str().to_string_lossy()),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out
}

/// `feature-flags` → `FeatureFlags`.
fn pascal_case(segment: &str) -> String {
    segment
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}
