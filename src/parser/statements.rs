use std::sync::OnceLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// `import <clause> from '<specifier>'` and the clause-less `import '<specifier>'`.
const IMPORT_PATTERN: &str = r#"import (?:["'\s]*([\w*{}\n, ]+)from\s*)?["'\s]*([.@\w/-]+)["'\s]*;?"#;

/// `export <clause> from '<specifier>'` re-exports.
const REEXPORT_PATTERN: &str = r#"export (?:["'\s]*([\w*{}\n, ]+))?from\s*["'\s]*([.@\w/-]+)["'\s]*;?"#;

static IMPORT_RE: OnceLock<Regex> = OnceLock::new();
static REEXPORT_RE: OnceLock<Regex> = OnceLock::new();

fn import_regex() -> &'static Regex {
    IMPORT_RE.get_or_init(|| Regex::new(IMPORT_PATTERN).expect("invalid import pattern"))
}

fn reexport_regex() -> &'static Regex {
    REEXPORT_RE.get_or_init(|| Regex::new(REEXPORT_PATTERN).expect("invalid re-export pattern"))
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// Which lexical scan found a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// `import ... from '...'` or `import '...'`
    Import,
    /// `export ... from '...'`
    ReExport,
}

impl StatementKind {
    fn regex(self) -> &'static Regex {
        match self {
            StatementKind::Import => import_regex(),
            StatementKind::ReExport => reexport_regex(),
        }
    }
}

/// A matched statement before binding parsing and path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatement {
    pub kind: StatementKind,
    /// The text between the keyword and `from`, absent for side-effect-only forms.
    pub clause: Option<String>,
    /// The module specifier exactly as written.
    pub specifier: String,
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Find every non-overlapping statement of `kind` in `source`, left to right.
///
/// This is lexical matching only: import-like text inside comments or string
/// literals is reported as a real statement.
pub fn extract_statements(source: &str, kind: StatementKind) -> Vec<RawStatement> {
    kind.regex()
        .captures_iter(source)
        .filter_map(|caps| {
            let specifier = caps.get(2)?.as_str().to_owned();
            let clause = caps
                .get(1)
                .map(|m| m.as_str())
                .filter(|c| !c.trim().is_empty())
                .map(str::to_owned);
            Some(RawStatement {
                kind,
                clause,
                specifier,
            })
        })
        .collect()
}
