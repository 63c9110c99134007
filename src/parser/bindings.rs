use std::sync::OnceLock;

use regex::Regex;

use crate::graph::edge::Binding;

static RENAME_RE: OnceLock<Regex> = OnceLock::new();

/// `<name> as <alias>`, greedy on the left like the rename syntax it mirrors.
fn rename_regex() -> &'static Regex {
    RENAME_RE.get_or_init(|| Regex::new(r"^(.*)\s+as\s+(.*)$").expect("invalid rename pattern"))
}

/// Parse a binding clause such as `React, { useState as useS }` into bindings.
///
/// Handles:
/// - Default: `Foo` → (`default`, `Foo`)
/// - Named: `{ A, B as C }` → (`A`, `A`), (`B`, `C`)
/// - Namespace: `* as NS` → (`*`, `NS`)
/// - Combined: `Foo, { A }`
///
/// Never fails: text that fits none of these shapes becomes a literal binding
/// whose name and alias are the stripped text.
pub fn parse_bindings(clause: &str) -> Vec<Binding> {
    let mut tokens: Vec<String> = clause.split(',').map(str::to_owned).collect();

    if let Some(first) = tokens.first_mut()
        && !first.contains('{')
        && !first.contains('*')
    {
        *first = format!("default as {first}");
    }

    tokens
        .iter()
        .filter(|token| !is_empty_braces(token))
        .filter_map(|token| {
            let single: String = token
                .chars()
                .filter(|c| !matches!(c, '{' | '}' | '\n'))
                .collect();
            let single = single.trim();
            if single.is_empty() {
                return None;
            }
            Some(match rename_regex().captures(single) {
                Some(caps) => Binding::new(caps[1].trim(), caps[2].trim()),
                None => Binding::new(single, single),
            })
        })
        .collect()
}

/// `{}` with any surrounding whitespace.
fn is_empty_braces(token: &str) -> bool {
    token.split_whitespace().collect::<String>() == "{}"
}
