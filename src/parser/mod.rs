pub mod bindings;
pub mod statements;

use crate::graph::edge::Binding;

use bindings::parse_bindings;
pub use statements::{RawStatement, StatementKind, extract_statements};

impl RawStatement {
    /// The bindings this statement introduces.
    ///
    /// A statement without a clause (`import 'polyfill';`) yields a single
    /// side-effect-only binding whose name and alias are the raw specifier.
    pub fn bindings(&self) -> Vec<Binding> {
        match &self.clause {
            Some(clause) => parse_bindings(clause),
            None => vec![Binding::side_effect(&self.specifier)],
        }
    }
}
