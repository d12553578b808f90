//! Symbol types for context-free grammars.
//!
//! This module defines the core [`Symbol`] type used throughout the
//! generator: terminals, non-terminals, the epsilon marker, and the
//! end-of-input marker.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// The canonical name of the end-of-input marker.
pub const END_MARKER_NAME: &str = "$";
/// The canonical name of the epsilon (empty-string) marker.
pub const EPSILON_NAME: &str = "ε";

/// Classification of a [`Symbol`].
///
/// Unlike a single-character convention, classification is derived
/// structurally from where a name is used in the grammar (any name
/// appearing as a left-hand side is a non-terminal; every other name
/// appearing on a right-hand side is a terminal), not from letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
    Epsilon,
    EndMarker,
}

/// A named grammar symbol.
///
/// Equality and ordering are by `(kind, name)`: two symbols are the same
/// symbol only if they share both a classification and a name.
#[derive(Debug, Clone, Eq)]
pub struct Symbol {
    name: Arc<str>,
    kind: SymbolKind,
}

impl Symbol {
    /// Builds a terminal symbol with the given name.
    pub fn terminal(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Terminal,
        }
    }

    /// Builds a non-terminal symbol with the given name.
    pub fn non_terminal(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::NonTerminal,
        }
    }

    /// The synthetic epsilon (empty-string) symbol.
    pub fn epsilon() -> Self {
        Self {
            name: Arc::from(EPSILON_NAME),
            kind: SymbolKind::Epsilon,
        }
    }

    /// The synthetic end-of-input marker, `$`.
    pub fn end_marker() -> Self {
        Self {
            name: Arc::from(END_MARKER_NAME),
            kind: SymbolKind::EndMarker,
        }
    }

    /// This symbol's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// This symbol's classification.
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.kind == SymbolKind::Terminal
    }

    #[inline]
    pub fn is_non_terminal(&self) -> bool {
        self.kind == SymbolKind::NonTerminal
    }

    #[inline]
    pub fn is_epsilon(&self) -> bool {
        self.kind == SymbolKind::Epsilon
    }

    #[inline]
    pub fn is_end_marker(&self) -> bool {
        self.kind == SymbolKind::EndMarker
    }

    /// Whether this symbol may appear as an input token or lookahead,
    /// i.e. a terminal or the end marker.
    #[inline]
    pub fn is_terminal_like(&self) -> bool {
        matches!(self.kind, SymbolKind::Terminal | SymbolKind::EndMarker)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.name == other.name
    }
}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.name.hash(state);
    }
}

/// Orders epsilon < terminals < non-terminals < end-marker, then by name,
/// giving item sets a stable canonical form for closure/state dedup.
impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind.cmp(&other.kind).then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Splits whitespace-separated text into terminal-classified symbols.
///
/// Used to turn a raw input-token string into a token sequence; the
/// caller is responsible for appending the end marker.
pub fn string_to_tokens(s: &str) -> Vec<Symbol> {
    s.split_whitespace().map(Symbol::terminal).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_name_and_kind() {
        assert_eq!(Symbol::terminal("a"), Symbol::terminal("a"));
        assert_ne!(Symbol::terminal("a"), Symbol::non_terminal("a"));
    }

    #[test]
    fn ordering_places_epsilon_first_and_end_marker_last() {
        let mut symbols = vec![
            Symbol::end_marker(),
            Symbol::non_terminal("S"),
            Symbol::epsilon(),
            Symbol::terminal("a"),
        ];
        symbols.sort();
        assert_eq!(symbols[0], Symbol::epsilon());
        assert_eq!(symbols[1], Symbol::terminal("a"));
        assert_eq!(symbols[2], Symbol::non_terminal("S"));
        assert_eq!(symbols[3], Symbol::end_marker());
    }

    #[test]
    fn string_to_tokens_splits_on_whitespace() {
        let tokens = string_to_tokens("i + i * i");
        assert_eq!(
            tokens,
            vec![
                Symbol::terminal("i"),
                Symbol::terminal("+"),
                Symbol::terminal("i"),
                Symbol::terminal("*"),
                Symbol::terminal("i"),
            ]
        );
    }
}
