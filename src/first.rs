//! FIRST-set computation.
//!
//! Implements the fixpoint algorithm from Aho et al., "Compilers:
//! Principles, Techniques, and Tools", over named grammar symbols,
//! extended to the sequence form FIRST(α) needed for LR(1) lookahead
//! propagation.

use crate::grammar::Grammar;
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};

/// `FIRST(X)` for every symbol `X` in the grammar.
pub type FirstSets = HashMap<Symbol, HashSet<Symbol>>;

/// Computes FIRST(X) for every terminal, non-terminal, and the
/// synthetic epsilon/end-marker symbols, by fixed-point iteration.
pub fn compute_first_sets(grammar: &Grammar) -> FirstSets {
    let mut first_sets: FirstSets = HashMap::new();

    for terminal in grammar.terminals() {
        first_sets.insert(terminal.clone(), HashSet::from([terminal.clone()]));
    }
    first_sets.insert(Symbol::epsilon(), HashSet::from([Symbol::epsilon()]));
    first_sets.insert(Symbol::end_marker(), HashSet::from([Symbol::end_marker()]));
    for nt in grammar.non_terminals() {
        first_sets.entry(nt.clone()).or_default();
    }

    let mut changed = true;
    while changed {
        changed = false;

        for production in grammar.all_productions() {
            let current = first_sets.get(&production.lhs).cloned().unwrap_or_default();
            let rhs_first = first_of_string(&first_sets, &production.rhs);

            let merged: HashSet<Symbol> = current.union(&rhs_first).cloned().collect();
            if merged.len() != current.len() {
                first_sets.insert(production.lhs.clone(), merged);
                changed = true;
            }
        }
    }

    first_sets
}

/// `FIRST(α)` for a sequence of symbols `α = Y₁…Yₙ`.
///
/// Folds FIRST(X) left to right, dropping `ε` whenever a later symbol is
/// reached, and keeping `ε` in the result only when every `Yᵢ` admits it
/// (including the empty sequence, which yields `{ε}`). `$` may appear in
/// the result if `$` appears in `symbols`; this is intentional, since the
/// lookahead propagated by CLOSURE can itself be `$`.
pub fn first_of_string(first_sets: &FirstSets, symbols: &[Symbol]) -> HashSet<Symbol> {
    let mut result = HashSet::new();
    let mut admits_epsilon = true;

    for symbol in symbols {
        if !admits_epsilon {
            break;
        }

        let first_of_symbol = first_sets.get(symbol).cloned().unwrap_or_default();
        for s in &first_of_symbol {
            if !s.is_epsilon() {
                result.insert(s.clone());
            }
        }
        admits_epsilon = first_of_symbol.contains(&Symbol::epsilon());
    }

    if admits_epsilon {
        result.insert(Symbol::epsilon());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    #[test]
    fn first_of_terminal_is_itself() {
        let grammar = Grammar::parse("S -> a").unwrap();
        let first_sets = compute_first_sets(&grammar);
        assert_eq!(
            first_sets.get(&Symbol::terminal("a")).unwrap(),
            &HashSet::from([Symbol::terminal("a")])
        );
    }

    #[test]
    fn first_propagates_through_nullable_prefix() {
        // A -> ε | a ; B -> A b
        let grammar = Grammar::parse("B -> A b\nA -> a | ε").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let first_b = first_sets.get(&Symbol::non_terminal("B")).unwrap();
        assert!(first_b.contains(&Symbol::terminal("a")));
        assert!(first_b.contains(&Symbol::terminal("b")));
        assert!(!first_b.contains(&Symbol::epsilon()));
    }

    #[test]
    fn first_of_empty_sequence_is_epsilon() {
        let first_sets: FirstSets = HashMap::new();
        let result = first_of_string(&first_sets, &[]);
        assert_eq!(result, HashSet::from([Symbol::epsilon()]));
    }

    #[test]
    fn first_of_string_stops_at_first_non_nullable_symbol() {
        let grammar = Grammar::parse("S -> A B c\nA -> ε\nB -> b").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let seq = [
            Symbol::non_terminal("A"),
            Symbol::non_terminal("B"),
            Symbol::terminal("c"),
        ];
        let result = first_of_string(&first_sets, &seq);
        assert_eq!(result, HashSet::from([Symbol::terminal("b")]));
    }

    #[test]
    fn left_recursive_nonterminal_reaches_a_fixpoint() {
        let grammar = Grammar::parse("C -> c C | d").unwrap();
        let first_sets = compute_first_sets(&grammar);
        let first_c = first_sets.get(&Symbol::non_terminal("C")).unwrap();
        assert_eq!(first_c, &HashSet::from([Symbol::terminal("c"), Symbol::terminal("d")]));
    }
}
