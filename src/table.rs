//! ACTION/GOTO table construction with conflict detection.
//!
//! Reduce entries are keyed by each item's own LR(1) lookahead rather
//! than by FOLLOW sets. Conflicting writes are report-only: they are
//! recorded and the first entry is kept, rather than aborting table
//! construction.

use crate::collection::CanonicalCollection;
use crate::grammar::Grammar;
use crate::symbol::Symbol;
use std::collections::HashMap;
use std::fmt;

/// A compiled ACTION-table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(ReduceAction),
    Accept,
}

/// A reduce action, carrying enough of the production to execute the
/// reduction without the driver re-consulting the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceAction {
    pub production: usize,
    pub lhs: Symbol,
    pub rhs_len: usize,
    pub display: String,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(s) => write!(f, "s{s}"),
            Action::Reduce(r) => write!(f, "r{}", r.display),
            Action::Accept => write!(f, "ACC"),
        }
    }
}

/// Which kind of table-cell collision occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

/// A recorded conflict: two incompatible actions wanted the same cell.
/// Report-only; the table keeps whichever action was written first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub state: usize,
    pub symbol: Symbol,
    pub kind: ConflictKind,
    pub kept: String,
    pub discarded: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ConflictKind::ShiftReduce => "shift/reduce",
            ConflictKind::ReduceReduce => "reduce/reduce",
        };
        write!(
            f,
            "{kind} conflict in state {} on {}: kept {}, discarded {}",
            self.state, self.symbol, self.kept, self.discarded
        )
    }
}

/// The compiled ACTION and GOTO tables plus any conflicts encountered.
#[derive(Debug, Clone)]
pub struct ParsingTable {
    pub num_states: usize,
    pub action: HashMap<(usize, Symbol), Action>,
    pub goto: HashMap<(usize, Symbol), usize>,
    pub conflicts: Vec<Conflict>,
}

impl ParsingTable {
    /// Whether the grammar is canonical-LR(1): no conflicting cell writes.
    pub fn is_clr1(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Builds ACTION/GOTO from the canonical collection.
    pub fn build(grammar: &Grammar, collection: &CanonicalCollection) -> Self {
        let mut action: HashMap<(usize, Symbol), Action> = HashMap::new();
        let mut goto: HashMap<(usize, Symbol), usize> = HashMap::new();
        let mut conflicts = Vec::new();

        for (state_id, state) in collection.states.iter().enumerate() {
            for item in state {
                let production = grammar.production(item.production);

                if let Some(symbol) = item.next_symbol(grammar) {
                    if symbol.is_terminal() {
                        if let Some(&target) = collection.transitions.get(&(state_id, symbol.clone())) {
                            Self::write_action(
                                &mut action,
                                &mut conflicts,
                                state_id,
                                symbol.clone(),
                                Action::Shift(target),
                            );
                        }
                    }
                    continue;
                }

                // Complete item: accept or reduce.
                if production.lhs == *grammar.augmented_start() {
                    Self::write_action(
                        &mut action,
                        &mut conflicts,
                        state_id,
                        Symbol::end_marker(),
                        Action::Accept,
                    );
                } else {
                    let reduce = Action::Reduce(ReduceAction {
                        production: production.index,
                        lhs: production.lhs.clone(),
                        rhs_len: production.rhs.len(),
                        display: production.to_string(),
                    });
                    Self::write_action(
                        &mut action,
                        &mut conflicts,
                        state_id,
                        item.lookahead.clone(),
                        reduce,
                    );
                }
            }

            for (&(from, ref symbol), &target) in &collection.transitions {
                if from == state_id && symbol.is_non_terminal() {
                    goto.insert((state_id, symbol.clone()), target);
                }
            }
        }

        Self {
            num_states: collection.states.len(),
            action,
            goto,
            conflicts,
        }
    }

    /// Writes `action` into `table[state, symbol]` unless already
    /// occupied, in which case the collision is recorded as a conflict
    /// (or silently dropped if the two actions are identical).
    fn write_action(
        table: &mut HashMap<(usize, Symbol), Action>,
        conflicts: &mut Vec<Conflict>,
        state: usize,
        symbol: Symbol,
        action: Action,
    ) {
        let key = (state, symbol.clone());
        match table.get(&key) {
            None => {
                table.insert(key, action);
            }
            Some(existing) if *existing == action => {
                // Identical shift-shift or reduce-reduce: no-op.
            }
            Some(existing) => {
                let kind = match (existing, &action) {
                    (Action::Reduce(_), Action::Reduce(_)) => ConflictKind::ReduceReduce,
                    _ => ConflictKind::ShiftReduce,
                };
                let conflict = Conflict {
                    state,
                    symbol,
                    kind,
                    kept: existing.to_string(),
                    discarded: action.to_string(),
                };
                tracing::warn!(%conflict, "table conflict");
                conflicts.push(conflict);
            }
        }
    }

    /// Terminals (and `$`) for which `ACTION[state, ·]` is defined;
    /// used to report the expected-token set on a syntax error.
    pub fn expected_terminals(&self, state: usize) -> Vec<String> {
        let mut expected: Vec<String> = self
            .action
            .keys()
            .filter(|(s, _)| *s == state)
            .map(|(_, sym)| sym.to_string())
            .collect();
        expected.sort();
        expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CanonicalCollection;
    use crate::first::compute_first_sets;

    fn build_table(text: &str) -> (Grammar, ParsingTable) {
        let grammar = Grammar::parse(text).unwrap();
        let first_sets = compute_first_sets(&grammar);
        let collection = CanonicalCollection::build(&grammar, &first_sets);
        let table = ParsingTable::build(&grammar, &collection);
        (grammar, table)
    }

    #[test]
    fn accept_action_exists_exactly_where_the_accept_item_does() {
        let (grammar, table) = build_table("S -> a");
        let first_sets = compute_first_sets(&grammar);
        let collection = CanonicalCollection::build(&grammar, &first_sets);

        for (state_id, state) in collection.states.iter().enumerate() {
            let has_accept_item = state.iter().any(|item| {
                item.production == 0 && item.is_complete(&grammar) && item.lookahead.is_end_marker()
            });
            let has_accept_action = matches!(
                table.action.get(&(state_id, Symbol::end_marker())),
                Some(Action::Accept)
            );
            assert_eq!(has_accept_item, has_accept_action, "state {state_id}");
        }
    }

    #[test]
    fn unambiguous_grammar_has_no_conflicts() {
        let (_, table) = build_table("E -> E + T | T\nT -> T * F | F\nF -> ( E ) | i");
        assert!(table.is_clr1(), "conflicts: {:?}", table.conflicts);
    }

    #[test]
    fn ambiguous_grammar_reports_a_shift_reduce_conflict() {
        let (_, table) = build_table("E -> E + E | i");
        assert!(!table.is_clr1());
        assert!(table
            .conflicts
            .iter()
            .any(|c| c.kind == ConflictKind::ShiftReduce && c.symbol == Symbol::terminal("+")));
    }

    #[test]
    fn goto_defined_only_for_nonterminal_transitions() {
        let (_, table) = build_table("S -> C C\nC -> c C | d");
        for (_, symbol) in table.goto.keys() {
            assert!(symbol.is_non_terminal());
        }
    }
}
