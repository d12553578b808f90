//! Table-driven shift/reduce parser driver.
//!
//! Drives a parallel state/symbol/parse-tree-node stack loop that acts
//! on the `Action` found in the current ACTION cell, producing a full
//! step trace and, on success, a reconstructed parse tree.

use crate::error::{GeneratorError, Result};
use crate::grammar::Grammar;
use crate::symbol::{string_to_tokens, Symbol};
use crate::table::{Action, ParsingTable};
use serde::Serialize;

/// A parse-tree node: a symbol name with its ordered children.
/// Leaves are terminals, or the synthetic `ε` leaf for empty reductions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseNode {
    pub symbol: String,
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    fn leaf(symbol: &Symbol) -> Self {
        Self {
            symbol: symbol.to_string(),
            children: Vec::new(),
        }
    }

    /// The leaf yield of this tree, left to right.
    pub fn yield_tokens(&self) -> Vec<String> {
        if self.children.is_empty() {
            return vec![self.symbol.clone()];
        }
        self.children.iter().flat_map(ParseNode::yield_tokens).collect()
    }
}

/// One recorded driver step.
#[derive(Debug, Clone, Serialize)]
pub struct ParseStep {
    pub step: usize,
    pub stack: Vec<String>,
    pub remaining_input: Vec<String>,
    pub action: String,
}

/// The outcome of driving a parse to completion or first failure.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    pub steps: Vec<ParseStep>,
    pub accepted: bool,
    pub error: Option<String>,
    pub tree: Option<ParseNode>,
}

/// Parses `input` (whitespace-separated tokens) against `table`,
/// returning the full trace and, on success, the parse tree.
pub fn parse(grammar: &Grammar, table: &ParsingTable, input: &str) -> ParseResult {
    let mut tokens = string_to_tokens(input);
    tokens.push(Symbol::end_marker());

    let mut states: Vec<usize> = vec![0];
    let mut symbols: Vec<Symbol> = Vec::new();
    let mut nodes: Vec<ParseNode> = Vec::new();
    let mut cursor = 0usize;
    let mut steps = Vec::new();

    loop {
        let state = *states.last().expect("state stack is never empty");
        let token = &tokens[cursor];
        let key = (state, token.clone());

        match table.action.get(&key) {
            Some(Action::Shift(target)) => {
                let step = steps.len();
                steps.push(ParseStep {
                    step,
                    stack: stack_snapshot(&states, &symbols),
                    remaining_input: remaining_snapshot(&tokens, cursor),
                    action: format!("shift to state {target} on {token}"),
                });
                tracing::trace!(step, %token, target, "shift");

                states.push(*target);
                symbols.push(token.clone());
                nodes.push(ParseNode::leaf(token));
                cursor += 1;
            }
            Some(Action::Reduce(reduce)) => {
                let step = steps.len();
                steps.push(ParseStep {
                    step,
                    stack: stack_snapshot(&states, &symbols),
                    remaining_input: remaining_snapshot(&tokens, cursor),
                    action: format!("reduce by {}", reduce.display),
                });
                tracing::trace!(step, production = %reduce.display, "reduce");

                let children = if reduce.rhs_len == 0 {
                    vec![ParseNode::leaf(&Symbol::epsilon())]
                } else {
                    let start = nodes.len() - reduce.rhs_len;
                    states.truncate(states.len() - reduce.rhs_len);
                    symbols.truncate(symbols.len() - reduce.rhs_len);
                    nodes.split_off(start)
                };

                let goto_state = *states.last().expect("state stack is never empty");
                match table.goto.get(&(goto_state, reduce.lhs.clone())) {
                    Some(&target) => {
                        states.push(target);
                        symbols.push(reduce.lhs.clone());
                        nodes.push(ParseNode {
                            symbol: reduce.lhs.to_string(),
                            children,
                        });
                    }
                    None => {
                        let error = GeneratorError::GotoError {
                            state: goto_state,
                            symbol: reduce.lhs.to_string(),
                            production: reduce.production,
                        };
                        tracing::error!(%error, "driver failed");
                        return ParseResult {
                            steps,
                            accepted: false,
                            error: Some(error.to_string()),
                            tree: None,
                        };
                    }
                }
            }
            Some(Action::Accept) => {
                let step = steps.len();
                steps.push(ParseStep {
                    step,
                    stack: stack_snapshot(&states, &symbols),
                    remaining_input: remaining_snapshot(&tokens, cursor),
                    action: "accept".to_string(),
                });
                tracing::trace!(step, "accept");

                return ParseResult {
                    steps,
                    accepted: true,
                    error: None,
                    tree: nodes.pop(),
                };
            }
            None => {
                let error = GeneratorError::SyntaxError {
                    token: token.to_string(),
                    state,
                    expected: table.expected_terminals(state),
                };
                tracing::error!(%error, "driver failed");
                return ParseResult {
                    steps,
                    accepted: false,
                    error: Some(error.to_string()),
                    tree: None,
                };
            }
        }
    }
}

fn stack_snapshot(states: &[usize], symbols: &[Symbol]) -> Vec<String> {
    let mut snapshot = Vec::with_capacity(states.len() + symbols.len());
    snapshot.push(states[0].to_string());
    for (state, symbol) in states[1..].iter().zip(symbols) {
        snapshot.push(symbol.to_string());
        snapshot.push(state.to_string());
    }
    snapshot
}

fn remaining_snapshot(tokens: &[Symbol], cursor: usize) -> Vec<String> {
    tokens[cursor..].iter().map(ToString::to_string).collect()
}

/// Convenience wrapper building FIRST sets, the canonical collection,
/// and the table from a grammar, then driving `input` through it.
pub fn generate_and_parse(grammar: &Grammar, input: &str) -> (ParsingTable, ParseResult) {
    let first_sets = crate::first::compute_first_sets(grammar);
    let collection = crate::collection::CanonicalCollection::build(grammar, &first_sets);
    let table = ParsingTable::build(grammar, &collection);
    let result = parse(grammar, &table, input);
    (table, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(grammar_text: &str, input: &str) -> ParseResult {
        let grammar = Grammar::parse(grammar_text).unwrap();
        generate_and_parse(&grammar, input).1
    }

    use crate::grammar::Grammar;

    #[test]
    fn simple_grammar_accepts_and_reduces_in_order() {
        let result = run("S -> C C\nC -> c C | d", "c c d d");
        assert!(result.accepted);
        assert!(result
            .steps
            .iter()
            .any(|s| s.action.contains("reduce by C → d")));
    }

    #[test]
    fn assignment_grammar_accepts_and_has_one_equals_shift() {
        let result = run("S -> L = R | R\nL -> * R | i\nR -> L", "* i = i");
        assert!(result.accepted);
        let equals_shifts = result
            .steps
            .iter()
            .filter(|s| s.action.contains("shift") && s.action.ends_with("on ="))
            .count();
        assert_eq!(equals_shifts, 1);
        let last_reduce = result.steps.iter().rev().find(|s| s.action.starts_with("reduce"));
        assert!(last_reduce.unwrap().action.contains("S → L = R"));
    }

    #[test]
    fn expression_grammar_builds_expected_tree_shape() {
        let result = run("E -> E + T | T\nT -> T * F | F\nF -> ( E ) | i", "i + i * i");
        assert!(result.accepted);
        let tree = result.tree.unwrap();
        assert_eq!(tree.symbol, "E");
        assert_eq!(tree.children.len(), 3);
        assert_eq!(tree.children[0].symbol, "E");
        assert_eq!(tree.children[1].symbol, "+");
        assert_eq!(tree.children[2].symbol, "T");
        assert_eq!(tree.children[2].children.len(), 3);
        assert_eq!(tree.children[2].children[1].symbol, "*");
    }

    #[test]
    fn incomplete_expression_is_rejected_with_end_marker_named() {
        let result = run("E -> E + T | T\nT -> T * F | F\nF -> ( E ) | i", "i +");
        assert!(!result.accepted);
        assert!(result.error.unwrap().contains("\"$\""));
    }

    #[test]
    fn epsilon_production_yields_synthetic_leaf() {
        let result = run("S -> A b\nA -> ε", "b");
        assert!(result.accepted);
        let tree = result.tree.unwrap();
        assert_eq!(tree.children[0].symbol, "A");
        assert_eq!(tree.children[0].children.len(), 1);
        assert_eq!(tree.children[0].children[0].symbol, "ε");
    }

    #[test]
    fn parse_tree_yield_matches_input() {
        let result = run("E -> E + T | T\nT -> T * F | F\nF -> ( E ) | i", "i + i * i");
        let tree = result.tree.unwrap();
        assert_eq!(tree.yield_tokens(), vec!["i", "+", "i", "*", "i"]);
    }

    #[test]
    fn single_production_grammar_shifts_reduces_and_accepts() {
        let result = run("S -> a", "a");
        assert!(result.accepted);
        assert_eq!(result.steps.len(), 3);
        assert!(result.steps[0].action.starts_with("shift"));
        assert!(result.steps[1].action.starts_with("reduce"));
        assert_eq!(result.steps[2].action, "accept");
    }

    #[test]
    fn empty_input_accepts_only_if_start_derives_epsilon() {
        assert!(run("S -> ε", "").accepted);
        assert!(!run("S -> a", "").accepted);
    }
}
