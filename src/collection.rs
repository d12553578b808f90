//! Canonical collection construction.
//!
//! Builds the full set of reachable LR(1) states via a worklist over
//! `item::closure`/`item::goto`, discovering new states until no symbol
//! in any state yields a previously-unseen GOTO target.

use crate::first::FirstSets;
use crate::grammar::Grammar;
use crate::item::{closure, goto, symbols_after_dot, ItemSet, LrItem};
use crate::symbol::Symbol;
use std::collections::{HashMap, VecDeque};

/// The full set of reachable, closed LR(1) item sets, plus the
/// transition function `δ: StateIndex × Symbol → StateIndex` between them.
#[derive(Debug, Clone)]
pub struct CanonicalCollection {
    pub states: Vec<ItemSet>,
    pub transitions: HashMap<(usize, Symbol), usize>,
}

impl CanonicalCollection {
    /// Builds the canonical collection starting from
    /// `I₀ = CLOSURE({[S' -> · S, $]})`, discovering new states via a
    /// worklist until no symbol in any state yields a new GOTO target.
    pub fn build(grammar: &Grammar, first_sets: &FirstSets) -> Self {
        let initial_item = LrItem::new(0, 0, Symbol::end_marker());
        let initial_state = closure(grammar, first_sets, ItemSet::from([initial_item]));

        let mut states = vec![initial_state];
        let mut transitions: HashMap<(usize, Symbol), usize> = HashMap::new();
        let mut worklist: VecDeque<usize> = VecDeque::from([0]);

        while let Some(state_id) = worklist.pop_front() {
            let state = states[state_id].clone();
            let symbols = symbols_after_dot(grammar, &state);

            for symbol in symbols {
                let target = goto(grammar, first_sets, &state, &symbol);
                if target.is_empty() {
                    continue;
                }

                if let Some(existing) = states.iter().position(|s| s == &target) {
                    transitions.insert((state_id, symbol), existing);
                } else {
                    let new_id = states.len();
                    tracing::debug!(state = new_id, items = target.len(), "discovered state");
                    states.push(target);
                    worklist.push_back(new_id);
                    transitions.insert((state_id, symbol), new_id);
                }
            }
        }

        Self { states, transitions }
    }
}
