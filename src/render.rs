//! Plain-text and JSON rendering of generator artifacts.
//!
//! `serde`-backed JSON mirrors support the CLI's `--format json`, since
//! the internal `HashMap<(usize, Symbol), _>` table representations
//! don't serialize directly.

use crate::collection::CanonicalCollection;
use crate::driver::ParseResult;
use crate::grammar::Grammar;
use crate::table::{Action, ParsingTable};
use serde::Serialize;

/// Renders every state in the canonical collection as a numbered list
/// of items, one per line, in `A → α · β, a` notation.
pub fn render_collection(grammar: &Grammar, collection: &CanonicalCollection) -> String {
    let mut out = String::new();
    for (i, state) in collection.states.iter().enumerate() {
        out.push_str(&format!("state {i}:\n"));
        for item in state {
            out.push_str(&format!("  {}\n", item.display(grammar)));
        }
    }
    out
}

/// Renders the ACTION and GOTO tables as a plain grid, sorted by state
/// then symbol name for deterministic output.
pub fn render_table(table: &ParsingTable) -> String {
    let mut out = String::new();

    let mut action_entries: Vec<_> = table.action.iter().collect();
    action_entries.sort_by(|a, b| a.0.0.cmp(&b.0.0).then_with(|| a.0.1.name().cmp(b.0.1.name())));
    out.push_str("ACTION:\n");
    for ((state, symbol), action) in action_entries {
        out.push_str(&format!("  [{state}, {symbol}] = {action}\n"));
    }

    let mut goto_entries: Vec<_> = table.goto.iter().collect();
    goto_entries.sort_by(|a, b| a.0.0.cmp(&b.0.0).then_with(|| a.0.1.name().cmp(b.0.1.name())));
    out.push_str("GOTO:\n");
    for ((state, symbol), target) in goto_entries {
        out.push_str(&format!("  [{state}, {symbol}] = {target}\n"));
    }

    if !table.is_clr1() {
        out.push_str(&format!("\n{} conflict(s):\n", table.conflicts.len()));
        for conflict in &table.conflicts {
            out.push_str(&format!("  {conflict}\n"));
        }
    }

    out
}

/// Serializable mirror of [`Grammar`] for `--format json`.
#[derive(Serialize)]
pub struct GrammarView {
    pub productions: Vec<String>,
    pub start_symbol: String,
    pub terminals: Vec<String>,
    pub non_terminals: Vec<String>,
}

impl GrammarView {
    pub fn new(grammar: &Grammar) -> Self {
        let mut terminals: Vec<String> = grammar.terminals().iter().map(|s| s.name().to_string()).collect();
        terminals.sort();
        let mut non_terminals: Vec<String> = grammar
            .non_terminals()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        non_terminals.sort();

        Self {
            productions: grammar.all_productions().iter().map(ToString::to_string).collect(),
            start_symbol: grammar.start_symbol().name().to_string(),
            terminals,
            non_terminals,
        }
    }
}

/// Serializable mirror of the canonical collection.
#[derive(Serialize)]
pub struct CollectionView {
    pub states: Vec<Vec<String>>,
    pub transitions: Vec<TransitionView>,
}

#[derive(Serialize)]
pub struct TransitionView {
    pub from: usize,
    pub symbol: String,
    pub to: usize,
}

impl CollectionView {
    pub fn new(grammar: &Grammar, collection: &CanonicalCollection) -> Self {
        let states = collection
            .states
            .iter()
            .map(|state| state.iter().map(|item| item.display(grammar).to_string()).collect())
            .collect();

        let mut transitions: Vec<TransitionView> = collection
            .transitions
            .iter()
            .map(|(&(from, ref symbol), &to)| TransitionView {
                from,
                symbol: symbol.name().to_string(),
                to,
            })
            .collect();
        transitions.sort_by(|a, b| a.from.cmp(&b.from).then_with(|| a.symbol.cmp(&b.symbol)));

        Self { states, transitions }
    }
}

/// Serializable mirror of the ACTION/GOTO tables and recorded conflicts.
#[derive(Serialize)]
pub struct TableView {
    pub num_states: usize,
    pub is_clr1: bool,
    pub action: Vec<ActionEntryView>,
    pub goto: Vec<GotoEntryView>,
    pub conflicts: Vec<String>,
}

#[derive(Serialize)]
pub struct ActionEntryView {
    pub state: usize,
    pub symbol: String,
    pub action: String,
}

#[derive(Serialize)]
pub struct GotoEntryView {
    pub state: usize,
    pub symbol: String,
    pub target: usize,
}

impl TableView {
    pub fn new(table: &ParsingTable) -> Self {
        let mut action: Vec<ActionEntryView> = table
            .action
            .iter()
            .map(|((state, symbol), action)| ActionEntryView {
                state: *state,
                symbol: symbol.name().to_string(),
                action: action.to_string(),
            })
            .collect();
        action.sort_by(|a, b| a.state.cmp(&b.state).then_with(|| a.symbol.cmp(&b.symbol)));

        let mut goto: Vec<GotoEntryView> = table
            .goto
            .iter()
            .map(|((state, symbol), target)| GotoEntryView {
                state: *state,
                symbol: symbol.name().to_string(),
                target: *target,
            })
            .collect();
        goto.sort_by(|a, b| a.state.cmp(&b.state).then_with(|| a.symbol.cmp(&b.symbol)));

        Self {
            num_states: table.num_states,
            is_clr1: table.is_clr1(),
            action,
            goto,
            conflicts: table.conflicts.iter().map(ToString::to_string).collect(),
        }
    }
}

/// `ParseResult` already serializes directly; this alias documents the
/// CLI-facing contract for `--format json` on the driver output.
pub type ParseResultView = ParseResult;
