//! Grammar model and textual grammar parsing.
//!
//! [`Production`] and [`Grammar`] are the data model; [`Grammar::parse`]
//! translates textual grammar source into that model, including
//! start-symbol augmentation.

use crate::error::{GeneratorError, Result};
use crate::symbol::Symbol;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A production rule `lhs -> rhs`.
///
/// `rhs` is empty for an epsilon production. Every production carries a
/// stable index assigned at grammar construction; index 0 is always the
/// augmented start production `S' -> S`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    pub index: usize,
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

impl Production {
    pub fn new(index: usize, lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Self { index, lhs, rhs }
    }

    /// Whether this is an epsilon production (empty right-hand side).
    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rhs.is_empty() {
            write!(f, "{} → ε", self.lhs)
        } else {
            let rhs: Vec<String> = self.rhs.iter().map(ToString::to_string).collect();
            write!(f, "{} → {}", self.lhs, rhs.join(" "))
        }
    }
}

/// A context-free grammar, always augmented with a fresh start production.
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Vec<Production>,
    non_terminals: HashSet<Symbol>,
    terminals: HashSet<Symbol>,
    start_symbol: Symbol,
    augmented_start: Symbol,
    production_map: HashMap<Symbol, Vec<usize>>,
}

/// A single raw alternative parsed from grammar text, before symbol
/// classification (which requires seeing every rule first).
struct RawProduction {
    lhs: String,
    rhs: Vec<String>,
}

impl Grammar {
    /// Parses a grammar from textual source.
    ///
    /// Non-empty lines are production rules `LHS -> ALT1 | ALT2 | ...`.
    /// An alternative that is empty, `ε`, `''`, or `""` denotes the empty
    /// right-hand side. The grammar is augmented with `S' -> S` as
    /// production 0, where `S` is the left-hand side of the first rule.
    pub fn parse(text: &str) -> Result<Self> {
        let mut raw = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            raw.extend(Self::parse_rule(line)?);
        }

        if raw.is_empty() {
            return Err(GeneratorError::EmptyGrammar);
        }

        Self::from_raw(raw)
    }

    /// Parses one `LHS -> ALT1 | ALT2 | ...` line into its alternatives.
    fn parse_rule(line: &str) -> Result<Vec<RawProduction>> {
        let Some((lhs_part, rhs_part)) = line.split_once("->") else {
            return Err(GeneratorError::MalformedRule(line.to_string()));
        };

        let lhs = lhs_part.trim().to_string();
        if lhs.is_empty() {
            return Err(GeneratorError::MalformedRule(line.to_string()));
        }

        let mut productions = Vec::new();
        for alt in rhs_part.split('|') {
            let alt = alt.trim();
            let rhs = if alt.is_empty() || alt == "ε" || alt == "''" || alt == "\"\"" {
                Vec::new()
            } else {
                alt.split_whitespace().map(str::to_string).collect()
            };
            productions.push(RawProduction {
                lhs: lhs.clone(),
                rhs,
            });
        }

        Ok(productions)
    }

    fn from_raw(raw: Vec<RawProduction>) -> Result<Self> {
        let non_terminal_names: HashSet<&str> = raw.iter().map(|p| p.lhs.as_str()).collect();

        let mut terminal_names: HashSet<String> = HashSet::new();
        for p in &raw {
            for tok in &p.rhs {
                if !non_terminal_names.contains(tok.as_str()) {
                    terminal_names.insert(tok.clone());
                }
            }
        }

        let start_name = raw[0].lhs.clone();
        let augmented_name = Self::fresh_start_name(&start_name, &non_terminal_names, &terminal_names);

        let classify = |name: &str| -> Symbol {
            if non_terminal_names.contains(name) {
                Symbol::non_terminal(name)
            } else {
                Symbol::terminal(name)
            }
        };

        let start_symbol = Symbol::non_terminal(start_name.clone());
        let augmented_start = Symbol::non_terminal(augmented_name.clone());

        let mut productions = vec![Production::new(0, augmented_start.clone(), vec![start_symbol.clone()])];
        for (i, p) in raw.iter().enumerate() {
            let lhs = Symbol::non_terminal(p.lhs.clone());
            let rhs = p.rhs.iter().map(|t| classify(t)).collect();
            productions.push(Production::new(i + 1, lhs, rhs));
        }

        let non_terminals: HashSet<Symbol> = non_terminal_names
            .iter()
            .map(|n| Symbol::non_terminal(*n))
            .chain(std::iter::once(augmented_start.clone()))
            .collect();
        let terminals: HashSet<Symbol> = terminal_names.iter().map(Symbol::terminal).collect();

        let mut production_map: HashMap<Symbol, Vec<usize>> = HashMap::new();
        for p in &productions {
            production_map.entry(p.lhs.clone()).or_default().push(p.index);
        }

        tracing::debug!(productions = productions.len(), start = %start_symbol, "grammar parsed");

        Ok(Self {
            productions,
            non_terminals,
            terminals,
            start_symbol,
            augmented_start,
            production_map,
        })
    }

    /// Picks a fresh name for the augmented start symbol: `S'`, or `S`
    /// with trailing primes appended until it is unused.
    fn fresh_start_name(
        start_name: &str,
        non_terminals: &HashSet<&str>,
        terminals: &HashSet<String>,
    ) -> String {
        let mut candidate = format!("{start_name}'");
        while non_terminals.contains(candidate.as_str()) || terminals.contains(&candidate) {
            tracing::warn!(candidate = %candidate, "augmented start name collides, appending prime");
            candidate.push('\'');
        }
        candidate
    }

    /// All productions whose left-hand side is `nt`, in declaration order.
    pub fn productions_for(&self, nt: &Symbol) -> impl Iterator<Item = &Production> {
        self.production_map
            .get(nt)
            .into_iter()
            .flatten()
            .map(|&idx| &self.productions[idx])
    }

    /// All productions, augmented start first.
    pub fn all_productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, index: usize) -> &Production {
        &self.productions[index]
    }

    pub fn non_terminals(&self) -> &HashSet<Symbol> {
        &self.non_terminals
    }

    pub fn terminals(&self) -> &HashSet<Symbol> {
        &self.terminals
    }

    /// The original (pre-augmentation) start symbol.
    pub fn start_symbol(&self) -> &Symbol {
        &self.start_symbol
    }

    /// The synthetic `S'` symbol introduced by augmentation.
    pub fn augmented_start(&self) -> &Symbol {
        &self.augmented_start
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prod in &self.productions {
            writeln!(f, "{prod}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn augments_with_fresh_start_production() {
        let grammar = Grammar::parse("S -> A b\nA -> a").unwrap();
        assert_eq!(grammar.all_productions()[0].index, 0);
        assert_eq!(grammar.all_productions()[0].lhs.name(), "S'");
        assert_eq!(grammar.all_productions()[0].rhs, vec![Symbol::non_terminal("S")]);
    }

    #[test]
    fn classifies_by_lhs_membership_not_case() {
        let grammar = Grammar::parse("start -> item end\nitem -> leaf").unwrap();
        assert!(grammar.non_terminals().contains(&Symbol::non_terminal("start")));
        assert!(grammar.non_terminals().contains(&Symbol::non_terminal("item")));
        assert!(grammar.terminals().contains(&Symbol::terminal("end")));
        assert!(grammar.terminals().contains(&Symbol::terminal("leaf")));
    }

    #[test]
    fn pipe_separated_alternatives_become_distinct_productions() {
        let grammar = Grammar::parse("S -> a | b | c").unwrap();
        // production 0 is the augmented start; 1..=3 are the alternatives
        assert_eq!(grammar.all_productions().len(), 4);
    }

    #[test]
    fn empty_alternative_is_an_epsilon_production() {
        for text in ["S -> A b\nA -> ε", "S -> A b\nA -> ''", "S -> A b\nA ->"] {
            let grammar = Grammar::parse(text).unwrap();
            let a = grammar.production(2);
            assert!(a.is_epsilon(), "expected epsilon production for {text:?}");
        }
    }

    #[test]
    fn empty_grammar_is_rejected() {
        assert!(matches!(Grammar::parse(""), Err(GeneratorError::EmptyGrammar)));
        assert!(matches!(Grammar::parse("   \n  "), Err(GeneratorError::EmptyGrammar)));
    }

    #[test]
    fn rule_without_arrow_is_malformed() {
        assert!(matches!(
            Grammar::parse("S => a"),
            Err(GeneratorError::MalformedRule(_))
        ));
    }

    #[test]
    fn rule_with_empty_lhs_is_malformed() {
        assert!(matches!(
            Grammar::parse(" -> a"),
            Err(GeneratorError::MalformedRule(_))
        ));
    }

    #[test]
    fn fresh_start_name_avoids_collision() {
        let grammar = Grammar::parse("S' -> a\nS -> S'").unwrap();
        assert_eq!(grammar.augmented_start().name(), "S''");
    }
}
