//! CLI driver for the LR(1) generator.
//!
//! Supports an argument-driven mode built on `clap`'s derive API, plus a
//! line-oriented interactive stdin mode when no grammar file is given.

use crate::collection::CanonicalCollection;
use crate::driver;
use crate::error::{GeneratorError, Result};
use crate::first::compute_first_sets;
use crate::grammar::Grammar;
use crate::render::{render_collection, render_table, CollectionView, GrammarView, TableView};
use crate::table::ParsingTable;
use clap::Parser;
use std::fs;
use std::io::{self, BufRead, Write};

/// Output format for `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Builds and/or drives a canonical LR(1) parser.
#[derive(Debug, Parser)]
#[command(name = "lr1-gen", about = "Canonical LR(1) parser generator and driver")]
pub struct Cli {
    /// Path to a grammar file. Falls back to the interactive stdin protocol if omitted.
    #[arg(long)]
    pub grammar: Option<String>,

    /// Whitespace-separated input tokens to parse. Requires `--grammar`.
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub print_grammar: bool,
    #[arg(long)]
    pub print_first: bool,
    #[arg(long)]
    pub print_states: bool,
    #[arg(long)]
    pub print_tables: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Entry point used by `main`.
pub fn run(cli: Cli) -> Result<()> {
    let Some(path) = &cli.grammar else {
        return run_interactive();
    };

    let grammar = load_grammar(path)?;
    let (_, table) = build(&grammar);
    print_requested_artifacts(&cli, &grammar, &table);

    let Some(input) = &cli.input else {
        return Ok(());
    };

    let result = driver::parse(&grammar, &table, input);
    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result).expect("ParseResult always serializes"));
        }
        OutputFormat::Text => {
            for step in &result.steps {
                println!("{}: {}", step.step, step.action);
            }
            println!("accepted: {}", result.accepted);
            if let Some(error) = &result.error {
                println!("error: {error}");
            }
        }
    }
    Ok(())
}

fn print_requested_artifacts(cli: &Cli, grammar: &Grammar, table: &ParsingTable) {
    if cli.print_grammar {
        match cli.format {
            OutputFormat::Text => print!("{grammar}"),
            OutputFormat::Json => print_json(&GrammarView::new(grammar)),
        }
    }
    if cli.print_first {
        let first_sets = compute_first_sets(grammar);
        for (symbol, first) in &first_sets {
            let mut names: Vec<&str> = first.iter().map(|s| s.name()).collect();
            names.sort();
            println!("FIRST({symbol}) = {{{}}}", names.join(", "));
        }
    }
    if cli.print_states {
        let first_sets = compute_first_sets(grammar);
        let collection = CanonicalCollection::build(grammar, &first_sets);
        match cli.format {
            OutputFormat::Text => print!("{}", render_collection(grammar, &collection)),
            OutputFormat::Json => print_json(&CollectionView::new(grammar, &collection)),
        }
    }
    if cli.print_tables {
        match cli.format {
            OutputFormat::Text => print!("{}", render_table(table)),
            OutputFormat::Json => print_json(&TableView::new(table)),
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).expect("view types always serialize"));
}

fn build(grammar: &Grammar) -> (CanonicalCollection, ParsingTable) {
    let first_sets = compute_first_sets(grammar);
    let collection = CanonicalCollection::build(grammar, &first_sets);
    let table = ParsingTable::build(grammar, &collection);
    if !table.is_clr1() {
        for conflict in &table.conflicts {
            eprintln!("warning: {conflict}");
        }
    }
    (collection, table)
}

fn load_grammar(path: &str) -> Result<Grammar> {
    let text = fs::read_to_string(path)?;
    Grammar::parse(&text)
}

/// A line-oriented stdin protocol: read grammar lines until a blank
/// line, report conflicts, then parse one input line at a time until
/// EOF.
fn run_interactive() -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let grammar_text = read_grammar_block(&mut lines)?;
    let grammar = Grammar::parse(&grammar_text)?;
    let (_, table) = build(&grammar);

    while let Some(Ok(line)) = lines.next() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        let result = driver::parse(&grammar, &table, trimmed);
        println!("{}", if result.accepted { "accepted" } else { "rejected" });
        if let Some(error) = &result.error {
            println!("  {error}");
        }
        io::stdout().flush()?;
    }

    Ok(())
}

fn read_grammar_block<R: BufRead>(lines: &mut io::Lines<R>) -> Result<String> {
    let mut text = String::new();
    for line in lines.by_ref() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }
    if text.trim().is_empty() {
        return Err(GeneratorError::EmptyGrammar);
    }
    Ok(text)
}
