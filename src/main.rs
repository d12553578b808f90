//! Canonical LR(1) Parser Generator CLI.
//!
//! This implementation provides:
//! - Grammar augmentation and FIRST-set computation
//! - Canonical LR(1) item-set construction with conflict detection
//! - A table-driven driver emitting a step trace and parse tree
//! - A CLI for grammar analysis and input parsing
//!
//! # References
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools" (2nd Edition).
//! Addison-Wesley, 2006.

use clap::Parser;
use lr1_gen::cli;
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = cli::Cli::parse();
    if let Err(e) = cli::run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
