//! Error types for the LR(1) generator and driver.

use thiserror::Error;

/// Errors that can occur while parsing a grammar or driving a parse.
///
/// Table conflicts are not part of this enum: they are report-only data
/// attached to [`crate::table::ParsingTable`], not a raised error.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("empty grammar: no productions could be parsed")]
    EmptyGrammar,

    #[error("malformed rule: {0}")]
    MalformedRule(String),

    #[error(
        "syntax error: unexpected token {token:?} in state {state} (expected one of {expected:?})"
    )]
    SyntaxError {
        token: String,
        state: usize,
        expected: Vec<String>,
    },

    #[error("goto error: no entry for ({state}, {symbol}) after reducing by production {production}")]
    GotoError {
        state: usize,
        symbol: String,
        production: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for `Result`s in this crate.
pub type Result<T> = std::result::Result<T, GeneratorError>;
