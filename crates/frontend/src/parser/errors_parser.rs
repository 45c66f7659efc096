use colored::*;
use thiserror::*;

use runtime::commands::CommandError;
use tools::errors::ReportCodeErr;

#[derive(Error, Debug, PartialEq)]
pub enum ParserError {
    #[error("{} unknown command: {0}", "Error".red().bold())]
    UnknownCommand(String),

    // Assignments
    #[error("{} assignment to undeclared variable -{0}-. Declare it first with {}, {} or {}", "Error".red().bold(), "int".cyan(), "real".cyan(), "boolean".cyan())]
    UndeclaredVariable(String),

    #[error("{} -{0}- is an array, its elements are set with {}", "Error".red().bold(), "poke".cyan())]
    ArrayAssignment(String),

    // Blocks
    #[error("{} {} found outside of an {} block", "Error".red().bold(), "else".cyan(), "if".cyan())]
    ElseOutsideIf,

    #[error("{} second {} in the same {} block", "Error".red().bold(), "else".cyan(), "if".cyan())]
    DuplicateElse,

    #[error("{} found {} while the open block expects {}", "Error".red().bold(), .0.cyan(), .1.cyan())]
    MismatchedTerminator(&'static str, &'static str),

    #[error("{} found {} without any open block", "Error".red().bold(), .0.cyan())]
    StrayTerminator(&'static str),

    #[error("{} method -{0}- declared inside another method", "Error".red().bold())]
    NestedMethod(String),

    #[error("{} method -{0}- is already declared", "Error".red().bold())]
    DuplicateMethod(String),

    #[error("{} {} block is never closed, expected {}", "Error".red().bold(), .0.cyan(), .1.cyan())]
    UnterminatedBlock(&'static str, &'static str),

    #[error("{} call to undeclared method: {0}", "Error".red().bold())]
    UndeclaredMethod(String),

    // Whole program
    #[error("{0}")]
    ParseErrors(String),

    #[error("{0}")]
    FromCommand(#[from] CommandError),
}

// Implement global trait for final error
impl ReportCodeErr for ParserError {}
