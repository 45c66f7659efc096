use colored::*;
use thiserror::Error;

use crate::environment::EnvError;
use crate::evaluator::EvalError;
use crate::values::ValueError;

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    // Parameters, detected while configuring a command
    #[error("{} in '{0}' parameters: {1}", "Error".red().bold())]
    MalformedParameters(&'static str, String),

    #[error("{} invalid identifier -{0}-: {1}", "Error".red().bold())]
    InvalidIdentifier(String, String),

    #[error("{} in '{0}': {1}", "Error".red().bold())]
    InvalidParameter(&'static str, String),

    // Control flow
    #[error("{} in loop over -{0}-: step can't be zero", "Error".red().bold())]
    InvalidStep(String),

    #[error("{} no matching '{searched}' found for '{from}' at command #{position}", "Error".red().bold())]
    MissingBlockTerminator {
        searched: &'static str,
        from: &'static str,
        position: usize,
    },

    #[error("{} 'end for' reached while the loop over -{0}- isn't running", "Error".red().bold())]
    LoopNotRunning(String),

    #[error("{} call to undeclared method: {0}", "Error".red().bold())]
    UnknownMethod(String),

    #[error("{0}")]
    FromEnv(#[from] EnvError),

    #[error("{0}")]
    FromEval(#[from] EvalError),

    #[error("{0}")]
    FromValue(#[from] ValueError),
}
