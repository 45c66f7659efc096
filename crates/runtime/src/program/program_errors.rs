use colored::*;
use thiserror::Error;

use tools::errors::{CodeErr, ReportCodeErr};
use crate::commands::CommandError;

#[derive(Error, Debug, PartialEq)]
pub enum ProgramError {
    #[error("{} program can't run: it wasn't parsed successfully", "Error".red().bold())]
    InvalidProgram,

    #[error("{} execution limit of {limit} commands exceeded at command #{position}, possible infinite loop", "Error".red().bold())]
    ExecutionLimitExceeded { limit: usize, position: usize },

    #[error("{source}")]
    Execution {
        position: usize,
        line: u64,
        source: CommandError,
    },
}

impl ReportCodeErr for ProgramError {}

impl ProgramError {
    // Attaches the source line when there is one
    pub fn report(&self) -> CodeErr {
        match self {
            ProgramError::Execution { position, line, .. } => self.to_position_err(*position, *line),
            _ => CodeErr::new(self.to_string()),
        }
    }
}
