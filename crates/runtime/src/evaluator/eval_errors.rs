use colored::*;
use thiserror::Error;

use crate::values::VarType;

#[derive(Error, Debug, PartialEq)]
pub enum EvalError {
    #[error("{} while evaluating expression -{original}- (read as -{normalized}-): {reason}", "Error".red().bold())]
    UnparsableExpression {
        original: String,
        normalized: String,
        reason: String,
    },

    #[error("{} expression -{0}- gives a value of type -{1}-, expected -{2}-", "Error".red().bold())]
    WrongResultType(String, VarType, VarType),
}
