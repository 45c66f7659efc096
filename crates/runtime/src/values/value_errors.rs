use colored::*;
use thiserror::Error;

use super::{ElemType, VarType};

#[derive(Debug, Error, PartialEq)]
pub enum ValueError {
    #[error("{}: trying to cast type -{0}- to type -{1}-, operation not allowed.", "Error".red().bold())]
    NotAllowedCast(VarType, VarType),

    #[error("{}: can't compute with a value of type -{0}-.", "Error".red().bold())]
    NonNumeric(VarType),

    // Arrays
    #[error("{}: index {0} is out of bound of array which is of size: -{1}-", "Error".red().bold())]
    ArrayOverIndexing(i64, usize),

    #[error("{}: array of {0} elements can't store a value of type -{1}-", "Error".red().bold())]
    WrongElemType(ElemType, VarType),

    #[error("{}: array size must be positive, found: {0}.", "Error".red().bold())]
    NegativeArraySize(i64),

    #[error("{}: array size {0} is over the limit of {1} elements.", "Error".red().bold())]
    ArraySizeTooLarge(i64, usize),
}
