pub mod canvas;
pub mod commands;
pub mod environment;
pub mod evaluator;
pub mod program;
pub mod resolver;
pub mod values;

extern crate tools;

pub use canvas::{Canvas, DrawOp, RecordingCanvas};
pub use commands::{Command, CommandError, CommandKind, CommandNode};
pub use environment::{Env, EnvError};
pub use program::{Program, ProgramError, RunStats, DEFAULT_EXECUTION_LIMIT};
pub use values::{RuntimeVal, VarType};
