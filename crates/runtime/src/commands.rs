mod command_errors;
mod conditional;
mod declaration;
mod loops;
mod method;
mod primitive;

use std::fmt::Display;

pub use command_errors::CommandError;
pub use conditional::Conditional;
pub use declaration::{ArrayDeclaration, Declaration, Peek, Poke};
pub use loops::{CountedLoop, WhileLoop};
pub use method::{find_method, MethodCall, MethodHeader};
pub use primitive::{Primitive, Text};

use crate::environment::Env;
use crate::program::Machine;
use crate::resolver::{BlockKind, BlockMarker, BlockRole};
use crate::values::{ElemType, VarType};


#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CommandKind {
    Int,
    Real,
    Boolean,
    Array,
    Peek,
    Poke,
    If,
    Else,
    EndIf,
    While,
    EndWhile,
    For,
    EndFor,
    Method,
    EndMethod,
    Call,
    Pen,
    Fill,
    MoveTo,
    DrawTo,
    Rectangle,
    Circle,
    Clear,
    Write,
}

impl CommandKind {
    pub const ALL: [CommandKind; 24] = [
        CommandKind::Int,
        CommandKind::Real,
        CommandKind::Boolean,
        CommandKind::Array,
        CommandKind::Peek,
        CommandKind::Poke,
        CommandKind::If,
        CommandKind::Else,
        CommandKind::EndIf,
        CommandKind::While,
        CommandKind::EndWhile,
        CommandKind::For,
        CommandKind::EndFor,
        CommandKind::Method,
        CommandKind::EndMethod,
        CommandKind::Call,
        CommandKind::Pen,
        CommandKind::Fill,
        CommandKind::MoveTo,
        CommandKind::DrawTo,
        CommandKind::Rectangle,
        CommandKind::Circle,
        CommandKind::Clear,
        CommandKind::Write,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            CommandKind::Int => "int",
            CommandKind::Real => "real",
            CommandKind::Boolean => "boolean",
            CommandKind::Array => "array",
            CommandKind::Peek => "peek",
            CommandKind::Poke => "poke",
            CommandKind::If => "if",
            CommandKind::Else => "else",
            CommandKind::EndIf => "end-if",
            CommandKind::While => "while",
            CommandKind::EndWhile => "end-while",
            CommandKind::For => "for",
            CommandKind::EndFor => "end-for",
            CommandKind::Method => "method",
            CommandKind::EndMethod => "end-method",
            CommandKind::Call => "call",
            CommandKind::Pen => "pen",
            CommandKind::Fill => "fill",
            CommandKind::MoveTo => "moveto",
            CommandKind::DrawTo => "drawto",
            CommandKind::Rectangle => "rectangle",
            CommandKind::Circle => "circle",
            CommandKind::Clear => "clear",
            CommandKind::Write => "write",
        }
    }
}

impl Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

// Words that can't name a variable or a method
const RESERVED_WORDS: [&str; 8] = ["end", "true", "false", "and", "or", "not", "to", "step"];

pub fn check_identifier(name: &str) -> Result<(), CommandError> {
    let mut chars = name.chars();

    let well_formed = match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    };

    if !well_formed {
        return Err(CommandError::InvalidIdentifier(
            name.into(),
            "must start with a letter and contain only letters, digits and '_'".into(),
        ));
    }

    let lower = name.to_lowercase();
    if RESERVED_WORDS.contains(&lower.as_str())
        || CommandKind::ALL.iter().any(|k| k.keyword() == lower)
    {
        return Err(CommandError::InvalidIdentifier(name.into(), "reserved word".into()));
    }

    Ok(())
}

// Splits "lhs = rhs" on the first '=' that isn't part of a comparison operator
pub fn split_assignment(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();

    for (idx, b) in bytes.iter().enumerate() {
        if *b != b'=' {
            continue;
        }

        let prev = if idx > 0 { bytes[idx - 1] } else { b' ' };
        let next = bytes.get(idx + 1).copied().unwrap_or(b' ');

        if !matches!(prev, b'<' | b'>' | b'!' | b'=') && next != b'=' {
            return Some((&text[..idx], &text[idx + 1..]));
        }
    }

    None
}

fn expect_no_params(kind: CommandKind, params: &str) -> Result<(), CommandError> {
    if params.trim().is_empty() {
        Ok(())
    } else {
        Err(CommandError::MalformedParameters(
            kind.keyword(),
            format!("takes no parameter, found: {}", params.trim()),
        ))
    }
}


#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Declaration(Declaration),
    ArrayDeclaration(ArrayDeclaration),
    Peek(Peek),
    Poke(Poke),
    If(Conditional),
    Else,
    EndIf,
    While(WhileLoop),
    EndWhile,
    For(CountedLoop),
    EndFor,
    Method(MethodHeader),
    EndMethod,
    Call(MethodCall),
    Primitive(Primitive),
}

impl Command {
    // Builds the command from the text following its keyword
    pub fn configure(kind: CommandKind, params: &str) -> Result<Command, CommandError> {
        let command = match kind {
            CommandKind::Int => Command::Declaration(Declaration::configure(VarType::Int, params)?),
            CommandKind::Real => Command::Declaration(Declaration::configure(VarType::Real, params)?),
            CommandKind::Boolean => Command::Declaration(Declaration::configure(VarType::Bool, params)?),
            CommandKind::Array => Command::ArrayDeclaration(ArrayDeclaration::configure(params)?),
            CommandKind::Peek => Command::Peek(Peek::configure(params)?),
            CommandKind::Poke => Command::Poke(Poke::configure(params)?),
            CommandKind::If => Command::If(Conditional::configure(params)?),
            CommandKind::While => Command::While(WhileLoop::configure(params)?),
            CommandKind::For => Command::For(CountedLoop::configure(params)?),
            CommandKind::Method => Command::Method(MethodHeader::configure(params)?),
            CommandKind::Call => Command::Call(MethodCall::configure(params)?),
            CommandKind::Else => {
                expect_no_params(kind, params)?;
                Command::Else
            }
            CommandKind::EndIf => {
                expect_no_params(kind, params)?;
                Command::EndIf
            }
            CommandKind::EndWhile => {
                expect_no_params(kind, params)?;
                Command::EndWhile
            }
            CommandKind::EndFor => {
                expect_no_params(kind, params)?;
                Command::EndFor
            }
            CommandKind::EndMethod => {
                expect_no_params(kind, params)?;
                Command::EndMethod
            }
            CommandKind::Pen
            | CommandKind::Fill
            | CommandKind::MoveTo
            | CommandKind::DrawTo
            | CommandKind::Rectangle
            | CommandKind::Circle
            | CommandKind::Clear
            | CommandKind::Write => Command::Primitive(Primitive::configure(kind, params)?),
        };

        command.validate()?;

        Ok(command)
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Declaration(decl) => match decl.var_type {
                VarType::Real => CommandKind::Real,
                VarType::Bool => CommandKind::Boolean,
                _ => CommandKind::Int,
            },
            Command::ArrayDeclaration(_) => CommandKind::Array,
            Command::Peek(_) => CommandKind::Peek,
            Command::Poke(_) => CommandKind::Poke,
            Command::If(_) => CommandKind::If,
            Command::Else => CommandKind::Else,
            Command::EndIf => CommandKind::EndIf,
            Command::While(_) => CommandKind::While,
            Command::EndWhile => CommandKind::EndWhile,
            Command::For(_) => CommandKind::For,
            Command::EndFor => CommandKind::EndFor,
            Command::Method(_) => CommandKind::Method,
            Command::EndMethod => CommandKind::EndMethod,
            Command::Call(_) => CommandKind::Call,
            Command::Primitive(p) => p.kind(),
        }
    }

    // Checks on literal parameters, nothing is evaluated here
    pub fn validate(&self) -> Result<(), CommandError> {
        match self {
            Command::Primitive(p) => p.validate(),
            _ => Ok(()),
        }
    }

    // Registers in the store what this command will declare at runtime, so
    // later lines can refer to it
    pub fn prepare(&self, env: &mut Env) -> Result<(), CommandError> {
        match self {
            Command::Declaration(decl) => decl.prepare(env),
            Command::ArrayDeclaration(decl) => decl.prepare(env),
            Command::Peek(peek) => peek.prepare(env),
            Command::Poke(poke) => poke.prepare(env),
            Command::For(counted) => counted.prepare(env),
            _ => Ok(()),
        }
    }

    pub fn execute(
        &self,
        at: usize,
        program: &[CommandNode],
        machine: &mut Machine,
    ) -> Result<(), CommandError> {
        match self {
            Command::Declaration(decl) => decl.execute(machine),
            Command::ArrayDeclaration(decl) => decl.execute(machine),
            Command::Peek(peek) => peek.execute(machine),
            Command::Poke(poke) => poke.execute(machine),
            Command::If(cond) => cond.execute(at, program, machine),
            Command::Else => conditional::execute_else(at, program, machine),
            Command::EndIf => Ok(()),
            Command::While(w) => w.execute(at, program, machine),
            Command::EndWhile => loops::execute_end_while(at, program, machine),
            Command::For(counted) => counted.execute(at, program, machine),
            Command::EndFor => loops::execute_end_for(at, program, machine),
            Command::Method(header) => header.execute(at, program, machine),
            Command::EndMethod => method::execute_end_method(machine),
            Command::Call(call) => call.execute(at, program, machine),
            Command::Primitive(p) => p.execute(machine),
        }
    }

    // Forgets state kept between two executions
    pub fn reset(&self) {
        if let Command::For(counted) = self {
            counted.reset();
        }
    }
}

impl BlockMarker for Command {
    fn block_role(&self) -> Option<(BlockKind, BlockRole)> {
        match self {
            Command::If(_) => Some((BlockKind::If, BlockRole::Start)),
            Command::Else => Some((BlockKind::If, BlockRole::Middle)),
            Command::EndIf => Some((BlockKind::If, BlockRole::End)),
            Command::While(_) => Some((BlockKind::While, BlockRole::Start)),
            Command::EndWhile => Some((BlockKind::While, BlockRole::End)),
            Command::For(_) => Some((BlockKind::For, BlockRole::Start)),
            Command::EndFor => Some((BlockKind::For, BlockRole::End)),
            Command::Method(_) => Some((BlockKind::Method, BlockRole::Start)),
            Command::EndMethod => Some((BlockKind::Method, BlockRole::End)),
            _ => None,
        }
    }
}

// A command with the place it comes from
#[derive(Debug, Clone, PartialEq)]
pub struct CommandNode {
    pub command: Command,
    pub line: u64,
    pub source: String,
}

impl CommandNode {
    pub fn new(command: Command, line: u64, source: String) -> Self {
        Self { command, line, source }
    }
}

impl BlockMarker for CommandNode {
    fn block_role(&self) -> Option<(BlockKind, BlockRole)> {
        self.command.block_role()
    }
}

impl Display for CommandNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

pub(crate) fn parse_elem_type(kind: CommandKind, word: &str) -> Result<ElemType, CommandError> {
    match word.to_lowercase().as_str() {
        "int" => Ok(ElemType::Int),
        "real" => Ok(ElemType::Real),
        other => Err(CommandError::MalformedParameters(
            kind.keyword(),
            format!("element type must be 'int' or 'real', found: {}", other),
        )),
    }
}
