use std::collections::HashSet;

mod blocks_parser;
mod errors_parser;
#[cfg(test)]
mod program_tests;

pub use errors_parser::ParserError;

use tracing::{debug, info};

use runtime::commands::{split_assignment, Command, CommandKind, CommandNode};
use runtime::environment::Env;
use runtime::program::Program;
use runtime::resolver::BlockKind;
use runtime::values::VarType;
use tools::errors::{join_errors, CodeErr, ReportCodeErr};

use crate::lexer::{Lexer, LineTokens};


// Block opened on some line and not closed yet
#[derive(Debug, Clone, PartialEq)]
struct OpenBlock {
    kind: BlockKind,
    line: u64,
    has_else: bool,
}

#[derive(Debug, Default)]
pub struct Parser {
    lexer: Lexer,
    blocks: Vec<OpenBlock>,
    methods: HashSet<String>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    // Parses every line of the source into the program. Errors are collected
    // for the whole source before being reported together
    pub fn parse_program(&mut self, source: &str, program: &mut Program) -> Result<(), ParserError> {
        program.reset();
        self.blocks.clear();
        self.methods.clear();

        let mut errors: Vec<CodeErr> = vec![];

        for (line, text) in source.lines().enumerate() {
            if let Err(e) = self.parse_line(text, line as u64, program) {
                errors.push(e.to_glob_err(line as u64));
            }
        }

        errors.extend(self.unterminated_blocks());
        errors.extend(self.undeclared_calls(program));

        if !errors.is_empty() {
            debug!(errors = errors.len(), "parsing failed");
            return Err(ParserError::ParseErrors(join_errors(&errors)));
        }

        program.mark_parsed();
        info!(commands = program.len(), "program parsed");

        Ok(())
    }

    // Returns the position of the new command, or nothing for lines without
    // any command
    pub fn parse_line(
        &mut self,
        text: &str,
        line: u64,
        program: &mut Program,
    ) -> Result<Option<usize>, ParserError> {
        let Some(tokens) = self.lexer.tokenize_line(text, line) else {
            return Ok(None);
        };

        let (kind, params, update) = self.resolve_keyword(&tokens, program.env())?;
        let command = match Command::configure(kind, &params)? {
            Command::Declaration(decl) if update => Command::Declaration(decl.into_update()),
            command => command,
        };
        command.prepare(program.env_mut())?;

        self.track_block(&command, line)?;

        let source = if update {
            params
        } else if params.is_empty() {
            kind.keyword().to_string()
        } else {
            format!("{} {}", kind, params)
        };
        debug!(line = line + 1, command = %source, "parsed");

        Ok(Some(program.push(CommandNode::new(command, line, source))))
    }

    // A line starting with a variable name is an update of that variable,
    // which goes through the declaration command of its type
    fn resolve_keyword(&self, tokens: &LineTokens, env: &Env) -> Result<(CommandKind, String, bool), ParserError> {
        if let Some(kind) = self.lexer.command_kind(&tokens.keyword) {
            return Ok((kind, tokens.params.clone(), false));
        }

        if let Some((name, _)) = split_assignment(&tokens.text) {
            let name = name.trim();

            if !name.is_empty() && !name.contains(char::is_whitespace) {
                let kind = match env.var_type(name) {
                    Ok(VarType::Array(_)) => return Err(ParserError::ArrayAssignment(name.into())),
                    Ok(var_type) => var_type.keyword().and_then(|k| self.lexer.command_kind(k)),
                    Err(_) => return Err(ParserError::UndeclaredVariable(name.into())),
                };

                if let Some(kind) = kind {
                    return Ok((kind, tokens.text.clone(), true));
                }
            }
        }

        Err(ParserError::UnknownCommand(tokens.keyword.clone()))
    }
}

pub fn parse(source: &str) -> Result<Program, ParserError> {
    let mut program = Program::new();
    Parser::new().parse_program(source, &mut program)?;

    Ok(program)
}
