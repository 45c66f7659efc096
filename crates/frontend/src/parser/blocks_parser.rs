use runtime::commands::{find_method, Command};
use runtime::program::Program;
use runtime::resolver::{BlockKind, BlockMarker, BlockRole};
use tools::errors::{CodeErr, ReportCodeErr};

use super::errors_parser::ParserError;
use super::{OpenBlock, Parser};

impl Parser {
    // Keeps the stack of open blocks in sync with the new command
    pub(super) fn track_block(&mut self, command: &Command, line: u64) -> Result<(), ParserError> {
        let Some((kind, role)) = command.block_role() else {
            return Ok(());
        };

        match role {
            BlockRole::Start => {
                if let Command::Method(header) = command {
                    if self.blocks.iter().any(|b| b.kind == BlockKind::Method) {
                        return Err(ParserError::NestedMethod(header.name.clone()));
                    }
                    if !self.methods.insert(header.name.clone()) {
                        return Err(ParserError::DuplicateMethod(header.name.clone()));
                    }
                }

                self.blocks.push(OpenBlock {
                    kind,
                    line,
                    has_else: false,
                });
            }
            BlockRole::Middle => match self.blocks.last_mut() {
                Some(block) if block.kind == kind => {
                    if block.has_else {
                        return Err(ParserError::DuplicateElse);
                    }
                    block.has_else = true;
                }
                _ => return Err(ParserError::ElseOutsideIf),
            },
            BlockRole::End => match self.blocks.last() {
                Some(block) if block.kind == kind => {
                    self.blocks.pop();
                }
                Some(block) => {
                    return Err(ParserError::MismatchedTerminator(
                        kind.end_keyword(),
                        block.kind.end_keyword(),
                    ))
                }
                None => return Err(ParserError::StrayTerminator(kind.end_keyword())),
            },
        }

        Ok(())
    }

    // Blocks still open at the end of the source, innermost last
    pub(super) fn unterminated_blocks(&mut self) -> Vec<CodeErr> {
        self.blocks
            .drain(..)
            .map(|b| {
                ParserError::UnterminatedBlock(b.kind.start_keyword(), b.kind.end_keyword())
                    .to_glob_err(b.line)
            })
            .collect()
    }

    // Methods can be called before being declared, so calls are checked
    // once the whole source is read
    pub(super) fn undeclared_calls(&self, program: &Program) -> Vec<CodeErr> {
        program
            .commands()
            .iter()
            .filter_map(|node| match &node.command {
                Command::Call(call) if find_method(program.commands(), &call.name).is_none() => {
                    Some(ParserError::UndeclaredMethod(call.name.clone()).to_glob_err(node.line))
                }
                _ => None,
            })
            .collect()
    }
}
