use tracing::debug;

use super::{check_identifier, Command, CommandError, CommandKind, CommandNode};
use crate::program::Machine;
use crate::resolver::{find_block_end, BlockKind};


fn single_name(kind: CommandKind, params: &str) -> Result<String, CommandError> {
    let params = params.trim();

    if params.is_empty() {
        return Err(CommandError::MalformedParameters(
            kind.keyword(),
            "expected a method name".into(),
        ));
    }
    if params.contains('(') || params.contains(char::is_whitespace) {
        return Err(CommandError::MalformedParameters(
            kind.keyword(),
            format!("methods take no parameters, found: {}", params),
        ));
    }
    check_identifier(params)?;

    Ok(params.to_string())
}

// method <name>
#[derive(Debug, Clone, PartialEq)]
pub struct MethodHeader {
    pub name: String,
}

impl MethodHeader {
    pub fn configure(params: &str) -> Result<Self, CommandError> {
        Ok(Self {
            name: single_name(CommandKind::Method, params)?,
        })
    }

    // Calls jump past the header, so executing it means the program walked
    // into the declaration: the body is skipped
    pub fn execute(
        &self,
        at: usize,
        program: &[CommandNode],
        machine: &mut Machine,
    ) -> Result<(), CommandError> {
        let block = find_block_end(program, at, BlockKind::Method)?;
        machine.jump(block.end + 1);

        Ok(())
    }
}

pub(super) fn execute_end_method(machine: &mut Machine) -> Result<(), CommandError> {
    if let Some(call_site) = machine.call_stack.pop() {
        machine.jump(call_site + 1);
    }

    Ok(())
}

// call <name>
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub name: String,
}

impl MethodCall {
    pub fn configure(params: &str) -> Result<Self, CommandError> {
        Ok(Self {
            name: single_name(CommandKind::Call, params)?,
        })
    }

    pub fn execute(
        &self,
        at: usize,
        program: &[CommandNode],
        machine: &mut Machine,
    ) -> Result<(), CommandError> {
        let header = find_method(program, &self.name)
            .ok_or_else(|| CommandError::UnknownMethod(self.name.clone()))?;

        debug!(at, method = %self.name, depth = machine.call_stack.len() + 1, "call");
        machine.call_stack.push(at);
        machine.jump(header + 1);

        Ok(())
    }
}

pub fn find_method(program: &[CommandNode], name: &str) -> Option<usize> {
    program
        .iter()
        .position(|node| matches!(&node.command, Command::Method(h) if h.name == name))
}
