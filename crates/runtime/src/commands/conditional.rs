use tracing::debug;

use super::{CommandError, CommandKind, CommandNode};
use crate::program::Machine;
use crate::resolver::{find_block_end, BlockKind};

// if <condition>
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub condition: String,
}

impl Conditional {
    pub fn configure(params: &str) -> Result<Self, CommandError> {
        if params.trim().is_empty() {
            return Err(CommandError::MalformedParameters(
                CommandKind::If.keyword(),
                "expected a condition".into(),
            ));
        }

        Ok(Self {
            condition: params.trim().to_string(),
        })
    }

    // True: the next command is the first of the 'then' body. False: we go
    // right after the else, or after the end if there is none
    pub fn execute(
        &self,
        at: usize,
        program: &[CommandNode],
        machine: &mut Machine,
    ) -> Result<(), CommandError> {
        if machine.evaluator().condition(&self.condition) {
            return Ok(());
        }

        let block = find_block_end(program, at, BlockKind::If)?;
        let target = block.middle.unwrap_or(block.end) + 1;

        debug!(at, target, "condition false, skipping body");
        machine.jump(target);

        Ok(())
    }
}

// Only reached at the end of a 'then' body: the else body is skipped
pub(super) fn execute_else(
    at: usize,
    program: &[CommandNode],
    machine: &mut Machine,
) -> Result<(), CommandError> {
    let block = find_block_end(program, at, BlockKind::If)?;
    machine.jump(block.end + 1);

    Ok(())
}
