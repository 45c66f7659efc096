mod program_errors;

use tracing::{debug, info, trace};

pub use program_errors::ProgramError;

use crate::canvas::Canvas;
use crate::commands::CommandNode;
use crate::environment::Env;
use crate::evaluator::Evaluator;

pub const DEFAULT_EXECUTION_LIMIT: usize = 50_000;

// What a command sees of the program while it executes
pub struct Machine<'p> {
    pub env: &'p mut Env,
    pub canvas: &'p mut dyn Canvas,
    pub call_stack: &'p mut Vec<usize>,
    pub fill: &'p mut bool,
    pc: usize,
    len: usize,
    jumped: bool,
}

impl<'p> Machine<'p> {
    pub fn pc(&self) -> usize {
        self.pc
    }

    // Absolute jump, clamped to the end of the program
    pub fn jump(&mut self, target: usize) {
        debug!(from = self.pc, to = target.min(self.len), "jump");

        self.pc = target.min(self.len);
        self.jumped = true;
    }

    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&*self.env)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub steps: usize,
}

#[derive(Debug)]
pub struct Program {
    nodes: Vec<CommandNode>,
    pc: usize,
    env: Env,
    parsed: bool,
    execution_limit: usize,
    call_stack: Vec<usize>,
    fill: bool,
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Program {
    pub fn new() -> Self {
        Self {
            nodes: vec![],
            pc: 0,
            env: Env::new(),
            parsed: false,
            execution_limit: DEFAULT_EXECUTION_LIMIT,
            call_stack: vec![],
            fill: false,
        }
    }

    pub fn with_execution_limit(mut self, limit: usize) -> Self {
        self.execution_limit = limit;
        self
    }

    pub fn set_execution_limit(&mut self, limit: usize) {
        self.execution_limit = limit;
    }

    pub fn execution_limit(&self) -> usize {
        self.execution_limit
    }

    // Back to an empty program, the execution limit is kept
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.env.clear();
        self.call_stack.clear();
        self.pc = 0;
        self.parsed = false;
        self.fill = false;
    }

    // Appends a command and returns its position
    pub fn push(&mut self, node: CommandNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn commands(&self) -> &[CommandNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Env {
        &mut self.env
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn jump(&mut self, target: usize) {
        self.pc = target.min(self.nodes.len());
    }

    pub fn advance(&mut self) {
        self.jump(self.pc + 1);
    }

    pub fn mark_parsed(&mut self) {
        self.parsed = true;
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    pub fn fill(&self) -> bool {
        self.fill
    }

    pub fn run(&mut self, canvas: &mut dyn Canvas) -> Result<RunStats, ProgramError> {
        if !self.parsed {
            return Err(ProgramError::InvalidProgram);
        }

        // Every run starts from a blank state
        self.env.clear();
        self.call_stack.clear();
        self.fill = false;
        for node in self.nodes.iter() {
            node.command.reset();
        }

        let mut machine = Machine {
            env: &mut self.env,
            canvas,
            call_stack: &mut self.call_stack,
            fill: &mut self.fill,
            pc: 0,
            len: self.nodes.len(),
            jumped: false,
        };

        let result = execute_all(&self.nodes, &mut machine, self.execution_limit);
        self.pc = machine.pc;

        if let Ok(stats) = &result {
            info!(steps = stats.steps, variables = self.env.len(), "program completed");
        }

        result
    }
}

fn execute_all(
    nodes: &[CommandNode],
    machine: &mut Machine,
    limit: usize,
) -> Result<RunStats, ProgramError> {
    let mut steps = 0;

    while machine.pc < nodes.len() {
        if steps >= limit {
            return Err(ProgramError::ExecutionLimitExceeded {
                limit,
                position: machine.pc,
            });
        }

        let at = machine.pc;
        let node = &nodes[at];
        trace!(at, line = node.line + 1, command = %node, "execute");

        machine.jumped = false;
        node.command
            .execute(at, nodes, machine)
            .map_err(|e| ProgramError::Execution {
                position: at,
                line: node.line,
                source: e,
            })?;

        if !machine.jumped {
            machine.pc += 1;
        }
        steps += 1;
    }

    Ok(RunStats { steps })
}
