use std::cell::RefCell;
use std::cmp::Ordering;

use tracing::debug;

use super::{check_identifier, split_assignment, Command, CommandError, CommandKind, CommandNode};
use crate::environment::{Env, EnvError};
use crate::program::Machine;
use crate::resolver::{find_block_end, find_block_start, BlockKind};
use crate::values::{RuntimeVal, ValueError, VarType};


// while <condition>
#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub condition: String,
}

impl WhileLoop {
    pub fn configure(params: &str) -> Result<Self, CommandError> {
        if params.trim().is_empty() {
            return Err(CommandError::MalformedParameters(
                CommandKind::While.keyword(),
                "expected a condition".into(),
            ));
        }

        Ok(Self {
            condition: params.trim().to_string(),
        })
    }

    // The guard is checked here at every iteration, 'end while' only jumps back
    pub fn execute(
        &self,
        at: usize,
        program: &[CommandNode],
        machine: &mut Machine,
    ) -> Result<(), CommandError> {
        if machine.evaluator().condition(&self.condition) {
            return Ok(());
        }

        let block = find_block_end(program, at, BlockKind::While)?;
        machine.jump(block.end + 1);

        Ok(())
    }
}

pub(super) fn execute_end_while(
    at: usize,
    program: &[CommandNode],
    machine: &mut Machine,
) -> Result<(), CommandError> {
    let start = find_block_start(program, at, BlockKind::While)?;
    machine.jump(start);

    Ok(())
}


// Bounds computed once when the loop is entered
#[derive(Debug, Clone, PartialEq)]
struct LoopState {
    end: RuntimeVal,
    step: RuntimeVal,
}

// for i = 1 to 10 step 2
#[derive(Debug, Clone, PartialEq)]
pub struct CountedLoop {
    pub var: String,
    pub start: String,
    pub end: String,
    pub step: Option<String>,
    state: RefCell<Option<LoopState>>,
}

impl CountedLoop {
    pub fn configure(params: &str) -> Result<Self, CommandError> {
        let keyword = CommandKind::For.keyword();
        let usage = || {
            CommandError::MalformedParameters(
                keyword,
                "expected: for <name> = <start> to <end> [step <step>]".into(),
            )
        };

        let (var, bounds) = split_assignment(params).ok_or_else(usage)?;
        let var = var.trim();
        if var.is_empty() || var.contains(char::is_whitespace) {
            return Err(usage());
        }
        check_identifier(var)?;

        let tokens: Vec<&str> = bounds.split_whitespace().collect();
        let to_pos = tokens
            .iter()
            .position(|t| t.eq_ignore_ascii_case("to"))
            .ok_or_else(usage)?;
        let step_pos = tokens
            .iter()
            .position(|t| t.eq_ignore_ascii_case("step"))
            .filter(|p| *p > to_pos);

        let start = tokens[..to_pos].join(" ");
        let end = tokens[to_pos + 1..step_pos.unwrap_or(tokens.len())].join(" ");
        let step = step_pos.map(|p| tokens[p + 1..].join(" "));

        if start.is_empty() || end.is_empty() || step.as_deref() == Some("") {
            return Err(usage());
        }

        Ok(Self {
            var: var.to_string(),
            start,
            end,
            step,
            state: RefCell::new(None),
        })
    }

    pub fn prepare(&self, env: &mut Env) -> Result<(), CommandError> {
        match env.var_type(&self.var) {
            Ok(VarType::Int) | Ok(VarType::Real) => Ok(()),
            Ok(other) => Err(CommandError::FromEnv(EnvError::TypeMismatch {
                name: self.var.clone(),
                expected: VarType::Int,
                found: other,
            })),
            Err(_) => Ok(env.declare_var(&self.var, RuntimeVal::Int(0))?),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().is_some()
    }

    pub fn reset(&self) {
        self.state.replace(None);
    }

    // An existing real variable makes a real loop, otherwise it counts in ints
    fn loop_type(&self, env: &Env) -> VarType {
        match env.var_type(&self.var) {
            Ok(VarType::Real) => VarType::Real,
            _ => VarType::Int,
        }
    }

    fn enter(&self, machine: &mut Machine) -> Result<(RuntimeVal, LoopState), CommandError> {
        let var_type = self.loop_type(machine.env);
        let evaluator = machine.evaluator();

        let start = evaluator.evaluate_as(&self.start, &var_type)?;
        let end = evaluator.evaluate_as(&self.end, &var_type)?;
        let step = match &self.step {
            Some(step) => evaluator.evaluate_as(step, &var_type)?,
            None => RuntimeVal::Int(1).try_cast_to(&var_type)?,
        };

        if step.is_zero()? {
            return Err(CommandError::InvalidStep(self.var.clone()));
        }

        machine.env.declare_var(&self.var, start.clone())?;

        Ok((start, LoopState { end, step }))
    }

    pub fn execute(
        &self,
        at: usize,
        program: &[CommandNode],
        machine: &mut Machine,
    ) -> Result<(), CommandError> {
        let running = self.state.borrow().clone();

        let (current, state) = match running {
            Some(state) => (machine.env.lookup_var(&self.var)?.clone(), state),
            None => self.enter(machine)?,
        };

        if keeps_going(&current, &state.end, &state.step)? {
            self.state.replace(Some(state));
            return Ok(());
        }

        // Exhausted, or zero iterations. Next entry starts from scratch
        self.reset();

        let block = find_block_end(program, at, BlockKind::For)?;
        debug!(at, var = %self.var, "loop done");
        machine.jump(block.end + 1);

        Ok(())
    }

    // Called by 'end for'
    fn step_forward(&self, machine: &mut Machine) -> Result<(), CommandError> {
        let step = match self.state.borrow().as_ref() {
            Some(state) => state.step.clone(),
            None => return Err(CommandError::LoopNotRunning(self.var.clone())),
        };

        let next = machine.env.lookup_var(&self.var)?.add(&step)?;
        machine.env.assign_var(&self.var, next)?;

        Ok(())
    }
}

fn keeps_going(value: &RuntimeVal, end: &RuntimeVal, step: &RuntimeVal) -> Result<bool, ValueError> {
    let ordering = match (value, end) {
        (RuntimeVal::Int(v), RuntimeVal::Int(e)) => Some(v.cmp(e)),
        _ => value.as_f64()?.partial_cmp(&end.as_f64()?),
    };

    Ok(match ordering {
        Some(ordering) if step.as_f64()? > 0. => ordering != Ordering::Greater,
        Some(ordering) => ordering != Ordering::Less,
        None => false,
    })
}

pub(super) fn execute_end_for(
    at: usize,
    program: &[CommandNode],
    machine: &mut Machine,
) -> Result<(), CommandError> {
    let start = find_block_start(program, at, BlockKind::For)?;

    if let Command::For(counted) = &program[start].command {
        counted.step_forward(machine)?;
    }

    machine.jump(start);

    Ok(())
}
