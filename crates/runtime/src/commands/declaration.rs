use super::{check_identifier, parse_elem_type, split_assignment, CommandError, CommandKind};
use crate::environment::{Env, EnvError};
use crate::program::Machine;
use crate::values::{ArrayType, ElemType, RuntimeVal, VarType};


fn keyword_of(var_type: &VarType) -> &'static str {
    var_type.keyword().unwrap_or("array")
}

// int x
// real y = x * 1.5
// boolean done = y > 10
// y = y + 1 (update of a declared variable)
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub var_type: VarType,
    pub name: String,
    pub value: Option<String>,
    pub update: bool,
}

impl Declaration {
    pub fn configure(var_type: VarType, params: &str) -> Result<Self, CommandError> {
        let keyword = keyword_of(&var_type);

        let (name, value) = match split_assignment(params) {
            Some((name, value)) => {
                if value.trim().is_empty() {
                    return Err(CommandError::MalformedParameters(
                        keyword,
                        "expected an expression after '='".into(),
                    ));
                }
                (name.trim(), Some(value.trim().to_string()))
            }
            None => (params.trim(), None),
        };

        if name.is_empty() {
            return Err(CommandError::MalformedParameters(
                keyword,
                "expected a variable name".into(),
            ));
        }
        if name.contains(char::is_whitespace) {
            return Err(CommandError::MalformedParameters(
                keyword,
                format!("expected '=' after variable name, found: {}", name),
            ));
        }
        check_identifier(name)?;

        Ok(Self {
            var_type,
            name: name.to_string(),
            value,
            update: false,
        })
    }

    // The variable must then exist when the command runs, nothing is created
    pub fn into_update(self) -> Self {
        Self { update: true, ..self }
    }

    pub fn prepare(&self, env: &mut Env) -> Result<(), CommandError> {
        if self.update {
            env.var_type(&self.name)?;
            return Ok(());
        }

        Ok(env.declare_var(&self.name, self.var_type.default_value())?)
    }

    pub fn execute(&self, machine: &mut Machine) -> Result<(), CommandError> {
        let value = match &self.value {
            Some(expr) => machine.evaluator().evaluate_as(expr, &self.var_type)?,
            None => self.var_type.default_value(),
        };

        if self.update {
            Ok(machine.env.assign_var(&self.name, value)?)
        } else {
            Ok(machine.env.declare_var(&self.name, value)?)
        }
    }
}

// array int nums 5
// array real samples n * 2
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDeclaration {
    pub elem_type: ElemType,
    pub name: String,
    pub size: String,
}

impl ArrayDeclaration {
    pub fn configure(params: &str) -> Result<Self, CommandError> {
        let keyword = CommandKind::Array.keyword();
        let tokens: Vec<&str> = params.split_whitespace().collect();

        if tokens.len() < 3 {
            return Err(CommandError::MalformedParameters(
                keyword,
                "expected: array <int|real> <name> <size>".into(),
            ));
        }

        let elem_type = parse_elem_type(CommandKind::Array, tokens[0])?;
        check_identifier(tokens[1])?;

        Ok(Self {
            elem_type,
            name: tokens[1].to_string(),
            size: tokens[2..].join(" "),
        })
    }

    pub fn prepare(&self, env: &mut Env) -> Result<(), CommandError> {
        Ok(env.declare_var(&self.name, RuntimeVal::Array(ArrayType::empty(self.elem_type)))?)
    }

    pub fn execute(&self, machine: &mut Machine) -> Result<(), CommandError> {
        let size = machine.evaluator().int(&self.size)?;
        let array = ArrayType::new(self.elem_type, size)?;

        Ok(machine.env.declare_var(&self.name, RuntimeVal::Array(array))?)
    }
}

// Element type of an array known by the store
fn array_elem_type(env: &Env, name: &str) -> Result<ElemType, EnvError> {
    match env.var_type(name)? {
        VarType::Array(elem) => Ok(elem),
        _ => Err(EnvError::NotAnArray(name.to_string())),
    }
}

// Value as stored in a scalar of type var_type, ints widen into reals
fn fit_scalar(name: &str, var_type: VarType, value: RuntimeVal) -> Result<RuntimeVal, EnvError> {
    match (var_type, value) {
        (VarType::Real, RuntimeVal::Int(i)) => Ok(RuntimeVal::Real(i as f64)),
        (t, v) if t == v.get_type() => Ok(v),
        (t, v) => Err(EnvError::TypeMismatch {
            name: name.to_string(),
            expected: t,
            found: v.get_type(),
        }),
    }
}

// peek x = nums 2
#[derive(Debug, Clone, PartialEq)]
pub struct Peek {
    pub dest: String,
    pub array: String,
    pub index: String,
}

impl Peek {
    pub fn configure(params: &str) -> Result<Self, CommandError> {
        let keyword = CommandKind::Peek.keyword();
        let usage = || CommandError::MalformedParameters(keyword, "expected: peek <dest> = <array> <index>".into());

        let (dest, source) = split_assignment(params).ok_or_else(usage)?;
        let dest = dest.trim();
        let tokens: Vec<&str> = source.split_whitespace().collect();

        if dest.is_empty() || dest.contains(char::is_whitespace) || tokens.len() < 2 {
            return Err(usage());
        }
        check_identifier(dest)?;
        check_identifier(tokens[0])?;

        Ok(Self {
            dest: dest.to_string(),
            array: tokens[0].to_string(),
            index: tokens[1..].join(" "),
        })
    }

    pub fn prepare(&self, env: &mut Env) -> Result<(), CommandError> {
        let elem = array_elem_type(env, &self.array)?;

        if env.exists(&self.dest) {
            fit_scalar(&self.dest, env.var_type(&self.dest)?, elem.default_value())?;
        } else {
            env.declare_var(&self.dest, elem.default_value())?;
        }

        Ok(())
    }

    pub fn execute(&self, machine: &mut Machine) -> Result<(), CommandError> {
        let index = machine.evaluator().int(&self.index)?;
        let value = machine.env.peek(&self.array, index)?;

        if machine.env.exists(&self.dest) {
            let value = fit_scalar(&self.dest, machine.env.var_type(&self.dest)?, value)?;
            machine.env.assign_var(&self.dest, value)?;
        } else {
            machine.env.declare_var(&self.dest, value)?;
        }

        Ok(())
    }
}

// poke nums 2 = 99
#[derive(Debug, Clone, PartialEq)]
pub struct Poke {
    pub array: String,
    pub index: String,
    pub value: String,
}

impl Poke {
    pub fn configure(params: &str) -> Result<Self, CommandError> {
        let keyword = CommandKind::Poke.keyword();
        let usage = || CommandError::MalformedParameters(keyword, "expected: poke <array> <index> = <value>".into());

        let (target, value) = split_assignment(params).ok_or_else(usage)?;
        let tokens: Vec<&str> = target.split_whitespace().collect();

        if tokens.len() < 2 || value.trim().is_empty() {
            return Err(usage());
        }
        check_identifier(tokens[0])?;

        Ok(Self {
            array: tokens[0].to_string(),
            index: tokens[1..].join(" "),
            value: value.trim().to_string(),
        })
    }

    pub fn prepare(&self, env: &mut Env) -> Result<(), CommandError> {
        array_elem_type(env, &self.array)?;
        Ok(())
    }

    pub fn execute(&self, machine: &mut Machine) -> Result<(), CommandError> {
        let evaluator = machine.evaluator();
        let index = evaluator.int(&self.index)?;
        // Real arrays take a real expression, ints are rejected by the array
        let value = match array_elem_type(machine.env, &self.array)? {
            ElemType::Real => evaluator.evaluate_as(&self.value, &VarType::Real)?,
            ElemType::Int => evaluator.evaluate(&self.value)?,
        };

        Ok(machine.env.poke(&self.array, index, value)?)
    }
}
