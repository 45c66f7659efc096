use colored::*;
use std::collections::{
    hash_map::Entry::{Occupied, Vacant},
    HashMap,
};
use thiserror::Error;

use super::values::{RuntimeVal, ValueError, VarType};


#[derive(Error, Debug, PartialEq)]
pub enum EnvError {
    #[error("{} undeclared variable: {0}", "Error".red().bold())]
    UndeclaredVar(String),

    #[error("{} variable -{name}- is of type -{expected}-, can't store a value of type -{found}-", "Error".red().bold())]
    TypeMismatch {
        name: String,
        expected: VarType,
        found: VarType,
    },

    #[error("{} variable -{0}- is not an array", "Error".red().bold())]
    NotAnArray(String),

    #[error("{} during access to array -{0}-: {1}", "Error".red().bold())]
    ArrayAccess(String, ValueError),
}

// Flat variable table, one namespace for the whole program
#[derive(Debug, PartialEq, Default)]
pub struct Env {
    vars: HashMap<String, RuntimeVal>,
}

impl Env {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn exists(&self, var: &str) -> bool {
        self.vars.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    // Creates the variable, or overwrites it if it keeps its type. Arrays can
    // be redeclared with another element type, their content is then reset
    pub fn declare_var(&mut self, var: &str, value: RuntimeVal) -> Result<(), EnvError> {
        match self.vars.entry(var.to_string()) {
            Vacant(e) => {
                e.insert(value);
            }
            Occupied(mut e) => {
                let existing = e.get().get_type();
                let found = value.get_type();

                if existing != found && !(existing.is_array() && found.is_array()) {
                    return Err(EnvError::TypeMismatch {
                        name: var.to_string(),
                        expected: existing,
                        found,
                    });
                }

                e.insert(value);
            }
        }

        Ok(())
    }

    pub fn lookup_var(&self, var: &str) -> Result<&RuntimeVal, EnvError> {
        self.vars
            .get(var)
            .ok_or_else(|| EnvError::UndeclaredVar(var.to_string()))
    }

    pub fn var_type(&self, var: &str) -> Result<VarType, EnvError> {
        Ok(self.lookup_var(var)?.get_type())
    }

    // Assign a new value to an existing var, types must agree
    pub fn assign_var(&mut self, var: &str, value: RuntimeVal) -> Result<(), EnvError> {
        if let Some(current) = self.vars.get_mut(var) {
            if !current.is_same_type(&value) {
                return Err(EnvError::TypeMismatch {
                    name: var.to_string(),
                    expected: current.get_type(),
                    found: value.get_type(),
                });
            }

            *current = value;
            Ok(())
        } else {
            Err(EnvError::UndeclaredVar(var.to_string()))
        }
    }

    pub fn peek(&self, array: &str, index: i64) -> Result<RuntimeVal, EnvError> {
        match self.lookup_var(array)? {
            RuntimeVal::Array(arr) => arr
                .get(index)
                .map_err(|e| EnvError::ArrayAccess(array.to_string(), e)),
            _ => Err(EnvError::NotAnArray(array.to_string())),
        }
    }

    pub fn poke(&mut self, array: &str, index: i64, value: RuntimeVal) -> Result<(), EnvError> {
        match self.vars.get_mut(array) {
            Some(RuntimeVal::Array(arr)) => arr
                .set(index, value)
                .map_err(|e| EnvError::ArrayAccess(array.to_string(), e)),
            Some(_) => Err(EnvError::NotAnArray(array.to_string())),
            None => Err(EnvError::UndeclaredVar(array.to_string())),
        }
    }

    // Every non-array variable, the only ones an expression can read directly
    pub fn scalars(&self) -> impl Iterator<Item = (&String, &RuntimeVal)> {
        self.vars
            .iter()
            .filter(|(_, v)| !matches!(v, RuntimeVal::Array(_)))
    }

    // Sorted view, used for dumps
    pub fn variables(&self) -> Vec<(&String, &RuntimeVal)> {
        let mut all: Vec<(&String, &RuntimeVal)> = self.vars.iter().collect();
        all.sort_by(|a, b| a.0.cmp(b.0));
        all
    }
}
