use std::fmt::{Debug, Display};

mod array;
mod value_errors;

pub use array::{ArrayType, MAX_ARRAY_SIZE};
pub use value_errors::ValueError;


#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ElemType {
    Int,
    Real,
}

impl ElemType {
    pub fn default_value(&self) -> RuntimeVal {
        match self {
            ElemType::Int => RuntimeVal::Int(0),
            ElemType::Real => RuntimeVal::Real(0.),
        }
    }

    pub fn scalar_type(&self) -> VarType {
        match self {
            ElemType::Int => VarType::Int,
            ElemType::Real => VarType::Real,
        }
    }
}

impl Display for ElemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElemType::Int => write!(f, "int"),
            ElemType::Real => write!(f, "real"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum VarType {
    Int,
    Real,
    Bool,
    Array(ElemType),
}

impl VarType {
    pub fn is_array(&self) -> bool {
        matches!(self, VarType::Array(_))
    }

    // Keyword declaring a scalar of this type
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            VarType::Int => Some("int"),
            VarType::Real => Some("real"),
            VarType::Bool => Some("boolean"),
            VarType::Array(_) => None,
        }
    }

    pub fn default_value(&self) -> RuntimeVal {
        match self {
            VarType::Int => RuntimeVal::Int(0),
            VarType::Real => RuntimeVal::Real(0.),
            VarType::Bool => RuntimeVal::Bool(false),
            VarType::Array(elem) => RuntimeVal::Array(ArrayType::empty(*elem)),
        }
    }
}

impl Display for VarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarType::Int => write!(f, "int"),
            VarType::Real => write!(f, "real"),
            VarType::Bool => write!(f, "boolean"),
            VarType::Array(elem) => write!(f, "{} array", elem),
        }
    }
}


// A variable entry of the store. Arrays are stored inline, scalars are Copy-cheap
#[derive(Clone, PartialEq)]
pub enum RuntimeVal {
    Int(i64),
    Real(f64),
    Bool(bool),
    Array(ArrayType),
}

impl Debug for RuntimeVal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RuntimeVal::Int(nb) => write!(f, "Int({})", nb),
            RuntimeVal::Real(nb) => write!(f, "Real({})", nb),
            RuntimeVal::Bool(b) => write!(f, "Bool({})", b),
            RuntimeVal::Array(arr) => write!(f, "{} array {:?}", arr.elem_type(), arr.values()),
        }
    }
}

impl Display for RuntimeVal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeVal::Int(nb) => write!(f, "{}", nb),
            RuntimeVal::Real(nb) => write!(f, "{}", nb),
            RuntimeVal::Bool(b) => write!(f, "{}", b),
            RuntimeVal::Array(arr) => {
                write!(f, "[")?;

                for (idx, val) in arr.values().iter().enumerate() {
                    write!(f, "{}", val)?;

                    // We write a comma only if there is another value after
                    if idx != arr.len() - 1 {
                        write!(f, ", ")?;
                    }
                }

                write!(f, "]")
            }
        }
    }
}

impl RuntimeVal {
    pub fn get_type(&self) -> VarType {
        match self {
            RuntimeVal::Int(_) => VarType::Int,
            RuntimeVal::Real(_) => VarType::Real,
            RuntimeVal::Bool(_) => VarType::Bool,
            RuntimeVal::Array(arr) => VarType::Array(arr.elem_type()),
        }
    }

    pub fn is_same_type(&self, other: &RuntimeVal) -> bool {
        self.get_type() == other.get_type()
    }

    // Whole number view of a scalar, for code paths that only know integers.
    // Computed on demand so it can't drift from the real value
    pub fn legacy_int(&self) -> Option<i64> {
        match self {
            RuntimeVal::Int(i) => Some(*i),
            RuntimeVal::Real(r) => Some(r.trunc() as i64),
            RuntimeVal::Bool(b) => Some(*b as i64),
            RuntimeVal::Array(_) => None,
        }
    }

    pub fn as_f64(&self) -> Result<f64, ValueError> {
        match self {
            RuntimeVal::Int(i) => Ok(*i as f64),
            RuntimeVal::Real(r) => Ok(*r),
            v => Err(ValueError::NonNumeric(v.get_type())),
        }
    }

    pub fn is_zero(&self) -> Result<bool, ValueError> {
        Ok(self.as_f64()? == 0.)
    }

    // Scalar coercions allowed between declared types
    pub fn try_cast_to(self, to_type: &VarType) -> Result<Self, ValueError> {
        match (self, to_type) {
            (v @ RuntimeVal::Int(_), VarType::Int) => Ok(v),
            (v @ RuntimeVal::Real(_), VarType::Real) => Ok(v),
            (v @ RuntimeVal::Bool(_), VarType::Bool) => Ok(v),
            (RuntimeVal::Int(i), VarType::Real) => Ok(RuntimeVal::Real(i as f64)),
            // Reals lose their decimals toward zero
            (RuntimeVal::Real(r), VarType::Int) => Ok(RuntimeVal::Int(r.trunc() as i64)),
            (RuntimeVal::Int(i), VarType::Bool) => Ok(RuntimeVal::Bool(i != 0)),
            (RuntimeVal::Real(r), VarType::Bool) => Ok(RuntimeVal::Bool(r != 0.)),
            (v, o) => Err(ValueError::NotAllowedCast(v.get_type(), *o)),
        }
    }

    // Sum used to step numeric loop variables. Int only stays int with an int step
    pub fn add(&self, rhs: &RuntimeVal) -> Result<RuntimeVal, ValueError> {
        match (self, rhs) {
            (RuntimeVal::Int(a), RuntimeVal::Int(b)) => Ok(RuntimeVal::Int(a.wrapping_add(*b))),
            (RuntimeVal::Int(_), other) => Err(ValueError::NotAllowedCast(other.get_type(), VarType::Int)),
            (lhs, rhs) => Ok(RuntimeVal::Real(lhs.as_f64()? + rhs.as_f64()?)),
        }
    }

    // Text put in place of the variable name inside an expression. Always uses
    // '.' as decimal separator and keeps reals recognisable as reals
    pub fn render(&self) -> Option<String> {
        let text = match self {
            RuntimeVal::Int(i) => i.to_string(),
            RuntimeVal::Real(r) => {
                let mut s = format!("{}", r);
                if r.is_finite() && !s.contains('.') {
                    s.push_str(".0");
                }
                s
            }
            RuntimeVal::Bool(b) => b.to_string(),
            RuntimeVal::Array(_) => return None,
        };

        if text.starts_with('-') {
            Some(format!("({})", text))
        } else {
            Some(text)
        }
    }
}
