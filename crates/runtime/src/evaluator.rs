mod eval_errors;

use evalexpr::Value;
use tracing::warn;

pub use eval_errors::EvalError;

use crate::environment::Env;
use crate::values::{RuntimeVal, ValueError, VarType};


// Characters always standing alone or as part of an operator
fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '^' | '(' | ')' | '<' | '>' | '=' | '!' | '&' | '|'
    )
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();

    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

fn split_tokens(expr: &str) -> Vec<String> {
    let mut tokens: Vec<String> = vec![];
    let mut word = String::new();

    for c in expr.chars() {
        if c.is_whitespace() || is_operator_char(c) {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }

            if !c.is_whitespace() {
                tokens.push(c.to_string());
            }
        } else {
            word.push(c);
        }
    }

    if !word.is_empty() {
        tokens.push(word);
    }

    tokens
}

// Step 1. Every operator and parenthesis gets spaces around it, then pieces of
// split operators are glued back: "a < = b" and "a<=b" both give "a <= b"
pub fn normalize(expr: &str) -> String {
    let mut merged: Vec<String> = vec![];

    for token in split_tokens(expr) {
        if let Some(last) = merged.last_mut() {
            let glued = match (last.as_str(), token.as_str()) {
                ("<", "=") => Some("<="),
                (">", "=") => Some(">="),
                ("=", "=") => Some("=="),
                ("!", "=") => Some("!="),
                ("<", ">") => Some("!="),
                ("&", "&") => Some("&&"),
                ("|", "|") => Some("||"),
                _ => None,
            };

            if let Some(op) = glued {
                *last = op.to_string();
                continue;
            }
        }

        merged.push(token);
    }

    merged
        .into_iter()
        .map(|t| if t == "=" { "==".to_string() } else { t })
        .collect::<Vec<String>>()
        .join(" ")
}

// Step 3. Logical words and single character forms to the evaluator syntax
fn rewrite_logical(token: &str) -> String {
    match token.to_lowercase().as_str() {
        "and" | "&" => "&&".into(),
        "or" | "|" => "||".into(),
        "not" => "!".into(),
        "true" => "true".into(),
        "false" => "false".into(),
        _ => token.into(),
    }
}

pub struct Evaluator<'a> {
    env: &'a Env,
}

impl<'a> Evaluator<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }

    // Step 2. Scalars are replaced by their value. Arrays stay as they are:
    // they are only reachable through peek and poke. With promotion, ints
    // are written as reals so divisions keep their decimals
    fn substitute(&self, normalized: &str, promote: bool) -> String {
        normalized
            .split(' ')
            .map(|token| {
                let value = if is_identifier(token) {
                    match self.env.lookup_var(token) {
                        Ok(RuntimeVal::Int(i)) if promote => RuntimeVal::Real(*i as f64).render(),
                        Ok(v) => v.render(),
                        Err(_) => None,
                    }
                } else if promote && !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
                    Some(format!("{}.0", token))
                } else {
                    None
                };

                match value {
                    Some(text) => text,
                    None => rewrite_logical(token),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }

    pub fn evaluate(&self, expr: &str) -> Result<RuntimeVal, EvalError> {
        self.evaluate_with(expr, false)
    }

    fn evaluate_with(&self, expr: &str, promote: bool) -> Result<RuntimeVal, EvalError> {
        let normalized = self.substitute(&normalize(expr), promote);

        let unparsable = |reason: String| EvalError::UnparsableExpression {
            original: expr.trim().to_string(),
            normalized: normalized.clone(),
            reason,
        };

        match evalexpr::eval(&normalized) {
            Ok(Value::Int(i)) => Ok(RuntimeVal::Int(i)),
            // Reals divided by zero give inf or NaN instead of failing
            Ok(Value::Float(f)) if !f.is_finite() => {
                Err(unparsable(format!("division by zero or non-finite result ({})", f)))
            }
            Ok(Value::Float(f)) => Ok(RuntimeVal::Real(f)),
            Ok(Value::Boolean(b)) => Ok(RuntimeVal::Bool(b)),
            Ok(Value::Empty) => Err(unparsable("empty expression".into())),
            Ok(other) => Err(unparsable(format!("unsupported result: {}", other))),
            Err(e) => Err(unparsable(e.to_string())),
        }
    }

    // Evaluates and converts to a declared scalar type
    pub fn evaluate_as(&self, expr: &str, var_type: &VarType) -> Result<RuntimeVal, EvalError> {
        self.evaluate_with(expr, *var_type == VarType::Real)?
            .try_cast_to(var_type)
            .map_err(|e| match e {
                ValueError::NotAllowedCast(found, expected) => {
                    EvalError::WrongResultType(expr.trim().to_string(), found, expected)
                }
                other => EvalError::UnparsableExpression {
                    original: expr.trim().to_string(),
                    normalized: normalize(expr),
                    reason: other.to_string(),
                },
            })
    }

    pub fn int(&self, expr: &str) -> Result<i64, EvalError> {
        match self.evaluate_as(expr, &VarType::Int)? {
            RuntimeVal::Int(i) => Ok(i),
            v => Err(EvalError::WrongResultType(expr.into(), v.get_type(), VarType::Int)),
        }
    }

    pub fn real(&self, expr: &str) -> Result<f64, EvalError> {
        match self.evaluate_as(expr, &VarType::Real)? {
            RuntimeVal::Real(r) => Ok(r),
            v => Err(EvalError::WrongResultType(expr.into(), v.get_type(), VarType::Real)),
        }
    }

    // Strict boolean context, used by declarations
    pub fn boolean(&self, expr: &str) -> Result<bool, EvalError> {
        match self.evaluate_as(expr, &VarType::Bool)? {
            RuntimeVal::Bool(b) => Ok(b),
            v => Err(EvalError::WrongResultType(expr.into(), v.get_type(), VarType::Bool)),
        }
    }

    // Guard of if and while. A guard that can't be evaluated is false, so
    // control flow never stops on it
    pub fn condition(&self, expr: &str) -> bool {
        match self.boolean(expr) {
            Ok(b) => b,
            Err(e) => {
                warn!(expression = expr, error = %e, "guard evaluated to false");
                false
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{ArrayType, ElemType};

    fn env_with(vars: &[(&str, RuntimeVal)]) -> Env {
        let mut env = Env::new();
        for (name, val) in vars {
            env.declare_var(name, val.clone()).unwrap();
        }
        env
    }

    #[test]
    fn spacing() {
        assert_eq!(normalize("(x+1)*2"), "( x + 1 ) * 2");
        assert_eq!(normalize("a<=b"), "a <= b");
        assert_eq!(normalize("a < = b"), "a <= b");
        assert_eq!(normalize("a!=b"), "a != b");
        assert_eq!(normalize("a <> b"), "a != b");
        assert_eq!(normalize("a = b"), "a == b");
        assert_eq!(normalize("a==b"), "a == b");
        assert_eq!(normalize("  3.5   *x "), "3.5 * x");
    }

    #[test]
    fn arithmetic() {
        let env = Env::new();
        let eval = Evaluator::new(&env);

        assert_eq!(eval.evaluate("1 + 2 * 3"), Ok(RuntimeVal::Int(7)));
        assert_eq!(eval.evaluate("(1 + 2) * 3"), Ok(RuntimeVal::Int(9)));
        assert_eq!(eval.evaluate("7 / 2.0"), Ok(RuntimeVal::Real(3.5)));
        assert_eq!(eval.evaluate("10 % 4"), Ok(RuntimeVal::Int(2)));
    }

    #[test]
    fn variables_are_substituted() {
        let env = env_with(&[
            ("x", RuntimeVal::Int(4)),
            ("y", RuntimeVal::Real(2.)),
            ("neg", RuntimeVal::Int(-3)),
            ("flag", RuntimeVal::Bool(true)),
        ]);
        let eval = Evaluator::new(&env);

        assert_eq!(eval.evaluate("x * 2"), Ok(RuntimeVal::Int(8)));
        assert_eq!(eval.evaluate("x / y"), Ok(RuntimeVal::Real(2.)));
        assert_eq!(eval.evaluate("x - neg"), Ok(RuntimeVal::Int(7)));
        assert_eq!(eval.evaluate("flag and x > 3"), Ok(RuntimeVal::Bool(true)));
    }

    #[test]
    fn comparisons_and_logic() {
        let env = Env::new();
        let eval = Evaluator::new(&env);

        assert_eq!(eval.evaluate("(8 > 3)"), Ok(RuntimeVal::Bool(true)));
        assert_eq!(eval.evaluate("(5 > 2) && (3 < 10)"), Ok(RuntimeVal::Bool(true)));
        assert_eq!(eval.evaluate("(5 > 2) AND (3 > 10)"), Ok(RuntimeVal::Bool(false)));
        assert_eq!(eval.evaluate("1 > 2 or 2 > 1"), Ok(RuntimeVal::Bool(true)));
        assert_eq!(eval.evaluate("1 > 2 | 2 > 1"), Ok(RuntimeVal::Bool(true)));
        assert_eq!(eval.evaluate("3 = 3"), Ok(RuntimeVal::Bool(true)));
        assert_eq!(eval.evaluate("3 <> 3"), Ok(RuntimeVal::Bool(false)));
        assert_eq!(eval.evaluate("not (2 >= 2)"), Ok(RuntimeVal::Bool(false)));
        assert_eq!(eval.evaluate("TRUE"), Ok(RuntimeVal::Bool(true)));
    }

    #[test]
    fn arrays_are_not_substituted() {
        let env = env_with(&[(
            "nums",
            RuntimeVal::Array(ArrayType::new(ElemType::Int, 3).unwrap()),
        )]);
        let eval = Evaluator::new(&env);

        assert!(matches!(
            eval.evaluate("nums + 1"),
            Err(EvalError::UnparsableExpression { .. })
        ));
    }

    #[test]
    fn unparsable_reports_both_texts() {
        let env = Env::new();
        let eval = Evaluator::new(&env);

        match eval.evaluate("ghost<=2") {
            Err(EvalError::UnparsableExpression { original, normalized, .. }) => {
                assert_eq!(original, "ghost<=2");
                assert_eq!(normalized, "ghost <= 2");
            }
            other => panic!("Expected an unparsable expression, got {:?}", other),
        }

        assert!(eval.evaluate("4 / 0").is_err());
        assert!(eval.evaluate("(1 + ").is_err());
        assert!(eval.evaluate("").is_err());
    }

    #[test]
    fn int_context() {
        let env = Env::new();
        let eval = Evaluator::new(&env);

        assert_eq!(eval.int("2 + 3"), Ok(5));
        assert_eq!(eval.int("7.9"), Ok(7));
        assert!(matches!(
            eval.int("1 < 2"),
            Err(EvalError::WrongResultType(_, VarType::Bool, VarType::Int))
        ));
        assert!(eval.int("oops +").is_err());
    }

    #[test]
    fn real_context() {
        let env = env_with(&[("n", RuntimeVal::Int(7)), ("neg", RuntimeVal::Int(-3))]);
        let eval = Evaluator::new(&env);

        assert_eq!(eval.real("3"), Ok(3.));
        assert_eq!(eval.real("1.25 * 2"), Ok(2.5));
        assert_eq!(eval.real("7 / 2"), Ok(3.5));
        assert_eq!(eval.real("n / 2"), Ok(3.5));
        assert_eq!(eval.real("neg / 2"), Ok(-1.5));
        assert!(eval.real("true").is_err());

        // Outside of the real context, ints divide as ints
        assert_eq!(eval.evaluate("n / 2"), Ok(RuntimeVal::Int(3)));
        assert_eq!(eval.int("n / 2"), Ok(3));
    }

    #[test]
    fn non_finite_results_fail() {
        let env = env_with(&[("zero", RuntimeVal::Real(0.))]);
        let eval = Evaluator::new(&env);

        assert!(matches!(
            eval.evaluate("1.0 / 0"),
            Err(EvalError::UnparsableExpression { .. })
        ));
        assert!(eval.real("1 / 0").is_err());
        assert!(eval.real("zero / zero").is_err());
    }

    #[test]
    fn boolean_contexts() {
        let env = Env::new();
        let eval = Evaluator::new(&env);

        assert_eq!(eval.boolean("true"), Ok(true));
        assert_eq!(eval.boolean("0"), Ok(false));
        assert_eq!(eval.boolean("2"), Ok(true));
        assert_eq!(eval.boolean("0.5"), Ok(true));
        assert!(eval.condition("(8 > 3)"));
        assert!(!eval.condition("3 - 3"));
    }

    // Declarations raise on bad input while guards silently read it as false
    #[test]
    fn unparsable_guard_is_false_but_declaration_raises() {
        let env = Env::new();
        let eval = Evaluator::new(&env);

        assert!(!eval.condition("ghost > 1"));
        assert!(!eval.condition("(1 +"));
        assert!(eval.boolean("ghost > 1").is_err());
        assert!(eval.int("ghost + 1").is_err());
    }
}
