use std::fmt::Display;

// Error already located in the source code, ready to be shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct CodeErr(String);

impl CodeErr {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl Display for CodeErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for CodeErr {}

pub trait ReportCodeErr {
    // Lines are stored 0-based, users read them 1-based
    fn to_glob_err(&self, line: u64) -> CodeErr
    where
        Self: std::fmt::Display,
    {
        CodeErr(format!("Line: {}\n{}", line + 1, self))
    }

    // Runtime errors also know which command of the program failed
    fn to_position_err(&self, position: usize, line: u64) -> CodeErr
    where
        Self: std::fmt::Display,
    {
        CodeErr(format!("Line: {}, command #{}\n{}", line + 1, position, self))
    }
}

// Joins a batch of located errors into a single report
pub fn join_errors(errors: &[CodeErr]) -> String {
    errors
        .iter()
        .map(|e| e.message().trim())
        .collect::<Vec<&str>>()
        .join("\n\n")
        .trim()
        .to_string()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Dummy;

    impl Display for Dummy {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "dummy failure")
        }
    }

    impl ReportCodeErr for Dummy {}

    #[test]
    fn line_is_one_based() {
        assert_eq!(Dummy.to_glob_err(0).message(), "Line: 1\ndummy failure");
    }

    #[test]
    fn position_is_reported() {
        assert_eq!(
            Dummy.to_position_err(4, 9).message(),
            "Line: 10, command #4\ndummy failure"
        );
    }

    #[test]
    fn join_trims_every_error() {
        let errs = vec![Dummy.to_glob_err(0), Dummy.to_glob_err(2)];

        assert_eq!(
            join_errors(&errs),
            "Line: 1\ndummy failure\n\nLine: 3\ndummy failure"
        );
        assert_eq!(join_errors(&[]), "");
    }
}
