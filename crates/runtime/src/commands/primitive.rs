use super::{CommandError, CommandKind};
use crate::program::Machine;

#[derive(Debug, Clone, PartialEq)]
pub enum Text {
    Literal(String),
    Expression(String),
}

// Drawing operations. Numeric arguments are expressions, one token each
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Pen { red: String, green: String, blue: String },
    Fill(bool),
    MoveTo { x: String, y: String },
    DrawTo { x: String, y: String },
    Rectangle { width: String, height: String },
    Circle { radius: String },
    Clear,
    Write(Text),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Range {
    Any,
    Channel,
    NonNegative,
    Positive,
}

impl Range {
    fn check(&self, kind: CommandKind, what: &str, value: i64) -> Result<i64, CommandError> {
        let ok = match self {
            Range::Any => true,
            Range::Channel => (0..=255).contains(&value),
            Range::NonNegative => (0..=u32::MAX as i64).contains(&value),
            Range::Positive => (1..=u32::MAX as i64).contains(&value),
        };

        if ok {
            Ok(value)
        } else {
            let expected = match self {
                Range::Any => "any integer",
                Range::Channel => "between 0 and 255",
                Range::NonNegative => "zero or more",
                Range::Positive => "strictly positive",
            };

            Err(CommandError::InvalidParameter(
                kind.keyword(),
                format!("{} must be {}, found: {}", what, expected, value),
            ))
        }
    }
}

fn args<const N: usize>(kind: CommandKind, params: &str) -> Result<[String; N], CommandError> {
    let tokens: Vec<String> = params.split_whitespace().map(String::from).collect();

    tokens.try_into().map_err(|found: Vec<String>| {
        CommandError::MalformedParameters(
            kind.keyword(),
            format!("expected {} arguments, found {}", N, found.len()),
        )
    })
}

impl Primitive {
    pub fn configure(kind: CommandKind, params: &str) -> Result<Self, CommandError> {
        let params = params.trim();

        let primitive = match kind {
            CommandKind::Pen => {
                let [red, green, blue] = args::<3>(kind, params)?;
                Primitive::Pen { red, green, blue }
            }
            CommandKind::Fill => match params.to_lowercase().as_str() {
                "on" | "true" | "1" => Primitive::Fill(true),
                "off" | "false" | "0" => Primitive::Fill(false),
                other => {
                    return Err(CommandError::MalformedParameters(
                        kind.keyword(),
                        format!("expected 'on' or 'off', found: {}", other),
                    ))
                }
            },
            CommandKind::MoveTo => {
                let [x, y] = args::<2>(kind, params)?;
                Primitive::MoveTo { x, y }
            }
            CommandKind::DrawTo => {
                let [x, y] = args::<2>(kind, params)?;
                Primitive::DrawTo { x, y }
            }
            CommandKind::Rectangle => {
                let [width, height] = args::<2>(kind, params)?;
                Primitive::Rectangle { width, height }
            }
            CommandKind::Circle => {
                if params.is_empty() {
                    return Err(CommandError::MalformedParameters(
                        kind.keyword(),
                        "expected a radius".into(),
                    ));
                }
                Primitive::Circle {
                    radius: params.to_string(),
                }
            }
            CommandKind::Clear => {
                if !params.is_empty() {
                    return Err(CommandError::MalformedParameters(
                        kind.keyword(),
                        format!("takes no parameter, found: {}", params),
                    ));
                }
                Primitive::Clear
            }
            CommandKind::Write => Primitive::Write(parse_text(params)?),
            other => {
                return Err(CommandError::MalformedParameters(
                    other.keyword(),
                    "not a drawing command".into(),
                ))
            }
        };

        Ok(primitive)
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Primitive::Pen { .. } => CommandKind::Pen,
            Primitive::Fill(_) => CommandKind::Fill,
            Primitive::MoveTo { .. } => CommandKind::MoveTo,
            Primitive::DrawTo { .. } => CommandKind::DrawTo,
            Primitive::Rectangle { .. } => CommandKind::Rectangle,
            Primitive::Circle { .. } => CommandKind::Circle,
            Primitive::Clear => CommandKind::Clear,
            Primitive::Write(_) => CommandKind::Write,
        }
    }

    fn checked_args(&self) -> Vec<(&str, &String, Range)> {
        match self {
            Primitive::Pen { red, green, blue } => vec![
                ("red", red, Range::Channel),
                ("green", green, Range::Channel),
                ("blue", blue, Range::Channel),
            ],
            Primitive::MoveTo { x, y } | Primitive::DrawTo { x, y } => {
                vec![("x", x, Range::Any), ("y", y, Range::Any)]
            }
            Primitive::Rectangle { width, height } => vec![
                ("width", width, Range::NonNegative),
                ("height", height, Range::NonNegative),
            ],
            Primitive::Circle { radius } => vec![("radius", radius, Range::Positive)],
            _ => vec![],
        }
    }

    // Literal arguments can be checked before the program runs
    pub fn validate(&self) -> Result<(), CommandError> {
        for (what, arg, range) in self.checked_args() {
            if let Ok(value) = arg.parse::<i64>() {
                range.check(self.kind(), what, value)?;
            }
        }

        Ok(())
    }

    pub fn execute(&self, machine: &mut Machine) -> Result<(), CommandError> {
        let kind = self.kind();

        let mut values: Vec<i64> = vec![];
        for (what, arg, range) in self.checked_args() {
            let value = machine.evaluator().int(arg)?;
            values.push(range.check(kind, what, value)?);
        }

        let filled = *machine.fill;
        let canvas = &mut *machine.canvas;

        // Ranges are checked above, casts can't truncate
        match self {
            Primitive::Pen { .. } => canvas.set_pen_color(values[0] as u8, values[1] as u8, values[2] as u8),
            Primitive::Fill(on) => *machine.fill = *on,
            Primitive::MoveTo { .. } => canvas.move_to(values[0], values[1]),
            Primitive::DrawTo { .. } => canvas.draw_to(values[0], values[1]),
            Primitive::Rectangle { .. } => canvas.draw_rectangle(values[0] as u32, values[1] as u32, filled),
            Primitive::Circle { .. } => canvas.draw_circle(values[0] as u32, filled),
            Primitive::Clear => canvas.clear(),
            Primitive::Write(Text::Literal(text)) => canvas.write_text(text),
            Primitive::Write(Text::Expression(expr)) => {
                let value = machine.evaluator().evaluate(expr)?;
                machine.canvas.write_text(&value.to_string());
            }
        }

        Ok(())
    }
}

fn parse_text(params: &str) -> Result<Text, CommandError> {
    if params.is_empty() {
        return Err(CommandError::MalformedParameters(
            CommandKind::Write.keyword(),
            "expected a quoted text or an expression".into(),
        ));
    }

    if let Some(rest) = params.strip_prefix('"') {
        return match rest.strip_suffix('"') {
            Some(text) => Ok(Text::Literal(text.to_string())),
            None => Err(CommandError::MalformedParameters(
                CommandKind::Write.keyword(),
                "missing closing '\"'".into(),
            )),
        };
    }

    Ok(Text::Expression(params.to_string()))
}
