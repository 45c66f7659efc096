use runtime::canvas::{DrawOp, RecordingCanvas};
use runtime::commands::CommandError;
use runtime::environment::EnvError;
use runtime::evaluator::EvalError;
use runtime::program::{Program, ProgramError};
use runtime::values::{ElemType, RuntimeVal, ValueError, VarType};

use super::*;

fn run(source: &str) -> (Program, RecordingCanvas) {
    let mut program = parse(source).unwrap();
    let mut canvas = RecordingCanvas::new();
    program.run(&mut canvas).unwrap();

    (program, canvas)
}

fn run_err(source: &str) -> ProgramError {
    let mut program = parse(source).unwrap();
    let mut canvas = RecordingCanvas::new();

    match program.run(&mut canvas) {
        Err(e) => e,
        Ok(stats) => panic!("program ran in {} steps without error", stats.steps),
    }
}

fn var(program: &Program, name: &str) -> RuntimeVal {
    program.env().lookup_var(name).unwrap().clone()
}

fn parse_err(source: &str) -> String {
    match parse(source) {
        Err(ParserError::ParseErrors(report)) => report,
        other => panic!("expected parse errors, got: {:?}", other.map(|p| p.len())),
    }
}

fn single_line_err(previous: &str, line: &str) -> ParserError {
    let mut parser = Parser::new();
    let mut program = Program::new();

    for (idx, text) in previous.lines().enumerate() {
        parser.parse_line(text, idx as u64, &mut program).unwrap();
    }

    parser.parse_line(line, 99, &mut program).unwrap_err()
}

// ---- Declarations ----

#[test]
fn straight_line_declarations() {
    let (program, _) = run(
        "int x = 5
        real r = x / 2
        x = x + 1
        boolean b = x > 5
        int t = 7.9
        real y = 7",
    );

    assert_eq!(var(&program, "x"), RuntimeVal::Int(6));
    assert_eq!(var(&program, "r"), RuntimeVal::Real(2.5));
    assert_eq!(var(&program, "b"), RuntimeVal::Bool(true));
    assert_eq!(var(&program, "t"), RuntimeVal::Int(7));
    assert_eq!(var(&program, "y"), RuntimeVal::Real(7.0));
}

#[test]
fn real_division_keeps_decimals() {
    let (program, _) = run(
        "real r = 7 / 2
        int i = 7 / 2
        int n = 9
        real half = n / 2",
    );

    assert_eq!(var(&program, "r"), RuntimeVal::Real(3.5));
    assert_eq!(var(&program, "i"), RuntimeVal::Int(3));
    assert_eq!(var(&program, "half"), RuntimeVal::Real(4.5));
}

#[test]
fn real_division_by_zero_fails() {
    let err = run_err(
        "real r = 1.0 / 0
        write r",
    );

    assert!(matches!(
        err,
        ProgramError::Execution {
            source: CommandError::FromEval(EvalError::UnparsableExpression { .. }),
            line: 0,
            ..
        }
    ));
}

#[test]
fn assignment_updates_without_creating() {
    let err = run_err(
        "if false
            int x = 1
        end if
        x = 5",
    );

    assert!(matches!(
        err,
        ProgramError::Execution {
            source: CommandError::FromEnv(EnvError::UndeclaredVar(_)),
            line: 3,
            ..
        }
    ));
}

#[test]
fn defaults_and_comments() {
    let (program, _) = run(
        "// counters
        int a

        real b
        boolean c",
    );

    assert_eq!(var(&program, "a"), RuntimeVal::Int(0));
    assert_eq!(var(&program, "b"), RuntimeVal::Real(0.0));
    assert_eq!(var(&program, "c"), RuntimeVal::Bool(false));
    assert_eq!(program.len(), 3);
}

#[test]
fn strict_boolean_declaration() {
    let err = run_err("boolean b = nothing +");

    assert!(matches!(
        err,
        ProgramError::Execution {
            source: CommandError::FromEval(EvalError::UnparsableExpression { .. }),
            ..
        }
    ));
}

#[test]
fn boolean_in_int_context_fails() {
    let err = run_err("int x = 3 > 2");

    assert!(matches!(
        err,
        ProgramError::Execution {
            source: CommandError::FromEval(EvalError::WrongResultType(_, VarType::Bool, VarType::Int)),
            ..
        }
    ));
}

#[test]
fn assignments_need_a_declaration() {
    assert_eq!(
        single_line_err("", "x = 4"),
        ParserError::UndeclaredVariable("x".into())
    );
    assert_eq!(
        single_line_err("array int nums 3", "nums = 4"),
        ParserError::ArrayAssignment("nums".into())
    );
    assert_eq!(
        single_line_err("", "jump 4"),
        ParserError::UnknownCommand("jump".into())
    );
    assert!(matches!(
        single_line_err("int x", "real x = 1.5"),
        ParserError::FromCommand(CommandError::FromEnv(EnvError::TypeMismatch { .. }))
    ));
}

// ---- Conditionals ----

#[test]
fn conditionals() {
    let (_, canvas) = run(
        "if (8 > 3)
            write \"a\"
        else
            write \"b\"
        end if
        if (5 > 2) && (3 < 10)
            write \"c\"
        end if
        if 1 = 2
            write \"d\"
        else
            write \"e\"
        end if",
    );

    assert_eq!(canvas.texts(), vec!["a", "c", "e"]);
}

#[test]
fn unparsable_guard_is_false() {
    let (_, canvas) = run(
        "if nothing +
            write \"yes\"
        else
            write \"no\"
        end if
        while nothing >
            write \"never\"
        end while",
    );

    assert_eq!(canvas.texts(), vec!["no"]);
}

#[test]
fn nested_conditionals() {
    let (_, canvas) = run(
        "int x = 4
        if x > 1
            if x > 10
                write \"big\"
            else
                write \"medium\"
            end if
        else
            write \"small\"
        end if",
    );

    assert_eq!(canvas.texts(), vec!["medium"]);
}

// ---- Loops ----

#[test]
fn counted_loops() {
    let (_, canvas) = run(
        "for i = 1 to 5
            write i
        end for",
    );
    assert_eq!(canvas.texts(), vec!["1", "2", "3", "4", "5"]);

    let (_, canvas) = run(
        "for i = 1 to 10 step 2
            write i
        end for",
    );
    assert_eq!(canvas.texts(), vec!["1", "3", "5", "7", "9"]);

    let (_, canvas) = run(
        "for i = 5 to 1 step -1
            write i
        end for",
    );
    assert_eq!(canvas.texts(), vec!["5", "4", "3", "2", "1"]);
}

#[test]
fn zero_step_fails_before_any_iteration() {
    let mut program = parse(
        "for i = 1 to 10 step 0
            write i
        end for",
    )
    .unwrap();
    let mut canvas = RecordingCanvas::new();

    assert!(matches!(
        program.run(&mut canvas),
        Err(ProgramError::Execution {
            source: CommandError::InvalidStep(_),
            line: 0,
            ..
        })
    ));
    assert!(canvas.ops.is_empty());
}

#[test]
fn empty_counted_loop() {
    let (program, canvas) = run(
        "for i = 3 to 1
            write i
        end for",
    );

    assert!(canvas.ops.is_empty());
    assert_eq!(var(&program, "i"), RuntimeVal::Int(3));
}

#[test]
fn nested_loops_reenter() {
    let (program, _) = run(
        "int total = 0
        for i = 1 to 3
            for j = 1 to 4
                total = total + 1
            end for
        end for",
    );

    assert_eq!(var(&program, "total"), RuntimeVal::Int(12));
}

#[test]
fn counted_loop_reentered_from_conditional_loop() {
    let (program, canvas) = run(
        "int n = 0
        int total = 0
        while n < 3
            n = n + 1
            for i = 1 to n
                write i
                total = total + 1
            end for
        end while",
    );

    assert_eq!(canvas.texts(), vec!["1", "1", "2", "1", "2", "3"]);
    assert_eq!(var(&program, "total"), RuntimeVal::Int(6));
}

#[test]
fn deeply_nested_conditionals() {
    let (_, canvas) = run(
        "int x = 5
        if x > 0
            if x > 2
                if x > 4
                    if x > 6
                        write \"a\"
                    else
                        write \"b\"
                    end if
                else
                    write \"c\"
                end if
                write \"d\"
            else
                write \"e\"
            end if
        else
            write \"f\"
        end if
        write \"g\"",
    );

    assert_eq!(canvas.texts(), vec!["b", "d", "g"]);
}

#[test]
fn real_loop_variable() {
    let (program, canvas) = run(
        "real t = 0
        for t = 0 to 1 step 0.5
            write t
        end for",
    );

    assert_eq!(canvas.texts().len(), 3);
    assert_eq!(var(&program, "t"), RuntimeVal::Real(1.5));
}

#[test]
fn conditional_loop() {
    let (program, _) = run(
        "int n = 0
        while n < 3
            n = n + 1
        end while",
    );

    assert_eq!(var(&program, "n"), RuntimeVal::Int(3));
}

#[test]
fn runaway_loop_hits_limit() {
    let mut program = parse(
        "while true
        end while",
    )
    .unwrap();
    let mut canvas = RecordingCanvas::new();

    assert!(matches!(
        program.run(&mut canvas),
        Err(ProgramError::ExecutionLimitExceeded { limit: 50_000, .. })
    ));
}

// ---- Arrays ----

#[test]
fn oversized_array_fails_the_run() {
    let err = run_err("array int big 1152921504606846976");

    assert!(matches!(
        err,
        ProgramError::Execution {
            source: CommandError::FromValue(ValueError::ArraySizeTooLarge(1152921504606846976, _)),
            ..
        }
    ));
}

#[test]
fn real_array_takes_real_expressions() {
    let (program, _) = run(
        "array real halves 2
        poke halves 1 = 7 / 2
        peek h = halves 1",
    );

    assert_eq!(var(&program, "h"), RuntimeVal::Real(3.5));
}

#[test]
fn array_access() {
    let (program, _) = run(
        "array int nums 5
        poke nums 2 = 99
        peek x = nums 2",
    );

    assert_eq!(var(&program, "x"), RuntimeVal::Int(99));
}

#[test]
fn array_out_of_range() {
    let err = run_err(
        "array int nums 5
        peek x = nums 5",
    );

    assert!(matches!(
        err,
        ProgramError::Execution {
            source: CommandError::FromEnv(EnvError::ArrayAccess(_, ValueError::ArrayOverIndexing(5, 5))),
            line: 1,
            ..
        }
    ));
}

#[test]
fn array_redeclaration() {
    let (program, _) = run(
        "array int nums 5
        poke nums 0 = 4
        array real nums 3",
    );

    match var(&program, "nums") {
        RuntimeVal::Array(arr) => {
            assert_eq!(arr.elem_type(), ElemType::Real);
            assert_eq!(arr.values().to_vec(), vec![RuntimeVal::Real(0.0); 3]);
        }
        other => panic!("not an array: {:?}", other),
    }
}

// ---- Methods ----

#[test]
fn methods() {
    let (_, canvas) = run(
        "int size = 10
        call square
        size = 20
        call square

        method square
            rectangle size size
        end method",
    );

    assert_eq!(
        canvas.ops,
        vec![
            DrawOp::Rectangle { width: 10, height: 10, filled: false },
            DrawOp::Rectangle { width: 20, height: 20, filled: false },
        ]
    );
}

#[test]
fn method_errors() {
    assert!(parse_err("call nowhere").contains("nowhere"));
    assert_eq!(
        single_line_err("method a\nend method", "method a"),
        ParserError::DuplicateMethod("a".into())
    );
    assert_eq!(
        single_line_err("method a", "method b"),
        ParserError::NestedMethod("b".into())
    );
}

// ---- Block structure ----

#[test]
fn block_errors() {
    assert_eq!(single_line_err("", "else"), ParserError::ElseOutsideIf);
    assert_eq!(
        single_line_err("if true\nelse", "else"),
        ParserError::DuplicateElse
    );
    assert_eq!(
        single_line_err("if true\nwhile true", "else"),
        ParserError::ElseOutsideIf
    );
    assert_eq!(
        single_line_err("while true", "end for"),
        ParserError::MismatchedTerminator("end-for", "end-while")
    );
    assert_eq!(
        single_line_err("", "end if"),
        ParserError::StrayTerminator("end-if")
    );
}

#[test]
fn unterminated_blocks_are_reported_together() {
    let report = parse_err(
        "int x = 1
        while x < 3
            if x = 2
                write x
            x = x + 1",
    );

    assert!(report.contains("Line: 2"));
    assert!(report.contains("Line: 3"));
}

#[test]
fn every_bad_line_is_reported() {
    let report = parse_err(
        "int x = 1
        bogus 3
        pen 300 0 0
        y = 2",
    );

    assert!(report.contains("Line: 2"));
    assert!(report.contains("Line: 3"));
    assert!(report.contains("Line: 4"));
    assert!(!report.contains("Line: 1\n"));
}

#[test]
fn reparse_resets_program() {
    let mut parser = Parser::new();
    let mut program = Program::new();

    assert!(parser.parse_program("while true", &mut program).is_err());
    assert!(!program.is_parsed());

    parser.parse_program("int x = 2\nwrite x", &mut program).unwrap();
    assert!(program.is_parsed());
    assert_eq!(program.len(), 2);
}

// ---- Drawing ----

#[test]
fn drawing_commands() {
    let (_, canvas) = run(
        "int x = 10
        int y = x * 2
        pen 255, 0, 0
        moveto x, y
        drawto 0, -5
        fill on
        circle x / 2
        clear
        write \"done, bye\"",
    );

    assert_eq!(
        canvas.ops,
        vec![
            DrawOp::PenColor(255, 0, 0),
            DrawOp::MoveTo(10, 20),
            DrawOp::DrawTo(0, -5),
            DrawOp::Circle { radius: 5, filled: true },
            DrawOp::Clear,
            DrawOp::Text("done, bye".into()),
        ]
    );
}

#[test]
fn drawing_arguments_checked_at_runtime() {
    let err = run_err(
        "int r = 0
        circle r",
    );

    assert!(matches!(
        err,
        ProgramError::Execution {
            source: CommandError::InvalidParameter("circle", _),
            ..
        }
    ));
}
