use std::error::Error;

use test_case::test_case;

use crate::{
    environment::prelude::{Value, ValueType},
    lexer::prelude::Token,
    parser::prelude::{parse_program, Expression, Statement},
    profiler::prelude::Profiler,
    utils::prelude::SrcSpan
};

use super::prelude::{Interpreter, RuntimeError, RuntimeErrorType};

const PROGRAM: &str = r#"
let x = 10
routine add [a, b] ^
return a + b
^
x = add[x, 5]
for <let i = 0; i < 3; i*> ^ x = add[x, 1] ^
"#;

fn run(src: &str) -> Result<Interpreter, Box<dyn Error>> {
    let program = parse_program(src)?;
    let mut interpreter = Interpreter::new();

    interpreter.interpret(&program)?;

    Ok(interpreter)
}

fn runtime_error(src: &str) -> RuntimeError {
    let program = parse_program(src).expect("program should parse");

    Interpreter::new()
        .interpret(&program)
        .expect_err("program should fail at runtime")
}

fn number(value: f64) -> Value {
    Value::Number { value }
}

#[test]
fn test_program() -> Result<(), Box<dyn Error>> {
    let interpreter = run(PROGRAM)?;

    assert_eq!(interpreter.global("x"), Some(&number(18.0)));
    assert_eq!(interpreter.usage_of("add"), Some(4));
    assert_eq!(interpreter.function_usage(), vec![("add", 4)]);
    assert_eq!(interpreter.execution_priority(), Some("add"));

    Ok(())
}

#[test]
fn test_closure_sees_later_mutation() -> Result<(), Box<dyn Error>> {
    let interpreter = run(r#"
        let y = 1
        routine get_y ^ return y ^
        y = 5
        let r = get_y[]
    "#)?;

    assert_eq!(interpreter.global("r"), Some(&number(5.0)));

    Ok(())
}

#[test]
fn test_scoping_is_lexical() -> Result<(), Box<dyn Error>> {
    let interpreter = run(r#"
        let v = 1
        routine read ^ return v ^
        routine shadow ^
            let v = 100
            return read[]
        ^
        let r = shadow[]
    "#)?;

    assert_eq!(interpreter.global("r"), Some(&number(1.0)));

    Ok(())
}

#[test]
fn test_closure_outlives_its_call() -> Result<(), Box<dyn Error>> {
    let interpreter = run(r#"
        routine make [start] ^
            let count = start
            routine next ^
                count = count + 1
                return count
            ^
            return next
        ^
        let counter = make[10]
        let a = counter[]
        let b = counter[]
    "#)?;

    assert_eq!(interpreter.global("a"), Some(&number(11.0)));
    assert_eq!(interpreter.global("b"), Some(&number(12.0)));
    assert_eq!(interpreter.usage_of("next"), Some(2));
    assert_eq!(interpreter.usage_of("make"), Some(1));

    // global plus the captured frame of `make`
    assert_eq!(interpreter.environment().live_frames(), 2);

    Ok(())
}

#[test_case(0 ; "never")]
#[test_case(1 ; "once")]
#[test_case(7 ; "seven times")]
fn test_for_runs_n_times(n: usize) -> Result<(), Box<dyn Error>> {
    let src = format!(r#"
        let runs = 0
        let last = 0 - 1
        for <let i = 0; i < {n}; i*> ^
            runs*
            last = i
        ^
    "#);

    let interpreter = run(&src)?;

    assert_eq!(interpreter.global("runs"), Some(&number(n as f64)));
    assert_eq!(interpreter.global("last"), Some(&number(n as f64 - 1.0)));
    assert_eq!(interpreter.global("i"), None);

    Ok(())
}

#[test]
fn test_frames_are_released() -> Result<(), Box<dyn Error>> {
    let interpreter = run(r#"
        routine add [a, b] ^ return a + b ^
        let x = 0
        for <let i = 0; i < 100; i*> ^
            let step = add[i, 1]
            x = add[x, step]
        ^
    "#)?;

    assert_eq!(interpreter.global("x"), Some(&number(5050.0)));
    assert_eq!(interpreter.environment().live_frames(), 1);

    Ok(())
}

#[test]
fn test_nested_blocks_in_routine() -> Result<(), Box<dyn Error>> {
    let interpreter = run(r#"
        routine sum_to [n] ^
            let total = 0
            for <let i = 1; i <= n; i*> ^
                total = total + i
            ^
            return total
        ^
        let s = sum_to[4]
    "#)?;

    assert_eq!(interpreter.global("s"), Some(&number(10.0)));

    Ok(())
}

#[test]
fn test_return_leaves_loop_and_routine() -> Result<(), Box<dyn Error>> {
    let interpreter = run(r#"
        let seen = 0
        routine first_over [limit] ^
            for <let i = 0; i < 100; i*> ^
                seen = i
                for <let j = 0; j < 1; j*> ^
                    return i + limit
                ^
            ^
            return 0 - 1
        ^
        let r = first_over[3]
    "#)?;

    assert_eq!(interpreter.global("r"), Some(&number(3.0)));
    assert_eq!(interpreter.global("seen"), Some(&number(0.0)));
    assert_eq!(interpreter.environment().live_frames(), 1);

    Ok(())
}

#[test]
fn test_missing_return_gives_nothing() -> Result<(), Box<dyn Error>> {
    let interpreter = run(r#"
        routine f ^ let z = 1 ^
        let r = f[]
    "#)?;

    assert_eq!(interpreter.global("r"), Some(&Value::Nothing));

    Ok(())
}

#[test]
fn test_extra_arguments_are_evaluated() -> Result<(), Box<dyn Error>> {
    let interpreter = run(r#"
        let c = 0
        routine f [a] ^ return a ^
        let r = f[1, c*]
    "#)?;

    assert_eq!(interpreter.global("r"), Some(&number(1.0)));
    assert_eq!(interpreter.global("c"), Some(&number(1.0)));

    Ok(())
}

#[test]
fn test_unbound_parameter() {
    let err = runtime_error(r#"
routine f [a, b] ^ return b ^
let r = f[1]
"#);

    assert_eq!(err.error, RuntimeErrorType::UndeclaredVariable { name: "b".into() });
}

#[test]
fn test_relational_and_division() -> Result<(), Box<dyn Error>> {
    let interpreter = run(r#"
        let lt = 1 < 2
        let ge = 1 >= 2
        let q = 7 / 2
        let inf = 1 / 0
    "#)?;

    assert_eq!(interpreter.global("lt"), Some(&Value::Boolean { value: true }));
    assert_eq!(interpreter.global("ge"), Some(&Value::Boolean { value: false }));
    assert_eq!(interpreter.global("q"), Some(&number(3.5)));
    assert_eq!(interpreter.global("inf"), Some(&number(f64::INFINITY)));

    Ok(())
}

#[test]
fn test_priority_tie_goes_to_first_declared() -> Result<(), Box<dyn Error>> {
    let program = parse_program(r#"
        routine a ^ ^
        routine b ^ ^
        b[]
    "#)?;

    let mut interpreter = Interpreter::new();
    interpreter.interpret(&program)?;

    assert_eq!(interpreter.execution_priority(), Some("b"));

    interpreter.interpret(&parse_program("a[]")?)?;

    assert_eq!(interpreter.function_usage(), vec![("a", 1), ("b", 1)]);
    assert_eq!(interpreter.execution_priority(), Some("a"));

    Ok(())
}

#[test]
fn test_no_calls_no_priority() -> Result<(), Box<dyn Error>> {
    let interpreter = run("routine a ^ ^")?;

    assert_eq!(interpreter.usage_of("a"), Some(0));
    assert_eq!(interpreter.execution_priority(), None);

    Ok(())
}

#[test]
fn test_redeclaration_resets_usage() -> Result<(), Box<dyn Error>> {
    let interpreter = run(r#"
        for <let i = 0; i < 3; i*> ^
            routine f ^ ^
            f[]
        ^
    "#)?;

    assert_eq!(interpreter.usage_of("f"), Some(1));

    Ok(())
}

#[test]
fn test_session_persists_between_programs() -> Result<(), Box<dyn Error>> {
    let mut interpreter = Interpreter::new();

    interpreter.interpret(&parse_program("let x = 1 routine inc [n] ^ return n + 1 ^")?)?;
    interpreter.interpret(&parse_program("x = inc[x]")?)?;
    interpreter.interpret(&parse_program("x = inc[x]")?)?;

    assert_eq!(interpreter.global("x"), Some(&number(3.0)));
    assert_eq!(interpreter.usage_of("inc"), Some(2));

    Ok(())
}

#[test]
fn test_session_survives_runtime_error() -> Result<(), Box<dyn Error>> {
    let mut interpreter = Interpreter::new();

    interpreter.interpret(&parse_program("routine f ^ return missing ^ let x = 1")?)?;

    let failed = interpreter.interpret(&parse_program("x = f[]")?);
    assert!(failed.is_err());

    interpreter.interpret(&parse_program("routine g ^ return 2 ^ x = g[]")?)?;

    assert_eq!(interpreter.global("x"), Some(&number(2.0)));
    assert_eq!(interpreter.environment().live_frames(), 1);

    Ok(())
}

#[test_case("nope[1]", RuntimeErrorType::UndefinedRoutine { name: "nope".into() }, (0, 4) ; "undeclared routine")]
#[test_case("let v = 1 v[]", RuntimeErrorType::UndefinedRoutine { name: "v".into() }, (10, 11) ; "not a routine")]
#[test_case("return 1", RuntimeErrorType::ReturnOutsideRoutine, (0, 8) ; "top level return")]
#[test_case("for <let i = 0; i < 1; i*> ^ return i ^", RuntimeErrorType::ReturnOutsideRoutine, (29, 37) ; "return in top level loop")]
#[test_case("let x = 1 let x = 2", RuntimeErrorType::DuplicateDeclaration { name: "x".into() }, (14, 15) ; "duplicate declaration")]
#[test_case("y = 1", RuntimeErrorType::UndeclaredVariable { name: "y".into() }, (0, 1) ; "assign undeclared")]
#[test_case("let z = w", RuntimeErrorType::UndeclaredVariable { name: "w".into() }, (8, 9) ; "read undeclared")]
#[test_case(
    "routine f ^ ^ let x = f + 1",
    RuntimeErrorType::InvalidOperand { operator: Token::Plus, value_type: ValueType::Routine },
    (22, 23) ;
    "routine operand"
)]
#[test_case(
    "routine g ^ ^ let y = 1 - g[]",
    RuntimeErrorType::InvalidOperand { operator: Token::Minus, value_type: ValueType::Nothing },
    (26, 29) ;
    "nothing operand"
)]
#[test_case(
    "let b = 1 < 2 let c = b + 1",
    RuntimeErrorType::InvalidOperand { operator: Token::Plus, value_type: ValueType::Boolean },
    (22, 23) ;
    "boolean operand"
)]
fn test_runtime_errors(input: &str, expected: RuntimeErrorType, location: (u32, u32)) {
    let err = runtime_error(input);

    assert_eq!(err.error, expected);
    assert_eq!(err.location, SrcSpan { start: location.0, end: location.1 });
}

#[test]
fn test_unknown_operator() -> Result<(), Box<dyn Error>> {
    let mut program = parse_program("1 + 2")?;

    match &mut program.statements[0] {
        Statement::Expression(Expression::Binary(binary)) => binary.operator = Token::Assign,
        other => panic!("expected a binary expression, got {other:?}")
    }

    let err = Interpreter::new().interpret(&program).unwrap_err();

    assert_eq!(err.error, RuntimeErrorType::UnknownOperator { operator: Token::Assign });
    assert_eq!(err.location, SrcSpan { start: 0, end: 5 });

    Ok(())
}

#[test]
fn test_profiler_records_operations() -> Result<(), Box<dyn Error>> {
    let mut interpreter = Interpreter::with_profiler(Profiler::with_capacity(64));
    interpreter.interpret(&parse_program(PROGRAM)?)?;

    let operations = interpreter.profiler()
        .logs()
        .map(|entry| entry.operation.as_str())
        .collect::<Vec<_>>();

    assert_eq!(&operations[..6], &["declare", "routine", "call", "return", "assign", "priority"]);
    assert_eq!(operations.last(), Some(&"loop"));
    assert_eq!(operations.iter().filter(|op| **op == "call").count(), 4);
    assert_eq!(operations.iter().filter(|op| **op == "priority").count(), 1);

    let call = interpreter.profiler()
        .logs()
        .find(|entry| entry.operation == "call")
        .and_then(|entry| entry.details.clone());

    assert_eq!(call.as_deref(), Some("add[10, 5]"));

    Ok(())
}
