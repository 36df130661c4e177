use super::prelude::{Environment, EnvironmentError, Value};

fn number(value: f64) -> Value {
    Value::Number { value }
}

#[test]
fn test_declare_then_get() -> Result<(), EnvironmentError> {
    let mut env = Environment::new();
    let global = env.global();

    env.declare(global, "x".into(), number(1.0))?;
    env.assign(global, "x", number(2.0))?;
    env.assign(global, "x", number(3.0))?;

    assert_eq!(env.get(global, "x")?, &number(3.0));

    Ok(())
}

#[test]
fn test_duplicate_declaration_in_same_frame() -> Result<(), EnvironmentError> {
    let mut env = Environment::new();
    let global = env.global();

    env.declare(global, "x".into(), number(1.0))?;

    assert_eq!(
        env.declare(global, "x".into(), number(2.0)),
        Err(EnvironmentError::DuplicateDeclaration { name: "x".into() })
    );
    assert_eq!(env.get(global, "x")?, &number(1.0));

    Ok(())
}

#[test]
fn test_shadowing_in_child_frame() -> Result<(), EnvironmentError> {
    let mut env = Environment::new();
    let global = env.global();

    env.declare(global, "x".into(), number(1.0))?;

    let child = env.push(global);
    env.declare(child, "x".into(), number(10.0))?;
    env.assign(child, "x", number(11.0))?;

    assert_eq!(env.get(child, "x")?, &number(11.0));
    assert_eq!(env.get(global, "x")?, &number(1.0));

    Ok(())
}

#[test]
fn test_assign_walks_outward() -> Result<(), EnvironmentError> {
    let mut env = Environment::new();
    let global = env.global();

    env.declare(global, "x".into(), number(1.0))?;

    let child = env.push(global);
    let grandchild = env.push(child);

    env.assign(grandchild, "x", number(5.0))?;

    assert_eq!(env.get(global, "x")?, &number(5.0));

    Ok(())
}

#[test]
fn test_undeclared_variable() {
    let mut env = Environment::new();
    let global = env.global();
    let child = env.push(global);

    assert_eq!(
        env.assign(child, "y", number(1.0)),
        Err(EnvironmentError::UndeclaredVariable { name: "y".into() })
    );
    assert_eq!(
        env.get(child, "y"),
        Err(EnvironmentError::UndeclaredVariable { name: "y".into() })
    );
}

#[test]
fn test_release_reuses_frames() -> Result<(), EnvironmentError> {
    let mut env = Environment::new();
    let global = env.global();

    for i in 0..100 {
        let frame = env.push(global);
        env.declare(frame, "i".into(), number(i as f64))?;
        env.release(frame);
    }

    assert_eq!(env.live_frames(), 1);

    // a reused slot starts out empty
    let frame = env.push(global);
    assert!(env.get(frame, "i").is_err());

    Ok(())
}

#[test]
fn test_captured_frames_survive_release() -> Result<(), EnvironmentError> {
    let mut env = Environment::new();
    let global = env.global();

    let outer = env.push(global);
    let inner = env.push(outer);

    env.declare(outer, "kept".into(), number(7.0))?;
    env.capture(inner);

    env.release(inner);
    env.release(outer);

    assert_eq!(env.live_frames(), 3);
    assert_eq!(env.get(inner, "kept")?, &number(7.0));

    Ok(())
}

#[test]
fn test_release_is_idempotent() {
    let mut env = Environment::new();
    let global = env.global();

    let frame = env.push(global);
    env.release(frame);
    env.release(frame);
    env.release(global);

    let a = env.push(global);
    let b = env.push(global);

    assert_ne!(a, b);
    assert_eq!(env.live_frames(), 3);
}
