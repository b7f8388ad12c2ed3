//! A single parsed node shared by threads evaluating independent states.

use std::thread;

use lumen_expr::{
    Descriptor, EngineConfig, ExpressionState, Frame, Node, Program, StandardNamespace, TypedValue,
    Value, parse_reference,
};

#[test]
fn test_shared_node_across_threads() {
    let node = parse_reference("#x").unwrap();

    thread::scope(|s| {
        for n in 0..8i64 {
            let node = &node;
            s.spawn(move || {
                let ns = StandardNamespace::new().with_variable("x", Value::Int(n));
                let state = ExpressionState::new(TypedValue::NULL, &ns);
                for _ in 0..100 {
                    let result = node.value(&state).unwrap();
                    assert_eq!(result.value().and_then(Value::as_int), Some(n));
                }
            });
        }
    });

    assert!(node.is_compilable());
    assert_eq!(node.exit_descriptor(), Some(Descriptor::Int));
}

#[test]
fn test_signature_is_always_one_observed_type() {
    let node = parse_reference("#x").unwrap();

    thread::scope(|s| {
        for n in 0..4i64 {
            let node = &node;
            s.spawn(move || {
                let value = if n % 2 == 0 { Value::Int(n) } else { Value::from("odd") };
                let ns = StandardNamespace::new().with_variable("x", value);
                let state = ExpressionState::new(TypedValue::NULL, &ns);
                for _ in 0..50 {
                    node.value(&state).unwrap();
                    let seen = node.exit_descriptor();
                    assert!(matches!(seen, Some(Descriptor::Int) | Some(Descriptor::String)));
                }
            });
        }
    });
}

#[test]
fn test_shared_program_across_threads() {
    let ns = StandardNamespace::new().with_variable("x", Value::Int(0));
    let state = ExpressionState::new(TypedValue::NULL, &ns);
    let node = parse_reference("#x").unwrap();
    node.value(&state).unwrap();
    let program = Program::compile(&node, &EngineConfig::default()).unwrap();

    thread::scope(|s| {
        for n in 0..8i64 {
            let program = &program;
            s.spawn(move || {
                let ns = StandardNamespace::new().with_variable("x", Value::Int(n));
                let frame = Frame::new(TypedValue::NULL, &ns);
                assert_eq!(program.run(&frame).unwrap().value().and_then(Value::as_int), Some(n));
            });
        }
    });
}
