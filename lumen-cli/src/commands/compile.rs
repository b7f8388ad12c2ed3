//! The `lumen compile` command.
//!
//! Evaluates the reference once in interpreted mode to fix its exit type,
//! then compiles it, prints the instructions and runs them.

use crate::output;
use crate::session::{Session, SessionOptions, parse_json_value};
use lumen_expr::{Frame, Node, Program, parse_reference};

pub fn run(expr: &str, options: &SessionOptions, scope: Option<&str>) -> Result<(), String> {
    let source = expr.trim();
    let node = parse_reference(source).map_err(|diag| {
        output::diagnostic(source, "<compile>", &diag);
        "parse error".to_string()
    })?;

    let session = Session::load(options)?;
    let mut state = session.state();
    if let Some(scope) = scope {
        state.push_active_context(parse_json_value(scope)?);
    }

    let report = |e: lumen_expr::EvalError| {
        output::diagnostic(source, "<compile>", &e.to_diagnostic(node.span()));
        "compilation failed".to_string()
    };

    let interpreted = node.value(&state).map_err(report)?;
    let program = Program::compile(&node, &session.config).map_err(report)?;
    output::listing(&program);

    let compiled = program.run(&Frame::from_state(&state)).map_err(report)?;
    output::info(&format!("interpreted: {interpreted}"));
    output::success(&format!("compiled:    {compiled}"));
    Ok(())
}
