//! The `lumen eval` command.

use crate::output;
use crate::session::{Session, SessionOptions, parse_json_value};
use lumen_expr::{Node, parse_reference};

pub fn run(expr: &str, options: &SessionOptions, scope: Option<&str>, verbose: bool) -> Result<(), String> {
    let node = match parse_reference(expr.trim()) {
        Ok(node) => node,
        Err(diag) => {
            output::diagnostic(expr.trim(), "<eval>", &diag);
            return Err("parse error".to_string());
        }
    };

    let session = Session::load(options)?;
    let mut state = session.state();
    if let Some(scope) = scope {
        state.push_active_context(parse_json_value(scope)?);
    }

    match node.value(&state) {
        Ok(value) => output::success(&value.to_string()),
        Err(e) => {
            output::diagnostic(expr.trim(), "<eval>", &e.to_diagnostic(node.span()));
            return Err("evaluation error".to_string());
        }
    }

    if verbose {
        match node.exit_descriptor() {
            Some(descriptor) => output::info(&format!("exit type: {descriptor}")),
            None => output::info("not compilable in this scope"),
        }
    }
    Ok(())
}
