//! The `lumen repl` command.

use crate::output;
use crate::session::{Session, SessionOptions, parse_json_value};
use lumen_expr::{ExpressionState, Frame, Node, Program, VariableReference, parse_reference};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

const HELP: &str = "\
Commands:
  #name              Evaluate a variable reference
  #name = <json>     Assign a JSON value to a variable
  :compile #name     Evaluate, compile and run a reference
  :scope <json>      Enter a nested scope with the given `#this`
  :pop               Leave the innermost nested scope
  :vars              List bound variables
  :help, :h          Show this help
  :quit, :q          Exit the REPL";

pub fn run(options: &SessionOptions) -> Result<(), String> {
    println!("Lumen REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for help, :quit to exit");
    println!();

    let session = Session::load(options)?;
    let mut state = session.state();
    let mut rl = DefaultEditor::new().map_err(|e| e.to_string())?;

    loop {
        match rl.readline("lumen> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match line {
                    ":quit" | ":q" => break,
                    ":help" | ":h" => println!("{HELP}"),
                    ":vars" => {
                        for name in session.namespace.names() {
                            println!("  #{name}");
                        }
                    }
                    ":pop" => {
                        if state.pop_active_context().is_none() {
                            output::error("not inside a nested scope");
                        }
                    }
                    _ => {
                        if let Some(json) = line.strip_prefix(":scope ") {
                            match parse_json_value(json) {
                                Ok(context) => state.push_active_context(context),
                                Err(e) => output::error(&e),
                            }
                        } else if let Some(expr) = line.strip_prefix(":compile ") {
                            compile_line(expr.trim(), &state, &session);
                        } else if line.starts_with(':') {
                            output::error(&format!("unknown command: {line}"));
                        } else {
                            eval_line(line, &state);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.to_string()),
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn parse(source: &str) -> Option<VariableReference> {
    match parse_reference(source) {
        Ok(node) => Some(node),
        Err(diag) => {
            output::diagnostic(source, "<repl>", &diag);
            None
        }
    }
}

fn eval_line(line: &str, state: &ExpressionState<'_>) {
    let (target, assigned) = match line.split_once('=') {
        Some((target, json)) => (target.trim(), Some(json.trim())),
        None => (line, None),
    };
    let Some(node) = parse(target) else {
        return;
    };

    let result = match assigned {
        Some(json) => match parse_json_value(json) {
            Ok(value) => node.set_value(state, Box::new(move || Ok(value))),
            Err(e) => {
                output::error(&e);
                return;
            }
        },
        None => node.value(state),
    };

    match result {
        Ok(value) => output::success(&value.to_string()),
        Err(e) => output::diagnostic(target, "<repl>", &e.to_diagnostic(node.span())),
    }
}

fn compile_line(source: &str, state: &ExpressionState<'_>, session: &Session) {
    let Some(node) = parse(source) else {
        return;
    };
    let result = node
        .value(state)
        .and_then(|_| Program::compile(&node, &session.config))
        .and_then(|program| {
            output::listing(&program);
            program.run(&Frame::from_state(state))
        });
    match result {
        Ok(value) => output::success(&value.to_string()),
        Err(e) => output::diagnostic(source, "<repl>", &e.to_diagnostic(node.span())),
    }
}
