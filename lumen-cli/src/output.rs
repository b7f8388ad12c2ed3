//! Output formatting utilities.
//! 输出格式化工具。

use std::sync::atomic::{AtomicBool, Ordering};

use lumen_diagnostic::{Diagnostic, emit};
use lumen_expr::Program;

static QUIET: AtomicBool = AtomicBool::new(false);

/// Silence errors and diagnostics for the rest of the process (`--quiet`).
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Print a result in green.
pub fn success(msg: &str) {
    println!("\x1b[32m{msg}\x1b[0m");
}

/// Print an error message in red.
pub fn error(msg: &str) {
    if is_quiet() {
        return;
    }
    eprintln!("\x1b[31merror:\x1b[0m {msg}");
}

/// Print an info message in blue.
pub fn info(msg: &str) {
    println!("\x1b[34minfo:\x1b[0m {msg}");
}

/// Render a diagnostic against the expression text, falling back to a plain
/// message if the terminal cannot be written.
pub fn diagnostic(source: &str, filename: &str, diag: &Diagnostic) {
    if is_quiet() {
        return;
    }
    if emit(source, filename, diag).is_err() {
        error(&diag.message);
    }
}

/// Print a compiled program, one instruction per line.
pub fn listing(program: &Program) {
    println!("{}  ; exit {}", program.source(), program.exit_descriptor());
    for (offset, instruction) in program.instructions().iter().enumerate() {
        println!("  {offset:>3}: {instruction}");
    }
}
