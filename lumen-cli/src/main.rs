//! Lumen CLI - evaluate and compile variable references from the shell.
//! Lumen CLI - 在命令行中求值和编译变量引用。

mod commands;
mod output;
mod session;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use session::SessionOptions;
use tracing_subscriber::EnvFilter;

/// Main CLI structure.
/// 主 CLI 结构体。
#[derive(Parser)]
#[command(name = "lumen")]
#[command(author, version, about = "Lumen - an embeddable expression engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output. / 启用详细输出。
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress errors and diagnostics. / 抑制错误和诊断输出。
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Options describing the evaluation context.
/// 描述求值上下文的选项。
#[derive(Args)]
struct ContextArgs {
    /// JSON file with variable bindings. / 变量绑定的 JSON 文件。
    #[arg(long)]
    vars: Option<PathBuf>,

    /// Root context object as JSON. / JSON 形式的根上下文对象。
    #[arg(long)]
    root: Option<String>,

    /// Engine config JSON file. / 引擎配置 JSON 文件。
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reject assignments. / 拒绝赋值。
    #[arg(long)]
    read_only: bool,
}

impl From<ContextArgs> for SessionOptions {
    fn from(args: ContextArgs) -> Self {
        SessionOptions {
            vars: args.vars,
            root: args.root,
            config: args.config,
            read_only: args.read_only,
        }
    }
}

/// Available CLI commands.
/// 可用的 CLI 命令。
#[derive(Subcommand)]
enum Commands {
    /// Evaluate a reference such as `#name`. / 求值引用。
    Eval {
        /// The reference to evaluate. / 要求值的引用。
        expr: String,

        /// Evaluate inside a nested scope whose `#this` is this JSON value.
        /// 在嵌套作用域中求值。
        #[arg(long)]
        scope: Option<String>,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Compile a reference and show its instructions. / 编译引用并显示指令。
    Compile {
        /// The reference to compile. / 要编译的引用。
        expr: String,

        /// Evaluate inside a nested scope first. / 先在嵌套作用域中求值。
        #[arg(long)]
        scope: Option<String>,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Start an interactive REPL. / 启动交互式 REPL。
    Repl {
        #[command(flatten)]
        context: ContextArgs,
    },
}

/// Install the log subscriber. `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main entry point.
/// 主入口点。
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    output::set_quiet(cli.quiet);

    let result = match cli.command {
        Commands::Eval {
            expr,
            scope,
            context,
        } => commands::eval::run(&expr, &context.into(), scope.as_deref(), cli.verbose),
        Commands::Compile {
            expr,
            scope,
            context,
        } => commands::compile::run(&expr, &context.into(), scope.as_deref()),
        Commands::Repl { context } => commands::repl::run(&context.into()),
    };

    if let Err(e) = result {
        output::error(&e);
        std::process::exit(1);
    }
}
