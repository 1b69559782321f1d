//! uv-autoenv CLI
//!
//! Every command runs synchronously; `hook` is invoked from the shell prompt
//! on each directory change and has to stay fast.

// CLI binary needs to output to stdout/stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod commands;
mod tracing;

use crate::cli::{exit_code_for, render_error};
use crate::commands::Command;
use crate::tracing::{Level, TracingConfig, TracingFormat};
use std::io::Write;

fn main() {
    // NOTE: tracing may be unusable during a panic, so write directly
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    let tracing_config = TracingConfig {
        format: if cli.json {
            TracingFormat::Json
        } else {
            TracingFormat::Compact
        },
        level: Level::from(cli.level),
    };
    // Ignore error if tracing already initialized
    let _ = crate::tracing::init_tracing(tracing_config);

    let command: Command = cli.command.into();
    let exit_code = run(command, cli.json);
    std::process::exit(exit_code);
}

fn run(command: Command, json_mode: bool) -> i32 {
    let fallback = command.fallback_output();

    match commands::execute(command) {
        Ok(outcome) => {
            write_stdout(&outcome.stdout);
            outcome.exit_code
        }
        Err(err) => {
            if let Some(fallback) = fallback {
                write_stdout(&format!("{fallback}\n"));
            }
            render_error(&err, json_mode);
            exit_code_for(&err)
        }
    }
}

fn write_stdout(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}
