mod stdio_loop;
mod tty_loop;

use anyhow::Result;
use std::future::Future;
use std::io::{self, IsTerminal};
use std::pin::Pin;

use crate::engine::InspectionEngine;

const INPUT_PROMPT: &str = "Enter command to analyze: ";

trait InteractiveBackend {
    fn run<'a>(
        &'a self,
        engine: &'a InspectionEngine<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>>;
}

struct TtyBackend;
struct StdioBackend;

impl InteractiveBackend for TtyBackend {
    fn run<'a>(
        &'a self,
        engine: &'a InspectionEngine<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
        Box::pin(tty_loop::run(engine))
    }
}

impl InteractiveBackend for StdioBackend {
    fn run<'a>(
        &'a self,
        engine: &'a InspectionEngine<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
        Box::pin(stdio_loop::run(engine))
    }
}

pub async fn run_interactive(engine: &InspectionEngine<'_>) -> Result<()> {
    println!("Interactive mode. Type exit to finish.");

    let backend: &dyn InteractiveBackend =
        if io::stdin().is_terminal() && io::stdout().is_terminal() {
            &TtyBackend
        } else {
            &StdioBackend
        };
    backend.run(engine).await
}

pub fn is_exit_command(input: &str) -> bool {
    matches!(input, "exit" | "quit" | "/exit" | "/quit")
}
