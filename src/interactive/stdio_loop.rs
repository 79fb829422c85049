use anyhow::Result;
use std::io::{self, BufRead, Write};

use crate::engine::InspectionEngine;
use crate::interactive::{INPUT_PROMPT, is_exit_command};
use crate::prompter::StdioPrompter;

pub async fn run(engine: &InspectionEngine<'_>) -> Result<()> {
    let mut line = String::new();
    loop {
        line.clear();
        print!("{INPUT_PROMPT}");
        io::stdout().flush()?;
        if io::stdin().lock().read_line(&mut line)? == 0 {
            println!();
            println!("Good Bye!");
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit_command(input) {
            println!("Good Bye!");
            break;
        }

        let mut prompter = StdioPrompter::new();
        if let Err(err) = engine.inspect(input, &mut prompter).await {
            eprintln!("error: {err:#}");
        }
        println!();
    }
    Ok(())
}
