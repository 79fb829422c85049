use anyhow::Result;
use rustyline::error::ReadlineError;

use crate::engine::InspectionEngine;
use crate::interactive::{INPUT_PROMPT, is_exit_command};
use crate::prompter::EditorPrompter;

pub async fn run(engine: &InspectionEngine<'_>) -> Result<()> {
    let mut editor = rustyline::DefaultEditor::new()?;
    loop {
        match editor.readline(INPUT_PROMPT) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(input);
                if is_exit_command(input) {
                    println!("Good Bye!");
                    break;
                }

                let mut prompter = EditorPrompter::new(&mut editor);
                if let Err(err) = engine.inspect(input, &mut prompter).await {
                    eprintln!("error: {err:#}");
                }
                println!();
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Good Bye!");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
