use anyhow::Result;
use rustyline::error::ReadlineError;
use std::io::{self, BufRead, Write};

pub trait ConfirmPrompter {
    /// Defaults to No: only `y` or `yes` confirm. EOF and Ctrl-C decline.
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Free text answer, trimmed. `None` on EOF or Ctrl-C.
    fn ask_text(&mut self, question: &str) -> Result<Option<String>>;
}

pub struct EditorPrompter<'a> {
    editor: &'a mut rustyline::DefaultEditor,
}

impl<'a> EditorPrompter<'a> {
    pub fn new(editor: &'a mut rustyline::DefaultEditor) -> Self {
        Self { editor }
    }

    fn read(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let answer = line.trim();
                if !answer.is_empty() {
                    let _ = self.editor.add_history_entry(answer);
                }
                Ok(Some(answer.to_string()))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl ConfirmPrompter for EditorPrompter<'_> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self.read(question)?.is_some_and(|answer| is_affirmative(&answer)))
    }

    fn ask_text(&mut self, question: &str) -> Result<Option<String>> {
        self.read(question)
    }
}

pub struct StdioPrompter;

impl StdioPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdioPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmPrompter for StdioPrompter {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(read_stdio_line(question)?.is_some_and(|answer| is_affirmative(&answer)))
    }

    fn ask_text(&mut self, question: &str) -> Result<Option<String>> {
        read_stdio_line(question)
    }
}

fn read_stdio_line(question: &str) -> Result<Option<String>> {
    print!("{question}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

pub fn is_affirmative(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "y" | "yes")
}


/// Answers questions from a fixed script; `None` entries behave like EOF.
#[cfg(test)]
pub(crate) struct ScriptedPrompter {
    answers: std::collections::VecDeque<Option<String>>,
    pub(crate) asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub(crate) fn new(answers: &[Option<&str>]) -> Self {
        Self {
            answers: answers.iter().map(|answer| answer.map(str::to_string)).collect(),
            asked: Vec::new(),
        }
    }

    fn next(&mut self, question: &str) -> Option<String> {
        self.asked.push(question.to_string());
        self.answers.pop_front().flatten()
    }
}

#[cfg(test)]
impl ConfirmPrompter for ScriptedPrompter {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self.next(question).is_some_and(|answer| is_affirmative(&answer)))
    }

    fn ask_text(&mut self, question: &str) -> Result<Option<String>> {
        Ok(self.next(question).map(|answer| answer.trim().to_string()))
    }
}
