use anyhow::{Context, Result};
use std::process::{Command, ExitStatus};
use tracing::{info, warn};

use crate::prompter::ConfirmPrompter;

pub const CONFIRM_QUESTION: &str = "Execute suggested command? (y/N): ";
pub const OVERRIDE_QUESTION: &str = "Enter command to execute (leave empty to use suggestion): ";

pub fn looks_like_command(line: &str) -> bool {
    let line = line.trim();
    let Some(first) = line.split_whitespace().next() else {
        return false;
    };
    let Some(lead) = first.chars().next() else {
        return false;
    };
    if !(lead.is_ascii_lowercase() || matches!(lead, '.' | '/' | '~' | '_' | '$')) {
        return false;
    }
    if first.ends_with(':') || line.ends_with(':') {
        return false;
    }
    let last = line.split_whitespace().last().unwrap_or(first);
    !(last.ends_with('.') && !matches!(last, "." | "..") && !last.contains('/'))
}

// Lines with embedded backticks never qualify; only a whole span or a bare line does.
pub fn candidate_command(text: &str) -> Option<String> {
    let mut lines = text.lines().map(str::trim);
    while let Some(line) = lines.next() {
        if line.is_empty() {
            continue;
        }
        if line.starts_with("```") {
            return lines
                .by_ref()
                .take_while(|inner| !inner.starts_with("```"))
                .map(strip_prompt)
                .find(|inner| !inner.is_empty() && !inner.starts_with('#'))
                .map(str::to_string);
        }
        let candidate = match single_span(line) {
            Some(inner) => strip_prompt(inner),
            None if line.contains('`') => continue,
            None => strip_prompt(line),
        };
        if looks_like_command(candidate) {
            return Some(candidate.to_string());
        }
    }
    None
}

fn single_span(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('`')?.strip_suffix('`')?.trim();
    (!inner.is_empty() && !inner.contains('`')).then_some(inner)
}

fn strip_prompt(line: &str) -> &str {
    line.strip_prefix("$ ").unwrap_or(line).trim()
}

pub fn offer_execution(
    prompter: &mut dyn ConfirmPrompter,
    suggestion: &str,
) -> Result<Option<String>> {
    if !prompter.confirm(CONFIRM_QUESTION)? {
        println!("Not executing suggested command.");
        return Ok(None);
    }
    let Some(entered) = prompter.ask_text(OVERRIDE_QUESTION)? else {
        println!("Not executing suggested command.");
        return Ok(None);
    };
    let chosen = if entered.is_empty() {
        candidate_command(suggestion)
    } else {
        Some(entered)
    };
    if chosen.is_none() {
        println!("No command to execute. Aborting.");
    }
    Ok(chosen)
}

/// `Err` only when the shell could not be started.
pub fn run_approved(command: &str) -> Result<ExitStatus> {
    let (shell, flag) = if cfg!(target_os = "windows") {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    };
    let status = Command::new(shell)
        .arg(flag)
        .arg(command)
        .status()
        .with_context(|| format!("failed to start {shell}"))?;
    info!(command, code = status.code(), "approved command finished");
    Ok(status)
}

pub fn execute(command: &str) {
    println!("Running: {command}");
    match run_approved(command) {
        Ok(status) => {
            if let Some(report) = exit_report(status) {
                println!("{report}");
            }
        }
        Err(err) => {
            warn!(command, error = %err, "approved command failed to start");
            println!("Failed to execute command: {err:#}");
        }
    }
}

fn exit_report(status: ExitStatus) -> Option<String> {
    if status.success() {
        return None;
    }
    Some(match status.code() {
        Some(code) => format!("Command exited with status {code}."),
        None => format!("Command terminated: {status}."),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompter::ScriptedPrompter;

    #[test]
    fn recognizes_commands_and_prose() {
        assert!(looks_like_command("rm -ri /tmp/foo"));
        assert!(looks_like_command("git stash"));
        assert!(looks_like_command("./cleanup.sh --dry-run"));
        assert!(looks_like_command("ls .."));
        assert!(!looks_like_command("The command removes files."));
        assert!(!looks_like_command("Why: it deletes everything"));
        assert!(!looks_like_command("Using rm deletes everything"));
        assert!(!looks_like_command("deletes everything without asking."));
        assert!(!looks_like_command("Suggestion:"));
        assert!(!looks_like_command("   "));
    }

    #[test]
    fn picks_first_command_line() {
        let text = "```bash\nrm -ri /tmp/foo\n```\nAsks before each removal.";
        assert_eq!(candidate_command(text).as_deref(), Some("rm -ri /tmp/foo"));
        assert_eq!(
            candidate_command("This is risky.\n`git stash`").as_deref(),
            Some("git stash")
        );
        assert_eq!(candidate_command("$ ls -la").as_deref(), Some("ls -la"));
        assert_eq!(candidate_command("The end."), None);
    }

    #[test]
    fn fenced_block_wins_and_skips_comments() {
        let text = "Try this:\n```sh\n# preview first\n$ git clean -n\n```";
        assert_eq!(candidate_command(text).as_deref(), Some("git clean -n"));
        assert_eq!(candidate_command("```\n```\nrm -ri foo"), None);
    }

    #[test]
    fn prose_quoting_the_dangerous_command_is_never_picked() {
        let text = "Using `rm -rf /tmp/foo` deletes everything without asking.\nrm -ri /tmp/foo";
        assert_eq!(candidate_command(text).as_deref(), Some("rm -ri /tmp/foo"));
        assert_eq!(
            candidate_command("Using `rm -rf /tmp/foo` deletes everything without asking."),
            None
        );
        assert_eq!(candidate_command("run `rm -rf /tmp/foo` carefully"), None);
    }

    #[test]
    fn quoted_prose_aborts_instead_of_running() {
        let mut prompter = ScriptedPrompter::new(&[Some("y"), Some("")]);
        let chosen = offer_execution(
            &mut prompter,
            "Using `rm -rf /tmp/foo` deletes everything without asking.",
        )
        .unwrap();
        assert_eq!(chosen, None);
    }

    #[test]
    fn declining_skips_override_question() {
        let mut prompter = ScriptedPrompter::new(&[Some("n")]);
        let chosen = offer_execution(&mut prompter, "rm -ri foo").unwrap();
        assert_eq!(chosen, None);
        assert_eq!(prompter.asked, vec![CONFIRM_QUESTION]);
    }

    #[test]
    fn eof_declines() {
        let mut prompter = ScriptedPrompter::new(&[None]);
        assert_eq!(offer_execution(&mut prompter, "ls").unwrap(), None);
    }

    #[test]
    fn empty_override_uses_suggestion() {
        let mut prompter = ScriptedPrompter::new(&[Some("yes"), Some("")]);
        let chosen = offer_execution(&mut prompter, "`rm -ri foo`\nSafer.").unwrap();
        assert_eq!(chosen.as_deref(), Some("rm -ri foo"));
        assert_eq!(prompter.asked, vec![CONFIRM_QUESTION, OVERRIDE_QUESTION]);
    }

    #[test]
    fn typed_override_wins() {
        let mut prompter = ScriptedPrompter::new(&[Some("Y"), Some("  echo hi ")]);
        let chosen = offer_execution(&mut prompter, "rm -ri foo").unwrap();
        assert_eq!(chosen.as_deref(), Some("echo hi"));
    }

    #[test]
    fn nothing_to_run_aborts() {
        let mut prompter = ScriptedPrompter::new(&[Some("y"), Some("")]);
        assert_eq!(
            offer_execution(&mut prompter, "The command is unsafe.").unwrap(),
            None
        );
    }

    #[cfg(unix)]
    #[test]
    fn runs_through_shell() {
        let status = run_approved("true").unwrap();
        assert!(status.success());
        assert_eq!(exit_report(status), None);
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_reported_separately_from_start_failure() {
        let status = run_approved("exit 3").unwrap();
        assert_eq!(status.code(), Some(3));
        assert_eq!(
            exit_report(status).as_deref(),
            Some("Command exited with status 3.")
        );
    }
}
