use colored::Colorize;
use std::io::{self, IsTerminal};

use crate::advisor::{SuggestionReport, SuggestionResult};
use crate::analysis::{Analysis, DangerPattern, ExplanationEntry};
use crate::execution::looks_like_command;

pub const BOX_WIDTH: usize = 52;
const NO_PATTERN_EXPLANATION: &str = "No explanation provided.";

struct BoxChars {
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    horizontal: char,
}

const UNICODE_BOX: BoxChars = BoxChars {
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    horizontal: '─',
};

const ASCII_BOX: BoxChars = BoxChars {
    top_left: '+',
    top_right: '+',
    bottom_left: '+',
    bottom_right: '+',
    horizontal: '-',
};

pub fn configure_colors() {
    if !io::stdout().is_terminal() || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }
}

fn box_chars() -> &'static BoxChars {
    if std::env::var_os("SAFECLI_ASCII").is_some() {
        return &ASCII_BOX;
    }
    if cfg!(target_os = "windows") && !locale_is_utf8() {
        return &ASCII_BOX;
    }
    &UNICODE_BOX
}

fn locale_is_utf8() -> bool {
    ["LC_ALL", "LC_CTYPE", "LANG"].iter().any(|key| {
        std::env::var(key)
            .map(|value| value.to_lowercase().replace('-', "").contains("utf8"))
            .unwrap_or(false)
    })
}

fn box_top(title: &str) -> String {
    let chars = box_chars();
    let fill = BOX_WIDTH.saturating_sub(title.chars().count());
    let left = fill / 2;
    let right = fill - left;
    format!(
        "{}{}{}{}{}",
        chars.top_left,
        chars.horizontal.to_string().repeat(left),
        title,
        chars.horizontal.to_string().repeat(right),
        chars.top_right
    )
}

fn box_bottom() -> String {
    let chars = box_chars();
    format!(
        "{}{}{}",
        chars.bottom_left,
        chars.horizontal.to_string().repeat(BOX_WIDTH),
        chars.bottom_right
    )
}

fn rule() -> String {
    box_chars().horizontal.to_string().repeat(BOX_WIDTH)
}

pub fn box_section(title: &str, lines: &[String]) -> String {
    let mut out = vec![box_top(title)];
    out.extend(lines.iter().map(|line| format!("  {line}")));
    out.push(box_bottom());
    out.join("\n")
}

pub fn render_command(command: &str) -> String {
    let single_line = command.replace(['\r', '\n'], " ");
    box_section(" COMMAND ", &[single_line.trim().to_string()])
}

pub fn render_warning(matches: &[DangerPattern]) -> Option<String> {
    let (primary, others) = matches.split_first()?;
    let mut lines = vec![
        "⚠ DANGEROUS COMMAND DETECTED".yellow().bold().to_string(),
        pattern_explanation(primary).to_string(),
        "⚠ DO NOT RUN THIS DIRECTLY".red().to_string(),
    ];
    if let Some(advice) = primary.advice_text() {
        lines.push(advice.to_string());
    }
    for entry in others {
        lines.push(String::new());
        lines.push(pattern_explanation(entry).to_string());
        if let Some(advice) = entry.advice_text() {
            lines.push(advice.to_string());
        }
    }
    Some(box_section(" WARNING ", &lines))
}

fn pattern_explanation(entry: &DangerPattern) -> &str {
    entry.explanation_text().unwrap_or(NO_PATTERN_EXPLANATION)
}

pub fn render_breakdown(entries: &[ExplanationEntry]) -> String {
    let width = entries
        .iter()
        .map(|entry| entry.token.chars().count())
        .max()
        .unwrap_or(0);
    let mut out = vec!["🔍 Command Breakdown".to_string(), rule()];
    out.extend(entries.iter().map(|entry| {
        format!(
            "  • {:<width$}  ->  {}",
            entry.token,
            entry.text,
            width = width
        )
    }));
    out.push(rule());
    out.join("\n")
}

pub fn render_analysis(analysis: &Analysis) -> String {
    let mut sections = vec![render_command(&analysis.command)];
    if let Some(warning) = render_warning(&analysis.matches) {
        sections.push(warning);
    }
    sections.push(render_breakdown(&analysis.breakdown));
    sections.join("\n\n")
}

pub fn render_suggestion(report: &SuggestionReport) -> String {
    let mut lines = match &report.primary {
        SuggestionResult::Suggestion(text) => suggestion_lines(text),
        SuggestionResult::ToolMissing => vec![format!(
            "Advisor CLI not found: {}. Install it or pass --advisor-path.",
            report.advisor
        )],
        SuggestionResult::ToolError(message) => {
            vec![format!("Advisor returned an error: {message}")]
        }
        SuggestionResult::Empty => vec!["Advisor returned no output.".to_string()],
    };
    if let Some(fallback) = &report.fallback {
        lines.push(String::new());
        lines.push(format!("Fallback ({}):", fallback.source.label()).cyan().to_string());
        if fallback.runnable {
            lines.extend(suggestion_lines(&fallback.text));
        } else {
            lines.extend(fallback.text.lines().map(str::to_string));
        }
    }
    box_section(" 🤖 Safer Suggestion ", &lines)
}

fn suggestion_lines(text: &str) -> Vec<String> {
    let mut lines = text.trim().lines().map(str::to_string).collect::<Vec<_>>();
    let Some(first) = lines.first_mut() else {
        return vec!["No suggestion.".to_string()];
    };
    let command = first.trim().trim_matches('`');
    if looks_like_command(command) {
        *first = format!("Use: {command}");
    }
    lines
}
