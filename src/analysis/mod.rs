mod danger;
mod explain;
mod flags;
mod tokenize;


pub use danger::DangerPattern;
pub use explain::{ExplanationDictionary, ExplanationEntry};

pub(crate) use flags::is_short_cluster;
pub(crate) use tokenize::tokenize;

#[derive(Debug, Clone)]
pub struct Analysis {
    pub command: String,
    pub tokens: Vec<String>,
    pub breakdown: Vec<ExplanationEntry>,
    pub matches: Vec<DangerPattern>,
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_dangerous(&self) -> bool {
        !self.matches.is_empty()
    }
}

pub fn analyze(
    command: &str,
    dictionary: &ExplanationDictionary,
    patterns: &[DangerPattern],
) -> Analysis {
    let tokens = tokenize(command);
    let breakdown = explain::explain_tokens(&tokens, dictionary);
    let matches = danger::detect_danger(command, patterns);
    Analysis {
        command: command.to_string(),
        tokens,
        breakdown,
        matches,
    }
}
