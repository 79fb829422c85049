use serde::{Deserialize, Serialize};

use super::tokenize::tokenize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DangerPattern {
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub advice: Option<String>,
}

#[cfg(test)]
impl DangerPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn with_advice(mut self, advice: impl Into<String>) -> Self {
        self.advice = Some(advice.into());
        self
    }
}

impl DangerPattern {
    /// Case-folded pattern text; `None` makes the record ineligible.
    fn needle(&self) -> Option<String> {
        self.pattern
            .as_deref()
            .filter(|pattern| !pattern.is_empty())
            .map(str::to_lowercase)
    }

    pub fn explanation_text(&self) -> Option<&str> {
        non_blank(self.explanation.as_deref())
    }

    pub fn advice_text(&self) -> Option<&str> {
        non_blank(self.advice.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

pub(crate) fn normalize_command(command: &str) -> String {
    tokenize(command).join(" ").to_lowercase()
}

// Plain substring containment: `rm -rf` also matches `farm -rfx`.
pub(crate) fn detect_danger(command: &str, patterns: &[DangerPattern]) -> Vec<DangerPattern> {
    let normalized = normalize_command(command);
    patterns
        .iter()
        .filter(|entry| {
            entry
                .needle()
                .is_some_and(|needle| normalized.contains(&needle))
        })
        .cloned()
        .collect()
}
