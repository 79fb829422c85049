use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::flags::expand_tokens;

pub const NO_EXPLANATION: &str = "No explanation available";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExplanationDictionary {
    entries: HashMap<String, String>,
}

impl ExplanationDictionary {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Exact, case-sensitive lookup. Blank descriptions count as missing.
    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.entries
            .get(token)
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for ExplanationDictionary
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationEntry {
    pub token: String,
    pub text: String,
}

pub(crate) fn resolve(
    expanded: &[String],
    dictionary: &ExplanationDictionary,
) -> Vec<ExplanationEntry> {
    expanded
        .iter()
        .map(|token| ExplanationEntry {
            token: token.clone(),
            text: dictionary
                .lookup(token)
                .unwrap_or(NO_EXPLANATION)
                .to_string(),
        })
        .collect()
}

pub(crate) fn explain_tokens(
    tokens: &[String],
    dictionary: &ExplanationDictionary,
) -> Vec<ExplanationEntry> {
    resolve(&expand_tokens(tokens), dictionary)
}
