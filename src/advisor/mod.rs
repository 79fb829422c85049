mod chain;
mod cli_tool;
mod fallback;
mod gemini;
mod prompt;

use std::future::Future;
use std::pin::Pin;

pub use chain::{SuggestionChain, SuggestionReport};
pub use cli_tool::{CliAdvisor, CliAdvisorOptions};
pub use gemini::GeminiAdvisor;

#[cfg(test)]
pub(crate) use chain::tests::CannedGateway;
#[cfg(test)]
pub(crate) use chain::{FallbackSource, FallbackSuggestion};

pub const NO_SUGGESTION_RETURNED: &str = "no suggestion returned";

/// Spawn and transport failures fold into these variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionResult {
    Suggestion(String),
    ToolMissing,
    ToolError(String),
    Empty,
}

impl SuggestionResult {
    pub fn kind(&self) -> &'static str {
        match self {
            SuggestionResult::Suggestion(_) => "suggestion",
            SuggestionResult::ToolMissing => "tool_missing",
            SuggestionResult::ToolError(_) => "tool_error",
            SuggestionResult::Empty => "empty",
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            SuggestionResult::Suggestion(text) => Some(text),
            _ => None,
        }
    }
}

pub trait SuggestionGateway: Send + Sync {
    fn label(&self) -> &str;

    fn request<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = SuggestionResult> + Send + 'a>>;
}
