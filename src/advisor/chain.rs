use tracing::info;

use super::fallback::{NO_LOCAL_RULE, local_alternative};
use super::{SuggestionGateway, SuggestionResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackSource {
    Secondary(String),
    LocalRules,
}

impl FallbackSource {
    pub fn label(&self) -> &str {
        match self {
            FallbackSource::Secondary(label) => label,
            FallbackSource::LocalRules => "local safety rules",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackSuggestion {
    pub source: FallbackSource,
    pub text: String,
    /// False when the text is an explanation rather than a command.
    pub runnable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionReport {
    pub advisor: String,
    pub primary: SuggestionResult,
    pub fallback: Option<FallbackSuggestion>,
}

impl SuggestionReport {
    pub fn runnable_text(&self) -> Option<&str> {
        if let Some(text) = self.primary.suggestion() {
            return Some(text);
        }
        self.fallback
            .as_ref()
            .filter(|fallback| fallback.runnable)
            .map(|fallback| fallback.text.as_str())
    }
}

pub struct SuggestionChain {
    primary: Box<dyn SuggestionGateway>,
    secondary: Option<Box<dyn SuggestionGateway>>,
    local_rules: bool,
}

impl SuggestionChain {
    pub fn new(primary: Box<dyn SuggestionGateway>) -> Self {
        Self {
            primary,
            secondary: None,
            local_rules: true,
        }
    }

    pub fn with_secondary(mut self, secondary: Box<dyn SuggestionGateway>) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn with_local_rules(mut self, enabled: bool) -> Self {
        self.local_rules = enabled;
        self
    }

    pub fn advisor_label(&self) -> &str {
        self.primary.label()
    }

    pub async fn suggest(&self, command: &str, tokens: &[String]) -> SuggestionReport {
        let primary = self.primary.request(command).await;
        let mut report = SuggestionReport {
            advisor: self.primary.label().to_string(),
            primary,
            fallback: None,
        };
        if report.primary.suggestion().is_some() {
            return report;
        }

        if let Some(secondary) = &self.secondary {
            info!(
                primary = report.primary.kind(),
                "primary advisor unavailable, asking {}",
                secondary.label()
            );
            match secondary.request(command).await {
                SuggestionResult::Suggestion(text) => {
                    report.fallback = Some(FallbackSuggestion {
                        source: FallbackSource::Secondary(secondary.label().to_string()),
                        text,
                        runnable: true,
                    });
                    return report;
                }
                other => info!(outcome = other.kind(), "secondary advisor gave nothing usable"),
            }
        }

        if self.local_rules {
            report.fallback = Some(match local_alternative(tokens) {
                Some(text) => FallbackSuggestion {
                    source: FallbackSource::LocalRules,
                    text,
                    runnable: true,
                },
                None => FallbackSuggestion {
                    source: FallbackSource::LocalRules,
                    text: NO_LOCAL_RULE.to_string(),
                    runnable: false,
                },
            });
        }
        report
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) struct CannedGateway {
        pub(crate) label: &'static str,
        pub(crate) result: SuggestionResult,
        pub(crate) calls: AtomicUsize,
    }

    impl CannedGateway {
        pub(crate) fn new(label: &'static str, result: SuggestionResult) -> Self {
            Self {
                label,
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SuggestionGateway for CannedGateway {
        fn label(&self) -> &str {
            self.label
        }

        fn request<'a>(
            &'a self,
            _command: &'a str,
        ) -> Pin<Box<dyn Future<Output = SuggestionResult> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = self.result.clone();
            Box::pin(async move { result })
        }
    }

    fn tokens(command: &str) -> Vec<String> {
        crate::analysis::tokenize(command)
    }

    #[tokio::test]
    async fn primary_suggestion_wins() {
        let chain = SuggestionChain::new(Box::new(CannedGateway::new(
            "copilot",
            SuggestionResult::Suggestion("rm -ri foo".to_string()),
        )));
        let report = chain.suggest("rm -rf foo", &tokens("rm -rf foo")).await;
        assert_eq!(report.fallback, None);
        assert_eq!(report.runnable_text(), Some("rm -ri foo"));
    }

    #[tokio::test]
    async fn secondary_used_when_primary_missing() {
        let chain = SuggestionChain::new(Box::new(CannedGateway::new(
            "copilot",
            SuggestionResult::ToolMissing,
        )))
        .with_secondary(Box::new(CannedGateway::new(
            "Google Gemini",
            SuggestionResult::Suggestion("git stash".to_string()),
        )));
        let report = chain
            .suggest("git reset --hard", &tokens("git reset --hard"))
            .await;
        assert_eq!(report.primary, SuggestionResult::ToolMissing);
        let fallback = report.fallback.clone().unwrap();
        assert_eq!(
            fallback.source,
            FallbackSource::Secondary("Google Gemini".to_string())
        );
        assert_eq!(report.runnable_text(), Some("git stash"));
    }

    #[cfg(not(target_os = "windows"))]
    #[tokio::test]
    async fn local_rules_apply_last() {
        let chain = SuggestionChain::new(Box::new(CannedGateway::new(
            "copilot",
            SuggestionResult::ToolError("boom".to_string()),
        )))
        .with_secondary(Box::new(CannedGateway::new(
            "Google Gemini",
            SuggestionResult::Empty,
        )));
        let report = chain.suggest("rm -rf /tmp/foo", &tokens("rm -rf /tmp/foo")).await;
        assert_eq!(
            report.fallback,
            Some(FallbackSuggestion {
                source: FallbackSource::LocalRules,
                text: "rm -ri /tmp/foo".to_string(),
                runnable: true,
            })
        );
    }

    #[tokio::test]
    async fn unmatched_local_rule_is_not_runnable() {
        let chain = SuggestionChain::new(Box::new(CannedGateway::new(
            "copilot",
            SuggestionResult::Empty,
        )));
        let report = chain.suggest("shutdown now", &tokens("shutdown now")).await;
        assert_eq!(report.runnable_text(), None);
        assert_eq!(report.fallback.unwrap().text, NO_LOCAL_RULE);
    }

    #[tokio::test]
    async fn local_rules_can_be_disabled() {
        let chain = SuggestionChain::new(Box::new(CannedGateway::new(
            "copilot",
            SuggestionResult::ToolMissing,
        )))
        .with_local_rules(false);
        let report = chain.suggest("rm -rf /", &tokens("rm -rf /")).await;
        assert_eq!(report.fallback, None);
        assert_eq!(report.runnable_text(), None);
    }
}
