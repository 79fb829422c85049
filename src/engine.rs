use anyhow::Result;
use colored::Colorize;
use tracing::info;

use crate::advisor::{SuggestionChain, SuggestionReport};
use crate::analysis::{self, Analysis};
use crate::catalog::Catalog;
use crate::execution;
use crate::output;
use crate::prompter::ConfirmPrompter;

#[derive(Debug)]
pub struct Inspection {
    pub analysis: Analysis,
    pub report: Option<SuggestionReport>,
    pub approved: Option<String>,
}

pub struct InspectionEngine<'a> {
    catalog: &'a Catalog,
    chain: &'a SuggestionChain,
}

impl<'a> InspectionEngine<'a> {
    pub fn new(catalog: &'a Catalog, chain: &'a SuggestionChain) -> Self {
        Self { catalog, chain }
    }

    pub async fn inspect(
        &self,
        command: &str,
        prompter: &mut dyn ConfirmPrompter,
    ) -> Result<Inspection> {
        let analysis = analysis::analyze(
            command,
            &self.catalog.explanations,
            &self.catalog.patterns,
        );
        let mut inspection = Inspection {
            analysis,
            report: None,
            approved: None,
        };
        if inspection.analysis.is_empty() {
            println!("No command provided.");
            return Ok(inspection);
        }

        println!("{}", output::render_analysis(&inspection.analysis));
        println!();
        info!(
            tokens = inspection.analysis.tokens.len(),
            matches = inspection.analysis.matches.len(),
            "command analyzed"
        );

        if !inspection.analysis.is_dangerous() {
            println!("{}", "No known dangerous patterns detected.".green());
            return Ok(inspection);
        }

        println!(
            "{}",
            format!("Contacting {}...", self.chain.advisor_label()).cyan()
        );
        let report = self
            .chain
            .suggest(&inspection.analysis.command, &inspection.analysis.tokens)
            .await;
        println!("{}", output::render_suggestion(&report));
        println!();

        if let Some(suggestion) = report.runnable_text() {
            inspection.approved = execution::offer_execution(prompter, suggestion)?;
            if let Some(command) = &inspection.approved {
                execution::execute(command);
            }
        }
        inspection.report = Some(report);
        Ok(inspection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{CannedGateway, SuggestionResult};
    use crate::analysis::DangerPattern;
    use crate::prompter::ScriptedPrompter;

    fn catalog() -> Catalog {
        Catalog {
            explanations: [("rm", "Remove files"), ("-r", "Recursive"), ("-f", "Force")]
                .into_iter()
                .collect(),
            patterns: vec![
                DangerPattern::new("rm -rf")
                    .with_explanation("Deletes recursively")
                    .with_advice("Use rm -ri"),
            ],
        }
    }

    fn chain(result: SuggestionResult) -> SuggestionChain {
        SuggestionChain::new(Box::new(CannedGateway::new("copilot", result)))
    }

    #[tokio::test]
    async fn safe_command_skips_advisor() {
        let catalog = catalog();
        let chain = chain(SuggestionResult::Suggestion("never".to_string()));
        let engine = InspectionEngine::new(&catalog, &chain);
        let mut prompter = ScriptedPrompter::new(&[]);

        let inspection = engine.inspect("ls -la", &mut prompter).await.unwrap();
        assert!(inspection.analysis.matches.is_empty());
        assert_eq!(inspection.report, None);
        assert!(prompter.asked.is_empty());
    }

    #[tokio::test]
    async fn empty_command_is_reported() {
        let catalog = catalog();
        let chain = chain(SuggestionResult::Empty);
        let engine = InspectionEngine::new(&catalog, &chain);
        let mut prompter = ScriptedPrompter::new(&[]);

        let inspection = engine.inspect("   ", &mut prompter).await.unwrap();
        assert!(inspection.analysis.is_empty());
        assert_eq!(inspection.report, None);
    }

    #[tokio::test]
    async fn dangerous_command_gets_suggestion_and_confirmation() {
        let catalog = catalog();
        let chain = chain(SuggestionResult::Suggestion("rm -ri /tmp/foo".to_string()));
        let engine = InspectionEngine::new(&catalog, &chain);
        let mut prompter = ScriptedPrompter::new(&[Some("n")]);

        let inspection = engine.inspect("rm -rf /tmp/foo", &mut prompter).await.unwrap();
        assert_eq!(inspection.analysis.matches.len(), 1);
        let report = inspection.report.unwrap();
        assert_eq!(report.runnable_text(), Some("rm -ri /tmp/foo"));
        assert_eq!(inspection.approved, None);
        assert_eq!(prompter.asked, vec![execution::CONFIRM_QUESTION]);
    }

    #[tokio::test]
    async fn nothing_runnable_skips_confirmation() {
        let catalog = catalog();
        let chain = chain(SuggestionResult::Empty).with_local_rules(false);
        let engine = InspectionEngine::new(&catalog, &chain);
        let mut prompter = ScriptedPrompter::new(&[]);

        let inspection = engine.inspect("rm -rf build", &mut prompter).await.unwrap();
        assert_eq!(inspection.report.unwrap().primary, SuggestionResult::Empty);
        assert!(prompter.asked.is_empty());
    }

    #[tokio::test]
    async fn advisor_failure_still_offers_local_rule() {
        let catalog = catalog();
        let chain = chain(SuggestionResult::ToolMissing);
        let engine = InspectionEngine::new(&catalog, &chain);
        let mut prompter = ScriptedPrompter::new(&[None]);

        let inspection = engine.inspect("rm -rf build", &mut prompter).await.unwrap();
        let report = inspection.report.unwrap();
        assert_eq!(report.primary, SuggestionResult::ToolMissing);
        assert!(report.fallback.is_some());
        assert_eq!(inspection.approved, None);
        assert_eq!(prompter.asked, vec![execution::CONFIRM_QUESTION]);
    }
}
