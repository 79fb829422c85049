use anyhow::Result;
use tracing::{info, warn};

use crate::advisor::{CliAdvisor, GeminiAdvisor, SuggestionChain};
use crate::catalog;
use crate::cli::Cli;
use crate::engine::InspectionEngine;
use crate::interactive;
use crate::output;
use crate::prompter::StdioPrompter;
use crate::settings::Settings;

pub async fn run(cli: Cli) -> Result<()> {
    output::configure_colors();

    let settings = Settings::resolve(&cli)?;
    let catalog = catalog::load(&settings.explanations, &settings.patterns)?;
    let chain = build_chain(&settings);
    let engine = InspectionEngine::new(&catalog, &chain);

    if let Some(command) = cli.one_shot_command() {
        info!("one-shot inspection");
        let mut prompter = StdioPrompter::new();
        let inspection = engine.inspect(&command, &mut prompter).await?;
        info!(
            dangerous = inspection.analysis.is_dangerous(),
            advisor = inspection.report.as_ref().map(|report| report.primary.kind()),
            executed = inspection.approved.is_some(),
            "inspection finished"
        );
        return Ok(());
    }

    interactive::run_interactive(&engine).await
}

fn build_chain(settings: &Settings) -> SuggestionChain {
    let advisor = CliAdvisor::new(settings.advisor.clone());
    info!(
        program = %settings.advisor.program,
        flavor = ?advisor.flavor(),
        "advisor configured"
    );
    let mut chain =
        SuggestionChain::new(Box::new(advisor)).with_local_rules(settings.local_fallback);
    if let Some(key) = &settings.gemini_key {
        match GeminiAdvisor::new(key.clone(), settings.advisor.timeout) {
            Ok(gemini) => chain = chain.with_secondary(Box::new(gemini)),
            Err(err) => warn!("Gemini fallback disabled: {err:#}"),
        }
    }
    chain
}
