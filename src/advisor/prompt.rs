use anyhow::{Context, Result};
use serde::Serialize;
use tera::{Context as TeraContext, Tera};

const SAFETY_PROMPT_TEMPLATE: &str = include_str!("prompts/safety_prompt.tera");

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PromptInput<'a> {
    pub(crate) command: &'a str,
    pub(crate) prefer_bare_command: bool,
}

pub(crate) fn render(input: &PromptInput<'_>) -> Result<String> {
    let mut context = TeraContext::new();
    context.insert("command", input.command);
    context.insert("prefer_bare_command", &input.prefer_bare_command);

    let prompt = Tera::one_off(SAFETY_PROMPT_TEMPLATE, &context, false)
        .with_context(|| "failed to render safety prompt")?;
    Ok(prompt.trim_end().to_string())
}
