use anyhow::{Context, Result, bail};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::advisor::CliAdvisorOptions;
use crate::catalog::CatalogSource;
use crate::cli::Cli;
use crate::paths;

const DB_ENV: &str = "SAFECLI_DB";
const DANGER_ENV: &str = "SAFECLI_DANGER";
const ADVISOR_ENV: &str = "SAFECLI_ADVISOR";
const ADVISOR_MODEL_ENV: &str = "SAFECLI_ADVISOR_MODEL";
const ADVISOR_TIMEOUT_ENV: &str = "SAFECLI_ADVISOR_TIMEOUT";
const ADVISOR_KEY_ENV: &str = "COPILOT_API_KEY";
const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone)]
pub struct Settings {
    pub explanations: CatalogSource,
    pub patterns: CatalogSource,
    pub advisor: CliAdvisorOptions,
    pub gemini_key: Option<String>,
    pub local_fallback: bool,
}

impl Settings {
    // flags > env > base-dir files > built-in
    pub fn resolve(cli: &Cli) -> Result<Self> {
        Self::resolve_with(cli, get_env, &paths::base_dir())
    }

    pub fn resolve_with(
        cli: &Cli,
        env: impl Fn(&str) -> Option<String>,
        base: &Path,
    ) -> Result<Self> {
        let explanations = catalog_source(
            cli.db.as_deref(),
            env(DB_ENV),
            &paths::user_commands_path(base),
        );
        let patterns = catalog_source(
            cli.danger.as_deref(),
            env(DANGER_ENV),
            &paths::user_patterns_path(base),
        );

        let mut advisor = CliAdvisorOptions::default();
        if let Some(program) = cli.advisor_path.clone().or_else(|| env(ADVISOR_ENV)) {
            advisor.program = program;
        }
        advisor.model = cli.advisor_model.clone().or_else(|| env(ADVISOR_MODEL_ENV));
        advisor.extra_args = cli.advisor_args.clone();
        advisor.api_key = cli.advisor_key.clone().or_else(|| env(ADVISOR_KEY_ENV));
        if let Some(seconds) = advisor_timeout(cli.advisor_timeout, env(ADVISOR_TIMEOUT_ENV))? {
            advisor.timeout = Duration::from_secs(seconds);
        }

        let settings = Self {
            explanations,
            patterns,
            advisor,
            gemini_key: cli.gemini_key.clone().or_else(|| env(GEMINI_KEY_ENV)),
            local_fallback: !cli.no_local_fallback,
        };
        debug!(
            explanations = %settings.explanations.describe(),
            patterns = %settings.patterns.describe(),
            advisor = %settings.advisor.program,
            timeout_secs = settings.advisor.timeout.as_secs(),
            gemini = settings.gemini_key.is_some(),
            "settings resolved"
        );
        Ok(settings)
    }
}

fn catalog_source(flag: Option<&str>, env: Option<String>, default: &Path) -> CatalogSource {
    if let Some(value) = flag.map(str::to_string).or(env) {
        return CatalogSource::File(paths::resolve_user_path(&value));
    }
    if default.is_file() {
        return CatalogSource::File(default.to_path_buf());
    }
    CatalogSource::Builtin
}

fn advisor_timeout(flag: Option<u64>, env: Option<String>) -> Result<Option<u64>> {
    let seconds = match (flag, env) {
        (Some(seconds), _) => seconds,
        (None, Some(raw)) => raw
            .parse::<u64>()
            .with_context(|| format!("invalid {ADVISOR_TIMEOUT_ENV} value: {raw}"))?,
        (None, None) => return Ok(None),
    };
    if seconds == 0 {
        bail!("advisor timeout must be at least one second");
    }
    Ok(Some(seconds))
}

fn get_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Loads `.env` from the working directory. Variables already set win.
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        eprintln!("warning: failed to load .env: {err}");
    }
}
