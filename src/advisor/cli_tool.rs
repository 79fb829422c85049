use regex::Regex;
use std::future::Future;
use std::io::ErrorKind;
use std::path::Path;
use std::pin::Pin;
use std::process::{Output, Stdio};
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::prompt::{self, PromptInput};
use super::{NO_SUGGESTION_RETURNED, SuggestionGateway, SuggestionResult};

pub const DEFAULT_ADVISOR_PROGRAM: &str = "copilot";
pub const DEFAULT_ADVISOR_TIMEOUT: Duration = Duration::from_secs(15);
const API_KEY_ENV: &str = "COPILOT_API_KEY";
const QUOTA_EXCEEDED: &str = "quota exceeded (HTTP 402): no quota remaining";

static ANSI_ESCAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisorFlavor {
    /// `gh copilot suggest -t shell <prompt>`
    GhCopilot,
    /// `copilot --prompt <prompt> [--model <model>]`
    Copilot,
    /// Any other program; the prompt goes to stdin.
    Stdin,
}

impl AdvisorFlavor {
    pub fn detect(program: &str) -> Self {
        let stem = Path::new(program)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(program)
            .to_lowercase();
        match stem.as_str() {
            "gh" => AdvisorFlavor::GhCopilot,
            "copilot" => AdvisorFlavor::Copilot,
            _ => AdvisorFlavor::Stdin,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CliAdvisorOptions {
    pub program: String,
    pub model: Option<String>,
    pub extra_args: Vec<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for CliAdvisorOptions {
    fn default() -> Self {
        Self {
            program: DEFAULT_ADVISOR_PROGRAM.to_string(),
            model: None,
            extra_args: Vec::new(),
            api_key: None,
            timeout: DEFAULT_ADVISOR_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CliAdvisor {
    options: CliAdvisorOptions,
    flavor: AdvisorFlavor,
}

impl CliAdvisor {
    pub fn new(options: CliAdvisorOptions) -> Self {
        let flavor = AdvisorFlavor::detect(&options.program);
        Self { options, flavor }
    }

    pub fn flavor(&self) -> AdvisorFlavor {
        self.flavor
    }

    pub async fn suggest(&self, command: &str) -> SuggestionResult {
        let prompt = match prompt::render(&PromptInput {
            command,
            prefer_bare_command: false,
        }) {
            Ok(prompt) => prompt,
            Err(err) => return SuggestionResult::ToolError(format!("{err:#}")),
        };

        let started = Instant::now();
        let result = self.run(&prompt).await;
        info!(
            program = %self.options.program,
            flavor = ?self.flavor,
            outcome = result.kind(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "advisor finished"
        );
        result
    }

    fn command_args(&self, prompt: &str) -> Vec<String> {
        let mut args = match self.flavor {
            AdvisorFlavor::GhCopilot => ["copilot", "suggest", "-t", "shell", prompt]
                .map(String::from)
                .to_vec(),
            AdvisorFlavor::Copilot => {
                let mut args = vec!["--prompt".to_string(), prompt.to_string()];
                if let Some(model) = &self.options.model {
                    args.push("--model".to_string());
                    args.push(model.clone());
                }
                args
            }
            AdvisorFlavor::Stdin => Vec::new(),
        };
        args.extend(self.options.extra_args.iter().cloned());
        args
    }

    async fn run(&self, prompt: &str) -> SuggestionResult {
        let program = match which::which(&self.options.program) {
            Ok(path) => path,
            Err(err) => {
                debug!(program = %self.options.program, "advisor not resolvable: {err}");
                return SuggestionResult::ToolMissing;
            }
        };

        let mut command = Command::new(&program);
        command
            .args(self.command_args(prompt))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if self.flavor == AdvisorFlavor::Stdin {
            command.stdin(Stdio::piped());
        } else {
            command.stdin(Stdio::null());
        }
        if let Some(key) = &self.options.api_key {
            command.env(API_KEY_ENV, key);
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) if err.kind() == ErrorKind::NotFound => return SuggestionResult::ToolMissing,
            Err(err) => {
                return SuggestionResult::ToolError(format!(
                    "failed to start {}: {err}",
                    program.display()
                ));
            }
        };

        let stdin = child.stdin.take();
        let input = prompt.as_bytes().to_vec();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                if let Err(err) = stdin.write_all(&input).await {
                    debug!("advisor did not take the prompt on stdin: {err}");
                }
                drop(stdin);
            }
        };
        // Output is drained while the prompt is still being written.
        let exchange = async move {
            let ((), output) = tokio::join!(feed, child.wait_with_output());
            output
        };

        match timeout(self.options.timeout, exchange).await {
            Ok(Ok(output)) => classify_output(&output),
            Ok(Err(err)) => {
                SuggestionResult::ToolError(format!("failed to wait for advisor: {err}"))
            }
            Err(_) => {
                warn!(program = %self.options.program, "advisor timed out");
                SuggestionResult::ToolError(format!(
                    "timed out after {}",
                    describe_duration(self.options.timeout)
                ))
            }
        }
    }
}

impl SuggestionGateway for CliAdvisor {
    fn label(&self) -> &str {
        &self.options.program
    }

    fn request<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = SuggestionResult> + Send + 'a>> {
        Box::pin(self.suggest(command))
    }
}

fn classify_output(output: &Output) -> SuggestionResult {
    if !output.status.success() {
        let stderr = strip_ansi(&String::from_utf8_lossy(&output.stderr))
            .trim()
            .to_string();
        let lowered = stderr.to_lowercase();
        if lowered.contains("402") || lowered.contains("quota") {
            return SuggestionResult::ToolError(QUOTA_EXCEEDED.to_string());
        }
        if stderr.is_empty() {
            return SuggestionResult::ToolError(NO_SUGGESTION_RETURNED.to_string());
        }
        return SuggestionResult::ToolError(stderr);
    }

    let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout));
    let text = stdout.trim();
    if text.is_empty() {
        SuggestionResult::Empty
    } else {
        SuggestionResult::Suggestion(text.to_string())
    }
}

pub(crate) fn strip_ansi(text: &str) -> String {
    match ANSI_ESCAPE.as_ref() {
        Some(pattern) => pattern.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

fn describe_duration(duration: Duration) -> String {
    if duration.subsec_millis() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}ms", duration.as_millis())
    }
}
