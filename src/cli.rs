use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "safecli",
    version,
    about = "Explains shell commands, warns about dangerous ones, and suggests safer alternatives"
)]
pub struct Cli {
    /// Command to analyze; starts interactive mode when omitted
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,

    /// Command explanation dictionary (JSON object of token -> text)
    #[arg(long = "db", value_name = "FILE")]
    pub db: Option<String>,

    /// Danger pattern list (JSON array of {pattern, explanation, advice})
    #[arg(long = "danger", value_name = "FILE")]
    pub danger: Option<String>,

    /// Advisor executable asked for safer alternatives
    #[arg(long = "advisor-path", alias = "copilot-path", value_name = "PATH")]
    pub advisor_path: Option<String>,

    /// Model passed to the advisor
    #[arg(long = "advisor-model", alias = "copilot-model", value_name = "MODEL")]
    pub advisor_model: Option<String>,

    /// Seconds to wait for the advisor before giving up
    #[arg(long = "advisor-timeout", alias = "copilot-timeout", value_name = "SECS")]
    pub advisor_timeout: Option<u64>,

    /// Extra argument for the advisor (repeatable)
    #[arg(long = "advisor-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub advisor_args: Vec<String>,

    /// API key exported to the advisor as COPILOT_API_KEY
    #[arg(long = "advisor-key", alias = "copilot-key", value_name = "KEY")]
    pub advisor_key: Option<String>,

    /// Gemini API key used when the advisor gives nothing usable
    #[arg(long = "gemini-key", value_name = "KEY")]
    pub gemini_key: Option<String>,

    /// Do not fall back to the built-in rewrite rules
    #[arg(long = "no-local-fallback")]
    pub no_local_fallback: bool,

    /// Also log debug output to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    pub fn one_shot_command(&self) -> Option<String> {
        if self.command.is_empty() {
            return None;
        }
        Some(self.command.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_positional_command() {
        let cli = Cli::parse_from(["safecli", "--db", "x.json", "rm", "-rf", "/tmp/foo"]);
        assert_eq!(cli.db.as_deref(), Some("x.json"));
        assert_eq!(cli.one_shot_command().as_deref(), Some("rm -rf /tmp/foo"));
    }

    #[test]
    fn flags_after_command_belong_to_it() {
        let cli = Cli::parse_from(["safecli", "ls", "--db", "x.json"]);
        assert_eq!(cli.db, None);
        assert_eq!(cli.one_shot_command().as_deref(), Some("ls --db x.json"));
    }

    #[test]
    fn no_arguments_means_interactive() {
        let cli = Cli::parse_from(["safecli"]);
        assert_eq!(cli.one_shot_command(), None);
    }
}
