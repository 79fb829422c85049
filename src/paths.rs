use std::path::{Path, PathBuf};

const BASE_DIR_ENV: &str = "SAFECLI_DIR";
const COMMANDS_FILE: &str = "commands.json";
const PATTERNS_FILE: &str = "danger_patterns.json";

pub fn base_dir() -> PathBuf {
    if let Ok(value) = std::env::var(BASE_DIR_ENV)
        && let Some(path) = normalize_dir(&value)
    {
        return path;
    }
    home_join(".safecli").unwrap_or_else(|| PathBuf::from(".safecli"))
}

pub fn log_dir() -> PathBuf {
    base_dir().join("logs")
}

pub fn user_commands_path(base: &Path) -> PathBuf {
    base.join(COMMANDS_FILE)
}

pub fn user_patterns_path(base: &Path) -> PathBuf {
    base.join(PATTERNS_FILE)
}

pub fn resolve_user_path(value: &str) -> PathBuf {
    normalize_dir(value).unwrap_or_else(|| PathBuf::from(value))
}

fn home_join(suffix: &str) -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .and_then(|home| {
            let home = home.trim();
            if home.is_empty() {
                None
            } else {
                Some(Path::new(home).join(suffix))
            }
        })
}

fn normalize_dir(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let expanded = expand_tilde(trimmed);
    Some(PathBuf::from(expanded).components().collect())
}

fn expand_tilde(value: &str) -> String {
    if (value == "~" || value.starts_with("~/"))
        && let Ok(home) = std::env::var("HOME")
    {
        let home = home.trim();
        if !home.is_empty() {
            return format!("{home}{}", &value[1..]);
        }
    }
    value.to_string()
}
