use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::analysis::{DangerPattern, ExplanationDictionary};

const BUILTIN_COMMANDS: &str = include_str!("../data/commands.json");
const BUILTIN_DANGER_PATTERNS: &str = include_str!("../data/danger_patterns.json");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Builtin,
    File(PathBuf),
}

impl CatalogSource {
    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Builtin => "built-in".to_string(),
            CatalogSource::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub explanations: ExplanationDictionary,
    pub patterns: Vec<DangerPattern>,
}

pub fn load(explanations: &CatalogSource, patterns: &CatalogSource) -> Result<Catalog> {
    let content = read_source(explanations, BUILTIN_COMMANDS, "command explanations")?;
    let explanations = parse_explanations(&content, explanations)?;

    let content = read_source(patterns, BUILTIN_DANGER_PATTERNS, "danger patterns")?;
    let patterns = parse_patterns(&content, patterns)?;

    info!(
        explanations = explanations.len(),
        patterns = patterns.len(),
        "catalog loaded"
    );
    Ok(Catalog {
        explanations,
        patterns,
    })
}

fn read_source(
    source: &CatalogSource,
    builtin: &'static str,
    label: &str,
) -> Result<Cow<'static, str>> {
    match source {
        CatalogSource::Builtin => Ok(Cow::Borrowed(builtin)),
        CatalogSource::File(path) => {
            debug!(path = %path.display(), "reading {label}");
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {label}: {}", path.display()))?;
            Ok(Cow::Owned(content))
        }
    }
}

fn parse_explanations(content: &str, source: &CatalogSource) -> Result<ExplanationDictionary> {
    serde_json::from_str(content).with_context(|| {
        format!(
            "failed to parse command explanations JSON: {}",
            source.describe()
        )
    })
}

fn parse_patterns(content: &str, source: &CatalogSource) -> Result<Vec<DangerPattern>> {
    serde_json::from_str(content)
        .with_context(|| format!("failed to parse danger patterns JSON: {}", source.describe()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = load(&CatalogSource::Builtin, &CatalogSource::Builtin).unwrap();
        assert_eq!(catalog.explanations.lookup("rm"), Some("Remove files or directories"));
        assert!(
            catalog
                .patterns
                .iter()
                .any(|entry| entry.pattern.as_deref() == Some("rm -rf"))
        );
    }

    #[test]
    fn reads_files_from_disk() {
        let mut commands = tempfile::NamedTempFile::new().unwrap();
        write!(commands, r#"{{"deploy": "Ship it"}}"#).unwrap();
        let mut patterns = tempfile::NamedTempFile::new().unwrap();
        write!(patterns, r#"[{{"pattern": "deploy --prod"}}]"#).unwrap();

        let catalog = load(
            &CatalogSource::File(commands.path().to_path_buf()),
            &CatalogSource::File(patterns.path().to_path_buf()),
        )
        .unwrap();
        assert_eq!(catalog.explanations.lookup("deploy"), Some("Ship it"));
        assert_eq!(catalog.patterns.len(), 1);
        assert_eq!(catalog.patterns[0].explanation, None);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = load(&CatalogSource::File(missing), &CatalogSource::Builtin).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read command explanations"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut patterns = tempfile::NamedTempFile::new().unwrap();
        write!(patterns, "[{{\"pattern\": ").unwrap();
        let err = load(
            &CatalogSource::Builtin,
            &CatalogSource::File(patterns.path().to_path_buf()),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse danger patterns JSON"));
    }
}
