//! Scenario loading and validation.
//!
//! [`load_scenario`] reads a scenario file via Tokio, parses it by
//! extension ([`parse_scenario_str`]), and validates the result.
//! [`resolve_scenario_path`] handles the explicit-flag-then-auto-detect
//! resolution. Submodules provide the data model and validation logic.

pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::error::LoadmarkError;
use model::Scenario;

/// File names probed in the working directory when no `--config` is
/// given.
pub const SCENARIO_CANDIDATES: &[&str] = &[
    "loadmark.yaml",
    "loadmark.yml",
    "loadmark.json",
    "loadmark.toml",
];

/// Parse a scenario string based on file extension.
pub fn parse_scenario_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Scenario, LoadmarkError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| LoadmarkError::ScenarioParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| LoadmarkError::ScenarioParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| LoadmarkError::ScenarioParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(LoadmarkError::UnsupportedFormat(other.to_string())),
    }
}

async fn read_scenario_file(path: &Path) -> Result<String, LoadmarkError> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadmarkError::ScenarioFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadmarkError::Io(e)
        }
    })
}

/// Read, parse, and validate a scenario file.
pub async fn load_scenario(path: &Path) -> Result<Scenario, LoadmarkError> {
    let content = read_scenario_file(path).await?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let scenario = parse_scenario_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&scenario) {
        return Err(LoadmarkError::ScenarioValidation { errors });
    }

    Ok(scenario)
}

/// Probe the working directory for a default scenario file.
pub async fn find_scenario_file() -> Option<PathBuf> {
    for name in SCENARIO_CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected scenario file");
            return Some(path);
        }
    }
    None
}

/// Resolve the scenario path: explicit flag first, then auto-detect.
pub async fn resolve_scenario_path(explicit: Option<&Path>) -> Result<PathBuf, LoadmarkError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    find_scenario_file().await.ok_or_else(|| LoadmarkError::NoScenario {
        hint: "Provide --config <file> or create one of loadmark.{yaml,yml,json,toml}.\n  \
               Run 'loadmark init' to create a starter scenario."
            .into(),
    })
}
