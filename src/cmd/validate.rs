//! `loadmark validate` — check a scenario file for errors.
//!
//! Parses and validates the scenario file, reporting results in either
//! human-readable text or machine-readable JSON format.

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::{parse_scenario_str, validation};
use crate::error::LoadmarkError;

pub fn execute(args: &ValidateArgs) -> Result<(), LoadmarkError> {
    let path = &args.config;

    if !path.exists() {
        return Err(LoadmarkError::ScenarioFileNotFound { path: path.clone() });
    }

    let content = std::fs::read_to_string(path)?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let scenario = parse_scenario_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&scenario) {
        match args.format {
            ValidateFormat::Text => {
                eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
                for error in &errors {
                    eprintln!("{error}");
                }
            }
            ValidateFormat::Json => {
                let json_errors: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "task": e.task,
                            "field": e.field,
                            "message": e.message,
                            "suggestion": e.suggestion,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "errors": json_errors,
                    })
                );
            }
        }
        return Err(LoadmarkError::ScenarioValidation { errors });
    }

    match args.format {
        ValidateFormat::Text => {
            println!(
                "\u{2713} {}",
                validation::format_validation_report(&path.display().to_string(), &scenario)
            );
        }
        ValidateFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "suite": scenario.suite,
                    "tasks": scenario.tasks.len(),
                    "total_weight": scenario.total_weight(),
                })
            );
        }
    }

    Ok(())
}
