//! Unified error types for loadmark.
//!
//! Defines [`LoadmarkError`] (the main crate error enum) and
//! [`ValidationError`] for scenario validation failures. Both use
//! `thiserror` for `Display` and `Error` derives. Error messages
//! include contextual hints to guide the user toward a fix.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub task: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  task {}: {} — {}", self.task, self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoadmarkError {
    #[error("No scenario file found.\n\n  {hint}")]
    NoScenario { hint: String },

    #[error("Scenario file not found: {}", path.display())]
    ScenarioFileNotFound { path: PathBuf },

    #[error("Scenario parse error in {path}:\n  {source}")]
    ScenarioParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Scenario validation failed:\n{}", format_errors(.errors))]
    ScenarioValidation { errors: Vec<ValidationError> },

    #[error("Unsupported scenario format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to {url} timed out after {millis}ms")]
    RequestTimeout { url: String, millis: u64 },

    #[error("No task named '{name}' in the scenario")]
    UnknownTask { name: String },

    #[error("{failed} of {total} probes failed")]
    ProbeFailed { failed: usize, total: usize },

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
