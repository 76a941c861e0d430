//! Scenario validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Scenario`] for
//! structural errors such as empty task lists, invalid paths,
//! duplicate task names, bad HTTP methods, zero weights, and malformed
//! base URLs or headers. Returns a list of [`ValidationError`] values
//! with per-field suggestions.

use url::Url;

use super::model::Scenario;
use crate::error::ValidationError;

pub const VALID_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// Validate a task path. Returns `Ok(())` or a human-readable error.
pub fn validate_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("path cannot be empty".into());
    }
    if !path.starts_with('/') {
        return Err(format!("path must start with '/' (did you mean '/{path}'?)"));
    }
    Ok(())
}

/// Validate the base URL. Returns `Ok(())` or a human-readable error.
pub fn validate_base_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

/// Validate an HTTP method string. Returns `Ok(())` or a human-readable error.
pub fn validate_method(method: &str) -> Result<(), String> {
    let upper = method.to_uppercase();
    if VALID_METHODS.contains(&upper.as_str()) {
        Ok(())
    } else {
        Err(format!("'{method}' is not a valid HTTP method"))
    }
}

/// Validate an identity label (suite or task name). Labels end up in
/// header values and in the `<suite>#<task>` qualified name.
fn validate_label(label: &str) -> Result<(), String> {
    if label.is_empty() {
        return Err("cannot be empty".into());
    }
    if label.contains('#') {
        return Err("'#' is reserved as the suite/task separator".into());
    }
    if label.chars().any(char::is_control) {
        return Err("control characters are not allowed".into());
    }
    Ok(())
}

pub fn validate(scenario: &Scenario) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(msg) = validate_label(&scenario.suite) {
        errors.push(ValidationError {
            task: "(scenario)".into(),
            field: "suite".into(),
            message: format!("suite {msg}"),
            suggestion: None,
        });
    }

    if let Err(msg) = validate_base_url(&scenario.base_url) {
        errors.push(ValidationError {
            task: "(scenario)".into(),
            field: "base_url".into(),
            message: msg,
            suggestion: None,
        });
    }

    if scenario.tasks.is_empty() {
        errors.push(ValidationError {
            task: "(scenario)".into(),
            field: "tasks".into(),
            message: "at least one task must be defined".into(),
            suggestion: None,
        });
        return Err(errors);
    }

    let mut seen_names = std::collections::HashSet::new();

    for (i, task) in scenario.tasks.iter().enumerate() {
        let task_id = if task.name.is_empty() {
            format!("tasks[{i}]")
        } else {
            task.name.clone()
        };

        if let Err(msg) = validate_label(&task.name) {
            errors.push(ValidationError {
                task: task_id.clone(),
                field: "name".into(),
                message: format!("task name {msg}"),
                suggestion: None,
            });
        }

        if !seen_names.insert(&task.name) {
            errors.push(ValidationError {
                task: task_id.clone(),
                field: "name".into(),
                message: "duplicate task name".into(),
                suggestion: None,
            });
        }

        if let Err(msg) = validate_method(&task.method) {
            errors.push(ValidationError {
                task: task_id.clone(),
                field: "method".into(),
                message: msg,
                suggestion: None,
            });
        }

        if let Err(msg) = validate_path(&task.path) {
            errors.push(ValidationError {
                task: task_id.clone(),
                field: "path".into(),
                message: msg,
                suggestion: if !task.path.is_empty() && !task.path.starts_with('/') {
                    Some(format!("did you mean '/{}'?", task.path))
                } else {
                    None
                },
            });
        }

        if task.weight == 0 {
            errors.push(ValidationError {
                task: task_id.clone(),
                field: "weight".into(),
                message: "weight must be at least 1".into(),
                suggestion: Some("omit the field to use the default weight of 1".into()),
            });
        }

        for (key, value) in &task.headers {
            if key.parse::<http::HeaderName>().is_err() {
                errors.push(ValidationError {
                    task: task_id.clone(),
                    field: "headers".into(),
                    message: format!("'{key}' is not a valid header name"),
                    suggestion: None,
                });
            }
            if http::HeaderValue::from_str(value).is_err() {
                errors.push(ValidationError {
                    task: task_id.clone(),
                    field: "headers".into(),
                    message: format!("value for '{key}' is not a valid header value"),
                    suggestion: None,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, scenario: &Scenario) -> String {
    let mut lines = vec![format!(
        "  suite {} -> {} ({} tasks, total weight {})\n",
        scenario.suite,
        scenario.base_url,
        scenario.tasks.len(),
        scenario.total_weight(),
    )];

    lines.push(format!(
        "  tracking: scope {}, scheme {}, sampled {}",
        scenario.tracking.scope, scenario.tracking.id_scheme, scenario.tracking.sampled,
    ));
    lines.push(format!("  timeout: {}ms", scenario.defaults.timeout));

    for task in &scenario.tasks {
        lines.push(format!(
            "  {}  {} {} (weight {})",
            task.name, task.method, task.path, task.weight,
        ));
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{Defaults, Scenario, TaskSpec, TrackingConfig};

    fn task(name: &str) -> TaskSpec {
        TaskSpec {
            name: name.into(),
            weight: 1,
            method: "GET".into(),
            path: "/products".into(),
            headers: Default::default(),
            body: None,
        }
    }

    fn minimal_scenario() -> Scenario {
        Scenario {
            suite: "ShopUser".into(),
            base_url: "http://localhost:8080".into(),
            defaults: Defaults::default(),
            tracking: TrackingConfig::default(),
            tasks: vec![task("browse")],
        }
    }

    #[test]
    fn valid_scenario_passes() {
        assert!(validate(&minimal_scenario()).is_ok());
    }

    #[test]
    fn empty_tasks_fails() {
        let mut scenario = minimal_scenario();
        scenario.tasks = vec![];
        let errors = validate(&scenario).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("at least one task"));
    }

    #[test]
    fn duplicate_task_names_fail() {
        let mut scenario = minimal_scenario();
        scenario.tasks = vec![task("browse"), task("browse")];
        let errors = validate(&scenario).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("duplicate")));
    }

    #[test]
    fn invalid_base_url_fails() {
        let mut scenario = minimal_scenario();
        scenario.base_url = "not a url".into();
        let errors = validate(&scenario).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("not a valid URL")));
    }

    #[test]
    fn non_http_scheme_fails() {
        let mut scenario = minimal_scenario();
        scenario.base_url = "ftp://files.example.com".into();
        let errors = validate(&scenario).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("unsupported scheme")));
    }

    #[test]
    fn path_without_slash_gets_a_suggestion() {
        let mut scenario = minimal_scenario();
        scenario.tasks[0].path = "products".into();
        let errors = validate(&scenario).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.suggestion.as_deref() == Some("did you mean '/products'?")));
    }

    #[test]
    fn invalid_method_fails() {
        let mut scenario = minimal_scenario();
        scenario.tasks[0].method = "FETCH".into();
        let errors = validate(&scenario).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message.contains("not a valid HTTP method")));
    }

    #[test]
    fn lowercase_methods_are_accepted() {
        let mut scenario = minimal_scenario();
        scenario.tasks[0].method = "post".into();
        assert!(validate(&scenario).is_ok());
    }

    #[test]
    fn zero_weight_fails() {
        let mut scenario = minimal_scenario();
        scenario.tasks[0].weight = 0;
        let errors = validate(&scenario).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("at least 1")));
    }

    #[test]
    fn hash_in_suite_fails() {
        let mut scenario = minimal_scenario();
        scenario.suite = "Shop#User".into();
        let errors = validate(&scenario).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("reserved")));
    }

    #[test]
    fn bad_task_header_name_fails() {
        let mut scenario = minimal_scenario();
        scenario.tasks[0]
            .headers
            .insert("bad header".into(), "1".into());
        let errors = validate(&scenario).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message.contains("not a valid header name")));
    }
}
