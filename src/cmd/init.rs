//! `loadmark init` — generate a starter scenario file.
//!
//! Creates a YAML, JSON, or TOML scenario file with either minimal
//! or fully documented templates.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::LoadmarkError;

pub fn execute(args: &InitArgs) -> Result<(), LoadmarkError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("loadmark.{}", args.format.extension())));

    if output.exists() {
        return Err(LoadmarkError::FileExists { path: output });
    }

    let content = match (&args.format, args.full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    };

    std::fs::write(&output, content)?;
    println!("Created {}", output.display());
    Ok(())
}

const YAML_MINIMAL: &str = r#"# loadmark scenario

suite: ShopUser
base_url: "http://localhost:8080"

tasks:
  - name: browse
    path: "/products"
"#;

const YAML_FULL: &str = r#"# loadmark scenario
#
# All values shown are defaults. Uncomment and modify as needed.

suite: ShopUser
base_url: "http://localhost:8080"

defaults:
  timeout: 5000                # Per-request timeout in ms

# How synthetic-traffic markers are minted
tracking:
  scope: per-task-name         # per-task-name | per-instance
  id_scheme: span64            # span64 | hex128 | uuid
  sampled: true                # traceparent flags: true -> 01, false -> 00

tasks:
  # Simple: GET with defaults
  - name: browse
    path: "/products"

  # Full: all options shown
  - name: checkout
    method: POST
    path: "/orders"
    weight: 3
    headers:
      content-type: "application/json"
    body: '{"items": []}'
"#;

const JSON_MINIMAL: &str = r#"{
  "suite": "ShopUser",
  "base_url": "http://localhost:8080",
  "tasks": [
    { "name": "browse", "path": "/products" }
  ]
}
"#;

const JSON_FULL: &str = r#"{
  "suite": "ShopUser",
  "base_url": "http://localhost:8080",
  "defaults": {
    "timeout": 5000
  },
  "tracking": {
    "scope": "per-task-name",
    "id_scheme": "span64",
    "sampled": true
  },
  "tasks": [
    { "name": "browse", "path": "/products" },
    {
      "name": "checkout",
      "method": "POST",
      "path": "/orders",
      "weight": 3,
      "headers": { "content-type": "application/json" },
      "body": "{\"items\": []}"
    }
  ]
}
"#;

const TOML_MINIMAL: &str = r#"# loadmark scenario

suite = "ShopUser"
base_url = "http://localhost:8080"

[[tasks]]
name = "browse"
path = "/products"
"#;

const TOML_FULL: &str = r#"# loadmark scenario
#
# All values shown are defaults. Uncomment and modify as needed.

suite = "ShopUser"
base_url = "http://localhost:8080"

[defaults]
timeout = 5000                 # Per-request timeout in ms

# How synthetic-traffic markers are minted
[tracking]
scope = "per-task-name"        # per-task-name | per-instance
id_scheme = "span64"           # span64 | hex128 | uuid
sampled = true                 # traceparent flags: true -> 01, false -> 00

[[tasks]]
name = "browse"
path = "/products"

[[tasks]]
name = "checkout"
method = "POST"
path = "/orders"
weight = 3
headers = { content-type = "application/json" }
body = '{"items": []}'
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_scenario_str, validation};

    #[test]
    fn every_template_parses_and_validates() {
        let templates: &[(&str, &str)] = &[
            #[cfg(feature = "yaml")]
            ("yaml", YAML_MINIMAL),
            #[cfg(feature = "yaml")]
            ("yaml", YAML_FULL),
            #[cfg(feature = "json")]
            ("json", JSON_MINIMAL),
            #[cfg(feature = "json")]
            ("json", JSON_FULL),
            #[cfg(feature = "toml")]
            ("toml", TOML_MINIMAL),
            #[cfg(feature = "toml")]
            ("toml", TOML_FULL),
        ];

        for &(ext, content) in templates {
            let scenario = parse_scenario_str(ext, content, "template")
                .unwrap_or_else(|e| panic!("{ext} template failed to parse: {e}"));
            assert!(validation::validate(&scenario).is_ok());
        }
    }

    #[test]
    fn full_templates_spell_out_tracking() {
        for content in [YAML_FULL, TOML_FULL] {
            assert!(content.contains("per-task-name"));
            assert!(content.contains("span64"));
        }
    }
}
