//! Configuration file loading for calque.
//!
//! Reads `calque.config.json` from the current working directory, or from
//! an explicit path. Also provides the JSON Schema for editor autocompletion.

use calque_canon::{PipelineOptions, RewriteMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "calque.config.json";

/// Top-level calque configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CalqueConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Pipeline configuration.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Configuration for the remapping pipeline. Omitted fields keep their
/// defaults.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Virtual file name the generated code is checked under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Language id handed to the analysis engine (e.g. `"ts"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_id: Option<String>,

    /// Reference lines prepended to the rewritten code.
    ///
    /// An empty list disables prepending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<String>>,

    /// Quick-info about this identifier is dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_identifier: Option<String>,

    /// Rewriter output flavour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<RewriteMode>,

    /// Whether the document's script is TypeScript.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ts_file: Option<bool>,

    /// Default compiler options for the analysis engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_options: Option<Value>,
}

impl PipelineConfig {
    /// Pipeline options with this configuration applied over the defaults.
    pub fn to_options(&self) -> PipelineOptions {
        let mut options = PipelineOptions::default();
        if let Some(file_name) = &self.file_name {
            options.file_name = file_name.clone();
        }
        if let Some(language_id) = &self.language_id {
            options.language_id = language_id.clone();
        }
        if let Some(references) = &self.references {
            options.references = references.clone();
        }
        if let Some(helper) = &self.helper_identifier {
            options.helper_identifier = helper.clone();
        }
        if let Some(mode) = self.mode {
            options.rewrite.mode = mode;
        }
        if let Some(is_ts_file) = self.is_ts_file {
            options.rewrite.is_ts_file = is_ts_file;
        }
        if let Some(compiler_options) = &self.compiler_options {
            options.compiler_options = compiler_options.clone();
        }
        options
    }
}

/// Load `calque.config.json` from the given directory (or CWD if None).
pub fn load_config(dir: Option<&Path>) -> CalqueConfig {
    let base = dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    let config_path = base.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        return CalqueConfig::default();
    }

    load_config_file(&config_path)
}

/// Load a config file, falling back to defaults if it cannot be used.
pub fn load_config_file(config_path: &Path) -> CalqueConfig {
    match std::fs::read_to_string(config_path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(config) => {
                tracing::debug!("loaded config from {}", config_path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", config_path.display(), e);
                CalqueConfig::default()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", config_path.display(), e);
            CalqueConfig::default()
        }
    }
}

/// JSON Schema for `calque.config.json`.
pub const CALQUE_CONFIG_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Calque Configuration",
  "description": "Configuration file for calque - remaps type-checker results onto template documents",
  "type": "object",
  "properties": {
    "$schema": {
      "type": "string",
      "description": "JSON Schema reference for editor autocompletion"
    },
    "pipeline": {
      "type": "object",
      "description": "Remapping pipeline configuration",
      "properties": {
        "fileName": {
          "type": "string",
          "description": "Virtual file name the generated code is checked under",
          "default": "index.ts"
        },
        "languageId": {
          "type": "string",
          "description": "Language id handed to the analysis engine",
          "default": "ts"
        },
        "references": {
          "type": "array",
          "description": "Lines prepended to the rewritten code. An empty list disables prepending.",
          "items": { "type": "string" }
        },
        "helperIdentifier": {
          "type": "string",
          "description": "Quick-info about this identifier is dropped",
          "default": "render"
        },
        "mode": {
          "type": "string",
          "enum": ["ts", "dts"],
          "description": "Rewriter output flavour",
          "default": "ts"
        },
        "isTsFile": {
          "type": "boolean",
          "description": "Whether the document's script is TypeScript",
          "default": true
        },
        "compilerOptions": {
          "type": "object",
          "description": "Default compiler options for the analysis engine"
        }
      },
      "additionalProperties": false
    }
  },
  "additionalProperties": false
}"#;
