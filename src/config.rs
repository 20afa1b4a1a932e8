use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.yaml";

/// Raw pattern configuration as loaded from YAML. Validation is
/// structural only: every pattern slot must be present and non-empty.
/// Compilation (and regex syntax errors) happen in `PatternSet`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub problem_patterns: ProblemPatterns,
    pub explanation_patterns: ExplanationPatterns,
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProblemPatterns {
    pub stream: String,
    #[serde(rename = "final")]
    pub final_: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplanationPatterns {
    pub sub_item: String,
    pub first_item_delimiter: String,
    pub item_split_delimiter: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Config::from_yaml(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Config> {
        if raw.trim().is_empty() {
            bail!("config file is empty");
        }
        let config: Config = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let slots = [
            ("problem_patterns.stream", &self.problem_patterns.stream),
            ("problem_patterns.final", &self.problem_patterns.final_),
            (
                "explanation_patterns.sub_item",
                &self.explanation_patterns.sub_item,
            ),
            (
                "explanation_patterns.first_item_delimiter",
                &self.explanation_patterns.first_item_delimiter,
            ),
            (
                "explanation_patterns.item_split_delimiter",
                &self.explanation_patterns.item_split_delimiter,
            ),
        ];
        for (field, pattern) in slots {
            if pattern.trim().is_empty() {
                bail!("pattern '{}' must not be empty", field);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_YAML: &str = include_str!("../config/default.yaml");

    #[test]
    fn default_config_parses() {
        let config = Config::from_yaml(DEFAULT_YAML).unwrap();
        assert!(config.problem_patterns.stream.contains("number"));
        assert!(config.problem_patterns.final_.contains("number"));
        assert!(!config.strict);
    }

    #[test]
    fn custom_config_parses() {
        let yaml = "
problem_patterns:
  stream: 'custom_stream'
  final: 'custom_final'
explanation_patterns:
  sub_item: 'custom_sub_item'
  first_item_delimiter: 'custom_first'
  item_split_delimiter: 'custom_split'
strict: true
";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.problem_patterns.stream, "custom_stream");
        assert_eq!(config.explanation_patterns.sub_item, "custom_sub_item");
        assert!(config.strict);
    }

    #[test]
    fn missing_section_is_an_error() {
        let yaml = "
explanation_patterns:
  sub_item: 'p'
  first_item_delimiter: 'p'
  item_split_delimiter: 'p'
";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("problem_patterns"));
    }

    #[test]
    fn missing_key_is_an_error() {
        let yaml = "
problem_patterns:
  stream: 'p'
explanation_patterns:
  sub_item: 'p'
  first_item_delimiter: 'p'
  item_split_delimiter: 'p'
";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("final"));
    }

    #[test]
    fn empty_pattern_is_an_error() {
        let yaml = "
problem_patterns:
  stream: ''
  final: 'p'
explanation_patterns:
  sub_item: 'p'
  first_item_delimiter: 'p'
  item_split_delimiter: 'p'
";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("problem_patterns.stream"));
    }

    #[test]
    fn empty_file_is_an_error() {
        let err = Config::from_yaml("   \n").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Config::load(Path::new("no/such/config.yaml")).unwrap_err();
        assert!(err.to_string().contains("no/such/config.yaml"));
    }
}
