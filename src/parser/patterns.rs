use anyhow::{bail, Context, Result};
use regex::{Regex, RegexBuilder};

use crate::config::Config;

/// Compiled pattern set driving the segmenter and the explanation
/// structurer. Built once per configuration and passed by reference, so
/// independent configurations can run side by side.
///
/// `stream` must capture `number`, `title`, `body` and `next`, where
/// `next` marks the start of the following problem heading — its
/// presence is what proves the matched block is complete. `final` is
/// the same block shape without that requirement, applied only to the
/// end-of-input remainder.
#[derive(Debug)]
pub struct PatternSet {
    pub stream: Regex,
    pub final_: Regex,
    pub sub_item: Regex,
    pub first_item_delimiter: Regex,
    pub item_split_delimiter: Regex,
    pub strict: bool,
}

impl PatternSet {
    pub fn compile(config: &Config) -> Result<PatternSet> {
        let stream = compile_one("problem_patterns.stream", &config.problem_patterns.stream)?;
        require_groups(
            "problem_patterns.stream",
            &stream,
            &["number", "title", "body", "next"],
        )?;

        let final_ = compile_one("problem_patterns.final", &config.problem_patterns.final_)?;
        require_groups("problem_patterns.final", &final_, &["number", "title", "body"])?;

        let sub_item = compile_one(
            "explanation_patterns.sub_item",
            &config.explanation_patterns.sub_item,
        )?;
        require_groups("explanation_patterns.sub_item", &sub_item, &["label", "text"])?;

        let first_item_delimiter = compile_one(
            "explanation_patterns.first_item_delimiter",
            &config.explanation_patterns.first_item_delimiter,
        )?;
        let item_split_delimiter = compile_one(
            "explanation_patterns.item_split_delimiter",
            &config.explanation_patterns.item_split_delimiter,
        )?;

        Ok(PatternSet {
            stream,
            final_,
            sub_item,
            first_item_delimiter,
            item_split_delimiter,
            strict: config.strict,
        })
    }
}

// Every slot compiles with multi-line and dot-matches-newline enabled,
// so configs describe line-oriented shapes without repeating flags.
fn compile_one(field: &str, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .dot_matches_new_line(true)
        .build()
        .with_context(|| format!("invalid regex in '{}'", field))
}

fn require_groups(field: &str, regex: &Regex, groups: &[&str]) -> Result<()> {
    for group in groups {
        if !regex.capture_names().flatten().any(|name| name == *group) {
            bail!(
                "pattern '{}' is missing required capture group '{}'",
                field,
                group
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_YAML: &str = include_str!("../../config/default.yaml");

    fn default_config() -> Config {
        Config::from_yaml(DEFAULT_YAML).unwrap()
    }

    #[test]
    fn default_config_compiles() {
        let patterns = PatternSet::compile(&default_config()).unwrap();
        assert!(!patterns.strict);
    }

    #[test]
    fn invalid_regex_names_the_field() {
        let mut config = default_config();
        config.problem_patterns.stream = "(".to_string();
        let err = PatternSet::compile(&config).unwrap_err();
        assert!(err.to_string().contains("problem_patterns.stream"));
    }

    #[test]
    fn missing_capture_group_names_the_group() {
        let mut config = default_config();
        // Structurally a fine regex, but without the `next` group the
        // segmenter could never prove a block complete.
        config.problem_patterns.stream =
            r"^(?P<number>\d+) (?P<title>[^\n]+)\n(?P<body>.*)".to_string();
        let err = PatternSet::compile(&config).unwrap_err();
        assert!(err.to_string().contains("next"));
    }

    #[test]
    fn sub_item_groups_are_required() {
        let mut config = default_config();
        config.explanation_patterns.sub_item = r"^(\w)\. (.*)$".to_string();
        let err = PatternSet::compile(&config).unwrap_err();
        assert!(err.to_string().contains("label"));
    }
}
