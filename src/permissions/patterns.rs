//! Compiled channel-name patterns

use crate::error::ConfigError;
use regex::Regex;

/// One vocabulary entry: a name matches when any of its regexes does
#[derive(Debug)]
pub struct PatternMatcher {
    regexes: Vec<Regex>,
}

impl PatternMatcher {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let regexes = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { regexes })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regexes.iter().any(|r| r.is_match(name))
    }
}
