//! Naming pattern templates
//!
//! A naming pattern derives a pipeline's external id (and name) from its
//! metadata, e.g. `{{ source }}:{{ dataset }}:{{ table }}`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::PatternError;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("valid placeholder regex")
});

/// Parsed naming pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingPattern {
    template: String,
    keys: Vec<String>,
}

impl NamingPattern {
    /// Parse a template, collecting its placeholder keys
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        let leftover = PLACEHOLDER_RE.replace_all(template, "");
        if leftover.contains("{{") || leftover.contains("}}") {
            return Err(PatternError::Malformed {
                pattern: template.to_string(),
                reason: "unbalanced or empty '{{ }}' placeholder".to_string(),
            });
        }

        let mut keys: Vec<String> = Vec::new();
        for caps in PLACEHOLDER_RE.captures_iter(template) {
            let key = caps[1].to_string();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        if keys.is_empty() {
            return Err(PatternError::Malformed {
                pattern: template.to_string(),
                reason: "no '{{ key }}' placeholder, every pipeline would get the same identifier"
                    .to_string(),
            });
        }

        Ok(Self {
            template: template.to_string(),
            keys,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Placeholder keys in order of first appearance
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Placeholder keys absent from `metadata`
    pub fn missing_keys(&self, metadata: &BTreeMap<String, String>) -> Vec<String> {
        self.keys
            .iter()
            .filter(|key| !metadata.contains_key(*key))
            .cloned()
            .collect()
    }

    /// Substitute every placeholder with its metadata value
    pub fn render(&self, metadata: &BTreeMap<String, String>) -> Result<String, PatternError> {
        let missing = self.missing_keys(metadata);
        if !missing.is_empty() {
            return Err(PatternError::MissingKeys { keys: missing });
        }

        let rendered = PLACEHOLDER_RE.replace_all(&self.template, |caps: &Captures| {
            metadata.get(&caps[1]).cloned().unwrap_or_default()
        });

        Ok(rendered.into_owned())
    }
}
