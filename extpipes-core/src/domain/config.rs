//! Declared configuration model
//!
//! The `extpipes` section of a deployment document: global features plus the
//! list of pipelines that should exist in the project.

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::Deserialize;

use super::extpipe::{Contact, RawTableRef};
use super::naming::NamingPattern;
use super::null_as_default;
use super::schedule::Schedule;
use crate::error::ConfigError;

/// Root of the declared desired state
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtpipesConfig {
    #[serde(default)]
    pub features: Features,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pipelines: Vec<PipelineSpec>,
}

/// Process-wide deployment policy
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Features {
    #[serde(
        default,
        rename = "extpipe-pattern",
        alias = "extpipe_pattern",
        alias = "naming-pattern",
        alias = "naming_pattern"
    )]
    pub naming_pattern: Option<String>,

    #[serde(default, alias = "automatic_delete", deserialize_with = "flexible_bool")]
    pub automatic_delete: bool,

    #[serde(default, alias = "default_contacts", deserialize_with = "null_as_default")]
    pub default_contacts: Vec<ContactConfig>,
}

impl Features {
    /// The configured naming pattern, ignoring blank values
    pub fn naming_pattern(&self) -> Option<&str> {
        self.naming_pattern
            .as_deref()
            .filter(|pattern| !pattern.trim().is_empty())
    }
}

/// One declared extraction pipeline
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PipelineSpec {
    #[serde(default, alias = "external_id")]
    pub external_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(alias = "data_set_external_id")]
    pub data_set_external_id: String,
    #[serde(default)]
    pub schedule: Option<Schedule>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contacts: Vec<ContactConfig>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default, alias = "created_by")]
    pub created_by: Option<String>,
    #[serde(default, alias = "raw_tables", deserialize_with = "null_as_default")]
    pub raw_tables: Vec<RawTableRef>,
    #[serde(
        default,
        rename = "extpipe-config",
        alias = "extpipe_config",
        alias = "configuration"
    )]
    pub configuration: Option<ConfigPayload>,
}

impl PipelineSpec {
    /// Explicit external id, treating an empty string as absent
    pub fn explicit_external_id(&self) -> Option<&str> {
        non_empty(&self.external_id)
    }

    /// Explicit name, treating an empty string as absent
    pub fn explicit_name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    /// Contacts to notify for this pipeline
    ///
    /// Pipeline contacts replace the defaults; the defaults only apply to
    /// pipelines that list no contacts of their own.
    pub fn effective_contacts(&self, defaults: &[ContactConfig]) -> Vec<Contact> {
        let contacts = if self.contacts.is_empty() {
            defaults
        } else {
            &self.contacts
        };
        contacts.iter().cloned().map(Contact::from).collect()
    }
}

/// Contact entry as written in the configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ContactConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "send_notification", deserialize_with = "flexible_bool")]
    pub send_notification: bool,
}

impl From<ContactConfig> for Contact {
    fn from(contact: ContactConfig) -> Self {
        Self {
            name: contact.name,
            email: contact.email,
            role: contact.role,
            send_notification: contact.send_notification,
        }
    }
}

/// Run-time configuration attached to a pipeline
///
/// Either a literal string or an inline YAML document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConfigPayload {
    Text(String),
    Document(serde_yaml::Value),
}

impl ConfigPayload {
    /// Text pushed as the config revision body
    pub fn to_text(&self) -> Result<String, serde_yaml::Error> {
        match self {
            ConfigPayload::Text(text) => Ok(text.clone()),
            ConfigPayload::Document(value) => serde_yaml::to_string(value),
        }
    }
}

impl ExtpipesConfig {
    /// Check the batch-level invariants of the configuration
    ///
    /// Every problem is collected before returning so the whole document can be
    /// fixed in one pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut issues = Vec::new();

        let pattern = match self.features.naming_pattern() {
            Some(template) => match NamingPattern::parse(template) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    issues.push(e.to_string());
                    None
                }
            },
            None => None,
        };
        let pattern_configured = self.features.naming_pattern().is_some();

        for (index, pipeline) in self.pipelines.iter().enumerate() {
            let label = pipeline_label(index, pipeline);

            if pattern_configured {
                if pipeline.explicit_external_id().is_some() {
                    issues.push(format!(
                        "{}: 'external-id' must not be set when 'extpipe-pattern' is configured",
                        label
                    ));
                }
                if pipeline.explicit_name().is_some() {
                    issues.push(format!(
                        "{}: 'name' must not be set when 'extpipe-pattern' is configured",
                        label
                    ));
                }
                if let Some(pattern) = &pattern {
                    let missing = pattern.missing_keys(&pipeline.metadata);
                    if !missing.is_empty() {
                        issues.push(format!(
                            "{}: metadata is missing key(s) used by 'extpipe-pattern': {}",
                            label,
                            missing.join(", ")
                        ));
                    }
                }
            } else if pipeline.explicit_external_id().is_none() {
                issues.push(format!(
                    "{}: 'external-id' is required when no 'extpipe-pattern' is configured",
                    label
                ));
            }

            if pipeline.data_set_external_id.trim().is_empty() {
                issues.push(format!("{}: 'data-set-external-id' must not be empty", label));
            }

            for (table_index, table) in pipeline.raw_tables.iter().enumerate() {
                if table.db_name.trim().is_empty() || table.table_name.trim().is_empty() {
                    issues.push(format!(
                        "{}: raw table #{} needs both 'db-name' and 'table-name'",
                        label,
                        table_index + 1
                    ));
                }
            }
        }

        ConfigError::check(issues)
    }
}

/// Human readable reference to a pipeline in messages
pub fn pipeline_label(index: usize, pipeline: &PipelineSpec) -> String {
    match pipeline.explicit_external_id() {
        Some(external_id) => format!("pipeline #{} ('{}')", index + 1, external_id),
        None => format!("pipeline #{}", index + 1),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolLike {
    Bool(bool),
    Text(String),
}

/// Accept booleans written as `true/false` or `yes/no`
fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<BoolLike>::deserialize(deserializer)? {
        None => Ok(false),
        Some(BoolLike::Bool(value)) => Ok(value),
        Some(BoolLike::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "on" => Ok(true),
            "no" | "n" | "false" | "off" => Ok(false),
            other => Err(de::Error::custom(format!(
                "expected yes/no or true/false, found '{}'",
                other
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> ExtpipesConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_parse_full_document() {
        let config = parse(
            r#"
features:
  extpipe-pattern: "{{ source }}:{{ group }}:{{ table }}"
  automatic-delete: "yes"
  default-contacts:
    - name: Data Ops
      email: dataops@example.com
      role: maintainer
      send-notification: true
pipelines:
  - description: Events from ADF
    data-set-external-id: src:001:internal
    schedule: Continuous
    source: adf
    metadata:
      source: adf
      group: src:001
      table: int_events
    raw-tables:
      - db-name: src:001:internal:rawdb
        table-name: int_events
    extpipe-config:
      logger:
        level: INFO
"#,
        );

        assert_eq!(
            config.features.naming_pattern(),
            Some("{{ source }}:{{ group }}:{{ table }}")
        );
        assert!(config.features.automatic_delete);
        assert_eq!(config.features.default_contacts.len(), 1);
        assert!(config.features.default_contacts[0].send_notification);

        let pipeline = &config.pipelines[0];
        assert_eq!(pipeline.schedule, Some(Schedule::Continuous));
        assert_eq!(pipeline.raw_tables[0].table_name, "int_events");
        assert!(pipeline.contacts.is_empty());

        let payload = pipeline.configuration.as_ref().unwrap().to_text().unwrap();
        assert!(payload.contains("level: INFO"));

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_when_features_missing() {
        let config = parse(
            r#"
pipelines:
  - external-id: explicit
    data-set-external-id: ds
    contacts:
"#,
        );
        assert_eq!(config.features, Features::default());
        assert!(!config.features.automatic_delete);
        assert!(config.pipelines[0].contacts.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_schedule_rejected_at_parse() {
        let result: Result<ExtpipesConfig, _> = serde_yaml::from_str(
            r#"
pipelines:
  - external-id: a
    data-set-external-id: ds
    schedule: hourly
"#,
        );
        assert!(result.unwrap_err().to_string().contains("invalid schedule"));
    }

    #[test]
    fn test_unknown_pipeline_field_rejected() {
        let result: Result<ExtpipesConfig, _> = serde_yaml::from_str(
            r#"
pipelines:
  - external-id: a
    data-set-external-id: ds
    shedule: Continuous
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_flexible_bool_rejects_garbage() {
        let result: Result<Features, _> = serde_yaml::from_str("automatic-delete: maybe");
        assert!(result.is_err());
    }

    #[test]
    fn test_pattern_excludes_explicit_identifiers() {
        let config = parse(
            r#"
features:
  extpipe-pattern: "{{ source }}"
pipelines:
  - external-id: explicit
    name: Explicit
    data-set-external-id: ds
    metadata:
      source: adf
"#,
        );
        let err = config.validate().unwrap_err();
        assert_eq!(err.issues.len(), 2);
        assert!(err.issues[0].contains("'external-id' must not be set"));
        assert!(err.issues[1].contains("'name' must not be set"));
    }

    #[test]
    fn test_validation_collects_all_issues() {
        let config = parse(
            r#"
features:
  extpipe-pattern: "{{ source }}:{{ table }}"
pipelines:
  - data-set-external-id: ds
    metadata:
      source: adf
  - data-set-external-id: ""
    metadata:
      table: t
      source: pi
    raw-tables:
      - db-name: db
        table-name: ""
"#,
        );
        let err = config.validate().unwrap_err();
        assert_eq!(err.issues.len(), 3);
        assert!(err.issues[0].starts_with("pipeline #1"));
        assert!(err.issues[0].contains("table"));
        assert!(err.issues[1].contains("'data-set-external-id' must not be empty"));
        assert!(err.issues[2].contains("raw table #1"));
    }

    #[test]
    fn test_external_id_required_without_pattern() {
        let config = parse(
            r#"
features:
  extpipe-pattern: "   "
pipelines:
  - data-set-external-id: ds
"#,
        );
        let err = config.validate().unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert!(err.issues[0].contains("'external-id' is required"));
    }

    #[test]
    fn test_malformed_pattern_is_reported() {
        let config = parse(
            r#"
features:
  extpipe-pattern: "{{ source"
pipelines: []
"#,
        );
        let err = config.validate().unwrap_err();
        assert!(err.issues[0].contains("malformed naming pattern"));
    }

    #[test]
    fn test_effective_contacts_policy() {
        let defaults = vec![ContactConfig {
            name: Some("Default".to_string()),
            ..Default::default()
        }];
        let mut pipeline: PipelineSpec = serde_yaml::from_str(
            r#"
external-id: a
data-set-external-id: ds
"#,
        )
        .unwrap();
        let contacts = pipeline.effective_contacts(&defaults);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name.as_deref(), Some("Default"));

        pipeline.contacts.push(ContactConfig {
            name: Some("Owner".to_string()),
            send_notification: true,
            ..Default::default()
        });
        let contacts = pipeline.effective_contacts(&defaults);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].name.as_deref(), Some("Owner"));
        assert!(contacts[0].send_notification);
    }

    #[test]
    fn test_contact_keys() {
        let pipeline: PipelineSpec = serde_yaml::from_str(
            r#"
external-id: a
data-set-external-id: ds
contacts:
  - name: Owner
    email: owner@example.com
    send_notification: true
"#,
        )
        .unwrap();
        let contacts = pipeline.effective_contacts(&[]);
        assert_eq!(contacts[0].email.as_deref(), Some("owner@example.com"));
        assert!(contacts[0].send_notification);
    }

    #[test]
    fn test_unknown_contact_key_rejected() {
        let misspelled: Result<PipelineSpec, _> = serde_yaml::from_str(
            r#"
external-id: a
data-set-external-id: ds
contacts:
  - name: Owner
    emial: owner@example.com
    send-notification: true
"#,
        );
        let err = misspelled.unwrap_err().to_string();
        assert!(err.contains("emial"), "{}", err);

        let misspelled_default: Result<ExtpipesConfig, _> = serde_yaml::from_str(
            r#"
features:
  default-contacts:
    - name: Data Ops
      send-notifications: true
"#,
        );
        assert!(misspelled_default.is_err());
    }
}
