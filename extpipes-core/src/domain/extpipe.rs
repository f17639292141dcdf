//! Extraction pipeline domain types

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::null_as_default;
use super::schedule::Schedule;

/// Person notified about pipeline failures
///
/// Serialized in the API's camelCase form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, rename = "sendNotification")]
    pub send_notification: bool,
}

/// Reference to a RAW table a pipeline writes to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RawTableRef {
    #[serde(rename = "dbName", alias = "db-name", alias = "db_name")]
    pub db_name: String,
    #[serde(rename = "tableName", alias = "table-name", alias = "table_name")]
    pub table_name: String,
}

impl RawTableRef {
    pub fn new(db_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            db_name: db_name.into(),
            table_name: table_name.into(),
        }
    }
}

/// Extraction pipeline as observed in the remote project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteExtpipe {
    #[serde(default)]
    pub id: Option<i64>,
    pub external_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub data_set_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_tables: Vec<RawTableRef>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contacts: Vec<Contact>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Fully materialized desired state of one pipeline
///
/// Built from a declared pipeline once its identifier is rendered and its
/// dataset reference is resolved to a numeric handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtpipeDraft {
    pub external_id: String,
    pub name: String,
    pub description: Option<String>,
    pub data_set_id: i64,
    pub raw_tables: Vec<RawTableRef>,
    pub schedule: Option<Schedule>,
    pub contacts: Vec<Contact>,
    pub metadata: BTreeMap<String, String>,
    pub source: Option<String>,
    pub documentation: Option<String>,
    pub created_by: Option<String>,
    /// Run-time configuration pushed as a config revision
    pub configuration: Option<String>,
}

impl ExtpipeDraft {
    /// Names of the updatable fields whose value differs from `remote`
    ///
    /// Used for reporting only; updates always resend every field.
    pub fn changed_fields(&self, remote: &RemoteExtpipe) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if self.name != remote.name {
            changed.push("name");
        }
        if self.description != remote.description {
            changed.push("description");
        }
        if self.data_set_id != remote.data_set_id {
            changed.push("dataSetId");
        }
        let wanted: BTreeSet<_> = self.raw_tables.iter().collect();
        let current: BTreeSet<_> = remote.raw_tables.iter().collect();
        if wanted != current {
            changed.push("rawTables");
        }
        if self.schedule.as_ref().map(Schedule::as_str) != remote.schedule.as_deref() {
            changed.push("schedule");
        }
        if self.contacts != remote.contacts {
            changed.push("contacts");
        }
        if self.metadata != remote.metadata {
            changed.push("metadata");
        }
        if self.source != remote.source {
            changed.push("source");
        }
        if self.documentation != remote.documentation {
            changed.push("documentation");
        }

        changed
    }
}
