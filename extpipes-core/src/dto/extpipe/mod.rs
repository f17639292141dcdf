//! Extraction pipeline DTOs

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::extpipe::{Contact, ExtpipeDraft, RawTableRef};
use crate::domain::schedule::Schedule;

/// Request item for creating an extraction pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExtpipe {
    pub external_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub data_set_id: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub raw_tables: Vec<RawTableRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<Contact>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl From<&ExtpipeDraft> for CreateExtpipe {
    fn from(draft: &ExtpipeDraft) -> Self {
        Self {
            external_id: draft.external_id.clone(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            data_set_id: draft.data_set_id,
            raw_tables: draft.raw_tables.clone(),
            schedule: draft.schedule.as_ref().map(|s| s.as_str().to_string()),
            contacts: draft.contacts.clone(),
            metadata: draft.metadata.clone(),
            source: draft.source.clone(),
            documentation: draft.documentation.clone(),
            created_by: draft.created_by.clone(),
        }
    }
}

/// Update operation on a single field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldUpdate<T> {
    Set {
        set: T,
    },
    SetNull {
        #[serde(rename = "setNull")]
        set_null: bool,
    },
}

impl<T> FieldUpdate<T> {
    pub fn set(value: T) -> Self {
        FieldUpdate::Set { set: value }
    }

    pub fn set_null() -> Self {
        FieldUpdate::SetNull { set_null: true }
    }

    /// `set` for a present value, `setNull` for an absent one
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::set(value),
            None => Self::set_null(),
        }
    }
}

/// Full-replace patch of every updatable pipeline attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtpipePatch {
    pub name: FieldUpdate<String>,
    pub description: FieldUpdate<String>,
    pub data_set_id: FieldUpdate<i64>,
    pub raw_tables: FieldUpdate<Vec<RawTableRef>>,
    pub schedule: FieldUpdate<String>,
    pub contacts: FieldUpdate<Vec<Contact>>,
    pub metadata: FieldUpdate<BTreeMap<String, String>>,
    pub source: FieldUpdate<String>,
    pub documentation: FieldUpdate<String>,
}

/// Request item for updating an extraction pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtpipeUpdate {
    pub external_id: String,
    pub update: ExtpipePatch,
}

impl From<&ExtpipeDraft> for ExtpipeUpdate {
    fn from(draft: &ExtpipeDraft) -> Self {
        let update = ExtpipePatch {
            name: FieldUpdate::set(draft.name.clone()),
            description: FieldUpdate::from_option(draft.description.clone()),
            data_set_id: FieldUpdate::set(draft.data_set_id),
            raw_tables: FieldUpdate::set(draft.raw_tables.clone()),
            schedule: FieldUpdate::from_option(
                draft.schedule.as_ref().map(Schedule::as_str).map(str::to_string),
            ),
            contacts: FieldUpdate::set(draft.contacts.clone()),
            metadata: FieldUpdate::set(draft.metadata.clone()),
            source: FieldUpdate::from_option(draft.source.clone()),
            documentation: FieldUpdate::from_option(draft.documentation.clone()),
        };

        Self {
            external_id: draft.external_id.clone(),
            update,
        }
    }
}

/// Request body for pushing a new config revision
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigRevision {
    pub external_id: String,
    pub config: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
