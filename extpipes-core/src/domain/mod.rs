//! Core domain types
//!
//! This module contains the structures shared by the client (which reads and
//! writes them over HTTP) and the CLI (which loads, validates and reconciles them).

pub mod config;
pub mod dataset;
pub mod extpipe;
pub mod naming;
pub mod raw;
pub mod schedule;

use serde::{Deserialize, Deserializer};

/// Deserialize an explicit `null` as the type's default value
///
/// YAML documents frequently contain `contacts:` or `metadata:` with no value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
