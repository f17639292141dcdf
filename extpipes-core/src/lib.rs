//! Extpipes Core
//!
//! Core types and abstractions for deploying extraction pipelines.
//!
//! This crate contains:
//! - Domain types: the declared configuration model and the observed remote state
//! - DTOs: request payloads sent to the data-platform API
//! - Errors: configuration validation failures

pub mod domain;
pub mod dto;
pub mod error;
