//! Service layer
//!
//! The reconciliation engine. Services hold the deployment logic and reach the
//! remote project only through a [`CdfRepository`](crate::repository::CdfRepository):
//!
//! - `renderer`: external ids and names for every declared pipeline
//! - `resolver`: dataset external ids to numeric handles
//! - `raw_tables`: RAW tables that must exist before pipelines reference them
//! - `planner`: the create / update / delete diff
//! - `executor`: applies a plan, or only reports it in dry-run mode
//! - `reconcile`: runs the steps above in order

pub mod executor;
pub mod planner;
pub mod raw_tables;
pub mod reconcile;
pub mod renderer;
pub mod resolver;

pub use executor::ExecutionSummary;
pub use reconcile::{DeployOutcome, Deployment};
