//! DAG Module - step dependency graphs
//!
//! - `graph`: the graph itself, its levels and traversal queries
//! - `builder`: build-time edge insertion
//! - `plan`: execution plans derived from a set of requested steps
//!
//! A graph is immutable after `GraphBuilder::build()`.

mod builder;
mod graph;
mod plan;

pub use builder::GraphBuilder;
pub use graph::Graph;
pub use plan::{ExecutionPlan, PlannedStep};
