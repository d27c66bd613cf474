//! Pipelines workflow - step dependency graphs for data ingestion pipelines
//!
//! An orchestrator holding a set of steps to (re)run asks the catalog for the
//! workflow matching a dataset, then asks that graph what else the steps
//! imply and which of them are worth triggering.
//!
//! ```
//! use pipelines_workflow::{select_workflow, StepType};
//!
//! let wf = select_workflow(true, false);
//! let roots = wf.minimal_roots_for(&[StepType::VerbatimToInterpreted, StepType::HdfsView]);
//! assert_eq!(roots, vec![StepType::VerbatimToInterpreted]);
//! ```

pub mod dag;
pub mod error;
pub mod record;
pub mod step;
pub mod workflow;
pub mod workflow_step;

pub use dag::{ExecutionPlan, Graph, GraphBuilder, PlannedStep};
pub use error::{FixSuggestion, WorkflowError};
pub use record::{
    MetricInfo, PipelineExecution, PipelineProcess, PipelineStep, StepRunner, StepStatus,
};
pub use step::StepType;
pub use workflow::{
    event_occurrence_workflow, event_workflow, occurrence_workflow, select_workflow,
    validator_workflow, WorkflowKind,
};
pub use workflow_step::WorkflowStep;
