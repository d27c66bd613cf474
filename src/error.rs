//! Error types with fix suggestions
//!
//! Only fallible surfaces live here: parsing step and workflow names,
//! serializing output, reading step records. Querying a graph about a step
//! it does not contain is a caller bug and panics instead.

use thiserror::Error;

use crate::step::StepType;
use crate::workflow::WorkflowKind;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    // ─────────────────────────────────────────────────────────────
    // Vocabulary errors (WF-010 to WF-012)
    // ─────────────────────────────────────────────────────────────

    #[error("WF-010: Unknown step '{value}'")]
    UnknownStep { value: String },

    #[error("WF-011: Unknown workflow '{value}'")]
    UnknownWorkflow { value: String },

    #[error("WF-012: Step '{step}' is not part of the {workflow} workflow")]
    StepNotInWorkflow {
        step: StepType,
        workflow: WorkflowKind,
    },

    // ─────────────────────────────────────────────────────────────
    // Output / input errors (WF-020 to WF-022)
    // ─────────────────────────────────────────────────────────────

    #[error("WF-020: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WF-021: YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("WF-022: IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FixSuggestion for WorkflowError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            WorkflowError::UnknownStep { .. } => {
                Some("Use a step name like DWCA_TO_VERBATIM or its label like dwcaToVerbatim")
            }
            WorkflowError::UnknownWorkflow { .. } => {
                Some("Use one of: occurrence, event-occurrence, event, validator")
            }
            WorkflowError::StepNotInWorkflow { .. } => {
                Some("Run `show <workflow>` to list the steps of that workflow")
            }
            WorkflowError::Json(_) => Some("Step records must be a JSON array of pipeline steps"),
            WorkflowError::Yaml(_) => None,
            WorkflowError::Io(_) => Some("Check file path and permissions"),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
