//! Workflow catalog
//!
//! The four fixed pipeline topologies, each built once on first use and
//! read-only afterwards. `select_workflow` picks one from what a dataset
//! contains.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::dag::{Graph, GraphBuilder};
use crate::error::WorkflowError;
use crate::step::StepType;
use crate::step::StepType::*;

static OCCURRENCE: Lazy<Graph<StepType>> = Lazy::new(build_occurrence);
static EVENT_OCCURRENCE: Lazy<Graph<StepType>> = Lazy::new(build_event_occurrence);
static EVENT: Lazy<Graph<StepType>> = Lazy::new(build_event);
static VALIDATOR: Lazy<Graph<StepType>> = Lazy::new(build_validator);
static EMPTY: Lazy<Graph<StepType>> = Lazy::new(Graph::new);

fn build_occurrence() -> Graph<StepType> {
    GraphBuilder::new()
        // 1
        .edge(DwcaToVerbatim, VerbatimToIdentifier)
        .edge(XmlToVerbatim, VerbatimToIdentifier)
        .edge(AbcdToVerbatim, VerbatimToIdentifier)
        // 2
        .edge(VerbatimToIdentifier, VerbatimToInterpreted)
        // 3
        .fan_out(VerbatimToInterpreted, [InterpretedToIndex, HdfsView, Fragmenter])
        // 4
        .edge(HdfsView, DataWarehouse)
        .build()
}

fn build_event_occurrence() -> Graph<StepType> {
    GraphBuilder::new()
        // 1
        .edge(DwcaToVerbatim, VerbatimToIdentifier)
        // 2
        .edge(VerbatimToIdentifier, VerbatimToInterpreted)
        // 3
        .fan_out(
            VerbatimToInterpreted,
            [InterpretedToIndex, HdfsView, Fragmenter, EventsVerbatimToInterpreted],
        )
        // 4
        .fan_out(EventsVerbatimToInterpreted, [EventsInterpretedToIndex, EventsHdfsView])
        // 5
        .edge(EventsHdfsView, DataWarehouse)
        .build()
}

fn build_event() -> Graph<StepType> {
    GraphBuilder::new()
        // 1
        .edge(DwcaToVerbatim, EventsVerbatimToInterpreted)
        // 2
        .fan_out(EventsVerbatimToInterpreted, [EventsInterpretedToIndex, EventsHdfsView])
        // 3
        .edge(EventsHdfsView, DataWarehouse)
        .build()
}

fn build_validator() -> Graph<StepType> {
    GraphBuilder::new()
        // 1
        .edge(ValidatorUploadArchive, ValidatorValidateArchive)
        // 2
        .fan_out(
            ValidatorValidateArchive,
            [
                ValidatorDwcaToVerbatim,
                ValidatorXmlToVerbatim,
                ValidatorAbcdToVerbatim,
                ValidatorTabularToVerbatim,
            ],
        )
        // 3
        .edge(ValidatorDwcaToVerbatim, ValidatorVerbatimToInterpreted)
        .edge(ValidatorXmlToVerbatim, ValidatorVerbatimToInterpreted)
        .edge(ValidatorAbcdToVerbatim, ValidatorVerbatimToInterpreted)
        .edge(ValidatorTabularToVerbatim, ValidatorVerbatimToInterpreted)
        // 4
        .edge(ValidatorVerbatimToInterpreted, ValidatorInterpretedToIndex)
        // 5
        .edge(ValidatorInterpretedToIndex, ValidatorCollectMetrics)
        .build()
}

/// Occurrence-only ingestion
pub fn occurrence_workflow() -> &'static Graph<StepType> {
    &OCCURRENCE
}

/// Ingestion of datasets holding both events and occurrences
pub fn event_occurrence_workflow() -> &'static Graph<StepType> {
    &EVENT_OCCURRENCE
}

/// Event-only ingestion
pub fn event_workflow() -> &'static Graph<StepType> {
    &EVENT
}

/// Data validator pipeline
pub fn validator_workflow() -> &'static Graph<StepType> {
    &VALIDATOR
}

/// Picks the ingestion workflow for a dataset's content
///
/// Neither occurrences nor events yields an empty graph.
pub fn select_workflow(
    contains_occurrences: bool,
    contains_events: bool,
) -> &'static Graph<StepType> {
    match WorkflowKind::for_content(contains_occurrences, contains_events) {
        Some(kind) => kind.graph(),
        None => &EMPTY,
    }
}

/// The pipeline variants in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowKind {
    Occurrence,
    EventOccurrence,
    Event,
    Validator,
}

impl WorkflowKind {
    pub const ALL: [WorkflowKind; 4] = [
        WorkflowKind::Occurrence,
        WorkflowKind::EventOccurrence,
        WorkflowKind::Event,
        WorkflowKind::Validator,
    ];

    /// Ingestion variant for a dataset's content, `None` when it has neither
    pub fn for_content(contains_occurrences: bool, contains_events: bool) -> Option<Self> {
        match (contains_occurrences, contains_events) {
            (true, true) => Some(WorkflowKind::EventOccurrence),
            (true, false) => Some(WorkflowKind::Occurrence),
            (false, true) => Some(WorkflowKind::Event),
            (false, false) => None,
        }
    }

    pub fn graph(self) -> &'static Graph<StepType> {
        match self {
            WorkflowKind::Occurrence => occurrence_workflow(),
            WorkflowKind::EventOccurrence => event_occurrence_workflow(),
            WorkflowKind::Event => event_workflow(),
            WorkflowKind::Validator => validator_workflow(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WorkflowKind::Occurrence => "occurrence",
            WorkflowKind::EventOccurrence => "event-occurrence",
            WorkflowKind::Event => "event",
            WorkflowKind::Validator => "validator",
        }
    }

    /// Rejects steps that are not part of this workflow
    pub fn check_steps(self, steps: &[StepType]) -> Result<(), WorkflowError> {
        let graph = self.graph();
        match steps.iter().find(|step| !graph.contains(step)) {
            Some(step) => Err(WorkflowError::StepNotInWorkflow {
                step: *step,
                workflow: self,
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WorkflowKind {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        WorkflowKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| WorkflowError::UnknownWorkflow {
                value: s.to_string(),
            })
    }
}
