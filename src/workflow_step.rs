//! WorkflowStep - a workflow graph joined with its recorded runs
//!
//! The graph is unfolded into a tree from its roots. A node with several
//! parents (the validator's interpretation step) appears under each of them.

use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::dag::Graph;
use crate::record::PipelineStep;
use crate::step::StepType;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub step_type: StepType,
    /// Most recently started run, if any
    pub last_step: Option<PipelineStep>,
    /// Runs of this step, most recently started first
    pub all_steps: Vec<PipelineStep>,
    pub next_steps: Vec<WorkflowStep>,
}

impl WorkflowStep {
    /// Builds one tree per root of `graph`, attaching the runs in `records`
    ///
    /// Records whose step is not part of `graph` are ignored. `graph` must be
    /// acyclic, as every catalog workflow is.
    pub fn tree(graph: &Graph<StepType>, records: &[PipelineStep]) -> Vec<WorkflowStep> {
        graph
            .roots()
            .into_iter()
            .map(|root| Self::unfold(graph, root, records))
            .collect()
    }

    fn unfold(graph: &Graph<StepType>, step_type: StepType, records: &[PipelineStep]) -> Self {
        let mut all_steps: Vec<PipelineStep> = records
            .iter()
            .filter(|r| r.step_type == step_type)
            .cloned()
            .collect();
        // Latest start first; runs that never started go last
        all_steps.sort_by(|a, b| b.started.cmp(&a.started));

        let next_steps = graph
            .edges_from(&step_type)
            .iter()
            .map(|next| Self::unfold(graph, *next, records))
            .collect();

        Self {
            step_type,
            last_step: all_steps.first().cloned(),
            all_steps,
            next_steps,
        }
    }

    /// Number of nodes in this subtree, itself included
    pub fn size(&self) -> usize {
        1 + self.next_steps.iter().map(WorkflowStep::size).sum::<usize>()
    }
}

impl PartialEq for WorkflowStep {
    fn eq(&self, other: &Self) -> bool {
        self.step_type == other.step_type
    }
}

impl Eq for WorkflowStep {}

impl Hash for WorkflowStep {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.step_type.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StepStatus;
    use crate::workflow::{event_workflow, validator_workflow};
    use chrono::NaiveDate;

    fn run(step_type: StepType, hour: Option<u32>, state: StepStatus) -> PipelineStep {
        let mut step = PipelineStep::new(step_type).with_state(state);
        step.started = hour.map(|h| {
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        });
        step
    }

    #[test]
    fn test_tree_without_records() {
        let trees = WorkflowStep::tree(event_workflow(), &[]);
        assert_eq!(trees.len(), 1);

        let root = &trees[0];
        assert_eq!(root.step_type, StepType::DwcaToVerbatim);
        assert!(root.last_step.is_none());
        assert_eq!(root.size(), 5);
        assert_eq!(root.next_steps[0].step_type, StepType::EventsVerbatimToInterpreted);
    }

    #[test]
    fn test_last_step_is_latest_started() {
        let records = vec![
            run(StepType::DwcaToVerbatim, Some(1), StepStatus::Failed),
            run(StepType::DwcaToVerbatim, None, StepStatus::Running),
            run(StepType::DwcaToVerbatim, Some(3), StepStatus::Completed),
            run(StepType::HdfsView, Some(9), StepStatus::Completed),
        ];
        let trees = WorkflowStep::tree(event_workflow(), &records);
        let root = &trees[0];

        assert_eq!(root.all_steps.len(), 3);
        assert_eq!(
            root.last_step.as_ref().and_then(|s| s.state),
            Some(StepStatus::Completed)
        );
        assert!(root.all_steps[2].started.is_none());
    }

    #[test]
    fn test_shared_child_unfolds_under_each_parent() {
        let trees = WorkflowStep::tree(validator_workflow(), &[]);
        assert_eq!(trees.len(), 1);
        // upload, validate, 4 converters, each with interpret -> index -> metrics
        assert_eq!(trees[0].size(), 2 + 4 * 4);
    }

    #[test]
    fn test_equality_by_step_type() {
        let a = WorkflowStep::tree(event_workflow(), &[]).remove(0);
        let records = [run(StepType::DwcaToVerbatim, Some(1), StepStatus::Completed)];
        let b = WorkflowStep::tree(event_workflow(), &records).remove(0);
        assert_eq!(a, b);
    }
}
