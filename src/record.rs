//! Runtime records attached to pipeline steps
//!
//! The graph layer only sees `StepType`; these are what an orchestrator
//! stores for each step it runs.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dag::Graph;
use crate::step::StepType;

/// Status of a step run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    Running,
    Failed,
    Completed,
}

/// Where a step ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepRunner {
    Standalone,
    Distributed,
}

/// Named metric reported by a step
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricInfo {
    pub name: String,
    pub value: String,
}

impl MetricInfo {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One run of one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStep {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub key: i64,
    #[serde(rename = "type")]
    pub step_type: StepType,
    #[serde(default)]
    pub runner: Option<StepRunner>,
    #[serde(default, with = "timestamp")]
    pub started: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp")]
    pub finished: Option<NaiveDateTime>,
    #[serde(default)]
    pub state: Option<StepStatus>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub number_records: Option<i64>,
    #[serde(default)]
    pub pipelines_version: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default, with = "timestamp")]
    pub modified: Option<NaiveDateTime>,
    #[serde(default)]
    pub modified_by: Option<String>,
    #[serde(default)]
    pub metrics: Vec<MetricInfo>,
}

fn is_zero(key: &i64) -> bool {
    *key == 0
}

/// Local date-times as the pipelines API writes them: `2024-05-01T08:00`
/// when seconds and nanos are zero, `2024-05-01T08:00:30.500` otherwise.
mod timestamp {
    use chrono::{NaiveDateTime, Timelike};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S%.f";
    const MINUTES_ONLY: &str = "%Y-%m-%dT%H:%M";

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) if dt.second() == 0 && dt.nanosecond() == 0 => {
                serializer.collect_str(&dt.format(MINUTES_ONLY))
            }
            Some(dt) => serializer.collect_str(&dt.format(WITH_SECONDS)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => parse(&text).map(Some).map_err(de::Error::custom),
            None => Ok(None),
        }
    }

    pub(super) fn parse(text: &str) -> Result<NaiveDateTime, String> {
        NaiveDateTime::parse_from_str(text, WITH_SECONDS)
            .or_else(|_| NaiveDateTime::parse_from_str(text, MINUTES_ONLY))
            .map_err(|e| format!("invalid local date-time '{text}': {e}"))
    }
}

impl PipelineStep {
    pub fn new(step_type: StepType) -> Self {
        Self {
            key: 0,
            step_type,
            runner: None,
            started: None,
            finished: None,
            state: None,
            message: None,
            number_records: None,
            pipelines_version: None,
            created_by: None,
            modified: None,
            modified_by: None,
            metrics: Vec::new(),
        }
    }

    pub fn started_at(mut self, started: NaiveDateTime) -> Self {
        self.started = Some(started);
        self
    }

    pub fn finished_at(mut self, finished: NaiveDateTime) -> Self {
        self.finished = Some(finished);
        self
    }

    pub fn with_state(mut self, state: StepStatus) -> Self {
        self.state = Some(state);
        self
    }

    pub fn is_running(&self) -> bool {
        self.state == Some(StepStatus::Running)
    }

    /// Adds a metric; a metric with the same name and value is kept once
    pub fn add_metric(&mut self, metric: MetricInfo) {
        if !self.metrics.contains(&metric) {
            self.metrics.push(metric);
        }
    }

    /// Ascending by start, then by finish; a missing timestamp sorts last
    pub fn cmp_by_start_and_finish(&self, other: &Self) -> Ordering {
        cmp_missing_last(self.started, other.started)
            .then_with(|| cmp_missing_last(self.finished, other.finished))
    }
}

fn cmp_missing_last(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One (re)run request of a pipeline for a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineExecution {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub key: i64,
    #[serde(default)]
    pub steps_to_run: Vec<StepType>,
    #[serde(default)]
    pub rerun_reason: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default, with = "timestamp")]
    pub created: Option<NaiveDateTime>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub steps: Vec<PipelineStep>,
}

impl PipelineExecution {
    /// Execution whose `steps_to_run` is everything `requested` implies, by level
    ///
    /// # Panics
    ///
    /// If a requested step is not part of `graph`.
    pub fn for_request(graph: &Graph<StepType>, requested: &[StepType]) -> Self {
        Self {
            key: 0,
            steps_to_run: graph.plan(requested).ordered_steps(),
            rerun_reason: None,
            remarks: None,
            created: None,
            created_by: None,
            steps: Vec::new(),
        }
    }

    /// Records a step run, keeping `steps` ordered by start and finish
    pub fn add_step(&mut self, step: PipelineStep) {
        let at = self
            .steps
            .partition_point(|s| s.cmp_by_start_and_finish(&step) != Ordering::Greater);
        self.steps.insert(at, step);
    }

    /// Ascending by creation; an execution without `created` sorts last
    pub fn cmp_by_created(&self, other: &Self) -> Ordering {
        cmp_missing_last(self.created, other.created)
    }

    /// Most recently started step that has a state
    fn last_step(&self) -> Option<&PipelineStep> {
        self.steps
            .iter()
            .filter(|s| s.state.is_some())
            .max_by_key(|s| s.started)
    }
}

/// Every execution of a pipeline for one dataset attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineProcess {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub key: i64,
    pub dataset_key: Uuid,
    #[serde(default)]
    pub dataset_title: Option<String>,
    #[serde(default)]
    pub attempt: i32,
    #[serde(default, with = "timestamp")]
    pub created: Option<NaiveDateTime>,
    #[serde(default)]
    pub created_by: Option<String>,
    /// Latest created first; executions not created yet lead
    #[serde(default)]
    pub executions: Vec<PipelineExecution>,
}

impl PipelineProcess {
    pub fn new(dataset_key: Uuid, attempt: i32) -> Self {
        Self {
            key: 0,
            dataset_key,
            dataset_title: None,
            attempt,
            created: None,
            created_by: None,
            executions: Vec::new(),
        }
    }

    /// Records an execution, keeping `executions` newest first
    pub fn add_execution(&mut self, execution: PipelineExecution) {
        let at = self
            .executions
            .partition_point(|e| e.cmp_by_created(&execution) != Ordering::Less);
        self.executions.insert(at, execution);
    }

    /// The execution that leads `executions` once ordered newest first
    pub fn latest_execution(&self) -> Option<&PipelineExecution> {
        self.executions.iter().max_by(|a, b| a.cmp_by_created(b))
    }

    /// Ascending by the creation of the latest execution; a process without
    /// a dated latest execution sorts last
    pub fn cmp_by_latest_execution(&self, other: &Self) -> Ordering {
        cmp_missing_last(
            self.latest_execution().and_then(|e| e.created),
            other.latest_execution().and_then(|e| e.created),
        )
    }

    /// Ascending by the start of the last step of the latest execution
    ///
    /// Only steps with a state count. Processes without such a step, or whose
    /// step never started, sort last. A running step sorts after any step that
    /// is not running.
    pub fn cmp_by_latest_step_running(&self, other: &Self) -> Ordering {
        let mine = self.latest_execution().and_then(PipelineExecution::last_step);
        let theirs = other.latest_execution().and_then(PipelineExecution::last_step);

        match (mine, theirs) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => match (a.started, b.started) {
                (Some(started_a), Some(started_b)) => a
                    .is_running()
                    .cmp(&b.is_running())
                    .then(started_a.cmp(&started_b)),
                (a_started, b_started) => cmp_missing_last(a_started, b_started),
            },
        }
    }
}
