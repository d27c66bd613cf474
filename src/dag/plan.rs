//! ExecutionPlan - what to trigger and what will run as a consequence

use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;
use tracing::instrument;

use super::Graph;

/// A step of the plan and the level it runs at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep<T> {
    pub level: u32,
    pub step: T,
}

/// Answer to "the orchestrator wants these steps (re)run"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan<T> {
    /// Minimal entry points to trigger
    pub roots: Vec<T>,
    /// Full downstream closure, ordered by level
    pub steps: Vec<PlannedStep<T>>,
}

impl<T: Clone> ExecutionPlan<T> {
    /// Steps grouped by level, lowest level first
    pub fn stages(&self) -> Vec<(u32, Vec<T>)> {
        let mut stages: Vec<(u32, Vec<T>)> = Vec::new();
        for PlannedStep { level, step } in &self.steps {
            if let Some((current, members)) = stages.last_mut() {
                if current == level {
                    members.push(step.clone());
                    continue;
                }
            }
            stages.push((*level, vec![step.clone()]));
        }
        stages
    }

    /// Closure without levels, in plan order
    pub fn ordered_steps(&self) -> Vec<T> {
        self.steps.iter().map(|planned| planned.step.clone()).collect()
    }
}

impl<T> Graph<T>
where
    T: Clone + Eq + Hash + Debug,
{
    /// Builds the execution plan for `requested`
    ///
    /// # Panics
    ///
    /// If a requested node is not part of this graph.
    #[instrument(level = "debug", skip_all)]
    pub fn plan<'a, I>(&self, requested: I) -> ExecutionPlan<T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let requested: Vec<&T> = requested.into_iter().collect();
        let roots = self.minimal_roots_for(requested.iter().copied());
        let closure = self.all_implied_by(requested.iter().copied());
        let steps = self
            .sort_by_level(&closure)
            .into_iter()
            .map(|step| PlannedStep {
                level: self.level_of(&step),
                step,
            })
            .collect();

        ExecutionPlan { roots, steps }
    }
}
