//! Pipeline orchestration: load once, then apply actions until none applies.

use std::fmt;
use std::time::Instant;

use crate::action::Action;
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::item::Item;
use crate::loader::{Loader, SchemeLoader};
use crate::location::Location;

use super::report::{RunReport, StepRecord};

/// Lifecycle of a pipeline. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Accepting actions; not yet executed
    Created,
    /// The initial item has been loaded. Transient: `run` moves on to
    /// `Running` before returning, so callers only see it in trace output.
    Loaded,
    /// Applying actions
    Running,
    /// Reached a fixpoint
    Done,
    /// Load or an action failed, or the step limit was hit
    Failed,
}

/// A location, a load step, and an ordered list of actions.
///
/// Each round tests the actions in insertion order and applies the first one
/// that claims the current item, then starts over from the first action.
/// Execution stops when no action claims the item.
pub struct Pipeline {
    location: Location,
    loader: Box<dyn Loader>,
    actions: Vec<Action>,
    max_steps: Option<usize>,
    state: PipelineState,
}

impl Pipeline {
    /// Create a pipeline with an explicit loader and no step limit.
    pub fn new(location: Location, loader: impl Loader + 'static) -> Self {
        Self {
            location,
            loader: Box::new(loader),
            actions: Vec::new(),
            max_steps: None,
            state: PipelineState::Created,
        }
    }

    /// Create a pipeline that loads from disk with the configured limits.
    pub fn from_config(location: Location, config: &Config) -> Self {
        Self::new(location, SchemeLoader::from_config(config))
            .with_max_steps(config.pipeline.max_steps)
    }

    /// Cap the number of applied actions; `None` runs until a fixpoint.
    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Builder form of [`Pipeline::add_action`].
    pub fn with_action(mut self, action: impl Into<Action>) -> Self {
        self.add_action(action);
        self
    }

    /// Append an action. Earlier actions take precedence.
    pub fn add_action(&mut self, action: impl Into<Action>) {
        self.actions.push(action.into());
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn max_steps(&self) -> Option<usize> {
        self.max_steps
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Resolve the location into the initial item.
    pub fn load(&self) -> PipelineResult<Item> {
        self.loader
            .load(&self.location)
            .map_err(|source| PipelineError::Load {
                location: self.location.raw().to_string(),
                source,
            })
    }

    /// Run to a fixpoint and return the final item.
    pub fn execute(&mut self) -> PipelineResult<Item> {
        self.run().map(|report| report.item)
    }

    /// Run to a fixpoint and return the final item with the applied steps.
    ///
    /// A pipeline runs once; later calls fail with
    /// [`PipelineError::AlreadyExecuted`].
    pub fn run(&mut self) -> PipelineResult<RunReport> {
        if self.state != PipelineState::Created {
            return Err(PipelineError::AlreadyExecuted { state: self.state });
        }

        let start = Instant::now();
        tracing::debug!(
            "Executing {} with {} actions",
            self.location,
            self.actions.len()
        );

        match self.run_to_fixpoint() {
            Ok((item, steps)) => {
                self.state = PipelineState::Done;
                let elapsed = start.elapsed();
                tracing::debug!(
                    "Fixpoint for {} at '{}' after {} steps in {:?}",
                    self.location,
                    item.classifier(),
                    steps.len(),
                    elapsed
                );
                Ok(RunReport {
                    location: self.location.raw().to_string(),
                    item,
                    steps,
                    elapsed,
                })
            }
            Err(e) => {
                self.state = PipelineState::Failed;
                tracing::debug!("Execution of {} failed: {}", self.location, e);
                Err(e)
            }
        }
    }

    fn run_to_fixpoint(&mut self) -> PipelineResult<(Item, Vec<StepRecord>)> {
        let mut current = self.load()?;
        self.state = PipelineState::Loaded;
        tracing::debug!("Loaded {} as '{}'", self.location, current.classifier());
        tracing::trace!("{} is {:?}", self.location, self.state);

        self.state = PipelineState::Running;
        let mut steps: Vec<StepRecord> = Vec::new();

        while let Some(action) = self.first_applicable(&current) {
            if let Some(limit) = self.max_steps {
                if steps.len() >= limit {
                    return Err(PipelineError::StepLimitExceeded {
                        limit,
                        action: action.name().to_string(),
                        classifier: current.classifier().to_string(),
                    });
                }
            }

            let step = steps.len() + 1;
            let next = match action.process(&current) {
                Ok(next) => next,
                Err(source) => {
                    return Err(PipelineError::Action {
                        action: action.name().to_string(),
                        step,
                        item: Box::new(current),
                        source,
                    });
                }
            };

            tracing::debug!(
                "Step {}: {} turned '{}' into '{}'",
                step,
                action.name(),
                current.classifier(),
                next.classifier()
            );
            steps.push(StepRecord {
                action: action.name().to_string(),
                from: current.classifier().to_string(),
                to: next.classifier().to_string(),
            });
            current = next;
        }

        Ok((current, steps))
    }

    /// First action, in insertion order, that claims the item.
    fn first_applicable(&self, item: &Item) -> Option<&Action> {
        self.actions.iter().find(|action| {
            let claims = action.can_process(item);
            if !claims {
                tracing::trace!("{} declined '{}'", action.name(), item.classifier());
            }
            claims
        })
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("location", &self.location)
            .field("actions", &self.actions)
            .field("max_steps", &self.max_steps)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
