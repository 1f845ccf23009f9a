//! Scenario runner for comparing several deals side by side
//!
//! Each run owns its parameters and ledger outright, so a batch fans out
//! across threads with no coordination.

use rayon::prelude::*;

use crate::error::FeasibilityError;
use crate::project::ProjectParameters;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Outcome of one deal within a batch
pub type RunOutcome = Result<ProjectionResult, FeasibilityError>;

/// Runs projections for one or many parameter sets under a shared config
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let outcomes = runner.run_batch(&[base_case, bigger_build]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with the default projection config
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    pub fn config(&self) -> &ProjectionConfig {
        self.engine.config()
    }

    /// Run a single projection
    pub fn run(&self, params: &ProjectParameters) -> RunOutcome {
        self.engine.project(params)
    }

    /// Run every parameter set in parallel; outcomes keep input order
    pub fn run_batch(&self, deals: &[ProjectParameters]) -> Vec<RunOutcome> {
        deals.par_iter().map(|params| self.engine.project(params)).collect()
    }

    /// Index of the successful run with the highest cash-on-cash ROI
    pub fn best_by_cash_on_cash(outcomes: &[RunOutcome]) -> Option<usize> {
        outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, outcome)| {
                let result = outcome.as_ref().ok()?;
                result.summary.cash_on_cash_roi.as_option().map(|roi| (i, roi))
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}
