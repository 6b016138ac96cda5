pub mod brute_force;
pub mod dynamic;

pub use brute_force::BruteForceSolver;
pub use dynamic::{DpTable, DynamicSolver};

use folio_challenges::{
    portfolio::{Challenge, ScaleWarning, Selection},
    PortfolioError,
};
use folio_structs::{
    config::RunConfig,
    core::{ComparisonReport, SolveStats},
};
use std::time::Duration;
use tracing::{info, warn};

/// An exact solver for the 0/1 portfolio selection problem.
pub trait Solver {
    fn label(&self) -> &'static str;

    fn solve_challenge(&mut self, challenge: &Challenge) -> Result<Selection, PortfolioError>;

    /// Stats of the last solve, `None` before the first one.
    fn stats(&self) -> Option<SolveStats>;

    fn scale_warning(&self, challenge: &Challenge, config: &RunConfig) -> Option<ScaleWarning>;
}

/// Names accepted by [`solver_by_name`].
pub const SOLVER_NAMES: [&str; 2] = ["brute_force", "dynamic"];

pub fn solver_by_name(name: &str) -> Option<Box<dyn Solver>> {
    match name {
        "brute_force" => Some(Box::new(BruteForceSolver::new())),
        "dynamic" => Some(Box::new(DynamicSolver::new())),
        _ => None,
    }
}

pub(crate) fn capture_stats(
    algorithm: &str,
    iterations: Option<u64>,
    elapsed: Duration,
    selection: &Selection,
) -> SolveStats {
    SolveStats {
        algorithm: algorithm.to_string(),
        iterations,
        execution_time: elapsed.as_secs_f64(),
        total_cost: selection.total_cost(),
        total_profit: selection.total_profit(),
        profit_ratio: selection.profit_ratio(),
        num_items: selection.len(),
    }
}

/// Logs the solver's scale warning, if any, then solves.
pub fn run_solver(
    solver: &mut dyn Solver,
    challenge: &Challenge,
    config: &RunConfig,
) -> Result<Selection, PortfolioError> {
    if let Some(warning) = solver.scale_warning(challenge, config) {
        warn!("{}: {}", solver.label(), warning);
    }
    solver.solve_challenge(challenge)
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub brute_force: Selection,
    pub dynamic_programming: Selection,
    pub report: Option<ComparisonReport>,
}

/// Runs both solvers on the same challenge, one after the other.
pub fn compare(challenge: &Challenge, config: &RunConfig) -> Result<Comparison, PortfolioError> {
    let mut brute_force = BruteForceSolver::new();
    let mut dynamic = DynamicSolver::new();

    let bf_selection = run_solver(&mut brute_force, challenge, config)?;
    let dp_selection = run_solver(&mut dynamic, challenge, config)?;

    let report = ComparisonReport::compare(
        brute_force.stats().as_ref(),
        dynamic.stats().as_ref(),
        config.tolerance,
    );
    if let Some(report) = &report {
        if report.same_solution() {
            info!("solvers agree, speedup {:?}", report.speedup());
        } else {
            warn!(
                "solvers disagree: profit delta {}, cost delta {}",
                report.comparison.profit_delta, report.comparison.cost_delta
            );
        }
    }

    Ok(Comparison {
        brute_force: bf_selection,
        dynamic_programming: dp_selection,
        report,
    })
}
