//! Exhaustive search over every subset of the items.
//!
//! Subsets are visited by size, smallest first, and in lexicographic index order within a
//! size. A subset replaces the incumbent only when its profit is strictly greater, so the
//! first maximal subset found is the one returned. Cost is `2^n` subset evaluations with no
//! pruning; this solver is the correctness baseline for [`super::DynamicSolver`].

use super::{capture_stats, Solver};
use folio_challenges::{
    portfolio::{Challenge, Item, ScaleWarning, Selection},
    PortfolioError,
};
use folio_structs::{
    config::RunConfig,
    core::{SolveStats, BRUTE_FORCE_LABEL},
};
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct BruteForceSolver {
    iterations: u64,
    execution_time: Duration,
    best: Option<Selection>,
}

impl BruteForceSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subsets examined by the last solve, valid or not.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn execution_time(&self) -> Duration {
        self.execution_time
    }

    pub fn best(&self) -> Option<&Selection> {
        self.best.as_ref()
    }

    pub fn solve(&mut self, items: &[Item], budget: f64) -> Selection {
        let start = Instant::now();
        let n = items.len();
        self.iterations = 0;

        let mut best_profit = 0.0;
        let mut best_indices: Vec<usize> = Vec::new();

        for size in 0..=n {
            let mut combo: Vec<usize> = (0..size).collect();
            loop {
                self.iterations += 1;

                let mut total_cost = 0.0;
                let mut total_profit = 0.0;
                for &i in &combo {
                    total_cost += items[i].cost();
                    total_profit += items[i].profit();
                }
                if total_cost <= budget && total_profit > best_profit {
                    best_profit = total_profit;
                    best_indices.clone_from(&combo);
                }

                if !next_combination(&mut combo, n) {
                    break;
                }
            }
            debug!("size {} done, {} subsets so far", size, self.iterations);
        }

        let selection: Selection = best_indices.iter().map(|&i| (i, &items[i])).collect();
        self.execution_time = start.elapsed();
        info!(
            "brute force: {} subsets in {:?}, profit {:.2}",
            self.iterations,
            self.execution_time,
            selection.total_profit()
        );
        self.best = Some(selection.clone());
        selection
    }
}

/// Advances `combo` to the next `combo.len()`-subset of `0..n` in lexicographic order.
/// Returns false once the last subset has been visited.
fn next_combination(combo: &mut [usize], n: usize) -> bool {
    let k = combo.len();
    let Some(i) = (0..k).rev().find(|&i| combo[i] < n - k + i) else {
        return false;
    };
    combo[i] += 1;
    for j in i + 1..k {
        combo[j] = combo[j - 1] + 1;
    }
    true
}

impl Solver for BruteForceSolver {
    fn label(&self) -> &'static str {
        BRUTE_FORCE_LABEL
    }

    fn solve_challenge(&mut self, challenge: &Challenge) -> Result<Selection, PortfolioError> {
        Ok(self.solve(challenge.items(), challenge.budget()))
    }

    fn stats(&self) -> Option<SolveStats> {
        self.best.as_ref().map(|selection| {
            capture_stats(
                BRUTE_FORCE_LABEL,
                Some(self.iterations),
                self.execution_time,
                selection,
            )
        })
    }

    fn scale_warning(&self, challenge: &Challenge, config: &RunConfig) -> Option<ScaleWarning> {
        challenge.exhaustive_scale_warning(config.exhaustive_warn_items)
    }
}
