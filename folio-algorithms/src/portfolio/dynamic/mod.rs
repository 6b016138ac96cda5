//! Classic 0/1 knapsack table over whole currency units.
//!
//! The budget and every item cost are truncated to integers for indexing, so fractional
//! costs lose their sub-unit part. The returned selection's totals still use the real
//! costs; with fractional input its real cost can therefore exceed the budget, which is
//! logged. Time and memory are `O(n * budget)` and the full table is kept after solving.
//! A table that cannot be sized or allocated is reported as
//! [`PortfolioError::TableTooLarge`].
//!
//! Inclusion must be strictly better than exclusion to be taken, so when several optima
//! exist the one that leaves later items out is returned.

use super::{capture_stats, Solver};
use folio_challenges::{
    portfolio::{Challenge, Item, ScaleWarning, Selection},
    PortfolioError,
};
use folio_structs::{
    config::RunConfig,
    core::{SolveStats, DYNAMIC_PROGRAMMING_LABEL},
};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// `(n + 1) x (budget + 1)` profits, row `i` covering the first `i` items.
#[derive(Debug, Clone, PartialEq)]
pub struct DpTable {
    width: usize,
    cells: Vec<f64>,
}

impl DpTable {
    fn new(num_items: usize, budget: u64) -> Result<Self, PortfolioError> {
        let too_large = || PortfolioError::TableTooLarge { num_items, budget };
        let width = usize::try_from(budget)
            .ok()
            .and_then(|b| b.checked_add(1))
            .ok_or_else(too_large)?;
        let len = num_items
            .checked_add(1)
            .and_then(|rows| rows.checked_mul(width))
            .ok_or_else(too_large)?;

        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| too_large())?;
        cells.resize(len, 0.0);
        Ok(Self { width, cells })
    }

    /// Best profit using the first `i` items under capacity `w`.
    pub fn get(&self, i: usize, w: usize) -> f64 {
        self.cells[i * self.width + w]
    }

    pub fn num_rows(&self) -> usize {
        self.cells.len() / self.width
    }

    pub fn capacity(&self) -> usize {
        self.width - 1
    }

    pub fn best_profit(&self) -> f64 {
        self.get(self.num_rows() - 1, self.capacity())
    }

    fn rows_mut(&mut self, i: usize) -> (&[f64], &mut [f64]) {
        let (before, after) = self.cells.split_at_mut(i * self.width);
        (&before[(i - 1) * self.width..], &mut after[..self.width])
    }
}

/// Whole currency units used to index the table.
pub fn truncated_cost(item: &Item) -> usize {
    item.cost() as usize
}

#[derive(Debug, Clone, Default)]
pub struct DynamicSolver {
    execution_time: Duration,
    best: Option<Selection>,
    table: Option<DpTable>,
}

impl DynamicSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execution_time(&self) -> Duration {
        self.execution_time
    }

    pub fn best(&self) -> Option<&Selection> {
        self.best.as_ref()
    }

    /// The table filled by the last solve.
    pub fn table(&self) -> Option<&DpTable> {
        self.table.as_ref()
    }

    pub fn solve(&mut self, items: &[Item], budget: u64) -> Result<Selection, PortfolioError> {
        let start = Instant::now();
        let n = items.len();
        let mut table = DpTable::new(n, budget)?;
        let budget = table.capacity();
        let costs: Vec<usize> = items.iter().map(truncated_cost).collect();

        for i in 1..=n {
            let cost = costs[i - 1];
            let profit = items[i - 1].profit();
            let (prev, row) = table.rows_mut(i);
            for w in 0..=budget {
                let without = prev[w];
                row[w] = if cost <= w {
                    let with = prev[w - cost] + profit;
                    if with > without {
                        with
                    } else {
                        without
                    }
                } else {
                    without
                };
            }
        }
        debug!("filled {} x {} table", n + 1, budget + 1);

        let mut chosen = Vec::new();
        let mut w = budget;
        for i in (1..=n).rev() {
            if table.get(i, w) != table.get(i - 1, w) {
                chosen.push(i - 1);
                w -= costs[i - 1];
            }
        }
        chosen.reverse();

        let selection: Selection = chosen.iter().map(|&i| (i, &items[i])).collect();
        self.execution_time = start.elapsed();
        if selection.total_cost() > budget as f64 {
            warn!(
                "selected cost {} exceeds budget {} after truncating fractional costs",
                selection.total_cost(),
                budget
            );
        }
        info!(
            "dynamic programming: {} items, budget {} in {:?}, profit {:.2}",
            n,
            budget,
            self.execution_time,
            selection.total_profit()
        );

        self.table = Some(table);
        self.best = Some(selection.clone());
        Ok(selection)
    }
}

impl Solver for DynamicSolver {
    fn label(&self) -> &'static str {
        DYNAMIC_PROGRAMMING_LABEL
    }

    /// Budgets beyond `u64::MAX` saturate and are then rejected as too large.
    fn solve_challenge(&mut self, challenge: &Challenge) -> Result<Selection, PortfolioError> {
        self.solve(challenge.items(), challenge.budget() as u64)
    }

    fn stats(&self) -> Option<SolveStats> {
        self.best.as_ref().map(|selection| {
            capture_stats(
                DYNAMIC_PROGRAMMING_LABEL,
                None,
                self.execution_time,
                selection,
            )
        })
    }

    fn scale_warning(&self, challenge: &Challenge, config: &RunConfig) -> Option<ScaleWarning> {
        challenge.table_scale_warning(config.table_warn_cells)
    }
}
