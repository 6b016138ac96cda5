use serde::{Deserialize, Serialize};

pub const DEFAULT_BUDGET: f64 = 500_000.0;
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Settings for a solve or compare run. Every field has a default, so `{}` is a valid config.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub budget: f64,
    /// Absolute tolerance used when checking that both solvers agree.
    pub tolerance: f64,
    /// Item count above which exhaustive enumeration is reported as impractical.
    pub exhaustive_warn_items: usize,
    /// `(n + 1) * (budget + 1)` above which the DP table is reported as impractical.
    pub table_warn_cells: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            tolerance: DEFAULT_TOLERANCE,
            exhaustive_warn_items: 25,
            table_warn_cells: 250_000_000,
        }
    }
}

impl RunConfig {
    pub fn with_budget(mut self, budget: Option<f64>) -> Self {
        if let Some(budget) = budget {
            self.budget = budget;
        }
        self
    }
}
