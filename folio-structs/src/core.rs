use crate::serializable_struct_with_getters;
use chrono::{DateTime, SecondsFormat, Utc};
use folio_utils::format_thousands;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BRUTE_FORCE_LABEL: &str = "Brute Force";
pub const DYNAMIC_PROGRAMMING_LABEL: &str = "Dynamic Programming";

serializable_struct_with_getters! {
    SolveStats {
        algorithm: String,
        /// Subsets examined. Only the exhaustive solver counts iterations.
        iterations: Option<u64>,
        /// Wall-clock seconds.
        execution_time: f64,
        total_cost: f64,
        total_profit: f64,
        profit_ratio: f64,
        num_items: usize,
    }
}

serializable_struct_with_getters! {
    ComparisonBlock {
        /// `None` when the dynamic programming run took no measurable time.
        speedup: Option<f64>,
        same_solution: bool,
        profit_delta: f64,
        cost_delta: f64,
        tolerance: f64,
    }
}

serializable_struct_with_getters! {
    ComparisonReport {
        brute_force: SolveStats,
        dynamic_programming: SolveStats,
        comparison: ComparisonBlock,
    }
}

serializable_struct_with_getters! {
    ReportRecord {
        timestamp: String,
        budget: f64,
        source: Option<String>,
        #[serde(flatten)]
        report: ComparisonReport,
    }
}

pub fn speedup(brute_force_time: f64, dynamic_time: f64) -> Option<f64> {
    if dynamic_time > 0.0 {
        Some(brute_force_time / dynamic_time)
    } else {
        None
    }
}

impl ComparisonReport {
    /// Returns `None` until both solvers have produced stats.
    pub fn compare(
        brute_force: Option<&SolveStats>,
        dynamic_programming: Option<&SolveStats>,
        tolerance: f64,
    ) -> Option<Self> {
        let (bf, dp) = (brute_force?, dynamic_programming?);
        let profit_delta = (bf.total_profit - dp.total_profit).abs();
        let cost_delta = (bf.total_cost - dp.total_cost).abs();
        Some(Self {
            brute_force: bf.clone(),
            dynamic_programming: dp.clone(),
            comparison: ComparisonBlock {
                speedup: speedup(bf.execution_time, dp.execution_time),
                same_solution: profit_delta <= tolerance && cost_delta <= tolerance,
                profit_delta,
                cost_delta,
                tolerance,
            },
        })
    }

    pub fn speedup(&self) -> Option<f64> {
        self.comparison.speedup
    }

    pub fn same_solution(&self) -> bool {
        self.comparison.same_solution
    }
}

impl ReportRecord {
    pub fn new(
        report: ComparisonReport,
        budget: f64,
        source: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            budget,
            source,
            report,
        }
    }

    pub fn now(report: ComparisonReport, budget: f64, source: Option<String>) -> Self {
        Self::new(report, budget, source, Utc::now())
    }
}

const RULE_WIDTH: usize = 70;

impl fmt::Display for SolveStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        writeln!(f, "Total cost: {}", format_thousands(self.total_cost, 0))?;
        writeln!(f, "Total profit: {}", format_thousands(self.total_profit, 2))?;
        writeln!(f, "Items selected: {}", self.num_items)?;
        if let Some(iterations) = self.iterations {
            writeln!(f, "Iterations: {}", format_thousands(iterations as f64, 0))?;
        }
        writeln!(f, "Execution time: {:.6}s", self.execution_time)?;
        write!(f, "Profit ratio: {:.4}", self.profit_ratio)
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (bf, dp) = (&self.brute_force, &self.dynamic_programming);
        let rule = "=".repeat(RULE_WIDTH);
        let thin = "-".repeat(RULE_WIDTH);
        let iterations = |s: &SolveStats| {
            s.iterations
                .map(|i| format_thousands(i as f64, 0))
                .unwrap_or_else(|| "n/a".to_string())
        };

        writeln!(f, "{}", rule)?;
        writeln!(f, "COMPARISON: {} vs {}", bf.algorithm, dp.algorithm)?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "{:<22} {:>22} {:>22}", "Metric", bf.algorithm, dp.algorithm)?;
        writeln!(f, "{}", thin)?;
        writeln!(
            f,
            "{:<22} {:>22.6} {:>22.6}",
            "Execution time (s)", bf.execution_time, dp.execution_time
        )?;
        writeln!(f, "{:<22} {:>22} {:>22}", "Iterations", iterations(bf), iterations(dp))?;
        writeln!(
            f,
            "{:<22} {:>22} {:>22}",
            "Total cost",
            format_thousands(bf.total_cost, 0),
            format_thousands(dp.total_cost, 0)
        )?;
        writeln!(
            f,
            "{:<22} {:>22} {:>22}",
            "Total profit",
            format_thousands(bf.total_profit, 2),
            format_thousands(dp.total_profit, 2)
        )?;
        writeln!(f, "{:<22} {:>22} {:>22}", "Items selected", bf.num_items, dp.num_items)?;
        writeln!(f, "{}", thin)?;
        match self.comparison.speedup {
            Some(speedup) => writeln!(f, "Speedup: {:.2}x", speedup)?,
            None => writeln!(f, "Speedup: n/a")?,
        }
        writeln!(
            f,
            "Same solution: {}",
            if self.comparison.same_solution { "yes" } else { "no" }
        )?;
        write!(f, "{}", rule)
    }
}
