pub mod loader;

use crate::PortfolioError;
use folio_utils::format_thousands;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{from_value, Map, Value};
use std::{collections::HashSet, fmt};

/// One candidate asset. Immutable once built.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Item {
    name: String,
    cost: f64,
    profit_rate: f64,
}

impl Item {
    pub fn new(name: impl Into<String>, cost: f64, profit_rate: f64) -> Self {
        Self {
            name: name.into(),
            cost,
            profit_rate,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Fraction of the cost earned as profit, e.g. `0.15` for 15%.
    pub fn profit_rate(&self) -> f64 {
        self.profit_rate
    }

    pub fn profit(&self) -> f64 {
        self.cost * self.profit_rate
    }
}

/// A chosen subset of items, remembering each item's position in the input list.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Selection {
    items: Vec<Item>,
    indices: Vec<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: usize, item: &Item) {
        self.indices.push(index);
        self.items.push(item.clone());
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_cost(&self) -> f64 {
        self.items.iter().map(Item::cost).sum()
    }

    pub fn total_profit(&self) -> f64 {
        self.items.iter().map(Item::profit).sum()
    }

    /// Zero for an empty or zero-cost selection.
    pub fn profit_ratio(&self) -> f64 {
        let total_cost = self.total_cost();
        if total_cost > 0.0 {
            self.total_profit() / total_cost
        } else {
            0.0
        }
    }

    pub fn is_valid(&self, budget: f64) -> bool {
        self.total_cost() <= budget
    }

    pub fn to_solution(&self) -> Solution {
        Solution {
            items: self.indices.clone(),
        }
    }
}

impl<'a> FromIterator<(usize, &'a Item)> for Selection {
    fn from_iter<I: IntoIterator<Item = (usize, &'a Item)>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for (index, item) in iter {
            selection.push(index, item);
        }
        selection
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let thin = "-".repeat(70);
        writeln!(f, "{:<20} {:>15} {:>15} {:>15}", "Action", "Cost", "Profit %", "Profit")?;
        writeln!(f, "{}", thin)?;

        let mut rows: Vec<&Item> = self.items.iter().collect();
        rows.sort_by(|a, b| b.cost.total_cmp(&a.cost));
        for item in rows {
            writeln!(
                f,
                "{:<20} {:>15} {:>14.2}% {:>15}",
                item.name,
                format_thousands(item.cost, 0),
                item.profit_rate * 100.0,
                format_thousands(item.profit(), 0)
            )?;
        }

        writeln!(f, "{}", thin)?;
        write!(
            f,
            "{:<20} {:>15} {:>14.2}% {:>15}",
            "TOTAL",
            format_thousands(self.total_cost(), 0),
            self.profit_ratio() * 100.0,
            format_thousands(self.total_profit(), 0)
        )
    }
}

/// Index form of a selection, suitable for exporting and re-verification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Solution {
    pub items: Vec<usize>,
}

impl Solution {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }
}

impl TryFrom<Map<String, Value>> for Solution {
    type Error = serde_json::Error;

    fn try_from(v: Map<String, Value>) -> Result<Self, Self::Error> {
        from_value(Value::Object(v))
    }
}

/// Parameters for [`Challenge::generate_instance`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Track {
    pub num_items: usize,
    pub budget: f64,
    /// Costs are drawn uniformly from `1..=max_cost` whole units.
    pub max_cost: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScaleWarning {
    ExhaustiveEnumeration { num_items: usize, threshold: usize },
    DenseTable { cells: u128, threshold: u64 },
}

impl fmt::Display for ScaleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleWarning::ExhaustiveEnumeration {
                num_items,
                threshold,
            } => write!(
                f,
                "{} items exceed {}: exhaustive search must examine 2^{} subsets",
                num_items, threshold, num_items
            ),
            ScaleWarning::DenseTable { cells, threshold } => write!(
                f,
                "dynamic programming table needs {} cells (threshold {})",
                cells, threshold
            ),
        }
    }
}

/// A validated instance: a non-empty item list and a positive budget.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Challenge {
    items: Vec<Item>,
    budget: f64,
}

impl Challenge {
    pub fn new(items: Vec<Item>, budget: f64) -> Result<Self, PortfolioError> {
        if !budget.is_finite() || budget <= 0.0 {
            return Err(PortfolioError::InvalidBudget(budget));
        }
        if items.is_empty() {
            return Err(PortfolioError::EmptyItems);
        }
        for (index, item) in items.iter().enumerate() {
            let reason = if item.name.trim().is_empty() {
                Some("name is empty".to_string())
            } else if !item.cost.is_finite() || item.cost <= 0.0 {
                Some(format!("cost ({}) must be positive", item.cost))
            } else if !item.profit_rate.is_finite() {
                Some(format!("profit rate ({}) is not finite", item.profit_rate))
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(PortfolioError::InvalidItem {
                    index,
                    name: item.name.clone(),
                    reason,
                });
            }
        }
        Ok(Self { items, budget })
    }

    pub fn generate_instance(seed: &[u8; 32], track: &Track) -> Result<Self, PortfolioError> {
        let mut rng = SmallRng::from_seed(seed.clone());
        let max_cost = track.max_cost.max(1);
        let items = (1..=track.num_items)
            .map(|k| {
                let cost = rng.gen_range(1..=max_cost) as f64;
                let profit_rate = rng.gen_range(1..=50u32) as f64 / 100.0;
                Item::new(format!("Action-{}", k), cost, profit_rate)
            })
            .collect();
        Self::new(items, track.budget)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Checks a proposed solution and returns the selection it describes.
    pub fn verify_solution(&self, solution: &Solution) -> Result<Selection, PortfolioError> {
        let unique: HashSet<usize> = solution.items.iter().cloned().collect();
        if unique.len() != solution.items.len() {
            return Err(PortfolioError::DuplicateItems);
        }
        if let Some(&item) = solution.items.iter().find(|&&i| i >= self.items.len()) {
            return Err(PortfolioError::ItemOutOfBounds(item));
        }

        let selection: Selection = solution
            .items
            .iter()
            .map(|&i| (i, &self.items[i]))
            .collect();
        if !selection.is_valid(self.budget) {
            return Err(PortfolioError::BudgetExceeded {
                total_cost: selection.total_cost(),
                budget: self.budget,
            });
        }
        Ok(selection)
    }

    /// Advisory only: set when 2^n subset enumeration is impractical.
    pub fn exhaustive_scale_warning(&self, threshold: usize) -> Option<ScaleWarning> {
        (self.items.len() > threshold).then(|| ScaleWarning::ExhaustiveEnumeration {
            num_items: self.items.len(),
            threshold,
        })
    }

    /// Advisory only: set when the `(n + 1) * (budget + 1)` table is impractical.
    pub fn table_scale_warning(&self, threshold: u64) -> Option<ScaleWarning> {
        let cells = (self.items.len() as u128 + 1)
            .saturating_mul((self.budget.floor() as u128).saturating_add(1));
        (cells > threshold as u128).then(|| ScaleWarning::DenseTable { cells, threshold })
    }
}
