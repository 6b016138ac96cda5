use folio_utils::TableError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The item list is empty or malformed.
    Input,
    /// The budget is missing or unusable.
    Configuration,
    /// A proposed selection does not satisfy the instance.
    Solution,
}

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("no items to select from")]
    EmptyItems,
    #[error("item {index} ({name:?}) is invalid: {reason}")]
    InvalidItem {
        index: usize,
        name: String,
        reason: String,
    },
    #[error("budget must be a positive finite number, got {0}")]
    InvalidBudget(f64),
    #[error("a table of {num_items} items by budget {budget} does not fit in memory")]
    TableTooLarge { num_items: usize, budget: u64 },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("duplicate items selected")]
    DuplicateItems,
    #[error("item ({0}) is out of bounds")]
    ItemOutOfBounds(usize),
    #[error("total cost ({total_cost}) exceeded budget ({budget})")]
    BudgetExceeded { total_cost: f64, budget: f64 },
}

impl PortfolioError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PortfolioError::EmptyItems
            | PortfolioError::InvalidItem { .. }
            | PortfolioError::Io { .. }
            | PortfolioError::Table(_) => ErrorCategory::Input,
            PortfolioError::InvalidBudget(_) | PortfolioError::TableTooLarge { .. } => {
                ErrorCategory::Configuration
            }
            PortfolioError::DuplicateItems
            | PortfolioError::ItemOutOfBounds(_)
            | PortfolioError::BudgetExceeded { .. } => ErrorCategory::Solution,
        }
    }
}
