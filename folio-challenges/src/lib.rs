pub mod error;
pub use error::{ErrorCategory, PortfolioError};
pub mod portfolio;
