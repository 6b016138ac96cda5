mod json;
pub use json::*;
mod number;
pub use number::*;
pub mod table;
pub use table::{DelimitedTable, TableError, TableRow};
