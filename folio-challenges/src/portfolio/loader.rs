//! Typed parsing of item tables.
//!
//! Each canonical field has a fixed list of accepted header names. Values are normalized
//! (comma decimals, `%` signs, whole percents) and rows that cannot produce a valid
//! [`Item`] are returned as [`RejectedRow`]s instead of aborting the load.

use super::Item;
use crate::PortfolioError;
use folio_utils::{parse_decimal, DelimitedTable, TableError, TableRow};
use std::{fs, path::Path};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Cost,
    ProfitRate,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Cost => "cost",
            Field::ProfitRate => "profit_rate",
        }
    }

    /// Header names accepted for this field, compared case-insensitively.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Name => &["name", "id", "action", "actions"],
            Field::Cost => &["price", "cost"],
            Field::ProfitRate => &[
                "profit_pct",
                "profit_rate",
                "profit",
                "profit%",
                "bénéfice après 2 ans",
            ],
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("missing {0} value")]
    Missing(&'static str),
    #[error("unparseable {field} value {value:?}")]
    Unparseable { field: &'static str, value: String },
    #[error("cost ({0}) must be positive")]
    NonPositiveCost(f64),
}

#[derive(Debug, PartialEq)]
pub struct RejectedRow {
    pub line: usize,
    pub error: RowError,
}

#[derive(Debug, Default, PartialEq)]
pub struct LoadReport {
    pub items: Vec<Item>,
    pub rejected: Vec<RejectedRow>,
}

/// Values above 1 are whole percents (`15` means 15%); others are already fractions.
pub fn normalize_profit_rate(value: f64) -> f64 {
    if value > 1.0 {
        value / 100.0
    } else {
        value
    }
}

struct ColumnMap {
    name: usize,
    cost: usize,
    profit_rate: usize,
}

impl ColumnMap {
    fn resolve(table: &DelimitedTable) -> Result<Self, TableError> {
        let column = |field: Field| table.require_column(field.label(), field.aliases());
        Ok(Self {
            name: column(Field::Name)?,
            cost: column(Field::Cost)?,
            profit_rate: column(Field::ProfitRate)?,
        })
    }

    fn parse_row(&self, row: &TableRow) -> Result<Item, RowError> {
        let name = raw_field(row, self.name, Field::Name)?;
        let cost = number_field(row, self.cost, Field::Cost)?;
        if cost <= 0.0 {
            return Err(RowError::NonPositiveCost(cost));
        }
        let profit_rate =
            normalize_profit_rate(number_field(row, self.profit_rate, Field::ProfitRate)?);
        Ok(Item::new(name, cost, profit_rate))
    }
}

fn raw_field(row: &TableRow, index: usize, field: Field) -> Result<&str, RowError> {
    match row.field(index) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RowError::Missing(field.label())),
    }
}

fn number_field(row: &TableRow, index: usize, field: Field) -> Result<f64, RowError> {
    let value = raw_field(row, index, field)?;
    parse_decimal(value).ok_or_else(|| RowError::Unparseable {
        field: field.label(),
        value: value.to_string(),
    })
}

pub fn parse_items(text: &str) -> Result<LoadReport, PortfolioError> {
    let table = DelimitedTable::parse(text)?;
    let columns = ColumnMap::resolve(&table)?;
    debug!(
        "delimiter {:?}, columns name={} cost={} profit_rate={}",
        table.delimiter, columns.name, columns.cost, columns.profit_rate
    );

    let mut report = LoadReport::default();
    for row in &table.rows {
        match columns.parse_row(row) {
            Ok(item) => report.items.push(item),
            Err(error) => {
                warn!("skipping line {}: {}", row.line, error);
                report.rejected.push(RejectedRow {
                    line: row.line,
                    error,
                });
            }
        }
    }
    Ok(report)
}

pub fn load_items(path: impl AsRef<Path>) -> Result<LoadReport, PortfolioError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| PortfolioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let report = parse_items(&text)?;
    info!(
        "loaded {} items from {} ({} rows skipped)",
        report.items.len(),
        path.display(),
        report.rejected.len()
    );
    Ok(report)
}
