/// Time-based sales aggregates
///
/// All aggregates here read an enriched table (see `dates::add_date_columns`)
/// and a quantity column. NULL quantities count as zero; a quantity column
/// of any other non-integer type is a `TypeMismatch`.

use crate::column::{Column, ColumnType, ColumnValue};
use crate::dates::{IS_WEEKEND, MONTH, SALE_DATETIME};
use crate::error::{Result, TransformError};
use crate::table::Table;
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

pub const SOLD_ITEMS: &str = "Number of Sold Items";
pub const DATE: &str = "Date";
pub const TOTAL_QUANTITY_SOLD: &str = "Total Quantity Sold";

fn quantity_column<'a>(table: &'a Table, quantity: &str) -> Result<&'a Column> {
    let col = table.column(quantity)?;
    col.expect_type(ColumnType::Int64)?;
    Ok(col)
}

#[inline]
fn quantity_at(col: &Column, row: usize) -> Result<i64> {
    Ok(col.get_i64(row)?.unwrap_or(0))
}

// ============================================================================
// Monthly totals
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    pub month: u32,
    pub quantity: i64,
}

/// Quantity sold per calendar month. Always twelve rows, January first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    rows: Vec<MonthTotal>,
}

impl MonthlyTotals {
    pub fn rows(&self) -> &[MonthTotal] {
        &self.rows
    }

    /// Quantity for `month` (1..=12).
    pub fn get(&self, month: u32) -> Option<i64> {
        self.rows.iter().find(|r| r.month == month).map(|r| r.quantity)
    }

    pub fn total(&self) -> i64 {
        self.rows.iter().map(|r| r.quantity).sum()
    }

    /// `month` / `Number of Sold Items` table for display.
    pub fn to_table(&self) -> Result<Table> {
        let months = Column::from_values(
            MONTH,
            ColumnType::Int64,
            false,
            self.rows.iter().map(|r| ColumnValue::Int64(r.month as i64)).collect(),
        )?;
        let sold = Column::from_values(
            SOLD_ITEMS,
            ColumnType::Int64,
            false,
            self.rows.iter().map(|r| ColumnValue::Int64(r.quantity)).collect(),
        )?;
        Table::from_columns("monthly_totals", vec![months, sold])
    }
}

/// Sum `quantity` per month, zero-filling months without orders.
pub fn monthly_totals(table: &Table, quantity: &str) -> Result<MonthlyTotals> {
    let months = table.column(MONTH)?;
    let qty = quantity_column(table, quantity)?;

    let mut sums = [0i64; 12];
    for row in 0..table.len() {
        let month = match months.get_i64(row)? {
            Some(m @ 1..=12) => m as usize,
            Some(other) => {
                return Err(TransformError::Schema(format!(
                    "Month {} out of range in row {}",
                    other, row
                )))
            }
            None => continue,
        };
        sums[month - 1] += quantity_at(qty, row)?;
    }

    Ok(MonthlyTotals {
        rows: sums
            .iter()
            .enumerate()
            .map(|(i, &quantity)| MonthTotal {
                month: i as u32 + 1,
                quantity,
            })
            .collect(),
    })
}

// ============================================================================
// Weekday / weekend split
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WeekPartTotals {
    pub weekday: i64,
    pub weekend: i64,
}

impl WeekPartTotals {
    /// Both buckets in display order, including empty ones.
    pub fn buckets(&self) -> [(&'static str, i64); 2] {
        [("Weekday", self.weekday), ("Weekend", self.weekend)]
    }

    pub fn total(&self) -> i64 {
        self.weekday + self.weekend
    }
}

/// Sum `quantity` by the `is_weekend` flag.
pub fn weekpart_totals(table: &Table, quantity: &str) -> Result<WeekPartTotals> {
    let flags = table.column(IS_WEEKEND)?;
    let qty = quantity_column(table, quantity)?;

    let mut totals = WeekPartTotals::default();
    for row in 0..table.len() {
        let weekend = match flags.get(row) {
            Some(ColumnValue::Int64(n)) => *n != 0,
            Some(ColumnValue::Bool(b)) => *b,
            Some(ColumnValue::Null) | None => continue,
            Some(other) => {
                return Err(TransformError::TypeMismatch {
                    column: IS_WEEKEND.to_string(),
                    expected: ColumnType::Int64.to_string(),
                    found: other.type_name(),
                })
            }
        };
        let n = quantity_at(qty, row)?;
        if weekend {
            totals.weekend += n;
        } else {
            totals.weekday += n;
        }
    }
    Ok(totals)
}

// ============================================================================
// Daily series
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub quantity: i64,
}

/// Quantity sold per calendar day, dense between the first and last sale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailySeries {
    points: Vec<DailyPoint>,
}

impl DailySeries {
    pub fn points(&self) -> &[DailyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn total(&self) -> i64 {
        self.points.iter().map(|p| p.quantity).sum()
    }

    /// Points with `start <= date <= end`.
    ///
    /// A reversed range is rejected with `InvalidRange` rather than quietly
    /// returning nothing.
    pub fn filter_range(&self, start: NaiveDate, end: NaiveDate) -> Result<DailySeries> {
        if start > end {
            return Err(TransformError::InvalidRange { start, end });
        }
        Ok(DailySeries {
            points: self
                .points
                .iter()
                .filter(|p| p.date >= start && p.date <= end)
                .copied()
                .collect(),
        })
    }

    /// `Date` / `Total Quantity Sold` table for display.
    pub fn to_table(&self) -> Result<Table> {
        let dates = Column::from_values(
            DATE,
            ColumnType::Date,
            false,
            self.points.iter().map(|p| ColumnValue::Date(p.date)).collect(),
        )?;
        let sold = Column::from_values(
            TOTAL_QUANTITY_SOLD,
            ColumnType::Int64,
            false,
            self.points.iter().map(|p| ColumnValue::Int64(p.quantity)).collect(),
        )?;
        Table::from_columns("daily_sales", vec![dates, sold])
    }
}

/// Sum `quantity` per sale date and fill every missing day with zero.
///
/// Rows are grouped on the calendar date of `sale_date_datetime`, so two
/// sales at different times of the same day land in one point. An empty
/// table gives an empty series.
pub fn daily_series(table: &Table, quantity: &str) -> Result<DailySeries> {
    let dates = table.column(SALE_DATETIME)?;
    let qty = quantity_column(table, quantity)?;

    let mut by_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for row in 0..table.len() {
        let Some(date) = dates.get(row).and_then(|v| v.as_date()) else {
            continue;
        };
        *by_day.entry(date).or_insert(0) += quantity_at(qty, row)?;
    }

    let (first, last) = match (by_day.keys().next(), by_day.keys().next_back()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Ok(DailySeries::default()),
    };

    let mut points = Vec::with_capacity((last - first).num_days() as usize + 1);
    let mut day = Some(first);
    while let Some(date) = day.filter(|d| *d <= last) {
        points.push(DailyPoint {
            date,
            quantity: by_day.get(&date).copied().unwrap_or(0),
        });
        day = date.succ_opt();
    }

    debug!("Daily series spans {} to {} ({} days)", first, last, points.len());
    Ok(DailySeries { points })
}
