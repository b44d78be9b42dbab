/// Sale-date parsing and date enrichment
///
/// `add_date_columns` parses the sale-date column once and derives the
/// calendar fields every time-based aggregate groups on.

use crate::column::{Column, ColumnType, ColumnValue};
use crate::error::{Result, TransformError};
use crate::table::Table;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use log::debug;

pub const SALE_DATETIME: &str = "sale_date_datetime";
pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const DAY: &str = "day";
pub const DAY_OF_WEEK: &str = "day_of_week";
pub const IS_WEEKEND: &str = "is_weekend";

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
// Etsy exports use MM/DD/YY. `%Y` also accepts a two-digit year, so short
// years are rejected there and left to `%y`.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Parse one sale-date cell.
///
/// ```
/// use salestable::dates::parse_sale_date;
///
/// let dt = parse_sale_date("12/31/22").unwrap();
/// assert_eq!(dt.to_string(), "2022-12-31 00:00:00");
/// assert!(parse_sale_date("not a date").is_none());
/// ```
pub fn parse_sale_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(raw, fmt)
            .ok()
            .filter(|d| !(fmt.ends_with("%Y") && d.year() < 100))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// Monday = 0 .. Sunday = 6
#[inline]
pub fn weekday_index(date: NaiveDate) -> i64 {
    date.weekday().num_days_from_monday() as i64
}

#[inline]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Returns a new table with the parsed sale date and its calendar parts.
///
/// Adds `sale_date_datetime`, `year`, `month`, `day`, `day_of_week`
/// (Monday = 0) and `is_weekend` (1 or 0). Columns that already exist
/// under those names are replaced.
///
/// Parsing is fail-fast: the first NULL or unparseable cell aborts the
/// whole operation with `TransformError::Parse`.
pub fn add_date_columns(table: &Table, date_column: &str) -> Result<Table> {
    let source = table.column(date_column)?;

    let mut parsed = Vec::with_capacity(source.len());
    for (row, value) in source.iter().enumerate() {
        let dt = match value {
            ColumnValue::String(s) => parse_sale_date(s),
            other => other.as_datetime(),
        };
        match dt {
            Some(dt) => parsed.push(dt),
            None => {
                return Err(TransformError::Parse {
                    column: date_column.to_string(),
                    row,
                    value: value.to_string(),
                })
            }
        }
    }

    let int_column = |name: &str, f: &dyn Fn(NaiveDate) -> i64| {
        Column::from_values(
            name,
            ColumnType::Int64,
            false,
            parsed.iter().map(|dt| ColumnValue::Int64(f(dt.date()))).collect(),
        )
    };

    let derived = vec![
        Column::from_values(
            SALE_DATETIME,
            ColumnType::DateTime,
            false,
            parsed.iter().copied().map(ColumnValue::DateTime).collect(),
        )?,
        int_column(YEAR, &|d: NaiveDate| d.year() as i64)?,
        int_column(MONTH, &|d: NaiveDate| d.month() as i64)?,
        int_column(DAY, &|d: NaiveDate| d.day() as i64)?,
        int_column(DAY_OF_WEEK, &weekday_index)?,
        int_column(IS_WEEKEND, &|d: NaiveDate| is_weekend(d) as i64)?,
    ];

    let mut enriched = table.clone();
    for column in derived {
        enriched = enriched.with_column(column)?;
    }
    debug!(
        "Added date columns from '{}' to {} rows",
        date_column,
        enriched.len()
    );
    Ok(enriched)
}
