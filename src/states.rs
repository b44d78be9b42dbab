/// Geographic order counts
///
/// Orders are counted per US ship state in two stages: `orders_by_state`
/// extracts raw per-state counts from the order table, and
/// `clean_orders_by_state` normalizes any per-state aggregate onto the fixed
/// set of USPS codes. `top_n_with_others` then folds the long tail into a
/// single bucket for charting.

use crate::column::ColumnValue;
use crate::config::ColumnRoles;
use crate::error::Result;
use crate::table::Table;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// USPS codes for the 50 states, DC and five inhabited territories.
pub const US_STATE_CODES: [&str; 56] = [
    "AK", "AL", "AR", "AS", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "GU", "HI", "IA",
    "ID", "IL", "IN", "KS", "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MP", "MS", "MT",
    "NC", "ND", "NE", "NH", "NJ", "NM", "NV", "NY", "OH", "OK", "OR", "PA", "PR", "RI", "SC",
    "SD", "TN", "TX", "UT", "VA", "VI", "VT", "WA", "WI", "WV", "WY",
];

pub fn is_valid_state_code(code: &str) -> bool {
    US_STATE_CODES.binary_search(&code).is_ok()
}

/// One labelled count in a categorical aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: i64,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, count: i64) -> Self {
        CategoryCount {
            label: label.into(),
            count,
        }
    }
}

/// Distinct order ids per ship state for orders shipped to `country`.
///
/// An order spanning several line-item rows is counted once per state.
/// Rows with no state or no order id are skipped. The result is ordered by
/// state label and is not yet validated against `US_STATE_CODES`.
pub fn orders_by_state(table: &Table, roles: &ColumnRoles, country: &str) -> Result<Vec<CategoryCount>> {
    let countries = table.column(&roles.ship_country)?;
    let states = table.column(&roles.ship_state)?;
    let order_ids = table.column(&roles.order_id)?;

    let domestic = table.filter_rows(|row| {
        countries.get(row).and_then(|v| v.as_string()) == Some(country)
    });
    let states = domestic.column(states.name())?;
    let order_ids = domestic.column(order_ids.name())?;

    let mut distinct: BTreeMap<String, HashSet<String>> = BTreeMap::new();
    for row in 0..domestic.len() {
        let state = match states.get(row) {
            Some(ColumnValue::String(s)) => s.clone(),
            Some(ColumnValue::Null) | None => continue,
            Some(other) => other.to_string(),
        };
        let order = match order_ids.get(row) {
            Some(ColumnValue::Null) | None => continue,
            Some(id) => id.to_string(),
        };
        distinct.entry(state).or_default().insert(order);
    }

    debug!(
        "Counted orders for {} states from {} '{}' rows",
        distinct.len(),
        domestic.len(),
        country
    );
    Ok(distinct
        .into_iter()
        .map(|(state, orders)| CategoryCount::new(state, orders.len() as i64))
        .collect())
}

/// Normalize a per-state aggregate onto the 56 valid USPS codes.
///
/// Unknown codes are dropped (a data-quality filter, not an error), every
/// valid code missing from the input is added with a zero count, and the
/// result is sorted by code. Duplicate labels in the input are summed.
pub fn clean_orders_by_state(counts: &[CategoryCount]) -> Vec<CategoryCount> {
    let mut by_code: BTreeMap<&str, i64> = US_STATE_CODES.iter().map(|&c| (c, 0)).collect();
    let mut dropped = BTreeSet::new();

    for entry in counts {
        match by_code.get_mut(entry.label.as_str()) {
            Some(total) => *total += entry.count,
            None => {
                dropped.insert(entry.label.as_str());
            }
        }
    }

    if !dropped.is_empty() {
        debug!("Dropped unrecognized state codes: {:?}", dropped);
    }

    by_code
        .into_iter()
        .map(|(code, count)| CategoryCount::new(code, count))
        .collect()
}

/// Keep the `n` largest categories and fold the rest into `others_label`.
///
/// Sorting is stable and descending by count, so ties keep their input
/// order (alphabetical for the output of `clean_orders_by_state`). The
/// "Others" row is always appended, with a zero count when nothing is left
/// over; the output therefore has `min(n, len) + 1` rows.
pub fn top_n_with_others(counts: &[CategoryCount], n: usize, others_label: &str) -> Vec<CategoryCount> {
    let mut sorted = counts.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));

    let split = n.min(sorted.len());
    let others: i64 = sorted[split..].iter().map(|c| c.count).sum();
    sorted.truncate(split);
    sorted.push(CategoryCount::new(others_label, others));
    sorted
}
