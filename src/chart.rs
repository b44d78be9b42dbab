/// Declarative chart specifications
///
/// Chart builders turn aggregates into a serializable `ChartSpec`; drawing
/// is left to whatever front end consumes the JSON.

use crate::aggregate::{DailySeries, MonthlyTotals, WeekPartTotals, DATE, SOLD_ITEMS, TOTAL_QUANTITY_SOLD};
use crate::states::CategoryCount;
use serde::Serialize;

/// Above this many bars, percentage labels are drawn vertically.
const VERTICAL_LABEL_THRESHOLD: usize = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub points: Vec<ChartPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_font_size: Option<f64>,
    /// Annotation rotation in degrees.
    pub label_rotation: u32,
}

impl ChartSpec {
    fn new(kind: ChartKind, title: impl Into<String>, points: Vec<ChartPoint>) -> Self {
        ChartSpec {
            kind,
            title: title.into(),
            x_label: None,
            y_label: None,
            points,
            width: None,
            height: None,
            label_font_size: None,
            label_rotation: 0,
        }
    }

    fn axes(mut self, x: &str, y: &str) -> Self {
        self.x_label = Some(x.to_string());
        self.y_label = Some(y.to_string());
        self
    }

    pub fn total(&self) -> i64 {
        self.points.iter().map(|p| p.value).sum()
    }
}

/// Each value's share of the total, in percent, rounded to one decimal.
///
/// A zero total yields 0.0 for every bucket.
///
/// ```
/// use salestable::chart::percent_shares;
///
/// assert_eq!(percent_shares(&[1, 3]), vec![25.0, 75.0]);
/// assert_eq!(percent_shares(&[0, 0]), vec![0.0, 0.0]);
/// ```
pub fn percent_shares(values: &[i64]) -> Vec<f64> {
    let total: i64 = values.iter().sum();
    values
        .iter()
        .map(|&v| {
            if total == 0 {
                0.0
            } else {
                (v as f64 / total as f64 * 1000.0).round() / 10.0
            }
        })
        .collect()
}

pub fn format_percent(share: f64) -> String {
    format!("{:.1}%", share)
}

fn annotated_points<I>(items: I, annotate: impl Fn(i64, f64) -> String) -> Vec<ChartPoint>
where
    I: IntoIterator<Item = (String, i64)>,
{
    let items: Vec<(String, i64)> = items.into_iter().collect();
    let values: Vec<i64> = items.iter().map(|(_, v)| *v).collect();
    items
        .into_iter()
        .zip(percent_shares(&values))
        .map(|((label, value), share)| ChartPoint {
            label,
            value,
            annotation: Some(annotate(value, share)),
        })
        .collect()
}

/// Bar chart of items sold per month, each bar labelled with its share of the year.
pub fn monthly_sales_chart(monthly: &MonthlyTotals) -> ChartSpec {
    let points = annotated_points(
        monthly.rows().iter().map(|r| (r.month.to_string(), r.quantity)),
        |_, share| format_percent(share),
    );
    ChartSpec::new(ChartKind::Bar, "Monthly Sales", points).axes("Month", SOLD_ITEMS)
}

/// Pie chart of weekday against weekend sales, labelled "pct (count)".
pub fn weekpart_chart(totals: &WeekPartTotals) -> ChartSpec {
    let points = annotated_points(
        totals.buckets().iter().map(|(label, n)| (label.to_string(), *n)),
        |value, share| format!("{} ({})", format_percent(share), value),
    );
    ChartSpec::new(ChartKind::Pie, "Number of Sales by Weekday/Weekend", points)
}

/// Bar chart of orders per state, largest first, with percentage labels.
pub fn state_orders_chart(counts: &[CategoryCount]) -> ChartSpec {
    let mut sorted = counts.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    let bars = sorted.len();

    let points = annotated_points(
        sorted.into_iter().map(|c| (c.label, c.count)),
        |_, share| format_percent(share),
    );
    let mut spec =
        ChartSpec::new(ChartKind::Bar, "Number of Orders by State", points).axes("State", "Number of Orders");
    if bars > 0 {
        spec.label_font_size = Some(15.0 / bars as f64 + 5.0);
    }
    if bars > VERTICAL_LABEL_THRESHOLD {
        spec.label_rotation = 90;
    }
    spec
}

/// Line chart of the daily series.
pub fn daily_line_chart(series: &DailySeries) -> ChartSpec {
    let points = series
        .points()
        .iter()
        .map(|p| ChartPoint {
            label: p.date.format("%Y-%m-%d").to_string(),
            value: p.quantity,
            annotation: None,
        })
        .collect();
    let mut spec = ChartSpec::new(
        ChartKind::Line,
        format!("{} by {}", TOTAL_QUANTITY_SOLD, DATE),
        points,
    )
    .axes(DATE, TOTAL_QUANTITY_SOLD);
    spec.width = Some(700);
    spec.height = Some(450);
    spec
}
