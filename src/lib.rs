/// SalesTable - Order Table Transforms for Sales Dashboards
///
/// A small columnar table plus the pure transforms a shop dashboard needs:
/// PII masking, sale-date enrichment, monthly / weekday-weekend / daily
/// aggregates, per-state order counts with top-N bucketing, and declarative
/// chart specifications. Every transform returns a new value and leaves its
/// input untouched.

pub mod column;
pub mod table;
pub mod error;
pub mod config;
pub mod mask;
pub mod dates;
pub mod aggregate;
pub mod states;
pub mod chart;
pub mod dashboard;

pub use column::{Column, ColumnType, ColumnValue};
pub use table::{Schema, Table};
pub use error::{Result, TransformError};
pub use config::{ColumnRoles, DashboardConfig};
pub use mask::{mask_columns, mask_word_interiors};
pub use dates::{add_date_columns, parse_sale_date};
pub use aggregate::{
    daily_series, monthly_totals, weekpart_totals, DailyPoint, DailySeries, MonthTotal, MonthlyTotals,
    WeekPartTotals,
};
pub use states::{clean_orders_by_state, orders_by_state, top_n_with_others, CategoryCount, US_STATE_CODES};
pub use chart::{percent_shares, ChartKind, ChartPoint, ChartSpec};
pub use dashboard::{ChartView, Dashboard};
