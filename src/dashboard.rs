/// Dashboard pipeline
///
/// `Dashboard` loads an order export once (masked and date-enriched) and
/// hands each chart an aggregate computed fresh from that snapshot.

use crate::aggregate::{daily_series, monthly_totals, weekpart_totals, DailySeries, MonthlyTotals, WeekPartTotals};
use crate::chart::{daily_line_chart, monthly_sales_chart, state_orders_chart, weekpart_chart, ChartSpec};
use crate::config::DashboardConfig;
use crate::dates::add_date_columns;
use crate::error::Result;
use crate::mask::mask_columns;
use crate::states::{clean_orders_by_state, orders_by_state, top_n_with_others, CategoryCount};
use crate::table::Table;
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use std::path::Path;

/// An aggregate together with the chart drawn from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView<T> {
    pub data: T,
    pub chart: ChartSpec,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
    orders: Table,
}

impl Dashboard {
    /// Prepare `table` for charting.
    ///
    /// With `mask` set, configured PII columns present in the table are
    /// masked; absent ones are logged and skipped. The sale-date column is
    /// then parsed into the derived calendar columns.
    pub fn load(table: &Table, config: DashboardConfig, mask: bool) -> Result<Self> {
        let prepared = if mask {
            let (present, absent): (Vec<&String>, Vec<&String>) = config
                .pii_columns
                .iter()
                .partition(|c| table.has_column(c.as_str()));
            if !absent.is_empty() {
                warn!("PII columns not found, nothing to mask: {:?}", absent);
            }
            let present: Vec<&str> = present.into_iter().map(|c| c.as_str()).collect();
            mask_columns(table, &present, config.mask_char)?
        } else {
            table.clone()
        };

        let orders = add_date_columns(&prepared, &config.columns.sale_date)?;
        info!("Dashboard ready: {} order rows", orders.len());
        Ok(Dashboard { config, orders })
    }

    /// Load the user's export (masked) or, without one, the bundled sample.
    ///
    /// The sample export ships already masked.
    pub fn open(config: DashboardConfig, upload: Option<&Path>) -> Result<Self> {
        match upload {
            Some(path) => {
                let table = Table::from_csv_path("orders", path)?;
                Self::load(&table, config, true)
            }
            None => {
                warn!("No file uploaded. Using sample data from {}", config.sample_data);
                let table = Table::from_csv_path("orders", &config.sample_data)?;
                Self::load(&table, config, false)
            }
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The masked, enriched order table.
    pub fn orders(&self) -> &Table {
        &self.orders
    }

    /// The first `preview_rows` rows for a quick look at the data.
    pub fn preview(&self) -> Table {
        self.orders.head(self.config.preview_rows)
    }

    pub fn monthly(&self) -> Result<ChartView<MonthlyTotals>> {
        let data = monthly_totals(&self.orders, &self.config.columns.quantity)?;
        let chart = monthly_sales_chart(&data);
        Ok(ChartView { data, chart })
    }

    pub fn weekpart(&self) -> Result<ChartView<WeekPartTotals>> {
        let data = weekpart_totals(&self.orders, &self.config.columns.quantity)?;
        let chart = weekpart_chart(&data);
        Ok(ChartView { data, chart })
    }

    /// Orders per state, reduced to the `top_n` largest plus "Others".
    /// `None` uses the configured default.
    pub fn states(&self, top_n: Option<usize>) -> Result<ChartView<Vec<CategoryCount>>> {
        let raw = orders_by_state(&self.orders, &self.config.columns, &self.config.domestic_country)?;
        let cleaned = clean_orders_by_state(&raw);
        let data = top_n_with_others(
            &cleaned,
            top_n.unwrap_or(self.config.top_n_states),
            &self.config.others_label,
        );
        let chart = state_orders_chart(&data);
        Ok(ChartView { data, chart })
    }

    /// Daily quantity series, optionally limited to an inclusive date range.
    pub fn daily(&self, range: Option<(NaiveDate, NaiveDate)>) -> Result<ChartView<DailySeries>> {
        let series = daily_series(&self.orders, &self.config.columns.quantity)?;
        let data = match range {
            Some((start, end)) => series.filter_range(start, end)?,
            None => series,
        };
        let chart = daily_line_chart(&data);
        Ok(ChartView { data, chart })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;

    const EXPORT: &str = "\
Sale Date,Order ID,Buyer,Full Name,Number of Items,Ship Country,Ship State
01/05/22,1001,annlee,Ann Lee,3,United States,CA
01/05/22,1001,annlee,Ann Lee,1,United States,CA
01/08/22,1002,bobk,Bob King,2,United States,TX
02/10/22,1003,cdiaz,Carla Diaz,5,United States,ZZ
02/12/22,1004,dmoe,Dee Moe,4,Canada,ON
";

    fn dashboard(mask: bool) -> Dashboard {
        let table = Table::from_csv_str("orders", EXPORT).unwrap();
        Dashboard::load(&table, DashboardConfig::default(), mask).unwrap()
    }

    #[test]
    fn test_load_masks_present_pii_columns() {
        let dash = dashboard(true);
        let orders = dash.orders();
        assert_eq!(orders.get_value(0, "Full Name").unwrap().as_string(), Some("A** L**"));
        assert_eq!(orders.get_value(0, "Buyer").unwrap().as_string(), Some("a*****"));
        assert!(orders.has_column("month"));
    }

    #[test]
    fn test_load_without_mask() {
        let dash = dashboard(false);
        assert_eq!(dash.orders().get_value(0, "Full Name").unwrap().as_string(), Some("Ann Lee"));
        assert_eq!(dash.preview().len(), 5);
    }

    #[test]
    fn test_monthly_and_weekpart() {
        let dash = dashboard(true);
        let monthly = dash.monthly().unwrap();
        assert_eq!(monthly.data.get(1), Some(6));
        assert_eq!(monthly.data.get(2), Some(9));
        assert_eq!(monthly.chart.points.len(), 12);

        // 2022-01-08 is a Saturday, 2022-02-12 too
        let weekpart = dash.weekpart().unwrap();
        assert_eq!(weekpart.data.weekend, 6);
        assert_eq!(weekpart.data.weekday, 9);
    }

    #[test]
    fn test_states_view() {
        let dash = dashboard(true);
        let states = dash.states(Some(2)).unwrap();
        assert_eq!(
            states.data,
            vec![
                CategoryCount::new("CA", 1),
                CategoryCount::new("TX", 1),
                CategoryCount::new("Others", 0),
            ]
        );

        let default_n = dash.states(None).unwrap();
        assert_eq!(default_n.data.len(), 11);
    }

    #[test]
    fn test_daily_view() {
        let dash = dashboard(true);
        let all = dash.daily(None).unwrap();
        assert_eq!(all.data.len(), 39); // 2022-01-05 ..= 2022-02-12
        assert_eq!(all.data.total(), 15);

        let start = NaiveDate::from_ymd_opt(2022, 1, 5).unwrap();
        let one_day = dash.daily(Some((start, start))).unwrap();
        assert_eq!(one_day.data.len(), 1);
        assert_eq!(one_day.data.points()[0].quantity, 4);

        let end = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        assert!(matches!(
            dash.daily(Some((start, end))),
            Err(TransformError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_load_bad_date_fails() {
        let table = Table::from_csv_str("orders", "Sale Date,Number of Items\nsoon,1\n").unwrap();
        assert!(matches!(
            Dashboard::load(&table, DashboardConfig::default(), true),
            Err(TransformError::Parse { .. })
        ));
    }

    #[test]
    fn test_open_missing_sample_is_io_error() {
        let config = DashboardConfig {
            sample_data: "/nonexistent/orders.csv".to_string(),
            ..DashboardConfig::default()
        };
        assert!(matches!(Dashboard::open(config, None), Err(TransformError::Io(_))));
    }
}
