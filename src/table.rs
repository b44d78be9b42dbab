/// SalesTable Table Implementation
///
/// A Table is a collection of equally long columns described by a schema.
/// Every transform in this crate takes a `&Table` and returns a new `Table`
/// (or an aggregate), so one loaded order table can feed several charts
/// without any of them seeing another's edits.
///
/// # Examples
///
/// ```
/// use salestable::{Table, Schema, ColumnType, ColumnValue};
/// use std::collections::HashMap;
///
/// let schema = Schema::new(vec![
///     ("Order ID".to_string(), ColumnType::Int64, false),
///     ("Ship State".to_string(), ColumnType::String, true),
/// ]);
///
/// let mut table = Table::new("orders".to_string(), schema);
///
/// let mut row = HashMap::new();
/// row.insert("Order ID".to_string(), ColumnValue::Int64(1001));
/// row.insert("Ship State".to_string(), ColumnValue::String("CA".to_string()));
/// table.append_row(row).unwrap();
///
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.get_value(0, "Ship State").unwrap().as_string(), Some("CA"));
/// ```

use crate::column::{Column, ColumnType, ColumnValue};
use crate::error::{Result, TransformError};
use log::debug;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Schema definition with column names and types.
///
/// # Examples
///
/// ```
/// use salestable::{Schema, ColumnType};
///
/// let schema = Schema::new(vec![
///     ("Sale Date".to_string(), ColumnType::String, false),
///     ("Number of Items".to_string(), ColumnType::Int64, false),
///     ("Ship State".to_string(), ColumnType::String, true),
/// ]);
///
/// assert_eq!(schema.len(), 3);
/// assert_eq!(schema.get_column_index("Number of Items"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<(String, ColumnType, bool)>, // (name, type, nullable)
}

impl Schema {
    /// Creates a new schema from (column_name, column_type, is_nullable) tuples.
    pub fn new(columns: Vec<(String, ColumnType, bool)>) -> Self {
        Schema { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _, _)| name.as_str()).collect()
    }

    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|(n, _, _)| n == name)
    }

    /// Returns a tuple of (name, type, nullable) or None if index is out of bounds.
    pub fn get_column_info(&self, index: usize) -> Option<(&str, ColumnType, bool)> {
        self.columns
            .get(index)
            .map(|(name, ty, nullable)| (name.as_str(), *ty, *nullable))
    }

    pub fn get_column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, ty, _)| *ty)
    }

    pub fn is_column_nullable(&self, name: &str) -> Option<bool> {
        self.columns
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, _, nullable)| *nullable)
    }

    fn from_columns(columns: &[Column]) -> Self {
        Schema {
            columns: columns
                .iter()
                .map(|c| (c.name().to_string(), c.column_type(), c.is_nullable()))
                .collect(),
        }
    }
}

/// Root table owning its data.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    schema: Schema,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Create a new, empty table.
    pub fn new(name: String, schema: Schema) -> Self {
        let columns = schema
            .columns
            .iter()
            .map(|(col_name, col_type, nullable)| Column::new(col_name.clone(), *col_type, *nullable))
            .collect();

        Table {
            name,
            schema,
            columns,
            row_count: 0,
        }
    }

    /// Assemble a table from prebuilt columns of equal length.
    pub fn from_columns(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map_or(0, |c| c.len());
        if let Some(bad) = columns.iter().find(|c| c.len() != row_count) {
            return Err(TransformError::Schema(format!(
                "Column '{}' has {} rows, expected {}",
                bad.name(),
                bad.len(),
                row_count
            )));
        }

        Ok(Table {
            name: name.into(),
            schema: Schema::from_columns(&columns),
            columns,
            row_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.schema.get_column_index(name).is_some()
    }

    /// Look up a column by name, failing with `MissingColumn`.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.schema
            .get_column_index(name)
            .map(|idx| &self.columns[idx])
            .ok_or_else(|| TransformError::missing(name))
    }

    pub fn get_value(&self, row: usize, column: &str) -> Result<ColumnValue> {
        let col = self.column(column)?;
        col.get(row).cloned().ok_or_else(|| {
            TransformError::Schema(format!("Row {} out of range [0, {})", row, self.row_count))
        })
    }

    pub fn get_row(&self, row: usize) -> Result<HashMap<String, ColumnValue>> {
        if row >= self.row_count {
            return Err(TransformError::Schema(format!(
                "Row {} out of range [0, {})",
                row, self.row_count
            )));
        }

        Ok(self
            .columns
            .iter()
            .filter_map(|col| col.get(row).map(|v| (col.name().to_string(), v.clone())))
            .collect())
    }

    pub fn append_row(&mut self, row: HashMap<String, ColumnValue>) -> Result<()> {
        // Validate all columns are present
        for col_name in self.schema.get_column_names() {
            if !row.contains_key(col_name) {
                return Err(TransformError::Schema(format!(
                    "Missing value for column '{}'",
                    col_name
                )));
            }
        }

        // Validate every value before touching any column so a bad row
        // leaves the table unchanged.
        for col in &self.columns {
            col.validate_value(&row[col.name()])?;
        }

        for col in self.columns.iter_mut() {
            let value = row[col.name()].clone();
            col.append(value)?;
        }
        self.row_count += 1;

        Ok(())
    }

    pub fn iter_rows(&self) -> TableRowIterator<'_> {
        TableRowIterator {
            table: self,
            index: 0,
        }
    }

    /// New table holding the rows at `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        let columns: Vec<Column> = self.columns.iter().map(|c| c.take(indices)).collect();
        Table {
            name: self.name.clone(),
            schema: self.schema.clone(),
            row_count: columns.first().map_or(0, |c| c.len()),
            columns,
        }
    }

    /// New table holding the rows for which `predicate(row_index)` is true.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Table
    where
        F: FnMut(usize) -> bool,
    {
        let indices: Vec<usize> = (0..self.row_count).filter(|&i| predicate(i)).collect();
        self.select_rows(&indices)
    }

    /// The first `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> Table {
        let indices: Vec<usize> = (0..self.row_count.min(n)).collect();
        self.select_rows(&indices)
    }

    /// Returns a new table with `column` appended, or replacing the column
    /// of the same name in place.
    pub fn with_column(&self, column: Column) -> Result<Table> {
        if !self.columns.is_empty() && column.len() != self.row_count {
            return Err(TransformError::Schema(format!(
                "Column '{}' has {} rows, table '{}' has {}",
                column.name(),
                column.len(),
                self.name,
                self.row_count
            )));
        }

        let mut columns = self.columns.clone();
        match self.schema.get_column_index(column.name()) {
            Some(idx) => columns[idx] = column,
            None => columns.push(column),
        }
        Table::from_columns(self.name.clone(), columns)
    }

    /// Returns a new table where column `name` is rebuilt cell by cell.
    pub fn map_column<F>(
        &self,
        name: &str,
        column_type: ColumnType,
        nullable: bool,
        mut f: F,
    ) -> Result<Table>
    where
        F: FnMut(&ColumnValue) -> ColumnValue,
    {
        let source = self.column(name)?;
        let values = source.iter().map(|v| f(v)).collect();
        let mapped = Column::from_values(name, column_type, nullable, values)?;
        self.with_column(mapped)
    }

    /// Sum of all numeric values in a column. NULL values are skipped.
    pub fn sum(&self, column: &str) -> Result<f64> {
        let col = self.column(column)?;
        Ok((0..self.row_count).filter_map(|i| col.get_f64(i)).sum())
    }

    // ========================================================================
    // CSV ingestion
    // ========================================================================

    /// Create a table from CSV text.
    ///
    /// The first record is the header. Column types are inferred from every
    /// non-empty cell of the column:
    /// - all cells parse as i64 → INT64
    /// - all cells parse as f64 → FLOAT64
    /// - all cells are "true"/"false" (case-insensitive) → BOOL
    /// - anything else → STRING
    ///
    /// Empty cells become NULL and all columns are nullable.
    ///
    /// # Example
    ///
    /// ```
    /// use salestable::{Table, ColumnType};
    ///
    /// let csv = "Sale Date,Number of Items,Ship State\n01/05/22,3,CA\n01/06/22,,TX\n";
    /// let table = Table::from_csv_str("orders", csv).unwrap();
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.schema().get_column_type("Number of Items"), Some(ColumnType::Int64));
    /// assert!(table.get_value(1, "Number of Items").unwrap().is_null());
    /// ```
    pub fn from_csv_str(name: &str, csv: &str) -> Result<Table> {
        Self::from_csv_reader(name, csv.as_bytes())
    }

    pub fn from_csv_path(name: &str, path: impl AsRef<Path>) -> Result<Table> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(name, file)
    }

    pub fn from_csv_reader<R: Read>(name: &str, reader: R) -> Result<Table> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let column_names: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        if column_names.is_empty() || column_names.iter().all(|h| h.is_empty()) {
            return Err(TransformError::Schema("CSV header is empty".to_string()));
        }

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); column_names.len()];
        for record in rdr.records() {
            let record = record?;
            // Skip fully blank lines
            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            for (i, field) in record.iter().enumerate() {
                cells[i].push(field.to_string());
            }
        }

        let columns = column_names
            .into_iter()
            .zip(cells)
            .map(|(col_name, raw)| build_csv_column(col_name, &raw))
            .collect::<Result<Vec<_>>>()?;

        let table = Table::from_columns(name, columns)?;
        debug!(
            "Loaded table '{}' from CSV: {} rows x {} columns",
            table.name(),
            table.len(),
            table.schema().len()
        );
        Ok(table)
    }

    /// Export table to JSON format (array of objects).
    pub fn to_json(&self) -> Result<String> {
        let column_names = self.schema.get_column_names();
        let rows: Vec<serde_json::Value> = (0..self.row_count)
            .map(|row| {
                let obj: serde_json::Map<String, serde_json::Value> = column_names
                    .iter()
                    .zip(&self.columns)
                    .map(|(name, col)| {
                        let value = col.get(row).map_or(serde_json::Value::Null, |v| v.to_json());
                        (name.to_string(), value)
                    })
                    .collect();
                serde_json::Value::Object(obj)
            })
            .collect();

        Ok(serde_json::to_string_pretty(&rows)?)
    }
}

// ============================================================================
// Helper functions for CSV ingestion
// ============================================================================

fn infer_csv_type(raw: &[String]) -> ColumnType {
    let present: Vec<&str> = raw
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if present.is_empty() {
        return ColumnType::String;
    }
    if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        ColumnType::Int64
    } else if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        ColumnType::Float64
    } else if present
        .iter()
        .all(|s| s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false"))
    {
        ColumnType::Bool
    } else {
        ColumnType::String
    }
}

fn parse_csv_cell(raw: &str, column_type: ColumnType) -> ColumnValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ColumnValue::Null;
    }
    // The type was inferred from these very cells, so the parses below succeed.
    match column_type {
        ColumnType::Int64 => trimmed.parse::<i64>().map_or(ColumnValue::Null, ColumnValue::Int64),
        ColumnType::Float64 => trimmed.parse::<f64>().map_or(ColumnValue::Null, ColumnValue::Float64),
        ColumnType::Bool => ColumnValue::Bool(trimmed.eq_ignore_ascii_case("true")),
        _ => ColumnValue::String(raw.to_string()),
    }
}

fn build_csv_column(name: String, raw: &[String]) -> Result<Column> {
    let column_type = infer_csv_type(raw);
    let values = raw.iter().map(|s| parse_csv_cell(s, column_type)).collect();
    Column::from_values(name, column_type, true, values)
}

pub struct TableRowIterator<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Iterator for TableRowIterator<'a> {
    type Item = HashMap<String, ColumnValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.table.len() {
            None
        } else {
            let result = self.table.get_row(self.index).ok();
            self.index += 1;
            result
        }
    }
}
