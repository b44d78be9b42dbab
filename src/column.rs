/// SalesTable Column Implementation
///
/// A Column is an array-like random-access data container indexed by integer.
/// Each Column has a type specifying the type of every value stored, and a
/// nullability flag. Missing cells are stored as `ColumnValue::Null`.

use crate::error::{Result, TransformError};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::{self, Debug, Display};

/// Column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int64,
    Float64,
    String,
    Bool,
    Date,
    DateTime,
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int64 => "Int64",
            ColumnType::Float64 => "Float64",
            ColumnType::String => "String",
            ColumnType::Bool => "Bool",
            ColumnType::Date => "Date",
            ColumnType::DateTime => "DateTime",
        };
        f.write_str(name)
    }
}

/// Column value enum to support multiple types
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Int64(i64),
    Float64(f64),
    String(String),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ColumnValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ColumnValue::Float64(v) => Some(*v),
            ColumnValue::Int64(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            ColumnValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ColumnValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            ColumnValue::Date(d) => Some(*d),
            ColumnValue::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            ColumnValue::DateTime(dt) => Some(*dt),
            ColumnValue::Date(d) => d.and_hms_opt(0, 0, 0),
            _ => None,
        }
    }

    /// The column type this value belongs to, or None for Null.
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            ColumnValue::Int64(_) => Some(ColumnType::Int64),
            ColumnValue::Float64(_) => Some(ColumnType::Float64),
            ColumnValue::String(_) => Some(ColumnType::String),
            ColumnValue::Bool(_) => Some(ColumnType::Bool),
            ColumnValue::Date(_) => Some(ColumnType::Date),
            ColumnValue::DateTime(_) => Some(ColumnType::DateTime),
            ColumnValue::Null => None,
        }
    }

    pub(crate) fn type_name(&self) -> String {
        self.column_type()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "Null".to_string())
    }

    pub(crate) fn to_json(&self) -> serde_json::Value {
        match self {
            ColumnValue::Int64(n) => serde_json::Value::Number((*n).into()),
            ColumnValue::Float64(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ColumnValue::String(s) => serde_json::Value::String(s.clone()),
            ColumnValue::Bool(b) => serde_json::Value::Bool(*b),
            ColumnValue::Date(_) | ColumnValue::DateTime(_) => {
                serde_json::Value::String(self.to_string())
            }
            ColumnValue::Null => serde_json::Value::Null,
        }
    }
}

impl Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Int64(n) => write!(f, "{}", n),
            ColumnValue::Float64(v) => write!(f, "{}", v),
            ColumnValue::String(s) => f.write_str(s),
            ColumnValue::Bool(b) => write!(f, "{}", b),
            ColumnValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            ColumnValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            ColumnValue::Null => Ok(()),
        }
    }
}

/// A named, typed column of values.
///
/// Columns are plain owned vectors; tables clone them when a transform
/// produces a new table, so callers never observe in-place edits.
#[derive(Clone)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    nullable: bool,
    values: Vec<ColumnValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType, nullable: bool) -> Self {
        Column {
            name: name.into(),
            column_type,
            nullable,
            values: Vec::new(),
        }
    }

    /// Build a column from existing values, validating each one.
    pub fn from_values(
        name: impl Into<String>,
        column_type: ColumnType,
        nullable: bool,
        values: Vec<ColumnValue>,
    ) -> Result<Self> {
        let mut column = Column::new(name, column_type, nullable);
        column.values.reserve(values.len());
        for value in values {
            column.append(value)?;
        }
        Ok(column)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Validate value against the column type and nullability
    pub(crate) fn validate_value(&self, value: &ColumnValue) -> Result<()> {
        match value.column_type() {
            None if self.nullable => Ok(()),
            None => Err(TransformError::Schema(format!(
                "Column '{}' is not nullable",
                self.name
            ))),
            Some(t) if t == self.column_type => Ok(()),
            Some(_) => Err(TransformError::TypeMismatch {
                column: self.name.clone(),
                expected: self.column_type.to_string(),
                found: value.type_name(),
            }),
        }
    }

    pub fn get(&self, index: usize) -> Option<&ColumnValue> {
        self.values.get(index)
    }

    /// Integer access for quantity-style columns. Null cells read as None.
    pub fn get_i64(&self, index: usize) -> Result<Option<i64>> {
        match self.values.get(index) {
            Some(ColumnValue::Int64(n)) => Ok(Some(*n)),
            Some(ColumnValue::Null) | None => Ok(None),
            Some(other) => Err(TransformError::TypeMismatch {
                column: self.name.clone(),
                expected: ColumnType::Int64.to_string(),
                found: other.type_name(),
            }),
        }
    }

    /// Fast numeric access, None for null or non-numeric cells.
    #[inline]
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(|v| v.as_f64())
    }

    #[inline]
    pub fn is_null_at(&self, index: usize) -> bool {
        self.values.get(index).map_or(false, |v| v.is_null())
    }

    pub fn append(&mut self, value: ColumnValue) -> Result<()> {
        self.validate_value(&value)?;
        self.values.push(value);
        Ok(())
    }

    /// Returns a column containing the rows at `indices`, in that order.
    pub(crate) fn take(&self, indices: &[usize]) -> Column {
        Column {
            name: self.name.clone(),
            column_type: self.column_type,
            nullable: self.nullable,
            values: indices
                .iter()
                .filter_map(|&i| self.values.get(i).cloned())
                .collect(),
        }
    }

    /// Ensure every value in the column is of `expected` type (or null).
    pub fn expect_type(&self, expected: ColumnType) -> Result<()> {
        if self.column_type == expected {
            return Ok(());
        }
        // A column made only of nulls carries no type information worth rejecting.
        if self.values.iter().all(|v| v.is_null()) {
            return Ok(());
        }
        Err(TransformError::TypeMismatch {
            column: self.name.clone(),
            expected: expected.to_string(),
            found: self.column_type.to_string(),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnValue> {
        self.values.iter()
    }
}

impl Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Column {{ name: '{}', type: {:?}, nullable: {}, len: {} }}",
            self.name,
            self.column_type,
            self.nullable,
            self.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_basic() {
        let mut col = Column::new("qty", ColumnType::Int64, false);
        col.append(ColumnValue::Int64(10)).unwrap();
        col.append(ColumnValue::Int64(20)).unwrap();
        col.append(ColumnValue::Int64(30)).unwrap();

        assert_eq!(col.len(), 3);
        assert_eq!(col.get(0).unwrap().as_i64(), Some(10));
        assert_eq!(col.get(1).unwrap().as_i64(), Some(20));
        assert_eq!(col.get(2).unwrap().as_i64(), Some(30));
        assert!(col.get(3).is_none());
    }

    #[test]
    fn test_column_nullable() {
        let mut col = Column::new("qty", ColumnType::Int64, true);
        col.append(ColumnValue::Int64(10)).unwrap();
        col.append(ColumnValue::Null).unwrap();

        assert!(col.is_null_at(1));
        assert_eq!(col.get_i64(1).unwrap(), None);
        assert_eq!(col.get_i64(0).unwrap(), Some(10));
    }

    #[test]
    fn test_column_rejects_null_when_not_nullable() {
        let mut col = Column::new("qty", ColumnType::Int64, false);
        assert!(col.append(ColumnValue::Null).is_err());
        assert!(col.is_empty());
    }

    #[test]
    fn test_column_type_mismatch() {
        let mut col = Column::new("qty", ColumnType::Int64, true);
        let err = col
            .append(ColumnValue::String("three".to_string()))
            .unwrap_err();
        assert!(matches!(err, TransformError::TypeMismatch { .. }));
    }

    #[test]
    fn test_get_i64_on_string_column() {
        let col = Column::from_values(
            "qty",
            ColumnType::String,
            true,
            vec![ColumnValue::String("x".to_string())],
        )
        .unwrap();
        assert!(col.get_i64(0).is_err());
    }

    #[test]
    fn test_take_preserves_order() {
        let col = Column::from_values(
            "n",
            ColumnType::Int64,
            false,
            (0..5).map(ColumnValue::Int64).collect(),
        )
        .unwrap();
        let taken = col.take(&[4, 1]);
        assert_eq!(taken.len(), 2);
        assert_eq!(taken.get(0), Some(&ColumnValue::Int64(4)));
        assert_eq!(taken.get(1), Some(&ColumnValue::Int64(1)));
    }

    #[test]
    fn test_value_display() {
        let date = NaiveDate::from_ymd_opt(2022, 1, 5).unwrap();
        assert_eq!(ColumnValue::Date(date).to_string(), "2022-01-05");
        assert_eq!(
            ColumnValue::DateTime(date.and_hms_opt(8, 30, 0).unwrap()).to_string(),
            "2022-01-05T08:30:00"
        );
        assert_eq!(ColumnValue::Null.to_string(), "");
        assert_eq!(ColumnValue::Int64(42).to_string(), "42");
    }
}
