/// PII masking
///
/// Every word character that follows another word character is replaced
/// by the mask character, so "Ann Lee" becomes "A** L**". Word characters
/// are alphanumerics and `_`; anything else (spaces, punctuation) is kept
/// and starts a new word.

use crate::column::{ColumnType, ColumnValue};
use crate::error::Result;
use crate::table::Table;
use log::debug;

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Mask all but the first character of each word in `text`.
///
/// ```
/// use salestable::mask::mask_word_interiors;
///
/// assert_eq!(mask_word_interiors("Ann", '*'), "A**");
/// assert_eq!(mask_word_interiors("Mary-Jo O'Neil", '*'), "M***-J* O'N***");
/// ```
pub fn mask_word_interiors(text: &str, mask: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_word = false;
    for c in text.chars() {
        let word = is_word_char(c);
        out.push(if word && prev_word { mask } else { c });
        prev_word = word;
    }
    out
}

/// Returns a new table with the named columns masked.
///
/// String cells are masked; every other cell (numbers, nulls) becomes NULL.
/// Masked columns are nullable String columns afterwards. The input table
/// is left untouched.
pub fn mask_columns<S: AsRef<str>>(table: &Table, columns: &[S], mask: char) -> Result<Table> {
    let mut masked = table.clone();
    for name in columns {
        masked = masked.map_column(name.as_ref(), ColumnType::String, true, |value| match value {
            ColumnValue::String(s) => ColumnValue::String(mask_word_interiors(s, mask)),
            _ => ColumnValue::Null,
        })?;
    }
    debug!("Masked {} column(s) in table '{}'", columns.len(), table.name());
    Ok(masked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::error::TransformError;

    #[test]
    fn test_mask_basic() {
        assert_eq!(mask_word_interiors("Ann", '*'), "A**");
        assert_eq!(mask_word_interiors("John Smith", '*'), "J*** S****");
    }

    #[test]
    fn test_mask_short_values() {
        assert_eq!(mask_word_interiors("", '*'), "");
        assert_eq!(mask_word_interiors("J", '*'), "J");
        assert_eq!(mask_word_interiors("J. R.", '*'), "J. R.");
    }

    #[test]
    fn test_mask_digits_and_punctuation() {
        assert_eq!(mask_word_interiors("user_1234", '*'), "u********");
        assert_eq!(mask_word_interiors("a.b.c", '*'), "a.b.c");
        assert_eq!(mask_word_interiors("  lead", '#'), "  l###");
    }

    #[test]
    fn test_mask_unicode() {
        assert_eq!(mask_word_interiors("Zoë Åsa", '*'), "Z** Å**");
    }

    fn buyers() -> Table {
        let names = Column::from_values(
            "Full Name",
            ColumnType::String,
            true,
            vec![
                ColumnValue::String("Ann Lee".to_string()),
                ColumnValue::Null,
                ColumnValue::String("B".to_string()),
            ],
        )
        .unwrap();
        let ids = Column::from_values(
            "Buyer User ID",
            ColumnType::Int64,
            false,
            vec![
                ColumnValue::Int64(77),
                ColumnValue::Int64(78),
                ColumnValue::Int64(79),
            ],
        )
        .unwrap();
        let qty = Column::from_values(
            "Number of Items",
            ColumnType::Int64,
            false,
            vec![ColumnValue::Int64(1), ColumnValue::Int64(2), ColumnValue::Int64(3)],
        )
        .unwrap();
        Table::from_columns("orders", vec![names, ids, qty]).unwrap()
    }

    #[test]
    fn test_mask_columns() {
        let table = buyers();
        let masked = mask_columns(&table, &["Full Name", "Buyer User ID"], '*').unwrap();

        assert_eq!(masked.get_value(0, "Full Name").unwrap().as_string(), Some("A** L**"));
        assert!(masked.get_value(1, "Full Name").unwrap().is_null());
        assert_eq!(masked.get_value(2, "Full Name").unwrap().as_string(), Some("B"));

        // Non-string ids become missing markers
        assert!(masked.get_value(0, "Buyer User ID").unwrap().is_null());
        assert_eq!(
            masked.schema().get_column_type("Buyer User ID"),
            Some(ColumnType::String)
        );

        // Unnamed columns are untouched
        assert_eq!(masked.get_value(2, "Number of Items").unwrap().as_i64(), Some(3));
    }

    #[test]
    fn test_mask_columns_does_not_mutate_input() {
        let table = buyers();
        let _ = mask_columns(&table, &["Full Name"], '*').unwrap();
        assert_eq!(table.get_value(0, "Full Name").unwrap().as_string(), Some("Ann Lee"));
        assert_eq!(table.get_value(0, "Buyer User ID").unwrap().as_i64(), Some(77));
    }

    #[test]
    fn test_mask_columns_missing_column() {
        let err = mask_columns(&buyers(), &["Last Name"], '*').unwrap_err();
        assert!(matches!(err, TransformError::MissingColumn { .. }));
    }
}
