//! For each logical column, attempts integer materialization over every
//! retained row; on any conversion failure, clears the error and restarts
//! the whole column as float, then as string. Fill-value substitution and
//! row-level masking happen in the same pass.

use log::{debug, warn};

use crate::column_store::ColumnStore;
use crate::value::{Column, Dtype, Value, Values};

/// A single fill-value rule: replace `bad` bytes with `replacement`,
/// optionally restricted to `columns` (empty means "all fill-eligible
/// columns").
#[derive(Debug, Clone)]
pub struct FillRule {
    pub bad: Vec<u8>,
    pub replacement: String,
    pub columns: Vec<String>,
}

impl FillRule {
    fn applies_to(&self, col_name: &str, fill_eligible: bool) -> bool {
        if !self.columns.is_empty() {
            self.columns.iter().any(|c| c == col_name)
        } else {
            fill_eligible
        }
    }
}

/// Materializes one column, trying int, then float, then string.
/// `target_len` is the row count to emit (already adjusted for a negative
/// `data_end`); it is clamped to the store's actual row count.
pub fn materialize_column(
    store: &ColumnStore,
    col_idx: usize,
    col_name: &str,
    target_len: usize,
    fill_rules: &[FillRule],
    fill_eligible: bool,
) -> Column {
    let actual_len = target_len.min(store.num_rows());

    for dtype in [Dtype::Int, Dtype::Float, Dtype::Str] {
        if let Some(column) =
            try_materialize(store, col_idx, col_name, actual_len, dtype, fill_rules, fill_eligible)
        {
            return column;
        }
        debug!(
            "column '{col_name}' failed {dtype:?} materialization, falling back"
        );
    }
    unreachable!("string materialization never fails")
}

fn try_materialize(
    store: &ColumnStore,
    col_idx: usize,
    col_name: &str,
    actual_len: usize,
    dtype: Dtype,
    fill_rules: &[FillRule],
    fill_eligible: bool,
) -> Option<Column> {
    let mut iter = store.iter(col_idx);
    let mut mask = Vec::with_capacity(actual_len);
    let mut any_masked = false;

    let mut ints = Vec::new();
    let mut floats = Vec::new();
    let mut strings = Vec::new();

    for _ in 0..actual_len {
        let raw = iter.next_field()?;
        let rule = fill_rules
            .iter()
            .find(|r| r.bad == raw && r.applies_to(col_name, fill_eligible));

        let bytes_to_parse: &[u8] = match rule {
            Some(r) => r.replacement.as_bytes(),
            None => raw,
        };

        let value = match Value::from_bytes_with_templ(bytes_to_parse, dtype).ok()? {
            Some(v) => v,
            None if dtype == Dtype::Str => Value::Str(Default::default()),
            None => return None,
        };

        if rule.is_some() {
            any_masked = true;
            warn!("fill value substituted in column '{col_name}'");
        }
        mask.push(rule.is_some());

        match value {
            Value::Int(i) => ints.push(i),
            Value::Float(f) => floats.push(f),
            Value::Str(s) => strings.push(s),
        }
    }

    let values = match dtype {
        Dtype::Int => Values::Ints(ints),
        Dtype::Float => Values::Floats(floats),
        Dtype::Str => Values::Strings(strings),
    };

    Some(if any_masked {
        Column::Masked { values, mask }
    } else {
        Column::Dense(values)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_from_rows(rows: &[&[&[u8]]]) -> ColumnStore {
        let num_cols = rows[0].len();
        let mut store = ColumnStore::new(num_cols, 64);
        for row in rows {
            for (c, field) in row.iter().enumerate() {
                store.commit_field(c, field);
            }
            store.finish_row();
        }
        store
    }

    #[test]
    fn scenario_1_all_int_column() {
        let store = store_from_rows(&[&[b"1".as_slice()], &[b"4".as_slice()]]);
        let col = materialize_column(&store, 0, "A", 2, &[], false);
        assert_eq!(Column::Dense(Values::Ints(vec![1, 4])), col);
    }

    #[test]
    fn scenario_2_int_then_string_fallback() {
        let store = store_from_rows(&[&[b"1".as_slice()], &[b"foo".as_slice()]]);
        let col = materialize_column(&store, 0, "y", 2, &[], false);
        assert_eq!(
            Column::Dense(Values::Strings(vec!["1".into(), "foo".into()])),
            col
        );
    }

    #[test]
    fn int_then_float_fallback() {
        let store = store_from_rows(&[&[b"1".as_slice()], &[b"2.5".as_slice()]]);
        let col = materialize_column(&store, 0, "y", 2, &[], false);
        assert_eq!(Column::Dense(Values::Floats(vec![1.0, 2.5])), col);
    }

    #[test]
    fn scenario_3_fill_value_masks_row() {
        let store = store_from_rows(&[&[b"".as_slice()], &[b"3".as_slice()]]);
        let fills = vec![FillRule {
            bad: b"".to_vec(),
            replacement: "99".to_string(),
            columns: vec!["b".to_string()],
        }];
        let col = materialize_column(&store, 0, "b", 2, &fills, false);
        assert_eq!(
            Column::Masked {
                values: Values::Ints(vec![99, 3]),
                mask: vec![true, false],
            },
            col
        );
    }

    #[test]
    fn fill_rule_without_column_restriction_needs_fill_eligible() {
        let store = store_from_rows(&[&[b"".as_slice()]]);
        let fills = vec![FillRule {
            bad: b"".to_vec(),
            replacement: "0".to_string(),
            columns: vec![],
        }];
        let ineligible = materialize_column(&store, 0, "b", 1, &fills, false);
        assert_eq!(Column::Dense(Values::Strings(vec!["".into()])), ineligible);

        let eligible = materialize_column(&store, 0, "b", 1, &fills, true);
        assert_eq!(
            Column::Masked {
                values: Values::Ints(vec![0]),
                mask: vec![true],
            },
            eligible
        );
    }

    #[test]
    fn unmatched_empty_field_forces_string_fallback() {
        let store = store_from_rows(&[&[b"1".as_slice()], &[b"".as_slice()]]);
        let col = materialize_column(&store, 0, "a", 2, &[], false);
        assert_eq!(
            Column::Dense(Values::Strings(vec!["1".into(), "".into()])),
            col
        );
    }

    #[test]
    fn target_len_is_clamped_to_a_negative_data_end_adjustment() {
        let store = store_from_rows(&[&[b"1".as_slice()], &[b"2".as_slice()], &[b"3".as_slice()]]);
        // caller already subtracted the trailing row for data_end = -1
        let col = materialize_column(&store, 0, "a", 2, &[], false);
        assert_eq!(Column::Dense(Values::Ints(vec![1, 2])), col);
    }
}
