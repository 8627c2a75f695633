//! Top-level orchestration: configure → header tokenize → column
//! filtering into a use-mask → body tokenize → per-column materialize.
//! Synchronous, single buffer in, one typed/masked column map out.

use std::collections::HashMap;

use log::trace;

use crate::config::{ReaderConfig, ReaderConfigBuilder};
use crate::errors::{ConfigError, Result};
use crate::materializer::materialize_column;
use crate::tokenizer::Tokenizer;
use crate::value::Column;

pub struct Reader {
    cfg: ReaderConfig,
    tokenizer: Tokenizer,
}

impl Reader {
    pub fn new(cfg: ReaderConfig) -> Self {
        let tokenizer = Tokenizer::new(cfg.tokenizer);
        Reader { cfg, tokenizer }
    }

    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::new()
    }

    /// Reads `input` (a contiguous, 8-bit-clean byte buffer with exactly
    /// one trailing newline) into a column-name-to-`Column` map.
    pub fn read(&self, input: &[u8]) -> Result<HashMap<String, Column>> {
        let names = self.resolve_names(input)?;
        let num_cols = names.len();

        let use_cols_mask = self.resolve_use_cols_mask(&names)?;

        let end_line = match self.cfg.data_end {
            Some(n) if n >= 0 => Some(n as usize),
            _ => None,
        };
        let store = self.tokenizer.tokenize_body(
            input,
            self.cfg.data_start,
            end_line,
            num_cols,
            &use_cols_mask,
        )?;

        let target_len = match self.cfg.data_end {
            Some(n) if n < 0 => store.num_rows().saturating_sub((-n) as usize),
            _ => store.num_rows(),
        };

        let fill_eligible_names = self.resolve_fill_eligible_names(&names)?;

        let mut out = HashMap::with_capacity(num_cols);
        for (i, name) in names.iter().enumerate() {
            if !use_cols_mask[i] {
                continue;
            }
            let fill_eligible = fill_eligible_names.contains(name);
            let column = materialize_column(
                &store,
                i,
                name,
                target_len,
                &self.cfg.fill_values,
                fill_eligible,
            );
            out.insert(name.clone(), column);
        }
        Ok(out)
    }

    fn resolve_names(&self, input: &[u8]) -> Result<Vec<String>> {
        if let Some(names) = &self.cfg.names {
            return Ok(names.clone());
        }
        if let Some(header_start) = self.cfg.header_start {
            trace!("tokenizing header row at line {header_start}");
            return self.tokenizer.tokenize_header(input, header_start);
        }
        trace!("no header configured, auto-generating column names from first data row width");
        let width_probe = self.tokenizer.tokenize_header(input, self.cfg.data_start)?;
        Ok((1..=width_probe.len()).map(|n| format!("col{n}")).collect())
    }

    fn resolve_use_cols_mask(&self, names: &[String]) -> Result<Vec<bool>> {
        let mut mask = vec![true; names.len()];

        if let Some(include) = &self.cfg.include_names {
            for n in include {
                if !names.contains(n) {
                    return Err(ConfigError::UnknownColumnName {
                        name: n.clone(),
                        context: "include_names",
                    }
                    .into());
                }
            }
            for (i, name) in names.iter().enumerate() {
                mask[i] = include.contains(name);
            }
        }
        if let Some(exclude) = &self.cfg.exclude_names {
            for n in exclude {
                if !names.contains(n) {
                    return Err(ConfigError::UnknownColumnName {
                        name: n.clone(),
                        context: "exclude_names",
                    }
                    .into());
                }
            }
            for (i, name) in names.iter().enumerate() {
                if exclude.contains(name) {
                    mask[i] = false;
                }
            }
        }
        trace!("use_cols_mask resolved to {mask:?}");
        Ok(mask)
    }

    fn resolve_fill_eligible_names(&self, names: &[String]) -> Result<std::collections::HashSet<String>> {
        let mut eligible: std::collections::HashSet<String> = names.iter().cloned().collect();
        if let Some(include) = &self.cfg.fill_include_names {
            for n in include {
                if !names.contains(n) {
                    return Err(ConfigError::UnknownColumnName {
                        name: n.clone(),
                        context: "fill_include_names",
                    }
                    .into());
                }
            }
            eligible.retain(|n| include.contains(n));
        }
        if let Some(exclude) = &self.cfg.fill_exclude_names {
            for n in exclude {
                if !names.contains(n) {
                    return Err(ConfigError::UnknownColumnName {
                        name: n.clone(),
                        context: "fill_exclude_names",
                    }
                    .into());
                }
            }
            eligible.retain(|n| !exclude.contains(n));
        }
        Ok(eligible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Values;

    fn reader_with(cfg: ReaderConfig) -> Reader {
        Reader::new(cfg)
    }

    #[test]
    fn scenario_1_basic_read() {
        let cfg = Reader::builder().header_start(Some(0)).data_start(1).build();
        let reader = reader_with(cfg);
        let out = reader.read(b"A,B,C\n1,2,3\n4,5,6\n").unwrap();
        assert_eq!(
            &Column::Dense(Values::Ints(vec![1, 4])),
            out.get("A").unwrap()
        );
        assert_eq!(
            &Column::Dense(Values::Ints(vec![3, 6])),
            out.get("C").unwrap()
        );
    }

    #[test]
    fn scenario_2_type_fallback_per_column() {
        let cfg = Reader::builder().header_start(Some(0)).data_start(1).build();
        let reader = reader_with(cfg);
        let out = reader.read(b"x,y\n1,2.5\n3,foo\n").unwrap();
        assert_eq!(
            &Column::Dense(Values::Ints(vec![1, 3])),
            out.get("x").unwrap()
        );
        assert_eq!(
            &Column::Dense(Values::Strings(vec!["2.5".into(), "foo".into()])),
            out.get("y").unwrap()
        );
    }

    #[test]
    fn scenario_3_fill_values_with_masking() {
        let cfg = Reader::builder()
            .header_start(Some(0))
            .data_start(1)
            .fill_value(b"".to_vec(), "99".to_string(), vec!["b".to_string()])
            .build();
        let reader = reader_with(cfg);
        let out = reader.read(b"a,b\n1,\n2,3\n").unwrap();
        assert_eq!(
            &Column::Masked {
                values: Values::Ints(vec![99, 3]),
                mask: vec![true, false],
            },
            out.get("b").unwrap()
        );
    }

    #[test]
    fn scenario_4_comment_skipped_before_header_counting() {
        let cfg = Reader::builder()
            .comment(b'#')
            .header_start(Some(0))
            .data_start(1)
            .build();
        let reader = reader_with(cfg);
        let out = reader.read(b"#hello\nA,B\n1,2\n").unwrap();
        assert!(out.contains_key("A"));
        assert!(out.contains_key("B"));
    }

    #[test]
    fn scenario_5_quoted_embedded_delimiter() {
        let cfg = Reader::builder().header_start(Some(0)).data_start(1).build();
        let reader = reader_with(cfg);
        let out = reader.read(b"A,B\n\"hello,world\",1\n").unwrap();
        assert_eq!(
            &Column::Dense(Values::Strings(vec!["hello,world".into()])),
            out.get("A").unwrap()
        );
        assert_eq!(
            &Column::Dense(Values::Ints(vec![1])),
            out.get("B").unwrap()
        );
    }

    #[test]
    fn scenario_6_ragged_row_without_fill_extra_cols_errors() {
        let cfg = Reader::builder().header_start(Some(0)).data_start(1).build();
        let reader = reader_with(cfg);
        let err = reader.read(b"A,B,C\n1,2\n").unwrap_err();
        assert!(err.to_string().contains("not enough columns"));
    }

    #[test]
    fn auto_generated_names_when_no_header() {
        let cfg = Reader::builder().header_start(None).data_start(0).build();
        let reader = reader_with(cfg);
        let out = reader.read(b"1,2,3\n4,5,6\n").unwrap();
        assert!(out.contains_key("col1"));
        assert!(out.contains_key("col2"));
        assert!(out.contains_key("col3"));
    }

    #[test]
    fn include_names_filters_output_columns() {
        let cfg = Reader::builder()
            .header_start(Some(0))
            .data_start(1)
            .include_names(vec!["A".to_string()])
            .build();
        let reader = reader_with(cfg);
        let out = reader.read(b"A,B\n1,2\n").unwrap();
        assert!(out.contains_key("A"));
        assert!(!out.contains_key("B"));
    }

    #[test]
    fn negative_data_end_truncates_trailing_rows_during_materialization() {
        let cfg = Reader::builder()
            .header_start(Some(0))
            .data_start(1)
            .data_end(Some(-1))
            .build();
        let reader = reader_with(cfg);
        let out = reader.read(b"A\n1\n2\n3\n").unwrap();
        assert_eq!(&Column::Dense(Values::Ints(vec![1, 2])), out.get("A").unwrap());
    }
}
