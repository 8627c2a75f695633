//! The byte-buffer tokenizer state machine. A single linear scan produces
//! either the header names (header mode) or a column-major [`ColumnStore`]
//! (body mode). The same [`Tokenizer`] instance (it owns only immutable
//! configuration) is used for both passes, each always re-scanning the
//! input from byte 0.

use crate::column_store::ColumnStore;
use crate::errors::{ConfigError, Result, TokenizerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerConfig {
    pub delimiter: u8,
    pub comment: Option<u8>,
    pub quotechar: Option<u8>,
    pub fill_extra_cols: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        TokenizerConfig {
            delimiter: b',',
            comment: None,
            quotechar: Some(b'"'),
            fill_extra_cols: false,
        }
    }
}

enum State {
    StartLine,
    StartField,
    StartQuotedField,
    Field,
    QuotedField,
    QuotedFieldNewline,
    Comment,
}

/// Where committed fields go. Header mode and body mode differ only in
/// this sink, the state transitions driving it are identical, satisfying
/// the "header mode uses identical transitions" requirement.
trait FieldSink {
    fn commit(&mut self, col: usize, bytes: &[u8]);
    fn end_row(&mut self);
}

struct HeaderSink {
    fields: Vec<String>,
}
impl FieldSink for HeaderSink {
    fn commit(&mut self, _col: usize, bytes: &[u8]) {
        self.fields.push(String::from_utf8_lossy(bytes).into_owned());
    }
    fn end_row(&mut self) {}
}

struct BodySink<'a> {
    store: &'a mut ColumnStore,
    use_cols_mask: &'a [bool],
}
impl<'a> FieldSink for BodySink<'a> {
    fn commit(&mut self, col: usize, bytes: &[u8]) {
        if self.use_cols_mask[col] {
            self.store.commit_field(col, bytes);
        }
    }
    fn end_row(&mut self) {
        self.store.finish_row();
    }
}

pub struct Tokenizer {
    cfg: TokenizerConfig,
}

impl Tokenizer {
    pub fn new(cfg: TokenizerConfig) -> Self {
        Tokenizer { cfg }
    }

    /// Runs a header-mode pass: identical transitions, commits going to a
    /// single ordered name list, stopping after the first retained row.
    pub fn tokenize_header(&self, input: &[u8], start_line: usize) -> Result<Vec<String>> {
        let mut sink = HeaderSink { fields: Vec::new() };
        self.run(input, start_line, None, true, None, &mut sink)?;
        Ok(sink.fields)
    }

    /// Runs a body-mode pass, writing into a fresh column-major store.
    /// `use_cols_mask` must have exactly `num_cols` entries; unselected
    /// columns are scanned (for ragged-row accounting) but not stored.
    pub fn tokenize_body(
        &self,
        input: &[u8],
        start_line: usize,
        end_line: Option<usize>,
        num_cols: usize,
        use_cols_mask: &[bool],
    ) -> Result<ColumnStore> {
        if use_cols_mask.len() != num_cols {
            return Err(ConfigError::UseColsMaskLenMismatch {
                expected: num_cols,
                actual: use_cols_mask.len(),
            }
            .into());
        }
        let mut store = ColumnStore::new(num_cols, input.len());
        {
            let mut sink = BodySink {
                store: &mut store,
                use_cols_mask,
            };
            self.run(input, start_line, end_line, false, Some(num_cols), &mut sink)?;
        }
        Ok(store)
    }

    fn run<S: FieldSink>(
        &self,
        input: &[u8],
        start_line: usize,
        end_line: Option<usize>,
        header_mode: bool,
        num_cols: Option<usize>,
        sink: &mut S,
    ) -> Result<()> {
        let mut state = State::StartLine;
        let mut scratch: Vec<u8> = Vec::with_capacity(32);
        let mut col: usize = 0;
        let mut current_row_index: usize = 0;
        let mut retained_rows: usize = 0;
        let mut pos: usize = 0;

        while pos < input.len() {
            let c = input[pos];
            let mut advance = true;
            let retaining = current_row_index >= start_line;

            match state {
                State::StartLine => {
                    if c.is_ascii_whitespace() {
                        // consume, stay
                    } else if let Some(cm) = self.cfg.comment {
                        if c == cm {
                            state = State::Comment;
                        } else {
                            state = State::StartField;
                            advance = false;
                        }
                    } else {
                        state = State::StartField;
                        advance = false;
                    }
                }
                State::StartField => {
                    if Some(c) == self.cfg.quotechar {
                        state = State::StartQuotedField;
                    } else if c == self.cfg.delimiter {
                        commit_field(sink, &scratch, col, retaining, num_cols, retained_rows)?;
                        scratch.clear();
                        col += 1;
                    } else if c == b'\n' {
                        commit_field(sink, &scratch, col, retaining, num_cols, retained_rows)?;
                        scratch.clear();
                        let early_exit = finish_row(
                            sink,
                            col,
                            retaining,
                            num_cols,
                            self.cfg.fill_extra_cols,
                            retained_rows,
                        )?;
                        if retaining {
                            retained_rows += 1;
                        }
                        current_row_index += 1;
                        col = 0;
                        state = State::StartLine;
                        if early_exit && header_mode {
                            pos += 1;
                            return Ok(());
                        }
                        if let Some(end) = end_line {
                            if retaining && retained_rows >= end {
                                pos += 1;
                                return Ok(());
                            }
                        }
                    } else {
                        scratch.push(c);
                        state = State::Field;
                    }
                }
                State::StartQuotedField => {
                    if Some(c) == self.cfg.quotechar {
                        // `""` commits the empty field here and lands back in
                        // StartField for the delimiter/newline that follows,
                        // which commits again. An empty quoted field costs an
                        // extra column slot against num_cols; this is the
                        // transition table's literal behavior, not trimmed.
                        commit_field(sink, &scratch, col, retaining, num_cols, retained_rows)?;
                        scratch.clear();
                        col += 1;
                        state = State::StartField;
                    } else {
                        scratch.push(c);
                        state = State::QuotedField;
                    }
                }
                State::Field => {
                    if c == self.cfg.delimiter {
                        commit_field(sink, &scratch, col, retaining, num_cols, retained_rows)?;
                        scratch.clear();
                        col += 1;
                        state = State::StartField;
                    } else if c == b'\n' {
                        commit_field(sink, &scratch, col, retaining, num_cols, retained_rows)?;
                        scratch.clear();
                        let early_exit = finish_row(
                            sink,
                            col,
                            retaining,
                            num_cols,
                            self.cfg.fill_extra_cols,
                            retained_rows,
                        )?;
                        if retaining {
                            retained_rows += 1;
                        }
                        current_row_index += 1;
                        col = 0;
                        state = State::StartLine;
                        if early_exit && header_mode {
                            pos += 1;
                            return Ok(());
                        }
                        if let Some(end) = end_line {
                            if retaining && retained_rows >= end {
                                pos += 1;
                                return Ok(());
                            }
                        }
                    } else {
                        scratch.push(c);
                    }
                }
                State::QuotedField | State::QuotedFieldNewline => {
                    if Some(c) == self.cfg.quotechar {
                        state = State::Field;
                    } else if c == b'\n' {
                        scratch.push(c);
                        state = State::QuotedFieldNewline;
                    } else {
                        scratch.push(c);
                        state = State::QuotedField;
                    }
                }
                State::Comment => {
                    if c == b'\n' {
                        state = State::StartLine;
                    }
                }
            }

            if advance {
                pos += 1;
            }
        }

        if matches!(state, State::QuotedField | State::QuotedFieldNewline) {
            return Err(TokenizerError::InvalidLine {
                line: current_row_index + 1,
                detail: "quoted field not terminated before end of input".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Commits the field currently in `scratch` to `col`, enforcing the
/// `TOO_MANY_COLS` bound when the column count is known and the row is
/// retained. Returns `Ok(())` without touching the sink while skipping
/// (pre-`start_line`) rows.
fn commit_field<S: FieldSink>(
    sink: &mut S,
    scratch: &[u8],
    col: usize,
    retaining: bool,
    num_cols: Option<usize>,
    retained_rows: usize,
) -> Result<()> {
    if !retaining {
        return Ok(());
    }
    if let Some(nc) = num_cols {
        if col >= nc {
            return Err(TokenizerError::TooManyCols {
                line: retained_rows + 1,
            }
            .into());
        }
    }
    sink.commit(col, scratch);
    Ok(())
}

/// Finalizes a retained row: pads or rejects ragged rows, then hands the
/// row off to the sink. `col` is the index of the field just committed
/// (so `col + 1` fields total were committed this row). Returns whether
/// this was the first retained row, for header mode's early exit.
fn finish_row<S: FieldSink>(
    sink: &mut S,
    col: usize,
    retaining: bool,
    num_cols: Option<usize>,
    fill_extra_cols: bool,
    retained_rows: usize,
) -> Result<bool> {
    if !retaining {
        return Ok(false);
    }
    let committed = col + 1;
    if let Some(nc) = num_cols {
        if committed < nc {
            if fill_extra_cols {
                for extra in committed..nc {
                    sink.commit(extra, &[]);
                }
            } else {
                return Err(TokenizerError::NotEnoughCols {
                    line: retained_rows + 1,
                }
                .into());
            }
        }
    }
    sink.end_row();
    Ok(retained_rows == 0)
}
