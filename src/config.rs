//! `Reader`-level configuration: where the header and data rows live,
//! column naming and filtering, and fill-value substitution rules. Built
//! with a chained-method builder, the way the teacher's parser config is
//! constructed.

use crate::materializer::FillRule;
use crate::tokenizer::TokenizerConfig;

#[cfg(feature = "jsonconf")]
pub mod json;

#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub tokenizer: TokenizerConfig,
    pub header_start: Option<usize>,
    pub data_start: usize,
    pub data_end: Option<i64>,
    pub names: Option<Vec<String>>,
    pub include_names: Option<Vec<String>>,
    pub exclude_names: Option<Vec<String>>,
    pub fill_values: Vec<FillRule>,
    pub fill_include_names: Option<Vec<String>>,
    pub fill_exclude_names: Option<Vec<String>>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            tokenizer: TokenizerConfig::default(),
            header_start: Some(0),
            data_start: 1,
            data_end: None,
            names: None,
            include_names: None,
            exclude_names: None,
            fill_values: Vec::new(),
            fill_include_names: None,
            fill_exclude_names: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ReaderConfigBuilder {
    cfg: ReaderConfig,
}

impl ReaderConfigBuilder {
    pub fn new() -> Self {
        ReaderConfigBuilder {
            cfg: ReaderConfig::default(),
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.cfg.tokenizer.delimiter = delimiter;
        self
    }
    pub fn comment(mut self, comment: u8) -> Self {
        self.cfg.tokenizer.comment = Some(comment);
        self
    }
    pub fn quotechar(mut self, quotechar: u8) -> Self {
        self.cfg.tokenizer.quotechar = Some(quotechar);
        self
    }
    pub fn no_quotechar(mut self) -> Self {
        self.cfg.tokenizer.quotechar = None;
        self
    }
    pub fn fill_extra_cols(mut self, fill_extra_cols: bool) -> Self {
        self.cfg.tokenizer.fill_extra_cols = fill_extra_cols;
        self
    }
    pub fn header_start(mut self, header_start: Option<usize>) -> Self {
        self.cfg.header_start = header_start;
        self
    }
    pub fn data_start(mut self, data_start: usize) -> Self {
        self.cfg.data_start = data_start;
        self
    }
    pub fn data_end(mut self, data_end: Option<i64>) -> Self {
        self.cfg.data_end = data_end;
        self
    }
    pub fn names(mut self, names: Vec<String>) -> Self {
        self.cfg.names = Some(names);
        self
    }
    pub fn include_names(mut self, include_names: Vec<String>) -> Self {
        self.cfg.include_names = Some(include_names);
        self
    }
    pub fn exclude_names(mut self, exclude_names: Vec<String>) -> Self {
        self.cfg.exclude_names = Some(exclude_names);
        self
    }
    pub fn fill_value(mut self, bad: Vec<u8>, replacement: String, columns: Vec<String>) -> Self {
        self.cfg.fill_values.push(FillRule {
            bad,
            replacement,
            columns,
        });
        self
    }
    pub fn fill_include_names(mut self, names: Vec<String>) -> Self {
        self.cfg.fill_include_names = Some(names);
        self
    }
    pub fn fill_exclude_names(mut self, names: Vec<String>) -> Self {
        self.cfg.fill_exclude_names = Some(names);
        self
    }

    pub fn build(self) -> ReaderConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_spec_defaults() {
        let cfg = ReaderConfig::default();
        assert_eq!(b',', cfg.tokenizer.delimiter);
        assert_eq!(Some(b'"'), cfg.tokenizer.quotechar);
        assert_eq!(None, cfg.tokenizer.comment);
        assert!(!cfg.tokenizer.fill_extra_cols);
    }

    #[test]
    fn builder_chains_into_expected_config() {
        let cfg = ReaderConfigBuilder::new()
            .delimiter(b'\t')
            .comment(b'#')
            .fill_extra_cols(true)
            .header_start(None)
            .data_start(0)
            .build();
        assert_eq!(b'\t', cfg.tokenizer.delimiter);
        assert_eq!(Some(b'#'), cfg.tokenizer.comment);
        assert!(cfg.tokenizer.fill_extra_cols);
        assert_eq!(None, cfg.header_start);
        assert_eq!(0, cfg.data_start);
    }
}
