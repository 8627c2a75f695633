//! JSON-document configuration, mirroring the teacher's `conf::jsonconf` /
//! `conf::from_jsonconf` pair: a `serde`-deserializable document type plus
//! a fallible conversion into the runtime `ReaderConfig`.

use serde::Deserialize;

use crate::config::ReaderConfig;
use crate::errors::{ConfigError, Result};
use crate::materializer::FillRule;
use crate::tokenizer::TokenizerConfig;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FillRuleDoc {
    pub bad: String,
    pub replacement: String,
    pub columns: Vec<String>,
}
impl Default for FillRuleDoc {
    fn default() -> Self {
        FillRuleDoc {
            bad: String::new(),
            replacement: String::new(),
            columns: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReaderConfigDoc {
    pub delimiter: String,
    pub comment: Option<String>,
    pub quotechar: Option<String>,
    pub fill_extra_cols: bool,
    pub header_start: Option<usize>,
    pub data_start: usize,
    pub data_end: Option<i64>,
    pub names: Option<Vec<String>>,
    pub include_names: Option<Vec<String>>,
    pub exclude_names: Option<Vec<String>>,
    pub fill_values: Vec<FillRuleDoc>,
    pub fill_include_names: Option<Vec<String>>,
    pub fill_exclude_names: Option<Vec<String>>,
}

impl Default for ReaderConfigDoc {
    fn default() -> Self {
        let defaults = ReaderConfig::default();
        ReaderConfigDoc {
            delimiter: (defaults.tokenizer.delimiter as char).to_string(),
            comment: None,
            quotechar: defaults.tokenizer.quotechar.map(|b| (b as char).to_string()),
            fill_extra_cols: defaults.tokenizer.fill_extra_cols,
            header_start: defaults.header_start,
            data_start: defaults.data_start,
            data_end: defaults.data_end,
            names: None,
            include_names: None,
            exclude_names: None,
            fill_values: Vec::new(),
            fill_include_names: None,
            fill_exclude_names: None,
        }
    }
}

fn single_byte(s: &str, context: &'static str) -> Result<u8> {
    let bytes = s.as_bytes();
    if bytes.len() != 1 {
        return Err(ConfigError::InvalidByteLiteral {
            value: s.to_string(),
            context,
        }
        .into());
    }
    Ok(bytes[0])
}

impl TryFrom<ReaderConfigDoc> for ReaderConfig {
    type Error = crate::errors::DsvError;

    fn try_from(doc: ReaderConfigDoc) -> Result<Self> {
        let delimiter = single_byte(&doc.delimiter, "delimiter")?;
        let comment = doc.comment.as_deref().map(|s| single_byte(s, "comment")).transpose()?;
        let quotechar = doc
            .quotechar
            .as_deref()
            .map(|s| single_byte(s, "quotechar"))
            .transpose()?;

        Ok(ReaderConfig {
            tokenizer: TokenizerConfig {
                delimiter,
                comment,
                quotechar,
                fill_extra_cols: doc.fill_extra_cols,
            },
            header_start: doc.header_start,
            data_start: doc.data_start,
            data_end: doc.data_end,
            names: doc.names,
            include_names: doc.include_names,
            exclude_names: doc.exclude_names,
            fill_values: doc
                .fill_values
                .into_iter()
                .map(|f| FillRule {
                    bad: f.bad.into_bytes(),
                    replacement: f.replacement,
                    columns: f.columns,
                })
                .collect(),
            fill_include_names: doc.fill_include_names,
            fill_exclude_names: doc.fill_exclude_names,
        })
    }
}

/// Parses a JSON document into a runtime [`ReaderConfig`].
pub fn from_json_str(json: &str) -> Result<ReaderConfig> {
    let doc: ReaderConfigDoc = serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson {
        detail: e.to_string(),
    })?;
    ReaderConfig::try_from(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let json = r#"{"delimiter": ",", "data_start": 1}"#;
        let cfg = from_json_str(json).unwrap();
        assert_eq!(b',', cfg.tokenizer.delimiter);
        assert_eq!(1, cfg.data_start);
    }

    #[test]
    fn parses_fill_values() {
        let json = r#"{
            "fill_values": [{"bad": "", "replacement": "99", "columns": ["b"]}]
        }"#;
        let cfg = from_json_str(json).unwrap();
        assert_eq!(1, cfg.fill_values.len());
        assert_eq!("99", cfg.fill_values[0].replacement);
        assert_eq!(vec!["b".to_string()], cfg.fill_values[0].columns);
    }

    #[test]
    fn rejects_multi_byte_delimiter() {
        let json = r#"{"delimiter": ",,"}"#;
        assert!(from_json_str(json).is_err());
    }
}
