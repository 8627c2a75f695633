mod column_store;
mod config;
mod errors;
mod materializer;
mod numeric;
mod reader;
mod tokenizer;
mod value;

pub use config::{ReaderConfig, ReaderConfigBuilder};
#[cfg(feature = "jsonconf")]
pub use config::json;
pub use errors::{ConfigError, ConversionError, DsvError, Result, TokenizerError};
pub use materializer::FillRule;
pub use reader::Reader;
pub use tokenizer::{Tokenizer, TokenizerConfig};
pub use value::{Column, Dtype, Value, Values};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_smoke() {
        let cfg = Reader::builder().header_start(Some(0)).data_start(1).build();
        let reader = Reader::new(cfg);
        let out = reader.read(b"A,B,C\n1,2,3\n4,5,6\n").unwrap();
        assert_eq!(3, out.len());
    }
}
