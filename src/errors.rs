use thiserror::Error;

pub type Result<T> = std::result::Result<T, DsvError>;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum DsvError {
    #[error(transparent)]
    Tokenize(#[from] TokenizerError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum TokenizerError {
    #[error("line {line}: invalid line ({detail})")]
    InvalidLine { line: usize, detail: String },

    #[error("line {line}: too many columns")]
    TooManyCols { line: usize },

    #[error("line {line}: not enough columns")]
    NotEnoughCols { line: usize },
}

/// Conversion errors are only ever observed internally by the materializer's
/// fallback loop; the error is always cleared before the caller sees it.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum ConversionError {
    #[error("can't parse '{src_value}' as {target_type}")]
    ValueFromBytesFailed {
        src_value: String,
        target_type: &'static str,
    },
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum ConfigError {
    #[error("use_cols_mask has length {actual}, expected {expected}")]
    UseColsMaskLenMismatch { expected: usize, actual: usize },

    #[error("unknown column name '{name}' in {context}")]
    UnknownColumnName { name: String, context: &'static str },

    #[error("expected a single byte for {context}, got '{value}'")]
    InvalidByteLiteral { value: String, context: &'static str },

    #[error("invalid json configuration document: {detail}")]
    InvalidJson { detail: String },
}
