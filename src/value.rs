use compact_str::CompactString;

use crate::errors::{ConversionError, DsvError, Result};
use crate::numeric::{parse_float, parse_int};

/// A single materialized value. Narrowed from the source project's full
/// type zoo down to the three candidate types the fallback chain actually
/// produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(CompactString),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}
impl From<CompactString> for Value {
    fn from(v: CompactString) -> Self {
        Value::Str(v)
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(CompactString::from(v))
    }
}

/// Bitness chosen at materialization time for a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    Int,
    Float,
    Str,
}

impl Value {
    /// Attempt to parse `raw` as `templ`. Empty input always yields `Ok(None)`
    /// (the caller turns that into a fill-value lookup or a null).
    /// String template conversion never fails (degrades to lossy UTF-8).
    pub fn from_bytes_with_templ(raw: &[u8], templ: Dtype) -> Result<Option<Value>> {
        if raw.is_empty() {
            return Ok(None);
        }
        match templ {
            Dtype::Int => {
                let v = parse_int(raw).ok_or_else(|| {
                    DsvError::Conversion(ConversionError::ValueFromBytesFailed {
                        src_value: String::from_utf8_lossy(raw).into_owned(),
                        target_type: "Int",
                    })
                })?;
                Ok(Some(Value::Int(v)))
            }
            Dtype::Float => {
                let v = parse_float(raw).ok_or_else(|| {
                    DsvError::Conversion(ConversionError::ValueFromBytesFailed {
                        src_value: String::from_utf8_lossy(raw).into_owned(),
                        target_type: "Float",
                    })
                })?;
                Ok(Some(Value::Float(v)))
            }
            Dtype::Str => Ok(Some(Value::Str(CompactString::from(
                String::from_utf8_lossy(raw),
            )))),
        }
    }
}

/// A materialized column: dense if nothing was masked, otherwise a parallel
/// boolean mask rides alongside the values.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Dense(Values),
    Masked { values: Values, mask: Vec<bool> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Strings(Vec<CompactString>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Ints(v) => v.len(),
            Values::Floats(v) => v.len(),
            Values::Strings(v) => v.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
