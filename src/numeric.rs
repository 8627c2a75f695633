//! Strict byte-string to integer/float conversion. Standalone and
//! reentrant; holds no state of its own.

/// Parses an optional leading sign followed by one or more decimal digits,
/// with optional surrounding ASCII whitespace. Anything else (empty input,
/// non-digit bytes, overflow of the platform-native signed width) is
/// rejected.
pub fn parse_int(bytes: &[u8]) -> Option<i64> {
    let trimmed = trim_ascii_whitespace(bytes);
    if trimmed.is_empty() {
        return None;
    }

    let (neg, digits) = match trimmed[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let mut acc: i64 = 0;
    for &d in digits {
        let digit = (d - b'0') as i64;
        acc = acc.checked_mul(10)?.checked_add(digit)?;
    }
    Some(if neg { -acc } else { acc })
}

/// Parses an optional sign, an integer part, an optional fractional part,
/// and an optional exponent (`e`/`E` with optional sign), with optional
/// surrounding ASCII whitespace. Rejects empty input and trailing garbage.
pub fn parse_float(bytes: &[u8]) -> Option<f64> {
    let trimmed = trim_ascii_whitespace(bytes);
    if trimmed.is_empty() {
        return None;
    }
    if !is_well_formed_float(trimmed) {
        return None;
    }
    std::str::from_utf8(trimmed)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
}

fn is_well_formed_float(bytes: &[u8]) -> bool {
    let mut i = 0;
    let n = bytes.len();

    if i < n && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < n && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let has_int_digits = i > int_start;

    let mut has_frac_digits = false;
    if i < n && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < n && bytes[i].is_ascii_digit() {
            i += 1;
        }
        has_frac_digits = i > frac_start;
    }

    if !has_int_digits && !has_frac_digits {
        return false;
    }

    if i < n && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < n && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < n && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == n
}

fn trim_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace());
    let Some(start) = start else {
        return &[];
    };
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace()).unwrap();
    &bytes[start..=end]
}
