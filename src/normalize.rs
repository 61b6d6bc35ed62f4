//! Brazilian-locale numeric normalization.
//!
//! The upstream page formats numbers with `.` as thousands separator and `,`
//! as decimal separator (`1.234,56`), and percentages with a trailing `%`.
//! That convention is assumed, never auto-detected.

use crate::error::NormalizationError;

/// A parsed numeric cell, keeping the original text for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedNumber {
    pub value: f64,
    pub source: String,
}

/// Converts locale-formatted numeric text into a float.
///
/// Strips one trailing `%`, removes every `.`, swaps the first `,` for `.`,
/// then parses. Digit-free input (empty cells, the dash the site uses for
/// "no data") yields `NotNumeric` rather than panicking.
pub fn normalize(text: &str, is_percent: bool) -> Result<NormalizedNumber, NormalizationError> {
    let trimmed = text.trim();

    let mut body = trimmed;
    if is_percent || body.ends_with('%') {
        body = body.strip_suffix('%').unwrap_or(body).trim_end();
    }

    let cleaned = body.replace('.', "").replacen(',', ".", 1);
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(NormalizedNumber {
            value,
            source: trimmed.to_string(),
        }),
        _ => Err(NormalizationError::NotNumeric {
            text: trimmed.to_string(),
        }),
    }
}
