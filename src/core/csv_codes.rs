//! CSV code extraction for bulk updates.
//!
//! Administrators upload the results table exported after generation (or any
//! CSV whose first column holds codes). Only the first column is read.

use crate::errors::{Error, Result};
use std::collections::HashSet;

/// Header cell that marks the first line as a header row.
pub const CODE_COLUMN_HEADER: &str = "coupon_code";

const UTF8_BOM: char = '\u{feff}';

/// First field of a single CSV line, with comma separation and quote escaping.
fn first_field(line: &str) -> Result<Option<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Ok(None);
    }
    Ok(record.get(0).map(|field| field.trim().to_string()))
}

/// Extracts the unique coupon codes from CSV text, in order of first appearance.
///
/// Blank lines are skipped. When the first non-blank line's first field is
/// `coupon_code` (any case) it is treated as a header.
///
/// # Errors
/// Returns `Error::NoCouponCodes` when no code is found, or `Error::Csv` when a
/// line cannot be parsed.
pub fn extract_coupon_codes(csv_text: &str) -> Result<Vec<String>> {
    let text = csv_text.strip_prefix(UTF8_BOM).unwrap_or(csv_text);

    let mut codes = Vec::new();
    let mut seen = HashSet::new();
    let mut first_line = true;

    for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        let field = first_field(line)?;

        if std::mem::take(&mut first_line)
            && field
                .as_deref()
                .is_some_and(|f| f.eq_ignore_ascii_case(CODE_COLUMN_HEADER))
        {
            continue;
        }

        if let Some(code) = field.filter(|f| !f.is_empty()) {
            if seen.insert(code.clone()) {
                codes.push(code);
            }
        }
    }

    if codes.is_empty() {
        return Err(Error::NoCouponCodes);
    }

    tracing::debug!(count = codes.len(), "Extracted coupon codes from CSV");
    Ok(codes)
}
