//! Exact Decimal Amount Comparison
//!
//! Transaction amounts are currency values carried as decimal strings.
//! Comparing them through binary floating point would mis-rank values
//! like 100.10 vs 100.1000000000000001, so comparison is performed on
//! the digit strings themselves: integer parts compared after stripping
//! leading zeros, fractional parts compared right-padded. Total over the
//! input domain and overflow-free for any length of amount.

use crate::error::{GuardError, GuardResult};
use std::cmp::Ordering;

/// Compare two non-negative decimal strings exactly.
pub fn compare_decimal(a: &str, b: &str) -> GuardResult<Ordering> {
    let (a_int, a_frac) = split_decimal(a)?;
    let (b_int, b_frac) = split_decimal(b)?;

    let a_int = a_int.trim_start_matches('0');
    let b_int = b_int.trim_start_matches('0');

    // Integer parts: more digits wins, same digits compare lexicographically
    let int_order = a_int
        .len()
        .cmp(&b_int.len())
        .then_with(|| a_int.cmp(b_int));
    if int_order != Ordering::Equal {
        return Ok(int_order);
    }

    // Fractional parts: right-pad the shorter with zeros, then lexicographic
    let width = a_frac.len().max(b_frac.len());
    let order = a_frac
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(width)
        .cmp(b_frac.bytes().chain(std::iter::repeat(b'0')).take(width));
    Ok(order)
}

/// Split a decimal string into validated integer and fractional digit parts.
fn split_decimal(value: &str) -> GuardResult<(&str, &str)> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GuardError::parse_error("Empty amount"));
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (trimmed, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(GuardError::parse_error("Amount has no digits"));
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GuardError::parse_error(format!(
            "Invalid integer part in amount '{}'",
            trimmed
        )));
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GuardError::parse_error(format!(
            "Invalid fractional part in amount '{}'",
            trimmed
        )));
    }

    Ok((int_part, frac_part))
}
