//! Alphadecimal encoding of sibling ranks.
//!
//! Ranks are written in base 36 using the digits `0-9` followed by the
//! letters `a-z`. Because lowercase letters sort after digits in ASCII,
//! two encodings of the same width compare the same way as the integers
//! they encode.

use crate::error::{Error, Result};

/// The alphadecimal alphabet, in ascending digit order.
pub const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Numeric base of the encoding.
pub const BASE: u64 = 36;

/// Encode a non-negative integer as an alphadecimal string of at least `width` digits.
///
/// Shorter encodings are left-padded with `'0'`. Values that need more than
/// `width` digits are written in full; use [`capacity`] to check whether a
/// value fits when ordering across values matters.
///
/// # Example
///
/// ```
/// use comment_rethread::alphadecimal::encode;
///
/// assert_eq!(encode(0, 2), "00");
/// assert_eq!(encode(1, 2), "01");
/// assert_eq!(encode(10, 2), "0a");
/// assert_eq!(encode(36, 2), "10");
/// assert_eq!(encode(1296, 2), "100");
///
/// // Same-width encodings sort like the integers they encode
/// assert!(encode(9, 2) < encode(10, 2));
/// ```
pub fn encode(mut n: u64, width: usize) -> String {
    let mut digits: Vec<u8> = Vec::with_capacity(width.max(2));
    loop {
        digits.push(DIGITS[(n % BASE) as usize]);
        n /= BASE;
        if n == 0 {
            break;
        }
    }
    while digits.len() < width {
        digits.push(b'0');
    }
    digits.reverse();

    // Every byte comes from DIGITS, which is ASCII
    digits.into_iter().map(char::from).collect()
}

/// Decode an alphadecimal string back into an integer.
///
/// Uppercase letters are accepted and treated as their lowercase
/// counterparts.
///
/// # Example
///
/// ```
/// use comment_rethread::alphadecimal::decode;
///
/// assert_eq!(decode("0a").unwrap(), 10);
/// assert_eq!(decode("ZZ").unwrap(), 1295);
/// assert!(decode("").is_err());
/// assert!(decode("0-").is_err());
/// ```
pub fn decode(s: &str) -> Result<u64> {
    if s.is_empty() {
        return Err(Error::InvalidEncoding("empty string".to_string()));
    }

    let mut value: u64 = 0;
    for c in s.chars() {
        let digit = c
            .to_digit(BASE as u32)
            .ok_or_else(|| Error::InvalidEncoding(format!("invalid digit {c:?} in {s:?}")))?;
        value = value
            .checked_mul(BASE)
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or_else(|| Error::InvalidEncoding(format!("{s:?} overflows u64")))?;
    }
    Ok(value)
}

/// Number of distinct values that fit in `width` digits (`36^width`).
///
/// Saturates at `u64::MAX` for widths too large to represent.
pub fn capacity(width: usize) -> u64 {
    u32::try_from(width)
        .ok()
        .and_then(|w| BASE.checked_pow(w))
        .unwrap_or(u64::MAX)
}

/// Check whether `n` can be encoded in exactly `width` digits.
pub fn fits(n: u64, width: usize) -> bool {
    n < capacity(width)
}
