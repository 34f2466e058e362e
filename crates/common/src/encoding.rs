//! Strict percent-decoding for request paths and object keys
//!
//! Malformed percent sequences are rejected rather than passed through:
//! the gateway maps a [`DecodeError`] to 400, the replication trigger to
//! an input-error failure result.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed percent sequence at byte {0}")]
    MalformedPercentSequence(usize),

    #[error("decoded value is not valid UTF-8")]
    InvalidUtf8,
}

/// Percent-decode `input`, rejecting malformed sequences.
///
/// Every `%` must be followed by exactly two hex digits, and the decoded
/// byte sequence must be valid UTF-8.
pub fn percent_decode(input: &str) -> Result<String, DecodeError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16));
            let lo = bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16));
            match (hi, lo) {
                (Some(hi), Some(lo)) => {
                    out.push((hi * 16 + lo) as u8);
                    i += 3;
                }
                _ => return Err(DecodeError::MalformedPercentSequence(i)),
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).map_err(|_| DecodeError::InvalidUtf8)
}

/// Decode an object key from a store-change notification.
///
/// Object-store notifications encode keys with `+` for spaces on top of
/// percent-encoding, so `+` is undone first.
pub fn decode_object_key(raw: &str) -> Result<String, DecodeError> {
    percent_decode(&raw.replace('+', " "))
}
