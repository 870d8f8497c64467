//! Wire-token segment handling.
//!
//! Tokens join their base64/hex fields with a two-character `--`
//! delimiter. The delimiter can never appear inside a field: standard
//! base64 and lower-case hex alphabets contain no dash.

use crate::core::error::{CryptoError, CryptoResult};

/// Delimiter joining the segments of a wire token.
pub(crate) const DELIMITER: &str = "--";

/// Splits a token into exactly `want` segments.
pub(crate) fn split_segments(message: &str, want: usize) -> CryptoResult<Vec<&str>> {
    let segments: Vec<&str> = message.split(DELIMITER).collect();
    if segments.len() != want {
        return Err(CryptoError::InvalidSegmentCount {
            want,
            got: segments.len(),
        });
    }
    Ok(segments)
}
