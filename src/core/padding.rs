//! Block-padding codec for the 16-byte block cipher.
//!
//! The plaintext is extended to the next whole block; every pad byte
//! carries the pad length, so `unpad` recovers the original length from
//! the trailing byte alone. A block-aligned input still receives a full
//! block of padding, keeping the trailing byte unambiguous.

/// Cipher block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Pads `data` to a multiple of [`BLOCK_SIZE`].
#[must_use]
pub fn pad(data: &[u8]) -> Vec<u8> {
    let padding_len = BLOCK_SIZE - data.len() % BLOCK_SIZE;
    let mut padded = Vec::with_capacity(data.len() + padding_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + padding_len, padding_len as u8);
    padded
}

/// Removes the padding encoded in the trailing byte of `data`.
///
/// The trailing byte is only honored when it names a pad length in
/// `1..=BLOCK_SIZE` that fits inside `data`; anything else returns the
/// input unchanged. No check is made that every pad byte carries the
/// same value.
#[must_use]
pub fn unpad(data: &[u8]) -> &[u8] {
    let Some(&last) = data.last() else {
        return data;
    };
    let padding_len = last as usize;
    if (1..=BLOCK_SIZE).contains(&padding_len) && padding_len <= data.len() {
        &data[..data.len() - padding_len]
    } else {
        data
    }
}
