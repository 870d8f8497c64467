//! AES-GCM codec.
//!
//! The wire form is `base64(ciphertext)--base64(nonce)--base64(tag)`:
//! the authentication tag travels as its own segment rather than
//! appended to the ciphertext. Tokens are self-authenticating and never
//! wrapped by a verifier.

use aes::Aes192;
use aes_gcm::aead::{Aead, KeyInit, Nonce};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use base64::prelude::*;
use rand_core::{OsRng, TryRngCore};

use crate::core::encryptor::truncate_key;
use crate::core::error::{CryptoError, CryptoResult};
use crate::core::token::{split_segments, DELIMITER};

/// GCM nonce length in bytes (96 bits).
const NONCE_SIZE: usize = 12;

/// GCM authentication tag length in bytes.
const TAG_SIZE: usize = 16;

type Aes192Gcm = AesGcm<Aes192, aes_gcm::aead::consts::U12>;

pub(crate) fn encrypt(key: &[u8], plaintext: &[u8]) -> CryptoResult<String> {
    let key = truncate_key(key);

    let mut nonce = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|_| CryptoError::CryptoFailure)?;

    let mut sealed = match key.len() {
        16 => seal_with::<Aes128Gcm>(key, &nonce, plaintext)?,
        24 => seal_with::<Aes192Gcm>(key, &nonce, plaintext)?,
        32 => seal_with::<Aes256Gcm>(key, &nonce, plaintext)?,
        _ => return Err(CryptoError::InvalidKeyLength),
    };

    // The tag is appended to the ciphertext by the AEAD; split it off so
    // it travels as an independent segment.
    let tag = sealed.split_off(sealed.len() - TAG_SIZE);
    Ok(format!(
        "{}{DELIMITER}{}{DELIMITER}{}",
        BASE64_STANDARD.encode(&sealed),
        BASE64_STANDARD.encode(nonce),
        BASE64_STANDARD.encode(&tag)
    ))
}

pub(crate) fn decrypt(key: &[u8], message: &str) -> CryptoResult<String> {
    let key = truncate_key(key);
    let segments = split_segments(message, 3)?;
    let mut ciphertext = BASE64_STANDARD.decode(segments[0])?;
    let nonce = BASE64_STANDARD.decode(segments[1])?;
    let tag = BASE64_STANDARD.decode(segments[2])?;

    if nonce.len() != NONCE_SIZE {
        return Err(CryptoError::InvalidNonce);
    }
    ciphertext.extend_from_slice(&tag);

    let plaintext = match key.len() {
        16 => open_with::<Aes128Gcm>(key, &nonce, &ciphertext)?,
        24 => open_with::<Aes192Gcm>(key, &nonce, &ciphertext)?,
        32 => open_with::<Aes256Gcm>(key, &nonce, &ciphertext)?,
        _ => return Err(CryptoError::InvalidKeyLength),
    };
    String::from_utf8(plaintext).map_err(|e| CryptoError::Deserialize(e.to_string()))
}

fn seal_with<A: Aead + KeyInit>(
    key: &[u8],
    nonce: &[u8],
    plaintext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = A::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength)?;
    cipher
        .encrypt(Nonce::<A>::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::CryptoFailure)
}

fn open_with<A: Aead + KeyInit>(
    key: &[u8],
    nonce: &[u8],
    ciphertext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let cipher = A::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength)?;
    cipher
        .decrypt(Nonce::<A>::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailed)
}
