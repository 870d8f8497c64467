//! AES-CBC codec.
//!
//! The wire form is `base64(ciphertext)--base64(iv)`. CBC output is not
//! authenticated; the encryptor always wraps it with a verifier before
//! it leaves the process.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use base64::prelude::*;
use rand_core::{OsRng, TryRngCore};

use crate::core::encryptor::truncate_key;
use crate::core::error::{CryptoError, CryptoResult};
use crate::core::padding::{pad, unpad, BLOCK_SIZE};
use crate::core::token::{split_segments, DELIMITER};

pub(crate) fn encrypt(key: &[u8], plaintext: &[u8]) -> CryptoResult<String> {
    let key = truncate_key(key);
    let mut buf = pad(plaintext);

    // The IV must be unique but not secret; it travels with the token.
    let mut iv = [0u8; BLOCK_SIZE];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(|_| CryptoError::CryptoFailure)?;

    encrypt_blocks(key, &iv, &mut buf)?;
    Ok(format!(
        "{}{DELIMITER}{}",
        BASE64_STANDARD.encode(&buf),
        BASE64_STANDARD.encode(iv)
    ))
}

pub(crate) fn decrypt(
    key: &[u8],
    message: &str,
    strip_trailing_padding: bool,
) -> CryptoResult<String> {
    let key = truncate_key(key);
    let segments = split_segments(message, 2)?;
    let mut ciphertext = BASE64_STANDARD.decode(segments[0])?;
    let iv = BASE64_STANDARD.decode(segments[1])?;

    if iv.len() != BLOCK_SIZE {
        return Err(CryptoError::InvalidNonce);
    }
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::InvalidCiphertext);
    }

    decrypt_blocks(key, &iv, &mut ciphertext)?;
    let mut plaintext = unpad(&ciphertext);

    // Some producers pad with 0x10 bytes this codec never emits. When
    // the serializer guarantees 0x10 is not valid trailing data, drop
    // any stray run left after unpadding.
    if strip_trailing_padding {
        let stray = plaintext.iter().rev().take_while(|&&b| b == 0x10).count();
        plaintext = &plaintext[..plaintext.len() - stray];
    }

    String::from_utf8(plaintext.to_vec()).map_err(|e| CryptoError::Deserialize(e.to_string()))
}

fn encrypt_blocks(key: &[u8], iv: &[u8], buf: &mut [u8]) -> CryptoResult<()> {
    match key.len() {
        16 => encrypt_blocks_with::<Aes128>(key, iv, buf),
        24 => encrypt_blocks_with::<Aes192>(key, iv, buf),
        32 => encrypt_blocks_with::<Aes256>(key, iv, buf),
        _ => Err(CryptoError::InvalidKeyLength),
    }
}

fn decrypt_blocks(key: &[u8], iv: &[u8], buf: &mut [u8]) -> CryptoResult<()> {
    match key.len() {
        16 => decrypt_blocks_with::<Aes128>(key, iv, buf),
        24 => decrypt_blocks_with::<Aes192>(key, iv, buf),
        32 => decrypt_blocks_with::<Aes256>(key, iv, buf),
        _ => Err(CryptoError::InvalidKeyLength),
    }
}

fn encrypt_blocks_with<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> CryptoResult<()>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let mut cipher =
        cbc::Encryptor::<C>::new_from_slices(key, iv).map_err(|_| CryptoError::InvalidKeyLength)?;
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }
    Ok(())
}

fn decrypt_blocks_with<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> CryptoResult<()>
where
    C: BlockCipher + BlockDecryptMut + KeyInit,
{
    let mut cipher =
        cbc::Decryptor::<C>::new_from_slices(key, iv).map_err(|_| CryptoError::InvalidKeyLength)?;
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        cipher.decrypt_block_mut(GenericArray::from_mut_slice(block));
    }
    Ok(())
}
