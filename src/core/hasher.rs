//! HMAC hash function selection.
//!
//! The signing scheme is HMAC over one of four digests. SHA-1 is the
//! cross-system default; MD5 is supported only for interoperability with
//! legacy producers.

use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha256, Sha512};

/// Hash function used for HMAC digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hasher {
    /// HMAC-MD5, legacy interoperability only.
    Md5,
    /// HMAC-SHA1, the cross-system default.
    #[default]
    Sha1,
    /// HMAC-SHA256.
    Sha256,
    /// HMAC-SHA512.
    Sha512,
}

impl Hasher {
    /// Computes the lower-case hex HMAC digest of `data` under `secret`.
    pub(crate) fn hmac_hex(self, secret: &[u8], data: &[u8]) -> String {
        match self {
            Hasher::Md5 => {
                let mut mac = Hmac::<Md5>::new_from_slice(secret)
                    .expect("HMAC accepts keys of any length");
                mac.update(data);
                hex::encode(mac.finalize().into_bytes())
            }
            Hasher::Sha1 => {
                let mut mac = Hmac::<Sha1>::new_from_slice(secret)
                    .expect("HMAC accepts keys of any length");
                mac.update(data);
                hex::encode(mac.finalize().into_bytes())
            }
            Hasher::Sha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(secret)
                    .expect("HMAC accepts keys of any length");
                mac.update(data);
                hex::encode(mac.finalize().into_bytes())
            }
            Hasher::Sha512 => {
                let mut mac = Hmac::<Sha512>::new_from_slice(secret)
                    .expect("HMAC accepts keys of any length");
                mac.update(data);
                hex::encode(mac.finalize().into_bytes())
            }
        }
    }
}
