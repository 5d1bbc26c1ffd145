//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{Signature, VerificationKey, pallas::ed25519};
use anyhow::anyhow;
use rand::RngCore;
use std::str::FromStr;

/// An ed25519 signing key (non-extended). Its [`Debug`] output never shows the key.
#[derive(Debug, Clone)]
#[repr(transparent)]
pub struct SigningKey(ed25519::SecretKey);

/// The CBOR bytestring header found in front of keys exported as `cborHex` by the cardano-cli.
const CBOR_HEADER: [u8; 2] = [0x58, 0x20];

impl SigningKey {
    /// A fresh key from the system's entropy.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from(bytes)
    }

    pub fn sign(&self, message: impl AsRef<[u8]>) -> Signature {
        Signature::from(self.0.sign(message))
    }

    pub fn to_verification_key(&self) -> VerificationKey {
        VerificationKey::from(self.0.public_key())
    }
}

impl From<[u8; 32]> for SigningKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(ed25519::SecretKey::from(bytes))
    }
}

/// Parse a base16 key: either the 32 raw bytes, or the same bytes as a CBOR bytestring.
impl FromStr for SigningKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let bytes =
            hex::decode(s.trim()).map_err(|e| anyhow!(e).context("malformed base16 signing key"))?;

        let bytes = match bytes.strip_prefix(&CBOR_HEADER) {
            Some(inner) if bytes.len() == 34 => inner,
            _ => bytes.as_slice(),
        };

        let array = <[u8; 32]>::try_from(bytes)
            .map_err(|_| anyhow!("invalid signing key: expected 32 bytes, got {}", bytes.len()))?;

        Ok(Self::from(array))
    }
}

#[cfg(test)]
mod tests {
    use crate::SigningKey;

    const KEY: &str = "9b5e1d8a4a5c0f2e6e0a1f6c5b0e9d5c3b7a8f1e2d4c6b8a0f1e3d5c7b9a1f2e";

    #[test]
    fn parse_raw_and_cbor_wrapped() {
        let raw: SigningKey = KEY.parse().unwrap();
        let wrapped: SigningKey = format!("5820{KEY}").parse().unwrap();
        assert_eq!(raw.to_verification_key(), wrapped.to_verification_key());
    }

    #[test]
    fn reject_wrong_lengths() {
        assert!("00".parse::<SigningKey>().is_err());
        assert!(format!("{KEY}00").parse::<SigningKey>().is_err());
        assert!("not base16".parse::<SigningKey>().is_err());
    }

    #[test]
    fn signatures_verify() {
        let key = SigningKey::generate();
        let signature = key.sign(b"message");
        assert!(key.to_verification_key().verify(b"message", &signature));
        assert!(!key.to_verification_key().verify(b"massage", &signature));
    }
}
