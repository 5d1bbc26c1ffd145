//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{cbor, pallas};
use anyhow::anyhow;
use std::{fmt, str::FromStr};

/// A _blake2b_ digest of `SIZE` bytes: 28 for key hashes, script hashes and policy ids, 32 for
/// transaction ids.
///
/// ```rust
/// # use cardano_tx_builder::Hash;
/// let policy: Hash<28> = "279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f"
///     .parse()
///     .unwrap();
/// assert_eq!(<[u8; 28]>::from(policy)[0], 0x27);
/// assert!(<Hash<32>>::try_from(policy.as_slice()).is_err());
/// ```
///
/// Literals are easier written with [`hash!`](crate::hash).
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[repr(transparent)]
pub struct Hash<const SIZE: usize>([u8; SIZE]);

impl<const SIZE: usize> fmt::Display for Hash<SIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl<const SIZE: usize> Hash<SIZE> {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl<const SIZE: usize> AsRef<[u8]> for Hash<SIZE> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ------------------------------------------------------------------ Parsing

impl<const SIZE: usize> TryFrom<&[u8]> for Hash<SIZE> {
    type Error = anyhow::Error;

    fn try_from(bytes: &[u8]) -> anyhow::Result<Self> {
        <[u8; SIZE]>::try_from(bytes)
            .map(Self)
            .map_err(|_| anyhow!("expected a {SIZE}-byte digest, got {} bytes", bytes.len()))
    }
}

impl<const SIZE: usize> TryFrom<Vec<u8>> for Hash<SIZE> {
    type Error = anyhow::Error;

    fn try_from(bytes: Vec<u8>) -> anyhow::Result<Self> {
        Self::try_from(bytes.as_slice())
    }
}

impl<const SIZE: usize> TryFrom<&str> for Hash<SIZE> {
    type Error = anyhow::Error;

    fn try_from(s: &str) -> anyhow::Result<Self> {
        let bytes = hex::decode(s).map_err(|e| anyhow!(e).context("malformed base16 digest"))?;
        Self::try_from(bytes.as_slice())
    }
}

impl<const SIZE: usize> FromStr for Hash<SIZE> {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::try_from(s)
    }
}

// -------------------------------------------------------------- Conversions

impl<const SIZE: usize> From<[u8; SIZE]> for Hash<SIZE> {
    fn from(bytes: [u8; SIZE]) -> Self {
        Self(bytes)
    }
}

impl<const SIZE: usize> From<Hash<SIZE>> for [u8; SIZE] {
    fn from(hash: Hash<SIZE>) -> Self {
        hash.0
    }
}

impl<const SIZE: usize> From<pallas::Hash<SIZE>> for Hash<SIZE> {
    fn from(hash: pallas::Hash<SIZE>) -> Self {
        Self(*hash)
    }
}

impl<const SIZE: usize> From<&pallas::Hash<SIZE>> for Hash<SIZE> {
    fn from(hash: &pallas::Hash<SIZE>) -> Self {
        Self(**hash)
    }
}

impl<const SIZE: usize> From<Hash<SIZE>> for pallas::Hash<SIZE> {
    fn from(hash: Hash<SIZE>) -> Self {
        pallas::Hash::new(hash.0)
    }
}

impl<const SIZE: usize> From<&Hash<SIZE>> for pallas::Hash<SIZE> {
    fn from(hash: &Hash<SIZE>) -> Self {
        pallas::Hash::new(hash.0)
    }
}

// --------------------------------------------------------------------- CBOR

impl<C, const SIZE: usize> cbor::Encode<C> for Hash<SIZE> {
    fn encode<W: cbor::encode::Write>(
        &self,
        e: &mut cbor::Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), cbor::encode::Error<W::Error>> {
        e.bytes(&self.0)?;
        Ok(())
    }
}

impl<'d, C, const SIZE: usize> cbor::Decode<'d, C> for Hash<SIZE> {
    fn decode(d: &mut cbor::Decoder<'d>, _ctx: &mut C) -> Result<Self, cbor::decode::Error> {
        let bytes = d.bytes()?;
        <[u8; SIZE]>::try_from(bytes)
            .map(Self)
            .map_err(|_| cbor::decode::Error::message("digest of unexpected length"))
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod tests {
    use crate::{Hash, any, cbor::ToCbor, pallas};
    use proptest::prelude::*;

    #[test]
    fn lengths_are_checked() {
        assert!(
            <Hash<32>>::try_from("00000000000000000000000000000000000000000000000000000000").is_err()
        );
        assert!(<Hash<28>>::try_from(vec![0; 28]).is_ok());
        assert!(<Hash<28>>::try_from(vec![0; 32]).is_err());
    }

    #[test]
    fn reject_non_base16() {
        assert!(
            <Hash<28>>::try_from("zz000000000000000000000000000000000000000000000000000000").is_err()
        );
    }

    #[test]
    fn encoded_as_a_bytestring() {
        let hash = <Hash<28>>::from([0xab; 28]);
        let bytes = hash.to_cbor();
        assert_eq!(bytes[..2], [0x58, 0x1c]);
        assert_eq!(crate::cbor::decode::<Hash<28>>(&bytes).unwrap(), hash);
        assert!(crate::cbor::decode::<Hash<32>>(&bytes).is_err());
    }

    proptest! {
        #[test]
        fn display_parse_roundtrip(hash in any::hash32()) {
            prop_assert_eq!(hash.to_string().parse::<Hash<32>>().ok(), Some(hash));
        }
    }

    proptest! {
        #[test]
        fn same_encoding_as_pallas(hash in any::hash28()) {
            prop_assert_eq!(hash.to_cbor(), pallas::Hash::from(hash).to_cbor());
        }
    }

    pub mod generators {
        use super::*;

        pub fn hash28() -> impl Strategy<Value = Hash<28>> {
            any::<[u8; 28]>().prop_map(Hash::from)
        }

        pub fn hash32() -> impl Strategy<Value = Hash<32>> {
            any::<[u8; 32]>().prop_map(Hash::from)
        }
    }
}
