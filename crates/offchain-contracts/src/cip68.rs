//! CIP-67 asset name labels, and the token classes of CIP-68 built upon them.
//!
//! A label is a 4-byte prefix to an asset name: `0000 | number (16 bits) | crc-8 (8 bits) | 0000`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(u16);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0)
    }
}

impl Label {
    /// Holds the metadata of a token, locked at a script.
    pub const REFERENCE_NFT: Self = Self(100);
    pub const USER_NFT: Self = Self(222);
    pub const USER_FT: Self = Self(333);
    pub const USER_RFT: Self = Self(444);

    pub const PREFIX_LENGTH: usize = 4;

    pub fn new(number: u16) -> Self {
        Self(number)
    }

    pub fn number(&self) -> u16 {
        self.0
    }

    pub fn prefix(&self) -> [u8; Self::PREFIX_LENGTH] {
        let checksum = crc8(&self.0.to_be_bytes());
        ((u32::from(self.0) << 12) | (u32::from(checksum) << 4)).to_be_bytes()
    }

    /// Prefix a base asset name with the label.
    pub fn token_name(&self, base: &[u8]) -> Vec<u8> {
        let mut name = Vec::with_capacity(Self::PREFIX_LENGTH + base.len());
        name.extend_from_slice(&self.prefix());
        name.extend_from_slice(base);
        name
    }

    /// Split a labelled asset name into its label and base name. `None` when the name doesn't
    /// start with a well-formed label.
    pub fn parse(asset_name: &[u8]) -> Option<(Self, &[u8])> {
        let (prefix, base) = asset_name.split_at_checked(Self::PREFIX_LENGTH)?;
        let word = u32::from_be_bytes(<[u8; Self::PREFIX_LENGTH]>::try_from(prefix).ok()?);

        if word >> 28 != 0 || word & 0x0f != 0 {
            return None;
        }

        let label = Self(((word >> 12) & 0xffff) as u16);
        let checksum = ((word >> 4) & 0xff) as u8;

        (crc8(&label.0.to_be_bytes()) == checksum).then_some((label, base))
    }
}

pub fn reference_token_name(base: &[u8]) -> Vec<u8> {
    Label::REFERENCE_NFT.token_name(base)
}

pub fn user_token_name(base: &[u8]) -> Vec<u8> {
    Label::USER_NFT.token_name(base)
}

/// CRC-8, polynomial 0x07, no reflection, zero initial value.
fn crc8(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |crc, byte| {
        (0..8).fold(crc ^ byte, |crc, _| {
            if crc & 0x80 != 0 {
                (crc << 1) ^ 0x07
            } else {
                crc << 1
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::{Label, reference_token_name, user_token_name};
    use proptest::prelude::*;

    #[test]
    fn well_known_prefixes() {
        for (label, prefix) in [
            (Label::REFERENCE_NFT, "000643b0"),
            (Label::USER_NFT, "000de140"),
            (Label::USER_FT, "0014df10"),
            (Label::USER_RFT, "001bc280"),
        ] {
            assert_eq!(hex::encode(label.prefix()), prefix, "label {label}");
        }
    }

    #[test]
    fn labelled_names() {
        assert_eq!(
            hex::encode(reference_token_name(b"Nami")),
            "000643b04e616d69"
        );
        assert_eq!(hex::encode(user_token_name(b"Nami")), "000de1404e616d69");
    }

    #[test]
    fn parse_labelled_names() {
        let name = hex::decode("000de1404e616d69").unwrap();
        assert_eq!(
            Label::parse(&name),
            Some((Label::USER_NFT, b"Nami".as_slice()))
        );

        // Bad checksum
        assert_eq!(Label::parse(&hex::decode("000de1504e616d69").unwrap()), None);
        // Non-zero outer nibbles
        assert_eq!(Label::parse(&hex::decode("100de140").unwrap()), None);
        assert_eq!(Label::parse(&hex::decode("000de141").unwrap()), None);
        // Too short
        assert_eq!(Label::parse(&hex::decode("000de1").unwrap()), None);
    }

    proptest! {
        #[test]
        fn reference_and_user_names_are_distinct(
            base in prop::collection::vec(any::<u8>(), 0..=28),
        ) {
            let reference = reference_token_name(&base);
            let user = user_token_name(&base);

            prop_assert_ne!(&reference, &user);
            prop_assert_eq!(&reference, &reference_token_name(&base));
            prop_assert_eq!(&user, &user_token_name(&base));
            prop_assert_eq!(&reference[4..], base.as_slice());
            prop_assert_eq!(&user[4..], base.as_slice());
        }

        #[test]
        fn every_label_parses_back(
            number in any::<u16>(),
            base in prop::collection::vec(any::<u8>(), 0..=28),
        ) {
            let label = Label::new(number);
            let name = label.token_name(&base);
            prop_assert_eq!(Label::parse(&name), Some((label, base.as_slice())));
        }
    }
}
