//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::Hash;
use anyhow::anyhow;
use std::{fmt, str::FromStr};

/// A native asset: a minting policy and an asset name (at most 32 bytes).
///
/// Its text form is the _unit_ used by chain indexers: the base16 policy id immediately followed
/// by the base16 asset name.
///
/// ```rust
/// # use cardano_tx_builder::{AssetId, hash};
/// let snek: AssetId = "279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f534e454b"
///     .parse()
///     .unwrap();
/// assert_eq!(snek.policy(), hash!("279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f"));
/// assert_eq!(snek.name(), b"SNEK");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AssetId {
    policy: Hash<28>,
    name: Vec<u8>,
}

/// The reserved unit denoting Ada.
pub const LOVELACE_UNIT: &str = "lovelace";

impl AssetId {
    pub const MAX_NAME_LENGTH: usize = 32;

    pub fn new(policy: Hash<28>, name: Vec<u8>) -> Self {
        Self { policy, name }
    }

    pub fn policy(&self) -> Hash<28> {
        self.policy
    }

    pub fn name(&self) -> &[u8] {
        self.name.as_slice()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.policy, hex::encode(&self.name))
    }
}

impl FromStr for AssetId {
    type Err = anyhow::Error;

    fn from_str(unit: &str) -> anyhow::Result<Self> {
        if unit == LOVELACE_UNIT {
            return Err(anyhow!("'{LOVELACE_UNIT}' is not a native asset"));
        }

        let (policy, name) = unit
            .split_at_checked(56)
            .ok_or_else(|| anyhow!("asset unit too short: {unit}"))?;

        let name = hex::decode(name)
            .map_err(|e| anyhow!(e).context(format!("malformed asset name in unit: {unit}")))?;

        if name.len() > Self::MAX_NAME_LENGTH {
            return Err(anyhow!("asset name longer than {} bytes", Self::MAX_NAME_LENGTH)
                .context(format!("unit={unit}")));
        }

        Ok(Self::new(policy.parse()?, name))
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod tests {
    use crate::{AssetId, any};
    use proptest::{collection, prelude::*};

    // -------------------------------------------------------------- Unit tests

    #[test]
    fn reject_lovelace() {
        assert!("lovelace".parse::<AssetId>().is_err());
    }

    #[test]
    fn empty_asset_name() {
        let asset: Result<AssetId, _> =
            "279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f".parse();
        assert!(asset.is_ok_and(|asset| asset.name().is_empty()));
    }

    // -------------------------------------------------------------- Properties

    proptest! {
        #[test]
        fn unit_roundtrip(asset in any::asset_id()) {
            let asset_back: AssetId = asset.to_string().parse().map_err(|e| TestCaseError::fail(format!("{e:?}")))?;
            prop_assert_eq!(asset, asset_back);
        }
    }

    // -------------------------------------------------------------- Generators

    pub mod generators {
        use super::*;

        prop_compose! {
            pub fn asset_id()(
                policy in any::hash28(),
                name in collection::vec(any::<u8>(), 0..=AssetId::MAX_NAME_LENGTH),
            ) -> AssetId {
                AssetId::new(policy, name)
            }
        }
    }
}
