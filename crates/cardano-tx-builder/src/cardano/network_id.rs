//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::pallas;
use anyhow::anyhow;
use std::fmt;

/// The network bit of Shelley address headers: `1` on mainnet, `0` on every testnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NetworkId(u8);

impl NetworkId {
    pub const MAINNET: Self = Self(1);
    pub const TESTNET: Self = Self(0);

    pub fn is_mainnet(&self) -> bool {
        *self == Self::MAINNET
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_mainnet() { "mainnet" } else { "testnet" })
    }
}

impl TryFrom<u8> for NetworkId {
    type Error = anyhow::Error;

    fn try_from(i: u8) -> anyhow::Result<Self> {
        match i {
            0 => Ok(Self::TESTNET),
            1 => Ok(Self::MAINNET),
            _ => Err(anyhow!("invalid network id {i}; expected 0 (testnet) or 1 (mainnet)")),
        }
    }
}

impl From<NetworkId> for u8 {
    fn from(network_id: NetworkId) -> Self {
        network_id.0
    }
}

/// Anything other than mainnet counts as a testnet.
impl From<pallas::Network> for NetworkId {
    fn from(network: pallas::Network) -> Self {
        match network {
            pallas::Network::Mainnet => Self::MAINNET,
            pallas::Network::Testnet | pallas::Network::Other(..) => Self::TESTNET,
        }
    }
}

impl From<NetworkId> for pallas::Network {
    fn from(network_id: NetworkId) -> Self {
        if network_id.is_mainnet() {
            pallas::Network::Mainnet
        } else {
            pallas::Network::Testnet
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod tests {
    use crate::{NetworkId, any, pallas};
    use proptest::prelude::*;

    #[test]
    fn from_u8() {
        assert_eq!(NetworkId::try_from(0).ok(), Some(NetworkId::TESTNET));
        assert_eq!(NetworkId::try_from(1).ok(), Some(NetworkId::MAINNET));
        assert!(NetworkId::try_from(2).is_err());
    }

    #[test]
    fn other_pallas_networks_are_testnets() {
        assert_eq!(NetworkId::from(pallas::Network::Other(42)), NetworkId::TESTNET);
    }

    proptest! {
        #[test]
        fn u8_roundtrip(network_id in any::network_id()) {
            prop_assert_eq!(NetworkId::try_from(u8::from(network_id)).ok(), Some(network_id));
        }
    }

    pub mod generators {
        use super::*;

        pub fn network_id() -> impl Strategy<Value = NetworkId> {
            prop_oneof![Just(NetworkId::MAINNET), Just(NetworkId::TESTNET)]
        }
    }
}
