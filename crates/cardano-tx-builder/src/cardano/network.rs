//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{NetworkId, ProtocolParameters};
use anyhow::anyhow;
use std::{fmt, str::FromStr};

/// A known Cardano network. Unlike [`NetworkId`], this distinguishes between the public testnets,
/// which matters for protocol magics, slot configurations and provider endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Network {
    Mainnet,
    Preprod,
    Preview,
}

impl Network {
    pub const MAINNET_MAGIC: u64 = 764824073;
    pub const PREPROD_MAGIC: u64 = 1;
    pub const PREVIEW_MAGIC: u64 = 2;
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(match self {
            Self::Mainnet => "mainnet",
            Self::Preprod => "preprod",
            Self::Preview => "preview",
        })
    }
}

// ------------------------------------------------------------------ Inspecting

impl Network {
    pub fn is_mainnet(&self) -> bool {
        self == &Network::Mainnet
    }

    pub fn is_testnet(&self) -> bool {
        !self.is_mainnet()
    }
}

// ----------------------------------------------------------- Converting (from)

impl TryFrom<&str> for Network {
    type Error = anyhow::Error;

    fn try_from(text: &str) -> anyhow::Result<Self> {
        match text.to_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "preprod" => Ok(Self::Preprod),
            "preview" => Ok(Self::Preview),
            _ => Err(anyhow!(
                "unsupported network: {text}; should be one of {}, {}, {}",
                Self::Mainnet,
                Self::Preprod,
                Self::Preview
            )),
        }
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::try_from(s)
    }
}

// ------------------------------------------------------------- Converting (to)

impl From<Network> for u64 {
    fn from(network: Network) -> Self {
        match network {
            Network::Mainnet => Network::MAINNET_MAGIC,
            Network::Preprod => Network::PREPROD_MAGIC,
            Network::Preview => Network::PREVIEW_MAGIC,
        }
    }
}

impl From<Network> for NetworkId {
    fn from(network: Network) -> NetworkId {
        match network {
            Network::Mainnet => NetworkId::MAINNET,
            Network::Preprod | Network::Preview => NetworkId::TESTNET,
        }
    }
}

impl From<Network> for ProtocolParameters {
    fn from(network: Network) -> ProtocolParameters {
        match network {
            Network::Mainnet => Self::mainnet(),
            Network::Preprod => Self::preprod(),
            Network::Preview => Self::preview(),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod tests {
    use crate::{Network, NetworkId};
    use proptest::prelude::*;

    // -------------------------------------------------------------- Unit tests

    #[test]
    fn display_mainnet() {
        assert_eq!(Network::Mainnet.to_string(), "mainnet")
    }

    #[test]
    fn parse_case_insensitive() {
        assert_eq!("Preview".parse::<Network>().ok(), Some(Network::Preview));
        assert!("sanchonet".parse::<Network>().is_err());
    }

    #[test]
    fn magics() {
        assert_eq!(u64::from(Network::Mainnet), 764824073);
        assert_eq!(u64::from(Network::Preprod), 1);
        assert_eq!(u64::from(Network::Preview), 2);
    }

    // -------------------------------------------------------------- Properties

    proptest! {
        #[test]
        fn only_mainnet_has_mainnet_id(network in generators::network()) {
            prop_assert_eq!(NetworkId::from(network) == NetworkId::MAINNET, network.is_mainnet());
        }
    }

    // -------------------------------------------------------------- Generators

    pub mod generators {
        use super::*;

        pub fn network() -> impl Strategy<Value = Network> {
            prop_oneof![
                Just(Network::Mainnet),
                Just(Network::Preprod),
                Just(Network::Preview),
            ]
        }
    }
}
