//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::pallas;
use std::fmt;

/// Points a redeemer at what it unlocks: the n-th (sorted) input, or the n-th (sorted) minting
/// policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RedeemerPointer {
    Spend(u32),
    Mint(u32),
}

impl fmt::Display for RedeemerPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spend(index) => write!(f, "spend#{index}"),
            Self::Mint(index) => write!(f, "mint#{index}"),
        }
    }
}

impl RedeemerPointer {
    pub fn spend(index: usize) -> Self {
        Self::Spend(index as u32)
    }

    pub fn mint(index: usize) -> Self {
        Self::Mint(index as u32)
    }

    pub fn index(&self) -> u32 {
        match self {
            Self::Spend(index) | Self::Mint(index) => *index,
        }
    }
}

// ----------------------------------------------------------- Converting (from)

impl TryFrom<&pallas::RedeemersKey> for RedeemerPointer {
    type Error = anyhow::Error;

    fn try_from(key: &pallas::RedeemersKey) -> anyhow::Result<Self> {
        match key.tag {
            pallas::RedeemerTag::Spend => Ok(Self::Spend(key.index)),
            pallas::RedeemerTag::Mint => Ok(Self::Mint(key.index)),
            tag => Err(anyhow::anyhow!("unsupported redeemer purpose: {tag:?}")),
        }
    }
}

// ------------------------------------------------------------- Converting (to)

impl From<RedeemerPointer> for pallas::RedeemersKey {
    fn from(ptr: RedeemerPointer) -> Self {
        let (tag, index) = match ptr {
            RedeemerPointer::Spend(index) => (pallas::RedeemerTag::Spend, index),
            RedeemerPointer::Mint(index) => (pallas::RedeemerTag::Mint, index),
        };
        pallas::RedeemersKey { tag, index }
    }
}

#[cfg(test)]
mod tests {
    use crate::{RedeemerPointer, pallas};

    #[test]
    fn spend_before_mint() {
        assert!(RedeemerPointer::spend(10) < RedeemerPointer::mint(0));
        assert_eq!(RedeemerPointer::mint(3).to_string(), "mint#3");
    }

    #[test]
    fn other_purposes_are_rejected() {
        let key = pallas::RedeemersKey {
            tag: pallas::RedeemerTag::Reward,
            index: 0,
        };
        assert!(RedeemerPointer::try_from(&key).is_err());

        let key = pallas::RedeemersKey::from(RedeemerPointer::spend(2));
        assert_eq!(RedeemerPointer::try_from(&key).unwrap(), RedeemerPointer::spend(2));
    }
}
