//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::cbor;
use anyhow::anyhow;
use std::{fmt, str::FromStr};

/// A Plutus language version. Its CBOR encoding is the ledger's language tag, as found in cost
/// model maps and script integrity hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, cbor::Encode, cbor::Decode)]
#[cbor(index_only)]
pub enum PlutusVersion {
    #[n(0)]
    V1,
    #[n(1)]
    V2,
    #[n(2)]
    V3,
}

impl fmt::Display for PlutusVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", u8::from(*self))
    }
}

/// Accepts `"v3"`, `"V3"`, `"PlutusV3"` or `"3"` (and likewise for other versions).
impl FromStr for PlutusVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let lower = s.to_ascii_lowercase();
        let digits = lower
            .strip_prefix("plutus")
            .unwrap_or(lower.as_str())
            .trim_start_matches('v');
        let version: u8 = digits
            .parse()
            .map_err(|e| anyhow!("{e}").context(format!("malformed plutus version: {s}")))?;
        Self::try_from(version)
    }
}

impl TryFrom<u8> for PlutusVersion {
    type Error = anyhow::Error;

    fn try_from(version: u8) -> anyhow::Result<Self> {
        match version {
            1 => Ok(PlutusVersion::V1),
            2 => Ok(PlutusVersion::V2),
            3 => Ok(PlutusVersion::V3),
            _ => Err(anyhow!("unknown plutus version: {version}")),
        }
    }
}

/// The version number, which is also the byte prefixed to a script before hashing it.
impl From<PlutusVersion> for u8 {
    fn from(version: PlutusVersion) -> Self {
        match version {
            PlutusVersion::V1 => 1,
            PlutusVersion::V2 => 2,
            PlutusVersion::V3 => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{PlutusVersion, cbor::ToCbor};

    #[test]
    fn parse_blueprint_notation() {
        assert_eq!("v3".parse::<PlutusVersion>().unwrap(), PlutusVersion::V3);
        assert_eq!("PlutusV2".parse::<PlutusVersion>().unwrap(), PlutusVersion::V2);
        assert_eq!("1".parse::<PlutusVersion>().unwrap(), PlutusVersion::V1);
        assert!("v4".parse::<PlutusVersion>().is_err());
        assert!("plutus".parse::<PlutusVersion>().is_err());
    }

    #[test]
    fn language_tags() {
        assert_eq!(PlutusVersion::V1.to_cbor(), vec![0x00]);
        assert_eq!(PlutusVersion::V3.to_cbor(), vec![0x02]);
    }
}
