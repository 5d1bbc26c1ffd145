//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{Address, Credential, Hash, NetworkId, PlutusVersion, address::kind, pallas};
use std::fmt;

/// A compiled Plutus validator: its language and its serialised form (flat, wrapped in a CBOR
/// bytestring), as found in blueprints under `compiledCode`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlutusScript {
    version: PlutusVersion,
    bytes: Vec<u8>,
}

impl fmt::Display for PlutusScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlutusScript({}, {})", self.version, self.hash())
    }
}

// --------------------------------------------------------------------- Building

impl PlutusScript {
    /// See also [`plutus_script!`](crate::plutus_script!).
    pub fn new(version: PlutusVersion, bytes: Vec<u8>) -> Self {
        Self { version, bytes }
    }
}

// ------------------------------------------------------------------ Inspecting

impl PlutusScript {
    pub fn version(&self) -> PlutusVersion {
        self.version
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// The script hash, which is also the policy id of a minting script.
    ///
    /// ```rust
    /// # use cardano_tx_builder::{PlutusVersion, hash, plutus_script};
    /// assert_eq!(
    ///     plutus_script!(PlutusVersion::V3, "5101010023259800a518a4d136564004ae69").hash(),
    ///     hash!("bd3ae991b5aafccafe5ca70758bd36a9b2f872f57f6d3a1ffa0eb777"),
    /// );
    /// ```
    pub fn hash(&self) -> Hash<28> {
        let mut preimage = Vec::with_capacity(1 + self.bytes.len());
        preimage.push(u8::from(self.version));
        preimage.extend_from_slice(&self.bytes);
        Hash::from(pallas::hash::Hasher::<224>::hash(&preimage))
    }

    /// The enterprise address locked by this script.
    pub fn to_address(&self, network_id: NetworkId) -> Address<kind::Shelley> {
        Address::new(network_id, Credential::from_script(self.hash()))
    }
}

// ------------------------------------------------------------- Converting (to)

impl From<&PlutusScript> for Hash<28> {
    fn from(script: &PlutusScript) -> Self {
        script.hash()
    }
}

#[cfg(test)]
mod tests {
    use crate::{NetworkId, PlutusVersion, hash, plutus_script};

    #[test]
    fn hash_depends_on_the_language() {
        let v2 = plutus_script!(PlutusVersion::V2, "46010100222601");
        let v3 = plutus_script!(PlutusVersion::V3, "46010100222601");
        assert_eq!(
            v2.hash(),
            hash!("30f52a4bd2516b0a5a1267393565e7065c99db49277aed2ffa37ba60")
        );
        assert_eq!(
            v3.hash(),
            hash!("61a2f28177fecb2172720461ab5a517530e4dceac8e5b54c01cfb23f")
        );
    }

    #[test]
    fn script_address() {
        let script = plutus_script!(PlutusVersion::V3, "5101010023259800a518a4d136564004ae69");
        assert_eq!(
            script.to_address(NetworkId::TESTNET).to_string(),
            "addr_test1wz7n46v3kk40ejh7tjnswk9ax65m97rj74lk6wsllg8twac0ke9dm",
        );
    }
}
