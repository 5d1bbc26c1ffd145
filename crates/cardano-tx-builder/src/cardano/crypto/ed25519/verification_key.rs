//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{Address, Credential, Hash, NetworkId, Signature, address::kind, pallas};
use std::fmt;

/// An ed25519 verification key (non-extended).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct VerificationKey(pallas::ed25519::PublicKey);

impl fmt::Display for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.as_ref()))
    }
}

impl VerificationKey {
    /// Whether `signature` is a valid signature of `message` by this key.
    pub fn verify(&self, message: impl AsRef<[u8]>, signature: &Signature) -> bool {
        self.0.verify(message, signature.into())
    }

    /// The key hash, as found in addresses and required signers.
    pub fn hash(&self) -> Hash<28> {
        Hash::from(pallas::hash::Hasher::<224>::hash(self.as_ref()))
    }

    pub fn to_credential(&self) -> Credential {
        Credential::from(self)
    }

    /// The enterprise address of this key, without delegation.
    pub fn to_address(&self, network_id: NetworkId) -> Address<kind::Shelley> {
        Address::new(network_id, self.to_credential())
    }
}

impl From<pallas::ed25519::PublicKey> for VerificationKey {
    fn from(key: pallas::ed25519::PublicKey) -> Self {
        Self(key)
    }
}

impl From<[u8; 32]> for VerificationKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(pallas::ed25519::PublicKey::from(bytes))
    }
}

impl AsRef<[u8]> for VerificationKey {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}
