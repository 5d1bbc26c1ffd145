//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{Hash, VerificationKey, pallas};
use anyhow::anyhow;
use std::fmt;

/// What controls an address part: the hash of a verification key, or the hash of a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Credential {
    Key(Hash<28>),
    Script(Hash<28>),
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(hash) => write!(f, "Key({hash})"),
            Self::Script(hash) => write!(f, "Script({hash})"),
        }
    }
}

impl Credential {
    /// See also [`key_credential!`](crate::key_credential).
    pub fn from_key(hash: Hash<28>) -> Self {
        Self::Key(hash)
    }

    /// See also [`script_credential!`](crate::script_credential).
    pub fn from_script(hash: Hash<28>) -> Self {
        Self::Script(hash)
    }

    pub fn as_key(&self) -> Option<Hash<28>> {
        match self {
            Self::Key(hash) => Some(*hash),
            Self::Script(..) => None,
        }
    }

    pub fn as_script(&self) -> Option<Hash<28>> {
        match self {
            Self::Script(hash) => Some(*hash),
            Self::Key(..) => None,
        }
    }
}

impl From<&VerificationKey> for Credential {
    fn from(key: &VerificationKey) -> Self {
        Self::Key(key.hash())
    }
}

// --------------------------------------------------- Address parts (pallas)

impl From<&pallas::ShelleyPaymentPart> for Credential {
    fn from(part: &pallas::ShelleyPaymentPart) -> Self {
        match part {
            pallas::ShelleyPaymentPart::Key(hash) => Self::Key(Hash::from(hash)),
            pallas::ShelleyPaymentPart::Script(hash) => Self::Script(Hash::from(hash)),
        }
    }
}

/// Only key and script delegations carry a credential; pointers are not supported.
impl TryFrom<&pallas::ShelleyDelegationPart> for Credential {
    type Error = anyhow::Error;

    fn try_from(part: &pallas::ShelleyDelegationPart) -> anyhow::Result<Self> {
        match part {
            pallas::ShelleyDelegationPart::Key(hash) => Ok(Self::Key(Hash::from(hash))),
            pallas::ShelleyDelegationPart::Script(hash) => Ok(Self::Script(Hash::from(hash))),
            pallas::ShelleyDelegationPart::Pointer(..) => {
                Err(anyhow!("unsupported pointer delegation: {part:?}"))
            }
            pallas::ShelleyDelegationPart::Null => Err(anyhow!("address without delegation")),
        }
    }
}

impl From<Credential> for pallas::ShelleyPaymentPart {
    fn from(credential: Credential) -> Self {
        match credential {
            Credential::Key(hash) => Self::Key(hash.into()),
            Credential::Script(hash) => Self::Script(hash.into()),
        }
    }
}

impl From<Credential> for pallas::ShelleyDelegationPart {
    fn from(credential: Credential) -> Self {
        match credential {
            Credential::Key(hash) => Self::Key(hash.into()),
            Credential::Script(hash) => Self::Script(hash.into()),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod tests {
    use crate::{Credential, SigningKey, any, key_credential, pallas, script_credential};
    use proptest::prelude::*;

    #[test]
    fn display() {
        assert_eq!(
            key_credential!("bd3ae991b5aafccafe5ca70758bd36a9b2f872f57f6d3a1ffa0eb777").to_string(),
            "Key(bd3ae991b5aafccafe5ca70758bd36a9b2f872f57f6d3a1ffa0eb777)",
        );
        assert_eq!(
            script_credential!("bd3ae991b5aafccafe5ca70758bd36a9b2f872f57f6d3a1ffa0eb777")
                .to_string(),
            "Script(bd3ae991b5aafccafe5ca70758bd36a9b2f872f57f6d3a1ffa0eb777)",
        );
    }

    #[test]
    fn verification_keys_give_key_credentials() {
        let key = SigningKey::from([7; 32]).to_verification_key();
        assert_eq!(Credential::from(&key).as_key(), Some(key.hash()));
        assert_eq!(Credential::from(&key).as_script(), None);
    }

    #[test]
    fn no_credential_behind_null_delegation() {
        assert!(Credential::try_from(&pallas::ShelleyDelegationPart::Null).is_err());
    }

    proptest! {
        #[test]
        fn payment_part_roundtrip(credential in any::credential()) {
            let part = pallas::ShelleyPaymentPart::from(credential);
            prop_assert_eq!(Credential::from(&part), credential);
        }
    }

    proptest! {
        #[test]
        fn delegation_part_roundtrip(credential in any::credential()) {
            let part = pallas::ShelleyDelegationPart::from(credential);
            prop_assert_eq!(Credential::try_from(&part).ok(), Some(credential));
        }
    }

    pub mod generators {
        use super::*;

        pub fn credential() -> impl Strategy<Value = Credential> {
            prop_oneof![
                any::hash28().prop_map(Credential::Key),
                any::hash28().prop_map(Credential::Script),
            ]
        }
    }
}
