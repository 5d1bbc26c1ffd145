//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{Credential, NetworkId, pallas};
use anyhow::anyhow;
use std::{cmp::Ordering, fmt, marker::PhantomData, str::FromStr, sync::Arc};

pub mod kind;
pub use kind::IsAddressKind;

/// An address captures spending and delegation conditions of assets in the network.
///
/// Addresses can be one of two [`kind`]:
///
/// - [`kind::Byron`]: legacy, not longer used. Also called _"bootstrap"_ addresses sometimes.
/// - [`kind::Shelley`]: most used and modern format, which can bear delegation rights.
///
/// An [`Address`] can be constructed in a variety of ways:
///
/// 1. Either directly using the provided builder:
///    - [`Address<kind::Shelley>::new`]
///    - [`Address<kind::Shelley>::with_delegation`]
///
/// 2. Using the [`address!`](crate::address!) or [`address_test!`](crate::address_test!) macros.
///
/// 3. Or by converting from another representation (e.g. bech32 or base58 text strings, or raw
///    bytes):
///
///    ```rust
///    # use cardano_tx_builder::{Address, address::kind};
///    assert!(
///      <Address<kind::Shelley>>::try_from(
///        "addr1v83gkkw3nqzakg5xynlurqcfqhgd65vkfvf5xv8tx25ufds2yvy2h"
///      ).is_ok()
///    );
///
///    assert!(
///      <Address<kind::Shelley>>::try_from(
///        "Ae2tdPwUPEYwNguM7TB3dMnZMfZxn1pjGHyGdjaF4mFqZF9L3bj6cdhiH8t"
///      ).is_err()
///    );
///
///    assert!(
///      <Address<kind::Any>>::try_from(
///        "Ae2tdPwUPEYwNguM7TB3dMnZMfZxn1pjGHyGdjaF4mFqZF9L3bj6cdhiH8t"
///      ).is_ok()
///    );
///    ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address<T: IsAddressKind = kind::Any>(Arc<AddressKind>, PhantomData<T>);

impl<T: IsAddressKind + Eq> PartialOrd for Address<T> {
    fn partial_cmp(&self, rhs: &Self) -> Option<Ordering> {
        Some(self.cmp(rhs))
    }
}

impl<T: IsAddressKind + Eq> Ord for Address<T> {
    fn cmp(&self, rhs: &Self) -> Ordering {
        <Vec<u8>>::from(self).cmp(&<Vec<u8>>::from(rhs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AddressKind {
    Byron(pallas::ByronAddress),
    Shelley(pallas::ShelleyAddress),
}

// ------------------------------------------------------ Building (Shelley)

impl Address<kind::Shelley> {
    /// See also [`address!`](crate::address!)/[`address_test!`](crate::address_test!)
    pub fn new(network: NetworkId, payment: Credential) -> Self {
        Self::from(pallas::ShelleyAddress::new(
            pallas::Network::from(network),
            pallas::ShelleyPaymentPart::from(payment),
            pallas::ShelleyDelegationPart::Null,
        ))
    }

    /// See also [`address!`](crate::address!)/[`address_test!`](crate::address_test!)
    pub fn with_delegation(self, delegation: Credential) -> Self {
        Self::from(pallas::ShelleyAddress::new(
            pallas::Network::from(self.network_id()),
            pallas::ShelleyPaymentPart::from(self.payment()),
            pallas::ShelleyDelegationPart::from(delegation),
        ))
    }
}

// ---------------------------------------------------- Inspecting (Shelley)

impl Address<kind::Shelley> {
    fn cast(&self) -> &pallas::ShelleyAddress {
        match self.0.as_ref() {
            AddressKind::Shelley(shelley) => shelley,
            AddressKind::Byron(..) => unreachable!("byron address behind a shelley kind"),
        }
    }

    pub fn network_id(&self) -> NetworkId {
        NetworkId::from(self.cast().network())
    }

    pub fn payment(&self) -> Credential {
        Credential::from(self.cast().payment())
    }

    pub fn delegation(&self) -> Option<Credential> {
        Credential::try_from(self.cast().delegation()).ok()
    }
}

// ------------------------------------------------------------- Constructing (Any)

impl Default for Address<kind::Any> {
    fn default() -> Self {
        Self::from(
            Address::new(NetworkId::MAINNET, Credential::from_key([0; 28].into()))
                .with_delegation(Credential::from_key([0; 28].into())),
        )
    }
}

// ------------------------------------------------------------- Inspecting (Any)

impl<T: IsAddressKind> Address<T> {
    /// Check whether an address is a [`kind::Byron`] address. To carry this proof at the
    /// type-level, use [`Self::as_byron`].
    pub fn is_byron(&self) -> bool {
        matches!(self.0.as_ref(), &AddressKind::Byron(..))
    }

    /// Refine the kind of the address, assuming it is a [`kind::Byron`].
    pub fn as_byron(&self) -> Option<Address<kind::Byron>> {
        if self.is_byron() {
            return Some(Address(self.0.clone(), PhantomData));
        }

        None
    }

    /// Check whether an address is a [`kind::Shelley`] address. To carry this proof at the
    /// type-level, use [`Self::as_shelley`].
    ///
    /// # examples
    ///
    /// ```rust
    /// # use cardano_tx_builder::{address};
    /// assert!(
    ///     address!("addr1v83gkkw3nqzakg5xynlurqcfqhgd65vkfvf5xv8tx25ufds2yvy2h").is_shelley(),
    /// );
    /// ```
    pub fn is_shelley(&self) -> bool {
        matches!(&self.0.as_ref(), AddressKind::Shelley(..))
    }

    /// Refine the kind of the address, assuming it is a [`kind::Shelley`] to enable specific methods
    /// for this kind.
    pub fn as_shelley(&self) -> Option<Address<kind::Shelley>> {
        if self.is_shelley() {
            return Some(Address(self.0.clone(), PhantomData));
        }

        None
    }

    /// The key hash of the payment part, when the address is a Shelley address locked by a key.
    pub fn payment_key_hash(&self) -> Option<crate::Hash<28>> {
        self.as_shelley()?.payment().as_key()
    }

    /// The script hash of the payment part, when the address is a Shelley address locked by a
    /// script.
    pub fn payment_script_hash(&self) -> Option<crate::Hash<28>> {
        self.as_shelley()?.payment().as_script()
    }
}

// ----------------------------------------------------------- Converting (from)

impl From<pallas::ByronAddress> for Address<kind::Byron> {
    fn from(byron_address: pallas::ByronAddress) -> Self {
        Self(Arc::new(AddressKind::Byron(byron_address)), PhantomData)
    }
}

impl From<pallas::ShelleyAddress> for Address<kind::Shelley> {
    fn from(shelley_address: pallas::ShelleyAddress) -> Self {
        Self(Arc::new(AddressKind::Shelley(shelley_address)), PhantomData)
    }
}

impl From<Address<kind::Byron>> for Address<kind::Any> {
    fn from(byron_address: Address<kind::Byron>) -> Self {
        Self(byron_address.0, PhantomData)
    }
}

impl From<Address<kind::Shelley>> for Address<kind::Any> {
    fn from(shelley_address: Address<kind::Shelley>) -> Self {
        Self(shelley_address.0, PhantomData)
    }
}

impl TryFrom<pallas::Address> for Address<kind::Any> {
    type Error = anyhow::Error;

    fn try_from(address: pallas::Address) -> anyhow::Result<Self> {
        match address {
            pallas::Address::Byron(byron) => Ok(Address::<kind::Any>(
                Arc::new(AddressKind::Byron(byron)),
                PhantomData,
            )),
            pallas::Address::Shelley(shelley) => Ok(Address::<kind::Any>(
                Arc::new(AddressKind::Shelley(shelley)),
                PhantomData,
            )),
            pallas::Address::Stake(_) => {
                Err(anyhow!("found stake address masquerading as address"))
            }
        }
    }
}

impl TryFrom<pallas::Address> for Address<kind::Shelley> {
    type Error = anyhow::Error;

    fn try_from(address: pallas::Address) -> anyhow::Result<Self> {
        match address {
            pallas::Address::Shelley(shelley) => Ok(Address::<kind::Shelley>(
                Arc::new(AddressKind::Shelley(shelley)),
                PhantomData,
            )),
            pallas::Address::Byron(_) | pallas::Address::Stake(_) => {
                Err(anyhow!("not a shelley address"))
            }
        }
    }
}

impl<T: IsAddressKind> TryFrom<&str> for Address<T>
where
    Address<T>: TryFrom<pallas::Address, Error = anyhow::Error>,
{
    type Error = anyhow::Error;

    fn try_from(text: &str) -> anyhow::Result<Self> {
        Self::try_from(
            pallas::Address::from_str(text)
                .map_err(|e| anyhow!(e).context(format!("invalid address: {text}")))?,
        )
    }
}

impl<T: IsAddressKind> FromStr for Address<T>
where
    Address<T>: for<'a> TryFrom<&'a str, Error = anyhow::Error>,
{
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Address<T>> {
        Self::try_from(s)
    }
}

impl<T: IsAddressKind> TryFrom<&[u8]> for Address<T>
where
    Address<T>: TryFrom<pallas::Address, Error = anyhow::Error>,
{
    type Error = anyhow::Error;

    fn try_from(bytes: &[u8]) -> anyhow::Result<Self> {
        Self::try_from(pallas::Address::from_bytes(bytes).map_err(|e| anyhow!(e))?)
    }
}

// --------------------------------------------------------------- Converting (to)

impl<T: IsAddressKind> fmt::Display for Address<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.0.as_ref() {
            AddressKind::Byron(byron) => f.write_str(byron.to_base58().as_str()),
            AddressKind::Shelley(shelley) => {
                f.write_str(shelley.to_bech32().map_err(|_| fmt::Error)?.as_str())
            }
        }
    }
}

impl<T: IsAddressKind> From<&Address<T>> for Vec<u8> {
    fn from(address: &Address<T>) -> Self {
        match address.0.as_ref() {
            AddressKind::Byron(byron) => byron.to_vec(),
            AddressKind::Shelley(shelley) => shelley.to_vec(),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod tests {
    use crate::{Address, address::kind::*, address_test, any, key_credential};
    use proptest::{option, prelude::*};

    // -------------------------------------------------------------- Unit tests

    #[test]
    fn inspect_base_address() {
        let address = address_test!(
            "addr_test1qzr058he2g4ulqn7pd0xjeejkaa2kmf5ak6aa9psqtycc98y7tj6wypp0ezp257naukqyd6026r32dfzq79anlnf0pes7n99lf"
        );

        assert_eq!(
            address.payment_key_hash().map(|hash| hash.to_string()),
            Some("86fa1ef9522bcf827e0b5e696732b77aab6d34edb5de943002c98c14".to_string()),
        );

        assert_eq!(
            address
                .as_shelley()
                .and_then(|shelley| shelley.delegation())
                .and_then(|credential| credential.as_key())
                .map(|hash| hash.to_string()),
            Some("e4f2e5a710217e441553d3ef2c02374f5687153522078bd9fe697873".to_string()),
        );

        assert_eq!(address.payment_script_hash(), None);
    }

    #[test]
    fn display_enterprise_testnet_address() {
        assert_eq!(
            address_test!(key_credential!(
                "00000000000000000000000000000000000000000000000000000000"
            ))
            .to_string(),
            "addr_test1vqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqd9tg5t",
        );
    }

    // -------------------------------------------------------------- Properties

    proptest! {
        #[test]
        fn bech32_roundtrip(address in any::address_shelley()) {
            let text = address.to_string();
            let address_back: Address<Shelley> = text.parse().map_err(|e| TestCaseError::fail(format!("{e:?}")))?;
            prop_assert_eq!(address, address_back);
        }
    }

    // -------------------------------------------------------------- Generators

    pub mod generators {
        use super::*;

        prop_compose! {
            pub fn address_shelley()(
                network_id in any::network_id(),
                payment_credential in any::credential(),
                delegation_credential_opt in option::of(any::credential()),
            ) -> Address<Shelley> {
                let address = Address::new(network_id, payment_credential);

                if let Some(delegation_credential) = delegation_credential_opt {
                    return address.with_delegation(delegation_credential)
                }

                address
            }
        }
    }
}
