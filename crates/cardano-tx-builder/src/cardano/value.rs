//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{AssetId, Hash, cbor, pallas};
use anyhow::anyhow;
use num::{CheckedSub, Num, Zero};
use std::{collections::BTreeMap, fmt};

/// Lovelace and native assets, indexed by policy then asset name.
///
/// `Quantity` is `u64` for what outputs hold, and `i64` for mints where negative quantities
/// denote burns. Assets with a null quantity are never kept around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value<Quantity>(u64, BTreeMap<Hash<28>, BTreeMap<Vec<u8>, Quantity>>);

impl<Quantity: fmt::Debug> fmt::Display for Value<Quantity> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = f.debug_struct("Value");

        value.field("lovelace", &self.0);

        if !self.1.is_empty() {
            value.field(
                "assets",
                &DebugWith(|f: &mut fmt::Formatter<'_>| {
                    f.debug_map()
                        .entries(self.1.iter().map(|(policy, assets)| {
                            (
                                Unquoted(policy),
                                DebugWith(move |f: &mut fmt::Formatter<'_>| {
                                    f.debug_map()
                                        .entries(assets.iter().map(|(name, quantity)| {
                                            (AssetName(name), quantity)
                                        }))
                                        .finish()
                                }),
                            )
                        }))
                        .finish()
                }),
            );
        }

        value.finish()
    }
}

/// Debug-formats through a closure, to nest maps within a `debug_struct`.
struct DebugWith<F>(F);

impl<F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result> fmt::Debug for DebugWith<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.0)(f)
    }
}

/// Map keys without surrounding quotes.
struct Unquoted<'a, T: fmt::Display>(&'a T);

impl<T: fmt::Display> fmt::Debug for Unquoted<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0, f)
    }
}

/// Asset names shown as text when they are valid utf-8, and as base16 otherwise.
struct AssetName<'a>(&'a [u8]);

impl fmt::Debug for AssetName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for AssetName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match str::from_utf8(self.0) {
            Ok(text) => f.write_str(text),
            Err(_) => f.write_str(&hex::encode(self.0)),
        }
    }
}

// -------------------------------------------------------------------- Building

impl<Quantity> Default for Value<Quantity> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<Quantity> Value<Quantity> {
    pub fn new(lovelace: u64) -> Self {
        Self(lovelace, BTreeMap::new())
    }

    pub fn with_lovelace(&mut self, lovelace: u64) -> &mut Self {
        self.0 = lovelace;
        self
    }
}

impl<Quantity: Zero> Value<Quantity> {
    /// Add assets to the value, overriding quantities of assets already present.
    pub fn with_assets<Name: AsRef<[u8]>>(
        mut self,
        assets: impl IntoIterator<Item = (Hash<28>, impl IntoIterator<Item = (Name, Quantity)>)>,
    ) -> Self {
        for (policy, names) in assets {
            let inner = self.1.entry(policy).or_default();
            for (name, quantity) in names {
                inner.insert(name.as_ref().to_vec(), quantity);
            }
        }

        prune_null_values(&mut self.1);

        self
    }

    /// Set the quantity of a single asset; a null quantity removes it.
    pub fn with_asset(mut self, asset: &AssetId, quantity: Quantity) -> Self {
        self.1
            .entry(asset.policy())
            .or_default()
            .insert(asset.name().to_vec(), quantity);

        prune_null_values(&mut self.1);

        self
    }
}

impl<Quantity: Num + CheckedSub + Copy + fmt::Display> Value<Quantity> {
    pub fn add(&mut self, rhs: &Self) -> &mut Self {
        self.0 += rhs.0;

        for (policy, assets) in &rhs.1 {
            let lhs = self.1.entry(*policy).or_default();
            for (name, quantity) in assets {
                let total = lhs.entry(name.clone()).or_insert_with(Quantity::zero);
                *total = *total + *quantity;
            }
        }

        prune_null_values(&mut self.1);

        self
    }

    /// Subtract `rhs` from this value, failing when any quantity would go below zero (or, for
    /// signed quantities, when an asset is simply absent from the left-hand side).
    pub fn checked_sub(&mut self, rhs: &Self) -> anyhow::Result<&mut Self> {
        self.0 = self.0.checked_sub(rhs.0).ok_or_else(|| {
            anyhow!("insufficient lovelace").context(format!("lhs={}, rhs={}", self.0, rhs.0))
        })?;

        for (policy, assets) in &rhs.1 {
            for (name, quantity) in assets {
                let available = self
                    .1
                    .get_mut(policy)
                    .and_then(|inner| inner.get_mut(name))
                    .ok_or_else(|| {
                        anyhow!("policy={policy}, asset name={}", AssetName(name))
                            .context("insufficient asset: not present")
                    })?;

                *available = available.checked_sub(quantity).ok_or_else(|| {
                    anyhow!("policy={policy}, asset name={}", AssetName(name))
                        .context(format!("lhs quantity={available}, rhs quantity={quantity}"))
                        .context("insufficient asset quantity")
                })?;
            }
        }

        prune_null_values(&mut self.1);

        Ok(self)
    }
}

// ------------------------------------------------------------------ Inspecting

impl<Quantity> Value<Quantity> {
    pub fn lovelace(&self) -> u64 {
        self.0
    }

    pub fn assets(&self) -> &BTreeMap<Hash<28>, BTreeMap<Vec<u8>, Quantity>> {
        &self.1
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0 && self.1.is_empty()
    }

    /// Whether the value holds nothing but lovelace.
    pub fn is_lovelace_only(&self) -> bool {
        self.1.is_empty()
    }
}

impl<Quantity: Zero + Copy> Value<Quantity> {
    /// The quantity of a given asset, zero when absent.
    pub fn quantity_of(&self, asset: &AssetId) -> Quantity {
        self.1
            .get(&asset.policy())
            .and_then(|inner| inner.get(asset.name()))
            .copied()
            .unwrap_or_else(Quantity::zero)
    }

    /// Every asset in the value, flattened.
    pub fn asset_ids(&self) -> impl Iterator<Item = (AssetId, Quantity)> + '_ {
        self.1.iter().flat_map(|(policy, assets)| {
            assets
                .iter()
                .map(|(name, quantity)| (AssetId::new(*policy, name.clone()), *quantity))
        })
    }
}

// ----------------------------------------------------------- Converting (from)

impl From<&pallas::alonzo::Value> for Value<u64> {
    fn from(value: &pallas::alonzo::Value) -> Self {
        match value {
            pallas::alonzo::Value::Coin(lovelace) => Self::new(*lovelace),
            pallas::alonzo::Value::Multiasset(lovelace, assets) => Self(
                *lovelace,
                assets
                    .iter()
                    .map(|(policy, inner)| {
                        (
                            Hash::from(policy),
                            inner
                                .iter()
                                .map(|(name, quantity)| (name.to_vec(), *quantity))
                                .collect(),
                        )
                    })
                    .collect(),
            ),
        }
    }
}

impl From<&pallas::Value> for Value<u64> {
    fn from(value: &pallas::Value) -> Self {
        match value {
            pallas::Value::Coin(lovelace) => Self::new(*lovelace),
            pallas::Value::Multiasset(lovelace, assets) => {
                Self(*lovelace, from_multiasset(assets, |q| u64::from(q)))
            }
        }
    }
}

impl From<&pallas::Multiasset<pallas::NonZeroInt>> for Value<i64> {
    fn from(assets: &pallas::Multiasset<pallas::NonZeroInt>) -> Self {
        Self(0, from_multiasset(assets, |q| i64::from(q)))
    }
}

fn from_multiasset<Quantity, Coin: Clone>(
    assets: &pallas::Multiasset<Coin>,
    from_quantity: impl Fn(&Coin) -> Quantity,
) -> BTreeMap<Hash<28>, BTreeMap<Vec<u8>, Quantity>> {
    assets
        .iter()
        .map(|(policy, inner)| {
            (
                Hash::from(policy),
                inner
                    .iter()
                    .map(|(name, quantity)| (name.to_vec(), from_quantity(quantity)))
                    .collect(),
            )
        })
        .collect()
}

// ------------------------------------------------------------- Converting (to)

impl From<&Value<u64>> for pallas::Value {
    fn from(Value(lovelace, assets): &Value<u64>) -> Self {
        match into_multiasset(assets, |quantity| pallas::PositiveCoin::try_from(quantity).ok()) {
            Some(assets) => pallas::Value::Multiasset(*lovelace, assets),
            None => pallas::Value::Coin(*lovelace),
        }
    }
}

/// Mint values carry no lovelace; any is ignored.
impl From<&Value<i64>> for Option<pallas::Multiasset<pallas::NonZeroInt>> {
    fn from(Value(_, assets): &Value<i64>) -> Self {
        into_multiasset(assets, |quantity| pallas::NonZeroInt::try_from(quantity).ok())
    }
}

/// `None` when no asset survives the conversion.
fn into_multiasset<Quantity: Copy, Coin: Clone>(
    assets: &BTreeMap<Hash<28>, BTreeMap<Vec<u8>, Quantity>>,
    into_quantity: impl Fn(Quantity) -> Option<Coin>,
) -> Option<pallas::Multiasset<Coin>> {
    pallas::NonEmptyKeyValuePairs::from_vec(
        assets
            .iter()
            .filter_map(|(policy, inner)| {
                let inner = inner
                    .iter()
                    .filter_map(|(name, quantity)| {
                        Some((pallas::Bytes::from(name.clone()), into_quantity(*quantity)?))
                    })
                    .collect::<Vec<_>>();

                Some((
                    pallas::Hash::from(policy),
                    pallas::NonEmptyKeyValuePairs::from_vec(inner)?,
                ))
            })
            .collect::<Vec<_>>(),
    )
}

// -------------------------------------------------------------------- Encoding

impl<C> cbor::Encode<C> for Value<u64> {
    fn encode<W: cbor::encode::write::Write>(
        &self,
        e: &mut cbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), cbor::encode::Error<W::Error>> {
        pallas::Value::from(self).encode(e, ctx)
    }
}

impl<'d, C> cbor::Decode<'d, C> for Value<u64> {
    fn decode(d: &mut cbor::Decoder<'d>, ctx: &mut C) -> Result<Self, cbor::decode::Error> {
        let value: pallas::Value = d.decode_with(ctx)?;
        Ok(Self::from(&value))
    }
}

// -------------------------------------------------------------------- Internal

fn prune_null_values<Quantity: Zero>(assets: &mut BTreeMap<Hash<28>, BTreeMap<Vec<u8>, Quantity>>) {
    assets.retain(|_, inner| {
        inner.retain(|_, quantity| !quantity.is_zero());
        !inner.is_empty()
    });
}

#[cfg(any(test, feature = "test-utils"))]
pub mod tests {
    use crate::{AssetId, Value, any, hash, value};
    use proptest::{collection, prelude::*};

    // -------------------------------------------------------------- Unit tests

    #[test]
    fn display_only_lovelace() {
        let value: Value<u64> = Value::new(42);
        assert_eq!(value.to_string(), "Value { lovelace: 42 }")
    }

    #[test]
    fn display_value_with_assets() {
        let value: Value<u64> = value!(
            2_000_000,
            ("279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f", "534e454b", 1376),
            ("f350aaabe0545fdcb56b039bfb08e4bb4d8c4d7c3c7d481c2a002835", "000de140ff", 1),
        );
        assert_eq!(
            value.to_string(),
            "Value { \
                lovelace: 2000000, \
                assets: {\
                    279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f: {SNEK: 1376}, \
                    f350aaabe0545fdcb56b039bfb08e4bb4d8c4d7c3c7d481c2a002835: {000de140ff: 1}\
                } \
            }",
        )
    }

    #[test]
    fn checked_sub_prunes_exhausted_assets() {
        let mut value: Value<u64> = value!(
            5_000_000,
            ("279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f", "534e454b", 10),
        );
        let spent = value!(
            1_000_000,
            ("279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f", "534e454b", 10),
        );
        assert!(value.checked_sub(&spent).is_ok());
        assert_eq!(value, Value::new(4_000_000));
        assert!(value.is_lovelace_only());
    }

    #[test]
    fn checked_sub_insufficient_asset() {
        let mut value: Value<u64> = value!(5_000_000);
        let spent = value!(
            0,
            ("279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f", "534e454b", 1),
        );
        assert!(value.checked_sub(&spent).is_err());
    }

    #[test]
    fn quantity_of_asset() {
        let policy = hash!("279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f");
        let snek = AssetId::new(policy, b"SNEK".to_vec());
        let value: Value<u64> = Value::new(0).with_asset(&snek, 14);
        assert_eq!(value.quantity_of(&snek), 14);
        assert_eq!(value.quantity_of(&AssetId::new(policy, b"HOSKY".to_vec())), 0);
        assert!(value.with_asset(&snek, 0).is_empty());
    }

    // -------------------------------------------------------------- Properties

    proptest! {
        #[test]
        fn add_then_sub_is_identity(lhs in any::value(), rhs in any::value()) {
            let mut total = lhs.clone();
            total.add(&rhs);
            prop_assert!(total.checked_sub(&rhs).is_ok());
            prop_assert_eq!(total, lhs);
        }
    }

    proptest! {
        #[test]
        fn never_holds_null_quantities(value in any::value()) {
            prop_assert!(value.assets().values().all(|inner| !inner.is_empty() && inner.values().all(|q| *q > 0)));
        }
    }

    // -------------------------------------------------------------- Generators

    pub mod generators {
        use super::*;

        prop_compose! {
            pub fn value()(
                lovelace in 0u64..100_000_000_000,
                assets in collection::vec((any::asset_id(), 0u64..1_000_000), 0..4),
            ) -> Value<u64> {
                assets
                    .into_iter()
                    .fold(Value::new(lovelace), |value, (asset, quantity)| value.with_asset(&asset, quantity))
            }
        }
    }
}
