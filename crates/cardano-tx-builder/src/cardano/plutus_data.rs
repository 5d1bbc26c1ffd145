//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{cbor, cbor::ToCbor, pallas};
use anyhow::anyhow;
use num::ToPrimitive;
use num_bigint::BigInt;
use std::{borrow::Cow, fmt};

/// The data format understood by Plutus validators: datums, redeemers and script parameters.
///
/// Leaves are built with [`Self::integer`] and [`Self::bytes`]; they nest through
/// [`Self::list`], [`Self::map`] and [`Self::constr`].
///
/// Inspecting a value borrows from it rather than cloning sub-terms, which is what the lifetime
/// is for. Values built or decoded from scratch are `PlutusData<'static>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PlutusData<'a>(Cow<'a, pallas::PlutusData>);

impl fmt::Display for PlutusData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CBOR({})", self.to_cbor_hex())
    }
}

// -------------------------------------------------------------------- Building

impl PlutusData<'static> {
    /// An integer of arbitrary size.
    ///
    /// ```rust
    /// # use cardano_tx_builder::PlutusData;
    /// # use num_bigint::BigInt;
    /// assert_eq!(PlutusData::integer(42).to_string(), "CBOR(182a)");
    /// assert_eq!(PlutusData::integer(-14).to_string(), "CBOR(2d)");
    /// assert_eq!(
    ///     PlutusData::integer(BigInt::from(u128::MAX) + BigInt::from(u128::MAX)).to_string(),
    ///     "CBOR(c25101fffffffffffffffffffffffffffffffe)",
    /// );
    /// ```
    pub fn integer(i: impl Into<BigInt>) -> Self {
        let i: BigInt = i.into();

        Self(Cow::Owned(match i.to_i128().map(pallas::Int::try_from) {
            Some(Ok(i)) => pallas::PlutusData::BigInt(pallas::BigInt::Int(i)),
            _ => {
                let (sign, bytes) = i.to_bytes_be();
                pallas::PlutusData::BigInt(match sign {
                    num_bigint::Sign::Minus => pallas::BigInt::BigNInt(bytes.into()),
                    _ => pallas::BigInt::BigUInt(bytes.into()),
                })
            }
        }))
    }

    /// A byte string of arbitrary length. Strings longer than 64 bytes are chunked.
    ///
    /// ```rust
    /// # use cardano_tx_builder::PlutusData;
    /// assert_eq!(PlutusData::bytes(b"foo").to_string(), "CBOR(43666f6f)");
    /// ```
    pub fn bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self(Cow::Owned(pallas::PlutusData::BoundedBytes(
            pallas::BoundedBytes::from(bytes.as_ref().to_vec()),
        )))
    }

    /// A list of values. Empty lists use a definite-length encoding, others an indefinite one.
    ///
    /// ```rust
    /// # use cardano_tx_builder::PlutusData;
    /// assert_eq!(PlutusData::list([]).to_string(), "CBOR(80)");
    /// assert_eq!(
    ///     PlutusData::list([
    ///         PlutusData::bytes(b"foo"),
    ///         PlutusData::list([PlutusData::integer(1), PlutusData::integer(2)]),
    ///     ])
    ///     .to_string(),
    ///     "CBOR(9f43666f6f9f0102ffff)",
    /// );
    /// ```
    pub fn list<'a>(elems: impl IntoIterator<Item = PlutusData<'a>>) -> Self {
        Self(Cow::Owned(pallas::PlutusData::Array(into_pallas_array(
            elems,
        ))))
    }

    /// An association list. Keys keep their insertion order and may repeat.
    ///
    /// ```rust
    /// # use cardano_tx_builder::PlutusData;
    /// assert_eq!(PlutusData::map([]).to_string(), "CBOR(a0)");
    /// assert_eq!(
    ///     PlutusData::map([
    ///         (PlutusData::bytes(b"FOO"), PlutusData::integer(1)),
    ///         (PlutusData::bytes(b"BAR"), PlutusData::integer(2)),
    ///     ])
    ///     .to_string(),
    ///     "CBOR(a243464f4f014342415202)",
    /// );
    /// ```
    pub fn map<'a>(kvs: impl IntoIterator<Item = (PlutusData<'a>, PlutusData<'a>)>) -> Self {
        let kvs = kvs
            .into_iter()
            .map(|(k, v)| (pallas::PlutusData::from(k), pallas::PlutusData::from(v)))
            .collect::<Vec<_>>();

        Self(Cow::Owned(pallas::PlutusData::Map(
            pallas::KeyValuePairs::from(kvs),
        )))
    }

    /// A constructor application. `ix` is the position of the constructor (starting at 0), not
    /// its CBOR tag.
    ///
    /// ```rust
    /// # use cardano_tx_builder::PlutusData;
    /// assert_eq!(PlutusData::constr(0, []).to_string(), "CBOR(d87980)");
    /// assert_eq!(
    ///     PlutusData::constr(0, [PlutusData::constr(1, []), PlutusData::integer(1337)])
    ///         .to_string(),
    ///     "CBOR(d8799fd87a80190539ff)",
    /// );
    /// assert_eq!(PlutusData::constr(7, []).to_string(), "CBOR(d9050080)");
    /// ```
    pub fn constr<'a>(ix: u64, fields: impl IntoIterator<Item = PlutusData<'a>>) -> Self {
        let fields = into_pallas_array(fields);

        let (tag, any_constructor) = match ix {
            0..7 => (121 + ix, None),
            7..128 => (1280 + ix - 7, None),
            _ => (102, Some(ix)),
        };

        Self(Cow::Owned(pallas::PlutusData::Constr(pallas::Constr {
            tag,
            any_constructor,
            fields,
        })))
    }
}

impl PlutusData<'_> {
    /// Detach from whatever this value was borrowed from.
    pub fn into_owned(self) -> PlutusData<'static> {
        PlutusData(Cow::Owned(self.0.into_owned()))
    }
}

// ------------------------------------------------------------------ Inspecting

impl PlutusData<'_> {
    pub fn as_integer<T: TryFrom<BigInt>>(&self) -> Option<T> {
        match self.0.as_ref() {
            pallas::PlutusData::BigInt(big_int) => from_pallas_bigint(big_int).try_into().ok(),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self.0.as_ref() {
            pallas::PlutusData::BoundedBytes(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<impl Iterator<Item = PlutusData<'_>>> {
        match self.0.as_ref() {
            pallas::PlutusData::Array(array) => Some(borrow_all(array)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<impl Iterator<Item = (PlutusData<'_>, PlutusData<'_>)>> {
        match self.0.as_ref() {
            pallas::PlutusData::Map(map) => Some(
                match map {
                    pallas::KeyValuePairs::Def(items) | pallas::KeyValuePairs::Indef(items) => {
                        items
                    }
                }
                .iter()
                .map(|(k, v)| (PlutusData(Cow::Borrowed(k)), PlutusData(Cow::Borrowed(v)))),
            ),
            _ => None,
        }
    }

    /// The constructor index and fields, when this is a constructor application.
    pub fn as_constr(&self) -> Option<(u64, impl Iterator<Item = PlutusData<'_>>)> {
        match self.0.as_ref() {
            pallas::PlutusData::Constr(constr) => {
                let ix = match constr.tag {
                    102 => constr.any_constructor?,
                    tag if tag >= 1280 => tag - 1280 + 7,
                    tag => tag.checked_sub(121)?,
                };
                Some((ix, borrow_all(&constr.fields)))
            }
            _ => None,
        }
    }

    /// Fields of a constructor application, provided that its index is the one expected.
    ///
    /// ```rust
    /// # use cardano_tx_builder::PlutusData;
    /// let data = PlutusData::constr(1, [PlutusData::integer(14)]);
    /// assert!(data.as_fields(0).is_none());
    /// assert_eq!(data.as_fields(1).map(|fields| fields.len()), Some(1));
    /// ```
    pub fn as_fields(&self, expected_ix: u64) -> Option<Vec<PlutusData<'_>>> {
        let (ix, fields) = self.as_constr()?;
        (ix == expected_ix).then(|| fields.collect())
    }
}

// --------------------------------------------------------------------- Helpers

fn into_pallas_array<'a>(
    elems: impl IntoIterator<Item = PlutusData<'a>>,
) -> pallas::MaybeIndefArray<pallas::PlutusData> {
    let elems = elems
        .into_iter()
        .map(pallas::PlutusData::from)
        .collect::<Vec<_>>();

    if elems.is_empty() {
        pallas::MaybeIndefArray::Def(elems)
    } else {
        pallas::MaybeIndefArray::Indef(elems)
    }
}

fn borrow_all(
    array: &pallas::MaybeIndefArray<pallas::PlutusData>,
) -> impl Iterator<Item = PlutusData<'_>> {
    match array {
        pallas::MaybeIndefArray::Def(elems) | pallas::MaybeIndefArray::Indef(elems) => elems,
    }
    .iter()
    .map(|x| PlutusData(Cow::Borrowed(x)))
}

fn from_pallas_bigint(big_int: &pallas::BigInt) -> BigInt {
    match big_int {
        pallas::BigInt::Int(int) => BigInt::from(i128::from(*int)),
        pallas::BigInt::BigUInt(bytes) => BigInt::from_bytes_be(num_bigint::Sign::Plus, bytes),
        pallas::BigInt::BigNInt(bytes) => BigInt::from_bytes_be(num_bigint::Sign::Minus, bytes),
    }
}

// ----------------------------------------------------------- Converting (from)

impl From<pallas::PlutusData> for PlutusData<'static> {
    fn from(data: pallas::PlutusData) -> Self {
        Self(Cow::Owned(data))
    }
}

impl<'a> From<&'a pallas::PlutusData> for PlutusData<'a> {
    fn from(data: &'a pallas::PlutusData) -> Self {
        Self(Cow::Borrowed(data))
    }
}

// ------------------------------------------------------------- Converting (to)

impl From<PlutusData<'_>> for pallas::PlutusData {
    fn from(data: PlutusData<'_>) -> Self {
        data.0.into_owned()
    }
}

macro_rules! try_from_integer {
    ($($t:ty),+ $(,)?) => {
        $(
            impl TryFrom<&PlutusData<'_>> for $t {
                type Error = anyhow::Error;

                fn try_from(data: &PlutusData<'_>) -> anyhow::Result<Self> {
                    data.as_integer()
                        .ok_or_else(|| anyhow!("expected an integer fitting a {}", stringify!($t)))
                }
            }
        )+
    };
}

try_from_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, BigInt);

impl<'a> TryFrom<&'a PlutusData<'_>> for &'a [u8] {
    type Error = anyhow::Error;

    fn try_from(data: &'a PlutusData<'_>) -> anyhow::Result<Self> {
        data.as_bytes().ok_or_else(|| anyhow!("expected bytes"))
    }
}

impl<'a, const SIZE: usize> TryFrom<&'a PlutusData<'_>> for &'a [u8; SIZE] {
    type Error = anyhow::Error;

    fn try_from(data: &'a PlutusData<'_>) -> anyhow::Result<Self> {
        data.as_bytes()
            .ok_or_else(|| anyhow!("expected bytes"))?
            .try_into()
            .map_err(|_| anyhow!("expected exactly {SIZE} bytes"))
    }
}

impl<'a> TryFrom<&'a PlutusData<'_>> for Vec<PlutusData<'a>> {
    type Error = anyhow::Error;

    fn try_from(data: &'a PlutusData<'_>) -> anyhow::Result<Self> {
        Ok(data.as_list().ok_or_else(|| anyhow!("expected a list"))?.collect())
    }
}

impl<'a> TryFrom<&'a PlutusData<'_>> for Vec<(PlutusData<'a>, PlutusData<'a>)> {
    type Error = anyhow::Error;

    fn try_from(data: &'a PlutusData<'_>) -> anyhow::Result<Self> {
        Ok(data.as_map().ok_or_else(|| anyhow!("expected a map"))?.collect())
    }
}

// -------------------------------------------------------------------- Encoding

impl<C> cbor::Encode<C> for PlutusData<'_> {
    fn encode<W: cbor::encode::write::Write>(
        &self,
        e: &mut cbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), cbor::encode::Error<W::Error>> {
        e.encode_with(self.0.as_ref(), ctx)?;
        Ok(())
    }
}

impl<'d, C> cbor::Decode<'d, C> for PlutusData<'static> {
    fn decode(d: &mut cbor::Decoder<'d>, ctx: &mut C) -> Result<Self, cbor::decode::Error> {
        Ok(Self(Cow::Owned(d.decode_with(ctx)?)))
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod tests {
    use crate::{PlutusData, cbor, cbor::ToCbor, plutus_data};
    use proptest::{collection, prelude::*};

    // -------------------------------------------------------------- Unit tests

    #[test]
    fn large_constructor_index() {
        let data = PlutusData::constr(1000, [PlutusData::integer(1)]);
        assert_eq!(data.to_string(), "CBOR(d866821903e89f01ff)");
        assert_eq!(data.as_constr().map(|(ix, _)| ix), Some(1000));
    }

    #[test]
    fn decode_from_hex() {
        let data = plutus_data!("d8799fa1436b657901182aff");
        let fields = data.as_fields(0).unwrap_or_default();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].as_integer::<u64>(), Some(42));
        assert_eq!(fields[0].as_map().map(|kvs| kvs.count()), Some(1));
    }

    #[test]
    fn integer_out_of_range() {
        assert!(u8::try_from(&PlutusData::integer(256)).is_err());
        assert!(u64::try_from(&PlutusData::integer(-1)).is_err());
        assert_eq!(i64::try_from(&PlutusData::integer(-1)).ok(), Some(-1));
    }

    #[test]
    fn fixed_size_bytes() {
        let data = PlutusData::bytes([1, 2, 3]);
        assert!(<&[u8; 3]>::try_from(&data).is_ok());
        assert!(<&[u8; 4]>::try_from(&data).is_err());
    }

    // -------------------------------------------------------------- Properties

    proptest! {
        #[test]
        fn constr_index_roundtrip(ix in 0u64..2048) {
            let data = PlutusData::constr(ix, []);
            prop_assert_eq!(data.as_constr().map(|(ix, _)| ix), Some(ix));
        }
    }

    proptest! {
        #[test]
        fn cbor_roundtrip(data in generators::plutus_data()) {
            let bytes = data.to_cbor();
            let data_back: PlutusData<'static> =
                cbor::decode(&bytes).map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(data_back.to_cbor(), bytes);
        }
    }

    // -------------------------------------------------------------- Generators

    pub mod generators {
        use super::*;

        pub fn plutus_data() -> impl Strategy<Value = PlutusData<'static>> {
            let leaf = prop_oneof![
                any::<i64>().prop_map(PlutusData::integer),
                collection::vec(any::<u8>(), 0..80).prop_map(PlutusData::bytes),
            ];

            leaf.prop_recursive(3, 24, 4, |inner| {
                prop_oneof![
                    collection::vec(inner.clone(), 0..4).prop_map(PlutusData::list),
                    (0u64..200, collection::vec(inner.clone(), 0..4))
                        .prop_map(|(ix, fields)| PlutusData::constr(ix, fields)),
                    collection::vec((inner.clone(), inner), 0..3).prop_map(PlutusData::map),
                ]
            })
        }
    }
}
