//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Shorthands for fixtures and tests. All of them panic on invalid input.

/// Construct a [`Hash`](crate::Hash) of any size from a base16-encoded literal.
///
/// # examples
///
/// ```rust
/// # use cardano_tx_builder::{hash};
/// assert_eq!(
///     <[u8; 28]>::from(hash!("00000000000000000000000000000000000000000000000000000000")),
///     [0; 28],
/// )
/// ```
#[macro_export]
macro_rules! hash {
    ($txt:literal $(,)?) => {
        <$crate::Hash<_>>::try_from($txt).unwrap()
    };
}

/// Construct an [`Input`](crate::Input) from a base16-encoded transaction id and an index.
///
/// A third argument pairs the input with an optional redeemer; `_` stands for none.
#[macro_export]
macro_rules! input {
    ($id:literal, $index:expr $(,)?) => {
        $crate::Input::new(<$crate::Hash<32>>::try_from($id).unwrap(), $index)
    };

    ($id:literal, $index:expr, _ $(,)?) => {
        (
            $crate::Input::new(<$crate::Hash<32>>::try_from($id).unwrap(), $index),
            None,
        )
    };

    ($id:literal, $index:expr, $redeemer:expr $(,)?) => {
        (
            $crate::Input::new(<$crate::Hash<32>>::try_from($id).unwrap(), $index),
            Some($redeemer),
        )
    };
}

/// Construct a mainnet address, either from a bech32 literal or from its credentials.
///
/// The literal form yields an [`Address<Any>`](crate::Address) and panics on a testnet address.
/// The other forms yield an [`Address<Shelley>`](crate::Address).
///
/// # examples
///
/// ```rust
/// # use cardano_tx_builder::{address, key_credential};
/// assert_eq!(
///   address!(
///     key_credential!("bd3ae991b5aafccafe5ca70758bd36a9b2f872f57f6d3a1ffa0eb777"),
///     key_credential!("bd3ae991b5aafccafe5ca70758bd36a9b2f872f57f6d3a1ffa0eb777"),
///   ).to_string(),
///   "addr1qx7n46v3kk40ejh7tjnswk9ax65m97rj74lk6wsllg8twaaa8t5erdd2ln90uh98qavt6d4fktu89atld5apl7swkamst576s8",
/// );
/// ```
#[macro_export]
macro_rules! address {
    ($text:literal $(,)?) => {{
        let address = $crate::Address::<$crate::address::kind::Any>::try_from($text).unwrap();
        if address
            .as_shelley()
            .is_some_and(|shelley| shelley.network_id() != $crate::NetworkId::MAINNET)
        {
            panic!("network mismatch for address {}", $text);
        }
        address
    }};

    ($payment:expr $(,)?) => {
        $crate::Address::new($crate::NetworkId::MAINNET, $payment)
    };

    ($payment:expr, $delegation: expr $(,)?) => {
        $crate::Address::new($crate::NetworkId::MAINNET, $payment).with_delegation($delegation)
    };
}

/// Like [`address!`](crate::address!), for testnets.
///
/// # examples
///
/// ```rust
/// # use cardano_tx_builder::{address_test, script_credential};
/// assert_eq!(
///   address_test!(script_credential!("bd3ae991b5aafccafe5ca70758bd36a9b2f872f57f6d3a1ffa0eb777")).to_string(),
///   "addr_test1wz7n46v3kk40ejh7tjnswk9ax65m97rj74lk6wsllg8twac0ke9dm",
/// );
/// ```
#[macro_export]
macro_rules! address_test {
    ($text:literal $(,)?) => {{
        let address = $crate::Address::<$crate::address::kind::Any>::try_from($text).unwrap();
        if address
            .as_shelley()
            .is_some_and(|shelley| shelley.network_id() != $crate::NetworkId::TESTNET)
        {
            panic!("network mismatch for address {}", $text);
        }
        address
    }};

    ($payment:expr $(,)?) => {
        $crate::Address::new($crate::NetworkId::TESTNET, $payment)
    };

    ($payment:expr, $delegation: expr $(,)?) => {
        $crate::Address::new($crate::NetworkId::TESTNET, $payment).with_delegation($delegation)
    };
}

/// Construct a script [`Credential`](crate::Credential) from a base16-encoded hash.
#[macro_export]
macro_rules! script_credential {
    ($hash:literal $(,)?) => {
        $crate::Credential::from_script(<$crate::Hash<28>>::try_from($hash).unwrap())
    };
}

/// Construct a key [`Credential`](crate::Credential) from a base16-encoded hash.
///
/// ```rust
/// # use cardano_tx_builder::{key_credential};
/// assert!(
///     key_credential!("00000000000000000000000000000000000000000000000000000000")
///         .as_script()
///         .is_none()
/// )
/// ```
#[macro_export]
macro_rules! key_credential {
    ($hash:literal $(,)?) => {
        $crate::Credential::from_key(<$crate::Hash<28>>::try_from($hash).unwrap())
    };
}

/// Construct an [`Output`](crate::Output) from an address literal and a [`Value`](crate::Value).
#[macro_export]
macro_rules! output {
    ($addr:literal, $value:expr $(,)?) => {
        $crate::Output::new($crate::Address::try_from($addr).unwrap(), $value)
    };
}

/// Construct a [`PlutusScript`](crate::PlutusScript) from a version and base16-encoded bytes.
///
/// ```rust
/// # use cardano_tx_builder::{PlutusVersion, plutus_script};
/// let always_succeed = plutus_script!(PlutusVersion::V3, "46010100222601");
/// assert_eq!(always_succeed.size(), 7);
/// ```
#[macro_export]
macro_rules! plutus_script {
    ($lang:expr, $bytes:literal $(,)?) => {
        $crate::PlutusScript::new($lang, $crate::hex::decode($bytes).unwrap())
    };
}

/// Construct a [`PlutusData`](crate::PlutusData) from its base16-encoded CBOR serialisation.
///
/// ```rust
/// # use cardano_tx_builder::{PlutusData, plutus_data};
/// assert_eq!(plutus_data!("d87980"), PlutusData::constr(0, []));
/// ```
#[macro_export]
macro_rules! plutus_data {
    ($bytes:literal $(,)?) => {
        $crate::cbor::decode::<$crate::PlutusData<'static>>($crate::hex::decode($bytes).unwrap().as_slice())
            .unwrap()
    };
}

/// Construct a [`Value<u64>`](crate::Value) from a lovelace amount and, optionally, assets given
/// as `(policy, base16 asset name, quantity)` triples.
///
/// ```rust
/// # use cardano_tx_builder::{Value, hash, value};
/// assert_eq!(
///     value!(
///         2_000_000,
///         ("279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f", "534e454b", 1),
///     ),
///     Value::new(2_000_000).with_assets([(
///         hash!("279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f"),
///         [(b"SNEK", 1)],
///     )]),
/// );
/// ```
#[macro_export]
macro_rules! value {
    ($lovelace:expr $(,)?) => {
        $crate::Value::new($lovelace)
    };

    ($lovelace:expr, $( ($script_hash:literal, $asset_name:literal, $amount:expr $(,)?) ),+ $(,)? ) => {{
        $crate::Value::new($lovelace)
            .with_assets(vec![
                $(
                    (
                        <$crate::Hash<28>>::try_from($script_hash).unwrap(),
                        vec![ ($crate::hex::decode($asset_name).unwrap(), $amount) ],
                    )
                ),+
            ])
    }};
}
