//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

pub mod cbor;

#[doc(hidden)]
pub use hex;

mod cardano;
pub use cardano::{
    // Re-export types for easier consumption.
    //
    // NOTE: This main function of this comment is to force the formatter to put one import per
    // line in the following import list; making diffs and extensions easier.
    address::{self, Address},
    asset_id::AssetId,
    credential::Credential,
    crypto::ed25519::{Signature, SigningKey, VerificationKey},
    datum::Datum,
    execution_units::ExecutionUnits,
    hash::Hash,
    input::Input,
    network::Network,
    network_id::NetworkId,
    output::Output,
    output::change_strategy::ChangeStrategy,
    plutus_data::PlutusData,
    plutus_script::PlutusScript,
    plutus_version::PlutusVersion,
    protocol_parameters::ProtocolParameters,
    redeemer_pointer::RedeemerPointer,
    transaction::Transaction,
    utxo::Utxo,
    value::Value,
};

mod tx_builder;
pub use tx_builder::{TransactionBuilder, TxBuilder, TxBuilderDyn};

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

#[cfg(any(test, feature = "test-utils"))]
pub mod any {
    pub use crate::cardano::{
        address::tests::generators::*, asset_id::tests::generators::*,
        credential::tests::generators::*, execution_units::tests::generators::*,
        hash::tests::generators::*, input::tests::generators::*, network::tests::generators::*,
        network_id::tests::generators::*, plutus_data::tests::generators::*,
        utxo::tests::generators::*, value::tests::generators::*,
    };
}

mod pallas;
