//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

pub mod address;
pub mod asset_id;
pub mod credential;
pub mod crypto;
pub mod datum;
pub mod execution_units;
pub mod hash;
pub mod input;
pub mod macros;
pub mod network;
pub mod network_id;
pub mod output;
pub mod plutus_data;
pub mod plutus_script;
pub mod plutus_version;
pub mod protocol_parameters;
pub mod redeemer_pointer;
pub mod transaction;
pub mod utxo;
pub mod value;
