//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A [`TxBuilder`] recording calls instead of building anything; for testing code that drives a
//! builder.

use crate::{
    Address, Hash, Network, PlutusData, PlutusScript, PlutusVersion, TxBuilder, Utxo, Value,
};

/// One call made on a [`RecordingBuilder`], with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderCall {
    SetNetwork(Network),
    TxIn(Utxo),
    SpendingPlutusScript(PlutusVersion),
    TxInInlineDatumPresent,
    TxInRedeemerValue(PlutusData<'static>),
    TxInScript(PlutusScript),
    TxOut(Address, Value<u64>),
    TxOutInlineDatumValue(PlutusData<'static>),
    MintPlutusScript(PlutusVersion),
    Mint(i64, Hash<28>, Vec<u8>),
    MintingScript(PlutusScript),
    MintRedeemerValue(PlutusData<'static>),
    TxInCollateral(Utxo),
    RequiredSignerHash(Hash<28>),
    ChangeAddress(Address),
    SelectUtxosFrom(Vec<Utxo>),
    Complete,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingBuilder {
    calls: Vec<BuilderCall>,
    completed: String,
}

impl RecordingBuilder {
    /// A builder whose [`TxBuilder::complete`] yields `completed`.
    pub fn new(completed: impl Into<String>) -> Self {
        Self {
            calls: Vec::new(),
            completed: completed.into(),
        }
    }

    pub fn calls(&self) -> &[BuilderCall] {
        &self.calls
    }

    /// Calls made since the network was (last) set, which is what wrappers do on their own.
    pub fn calls_after_setup(&self) -> &[BuilderCall] {
        let start = self
            .calls
            .iter()
            .rposition(|call| matches!(call, BuilderCall::SetNetwork(..)))
            .map(|ix| ix + 1)
            .unwrap_or(0);
        &self.calls[start..]
    }

    fn record(&mut self, call: BuilderCall) -> &mut Self {
        self.calls.push(call);
        self
    }
}

impl TxBuilder for RecordingBuilder {
    fn set_network(&mut self, network: Network) -> &mut Self {
        self.record(BuilderCall::SetNetwork(network))
    }

    fn tx_in(&mut self, utxo: &Utxo) -> &mut Self {
        self.record(BuilderCall::TxIn(utxo.clone()))
    }

    fn spending_plutus_script(&mut self, version: PlutusVersion) -> &mut Self {
        self.record(BuilderCall::SpendingPlutusScript(version))
    }

    fn tx_in_inline_datum_present(&mut self) -> &mut Self {
        self.record(BuilderCall::TxInInlineDatumPresent)
    }

    fn tx_in_redeemer_value(&mut self, redeemer: PlutusData<'static>) -> &mut Self {
        self.record(BuilderCall::TxInRedeemerValue(redeemer))
    }

    fn tx_in_script(&mut self, script: PlutusScript) -> &mut Self {
        self.record(BuilderCall::TxInScript(script))
    }

    fn tx_out(&mut self, address: &Address, value: &Value<u64>) -> &mut Self {
        self.record(BuilderCall::TxOut(address.clone(), value.clone()))
    }

    fn tx_out_inline_datum_value(&mut self, datum: PlutusData<'static>) -> &mut Self {
        self.record(BuilderCall::TxOutInlineDatumValue(datum))
    }

    fn mint_plutus_script(&mut self, version: PlutusVersion) -> &mut Self {
        self.record(BuilderCall::MintPlutusScript(version))
    }

    fn mint(&mut self, quantity: i64, policy: Hash<28>, asset_name: &[u8]) -> &mut Self {
        self.record(BuilderCall::Mint(quantity, policy, asset_name.to_vec()))
    }

    fn minting_script(&mut self, script: PlutusScript) -> &mut Self {
        self.record(BuilderCall::MintingScript(script))
    }

    fn mint_redeemer_value(&mut self, redeemer: PlutusData<'static>) -> &mut Self {
        self.record(BuilderCall::MintRedeemerValue(redeemer))
    }

    fn tx_in_collateral(&mut self, utxo: &Utxo) -> &mut Self {
        self.record(BuilderCall::TxInCollateral(utxo.clone()))
    }

    fn required_signer_hash(&mut self, signer: Hash<28>) -> &mut Self {
        self.record(BuilderCall::RequiredSignerHash(signer))
    }

    fn change_address(&mut self, address: &Address) -> &mut Self {
        self.record(BuilderCall::ChangeAddress(address.clone()))
    }

    fn select_utxos_from(&mut self, utxos: &[Utxo]) -> &mut Self {
        self.record(BuilderCall::SelectUtxosFrom(utxos.to_vec()))
    }

    async fn complete(&mut self) -> anyhow::Result<String> {
        self.record(BuilderCall::Complete);
        Ok(self.completed.clone())
    }
}
