//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{
    Address, ChangeStrategy, Datum, Hash, Input, Network, NetworkId, Output, PlutusData,
    PlutusScript, PlutusVersion, ProtocolParameters, Transaction, Utxo, Value,
};
use anyhow::anyhow;
use log::{debug, info, warn};
use std::{
    collections::{BTreeMap, BTreeSet},
    mem,
};
use trait_variant::make;

/// A fluent, stateful transaction builder.
///
/// Calls accumulate a draft; qualifiers (e.g. [`Self::tx_in_redeemer_value`]) refer to the
/// last input, output or mint added. Nothing is validated until [`Self::complete`], which
/// balances the draft, serialises it and starts afresh.
#[make(TxBuilderDyn: Send)]
pub trait TxBuilder {
    /// Outputs and change must be addressed on that network. Unlike the draft, the network
    /// outlives [`Self::complete`].
    fn set_network(&mut self, network: Network) -> &mut Self;

    /// Spend a UTxO. The input is locked by a key, unless announced otherwise with
    /// [`Self::spending_plutus_script`].
    fn tx_in(&mut self, utxo: &Utxo) -> &mut Self;

    /// The next input spends an output locked by a Plutus script of that language.
    fn spending_plutus_script(&mut self, version: PlutusVersion) -> &mut Self;

    /// The last script input holds its datum inline.
    fn tx_in_inline_datum_present(&mut self) -> &mut Self;

    fn tx_in_redeemer_value(&mut self, redeemer: PlutusData<'static>) -> &mut Self;

    fn tx_in_script(&mut self, script: PlutusScript) -> &mut Self;

    /// Pay some value to an address. The lovelace is raised to the ledger's minimum deposit if
    /// needed.
    fn tx_out(&mut self, address: &Address, value: &Value<u64>) -> &mut Self;

    fn tx_out_inline_datum_value(&mut self, datum: PlutusData<'static>) -> &mut Self;

    /// The next mint is governed by a Plutus minting policy of that language.
    fn mint_plutus_script(&mut self, version: PlutusVersion) -> &mut Self;

    /// Mint (or burn, when negative) some quantity of an asset.
    fn mint(&mut self, quantity: i64, policy: Hash<28>, asset_name: &[u8]) -> &mut Self;

    fn minting_script(&mut self, script: PlutusScript) -> &mut Self;

    fn mint_redeemer_value(&mut self, redeemer: PlutusData<'static>) -> &mut Self;

    fn tx_in_collateral(&mut self, utxo: &Utxo) -> &mut Self;

    fn required_signer_hash(&mut self, signer: Hash<28>) -> &mut Self;

    fn change_address(&mut self, address: &Address) -> &mut Self;

    /// UTxOs available to fund the transaction, on top of the explicit inputs.
    fn select_utxos_from(&mut self, utxos: &[Utxo]) -> &mut Self;

    /// Balance and serialise the draft. Yields the unsigned transaction, as base16-encoded CBOR.
    /// The builder is reset, whether it succeeds or not.
    async fn complete(&mut self) -> anyhow::Result<String>;
}

/// The [`TxBuilder`] of this crate, balancing transactions through [`Transaction::build`].
#[derive(Debug)]
pub struct TransactionBuilder {
    params: ProtocolParameters,
    network: Option<Network>,
    draft: Draft,
}

#[derive(Debug, Default)]
struct Draft {
    inputs: Vec<(Utxo, Option<ScriptWitness>)>,
    next_input: Option<PlutusVersion>,
    outputs: Vec<Output>,
    mints: Vec<(AssetMint, Option<ScriptWitness>)>,
    next_mint: Option<PlutusVersion>,
    collaterals: Vec<Utxo>,
    required_signers: BTreeSet<Hash<28>>,
    change_address: Option<Address>,
    selectable: Vec<Utxo>,
    errors: Vec<anyhow::Error>,
}

#[derive(Debug)]
struct AssetMint {
    policy: Hash<28>,
    asset_name: Vec<u8>,
    quantity: i64,
}

#[derive(Debug)]
struct ScriptWitness {
    version: PlutusVersion,
    inline_datum: bool,
    redeemer: Option<PlutusData<'static>>,
    script: Option<PlutusScript>,
}

impl ScriptWitness {
    fn new(version: PlutusVersion) -> Self {
        Self {
            version,
            inline_datum: false,
            redeemer: None,
            script: None,
        }
    }
}

// -------------------------------------------------------------------- Building

impl TransactionBuilder {
    pub fn new(params: ProtocolParameters) -> Self {
        Self {
            params,
            network: None,
            draft: Draft::default(),
        }
    }

    pub fn protocol_parameters(&self) -> &ProtocolParameters {
        &self.params
    }
}

/// A builder using the default parameters of the network, and targeting it.
impl From<Network> for TransactionBuilder {
    fn from(network: Network) -> Self {
        let mut builder = Self::new(ProtocolParameters::from(network));
        builder.set_network(network);
        builder
    }
}

impl Draft {
    fn defer(&mut self, error: anyhow::Error) {
        self.errors.push(error);
    }

    fn last_script_input(&mut self, qualifier: &str) -> Option<&mut ScriptWitness> {
        let witness = self
            .inputs
            .last_mut()
            .and_then(|(_, witness)| witness.as_mut());
        if witness.is_none() {
            self.errors.push(anyhow!(
                "{qualifier} must follow a script input (see 'spending_plutus_script')"
            ));
        }
        witness
    }

    fn last_script_mint(&mut self, qualifier: &str) -> Option<&mut ScriptWitness> {
        let witness = self
            .mints
            .last_mut()
            .and_then(|(_, witness)| witness.as_mut());
        if witness.is_none() {
            self.errors.push(anyhow!(
                "{qualifier} must follow a Plutus mint (see 'mint_plutus_script')"
            ));
        }
        witness
    }
}

impl TxBuilder for TransactionBuilder {
    fn set_network(&mut self, network: Network) -> &mut Self {
        self.network = Some(network);
        self
    }

    fn tx_in(&mut self, utxo: &Utxo) -> &mut Self {
        let witness = self.draft.next_input.take().map(ScriptWitness::new);
        self.draft.inputs.push((utxo.clone(), witness));
        self
    }

    fn spending_plutus_script(&mut self, version: PlutusVersion) -> &mut Self {
        self.draft.next_input = Some(version);
        self
    }

    fn tx_in_inline_datum_present(&mut self) -> &mut Self {
        if let Some(witness) = self.draft.last_script_input("tx_in_inline_datum_present") {
            witness.inline_datum = true;
        }
        self
    }

    fn tx_in_redeemer_value(&mut self, redeemer: PlutusData<'static>) -> &mut Self {
        if let Some(witness) = self.draft.last_script_input("tx_in_redeemer_value") {
            witness.redeemer = Some(redeemer);
        }
        self
    }

    fn tx_in_script(&mut self, script: PlutusScript) -> &mut Self {
        if let Some(witness) = self.draft.last_script_input("tx_in_script") {
            witness.script = Some(script);
        }
        self
    }

    fn tx_out(&mut self, address: &Address, value: &Value<u64>) -> &mut Self {
        self.draft
            .outputs
            .push(Output::new(address.clone(), value.clone()));
        self
    }

    fn tx_out_inline_datum_value(&mut self, datum: PlutusData<'static>) -> &mut Self {
        match self.draft.outputs.pop() {
            Some(output) => self.draft.outputs.push(output.with_inline_datum(datum)),
            None => self
                .draft
                .defer(anyhow!("tx_out_inline_datum_value must follow an output")),
        }
        self
    }

    fn mint_plutus_script(&mut self, version: PlutusVersion) -> &mut Self {
        self.draft.next_mint = Some(version);
        self
    }

    fn mint(&mut self, quantity: i64, policy: Hash<28>, asset_name: &[u8]) -> &mut Self {
        let witness = self.draft.next_mint.take().map(ScriptWitness::new);
        self.draft.mints.push((
            AssetMint {
                policy,
                asset_name: asset_name.to_vec(),
                quantity,
            },
            witness,
        ));
        self
    }

    fn minting_script(&mut self, script: PlutusScript) -> &mut Self {
        if let Some(witness) = self.draft.last_script_mint("minting_script") {
            witness.script = Some(script);
        }
        self
    }

    fn mint_redeemer_value(&mut self, redeemer: PlutusData<'static>) -> &mut Self {
        if let Some(witness) = self.draft.last_script_mint("mint_redeemer_value") {
            witness.redeemer = Some(redeemer);
        }
        self
    }

    fn tx_in_collateral(&mut self, utxo: &Utxo) -> &mut Self {
        self.draft.collaterals.push(utxo.clone());
        self
    }

    fn required_signer_hash(&mut self, signer: Hash<28>) -> &mut Self {
        self.draft.required_signers.insert(signer);
        self
    }

    fn change_address(&mut self, address: &Address) -> &mut Self {
        self.draft.change_address = Some(address.clone());
        self
    }

    fn select_utxos_from(&mut self, utxos: &[Utxo]) -> &mut Self {
        self.draft.selectable.extend(utxos.iter().cloned());
        self
    }

    async fn complete(&mut self) -> anyhow::Result<String> {
        let draft = mem::take(&mut self.draft);
        let transaction = draft
            .into_transaction(&self.params, self.network)
            .map_err(|e| e.context("failed to complete transaction"))?;
        info!("built transaction id={}", transaction.id());
        Ok(transaction.to_hex())
    }
}

// -------------------------------------------------------------------- Internal

impl Draft {
    fn into_transaction(
        self,
        params: &ProtocolParameters,
        network: Option<Network>,
    ) -> anyhow::Result<Transaction> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }

        let change_address = self
            .change_address
            .ok_or_else(|| anyhow!("no change address set"))?;

        if let Some(network) = network {
            let addresses = self
                .outputs
                .iter()
                .map(Output::address)
                .chain([&change_address]);
            for address in addresses {
                fail_on_network_mismatch(network, address)?;
            }
        }

        let mut resolved_inputs: BTreeMap<Input, Output> = BTreeMap::new();
        let mut scripts: BTreeSet<PlutusScript> = BTreeSet::new();

        let mut inputs: BTreeMap<Input, Option<PlutusData<'static>>> = BTreeMap::new();
        for (utxo, witness) in self.inputs {
            let redeemer = witness
                .map(|witness| {
                    let (redeemer, script) = spending_witness(&utxo, witness)?;
                    scripts.insert(script);
                    Ok::<_, anyhow::Error>(redeemer)
                })
                .transpose()?;
            let (input, output) = utxo.into_parts();
            inputs.insert(input.clone(), redeemer);
            resolved_inputs.insert(input, output);
        }

        for utxo in self.selectable {
            if inputs.contains_key(utxo.input()) {
                continue;
            }
            if utxo.output().address().payment_script_hash().is_some() {
                warn!("skipping script-locked selectable utxo: {}", utxo.input());
                continue;
            }
            debug!("selected input: {}", utxo.input());
            let (input, output) = utxo.into_parts();
            inputs.insert(input.clone(), None);
            resolved_inputs.insert(input, output);
        }

        let mut collaterals = Vec::new();
        for utxo in self.collaterals {
            let (input, output) = utxo.into_parts();
            collaterals.push(input.clone());
            resolved_inputs.entry(input).or_insert(output);
        }

        let mut mint: BTreeMap<Hash<28>, (PlutusData<'static>, BTreeMap<Vec<u8>, i64>)> =
            BTreeMap::new();
        for (asset, witness) in self.mints {
            let Some(witness) = witness else {
                return Err(anyhow!("policy={}", asset.policy)
                    .context("only Plutus minting policies are supported"));
            };
            let (redeemer, script) = minting_witness(&asset, witness)?;
            scripts.insert(script);

            let (known_redeemer, quantities) = mint
                .entry(asset.policy)
                .or_insert_with(|| (redeemer.clone(), BTreeMap::new()));
            if known_redeemer != &redeemer {
                return Err(anyhow!("policy={}", asset.policy)
                    .context("conflicting redeemers for the same minting policy"));
            }
            let quantity = quantities.entry(asset.asset_name).or_insert(0);
            *quantity = quantity.checked_add(asset.quantity).ok_or_else(|| {
                anyhow!("policy={}", asset.policy).context("minted quantity out of bounds")
            })?;
        }
        for (_, quantities) in mint.values_mut() {
            quantities.retain(|_, quantity| *quantity != 0);
        }

        let outputs = self
            .outputs
            .into_iter()
            .map(|output| output.with_minimum_deposit(params))
            .collect::<Vec<_>>();

        let inputs = inputs.into_iter().collect::<Vec<_>>();
        let required_signers = self.required_signers;

        Transaction::build(params, &resolved_inputs, |tx| {
            tx.with_inputs(inputs.clone())
                .with_collaterals(collaterals.clone())
                .with_outputs(outputs.clone())
                .with_mint(mint.clone())
                .with_plutus_scripts(scripts.clone())
                .with_required_signers(required_signers.clone())
                .with_change_strategy(ChangeStrategy::as_last_output(
                    change_address.clone(),
                    params,
                ))
                .ok()
        })
    }
}

fn fail_on_network_mismatch(network: Network, address: &Address) -> anyhow::Result<()> {
    let expected = NetworkId::from(network);
    match address.as_shelley() {
        Some(shelley) if shelley.network_id() != expected => Err(anyhow!(
            "address={address}, network={network}"
        )
        .context("address doesn't belong to the target network")),
        _ => Ok(()),
    }
}

fn spending_witness(
    utxo: &Utxo,
    witness: ScriptWitness,
) -> anyhow::Result<(PlutusData<'static>, PlutusScript)> {
    let context = |e: anyhow::Error| e.context(format!("invalid script input {}", utxo.input()));

    let script = witness
        .script
        .ok_or_else(|| anyhow!("missing witness script (see 'tx_in_script')"))
        .map_err(context)?;

    let redeemer = witness
        .redeemer
        .ok_or_else(|| anyhow!("missing redeemer (see 'tx_in_redeemer_value')"))
        .map_err(context)?;

    if script.version() != witness.version {
        return Err(context(anyhow!(
            "script language {} differs from the announced {}",
            script.version(),
            witness.version
        )));
    }

    if utxo.output().address().payment_script_hash() != Some(script.hash()) {
        return Err(context(anyhow!(
            "script {} doesn't lock address {}",
            script.hash(),
            utxo.output().address()
        )));
    }

    match utxo.output().datum() {
        Some(Datum::Hash(..)) => {
            return Err(context(anyhow!("datum hashes are not supported")));
        }
        Some(Datum::Inline(..)) => {}
        None if witness.inline_datum => {
            return Err(context(anyhow!("announced inline datum is missing")));
        }
        None => {}
    }

    Ok((redeemer, script))
}

fn minting_witness(
    asset: &AssetMint,
    witness: ScriptWitness,
) -> anyhow::Result<(PlutusData<'static>, PlutusScript)> {
    let context = |e: anyhow::Error| e.context(format!("invalid mint under {}", asset.policy));

    let script = witness
        .script
        .ok_or_else(|| anyhow!("missing minting script (see 'minting_script')"))
        .map_err(context)?;

    let redeemer = witness
        .redeemer
        .ok_or_else(|| anyhow!("missing redeemer (see 'mint_redeemer_value')"))
        .map_err(context)?;

    if script.version() != witness.version {
        return Err(context(anyhow!(
            "script language {} differs from the announced {}",
            script.version(),
            witness.version
        )));
    }

    if script.hash() != asset.policy {
        return Err(context(anyhow!("script hash is {}", script.hash())));
    }

    Ok((redeemer, script))
}

// ----------------------------------------------------------------------- Tests

#[cfg(test)]
mod tests {
    use super::{TransactionBuilder, TxBuilder};
    use crate::{
        Address, Hash, Network, NetworkId, Output, PlutusData, PlutusScript, PlutusVersion,
        ProtocolParameters, Transaction, Utxo, Value, address, address_test, hash, input,
        key_credential, plutus_script,
    };
    use std::sync::LazyLock;

    static ALWAYS_SUCCEED: LazyLock<PlutusScript> =
        LazyLock::new(|| plutus_script!(PlutusVersion::V3, "5101010023259800a518a4d136564004ae69"));

    static WALLET: LazyLock<Address> = LazyLock::new(|| {
        Address::from(address_test!(key_credential!(
            "86fa1ef9c1f85b3d8e0e9c0e6f4c2fb47ab6b1c0b7e8f7e9c2a1d3b4"
        )))
    });

    static RECIPIENT: LazyLock<Address> = LazyLock::new(|| {
        Address::from(address_test!(key_credential!(
            "e4f2e5a7c1d0b3a6f9e8d7c6b5a4f3e2d1c0b9a8f7e6d5c4b3a2f1e0"
        )))
    });

    fn builder() -> TransactionBuilder {
        TransactionBuilder::from(Network::Preview)
    }

    fn wallet_utxo(ix: u64, lovelace: u64) -> Utxo {
        Utxo::new(
            input!(
                "c984c8bf52a141254c714c905b2d27b432d4b546f815fbc2fea7b9da6e490324",
                ix
            ),
            Output::new(WALLET.clone(), Value::new(lovelace)),
        )
    }

    fn script_utxo(ix: u64) -> Utxo {
        Utxo::new(
            input!(
                "32b5e793d26af181cb837ab7470ba6e10e15ff638088bc6b099bb22b54b4796c",
                ix
            ),
            Output::new(
                ALWAYS_SUCCEED.to_address(NetworkId::TESTNET).into(),
                Value::new(10_000_000),
            )
            .with_inline_datum(PlutusData::constr(0, [])),
        )
    }

    #[tokio::test]
    async fn pay_from_selectable_utxos() {
        let mut builder = builder();

        let hex = builder
            .tx_out(&RECIPIENT, &Value::new(5_000_000))
            .change_address(&WALLET)
            .select_utxos_from(&[wallet_utxo(0, 20_000_000), wallet_utxo(1, 3_000_000)])
            .complete()
            .await
            .unwrap();

        let tx: Transaction = hex.parse().unwrap();
        assert_eq!(tx.inputs().count(), 2);

        let outputs = tx.outputs().unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].address(), &*RECIPIENT);
        assert_eq!(outputs[0].value().lovelace(), 5_000_000);
        assert_eq!(outputs[1].address(), &*WALLET);
        assert_eq!(
            outputs[0].value().lovelace() + outputs[1].value().lovelace() + tx.fee(),
            23_000_000,
        );
    }

    #[tokio::test]
    async fn outputs_are_raised_to_the_minimum_deposit() {
        let params = ProtocolParameters::preview();
        let mut builder = TransactionBuilder::new(params.clone());

        let hex = builder
            .tx_out(&RECIPIENT, &Value::new(1))
            .tx_out_inline_datum_value(PlutusData::bytes(b"hello"))
            .change_address(&WALLET)
            .select_utxos_from(&[wallet_utxo(0, 20_000_000)])
            .complete()
            .await
            .unwrap();

        let tx: Transaction = hex.parse().unwrap();
        let outputs = tx.outputs().unwrap();
        assert!(outputs[0].value().lovelace() > 1);
        assert_eq!(
            outputs[0].value().lovelace(),
            outputs[0].minimum_deposit(&params)
        );
        assert_eq!(
            outputs[0].inline_datum(),
            Some(&PlutusData::bytes(b"hello"))
        );
    }

    #[tokio::test]
    async fn complete_resets_the_builder() {
        let mut builder = builder();

        builder
            .tx_out(&RECIPIENT, &Value::new(5_000_000))
            .change_address(&WALLET)
            .select_utxos_from(&[wallet_utxo(0, 20_000_000)])
            .complete()
            .await
            .unwrap();

        let error = builder.complete().await.unwrap_err();
        assert!(format!("{error:?}").contains("no change address"));
    }

    #[tokio::test]
    async fn rejects_addresses_from_another_network() {
        let mut builder = builder();

        let error = builder
            .set_network(Network::Mainnet)
            .tx_out(&RECIPIENT, &Value::new(5_000_000))
            .change_address(&WALLET)
            .select_utxos_from(&[wallet_utxo(0, 20_000_000)])
            .complete()
            .await
            .unwrap_err();

        assert!(format!("{error:?}").contains("target network"));
    }

    #[tokio::test]
    async fn network_survives_complete() {
        let mut builder = builder();

        builder
            .tx_out(&RECIPIENT, &Value::new(5_000_000))
            .change_address(&WALLET)
            .select_utxos_from(&[wallet_utxo(0, 20_000_000)])
            .complete()
            .await
            .unwrap();

        let mainnet = Address::from(address!(key_credential!(
            "e4f2e5a7c1d0b3a6f9e8d7c6b5a4f3e2d1c0b9a8f7e6d5c4b3a2f1e0"
        )));

        let error = builder
            .tx_out(&mainnet, &Value::new(5_000_000))
            .change_address(&WALLET)
            .select_utxos_from(&[wallet_utxo(1, 20_000_000)])
            .complete()
            .await
            .unwrap_err();

        assert!(format!("{error:?}").contains("target network"));
    }

    #[tokio::test]
    async fn rejects_insufficient_funds() {
        let mut builder = builder();

        let error = builder
            .tx_out(&RECIPIENT, &Value::new(50_000_000))
            .change_address(&WALLET)
            .select_utxos_from(&[wallet_utxo(0, 20_000_000)])
            .complete()
            .await
            .unwrap_err();

        assert!(format!("{error:?}").contains("insufficient balance"));
    }

    #[tokio::test]
    async fn spend_script_input() {
        let mut builder = builder();
        let collateral = wallet_utxo(1, 5_000_000);
        let signer = hash!("86fa1ef9c1f85b3d8e0e9c0e6f4c2fb47ab6b1c0b7e8f7e9c2a1d3b4");

        let hex = builder
            .spending_plutus_script(PlutusVersion::V3)
            .tx_in(&script_utxo(0))
            .tx_in_inline_datum_present()
            .tx_in_redeemer_value(PlutusData::constr(0, []))
            .tx_in_script(ALWAYS_SUCCEED.clone())
            .tx_out(&RECIPIENT, &Value::new(10_000_000))
            .tx_in_collateral(&collateral)
            .change_address(&WALLET)
            .required_signer_hash(signer)
            .select_utxos_from(&[collateral.clone(), script_utxo(1)])
            .complete()
            .await
            .unwrap();

        let tx: Transaction = hex.parse().unwrap();

        // The script-locked selectable UTxO is left alone.
        assert_eq!(
            tx.inputs().collect::<Vec<_>>(),
            vec![script_utxo(0).input().clone(), collateral.input().clone()],
        );
        assert_eq!(tx.collaterals().collect::<Vec<_>>(), vec![collateral.input().clone()]);
        assert_eq!(tx.required_signers().collect::<Vec<Hash<28>>>(), vec![signer]);
        assert_eq!(tx.redeemers().len(), 1);
        assert!(tx.plutus_scripts().contains_key(&ALWAYS_SUCCEED.hash()));
        assert!(tx.total_collateral() > 0);
    }

    #[tokio::test]
    async fn script_input_requires_a_redeemer() {
        let mut builder = builder();

        let error = builder
            .spending_plutus_script(PlutusVersion::V3)
            .tx_in(&script_utxo(0))
            .tx_in_inline_datum_present()
            .tx_in_script(ALWAYS_SUCCEED.clone())
            .tx_in_collateral(&wallet_utxo(1, 5_000_000))
            .change_address(&WALLET)
            .complete()
            .await
            .unwrap_err();

        assert!(format!("{error:?}").contains("missing redeemer"));
    }

    #[tokio::test]
    async fn qualifiers_need_a_script_input() {
        let mut builder = builder();

        let error = builder
            .tx_in(&wallet_utxo(0, 20_000_000))
            .tx_in_redeemer_value(PlutusData::constr(0, []))
            .change_address(&WALLET)
            .complete()
            .await
            .unwrap_err();

        assert!(format!("{error:?}").contains("must follow a script input"));
    }

    #[tokio::test]
    async fn mint_and_burn_under_a_plutus_policy() {
        let mut builder = builder();
        let policy = ALWAYS_SUCCEED.hash();
        let collateral = wallet_utxo(1, 5_000_000);

        let hex = builder
            .mint_plutus_script(PlutusVersion::V3)
            .mint(1, policy, b"foo")
            .minting_script(ALWAYS_SUCCEED.clone())
            .mint_redeemer_value(PlutusData::constr(0, []))
            .mint_plutus_script(PlutusVersion::V3)
            .mint(2, policy, b"bar")
            .minting_script(ALWAYS_SUCCEED.clone())
            .mint_redeemer_value(PlutusData::constr(0, []))
            .tx_in_collateral(&collateral)
            .change_address(&WALLET)
            .select_utxos_from(&[wallet_utxo(0, 20_000_000)])
            .complete()
            .await
            .unwrap();

        let tx: Transaction = hex.parse().unwrap();
        assert_eq!(
            tx.mint(),
            Value::default().with_assets([(policy, [(b"foo", 1_i64), (b"bar", 2)])]),
        );
        assert_eq!(tx.redeemers().len(), 1);

        let change = tx.outputs().unwrap().pop().unwrap();
        assert_eq!(
            change.value().assets(),
            Value::<u64>::default()
                .with_assets([(policy, [(b"foo", 1_u64), (b"bar", 2)])])
                .assets(),
        );
    }

    #[tokio::test]
    async fn conflicting_mint_redeemers() {
        let mut builder = builder();
        let policy = ALWAYS_SUCCEED.hash();

        let error = builder
            .mint_plutus_script(PlutusVersion::V3)
            .mint(1, policy, b"foo")
            .minting_script(ALWAYS_SUCCEED.clone())
            .mint_redeemer_value(PlutusData::constr(0, []))
            .mint_plutus_script(PlutusVersion::V3)
            .mint(-1, policy, b"bar")
            .minting_script(ALWAYS_SUCCEED.clone())
            .mint_redeemer_value(PlutusData::constr(1, []))
            .tx_in_collateral(&wallet_utxo(1, 5_000_000))
            .change_address(&WALLET)
            .select_utxos_from(&[wallet_utxo(0, 20_000_000)])
            .complete()
            .await
            .unwrap_err();

        assert!(format!("{error:?}").contains("conflicting redeemers"));
    }

    #[tokio::test]
    async fn mint_quantities_overflow() {
        let mut builder = builder();
        let policy = ALWAYS_SUCCEED.hash();

        let error = builder
            .mint_plutus_script(PlutusVersion::V3)
            .mint(i64::MAX, policy, b"foo")
            .minting_script(ALWAYS_SUCCEED.clone())
            .mint_redeemer_value(PlutusData::constr(0, []))
            .mint_plutus_script(PlutusVersion::V3)
            .mint(1, policy, b"foo")
            .minting_script(ALWAYS_SUCCEED.clone())
            .mint_redeemer_value(PlutusData::constr(0, []))
            .tx_in_collateral(&wallet_utxo(1, 5_000_000))
            .change_address(&WALLET)
            .select_utxos_from(&[wallet_utxo(0, 20_000_000)])
            .complete()
            .await
            .unwrap_err();

        assert!(format!("{error:?}").contains("out of bounds"));
    }

    #[tokio::test]
    async fn minting_script_must_match_the_policy() {
        let mut builder = builder();

        let error = builder
            .mint_plutus_script(PlutusVersion::V3)
            .mint(
                1,
                hash!("5fb286e39c3cda5a5abd17501c17b01987ebfa282df129c4df1bf27e"),
                b"foo",
            )
            .minting_script(ALWAYS_SUCCEED.clone())
            .mint_redeemer_value(PlutusData::constr(0, []))
            .change_address(&WALLET)
            .complete()
            .await
            .unwrap_err();

        assert!(format!("{error:?}").contains("invalid mint"));
    }
}
