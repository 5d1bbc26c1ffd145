//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{
    ChangeStrategy, ExecutionUnits, Hash, Input, Output, PlutusData, PlutusScript, PlutusVersion,
    ProtocolParameters, RedeemerPointer, Signature, SigningKey, Value, VerificationKey, cbor,
    cbor::ToCbor, pallas,
};
use anyhow::anyhow;
use itertools::Itertools;
use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt, mem,
    str::FromStr,
};

mod builder;

/// A Conway-era transaction, either under construction (see [`Transaction::build`]) or decoded
/// from its serialised form.
pub struct Transaction {
    inner: pallas::Tx,
    change_strategy: ChangeStrategy,
}

/// Policy id to mint redeemer and minted (positive) or burned (negative) quantities.
pub type Mint = BTreeMap<Hash<28>, (PlutusData<'static>, BTreeMap<Vec<u8>, i64>)>;

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

// ------------------------------------------------------------------ Inspecting

impl Transaction {
    /// The transaction id: the blake2b-256 digest of the serialised body.
    pub fn id(&self) -> Hash<32> {
        Hash::from(pallas::hash::Hasher::<256>::hash(
            &self.inner.transaction_body.to_cbor(),
        ))
    }

    pub fn fee(&self) -> u64 {
        self.inner.transaction_body.fee
    }

    pub fn total_collateral(&self) -> u64 {
        self.inner
            .transaction_body
            .total_collateral
            .unwrap_or_default()
    }

    /// The declared inputs, in ledger order, which are spent when the transaction succeeds.
    pub fn inputs(&self) -> impl Iterator<Item = Input> + '_ {
        self.inner
            .transaction_body
            .inputs
            .iter()
            .cloned()
            .map(Input::from)
    }

    /// The declared collaterals, which are spent when script validation fails.
    pub fn collaterals(&self) -> impl Iterator<Item = Input> + '_ {
        self.inner
            .transaction_body
            .collateral
            .iter()
            .flat_map(|xs| xs.iter().cloned().map(Input::from))
    }

    pub fn required_signers(&self) -> impl Iterator<Item = Hash<28>> + '_ {
        self.inner
            .transaction_body
            .required_signers
            .iter()
            .flat_map(|xs| xs.iter().map(Hash::from))
    }

    pub fn mint(&self) -> Value<i64> {
        self.inner
            .transaction_body
            .mint
            .as_ref()
            .map(Value::from)
            .unwrap_or_default()
    }

    /// The declared outputs, which are produced when the transaction succeeds.
    pub fn outputs(&self) -> anyhow::Result<Vec<Output>> {
        self.inner
            .transaction_body
            .outputs
            .iter()
            .map(Output::try_from)
            .collect()
    }

    /// Redeemers attached to the transaction, with the execution units they are granted.
    pub fn redeemers(&self) -> BTreeMap<RedeemerPointer, (PlutusData<'_>, ExecutionUnits)> {
        let Some(pallas::Redeemers::Map(kv)) = &self.inner.transaction_witness_set.redeemer
        else {
            return BTreeMap::new();
        };

        kv.iter()
            .filter_map(|(key, value)| {
                let ptr = RedeemerPointer::try_from(key).ok()?;
                let data = PlutusData::from(&value.data);
                Some((ptr, (data, ExecutionUnits::from(value.ex_units))))
            })
            .collect()
    }

    /// Hashes of the Plutus scripts carried in the witness set.
    pub fn plutus_scripts(&self) -> BTreeMap<Hash<28>, PlutusVersion> {
        plutus_scripts(&self.inner.transaction_witness_set)
            .map(|script| (script.hash(), script.version()))
            .collect()
    }

    /// The verification key witnesses, checked against the transaction id.
    pub fn signatures(&self) -> anyhow::Result<Vec<(VerificationKey, Signature)>> {
        let id = self.id();
        self.inner
            .transaction_witness_set
            .vkeywitness
            .iter()
            .flat_map(|xs| xs.iter())
            .map(|witness| {
                let vkey = <[u8; 32]>::try_from(witness.vkey.as_slice())
                    .map(VerificationKey::from)
                    .map_err(|_| anyhow!("malformed verification key in witness"))?;
                let signature = <[u8; 64]>::try_from(witness.signature.as_slice())
                    .map(Signature::from)
                    .map_err(|_| anyhow!("malformed signature in witness"))?;
                if !vkey.verify(id, &signature) {
                    return Err(anyhow!("vkey={vkey}").context("invalid signature in witness"));
                }
                Ok((vkey, signature))
            })
            .collect()
    }

    /// Base16-encoded CBOR, as expected by wallets and submission endpoints.
    pub fn to_hex(&self) -> String {
        self.to_cbor_hex()
    }
}

// -------------------------------------------------------------------- Building

impl Default for Transaction {
    fn default() -> Self {
        Self {
            change_strategy: ChangeStrategy::default(),
            inner: pallas::Tx {
                transaction_body: pallas::TransactionBody {
                    auxiliary_data_hash: None,
                    certificates: None,
                    collateral: None,
                    collateral_return: None,
                    donation: None,
                    fee: 0,
                    inputs: pallas::Set::from(vec![]),
                    mint: None,
                    network_id: None,
                    outputs: vec![],
                    proposal_procedures: None,
                    reference_inputs: None,
                    required_signers: None,
                    script_data_hash: None,
                    total_collateral: None,
                    treasury_value: None,
                    ttl: None,
                    validity_interval_start: None,
                    voting_procedures: None,
                    withdrawals: None,
                },
                transaction_witness_set: pallas::WitnessSet {
                    bootstrap_witness: None,
                    native_script: None,
                    plutus_data: None,
                    plutus_v1_script: None,
                    plutus_v2_script: None,
                    plutus_v3_script: None,
                    redeemer: None,
                    vkeywitness: None,
                },
                success: true,
                auxiliary_data: pallas::Nullable::Null,
            },
        }
    }
}

impl Transaction {
    pub fn ok(&mut self) -> anyhow::Result<&mut Self> {
        Ok(self)
    }

    /// Declare the spent inputs. Script-locked inputs come with their redeemer; redeemers point
    /// at the position of their input once sorted.
    pub fn with_inputs(
        &mut self,
        inputs: impl IntoIterator<Item = (Input, Option<PlutusData<'static>>)>,
    ) -> &mut Self {
        let mut redeemers = BTreeMap::new();

        self.inner.transaction_body.inputs = pallas::Set::from(
            inputs
                .into_iter()
                .sorted_by(|(a, _), (b, _)| a.cmp(b))
                .dedup_by(|(a, _), (b, _)| a == b)
                .enumerate()
                .map(|(ix, (input, redeemer))| {
                    if let Some(data) = redeemer {
                        redeemers.insert(RedeemerPointer::spend(ix), data);
                    }
                    pallas::TransactionInput::from(input)
                })
                .collect::<Vec<_>>(),
        );

        self.with_redeemers(|ptr| matches!(ptr, RedeemerPointer::Spend(..)), redeemers)
    }

    pub fn with_collaterals(&mut self, collaterals: impl IntoIterator<Item = Input>) -> &mut Self {
        self.inner.transaction_body.collateral = pallas::NonEmptySet::from_vec(
            collaterals
                .into_iter()
                .sorted()
                .dedup()
                .map(pallas::TransactionInput::from)
                .collect::<Vec<_>>(),
        );
        self
    }

    pub fn with_outputs(&mut self, outputs: impl IntoIterator<Item = Output>) -> &mut Self {
        self.inner.transaction_body.outputs = outputs
            .into_iter()
            .map(|output| pallas::TransactionOutput::from(&output))
            .collect();
        self
    }

    pub fn with_change_strategy(&mut self, with: ChangeStrategy) -> &mut Self {
        self.change_strategy = with;
        self
    }

    /// Declare minted and burned assets. Mint redeemers point at the position of their policy
    /// among the (sorted) policies.
    pub fn with_mint(&mut self, mint: Mint) -> &mut Self {
        let mut redeemers = BTreeMap::new();
        let mut assets = BTreeMap::new();

        for (ix, (policy, (redeemer, quantities))) in mint.into_iter().enumerate() {
            redeemers.insert(RedeemerPointer::mint(ix), redeemer);
            assets.insert(policy, quantities);
        }

        self.inner.transaction_body.mint =
            <Option<pallas::Multiasset<_>>>::from(&Value::default().with_assets(assets));

        self.with_redeemers(|ptr| matches!(ptr, RedeemerPointer::Mint(..)), redeemers)
    }

    pub fn with_fee(&mut self, fee: u64) -> &mut Self {
        self.inner.transaction_body.fee = fee;
        self
    }

    /// Attach the witness scripts needed to validate script inputs and mints.
    pub fn with_plutus_scripts(
        &mut self,
        scripts: impl IntoIterator<Item = PlutusScript>,
    ) -> &mut Self {
        let mut v1 = Vec::new();
        let mut v2 = Vec::new();
        let mut v3 = Vec::new();

        for script in scripts.into_iter().sorted().dedup() {
            let bytes = pallas::Bytes::from(script.as_bytes().to_vec());
            match script.version() {
                PlutusVersion::V1 => v1.push(pallas::PlutusScript::<1>(bytes)),
                PlutusVersion::V2 => v2.push(pallas::PlutusScript::<2>(bytes)),
                PlutusVersion::V3 => v3.push(pallas::PlutusScript::<3>(bytes)),
            }
        }

        let witness_set = &mut self.inner.transaction_witness_set;
        witness_set.plutus_v1_script = pallas::NonEmptySet::from_vec(v1);
        witness_set.plutus_v2_script = pallas::NonEmptySet::from_vec(v2);
        witness_set.plutus_v3_script = pallas::NonEmptySet::from_vec(v3);

        self
    }

    /// Extra signatories, visible to validators.
    pub fn with_required_signers(
        &mut self,
        signers: impl IntoIterator<Item = Hash<28>>,
    ) -> &mut Self {
        self.inner.transaction_body.required_signers = pallas::NonEmptySet::from_vec(
            signers
                .into_iter()
                .sorted()
                .dedup()
                .map(pallas::Hash::from)
                .collect::<Vec<_>>(),
        );
        self
    }

    /// Add (or replace) the verification key witness of the given key.
    pub fn sign(&mut self, key: &SigningKey) -> &mut Self {
        let vkey = key.to_verification_key();
        let signature = key.sign(self.id());

        let witness = pallas::VKeyWitness {
            vkey: pallas::Bytes::from(vkey.as_ref().to_vec()),
            signature: pallas::Bytes::from(signature.as_ref().to_vec()),
        };

        let witness_set = &mut self.inner.transaction_witness_set;
        let mut witnesses = witness_set
            .vkeywitness
            .take()
            .map(|xs| xs.to_vec())
            .unwrap_or_default();
        witnesses.retain(|existing| existing.vkey != witness.vkey);
        witnesses.push(witness);
        witness_set.vkeywitness = pallas::NonEmptySet::from_vec(witnesses);

        self
    }
}

// -------------------------------------------------------------------- Internal

impl Transaction {
    /// Signatories inferred from key-locked inputs and collaterals, plus the declared required
    /// signers.
    fn required_signatories(
        &self,
        resolved_inputs: &BTreeMap<Input, Output>,
    ) -> anyhow::Result<BTreeSet<Hash<28>>> {
        let from_inputs = self
            .inputs()
            .chain(self.collaterals())
            .map(|input| {
                resolve(resolved_inputs, &input).map(|output| output.address().payment_key_hash())
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(self
            .required_signers()
            .chain(from_inputs.into_iter().flatten())
            .collect())
    }

    /// Scripts that must run for the transaction to be valid, keyed by the redeemer they
    /// expect: script-locked inputs and minting policies.
    fn required_scripts(
        &self,
        resolved_inputs: &BTreeMap<Input, Output>,
    ) -> anyhow::Result<BTreeMap<RedeemerPointer, Hash<28>>> {
        let mut required = BTreeMap::new();

        for (ix, input) in self.inputs().enumerate() {
            if let Some(hash) = resolve(resolved_inputs, &input)?
                .address()
                .payment_script_hash()
            {
                required.insert(RedeemerPointer::spend(ix), hash);
            }
        }

        for (ix, (policy, _)) in self.mint().assets().iter().enumerate() {
            required.insert(RedeemerPointer::mint(ix), *policy);
        }

        Ok(required)
    }

    /// The languages of all witness scripts, with their cost models.
    fn language_views<'p>(
        &self,
        params: &'p ProtocolParameters,
    ) -> anyhow::Result<BTreeMap<PlutusVersion, &'p Vec<i64>>> {
        plutus_scripts(&self.inner.transaction_witness_set)
            .map(|script| script.version())
            .unique()
            .map(|version| {
                if version == PlutusVersion::V1 {
                    return Err(anyhow!("plutus v1 scripts are not supported"));
                }
                let cost_model = params.cost_model(version).ok_or_else(|| {
                    anyhow!("missing cost model for plutus {version} in protocol parameters")
                })?;
                Ok((version, cost_model))
            })
            .collect()
    }

    /// blake2b-256 over the redeemers, the witness datums and the language views.
    fn script_integrity_hash(
        &self,
        params: &ProtocolParameters,
    ) -> anyhow::Result<Option<Hash<32>>> {
        let witness_set = &self.inner.transaction_witness_set;

        if witness_set.redeemer.is_none() && witness_set.plutus_data.is_none() {
            return Ok(None);
        }

        let mut preimage: Vec<u8> = Vec::new();

        if let Some(redeemers) = &witness_set.redeemer {
            preimage.extend(redeemers.to_cbor());
        }

        if let Some(datums) = &witness_set.plutus_data {
            preimage.extend(datums.to_cbor());
        }

        preimage.extend(self.language_views(params)?.to_cbor());

        Ok(Some(Hash::from(pallas::hash::Hasher::<256>::hash(
            &preimage,
        ))))
    }

    fn with_redeemers(
        &mut self,
        replaced: impl Fn(&RedeemerPointer) -> bool,
        redeemers: BTreeMap<RedeemerPointer, PlutusData<'static>>,
    ) -> &mut Self {
        let mut all = self
            .redeemers()
            .into_iter()
            .filter(|(ptr, _)| !replaced(ptr))
            .map(|(ptr, (data, ex_units))| (ptr, (data.into_owned(), ex_units)))
            .collect::<BTreeMap<_, _>>();

        all.extend(
            redeemers
                .into_iter()
                .map(|(ptr, data)| (ptr, (data, ExecutionUnits::default()))),
        );

        self.set_redeemers(all);

        self
    }

    fn set_redeemers(
        &mut self,
        redeemers: BTreeMap<RedeemerPointer, (PlutusData<'static>, ExecutionUnits)>,
    ) {
        self.inner.transaction_witness_set.redeemer = pallas::NonEmptyKeyValuePairs::from_vec(
            redeemers
                .into_iter()
                .map(|(ptr, (data, ex_units))| {
                    (
                        pallas::RedeemersKey::from(ptr),
                        pallas::RedeemersValue {
                            data: pallas::PlutusData::from(data),
                            ex_units: pallas::ExUnits::from(ex_units),
                        },
                    )
                })
                .collect(),
        )
        .map(pallas::Redeemers::from);
    }

    fn with_script_integrity_hash(&mut self, params: &ProtocolParameters) -> anyhow::Result<()> {
        self.inner.transaction_body.script_data_hash =
            self.script_integrity_hash(params)?.map(pallas::Hash::from);
        Ok(())
    }

    /// Grant each redeemer the execution units measured in a previous round.
    fn with_execution_units(
        &mut self,
        measured: &BTreeMap<RedeemerPointer, ExecutionUnits>,
    ) -> anyhow::Result<()> {
        if measured.is_empty() {
            return Ok(());
        }

        let redeemers = self
            .redeemers()
            .into_iter()
            .map(|(ptr, (data, ex_units))| {
                let ex_units = measured.get(&ptr).copied().unwrap_or(ex_units);
                (ptr, (data.into_owned(), ex_units))
            })
            .collect::<BTreeMap<_, _>>();

        if let Some(extra) = measured.keys().find(|ptr| !redeemers.contains_key(ptr)) {
            return Err(anyhow!("redeemer={extra}")
                .context("extraneous redeemer in transaction; not required by any script"));
        }

        self.set_redeemers(redeemers);

        Ok(())
    }

    /// Balance the transaction: whatever the inputs and mints bring in, minus what the outputs,
    /// burns and fee take out, goes to the change strategy.
    fn with_change(&mut self, resolved_inputs: &BTreeMap<Input, Output>) -> anyhow::Result<()> {
        let mut change = Value::default();

        for input in self.inputs() {
            change.add(resolve(resolved_inputs, &input)?.value());
        }

        let (minted, burned) = split_mint(&self.mint());

        change.add(&minted);

        let insufficient =
            |e: anyhow::Error| e.context("insufficient balance; spending more than available");

        change.checked_sub(&burned).map_err(insufficient)?;

        for output in self.outputs()? {
            change.checked_sub(output.value()).map_err(insufficient)?;
        }

        change
            .checked_sub(&Value::new(self.fee()))
            .map_err(insufficient)?;

        if !change.is_empty() {
            let mut outputs = VecDeque::from(self.outputs()?);
            mem::take(&mut self.change_strategy).apply(change, &mut outputs)?;
            self.with_outputs(outputs);
        }

        Ok(())
    }

    /// Set the total collateral and return the excess to the address of the first collateral.
    fn with_collateral_return(
        &mut self,
        resolved_inputs: &BTreeMap<Input, Output>,
        params: &ProtocolParameters,
    ) -> anyhow::Result<()> {
        let mut total = Value::default();
        let mut return_address = None;

        for input in self.collaterals() {
            let output = resolve(resolved_inputs, &input)?;
            total.add(output.value());
            return_address.get_or_insert_with(|| output.address().clone());
        }

        let Some(return_address) = return_address else {
            return Ok(());
        };

        let minimum_collateral = params.minimum_collateral(self.fee());

        total
            .checked_sub(&Value::new(minimum_collateral))
            .map_err(|e| e.context("insufficient collateral inputs"))?;

        let body = &mut self.inner.transaction_body;
        body.total_collateral = Some(minimum_collateral);
        body.collateral_return = Some(pallas::TransactionOutput::from(&Output::new(
            return_address,
            total,
        )));

        Ok(())
    }
}

// --------------------------------------------------------------------- Helpers

fn resolve<'a>(
    resolved_inputs: &'a BTreeMap<Input, Output>,
    input: &Input,
) -> anyhow::Result<&'a Output> {
    resolved_inputs.get(input).ok_or_else(|| {
        anyhow!("input={input}")
            .context("unknown output for input; found in transaction but not in the resolved set")
    })
}

fn plutus_scripts(witness_set: &pallas::WitnessSet) -> impl Iterator<Item = PlutusScript> + '_ {
    let v1 = witness_set.plutus_v1_script.iter().flat_map(|xs| {
        xs.iter()
            .map(|script| PlutusScript::new(PlutusVersion::V1, script.0.to_vec()))
    });
    let v2 = witness_set.plutus_v2_script.iter().flat_map(|xs| {
        xs.iter()
            .map(|script| PlutusScript::new(PlutusVersion::V2, script.0.to_vec()))
    });
    let v3 = witness_set.plutus_v3_script.iter().flat_map(|xs| {
        xs.iter()
            .map(|script| PlutusScript::new(PlutusVersion::V3, script.0.to_vec()))
    });
    v1.chain(v2).chain(v3)
}

/// Partition mint quantities into what is minted and what is burned.
fn split_mint(mint: &Value<i64>) -> (Value<u64>, Value<u64>) {
    let mut minted = BTreeMap::<Hash<28>, BTreeMap<Vec<u8>, u64>>::new();
    let mut burned = BTreeMap::<Hash<28>, BTreeMap<Vec<u8>, u64>>::new();

    for (asset, quantity) in mint.asset_ids() {
        let side = if quantity > 0 { &mut minted } else { &mut burned };
        side.entry(asset.policy())
            .or_default()
            .insert(asset.name().to_vec(), quantity.unsigned_abs());
    }

    (
        Value::default().with_assets(minted),
        Value::default().with_assets(burned),
    )
}

// -------------------------------------------------------------------- Encoding

impl<C> cbor::Encode<C> for Transaction {
    fn encode<W: cbor::encode::write::Write>(
        &self,
        e: &mut cbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), cbor::encode::Error<W::Error>> {
        e.encode_with(&self.inner, ctx)?;
        Ok(())
    }
}

impl<'d, C> cbor::Decode<'d, C> for Transaction {
    fn decode(d: &mut cbor::Decoder<'d>, ctx: &mut C) -> Result<Self, cbor::decode::Error> {
        Ok(Self {
            inner: d.decode_with(ctx)?,
            change_strategy: ChangeStrategy::default(),
        })
    }
}

/// Parse a base16-encoded CBOR transaction.
impl FromStr for Transaction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| anyhow!(e).context("malformed base16 transaction"))?;
        cbor::decode(&bytes).map_err(|e| anyhow!("{e}").context("malformed transaction"))
    }
}
