//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{
    ExecutionUnits, Hash, Input, Output, ProtocolParameters, RedeemerPointer, Transaction, cbor,
    cbor::ToCbor, pallas,
};
use anyhow::anyhow;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use uplc::tx::SlotConfig;

// ```cddl
// vkeywitness = [ vkey, signature ]
// ```
const SIZE_OF_KEY_WITNESS: u64 = 1 // 1 byte for the 2-tuple declaration
    + (32 + 2) // 32 bytes of verification key + 2 bytes of CBOR bytestring declaration
    + (64 + 2); // 64 bytes of signature + 2 bytes of CBOR bytestring declaration

/// Map key, CBOR-set tag and list declaration of the witnesses; doubled to also cover bootstrap
/// witnesses.
const SIZE_OF_KEY_WITNESSES_OVERHEAD: u64 = 2 * (1 + 3 + 3);

const MAX_ATTEMPTS: usize = 3;

impl Transaction {
    /// Build a balanced transaction by running `build` with successive fee (and execution units)
    /// estimates, until the declared fee covers the estimate.
    ///
    /// `resolved_inputs` must resolve every input and collateral the transaction declares.
    pub fn build<F>(
        params: &ProtocolParameters,
        resolved_inputs: &BTreeMap<Input, Output>,
        build: F,
    ) -> anyhow::Result<Self>
    where
        F: Fn(&mut Self) -> anyhow::Result<&mut Self>,
    {
        let mut fee: u64 = 0;
        let mut redeemers: BTreeMap<RedeemerPointer, ExecutionUnits> = BTreeMap::new();

        for attempt in 1..=MAX_ATTEMPTS {
            let mut tx = Transaction::default();

            build(tx.with_fee(fee))?;

            let required_scripts = tx.required_scripts(resolved_inputs)?;

            fail_on_missing_witnesses(&tx, &required_scripts)?;

            tx.with_change(resolved_inputs)?;

            tx.with_execution_units(&redeemers)?;

            tx.with_collateral_return(resolved_inputs, params)?;

            tx.with_script_integrity_hash(params)?;

            fail_on_missing_collateral(&tx, &required_scripts)?;

            let serialized_tx = tx.to_cbor();

            redeemers = evaluate_plutus_scripts(
                &serialized_tx,
                into_uplc_inputs(&tx, resolved_inputs),
                &required_scripts,
                params,
            )?;

            // Assumes one witness per key-locked input; native scripts would be under-estimated.
            let estimated_fee = {
                let num_signatories = tx.required_signatories(resolved_inputs)?.len() as u64;
                let estimated_size = serialized_tx.len() as u64
                    + SIZE_OF_KEY_WITNESSES_OVERHEAD
                    + SIZE_OF_KEY_WITNESS * num_signatories;
                params.base_fee(estimated_size)
                    + redeemers
                        .values()
                        .map(|ex_units| ex_units.cost(params))
                        .sum::<u64>()
            };

            debug!(
                "build attempt={attempt}, fee={fee}, estimated_fee={estimated_fee}, size={}",
                serialized_tx.len()
            );

            if fee >= estimated_fee {
                return Ok(tx);
            }

            if attempt == MAX_ATTEMPTS {
                return Err(anyhow!("transaction = {}", hex::encode(&serialized_tx))
                    .context(format!("fee = {fee}, estimated_fee = {estimated_fee}"))
                    .context(format!(
                        "failed to build transaction: did not converge after {MAX_ATTEMPTS} attempts"
                    )));
            }

            fee = estimated_fee;
        }

        unreachable!("the last attempt always returns")
    }
}

// --------------------------------------------------------------------- Helpers

/// Only inputs declared by the transaction take part in the evaluation, so that extra entries in
/// the resolved set cannot make it wrongly succeed.
fn into_uplc_inputs(
    tx: &Transaction,
    resolved_inputs: &BTreeMap<Input, Output>,
) -> Vec<uplc::tx::ResolvedInput> {
    let known_inputs = tx.inputs().collect::<BTreeSet<_>>();

    resolved_inputs
        .iter()
        .filter(|(input, _)| known_inputs.contains(*input))
        .map(|(input, output)| uplc::tx::ResolvedInput {
            input: pallas::TransactionInput::from(input),
            output: pallas::TransactionOutput::from(output),
        })
        .collect()
}

fn fail_on_missing_witnesses(
    tx: &Transaction,
    required_scripts: &BTreeMap<RedeemerPointer, Hash<28>>,
) -> anyhow::Result<()> {
    let redeemers = tx.redeemers();
    let scripts = tx.plutus_scripts();

    for (ptr, hash) in required_scripts {
        if !redeemers.contains_key(ptr) {
            return Err(anyhow!("at {ptr}, script={hash}").context("missing redeemer"));
        }

        if !scripts.contains_key(hash) {
            return Err(anyhow!("at {ptr}, script={hash}").context("missing witness script"));
        }
    }

    Ok(())
}

fn fail_on_missing_collateral(
    tx: &Transaction,
    required_scripts: &BTreeMap<RedeemerPointer, Hash<28>>,
) -> anyhow::Result<()> {
    if !required_scripts.is_empty() && tx.collaterals().next().is_none() {
        let ptrs = required_scripts
            .keys()
            .map(|ptr| ptr.to_string())
            .collect::<Vec<_>>();

        return Err(anyhow!("at {}", ptrs.join(", ")).context(
            "no collaterals set, but the transaction requires at least one phase-2 script execution",
        ));
    }

    Ok(())
}

fn evaluate_plutus_scripts(
    serialized_tx: &[u8],
    resolved_inputs: Vec<uplc::tx::ResolvedInput>,
    required_scripts: &BTreeMap<RedeemerPointer, Hash<28>>,
    params: &ProtocolParameters,
) -> anyhow::Result<BTreeMap<RedeemerPointer, ExecutionUnits>> {
    if required_scripts.is_empty() {
        return Ok(BTreeMap::new());
    }

    // 'eval_phase_two' only accepts a MintedTx, which can only be obtained by decoding.
    let minted_tx: pallas::MintedTx<'_> = cbor::decode(serialized_tx)
        .map_err(|e| anyhow!("{e}").context("couldn't decode transaction for evaluation"))?;

    uplc::tx::eval_phase_two(
        &minted_tx,
        resolved_inputs.as_slice(),
        None,
        None,
        &SlotConfig::from(params),
        false,
        |_| (),
    )
    .map_err(|e| {
        anyhow!("required scripts = {required_scripts:?}")
            .context(format!("{e:?}"))
            .context("script evaluation failed")
    })?
    .into_iter()
    .map(|(redeemer, _eval_result)| {
        let key = pallas::RedeemersKey {
            tag: redeemer.tag,
            index: redeemer.index,
        };
        Ok((
            RedeemerPointer::try_from(&key)?,
            ExecutionUnits::from(redeemer.ex_units),
        ))
    })
    .collect()
}

// ----------------------------------------------------------------------- Tests

#[cfg(test)]
mod tests {
    use crate::{
        Address, ChangeStrategy, Hash, Input, Output, PlutusData, PlutusScript, PlutusVersion,
        ProtocolParameters, SigningKey, Transaction, address, address_test, hash, input,
        key_credential, output, plutus_script, script_credential, value,
    };
    use std::{collections::BTreeMap, sync::LazyLock};

    static FIXTURE_PROTOCOL_PARAMETERS: LazyLock<ProtocolParameters> =
        LazyLock::new(ProtocolParameters::mainnet);

    fn balance(tx: &Transaction, resolved_inputs: &BTreeMap<Input, Output>) -> (u64, u64) {
        let spent = tx
            .inputs()
            .map(|input| resolved_inputs[&input].value().lovelace())
            .sum::<u64>();
        let produced = tx
            .outputs()
            .unwrap()
            .iter()
            .map(|output| output.value().lovelace())
            .sum::<u64>();
        (spent, produced + tx.fee())
    }

    #[test]
    fn single_in_single_out() {
        let resolved_inputs = BTreeMap::from([(
            input!(
                "32b5e793d26af181cb837ab7470ba6e10e15ff638088bc6b099bb22b54b4796c",
                1
            ),
            output!(
                "addr1qxjgtdjrdj05nge3v406z46yqhp7nwc744j7sju37287sfjrcq0durn7xns7whpp6mymksagz9msf08qxqfakhc85dgq9pynjj",
                value!(
                    7933351,
                    ("279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f", "534e454b", 1376),
                    ("a0028f350aaabe0545fdcb56b039bfb08e4bb4d8c4d7c3c7d481c235", "484f534b59", 134468443),
                ),
            ),
        )]);

        let result = Transaction::build(&FIXTURE_PROTOCOL_PARAMETERS, &resolved_inputs, |tx| {
            tx.with_inputs(vec![input!(
                "32b5e793d26af181cb837ab7470ba6e10e15ff638088bc6b099bb22b54b4796c",
                1,
                _
            )])
            .with_outputs(vec![output!(
                "addr1q8lgqva8uleq9f3wjsnggh42d6y8vm9rvah380wq3x9djqwhy3954pmhklwxjz05vsx0qt4yw4a9275eldyrkp0c0hlqgxc7du",
                value!(
                    6687232,
                    ("279c909f348e533da5808898f87f9a14bb2c3dfbbacccd631d927a3f", "534e454b", 1376),
                    ("a0028f350aaabe0545fdcb56b039bfb08e4bb4d8c4d7c3c7d481c235", "484f534b59", 134468443),
                ),
            )])
            .with_change_strategy(ChangeStrategy::as_last_output(
                address!("addr1qxjgtdjrdj05nge3v406z46yqhp7nwc744j7sju37287sfjrcq0durn7xns7whpp6mymksagz9msf08qxqfakhc85dgq9pynjj"),
                &FIXTURE_PROTOCOL_PARAMETERS,
            ))
            .ok()
        });

        let tx = result.unwrap();

        // Bounds measured with the cardano-cli on the same transaction, which over-estimates.
        let minimum_fee = 171925;
        let cardano_cli_fee = 176369;
        assert!(
            tx.fee() >= minimum_fee && tx.fee() <= cardano_cli_fee,
            "estimated fee={}, minimum required={minimum_fee}, cardano-cli's estimation={cardano_cli_fee}",
            tx.fee(),
        );

        let (spent, produced) = balance(&tx, &resolved_inputs);
        assert_eq!(spent, produced);
        assert_eq!(tx.outputs().unwrap().len(), 2);
    }

    #[test]
    fn mint_tokens() {
        let resolved_inputs = BTreeMap::from([(
            input!(
                "d62db0b98b6df96645eec19d4728b385592fc531736abd987eb6490510c5ba50",
                0
            ),
            output!(
                "addr1qxu84ftxpzh3zd8p9awp2ytwzk5exj0fxcj7paur4kd4ytun36yuhgl049rxhhuckm2lpq3rmz5dcraddyl45d6xgvqqsp504c",
                value!(102049379)
            ),
        )]);

        let policy = hash!("5fb286e39c3cda5a5abd17501c17b01987ebfa282df129c4df1bf27e");

        let result = Transaction::build(&FIXTURE_PROTOCOL_PARAMETERS, &resolved_inputs, |tx| {
            tx.with_inputs(vec![input!(
                "d62db0b98b6df96645eec19d4728b385592fc531736abd987eb6490510c5ba50",
                0,
                _
            )])
            .with_collaterals(vec![input!(
                "d62db0b98b6df96645eec19d4728b385592fc531736abd987eb6490510c5ba50",
                0
            )])
            .with_change_strategy(ChangeStrategy::as_last_output(
                address!("addr1qxu84ftxpzh3zd8p9awp2ytwzk5exj0fxcj7paur4kd4ytun36yuhgl049rxhhuckm2lpq3rmz5dcraddyl45d6xgvqqsp504c"),
                &FIXTURE_PROTOCOL_PARAMETERS,
            ))
            .with_mint(BTreeMap::from([(
                policy,
                (
                    PlutusData::list(vec![]),
                    BTreeMap::from([(
                        hex::decode("e29ca82073756d6d6974203230323520646973636f756e74207368617264")
                            .unwrap(),
                        100_i64,
                    )]),
                ),
            )]))
            .with_plutus_scripts(vec![plutus_script!(
                PlutusVersion::V3,
                "59015d01010029800aba2aba1aba0aab9faab9eaab9dab9a48888889\
                 6600264653001300800198041804800cc0200092225980099b874800\
                 0c01cdd500144c8c966002003168acc004c0380062b3001337106eb4\
                 c028c03400520008a51899198008009bac300e300b375400844b3001\
                 0018a508acc004cdd7980798061baa300f0014c127d8799f5820d62d\
                 b0b98b6df96645eec19d4728b385592fc531736abd987eb6490510c5\
                 ba5000ff008a518998010011808000a014403480422c805900b192cc\
                 004cdc3a400460126ea8006297adef6c6089bab300d300a375400280\
                 40c8cc004004dd59806980718071807180718051baa0032259800800\
                 c5300103d87a8000899192cc004cdc8802800c56600266e3c0140062\
                 66e9520003300f300d0024bd7045300103d87a8000402d1330040043\
                 011003402c6eb8c02c004c03800500c1bae300b30083754005164018\
                 300800130033754011149a26cac80081",
            )])
            .ok()
        });

        let tx = result.unwrap();

        // See the transaction: https://cardanoscan.io/transaction/ff3c022d38cfc18e66c45d14823c7b948de77ed3ca10d07cabecc57c1f44b707
        let minimum_fee = 194365;
        let cardano_cli_fee = 205850;
        assert!(
            tx.fee() >= minimum_fee && tx.fee() <= cardano_cli_fee,
            "estimated fee={}, minimum required={minimum_fee}, cardano-cli's estimation={cardano_cli_fee}",
            tx.fee(),
        );

        assert_eq!(
            tx.total_collateral(),
            FIXTURE_PROTOCOL_PARAMETERS.minimum_collateral(tx.fee())
        );

        let change = tx.outputs().unwrap().pop().unwrap();
        assert_eq!(
            change.value().assets(),
            value!(
                0,
                (
                    "5fb286e39c3cda5a5abd17501c17b01987ebfa282df129c4df1bf27e",
                    "e29ca82073756d6d6974203230323520646973636f756e74207368617264",
                    100,
                )
            )
            .assets(),
        );
    }

    static ALWAYS_SUCCEED_ADDRESS: LazyLock<Address> = LazyLock::new(|| {
        Address::from(address_test!(script_credential!(
            "bd3ae991b5aafccafe5ca70758bd36a9b2f872f57f6d3a1ffa0eb777"
        )))
    });

    static ALWAYS_SUCCEED_SCRIPT: LazyLock<PlutusScript> =
        LazyLock::new(|| plutus_script!(PlutusVersion::V3, "5101010023259800a518a4d136564004ae69"));

    static MY_ADDRESS: LazyLock<Address> = LazyLock::new(|| {
        Address::from(address_test!(key_credential!(
            "86fa1ef9c1f85b3d8e0e9c0e6f4c2fb47ab6b1c0b7e8f7e9c2a1d3b4"
        )))
    });

    fn fixture_input(ix: u64) -> Input {
        input!(
            "c984c8bf52a141254c714c905b2d27b432d4b546f815fbc2fea7b9da6e490324",
            ix
        )
    }

    #[test]
    fn spend_from_script() {
        let resolved_inputs = BTreeMap::from([
            (
                fixture_input(0),
                Output::new(ALWAYS_SUCCEED_ADDRESS.clone(), value!(10_000_000))
                    .with_inline_datum(PlutusData::constr(0, [])),
            ),
            (
                fixture_input(1),
                Output::new(MY_ADDRESS.clone(), value!(20_000_000)),
            ),
        ]);

        let tx = Transaction::build(&FIXTURE_PROTOCOL_PARAMETERS, &resolved_inputs, |tx| {
            tx.with_inputs(vec![(fixture_input(0), Some(PlutusData::list(vec![])))])
                .with_collaterals(vec![fixture_input(1)])
                .with_change_strategy(ChangeStrategy::as_last_output(
                    MY_ADDRESS.clone(),
                    &FIXTURE_PROTOCOL_PARAMETERS,
                ))
                .with_plutus_scripts(vec![ALWAYS_SUCCEED_SCRIPT.clone()])
                .ok()
        })
        .unwrap();

        let redeemers = tx.redeemers();
        let (_, ex_units) = redeemers.values().next().unwrap();
        assert!(ex_units.mem() > 0 && ex_units.cpu() > 0);

        assert!(tx.fee() > 0);
        assert_eq!(
            tx.total_collateral(),
            FIXTURE_PROTOCOL_PARAMETERS.minimum_collateral(tx.fee())
        );

        let outputs = tx.outputs().unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].value().lovelace() + tx.fee(), 10_000_000);
    }

    #[test]
    fn script_input_without_collateral() {
        let resolved_inputs = BTreeMap::from([(
            fixture_input(0),
            Output::new(ALWAYS_SUCCEED_ADDRESS.clone(), value!(10_000_000)),
        )]);

        let result = Transaction::build(&FIXTURE_PROTOCOL_PARAMETERS, &resolved_inputs, |tx| {
            tx.with_inputs(vec![(fixture_input(0), Some(PlutusData::list(vec![])))])
                .with_change_strategy(ChangeStrategy::as_last_output(
                    MY_ADDRESS.clone(),
                    &FIXTURE_PROTOCOL_PARAMETERS,
                ))
                .with_plutus_scripts(vec![ALWAYS_SUCCEED_SCRIPT.clone()])
                .ok()
        });

        assert!(format!("{:?}", result.unwrap_err()).contains("no collaterals"));
    }

    #[test]
    fn script_input_without_witness() {
        let resolved_inputs = BTreeMap::from([
            (
                fixture_input(0),
                Output::new(ALWAYS_SUCCEED_ADDRESS.clone(), value!(10_000_000)),
            ),
            (
                fixture_input(1),
                Output::new(MY_ADDRESS.clone(), value!(20_000_000)),
            ),
        ]);

        let result = Transaction::build(&FIXTURE_PROTOCOL_PARAMETERS, &resolved_inputs, |tx| {
            tx.with_inputs(vec![(fixture_input(0), Some(PlutusData::list(vec![])))])
                .with_collaterals(vec![fixture_input(1)])
                .with_change_strategy(ChangeStrategy::as_last_output(
                    MY_ADDRESS.clone(),
                    &FIXTURE_PROTOCOL_PARAMETERS,
                ))
                .ok()
        });

        assert!(format!("{:?}", result.unwrap_err()).contains("missing witness script"));
    }

    #[test]
    fn spending_more_than_available() {
        let resolved_inputs = BTreeMap::from([(
            fixture_input(1),
            Output::new(MY_ADDRESS.clone(), value!(2_000_000)),
        )]);

        let result = Transaction::build(&FIXTURE_PROTOCOL_PARAMETERS, &resolved_inputs, |tx| {
            tx.with_inputs(vec![(fixture_input(1), None)])
                .with_outputs(vec![Output::new(
                    ALWAYS_SUCCEED_ADDRESS.clone(),
                    value!(5_000_000),
                )])
                .with_change_strategy(ChangeStrategy::as_last_output(
                    MY_ADDRESS.clone(),
                    &FIXTURE_PROTOCOL_PARAMETERS,
                ))
                .ok()
        });

        assert!(format!("{:?}", result.unwrap_err()).contains("insufficient balance"));
    }

    #[test]
    fn sign_and_decode() {
        let key: SigningKey = "9b5e1d8a4a5c0f2e6e0a1f6c5b0e9d5c3b7a8f1e2d4c6b8a0f1e3d5c7b9a1f2e"
            .parse()
            .unwrap();

        let resolved_inputs = BTreeMap::from([(
            fixture_input(1),
            Output::new(MY_ADDRESS.clone(), value!(20_000_000)),
        )]);

        let mut tx = Transaction::build(&FIXTURE_PROTOCOL_PARAMETERS, &resolved_inputs, |tx| {
            tx.with_inputs(vec![(fixture_input(1), None)])
                .with_required_signers(vec![key.to_verification_key().hash()])
                .with_change_strategy(ChangeStrategy::as_last_output(
                    MY_ADDRESS.clone(),
                    &FIXTURE_PROTOCOL_PARAMETERS,
                ))
                .ok()
        })
        .unwrap();

        let id = tx.id();
        tx.sign(&key).sign(&key);

        let decoded: Transaction = tx.to_hex().parse().unwrap();
        assert_eq!(decoded.id(), id);
        assert_eq!(
            decoded.required_signers().collect::<Vec<Hash<28>>>(),
            vec![key.to_verification_key().hash()],
        );

        let signatures = decoded.signatures().unwrap();
        assert_eq!(signatures.len(), 1);
        assert_eq!(signatures[0].0, key.to_verification_key());
    }
}
