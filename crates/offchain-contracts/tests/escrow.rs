mod common;

use cardano_connect::mock::{MockChain, MockWallet};
use cardano_tx_builder::{
    Hash, NetworkId, Output, PlutusData, PlutusVersion, Utxo, hash,
    mock::{BuilderCall, RecordingBuilder},
    value,
};
use common::*;
use offchain_contracts::{ContractError, Escrow, EscrowDatum, Initiator};

const FUNDING_TX: &str = "32b5e793d26af181cb837ab7470ba6e10e15ff638088bc6b099bb22b54b4796c";

fn escrow(chain: Vec<Utxo>, wallet: MockWallet) -> Escrow<RecordingBuilder, MockChain, MockWallet> {
    Escrow::new(initiator(chain, wallet), &blueprint()).unwrap()
}

/// The outputs of a funding transaction: some change, then the escrow.
fn funded(escrow_output: Output) -> Vec<Utxo> {
    vec![
        chain_utxo(0, Output::new(wallet_address(), value!(37_000_000))),
        chain_utxo(1, escrow_output),
    ]
}

#[test]
fn escrow_script() {
    let escrow = escrow(vec![], wallet());
    assert_eq!(
        escrow.script_hash(),
        hash!("61a2f28177fecb2172720461ab5a517530e4dceac8e5b54c01cfb23f")
    );
    assert_eq!(
        escrow.address().payment_script_hash(),
        Some(escrow.script_hash())
    );
    assert_eq!(
        escrow.address().as_shelley().unwrap().network_id(),
        NetworkId::TESTNET
    );
}

#[test]
fn escrow_script_under_plutus_v2() {
    let initiator = Initiator::new(
        RecordingBuilder::new(UNSIGNED_TX),
        Some(MockChain::new(vec![])),
        Some(wallet()),
        0,
        1,
    );
    let escrow = Escrow::new(initiator, &blueprint()).unwrap();
    assert_eq!(escrow.script().version(), PlutusVersion::V2);
    assert_eq!(
        escrow.script_hash(),
        hash!("30f52a4bd2516b0a5a1267393565e7065c99db49277aed2ffa37ba60")
    );
}

#[tokio::test]
async fn create_job_and_fund() {
    let mut escrow = escrow(vec![], wallet());
    let amount = value!(10_000_000);

    let transaction = escrow
        .create_job_and_fund(&amount, &counterparty_address())
        .await
        .unwrap();
    assert_eq!(transaction, UNSIGNED_TX);

    let depositor: Hash<28> = hash!("86fa1ef9c1f85b3d8e0e9c0e6f4c2fb47ab6b1c0b7e8f7e9c2a1d3b4");
    let counterparty: Hash<28> = hash!("bd3ae991b5aafccafe5ca70758bd36a9b2f872f57f6d3a1ffa0eb777");

    let datum = PlutusData::constr(
        0,
        [
            PlutusData::bytes(depositor),
            PlutusData::bytes(counterparty),
            PlutusData::integer(10_000_000),
            PlutusData::constr(0, []),
        ],
    );

    assert_eq!(
        escrow.initiator().builder().calls_after_setup(),
        &[
            BuilderCall::TxOut(escrow.address().clone(), amount),
            BuilderCall::TxOutInlineDatumValue(datum),
            BuilderCall::ChangeAddress(wallet_address()),
            BuilderCall::SelectUtxosFrom(wallet().utxos),
            BuilderCall::Complete,
        ]
    );
}

#[tokio::test]
async fn fund_without_utxos() {
    let mut escrow = escrow(vec![], MockWallet::default());

    let err = escrow
        .create_job_and_fund(&value!(10_000_000), &counterparty_address())
        .await
        .unwrap_err();

    assert!(matches!(err, ContractError::NoUtxos));
    assert_eq!(err.to_string(), "No utxos found");
    assert!(escrow.initiator().builder().calls_after_setup().is_empty());
}

#[tokio::test]
async fn fund_without_collateral() {
    let mut escrow = escrow(
        vec![],
        MockWallet {
            collateral: vec![],
            ..wallet()
        },
    );

    let err = escrow
        .create_job_and_fund(&value!(10_000_000), &counterparty_address())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "No collateral found");
    assert!(escrow.initiator().builder().calls_after_setup().is_empty());
}

#[tokio::test]
async fn fund_a_script_counterparty() {
    let mut escrow = escrow(vec![], wallet());

    let err = escrow
        .create_job_and_fund(&value!(10_000_000), &script_address())
        .await
        .unwrap_err();

    assert!(matches!(err, ContractError::NotAKeyAddress(..)));
    assert!(escrow.initiator().builder().calls_after_setup().is_empty());
}

#[tokio::test]
async fn pay_job_and_withdraw() {
    let empty = escrow(vec![], wallet());
    let datum = EscrowDatum::new(&wallet_address(), &counterparty_address(), &value!(10_000_000))
        .unwrap();
    let escrow_output = Output::new(empty.address().clone(), value!(10_000_000))
        .with_inline_datum(PlutusData::from(&datum));

    let chain = funded(escrow_output);
    let escrow_utxo = chain[1].clone();

    let mut escrow = escrow(chain, wallet());
    let transaction = escrow
        .pay_job_and_withdraw(FUNDING_TX.parse().unwrap(), &counterparty_address())
        .await
        .unwrap();
    assert_eq!(transaction, UNSIGNED_TX);

    assert_eq!(
        escrow.initiator().builder().calls_after_setup(),
        &[
            BuilderCall::SpendingPlutusScript(PlutusVersion::V3),
            BuilderCall::TxIn(escrow_utxo),
            BuilderCall::TxInInlineDatumPresent,
            BuilderCall::TxInRedeemerValue(PlutusData::constr(0, [])),
            BuilderCall::TxInScript(escrow.script().clone()),
            BuilderCall::TxOut(counterparty_address(), value!(10_000_000)),
            BuilderCall::TxInCollateral(wallet_utxo(0, value!(10_000_000))),
            BuilderCall::ChangeAddress(wallet_address()),
            BuilderCall::RequiredSignerHash(hash!(
                "86fa1ef9c1f85b3d8e0e9c0e6f4c2fb47ab6b1c0b7e8f7e9c2a1d3b4"
            )),
            BuilderCall::SelectUtxosFrom(wallet().utxos),
            BuilderCall::Complete,
        ]
    );
}

#[tokio::test]
async fn withdraw_from_unknown_transaction() {
    let mut escrow = escrow(vec![], wallet());

    let err = escrow
        .pay_job_and_withdraw(FUNDING_TX.parse().unwrap(), &counterparty_address())
        .await
        .unwrap_err();

    assert!(matches!(err, ContractError::UtxoNotFound { .. }));
    assert_eq!(err.to_string(), "UTxO not found");
    assert!(escrow.initiator().builder().calls_after_setup().is_empty());
}

#[tokio::test]
async fn withdraw_from_transaction_without_escrow_output() {
    let chain = funded(Output::new(counterparty_address(), value!(10_000_000)));
    let mut escrow = escrow(chain, wallet());

    let err = escrow
        .pay_job_and_withdraw(FUNDING_TX.parse().unwrap(), &counterparty_address())
        .await
        .unwrap_err();

    assert!(matches!(err, ContractError::UtxoNotFound { .. }));
    assert!(escrow.initiator().builder().calls_after_setup().is_empty());
}
