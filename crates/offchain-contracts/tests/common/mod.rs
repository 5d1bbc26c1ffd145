#![allow(dead_code)]

use cardano_connect::mock::{MockChain, MockWallet};
use cardano_tx_builder::{
    Address, Network, Output, TransactionBuilder, Utxo, Value, address_test, input,
    key_credential, mock::RecordingBuilder, script_credential, value,
};
use offchain_contracts::{Blueprint, Initiator};

pub type TestInitiator = Initiator<RecordingBuilder, MockChain, MockWallet>;

pub type BuildingInitiator = Initiator<TransactionBuilder, MockChain, MockWallet>;

/// What the recording builder yields on completion.
pub const UNSIGNED_TX: &str =
    "84a300d9010281825820c984c8bf52a141254c714c905b2d27b432d4b546f815fbc2fea7b9da6e49032400";

pub fn blueprint() -> Blueprint {
    Blueprint::from_file(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/plutus.json"
    ))
    .unwrap()
}

pub fn wallet_address() -> Address {
    address_test!(key_credential!(
        "86fa1ef9c1f85b3d8e0e9c0e6f4c2fb47ab6b1c0b7e8f7e9c2a1d3b4"
    ))
    .into()
}

pub fn counterparty_address() -> Address {
    address_test!(key_credential!(
        "bd3ae991b5aafccafe5ca70758bd36a9b2f872f57f6d3a1ffa0eb777"
    ))
    .into()
}

pub fn script_address() -> Address {
    address_test!(script_credential!(
        "bd3ae991b5aafccafe5ca70758bd36a9b2f872f57f6d3a1ffa0eb777"
    ))
    .into()
}

pub fn wallet_utxo(ix: u64, value: Value<u64>) -> Utxo {
    Utxo::new(
        input!(
            "c984c8bf52a141254c714c905b2d27b432d4b546f815fbc2fea7b9da6e490324",
            ix
        ),
        Output::new(wallet_address(), value),
    )
}

/// An output of some earlier transaction.
pub fn chain_utxo(ix: u64, output: Output) -> Utxo {
    Utxo::new(
        input!(
            "32b5e793d26af181cb837ab7470ba6e10e15ff638088bc6b099bb22b54b4796c",
            ix
        ),
        output,
    )
}

/// A wallet holding two pure-ada UTxOs; the first serves as collateral.
pub fn wallet() -> MockWallet {
    MockWallet::new(
        wallet_address(),
        vec![
            wallet_utxo(0, value!(10_000_000)),
            wallet_utxo(1, value!(50_000_000)),
        ],
    )
}

pub fn initiator(chain: Vec<Utxo>, wallet: MockWallet) -> TestInitiator {
    Initiator::new(
        RecordingBuilder::new(UNSIGNED_TX),
        Some(MockChain::new(chain)),
        Some(wallet),
        TestInitiator::DEFAULT_NETWORK_ID,
        TestInitiator::DEFAULT_VERSION,
    )
}

/// Like [`initiator`], but actually balancing and evaluating transactions.
pub fn building_initiator(chain: Vec<Utxo>, wallet: MockWallet) -> BuildingInitiator {
    Initiator::new(
        TransactionBuilder::from(Network::Preview),
        Some(MockChain::new(chain)),
        Some(wallet),
        BuildingInitiator::DEFAULT_NETWORK_ID,
        BuildingInitiator::DEFAULT_VERSION,
    )
}
