//! In-memory capabilities, for testing code that drives a fetcher or a wallet.

use crate::{Fetcher, Submitter, Wallet};
use anyhow::anyhow;
use cardano_tx_builder::{Address, AssetId, Hash, ProtocolParameters, Transaction, Utxo};

/// A frozen chain state.
#[derive(Debug, Clone)]
pub struct MockChain {
    utxos: Vec<Utxo>,
    params: ProtocolParameters,
}

impl MockChain {
    pub fn new(utxos: Vec<Utxo>) -> Self {
        Self {
            utxos,
            params: ProtocolParameters::preview(),
        }
    }

    pub fn with_protocol_parameters(mut self, params: ProtocolParameters) -> Self {
        self.params = params;
        self
    }
}

impl Fetcher for MockChain {
    async fn fetch_utxos(
        &self,
        tx_hash: Hash<32>,
        output_index: Option<u64>,
    ) -> anyhow::Result<Vec<Utxo>> {
        Ok(self
            .utxos
            .iter()
            .filter(|utxo| {
                utxo.input().transaction_id() == tx_hash
                    && output_index.is_none_or(|ix| utxo.input().output_index() == ix)
            })
            .cloned()
            .collect())
    }

    async fn fetch_address_utxos(
        &self,
        address: &Address,
        asset: Option<&AssetId>,
    ) -> anyhow::Result<Vec<Utxo>> {
        Ok(self
            .utxos
            .iter()
            .filter(|utxo| {
                utxo.output().address() == address
                    && asset.is_none_or(|asset| utxo.output().value().quantity_of(asset) > 0)
            })
            .cloned()
            .collect())
    }

    async fn fetch_protocol_parameters(&self) -> anyhow::Result<ProtocolParameters> {
        Ok(self.params.clone())
    }
}

impl Submitter for MockChain {
    async fn submit_tx(&self, transaction: &str) -> anyhow::Result<Hash<32>> {
        Ok(transaction.parse::<Transaction>()?.id())
    }
}

/// A wallet answering with fixed UTxOs and addresses. Signing leaves transactions untouched.
#[derive(Debug, Clone, Default)]
pub struct MockWallet {
    pub utxos: Vec<Utxo>,
    pub collateral: Vec<Utxo>,
    pub used_addresses: Vec<Address>,
    pub unused_addresses: Vec<Address>,
}

impl MockWallet {
    /// A wallet at `address`, holding `utxos`, the first of which serves as collateral.
    pub fn new(address: Address, utxos: Vec<Utxo>) -> Self {
        Self {
            collateral: utxos.iter().take(1).cloned().collect(),
            utxos,
            used_addresses: vec![address],
            unused_addresses: Vec::new(),
        }
    }
}

impl Wallet for MockWallet {
    async fn get_utxos(&self) -> anyhow::Result<Vec<Utxo>> {
        Ok(self.utxos.clone())
    }

    async fn get_collateral(&self) -> anyhow::Result<Vec<Utxo>> {
        Ok(self.collateral.clone())
    }

    async fn get_used_addresses(&self) -> anyhow::Result<Vec<Address>> {
        Ok(self.used_addresses.clone())
    }

    async fn get_unused_addresses(&self) -> anyhow::Result<Vec<Address>> {
        Ok(self.unused_addresses.clone())
    }

    async fn sign_tx(&self, transaction: &str, _partial: bool) -> anyhow::Result<String> {
        Ok(transaction.to_string())
    }

    async fn submit_tx(&self, transaction: &str) -> anyhow::Result<Hash<32>> {
        Err(anyhow!("transaction={transaction}").context("mock wallet cannot submit"))
    }
}
