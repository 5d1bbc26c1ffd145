use cardano_tx_builder::{Address, Hash, Utxo};
use trait_variant::make;

/// The subset of a CIP-30 wallet needed to fund, sign and submit transactions.
#[make(WalletDyn: Send)]
pub trait Wallet {
    async fn get_utxos(&self) -> anyhow::Result<Vec<Utxo>>;

    /// UTxOs set aside as collateral for script executions. May be empty.
    async fn get_collateral(&self) -> anyhow::Result<Vec<Utxo>>;

    async fn get_used_addresses(&self) -> anyhow::Result<Vec<Address>>;

    async fn get_unused_addresses(&self) -> anyhow::Result<Vec<Address>>;

    /// Add the wallet's witnesses to a base16-encoded transaction. When `partial` is false,
    /// the wallet is expected to provide every witness the transaction needs.
    async fn sign_tx(&self, transaction: &str, partial: bool) -> anyhow::Result<String>;

    async fn submit_tx(&self, transaction: &str) -> anyhow::Result<Hash<32>>;
}
