use cardano_tx_builder::{Address, AssetId, Hash, ProtocolParameters, Utxo};
use trait_variant::make;

/// Read access to the chain, usually through a remote provider.
#[make(FetcherDyn: Send)]
pub trait Fetcher {
    /// Outputs of a transaction still known to the provider; only the one at `output_index`
    /// when given.
    async fn fetch_utxos(
        &self,
        tx_hash: Hash<32>,
        output_index: Option<u64>,
    ) -> anyhow::Result<Vec<Utxo>>;

    /// UTxOs sitting at an address; only those holding some of `asset` when given.
    async fn fetch_address_utxos(
        &self,
        address: &Address,
        asset: Option<&AssetId>,
    ) -> anyhow::Result<Vec<Utxo>>;

    async fn fetch_protocol_parameters(&self) -> anyhow::Result<ProtocolParameters>;
}
