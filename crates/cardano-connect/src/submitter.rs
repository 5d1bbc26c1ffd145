use cardano_tx_builder::Hash;
use trait_variant::make;

#[make(SubmitterDyn: Send)]
pub trait Submitter {
    /// Submit a signed transaction, given as base16-encoded CBOR. Yields its id.
    async fn submit_tx(&self, transaction: &str) -> anyhow::Result<Hash<32>>;
}
