use anyhow::{Context, anyhow};
use blockfrost::{BlockfrostAPI, BlockfrostError, Pagination};
use cardano_connect::{Fetcher, Submitter};
use cardano_tx_builder::{Address, AssetId, Hash, Network, ProtocolParameters, Utxo};
use log::debug;
use reqwest::{StatusCode, header};

mod models;

const MAINNET_PREFIX: &str = "mainnet";
const PREPROD_PREFIX: &str = "preprod";
const PREVIEW_PREFIX: &str = "preview";

/// A chain provider backed by the Blockfrost HTTP API.
#[derive(Clone)]
pub struct Blockfrost {
    api: BlockfrostAPI,
    base_url: String,
    client: reqwest::Client,
    network: Network,
    project_id: String,
}

impl Blockfrost {
    /// The network is inferred from the prefix of the project id.
    pub fn new(project_id: String) -> anyhow::Result<Self> {
        let network = if project_id.starts_with(MAINNET_PREFIX) {
            Network::Mainnet
        } else if project_id.starts_with(PREPROD_PREFIX) {
            Network::Preprod
        } else if project_id.starts_with(PREVIEW_PREFIX) {
            Network::Preview
        } else {
            return Err(anyhow!(
                "unexpected project id prefix; should start with one of {MAINNET_PREFIX}, {PREPROD_PREFIX} or {PREVIEW_PREFIX}"
            ));
        };

        Ok(Self {
            api: BlockfrostAPI::new(project_id.as_str(), Default::default()),
            base_url: format!("https://cardano-{network}.blockfrost.io/api/v0"),
            client: reqwest::Client::new(),
            network,
            project_id,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }
}

/// Unknown transactions and addresses without history are reported as 404.
fn not_found<T>(result: Result<T, BlockfrostError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(BlockfrostError::Response { reason, .. }) if reason.status_code == 404 => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Fetcher for Blockfrost {
    async fn fetch_utxos(
        &self,
        tx_hash: Hash<32>,
        output_index: Option<u64>,
    ) -> anyhow::Result<Vec<Utxo>> {
        debug!("fetching outputs of {tx_hash}");

        let Some(response) = not_found(self.api.transactions_utxos(&tx_hash.to_string()).await)?
        else {
            return Ok(Vec::new());
        };

        Ok(models::tx_utxos(response)?
            .into_iter()
            .filter(|utxo| output_index.is_none_or(|ix| utxo.input().output_index() == ix))
            .collect())
    }

    async fn fetch_address_utxos(
        &self,
        address: &Address,
        asset: Option<&AssetId>,
    ) -> anyhow::Result<Vec<Utxo>> {
        let address = address.to_string();
        debug!("fetching utxos at {address}");

        let response = match asset {
            None => {
                self.api
                    .addresses_utxos(&address, Pagination::all())
                    .await
            }
            Some(asset) => {
                self.api
                    .addresses_utxos_asset(&address, &asset.to_string(), Pagination::all())
                    .await
            }
        };

        not_found(response)?
            .unwrap_or_default()
            .into_iter()
            .map(models::address_utxo)
            .collect()
    }

    async fn fetch_protocol_parameters(&self) -> anyhow::Result<ProtocolParameters> {
        let params = self
            .api
            .epochs_latest_parameters()
            .await
            .context("failed to fetch protocol parameters of the latest epoch")?;

        models::protocol_parameters(self.network, &params)
    }
}

impl Submitter for Blockfrost {
    async fn submit_tx(&self, transaction: &str) -> anyhow::Result<Hash<32>> {
        let bytes = hex::decode(transaction)
            .map_err(|e| anyhow!(e).context("transaction isn't base16-encoded"))?;

        debug!("submitting {} bytes", bytes.len());

        let res = self
            .client
            .post(format!("{}/tx/submit", self.base_url))
            .header("project_id", &self.project_id)
            .header(header::CONTENT_TYPE, "application/cbor")
            .body(bytes)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status != StatusCode::OK {
            return Err(anyhow!("transaction submission failed ({status}): {body}"));
        }

        serde_json::from_str::<String>(&body)
            .with_context(|| format!("unexpected submission response: {body}"))?
            .parse()
    }
}

#[cfg(test)]
mod tests {
    use super::Blockfrost;
    use cardano_tx_builder::Network;

    #[test]
    fn network_from_project_id() {
        let blockfrost = Blockfrost::new("preprodAbCdEf0123".to_string()).unwrap();
        assert_eq!(blockfrost.network(), Network::Preprod);
        assert_eq!(
            blockfrost.base_url,
            "https://cardano-preprod.blockfrost.io/api/v0"
        );

        let blockfrost = Blockfrost::new("mainnet0123".to_string()).unwrap();
        assert_eq!(blockfrost.network(), Network::Mainnet);
    }

    #[test]
    fn unknown_project_id_prefix() {
        assert!(Blockfrost::new("sanchonet0123".to_string()).is_err());
        assert!(Blockfrost::new(String::new()).is_err());
    }
}
