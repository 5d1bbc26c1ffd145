//! Global options, shared by every command, and the wiring of contracts to their capabilities.

use crate::metavar;
use anyhow::anyhow;
use cardano_connect::{Fetcher, KeyWallet};
use cardano_connect_blockfrost::Blockfrost;
use cardano_tx_builder::{Address, NetworkId, SigningKey, TransactionBuilder};
use log::warn;
use offchain_contracts::{Blueprint, Initiator, initiator::network_of};
use std::path::PathBuf;

pub const BLOCKFROST_API_KEY: &str = "BLOCKFROST_API_KEY";
pub const WALLET_SIGNING_KEY: &str = "WALLET_SIGNING_KEY";
pub const NETWORK_ID: &str = "NETWORK_ID";
pub const PLUTUS_VERSION: &str = "PLUTUS_VERSION";
pub const BLUEPRINT: &str = "BLUEPRINT";

/// Contracts reaching the chain through Blockfrost, funded by a single-key wallet.
pub(crate) type Connected = Initiator<TransactionBuilder, Blockfrost, KeyWallet<Blockfrost>>;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct Env {
    /// Blockfrost project id; its prefix must name the target network
    #[clap(
        long,
        global = true,
        value_name = metavar::PROJECT_ID,
        env = BLOCKFROST_API_KEY,
        default_value = "",
        hide_env_values = true,
        hide_default_value = true,
    )]
    blockfrost_project_id: String,

    /// Wallet's signing key (32 bytes, base16), funding and signing transactions
    #[clap(
        long,
        global = true,
        value_name = metavar::ED25519_SIGNING_KEY,
        env = WALLET_SIGNING_KEY,
        hide_env_values = true,
    )]
    wallet_signing_key: Option<SigningKey>,

    /// 1 for mainnet; anything else targets the preview testnet
    #[clap(
        long,
        global = true,
        value_name = metavar::U8,
        env = NETWORK_ID,
        default_value_t = Connected::DEFAULT_NETWORK_ID,
    )]
    network_id: u8,

    /// 1 for Plutus V2; anything else selects Plutus V3
    #[clap(
        long,
        global = true,
        value_name = metavar::U8,
        env = PLUTUS_VERSION,
        default_value_t = Connected::DEFAULT_VERSION,
    )]
    plutus_version: u8,

    /// Blueprint of the compiled validators
    #[clap(
        long,
        global = true,
        value_name = metavar::PATH,
        env = BLUEPRINT,
        default_value = "plutus.json",
    )]
    blueprint: PathBuf,
}

impl Env {
    pub(crate) fn blueprint(&self) -> anyhow::Result<Blueprint> {
        Ok(Blueprint::from_file(&self.blueprint)?)
    }

    pub(crate) fn signing_key(&self) -> anyhow::Result<&SigningKey> {
        self.wallet_signing_key.as_ref().ok_or(anyhow!(
            "missing --wallet-signing-key (or {WALLET_SIGNING_KEY} in the environment)"
        ))
    }

    pub(crate) fn network_id(&self) -> NetworkId {
        NetworkId::from(network_of(self.network_id))
    }

    /// The enterprise address of the wallet's key.
    pub(crate) fn wallet_address(&self) -> anyhow::Result<Address> {
        Ok(self
            .signing_key()?
            .to_verification_key()
            .to_address(self.network_id())
            .into())
    }

    /// Fetch the protocol parameters, then hand Blockfrost and the wallet (if any) to a fresh
    /// initiator.
    pub(crate) async fn connect(&self) -> anyhow::Result<Connected> {
        let blockfrost = Blockfrost::new(self.blockfrost_project_id.clone())?;

        let network = network_of(self.network_id);
        if NetworkId::from(blockfrost.network()) != NetworkId::from(network) {
            warn!(
                "project id targets {} but --network-id={} targets {network}",
                blockfrost.network(),
                self.network_id
            );
        }

        let builder = TransactionBuilder::new(blockfrost.fetch_protocol_parameters().await?);

        let wallet = self
            .wallet_signing_key
            .clone()
            .map(|key| KeyWallet::new(key, network, blockfrost.clone()));

        Ok(Initiator::new(
            builder,
            Some(blockfrost),
            wallet,
            self.network_id,
            self.plutus_version,
        ))
    }
}
