use crate::{
    cmd::{Submit, parse_metadata},
    env::Env,
    metavar,
};
use cardano_connect::KeyWallet;
use cardano_connect_blockfrost::Blockfrost;
use cardano_tx_builder::{Address, AssetId, Hash, Input, TransactionBuilder};
use offchain_contracts::{Metadata, TokenStore};
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

#[derive(Debug, clap::Args)]
pub(crate) struct Token {
    /// Name of the asset, without its CIP-67 label
    #[clap(long, value_name = metavar::ASSET_NAME)]
    name: String,

    /// Key allowed to mint; defaults to the wallet's key
    #[clap(long, value_name = metavar::KEY_HASH)]
    hot_key: Option<Hash<28>>,
}

type Store = TokenStore<TransactionBuilder, Blockfrost, KeyWallet<Blockfrost>>;

impl Token {
    async fn store(&self, env: &Env) -> anyhow::Result<Store> {
        Ok(TokenStore::new(env.connect().await?, &env.blueprint()?, self.hot_key).await?)
    }
}

#[derive(clap::Subcommand)]
pub(crate) enum Cmd {
    /// Mint the reference and user tokens of a new asset
    Mint {
        #[command(flatten)]
        token: Token,

        #[clap(long, value_name = metavar::METADATA, value_parser = parse_metadata)]
        metadata: Metadata,

        /// Where the user token goes; defaults to the wallet
        #[clap(long, value_name = metavar::ADDRESS)]
        receiver: Option<Address>,

        #[command(flatten)]
        submit: Submit,
    },

    /// Burn the reference token of an asset
    Burn {
        #[command(flatten)]
        token: Token,

        /// Id of the transaction holding the current store output
        #[clap(long, value_name = metavar::TX_HASH)]
        tx_hash: Hash<32>,

        #[command(flatten)]
        submit: Submit,
    },

    /// Replace the metadata of an asset
    Update {
        #[command(flatten)]
        token: Token,

        /// Id of the transaction holding the current store output
        #[clap(long, value_name = metavar::TX_HASH)]
        tx_hash: Hash<32>,

        #[clap(long, value_name = metavar::METADATA, value_parser = parse_metadata)]
        metadata: Metadata,

        #[command(flatten)]
        submit: Submit,
    },

    /// Show the tokens of an asset and its current metadata
    Show {
        #[command(flatten)]
        token: Token,
    },
}

#[serde_as]
#[derive(Serialize)]
struct AssetReport {
    #[serde_as(as = "DisplayFromStr")]
    policy_id: Hash<28>,
    #[serde_as(as = "DisplayFromStr")]
    store_address: Address,
    #[serde_as(as = "DisplayFromStr")]
    reference_token: AssetId,
    #[serde_as(as = "DisplayFromStr")]
    user_token: AssetId,
    #[serde_as(as = "DisplayFromStr")]
    store_utxo: Input,
    metadata: Metadata,
}

impl Cmd {
    pub(crate) async fn execute(self, env: &Env) -> anyhow::Result<()> {
        match self {
            Self::Mint {
                token,
                metadata,
                receiver,
                submit,
            } => {
                let mut store = token.store(env).await?;
                let transaction = store
                    .mint(token.name.as_bytes(), &metadata, receiver.as_ref())
                    .await?;
                submit.finish(store.initiator(), transaction).await
            }

            Self::Burn {
                token,
                tx_hash,
                submit,
            } => {
                let mut store = token.store(env).await?;
                let transaction = store.burn(tx_hash, token.name.as_bytes()).await?;
                submit.finish(store.initiator(), transaction).await
            }

            Self::Update {
                token,
                tx_hash,
                metadata,
                submit,
            } => {
                let mut store = token.store(env).await?;
                let transaction = store
                    .update_metadata(tx_hash, token.name.as_bytes(), &metadata)
                    .await?;
                submit.finish(store.initiator(), transaction).await
            }

            Self::Show { token } => {
                let store = token.store(env).await?;
                let name = token.name.as_bytes();

                let report = AssetReport {
                    policy_id: store.policy_id(),
                    store_address: store.store_address().clone(),
                    reference_token: store.reference_token(name),
                    user_token: store.user_token(name),
                    store_utxo: store.find_store_utxo(name).await?.input().clone(),
                    metadata: store.metadata(name).await?,
                };

                println!("{}", serde_json::to_string_pretty(&report)?);

                Ok(())
            }
        }
    }
}
