use anyhow::anyhow;
use cardano_connect::Fetcher;
use cardano_connect_blockfrost::Blockfrost;
use cardano_tx_builder::{Address, AssetId};
use clap::Parser;

/// Print the UTxOs sitting at an address.
#[derive(Debug, Parser)]
#[clap(version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
    /// A bech32 (or base58, for Byron) address.
    address: Address,

    /// Only show UTxOs holding this asset, given as policy id and asset name in base16.
    #[clap(long, value_name = "UNIT")]
    asset: Option<AssetId>,

    /// The network is inferred from the project id.
    #[clap(long, value_name = "PROJECT_ID", env = "BLOCKFROST_API_KEY")]
    project_id: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match dotenvy::dotenv() {
        Err(e) if !e.not_found() => return Err(anyhow!(e).context("fail to parse .env")),
        _ => {}
    }

    let args = Args::parse();
    let blockfrost = Blockfrost::new(args.project_id)?;

    for utxo in blockfrost
        .fetch_address_utxos(&args.address, args.asset.as_ref())
        .await?
    {
        println!("{utxo}");
    }

    Ok(())
}
