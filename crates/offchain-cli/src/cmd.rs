use crate::env::{Connected, Env};
use anyhow::anyhow;
use cardano_connect::Wallet;
use cardano_tx_builder::{Hash, Network};
use log::info;

mod cip68;
mod escrow;
mod wallet;

/// Build, and optionally submit, transactions for an escrow protocol and CIP-68 tokens
#[derive(clap::Parser)]
#[clap(version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub(crate) struct Cmd {
    #[command(flatten)]
    env: Env,

    #[command(subcommand)]
    cmd: Sub,
}

#[derive(clap::Subcommand)]
enum Sub {
    /// Lock funds for a counterparty, then release them
    #[clap(subcommand)]
    Escrow(escrow::Cmd),

    /// Mint, burn and update CIP-68 tokens
    #[clap(subcommand)]
    Cip68(cip68::Cmd),

    /// Inspect the configured wallet
    #[clap(subcommand)]
    Wallet(wallet::Cmd),
}

impl Cmd {
    pub(crate) async fn execute(self) -> anyhow::Result<()> {
        match self.cmd {
            Sub::Escrow(cmd) => cmd.execute(&self.env).await,
            Sub::Cip68(cmd) => cmd.execute(&self.env).await,
            Sub::Wallet(cmd) => cmd.execute(&self.env).await,
        }
    }
}

#[derive(Debug, clap::Args)]
pub(crate) struct Submit {
    /// Sign with the wallet and submit, instead of printing the unsigned transaction
    #[clap(long)]
    submit: bool,
}

impl Submit {
    /// Print the unsigned transaction, or sign and submit it and print where to follow it.
    pub(crate) async fn finish(
        &self,
        initiator: &Connected,
        transaction: String,
    ) -> anyhow::Result<()> {
        if !self.submit {
            println!("{transaction}");
            return Ok(());
        }

        let wallet = initiator.wallet()?;
        let signed = wallet.sign_tx(&transaction, false).await?;
        let id = wallet.submit_tx(&signed).await?;

        info!("submitted transaction id={id}");

        println!("{}", explorer_url(initiator.network(), &id));

        Ok(())
    }
}

pub(crate) fn explorer_url(network: Network, id: &Hash<32>) -> String {
    let subdomain = match network {
        Network::Mainnet => "",
        Network::Preprod => "preprod.",
        Network::Preview => "preview.",
    };
    format!("https://{subdomain}cexplorer.io/tx/{id}")
}

pub(crate) fn parse_metadata(s: &str) -> anyhow::Result<offchain_contracts::Metadata> {
    serde_json::from_str(s).map_err(|e| anyhow!(e).context("malformed metadata"))
}

#[cfg(test)]
mod tests {
    use super::{Cmd, Sub, explorer_url, parse_metadata};
    use cardano_tx_builder::{Network, hash};
    use clap::{CommandFactory, Parser};
    use offchain_contracts::Metadatum;

    const ID: &str = "32b5e793d26af181cb837ab7470ba6e10e15ff638088bc6b099bb22b54b4796c";

    #[test]
    fn command_tree() {
        Cmd::command().debug_assert();
    }

    #[test]
    fn explorer_urls() {
        let id = hash!("32b5e793d26af181cb837ab7470ba6e10e15ff638088bc6b099bb22b54b4796c");
        assert_eq!(
            explorer_url(Network::Mainnet, &id),
            format!("https://cexplorer.io/tx/{ID}")
        );
        assert_eq!(
            explorer_url(Network::Preview, &id),
            format!("https://preview.cexplorer.io/tx/{ID}")
        );
        assert_eq!(
            explorer_url(Network::Preprod, &id),
            format!("https://preprod.cexplorer.io/tx/{ID}")
        );
    }

    #[test]
    fn metadata_argument() {
        let metadata = parse_metadata(r#"{"name":"Nami","edition":1}"#).unwrap();
        assert_eq!(metadata.get("name"), Some(&Metadatum::from("Nami")));
        assert_eq!(metadata.get("edition"), Some(&Metadatum::Int(1)));

        assert!(parse_metadata("[1, 2]").is_err());
        assert!(parse_metadata("{").is_err());
    }

    #[test]
    fn global_options_go_anywhere() {
        let cmd = Cmd::try_parse_from([
            "offchain",
            "escrow",
            "withdraw",
            "--tx-hash",
            ID,
            "--payee",
            "addr_test1vzr058hec8u9k0vwp6wqum6v97684d43czm73alfc2sa8dqkkw4uc",
            "--network-id",
            "1",
        ])
        .unwrap();
        assert!(matches!(cmd.cmd, Sub::Escrow(..)));
    }
}
