use crate::env::Env;
use cardano_tx_builder::{Address, Credential, Hash, VerificationKey};
use offchain_contracts::initiator::DEFAULT_STAKE_KEY_HASH;
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

#[derive(clap::Subcommand)]
pub(crate) enum Cmd {
    /// Display the address and keys of the configured wallet
    Show,
}

#[serde_as]
#[derive(Serialize)]
struct WalletReport {
    #[serde_as(as = "DisplayFromStr")]
    address: Address,
    #[serde_as(as = "DisplayFromStr")]
    verification_key: VerificationKey,
    #[serde_as(as = "DisplayFromStr")]
    key_hash: Hash<28>,
    /// Recorded for script addresses; they don't delegate.
    #[serde_as(as = "DisplayFromStr")]
    stake_credential: Credential,
}

impl Cmd {
    pub(crate) async fn execute(self, env: &Env) -> anyhow::Result<()> {
        match self {
            Self::Show => {
                let verification_key = env.signing_key()?.to_verification_key();

                let report = WalletReport {
                    address: env.wallet_address()?,
                    verification_key,
                    key_hash: verification_key.hash(),
                    stake_credential: Credential::from_key(Hash::from(DEFAULT_STAKE_KEY_HASH)),
                };

                println!("{}", serde_json::to_string_pretty(&report)?);

                Ok(())
            }
        }
    }
}
