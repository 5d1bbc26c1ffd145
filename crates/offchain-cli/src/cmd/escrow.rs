use crate::{cmd::Submit, env::Env, metavar};
use cardano_tx_builder::{Address, Hash, PlutusData, Value, cbor::ToCbor};
use offchain_contracts::{Escrow, EscrowDatum};
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

#[derive(clap::Subcommand)]
pub(crate) enum Cmd {
    /// Lock some lovelace at the escrow for a counterparty
    Fund {
        /// Amount to lock
        #[clap(long, value_name = metavar::LOVELACE)]
        amount: u64,

        /// Who the job is for; must be a key address
        #[clap(long, value_name = metavar::ADDRESS)]
        counterparty: Address,

        #[command(flatten)]
        submit: Submit,
    },

    /// Release the funds locked by a previous `fund` transaction
    Withdraw {
        /// Id of the funding transaction
        #[clap(long, value_name = metavar::TX_HASH)]
        tx_hash: Hash<32>,

        /// Who receives the funds
        #[clap(long, value_name = metavar::ADDRESS)]
        payee: Address,

        #[command(flatten)]
        submit: Submit,
    },

    /// Show the datum a `fund` transaction would attach, without reaching the chain
    Datum {
        #[clap(long, value_name = metavar::LOVELACE)]
        amount: u64,

        #[clap(long, value_name = metavar::ADDRESS)]
        counterparty: Address,
    },
}

#[serde_as]
#[derive(Serialize)]
struct DatumReport {
    #[serde_as(as = "DisplayFromStr")]
    depositor: Hash<28>,
    #[serde_as(as = "DisplayFromStr")]
    counterparty: Hash<28>,
    amount: u64,
    #[serde_as(as = "serde_with::hex::Hex")]
    cbor: Vec<u8>,
}

impl Cmd {
    pub(crate) async fn execute(self, env: &Env) -> anyhow::Result<()> {
        match self {
            Self::Fund {
                amount,
                counterparty,
                submit,
            } => {
                let mut escrow = Escrow::new(env.connect().await?, &env.blueprint()?)?;
                let transaction = escrow
                    .create_job_and_fund(&Value::new(amount), &counterparty)
                    .await?;
                submit.finish(escrow.initiator(), transaction).await
            }

            Self::Withdraw {
                tx_hash,
                payee,
                submit,
            } => {
                let mut escrow = Escrow::new(env.connect().await?, &env.blueprint()?)?;
                let transaction = escrow.pay_job_and_withdraw(tx_hash, &payee).await?;
                submit.finish(escrow.initiator(), transaction).await
            }

            Self::Datum {
                amount,
                counterparty,
            } => {
                let datum =
                    EscrowDatum::new(&env.wallet_address()?, &counterparty, &Value::new(amount))?;

                let report = DatumReport {
                    depositor: datum.depositor,
                    counterparty: datum.counterparty,
                    amount: datum.amount,
                    cbor: PlutusData::from(&datum).to_cbor(),
                };

                println!("{}", serde_json::to_string_pretty(&report)?);

                Ok(())
            }
        }
    }
}
