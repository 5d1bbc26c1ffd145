//! An escrow: a depositor locks funds for a counterparty, then releases them once the job is done.

use crate::{
    blueprint::Blueprint,
    error::{ContractError, Result},
    initiator::{Initiator, WalletInfo, key_hash},
};
use anyhow::anyhow;
use cardano_connect::{Fetcher, Wallet};
use cardano_tx_builder::{Address, Hash, PlutusData, PlutusScript, TxBuilder, Value};
use log::info;

pub const ESCROW_VALIDATOR: &str = "escrow.escrow.spend";

/// The state of a funded job, held inline by the escrow output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscrowDatum {
    pub depositor: Hash<28>,
    pub counterparty: Hash<28>,
    /// Lovelace locked for the job.
    pub amount: u64,
}

impl EscrowDatum {
    /// Both parties must be key addresses.
    pub fn new(depositor: &Address, counterparty: &Address, amount: &Value<u64>) -> Result<Self> {
        Ok(Self {
            depositor: key_hash(depositor)?,
            counterparty: key_hash(counterparty)?,
            amount: amount.lovelace(),
        })
    }
}

impl From<&EscrowDatum> for PlutusData<'static> {
    fn from(datum: &EscrowDatum) -> Self {
        PlutusData::constr(
            0,
            [
                PlutusData::bytes(datum.depositor),
                PlutusData::bytes(datum.counterparty),
                PlutusData::integer(datum.amount),
                PlutusData::constr(0, []),
            ],
        )
    }
}

impl TryFrom<&PlutusData<'_>> for EscrowDatum {
    type Error = anyhow::Error;

    fn try_from(data: &PlutusData<'_>) -> anyhow::Result<Self> {
        let malformed = || anyhow!("malformed escrow datum: {data}");

        let [depositor, counterparty, amount, _] = <[PlutusData<'_>; 4]>::try_from(
            data.as_fields(0).ok_or_else(malformed)?,
        )
        .map_err(|_| malformed())?;

        Ok(Self {
            depositor: <&[u8]>::try_from(&depositor)?.try_into()?,
            counterparty: <&[u8]>::try_from(&counterparty)?.try_into()?,
            amount: amount.as_integer().ok_or_else(malformed)?,
        })
    }
}

pub struct Escrow<B, F, W> {
    initiator: Initiator<B, F, W>,
    script: PlutusScript,
    address: Address,
}

impl<B, F, W> Escrow<B, F, W> {
    pub fn new(initiator: Initiator<B, F, W>, blueprint: &Blueprint) -> Result<Self> {
        let script = blueprint
            .validator(ESCROW_VALIDATOR)?
            .script(initiator.language(), &[])?;

        let address = initiator.script_address(&script);

        Ok(Self {
            initiator,
            script,
            address,
        })
    }

    pub fn initiator(&self) -> &Initiator<B, F, W> {
        &self.initiator
    }

    pub fn script(&self) -> &PlutusScript {
        &self.script
    }

    pub fn script_hash(&self) -> Hash<28> {
        self.script.hash()
    }

    pub fn address(&self) -> &Address {
        &self.address
    }
}

impl<B: TxBuilder, F, W: Wallet> Escrow<B, F, W> {
    /// Lock `amount` at the escrow, for the benefit of `counterparty`. The wallet funds the
    /// transaction and gets the change back.
    pub async fn create_job_and_fund(
        &mut self,
        amount: &Value<u64>,
        counterparty: &Address,
    ) -> Result<String> {
        let WalletInfo { utxos, address, .. } = self.initiator.wallet_info().await?;

        let datum = EscrowDatum::new(&address, counterparty, amount)?;

        let transaction = self
            .initiator
            .builder_mut()
            .tx_out(&self.address, amount)
            .tx_out_inline_datum_value(PlutusData::from(&datum))
            .change_address(&address)
            .select_utxos_from(&utxos)
            .complete()
            .await?;

        info!(
            "funding escrow with {} lovelace for counterparty={}",
            datum.amount, datum.counterparty
        );

        Ok(transaction)
    }
}

impl<B: TxBuilder, F: Fetcher, W: Wallet> Escrow<B, F, W> {
    /// Release the funds locked by `tx_hash` to `payee`. The wallet's key must be the
    /// depositor's.
    pub async fn pay_job_and_withdraw(
        &mut self,
        tx_hash: Hash<32>,
        payee: &Address,
    ) -> Result<String> {
        let WalletInfo {
            utxos,
            collateral,
            address,
        } = self.initiator.wallet_info().await?;

        let escrow_utxo = self
            .initiator
            .utxos_by_tx_hash(tx_hash)
            .await?
            .into_iter()
            .find(|utxo| utxo.output().address() == &self.address)
            .ok_or(ContractError::UtxoNotFound { tx_hash })?;

        let depositor = key_hash(&address)?;

        let language = self.initiator.language();

        let transaction = self
            .initiator
            .builder_mut()
            .spending_plutus_script(language)
            .tx_in(&escrow_utxo)
            .tx_in_inline_datum_present()
            .tx_in_redeemer_value(PlutusData::constr(0, []))
            .tx_in_script(self.script.clone())
            .tx_out(payee, escrow_utxo.output().value())
            .tx_in_collateral(&collateral)
            .change_address(&address)
            .required_signer_hash(depositor)
            .select_utxos_from(&utxos)
            .complete()
            .await?;

        info!("releasing escrow {} to payee={payee}", escrow_utxo.input());

        Ok(transaction)
    }
}
