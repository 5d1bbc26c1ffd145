use crate::{Fetcher, Submitter, Wallet};
use cardano_tx_builder::{
    Address, Credential, Hash, Network, NetworkId, SigningKey, Transaction, Utxo, VerificationKey,
};
use log::debug;

/// A wallet holding a single ed25519 key, reaching the chain through a provider.
pub struct KeyWallet<C> {
    signing_key: SigningKey,
    address: Address,
    connector: C,
}

impl<C> KeyWallet<C> {
    /// Lovelace a pure-ada UTxO must at least hold to be used as collateral.
    pub const MIN_COLLATERAL: u64 = 5_000_000;

    /// A wallet at the enterprise address of the key, on the given network.
    pub fn new(signing_key: SigningKey, network: Network, connector: C) -> Self {
        let address = signing_key
            .to_verification_key()
            .to_address(NetworkId::from(network))
            .into();
        Self {
            signing_key,
            address,
            connector,
        }
    }

    /// Use the base address of the key instead, delegating to the given credential.
    pub fn with_stake_credential(mut self, delegation: Credential) -> Self {
        if let Some(shelley) = self.address.as_shelley() {
            self.address = shelley.with_delegation(delegation).into();
        }
        self
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn verification_key(&self) -> VerificationKey {
        self.signing_key.to_verification_key()
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }
}

impl<C: Fetcher + Submitter> Wallet for KeyWallet<C> {
    async fn get_utxos(&self) -> anyhow::Result<Vec<Utxo>> {
        self.connector
            .fetch_address_utxos(&self.address, None)
            .await
    }

    async fn get_collateral(&self) -> anyhow::Result<Vec<Utxo>> {
        let collateral = self.get_utxos().await?.into_iter().find(|utxo| {
            let value = utxo.output().value();
            value.is_lovelace_only() && value.lovelace() >= Self::MIN_COLLATERAL
        });
        Ok(collateral.into_iter().collect())
    }

    async fn get_used_addresses(&self) -> anyhow::Result<Vec<Address>> {
        Ok(vec![self.address.clone()])
    }

    async fn get_unused_addresses(&self) -> anyhow::Result<Vec<Address>> {
        Ok(vec![self.address.clone()])
    }

    async fn sign_tx(&self, transaction: &str, _partial: bool) -> anyhow::Result<String> {
        let mut transaction: Transaction = transaction.parse()?;
        debug!(
            "signing transaction id={} with key={}",
            transaction.id(),
            self.verification_key()
        );
        Ok(transaction.sign(&self.signing_key).to_hex())
    }

    async fn submit_tx(&self, transaction: &str) -> anyhow::Result<Hash<32>> {
        self.connector.submit_tx(transaction).await
    }
}
