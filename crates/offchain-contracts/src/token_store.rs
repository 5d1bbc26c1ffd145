//! CIP-68 tokens: each asset comes as a pair of a user token, freely transferable, and a
//! reference token locked at a store script, holding the asset's metadata in its datum.
//!
//! Minting is gated by a hot key: the minting policy is parameterised by the hash of that key
//! and by the hash of the store script.

use crate::{
    blueprint::Blueprint,
    cip68::{reference_token_name, user_token_name},
    error::{ContractError, Result},
    initiator::{Initiator, WalletInfo, key_hash},
    metadata::{self, Metadata},
};
use anyhow::anyhow;
use cardano_connect::{Fetcher, Wallet};
use cardano_tx_builder::{
    Address, AssetId, Hash, PlutusData, PlutusScript, TxBuilder, Utxo, Value,
};
use log::info;

pub const STORE_VALIDATOR: &str = "cip68/store.store.spend";
pub const MINT_VALIDATOR: &str = "cip68/mint.mint.mint";

/// Redeemer of the minting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintAction {
    Mint,
    Burn,
}

impl From<MintAction> for PlutusData<'static> {
    fn from(action: MintAction) -> Self {
        match action {
            MintAction::Mint => PlutusData::constr(0, []),
            MintAction::Burn => PlutusData::constr(1, []),
        }
    }
}

/// Redeemer of the store script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAction {
    Update,
    Burn,
}

impl From<StoreAction> for PlutusData<'static> {
    fn from(action: StoreAction) -> Self {
        match action {
            StoreAction::Update => PlutusData::constr(0, []),
            StoreAction::Burn => PlutusData::constr(1, []),
        }
    }
}

pub struct TokenStore<B, F, W> {
    initiator: Initiator<B, F, W>,
    hot_key: Hash<28>,
    store_script: PlutusScript,
    store_address: Address,
    mint_script: PlutusScript,
    mint_address: Address,
}

impl<B, F, W: Wallet> TokenStore<B, F, W> {
    /// Without a hot key, the key behind the wallet's address is used.
    pub async fn new(
        initiator: Initiator<B, F, W>,
        blueprint: &Blueprint,
        hot_key: Option<Hash<28>>,
    ) -> Result<Self> {
        let hot_key = match hot_key {
            Some(hot_key) => hot_key,
            None => {
                let address = initiator
                    .wallet_dapp_address()
                    .await?
                    .ok_or(ContractError::NoWalletAddress)?;
                key_hash(&address)?
            }
        };

        Self::with_hot_key(initiator, blueprint, hot_key)
    }
}

impl<B, F, W> TokenStore<B, F, W> {
    pub fn with_hot_key(
        initiator: Initiator<B, F, W>,
        blueprint: &Blueprint,
        hot_key: Hash<28>,
    ) -> Result<Self> {
        let language = initiator.language();

        let store_script = blueprint
            .validator(STORE_VALIDATOR)?
            .script(language, &[])?;

        let mint_script = blueprint.validator(MINT_VALIDATOR)?.script(
            language,
            &[
                PlutusData::bytes(hot_key),
                PlutusData::bytes(store_script.hash()),
            ],
        )?;

        Ok(Self {
            hot_key,
            store_address: initiator.script_address(&store_script),
            mint_address: initiator.script_address(&mint_script),
            store_script,
            mint_script,
            initiator,
        })
    }

    pub fn initiator(&self) -> &Initiator<B, F, W> {
        &self.initiator
    }

    pub fn hot_key(&self) -> Hash<28> {
        self.hot_key
    }

    pub fn policy_id(&self) -> Hash<28> {
        self.mint_script.hash()
    }

    pub fn mint_script(&self) -> &PlutusScript {
        &self.mint_script
    }

    pub fn store_script(&self) -> &PlutusScript {
        &self.store_script
    }

    pub fn store_address(&self) -> &Address {
        &self.store_address
    }

    pub fn mint_address(&self) -> &Address {
        &self.mint_address
    }

    pub fn reference_token(&self, asset_name: &[u8]) -> AssetId {
        AssetId::new(self.policy_id(), reference_token_name(asset_name))
    }

    pub fn user_token(&self, asset_name: &[u8]) -> AssetId {
        AssetId::new(self.policy_id(), user_token_name(asset_name))
    }
}

impl<B: TxBuilder, F, W: Wallet> TokenStore<B, F, W> {
    /// Mint the user and reference tokens of a new asset. The reference token goes to the store
    /// with the metadata; the user token goes to `receiver`, or else back to the wallet.
    pub async fn mint(
        &mut self,
        asset_name: &[u8],
        metadata: &Metadata,
        receiver: Option<&Address>,
    ) -> Result<String> {
        let info = self.initiator.wallet_info().await?;
        let seed = info.utxos.first().cloned().ok_or(ContractError::NoUtxos)?;

        let language = self.initiator.language();
        let policy = self.policy_id();
        let reference = self.reference_token(asset_name);
        let user = self.user_token(asset_name);

        let builder = self.initiator.builder_mut();

        builder
            .tx_in(&seed)
            .mint_plutus_script(language)
            .mint(1, policy, user.name())
            .minting_script(self.mint_script.clone())
            .mint_redeemer_value(MintAction::Mint.into())
            .mint_plutus_script(language)
            .mint(1, policy, reference.name())
            .minting_script(self.mint_script.clone())
            .mint_redeemer_value(MintAction::Mint.into())
            .tx_out(
                &self.store_address,
                &Value::<u64>::default().with_asset(&reference, 1),
            )
            .tx_out_inline_datum_value(metadata::to_datum(metadata));

        if let Some(receiver) = receiver {
            builder.tx_out(receiver, &Value::<u64>::default().with_asset(&user, 1));
        }

        let transaction = self.complete_as_hot_key(info).await?;

        info!("minting {user} and {reference}");

        Ok(transaction)
    }

    /// Shared tail of every recipe: the hot key co-signs, the wallet funds and gets the change.
    async fn complete_as_hot_key(&mut self, info: WalletInfo) -> Result<String> {
        let WalletInfo {
            utxos,
            collateral,
            address,
        } = info;

        Ok(self
            .initiator
            .builder_mut()
            .required_signer_hash(self.hot_key)
            .tx_in_collateral(&collateral)
            .change_address(&address)
            .select_utxos_from(&utxos)
            .complete()
            .await?)
    }
}

impl<B, F: Fetcher, W> TokenStore<B, F, W> {
    /// The store output currently holding the reference token of an asset.
    pub async fn find_store_utxo(&self, asset_name: &[u8]) -> Result<Utxo> {
        self.initiator
            .address_utxo_with_asset(&self.store_address, &self.reference_token(asset_name))
            .await
    }

    /// The metadata currently attached to an asset.
    pub async fn metadata(&self, asset_name: &[u8]) -> Result<Metadata> {
        let utxo = self.find_store_utxo(asset_name).await?;

        let datum = utxo
            .output()
            .inline_datum()
            .ok_or_else(|| anyhow!("store output {} has no inline datum", utxo.input()))?;

        Ok(metadata::from_datum(datum)?)
    }

    /// The output of `tx_hash` sitting at the store and holding the reference token.
    async fn store_utxo(&self, tx_hash: Hash<32>, reference: &AssetId) -> Result<Utxo> {
        self.initiator
            .utxos_by_tx_hash(tx_hash)
            .await?
            .into_iter()
            .find(|utxo| {
                utxo.output().address() == &self.store_address
                    && utxo.output().value().quantity_of(reference) > 0
            })
            .ok_or(ContractError::UtxoNotFound { tx_hash })
    }
}

impl<B: TxBuilder, F: Fetcher, W: Wallet> TokenStore<B, F, W> {
    /// Burn the reference token of an asset, releasing its store output. `tx_hash` is the
    /// transaction that produced that output.
    pub async fn burn(&mut self, tx_hash: Hash<32>, asset_name: &[u8]) -> Result<String> {
        let info = self.initiator.wallet_info().await?;

        let reference = self.reference_token(asset_name);
        let store_utxo = self.store_utxo(tx_hash, &reference).await?;

        let language = self.initiator.language();
        let policy = self.policy_id();

        self.initiator
            .builder_mut()
            .mint_plutus_script(language)
            .mint(-1, policy, reference.name())
            .minting_script(self.mint_script.clone())
            .mint_redeemer_value(MintAction::Burn.into())
            .spending_plutus_script(language)
            .tx_in(&store_utxo)
            .tx_in_inline_datum_present()
            .tx_in_redeemer_value(StoreAction::Burn.into())
            .tx_in_script(self.store_script.clone());

        let transaction = self.complete_as_hot_key(info).await?;

        info!("burning {reference} from store output {}", store_utxo.input());

        Ok(transaction)
    }

    /// Replace the metadata of an asset. The store output is spent and re-created with the new
    /// datum, holding exactly one reference token.
    pub async fn update_metadata(
        &mut self,
        tx_hash: Hash<32>,
        asset_name: &[u8],
        metadata: &Metadata,
    ) -> Result<String> {
        let info = self.initiator.wallet_info().await?;

        let reference = self.reference_token(asset_name);
        let store_utxo = self.store_utxo(tx_hash, &reference).await?;

        let value = store_utxo
            .output()
            .value()
            .clone()
            .with_asset(&reference, 1);

        let language = self.initiator.language();

        self.initiator
            .builder_mut()
            .spending_plutus_script(language)
            .tx_in(&store_utxo)
            .tx_in_inline_datum_present()
            .tx_in_redeemer_value(StoreAction::Update.into())
            .tx_in_script(self.store_script.clone())
            .tx_out(&self.store_address, &value)
            .tx_out_inline_datum_value(metadata::to_datum(metadata));

        let transaction = self.complete_as_hot_key(info).await?;

        info!(
            "updating metadata of {reference} held by store output {}",
            store_utxo.input()
        );

        Ok(transaction)
    }
}
