use crate::error::{ContractError, Result};
use cardano_connect::{Fetcher, Wallet};
use cardano_tx_builder::{
    Address, AssetId, Credential, Hash, Network, NetworkId, PlutusScript, PlutusVersion,
    TxBuilder, Utxo,
};
use log::debug;

/// Stake key hash recorded when none is supplied.
pub const DEFAULT_STAKE_KEY_HASH: [u8; 28] = [
    0xc0, 0x8f, 0x02, 0x94, 0xea, 0xd5, 0xab, 0x7a, 0xe0, 0xce, 0x54, 0x71, 0xdd, 0x48, 0x70, 0x07,
    0x91, 0x92, 0x97, 0xba, 0x95, 0x23, 0x0a, 0xf2, 0x2f, 0x25, 0xe5, 0x75,
];

/// Everything a contract wrapper needs before it starts building: a builder targeting the right
/// network, and (optionally) access to the chain and to the user's wallet.
pub struct Initiator<B, F, W> {
    builder: B,
    fetcher: Option<F>,
    wallet: Option<W>,
    network: Network,
    language: PlutusVersion,
    stake_credential: Credential,
}

/// Wallet state gathered upfront by every transaction recipe.
#[derive(Debug, Clone)]
pub struct WalletInfo {
    pub utxos: Vec<Utxo>,
    pub collateral: Utxo,
    pub address: Address,
}

/// Network id `1` targets mainnet, anything else the preview testnet.
pub fn network_of(network_id: u8) -> Network {
    match network_id {
        1 => Network::Mainnet,
        _ => Network::Preview,
    }
}

/// Version `1` selects Plutus V2, anything else Plutus V3.
pub fn language_of(version: u8) -> PlutusVersion {
    match version {
        1 => PlutusVersion::V2,
        _ => PlutusVersion::V3,
    }
}

impl<B: TxBuilder, F, W> Initiator<B, F, W> {
    pub const DEFAULT_NETWORK_ID: u8 = 0;
    pub const DEFAULT_VERSION: u8 = 2;

    /// See [`network_of`] and [`language_of`].
    pub fn new(
        mut builder: B,
        fetcher: Option<F>,
        wallet: Option<W>,
        network_id: u8,
        version: u8,
    ) -> Self {
        let network = network_of(network_id);
        let language = language_of(version);

        debug!("initiating contracts on network={network} with language={language}");

        builder.set_network(network);

        Self {
            builder,
            fetcher,
            wallet,
            network,
            language,
            stake_credential: Credential::from_key(Hash::from(DEFAULT_STAKE_KEY_HASH)),
        }
    }
}

impl<B, F, W> Initiator<B, F, W> {
    pub fn with_stake_credential(mut self, stake_credential: Credential) -> Self {
        self.stake_credential = stake_credential;
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn network_id(&self) -> NetworkId {
        NetworkId::from(self.network)
    }

    pub fn language(&self) -> PlutusVersion {
        self.language
    }

    pub fn stake_credential(&self) -> &Credential {
        &self.stake_credential
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut B {
        &mut self.builder
    }

    /// The enterprise address locked by a script, on the target network.
    pub fn script_address(&self, script: &PlutusScript) -> Address {
        script.to_address(self.network_id()).into()
    }

    pub fn wallet(&self) -> Result<&W> {
        self.wallet
            .as_ref()
            .ok_or(ContractError::MissingCapability("wallet"))
    }

    pub fn fetcher(&self) -> Result<&F> {
        self.fetcher
            .as_ref()
            .ok_or(ContractError::MissingCapability("fetcher"))
    }
}

// ------------------------------------------------------------------- Wallet

impl<B, F, W: Wallet> Initiator<B, F, W> {
    pub async fn wallet_collateral(&self) -> Result<Option<Utxo>> {
        Ok(self.wallet()?.get_collateral().await?.into_iter().next())
    }

    /// The first used address of the wallet, or else its first unused address.
    pub async fn wallet_dapp_address(&self) -> Result<Option<Address>> {
        let wallet = self.wallet()?;

        if let Some(address) = wallet.get_used_addresses().await?.into_iter().next() {
            return Ok(Some(address));
        }

        Ok(wallet.get_unused_addresses().await?.into_iter().next())
    }

    /// Query the wallet, then check in order that it has UTxOs, a collateral and an address.
    pub async fn wallet_info(&self) -> Result<WalletInfo> {
        let utxos = self.wallet()?.get_utxos().await?;
        let collateral = self.wallet_collateral().await?;
        let address = self.wallet_dapp_address().await?;

        if utxos.is_empty() {
            return Err(ContractError::NoUtxos);
        }

        let collateral = collateral.ok_or(ContractError::NoCollateral)?;
        let address = address.ok_or(ContractError::NoWalletAddress)?;

        debug!(
            "wallet address={address} holds {} utxo(s); collateral={}",
            utxos.len(),
            collateral.input()
        );

        Ok(WalletInfo {
            utxos,
            collateral,
            address,
        })
    }
}

// ------------------------------------------------------------------ Fetcher

impl<B, F: Fetcher, W> Initiator<B, F, W> {
    /// All known outputs of a transaction; at least one.
    pub async fn utxos_by_tx_hash(&self, tx_hash: Hash<32>) -> Result<Vec<Utxo>> {
        let utxos = self.fetcher()?.fetch_utxos(tx_hash, None).await?;

        if utxos.is_empty() {
            return Err(ContractError::UtxoNotFound { tx_hash });
        }

        Ok(utxos)
    }

    /// The last UTxO at an address holding some of the given asset.
    pub async fn address_utxo_with_asset(
        &self,
        address: &Address,
        asset: &AssetId,
    ) -> Result<Utxo> {
        self.fetcher()?
            .fetch_address_utxos(address, Some(asset))
            .await?
            .pop()
            .ok_or_else(|| ContractError::AssetNotFound {
                address: address.clone(),
                asset: asset.clone(),
            })
    }
}

/// The payment key hash of an address; script addresses have none.
pub fn key_hash(address: &Address) -> Result<Hash<28>> {
    address
        .payment_key_hash()
        .ok_or_else(|| ContractError::NotAKeyAddress(address.clone()))
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_STAKE_KEY_HASH, Initiator, key_hash};
    use crate::error::ContractError;
    use cardano_connect::mock::{MockChain, MockWallet};
    use cardano_tx_builder::{
        Address, Hash, Network, NetworkId, Output, PlutusVersion, Utxo, address_test, hash,
        input, key_credential,
        mock::{BuilderCall, RecordingBuilder},
        script_credential, value,
    };

    type TestInitiator = Initiator<RecordingBuilder, MockChain, MockWallet>;

    fn wallet_address() -> Address {
        address_test!(key_credential!(
            "86fa1ef9c1f85b3d8e0e9c0e6f4c2fb47ab6b1c0b7e8f7e9c2a1d3b4"
        ))
        .into()
    }

    fn utxo(ix: u64) -> Utxo {
        Utxo::new(
            input!(
                "c984c8bf52a141254c714c905b2d27b432d4b546f815fbc2fea7b9da6e490324",
                ix
            ),
            Output::new(wallet_address(), value!(10_000_000)),
        )
    }

    fn with_wallet(wallet: MockWallet) -> TestInitiator {
        Initiator::new(RecordingBuilder::default(), None, Some(wallet), 0, 2)
    }

    #[test]
    fn network_selection() {
        for (network_id, network) in [
            (1, Network::Mainnet),
            (0, Network::Preview),
            (2, Network::Preview),
            (42, Network::Preview),
        ] {
            let initiator: TestInitiator =
                Initiator::new(RecordingBuilder::default(), None, None, network_id, 2);
            assert_eq!(initiator.network(), network);
            assert_eq!(
                initiator.builder().calls(),
                &[BuilderCall::SetNetwork(network)]
            );
        }
    }

    #[test]
    fn language_selection() {
        for (version, language) in [
            (1, PlutusVersion::V2),
            (2, PlutusVersion::V3),
            (3, PlutusVersion::V3),
            (0, PlutusVersion::V3),
        ] {
            let initiator: TestInitiator =
                Initiator::new(RecordingBuilder::default(), None, None, 0, version);
            assert_eq!(initiator.language(), language);
        }
    }

    #[test]
    fn defaults() {
        let initiator: TestInitiator = Initiator::new(
            RecordingBuilder::default(),
            None,
            None,
            TestInitiator::DEFAULT_NETWORK_ID,
            TestInitiator::DEFAULT_VERSION,
        );
        assert_eq!(initiator.network(), Network::Preview);
        assert_eq!(initiator.network_id(), NetworkId::TESTNET);
        assert_eq!(initiator.language(), PlutusVersion::V3);
        assert_eq!(
            initiator.stake_credential().as_key(),
            Some(hash!("c08f0294ead5ab7ae0ce5471dd487007919297ba95230af22f25e575"))
        );
        assert_eq!(
            <[u8; 28]>::from(Hash::from(DEFAULT_STAKE_KEY_HASH)),
            DEFAULT_STAKE_KEY_HASH
        );

        let stake = key_credential!("bd3ae991b5aafccafe5ca70758bd36a9b2f872f57f6d3a1ffa0eb777");
        let initiator = initiator.with_stake_credential(stake.clone());
        assert_eq!(initiator.stake_credential(), &stake);
    }

    #[tokio::test]
    async fn wallet_info_checks_utxos_first() {
        let initiator = with_wallet(MockWallet::default());
        assert!(matches!(
            initiator.wallet_info().await,
            Err(ContractError::NoUtxos)
        ));
        assert!(initiator.builder().calls_after_setup().is_empty());
    }

    #[tokio::test]
    async fn wallet_info_checks_collateral_second() {
        let initiator = with_wallet(MockWallet {
            utxos: vec![utxo(0)],
            ..MockWallet::default()
        });
        assert!(matches!(
            initiator.wallet_info().await,
            Err(ContractError::NoCollateral)
        ));
    }

    #[tokio::test]
    async fn wallet_info_checks_address_last() {
        let initiator = with_wallet(MockWallet {
            utxos: vec![utxo(0)],
            collateral: vec![utxo(0)],
            ..MockWallet::default()
        });
        let err = initiator.wallet_info().await.unwrap_err();
        assert!(matches!(err, ContractError::NoWalletAddress));
        assert_eq!(err.to_string(), "No wallet address found");
    }

    #[tokio::test]
    async fn wallet_info() {
        let initiator = with_wallet(MockWallet {
            collateral: vec![utxo(1), utxo(0)],
            ..MockWallet::new(wallet_address(), vec![utxo(0), utxo(1)])
        });

        let info = initiator.wallet_info().await.unwrap();
        assert_eq!(info.utxos, vec![utxo(0), utxo(1)]);
        assert_eq!(info.collateral, utxo(1));
        assert_eq!(info.address, wallet_address());
    }

    #[tokio::test]
    async fn dapp_address_falls_back_to_unused_addresses() {
        let initiator = with_wallet(MockWallet {
            unused_addresses: vec![wallet_address()],
            ..MockWallet::default()
        });
        assert_eq!(
            initiator.wallet_dapp_address().await.unwrap(),
            Some(wallet_address())
        );

        let initiator = with_wallet(MockWallet::default());
        assert_eq!(initiator.wallet_dapp_address().await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_capabilities() {
        let initiator: TestInitiator =
            Initiator::new(RecordingBuilder::default(), None, None, 0, 2);

        assert!(matches!(
            initiator.wallet_info().await,
            Err(ContractError::MissingCapability("wallet"))
        ));

        assert!(matches!(
            initiator
                .utxos_by_tx_hash(hash!(
                    "c984c8bf52a141254c714c905b2d27b432d4b546f815fbc2fea7b9da6e490324"
                ))
                .await,
            Err(ContractError::MissingCapability("fetcher"))
        ));
    }

    #[tokio::test]
    async fn utxos_by_tx_hash() {
        let initiator: TestInitiator = Initiator::new(
            RecordingBuilder::default(),
            Some(MockChain::new(vec![utxo(0), utxo(1)])),
            None,
            0,
            2,
        );

        let utxos = initiator
            .utxos_by_tx_hash(hash!(
                "c984c8bf52a141254c714c905b2d27b432d4b546f815fbc2fea7b9da6e490324"
            ))
            .await
            .unwrap();
        assert_eq!(utxos.len(), 2);

        let err = initiator
            .utxos_by_tx_hash(hash!(
                "32b5e793d26af181cb837ab7470ba6e10e15ff638088bc6b099bb22b54b4796c"
            ))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "UTxO not found");
    }

    #[test]
    fn key_hash_of_addresses() {
        assert_eq!(
            key_hash(&wallet_address()).unwrap(),
            hash!("86fa1ef9c1f85b3d8e0e9c0e6f4c2fb47ab6b1c0b7e8f7e9c2a1d3b4")
        );

        let script: Address = address_test!(script_credential!(
            "bd3ae991b5aafccafe5ca70758bd36a9b2f872f57f6d3a1ffa0eb777"
        ))
        .into();
        assert!(matches!(
            key_hash(&script),
            Err(ContractError::NotAKeyAddress(..))
        ));
    }
}
