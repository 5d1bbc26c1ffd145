use cardano_tx_builder::{Address, AssetId, Hash};

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("No utxos found")]
    NoUtxos,

    #[error("No collateral found")]
    NoCollateral,

    #[error("No wallet address found")]
    NoWalletAddress,

    #[error("UTxO not found")]
    UtxoNotFound { tx_hash: Hash<32> },

    #[error("No UTxO holding {asset} at {address}")]
    AssetNotFound { address: Address, asset: AssetId },

    #[error("Missing capability: {0}")]
    MissingCapability(&'static str),

    #[error("Not a key address: {0}")]
    NotAKeyAddress(Address),

    #[error("Blueprint error: {0}")]
    Blueprint(#[from] BlueprintError),

    #[error(transparent)]
    Capability(#[from] anyhow::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum BlueprintError {
    #[error("Process error")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse blueprint: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Unknown validator: {0}")]
    UnknownValidator(String),

    #[error("Validator {title} expects {expected} parameter(s), got {got}")]
    ParameterMismatch {
        title: String,
        expected: usize,
        got: usize,
    },

    #[error("Failed to apply parameters to {title}: {message}")]
    ApplyParams { title: String, message: String },
}

pub type Result<T> = std::result::Result<T, ContractError>;
