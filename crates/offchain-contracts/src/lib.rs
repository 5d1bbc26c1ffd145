pub use crate::{
    blueprint::{Blueprint, Validator},
    error::{BlueprintError, ContractError},
    escrow::{Escrow, EscrowDatum},
    initiator::{Initiator, WalletInfo},
    metadata::{Metadata, Metadatum},
    token_store::{MintAction, StoreAction, TokenStore},
};

pub mod blueprint;
pub mod cip68;
pub mod error;
pub mod escrow;
pub mod initiator;
pub mod metadata;
pub mod token_store;
