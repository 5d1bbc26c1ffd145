pub use crate::{
    fetcher::{Fetcher, FetcherDyn},
    key_wallet::KeyWallet,
    submitter::{Submitter, SubmitterDyn},
    wallet::{Wallet, WalletDyn},
};

mod fetcher;
mod key_wallet;
mod submitter;
mod wallet;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
