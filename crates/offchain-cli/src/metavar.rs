//! Command-line metavar specifying the type/semantic of arguments and/or options.

/// Lovelace amounts
pub const LOVELACE: &str = "U64";

/// Ed25519 Private key
pub const ED25519_SIGNING_KEY: &str = "ED25519_PRV";

/// A bech32 address
pub const ADDRESS: &str = "ADDRESS";

/// A transaction id
pub const TX_HASH: &str = "TX_HASH";

/// An ed25519 verification key hash
pub const KEY_HASH: &str = "KEY_HASH";

/// A token name, as utf-8 text
pub const ASSET_NAME: &str = "NAME";

/// A JSON object mapping metadata fields to strings, integers, lists or objects
pub const METADATA: &str = "JSON";

/// A Blockfrost project id
pub const PROJECT_ID: &str = "PROJECT_ID";

/// A small integer selecting a network or a Plutus version
pub const U8: &str = "U8";

/// A file path
pub const PATH: &str = "PATH";
