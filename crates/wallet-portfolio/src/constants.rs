//! Process-wide constants and well-known program addresses

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::LazyLock;

/// Default public mainnet RPC endpoint
pub const MAINNET_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Jupiter price API base (batched quotes keyed by mint)
pub const PRICE_API_BASE: &str = "https://api.jup.ag/price/v2";

/// Solscan token page base for report hyperlinks
pub const SOLSCAN_TOKEN_BASE: &str = "https://solscan.io/token";

/// Per-call network timeout in seconds (RPC and price API)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Fallback decimals when a mint account is absent or malformed
pub const DEFAULT_DECIMALS: u8 = 9;

/// Upper bound of the plausible decimals range
pub const MAX_DECIMALS: u8 = 18;

/// Metaplex token metadata program
pub static METADATA_PROGRAM: LazyLock<Pubkey> = LazyLock::new(|| {
    Pubkey::from_str("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s").expect("Invalid metadata program ID")
});

/// SPL token program (owner of all token and mint accounts we read)
pub static TOKEN_PROGRAM: LazyLock<Pubkey> = LazyLock::new(spl_token::id);
