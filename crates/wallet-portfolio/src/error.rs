//! Error taxonomy for portfolio computation
//!
//! Only two failures are fatal to a portfolio request: an unparseable
//! wallet address, and a failed balance enumeration (without the account
//! list there is nothing to report on). Everything else degrades the
//! output instead of aborting: a failed price batch zeroes the USD
//! column, and per-mint metadata/decimals failures fall back to the
//! truncated-address symbol and default decimals at their call sites.

use solana_client::client_error::ClientError;
use solana_sdk::pubkey::ParsePubkeyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("invalid wallet address: {0}")]
    InvalidOwner(#[from] ParsePubkeyError),

    #[error("ledger RPC unavailable: {0}")]
    LedgerUnavailable(#[source] ClientError),

    #[error("price oracle unavailable: {0}")]
    PriceOracleUnavailable(String),
}
