//! Token portfolio valuation for Solana wallets
//!
//! Given a wallet address, enumerates its SPL token balances, resolves
//! each token's on-chain identity (metadata account + mint decimals),
//! fetches current prices from the quote API, and renders a
//! markdown-flavored summary with per-token and total USD value.
//!
//! Stateless by design: every computation is a single read-through pass
//! against the ledger RPC and the price oracle, with best-effort
//! degradation everywhere except the balance enumeration itself.

pub mod config;
pub mod constants;
pub mod error;
pub mod layouts;
pub mod ledger;
pub mod portfolio;
pub mod prices;
pub mod rpc;

pub use config::{Config, FileConfig};
pub use error::PortfolioError;
pub use layouts::{DecodeError, MetadataRecord, MintRecord, TokenAccountRecord};
pub use ledger::LedgerReader;
pub use portfolio::{PortfolioLine, PortfolioReport, TokenDisplayInfo, compute_portfolio, wallet_report};
pub use prices::{PriceMap, PriceOracleClient};
