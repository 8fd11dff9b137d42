//! Ledger reader: RPC read operations against the Solana node
//!
//! Only the balance enumeration is allowed to fail the caller: without
//! the account list there is no portfolio. The per-mint enrichment
//! reads (decimals, metadata) absorb every failure into fallbacks so a
//! single bad mint never degrades its siblings.

use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, MemcmpEncodedBytes, RpcFilterType};
use solana_commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;

use crate::config::Config;
use crate::constants;
use crate::error::PortfolioError;
use crate::layouts::{self, MetadataRecord, TokenAccountRecord, token_account_layout};
use crate::rpc;

/// Read-only view of the ledger for one portfolio computation
pub struct LedgerReader {
    client: solana_client::nonblocking::rpc_client::RpcClient,
}

impl LedgerReader {
    pub fn new(config: &Config) -> Self {
        Self {
            client: rpc::new_rpc_client(&config.rpc_url, config.timeout, CommitmentConfig::confirmed()),
        }
    }

    /// Enumerate all SPL token accounts owned by `owner`
    ///
    /// Scans the token program with a dataSize + owner-memcmp filter so the
    /// node returns raw account bytes. Node ordering is preserved (opaque
    /// but stable for one response). An empty wallet is a valid, non-error
    /// result. Accounts that fail to decode are skipped with a warning.
    pub async fn get_token_accounts_by_owner(&self, owner: &Pubkey) -> Result<Vec<TokenAccountRecord>, PortfolioError> {
        let filters = vec![
            RpcFilterType::DataSize(token_account_layout::LEN as u64),
            RpcFilterType::Memcmp(Memcmp::new(
                token_account_layout::OWNER_OFFSET,
                MemcmpEncodedBytes::Base58(owner.to_string()),
            )),
        ];

        let config = RpcProgramAccountsConfig {
            filters: Some(filters),
            account_config: RpcAccountInfoConfig {
                encoding: Some(solana_account_decoder::UiAccountEncoding::Base64),
                commitment: Some(CommitmentConfig::confirmed()),
                ..Default::default()
            },
            ..Default::default()
        };

        #[allow(deprecated)]
        let accounts = self
            .client
            .get_program_accounts_with_config(&constants::TOKEN_PROGRAM, config)
            .await
            .map_err(PortfolioError::LedgerUnavailable)?;

        let mut records = Vec::with_capacity(accounts.len());
        for (pubkey, account) in accounts {
            match layouts::decode_token_account(&account.data) {
                Ok(record) => records.push(record),
                Err(e) => {
                    eprintln!("Warning: skipping undecodable token account {}: {}", pubkey, e);
                }
            }
        }

        Ok(records)
    }

    /// Fetch raw account bytes; `Ok(None)` when the node reports no such account
    pub async fn get_account_raw(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, PortfolioError> {
        let response = self
            .client
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .await
            .map_err(PortfolioError::LedgerUnavailable)?;

        Ok(response.value.map(|account| account.data))
    }

    /// Resolve a mint's decimal precision; never fails the caller
    ///
    /// Absent account, short buffer, out-of-range value, or a failed RPC
    /// call all collapse to the default of 9.
    pub async fn get_mint_decimals(&self, mint: &Pubkey) -> u8 {
        match self.get_account_raw(mint).await {
            Ok(data) => decimals_or_default(data.as_deref()),
            Err(e) => {
                eprintln!("Warning: failed to fetch mint {}: {}", mint, e);
                constants::DEFAULT_DECIMALS
            }
        }
    }

    /// Resolve the metadata record for a mint, if one exists
    ///
    /// Derives the metadata address, fetches and decodes it. `None` on
    /// absence or decode failure; the caller supplies the
    /// truncated-address fallback.
    pub async fn get_metadata(&self, mint: &Pubkey) -> Option<MetadataRecord> {
        let address = layouts::derive_metadata_address(mint, &constants::METADATA_PROGRAM);

        match self.get_account_raw(&address).await {
            Ok(Some(data)) => layouts::decode_metadata(&data).ok(),
            Ok(None) => None,
            Err(e) => {
                eprintln!("Warning: failed to fetch metadata for {}: {}", mint, e);
                None
            }
        }
    }
}

/// Validate decoded decimals into `[0, MAX_DECIMALS]`, falling back to the default
pub(crate) fn decimals_or_default(data: Option<&[u8]>) -> u8 {
    let Some(data) = data else {
        return constants::DEFAULT_DECIMALS;
    };

    match layouts::decode_mint(data) {
        Ok(mint) if mint.decimals <= constants::MAX_DECIMALS => mint.decimals,
        _ => constants::DEFAULT_DECIMALS,
    }
}
