//! Portfolio aggregation and report rendering
//!
//! Orchestrates one portfolio computation: enumerate token accounts
//! (fatal on failure), then fan out concurrently (one batched price
//! request plus per-mint metadata/decimals resolution) and join
//! everything back by mint address in the original enumeration order.
//! Per-mint failures degrade to fallbacks; a price outage zeroes the
//! USD column; only the enumeration itself can abort.

use futures::future;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashSet;
use std::str::FromStr;

use crate::config::Config;
use crate::constants;
use crate::error::PortfolioError;
use crate::layouts::{MetadataRecord, TokenAccountRecord};
use crate::ledger::LedgerReader;
use crate::prices::{PriceMap, PriceOracleClient};

/// Resolved display identity for one held mint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDisplayInfo {
    pub mint: Pubkey,
    pub name: Option<String>,
    pub symbol: String,
    pub uri: Option<String>,
    pub decimals: u8,
}

/// One rendered row of the portfolio
#[derive(Debug, Clone)]
pub struct PortfolioLine {
    pub mint: Pubkey,
    pub symbol: String,
    pub human_amount: f64,
    pub usd_value: f64,
}

/// A computed portfolio, separate from its text rendering
#[derive(Debug, Clone)]
pub struct PortfolioReport {
    pub owner: Pubkey,
    pub lines: Vec<PortfolioLine>,
    pub total_usd: f64,
}

impl PortfolioReport {
    /// Render the markdown-flavored wallet summary
    pub fn render(&self) -> String {
        let mut text = String::from("*TOKENS IN YOUR WALLET*\n\n");

        for line in &self.lines {
            text.push_str(&format!(
                "[{}]({}/{}) {:.3} - *(${})*\n",
                line.symbol,
                constants::SOLSCAN_TOKEN_BASE,
                line.mint,
                line.human_amount,
                format_usd(line.usd_value)
            ));
        }

        text.push_str(&format!("\n*TOTAL BALANCE: ${}*", format_usd(self.total_usd)));
        text
    }
}

/// Compute and render the portfolio for a wallet address string
///
/// The single entry point: address in, report text (or error) out.
pub async fn wallet_report(address: &str, config: &Config) -> Result<String, PortfolioError> {
    let owner = Pubkey::from_str(address)?;
    let ledger = LedgerReader::new(config);
    let oracle = PriceOracleClient::new(config);

    let report = compute_portfolio(&ledger, &oracle, &owner).await?;
    Ok(report.render())
}

/// Compute the portfolio for an owner
pub async fn compute_portfolio(
    ledger: &LedgerReader,
    oracle: &PriceOracleClient,
    owner: &Pubkey,
) -> Result<PortfolioReport, PortfolioError> {
    let holdings = ledger.get_token_accounts_by_owner(owner).await?;
    let mints = unique_mints(&holdings);

    // Price batch and per-mint identity resolution run in parallel; the
    // join below is the barrier. Each per-mint resolution is best-effort
    // and cannot fail its siblings.
    let (price_result, infos) = tokio::join!(
        oracle.get_prices(&mints),
        future::join_all(mints.iter().map(|mint| resolve_display_info(ledger, mint)))
    );

    let prices = match price_result {
        Ok(prices) => prices,
        Err(e) => {
            eprintln!("Warning: {}; pricing portfolio at zero", e);
            PriceMap::new()
        }
    };

    Ok(build_report(*owner, &holdings, infos, &prices))
}

/// Resolve metadata and decimals for one mint concurrently
///
/// Missing metadata falls back to the truncated-address symbol; missing
/// or invalid decimals fall back inside the ledger reader.
async fn resolve_display_info(ledger: &LedgerReader, mint: &Pubkey) -> TokenDisplayInfo {
    let (metadata, decimals) = tokio::join!(ledger.get_metadata(mint), ledger.get_mint_decimals(mint));
    display_info_from_parts(mint, metadata, decimals)
}

fn display_info_from_parts(mint: &Pubkey, metadata: Option<MetadataRecord>, decimals: u8) -> TokenDisplayInfo {
    match metadata {
        Some(meta) => TokenDisplayInfo {
            mint: *mint,
            name: Some(meta.name),
            symbol: meta.symbol,
            uri: Some(meta.uri),
            decimals,
        },
        None => TokenDisplayInfo {
            mint: *mint,
            name: None,
            symbol: truncated_address(mint),
            uri: None,
            decimals,
        },
    }
}

/// Held mints in first-seen order (a wallet can hold several accounts of one mint)
fn unique_mints(holdings: &[TokenAccountRecord]) -> Vec<Pubkey> {
    let mut seen = HashSet::new();
    holdings
        .iter()
        .map(|holding| holding.mint)
        .filter(|mint| seen.insert(*mint))
        .collect()
}

/// `first5...last4` display form of a mint address
fn truncated_address(mint: &Pubkey) -> String {
    let address = mint.to_string();
    format!("{}...{}", &address[..5], &address[address.len() - 4..])
}

/// Join holdings, identities and prices into the final report
///
/// Pure: preserves the original enumeration order, keys the identity and
/// price lookups by mint, prices absent quotes at zero, and skips a
/// holding only if its identity never resolved at all.
fn build_report(
    owner: Pubkey,
    holdings: &[TokenAccountRecord],
    infos: Vec<TokenDisplayInfo>,
    prices: &PriceMap,
) -> PortfolioReport {
    let by_mint: std::collections::HashMap<Pubkey, TokenDisplayInfo> =
        infos.into_iter().map(|info| (info.mint, info)).collect();

    let mut lines = Vec::with_capacity(holdings.len());
    let mut total_usd = 0.0;

    for holding in holdings {
        let Some(info) = by_mint.get(&holding.mint) else {
            continue;
        };

        let human_amount = holding.amount as f64 / 10f64.powi(info.decimals as i32);
        let price = prices.get(&holding.mint).copied().unwrap_or(0.0);
        let usd_value = human_amount * price;
        total_usd += usd_value;

        lines.push(PortfolioLine {
            mint: holding.mint,
            symbol: info.symbol.clone(),
            human_amount,
            usd_value,
        });
    }

    PortfolioReport { owner, lines, total_usd }
}

// =============================================================================
// USD Formatting
// =============================================================================

/// 3 significant digits above 1, 5 at or below (the `> 1` boundary is
/// strict and load-bearing)
fn format_usd(value: f64) -> String {
    if value > 1.0 {
        format_significant(value, 3)
    } else {
        format_significant(value, 5)
    }
}

/// Format to `digits` significant digits in plain decimal notation
fn format_significant(value: f64, digits: i32) -> String {
    if value == 0.0 {
        return "0.0".to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    format!("{:.*}", decimals, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(mint: Pubkey, amount: u64) -> TokenAccountRecord {
        TokenAccountRecord { mint, amount }
    }

    fn info(mint: Pubkey, symbol: &str, decimals: u8) -> TokenDisplayInfo {
        TokenDisplayInfo {
            mint,
            name: Some(symbol.to_string()),
            symbol: symbol.to_string(),
            uri: None,
            decimals,
        }
    }

    #[test]
    fn test_empty_wallet_reports_zero_total() {
        let report = build_report(Pubkey::new_unique(), &[], vec![], &PriceMap::new());

        assert!(report.lines.is_empty());
        assert_eq!(report.total_usd, 0.0);

        let text = report.render();
        assert!(text.starts_with("*TOKENS IN YOUR WALLET*"));
        assert!(text.ends_with("*TOTAL BALANCE: $0.0*"));
    }

    #[test]
    fn test_single_token_line() {
        let mint = Pubkey::new_unique();
        let mut prices = PriceMap::new();
        prices.insert(mint, 1.0);

        let report = build_report(
            Pubkey::new_unique(),
            &[holding(mint, 1_000_000)],
            vec![info(mint, "USDC", 6)],
            &prices,
        );

        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.lines[0].human_amount, 1.0);
        assert_eq!(report.lines[0].usd_value, 1.0);

        // Exactly 1 is not > 1, so the 5-significant-digit branch applies
        let text = report.render();
        assert!(text.contains(&format!("[USDC]({}/{}) 1.000 - *($1.0000)*", constants::SOLSCAN_TOKEN_BASE, mint)));
        assert!(text.ends_with("*TOTAL BALANCE: $1.0000*"));
    }

    #[test]
    fn test_missing_price_defaults_to_zero() {
        let mint = Pubkey::new_unique();

        let report = build_report(
            Pubkey::new_unique(),
            &[holding(mint, 5_000_000_000)],
            vec![info(mint, "BONK", 9)],
            &PriceMap::new(),
        );

        assert_eq!(report.lines[0].human_amount, 5.0);
        assert_eq!(report.lines[0].usd_value, 0.0);
        assert_eq!(report.total_usd, 0.0);
    }

    #[test]
    fn test_order_follows_enumeration_not_resolution() {
        let first = Pubkey::new_unique();
        let second = Pubkey::new_unique();

        // Resolutions arrive in reverse order; the join restores enumeration order
        let report = build_report(
            Pubkey::new_unique(),
            &[holding(first, 100), holding(second, 200)],
            vec![info(second, "BBB", 2), info(first, "AAA", 2)],
            &PriceMap::new(),
        );

        assert_eq!(report.lines[0].symbol, "AAA");
        assert_eq!(report.lines[1].symbol, "BBB");
    }

    #[test]
    fn test_duplicate_accounts_of_one_mint_each_render() {
        let mint = Pubkey::new_unique();
        let mut prices = PriceMap::new();
        prices.insert(mint, 2.0);

        let report = build_report(
            Pubkey::new_unique(),
            &[holding(mint, 100), holding(mint, 50)],
            vec![info(mint, "DUP", 0)],
            &prices,
        );

        assert_eq!(report.lines.len(), 2);
        assert_eq!(report.total_usd, 300.0);
    }

    #[test]
    fn test_unresolved_mint_is_skipped() {
        let resolved = Pubkey::new_unique();
        let unresolved = Pubkey::new_unique();

        let report = build_report(
            Pubkey::new_unique(),
            &[holding(unresolved, 100), holding(resolved, 200)],
            vec![info(resolved, "OK", 2)],
            &PriceMap::new(),
        );

        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.lines[0].symbol, "OK");
    }

    #[test]
    fn test_fallback_identity_uses_truncated_address() {
        let mint = Pubkey::new_unique();
        let display = display_info_from_parts(&mint, None, 9);

        let address = mint.to_string();
        let expected = format!("{}...{}", &address[..5], &address[address.len() - 4..]);

        assert_eq!(display.symbol, expected);
        assert_eq!(display.name, None);
        assert_eq!(display.uri, None);
        assert_eq!(display.decimals, 9);
    }

    #[test]
    fn test_metadata_identity_keeps_fields() {
        let mint = Pubkey::new_unique();
        let display = display_info_from_parts(
            &mint,
            Some(MetadataRecord {
                name: "USD Coin".to_string(),
                symbol: "USDC".to_string(),
                uri: "https://example.com/usdc.json".to_string(),
            }),
            6,
        );

        assert_eq!(display.symbol, "USDC");
        assert_eq!(display.name.as_deref(), Some("USD Coin"));
        assert_eq!(display.uri.as_deref(), Some("https://example.com/usdc.json"));
        assert_eq!(display.decimals, 6);
    }

    #[test]
    fn test_unique_mints_preserves_first_seen_order() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();

        let mints = unique_mints(&[holding(a, 1), holding(b, 2), holding(a, 3)]);
        assert_eq!(mints, vec![a, b]);
    }

    #[test]
    fn test_usd_format_boundary_around_one() {
        // Strictly above 1: 3 significant digits
        assert_eq!(format_usd(1.00001), "1.00");
        assert_eq!(format_usd(123.456), "123");
        assert_eq!(format_usd(2.5), "2.50");

        // At and below 1: 5 significant digits
        assert_eq!(format_usd(1.0), "1.0000");
        assert_eq!(format_usd(0.99999), "0.99999");
        assert_eq!(format_usd(0.5), "0.50000");
        assert_eq!(format_usd(0.0012345), "0.0012345");
    }

    #[test]
    fn test_format_significant_zero() {
        assert_eq!(format_usd(0.0), "0.0");
    }
}
