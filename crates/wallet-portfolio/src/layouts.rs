//! Binary account layouts and record decoders
//!
//! Fixed-offset layouts for the three account kinds this tool reads:
//! SPL token accounts, SPL mints, and Metaplex metadata accounts. The
//! offsets mirror the on-chain account formats exactly and are not
//! negotiable. Decoders are pure: bytes in, typed record or
//! `DecodeError` out. Callers treat a decode failure the same as a
//! missing account and fall back.

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Failure to decode a raw account buffer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{kind} buffer too short: {len} bytes")]
    TooShort { kind: &'static str, len: usize },
}

// =============================================================================
// Layout Offsets
// =============================================================================

/// SPL token account layout
pub mod token_account_layout {
    // mint: Pubkey (32 bytes) -> offset 0
    // owner: Pubkey (32 bytes) -> offset 32
    // amount: u64 (8 bytes) -> offset 64
    // delegate: COption<Pubkey> (36 bytes) -> offset 72
    // state: u8 (1 byte) -> offset 108
    // is_native: COption<u64> (12 bytes) -> offset 109
    // delegated_amount: u64 (8 bytes) -> offset 121
    // close_authority: COption<Pubkey> (36 bytes) -> offset 129

    pub const MINT_OFFSET: usize = 0;
    pub const OWNER_OFFSET: usize = 32;
    pub const AMOUNT_OFFSET: usize = 64;
    pub const LEN: usize = 165;
}

/// SPL mint account layout
pub mod mint_layout {
    // mint_authority: COption<Pubkey> (36 bytes) -> offset 0
    // supply: u64 (8 bytes) -> offset 36
    // decimals: u8 (1 byte) -> offset 44
    // is_initialized: u8 (1 byte) -> offset 45
    // freeze_authority: COption<Pubkey> (36 bytes) -> offset 46

    pub const DECIMALS_OFFSET: usize = 44;
    pub const LEN: usize = 82;
}

/// Metaplex token metadata account layout
pub mod metadata_layout {
    // key: u32 LE (4 bytes) -> offset 0
    // update_authority: Pubkey (32 bytes) -> offset 4
    // mint: Pubkey (32 bytes) -> offset 36
    // name: [u8; 32] NUL-padded -> offset 68
    // symbol: [u8; 11] NUL-padded -> offset 100
    // uri: [u8; 200] NUL-padded -> offset 111
    // seller_fee_basis_points: u32 LE (4 bytes) -> offset 311
    // primary_sale_happened: u8 (1 byte) -> offset 315
    // is_mutable: u8 (1 byte) -> offset 316

    pub const NAME_OFFSET: usize = 68;
    pub const NAME_LEN: usize = 32;
    pub const SYMBOL_OFFSET: usize = 100;
    pub const SYMBOL_LEN: usize = 11;
    pub const URI_OFFSET: usize = 111;
    pub const URI_LEN: usize = 200;
    pub const MIN_LEN: usize = 317;
}

/// Seed prefix for metadata account derivation
const METADATA_SEED: &[u8] = b"metadata";

// =============================================================================
// Decoded Records
// =============================================================================

/// One token-account holding: which mint, how much (raw smallest units)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccountRecord {
    pub mint: Pubkey,
    pub amount: u64,
}

/// The slice of a mint account we care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintRecord {
    pub decimals: u8,
}

/// Descriptive metadata attached to a mint via the metadata program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

// =============================================================================
// Decoders
// =============================================================================

/// Decode an SPL token account buffer into `{mint, amount}`
pub fn decode_token_account(data: &[u8]) -> Result<TokenAccountRecord, DecodeError> {
    if data.len() < token_account_layout::LEN {
        return Err(DecodeError::TooShort {
            kind: "token account",
            len: data.len(),
        });
    }

    Ok(TokenAccountRecord {
        mint: read_pubkey(data, token_account_layout::MINT_OFFSET),
        amount: read_u64_le(data, token_account_layout::AMOUNT_OFFSET),
    })
}

/// Decode an SPL mint account buffer into `{decimals}`
///
/// Returns the raw decimals byte; range validation belongs to the
/// ledger boundary, which applies the fallback.
pub fn decode_mint(data: &[u8]) -> Result<MintRecord, DecodeError> {
    if data.len() < mint_layout::LEN {
        return Err(DecodeError::TooShort {
            kind: "mint",
            len: data.len(),
        });
    }

    Ok(MintRecord {
        decimals: data[mint_layout::DECIMALS_OFFSET],
    })
}

/// Decode a metadata account buffer into `{name, symbol, uri}`
///
/// String fields are NUL-padded on chain: trailing NULs are stripped,
/// invalid UTF-8 sequences are dropped (never an error), and the result
/// is whitespace-trimmed.
pub fn decode_metadata(data: &[u8]) -> Result<MetadataRecord, DecodeError> {
    if data.len() < metadata_layout::MIN_LEN {
        return Err(DecodeError::TooShort {
            kind: "metadata",
            len: data.len(),
        });
    }

    Ok(MetadataRecord {
        name: decode_padded_str(&data[metadata_layout::NAME_OFFSET..metadata_layout::NAME_OFFSET + metadata_layout::NAME_LEN]),
        symbol: decode_padded_str(
            &data[metadata_layout::SYMBOL_OFFSET..metadata_layout::SYMBOL_OFFSET + metadata_layout::SYMBOL_LEN],
        ),
        uri: decode_padded_str(&data[metadata_layout::URI_OFFSET..metadata_layout::URI_OFFSET + metadata_layout::URI_LEN]),
    })
}

/// Derive the metadata account address for a mint
///
/// Seeds are `["metadata", metadata_program, mint]` under the metadata
/// program itself, matching the on-chain derivation bit for bit.
pub fn derive_metadata_address(mint: &Pubkey, metadata_program: &Pubkey) -> Pubkey {
    let (address, _bump) = Pubkey::find_program_address(
        &[METADATA_SEED, metadata_program.as_ref(), mint.as_ref()],
        metadata_program,
    );

    address
}

// =============================================================================
// Read Helpers
// =============================================================================

fn read_pubkey(data: &[u8], offset: usize) -> Pubkey {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&data[offset..offset + 32]);
    Pubkey::new_from_array(bytes)
}

fn read_u64_le(data: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}

/// Strip trailing NULs, drop invalid UTF-8, trim whitespace
fn decode_padded_str(field: &[u8]) -> String {
    let end = field.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let text: String = String::from_utf8_lossy(&field[..end])
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect();

    text.trim().to_string()
}
