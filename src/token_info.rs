use std::collections::HashMap;

use anchor_lang::prelude::{AnchorDeserialize, borsh};
use anyhow::{Result, bail};
use solana_sdk::{program_pack::Pack, pubkey::Pubkey};
use spl_token_2022::extension::StateWithExtensions;

use crate::constants::{METADATA_PROGRAM_ID, METADATA_SEED};

/// Mint facts shown next to decoded swaps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenInfo {
    pub mint: Pubkey,
    pub decimals: Option<u8>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub uri: Option<String>,
}

/// Leading fields of a Metaplex `Metadata` account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub update_authority: Pubkey,
    pub mint: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

pub fn get_metadata_address(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[METADATA_SEED, METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &METADATA_PROGRAM_ID,
    )
    .0
}

/// Read `decimals` from an SPL Token or Token-2022 mint account
pub fn parse_mint_decimals(mint_data: &[u8], mint_owner: &Pubkey) -> Result<u8> {
    match mint_owner {
        owner if *owner == spl_token::ID => Ok(spl_token::state::Mint::unpack(mint_data)?.decimals),
        owner if *owner == spl_token_2022::ID => {
            let mint = StateWithExtensions::<spl_token_2022::state::Mint>::unpack(mint_data)?;
            Ok(mint.base.decimals)
        }
        _ => bail!("Unknown token program: {} for mint", mint_owner),
    }
}

/// `Key::MetadataV1` of the token metadata program
pub const METADATA_V1_KEY: u8 = 4;

/// Borsh prefix of a Metaplex `Metadata` account; the remaining fields are
/// left unread
#[derive(AnchorDeserialize)]
struct MetadataHeader {
    key: u8,
    update_authority: Pubkey,
    mint: Pubkey,
    name: String,
    symbol: String,
    uri: String,
}

/// Decode update authority, mint, name, symbol and uri of a metadata account.
///
/// Strings are NUL padded on chain; the padding is trimmed. Returns `None`
/// for truncated data, non-UTF-8 strings or an account that is not
/// `MetadataV1`.
pub fn decode_metadata(data: &[u8]) -> Option<TokenMetadata> {
    let header = MetadataHeader::deserialize(&mut &data[..]).ok()?;
    if header.key != METADATA_V1_KEY {
        return None;
    }

    Some(TokenMetadata {
        update_authority: header.update_authority,
        mint: header.mint,
        name: header.name.trim_end_matches('\0').to_string(),
        symbol: header.symbol.trim_end_matches('\0').to_string(),
        uri: header.uri.trim_end_matches('\0').to_string(),
    })
}

/// Mint → token info, filled lazily by the SDK
#[derive(Debug, Default)]
pub struct TokenInfoCache {
    entries: HashMap<Pubkey, TokenInfo>,
}

impl TokenInfoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, mint: &Pubkey) -> Option<&TokenInfo> {
        self.entries.get(mint)
    }

    pub fn insert(&mut self, info: TokenInfo) {
        self.entries.insert(info.mint, info);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Combine the mint and metadata accounts into a [`TokenInfo`].
///
/// Either account may be absent; missing or malformed pieces are left `None`.
pub fn build_token_info(
    mint: Pubkey,
    mint_account: Option<(&[u8], &Pubkey)>,
    metadata_account: Option<&[u8]>,
) -> TokenInfo {
    let decimals = mint_account.and_then(|(data, owner)| match parse_mint_decimals(data, owner) {
        Ok(decimals) => Some(decimals),
        Err(e) => {
            log::debug!("Failed to parse mint {}: {}", mint, e);
            None
        }
    });

    let metadata = metadata_account.and_then(decode_metadata);

    TokenInfo {
        mint,
        decimals,
        name: metadata.as_ref().map(|m| m.name.clone()),
        symbol: metadata.as_ref().map(|m| m.symbol.clone()),
        uri: metadata.map(|m| m.uri),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_token::solana_program::program_option::COption;

    fn borsh_string(value: &str, padded_len: usize) -> Vec<u8> {
        let mut padded = value.as_bytes().to_vec();
        padded.resize(padded_len, 0);
        let mut out = (padded.len() as u32).to_le_bytes().to_vec();
        out.extend_from_slice(&padded);
        out
    }

    fn metadata_bytes(mint: &Pubkey) -> Vec<u8> {
        let mut data = vec![METADATA_V1_KEY];
        data.extend_from_slice(Pubkey::new_unique().as_ref());
        data.extend_from_slice(mint.as_ref());
        data.extend(borsh_string("Pump Token", 32));
        data.extend(borsh_string("PUMP", 10));
        data.extend(borsh_string("https://example.invalid/pump.json", 200));
        data.extend_from_slice(&[0u8; 16]); // seller fee and creators, unread
        data
    }

    #[test]
    fn decodes_metadata_and_trims_padding() {
        let mint = Pubkey::new_unique();
        let metadata = decode_metadata(&metadata_bytes(&mint)).unwrap();
        assert_eq!(metadata.mint, mint);
        assert_eq!(metadata.name, "Pump Token");
        assert_eq!(metadata.symbol, "PUMP");
        assert_eq!(metadata.uri, "https://example.invalid/pump.json");
    }

    #[test]
    fn truncated_metadata_is_none() {
        let data = metadata_bytes(&Pubkey::new_unique());
        assert_eq!(decode_metadata(&data[..70]), None);
        assert_eq!(decode_metadata(&[]), None);
    }

    #[test]
    fn oversized_length_prefix_is_none() {
        let mut data = vec![METADATA_V1_KEY];
        data.extend_from_slice(&[0u8; 64]);
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        assert_eq!(decode_metadata(&data), None);
    }

    #[test]
    fn rejects_accounts_that_are_not_metadata_v1() {
        let mut data = vec![0u8];
        data.extend_from_slice(&[0u8; 64]);
        data.extend_from_slice(&[0u8; 12]); // three empty strings
        assert_eq!(decode_metadata(&data), None);

        let mut edition = metadata_bytes(&Pubkey::new_unique());
        edition[0] = 6; // MasterEditionV2
        assert_eq!(decode_metadata(&edition), None);
    }

    #[test]
    fn empty_strings_decode_for_metadata_v1() {
        let mut data = vec![METADATA_V1_KEY];
        data.extend_from_slice(&[0u8; 64]);
        data.extend_from_slice(&[0u8; 12]);
        let metadata = decode_metadata(&data).unwrap();
        assert_eq!(metadata.name, "");
        assert_eq!(metadata.uri, "");
    }

    #[test]
    fn metadata_address_is_deterministic() {
        let mint = Pubkey::new_unique();
        assert_eq!(get_metadata_address(&mint), get_metadata_address(&mint));
        assert_ne!(
            get_metadata_address(&mint),
            get_metadata_address(&Pubkey::new_unique())
        );
    }

    #[test]
    fn reads_spl_mint_decimals() {
        let mint = spl_token::state::Mint {
            mint_authority: COption::None,
            supply: 1_000_000_000,
            decimals: 6,
            is_initialized: true,
            freeze_authority: COption::None,
        };
        let mut data = vec![0u8; spl_token::state::Mint::LEN];
        spl_token::state::Mint::pack(mint, &mut data).unwrap();

        assert_eq!(parse_mint_decimals(&data, &spl_token::ID).unwrap(), 6);
        assert!(parse_mint_decimals(&data, &Pubkey::new_unique()).is_err());
    }

    #[test]
    fn token_info_tolerates_missing_accounts() {
        let mint = Pubkey::new_unique();
        let info = build_token_info(mint, None, None);
        assert_eq!(
            info,
            TokenInfo {
                mint,
                ..Default::default()
            }
        );

        let metadata = metadata_bytes(&mint);
        let info = build_token_info(mint, None, Some(metadata.as_slice()));
        assert_eq!(info.symbol.as_deref(), Some("PUMP"));
        assert_eq!(info.decimals, None);
    }

    #[test]
    fn cache_keys_by_mint() {
        let mut cache = TokenInfoCache::new();
        assert!(cache.is_empty());

        let mint = Pubkey::new_unique();
        cache.insert(TokenInfo {
            mint,
            decimals: Some(9),
            ..Default::default()
        });
        cache.insert(TokenInfo {
            mint,
            decimals: Some(6),
            ..Default::default()
        });

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&mint).and_then(|info| info.decimals), Some(6));
    }
}
