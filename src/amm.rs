use anchor_lang::prelude::AccountMeta;
use anyhow::Result;
use solana_sdk::pubkey::Pubkey;

use crate::instruction::SwapInstructionParams;
use crate::math::{FeeRate, QuoteResult, ReserveSnapshot, SwapDirection};

/// Core AMM trait for PumpSwap pool operations
pub(crate) trait Amm: Send + Sync {
    /// Deserialize the AMM from a keyed account
    fn load_pool(pool: &KeyedAccount) -> Result<Self>
    where
        Self: Sized;

    /// Get the program ID of the AMM
    fn program_id(&self) -> Pubkey;

    /// Get the key/address of the AMM
    fn key(&self) -> Pubkey;

    /// Get the reserve token mints, base first
    fn get_reserve_mints(&self) -> Vec<Pubkey>;

    /// Get accounts that need to be updated
    fn get_accounts_to_update(&self) -> Vec<Pubkey>;

    /// Update the AMM state from account data
    fn update(&mut self, account_map: &AccountMap) -> Result<()>;

    /// Current reserves in (base, quote) order
    fn reserves(&self) -> ReserveSnapshot;

    /// Get a quote for a swap
    fn quote(&self, quote_params: &QuoteParams) -> Result<Quote>;

    /// Get swap parameters and account metadata
    fn get_swap_and_account_metas(&self, swap_params: &SwapParams) -> Result<SwapAndAccountMetas>;

    /// Check if the AMM is active
    fn is_active(&self) -> bool;
}

/// Account map for storing account data
pub type AccountMap = std::collections::HashMap<Pubkey, AccountData>;

/// Account data structure
#[derive(Clone, Debug)]
pub struct AccountData {
    pub data: Vec<u8>,
    pub owner: Pubkey,
}

/// Quote parameters for swap operations
#[derive(Debug, Clone)]
pub struct QuoteParams {
    pub direction: SwapDirection,
    pub amount: u64,
    pub fee_rate: FeeRate,
    pub slippage_bps: u64,
}

/// Quote result
#[derive(Debug, Clone)]
pub struct Quote {
    pub direction: SwapDirection,
    pub in_amount: u64,
    pub out_amount: u64,
    pub min_out_amount: u64,
    pub fee_amount: u64,
    pub fee_mint: Pubkey,
    pub fee_pct: rust_decimal::Decimal,
}

impl Quote {
    pub(crate) fn from_result(
        direction: SwapDirection,
        in_amount: u64,
        fee_mint: Pubkey,
        fee_pct: rust_decimal::Decimal,
        result: QuoteResult,
    ) -> Self {
        Self {
            direction,
            in_amount,
            out_amount: result.exact_amount_out,
            min_out_amount: result.min_amount_out,
            fee_amount: result.fee_amount,
            fee_mint,
            fee_pct,
        }
    }
}

/// Swap parameters
#[derive(Debug, Clone)]
pub struct SwapParams {
    pub direction: SwapDirection,
    pub user: Pubkey,
    pub in_amount: u64,
    pub min_out: u64,
    pub protocol_fee_recipient: Pubkey,
}

/// Swap result with account metadata
#[derive(Debug, Clone)]
pub struct SwapAndAccountMetas {
    pub discriminator: [u8; 8],
    pub swap: SwapInstructionParams,
    pub data: Vec<u8>,
    pub account_metas: Vec<AccountMeta>,
}

/// Keyed account for AMM operations
#[derive(Debug, Clone)]
pub struct KeyedAccount {
    pub key: Pubkey,
    pub account: AccountData,
}

/// Helper function to get account data and owner from account map
pub(crate) fn try_get_account_data_and_owner<'a>(
    account_map: &'a AccountMap,
    pubkey: &Pubkey,
) -> Result<(&'a [u8], &'a Pubkey)> {
    account_map
        .get(pubkey)
        .map(|account| (account.data.as_slice(), &account.owner))
        .ok_or_else(|| anyhow::anyhow!("Account not found: {}", pubkey))
}
