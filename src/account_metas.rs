use anchor_lang::prelude::AccountMeta;
use solana_sdk::pubkey::Pubkey;

/// Accounts of a PumpSwap `buy` or `sell`, in instruction order
pub(crate) struct PumpSwapAmmSwap {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub global_config: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub user_base_token_account: Pubkey,
    pub user_quote_token_account: Pubkey,
    pub pool_base_token_account: Pubkey,
    pub pool_quote_token_account: Pubkey,
    pub protocol_fee_recipient: Pubkey,
    pub protocol_fee_recipient_token_account: Pubkey,
    pub base_token_program: Pubkey,
    pub quote_token_program: Pubkey,
    pub system_program: Pubkey,
    pub associated_token_program: Pubkey,
    pub event_authority: Pubkey,
    pub program: Pubkey,
}

/// Display names of the swap accounts by position
pub const SWAP_ACCOUNT_ROLES: [&str; 17] = [
    "Pool",
    "User",
    "Global Config",
    "Base Mint (Token)",
    "Quote Mint (SOL)",
    "User Base Token Account",
    "User Quote Token Account",
    "Pool Base Token Account",
    "Pool Quote Token Account",
    "Protocol Fee Recipient",
    "Protocol Fee Recipient Token Account",
    "Base Token Program",
    "Quote Token Program",
    "System Program",
    "Associated Token Program",
    "Event Authority",
    "Program",
];

pub(crate) const BASE_MINT_INDEX: usize = 3;
pub(crate) const USER_INDEX: usize = 1;
pub(crate) const POOL_INDEX: usize = 0;

impl From<PumpSwapAmmSwap> for Vec<AccountMeta> {
    fn from(accounts: PumpSwapAmmSwap) -> Self {
        vec![
            AccountMeta::new_readonly(accounts.pool, false),
            AccountMeta::new(accounts.user, true),
            AccountMeta::new_readonly(accounts.global_config, false),
            AccountMeta::new_readonly(accounts.base_mint, false),
            AccountMeta::new_readonly(accounts.quote_mint, false),
            AccountMeta::new(accounts.user_base_token_account, false),
            AccountMeta::new(accounts.user_quote_token_account, false),
            AccountMeta::new(accounts.pool_base_token_account, false),
            AccountMeta::new(accounts.pool_quote_token_account, false),
            AccountMeta::new_readonly(accounts.protocol_fee_recipient, false),
            AccountMeta::new(accounts.protocol_fee_recipient_token_account, false),
            AccountMeta::new_readonly(accounts.base_token_program, false),
            AccountMeta::new_readonly(accounts.quote_token_program, false),
            AccountMeta::new_readonly(accounts.system_program, false),
            AccountMeta::new_readonly(accounts.associated_token_program, false),
            AccountMeta::new_readonly(accounts.event_authority, false),
            AccountMeta::new_readonly(accounts.program, false),
        ]
    }
}
