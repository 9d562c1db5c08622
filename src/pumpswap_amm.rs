use anchor_lang::prelude::*;

use crate::account_metas::PumpSwapAmmSwap;
use crate::amm::*;
use crate::constants::{EVENT_AUTHORITY, GLOBAL_CONFIG, PUMPSWAP_PROGRAM_ID};
use crate::instruction::SwapInstructionParams;
use crate::math::{ReserveSnapshot, SwapDirection, compute_swap_quote};
use crate::token_info::parse_mint_decimals;
use crate::utils::{get_user_token_account, validate_protocol_fee_recipient};

use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use solana_sdk::{program_pack::Pack, pubkey::Pubkey};
use spl_token::state::Account as SplTokenAccount;
use spl_token_2022::extension::StateWithExtensions;

#[derive(Clone, Debug)]
pub struct PumpSwapAmm {
    pub key: Pubkey,
    pub pool: Pool,
    pub base_reserve: u64,
    pub quote_reserve: u64,
    pub base_token_program: Pubkey,
    pub quote_token_program: Pubkey,
    pub base_decimals: u8,
    pub quote_decimals: u8,
}

/// On-chain pool account, after the 8-byte account discriminator
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq)]
pub struct Pool {
    pub pool_bump: u8,
    pub index: u16,
    pub creator: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub pool_base_token_account: Pubkey,
    pub pool_quote_token_account: Pubkey,
    pub lp_supply: u64,
}

impl Default for PumpSwapAmm {
    fn default() -> Self {
        Self::from_pool(Pubkey::default(), Pool::default())
    }
}

impl PumpSwapAmm {
    fn from_pool(key: Pubkey, pool: Pool) -> Self {
        PumpSwapAmm {
            key,
            pool,
            base_reserve: 0,
            quote_reserve: 0,
            base_token_program: spl_token::ID,
            quote_token_program: spl_token::ID,
            base_decimals: 0,
            quote_decimals: 0,
        }
    }

    pub fn decode_pool(data: &[u8]) -> Result<Pool> {
        let body = data
            .get(8..)
            .context("Pool account data shorter than discriminator")?;
        Ok(Pool::deserialize(&mut &body[..])?)
    }

    /// Decimals of the mint spent in `direction`
    pub fn input_decimals(&self, direction: SwapDirection) -> u8 {
        match direction {
            SwapDirection::Buy => self.quote_decimals,
            SwapDirection::Sell => self.base_decimals,
        }
    }

    pub fn reserve_snapshot(&self) -> ReserveSnapshot {
        ReserveSnapshot::new(self.base_reserve, self.quote_reserve)
    }

    fn input_mint(&self, direction: SwapDirection) -> Pubkey {
        match direction {
            SwapDirection::Buy => self.pool.quote_mint,
            SwapDirection::Sell => self.pool.base_mint,
        }
    }
}

impl Amm for PumpSwapAmm {
    fn load_pool(pool: &KeyedAccount) -> Result<Self>
    where
        Self: Sized,
    {
        if pool.account.owner != PUMPSWAP_PROGRAM_ID {
            bail!(
                "Account {} is owned by {}, not the PumpSwap program",
                pool.key,
                pool.account.owner
            );
        }

        Ok(Self::from_pool(
            pool.key,
            Self::decode_pool(&pool.account.data)?,
        ))
    }

    fn program_id(&self) -> Pubkey {
        PUMPSWAP_PROGRAM_ID
    }

    fn key(&self) -> Pubkey {
        self.key
    }

    fn get_reserve_mints(&self) -> Vec<Pubkey> {
        vec![self.pool.base_mint, self.pool.quote_mint]
    }

    fn get_accounts_to_update(&self) -> Vec<Pubkey> {
        vec![
            self.key,
            self.pool.base_mint, // mints (need owners and decimals)
            self.pool.quote_mint,
            self.pool.pool_base_token_account, // pool token reserves
            self.pool.pool_quote_token_account,
        ]
    }

    fn update(&mut self, account_map: &AccountMap) -> Result<()> {
        let account = account_map
            .get(&self.key)
            .context("PumpSwap pool account not found")?;

        self.pool = Self::decode_pool(&account.data)?;

        let reserve_keys = [
            self.pool.pool_base_token_account,
            self.pool.pool_quote_token_account,
        ];
        let found = reserve_keys
            .iter()
            .filter(|key| account_map.contains_key(key))
            .count();
        if found < reserve_keys.len() {
            bail!("Expected 2 reserve balances, got {}", found);
        }

        let (base_data, base_owner) =
            try_get_account_data_and_owner(account_map, &self.pool.pool_base_token_account)?;
        let (quote_data, quote_owner) =
            try_get_account_data_and_owner(account_map, &self.pool.pool_quote_token_account)?;

        self.base_reserve = Self::parse_token_account_balance(
            base_data,
            base_owner,
            &self.pool.pool_base_token_account,
        )?;
        self.quote_reserve = Self::parse_token_account_balance(
            quote_data,
            quote_owner,
            &self.pool.pool_quote_token_account,
        )?;

        let (base_mint_data, base_mint_owner) =
            try_get_account_data_and_owner(account_map, &self.pool.base_mint)?;
        let (quote_mint_data, quote_mint_owner) =
            try_get_account_data_and_owner(account_map, &self.pool.quote_mint)?;

        self.base_decimals = parse_mint_decimals(base_mint_data, base_mint_owner)?;
        self.quote_decimals = parse_mint_decimals(quote_mint_data, quote_mint_owner)?;
        self.base_token_program = *base_mint_owner;
        self.quote_token_program = *quote_mint_owner;

        Ok(())
    }

    fn reserves(&self) -> ReserveSnapshot {
        self.reserve_snapshot()
    }

    fn quote(&self, quote_params: &QuoteParams) -> Result<Quote> {
        let result = compute_swap_quote(
            quote_params.direction,
            quote_params.amount,
            self.reserves(),
            quote_params.fee_rate,
            quote_params.slippage_bps,
        )?;

        let fee_pct = Decimal::from(quote_params.fee_rate.numerator)
            .checked_div(Decimal::from(quote_params.fee_rate.denominator))
            .unwrap_or_default()
            * Decimal::ONE_HUNDRED;

        Ok(Quote::from_result(
            quote_params.direction,
            quote_params.amount,
            self.input_mint(quote_params.direction),
            fee_pct,
            result,
        ))
    }

    fn get_swap_and_account_metas(&self, swap_params: &SwapParams) -> Result<SwapAndAccountMetas> {
        let SwapParams {
            direction,
            user,
            in_amount,
            min_out,
            protocol_fee_recipient,
        } = *swap_params;

        validate_protocol_fee_recipient(&protocol_fee_recipient)?;

        let user_base_token_account =
            get_user_token_account(&user, &self.pool.base_mint, &self.base_token_program);
        let user_quote_token_account =
            get_user_token_account(&user, &self.pool.quote_mint, &self.quote_token_program);
        let protocol_fee_recipient_token_account = get_user_token_account(
            &protocol_fee_recipient,
            &self.pool.quote_mint,
            &self.quote_token_program,
        );

        let swap = SwapInstructionParams::exact_in(direction, in_amount, min_out);
        let data = swap.to_data();
        let mut discriminator = [0u8; 8];
        discriminator.copy_from_slice(&data[..8]);

        Ok(SwapAndAccountMetas {
            discriminator,
            swap,
            data,
            account_metas: PumpSwapAmmSwap {
                pool: self.key,
                user,
                global_config: GLOBAL_CONFIG,
                base_mint: self.pool.base_mint,
                quote_mint: self.pool.quote_mint,
                user_base_token_account,
                user_quote_token_account,
                pool_base_token_account: self.pool.pool_base_token_account,
                pool_quote_token_account: self.pool.pool_quote_token_account,
                protocol_fee_recipient,
                protocol_fee_recipient_token_account,
                base_token_program: self.base_token_program,
                quote_token_program: self.quote_token_program,
                system_program: solana_sdk::system_program::ID,
                associated_token_program: spl_associated_token_account::ID,
                event_authority: EVENT_AUTHORITY,
                program: PUMPSWAP_PROGRAM_ID,
            }
            .into(),
        })
    }

    fn is_active(&self) -> bool {
        self.base_reserve > 0 && self.quote_reserve > 0
    }
}

impl PumpSwapAmm {
    /// Parse token account balance reliably for both SPL and Token2022 tokens
    pub(crate) fn parse_token_account_balance(
        account_data: &[u8],
        account_owner: &Pubkey,
        token_account_pubkey: &Pubkey,
    ) -> Result<u64> {
        match account_owner {
            owner if *owner == spl_token::ID => {
                let token_account = SplTokenAccount::unpack(account_data)?;
                Ok(token_account.amount)
            }
            owner if *owner == spl_token_2022::ID => {
                let token_account =
                    StateWithExtensions::<spl_token_2022::state::Account>::unpack(account_data)?;
                Ok(token_account.base.amount)
            }
            _ => {
                bail!(
                    "Unknown token program: {} for account {}",
                    account_owner,
                    token_account_pubkey
                );
            }
        }
    }
}
