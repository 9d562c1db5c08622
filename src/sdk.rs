use std::str::FromStr;

use solana_rpc_client::nonblocking::rpc_client::RpcClient;
use solana_rpc_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_rpc_client_api::config::RpcTransactionConfig;
use solana_transaction_status::{UiTransactionEncoding, option_serializer::OptionSerializer};

use crate::{
    amm::{AccountData, Amm, KeyedAccount, Quote, QuoteParams, SwapParams},
    analyzer::{TransactionAnalysis, TransactionOutcome, analyze_transaction},
    constants::{
        PROTOCOL_FEE_RECIPIENTS, SOL_MINT, SWAP_COMPUTE_UNIT_LIMIT, SWAP_COMPUTE_UNIT_PRICE,
    },
    math::{FeeRate, ReserveSnapshot, SwapDirection},
    pumpswap_amm::{Pool, PumpSwapAmm},
    token_info::{TokenInfo, TokenInfoCache, build_token_info, get_metadata_address},
    utils::{
        get_close_wsol_instructions, get_create_token_account_instruction,
        get_wrap_sol_to_wsol_instructions, retry_with_backoff, ui_amount_to_raw,
        validate_protocol_fee_recipient,
    },
};
use anyhow::{Context, Result, bail};
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    compute_budget::ComputeBudgetInstruction,
    instruction::Instruction,
    message::{VersionedMessage, v0, v0::LoadedAddresses},
    pubkey::Pubkey,
    signature::Signature,
    transaction::VersionedTransaction,
};
use std::collections::HashMap;
use tokio::time::Duration;

const RPC_RETRY_ATTEMPTS: u32 = 3;
const RPC_RETRY_DELAY: Duration = Duration::from_secs(1);

pub const DEFAULT_SIGNATURE_LIMIT: usize = 10;

/// A transaction fetched from RPC, decoded and with its lookup-table keys
#[derive(Debug, Clone)]
pub struct FetchedTransaction {
    pub slot: u64,
    pub transaction: VersionedTransaction,
    pub loaded_addresses: LoadedAddresses,
    /// `None` when the node returned no status meta
    pub outcome: Option<TransactionOutcome>,
}

pub struct PumpSwapSDK {
    rpc_client: RpcClient,
    pumpswap_amm: PumpSwapAmm,
    commitment: CommitmentConfig,
    fee_rate: FeeRate,
    protocol_fee_recipient: Pubkey,
    token_info_cache: TokenInfoCache,
}

impl PumpSwapSDK {
    /// Create a new PumpSwap SDK instance
    pub fn new(rpc_endpoint: &str, commitment_level: CommitmentLevel) -> Result<Self> {
        if rpc_endpoint.trim().is_empty() {
            bail!("RPC endpoint must not be empty");
        }

        let commitment_config = CommitmentConfig {
            commitment: commitment_level,
        };

        Ok(Self {
            rpc_client: RpcClient::new_with_commitment(rpc_endpoint.to_string(), commitment_config),
            pumpswap_amm: PumpSwapAmm::default(),
            commitment: commitment_config,
            fee_rate: FeeRate::DEFAULT,
            protocol_fee_recipient: PROTOCOL_FEE_RECIPIENTS[0],
            token_info_cache: TokenInfoCache::new(),
        })
    }

    /// Connect to the first endpoint that answers `getVersion`
    ///
    /// # Arguments
    /// * `endpoints` - Candidate RPC urls, tried in order
    /// * `commitment_level` - The commitment level for RPC calls
    pub async fn connect_with_fallback(
        endpoints: &[&str],
        commitment_level: CommitmentLevel,
    ) -> Result<Self> {
        for endpoint in endpoints {
            let sdk = Self::new(endpoint, commitment_level)?;
            match sdk.rpc_client.get_version().await {
                Ok(version) => {
                    log::info!("Connected to {} (solana-core {})", endpoint, version.solana_core);
                    return Ok(sdk);
                }
                Err(e) => log::warn!("RPC endpoint {} unavailable: {}", endpoint, e),
            }
        }
        bail!("No RPC endpoint available out of {}", endpoints.len())
    }

    /// Override the trade fee used for quotes
    pub fn with_fee_rate(mut self, fee_rate: FeeRate) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    /// Use a different protocol fee recipient; it must be on the allow-list
    pub fn with_protocol_fee_recipient(mut self, recipient: Pubkey) -> Result<Self> {
        validate_protocol_fee_recipient(&recipient)?;
        self.protocol_fee_recipient = recipient;
        Ok(self)
    }

    pub fn rpc_client(&self) -> &RpcClient {
        &self.rpc_client
    }

    /// The currently loaded pool state
    pub fn pool(&self) -> &PumpSwapAmm {
        &self.pumpswap_amm
    }

    /// Load a pool for internal state tracking
    ///
    /// # Arguments
    /// * `pool_key` - The pool account address
    ///
    /// # Returns
    /// Returns the decoded `Pool`
    pub async fn load_pool(&mut self, pool_key: &Pubkey) -> Result<Pool> {
        let pool_account = self
            .rpc_client
            .get_account(pool_key)
            .await
            .map_err(|_| anyhow::anyhow!("Pool not found: {}", pool_key))?;

        let pool_key_and_account = KeyedAccount {
            key: *pool_key,
            account: AccountData {
                data: pool_account.data,
                owner: pool_account.owner,
            },
        };

        self.pumpswap_amm = PumpSwapAmm::load_pool(&pool_key_and_account)?;
        log::debug!(
            "Loaded pool {} with reserve mints {:?}",
            pool_key,
            self.pumpswap_amm.get_reserve_mints()
        );

        Ok(self.pumpswap_amm.pool.clone())
    }

    /// Update account data from the blockchain
    ///
    /// Fetches the pool, both mints and both reserve accounts in a single
    /// `getMultipleAccounts` call so the reserves come from the same slot.
    pub async fn update_accounts(&mut self) -> Result<()> {
        let accounts_to_update = self.pumpswap_amm.get_accounts_to_update();
        let accounts = self
            .rpc_client
            .get_multiple_accounts(&accounts_to_update)
            .await
            .context("Failed to fetch pool accounts")?;

        let mut account_map = HashMap::new();
        for (account_key, account) in accounts_to_update.into_iter().zip(accounts) {
            if let Some(account) = account {
                account_map.insert(
                    account_key,
                    AccountData {
                        data: account.data,
                        owner: account.owner,
                    },
                );
            }
        }
        self.pumpswap_amm.update(&account_map)?;
        if !self.pumpswap_amm.is_active() {
            log::warn!("Pool {} has an empty reserve", self.pumpswap_amm.key());
        }

        Ok(())
    }

    async fn ensure_pool(&mut self, pool_key: &Pubkey) -> Result<()> {
        if self.pumpswap_amm.key() != *pool_key {
            self.load_pool(pool_key).await?;
        }
        self.update_accounts().await
    }

    /// Fetch the pool's current (base, quote) reserves
    pub async fn get_pool_reserves(&mut self, pool_key: &Pubkey) -> Result<ReserveSnapshot> {
        self.ensure_pool(pool_key).await?;
        Ok(self.pumpswap_amm.reserves())
    }

    /// Get a quote for a swap
    ///
    /// # Arguments
    /// * `pool_key` - The pool to trade against
    /// * `direction` - Buy (SOL in) or Sell (token in)
    /// * `amount_in` - The raw amount of input tokens
    /// * `slippage_bps` - Tolerated slippage in basis points
    ///
    /// # Returns
    /// Returns a `Quote` with the exact and minimum output amounts
    pub async fn quote(
        &mut self,
        pool_key: &Pubkey,
        direction: SwapDirection,
        amount_in: u64,
        slippage_bps: u64,
    ) -> Result<Quote> {
        self.ensure_pool(pool_key).await?;

        self.pumpswap_amm
            .quote(&self.quote_params(direction, amount_in, slippage_bps))
    }

    fn quote_params(&self, direction: SwapDirection, amount: u64, slippage_bps: u64) -> QuoteParams {
        QuoteParams {
            direction,
            amount,
            fee_rate: self.fee_rate,
            slippage_bps,
        }
    }

    /// Create a swap instruction against the loaded pool
    ///
    /// # Arguments
    /// * `swap_params` - The swap parameters
    ///
    /// # Returns
    /// Returns a `Instruction` ready to be added to a transaction
    pub fn swap_ix(&self, swap_params: &SwapParams) -> Result<Instruction> {
        let swap_and_account_metas = self
            .pumpswap_amm
            .get_swap_and_account_metas(swap_params)
            .context("Failed to get swap instruction and account metadata")?;
        log::debug!(
            "Swap instruction {} {:?}",
            hex::encode(swap_and_account_metas.discriminator),
            swap_and_account_metas.swap
        );

        Ok(Instruction {
            program_id: self.pumpswap_amm.program_id(),
            accounts: swap_and_account_metas.account_metas,
            data: swap_and_account_metas.data,
        })
    }

    /// Build a swap transaction
    ///
    /// # Arguments
    /// * `pool_key` - The pool to trade against
    /// * `direction` - Buy (SOL in) or Sell (token in)
    /// * `ui_amount_in` - Decimal input amount, e.g. "0.05" SOL
    /// * `slippage_bps` - Tolerated slippage in basis points
    /// * `user` - The token owner and fee payer
    ///
    /// # Returns
    /// Returns an unsigned `VersionedTransaction` and the `Quote` it was built from
    pub async fn swap_tx(
        &mut self,
        pool_key: &Pubkey,
        direction: SwapDirection,
        ui_amount_in: &str,
        slippage_bps: u64,
        user: &Pubkey,
    ) -> Result<(VersionedTransaction, Quote)> {
        self.ensure_pool(pool_key).await?;

        let amount_in = ui_amount_to_raw(ui_amount_in, self.pumpswap_amm.input_decimals(direction))?;
        let quote = self
            .pumpswap_amm
            .quote(&self.quote_params(direction, amount_in, slippage_bps))?;
        log::info!(
            "Quoted {} of {} in: exact out {}, min out {}",
            direction,
            amount_in,
            quote.out_amount,
            quote.min_out_amount
        );

        let swap_instruction = self.swap_ix(&SwapParams {
            direction,
            user: *user,
            in_amount: amount_in,
            min_out: quote.min_out_amount,
            protocol_fee_recipient: self.protocol_fee_recipient,
        })?;

        let instructions = self.assemble_swap_instructions(direction, amount_in, user, swap_instruction)?;

        let recent_blockhash = self.rpc_client.get_latest_blockhash().await?;
        let message_v0 = v0::Message::try_compile(user, &instructions, &[], recent_blockhash)?;

        let swap_transaction = VersionedTransaction {
            signatures: vec![],
            message: VersionedMessage::V0(message_v0),
        };

        Ok((swap_transaction, quote))
    }

    /// Compute budget, output account creation and SOL wrapping around `swap_instruction`
    pub(crate) fn assemble_swap_instructions(
        &self,
        direction: SwapDirection,
        amount_in: u64,
        user: &Pubkey,
        swap_instruction: Instruction,
    ) -> Result<Vec<Instruction>> {
        let pool = &self.pumpswap_amm.pool;
        let quote_is_wsol = pool.quote_mint == SOL_MINT;

        let mut instructions = vec![
            ComputeBudgetInstruction::set_compute_unit_limit(SWAP_COMPUTE_UNIT_LIMIT),
            ComputeBudgetInstruction::set_compute_unit_price(SWAP_COMPUTE_UNIT_PRICE),
        ];

        match direction {
            SwapDirection::Buy => {
                instructions.push(get_create_token_account_instruction(
                    user,
                    &pool.base_mint,
                    &self.pumpswap_amm.base_token_program,
                ));
                if quote_is_wsol {
                    instructions.extend(get_wrap_sol_to_wsol_instructions(user, amount_in)?);
                }
            }
            SwapDirection::Sell => {
                instructions.push(get_create_token_account_instruction(
                    user,
                    &pool.quote_mint,
                    &self.pumpswap_amm.quote_token_program,
                ));
            }
        }

        instructions.push(swap_instruction);

        if quote_is_wsol {
            instructions.extend(get_close_wsol_instructions(user)?);
        }

        Ok(instructions)
    }

    /// Most recent transaction signatures touching `pool_key`, newest first
    pub async fn recent_pool_signatures(
        &self,
        pool_key: &Pubkey,
        limit: usize,
    ) -> Result<Vec<Signature>> {
        let rpc = &self.rpc_client;
        let commitment = self.commitment;
        let statuses = retry_with_backoff(
            "get signatures for address",
            RPC_RETRY_ATTEMPTS,
            RPC_RETRY_DELAY,
            move || {
                rpc.get_signatures_for_address_with_config(
                    pool_key,
                    GetConfirmedSignaturesForAddress2Config {
                        before: None,
                        until: None,
                        limit: Some(limit),
                        commitment: Some(commitment),
                    },
                )
            },
        )
        .await?;

        statuses
            .iter()
            .map(|status| {
                Signature::from_str(&status.signature)
                    .with_context(|| format!("Invalid signature from RPC: {}", status.signature))
            })
            .collect()
    }

    /// Fetch a transaction as base64 and decode it, including lookup-table keys
    pub async fn fetch_transaction(&self, signature: &Signature) -> Result<FetchedTransaction> {
        let rpc = &self.rpc_client;
        let commitment = self.commitment;
        let confirmed = retry_with_backoff(
            "get transaction",
            RPC_RETRY_ATTEMPTS,
            RPC_RETRY_DELAY,
            move || {
                rpc.get_transaction_with_config(
                    signature,
                    RpcTransactionConfig {
                        encoding: Some(UiTransactionEncoding::Base64),
                        commitment: Some(commitment),
                        max_supported_transaction_version: Some(0),
                    },
                )
            },
        )
        .await?;

        let transaction = confirmed
            .transaction
            .transaction
            .decode()
            .with_context(|| format!("Failed to decode transaction {}", signature))?;

        let meta = confirmed.transaction.meta;
        let outcome = meta.as_ref().map(|meta| TransactionOutcome {
            err: meta.err.clone(),
            fee: meta.fee,
        });

        let loaded_addresses = match meta.map(|meta| meta.loaded_addresses) {
            Some(OptionSerializer::Some(loaded)) => LoadedAddresses {
                writable: parse_pubkeys(&loaded.writable)?,
                readonly: parse_pubkeys(&loaded.readonly)?,
            },
            _ => LoadedAddresses::default(),
        };

        Ok(FetchedTransaction {
            slot: confirmed.slot,
            transaction,
            loaded_addresses,
            outcome,
        })
    }

    /// Fetch `signature` and decode its PumpSwap instructions
    pub async fn analyze_signature(&self, signature: &Signature) -> Result<TransactionAnalysis> {
        let fetched = self.fetch_transaction(signature).await?;
        Ok(analyze_transaction(
            &signature.to_string(),
            Some(fetched.slot),
            fetched.outcome,
            &fetched.transaction,
            &fetched.loaded_addresses,
        ))
    }

    /// Analyze the latest `limit` transactions of a pool
    ///
    /// Transactions that fail to fetch are logged and skipped.
    pub async fn analyze_recent_pool_transactions(
        &self,
        pool_key: &Pubkey,
        limit: usize,
    ) -> Result<Vec<TransactionAnalysis>> {
        let signatures = self.recent_pool_signatures(pool_key, limit).await?;
        log::info!("Found {} signatures for pool {}", signatures.len(), pool_key);

        let mut analyses = Vec::with_capacity(signatures.len());
        for signature in signatures {
            match self.analyze_signature(&signature).await {
                Ok(analysis) => analyses.push(analysis),
                Err(e) => log::warn!("Skipping {}: {:#}", signature, e),
            }
        }
        Ok(analyses)
    }

    /// Mint decimals and Metaplex metadata for `mint`, cached per SDK instance
    pub async fn get_token_info(&mut self, mint: &Pubkey) -> Result<TokenInfo> {
        if let Some(info) = self.token_info_cache.get(mint) {
            return Ok(info.clone());
        }

        let metadata_address = get_metadata_address(mint);
        let accounts = self
            .rpc_client
            .get_multiple_accounts(&[*mint, metadata_address])
            .await
            .with_context(|| format!("Failed to fetch token accounts for {}", mint))?;

        let mint_account = accounts.first().and_then(|account| account.as_ref());
        let metadata_account = accounts.get(1).and_then(|account| account.as_ref());

        let info = build_token_info(
            *mint,
            mint_account.map(|account| (account.data.as_slice(), &account.owner)),
            metadata_account.map(|account| account.data.as_slice()),
        );
        self.token_info_cache.insert(info.clone());

        Ok(info)
    }
}

fn parse_pubkeys(keys: &[String]) -> Result<Vec<Pubkey>> {
    keys.iter()
        .map(|key| Pubkey::from_str(key).with_context(|| format!("Invalid pubkey: {}", key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PUMPSWAP_PROGRAM_ID;
    use crate::utils::get_user_token_account;
    use solana_sdk::compute_budget;

    fn sdk_with_pool(quote_mint: Pubkey) -> PumpSwapSDK {
        let mut sdk = PumpSwapSDK::new("http://localhost:8899", CommitmentLevel::Confirmed).unwrap();
        sdk.pumpswap_amm.key = Pubkey::new_unique();
        sdk.pumpswap_amm.pool = Pool {
            base_mint: Pubkey::new_unique(),
            quote_mint,
            pool_base_token_account: Pubkey::new_unique(),
            pool_quote_token_account: Pubkey::new_unique(),
            ..Pool::default()
        };
        sdk
    }

    fn swap_for(sdk: &PumpSwapSDK, direction: SwapDirection, user: &Pubkey) -> Instruction {
        sdk.swap_ix(&SwapParams {
            direction,
            user: *user,
            in_amount: 50_000,
            min_out: 1_000,
            protocol_fee_recipient: sdk.protocol_fee_recipient,
        })
        .unwrap()
    }

    fn programs(instructions: &[Instruction]) -> Vec<Pubkey> {
        instructions.iter().map(|ix| ix.program_id).collect()
    }

    #[tokio::test]
    async fn buy_wraps_sol_and_closes_wsol() {
        let sdk = sdk_with_pool(SOL_MINT);
        let user = Pubkey::new_unique();
        let swap = swap_for(&sdk, SwapDirection::Buy, &user);

        let instructions = sdk
            .assemble_swap_instructions(SwapDirection::Buy, 50_000, &user, swap.clone())
            .unwrap();

        assert_eq!(
            programs(&instructions),
            vec![
                compute_budget::ID,
                compute_budget::ID,
                spl_associated_token_account::ID,
                spl_associated_token_account::ID,
                solana_sdk::system_program::ID,
                spl_token::ID,
                PUMPSWAP_PROGRAM_ID,
                spl_token::ID,
            ]
        );
        // base token ATA first, then the WSOL account
        assert_eq!(
            instructions[2].accounts[1].pubkey,
            get_user_token_account(&user, &sdk.pumpswap_amm.pool.base_mint, &spl_token::ID)
        );
        assert_eq!(instructions[6], swap);
    }

    #[tokio::test]
    async fn sell_creates_quote_account_and_closes_wsol() {
        let sdk = sdk_with_pool(SOL_MINT);
        let user = Pubkey::new_unique();
        let swap = swap_for(&sdk, SwapDirection::Sell, &user);

        let instructions = sdk
            .assemble_swap_instructions(SwapDirection::Sell, 50_000, &user, swap)
            .unwrap();

        assert_eq!(
            programs(&instructions),
            vec![
                compute_budget::ID,
                compute_budget::ID,
                spl_associated_token_account::ID,
                PUMPSWAP_PROGRAM_ID,
                spl_token::ID,
            ]
        );
        assert_eq!(
            instructions[2].accounts[1].pubkey,
            get_user_token_account(&user, &SOL_MINT, &spl_token::ID)
        );
    }

    #[tokio::test]
    async fn non_wsol_quote_skips_wrapping() {
        let sdk = sdk_with_pool(Pubkey::new_unique());
        let user = Pubkey::new_unique();
        let swap = swap_for(&sdk, SwapDirection::Buy, &user);

        let instructions = sdk
            .assemble_swap_instructions(SwapDirection::Buy, 50_000, &user, swap)
            .unwrap();
        assert_eq!(instructions.len(), 4);
        assert_eq!(instructions[3].program_id, PUMPSWAP_PROGRAM_ID);
    }

    #[tokio::test]
    async fn fee_recipient_must_be_allowed() {
        let sdk = PumpSwapSDK::new("http://localhost:8899", CommitmentLevel::Confirmed).unwrap();
        assert!(sdk.with_protocol_fee_recipient(Pubkey::new_unique()).is_err());

        let sdk = PumpSwapSDK::new("http://localhost:8899", CommitmentLevel::Confirmed).unwrap();
        let sdk = sdk
            .with_protocol_fee_recipient(PROTOCOL_FEE_RECIPIENTS[6])
            .unwrap();
        assert_eq!(sdk.protocol_fee_recipient, PROTOCOL_FEE_RECIPIENTS[6]);
    }

    #[tokio::test]
    async fn configured_fee_rate_reaches_the_quote() {
        let mut sdk = sdk_with_pool(SOL_MINT).with_fee_rate(FeeRate::ZERO);
        sdk.pumpswap_amm.base_reserve = 1_000;
        sdk.pumpswap_amm.quote_reserve = 1_000;

        let params = sdk.quote_params(SwapDirection::Buy, 1_000, 0);
        assert_eq!(params.fee_rate, FeeRate::ZERO);

        let quote = sdk.pumpswap_amm.quote(&params).unwrap();
        assert_eq!(quote.out_amount, 500);
        assert_eq!(quote.fee_amount, 0);

        let sdk = sdk.with_fee_rate(FeeRate::from_basis_points(25));
        let quote = sdk
            .pumpswap_amm
            .quote(&sdk.quote_params(SwapDirection::Buy, 1_000, 0))
            .unwrap();
        assert_eq!(quote.fee_amount, 2);
        assert!(quote.out_amount < 500);
    }

    #[test]
    fn empty_endpoint_is_rejected() {
        assert!(PumpSwapSDK::new("  ", CommitmentLevel::Confirmed).is_err());
    }
}
