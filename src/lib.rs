//! # PumpSwap SDK
//!
//! A standalone SDK for quoting, building and decoding swaps on PumpSwap constant-product pools
//! on Solana. It offers two layers:
//!
//! 1. **Pure functions**: [`compute_swap_quote`] and [`classify`] need no network and are safe to
//!    call from any thread
//! 2. **[`PumpSwapSDK`]**: an RPC-backed client that loads pool state, builds unsigned swap
//!    transactions and analyzes historical pool transactions
//!
//! ## Internal State Management
//!
//! The SDK tracks one pool at a time:
//! - **`load_pool`**: Loads the pool account for internal state tracking
//! - **`update_accounts`**: Refreshes pool, mint and reserve accounts in one `getMultipleAccounts` call
//! - **`quote`** / **`swap_tx`**: Load the pool when it differs from the tracked one, then refresh
//!
//! ## 🚀 Quick Start
//!
//! ### Installation
//!
//! ```toml
//! [dependencies]
//! pumpswap-sdk = "0.1.0"
//! ```
//!
//! ### Quoting offline
//!
//! ```rust
//! use pumpswap_sdk::{FeeRate, ReserveSnapshot, SwapDirection, compute_swap_quote};
//!
//! // Spend 100_000 lamports against 5M base units and 1M lamports of reserves
//! let quote = compute_swap_quote(
//!     SwapDirection::Buy,
//!     100_000,
//!     ReserveSnapshot::new(5_000_000, 1_000_000),
//!     FeeRate::DEFAULT, // 2500 / 1_000_000
//!     100,              // 1% slippage
//! )
//! .unwrap();
//!
//! assert_eq!(quote.exact_amount_out, 453_512);
//! assert_eq!(quote.min_amount_out, 448_977);
//! ```
//!
//! ### Decoding instruction data
//!
//! ```rust
//! use pumpswap_sdk::{InstructionKind, KnownInstruction, SwapInstructionParams, classify};
//!
//! let mut data = vec![102, 6, 61, 18, 1, 218, 235, 234];
//! data.extend_from_slice(&1_000u64.to_le_bytes());
//! data.extend_from_slice(&50_000u64.to_le_bytes());
//!
//! let classified = classify(&data);
//! assert_eq!(classified.kind, InstructionKind::Known(KnownInstruction::Buy));
//! assert_eq!(
//!     classified.params,
//!     Some(SwapInstructionParams::Buy { base_amount_out: 1_000, max_quote_amount_in: 50_000 })
//! );
//! ```
//!
//! ### Building a swap
//!
//! ```rust,no_run
//! use pumpswap_sdk::{PumpSwapSDK, SwapDirection, DEFAULT_POOL};
//! use solana_sdk::commitment_config::CommitmentLevel;
//! use solana_sdk::signature::{Keypair, Signer};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let user = Keypair::new();
//! let mut sdk = PumpSwapSDK::new("https://api.mainnet-beta.solana.com", CommitmentLevel::Confirmed)?;
//!
//! // 0.05 SOL in, 1% slippage; the transaction is returned unsigned
//! let (swap_tx, quote) = sdk
//!     .swap_tx(&DEFAULT_POOL, SwapDirection::Buy, "0.05", 100, &user.pubkey())
//!     .await?;
//! println!("min out {}", quote.min_out_amount);
//! # let _ = swap_tx;
//! # Ok(())
//! # }
//! ```
//!
//! ## ⚠️ SOL/WSOL Handling
//!
//! PumpSwap pools hold WSOL on the quote side. `swap_tx` wraps SOL before a buy and closes the
//! WSOL account after the swap so leftover or received WSOL returns to the wallet as SOL.
//! `swap_ix` emits only the swap instruction.
//!
//! ## Quote Conventions
//!
//! - Fees are fractions; the canonical denominator is 1,000,000 ([`FeeRate::DEFAULT`] is 0.25%).
//!   [`FeeRate::from_basis_points`] expresses the same rate over 10,000.
//! - Slippage is in basis points of the exact output.
//! - Arithmetic is exact; both outputs are floored once at the end.
//! - A zero exact or minimum output is [`QuoteError::InsufficientLiquidity`], never a `(0, 0)` quote.
//!
//! ## Swap Encoding
//!
//! Swaps are exact-in. A buy sends `base_amount_out = min_out` and `max_quote_amount_in = amount_in`;
//! a sell sends `base_amount_in = amount_in` and `min_quote_amount_out = min_out`.
//!
//! ## 📄 License
//!
//! MIT License

mod account_metas;
mod amm; // Private module - users should use re-exported types
mod analyzer;
mod constants;
mod error;
mod instruction;
mod math;
mod pumpswap_amm;
mod sdk;
mod token_info;
mod utils;

pub use sdk::{DEFAULT_SIGNATURE_LIMIT, FetchedTransaction, PumpSwapSDK};

pub use error::QuoteError;

pub use math::{
    FEE_RATE_DENOMINATOR, FeeRate, QuoteResult, ReserveSnapshot, SwapDirection, compute_swap_quote,
};

pub use instruction::{
    BUY_DISCRIMINATOR, CREATE_POOL_DISCRIMINATOR, ClassifiedInstruction, DISCRIMINATOR_REGISTRY,
    InstructionKind, KnownInstruction, SELL_DISCRIMINATOR, SwapInstructionParams, classify,
};

pub use analyzer::{
    AccountRole, PumpSwapInstruction, SwapSummary, TransactionAnalysis, TransactionOutcome,
    analyze_transaction, resolve_account_keys,
};

pub use account_metas::SWAP_ACCOUNT_ROLES;

// Re-export commonly used AMM types for easier access
pub use amm::{Quote, SwapParams};

pub use pumpswap_amm::{Pool, PumpSwapAmm};

pub use token_info::{
    TokenInfo, TokenInfoCache, TokenMetadata, decode_metadata, get_metadata_address,
};

pub use utils::{raw_to_ui_amount, ui_amount_to_raw};

pub use constants::{
    DEFAULT_POOL, EVENT_AUTHORITY, FALLBACK_RPC_ENDPOINTS, GLOBAL_CONFIG, PROTOCOL_FEE_RECIPIENTS,
    PUMPSWAP_PROGRAM_ID, SOL_DECIMALS,
};
