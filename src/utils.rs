use std::future::Future;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_instruction};
use spl_token::native_mint;
use tokio::time::{Duration, sleep};

use crate::constants::PROTOCOL_FEE_RECIPIENT_SET;

/// Convert a decimal UI amount ("0.05") into raw base units, truncating
/// digits beyond `decimals`
pub fn ui_amount_to_raw(amount: &str, decimals: u8) -> Result<u64> {
    let ui_amount = Decimal::from_str(amount.trim())
        .with_context(|| format!("Invalid amount: {}", amount))?;
    if ui_amount.is_sign_negative() {
        bail!("Amount must not be negative: {}", amount);
    }

    let scale = 10u64
        .checked_pow(u32::from(decimals))
        .context("Too many decimals")?;
    ui_amount
        .checked_mul(Decimal::from(scale))
        .and_then(|raw| raw.trunc().to_u64())
        .with_context(|| format!("Amount {} does not fit in u64 base units", amount))
}

/// Format raw base units as a decimal UI amount
pub fn raw_to_ui_amount(raw: u64, decimals: u8) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(raw), u32::from(decimals))
}

pub fn get_user_token_account(user: &Pubkey, token_mint: &Pubkey, token_program: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[user.as_ref(), token_program.as_ref(), token_mint.as_ref()],
        &spl_associated_token_account::ID,
    )
    .0
}

pub fn get_create_token_account_instruction(
    owner: &Pubkey,
    token_mint: &Pubkey,
    token_program: &Pubkey,
) -> Instruction {
    spl_associated_token_account::instruction::create_associated_token_account_idempotent(
        owner,
        owner,
        token_mint,
        token_program,
    )
}

/// Create the WSOL account, fund it with `amount` lamports and sync it
pub fn get_wrap_sol_to_wsol_instructions(owner: &Pubkey, amount: u64) -> Result<Vec<Instruction>> {
    let wsol_account = get_user_token_account(owner, &native_mint::ID, &spl_token::ID);

    Ok(vec![
        get_create_token_account_instruction(owner, &native_mint::ID, &spl_token::ID),
        system_instruction::transfer(owner, &wsol_account, amount),
        spl_token::instruction::sync_native(&spl_token::ID, &wsol_account)?,
    ])
}

/// Close the WSOL account back into native SOL
pub fn get_close_wsol_instructions(owner: &Pubkey) -> Result<Vec<Instruction>> {
    let wsol_account = get_user_token_account(owner, &native_mint::ID, &spl_token::ID);

    Ok(vec![spl_token::instruction::close_account(
        &spl_token::ID,
        &wsol_account,
        owner,
        owner,
        &[],
    )?])
}

pub fn validate_protocol_fee_recipient(recipient: &Pubkey) -> Result<()> {
    if !PROTOCOL_FEE_RECIPIENT_SET.contains(recipient) {
        bail!("Invalid protocol fee recipient: {}", recipient);
    }
    Ok(())
}

/// Run `operation` up to `attempts` times, sleeping `attempt * base_delay`
/// between failures
pub async fn retry_with_backoff<T, E, F, Fut>(
    label: &str,
    attempts: u32,
    base_delay: Duration,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Into<anyhow::Error> + std::fmt::Display,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                let delay = base_delay * attempt;
                log::warn!(
                    "Attempt {} of {} failed: {}. Retrying in {:?}...",
                    attempt,
                    label,
                    e,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                let err: anyhow::Error = e.into();
                return Err(err.context(format!("{} failed after {} attempts", label, attempts)));
            }
        }
    }
}
