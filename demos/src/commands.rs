use std::str::FromStr;

use anyhow::{Context, Result};
use pumpswap_sdk::{
    FALLBACK_RPC_ENDPOINTS, PumpSwapSDK, SwapDirection, TransactionAnalysis, ui_amount_to_raw,
};
use solana_sdk::{
    commitment_config::CommitmentLevel,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::VersionedTransaction,
};

use crate::output;

pub async fn connect(rpc_endpoint: Option<&str>) -> Result<PumpSwapSDK> {
    match rpc_endpoint {
        Some(endpoint) => PumpSwapSDK::new(endpoint, CommitmentLevel::Confirmed),
        None => {
            log::info!("RPC_ENDPOINT not set, trying public endpoints");
            PumpSwapSDK::connect_with_fallback(&FALLBACK_RPC_ENDPOINTS, CommitmentLevel::Confirmed)
                .await
        }
    }
}

pub async fn quote(
    sdk: &mut PumpSwapSDK,
    pool: &Pubkey,
    direction: SwapDirection,
    amount: &str,
    slippage_bps: u64,
) -> Result<()> {
    let reserves = sdk.get_pool_reserves(pool).await?;
    let amount_in = ui_amount_to_raw(amount, sdk.pool().input_decimals(direction))?;
    let quote = sdk.quote(pool, direction, amount_in, slippage_bps).await?;

    output::print_quote(sdk.pool(), &reserves, &quote);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn swap(
    sdk: PumpSwapSDK,
    pool: &Pubkey,
    direction: SwapDirection,
    amount: &str,
    slippage_bps: u64,
    fee_recipient: Option<Pubkey>,
    private_key: &str,
    send: bool,
) -> Result<()> {
    let keypair = parse_keypair(private_key)?;
    let mut sdk = match fee_recipient {
        Some(recipient) => sdk.with_protocol_fee_recipient(recipient)?,
        None => sdk,
    };

    let (unsigned_tx, quote) = sdk
        .swap_tx(pool, direction, amount, slippage_bps, &keypair.pubkey())
        .await?;
    output::print_quote(sdk.pool(), &sdk.pool().reserve_snapshot(), &quote);

    let signed_tx = VersionedTransaction::try_new(unsigned_tx.message, &[&keypair])
        .context("Failed to sign swap transaction")?;

    if send {
        let signature = sdk
            .rpc_client()
            .send_and_confirm_transaction(&signed_tx)
            .await
            .context("Failed to send swap transaction")?;
        println!("Swap confirmed: {}", signature);
    } else {
        let simulation = sdk
            .rpc_client()
            .simulate_transaction(&signed_tx)
            .await
            .context("Failed to simulate swap transaction")?
            .value;
        match simulation.err {
            Some(err) => println!("Simulation failed: {}", err),
            None => println!(
                "Simulation succeeded ({} compute units); pass --send to submit",
                simulation.units_consumed.unwrap_or_default()
            ),
        }
        for line in simulation.logs.unwrap_or_default() {
            log::debug!("{}", line);
        }
    }

    Ok(())
}

pub async fn decode_pool(sdk: &mut PumpSwapSDK, pool: &Pubkey, limit: usize) -> Result<()> {
    let analyses = sdk.analyze_recent_pool_transactions(pool, limit).await?;
    if analyses.is_empty() {
        println!("No transactions found for pool {}", pool);
    }
    for analysis in &analyses {
        report(sdk, analysis).await;
    }
    Ok(())
}

pub async fn decode_tx(sdk: &mut PumpSwapSDK, signature: &str) -> Result<()> {
    let signature =
        Signature::from_str(signature).with_context(|| format!("Invalid signature: {}", signature))?;
    let analysis = sdk.analyze_signature(&signature).await?;
    report(sdk, &analysis).await;
    Ok(())
}

async fn report(sdk: &mut PumpSwapSDK, analysis: &TransactionAnalysis) {
    output::print_analysis(analysis);
    let reverted = analysis.succeeded() == Some(false);

    for summary in analysis.swaps() {
        let Some(base_mint) = summary.base_mint else {
            continue;
        };
        match sdk.get_token_info(&base_mint).await {
            Ok(info) => output::print_swap_summary(summary, Some(&info), reverted),
            Err(e) => {
                log::warn!("Token info for {} unavailable: {:#}", base_mint, e);
                output::print_swap_summary(summary, None, reverted);
            }
        }
    }
}

fn parse_keypair(private_key: &str) -> Result<Keypair> {
    let bytes = bs58::decode(private_key.trim())
        .into_vec()
        .context("PRIVATE_KEY is not valid base58")?;
    Keypair::from_bytes(&bytes).map_err(|e| anyhow::anyhow!("Invalid PRIVATE_KEY: {}", e))
}
