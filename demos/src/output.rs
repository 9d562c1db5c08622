use pumpswap_sdk::{
    InstructionKind, PumpSwapAmm, Quote, ReserveSnapshot, SwapDirection, SwapSummary, TokenInfo,
    TransactionAnalysis, raw_to_ui_amount,
};

const RULE: &str = "────────────────────────────────────────────────────────────";

pub fn print_quote(pool: &PumpSwapAmm, reserves: &ReserveSnapshot, quote: &Quote) {
    let (in_decimals, out_decimals) = match quote.direction {
        SwapDirection::Buy => (pool.quote_decimals, pool.base_decimals),
        SwapDirection::Sell => (pool.base_decimals, pool.quote_decimals),
    };

    println!("{}", RULE);
    println!("Pool:          {}", pool.key);
    println!(
        "Reserves:      {} base / {} quote",
        raw_to_ui_amount(reserves.base_reserve, pool.base_decimals),
        raw_to_ui_amount(reserves.quote_reserve, pool.quote_decimals)
    );
    println!("Direction:     {}", quote.direction);
    println!(
        "Amount in:     {} ({} raw)",
        raw_to_ui_amount(quote.in_amount, in_decimals),
        quote.in_amount
    );
    println!(
        "Expected out:  {} ({} raw)",
        raw_to_ui_amount(quote.out_amount, out_decimals),
        quote.out_amount
    );
    println!(
        "Minimum out:   {} ({} raw)",
        raw_to_ui_amount(quote.min_out_amount, out_decimals),
        quote.min_out_amount
    );
    println!(
        "Fee:           {} raw of {} ({}%)",
        quote.fee_amount,
        quote.fee_mint,
        quote.fee_pct.normalize()
    );
    println!("{}", RULE);
}

pub fn print_analysis(analysis: &TransactionAnalysis) {
    println!("{}", RULE);
    match analysis.slot {
        Some(slot) => println!("Transaction {} (slot {})", analysis.signature, slot),
        None => println!("Transaction {}", analysis.signature),
    }
    match &analysis.outcome {
        Some(outcome) => {
            match &outcome.err {
                None => println!("  status: success"),
                Some(err) => println!("  status: failed ({})", err),
            }
            println!(
                "  fee:    {} SOL",
                raw_to_ui_amount(outcome.fee, pumpswap_sdk::SOL_DECIMALS).normalize()
            );
        }
        None => println!("  status: unknown"),
    }

    if analysis.instructions.is_empty() {
        println!("  no PumpSwap instructions");
        return;
    }

    for instruction in &analysis.instructions {
        println!(
            "  #{} {} ({} bytes)",
            instruction.instruction_index,
            instruction.classified.kind,
            instruction.data.len()
        );
        if instruction.classified.kind == InstructionKind::TooShort {
            continue;
        }
        for account in &instruction.accounts {
            let key = account
                .pubkey
                .map(|key| key.to_string())
                .unwrap_or_else(|| "<unresolved>".to_string());
            println!("    {:>2} {:<32} {}", account.position, account.role, key);
        }
    }
}

pub fn print_swap_summary(summary: &SwapSummary, token: Option<&TokenInfo>, reverted: bool) {
    let label = token
        .and_then(|info| info.symbol.clone())
        .filter(|symbol| !symbol.is_empty())
        .unwrap_or_else(|| "tokens".to_string());
    let base_amount = match token.and_then(|info| info.decimals) {
        Some(decimals) => raw_to_ui_amount(summary.params.base_amount(), decimals).to_string(),
        None => summary.params.base_amount().to_string(),
    };
    let sol_amount = raw_to_ui_amount(summary.params.quote_amount(), pumpswap_sdk::SOL_DECIMALS);

    if reverted {
        println!("  {} (reverted, nothing was swapped)", summary.operation());
    } else {
        println!("  {}", summary.operation());
    }
    if let Some(user) = summary.user {
        println!("    user:  {}", user);
    }
    match summary.direction {
        SwapDirection::Buy => {
            println!("    receive at least {} {}", base_amount, label);
            println!("    spend at most    {} SOL", sol_amount);
        }
        SwapDirection::Sell => {
            println!("    sell             {} {}", base_amount, label);
            println!("    receive at least {} SOL", sol_amount);
        }
    }
    if let Some(name) = token.and_then(|info| info.name.as_deref()) {
        println!("    token: {}", name);
    }
}
