use anchor_lang::AnchorSerialize;
use assert_matches::assert_matches;
use pumpswap_sdk::{
    BUY_DISCRIMINATOR, CREATE_POOL_DISCRIMINATOR, DISCRIMINATOR_REGISTRY, FeeRate,
    InstructionKind, KnownInstruction, PUMPSWAP_PROGRAM_ID, Pool, PumpSwapAmm, QuoteError,
    ReserveSnapshot, SELL_DISCRIMINATOR, SWAP_ACCOUNT_ROLES, SwapDirection, SwapInstructionParams,
    classify, compute_swap_quote, raw_to_ui_amount, ui_amount_to_raw,
};
use solana_sdk::pubkey::Pubkey;

#[test]
fn test_pumpswap_program_id() {
    assert_eq!(
        PUMPSWAP_PROGRAM_ID.to_string(),
        "pAMMBay6oceH9fJKBRHGP5D4bD4sWpmSwMn52FMfXEA"
    );
}

#[test]
fn test_buy_quote_reference_values() {
    let quote = compute_swap_quote(
        SwapDirection::Buy,
        100_000,
        ReserveSnapshot::new(5_000_000, 1_000_000),
        FeeRate::DEFAULT,
        100,
    )
    .unwrap();

    assert_eq!(quote.exact_amount_out, 453_512);
    assert_eq!(quote.min_amount_out, 448_977);
    assert_eq!(quote.fee_amount, 250);
}

#[test]
fn test_sell_quote_reference_values() {
    let reserves = ReserveSnapshot::new(30_000_000_000, 1_000_000_000_000_000);
    let ppm = compute_swap_quote(
        SwapDirection::Sell,
        5_000_000,
        reserves,
        FeeRate::DEFAULT,
        500,
    )
    .unwrap();
    let bps = compute_swap_quote(
        SwapDirection::Sell,
        5_000_000,
        reserves,
        FeeRate::from_basis_points(25),
        500,
    )
    .unwrap();

    assert_eq!(ppm.exact_amount_out, 166_222_365_531);
    assert_eq!(ppm.min_amount_out, 157_911_247_255);
    assert_eq!(ppm, bps);
}

#[test]
fn test_quote_errors() {
    assert_matches!(
        compute_swap_quote(
            SwapDirection::Buy,
            1,
            ReserveSnapshot::new(1_000, 1_000_000_000),
            FeeRate::DEFAULT,
            100,
        ),
        Err(QuoteError::InsufficientLiquidity {
            exact_amount_out: 0,
            min_amount_out: 0
        })
    );
    assert_matches!(
        compute_swap_quote(
            SwapDirection::Sell,
            1_000,
            ReserveSnapshot::new(1_000, 1_000),
            FeeRate::new(1, 0),
            100,
        ),
        Err(QuoteError::InvalidArguments(_))
    );
}

#[test]
fn test_classify_round_trips_swap_encoding() {
    let buy = SwapInstructionParams::exact_in(SwapDirection::Buy, 50_000_000, 1_234);
    let classified = classify(&buy.to_data());
    assert_eq!(classified.kind, InstructionKind::Known(KnownInstruction::Buy));
    assert_eq!(classified.params, Some(buy));
    assert_eq!(&buy.to_data()[..8], &BUY_DISCRIMINATOR);

    let sell = SwapInstructionParams::exact_in(SwapDirection::Sell, 9_000, 10);
    let classified = classify(&sell.to_data());
    assert_eq!(classified.kind, InstructionKind::Known(KnownInstruction::Sell));
    assert_eq!(&sell.to_data()[..8], &SELL_DISCRIMINATOR);
    assert_eq!(
        classified.params,
        Some(SwapInstructionParams::Sell {
            base_amount_in: 9_000,
            min_quote_amount_out: 10,
        })
    );
}

#[test]
fn test_classify_edge_cases() {
    assert_eq!(classify(&[]).kind, InstructionKind::TooShort);
    assert_eq!(classify(&BUY_DISCRIMINATOR[..7]).kind, InstructionKind::TooShort);

    // discriminator only: known kind, no amounts
    let bare = classify(&SELL_DISCRIMINATOR);
    assert_eq!(bare.kind, InstructionKind::Known(KnownInstruction::Sell));
    assert_eq!(bare.params, None);

    let create = classify(&CREATE_POOL_DISCRIMINATOR);
    assert_eq!(create.kind, InstructionKind::Known(KnownInstruction::CreatePool));
    assert!(!create.kind.is_swap());

    let unknown = classify(&[1, 2, 3, 4, 5, 6, 7, 8, 0, 0]);
    assert_eq!(unknown.kind, InstructionKind::Unknown([1, 2, 3, 4, 5, 6, 7, 8]));
    assert_eq!(unknown.kind.to_string(), "Unknown(0102030405060708)");
}

#[test]
fn test_registry_and_roles() {
    assert_eq!(DISCRIMINATOR_REGISTRY.len(), 3);
    assert_eq!(SWAP_ACCOUNT_ROLES.len(), 17);
    assert_eq!(SWAP_ACCOUNT_ROLES[0], "Pool");
    assert_eq!(SWAP_ACCOUNT_ROLES[16], "Program");
}

#[test]
fn test_decode_pool_account() {
    let pool = Pool {
        pool_bump: 255,
        index: 3,
        creator: Pubkey::new_unique(),
        base_mint: Pubkey::new_unique(),
        quote_mint: Pubkey::new_unique(),
        lp_mint: Pubkey::new_unique(),
        pool_base_token_account: Pubkey::new_unique(),
        pool_quote_token_account: Pubkey::new_unique(),
        lp_supply: 1_000,
    };
    let mut data = vec![0xAA; 8];
    pool.serialize(&mut data).unwrap();

    assert_eq!(PumpSwapAmm::decode_pool(&data).unwrap(), pool);
}

#[test]
fn test_ui_amount_conversions() {
    assert_eq!(ui_amount_to_raw("0.05", 9).unwrap(), 50_000_000);
    assert_eq!(raw_to_ui_amount(50_000_000, 9).normalize().to_string(), "0.05");
}
