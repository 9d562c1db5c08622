use std::collections::HashSet;

use lazy_static::lazy_static;
use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;

pub const PUMPSWAP_PROGRAM_ID: Pubkey = pubkey!("pAMMBay6oceH9fJKBRHGP5D4bD4sWpmSwMn52FMfXEA");

pub const GLOBAL_CONFIG: Pubkey = pubkey!("ADyA8hdefvWN2dbGGWFotbzWxrAvLW83WG6QCVXvJKqw");
pub const EVENT_AUTHORITY: Pubkey = pubkey!("GS4CU59F31iL7aR2Q8zVS8DRrcRnXX1yjQ66TqNVQnaR");

pub const SOL_MINT: Pubkey = pubkey!("So11111111111111111111111111111111111111112");
pub const METADATA_PROGRAM_ID: Pubkey = pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Pool decoded by the demo when none is given
pub const DEFAULT_POOL: Pubkey = pubkey!("H9d3XHfvMGfoohydEpqh4w3mopnvjCRzE9VqaiHKdqs7");

/// Accounts the program accepts as `protocol_fee_recipient`
pub const PROTOCOL_FEE_RECIPIENTS: [Pubkey; 7] = [
    pubkey!("62qc2CNXwrYqQScmEdiZFFAnJR262PxWEuNQtxfafNgV"),
    pubkey!("7VtfL8fvgNfhz17qKRMjzQEXgbdpnHHHQRh54R9jP2RJ"),
    pubkey!("7hTckgnGnLQR6sdH7YkqFTAA7VwTfYFaZ6EhEsU3saCX"),
    pubkey!("9rPYyANsfQZw3DnDmKE3YCQF5E8oD89UXoHn9JFEhJUz"),
    pubkey!("AVmoTthdrX6tKt4nDjco2D775W2YK3sDhxPcMmzUAmTY"),
    pubkey!("FWsW1xNtWscwNmKv6wVsU1iTzRN6wmmk3MjxRP5tT7hz"),
    pubkey!("G5UZAVbAf46s7cKWoyKu8kYTip9DGTpbLZ2qa9Aq69dP"),
];

pub const SOL_DECIMALS: u8 = 9;

pub const SWAP_COMPUTE_UNIT_LIMIT: u32 = 300_000;
pub const SWAP_COMPUTE_UNIT_PRICE: u64 = 150_000; // micro-lamports

pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;

// SEEDS
pub const METADATA_SEED: &[u8] = b"metadata";

/// Public mainnet endpoints, tried in order when no endpoint is configured
pub const FALLBACK_RPC_ENDPOINTS: [&str; 5] = [
    "https://api.mainnet-beta.solana.com",
    "https://solana-api.projectserum.com",
    "https://rpc.ankr.com/solana",
    "https://solana-mainnet.g.alchemy.com/v2/demo",
    "https://mainnet.rpcpool.com",
];

lazy_static! {
    pub static ref PROTOCOL_FEE_RECIPIENT_SET: HashSet<Pubkey> =
        PROTOCOL_FEE_RECIPIENTS.iter().copied().collect();
}
