mod commands;
mod output;

use clap::{Parser, Subcommand};
use pumpswap_sdk::{DEFAULT_POOL, DEFAULT_SIGNATURE_LIMIT, SwapDirection};
use solana_sdk::pubkey::Pubkey;

#[derive(Parser)]
#[command(name = "pumpswap", about = "PumpSwap swap and transaction decoder demo")]
struct Cli {
    /// RPC endpoint; public mainnet endpoints are tried when unset
    #[arg(long, env = "RPC_ENDPOINT", global = true)]
    rpc_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a swap against the pool's current reserves
    Quote {
        pool: Pubkey,
        direction: SwapDirection,
        /// Decimal amount of the input token, e.g. 0.05
        amount: String,
        #[arg(long, default_value = "100")]
        slippage_bps: u64,
    },
    /// Build, sign and simulate (or send) a swap
    Swap {
        pool: Pubkey,
        direction: SwapDirection,
        /// Decimal amount of the input token, e.g. 0.05
        amount: String,
        #[arg(long, default_value = "100")]
        slippage_bps: u64,
        /// Protocol fee recipient, must be one of the program's accepted accounts
        #[arg(long)]
        fee_recipient: Option<Pubkey>,
        /// Base58 keypair of the trader
        #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
        /// Submit instead of simulating
        #[arg(long)]
        send: bool,
    },
    /// Decode the most recent transactions of a pool
    Decode {
        #[arg(default_value_t = DEFAULT_POOL)]
        pool: Pubkey,
        #[arg(long, default_value_t = DEFAULT_SIGNATURE_LIMIT)]
        limit: usize,
    },
    /// Decode a single transaction by signature
    DecodeTx { signature: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut sdk = commands::connect(cli.rpc_endpoint.as_deref()).await?;

    match cli.command {
        Commands::Quote {
            pool,
            direction,
            amount,
            slippage_bps,
        } => commands::quote(&mut sdk, &pool, direction, &amount, slippage_bps).await,
        Commands::Swap {
            pool,
            direction,
            amount,
            slippage_bps,
            fee_recipient,
            private_key,
            send,
        } => {
            commands::swap(
                sdk,
                &pool,
                direction,
                &amount,
                slippage_bps,
                fee_recipient,
                &private_key,
                send,
            )
            .await
        }
        Commands::Decode { pool, limit } => commands::decode_pool(&mut sdk, &pool, limit).await,
        Commands::DecodeTx { signature } => commands::decode_tx(&mut sdk, &signature).await,
    }
}
