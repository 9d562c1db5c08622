use thiserror::Error;

/// Failures of the constant-product quote
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("invalid quote arguments: {0}")]
    InvalidArguments(String),

    /// Exact or slippage-adjusted output is not positive. A swap built from
    /// this quote would carry no minimum-output guard.
    #[error(
        "insufficient liquidity: exact amount out {exact_amount_out}, minimum amount out {min_amount_out}"
    )]
    InsufficientLiquidity {
        exact_amount_out: u64,
        min_amount_out: u64,
    },
}
