use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::constants::BASIS_POINTS_DENOMINATOR;
use crate::error::QuoteError;

/// Parts-per-million denominator used by the program's trade fee
pub const FEE_RATE_DENOMINATOR: u64 = 1_000_000;

/// Side of the pool the user is trading into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapDirection {
    /// Quote (SOL) in, base (token) out
    Buy,
    /// Base (token) in, quote (SOL) out
    Sell,
}

impl SwapDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapDirection::Buy => "buy",
            SwapDirection::Sell => "sell",
        }
    }
}

impl std::fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SwapDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(SwapDirection::Buy),
            "sell" => Ok(SwapDirection::Sell),
            other => anyhow::bail!("Unknown swap direction: {}", other),
        }
    }
}

/// Pool token balances, always in (base, quote) order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReserveSnapshot {
    pub base_reserve: u64,
    pub quote_reserve: u64,
}

impl ReserveSnapshot {
    pub fn new(base_reserve: u64, quote_reserve: u64) -> Self {
        Self {
            base_reserve,
            quote_reserve,
        }
    }

    /// Returns `(input_reserve, output_reserve)` for a trade in `direction`
    pub fn oriented(&self, direction: SwapDirection) -> (u64, u64) {
        match direction {
            SwapDirection::Buy => (self.quote_reserve, self.base_reserve),
            SwapDirection::Sell => (self.base_reserve, self.quote_reserve),
        }
    }
}

/// Proportional fee charged on the input amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeRate {
    pub numerator: u64,
    pub denominator: u64,
}

impl FeeRate {
    /// 0.25%
    pub const DEFAULT: FeeRate = FeeRate {
        numerator: 2_500,
        denominator: FEE_RATE_DENOMINATOR,
    };

    pub const ZERO: FeeRate = FeeRate {
        numerator: 0,
        denominator: FEE_RATE_DENOMINATOR,
    };

    pub fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn from_basis_points(basis_points: u64) -> Self {
        Self {
            numerator: basis_points,
            denominator: BASIS_POINTS_DENOMINATOR,
        }
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Output of [`compute_swap_quote`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteResult {
    /// Worst acceptable output after slippage, the on-chain guard value
    pub min_amount_out: u64,
    /// Output at the current reserves
    pub exact_amount_out: u64,
    /// Fee withheld from the input, rounded down
    pub fee_amount: u64,
}

/// Quote a constant-product swap with the fee taken from the input.
///
/// All intermediate values are exact rationals:
///
/// ```text
/// net   = amount_in * (d - n) / d
/// exact = out - in * out / (in + net)
///       = out * amount_in * (d - n) / (in * d + amount_in * (d - n))
/// min   = exact * (10000 - slippage_bps) / 10000
/// ```
///
/// Both outputs are floored once, at the end. `min` is taken from the
/// unrounded `exact`.
///
/// # Arguments
/// * `direction` - Buy (quote in) or Sell (base in)
/// * `amount_in` - Raw input amount, fee not yet deducted
/// * `reserves` - Pool balances in (base, quote) order
/// * `fee_rate` - Input fee as a fraction
/// * `slippage_bps` - Tolerated reduction from `exact`, in basis points
///
/// # Returns
/// `QuoteError::InvalidArguments` for a zero denominator, a fee above 100% or
/// a one-sided pool (empty input reserve, funded output reserve),
/// `QuoteError::InsufficientLiquidity` when either output would be zero.
pub fn compute_swap_quote(
    direction: SwapDirection,
    amount_in: u64,
    reserves: ReserveSnapshot,
    fee_rate: FeeRate,
    slippage_bps: u64,
) -> Result<QuoteResult, QuoteError> {
    if fee_rate.denominator == 0 {
        return Err(QuoteError::InvalidArguments(
            "fee rate denominator is zero".to_string(),
        ));
    }
    if fee_rate.numerator > fee_rate.denominator {
        return Err(QuoteError::InvalidArguments(format!(
            "fee rate {}/{} exceeds 100%",
            fee_rate.numerator, fee_rate.denominator
        )));
    }

    let (input_reserve, output_reserve) = reserves.oriented(direction);
    // With nothing on the input side the curve would hand out the whole output reserve
    if input_reserve == 0 && output_reserve > 0 {
        return Err(QuoteError::InvalidArguments(format!(
            "one-sided pool: input reserve is empty, output reserve {}",
            output_reserve
        )));
    }

    let d = BigUint::from(fee_rate.denominator);
    let amount_in_big = BigUint::from(amount_in);
    // amount_in * (d - n), i.e. the net input scaled by d
    let net_scaled = &amount_in_big * BigUint::from(fee_rate.denominator - fee_rate.numerator);
    let denominator = BigUint::from(input_reserve) * &d + &net_scaled;

    let fee_amount = to_u64(&amount_in_big * BigUint::from(fee_rate.numerator) / &d)?;

    if denominator.is_zero() {
        return Err(QuoteError::InsufficientLiquidity {
            exact_amount_out: 0,
            min_amount_out: 0,
        });
    }

    let exact_numerator = BigUint::from(output_reserve) * net_scaled;
    let exact_amount_out = to_u64(&exact_numerator / &denominator)?;

    let min_amount_out = match BASIS_POINTS_DENOMINATOR.checked_sub(slippage_bps) {
        Some(kept_bps) => to_u64(
            exact_numerator * BigUint::from(kept_bps)
                / (denominator * BigUint::from(BASIS_POINTS_DENOMINATOR)),
        )?,
        None => 0,
    };

    if exact_amount_out == 0 || min_amount_out == 0 {
        return Err(QuoteError::InsufficientLiquidity {
            exact_amount_out,
            min_amount_out,
        });
    }

    Ok(QuoteResult {
        min_amount_out,
        exact_amount_out,
        fee_amount,
    })
}

fn to_u64(value: BigUint) -> Result<u64, QuoteError> {
    value
        .to_u64()
        .ok_or_else(|| QuoteError::InvalidArguments(format!("{} does not fit in u64", value)))
}
