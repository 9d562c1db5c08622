//! PumpSwap instruction discriminators and payload classification.

use crate::math::SwapDirection;

/// `sha256("global:buy")[..8]`
pub const BUY_DISCRIMINATOR: [u8; 8] = [102, 6, 61, 18, 1, 218, 235, 234];
/// `sha256("global:sell")[..8]`
pub const SELL_DISCRIMINATOR: [u8; 8] = [51, 230, 133, 164, 1, 127, 131, 173];
/// `sha256("global:create_pool")[..8]`
pub const CREATE_POOL_DISCRIMINATOR: [u8; 8] = [233, 146, 209, 142, 207, 104, 64, 188];

pub const DISCRIMINATOR_LEN: usize = 8;
/// Discriminator plus two little-endian u64 amounts
pub const SWAP_DATA_LEN: usize = DISCRIMINATOR_LEN + 16;

/// Known instructions, matched in this order
pub const DISCRIMINATOR_REGISTRY: [(KnownInstruction, [u8; 8]); 3] = [
    (KnownInstruction::Buy, BUY_DISCRIMINATOR),
    (KnownInstruction::Sell, SELL_DISCRIMINATOR),
    (KnownInstruction::CreatePool, CREATE_POOL_DISCRIMINATOR),
];

const fn registry_is_distinct() -> bool {
    let mut i = 0;
    while i < DISCRIMINATOR_REGISTRY.len() {
        let mut j = i + 1;
        while j < DISCRIMINATOR_REGISTRY.len() {
            let a = DISCRIMINATOR_REGISTRY[i].1;
            let b = DISCRIMINATOR_REGISTRY[j].1;
            let mut k = 0;
            let mut same = true;
            while k < DISCRIMINATOR_LEN {
                if a[k] != b[k] {
                    same = false;
                }
                k += 1;
            }
            if same {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const _: () = assert!(
    registry_is_distinct(),
    "duplicate PumpSwap instruction discriminator"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownInstruction {
    Buy,
    Sell,
    CreatePool,
}

impl KnownInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            KnownInstruction::Buy => "Buy",
            KnownInstruction::Sell => "Sell",
            KnownInstruction::CreatePool => "CreatePool",
        }
    }

    pub fn discriminator(&self) -> [u8; 8] {
        match self {
            KnownInstruction::Buy => BUY_DISCRIMINATOR,
            KnownInstruction::Sell => SELL_DISCRIMINATOR,
            KnownInstruction::CreatePool => CREATE_POOL_DISCRIMINATOR,
        }
    }
}

/// Classification outcome of a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    Known(KnownInstruction),
    /// Carries the unmatched discriminator for reporting
    Unknown([u8; 8]),
    /// Fewer than 8 bytes
    TooShort,
}

impl InstructionKind {
    pub fn is_swap(&self) -> bool {
        matches!(
            self,
            InstructionKind::Known(KnownInstruction::Buy | KnownInstruction::Sell)
        )
    }
}

impl std::fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstructionKind::Known(known) => f.write_str(known.name()),
            InstructionKind::Unknown(discriminator) => {
                write!(f, "Unknown({})", hex::encode(discriminator))
            }
            InstructionKind::TooShort => f.write_str("TooShort"),
        }
    }
}

/// Amount fields of a buy or sell payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapInstructionParams {
    Buy {
        base_amount_out: u64,
        max_quote_amount_in: u64,
    },
    Sell {
        base_amount_in: u64,
        min_quote_amount_out: u64,
    },
}

impl SwapInstructionParams {
    pub fn direction(&self) -> SwapDirection {
        match self {
            SwapInstructionParams::Buy { .. } => SwapDirection::Buy,
            SwapInstructionParams::Sell { .. } => SwapDirection::Sell,
        }
    }

    /// Base token amount named by the instruction
    pub fn base_amount(&self) -> u64 {
        match *self {
            SwapInstructionParams::Buy {
                base_amount_out, ..
            } => base_amount_out,
            SwapInstructionParams::Sell { base_amount_in, .. } => base_amount_in,
        }
    }

    /// Quote (SOL) bound named by the instruction
    pub fn quote_amount(&self) -> u64 {
        match *self {
            SwapInstructionParams::Buy {
                max_quote_amount_in,
                ..
            } => max_quote_amount_in,
            SwapInstructionParams::Sell {
                min_quote_amount_out,
                ..
            } => min_quote_amount_out,
        }
    }

    /// Exact-in mapping from a quote onto the instruction fields.
    ///
    /// Buy spends at most `amount_in` quote for at least `min_amount_out`
    /// base, sell spends `amount_in` base for at least `min_amount_out` quote.
    pub fn exact_in(direction: SwapDirection, amount_in: u64, min_amount_out: u64) -> Self {
        match direction {
            SwapDirection::Buy => SwapInstructionParams::Buy {
                base_amount_out: min_amount_out,
                max_quote_amount_in: amount_in,
            },
            SwapDirection::Sell => SwapInstructionParams::Sell {
                base_amount_in: amount_in,
                min_quote_amount_out: min_amount_out,
            },
        }
    }

    pub fn instruction(&self) -> KnownInstruction {
        match self {
            SwapInstructionParams::Buy { .. } => KnownInstruction::Buy,
            SwapInstructionParams::Sell { .. } => KnownInstruction::Sell,
        }
    }

    /// Serialize as `discriminator ++ LE64 ++ LE64`
    pub fn to_data(&self) -> Vec<u8> {
        let mut data = self.instruction().discriminator().to_vec();
        data.extend_from_slice(&self.base_amount().to_le_bytes());
        data.extend_from_slice(&self.quote_amount().to_le_bytes());
        data
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedInstruction {
    pub kind: InstructionKind,
    /// `None` for non-swap kinds and for swap payloads shorter than 24 bytes
    pub params: Option<SwapInstructionParams>,
}

/// Classify a raw PumpSwap instruction payload.
///
/// Never fails: short and unrecognized payloads are reported through
/// [`InstructionKind::TooShort`] and [`InstructionKind::Unknown`].
pub fn classify(payload: &[u8]) -> ClassifiedInstruction {
    let Some(discriminator) = payload
        .get(..DISCRIMINATOR_LEN)
        .and_then(|prefix| <[u8; 8]>::try_from(prefix).ok())
    else {
        return ClassifiedInstruction {
            kind: InstructionKind::TooShort,
            params: None,
        };
    };

    let Some(known) = DISCRIMINATOR_REGISTRY
        .iter()
        .find(|(_, registered)| *registered == discriminator)
        .map(|(known, _)| *known)
    else {
        return ClassifiedInstruction {
            kind: InstructionKind::Unknown(discriminator),
            params: None,
        };
    };

    let params = match known {
        KnownInstruction::Buy => read_amounts(payload).map(|(first, second)| {
            SwapInstructionParams::Buy {
                base_amount_out: first,
                max_quote_amount_in: second,
            }
        }),
        KnownInstruction::Sell => read_amounts(payload).map(|(first, second)| {
            SwapInstructionParams::Sell {
                base_amount_in: first,
                min_quote_amount_out: second,
            }
        }),
        KnownInstruction::CreatePool => None,
    };

    ClassifiedInstruction {
        kind: InstructionKind::Known(known),
        params,
    }
}

fn read_amounts(payload: &[u8]) -> Option<(u64, u64)> {
    let first = payload.get(8..16)?.try_into().ok()?;
    let second = payload.get(16..24)?.try_into().ok()?;
    Some((u64::from_le_bytes(first), u64::from_le_bytes(second)))
}
