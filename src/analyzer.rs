use solana_sdk::{
    message::{VersionedMessage, v0::LoadedAddresses},
    pubkey::Pubkey,
    transaction::{TransactionError, VersionedTransaction},
};

use crate::account_metas::{BASE_MINT_INDEX, POOL_INDEX, SWAP_ACCOUNT_ROLES, USER_INDEX};
use crate::constants::PUMPSWAP_PROGRAM_ID;
use crate::instruction::{ClassifiedInstruction, SwapInstructionParams, classify};
use crate::math::SwapDirection;

/// One account of a PumpSwap instruction with its display role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRole {
    pub position: usize,
    pub role: String,
    /// `None` when the message index points past the resolved key list
    pub pubkey: Option<Pubkey>,
}

/// Human-oriented view of a buy or sell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapSummary {
    pub direction: SwapDirection,
    pub pool: Option<Pubkey>,
    pub user: Option<Pubkey>,
    pub base_mint: Option<Pubkey>,
    pub params: SwapInstructionParams,
}

impl SwapSummary {
    pub fn operation(&self) -> &'static str {
        match self.direction {
            SwapDirection::Buy => "Buy (SOL → Token)",
            SwapDirection::Sell => "Sell (Token → SOL)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PumpSwapInstruction {
    /// Position among the transaction's top-level instructions
    pub instruction_index: usize,
    pub classified: ClassifiedInstruction,
    pub accounts: Vec<AccountRole>,
    pub data: Vec<u8>,
    pub summary: Option<SwapSummary>,
}

/// Execution result recorded in the transaction's status meta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutcome {
    /// `None` when the transaction succeeded
    pub err: Option<TransactionError>,
    /// Lamports charged to the fee payer
    pub fee: u64,
}

impl TransactionOutcome {
    pub fn succeeded(&self) -> bool {
        self.err.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionAnalysis {
    pub signature: String,
    pub slot: Option<u64>,
    /// `None` when the RPC node returned no status meta
    pub outcome: Option<TransactionOutcome>,
    pub instructions: Vec<PumpSwapInstruction>,
}

impl TransactionAnalysis {
    /// `Some(false)` for a transaction that landed but reverted; its swaps
    /// moved no tokens
    pub fn succeeded(&self) -> Option<bool> {
        self.outcome.as_ref().map(TransactionOutcome::succeeded)
    }

    pub fn swaps(&self) -> impl Iterator<Item = &SwapSummary> {
        self.instructions
            .iter()
            .filter_map(|instruction| instruction.summary.as_ref())
    }
}

/// Static keys followed by lookup-table writable then readonly keys, the
/// order compiled instruction indices refer to
pub fn resolve_account_keys(message: &VersionedMessage, loaded: &LoadedAddresses) -> Vec<Pubkey> {
    message
        .static_account_keys()
        .iter()
        .chain(loaded.writable.iter())
        .chain(loaded.readonly.iter())
        .copied()
        .collect()
}

pub fn role_name(position: usize) -> String {
    SWAP_ACCOUNT_ROLES
        .get(position)
        .map(|role| role.to_string())
        .unwrap_or_else(|| format!("Account {}", position))
}

/// Find and decode every top-level PumpSwap instruction of `transaction`.
///
/// Instructions of other programs are skipped. Unknown or short payloads are
/// kept with their classification so callers can report them.
pub fn analyze_transaction(
    signature: &str,
    slot: Option<u64>,
    outcome: Option<TransactionOutcome>,
    transaction: &VersionedTransaction,
    loaded: &LoadedAddresses,
) -> TransactionAnalysis {
    let account_keys = resolve_account_keys(&transaction.message, loaded);
    let key_at = |index: u8| account_keys.get(usize::from(index)).copied();

    let mut instructions = Vec::new();
    for (instruction_index, compiled) in transaction.message.instructions().iter().enumerate() {
        let Some(program_id) = key_at(compiled.program_id_index) else {
            log::warn!(
                "{}: instruction {} references missing program index {}",
                signature,
                instruction_index,
                compiled.program_id_index
            );
            continue;
        };
        if program_id != PUMPSWAP_PROGRAM_ID {
            continue;
        }

        let classified = classify(&compiled.data);
        let accounts: Vec<AccountRole> = compiled
            .accounts
            .iter()
            .enumerate()
            .map(|(position, index)| AccountRole {
                position,
                role: role_name(position),
                pubkey: key_at(*index),
            })
            .collect();

        let account_at = |position: usize| accounts.get(position).and_then(|a| a.pubkey);
        let summary = classified.params.map(|params| SwapSummary {
            direction: params.direction(),
            pool: account_at(POOL_INDEX),
            user: account_at(USER_INDEX),
            base_mint: account_at(BASE_MINT_INDEX),
            params,
        });

        instructions.push(PumpSwapInstruction {
            instruction_index,
            classified,
            accounts,
            data: compiled.data.clone(),
            summary,
        });
    }

    TransactionAnalysis {
        signature: signature.to_string(),
        slot,
        outcome,
        instructions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{CREATE_POOL_DISCRIMINATOR, InstructionKind, KnownInstruction};
    use solana_sdk::{
        hash::Hash,
        instruction::{AccountMeta, CompiledInstruction, Instruction, InstructionError},
        message::{MessageHeader, v0},
        signature::Signature,
    };

    fn swap_instruction(accounts: &[Pubkey], data: Vec<u8>) -> Instruction {
        Instruction {
            program_id: PUMPSWAP_PROGRAM_ID,
            accounts: accounts
                .iter()
                .enumerate()
                .map(|(i, key)| AccountMeta::new(*key, i == USER_INDEX))
                .collect(),
            data,
        }
    }

    fn transaction(payer: &Pubkey, instructions: &[Instruction]) -> VersionedTransaction {
        let message = v0::Message::try_compile(payer, instructions, &[], Hash::default()).unwrap();
        VersionedTransaction {
            signatures: vec![Signature::default()],
            message: VersionedMessage::V0(message),
        }
    }

    #[test]
    fn labels_accounts_and_summarizes_sell() {
        let accounts: Vec<Pubkey> = (0..17).map(|_| Pubkey::new_unique()).collect();
        let user = accounts[USER_INDEX];
        let data = SwapInstructionParams::exact_in(SwapDirection::Sell, 2_000_000, 15_000).to_data();
        let memo = Instruction {
            program_id: Pubkey::new_unique(),
            accounts: vec![],
            data: vec![1, 2, 3],
        };
        let tx = transaction(&user, &[memo, swap_instruction(&accounts, data)]);

        let analysis = analyze_transaction("sig", Some(7), None, &tx, &LoadedAddresses::default());
        assert_eq!(analysis.instructions.len(), 1);

        let decoded = &analysis.instructions[0];
        assert_eq!(decoded.instruction_index, 1);
        assert_eq!(
            decoded.classified.kind,
            InstructionKind::Known(KnownInstruction::Sell)
        );
        assert_eq!(decoded.accounts.len(), 17);
        assert_eq!(decoded.accounts[0].role, "Pool");
        assert_eq!(decoded.accounts[16].role, "Program");
        for (role, key) in decoded.accounts.iter().zip(&accounts) {
            assert_eq!(role.pubkey, Some(*key));
        }

        let summary = analysis.swaps().next().unwrap();
        assert_eq!(summary.direction, SwapDirection::Sell);
        assert_eq!(summary.operation(), "Sell (Token → SOL)");
        assert_eq!(summary.pool, Some(accounts[POOL_INDEX]));
        assert_eq!(summary.user, Some(user));
        assert_eq!(summary.base_mint, Some(accounts[BASE_MINT_INDEX]));
        assert_eq!(summary.params.base_amount(), 2_000_000);
        assert_eq!(summary.params.quote_amount(), 15_000);
    }

    #[test]
    fn keeps_non_swap_pumpswap_instructions_without_summary() {
        let payer = Pubkey::new_unique();
        let mut data = CREATE_POOL_DISCRIMINATOR.to_vec();
        data.extend_from_slice(&[0u8; 16]);
        let create = Instruction {
            program_id: PUMPSWAP_PROGRAM_ID,
            accounts: vec![AccountMeta::new(payer, true)],
            data,
        };
        let unknown = Instruction {
            program_id: PUMPSWAP_PROGRAM_ID,
            accounts: vec![],
            data: vec![9; 4],
        };
        let tx = transaction(&payer, &[create, unknown]);

        let analysis = analyze_transaction("sig", None, None, &tx, &LoadedAddresses::default());
        assert_eq!(analysis.instructions.len(), 2);
        assert_eq!(
            analysis.instructions[0].classified.kind,
            InstructionKind::Known(KnownInstruction::CreatePool)
        );
        assert_eq!(analysis.instructions[1].classified.kind, InstructionKind::TooShort);
        assert_eq!(analysis.swaps().count(), 0);
    }

    #[test]
    fn resolves_lookup_table_accounts() {
        let payer = Pubkey::new_unique();
        let writable = Pubkey::new_unique();
        let readonly = Pubkey::new_unique();
        let data = SwapInstructionParams::exact_in(SwapDirection::Buy, 1_000, 10).to_data();

        // payer, program static; pool from the writable table slot, base mint from readonly
        let message = v0::Message {
            header: MessageHeader {
                num_required_signatures: 1,
                num_readonly_signed_accounts: 0,
                num_readonly_unsigned_accounts: 1,
            },
            account_keys: vec![payer, PUMPSWAP_PROGRAM_ID],
            recent_blockhash: Hash::default(),
            instructions: vec![CompiledInstruction {
                program_id_index: 1,
                accounts: vec![2, 0, 9, 3],
                data,
            }],
            address_table_lookups: vec![],
        };
        let tx = VersionedTransaction {
            signatures: vec![Signature::default()],
            message: VersionedMessage::V0(message),
        };
        let loaded = LoadedAddresses {
            writable: vec![writable],
            readonly: vec![readonly],
        };

        let analysis = analyze_transaction("sig", None, None, &tx, &loaded);
        let decoded = &analysis.instructions[0];
        assert_eq!(decoded.accounts[0].pubkey, Some(writable));
        assert_eq!(decoded.accounts[1].pubkey, Some(payer));
        assert_eq!(decoded.accounts[2].pubkey, None);
        assert_eq!(decoded.accounts[3].pubkey, Some(readonly));

        let summary = decoded.summary.as_ref().unwrap();
        assert_eq!(summary.operation(), "Buy (SOL → Token)");
        assert_eq!(summary.base_mint, Some(readonly));
        assert_eq!(
            summary.params,
            SwapInstructionParams::Buy {
                base_amount_out: 10,
                max_quote_amount_in: 1_000,
            }
        );
    }

    #[test]
    fn reverted_swap_reports_failure_and_fee() {
        let accounts: Vec<Pubkey> = (0..17).map(|_| Pubkey::new_unique()).collect();
        let data = SwapInstructionParams::exact_in(SwapDirection::Buy, 50_000_000, 1_000).to_data();
        let tx = transaction(&accounts[USER_INDEX], &[swap_instruction(&accounts, data)]);
        let outcome = TransactionOutcome {
            err: Some(TransactionError::InstructionError(
                0,
                InstructionError::Custom(6004),
            )),
            fee: 155_000,
        };

        let analysis = analyze_transaction(
            "sig",
            Some(9),
            Some(outcome.clone()),
            &tx,
            &LoadedAddresses::default(),
        );
        assert_eq!(analysis.succeeded(), Some(false));
        assert_eq!(analysis.outcome, Some(outcome));
        assert_eq!(analysis.outcome.as_ref().map(|o| o.fee), Some(155_000));
        // the instruction is still decoded so callers can show what was attempted
        assert_eq!(analysis.swaps().count(), 1);
    }

    #[test]
    fn outcome_is_unknown_without_meta() {
        let payer = Pubkey::new_unique();
        let tx = transaction(&payer, &[]);
        let analysis = analyze_transaction("sig", None, None, &tx, &LoadedAddresses::default());
        assert_eq!(analysis.succeeded(), None);

        let ok = TransactionOutcome { err: None, fee: 5_000 };
        let analysis = analyze_transaction("sig", None, Some(ok), &tx, &LoadedAddresses::default());
        assert_eq!(analysis.succeeded(), Some(true));
    }

    #[test]
    fn extra_accounts_get_positional_names() {
        assert_eq!(role_name(4), "Quote Mint (SOL)");
        assert_eq!(role_name(17), "Account 17");
    }
}
