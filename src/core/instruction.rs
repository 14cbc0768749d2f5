use crate::domain::model::{AccountMeta, Instruction, Pubkey};
use solana_sdk::hash::hashv;
use solana_sdk::system_program;

pub const INITIALIZE: &str = "initialize";
pub const FEE_DATA_SEED: &[u8] = b"fee_data";

/// Anchor selects the handler by the first 8 bytes of `sha256("global:<name>")`.
pub fn discriminator(name: &str) -> [u8; 8] {
    let digest = hashv(&[b"global:", name.as_bytes()]).to_bytes();
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

pub fn fee_data_address(program_id: &Pubkey, payer: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[FEE_DATA_SEED, payer.as_ref()], program_id)
}

/// Accounts a request names, besides the instruction data.
#[derive(Debug, Clone)]
pub struct InitializeAccounts {
    pub fee_data: Pubkey,
    pub payer: Pubkey,
    pub system_program: Pubkey,
}

impl InitializeAccounts {
    pub fn derive(program_id: &Pubkey, payer: &Pubkey) -> Self {
        let (fee_data, bump) = fee_data_address(program_id, payer);
        tracing::debug!("fee_data PDA {} (bump {})", fee_data, bump);
        Self {
            fee_data,
            payer: *payer,
            system_program: system_program::ID,
        }
    }

    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.fee_data, false),
            AccountMeta::new(self.payer, true),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

/// Builds an Anchor instruction: discriminator followed by the borsh-encoded args.
pub fn anchor_instruction(
    program_id: Pubkey,
    name: &str,
    accounts: Vec<AccountMeta>,
    args: &[u8],
) -> Instruction {
    let mut data = discriminator(name).to_vec();
    data.extend_from_slice(args);
    Instruction::new_with_bytes(program_id, &data, accounts)
}

/// `initialize` takes no arguments.
pub fn initialize(program_id: Pubkey, accounts: &InitializeAccounts) -> Instruction {
    anchor_instruction(program_id, INITIALIZE, accounts.to_account_metas(), &[])
}
