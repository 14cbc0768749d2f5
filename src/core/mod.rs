pub mod instruction;
pub mod keypair;
pub mod program;
pub mod rpc;

pub use crate::domain::model::{Commitment, Confirmation, Instruction, Pubkey, Signature};
pub use crate::domain::ports::{ProviderConfig, RpcTransport};
pub use crate::utils::error::Result;
