pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;

pub use crate::config::{toml_config::AnchorToml, EnvContext, Overrides, ResolvedConfig};
pub use crate::core::instruction::InitializeAccounts;
pub use crate::core::keypair::load_keypair;
pub use crate::core::program::{plan_initialize, Program};
pub use crate::core::rpc::HttpRpcClient;
pub use crate::domain::model::{Commitment, Pubkey, Signature};
pub use crate::utils::error::{InitError, Result};
