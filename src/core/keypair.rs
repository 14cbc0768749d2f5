use crate::utils::error::{InitError, Result};
use solana_sdk::signature::{read_keypair_file, Keypair};
use std::path::Path;

/// Loads the fee payer from a Solana CLI wallet file
/// (a JSON array of 64 bytes, secret key followed by public key).
pub fn load_keypair<P: AsRef<Path>>(path: P) -> Result<Keypair> {
    let path = path.as_ref();
    read_keypair_file(path).map_err(|e| InitError::Keypair {
        message: format!("cannot load wallet {}: {}", path.display(), e),
    })
}
