use crate::utils::error::{InitError, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub use solana_sdk::hash::Hash;
pub use solana_sdk::instruction::{AccountMeta, Instruction};
pub use solana_sdk::pubkey::Pubkey;
pub use solana_sdk::signature::Signature;

/// Parses base58 text into a cluster type, naming what failed.
pub fn parse_base58<T: FromStr>(what: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| InitError::InvalidEncoding {
        what: what.to_string(),
        value: value.to_string(),
    })
}

/// Ordered so a reached level can be compared with the requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl FromStr for Commitment {
    type Err = InitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(InitError::InvalidConfigValueError {
                field: "commitment".to_string(),
                value: other.to_string(),
                reason: "Expected one of: processed, confirmed, finalized".to_string(),
            }),
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blockhash plus the last block height at which it is still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestBlockhash {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// One entry of `getSignatureStatuses`.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureStatus {
    pub slot: u64,
    pub confirmation_status: Option<Commitment>,
    pub err: Option<serde_json::Value>,
}

impl SignatureStatus {
    pub fn satisfies(&self, commitment: Commitment) -> bool {
        self.confirmation_status
            .map(|reached| reached >= commitment)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    pub skip_preflight: bool,
    pub preflight_commitment: Commitment,
    pub max_retries: Option<usize>,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            skip_preflight: false,
            preflight_commitment: Commitment::Confirmed,
            max_retries: None,
        }
    }
}

/// Receipt for a request that reached the requested commitment.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub signature: Signature,
    pub slot: u64,
    pub commitment: Commitment,
    pub confirmed_at: DateTime<Utc>,
}
