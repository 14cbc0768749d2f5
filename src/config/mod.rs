#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ProviderConfig;
use crate::domain::model::{Commitment, Pubkey, SendOptions};
use crate::utils::error::{InitError, Result};
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};
use std::time::Duration;
use toml_config::AnchorToml;

/// Program id the deployed program declares.
pub const DEFAULT_PROGRAM_ID: &str = "4YxE5GRA7UsNwLtpyQcL3F245F6te4Gg2BPAhMvWoKh5";
pub const PROGRAM_NAME: &str = "solana_fee_predictor";
pub const DEFAULT_CLUSTER: &str = "localnet";
pub const DEFAULT_WALLET: &str = "~/.config/solana/id.json";

pub const ENV_PROVIDER_URL: &str = "ANCHOR_PROVIDER_URL";
pub const ENV_WALLET: &str = "ANCHOR_WALLET";

/// Maps a cluster alias to its RPC URL; anything else must already be a URL.
pub fn resolve_cluster(cluster: &str) -> Result<String> {
    let url = match cluster.trim().to_ascii_lowercase().as_str() {
        "localnet" | "localhost" => "http://127.0.0.1:8899".to_string(),
        "devnet" => "https://api.devnet.solana.com".to_string(),
        "testnet" => "https://api.testnet.solana.com".to_string(),
        "mainnet" | "mainnet-beta" => "https://api.mainnet-beta.solana.com".to_string(),
        _ => cluster.trim().to_string(),
    };
    validation::validate_url("cluster", &url)?;
    Ok(url)
}

/// Name of the `[programs.<cluster>]` table for an alias or a well-known URL.
fn cluster_alias(cluster: &str) -> Option<&'static str> {
    match cluster.trim().trim_end_matches('/').to_ascii_lowercase().as_str() {
        "localnet" | "localhost" | "http://127.0.0.1:8899" | "http://localhost:8899" => {
            Some("localnet")
        }
        "devnet" | "https://api.devnet.solana.com" => Some("devnet"),
        "testnet" | "https://api.testnet.solana.com" => Some("testnet"),
        "mainnet" | "mainnet-beta" | "https://api.mainnet-beta.solana.com" => Some("mainnet"),
        _ => None,
    }
}

pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

/// The `ANCHOR_*` variables a provider reads from its environment.
#[derive(Debug, Clone, Default)]
pub struct EnvContext {
    pub provider_url: Option<String>,
    pub wallet: Option<String>,
}

impl EnvContext {
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            provider_url: read(ENV_PROVIDER_URL),
            wallet: read(ENV_WALLET),
        }
    }
}

/// Values given explicitly on the command line; they win over everything.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub cluster: Option<String>,
    pub wallet: Option<String>,
    pub program_id: Option<String>,
    pub commitment: Option<String>,
    pub timeout_secs: Option<u64>,
    pub skip_preflight: bool,
    pub skip_existing_check: bool,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub cluster_url: String,
    pub wallet_path: PathBuf,
    pub program_id: Pubkey,
    pub commitment: Commitment,
    pub confirm_timeout: Duration,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub send_options: SendOptions,
    pub skip_existing_check: bool,
}

impl ResolvedConfig {
    /// Precedence: command line, then environment, then file, then defaults.
    pub fn resolve(
        overrides: &Overrides,
        env: &EnvContext,
        file: Option<&AnchorToml>,
    ) -> Result<Self> {
        let cluster = overrides
            .cluster
            .as_deref()
            .or(env.provider_url.as_deref())
            .or(file.and_then(|f| f.cluster()))
            .unwrap_or(DEFAULT_CLUSTER);
        let cluster_url = resolve_cluster(cluster)?;

        let wallet = overrides
            .wallet
            .as_deref()
            .or(env.wallet.as_deref())
            .or(file.and_then(|f| f.wallet()))
            .unwrap_or(DEFAULT_WALLET);
        validation::validate_path("wallet", wallet)?;

        // 自訂 URL 沒有別名時, 退回 [provider].cluster 的別名
        let file_program_id = file.and_then(|f| {
            let alias = cluster_alias(cluster).or_else(|| f.cluster().and_then(cluster_alias))?;
            f.program_id(alias, PROGRAM_NAME)
        });
        let program_id_text = overrides
            .program_id
            .as_deref()
            .or(file_program_id)
            .unwrap_or(DEFAULT_PROGRAM_ID);
        let program_id: Pubkey =
            program_id_text
                .parse()
                .map_err(|_| InitError::InvalidConfigValueError {
                    field: "program_id".to_string(),
                    value: program_id_text.to_string(),
                    reason: "not a base58 32-byte address".to_string(),
                })?;

        let client = file.map(AnchorToml::client).unwrap_or_default();

        let commitment = match overrides.commitment.as_deref().or(client.commitment.as_deref()) {
            Some(text) => text.parse()?,
            None => Commitment::default(),
        };

        let confirm_timeout = Duration::from_secs(
            overrides
                .timeout_secs
                .or(client.confirm_timeout_secs)
                .unwrap_or(60),
        );
        let poll_interval = Duration::from_millis(client.poll_interval_ms.unwrap_or(500));
        let request_timeout = Duration::from_secs(client.request_timeout_secs.unwrap_or(30));

        let send_options = SendOptions {
            skip_preflight: overrides.skip_preflight || client.skip_preflight.unwrap_or(false),
            preflight_commitment: commitment,
            max_retries: client.max_retries,
        };

        let config = Self {
            cluster_url,
            wallet_path: expand_home(wallet),
            program_id,
            commitment,
            confirm_timeout,
            poll_interval,
            request_timeout,
            send_options,
            skip_existing_check: overrides.skip_existing_check,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for ResolvedConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("cluster", &self.cluster_url)?;
        validation::validate_duration("confirm_timeout", self.confirm_timeout, Duration::from_secs(1))?;
        validation::validate_duration("poll_interval", self.poll_interval, Duration::from_millis(1))?;
        validation::validate_duration("request_timeout", self.request_timeout, Duration::from_secs(1))?;
        Ok(())
    }
}

impl ProviderConfig for ResolvedConfig {
    fn cluster_url(&self) -> &str {
        &self.cluster_url
    }

    fn wallet_path(&self) -> &Path {
        &self.wallet_path
    }

    fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    fn commitment(&self) -> Commitment {
        self.commitment
    }

    fn confirm_timeout(&self) -> Duration {
        self.confirm_timeout
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn send_options(&self) -> SendOptions {
        self.send_options
    }

    fn skip_existing_check(&self) -> bool {
        self.skip_existing_check
    }
}
