use crate::utils::error::{InitError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// The subset of an Anchor workspace's `Anchor.toml` this client reads,
/// plus an optional `[client]` table for confirmation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnchorToml {
    pub provider: Option<ProviderSection>,
    /// `[programs.<cluster>]` → program name → program id.
    pub programs: Option<HashMap<String, HashMap<String, String>>>,
    pub client: Option<ClientSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSection {
    pub cluster: Option<String>,
    pub wallet: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientSection {
    pub commitment: Option<String>,
    pub confirm_timeout_secs: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub skip_preflight: Option<bool>,
    pub max_retries: Option<usize>,
}

impl AnchorToml {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(InitError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| InitError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SOLANA_RPC_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| InitError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn cluster(&self) -> Option<&str> {
        self.provider.as_ref()?.cluster.as_deref()
    }

    pub fn wallet(&self) -> Option<&str> {
        self.provider.as_ref()?.wallet.as_deref()
    }

    pub fn program_id(&self, cluster: &str, program_name: &str) -> Option<&str> {
        self.programs
            .as_ref()?
            .get(cluster)?
            .get(program_name)
            .map(String::as_str)
    }

    pub fn client(&self) -> ClientSection {
        self.client.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ANCHOR_TOML: &str = r#"
[toolchain]

[features]
resolution = true
skip-lint = false

[programs.localnet]
solana_fee_predictor = "4YxE5GRA7UsNwLtpyQcL3F245F6te4Gg2BPAhMvWoKh5"

[registry]
url = "https://api.apr.dev"

[provider]
cluster = "Localnet"
wallet = "~/.config/solana/id.json"

[scripts]
test = "yarn run ts-mocha -p ./tsconfig.json -t 1000000 tests/**/*.ts"
"#;

    #[test]
    fn test_parse_anchor_workspace_file() {
        let config = AnchorToml::from_toml_str(ANCHOR_TOML).unwrap();

        assert_eq!(config.cluster(), Some("Localnet"));
        assert_eq!(config.wallet(), Some("~/.config/solana/id.json"));
        assert_eq!(
            config.program_id("localnet", "solana_fee_predictor"),
            Some("4YxE5GRA7UsNwLtpyQcL3F245F6te4Gg2BPAhMvWoKh5")
        );
        assert!(config.program_id("devnet", "solana_fee_predictor").is_none());
        assert!(config.client().commitment.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FEE_INIT_TEST_RPC", "https://rpc.example.com");

        let config = AnchorToml::from_toml_str(
            r#"
[provider]
cluster = "${FEE_INIT_TEST_RPC}"
wallet = "/tmp/id.json"

[client]
commitment = "finalized"
confirm_timeout_secs = 90
"#,
        )
        .unwrap();

        assert_eq!(config.cluster(), Some("https://rpc.example.com"));
        assert_eq!(config.client().commitment.as_deref(), Some("finalized"));
        assert_eq!(config.client().confirm_timeout_secs, Some(90));

        std::env::remove_var("FEE_INIT_TEST_RPC");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AnchorToml::from_toml_str("[provider\ncluster = ").unwrap_err();
        assert!(matches!(err, InitError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(ANCHOR_TOML.as_bytes()).unwrap();

        let config = AnchorToml::from_file(temp_file.path()).unwrap();
        assert_eq!(config.cluster(), Some("Localnet"));
    }
}
