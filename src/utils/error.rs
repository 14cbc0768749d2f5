use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InitError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        logs: Vec<String>,
    },

    #[error("Transaction {signature} failed: {reason}")]
    TransactionFailed { signature: String, reason: String },

    #[error("Transaction {signature} was not confirmed within {waited:?}")]
    ConfirmationTimeout { signature: String, waited: Duration },

    #[error("Blockhash expired before transaction {signature} was confirmed")]
    BlockhashExpired { signature: String },

    #[error("Fee data account {address} is already initialized")]
    AlreadyInitialized { address: String },

    #[error("Keypair error: {message}")]
    Keypair { message: String },

    #[error("Invalid {what} encoding: {value}")]
    InvalidEncoding { what: String, value: String },

    #[error("Transaction build error: {message}")]
    Transaction { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Remote,
    Local,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl InitError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(_) | Self::ConfirmationTimeout { .. } | Self::BlockhashExpired { .. } => {
                ErrorCategory::Network
            }
            Self::Rpc { .. } | Self::TransactionFailed { .. } | Self::AlreadyInitialized { .. } => {
                ErrorCategory::Remote
            }
            Self::Io(_)
            | Self::Serialization(_)
            | Self::InvalidEncoding { .. }
            | Self::Transaction { .. } => ErrorCategory::Local,
            Self::Keypair { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 帳戶已存在: 目標狀態已達成
            Self::AlreadyInitialized { .. } => ErrorSeverity::Low,
            Self::Http(_) | Self::ConfirmationTimeout { .. } | Self::BlockhashExpired { .. } => {
                ErrorSeverity::Medium
            }
            Self::Rpc { .. }
            | Self::TransactionFailed { .. }
            | Self::Serialization(_)
            | Self::InvalidEncoding { .. }
            | Self::Transaction { .. } => ErrorSeverity::High,
            Self::Io(_)
            | Self::Keypair { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::Http(_) => {
                "Check that the cluster URL is reachable (is solana-test-validator running?)"
                    .to_string()
            }
            Self::Rpc { logs, .. } if !logs.is_empty() => {
                "Inspect the program logs above; the program rejected the request".to_string()
            }
            Self::Rpc { .. } => {
                "Verify the program is deployed at the configured program id".to_string()
            }
            Self::TransactionFailed { .. } => {
                "Inspect the transaction with `solana confirm -v <signature>`".to_string()
            }
            Self::ConfirmationTimeout { .. } => {
                "Increase --timeout-secs or retry; the transaction may still land".to_string()
            }
            Self::BlockhashExpired { .. } => {
                "Retry the request; a fresh blockhash will be fetched".to_string()
            }
            Self::AlreadyInitialized { .. } => {
                "Nothing to do; pass --skip-existing-check to send anyway".to_string()
            }
            Self::Keypair { .. } => {
                "Point --wallet or ANCHOR_WALLET at a Solana CLI keypair file".to_string()
            }
            Self::Io(_) => "Check file paths and permissions".to_string(),
            Self::Serialization(_) | Self::InvalidEncoding { .. } => {
                "The node returned an unexpected response; check the cluster URL".to_string()
            }
            Self::Transaction { .. } => "Report this as a bug".to_string(),
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Http(_) => "Could not reach the cluster".to_string(),
            Self::Rpc { message, .. } => format!("The cluster rejected the request: {}", message),
            Self::AlreadyInitialized { address } => {
                format!("Fee data account {} already exists", address)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering_drives_exit_codes() {
        let timeout = InitError::ConfirmationTimeout {
            signature: "sig".to_string(),
            waited: Duration::from_secs(1),
        };
        let rejected = InitError::Rpc {
            code: -32002,
            message: "simulation failed".to_string(),
            logs: vec![],
        };
        let config = InitError::Keypair {
            message: "cannot load wallet".to_string(),
        };

        assert_eq!(timeout.severity(), ErrorSeverity::Medium);
        assert!(timeout.is_retryable());
        assert_eq!(rejected.severity(), ErrorSeverity::High);
        assert_eq!(config.severity(), ErrorSeverity::Critical);
        assert!(config.severity() > rejected.severity());
    }

    #[test]
    fn test_rpc_suggestion_mentions_logs_when_present() {
        let err = InitError::Rpc {
            code: -32002,
            message: "custom program error: 0x0".to_string(),
            logs: vec!["Program log: AnchorError".to_string()],
        };
        assert_eq!(err.category(), ErrorCategory::Remote);
        assert!(err.recovery_suggestion().contains("program logs"));
    }
}
