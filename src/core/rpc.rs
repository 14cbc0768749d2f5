use crate::domain::model::{
    parse_base58, Commitment, Hash, LatestBlockhash, Pubkey, SendOptions, Signature,
    SignatureStatus,
};
use crate::domain::ports::RpcTransport;
use crate::utils::error::{InitError, Result};
use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl RpcErrorObject {
    fn into_error(self) -> InitError {
        // 模擬失敗時節點會把程式日誌放在 data.logs
        let logs: Vec<String> = self
            .data
            .as_ref()
            .and_then(|d| d.get("logs"))
            .and_then(|l| l.as_array())
            .map(|lines| {
                lines
                    .iter()
                    .filter_map(|l| l.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        InitError::Rpc {
            code: self.code,
            message: self.message,
            logs,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockhashValue {
    blockhash: String,
    last_valid_block_height: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusValue {
    slot: u64,
    #[serde(default)]
    confirmation_status: Option<Commitment>,
    #[serde(default)]
    err: Option<Value>,
}

/// JSON-RPC 2.0 client for a cluster's HTTP endpoint.
pub struct HttpRpcClient {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::debug!("RPC {} #{} -> {}", method, id, self.url);
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: RpcResponse<T> = response.json().await?;
        if let Some(err) = parsed.error {
            tracing::debug!("RPC {} #{} returned error {}", method, id, err.code);
            return Err(err.into_error());
        }
        parsed.result.ok_or_else(|| InitError::Rpc {
            code: -32603,
            message: format!("{} returned neither result nor error", method),
            logs: vec![],
        })
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn latest_blockhash(&self, commitment: Commitment) -> Result<LatestBlockhash> {
        let resp: WithContext<BlockhashValue> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": commitment.as_str() }]),
            )
            .await?;
        Ok(LatestBlockhash {
            blockhash: parse_base58::<Hash>("blockhash", &resp.value.blockhash)?,
            last_valid_block_height: resp.value.last_valid_block_height,
        })
    }

    async fn block_height(&self, commitment: Commitment) -> Result<u64> {
        self.call("getBlockHeight", json!([{ "commitment": commitment.as_str() }]))
            .await
    }

    async fn send_transaction(&self, wire: &[u8], options: &SendOptions) -> Result<Signature> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(wire);
        let mut config = json!({
            "encoding": "base64",
            "skipPreflight": options.skip_preflight,
            "preflightCommitment": options.preflight_commitment.as_str(),
        });
        if let Some(max_retries) = options.max_retries {
            config["maxRetries"] = json!(max_retries);
        }

        let signature: String = self
            .call("sendTransaction", json!([encoded, config]))
            .await?;
        parse_base58("signature", &signature)
    }

    async fn signature_status(&self, signature: &Signature) -> Result<Option<SignatureStatus>> {
        let resp: WithContext<Vec<Option<StatusValue>>> = self
            .call(
                "getSignatureStatuses",
                json!([[signature.to_string()], { "searchTransactionHistory": false }]),
            )
            .await?;

        Ok(resp.value.into_iter().next().flatten().map(|s| SignatureStatus {
            slot: s.slot,
            confirmation_status: s.confirmation_status,
            err: s.err.filter(|e| !e.is_null()),
        }))
    }

    async fn account_exists(&self, address: &Pubkey, commitment: Commitment) -> Result<bool> {
        let resp: WithContext<Option<Value>> = self
            .call(
                "getAccountInfo",
                json!([
                    address.to_string(),
                    {
                        "encoding": "base64",
                        "commitment": commitment.as_str(),
                        "dataSlice": { "offset": 0, "length": 0 },
                    }
                ]),
            )
            .await?;
        Ok(resp.value.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> HttpRpcClient {
        HttpRpcClient::new(server.url("/"), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_latest_blockhash_parses_context_value() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/").body_contains("getLatestBlockhash");
            then.status(200).json_body(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {
                    "context": { "slot": 100 },
                    "value": {
                        "blockhash": "11111111111111111111111111111111",
                        "lastValidBlockHeight": 250
                    }
                }
            }));
        });

        let latest = client(&server)
            .latest_blockhash(Commitment::Confirmed)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(latest.blockhash, Hash::default());
        assert_eq!(latest.last_valid_block_height, 250);
    }

    #[tokio::test]
    async fn test_rpc_error_carries_simulation_logs() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/").body_contains("sendTransaction");
            then.status(200).json_body(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {
                    "code": -32002,
                    "message": "Transaction simulation failed",
                    "data": { "logs": ["Program log: already in use"] }
                }
            }));
        });

        let err = client(&server)
            .send_transaction(&[1, 2, 3], &SendOptions::default())
            .await
            .unwrap_err();

        match err {
            InitError::Rpc { code, logs, .. } => {
                assert_eq!(code, -32002);
                assert_eq!(logs, vec!["Program log: already in use".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_signature_has_no_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/").body_contains("getSignatureStatuses");
            then.status(200).json_body(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": { "context": { "slot": 5 }, "value": [null] }
            }));
        });

        let status = client(&server)
            .signature_status(&Signature::from([1u8; 64]))
            .await
            .unwrap();
        assert!(status.is_none());
    }

    #[tokio::test]
    async fn test_malformed_signature_is_an_encoding_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/").body_contains("sendTransaction");
            then.status(200)
                .json_body(json!({ "jsonrpc": "2.0", "id": 1, "result": "not-base58-0OIl" }));
        });

        let err = client(&server)
            .send_transaction(&[1, 2, 3], &SendOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, InitError::InvalidEncoding { .. }));
    }

    #[tokio::test]
    async fn test_http_failure_maps_to_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/");
            then.status(503);
        });

        let err = client(&server)
            .block_height(Commitment::Confirmed)
            .await
            .unwrap_err();
        assert!(matches!(err, InitError::Http(_)));
    }
}
