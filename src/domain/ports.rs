use crate::domain::model::{
    Commitment, LatestBlockhash, Pubkey, SendOptions, Signature, SignatureStatus,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// The slice of the cluster JSON-RPC API the client needs.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn latest_blockhash(&self, commitment: Commitment) -> Result<LatestBlockhash>;

    async fn block_height(&self, commitment: Commitment) -> Result<u64>;

    /// `wire` is the signed, serialized transaction.
    async fn send_transaction(&self, wire: &[u8], options: &SendOptions) -> Result<Signature>;

    async fn signature_status(&self, signature: &Signature) -> Result<Option<SignatureStatus>>;

    async fn account_exists(&self, address: &Pubkey, commitment: Commitment) -> Result<bool>;
}

pub trait ProviderConfig: Send + Sync {
    fn cluster_url(&self) -> &str;
    fn wallet_path(&self) -> &Path;
    fn program_id(&self) -> &Pubkey;
    fn commitment(&self) -> Commitment;
    fn confirm_timeout(&self) -> Duration;
    fn poll_interval(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
    fn send_options(&self) -> SendOptions;
    fn skip_existing_check(&self) -> bool;
}
