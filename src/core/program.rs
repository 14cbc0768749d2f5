use crate::core::instruction::{self, InitializeAccounts};
use crate::core::keypair::load_keypair;
use crate::core::rpc::HttpRpcClient;
use crate::domain::model::{Commitment, Confirmation, Instruction, Pubkey, SendOptions, Signature};
use crate::domain::ports::{ProviderConfig, RpcTransport};
use crate::utils::error::{InitError, Result};
use chrono::Utc;
use solana_sdk::packet::PACKET_DATA_SIZE;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::Transaction;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct ProgramOptions {
    pub commitment: Commitment,
    pub confirm_timeout: Duration,
    pub poll_interval: Duration,
    pub send: SendOptions,
    pub skip_existing_check: bool,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            commitment: Commitment::Confirmed,
            confirm_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
            send: SendOptions::default(),
            skip_existing_check: false,
        }
    }
}

impl ProgramOptions {
    pub fn from_config<C: ProviderConfig + ?Sized>(config: &C) -> Self {
        Self {
            commitment: config.commitment(),
            confirm_timeout: config.confirm_timeout(),
            poll_interval: config.poll_interval(),
            send: config.send_options(),
            skip_existing_check: config.skip_existing_check(),
        }
    }
}

/// Resolves what `initialize` would send without touching the cluster:
/// loads the wallet, derives the accounts and logs them.
pub fn plan_initialize<C: ProviderConfig + ?Sized>(config: &C) -> Result<InitializeAccounts> {
    let payer = load_keypair(config.wallet_path())?;
    let accounts = InitializeAccounts::derive(config.program_id(), &payer.pubkey());

    tracing::info!("🔍 DRY RUN MODE - nothing will be sent");
    tracing::info!("  cluster:        {}", config.cluster_url());
    tracing::info!("  program:        {}", config.program_id());
    tracing::info!("  payer:          {}", accounts.payer);
    tracing::info!("  fee_data:       {}", accounts.fee_data);
    tracing::info!("  system_program: {}", accounts.system_program);
    tracing::info!("  commitment:     {}", config.commitment());
    Ok(accounts)
}

/// Handle to a deployed program, bound to a payer and a cluster.
pub struct Program<R: RpcTransport> {
    program_id: Pubkey,
    payer: Keypair,
    rpc: R,
    options: ProgramOptions,
}

impl Program<HttpRpcClient> {
    /// Builds a handle from the provider context: cluster URL, wallet and program id.
    pub fn connect<C: ProviderConfig + ?Sized>(config: &C) -> Result<Self> {
        let payer = load_keypair(config.wallet_path())?;
        let rpc = HttpRpcClient::new(config.cluster_url(), config.request_timeout())?;
        tracing::info!(
            "🔗 Program {} on {} (payer {})",
            config.program_id(),
            config.cluster_url(),
            payer.pubkey()
        );
        Ok(Self::new(
            *config.program_id(),
            payer,
            rpc,
            ProgramOptions::from_config(config),
        ))
    }
}

impl<R: RpcTransport> Program<R> {
    pub fn new(program_id: Pubkey, payer: Keypair, rpc: R, options: ProgramOptions) -> Self {
        Self {
            program_id,
            payer,
            rpc,
            options,
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn initialize_accounts(&self) -> InitializeAccounts {
        InitializeAccounts::derive(&self.program_id, &self.payer.pubkey())
    }

    /// Sends `initialize` once and waits for the configured commitment.
    /// Returns the transaction signature.
    pub async fn initialize(&self) -> Result<Signature> {
        let accounts = self.initialize_accounts();

        if !self.options.skip_existing_check
            && self
                .rpc
                .account_exists(&accounts.fee_data, self.options.commitment)
                .await?
        {
            return Err(InitError::AlreadyInitialized {
                address: accounts.fee_data.to_string(),
            });
        }

        let ix = instruction::initialize(self.program_id, &accounts);
        let confirmation = self.send_and_confirm(&[ix]).await?;

        tracing::info!("Your transaction signature {}", confirmation.signature);
        Ok(confirmation.signature)
    }

    pub async fn send_and_confirm(&self, instructions: &[Instruction]) -> Result<Confirmation> {
        let latest = self.rpc.latest_blockhash(self.options.commitment).await?;
        let payer = self.payer.pubkey();
        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&payer),
            &[&self.payer],
            latest.blockhash,
        );
        let wire = bincode::serialize(&tx).map_err(|e| InitError::Transaction {
            message: format!("cannot serialize transaction: {}", e),
        })?;
        if wire.len() > PACKET_DATA_SIZE {
            return Err(InitError::Transaction {
                message: format!(
                    "transaction is {} bytes, limit is {}",
                    wire.len(),
                    PACKET_DATA_SIZE
                ),
            });
        }
        let expected = tx.signatures.first().copied().ok_or_else(|| InitError::Transaction {
            message: "transaction has no signatures".to_string(),
        })?;

        tracing::debug!(
            "Sending {} byte transaction (blockhash {}, valid until height {})",
            wire.len(),
            latest.blockhash,
            latest.last_valid_block_height
        );
        let signature = self.rpc.send_transaction(&wire, &self.options.send).await?;
        if signature != expected {
            tracing::warn!(
                "Node returned signature {} but transaction was signed as {}",
                signature,
                expected
            );
        }

        self.await_confirmation(signature, latest.last_valid_block_height)
            .await
    }

    async fn await_confirmation(
        &self,
        signature: Signature,
        last_valid_block_height: u64,
    ) -> Result<Confirmation> {
        let started = Instant::now();
        let poll = self.poll_until_confirmed(signature, last_valid_block_height);

        match tokio::time::timeout(self.options.confirm_timeout, poll).await {
            Ok(result) => {
                if result.is_ok() {
                    tracing::debug!("{} confirmed after {:?}", signature, started.elapsed());
                }
                result
            }
            Err(_) => Err(InitError::ConfirmationTimeout {
                signature: signature.to_string(),
                waited: started.elapsed(),
            }),
        }
    }

    async fn poll_until_confirmed(
        &self,
        signature: Signature,
        last_valid_block_height: u64,
    ) -> Result<Confirmation> {
        let commitment = self.options.commitment;
        loop {
            if let Some(status) = self.rpc.signature_status(&signature).await? {
                if let Some(err) = &status.err {
                    return Err(InitError::TransactionFailed {
                        signature: signature.to_string(),
                        reason: err.to_string(),
                    });
                }
                if status.satisfies(commitment) {
                    return Ok(Confirmation {
                        signature,
                        slot: status.slot,
                        commitment,
                        confirmed_at: Utc::now(),
                    });
                }
                tracing::debug!(
                    "{} at {:?}, waiting for {}",
                    signature,
                    status.confirmation_status,
                    commitment
                );
            }

            // 區塊高度超過 lastValidBlockHeight 後交易不可能再上鏈
            let height = self.rpc.block_height(commitment).await?;
            if height > last_valid_block_height {
                return Err(InitError::BlockhashExpired {
                    signature: signature.to_string(),
                });
            }

            tokio::time::sleep(self.options.poll_interval).await;
        }
    }
}
