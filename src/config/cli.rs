use super::Overrides;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "fee-predictor-init")]
#[command(about = "Send the `initialize` request to a deployed fee predictor program")]
pub struct CliArgs {
    /// Anchor workspace file to read [provider] and [programs.*] from
    #[arg(short, long, default_value = "Anchor.toml")]
    pub config: String,

    /// Cluster alias (localnet, devnet, testnet, mainnet) or RPC URL
    #[arg(long)]
    pub cluster: Option<String>,

    /// Payer keypair file (Solana CLI JSON format)
    #[arg(long)]
    pub wallet: Option<String>,

    #[arg(long)]
    pub program_id: Option<String>,

    /// processed, confirmed or finalized
    #[arg(long)]
    pub commitment: Option<String>,

    /// Give up waiting for confirmation after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long)]
    pub skip_preflight: bool,

    /// Send even if the fee data account already exists
    #[arg(long)]
    pub skip_existing_check: bool,

    /// Resolve accounts and exit without contacting the cluster
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            cluster: self.cluster.clone(),
            wallet: self.wallet.clone(),
            program_id: self.program_id.clone(),
            commitment: self.commitment.clone(),
            timeout_secs: self.timeout_secs,
            skip_preflight: self.skip_preflight,
            skip_existing_check: self.skip_existing_check,
        }
    }
}
