use anyhow::Context;
use clap::Parser;
use fee_predictor_init::utils::error::ErrorSeverity;
use fee_predictor_init::utils::logger;
use fee_predictor_init::{
    plan_initialize, AnchorToml, CliArgs, EnvContext, Program, ResolvedConfig,
};
use std::path::Path;

fn load_config(args: &CliArgs) -> anyhow::Result<ResolvedConfig> {
    // Anchor.toml 是可選的; 缺少時只用環境變數和預設值
    let file = if Path::new(&args.config).exists() {
        tracing::info!("📁 Loading configuration from: {}", args.config);
        Some(
            AnchorToml::from_file(&args.config)
                .with_context(|| format!("failed to load config file '{}'", args.config))?,
        )
    } else {
        tracing::debug!("No config file at {}, using environment", args.config);
        None
    };

    let config = ResolvedConfig::resolve(&args.overrides(), &EnvContext::from_env(), file.as_ref())?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting fee-predictor-init");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(3);
        }
    };

    if args.dry_run {
        plan_initialize(&config)
            .with_context(|| format!("dry run failed for {}", config.wallet_path.display()))?;
        return Ok(());
    }

    let result = match Program::connect(&config) {
        Ok(program) => program.initialize().await,
        Err(e) => Err(e),
    };

    // 成功時簽名已由 Program::initialize 記錄
    if let Err(e) = result {
        tracing::error!(
            "❌ initialize failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        if let fee_predictor_init::InitError::Rpc { logs, .. } = &e {
            for line in logs {
                tracing::error!("  {}", line);
            }
        }
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
