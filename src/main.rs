use anyhow::Context;
use clap::Parser;
use nmap_report::utils::error::ErrorSeverity;
use nmap_report::utils::{logger, validation::Validate};
use nmap_report::{CliConfig, LocalStorage, ScanConfig, ScanEngine, ScanError, ScanPipeline};

fn load_config(cli: &CliConfig) -> anyhow::Result<ScanConfig> {
    let config = cli.resolve().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ {:#}", e);
            if let Some(scan_err) = e.downcast_ref::<ScanError>() {
                eprintln!("💡 Suggestion: {}", scan_err.recovery_suggestion());
            }
            std::process::exit(1);
        }
    };

    if config.targets.is_empty() {
        tracing::warn!("No targets given, nothing will be scanned");
    }

    let pipeline = ScanPipeline::new(LocalStorage::current_dir(), config);
    let engine = ScanEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            eprintln!("\n-> Generated HTML report \"{}\"", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Scan failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // 依錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
