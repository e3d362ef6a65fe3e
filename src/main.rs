use anyhow::Context;
use bts_coverage::core::ConfigProvider;
use bts_coverage::utils::error::ErrorSeverity;
use bts_coverage::utils::{logger, validation::Validate};
use bts_coverage::{CliConfig, CoverageEngine, CoveragePipeline, LocalStorage, TomlConfig};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting bts-coverage");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let exit_code = match cli.config.clone() {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            let config = TomlConfig::from_file(&path)
                .with_context(|| format!("failed to load config file '{}'", path))?;
            execute(config).await
        }
        None => execute(cli).await,
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn execute<C: ConfigProvider + Validate>(config: C) -> i32 {
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return 1;
    }

    let output_path = config.output_path().to_string();
    let storage = LocalStorage::new(".");
    let engine = CoverageEngine::new(CoveragePipeline::new(storage, config));

    match engine.run().await {
        Ok(report) => {
            println!("✅ Sector coverage generated for {} sectors", report.sectors_exported);
            println!("📁 Output saved to: {}", output_path);
            for file in &report.kml_files {
                println!("   {}", file);
            }
            if let Some(archive) = &report.archive {
                println!("   {}", archive);
            }
            if let Some(overlay) = &report.overlay {
                println!("   {}", overlay);
            }
            0
        }
        Err(e) => {
            tracing::error!(
                "Coverage run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            }
        }
    }
}
