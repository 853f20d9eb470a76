use clap::Parser;
use dex_catalog::core::ConfigProvider;
use dex_catalog::utils::error::ErrorSeverity;
use dex_catalog::utils::{logger, validation::Validate};
use dex_catalog::{CatalogEngine, CatalogPipeline, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-catalog")]
#[command(about = "Catalog export driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "dex-catalog.toml")]
    config: String,

    /// Override the generation from the config file
    #[arg(short, long)]
    generation: Option<u32>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Show what would be fetched without making any request
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Some(generation) = args.generation {
        config.set_generation(generation);
        tracing::info!("Generation overridden to: {}", generation);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("Dry run, no requests made");
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = CatalogPipeline::new(storage, config)?;
    let engine = CatalogEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Catalog written to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "Catalog run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
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
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("API: {}", config.api_base_url());
    tracing::info!("Generation: {}", config.generation());
    tracing::info!(
        "Batch size: {}, retries: {}, retry delay: {:?}",
        config.batch_size(),
        config.retry_attempts(),
        config.retry_delay()
    );
    tracing::info!(
        "Output: {} ({}){}",
        config.output_path(),
        config.output_formats().join(", "),
        if config.compress_output() { " zipped" } else { "" }
    );
}
