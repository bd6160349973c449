use clap::Parser;
use ncd_convert::cli::{Cli, Commands};
use ncd_convert::config::Config;
use std::path::Path;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config).unwrap_or_else(|e| {
        if Path::new(&cli.config).exists() {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
        }
        Config::default()
    });
    if let Some(level) = &cli.log_level {
        config.telemetry.log_level = level.clone();
    }

    // Initialize telemetry
    ncd_convert::telemetry::init_telemetry(&config.telemetry)?;

    let success = match cli.command {
        Commands::Convert(args) => {
            tracing::info!("Starting conversion");
            args.execute(&config).await?
        }
        Commands::Verify(args) => {
            tracing::info!("Starting verification");
            args.execute(&config).await?
        }
        Commands::Classify(args) => {
            args.execute();
            true
        }
        Commands::Config => {
            println!("Current configuration:");
            print!("{}", toml::to_string_pretty(&config)?);
            true
        }
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
