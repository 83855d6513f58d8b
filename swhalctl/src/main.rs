//! swhal CLI
//!
//! Command-line interface for the fans, temperature sensors and transceivers
//! of a switch platform.

use anyhow::{Context, Result};
use clap::Parser;
use swhal_core::{resolve_config_path, PlatformConfig};
use swhal_hardware::Platform;
use swhal_sfputil::{sfp_util, EosCli};
use swhalctl::cli::{
    generate_completion, handle_clean, handle_config, handle_fans, handle_setup, handle_sfp,
    handle_temps, Cli, Commands,
};
use tracing::{debug, info};

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    init_tracing(verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if verbose {
            eprintln!("Error details: {:?}", e);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Completion needs no platform
    if let Commands::Completion { shell } = cli.command {
        generate_completion(shell);
        return Ok(());
    }

    let config_path = resolve_config_path(cli.config);
    debug!("Configuration file: {}", config_path.display());
    let config = PlatformConfig::load(&config_path)
        .with_context(|| format!("Cannot load platform config {}", config_path.display()))?;

    if let Commands::Config { command } = cli.command {
        return handle_config(command, &config, &config_path, &cli.format);
    }

    let platform = Platform::from_config(&config)?;
    info!(
        "Platform: {} component(s), ports {}-{}",
        platform.components().len(),
        platform.inventory().port_start(),
        platform.inventory().port_end()
    );

    match cli.command {
        Commands::Sfp { command } => {
            let runner = EosCli::from_config(&config.ceos);
            let util = sfp_util(platform.inventory(), &config.ceos, &runner)?;
            debug!("Using {} transceiver backend", util.kind());
            handle_sfp(&util, command, &cli.format)
        }
        Commands::Fans => handle_fans(&platform.inventory(), &cli.format),
        Commands::Temps => handle_temps(&platform.inventory(), &cli.format),
        Commands::Setup => handle_setup(&platform),
        Commands::Clean => handle_clean(&platform),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
