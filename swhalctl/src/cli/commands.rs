//! CLI command and subcommand definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Switch hardware platform CLI
#[derive(Parser, Debug)]
#[command(name = "swhalctl")]
#[command(version, about = "Switch hardware platform CLI", long_about = None)]
pub struct Cli {
    /// Platform config file (default: ~/.config/swhal/platform.toml, or $SWHAL_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty table output
    Table,
    /// JSON output
    Json,
}

impl From<&OutputFormat> for crate::format::OutputFormat {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Table => crate::format::OutputFormat::Table,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transceiver commands
    Sfp {
        #[command(subcommand)]
        command: SfpCommands,
    },

    /// Show fan speed, RPM and status
    Fans,

    /// Show temperature sensors
    Temps,

    /// Load drivers and instantiate devices
    Setup,

    /// Unload what setup loaded
    Clean,

    /// Show the platform configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum SfpCommands {
    /// Show transceiver presence
    Presence {
        /// Front panel port (default: all ports)
        #[arg(short, long)]
        port: Option<u32>,
    },

    /// Show low power mode
    Lpmode {
        /// Front panel port (default: all ports)
        #[arg(short, long)]
        port: Option<u32>,
    },

    /// Dump transceiver EEPROM
    Eeprom {
        /// Front panel port (default: all ports)
        #[arg(short, long)]
        port: Option<u32>,

        /// Dump the diagnostics page instead of the identification page
        #[arg(long)]
        dom: bool,
    },

    /// Enable or disable low power mode
    SetLpmode {
        /// Front panel port
        port: u32,

        #[arg(value_enum)]
        state: LpmodeState,
    },

    /// Reset a transceiver
    Reset {
        /// Front panel port
        port: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LpmodeState {
    On,
    Off,
}

impl From<LpmodeState> for bool {
    fn from(state: LpmodeState) -> Self {
        state == LpmodeState::On
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the loaded configuration
    Show,
}
