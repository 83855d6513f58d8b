//! swhal Core Library
//!
//! Shared types, accessor traits, the platform inventory and configuration
//! for the switch hardware abstraction layer. Used by the hardware drivers,
//! the transceiver utility adapter and the CLI.

pub mod accessors;
pub mod config;
pub mod error;
pub mod inventory;
pub mod port_config;
pub mod types;

// Re-export commonly used types
pub use accessors::{Fan, Led, Temp, Xcvr};
pub use config::{default_config_path, resolve_config_path, CeosConfig, PlatformConfig};
pub use error::*;
pub use inventory::Inventory;
pub use port_config::{PortConfig, PortMapping};
pub use types::*;
