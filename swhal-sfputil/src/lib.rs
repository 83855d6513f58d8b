//! swhal-sfputil
//!
//! Transceiver utility adapter for the host network OS. The host expects a
//! fixed set of operations per front panel port ([`SfpUtilBase`]); this crate
//! provides two backends for it:
//!
//! - [`SfpUtilNative`] drives the transceiver accessors of the platform
//!   inventory (sysfs control lines and EEPROM files).
//! - [`SfpUtilCeos`] answers from data reported by a ceos instance's CLI,
//!   for deployments where ceos owns the transceivers.
//!
//! [`sfp_util`] picks the backend at call time.

pub mod ceos;
pub mod cli;
pub mod native;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use swhal_core::{CeosConfig, Inventory, Result};
use tracing::debug;

pub use ceos::SfpUtilCeos;
pub use cli::{ceos_manages_xcvrs, CliRunner, EosCli, CEOS_ENV_VAR};
pub use native::SfpUtilNative;

/// Time a transceiver is held in reset before being released
pub const RESET_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Bytes per EEPROM page returned by [`SfpUtilBase::read_eeprom_devid`]
pub const EEPROM_SIZE: usize = 256;

/// Device address of the identification EEPROM
pub const EEPROM_DEVID: u8 = 0x50;

/// Device address of the diagnostics (DOM) EEPROM
pub const EEPROM_DOM_DEVID: u8 = 0x51;

/// Operations the host expects from a transceiver utility
///
/// Port ranges and mappings come from the inventory for every backend.
/// Operations report failure as `false` (or `None` for EEPROM reads) rather
/// than as errors.
pub trait SfpUtilBase {
    fn inventory(&self) -> &Inventory;

    fn port_start(&self) -> u32 {
        self.inventory().port_start()
    }

    fn port_end(&self) -> u32 {
        self.inventory().port_end()
    }

    fn qsfp_ports(&self) -> Vec<u32> {
        self.inventory().qsfp_range().to_vec()
    }

    fn port_to_eeprom_mapping(&self) -> BTreeMap<u32, PathBuf> {
        self.inventory().get_port_to_eeprom_mapping()
    }

    fn port_to_i2cbus_mapping(&self) -> BTreeMap<u32, u32> {
        self.inventory().get_port_to_i2c_adapter_mapping()
    }

    /// Whether `port` lies within `port_start..=port_end`
    fn is_valid_port(&self, port: u32) -> bool {
        port >= self.port_start() && port <= self.port_end()
    }

    fn get_presence(&self, port: u32) -> bool;

    fn get_low_power_mode(&self, port: u32) -> bool;

    fn set_low_power_mode(&self, port: u32, lpmode: bool) -> bool;

    /// Pulse the reset line of the transceiver
    fn reset(&self, port: u32) -> bool;

    /// Read one 256 byte EEPROM page as two digit lowercase hex strings
    fn read_eeprom_devid(&self, port: u32, devid: u8, offset: u64) -> Option<Vec<String>>;

    fn get_eeprom_raw(&self, port: u32) -> Option<Vec<String>> {
        self.read_eeprom_devid(port, EEPROM_DEVID, 0)
    }

    fn get_eeprom_dom_raw(&self, port: u32) -> Option<Vec<String>> {
        self.read_eeprom_devid(port, EEPROM_DOM_DEVID, 0)
    }
}

/// Backend chosen by [`sfp_util`]
pub enum SfpUtil {
    Native(SfpUtilNative),
    Ceos(SfpUtilCeos),
}

impl SfpUtil {
    fn backend(&self) -> &dyn SfpUtilBase {
        match self {
            SfpUtil::Native(util) => util,
            SfpUtil::Ceos(util) => util,
        }
    }

    /// Backend name, for display
    pub fn kind(&self) -> &'static str {
        match self {
            SfpUtil::Native(_) => "native",
            SfpUtil::Ceos(_) => "ceos",
        }
    }
}

impl SfpUtilBase for SfpUtil {
    fn inventory(&self) -> &Inventory {
        self.backend().inventory()
    }

    fn is_valid_port(&self, port: u32) -> bool {
        self.backend().is_valid_port(port)
    }

    fn get_presence(&self, port: u32) -> bool {
        self.backend().get_presence(port)
    }

    fn get_low_power_mode(&self, port: u32) -> bool {
        self.backend().get_low_power_mode(port)
    }

    fn set_low_power_mode(&self, port: u32, lpmode: bool) -> bool {
        self.backend().set_low_power_mode(port, lpmode)
    }

    fn reset(&self, port: u32) -> bool {
        self.backend().reset(port)
    }

    fn read_eeprom_devid(&self, port: u32, devid: u8, offset: u64) -> Option<Vec<String>> {
        self.backend().read_eeprom_devid(port, devid, offset)
    }
}

/// Build the transceiver utility for the current environment
///
/// The ceos predicate is evaluated on every call. The ceos backend queries
/// the CLI through `runner` once, here.
pub fn sfp_util(
    inventory: Arc<Inventory>,
    config: &CeosConfig,
    runner: &dyn CliRunner,
) -> Result<SfpUtil> {
    if ceos_manages_xcvrs(config) {
        debug!("Transceivers managed by ceos");
        Ok(SfpUtil::Ceos(SfpUtilCeos::from_config(
            inventory, config, runner,
        )?))
    } else {
        debug!("Transceivers managed natively");
        Ok(SfpUtil::Native(SfpUtilNative::new(inventory)))
    }
}

/// Hex encode bytes the way EEPROM pages are reported
pub(crate) fn hex_bytes(bytes: &[u8]) -> Vec<String> {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
