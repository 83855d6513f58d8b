//! Platform description loaded once at startup
//!
//! ```toml
//! [ports]
//! qsfp = { start = 1, end = 32 }
//! sfp = { start = 33, end = 34 }
//!
//! [xcvr]
//! sysfs_path = "/sys/devices/pci0000:00/0000:00:02.2/0000:02:00.0"
//! first_bus = 10
//!
//! [[fan_components]]
//! kind = "scd"
//! fans = [{ id = 1 }, { id = 2, led_id = 5 }]
//!
//! [[sensor_components]]
//! bus = 3
//! address = 0x4c
//! sensors = [{ diode = 0, name = "Cpu board temp sensor", overheat = 75.0, critical = 85.0 }]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HalError, Result};
use crate::port_config::DEFAULT_PORT_CONFIG_PATH;
use crate::types::{ComponentAddr, SensorDesc};

/// Inclusive range of front panel ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub start: u32,
    pub end: u32,
}

impl PortRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }

    pub fn contains(&self, port: u32) -> bool {
        self.iter().contains(&port)
    }

    fn overlaps(&self, other: &PortRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Front panel ports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortsConfig {
    #[serde(default)]
    pub sfp: Option<PortRange>,
    #[serde(default)]
    pub qsfp: Option<PortRange>,
}

impl PortsConfig {
    /// Lowest declared port
    pub fn first_port(&self) -> Option<u32> {
        [self.sfp, self.qsfp].iter().flatten().map(|r| r.start).min()
    }
}

/// Transceiver control lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XcvrConfig {
    /// Directory holding `qsfp<N>_present`, `qsfp<N>_reset`, ...
    pub sysfs_path: PathBuf,
    /// I2C bus of the first port's EEPROM; following ports use consecutive buses
    pub first_bus: u32,
}

impl Default for XcvrConfig {
    fn default() -> Self {
        Self {
            sysfs_path: PathBuf::from("/sys/devices/pci0000:00/0000:00:02.2/0000:02:00.0"),
            first_bus: 10,
        }
    }
}

/// Fan controller flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanComponentKind {
    /// CPLD behind the platform bus, driven by `raven-fan-driver`
    Raven,
    /// Fan block of the PCI system controller
    Scd,
}

/// One fan of a fan component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanConfig {
    pub id: u32,
    /// LED number when it differs from the fan number
    #[serde(default)]
    pub led_id: Option<u32>,
}

/// A fan component and the fans it drives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanComponentConfig {
    pub kind: FanComponentKind,
    /// Bus address; defaults depend on `kind`
    #[serde(default)]
    pub addr: Option<ComponentAddr>,
    /// Override of the hwmon directory
    #[serde(default)]
    pub sysfs_path: Option<PathBuf>,
    /// Override of the LED class directory
    #[serde(default)]
    pub led_path: Option<PathBuf>,
    /// File that must exist before the fan driver is usable
    #[serde(default)]
    pub wait_file: Option<PathBuf>,
    #[serde(default)]
    pub fans: Vec<FanConfig>,
}

/// A MAX6658 temperature sensor chip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorComponentConfig {
    pub bus: u32,
    pub address: u16,
    /// Override of the device sysfs directory
    #[serde(default)]
    pub sysfs_path: Option<PathBuf>,
    #[serde(default)]
    pub sensors: Vec<SensorDesc>,
}

/// Settings for transceivers managed by a ceos instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeosConfig {
    /// Marker file whose presence means ceos manages the transceivers
    #[serde(default = "default_marker_path")]
    pub marker_path: PathBuf,
    #[serde(default = "default_port_config")]
    pub port_config: PathBuf,
    #[serde(default = "default_cli_program")]
    pub cli_program: String,
    #[serde(default = "default_cli_args")]
    pub cli_args: Vec<String>,
}

fn default_marker_path() -> PathBuf {
    PathBuf::from("/etc/sonic/ceos_manages_xcvrs")
}

fn default_port_config() -> PathBuf {
    PathBuf::from(DEFAULT_PORT_CONFIG_PATH)
}

fn default_cli_program() -> String {
    "Cli".to_string()
}

fn default_cli_args() -> Vec<String> {
    vec!["-p".to_string(), "15".to_string(), "-c".to_string()]
}

impl Default for CeosConfig {
    fn default() -> Self {
        Self {
            marker_path: default_marker_path(),
            port_config: default_port_config(),
            cli_program: default_cli_program(),
            cli_args: default_cli_args(),
        }
    }
}

/// Complete platform description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub ports: PortsConfig,
    #[serde(default)]
    pub xcvr: XcvrConfig,
    #[serde(default)]
    pub fan_components: Vec<FanComponentConfig>,
    #[serde(default)]
    pub sensor_components: Vec<SensorComponentConfig>,
    #[serde(default)]
    pub ceos: CeosConfig,
}

impl PlatformConfig {
    /// Read, parse and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HalError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse PlatformConfig from TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize PlatformConfig to TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| HalError::Serialization(e.to_string()))
    }

    /// Check port ranges and fan numbering
    pub fn validate(&self) -> Result<()> {
        for (name, range) in [("sfp", self.ports.sfp), ("qsfp", self.ports.qsfp)] {
            if let Some(range) = range {
                if range.start > range.end {
                    return Err(HalError::Config(format!(
                        "{} port range is empty: {}..={}",
                        name, range.start, range.end
                    )));
                }
            }
        }

        if let (Some(sfp), Some(qsfp)) = (self.ports.sfp, self.ports.qsfp) {
            if sfp.overlaps(&qsfp) {
                return Err(HalError::Config(format!(
                    "sfp ports {}..={} overlap qsfp ports {}..={}",
                    sfp.start, sfp.end, qsfp.start, qsfp.end
                )));
            }
        }

        for component in &self.fan_components {
            let mut ids: Vec<u32> = component.fans.iter().map(|f| f.id).collect();
            ids.sort_unstable();
            if let Some(pair) = ids.windows(2).find(|w| w[0] == w[1]) {
                return Err(HalError::Config(format!(
                    "duplicate fan id {} in {:?} component",
                    pair[0], component.kind
                )));
            }
        }

        Ok(())
    }
}
