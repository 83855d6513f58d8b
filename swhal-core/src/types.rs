//! Core types shared by drivers, components and consumers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HalError;

/// I2C address of a device: adapter bus number and 7-bit slave address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct I2cAddr {
    pub bus: u32,
    pub address: u16,
}

impl I2cAddr {
    pub fn new(bus: u32, address: u16) -> Self {
        Self { bus, address }
    }

    /// Kernel device name, e.g. `3-004c`
    pub fn device_name(&self) -> String {
        format!("{}-{:04x}", self.bus, self.address)
    }

    /// Sysfs directory of the instantiated device
    pub fn sysfs_path(&self) -> String {
        format!("/sys/bus/i2c/devices/{}", self.device_name())
    }
}

impl fmt::Display for I2cAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i2c-{}:0x{:02x}", self.bus, self.address)
    }
}

/// PCI address of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PciAddr {
    #[serde(default)]
    pub domain: u16,
    pub bus: u8,
    pub device: u8,
    #[serde(default)]
    pub function: u8,
}

impl PciAddr {
    pub fn new(domain: u16, bus: u8, device: u8, function: u8) -> Self {
        Self {
            domain,
            bus,
            device,
            function,
        }
    }
}

impl fmt::Display for PciAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04x}:{:02x}:{:02x}.{}",
            self.domain, self.bus, self.device, self.function
        )
    }
}

/// Bus address identifying a component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "bus_type")]
pub enum ComponentAddr {
    /// Platform device, identified by its device name
    Platform { name: String },
    /// Reached over an I2C adapter
    I2c(I2cAddr),
    /// Reached over PCI
    Pci(PciAddr),
}

impl ComponentAddr {
    pub fn platform(name: impl Into<String>) -> Self {
        ComponentAddr::Platform { name: name.into() }
    }
}

impl fmt::Display for ComponentAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentAddr::Platform { name } => write!(f, "platform-{}", name),
            ComponentAddr::I2c(addr) => write!(f, "{}", addr),
            ComponentAddr::Pci(addr) => write!(f, "pci-{}", addr),
        }
    }
}

/// Setup ordering of components; lower values are set up first
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Thermal sensors come up before anything that may heat the box
    Thermal = 0,
    #[default]
    Default = 1,
    Background = 2,
}

/// Role a driver plays inside a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DriverRole {
    /// Plain kernel module
    Kernel,
    /// Kernel module plus I2C device instantiation
    I2cKernel,
    /// hwmon PWM/tach files
    FanSysfs,
    /// `/sys/class/leds` brightness files
    LedSysfs,
    /// hwmon temperature files
    TempSysfs,
    /// Transceiver presence/reset/lpmode lines
    XcvrSysfs,
}

impl DriverRole {
    /// Name the driver is known by in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            DriverRole::Kernel => "KernelDriver",
            DriverRole::I2cKernel => "I2cKernelDriver",
            DriverRole::FanSysfs => "FanSysfsDriver",
            DriverRole::LedSysfs => "LedSysfsDriver",
            DriverRole::TempSysfs => "TempSysfsDriver",
            DriverRole::XcvrSysfs => "XcvrSysfsDriver",
        }
    }
}

impl fmt::Display for DriverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// LED color as encoded in the sysfs brightness file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedColor {
    Off,
    Green,
    Red,
    Yellow,
}

impl LedColor {
    /// Brightness value written to sysfs
    pub fn brightness(&self) -> u32 {
        match self {
            LedColor::Off => 0,
            LedColor::Green => 1,
            LedColor::Red => 2,
            LedColor::Yellow => 3,
        }
    }

    /// Decode a brightness value read from sysfs
    pub fn from_brightness(value: u32) -> Option<Self> {
        match value {
            0 => Some(LedColor::Off),
            1 => Some(LedColor::Green),
            2 => Some(LedColor::Red),
            3 => Some(LedColor::Yellow),
            _ => None,
        }
    }
}

impl fmt::Display for LedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LedColor::Off => "off",
            LedColor::Green => "green",
            LedColor::Red => "red",
            LedColor::Yellow => "yellow",
        };
        f.write_str(name)
    }
}

impl FromStr for LedColor {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" => Ok(LedColor::Off),
            "green" => Ok(LedColor::Green),
            "red" => Ok(LedColor::Red),
            "yellow" | "amber" => Ok(LedColor::Yellow),
            _ => Err(HalError::InvalidInput(format!(
                "Unknown LED color: '{}'. Valid options: off, green, red, yellow",
                s
            ))),
        }
    }
}

/// Transceiver form factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XcvrKind {
    Sfp,
    Qsfp,
}

impl XcvrKind {
    /// Prefix of the per-port control files, e.g. `qsfp` in `qsfp5_reset`
    pub fn sysfs_prefix(&self) -> &'static str {
        match self {
            XcvrKind::Sfp => "sfp",
            XcvrKind::Qsfp => "qsfp",
        }
    }

    /// Whether the form factor has low-power-mode and reset lines
    pub fn has_lpmode_and_reset(&self) -> bool {
        matches!(self, XcvrKind::Qsfp)
    }
}

impl fmt::Display for XcvrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sysfs_prefix())
    }
}

/// Description of one temperature diode on a sensor chip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDesc {
    /// Zero-based diode index on the chip
    pub diode: u32,
    /// Human readable sensor name, unique per platform
    pub name: String,
    /// Expected operating temperature in °C
    #[serde(default)]
    pub target: Option<f64>,
    /// Overheat threshold in °C
    #[serde(default)]
    pub overheat: Option<f64>,
    /// Critical threshold in °C
    #[serde(default)]
    pub critical: Option<f64>,
}

impl SensorDesc {
    pub fn new(diode: u32, name: impl Into<String>) -> Self {
        Self {
            diode,
            name: name.into(),
            target: None,
            overheat: None,
            critical: None,
        }
    }

    pub fn with_thresholds(mut self, overheat: f64, critical: f64) -> Self {
        self.overheat = Some(overheat);
        self.critical = Some(critical);
        self
    }
}
