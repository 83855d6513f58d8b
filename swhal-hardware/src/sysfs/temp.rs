//! hwmon temperature driver

use std::path::{Path, PathBuf};

use swhal_core::{DriverRole, HalError, I2cAddr, Result};

use super::{read_value, write_value};
use crate::driver::Driver;

/// Temperature readings from the hwmon directory of a sensor device
///
/// Values in sysfs are millidegrees Celsius; diode `n` maps to the
/// `temp<n+1>_*` files.
#[derive(Debug, Clone)]
pub struct TempSysfsDriver {
    device_path: PathBuf,
}

impl TempSysfsDriver {
    /// Create a driver for a device sysfs directory (the parent of `hwmon/`)
    pub fn new(device_path: impl Into<PathBuf>) -> Self {
        Self {
            device_path: device_path.into(),
        }
    }

    /// Driver for an instantiated I2C device
    pub fn for_i2c(addr: I2cAddr) -> Self {
        Self::new(addr.sysfs_path())
    }

    pub fn device_path(&self) -> &Path {
        &self.device_path
    }

    /// First `hwmon*` directory of the device
    ///
    /// The hwmon index is assigned by the kernel at probe time, so it is
    /// resolved on every access rather than cached.
    fn hwmon_dir(&self) -> Result<PathBuf> {
        let hwmon = self.device_path.join("hwmon");
        std::fs::read_dir(&hwmon)
            .map_err(|_| HalError::NotReady(hwmon.clone()))?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let index = entry
                    .file_name()
                    .to_str()?
                    .strip_prefix("hwmon")?
                    .parse::<u32>()
                    .ok()?;
                Some((index, entry.path()))
            })
            .min_by_key(|(index, _)| *index)
            .map(|(_, path)| path)
            .ok_or(HalError::NotReady(hwmon))
    }

    fn file(&self, diode: u32, suffix: &str) -> Result<PathBuf> {
        Ok(self
            .hwmon_dir()?
            .join(format!("temp{}_{}", diode + 1, suffix)))
    }

    fn read_celsius(&self, diode: u32, suffix: &str) -> Result<f64> {
        let millis: i64 = read_value(&self.file(diode, suffix)?)?;
        Ok(millis as f64 / 1000.0)
    }

    fn write_celsius(&self, diode: u32, suffix: &str, value: f64) -> Result<()> {
        let millis = (value * 1000.0).round() as i64;
        write_value(&self.file(diode, suffix)?, millis)
    }

    pub fn get_temperature(&self, diode: u32) -> Result<f64> {
        self.read_celsius(diode, "input")
    }

    pub fn get_low_threshold(&self, diode: u32) -> Result<f64> {
        self.read_celsius(diode, "min")
    }

    pub fn set_low_threshold(&self, diode: u32, value: f64) -> Result<()> {
        self.write_celsius(diode, "min", value)
    }

    pub fn get_high_threshold(&self, diode: u32) -> Result<f64> {
        self.read_celsius(diode, "max")
    }

    pub fn set_high_threshold(&self, diode: u32, value: f64) -> Result<()> {
        self.write_celsius(diode, "max", value)
    }

    pub fn get_critical_threshold(&self, diode: u32) -> Result<f64> {
        self.read_celsius(diode, "crit")
    }
}

impl Driver for TempSysfsDriver {
    fn role(&self) -> DriverRole {
        DriverRole::TempSysfs
    }

    fn name(&self) -> String {
        format!("{}({})", self.role(), self.device_path.display())
    }
}
