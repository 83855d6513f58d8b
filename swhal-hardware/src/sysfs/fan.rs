//! hwmon fan driver

use std::path::{Path, PathBuf};

use swhal_core::{DriverRole, HalError, Result};
use tracing::debug;

use super::{read_bool, read_value, write_value};
use crate::driver::Driver;

/// Fan control through the `pwm<N>` / `fan<N>_*` files of a hwmon directory
#[derive(Debug, Clone)]
pub struct FanSysfsDriver {
    max_pwm: u32,
    sysfs_path: PathBuf,
    wait_file: Option<PathBuf>,
}

impl FanSysfsDriver {
    /// Create a driver for a hwmon directory
    ///
    /// # Arguments
    /// * `max_pwm` - Raw PWM value corresponding to 100% speed
    /// * `sysfs_path` - hwmon directory, e.g. `/sys/.../hwmon/hwmon1`
    /// * `wait_file` - File that must exist before the driver is usable
    pub fn new(max_pwm: u32, sysfs_path: impl Into<PathBuf>, wait_file: Option<PathBuf>) -> Self {
        Self {
            max_pwm,
            sysfs_path: sysfs_path.into(),
            wait_file,
        }
    }

    pub fn max_pwm(&self) -> u32 {
        self.max_pwm
    }

    pub fn sysfs_path(&self) -> &Path {
        &self.sysfs_path
    }

    fn file(&self, name: String) -> PathBuf {
        self.sysfs_path.join(name)
    }

    fn check_max_pwm(&self) -> Result<u64> {
        if self.max_pwm == 0 {
            return Err(HalError::InvalidInput(format!(
                "max_pwm of {} must be non-zero",
                self.sysfs_path.display()
            )));
        }
        Ok(u64::from(self.max_pwm))
    }

    /// Speed in percent, rounded to the nearest integer
    ///
    /// A raw value above `max_pwm` is reported as a hardware error.
    pub fn get_fan_speed(&self, fan_id: u32) -> Result<u32> {
        let max_pwm = self.check_max_pwm()?;
        let path = self.file(format!("pwm{}", fan_id));
        let raw: u64 = read_value(&path)?;
        if raw > max_pwm {
            return Err(HalError::Hardware(format!(
                "{}: pwm {} above maximum {}",
                path.display(),
                raw,
                max_pwm
            )));
        }
        Ok(((raw * 100 + max_pwm / 2) / max_pwm) as u32)
    }

    pub fn set_fan_speed(&self, fan_id: u32, speed: u32) -> Result<()> {
        if speed > 100 {
            return Err(HalError::InvalidInput(format!(
                "Fan speed must be 0-100, got {}",
                speed
            )));
        }
        let raw = u64::from(speed) * self.check_max_pwm()? / 100;
        debug!("fan{}: speed {}% -> pwm {}", fan_id, speed, raw);
        write_value(&self.file(format!("pwm{}", fan_id)), raw)
    }

    pub fn get_fan_rpm(&self, fan_id: u32) -> Result<u32> {
        read_value(&self.file(format!("fan{}_input", fan_id)))
    }

    pub fn get_fan_presence(&self, fan_id: u32) -> Result<bool> {
        read_bool(&self.file(format!("fan{}_present", fan_id)))
    }

    /// Fault flag; hwmon drivers without a fault file never report one
    pub fn get_fan_fault(&self, fan_id: u32) -> Result<bool> {
        let path = self.file(format!("fan{}_fault", fan_id));
        if !path.exists() {
            return Ok(false);
        }
        read_bool(&path)
    }
}

impl Driver for FanSysfsDriver {
    fn role(&self) -> DriverRole {
        DriverRole::FanSysfs
    }

    fn name(&self) -> String {
        format!("{}({})", self.role(), self.sysfs_path.display())
    }

    fn setup(&self) -> Result<()> {
        match &self.wait_file {
            Some(path) if !path.exists() => Err(HalError::NotReady(path.clone())),
            _ => Ok(()),
        }
    }
}
