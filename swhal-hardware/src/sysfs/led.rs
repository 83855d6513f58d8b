//! LED class driver

use std::path::{Path, PathBuf};

use swhal_core::{DriverRole, HalError, LedColor, Result};

use super::{read_value, write_value};
use crate::driver::Driver;

/// Default LED class directory
pub const LED_CLASS_PATH: &str = "/sys/class/leds";

/// LED control through `<sysfs_path>/<led>/brightness`
#[derive(Debug, Clone)]
pub struct LedSysfsDriver {
    sysfs_path: PathBuf,
}

impl LedSysfsDriver {
    pub fn new(sysfs_path: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_path: sysfs_path.into(),
        }
    }

    pub fn sysfs_path(&self) -> &Path {
        &self.sysfs_path
    }

    fn brightness(&self, led: &str) -> PathBuf {
        self.sysfs_path.join(led).join("brightness")
    }

    pub fn get_led_color(&self, led: &str) -> Result<LedColor> {
        let path = self.brightness(led);
        let value: u32 = read_value(&path)?;
        LedColor::from_brightness(value).ok_or_else(|| {
            HalError::Hardware(format!(
                "Unknown brightness {} for LED {} in {}",
                value,
                led,
                path.display()
            ))
        })
    }

    pub fn set_led_color(&self, led: &str, color: LedColor) -> Result<()> {
        write_value(&self.brightness(led), color.brightness())
    }
}

impl Default for LedSysfsDriver {
    fn default() -> Self {
        Self::new(LED_CLASS_PATH)
    }
}

impl Driver for LedSysfsDriver {
    fn role(&self) -> DriverRole {
        DriverRole::LedSysfs
    }

    fn name(&self) -> String {
        format!("{}({})", self.role(), self.sysfs_path.display())
    }
}
