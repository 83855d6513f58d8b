//! Sysfs backed drivers
//!
//! Each driver wraps one sysfs directory and reads or writes plain value
//! files inside it. Paths are configurable so the drivers can be pointed at
//! a fake tree in tests.

mod fan;
mod led;
mod temp;
mod xcvr;

pub use fan::FanSysfsDriver;
pub use led::{LedSysfsDriver, LED_CLASS_PATH};
pub use temp::TempSysfsDriver;
pub use xcvr::XcvrSysfsDriver;

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use swhal_core::{HalError, Result};
use tracing::debug;

/// Read a sysfs file and parse its trimmed content
pub(crate) fn read_value<T>(path: &Path) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let content = std::fs::read_to_string(path).map_err(|e| {
        HalError::Hardware(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let value = content.trim();
    debug!("read {} = {}", path.display(), value);

    value.parse::<T>().map_err(|e| {
        HalError::Parse(format!(
            "Invalid value '{}' in {}: {}",
            value,
            path.display(),
            e
        ))
    })
}

/// Read a `0`/`1` sysfs file
pub(crate) fn read_bool(path: &Path) -> Result<bool> {
    Ok(read_value::<u32>(path)? != 0)
}

/// Write a value to a sysfs file
pub(crate) fn write_value(path: &Path, value: impl Display) -> Result<()> {
    let value = value.to_string();
    debug!("write {} = {}", path.display(), value);

    std::fs::write(path, &value).map_err(|e| {
        HalError::Hardware(format!(
            "Failed to write '{}' to {}: {}",
            value,
            path.display(),
            e
        ))
    })
}
