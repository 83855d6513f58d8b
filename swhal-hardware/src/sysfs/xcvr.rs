//! Transceiver control line driver

use std::path::{Path, PathBuf};

use swhal_core::{DriverRole, Result, XcvrKind};

use super::{read_bool, write_value};
use crate::driver::Driver;

/// Presence, low-power-mode and reset lines exposed as
/// `<kind><port>_present`, `<kind><port>_lp_mode` and `<kind><port>_reset`
#[derive(Debug, Clone)]
pub struct XcvrSysfsDriver {
    sysfs_path: PathBuf,
}

impl XcvrSysfsDriver {
    pub fn new(sysfs_path: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_path: sysfs_path.into(),
        }
    }

    pub fn sysfs_path(&self) -> &Path {
        &self.sysfs_path
    }

    fn line(&self, kind: XcvrKind, port: u32, line: &str) -> PathBuf {
        self.sysfs_path
            .join(format!("{}{}_{}", kind.sysfs_prefix(), port, line))
    }

    pub fn get_presence(&self, kind: XcvrKind, port: u32) -> Result<bool> {
        read_bool(&self.line(kind, port, "present"))
    }

    pub fn get_low_power_mode(&self, kind: XcvrKind, port: u32) -> Result<bool> {
        read_bool(&self.line(kind, port, "lp_mode"))
    }

    pub fn set_low_power_mode(&self, kind: XcvrKind, port: u32, value: bool) -> Result<()> {
        write_value(&self.line(kind, port, "lp_mode"), u8::from(value))
    }

    pub fn set_reset(&self, kind: XcvrKind, port: u32, value: bool) -> Result<()> {
        write_value(&self.line(kind, port, "reset"), u8::from(value))
    }
}

impl Driver for XcvrSysfsDriver {
    fn role(&self) -> DriverRole {
        DriverRole::XcvrSysfs
    }

    fn name(&self) -> String {
        format!("{}({})", self.role(), self.sysfs_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("qsfp5_present"), "1\n").unwrap();
        let driver = XcvrSysfsDriver::new(dir.path());

        assert!(driver.get_presence(XcvrKind::Qsfp, 5).unwrap());
        assert!(driver.get_presence(XcvrKind::Sfp, 5).is_err());

        driver.set_low_power_mode(XcvrKind::Qsfp, 5, true).unwrap();
        assert!(driver.get_low_power_mode(XcvrKind::Qsfp, 5).unwrap());

        driver.set_reset(XcvrKind::Qsfp, 5, true).unwrap();
        let raw = std::fs::read_to_string(dir.path().join("qsfp5_reset")).unwrap();
        assert_eq!(raw, "1");
    }
}
