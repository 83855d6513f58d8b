//! Transceiver slots

use std::path::PathBuf;

use swhal_core::{ComponentAddr, DriverRole, I2cAddr, Result, XcvrKind};
use tracing::debug;

use super::{driver_not_found, Component};
use crate::accessors::XcvrImpl;
use crate::driver::DriverSet;
use crate::sysfs::XcvrSysfsDriver;

/// Address of the module EEPROM on each port's I2C bus
pub const XCVR_EEPROM_ADDRESS: u16 = 0x50;

/// Block of transceiver slots sharing one control line directory
pub struct XcvrComponent {
    addr: ComponentAddr,
    drivers: DriverSet,
}

impl XcvrComponent {
    pub fn new(addr: ComponentAddr, sysfs_path: impl Into<PathBuf>) -> Self {
        Self::with_drivers(addr, DriverSet::new().with(XcvrSysfsDriver::new(sysfs_path)))
    }

    pub fn with_drivers(addr: ComponentAddr, drivers: DriverSet) -> Self {
        Self { addr, drivers }
    }

    /// Create the slot for `port`, whose EEPROM sits on I2C bus `bus`
    pub fn create_xcvr(&self, port: u32, kind: XcvrKind, bus: u32) -> Result<XcvrImpl> {
        let driver = self
            .drivers
            .xcvr(DriverRole::XcvrSysfs)
            .ok_or_else(|| driver_not_found(self, DriverRole::XcvrSysfs))?;

        debug!("creating {} xcvr {} on bus {}", kind, port, bus);
        Ok(XcvrImpl::new(
            port,
            kind,
            I2cAddr::new(bus, XCVR_EEPROM_ADDRESS),
            driver,
        ))
    }
}

impl Component for XcvrComponent {
    fn name(&self) -> &'static str {
        "XcvrComponent"
    }

    fn addr(&self) -> &ComponentAddr {
        &self.addr
    }

    fn drivers(&self) -> &DriverSet {
        &self.drivers
    }
}
