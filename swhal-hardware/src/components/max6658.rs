//! MAX6658 temperature sensor

use std::path::PathBuf;
use std::sync::Arc;

use swhal_core::{ComponentAddr, DriverRole, I2cAddr, Inventory, Priority, Result, SensorDesc};
use tracing::debug;

use super::{driver_not_found, Component};
use crate::accessors::TempImpl;
use crate::driver::{DriverSet, I2cKernelDriver};
use crate::sysfs::TempSysfsDriver;

const DEVICE_NAME: &str = "max6658";
const KERNEL_MODULE: &str = "lm90";

/// MAX6658 remote/local temperature sensor on an I2C bus
pub struct Max6658 {
    addr: ComponentAddr,
    drivers: DriverSet,
    priority: Priority,
    sensors: Vec<SensorDesc>,
}

impl Max6658 {
    /// Sensor with the `lm90` device driver and its hwmon directory
    pub fn new(addr: I2cAddr) -> Self {
        let drivers = DriverSet::new()
            .with(I2cKernelDriver::new(DEVICE_NAME, KERNEL_MODULE, addr))
            .with(TempSysfsDriver::for_i2c(addr));
        Self::with_drivers(addr, drivers)
    }

    /// Sensor whose hwmon directory lives under `device_path` instead of the I2C device
    pub fn with_sysfs_path(addr: I2cAddr, device_path: impl Into<PathBuf>) -> Self {
        let drivers = DriverSet::new()
            .with(I2cKernelDriver::new(DEVICE_NAME, KERNEL_MODULE, addr))
            .with(TempSysfsDriver::new(device_path));
        Self::with_drivers(addr, drivers)
    }

    /// Sensor with caller supplied drivers
    pub fn with_drivers(addr: I2cAddr, drivers: DriverSet) -> Self {
        Self {
            addr: ComponentAddr::I2c(addr),
            drivers,
            priority: Priority::Thermal,
            sensors: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Register an initial set of sensors
    pub fn with_sensors(mut self, inventory: &mut Inventory, sensors: Vec<SensorDesc>) -> Result<Self> {
        if !sensors.is_empty() {
            self.add_temp_sensors(inventory, sensors)?;
        }
        Ok(self)
    }

    /// Record the sensors and register one temperature accessor per descriptor
    ///
    /// There is no deduplication: adding a descriptor twice registers it twice.
    pub fn add_temp_sensors(
        &mut self,
        inventory: &mut Inventory,
        sensors: impl IntoIterator<Item = SensorDesc>,
    ) -> Result<()> {
        let driver = self
            .drivers
            .temp(DriverRole::TempSysfs)
            .ok_or_else(|| driver_not_found(&*self, DriverRole::TempSysfs))?;

        for sensor in sensors {
            debug!("adding temp sensor '{}' (diode {})", sensor.name, sensor.diode);
            self.sensors.push(sensor.clone());
            inventory.add_temp(Arc::new(TempImpl::new(sensor, driver.clone())));
        }
        Ok(())
    }

    /// Every descriptor added so far, duplicates included
    pub fn sensors(&self) -> &[SensorDesc] {
        &self.sensors
    }
}

impl Component for Max6658 {
    fn name(&self) -> &'static str {
        "Max6658"
    }

    fn addr(&self) -> &ComponentAddr {
        &self.addr
    }

    fn drivers(&self) -> &DriverSet {
        &self.drivers
    }

    fn priority(&self) -> Priority {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swhal_core::HalError;

    #[test]
    fn test_default_drivers_and_priority() {
        let sensor = Max6658::new(I2cAddr::new(3, 0x4c));

        assert_eq!(
            sensor.drivers().roles(),
            vec![DriverRole::I2cKernel, DriverRole::TempSysfs]
        );
        assert_eq!(sensor.priority(), Priority::Thermal);
        assert_eq!(sensor.addr().to_string(), "i2c-3:0x4c");
    }

    #[test]
    fn test_add_registers_each_descriptor() {
        let mut inventory = Inventory::new();
        let mut sensor = Max6658::new(I2cAddr::new(3, 0x4c));

        sensor
            .add_temp_sensors(
                &mut inventory,
                vec![SensorDesc::new(0, "Cpu board"), SensorDesc::new(1, "Back-panel")],
            )
            .unwrap();

        assert_eq!(sensor.sensors().len(), 2);
        let names: Vec<&str> = inventory.temps().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Cpu board", "Back-panel"]);
    }

    #[test]
    fn test_missing_temp_driver() {
        let mut inventory = Inventory::new();
        let mut sensor = Max6658::with_drivers(I2cAddr::new(3, 0x4c), DriverSet::new());

        let result = sensor.add_temp_sensors(&mut inventory, vec![SensorDesc::new(0, "Cpu")]);
        assert!(matches!(result, Err(HalError::DriverNotFound { .. })));
        assert!(inventory.temps().is_empty());
        assert!(sensor.sensors().is_empty());
    }
}
