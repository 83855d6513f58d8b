//! Fan components
//!
//! Both flavours expose the same `create_fan` contract; they differ only in
//! the bus they sit on and the default sysfs paths of their drivers.

use std::path::PathBuf;
use std::sync::Arc;

use swhal_core::{ComponentAddr, DriverRole, PciAddr, Result};
use tracing::debug;

use super::{driver_not_found, Component};
use crate::accessors::{FanImpl, LedImpl};
use crate::driver::{DriverSet, KernelDriver};
use crate::sysfs::{FanSysfsDriver, LedSysfsDriver, LED_CLASS_PATH};

const MAX_PWM: u32 = 255;

const RAVEN_KERNEL_MODULE: &str = "raven-fan-driver";
const RAVEN_PLATFORM_DEVICE: &str = "sb800-fans";
const RAVEN_HWMON_PATH: &str = "/sys/devices/platform/sb800-fans/hwmon/hwmon1";

const SCD_HWMON_PATH: &str = "/sys/devices/pci0000:00/0000:00:09.0/hwmon/hwmon2";

/// Overrides for the default fan and LED driver configuration
#[derive(Debug, Clone, Default)]
pub struct FanComponentOptions {
    pub sysfs_path: Option<PathBuf>,
    pub led_path: Option<PathBuf>,
    pub wait_file: Option<PathBuf>,
}

impl FanComponentOptions {
    fn fan_driver(&self, default_path: &str) -> FanSysfsDriver {
        FanSysfsDriver::new(
            MAX_PWM,
            self.sysfs_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(default_path)),
            self.wait_file.clone(),
        )
    }

    fn led_driver(&self) -> LedSysfsDriver {
        LedSysfsDriver::new(
            self.led_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(LED_CLASS_PATH)),
        )
    }
}

/// Look up both drivers, then build the LED and the fan
fn build_fan(
    component: &dyn Component,
    fan_id: u32,
    driver: DriverRole,
    led_driver: DriverRole,
    led_id: u32,
) -> Result<FanImpl> {
    let drivers = component.drivers();
    let fan_driver: Arc<FanSysfsDriver> = drivers
        .fan(driver)
        .ok_or_else(|| driver_not_found(component, driver))?;
    let led_driver = drivers
        .led(led_driver)
        .ok_or_else(|| driver_not_found(component, led_driver))?;

    let led = LedImpl::new(format!("fan{}", led_id), led_driver);
    Ok(FanImpl::new(fan_id, fan_driver, led))
}

/// Fan CPLD on the platform bus, driven by `raven-fan-driver`
pub struct RavenFanCpldComponent {
    addr: ComponentAddr,
    drivers: DriverSet,
}

impl RavenFanCpldComponent {
    /// Component with the default kernel module, hwmon and LED drivers
    pub fn new(addr: Option<ComponentAddr>, options: &FanComponentOptions) -> Self {
        let drivers = DriverSet::new()
            .with(KernelDriver::new(RAVEN_KERNEL_MODULE))
            .with(options.fan_driver(RAVEN_HWMON_PATH))
            .with(options.led_driver());
        Self::with_drivers(addr, drivers)
    }

    /// Component with caller supplied drivers
    pub fn with_drivers(addr: Option<ComponentAddr>, drivers: DriverSet) -> Self {
        Self {
            addr: addr.unwrap_or_else(|| ComponentAddr::platform(RAVEN_PLATFORM_DEVICE)),
            drivers,
        }
    }

    /// Create fan `fan_id` bound to the drivers holding the given roles
    pub fn create_fan(
        &self,
        fan_id: u32,
        driver: DriverRole,
        led_driver: DriverRole,
    ) -> Result<FanImpl> {
        debug!("creating raven fan {}", fan_id);
        build_fan(self, fan_id, driver, led_driver, fan_id)
    }
}

impl Component for RavenFanCpldComponent {
    fn name(&self) -> &'static str {
        "RavenFanCpldComponent"
    }

    fn addr(&self) -> &ComponentAddr {
        &self.addr
    }

    fn drivers(&self) -> &DriverSet {
        &self.drivers
    }
}

/// Fan block of the PCI system controller
pub struct ScdFanComponent {
    addr: ComponentAddr,
    drivers: DriverSet,
}

impl ScdFanComponent {
    /// Component with the default hwmon and LED drivers
    pub fn new(addr: Option<ComponentAddr>, options: &FanComponentOptions) -> Self {
        let drivers = DriverSet::new()
            .with(options.fan_driver(SCD_HWMON_PATH))
            .with(options.led_driver());
        Self::with_drivers(addr, drivers)
    }

    /// Component with caller supplied drivers
    pub fn with_drivers(addr: Option<ComponentAddr>, drivers: DriverSet) -> Self {
        Self {
            addr: addr.unwrap_or(ComponentAddr::Pci(PciAddr::new(0, 0, 0x09, 0))),
            drivers,
        }
    }

    /// Create fan `fan_id`; its LED is `fan<led_id>`, defaulting to the fan number
    pub fn create_fan(
        &self,
        fan_id: u32,
        driver: DriverRole,
        led_driver: DriverRole,
        led_id: Option<u32>,
    ) -> Result<FanImpl> {
        debug!("creating scd fan {}", fan_id);
        build_fan(self, fan_id, driver, led_driver, led_id.unwrap_or(fan_id))
    }
}

impl Component for ScdFanComponent {
    fn name(&self) -> &'static str {
        "ScdFanComponent"
    }

    fn addr(&self) -> &ComponentAddr {
        &self.addr
    }

    fn drivers(&self) -> &DriverSet {
        &self.drivers
    }
}
