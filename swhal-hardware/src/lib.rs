//! swhal-hardware
//!
//! Drivers, accessors and components for switch hardware. Drivers wrap a
//! kernel module or a sysfs directory, components own drivers and create
//! accessors, and [`Platform`] assembles components from a configuration
//! file into an inventory.
//
//! Public API:
//! - `driver` - `Driver` trait, kernel module drivers, `DriverSet`
//! - `sysfs` - fan, LED, temperature and transceiver sysfs drivers
//! - `accessors` - `FanImpl`, `LedImpl`, `TempImpl`, `XcvrImpl`
//! - `components` - fan, sensor and transceiver components
//! - `platform::Platform` - bring-up from a `PlatformConfig`

pub mod accessors;
pub mod components;
pub mod driver;
pub mod platform;
pub mod sysfs;

pub use accessors::{FanImpl, LedImpl, TempImpl, XcvrImpl};
pub use components::{
    Component, FanComponentOptions, Max6658, RavenFanCpldComponent, ScdFanComponent,
    XcvrComponent,
};
pub use driver::{Driver, DriverHandle, DriverSet, I2cKernelDriver, KernelDriver};
pub use platform::Platform;
pub use sysfs::{FanSysfsDriver, LedSysfsDriver, TempSysfsDriver, XcvrSysfsDriver};
