//! Accessor traits
//!
//! An accessor is the externally visible handle for one physical resource
//! (a fan, an LED, a temperature diode, a transceiver slot). Concrete
//! implementations live in `swhal-hardware` and are bound to the drivers of
//! the component that created them; consumers only see these traits through
//! the [`Inventory`](crate::inventory::Inventory).

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{I2cAddr, LedColor, SensorDesc, XcvrKind};

/// LED indicator
pub trait Led: Send + Sync {
    /// LED name, i.e. the directory under the LED class
    fn name(&self) -> &str;

    fn get_color(&self) -> Result<LedColor>;

    fn set_color(&self, color: LedColor) -> Result<()>;
}

/// Fan with its status LED
pub trait Fan: Send + Sync {
    /// Fan number as used by the hwmon files (`pwm<id>`)
    fn id(&self) -> u32;

    fn name(&self) -> String {
        format!("fan{}", self.id())
    }

    /// Speed in percent of the maximum PWM
    fn get_speed(&self) -> Result<u32>;

    /// Set speed in percent of the maximum PWM
    fn set_speed(&self, speed: u32) -> Result<()>;

    /// Tachometer reading
    fn get_rpm(&self) -> Result<u32>;

    fn get_presence(&self) -> Result<bool>;

    /// `true` when the fan reports no fault
    fn get_status(&self) -> Result<bool>;

    fn led(&self) -> Option<Arc<dyn Led>>;
}

/// Temperature sensor diode
pub trait Temp: Send + Sync {
    fn desc(&self) -> &SensorDesc;

    fn name(&self) -> &str {
        &self.desc().name
    }

    /// Current temperature in °C
    fn get_temperature(&self) -> Result<f64>;

    fn get_low_threshold(&self) -> Result<f64>;

    fn set_low_threshold(&self, value: f64) -> Result<()>;

    fn get_high_threshold(&self) -> Result<f64>;

    fn set_high_threshold(&self, value: f64) -> Result<()>;

    fn get_critical_threshold(&self) -> Result<f64>;
}

/// Transceiver slot
///
/// `set_low_power_mode` and `reset` return `Ok(false)` when the slot has
/// no such control line; errors are reserved for failed hardware access.
pub trait Xcvr: Send + Sync {
    fn port_num(&self) -> u32;

    fn kind(&self) -> XcvrKind;

    /// I2C address of the module's EEPROM
    fn addr(&self) -> I2cAddr;

    /// Sysfs file exposing the module's EEPROM
    fn eeprom_path(&self) -> PathBuf {
        let addr = self.addr();
        PathBuf::from(format!(
            "/sys/class/i2c-adapter/i2c-{}/{}/eeprom",
            addr.bus,
            addr.device_name()
        ))
    }

    fn get_presence(&self) -> Result<bool>;

    fn get_low_power_mode(&self) -> Result<bool>;

    fn set_low_power_mode(&self, value: bool) -> Result<bool>;

    /// Assert (`true`) or deassert (`false`) the reset line
    fn reset(&self, value: bool) -> Result<bool>;
}
