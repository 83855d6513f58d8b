//! Accessor implementations bound to sysfs drivers
//!
//! Accessors are created by components and registered into the inventory.
//! Creating one performs no I/O; hardware is only touched when one of the
//! accessor methods is called.

use std::sync::Arc;

use swhal_core::{
    Fan, HalError, I2cAddr, Led, LedColor, Result, SensorDesc, Temp, Xcvr, XcvrKind,
};

use crate::sysfs::{FanSysfsDriver, LedSysfsDriver, TempSysfsDriver, XcvrSysfsDriver};

/// LED backed by the LED class
pub struct LedImpl {
    name: String,
    driver: Arc<LedSysfsDriver>,
}

impl LedImpl {
    pub fn new(name: impl Into<String>, driver: Arc<LedSysfsDriver>) -> Self {
        Self {
            name: name.into(),
            driver,
        }
    }
}

impl Led for LedImpl {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_color(&self) -> Result<LedColor> {
        self.driver.get_led_color(&self.name)
    }

    fn set_color(&self, color: LedColor) -> Result<()> {
        self.driver.set_led_color(&self.name, color)
    }
}

/// Fan backed by a hwmon directory, with its status LED
pub struct FanImpl {
    fan_id: u32,
    driver: Arc<FanSysfsDriver>,
    led: Arc<LedImpl>,
}

impl FanImpl {
    pub fn new(fan_id: u32, driver: Arc<FanSysfsDriver>, led: LedImpl) -> Self {
        Self {
            fan_id,
            driver,
            led: Arc::new(led),
        }
    }

    /// The fan's LED as its concrete type
    pub fn led_impl(&self) -> &LedImpl {
        &self.led
    }
}

impl Fan for FanImpl {
    fn id(&self) -> u32 {
        self.fan_id
    }

    fn get_speed(&self) -> Result<u32> {
        self.driver.get_fan_speed(self.fan_id)
    }

    fn set_speed(&self, speed: u32) -> Result<()> {
        self.driver.set_fan_speed(self.fan_id, speed)
    }

    fn get_rpm(&self) -> Result<u32> {
        self.driver.get_fan_rpm(self.fan_id)
    }

    fn get_presence(&self) -> Result<bool> {
        self.driver.get_fan_presence(self.fan_id)
    }

    fn get_status(&self) -> Result<bool> {
        Ok(!self.driver.get_fan_fault(self.fan_id)?)
    }

    fn led(&self) -> Option<Arc<dyn Led>> {
        Some(self.led.clone())
    }
}

/// Temperature diode backed by a hwmon directory
///
/// Thresholds missing from sysfs fall back to the descriptor's values.
pub struct TempImpl {
    desc: SensorDesc,
    driver: Arc<TempSysfsDriver>,
}

impl TempImpl {
    pub fn new(desc: SensorDesc, driver: Arc<TempSysfsDriver>) -> Self {
        Self { desc, driver }
    }

    fn or_desc(&self, value: Result<f64>, fallback: Option<f64>) -> Result<f64> {
        match (value, fallback) {
            (Ok(value), _) => Ok(value),
            (Err(HalError::Hardware(_)), Some(fallback)) => Ok(fallback),
            (Err(e), _) => Err(e),
        }
    }
}

impl Temp for TempImpl {
    fn desc(&self) -> &SensorDesc {
        &self.desc
    }

    fn get_temperature(&self) -> Result<f64> {
        self.driver.get_temperature(self.desc.diode)
    }

    fn get_low_threshold(&self) -> Result<f64> {
        self.driver.get_low_threshold(self.desc.diode)
    }

    fn set_low_threshold(&self, value: f64) -> Result<()> {
        self.driver.set_low_threshold(self.desc.diode, value)
    }

    fn get_high_threshold(&self) -> Result<f64> {
        self.or_desc(
            self.driver.get_high_threshold(self.desc.diode),
            self.desc.overheat,
        )
    }

    fn set_high_threshold(&self, value: f64) -> Result<()> {
        self.driver.set_high_threshold(self.desc.diode, value)
    }

    fn get_critical_threshold(&self) -> Result<f64> {
        self.or_desc(
            self.driver.get_critical_threshold(self.desc.diode),
            self.desc.critical,
        )
    }
}

/// Transceiver slot backed by control line files
pub struct XcvrImpl {
    port: u32,
    kind: XcvrKind,
    addr: I2cAddr,
    driver: Arc<XcvrSysfsDriver>,
}

impl XcvrImpl {
    pub fn new(port: u32, kind: XcvrKind, addr: I2cAddr, driver: Arc<XcvrSysfsDriver>) -> Self {
        Self {
            port,
            kind,
            addr,
            driver,
        }
    }
}

impl Xcvr for XcvrImpl {
    fn port_num(&self) -> u32 {
        self.port
    }

    fn kind(&self) -> XcvrKind {
        self.kind
    }

    fn addr(&self) -> I2cAddr {
        self.addr
    }

    fn get_presence(&self) -> Result<bool> {
        self.driver.get_presence(self.kind, self.port)
    }

    fn get_low_power_mode(&self) -> Result<bool> {
        if !self.kind.has_lpmode_and_reset() {
            return Ok(false);
        }
        self.driver.get_low_power_mode(self.kind, self.port)
    }

    fn set_low_power_mode(&self, value: bool) -> Result<bool> {
        if !self.kind.has_lpmode_and_reset() {
            return Ok(false);
        }
        self.driver.set_low_power_mode(self.kind, self.port, value)?;
        Ok(true)
    }

    fn reset(&self, value: bool) -> Result<bool> {
        if !self.kind.has_lpmode_and_reset() {
            return Ok(false);
        }
        self.driver.set_reset(self.kind, self.port, value)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_status_follows_fault() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fan1_fault"), "0\n").unwrap();
        std::fs::create_dir(dir.path().join("fan1")).unwrap();

        let fan_driver = Arc::new(FanSysfsDriver::new(255, dir.path(), None));
        let led_driver = Arc::new(LedSysfsDriver::new(dir.path()));
        let fan = FanImpl::new(1, fan_driver, LedImpl::new("fan1", led_driver));

        assert!(fan.get_status().unwrap());
        std::fs::write(dir.path().join("fan1_fault"), "1\n").unwrap();
        assert!(!fan.get_status().unwrap());

        fan.led().unwrap().set_color(LedColor::Green).unwrap();
        assert_eq!(fan.led_impl().get_color().unwrap(), LedColor::Green);
    }

    #[test]
    fn test_temp_thresholds_fall_back_to_desc() {
        let dir = tempfile::tempdir().unwrap();
        let hwmon = dir.path().join("hwmon/hwmon0");
        std::fs::create_dir_all(&hwmon).unwrap();
        std::fs::write(hwmon.join("temp2_max"), "70000\n").unwrap();

        let driver = Arc::new(TempSysfsDriver::new(dir.path()));
        let desc = SensorDesc::new(1, "Back-panel").with_thresholds(75.0, 85.0);
        let temp = TempImpl::new(desc, driver);

        assert_eq!(temp.get_high_threshold().unwrap(), 70.0);
        assert_eq!(temp.get_critical_threshold().unwrap(), 85.0);
        assert!(temp.get_temperature().is_err());
    }

    #[test]
    fn test_sfp_has_no_reset_line() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(XcvrSysfsDriver::new(dir.path()));
        let xcvr = XcvrImpl::new(49, XcvrKind::Sfp, I2cAddr::new(58, 0x50), driver);

        assert!(!xcvr.reset(true).unwrap());
        assert!(!xcvr.set_low_power_mode(true).unwrap());
        assert!(!xcvr.get_low_power_mode().unwrap());
        assert!(!dir.path().join("sfp49_reset").exists());
    }

    #[test]
    fn test_qsfp_reset_writes_line() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(XcvrSysfsDriver::new(dir.path()));
        let xcvr = XcvrImpl::new(3, XcvrKind::Qsfp, I2cAddr::new(12, 0x50), driver);

        assert!(xcvr.reset(true).unwrap());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("qsfp3_reset")).unwrap(),
            "1"
        );
        assert_eq!(
            xcvr.eeprom_path(),
            std::path::PathBuf::from("/sys/class/i2c-adapter/i2c-12/12-0050/eeprom")
        );
    }
}
