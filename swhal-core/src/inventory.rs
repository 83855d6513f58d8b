//! Inventory of platform accessors
//!
//! The inventory is populated incrementally while the platform is brought
//! up and is read-only afterwards. It is handed to consumers explicitly,
//! usually as an `Arc<Inventory>`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::accessors::{Fan, Led, Temp, Xcvr};
use crate::error::{HalError, Result};

/// Registry of fans, LEDs, temperature sensors and transceivers
#[derive(Default)]
pub struct Inventory {
    sfp_range: Vec<u32>,
    qsfp_range: Vec<u32>,
    fans: Vec<Arc<dyn Fan>>,
    leds: BTreeMap<String, Arc<dyn Led>>,
    temps: Vec<Arc<dyn Temp>>,
    xcvrs: BTreeMap<u32, Arc<dyn Xcvr>>,
}

impl Inventory {
    /// Create an empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the front panel ports
    pub fn add_ports(
        &mut self,
        sfps: impl IntoIterator<Item = u32>,
        qsfps: impl IntoIterator<Item = u32>,
    ) {
        self.sfp_range.extend(sfps);
        self.qsfp_range.extend(qsfps);
        self.sfp_range.sort_unstable();
        self.sfp_range.dedup();
        self.qsfp_range.sort_unstable();
        self.qsfp_range.dedup();
    }

    /// Register a fan and its LED
    pub fn add_fan(&mut self, fan: Arc<dyn Fan>) {
        if let Some(led) = fan.led() {
            self.add_led(led);
        }
        self.fans.push(fan);
    }

    pub fn add_led(&mut self, led: Arc<dyn Led>) {
        self.leds.insert(led.name().to_string(), led);
    }

    /// Register a temperature sensor
    ///
    /// Sensors are appended; registering the same name twice yields two entries.
    pub fn add_temp(&mut self, temp: Arc<dyn Temp>) {
        self.temps.push(temp);
    }

    /// Register a transceiver, replacing any previous one on the same port
    pub fn add_xcvr(&mut self, xcvr: Arc<dyn Xcvr>) -> Option<Arc<dyn Xcvr>> {
        self.xcvrs.insert(xcvr.port_num(), xcvr)
    }

    /// First front panel port, 0 when no port is declared
    pub fn port_start(&self) -> u32 {
        self.all_ports().next().unwrap_or(0)
    }

    /// Last front panel port, 0 when no port is declared
    pub fn port_end(&self) -> u32 {
        self.all_ports().last().unwrap_or(0)
    }

    fn all_ports(&self) -> impl Iterator<Item = u32> {
        let mut ports: Vec<u32> = self
            .sfp_range
            .iter()
            .chain(self.qsfp_range.iter())
            .copied()
            .collect();
        ports.sort_unstable();
        ports.into_iter()
    }

    pub fn sfp_range(&self) -> &[u32] {
        &self.sfp_range
    }

    pub fn qsfp_range(&self) -> &[u32] {
        &self.qsfp_range
    }

    pub fn get_xcvr(&self, port: u32) -> Option<&Arc<dyn Xcvr>> {
        self.xcvrs.get(&port)
    }

    /// Get a transceiver, returning an error if none is registered
    pub fn get_xcvr_or_err(&self, port: u32) -> Result<&Arc<dyn Xcvr>> {
        self.get_xcvr(port).ok_or(HalError::XcvrNotFound(port))
    }

    /// Port number to EEPROM sysfs file
    pub fn get_port_to_eeprom_mapping(&self) -> BTreeMap<u32, PathBuf> {
        self.xcvrs
            .iter()
            .map(|(port, xcvr)| (*port, xcvr.eeprom_path()))
            .collect()
    }

    /// Port number to I2C adapter bus
    pub fn get_port_to_i2c_adapter_mapping(&self) -> BTreeMap<u32, u32> {
        self.xcvrs
            .iter()
            .map(|(port, xcvr)| (*port, xcvr.addr().bus))
            .collect()
    }

    pub fn fans(&self) -> &[Arc<dyn Fan>] {
        &self.fans
    }

    pub fn get_led(&self, name: &str) -> Option<&Arc<dyn Led>> {
        self.leds.get(name)
    }

    pub fn leds(&self) -> impl Iterator<Item = &Arc<dyn Led>> {
        self.leds.values()
    }

    pub fn temps(&self) -> &[Arc<dyn Temp>] {
        &self.temps
    }

    pub fn xcvrs(&self) -> impl Iterator<Item = &Arc<dyn Xcvr>> {
        self.xcvrs.values()
    }
}

impl fmt::Debug for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inventory")
            .field("sfp_range", &self.sfp_range)
            .field("qsfp_range", &self.qsfp_range)
            .field("fans", &self.fans.len())
            .field("leds", &self.leds.keys().collect::<Vec<_>>())
            .field("temps", &self.temps.len())
            .field("xcvrs", &self.xcvrs.keys().collect::<Vec<_>>())
            .finish()
    }
}
