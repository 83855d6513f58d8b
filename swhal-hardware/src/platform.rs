//! Platform bring-up
//!
//! Builds the components described by a [`PlatformConfig`], registers the
//! accessors they create into a fresh [`Inventory`] and freezes it. The
//! resulting `Arc<Inventory>` is what consumers such as the transceiver
//! utility receive.

use std::sync::Arc;

use swhal_core::config::{FanComponentKind, PlatformConfig};
use swhal_core::{ComponentAddr, DriverRole, HalError, I2cAddr, Inventory, Result, XcvrKind};
use tracing::{debug, info};

use crate::components::{
    Component, FanComponentOptions, Max6658, RavenFanCpldComponent, ScdFanComponent,
    XcvrComponent,
};

/// Components of a platform and the inventory they populated
pub struct Platform {
    components: Vec<Box<dyn Component>>,
    inventory: Arc<Inventory>,
}

impl Platform {
    /// Build every component described by `config`
    ///
    /// No hardware is touched; call [`Platform::setup`] to load drivers.
    pub fn from_config(config: &PlatformConfig) -> Result<Self> {
        let mut inventory = Inventory::new();
        let mut components: Vec<Box<dyn Component>> = Vec::new();

        let sfps = config.ports.sfp.map(|r| r.iter());
        let qsfps = config.ports.qsfp.map(|r| r.iter());
        inventory.add_ports(sfps.into_iter().flatten(), qsfps.into_iter().flatten());

        if let Some(first_port) = config.ports.first_port() {
            let xcvrs = XcvrComponent::new(
                ComponentAddr::platform("xcvr"),
                config.xcvr.sysfs_path.clone(),
            );
            let ranges = [
                (XcvrKind::Qsfp, config.ports.qsfp),
                (XcvrKind::Sfp, config.ports.sfp),
            ];
            for (kind, range) in ranges {
                for port in range.iter().flat_map(|r| r.iter()) {
                    let bus = config
                        .xcvr
                        .first_bus
                        .checked_add(port - first_port)
                        .ok_or_else(|| {
                            HalError::Config(format!(
                                "i2c bus of port {} overflows from first_bus {}",
                                port, config.xcvr.first_bus
                            ))
                        })?;
                    inventory.add_xcvr(Arc::new(xcvrs.create_xcvr(port, kind, bus)?));
                }
            }
            components.push(Box::new(xcvrs));
        }

        for fan_config in &config.fan_components {
            let options = FanComponentOptions {
                sysfs_path: fan_config.sysfs_path.clone(),
                led_path: fan_config.led_path.clone(),
                wait_file: fan_config.wait_file.clone(),
            };

            match fan_config.kind {
                FanComponentKind::Raven => {
                    let component = RavenFanCpldComponent::new(fan_config.addr.clone(), &options);
                    for fan in &fan_config.fans {
                        let fan = component.create_fan(
                            fan.id,
                            DriverRole::FanSysfs,
                            DriverRole::LedSysfs,
                        )?;
                        inventory.add_fan(Arc::new(fan));
                    }
                    components.push(Box::new(component));
                }
                FanComponentKind::Scd => {
                    let component = ScdFanComponent::new(fan_config.addr.clone(), &options);
                    for fan in &fan_config.fans {
                        let fan = component.create_fan(
                            fan.id,
                            DriverRole::FanSysfs,
                            DriverRole::LedSysfs,
                            fan.led_id,
                        )?;
                        inventory.add_fan(Arc::new(fan));
                    }
                    components.push(Box::new(component));
                }
            }
        }

        for sensor_config in &config.sensor_components {
            let addr = I2cAddr::new(sensor_config.bus, sensor_config.address);
            let component = match &sensor_config.sysfs_path {
                Some(path) => Max6658::with_sysfs_path(addr, path.clone()),
                None => Max6658::new(addr),
            };
            let component = component.with_sensors(&mut inventory, sensor_config.sensors.clone())?;
            components.push(Box::new(component));
        }

        debug!("Platform inventory: {:?}", inventory);

        Ok(Self {
            components,
            inventory: Arc::new(inventory),
        })
    }

    /// Shared handle to the frozen inventory
    pub fn inventory(&self) -> Arc<Inventory> {
        self.inventory.clone()
    }

    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }

    /// Components sorted by setup priority, stable within a priority
    fn by_priority(&self) -> Vec<&dyn Component> {
        let mut components: Vec<&dyn Component> =
            self.components.iter().map(|c| &**c).collect();
        components.sort_by_key(|c| c.priority());
        components
    }

    /// Set up every component, highest priority first
    pub fn setup(&self) -> Result<()> {
        info!("Setting up {} component(s)", self.components.len());
        for component in self.by_priority() {
            component.setup()?;
        }
        info!("Platform setup complete");
        Ok(())
    }

    /// Clean every component in the reverse of setup order
    pub fn clean(&self) -> Result<()> {
        info!("Cleaning {} component(s)", self.components.len());
        for component in self.by_priority().into_iter().rev() {
            component.clean()?;
        }
        Ok(())
    }
}
