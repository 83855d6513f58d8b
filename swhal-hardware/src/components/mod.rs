//! Components
//!
//! A component is a device at a bus address that owns a [`DriverSet`] and
//! creates accessors bound to those drivers. Components are created once
//! during platform bring-up and live for the rest of the process.

mod fan;
mod max6658;
mod xcvr;

pub use fan::{FanComponentOptions, RavenFanCpldComponent, ScdFanComponent};
pub use max6658::Max6658;
pub use xcvr::XcvrComponent;

use swhal_core::{ComponentAddr, DriverRole, HalError, Priority, Result};
use tracing::{debug, info};

use crate::driver::DriverSet;

/// Behaviour shared by all components
pub trait Component: Send + Sync {
    /// Component type name used in logs and errors
    fn name(&self) -> &'static str;

    fn addr(&self) -> &ComponentAddr;

    fn drivers(&self) -> &DriverSet;

    fn priority(&self) -> Priority {
        Priority::Default
    }

    /// Set up every driver in order
    fn setup(&self) -> Result<()> {
        info!("Setting up {} at {}", self.name(), self.addr());
        for driver in self.drivers().iter() {
            debug!("  {}", driver.name());
            driver.setup()?;
        }
        Ok(())
    }

    /// Clean every driver in reverse order
    fn clean(&self) -> Result<()> {
        info!("Cleaning {} at {}", self.name(), self.addr());
        for driver in self.drivers().iter().rev() {
            driver.clean()?;
        }
        Ok(())
    }
}

pub(crate) fn driver_not_found(component: &dyn Component, role: DriverRole) -> HalError {
    HalError::DriverNotFound {
        component: format!("{}({})", component.name(), component.addr()),
        role,
    }
}
