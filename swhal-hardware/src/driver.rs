//! Driver abstraction
//!
//! A driver wraps one resource path: a kernel module, an I2C device to
//! instantiate, or a sysfs directory. Components own their drivers in a
//! [`DriverSet`] keyed by [`DriverRole`]; accessors hold `Arc` clones of the
//! drivers they use.

use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use swhal_core::{DriverRole, HalError, I2cAddr, Result};
use tracing::{debug, info};

use crate::sysfs::{
    write_value, FanSysfsDriver, LedSysfsDriver, TempSysfsDriver, XcvrSysfsDriver,
};

const SYSFS_ROOT: &str = "/sys";

/// Common driver lifecycle
pub trait Driver: Send + Sync {
    fn role(&self) -> DriverRole;

    /// Name used in logs
    fn name(&self) -> String {
        self.role().to_string()
    }

    /// Make the resource usable (load module, instantiate device, ...)
    fn setup(&self) -> Result<()> {
        Ok(())
    }

    /// Undo [`Driver::setup`]
    fn clean(&self) -> Result<()> {
        Ok(())
    }
}

/// Kernel module loaded through `modprobe`
#[derive(Debug, Clone)]
pub struct KernelDriver {
    module: String,
    sysfs_root: PathBuf,
}

impl KernelDriver {
    pub fn new(module: impl Into<String>) -> Self {
        Self::with_sysfs_root(module, SYSFS_ROOT)
    }

    /// Driver checking module state under an alternate sysfs root
    pub fn with_sysfs_root(module: impl Into<String>, sysfs_root: impl Into<PathBuf>) -> Self {
        Self {
            module: module.into(),
            sysfs_root: sysfs_root.into(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// The kernel lists modules under `/sys/module` with dashes turned into underscores
    pub fn is_loaded(&self) -> bool {
        self.sysfs_root
            .join("module")
            .join(self.module.replace('-', "_"))
            .exists()
    }

    fn modprobe(&self, remove: bool) -> Result<()> {
        let mut cmd = Command::new("modprobe");
        if remove {
            cmd.arg("-r");
        }
        let status = cmd.arg(&self.module).status().map_err(|e| {
            HalError::Hardware(format!("Failed to run modprobe for {}: {}", self.module, e))
        })?;

        if !status.success() {
            return Err(HalError::Hardware(format!(
                "modprobe {}{} exited with {}",
                if remove { "-r " } else { "" },
                self.module,
                status
            )));
        }
        Ok(())
    }
}

impl Driver for KernelDriver {
    fn role(&self) -> DriverRole {
        DriverRole::Kernel
    }

    fn name(&self) -> String {
        format!("{}({})", self.role(), self.module)
    }

    fn setup(&self) -> Result<()> {
        if self.is_loaded() {
            debug!("Kernel module {} already loaded", self.module);
            return Ok(());
        }
        info!("Loading kernel module {}", self.module);
        self.modprobe(false)
    }

    fn clean(&self) -> Result<()> {
        if !self.is_loaded() {
            return Ok(());
        }
        info!("Unloading kernel module {}", self.module);
        self.modprobe(true)
    }
}

/// Kernel module plus an I2C device instantiated through `new_device`
#[derive(Debug, Clone)]
pub struct I2cKernelDriver {
    name: String,
    kernel: KernelDriver,
    addr: I2cAddr,
    sysfs_root: PathBuf,
}

impl I2cKernelDriver {
    /// # Arguments
    /// * `name` - Device name understood by the module, e.g. `max6658`
    /// * `module` - Kernel module providing the device, e.g. `lm90`
    /// * `addr` - I2C address of the device
    pub fn new(name: impl Into<String>, module: impl Into<String>, addr: I2cAddr) -> Self {
        Self::with_sysfs_root(name, module, addr, SYSFS_ROOT)
    }

    pub fn with_sysfs_root(
        name: impl Into<String>,
        module: impl Into<String>,
        addr: I2cAddr,
        sysfs_root: impl Into<PathBuf>,
    ) -> Self {
        let sysfs_root = sysfs_root.into();
        Self {
            name: name.into(),
            kernel: KernelDriver::with_sysfs_root(module, &sysfs_root),
            addr,
            sysfs_root,
        }
    }

    pub fn addr(&self) -> I2cAddr {
        self.addr
    }

    fn devices(&self) -> PathBuf {
        self.sysfs_root.join("bus/i2c/devices")
    }

    fn adapter(&self) -> PathBuf {
        self.devices().join(format!("i2c-{}", self.addr.bus))
    }

    /// Sysfs directory of the instantiated device
    pub fn device_path(&self) -> PathBuf {
        self.devices().join(self.addr.device_name())
    }

    fn device_exists(&self) -> bool {
        self.device_path().exists()
    }
}

impl Driver for I2cKernelDriver {
    fn role(&self) -> DriverRole {
        DriverRole::I2cKernel
    }

    fn name(&self) -> String {
        format!("{}({} {})", self.role(), self.name, self.addr)
    }

    fn setup(&self) -> Result<()> {
        self.kernel.setup()?;

        if self.device_exists() {
            debug!("I2C device {} already instantiated", self.addr.device_name());
            return Ok(());
        }

        info!("Instantiating {} at {}", self.name, self.addr);
        write_value(
            &self.adapter().join("new_device"),
            format!("{} 0x{:02x}", self.name, self.addr.address),
        )
    }

    fn clean(&self) -> Result<()> {
        if !self.device_exists() {
            return Ok(());
        }

        info!("Removing {} at {}", self.name, self.addr);
        write_value(
            &self.adapter().join("delete_device"),
            format!("0x{:02x}", self.addr.address),
        )
    }
}

/// A driver owned by a component
#[derive(Clone)]
pub enum DriverHandle {
    Kernel(Arc<KernelDriver>),
    I2cKernel(Arc<I2cKernelDriver>),
    FanSysfs(Arc<FanSysfsDriver>),
    LedSysfs(Arc<LedSysfsDriver>),
    TempSysfs(Arc<TempSysfsDriver>),
    XcvrSysfs(Arc<XcvrSysfsDriver>),
}

impl DriverHandle {
    pub fn as_driver(&self) -> &dyn Driver {
        match self {
            DriverHandle::Kernel(d) => &**d,
            DriverHandle::I2cKernel(d) => &**d,
            DriverHandle::FanSysfs(d) => &**d,
            DriverHandle::LedSysfs(d) => &**d,
            DriverHandle::TempSysfs(d) => &**d,
            DriverHandle::XcvrSysfs(d) => &**d,
        }
    }

    pub fn role(&self) -> DriverRole {
        self.as_driver().role()
    }
}

impl From<KernelDriver> for DriverHandle {
    fn from(driver: KernelDriver) -> Self {
        DriverHandle::Kernel(Arc::new(driver))
    }
}

impl From<I2cKernelDriver> for DriverHandle {
    fn from(driver: I2cKernelDriver) -> Self {
        DriverHandle::I2cKernel(Arc::new(driver))
    }
}

impl From<FanSysfsDriver> for DriverHandle {
    fn from(driver: FanSysfsDriver) -> Self {
        DriverHandle::FanSysfs(Arc::new(driver))
    }
}

impl From<LedSysfsDriver> for DriverHandle {
    fn from(driver: LedSysfsDriver) -> Self {
        DriverHandle::LedSysfs(Arc::new(driver))
    }
}

impl From<TempSysfsDriver> for DriverHandle {
    fn from(driver: TempSysfsDriver) -> Self {
        DriverHandle::TempSysfs(Arc::new(driver))
    }
}

impl From<XcvrSysfsDriver> for DriverHandle {
    fn from(driver: XcvrSysfsDriver) -> Self {
        DriverHandle::XcvrSysfs(Arc::new(driver))
    }
}

/// Drivers of a component, one per role, kept in setup order
#[derive(Clone, Default)]
pub struct DriverSet {
    drivers: Vec<DriverHandle>,
}

impl DriverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a driver, replacing any driver already holding the same role
    pub fn with(mut self, driver: impl Into<DriverHandle>) -> Self {
        self.insert(driver);
        self
    }

    pub fn insert(&mut self, driver: impl Into<DriverHandle>) {
        let driver = driver.into();
        let role = driver.role();
        match self.drivers.iter_mut().find(|d| d.role() == role) {
            Some(slot) => *slot = driver,
            None => self.drivers.push(driver),
        }
    }

    pub fn get(&self, role: DriverRole) -> Option<&DriverHandle> {
        self.drivers.iter().find(|d| d.role() == role)
    }

    pub fn contains(&self, role: DriverRole) -> bool {
        self.get(role).is_some()
    }

    pub fn fan(&self, role: DriverRole) -> Option<Arc<FanSysfsDriver>> {
        match self.get(role)? {
            DriverHandle::FanSysfs(d) => Some(d.clone()),
            _ => None,
        }
    }

    pub fn led(&self, role: DriverRole) -> Option<Arc<LedSysfsDriver>> {
        match self.get(role)? {
            DriverHandle::LedSysfs(d) => Some(d.clone()),
            _ => None,
        }
    }

    pub fn temp(&self, role: DriverRole) -> Option<Arc<TempSysfsDriver>> {
        match self.get(role)? {
            DriverHandle::TempSysfs(d) => Some(d.clone()),
            _ => None,
        }
    }

    pub fn xcvr(&self, role: DriverRole) -> Option<Arc<XcvrSysfsDriver>> {
        match self.get(role)? {
            DriverHandle::XcvrSysfs(d) => Some(d.clone()),
            _ => None,
        }
    }

    /// Drivers in setup order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &dyn Driver> {
        self.drivers.iter().map(DriverHandle::as_driver)
    }

    pub fn roles(&self) -> Vec<DriverRole> {
        self.drivers.iter().map(DriverHandle::role).collect()
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}
