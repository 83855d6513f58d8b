//! Platform bring-up against a fake sysfs tree
//!
//! Every path the drivers touch is redirected into a temporary directory, so
//! these tests exercise the full component -> accessor -> driver chain
//! without hardware.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use swhal_core::config::{
    FanComponentConfig, FanComponentKind, FanConfig, PlatformConfig, PortRange, PortsConfig,
    SensorComponentConfig, XcvrConfig,
};
use swhal_core::{
    DriverRole, Fan, HalError, I2cAddr, Inventory, Led, LedColor, SensorDesc, Temp, Xcvr,
    XcvrKind,
};
use swhal_hardware::{
    Component, DriverSet, FanComponentOptions, FanSysfsDriver, LedSysfsDriver, Max6658, Platform,
    ScdFanComponent, TempSysfsDriver,
};

struct FakeSysfs {
    _dir: tempfile::TempDir,
    root: PathBuf,
}

impl FakeSysfs {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        for sub in ["hwmon", "leds/fan1", "leds/fan5", "xcvr", "sensor/hwmon/hwmon3"] {
            std::fs::create_dir_all(root.join(sub)).unwrap();
        }
        Self { _dir: dir, root }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    fn write(&self, rel: &str, content: &str) {
        std::fs::write(self.path(rel), content).unwrap();
    }

    fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).unwrap()
    }

    fn config(&self) -> PlatformConfig {
        PlatformConfig {
            ports: PortsConfig {
                qsfp: Some(PortRange::new(1, 2)),
                sfp: Some(PortRange::new(3, 3)),
            },
            xcvr: XcvrConfig {
                sysfs_path: self.path("xcvr"),
                first_bus: 20,
            },
            fan_components: vec![FanComponentConfig {
                kind: FanComponentKind::Scd,
                addr: None,
                sysfs_path: Some(self.path("hwmon")),
                led_path: Some(self.path("leds")),
                wait_file: Some(self.path("hwmon/ready")),
                fans: vec![
                    FanConfig { id: 1, led_id: None },
                    FanConfig {
                        id: 2,
                        led_id: Some(5),
                    },
                ],
            }],
            sensor_components: vec![SensorComponentConfig {
                bus: 3,
                address: 0x4c,
                sysfs_path: Some(self.path("sensor")),
                sensors: vec![
                    SensorDesc::new(0, "Cpu board temp sensor").with_thresholds(75.0, 85.0),
                    SensorDesc::new(1, "Back-panel temp sensor"),
                ],
            }],
            ..PlatformConfig::default()
        }
    }
}

fn scd_component(root: &Path) -> ScdFanComponent {
    let options = FanComponentOptions {
        sysfs_path: Some(root.join("hwmon")),
        led_path: Some(root.join("leds")),
        wait_file: None,
    };
    ScdFanComponent::new(None, &options)
}

#[test]
fn test_fans_through_inventory() -> Result<()> {
    let sysfs = FakeSysfs::new();
    sysfs.write("hwmon/pwm1", "255\n");
    sysfs.write("hwmon/fan1_input", "7200\n");
    sysfs.write("hwmon/fan1_present", "1\n");
    sysfs.write("hwmon/fan2_fault", "1\n");

    let platform = Platform::from_config(&sysfs.config())?;
    let inventory = platform.inventory();
    let fans = inventory.fans();
    assert_eq!(fans.len(), 2);

    let fan1 = &fans[0];
    assert_eq!(fan1.name(), "fan1");
    assert_eq!(fan1.get_speed()?, 100);
    assert_eq!(fan1.get_rpm()?, 7200);
    assert!(fan1.get_presence()?);
    assert!(fan1.get_status()?);

    fan1.set_speed(40)?;
    assert_eq!(sysfs.read("hwmon/pwm1"), "102");

    let fan2 = &fans[1];
    assert!(!fan2.get_status()?);
    fan2.led().unwrap().set_color(LedColor::Red)?;
    assert_eq!(sysfs.read("leds/fan5/brightness"), "2");
    assert_eq!(inventory.get_led("fan5").unwrap().get_color()?, LedColor::Red);
    Ok(())
}

#[test]
fn test_temps_through_inventory() -> Result<()> {
    let sysfs = FakeSysfs::new();
    sysfs.write("sensor/hwmon/hwmon3/temp1_input", "45500\n");
    sysfs.write("sensor/hwmon/hwmon3/temp2_input", "31000\n");
    sysfs.write("sensor/hwmon/hwmon3/temp2_crit", "100000\n");

    let platform = Platform::from_config(&sysfs.config())?;
    let inventory = platform.inventory();
    let temps = inventory.temps();

    assert_eq!(temps[0].name(), "Cpu board temp sensor");
    assert_eq!(temps[0].get_temperature()?, 45.5);
    assert_eq!(temps[0].get_critical_threshold()?, 85.0);
    assert_eq!(temps[1].get_temperature()?, 31.0);
    assert_eq!(temps[1].get_critical_threshold()?, 100.0);

    temps[1].set_high_threshold(70.0)?;
    assert_eq!(sysfs.read("sensor/hwmon/hwmon3/temp2_max"), "70000");
    Ok(())
}

#[test]
fn test_xcvrs_through_inventory() -> Result<()> {
    let sysfs = FakeSysfs::new();
    sysfs.write("xcvr/qsfp1_present", "1\n");
    sysfs.write("xcvr/qsfp2_present", "0\n");
    sysfs.write("xcvr/sfp3_present", "1\n");

    let platform = Platform::from_config(&sysfs.config())?;
    let inventory = platform.inventory();

    assert_eq!(inventory.qsfp_range(), &[1, 2]);
    assert_eq!(inventory.sfp_range(), &[3]);

    let qsfp1 = inventory.get_xcvr_or_err(1)?;
    assert!(qsfp1.get_presence()?);
    assert!(qsfp1.reset(true)?);
    assert_eq!(sysfs.read("xcvr/qsfp1_reset"), "1");
    assert!(qsfp1.set_low_power_mode(true)?);
    assert!(qsfp1.get_low_power_mode()?);

    assert!(!inventory.get_xcvr(2).unwrap().get_presence()?);

    let sfp3 = inventory.get_xcvr(3).unwrap();
    assert_eq!(sfp3.kind(), XcvrKind::Sfp);
    assert!(sfp3.get_presence()?);
    assert!(!sfp3.reset(true)?);

    assert_eq!(
        inventory.get_port_to_eeprom_mapping().get(&3),
        Some(&PathBuf::from("/sys/class/i2c-adapter/i2c-22/22-0050/eeprom"))
    );
    assert!(matches!(
        inventory.get_xcvr_or_err(4),
        Err(HalError::XcvrNotFound(4))
    ));
    Ok(())
}

#[test]
fn test_setup_waits_for_fan_driver() -> Result<()> {
    let sysfs = FakeSysfs::new();
    let config = PlatformConfig {
        sensor_components: Vec::new(),
        ..sysfs.config()
    };
    let platform = Platform::from_config(&config)?;

    match platform.setup() {
        Err(HalError::NotReady(path)) => assert_eq!(path, sysfs.path("hwmon/ready")),
        other => panic!("expected NotReady, got {:?}", other.map(|_| ())),
    }

    sysfs.write("hwmon/ready", "");
    platform.setup()?;
    platform.clean()?;
    Ok(())
}

#[test]
fn test_create_fan_with_unknown_role_registers_nothing() {
    let sysfs = FakeSysfs::new();
    let component = scd_component(&sysfs.root);
    let mut inventory = Inventory::new();

    let result = component.create_fan(1, DriverRole::Kernel, DriverRole::LedSysfs, None);
    match result {
        Err(HalError::DriverNotFound { component, role }) => {
            assert_eq!(component, "ScdFanComponent(pci-0000:00:09.0)");
            assert_eq!(role, DriverRole::Kernel);
        }
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("fan created without a fan driver"),
    }

    if let Ok(fan) = component.create_fan(1, DriverRole::FanSysfs, DriverRole::TempSysfs, None) {
        inventory.add_fan(Arc::new(fan));
    }
    assert!(inventory.fans().is_empty());
    assert_eq!(inventory.leds().count(), 0);
}

#[test]
fn test_replaced_drivers_are_used() -> Result<()> {
    let sysfs = FakeSysfs::new();
    let drivers = DriverSet::new()
        .with(FanSysfsDriver::new(100, sysfs.path("hwmon"), None))
        .with(LedSysfsDriver::new(sysfs.path("leds")));
    let component = ScdFanComponent::with_drivers(None, drivers);
    sysfs.write("hwmon/pwm1", "50\n");

    let fan = component.create_fan(1, DriverRole::FanSysfs, DriverRole::LedSysfs, None)?;
    assert_eq!(fan.get_speed()?, 50);
    assert_eq!(component.drivers().len(), 2);
    Ok(())
}

#[test]
fn test_duplicate_sensors_are_all_registered() -> Result<()> {
    let sysfs = FakeSysfs::new();
    let addr = I2cAddr::new(3, 0x4c);
    let mut component = Max6658::with_sysfs_path(addr, sysfs.path("sensor"));
    let mut inventory = Inventory::new();

    let desc = SensorDesc::new(0, "Cpu board temp sensor");
    component.add_temp_sensors(
        &mut inventory,
        vec![desc.clone(), SensorDesc::new(1, "Back-panel"), desc],
    )?;

    assert_eq!(inventory.temps().len(), 3);
    assert_eq!(component.sensors().len(), 3);
    assert_eq!(inventory.temps()[2].name(), "Cpu board temp sensor");
    Ok(())
}

#[test]
fn test_sensor_without_temp_driver_fails() {
    let addr = I2cAddr::new(3, 0x4c);
    let mut component = Max6658::with_drivers(addr, DriverSet::new());
    let mut inventory = Inventory::new();

    let result = component.add_temp_sensors(&mut inventory, vec![SensorDesc::new(0, "Cpu")]);
    assert!(matches!(result, Err(HalError::DriverNotFound { .. })));
    assert!(inventory.temps().is_empty());
    assert!(component.sensors().is_empty());

    let component = Max6658::with_drivers(addr, DriverSet::new().with(TempSysfsDriver::for_i2c(addr)));
    assert_eq!(component.name(), "Max6658");
    assert_eq!(component.addr().to_string(), "i2c-3:0x4c");
}
