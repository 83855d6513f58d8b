//! Command execution handlers

use std::path::Path;

use anyhow::{bail, Result};
use swhal_core::{Fan, Inventory, Led, PlatformConfig, Temp, XcvrKind};
use swhal_hardware::Platform;
use swhal_sfputil::SfpUtilBase;
use tracing::debug;

use crate::format::{
    format_config, format_eeprom, format_failure, format_fans, format_port_states, format_success,
    format_temps, EepromDump, FanReport, PortState, TempReport,
};

use super::commands::*;

fn ok_or_debug<T>(what: &str, result: swhal_core::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("{}: {}", what, e);
            None
        }
    }
}

/// Ports a transceiver command applies to: the given one, or all of them
pub fn select_ports(util: &dyn SfpUtilBase, port: Option<u32>) -> Result<Vec<u32>> {
    match port {
        Some(port) if util.is_valid_port(port) => Ok(vec![port]),
        Some(port) => bail!(
            "Invalid port {} (valid ports: {}-{})",
            port,
            util.port_start(),
            util.port_end()
        ),
        None => {
            let inventory = util.inventory();
            let mut ports: Vec<u32> = inventory
                .sfp_range()
                .iter()
                .chain(inventory.qsfp_range())
                .copied()
                .collect();
            ports.sort_unstable();
            Ok(ports)
        }
    }
}

fn port_kind(util: &dyn SfpUtilBase, port: u32) -> XcvrKind {
    if util.inventory().qsfp_range().contains(&port) {
        XcvrKind::Qsfp
    } else {
        XcvrKind::Sfp
    }
}

/// Query one boolean per port
pub fn collect_port_states(
    util: &dyn SfpUtilBase,
    ports: &[u32],
    query: impl Fn(&dyn SfpUtilBase, u32) -> bool,
) -> Vec<PortState> {
    ports
        .iter()
        .map(|&port| PortState {
            port,
            kind: port_kind(util, port).to_string(),
            value: query(util, port),
        })
        .collect()
}

/// Handle transceiver commands
pub fn handle_sfp(util: &dyn SfpUtilBase, command: SfpCommands, format: &OutputFormat) -> Result<()> {
    match command {
        SfpCommands::Presence { port } => {
            let ports = select_ports(util, port)?;
            let states = collect_port_states(util, &ports, |util, port| util.get_presence(port));
            println!("{}", format_port_states(&states, "Presence", &format.into())?);
        }
        SfpCommands::Lpmode { port } => {
            let ports = select_ports(util, port)?;
            let states =
                collect_port_states(util, &ports, |util, port| util.get_low_power_mode(port));
            println!("{}", format_port_states(&states, "Low power mode", &format.into())?);
        }
        SfpCommands::Eeprom { port, dom } => {
            let dumps: Vec<EepromDump> = select_ports(util, port)?
                .into_iter()
                .map(|port| EepromDump {
                    port,
                    data: if dom {
                        util.get_eeprom_dom_raw(port)
                    } else {
                        util.get_eeprom_raw(port)
                    },
                })
                .collect();
            println!("{}", format_eeprom(&dumps, &format.into())?);
        }
        SfpCommands::SetLpmode { port, state } => {
            select_ports(util, Some(port))?;
            let enable: bool = state.into();
            if util.set_low_power_mode(port, enable) {
                println!(
                    "{}",
                    format_success(&format!(
                        "Low power mode {} on port {}",
                        if enable { "enabled" } else { "disabled" },
                        port
                    ))
                );
            } else {
                println!(
                    "{}",
                    format_failure(&format!("Failed to set low power mode on port {}", port))
                );
                bail!("set-lpmode failed on port {}", port);
            }
        }
        SfpCommands::Reset { port } => {
            select_ports(util, Some(port))?;
            if util.reset(port) {
                println!("{}", format_success(&format!("Reset port {}", port)));
            } else {
                println!("{}", format_failure(&format!("Failed to reset port {}", port)));
                bail!("reset failed on port {}", port);
            }
        }
    }

    Ok(())
}

/// Read every fan of the inventory
pub fn collect_fans(inventory: &Inventory) -> Vec<FanReport> {
    inventory
        .fans()
        .iter()
        .map(|fan| {
            let name = fan.name();
            FanReport {
                id: fan.id(),
                speed: ok_or_debug(&name, fan.get_speed()),
                rpm: ok_or_debug(&name, fan.get_rpm()),
                present: ok_or_debug(&name, fan.get_presence()),
                ok: ok_or_debug(&name, fan.get_status()),
                led: fan
                    .led()
                    .and_then(|led| ok_or_debug(led.name(), led.get_color()))
                    .map(|color| color.to_string()),
                name,
            }
        })
        .collect()
}

/// Handle fans command
pub fn handle_fans(inventory: &Inventory, format: &OutputFormat) -> Result<()> {
    let fans = collect_fans(inventory);
    println!("{}", format_fans(&fans, &format.into())?);
    Ok(())
}

/// Read every temperature sensor of the inventory
pub fn collect_temps(inventory: &Inventory) -> Vec<TempReport> {
    inventory
        .temps()
        .iter()
        .map(|temp| TempReport {
            name: temp.name().to_string(),
            diode: temp.desc().diode,
            temperature: ok_or_debug(temp.name(), temp.get_temperature()),
            high: ok_or_debug(temp.name(), temp.get_high_threshold()),
            critical: ok_or_debug(temp.name(), temp.get_critical_threshold()),
        })
        .collect()
}

/// Handle temps command
pub fn handle_temps(inventory: &Inventory, format: &OutputFormat) -> Result<()> {
    let temps = collect_temps(inventory);
    println!("{}", format_temps(&temps, &format.into())?);
    Ok(())
}

/// Handle setup command
pub fn handle_setup(platform: &Platform) -> Result<()> {
    platform.setup()?;
    println!(
        "{}",
        format_success(&format!("Set up {} component(s)", platform.components().len()))
    );
    Ok(())
}

/// Handle clean command
pub fn handle_clean(platform: &Platform) -> Result<()> {
    platform.clean()?;
    println!(
        "{}",
        format_success(&format!("Cleaned {} component(s)", platform.components().len()))
    );
    Ok(())
}

/// Handle config commands
pub fn handle_config(
    command: ConfigCommands,
    config: &PlatformConfig,
    path: &Path,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            if *format == OutputFormat::Table {
                println!("# {}", path.display());
            }
            println!("{}", format_config(config, &format.into())?);
        }
    }

    Ok(())
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use swhal_core::{HalError, I2cAddr, Result as HalResult, Xcvr};
    use swhal_sfputil::SfpUtilNative;

    struct StubXcvr {
        port: u32,
        kind: XcvrKind,
    }

    impl Xcvr for StubXcvr {
        fn port_num(&self) -> u32 {
            self.port
        }

        fn kind(&self) -> XcvrKind {
            self.kind
        }

        fn addr(&self) -> I2cAddr {
            I2cAddr::new(self.port, 0x50)
        }

        fn get_presence(&self) -> HalResult<bool> {
            Ok(self.port % 2 == 1)
        }

        fn get_low_power_mode(&self) -> HalResult<bool> {
            Err(HalError::Hardware("no lp_mode".to_string()))
        }

        fn set_low_power_mode(&self, _value: bool) -> HalResult<bool> {
            Ok(true)
        }

        fn reset(&self, _value: bool) -> HalResult<bool> {
            Ok(false)
        }
    }

    fn util() -> SfpUtilNative {
        let mut inventory = Inventory::new();
        inventory.add_ports(vec![3], vec![1, 2]);
        inventory.add_xcvr(Arc::new(StubXcvr { port: 1, kind: XcvrKind::Qsfp }));
        inventory.add_xcvr(Arc::new(StubXcvr { port: 2, kind: XcvrKind::Qsfp }));
        inventory.add_xcvr(Arc::new(StubXcvr { port: 3, kind: XcvrKind::Sfp }));
        SfpUtilNative::new(Arc::new(inventory))
    }

    #[test]
    fn test_select_ports() {
        let util = util();
        assert_eq!(select_ports(&util, None).unwrap(), vec![1, 2, 3]);
        assert_eq!(select_ports(&util, Some(2)).unwrap(), vec![2]);
        assert!(select_ports(&util, Some(4)).is_err());
    }

    #[test]
    fn test_collect_presence() {
        let util = util();
        let states = collect_port_states(&util, &[1, 2, 3], |util, port| util.get_presence(port));

        assert_eq!(states.len(), 3);
        assert!(states[0].value);
        assert!(!states[1].value);
        assert_eq!(states[2].kind, "sfp");
        assert_eq!(states[0].kind, "qsfp");
    }

    #[test]
    fn test_failed_reset_is_error() {
        let util = util();
        let result = handle_sfp(&util, SfpCommands::Reset { port: 1 }, &OutputFormat::Json);
        assert!(result.is_err());

        let result = handle_sfp(
            &util,
            SfpCommands::SetLpmode {
                port: 1,
                state: LpmodeState::On,
            },
            &OutputFormat::Json,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_inventory_reports() {
        let inventory = Inventory::new();
        assert!(collect_fans(&inventory).is_empty());
        assert!(collect_temps(&inventory).is_empty());
    }
}
