//! Backend answering from a ceos instance
//!
//! ceos owns the transceivers, so nothing here touches hardware. Presence and
//! EEPROM contents are fetched once through the CLI when the backend is
//! built; port numbers are mapped to ceos interface names with the SONiC
//! port configuration.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use swhal_core::{CeosConfig, Inventory, PortMapping, Result};
use tracing::debug;

use crate::cli::CliRunner;
use crate::{hex_bytes, SfpUtilBase, EEPROM_SIZE};

/// Lists the interfaces with a transceiver inserted
pub const PRESENCE_COMMAND: &str = "show interface transceiver hardware | json";

/// Dumps the EEPROM pages of every transceiver
pub const EEPROM_COMMAND: &str = "show idprom interface extended | json";

#[derive(Debug, Deserialize)]
struct InterfacesReply {
    #[serde(default)]
    interfaces: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct IdpromEntry {
    #[serde(default)]
    pages: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct IdpromPage {
    #[serde(default)]
    registers: Vec<u8>,
}

fn parse_presence(reply: &str) -> Result<BTreeSet<String>> {
    let reply: InterfacesReply = serde_json::from_str(reply)?;
    Ok(reply.interfaces.into_iter().map(|(name, _)| name).collect())
}

/// Interface name and its registers, pages concatenated in reply order
fn parse_eeproms(reply: &str) -> Result<Vec<(String, Vec<u8>)>> {
    let reply: InterfacesReply = serde_json::from_str(reply)?;
    reply
        .interfaces
        .into_iter()
        .map(|(name, entry)| {
            let entry: IdpromEntry = serde_json::from_value(entry)?;
            let mut registers = Vec::new();
            for (_, page) in entry.pages {
                let page: IdpromPage = serde_json::from_value(page)?;
                registers.extend(page.registers);
            }
            Ok((name, registers))
        })
        .collect()
}

/// Transceiver utility backed by the ceos CLI
pub struct SfpUtilCeos {
    inventory: Arc<Inventory>,
    ports: PortMapping,
    present: BTreeSet<String>,
    eeproms: Vec<(String, Vec<u8>)>,
}

impl SfpUtilCeos {
    /// Query presence and EEPROM data through `runner`
    pub fn new(inventory: Arc<Inventory>, ports: PortMapping, runner: &dyn CliRunner) -> Result<Self> {
        let present = parse_presence(&runner.run(PRESENCE_COMMAND)?)?;
        let eeproms = parse_eeproms(&runner.run(EEPROM_COMMAND)?)?;
        debug!(
            "ceos reports {} present transceiver(s), {} EEPROM dump(s)",
            present.len(),
            eeproms.len()
        );

        Ok(Self {
            inventory,
            ports,
            present,
            eeproms,
        })
    }

    /// Load the port configuration named by `config`, then query the CLI
    pub fn from_config(
        inventory: Arc<Inventory>,
        config: &CeosConfig,
        runner: &dyn CliRunner,
    ) -> Result<Self> {
        let ports = PortMapping::load(&config.port_config)?;
        Self::new(inventory, ports, runner)
    }

    /// Interface names reported as present
    pub fn present_interfaces(&self) -> impl Iterator<Item = &str> {
        self.present.iter().map(String::as_str)
    }

    fn present_alias(&self, port: u32) -> Option<&str> {
        let alias = self.ports.by_port_num(port)?.alias.as_str();
        self.present.contains(alias).then_some(alias)
    }
}

impl SfpUtilBase for SfpUtilCeos {
    fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn get_presence(&self, port: u32) -> bool {
        self.is_valid_port(port) && self.present_alias(port).is_some()
    }

    fn get_low_power_mode(&self, _port: u32) -> bool {
        false
    }

    fn set_low_power_mode(&self, _port: u32, _lpmode: bool) -> bool {
        false
    }

    fn reset(&self, _port: u32) -> bool {
        false
    }

    /// ceos reports whole dumps, so `devid` and `offset` are not used.
    fn read_eeprom_devid(&self, port: u32, _devid: u8, _offset: u64) -> Option<Vec<String>> {
        let alias = self.present_alias(port)?;
        let (name, registers) = self
            .eeproms
            .iter()
            .find(|(name, _)| alias.contains(name.as_str()))?;
        debug!("EEPROM of port {} from interface {}", port, name);

        let mut eeprom = vec!["00".to_string(); EEPROM_SIZE];
        let len = registers.len().min(EEPROM_SIZE);
        eeprom[..len].clone_from_slice(&hex_bytes(&registers[..len]));
        Some(eeprom)
    }
}
