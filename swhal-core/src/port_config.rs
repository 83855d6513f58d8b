//! SONiC `port_config.ini` parsing
//!
//! The file is a whitespace separated table. An optional header comment
//! names the columns:
//!
//! ```text
//! # name        lanes          alias         index  speed
//! Ethernet0     1,2,3,4        Ethernet1/1   1      100000
//! ```
//!
//! Without a header the columns are `name lanes alias index`. Without an
//! `index` column the zero-based row number is used as the port number.

use serde::Serialize;
use std::path::Path;

use crate::error::{HalError, Result};

/// Default location of the port configuration on a SONiC switch
pub const DEFAULT_PORT_CONFIG_PATH: &str = "/usr/share/sonic/hwsku/port_config.ini";

const DEFAULT_COLUMNS: [&str; 4] = ["name", "lanes", "alias", "index"];

/// One interface row of the port configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortConfig {
    /// Kernel interface name, e.g. `Ethernet0`
    pub name: String,
    pub lanes: Vec<u32>,
    /// Vendor interface name, e.g. `Ethernet1/1`
    pub alias: String,
    /// Front panel port number
    pub index: u32,
    pub speed: Option<u32>,
}

/// Interfaces in file order
///
/// Breakout interfaces share a front panel port, so several rows may carry
/// the same `index`; lookups by port return the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortMapping {
    ports: Vec<PortConfig>,
}

impl PortMapping {
    /// Load and parse a port configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HalError::Config(format!(
                "Failed to read port config {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    /// Parse port configuration content
    pub fn parse(content: &str) -> Result<Self> {
        let mut columns: Vec<String> = DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut ports = Vec::new();

        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(comment) = line.strip_prefix('#') {
                let header: Vec<String> = comment.split_whitespace().map(str::to_lowercase).collect();
                if ports.is_empty() && header.first().map(String::as_str) == Some("name") {
                    columns = header;
                }
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            let column = |name: &str| {
                columns
                    .iter()
                    .position(|c| c == name)
                    .and_then(|i| fields.get(i).copied())
            };

            let name = column("name")
                .ok_or_else(|| HalError::Parse(format!("line {}: missing name", lineno + 1)))?
                .to_string();

            let lanes = match column("lanes") {
                Some(lanes) => lanes
                    .split(',')
                    .map(|lane| {
                        lane.parse::<u32>().map_err(|e| {
                            HalError::Parse(format!("line {}: invalid lane '{}': {}", lineno + 1, lane, e))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
                None => Vec::new(),
            };

            let alias = column("alias").unwrap_or(&name).to_string();

            let index = match column("index") {
                Some(index) => index.parse::<u32>().map_err(|e| {
                    HalError::Parse(format!("line {}: invalid index '{}': {}", lineno + 1, index, e))
                })?,
                None => ports.len() as u32,
            };

            let speed = column("speed")
                .map(|speed| {
                    speed.parse::<u32>().map_err(|e| {
                        HalError::Parse(format!("line {}: invalid speed '{}': {}", lineno + 1, speed, e))
                    })
                })
                .transpose()?;

            ports.push(PortConfig {
                name,
                lanes,
                alias,
                index,
                speed,
            });
        }

        Ok(Self { ports })
    }

    /// First interface on the given front panel port
    pub fn by_port_num(&self, port: u32) -> Option<&PortConfig> {
        self.ports.iter().find(|p| p.index == port)
    }

    pub fn by_name(&self, name: &str) -> Option<&PortConfig> {
        self.ports.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PortConfig> {
        self.ports.iter()
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}
