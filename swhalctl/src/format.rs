//! Output formatting utilities for the CLI
//!
//! Provides table and JSON formatting with colors.

use anyhow::Result;
use colored::*;
use serde::Serialize;
use swhal_core::PlatformConfig;

use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Table,
    Json,
}

/// One boolean property of one transceiver port
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortState {
    pub port: u32,
    /// `sfp` or `qsfp`
    pub kind: String,
    pub value: bool,
}

/// EEPROM page of one port, `None` when it could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EepromDump {
    pub port: u32,
    pub data: Option<Vec<String>>,
}

/// Snapshot of one fan; unreadable values are `None`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanReport {
    pub id: u32,
    pub name: String,
    pub speed: Option<u32>,
    pub rpm: Option<u32>,
    pub present: Option<bool>,
    pub ok: Option<bool>,
    pub led: Option<String>,
}

/// Snapshot of one temperature sensor; unreadable values are `None`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TempReport {
    pub name: String,
    pub diode: u32,
    pub temperature: Option<f64>,
    pub high: Option<f64>,
    pub critical: Option<f64>,
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "n/a".dimmed().to_string(),
    }
}

fn yes_no(value: Option<bool>) -> String {
    match value {
        Some(true) => "Yes".green().to_string(),
        Some(false) => "No".red().to_string(),
        None => "n/a".dimmed().to_string(),
    }
}

/// Format a per-port boolean, `title` names the column
pub fn format_port_states(states: &[PortState], title: &str, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(states)?),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct PortRow {
                #[tabled(rename = "Port")]
                port: String,
                #[tabled(rename = "Type")]
                kind: String,
                #[tabled(rename = "State")]
                value: String,
            }

            let rows: Vec<PortRow> = states
                .iter()
                .map(|state| PortRow {
                    port: state.port.to_string(),
                    kind: state.kind.to_uppercase(),
                    value: yes_no(Some(state.value)),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", format!("{}:", title).bold(), table))
        }
    }
}

/// Format EEPROM pages as a hex dump, 16 bytes per line
pub fn format_eeprom(dumps: &[EepromDump], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(dumps)?),
        OutputFormat::Table => {
            let mut output = String::new();
            for dump in dumps {
                if !output.is_empty() {
                    output.push('\n');
                }
                output.push_str(&format!("Port {}:", dump.port).bold().to_string());
                output.push('\n');

                match &dump.data {
                    Some(data) => {
                        for (line, chunk) in data.chunks(16).enumerate() {
                            output.push_str(&format!(
                                "  {}: {}\n",
                                format!("{:04x}", line * 16).cyan(),
                                chunk.join(" ")
                            ));
                        }
                    }
                    None => {
                        output.push_str(&format!("  {}\n", "not available".dimmed()));
                    }
                }
            }
            Ok(output.trim_end().to_string())
        }
    }
}

/// Format fan snapshots
pub fn format_fans(fans: &[FanReport], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(fans)?),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct FanRow {
                #[tabled(rename = "Fan")]
                name: String,
                #[tabled(rename = "Speed %")]
                speed: String,
                #[tabled(rename = "RPM")]
                rpm: String,
                #[tabled(rename = "Present")]
                present: String,
                #[tabled(rename = "Status")]
                ok: String,
                #[tabled(rename = "LED")]
                led: String,
            }

            let rows: Vec<FanRow> = fans
                .iter()
                .map(|fan| FanRow {
                    name: fan.name.cyan().to_string(),
                    speed: or_na(fan.speed),
                    rpm: match fan.rpm {
                        Some(rpm) if rpm > 0 => rpm.to_string().green().to_string(),
                        Some(_) => "0".red().to_string(),
                        None => or_na::<u32>(None),
                    },
                    present: yes_no(fan.present),
                    ok: match fan.ok {
                        Some(true) => "OK".green().to_string(),
                        Some(false) => "FAULT".red().bold().to_string(),
                        None => or_na::<String>(None),
                    },
                    led: or_na(fan.led.clone()),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "Fans:".bold(), table))
        }
    }
}

/// Format temperature sensor snapshots, in degrees Celsius
pub fn format_temps(temps: &[TempReport], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(temps)?),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct TempRow {
                #[tabled(rename = "Sensor")]
                name: String,
                #[tabled(rename = "Temp °C")]
                temperature: String,
                #[tabled(rename = "High")]
                high: String,
                #[tabled(rename = "Critical")]
                critical: String,
            }

            let rows: Vec<TempRow> = temps
                .iter()
                .map(|temp| {
                    let temperature = match (temp.temperature, temp.high) {
                        (Some(t), Some(high)) if t >= high => format!("{:.1}", t).red().to_string(),
                        (Some(t), _) => format!("{:.1}", t).green().to_string(),
                        (None, _) => or_na::<String>(None),
                    };
                    TempRow {
                        name: temp.name.cyan().to_string(),
                        temperature,
                        high: or_na(temp.high.map(|v| format!("{:.1}", v))),
                        critical: or_na(temp.critical.map(|v| format!("{:.1}", v))),
                    }
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "Temperature Sensors:".bold(), table))
        }
    }
}

/// Format the platform configuration
pub fn format_config(config: &PlatformConfig, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
        OutputFormat::Table => Ok(config.to_toml()?),
    }
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}

/// Format failure message
pub fn format_failure(message: &str) -> String {
    format!("{} {}", "✗".red().bold(), message)
}
