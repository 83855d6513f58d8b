//! Configuration types
//!
//! A platform is described by a single TOML file: the front panel ports,
//! the transceiver control directory, the fan and sensor components to
//! instantiate, and the settings used when transceivers are managed by a
//! ceos instance. See [`PlatformConfig`].

mod paths;
mod platform_config;

pub use paths::{default_config_path, resolve_config_path, CONFIG_ENV_VAR};
pub use platform_config::{
    CeosConfig, FanComponentConfig, FanComponentKind, FanConfig, PlatformConfig, PortRange,
    PortsConfig, SensorComponentConfig, XcvrConfig,
};
