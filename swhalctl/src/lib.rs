//! swhal CLI Library
//!
//! Command definitions, handlers and output formatting for `swhalctl`.
//! Handlers take the platform pieces they need ([`swhal_core::Inventory`],
//! [`swhal_hardware::Platform`], a [`swhal_sfputil::SfpUtilBase`]) so they
//! can be driven without hardware.

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;
