//! Backend driving the inventory's transceiver accessors

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use swhal_core::{Inventory, Result, Xcvr};
use tracing::{debug, warn};

use crate::{hex_bytes, SfpUtilBase, EEPROM_DOM_DEVID, EEPROM_SIZE, RESET_SETTLE_DELAY};

/// Transceiver utility backed by sysfs through the inventory
pub struct SfpUtilNative {
    inventory: Arc<Inventory>,
}

impl SfpUtilNative {
    pub fn new(inventory: Arc<Inventory>) -> Self {
        Self { inventory }
    }

    /// Accessor for a valid port, if one is registered
    fn xcvr(&self, port: u32) -> Option<&Arc<dyn Xcvr>> {
        if !self.is_valid_port(port) {
            debug!("Port {} outside {}..={}", port, self.port_start(), self.port_end());
            return None;
        }
        let xcvr = self.inventory.get_xcvr(port);
        if xcvr.is_none() {
            debug!("No transceiver registered for port {}", port);
        }
        xcvr
    }

    fn or_false(port: u32, operation: &str, result: Result<bool>) -> bool {
        result.unwrap_or_else(|e| {
            debug!("{} failed for port {}: {}", operation, port, e);
            false
        })
    }

    /// Status reads report `false` on error, loudly enough to tell a broken
    /// control line from an empty slot
    fn read_or_false(port: u32, operation: &str, result: Result<bool>) -> bool {
        result.unwrap_or_else(|e| {
            warn!("{} failed for port {}: {}", operation, port, e);
            false
        })
    }
}

fn read_page(path: &Path, offset: u64) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut page = vec![0u8; EEPROM_SIZE];
    file.read_exact(&mut page)?;
    Ok(page)
}

impl SfpUtilBase for SfpUtilNative {
    fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn get_presence(&self, port: u32) -> bool {
        self.xcvr(port)
            .map(|xcvr| Self::read_or_false(port, "get_presence", xcvr.get_presence()))
            .unwrap_or(false)
    }

    fn get_low_power_mode(&self, port: u32) -> bool {
        self.xcvr(port)
            .map(|xcvr| {
                Self::read_or_false(port, "get_low_power_mode", xcvr.get_low_power_mode())
            })
            .unwrap_or(false)
    }

    fn set_low_power_mode(&self, port: u32, lpmode: bool) -> bool {
        self.xcvr(port)
            .map(|xcvr| {
                Self::or_false(port, "set_low_power_mode", xcvr.set_low_power_mode(lpmode))
            })
            .unwrap_or(false)
    }

    fn reset(&self, port: u32) -> bool {
        let Some(xcvr) = self.xcvr(port) else {
            return false;
        };

        if !Self::or_false(port, "reset assert", xcvr.reset(true)) {
            return false;
        }

        std::thread::sleep(RESET_SETTLE_DELAY);

        Self::or_false(port, "reset deassert", xcvr.reset(false))
    }

    /// The DOM page of SFP modules sits right after the identification page
    /// in the same EEPROM file.
    fn read_eeprom_devid(&self, port: u32, devid: u8, offset: u64) -> Option<Vec<String>> {
        let xcvr = self.xcvr(port)?;
        let offset = if devid == EEPROM_DOM_DEVID {
            offset.checked_add(EEPROM_SIZE as u64)?
        } else {
            offset
        };
        let path = xcvr.eeprom_path();

        match read_page(&path, offset) {
            Ok(page) => Some(hex_bytes(&page)),
            Err(e) => {
                debug!("Failed to read {} at offset {}: {}", path.display(), offset, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockXcvr;
    use std::time::Instant;
    use swhal_core::HalError;
    use tracing_test::traced_test;

    fn util_with(xcvr: Arc<MockXcvr>) -> SfpUtilNative {
        let mut inventory = Inventory::new();
        inventory.add_ports(Vec::new(), vec![1, 2, 3, 4]);
        inventory.add_xcvr(xcvr);
        SfpUtilNative::new(Arc::new(inventory))
    }

    #[test]
    fn test_presence_of_registered_port() {
        let xcvr = Arc::new(MockXcvr::new(3));
        let util = util_with(xcvr.clone());

        assert!(util.get_presence(3));
        assert_eq!(xcvr.calls(), vec!["get_presence"]);
    }

    #[test]
    fn test_invalid_port_never_reaches_accessor() {
        let xcvr = Arc::new(MockXcvr::new(3));
        let util = util_with(xcvr.clone());

        assert!(!util.get_presence(0));
        assert!(!util.get_low_power_mode(5));
        assert!(!util.set_low_power_mode(99, true));
        assert!(!util.reset(5));
        assert!(util.read_eeprom_devid(99, 0x50, 0).is_none());
        assert!(xcvr.calls().is_empty());
    }

    #[test]
    fn test_missing_accessor_is_false() {
        let util = util_with(Arc::new(MockXcvr::new(3)));
        assert!(!util.get_presence(2));
        assert!(!util.reset(2));
    }

    #[test]
    fn test_errors_become_false() {
        let xcvr = Arc::new(
            MockXcvr::new(3).with_lpmode_result(Err(HalError::Hardware("write".to_string()))),
        );
        let util = util_with(xcvr.clone());

        assert!(!util.get_low_power_mode(3));
        assert!(!util.set_low_power_mode(3, true));
        assert!(util.set_low_power_mode(3, false));
        assert_eq!(
            xcvr.calls(),
            vec![
                "get_low_power_mode",
                "set_low_power_mode(true)",
                "set_low_power_mode(false)"
            ]
        );
    }

    #[test]
    #[traced_test]
    fn test_unreadable_presence_is_false_and_warned() {
        let xcvr = Arc::new(MockXcvr::new(3).with_presence_error());
        let util = util_with(xcvr.clone());

        assert!(!util.get_presence(3));
        assert!(!util.get_low_power_mode(3));
        assert_eq!(xcvr.calls(), vec!["get_presence", "get_low_power_mode"]);
        assert!(logs_contain("WARN"));
        assert!(logs_contain("get_presence failed for port 3"));
        assert!(logs_contain("get_low_power_mode failed for port 3"));
    }

    #[test]
    fn test_reset_asserts_waits_and_deasserts() {
        let xcvr = Arc::new(MockXcvr::new(3));
        let util = util_with(xcvr.clone());

        let start = Instant::now();
        assert!(util.reset(3));
        assert!(start.elapsed() >= RESET_SETTLE_DELAY);
        assert_eq!(xcvr.calls(), vec!["reset(true)", "reset(false)"]);
    }

    #[test]
    fn test_reset_failed_deassert_leaves_port_in_reset() {
        let xcvr = Arc::new(
            MockXcvr::new(3)
                .with_reset_results(vec![Ok(true), Err(HalError::Hardware("busy".to_string()))]),
        );
        let util = util_with(xcvr.clone());

        assert!(!util.reset(3));
        assert_eq!(xcvr.calls(), vec!["reset(true)", "reset(false)"]);
    }

    #[test]
    fn test_reset_failed_assert_skips_deassert() {
        let xcvr = Arc::new(MockXcvr::new(3).with_reset_results(vec![Ok(false)]));
        let util = util_with(xcvr.clone());

        let start = Instant::now();
        assert!(!util.reset(3));
        assert!(start.elapsed() < RESET_SETTLE_DELAY);
        assert_eq!(xcvr.calls(), vec!["reset(true)"]);

        let xcvr = Arc::new(
            MockXcvr::new(3).with_reset_results(vec![Err(HalError::Hardware("io".to_string()))]),
        );
        let util = util_with(xcvr.clone());
        assert!(!util.reset(3));
        assert_eq!(xcvr.calls(), vec!["reset(true)"]);
    }

    #[test]
    fn test_read_eeprom_pages() {
        let dir = tempfile::tempdir().unwrap();
        let eeprom = dir.path().join("eeprom");
        let mut content = vec![0x11u8; EEPROM_SIZE];
        content[0] = 0x0d;
        content.extend(vec![0xabu8; EEPROM_SIZE]);
        std::fs::write(&eeprom, &content).unwrap();

        let util = util_with(Arc::new(MockXcvr::new(3).with_eeprom(&eeprom)));

        let page = util.get_eeprom_raw(3).unwrap();
        assert_eq!(page.len(), EEPROM_SIZE);
        assert_eq!(page[0], "0d");
        assert_eq!(page[1], "11");

        let dom = util.get_eeprom_dom_raw(3).unwrap();
        assert!(dom.iter().all(|b| b == "ab"));
    }

    #[test]
    fn test_read_eeprom_short_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let eeprom = dir.path().join("eeprom");
        std::fs::write(&eeprom, vec![0u8; EEPROM_SIZE]).unwrap();

        let util = util_with(Arc::new(MockXcvr::new(3).with_eeprom(&eeprom)));
        assert!(util.get_eeprom_raw(3).is_some());
        assert!(util.get_eeprom_dom_raw(3).is_none());
        assert!(util_with(Arc::new(MockXcvr::new(3))).get_eeprom_raw(3).is_none());
    }

    #[test]
    fn test_read_eeprom_offset_past_end_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let eeprom = dir.path().join("eeprom");
        std::fs::write(&eeprom, vec![0u8; 2 * EEPROM_SIZE]).unwrap();

        let util = util_with(Arc::new(MockXcvr::new(3).with_eeprom(&eeprom)));
        assert!(util.read_eeprom_devid(3, EEPROM_DOM_DEVID, u64::MAX).is_none());
        assert!(util.read_eeprom_devid(3, EEPROM_DOM_DEVID, u64::MAX - 10).is_none());
        assert!(util.read_eeprom_devid(3, 0x50, u64::MAX).is_none());
    }
}
