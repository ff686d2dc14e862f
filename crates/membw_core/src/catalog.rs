//! OpenCL platform and device enumeration and selection.
//!
//! Devices are addressed by a global ordinal: platforms are visited in
//! enumeration order, devices within each platform in enumeration order, and
//! ordinals count up from 0 across the whole traversal. The ordinal is only
//! stable within a single enumeration pass; there is no hot-plug handling.

use opencl3::device::{Device, CL_DEVICE_TYPE_ALL};
use opencl3::error_codes::{ClError, CL_DEVICE_NOT_FOUND};
use opencl3::platform::get_platforms;
use opencl3::types::cl_device_id;
use tracing::{debug, info};

use crate::error::{BenchError, BenchResult};

/// One row of the flattened device listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
    /// Global ordinal across all platforms.
    pub ordinal: u32,
    /// Name of the platform exposing the device.
    pub platform_name: String,
    /// Device name as reported by the driver.
    pub device_name: String,
}

/// The (platform, device) pair resolved from a global ordinal.
#[derive(Debug, Clone)]
pub struct SelectedDevice {
    ordinal: u32,
    platform_name: String,
    device_name: String,
    device_id: cl_device_id,
}

impl SelectedDevice {
    /// Global ordinal this device was resolved from.
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// Name of the platform exposing the device.
    pub fn platform_name(&self) -> &str {
        &self.platform_name
    }

    /// Device name as reported by the driver.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Device handle for context creation.
    pub fn device(&self) -> Device {
        Device::new(self.device_id)
    }
}

/// Devices grouped under the platform that exposed them.
#[derive(Debug)]
struct PlatformDevices {
    name: String,
    devices: Vec<(cl_device_id, String)>,
}

/// A one-pass snapshot of every platform and device on the host.
#[derive(Debug)]
pub struct DeviceCatalog {
    platforms: Vec<PlatformDevices>,
}

impl DeviceCatalog {
    /// Enumerate every platform and, within each, every device.
    ///
    /// A host with no OpenCL platform at all is a fatal condition. A platform
    /// with no devices is not: some runtimes report `CL_DEVICE_NOT_FOUND`
    /// instead of an empty list, and that status maps to an empty platform
    /// here. Any other status is fatal.
    pub fn enumerate() -> BenchResult<Self> {
        let platforms = get_platforms().map_err(|e| BenchError::api("clGetPlatformIDs", e))?;
        info!("found {} OpenCL platform(s)", platforms.len());

        if platforms.is_empty() {
            return Err(BenchError::NoPlatforms);
        }

        let mut snapshot = Vec::with_capacity(platforms.len());
        for platform in &platforms {
            let name = platform
                .name()
                .map_err(|e| BenchError::api("clGetPlatformInfo", e))?;

            let device_ids = match platform.get_devices(CL_DEVICE_TYPE_ALL) {
                Ok(ids) => ids,
                Err(ClError(CL_DEVICE_NOT_FOUND)) => Vec::new(),
                Err(e) => return Err(BenchError::api("clGetDeviceIDs", e)),
            };

            let mut devices = Vec::with_capacity(device_ids.len());
            for device_id in device_ids {
                let device_name = Device::new(device_id)
                    .name()
                    .map_err(|e| BenchError::api("clGetDeviceInfo", e))?;
                devices.push((device_id, device_name));
            }

            debug!("platform \"{}\" exposes {} device(s)", name, devices.len());
            snapshot.push(PlatformDevices { name, devices });
        }

        Ok(DeviceCatalog {
            platforms: snapshot,
        })
    }

    /// Total number of devices across all platforms.
    pub fn device_count(&self) -> usize {
        self.platforms.iter().map(|p| p.devices.len()).sum()
    }

    /// Flat listing rows in global-ordinal order.
    pub fn entries(&self) -> Vec<DeviceEntry> {
        let mut entries = Vec::with_capacity(self.device_count());
        let mut ordinal = 0u32;
        for platform in &self.platforms {
            for (_, device_name) in &platform.devices {
                entries.push(DeviceEntry {
                    ordinal,
                    platform_name: platform.name.clone(),
                    device_name: device_name.clone(),
                });
                ordinal += 1;
            }
        }
        entries
    }

    /// Resolve a global ordinal to its (platform, device) pair.
    ///
    /// The traversal order is the same one `entries` reports, so resolving a
    /// listed ordinal always yields the listed device.
    pub fn select(&self, ordinal: u32) -> BenchResult<SelectedDevice> {
        let mut next = 0u32;
        for platform in &self.platforms {
            for (device_id, device_name) in &platform.devices {
                if next == ordinal {
                    return Ok(SelectedDevice {
                        ordinal,
                        platform_name: platform.name.clone(),
                        device_name: device_name.clone(),
                        device_id: *device_id,
                    });
                }
                next += 1;
            }
        }

        Err(BenchError::DeviceNotFound {
            requested: ordinal,
            available: self.device_count(),
        })
    }

    /// Print the grouped device listing to standard output.
    ///
    /// One header per platform, then one row per device; a platform with no
    /// devices prints only its header.
    pub fn print_listing(&self) {
        for line in self.listing_lines() {
            println!("{}", line);
        }
    }

    fn listing_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut ordinal = 0u32;
        for platform in &self.platforms {
            lines.push(format!("Devices on platform \"{}\":", platform.name));
            for (_, device_name) in &platform.devices {
                lines.push(format!("  ID {}: {}", ordinal, device_name));
                ordinal += 1;
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn snapshot(platforms: &[(&str, &[&str])]) -> DeviceCatalog {
        DeviceCatalog {
            platforms: platforms
                .iter()
                .map(|(name, devices)| PlatformDevices {
                    name: name.to_string(),
                    devices: devices
                        .iter()
                        .map(|device| (ptr::null_mut(), device.to_string()))
                        .collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_ordinals_flatten_across_platforms() {
        let catalog = snapshot(&[("A", &["a0", "a1"]), ("B", &["b0"])]);
        assert_eq!(catalog.device_count(), 3);

        let entries = catalog.entries();
        let ordinals: Vec<u32> = entries.iter().map(|e| e.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);

        // The third device overall is the first device of platform B.
        assert_eq!(entries[2].platform_name, "B");
        assert_eq!(entries[2].device_name, "b0");
    }

    #[test]
    fn test_select_matches_entries() {
        let catalog = snapshot(&[("A", &["a0", "a1"]), ("B", &["b0"])]);
        for entry in catalog.entries() {
            let selected = catalog.select(entry.ordinal).unwrap();
            assert_eq!(selected.ordinal(), entry.ordinal);
            assert_eq!(selected.platform_name(), entry.platform_name);
            assert_eq!(selected.device_name(), entry.device_name);
        }
    }

    #[test]
    fn test_select_crosses_platform_boundary() {
        let catalog = snapshot(&[("A", &["a0", "a1"]), ("B", &["b0"])]);
        let selected = catalog.select(2).unwrap();
        assert_eq!(selected.platform_name(), "B");
        assert_eq!(selected.device_name(), "b0");
    }

    #[test]
    fn test_select_out_of_range() {
        let catalog = snapshot(&[("A", &["a0", "a1"]), ("B", &["b0"])]);
        match catalog.select(3) {
            Err(BenchError::DeviceNotFound {
                requested,
                available,
            }) => {
                assert_eq!(requested, 3);
                assert_eq!(available, 3);
            }
            other => panic!("Expected DeviceNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_select_with_no_devices() {
        let catalog = snapshot(&[("A", &[])]);
        match catalog.select(0) {
            Err(BenchError::DeviceNotFound {
                requested,
                available,
            }) => {
                assert_eq!(requested, 0);
                assert_eq!(available, 0);
            }
            other => panic!("Expected DeviceNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_listing_keeps_empty_platform_header() {
        let catalog = snapshot(&[("Empty", &[]), ("Full", &["gpu"])]);
        let lines = catalog.listing_lines();
        assert_eq!(
            lines,
            vec![
                "Devices on platform \"Empty\":".to_string(),
                "Devices on platform \"Full\":".to_string(),
                "  ID 0: gpu".to_string(),
            ]
        );
    }
}
