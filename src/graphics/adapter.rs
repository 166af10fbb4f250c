//! Adapter enumeration and selection.
//!
//! Enumeration produces a transient list of `AdapterInfo` snapshots that is
//! scanned once for the preferred adapter and then dropped.

use serde::{Deserialize, Serialize};

/// Snapshot of one enumerated adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterInfo {
    /// Enumeration index passed to `EnumAdapters1`
    pub index: u32,
    /// Human-readable adapter name reported by the driver
    pub description: String,
    pub vendor_id: u32,
    pub device_id: u32,
    /// Dedicated video memory in bytes
    pub dedicated_video_memory: u64,
    /// True for software rasterizers such as WARP
    pub is_software: bool,
}

impl AdapterInfo {
    /// Dedicated video memory in whole mebibytes
    pub fn dedicated_video_memory_mib(&self) -> u64 {
        self.dedicated_video_memory / (1024 * 1024)
    }
}

/// Which adapter the device should be created on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterPreference {
    /// Case-sensitive substring searched for in the adapter description.
    /// `None` or empty always picks the system default adapter.
    pub description_contains: Option<String>,
    /// Whether software adapters may be matched
    pub allow_software: bool,
}

impl Default for AdapterPreference {
    fn default() -> Self {
        Self {
            description_contains: Some("NVIDIA".to_string()),
            allow_software: true,
        }
    }
}

/// Outcome of adapter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterChoice {
    /// Use the adapter at this position in the enumerated list
    Matched { index: usize },
    /// Let the runtime pick its default adapter
    SystemDefault,
}

/// Pick the first adapter, in enumeration order, whose description contains
/// the preferred substring.
pub fn select_adapter(adapters: &[AdapterInfo], preference: &AdapterPreference) -> AdapterChoice {
    let needle = match preference.description_contains.as_deref() {
        Some(needle) if !needle.is_empty() => needle,
        _ => return AdapterChoice::SystemDefault,
    };

    adapters
        .iter()
        .position(|adapter| {
            (preference.allow_software || !adapter.is_software)
                && adapter.description.contains(needle)
        })
        .map(|index| AdapterChoice::Matched { index })
        .unwrap_or(AdapterChoice::SystemDefault)
}

/// Decode a fixed-size, NUL-terminated UTF-16 description buffer.
pub fn decode_description(raw: &[u16]) -> String {
    let len = raw.iter().position(|&c| c == 0).unwrap_or(raw.len());
    String::from_utf16_lossy(&raw[..len])
}

#[cfg(windows)]
pub use platform::enumerate_adapters;

#[cfg(windows)]
mod platform {
    use windows::Win32::Graphics::Dxgi::{
        IDXGIAdapter1, IDXGIFactory6, DXGI_ADAPTER_FLAG_SOFTWARE, DXGI_ERROR_NOT_FOUND,
    };

    use super::{decode_description, AdapterInfo};
    use crate::error::{ProtoError, ProtoResult};

    /// Enumerate every adapter until the factory reports `DXGI_ERROR_NOT_FOUND`.
    pub fn enumerate_adapters(factory: &IDXGIFactory6) -> ProtoResult<Vec<(IDXGIAdapter1, AdapterInfo)>> {
        let mut adapters = Vec::new();

        for index in 0u32.. {
            let adapter = match unsafe { factory.EnumAdapters1(index) } {
                Ok(adapter) => adapter,
                Err(e) if e.code() == DXGI_ERROR_NOT_FOUND => break,
                Err(e) => {
                    return Err(ProtoError::AdapterError(format!(
                        "EnumAdapters1({}) failed: {:?}",
                        index, e
                    )))
                }
            };

            let desc = unsafe { adapter.GetDesc1() }.map_err(|e| {
                ProtoError::AdapterError(format!("GetDesc1 for adapter {} failed: {:?}", index, e))
            })?;

            let info = AdapterInfo {
                index,
                description: decode_description(&desc.Description),
                vendor_id: desc.VendorId,
                device_id: desc.DeviceId,
                dedicated_video_memory: desc.DedicatedVideoMemory as u64,
                is_software: (desc.Flags & DXGI_ADAPTER_FLAG_SOFTWARE.0 as u32) != 0,
            };

            log::debug!(
                "[enumerate_adapters] #{}: {} (vendor=0x{:04x}, device=0x{:04x}, vram={} MiB, software={})",
                info.index,
                info.description,
                info.vendor_id,
                info.device_id,
                info.dedicated_video_memory_mib(),
                info.is_software
            );

            adapters.push((adapter, info));
        }

        Ok(adapters)
    }
}
