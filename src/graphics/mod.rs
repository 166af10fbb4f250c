//! Graphics bootstrap: DXGI factory, adapter, D3D12 device, command objects
//! and swap chain.
//!
//! # Architecture
//!
//! ```text
//! DXGI Factory
//!     |
//!     +-- Adapters (enumerated once, one selected)
//!     |       |
//!     |       +-- D3D12 Device (highest accepted feature level)
//!     |               |
//!     |               +-- Command allocator / list / queue   (Full only)
//!     |
//!     +-- Swap chain for the window, fed by the queue        (Full only)
//! ```
//!
//! # Modules
//!
//! - `adapter` - Adapter enumeration and selection
//! - `feature_level` - Feature levels and device-creation negotiation
//! - `device` - Factory, debug layer and device creation
//! - `commands` - Command allocator, list and queue
//! - `swap_chain` - Swap chain description and creation

pub mod adapter;
pub mod commands;
#[cfg(windows)]
pub mod device;
pub mod feature_level;
pub mod swap_chain;


use serde::{Deserialize, Serialize};

pub use adapter::{select_adapter, AdapterChoice, AdapterInfo, AdapterPreference};
pub use commands::CommandQueueConfig;
pub use feature_level::FeatureLevel;
pub use swap_chain::SwapChainConfig;

/// Device creation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Levels to try; always attempted highest first
    pub feature_levels: Vec<FeatureLevel>,
    /// Enable the D3D12 debug layer and a debug DXGI factory
    pub debug_layer: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            feature_levels: FeatureLevel::ALL_DESCENDING.to_vec(),
            debug_layer: false,
        }
    }
}

#[cfg(windows)]
pub use context::GraphicsContext;

#[cfg(windows)]
mod context {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Direct3D12::ID3D12Device;
    use windows::Win32::Graphics::Dxgi::{IDXGIFactory6, IDXGISwapChain4};

    use super::adapter::{enumerate_adapters, select_adapter, AdapterChoice, AdapterInfo};
    use super::commands::CommandObjects;
    use super::device::{create_device, create_factory, enable_debug_layer};
    use super::feature_level::FeatureLevel;
    use super::swap_chain::create_swap_chain;
    use crate::app::Variant;
    use crate::config::AppConfig;
    use crate::error::ProtoResult;

    /// All graphics objects created during bootstrap.
    ///
    /// Field order is drop order: swap chain, command objects, device, factory.
    pub struct GraphicsContext {
        pub swap_chain: Option<IDXGISwapChain4>,
        pub commands: Option<CommandObjects>,
        pub device: ID3D12Device,
        pub factory: IDXGIFactory6,
        pub feature_level: FeatureLevel,
        /// `None` when the system default adapter was used
        pub adapter: Option<AdapterInfo>,
    }

    impl GraphicsContext {
        /// Run the graphics half of bootstrap against `hwnd`.
        ///
        /// `client_size` is the window client area; the swap chain's back
        /// buffers take `SwapChainConfig::extent_for` of it.
        pub fn initialize(
            hwnd: HWND,
            client_size: (u32, u32),
            variant: Variant,
            config: &AppConfig,
        ) -> ProtoResult<Self> {
            if config.device.debug_layer && enable_debug_layer() {
                log::info!("[GraphicsContext] D3D12 debug layer enabled");
            }

            let factory = create_factory(config.device.debug_layer)?;
            log::debug!("[GraphicsContext] DXGI factory created");

            let mut adapters = enumerate_adapters(&factory)?;
            let snapshots: Vec<AdapterInfo> = adapters.iter().map(|(_, info)| info.clone()).collect();
            log::info!("[GraphicsContext] {} adapter(s) enumerated", snapshots.len());

            let selected = match select_adapter(&snapshots, &config.adapter) {
                AdapterChoice::Matched { index } => {
                    let (adapter, info) = adapters.swap_remove(index);
                    log::info!("[GraphicsContext] Using adapter #{}: {}", info.index, info.description);
                    Some((adapter, info))
                }
                AdapterChoice::SystemDefault => {
                    log::info!(
                        "[GraphicsContext] No adapter matches {:?}, using system default",
                        config.adapter.description_contains
                    );
                    None
                }
            };
            // The remaining adapters are released here
            drop(adapters);

            let (device, feature_level) = create_device(
                selected.as_ref().map(|(adapter, _)| adapter),
                &config.device.feature_levels,
            )?;
            log::info!("[GraphicsContext] D3D12 device created at feature level {}", feature_level);

            let (commands, swap_chain) = if variant.creates_swap_chain() {
                let commands = CommandObjects::create(&device, &config.commands)?;
                let (width, height) = client_size;
                let swap_chain = create_swap_chain(
                    &factory,
                    &commands.queue,
                    hwnd,
                    &config.swap_chain,
                    width,
                    height,
                )?;
                (Some(commands), Some(swap_chain))
            } else {
                (None, None)
            };

            Ok(Self {
                swap_chain,
                commands,
                device,
                factory,
                feature_level,
                adapter: selected.map(|(_, info)| info),
            })
        }
    }
}
