//! DXGI swap chain creation for the application window.
//!
//! The swap chain is configured by default for:
//! - RGBA8 UNORM back buffers, two of them
//! - Flip-discard presentation with stretch scaling
//! - Fullscreen mode switching allowed

use serde::{Deserialize, Serialize};

use crate::error::{ProtoError, ProtoResult};
use crate::window::types::MAX_CLIENT_DIMENSION;

/// Largest buffer count DXGI accepts for a flip-model swap chain
pub const MAX_BUFFER_COUNT: u32 = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackBufferFormat {
    #[default]
    Rgba8Unorm,
    Bgra8Unorm,
    Rgba16Float,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scaling {
    #[default]
    Stretch,
    None,
    AspectRatioStretch,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapEffect {
    #[default]
    FlipDiscard,
    FlipSequential,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaMode {
    #[default]
    Unspecified,
    Premultiplied,
    Straight,
    Ignore,
}

/// Swap chain settings. The extent always comes from the window client area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapChainConfig {
    pub format: BackBufferFormat,
    pub stereo: bool,
    pub sample_count: u32,
    pub sample_quality: u32,
    pub buffer_count: u32,
    pub scaling: Scaling,
    pub swap_effect: SwapEffect,
    pub alpha_mode: AlphaMode,
    pub allow_mode_switch: bool,
}

impl Default for SwapChainConfig {
    fn default() -> Self {
        Self {
            format: BackBufferFormat::Rgba8Unorm,
            stereo: false,
            sample_count: 1,
            sample_quality: 0,
            buffer_count: 2,
            scaling: Scaling::Stretch,
            swap_effect: SwapEffect::FlipDiscard,
            alpha_mode: AlphaMode::Unspecified,
            allow_mode_switch: true,
        }
    }
}

impl SwapChainConfig {
    /// Back buffer extent for a window client area of `width` x `height`.
    ///
    /// DXGI would size a zero extent from the window itself, so each edge is
    /// kept at least 1 and at most the texture dimension limit.
    pub fn extent_for(&self, width: u32, height: u32) -> (u32, u32) {
        (
            width.clamp(1, MAX_CLIENT_DIMENSION),
            height.clamp(1, MAX_CLIENT_DIMENSION),
        )
    }

    /// Reject settings DXGI refuses for flip-model swap chains.
    pub fn validate(&self) -> ProtoResult<()> {
        if !(2..=MAX_BUFFER_COUNT).contains(&self.buffer_count) {
            return Err(ProtoError::InvalidConfig {
                field: "swap_chain.buffer_count",
                reason: format!("must be in 2..={}, got {}", MAX_BUFFER_COUNT, self.buffer_count),
            });
        }
        // Flip model does not support multisampled back buffers
        if self.sample_count != 1 || self.sample_quality != 0 {
            return Err(ProtoError::InvalidConfig {
                field: "swap_chain.sample_count",
                reason: format!(
                    "flip-model swap chains need 1 sample at quality 0, got {} at {}",
                    self.sample_count, self.sample_quality
                ),
            });
        }
        Ok(())
    }
}

#[cfg(windows)]
pub use platform::create_swap_chain;

#[cfg(windows)]
mod platform {
    use windows::core::Interface;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Direct3D12::ID3D12CommandQueue;
    use windows::Win32::Graphics::Dxgi::Common::{
        DXGI_ALPHA_MODE, DXGI_ALPHA_MODE_IGNORE, DXGI_ALPHA_MODE_PREMULTIPLIED,
        DXGI_ALPHA_MODE_STRAIGHT, DXGI_ALPHA_MODE_UNSPECIFIED, DXGI_FORMAT,
        DXGI_FORMAT_B8G8R8A8_UNORM, DXGI_FORMAT_R16G16B16A16_FLOAT, DXGI_FORMAT_R8G8B8A8_UNORM,
        DXGI_SAMPLE_DESC,
    };
    use windows::Win32::Graphics::Dxgi::{
        IDXGIFactory6, IDXGISwapChain1, IDXGISwapChain4, DXGI_SCALING, DXGI_SCALING_ASPECT_RATIO_STRETCH,
        DXGI_SCALING_NONE, DXGI_SCALING_STRETCH, DXGI_SWAP_CHAIN_DESC1,
        DXGI_SWAP_CHAIN_FLAG_ALLOW_MODE_SWITCH, DXGI_SWAP_EFFECT, DXGI_SWAP_EFFECT_FLIP_DISCARD,
        DXGI_SWAP_EFFECT_FLIP_SEQUENTIAL, DXGI_USAGE_BACK_BUFFER,
    };

    use super::{AlphaMode, BackBufferFormat, Scaling, SwapChainConfig, SwapEffect};
    use crate::error::{step_err, ProtoError, ProtoResult};

    fn format(format: BackBufferFormat) -> DXGI_FORMAT {
        match format {
            BackBufferFormat::Rgba8Unorm => DXGI_FORMAT_R8G8B8A8_UNORM,
            BackBufferFormat::Bgra8Unorm => DXGI_FORMAT_B8G8R8A8_UNORM,
            BackBufferFormat::Rgba16Float => DXGI_FORMAT_R16G16B16A16_FLOAT,
        }
    }

    fn scaling(scaling: Scaling) -> DXGI_SCALING {
        match scaling {
            Scaling::Stretch => DXGI_SCALING_STRETCH,
            Scaling::None => DXGI_SCALING_NONE,
            Scaling::AspectRatioStretch => DXGI_SCALING_ASPECT_RATIO_STRETCH,
        }
    }

    fn swap_effect(effect: SwapEffect) -> DXGI_SWAP_EFFECT {
        match effect {
            SwapEffect::FlipDiscard => DXGI_SWAP_EFFECT_FLIP_DISCARD,
            SwapEffect::FlipSequential => DXGI_SWAP_EFFECT_FLIP_SEQUENTIAL,
        }
    }

    fn alpha_mode(mode: AlphaMode) -> DXGI_ALPHA_MODE {
        match mode {
            AlphaMode::Unspecified => DXGI_ALPHA_MODE_UNSPECIFIED,
            AlphaMode::Premultiplied => DXGI_ALPHA_MODE_PREMULTIPLIED,
            AlphaMode::Straight => DXGI_ALPHA_MODE_STRAIGHT,
            AlphaMode::Ignore => DXGI_ALPHA_MODE_IGNORE,
        }
    }

    impl SwapChainConfig {
        pub fn to_desc(&self, width: u32, height: u32) -> DXGI_SWAP_CHAIN_DESC1 {
            DXGI_SWAP_CHAIN_DESC1 {
                Width: width,
                Height: height,
                Format: format(self.format),
                Stereo: self.stereo.into(),
                SampleDesc: DXGI_SAMPLE_DESC {
                    Count: self.sample_count,
                    Quality: self.sample_quality,
                },
                BufferUsage: DXGI_USAGE_BACK_BUFFER,
                BufferCount: self.buffer_count,
                Scaling: scaling(self.scaling),
                SwapEffect: swap_effect(self.swap_effect),
                AlphaMode: alpha_mode(self.alpha_mode),
                Flags: if self.allow_mode_switch {
                    DXGI_SWAP_CHAIN_FLAG_ALLOW_MODE_SWITCH.0 as u32
                } else {
                    0
                },
            }
        }
    }

    /// Create a swap chain presenting `queue` into `hwnd` and upgrade it to
    /// `IDXGISwapChain4`.
    ///
    /// # Arguments
    /// * `factory` - The DXGI factory
    /// * `queue` - Direct command queue the swap chain flushes through
    /// * `hwnd` - Target window
    /// * `width` - Window client width
    /// * `height` - Window client height
    ///
    /// The back buffers are sized by [`SwapChainConfig::extent_for`].
    pub fn create_swap_chain(
        factory: &IDXGIFactory6,
        queue: &ID3D12CommandQueue,
        hwnd: HWND,
        config: &SwapChainConfig,
        width: u32,
        height: u32,
    ) -> ProtoResult<IDXGISwapChain4> {
        let (width, height) = config.extent_for(width, height);
        let desc = config.to_desc(width, height);

        let swap_chain: IDXGISwapChain1 = unsafe {
            factory
                .CreateSwapChainForHwnd(queue, hwnd, &desc, None, None)
                .map_err(step_err(ProtoError::SwapChainError, "CreateSwapChainForHwnd"))?
        };

        let swap_chain: IDXGISwapChain4 = swap_chain
            .cast()
            .map_err(step_err(ProtoError::SwapChainError, "QueryInterface(IDXGISwapChain4)"))?;

        log::info!(
            "[create_swap_chain] {}x{} {:?}, {} buffers, {:?}",
            width,
            height,
            config.format,
            config.buffer_count,
            config.swap_effect
        );

        Ok(swap_chain)
    }
}
