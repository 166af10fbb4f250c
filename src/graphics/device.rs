//! DXGI factory and D3D12 device creation.

use windows::Win32::Foundation::E_POINTER;
use windows::Win32::Graphics::Direct3D12::{D3D12CreateDevice, D3D12GetDebugInterface, ID3D12Debug, ID3D12Device};
use windows::Win32::Graphics::Dxgi::{
    CreateDXGIFactory2, IDXGIAdapter1, IDXGIFactory6, DXGI_CREATE_FACTORY_DEBUG,
    DXGI_CREATE_FACTORY_FLAGS,
};

use super::feature_level::{negotiate, FeatureLevel};
use crate::error::{step_err, ProtoError, ProtoResult};

/// Create the DXGI factory used for adapter enumeration and swap chains.
///
/// With `debug` set the factory is created with `DXGI_CREATE_FACTORY_DEBUG`,
/// which requires the Graphics Tools optional feature.
pub fn create_factory(debug: bool) -> ProtoResult<IDXGIFactory6> {
    let flags = if debug {
        DXGI_CREATE_FACTORY_DEBUG
    } else {
        DXGI_CREATE_FACTORY_FLAGS(0)
    };

    unsafe { CreateDXGIFactory2(flags) }.map_err(step_err(ProtoError::FactoryError, "CreateDXGIFactory2"))
}

/// Turn on the D3D12 debug layer. Must run before the device is created.
///
/// Returns false when the layer is not installed; that is not fatal.
pub fn enable_debug_layer() -> bool {
    let mut debug: Option<ID3D12Debug> = None;

    unsafe {
        if let Err(e) = D3D12GetDebugInterface(&mut debug) {
            log::warn!("[enable_debug_layer] D3D12 debug layer unavailable: {:?}", e);
            return false;
        }
        match debug {
            Some(debug) => {
                debug.EnableDebugLayer();
                true
            }
            None => false,
        }
    }
}

/// Create a device on `adapter` (or the system default adapter when `None`),
/// trying `levels` from highest to lowest.
pub fn create_device(
    adapter: Option<&IDXGIAdapter1>,
    levels: &[FeatureLevel],
) -> ProtoResult<(ID3D12Device, FeatureLevel)> {
    let (level, device) = negotiate(levels, |level| -> windows::core::Result<ID3D12Device> {
        let mut device: Option<ID3D12Device> = None;

        unsafe {
            match adapter {
                Some(adapter) => D3D12CreateDevice(adapter, level.to_d3d(), &mut device)?,
                None => D3D12CreateDevice(None, level.to_d3d(), &mut device)?,
            }
        }

        device.ok_or_else(|| windows::core::Error::from(E_POINTER))
    })
    .map_err(ProtoError::DeviceError)?;

    Ok((device, level))
}
