//! Central error types for the prototypes.
//!
//! Every bootstrap step maps its platform failure into a `ProtoError` variant
//! so the binaries can log one line and exit.

use thiserror::Error;

use crate::graphics::feature_level::NegotiationFailed;

/// Main error type for bootstrap operations.
#[derive(Error, Debug)]
pub enum ProtoError {
    /// Window class registration or window creation failed
    #[error("Window error: {0}")]
    WindowError(String),

    /// DXGI factory creation failed
    #[error("DXGI factory error: {0}")]
    FactoryError(String),

    /// Adapter enumeration or description query failed
    #[error("Adapter error: {0}")]
    AdapterError(String),

    /// No feature level produced a device
    #[error("Device creation failed: {0}")]
    DeviceError(#[from] NegotiationFailed),

    /// Command allocator, list or queue creation failed
    #[error("Command object error: {0}")]
    CommandError(String),

    /// Swap chain creation or interface upgrade failed
    #[error("Swap chain error: {0}")]
    SwapChainError(String),

    /// Config file could not be read
    #[error("Config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Config file is not valid JSON for `AppConfig`
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Config parsed but holds unusable values
    #[error("Invalid config: {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Built for a target without Win32/D3D12
    #[error("Direct3D 12 requires Windows (running on {os})")]
    UnsupportedPlatform { os: &'static str },
}

/// Map a platform error into the step-specific variant.
///
/// Used as `.map_err(step_err(ProtoError::CommandError, "CreateCommandQueue"))`.
pub fn step_err<E: std::fmt::Debug>(
    variant: fn(String) -> ProtoError,
    call: &'static str,
) -> impl FnOnce(E) -> ProtoError {
    move |e| variant(format!("{} failed: {:?}", call, e))
}

/// Type alias for Results using ProtoError.
pub type ProtoResult<T> = Result<T, ProtoError>;
