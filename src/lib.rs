//! Win32 window and Direct3D 12 device bootstrap.
//!
//! Two prototypes share this library:
//! - `dx12game-proto1` creates the window and the device
//! - `dx12game-proto2` also creates the command objects and a swap chain
//!
//! Both then idle in the message loop until the window is closed.

pub mod app;
pub mod config;
pub mod error;
pub mod graphics;
pub mod logging;
pub mod window;

pub use app::{launch, run, Variant};
pub use config::AppConfig;
pub use error::{ProtoError, ProtoResult};
