//! Bootstrap sequence shared by both prototypes.
//!
//! Window class -> window -> DXGI factory -> adapter -> device
//! -> (Full) command objects -> (Full) swap chain -> message loop -> teardown.

use crate::config::AppConfig;
use crate::error::ProtoResult;

/// Which prototype is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Window and device only
    DeviceOnly,
    /// Window, device, command objects and swap chain
    Full,
}

impl Variant {
    pub fn name(&self) -> &'static str {
        match self {
            Variant::DeviceOnly => "proto1",
            Variant::Full => "proto2",
        }
    }

    /// Whether command objects and a swap chain are created
    pub fn creates_swap_chain(&self) -> bool {
        matches!(self, Variant::Full)
    }
}

/// Run the whole bootstrap and block in the message loop until the window
/// closes. Returns the exit code carried by `WM_QUIT`.
pub fn run(variant: Variant, config: &AppConfig) -> ProtoResult<i32> {
    config.validate()?;
    log::info!("[run] Starting {} ({:?})", variant.name(), variant);

    let exit_code = run_platform(variant, config)?;

    log::debug!("[run] Show window test finished with exit code {}", exit_code);
    if config.message_loop.wait_for_enter_on_exit {
        wait_for_enter();
    }
    Ok(exit_code)
}

#[cfg(windows)]
fn run_platform(variant: Variant, config: &AppConfig) -> ProtoResult<i32> {
    use crate::graphics::GraphicsContext;
    use crate::window::{run_message_loop, Window, WindowClass};

    let class = WindowClass::register(&config.window)?;
    let window = Window::create(&class, &config.window)?;

    let graphics = GraphicsContext::initialize(window.hwnd(), window.client_size(), variant, config)?;
    log::info!(
        "[run] Graphics ready: feature level {}, adapter {}, swap chain {}",
        graphics.feature_level,
        graphics
            .adapter
            .as_ref()
            .map(|a| a.description.as_str())
            .unwrap_or("<system default>"),
        if graphics.swap_chain.is_some() { "yes" } else { "no" }
    );

    window.show();
    let exit_code = run_message_loop(&config.message_loop);
    log::info!("[run] Message loop ended");

    // Graphics objects go first, then the window, then its class
    drop(graphics);
    drop(window);
    drop(class);

    Ok(exit_code)
}

#[cfg(not(windows))]
fn run_platform(_variant: Variant, _config: &AppConfig) -> ProtoResult<i32> {
    Err(crate::error::ProtoError::UnsupportedPlatform {
        os: std::env::consts::OS,
    })
}

fn wait_for_enter() {
    log::info!("[run] Press Enter to exit");
    let mut line = String::new();
    if let Err(e) = std::io::stdin().read_line(&mut line) {
        log::warn!("[run] Failed to read stdin: {}", e);
    }
}

/// Entry point used by the binaries: load config, run, map errors to an exit
/// status.
pub fn launch(variant: Variant) -> i32 {
    let result = AppConfig::load().and_then(|config| run(variant, &config));

    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            log::error!("[launch] {} failed: {}", variant.name(), e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtoError;

    #[test]
    fn variant_names() {
        assert_eq!(Variant::DeviceOnly.name(), "proto1");
        assert_eq!(Variant::Full.name(), "proto2");
    }

    #[test]
    fn only_full_variant_creates_swap_chain() {
        assert!(!Variant::DeviceOnly.creates_swap_chain());
        assert!(Variant::Full.creates_swap_chain());
    }

    #[test]
    fn invalid_config_fails_before_touching_the_platform() {
        let mut config = AppConfig::default();
        config.window.width = 0;

        let err = run(Variant::Full, &config).unwrap_err();
        assert!(matches!(err, ProtoError::InvalidConfig { .. }));
    }

    #[cfg(not(windows))]
    #[test]
    fn non_windows_reports_unsupported_platform() {
        let err = run(Variant::DeviceOnly, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, ProtoError::UnsupportedPlatform { .. }));
    }
}
