//! Application window: class registration, creation and the message loop.
//!
//! # Architecture
//!
//! ```text
//! mod.rs (WindowClass, Window, message loop)
//!   |
//!   +-- types.rs (settings, constants, geometry)
//!   +-- wndproc.rs (Win32 message handling)
//! ```
//!
//! The message loop peeks without blocking. When the queue is empty it backs
//! off for the configured idle sleep, then peeks again.

pub mod types;
#[cfg(windows)]
mod wndproc;

pub use types::{to_wide, PumpStatus, Rect, WindowConfig};

/// Drive a message loop until `pump` reports `Quit`, calling `on_idle`
/// whenever the queue was empty. Returns the quit exit code.
pub fn drive_message_loop<P, I>(mut pump: P, mut on_idle: I) -> i32
where
    P: FnMut() -> PumpStatus,
    I: FnMut(),
{
    loop {
        match pump() {
            PumpStatus::Quit { exit_code } => return exit_code,
            PumpStatus::Idle => on_idle(),
        }
    }
}

#[cfg(windows)]
pub use platform::{pump_messages, run_message_loop, Window, WindowClass};

#[cfg(windows)]
mod platform {
    use std::time::Duration;

    use windows::core::PCWSTR;
    use windows::Win32::Foundation::{HINSTANCE, HWND, RECT};
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::UI::WindowsAndMessaging::{
        AdjustWindowRect, CreateWindowExW, DestroyWindow, DispatchMessageW, IsWindow, LoadCursorW,
        PeekMessageW, RegisterClassExW, ShowWindow, TranslateMessage, UnregisterClassW,
        CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, IDC_ARROW, MSG, PM_REMOVE, SW_SHOW,
        WINDOW_EX_STYLE, WM_QUIT, WNDCLASSEXW, WS_OVERLAPPEDWINDOW,
    };

    use super::types::{to_wide, PumpStatus, Rect, WindowConfig};
    use super::wndproc::wnd_proc;
    use crate::config::MessageLoopConfig;
    use crate::error::{step_err, ProtoError, ProtoResult};

    /// A registered window class, unregistered on drop.
    pub struct WindowClass {
        name: Vec<u16>,
        hinstance: HINSTANCE,
    }

    impl WindowClass {
        /// Register the class named by `config.class_name` for this module.
        pub fn register(config: &WindowConfig) -> ProtoResult<Self> {
            unsafe {
                let hinstance: HINSTANCE = GetModuleHandleW(None)
                    .map_err(step_err(ProtoError::WindowError, "GetModuleHandleW"))?
                    .into();

                let name = to_wide(&config.class_name);

                let wc = WNDCLASSEXW {
                    cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
                    style: CS_HREDRAW | CS_VREDRAW,
                    lpfnWndProc: Some(wnd_proc),
                    hInstance: hinstance,
                    lpszClassName: PCWSTR(name.as_ptr()),
                    hCursor: LoadCursorW(None, IDC_ARROW)
                        .map_err(step_err(ProtoError::WindowError, "LoadCursorW"))?,
                    ..Default::default()
                };

                let atom = RegisterClassExW(&wc);
                if atom == 0 {
                    return Err(ProtoError::WindowError(format!(
                        "Failed to register window class {:?}: {:?}",
                        config.class_name,
                        windows::core::Error::from_win32()
                    )));
                }

                log::debug!("[WindowClass::register] Registered {:?}", config.class_name);
                Ok(Self { name, hinstance })
            }
        }

        fn name(&self) -> PCWSTR {
            PCWSTR(self.name.as_ptr())
        }
    }

    impl Drop for WindowClass {
        fn drop(&mut self) {
            unsafe {
                if let Err(e) = UnregisterClassW(self.name(), self.hinstance) {
                    log::warn!("[WindowClass] UnregisterClassW failed: {:?}", e);
                }
            }
        }
    }

    /// The application window. Destroyed on drop if the user has not closed it.
    pub struct Window {
        hwnd: HWND,
        client_width: u32,
        client_height: u32,
    }

    impl Window {
        /// Create an overlapped window whose client area is exactly
        /// `config.width` x `config.height`. The window starts hidden.
        pub fn create(class: &WindowClass, config: &WindowConfig) -> ProtoResult<Self> {
            unsafe {
                let mut rect: RECT = config.client_rect().into();
                AdjustWindowRect(&mut rect, WS_OVERLAPPEDWINDOW, false)
                    .map_err(step_err(ProtoError::WindowError, "AdjustWindowRect"))?;
                let outer = Rect::from(rect);

                let title = to_wide(&config.title);

                let hwnd = CreateWindowExW(
                    WINDOW_EX_STYLE::default(),
                    class.name(),
                    PCWSTR(title.as_ptr()),
                    WS_OVERLAPPEDWINDOW,
                    CW_USEDEFAULT,
                    CW_USEDEFAULT,
                    outer.width() as i32,
                    outer.height() as i32,
                    None,
                    None,
                    class.hinstance,
                    None,
                )
                .map_err(step_err(ProtoError::WindowError, "CreateWindowExW"))?;

                log::info!(
                    "[Window::create] {:?} client {}x{}, outer {}x{}",
                    config.title,
                    config.width,
                    config.height,
                    outer.width(),
                    outer.height()
                );

                Ok(Self {
                    hwnd,
                    client_width: config.width,
                    client_height: config.height,
                })
            }
        }

        pub fn hwnd(&self) -> HWND {
            self.hwnd
        }

        /// Client area size the window was created for
        pub fn client_size(&self) -> (u32, u32) {
            (self.client_width, self.client_height)
        }

        pub fn show(&self) {
            unsafe {
                let _ = ShowWindow(self.hwnd, SW_SHOW);
            }
        }
    }

    impl Drop for Window {
        fn drop(&mut self) {
            unsafe {
                if IsWindow(self.hwnd).as_bool() {
                    let _ = DestroyWindow(self.hwnd);
                }
            }
        }
    }

    /// Drain every pending message for this thread.
    pub fn pump_messages() -> PumpStatus {
        let mut msg = MSG::default();

        unsafe {
            while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                if msg.message == WM_QUIT {
                    return PumpStatus::Quit {
                        exit_code: msg.wParam.0 as i32,
                    };
                }
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        PumpStatus::Idle
    }

    /// Run the idle message loop until `WM_QUIT`. Returns the exit code.
    pub fn run_message_loop(config: &MessageLoopConfig) -> i32 {
        let idle = Duration::from_millis(config.idle_sleep_ms);

        super::drive_message_loop(pump_messages, || {
            if !idle.is_zero() {
                std::thread::sleep(idle);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_config() {
        let config = WindowConfig::default();
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 720);
        assert_eq!(config.title, "DX12GAME-PROTO2");
        assert_eq!(config.class_name, "dx12game-proto2");
    }

    #[test]
    fn client_rect_anchored_at_origin() {
        let r = WindowConfig::default().client_rect();
        assert_eq!(r, Rect::new(0, 0, 1280, 720));
        assert_eq!(r.width(), 1280);
        assert_eq!(r.height(), 720);
    }

    #[test]
    fn rect_from_xywh() {
        let r = Rect::from_xywh(10, 20, 100, 50);
        assert_eq!(r.left, 10);
        assert_eq!(r.top, 20);
        assert_eq!(r.right, 110);
        assert_eq!(r.bottom, 70);
    }

    #[test]
    fn adjusted_rect_with_negative_origin() {
        // AdjustWindowRect grows the rect outward, so left/top go negative
        let r = Rect::new(-8, -31, 1288, 728);
        assert_eq!(r.width(), 1296);
        assert_eq!(r.height(), 759);
    }

    #[test]
    fn extreme_rect_edges_do_not_overflow() {
        let r = Rect::new(-8, 0, i32::MAX, 0);
        assert_eq!(r.width(), i32::MAX as u32 + 8);

        let full = Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(full.width(), u32::MAX);
        assert_eq!(full.height(), u32::MAX);
    }

    #[test]
    fn from_xywh_saturates() {
        let r = Rect::from_xywh(i32::MAX - 10, 0, 100, u32::MAX);
        assert_eq!(r.right, i32::MAX);
        assert_eq!(r.bottom, i32::MAX);
    }

    #[test]
    fn inverted_rect_has_zero_size() {
        let r = Rect::new(100, 100, 0, 0);
        assert_eq!(r.width(), 0);
        assert_eq!(r.height(), 0);
    }

    #[test]
    fn to_wide_is_nul_terminated() {
        let wide = to_wide("DX12");
        assert_eq!(wide, vec![b'D' as u16, b'X' as u16, b'1' as u16, b'2' as u16, 0]);
        assert_eq!(to_wide(""), vec![0]);
    }

    #[test]
    fn message_loop_idles_until_quit() {
        let mut script = vec![
            PumpStatus::Idle,
            PumpStatus::Idle,
            PumpStatus::Quit { exit_code: 0 },
        ]
        .into_iter();
        let mut idles = 0;

        let code = drive_message_loop(|| script.next().unwrap(), || idles += 1);

        assert_eq!(code, 0);
        assert_eq!(idles, 2);
    }

    #[test]
    fn message_loop_returns_quit_code_immediately() {
        let mut idles = 0;
        let code = drive_message_loop(|| PumpStatus::Quit { exit_code: 3 }, || idles += 1);
        assert_eq!(code, 3);
        assert_eq!(idles, 0);
    }
}
