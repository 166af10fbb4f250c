//! Win32 window procedure for the application window.

use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{DefWindowProcW, PostQuitMessage, WM_DESTROY};

/// Window procedure for the application window.
///
/// Destroying the window ends the message loop; everything else gets the
/// default handling.
///
/// # Safety
/// This is a Win32 callback and must be marked unsafe.
pub unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_DESTROY => {
            log::debug!("[wnd_proc] WM_DESTROY, posting quit");
            PostQuitMessage(0);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}
