//! Type definitions for the application window.
//!
//! This module contains the window settings, constants and geometry used by
//! window creation and the message loop.

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Default client area width in pixels
pub const DEFAULT_CLIENT_WIDTH: u32 = 1280;

/// Default client area height in pixels
pub const DEFAULT_CLIENT_HEIGHT: u32 = 720;

/// Window class name for Win32 registration
pub const DEFAULT_CLASS_NAME: &str = "dx12game-proto2";

/// Window caption
pub const DEFAULT_TITLE: &str = "DX12GAME-PROTO2";

/// Largest client edge accepted; matches the D3D12 2D texture dimension limit
pub const MAX_CLIENT_DIMENSION: u32 = 16384;

// ============================================================================
// Settings
// ============================================================================

/// Window class and window creation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Client area width; the outer window is grown to fit the frame
    pub width: u32,
    /// Client area height
    pub height: u32,
    pub title: String,
    pub class_name: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CLIENT_WIDTH,
            height: DEFAULT_CLIENT_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
            class_name: DEFAULT_CLASS_NAME.to_string(),
        }
    }
}

impl WindowConfig {
    /// Client area as a rectangle anchored at the origin
    pub fn client_rect(&self) -> Rect {
        Rect::from_xywh(0, 0, self.width, self.height)
    }
}

// ============================================================================
// Geometry Types
// ============================================================================

/// A rectangle with integer coordinates.
///
/// Uses left/top/right/bottom format where right and bottom are exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_xywh(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            left: x,
            top: y,
            right: x.saturating_add(width.min(i32::MAX as u32) as i32),
            bottom: y.saturating_add(height.min(i32::MAX as u32) as i32),
        }
    }

    /// Width, clamped to zero for inverted rectangles
    pub fn width(&self) -> u32 {
        span(self.left, self.right)
    }

    /// Height, clamped to zero for inverted rectangles
    pub fn height(&self) -> u32 {
        span(self.top, self.bottom)
    }
}

fn span(start: i32, end: i32) -> u32 {
    (end as i64 - start as i64).clamp(0, u32::MAX as i64) as u32
}

#[cfg(windows)]
impl From<Rect> for windows::Win32::Foundation::RECT {
    fn from(r: Rect) -> Self {
        Self {
            left: r.left,
            top: r.top,
            right: r.right,
            bottom: r.bottom,
        }
    }
}

#[cfg(windows)]
impl From<windows::Win32::Foundation::RECT> for Rect {
    fn from(r: windows::Win32::Foundation::RECT) -> Self {
        Rect::new(r.left, r.top, r.right, r.bottom)
    }
}

// ============================================================================
// Message loop
// ============================================================================

/// Result of draining the thread message queue once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpStatus {
    /// Queue is empty and the application keeps running
    Idle,
    /// `WM_QUIT` was received with this exit code
    Quit { exit_code: i32 },
}

/// Encode a string as a NUL-terminated UTF-16 buffer for Win32.
pub fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
