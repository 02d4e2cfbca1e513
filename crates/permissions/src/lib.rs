//! Simple, macOS-only permission checks for bindkey.
//!
//! Exposes a minimal API to query whether the process holds the
//! Accessibility and Input Monitoring permissions the monitor and the paste
//! injector depend on. There is no prompting logic here beyond
//! [`open_accessibility_settings`]; the host decides when to guide the user
//! to System Settings.
//!
//! All checks are fast and side-effect free.
use std::{io, process::Command};

use tracing::info;

#[cfg_attr(target_os = "macos", link(name = "ApplicationServices", kind = "framework"))]
unsafe extern "C" {
    fn AXIsProcessTrusted() -> bool;
    fn CGPreflightListenEventAccess() -> bool;
}

/// Check if the application has the Accessibility permission.
///
/// Required for posting synthetic key events (the paste injection path).
pub fn accessibility_ok() -> bool {
    unsafe { AXIsProcessTrusted() }
}

/// Check if the application has the "Input Monitoring" permission.
///
/// Returns `true` when the process is allowed to listen for keyboard events
/// (CGEvent tap), and `false` otherwise.
pub fn input_monitoring_ok() -> bool {
    unsafe { CGPreflightListenEventAccess() }
}

/// Current permission status for the process.
#[derive(Debug, Clone, Copy)]
pub struct PermissionsStatus {
    /// Accessibility (AX) permission; `true` if granted.
    pub accessibility_ok: bool,
    /// Input Monitoring permission; `true` if granted.
    pub input_ok: bool,
}

impl PermissionsStatus {
    /// True when every permission the pipeline needs is granted.
    pub fn fully_authorized(&self) -> bool {
        self.accessibility_ok && self.input_ok
    }
}

/// Query both Accessibility and Input Monitoring permissions.
///
/// Convenience wrapper over [`accessibility_ok`] and [`input_monitoring_ok`];
/// performs no prompting and has no side effects.
pub fn check_permissions() -> PermissionsStatus {
    PermissionsStatus {
        accessibility_ok: accessibility_ok(),
        input_ok: input_monitoring_ok(),
    }
}

/// Open System Settings directly to the Accessibility privacy pane.
pub fn open_accessibility_settings() -> io::Result<()> {
    info!("opening_accessibility_settings");
    Command::new("open")
        .arg("x-apple.systempreferences:com.apple.preference.security?Privacy_Accessibility")
        .spawn()
        .map(|_| ())
}
