//! Frameworks Layer: Windows System Integration
//!
//! Provides the Windows implementation of the native wait services used by
//! the select emulation. Descriptors are CRT file descriptors resolved with
//! `_get_osfhandle`; waits go through `WaitForMultipleObjects` and
//! `WaitForSingleObject`.
//! Depends on Entities and Use Cases layers.

#[cfg(windows)]
pub mod wait_objects;

#[cfg(windows)]
pub use wait_objects::{Win32Handle, Win32WaitPlatform};

#[cfg(not(windows))]
/// Windows-specific functionality is only available on Windows
pub fn windows_only() {
    // Placeholder for non-Windows platforms
}
