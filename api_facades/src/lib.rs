//! API Facades Layer
//!
//! Provides the `select()` emulation to C callers with the exact signatures of
//! the Win32 select shim (`w32_select` and the `W32_FD_*` helpers).
//!
//! All facades call underlying Rust modules from inner layers: the use cases
//! layer runs the algorithm and the native back end of the build target
//! (Unix `poll(2)` or Win32 `WaitForMultipleObjects`) supplies the waits.

pub mod select_facades;

// Re-export main facade types
pub use select_facades::*;
