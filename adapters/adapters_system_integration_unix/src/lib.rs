//! Adapters Layer: Unix System Integration
//!
//! Provides the Unix implementation of the native wait services used by the
//! select emulation: descriptors are their own waitable objects, kinds come
//! from `fstat(2)` and waits are carried out with `poll(2)`.
//! Depends on Entities and Use Cases layers.

#[cfg(unix)]
pub mod wait_objects;

#[cfg(unix)]
pub use wait_objects::{UnixHandle, UnixWaitPlatform};

#[cfg(not(unix))]
/// Unix-specific functionality is only available on Unix systems
pub fn unix_only() {
    // Placeholder for non-Unix platforms
}
