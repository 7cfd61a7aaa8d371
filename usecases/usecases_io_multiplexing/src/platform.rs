//! Wait Platform Module
//!
//! Defines the native services the select emulation is built on.

use entities_io_multiplexing::{NativeError, NativeTimeout, ObjectKind, WaitAny, WaitOne};

/// Native primitives consumed by the select emulation
///
/// Handles are borrowed from the platform for the duration of one call;
/// the emulation never closes them.
#[cfg_attr(test, mockall::automock(type Handle = u32;))]
pub trait WaitPlatform {
    /// Native waitable object
    type Handle: Copy + Eq + std::fmt::Debug;

    /// Resolve a descriptor index to its waitable object
    ///
    /// # Errors
    ///
    /// Returns the native error if the descriptor is not open.
    fn resolve(&self, fd: usize) -> Result<Self::Handle, NativeError>;

    /// Report the kind of object behind a handle
    ///
    /// # Errors
    ///
    /// Returns the native error if the handle can no longer be queried
    /// (for example, the descriptor was closed after it was resolved).
    fn classify(&self, handle: Self::Handle) -> Result<ObjectKind, NativeError>;

    /// Block until any handle in `handles` signals or `timeout` elapses
    fn wait_any(&self, handles: &[Self::Handle], timeout: NativeTimeout) -> WaitAny;

    /// Test a single handle without blocking
    fn wait_one(&self, handle: Self::Handle) -> WaitOne;

    /// Sleep for `timeout`; never returns when it is infinite
    fn sleep(&self, timeout: NativeTimeout);
}

impl<P: WaitPlatform + ?Sized> WaitPlatform for &P {
    type Handle = P::Handle;

    fn resolve(&self, fd: usize) -> Result<Self::Handle, NativeError> {
        (**self).resolve(fd)
    }

    fn classify(&self, handle: Self::Handle) -> Result<ObjectKind, NativeError> {
        (**self).classify(handle)
    }

    fn wait_any(&self, handles: &[Self::Handle], timeout: NativeTimeout) -> WaitAny {
        (**self).wait_any(handles, timeout)
    }

    fn wait_one(&self, handle: Self::Handle) -> WaitOne {
        (**self).wait_one(handle)
    }

    fn sleep(&self, timeout: NativeTimeout) {
        (**self).sleep(timeout)
    }
}
