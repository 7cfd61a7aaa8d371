//! Wait Objects Module (Windows-specific)
//!
//! Provides a [`WaitPlatform`] over Win32 kernel object handles.
//! Based on the Win32 `select()` emulation layer.

use entities_io_multiplexing::{NativeError, NativeTimeout, ObjectKind, WaitAny, WaitOne};
use log::warn;
use std::os::windows::io::RawHandle;
use usecases_io_multiplexing::WaitPlatform;
use windows_sys::Win32::Foundation::{
    GetLastError, HANDLE, INVALID_HANDLE_VALUE, WAIT_FAILED, WAIT_OBJECT_0, WAIT_TIMEOUT,
};
use windows_sys::Win32::Storage::FileSystem::{
    GetFileType, FILE_TYPE_CHAR, FILE_TYPE_DISK, FILE_TYPE_PIPE, FILE_TYPE_UNKNOWN,
};
use windows_sys::Win32::System::Threading::{Sleep, WaitForMultipleObjects, WaitForSingleObject};

/// `ERROR_INVALID_HANDLE`
const ERROR_INVALID_HANDLE: i32 = 6;

fn last_error() -> NativeError {
    NativeError::new(unsafe { GetLastError() } as i32)
}

/// Kernel object handle borrowed from the CRT descriptor table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Win32Handle(HANDLE);

impl Win32Handle {
    /// Wrap a raw handle
    ///
    /// The handle stays owned by the caller.
    pub fn from_raw(handle: RawHandle) -> Self {
        Self(handle as HANDLE)
    }

    /// Underlying handle value
    pub fn raw(&self) -> HANDLE {
        self.0
    }
}

/// Native wait services on Windows
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32WaitPlatform;

impl Win32WaitPlatform {
    /// Create the platform
    pub fn new() -> Self {
        Self
    }
}

impl WaitPlatform for Win32WaitPlatform {
    type Handle = Win32Handle;

    fn resolve(&self, fd: usize) -> Result<Win32Handle, NativeError> {
        let fd = libc::c_int::try_from(fd).map_err(|_| NativeError::new(ERROR_INVALID_HANDLE))?;
        let handle = unsafe { libc::get_osfhandle(fd) } as HANDLE;
        if handle == INVALID_HANDLE_VALUE {
            return Err(NativeError::new(ERROR_INVALID_HANDLE));
        }
        Ok(Win32Handle(handle))
    }

    fn classify(&self, handle: Win32Handle) -> Result<ObjectKind, NativeError> {
        match unsafe { GetFileType(handle.0) } {
            FILE_TYPE_DISK => Ok(ObjectKind::Disk),
            FILE_TYPE_CHAR => Ok(ObjectKind::Char),
            FILE_TYPE_PIPE => Ok(ObjectKind::Pipe),
            // FILE_TYPE_UNKNOWN doubles as the failure value; only GetLastError tells them apart
            FILE_TYPE_UNKNOWN => match last_error() {
                e if e.code != 0 => {
                    warn!("GetFileType failed: {}", e);
                    Err(e)
                }
                _ => Ok(ObjectKind::Other(FILE_TYPE_UNKNOWN)),
            },
            other => Ok(ObjectKind::Other(other)),
        }
    }

    fn wait_any(&self, handles: &[Win32Handle], timeout: NativeTimeout) -> WaitAny {
        let raw: Vec<HANDLE> = handles.iter().map(|h| h.0).collect();
        let rc = unsafe {
            WaitForMultipleObjects(raw.len() as u32, raw.as_ptr(), 0, timeout.as_millis())
        };
        match rc {
            WAIT_TIMEOUT => WaitAny::TimedOut,
            WAIT_FAILED => {
                let e = last_error();
                warn!("WaitForMultipleObjects failed: {}", e);
                WaitAny::Failed(e)
            }
            rc if rc >= WAIT_OBJECT_0 && ((rc - WAIT_OBJECT_0) as usize) < raw.len() => {
                WaitAny::Signaled((rc - WAIT_OBJECT_0) as usize)
            }
            // WAIT_ABANDONED_0 + n is only returned for mutexes, which never resolve from a descriptor
            rc => WaitAny::Failed(NativeError::new(rc as i32)),
        }
    }

    fn wait_one(&self, handle: Win32Handle) -> WaitOne {
        match unsafe { WaitForSingleObject(handle.0, 0) } {
            WAIT_OBJECT_0 => WaitOne::Signaled,
            WAIT_TIMEOUT => WaitOne::TimedOut,
            WAIT_FAILED => WaitOne::Failed(last_error()),
            rc => WaitOne::Failed(NativeError::new(rc as i32)),
        }
    }

    fn sleep(&self, timeout: NativeTimeout) {
        unsafe { Sleep(timeout.as_millis()) }
    }
}
