/*
 * %CopyrightBegin%
 *
 * SPDX-License-Identifier: Apache-2.0
 *
 * Copyright Lee Barney 2025. All Rights Reserved.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
 * %CopyrightEnd%
 */

//! Select Facades
//!
//! Provides the C entry points of the select emulation. They keep the calling
//! convention of the Win32 shim: descriptor sets are mutated in place, a
//! null pointer means "not provided", and the return value is the readiness
//! count or `-1` on error.
//!
//! ## Examples
//!
//! ```c
//! // C interface
//! w32_fd_set readfds;
//! W32_FD_ZERO(&readfds);
//! W32_FD_SET(fd, &readfds);
//! struct timeval tv = { 5, 0 };
//! int n = w32_select(fd + 1, &readfds, NULL, NULL, &tv);
//! ```
//!
//! ```rust
//! use api_facades::{w32_select, w32_fd_zero, DescriptorSet, W32TimeVal};
//!
//! // Nothing to wait on: a plain 1 ms sleep
//! let mut readfds = DescriptorSet::new();
//! unsafe { w32_fd_zero(&mut readfds) };
//! let tv = W32TimeVal { tv_sec: 0, tv_usec: 1_000 };
//! let n = unsafe { w32_select(0, &mut readfds, std::ptr::null_mut(), std::ptr::null_mut(), &tv) };
//! assert_eq!(n, 0);
//! ```
//!
//! ## See Also
//!
//! - [`usecases_io_multiplexing::Selector`]: The safe Rust interface

use log::error;
use std::ffi::{c_int, c_long};
use usecases_io_multiplexing::{SelectConfig, Selector};

pub use entities_io_multiplexing::{DescriptorSet, TimeVal, FD_SETSIZE, NFDBITS};

#[cfg(unix)]
pub use adapters_system_integration_unix::UnixWaitPlatform as NativePlatform;
#[cfg(windows)]
pub use frameworks_system_integration_win32::Win32WaitPlatform as NativePlatform;

/// C `struct timeval`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct W32TimeVal {
    /// Seconds
    pub tv_sec: c_long,
    /// Microseconds
    pub tv_usec: c_long,
}

impl From<W32TimeVal> for TimeVal {
    fn from(tv: W32TimeVal) -> Self {
        TimeVal::new(tv.tv_sec as i64, tv.tv_usec as i64)
    }
}

/// Selector over the native platform of the build target
///
/// Configuration is read from the environment on every call (see
/// [`SelectConfig::from_env`]).
pub fn native_selector() -> Selector<NativePlatform> {
    Selector::with_config(NativePlatform::default(), SelectConfig::from_env())
}

/// Wait for descriptors to become ready
///
/// Equivalent to C's `w32_select`. Scans descriptors `0..nfds` of each
/// provided set, blocks until one of them is ready or the timeout elapses,
/// and rewrites every provided set to hold only its ready descriptors.
///
/// # Arguments
///
/// * `nfds` - Number of descriptor slots to scan (at most 64)
/// * `readfds` / `writefds` / `exceptfds` - Sets to wait on; may be null
/// * `tv` - Timeout; null blocks indefinitely, zero polls
///
/// # Returns
///
/// The number of ready descriptors summed over all sets, `0` on timeout,
/// or `-1` on error (the error is logged).
///
/// # Safety
///
/// Every non-null pointer must be valid for the duration of the call; the
/// set pointers must point to C `fd_set` storage (`unsigned long` words) and
/// must not alias each other. With `SELECT_ON_VIOLATION=abort`
/// a contract violation panics, which aborts the process at this boundary.
#[no_mangle]
pub unsafe extern "C" fn w32_select(
    nfds: c_int,
    readfds: *mut DescriptorSet,
    writefds: *mut DescriptorSet,
    exceptfds: *mut DescriptorSet,
    tv: *const W32TimeVal,
) -> c_int {
    let Ok(nfds) = usize::try_from(nfds) else {
        error!("w32_select: negative nfds {}", nfds);
        return -1;
    };
    let timeout = tv.as_ref().map(|tv| TimeVal::from(*tv));

    match native_selector().select(
        nfds,
        readfds.as_mut(),
        writefds.as_mut(),
        exceptfds.as_mut(),
        timeout.as_ref(),
    ) {
        Ok(count) => c_int::try_from(count).unwrap_or(c_int::MAX),
        Err(e) => {
            error!("w32_select: {}", e);
            -1
        }
    }
}

/// Add descriptor `fd` to `set`
///
/// Equivalent to C's `W32_FD_SET`. Out-of-range descriptors are ignored.
///
/// # Safety
///
/// `set` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn w32_fd_set(fd: c_int, set: *mut DescriptorSet) {
    if let (Some(fd), Some(set)) = (in_range(fd), set.as_mut()) {
        set.set(fd);
    }
}

/// Remove descriptor `fd` from `set`
///
/// Equivalent to C's `W32_FD_CLR`. Out-of-range descriptors are ignored.
///
/// # Safety
///
/// `set` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn w32_fd_clr(fd: c_int, set: *mut DescriptorSet) {
    if let (Some(fd), Some(set)) = (in_range(fd), set.as_mut()) {
        set.clear(fd);
    }
}

/// Test descriptor `fd` in `set`
///
/// Equivalent to C's `W32_FD_ISSET`; returns 1 if set, 0 otherwise.
///
/// # Safety
///
/// `set` must be null or valid for reads.
#[no_mangle]
pub unsafe extern "C" fn w32_fd_isset(fd: c_int, set: *const DescriptorSet) -> c_int {
    match (in_range(fd), set.as_ref()) {
        (Some(fd), Some(set)) => set.is_set(fd) as c_int,
        _ => 0,
    }
}

/// Clear `set`
///
/// Equivalent to C's `W32_FD_ZERO`.
///
/// # Safety
///
/// `set` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn w32_fd_zero(set: *mut DescriptorSet) {
    if let Some(set) = set.as_mut() {
        set.zero();
    }
}

/// Copy `from` into `to`
///
/// Equivalent to C's `W32_FD_COPY`.
///
/// # Safety
///
/// Both pointers must be null or valid; `to` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn w32_fd_copy(from: *const DescriptorSet, to: *mut DescriptorSet) {
    if let (Some(from), Some(to)) = (from.as_ref(), to.as_mut()) {
        to.copy_from(from);
    }
}

fn in_range(fd: c_int) -> Option<usize> {
    usize::try_from(fd).ok().filter(|&fd| fd < FD_SETSIZE)
}
