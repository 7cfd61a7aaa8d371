//! Wait Objects Module (Unix-specific)
//!
//! Provides a [`WaitPlatform`] over raw file descriptors.
//!
//! An object is *signaled* when `poll(2)` reports that it can make progress
//! in its own direction: input available on a read end, buffer space on a
//! write end, or a hang-up/error condition. Regular files are always
//! signaled, matching the behaviour of disk file handles in a native
//! multi-object wait.

use entities_io_multiplexing::{NativeError, NativeTimeout, ObjectKind, WaitAny, WaitOne};
use log::{trace, warn};
use nix::errno::Errno;
use nix::sys::stat::{fstat, SFlag};
use std::os::unix::io::RawFd;
use std::time::{Duration, Instant};
use usecases_io_multiplexing::WaitPlatform;

const INTEREST: libc::c_short = libc::POLLIN | libc::POLLOUT;
const SIGNALED: libc::c_short = libc::POLLIN | libc::POLLOUT | libc::POLLHUP | libc::POLLERR;

fn native(errno: Errno) -> NativeError {
    NativeError::new(errno as i32)
}

/// Map the `S_IFMT` bits of a mode to an object kind
fn kind_from_mode(mode: libc::mode_t) -> ObjectKind {
    let format = SFlag::from_bits_truncate(mode & SFlag::S_IFMT.bits());
    if format == SFlag::S_IFREG {
        ObjectKind::Disk
    } else if format == SFlag::S_IFCHR {
        ObjectKind::Char
    } else if format == SFlag::S_IFIFO {
        ObjectKind::Pipe
    } else {
        ObjectKind::Other(format.bits() as u32)
    }
}

/// Remaining time in `poll(2)` units, rounded up so the wait never ends early
fn poll_millis(deadline: Option<Instant>) -> libc::c_int {
    match deadline {
        None => -1,
        Some(deadline) => {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let millis = remaining.as_micros().div_ceil(1000);
            millis.min(libc::c_int::MAX as u128) as libc::c_int
        }
    }
}

/// `poll(2)` with `EINTR` retried against the initial deadline
fn poll_fds(fds: &mut [libc::pollfd], timeout: NativeTimeout) -> Result<usize, NativeError> {
    let deadline = timeout.as_duration().map(|d| Instant::now() + d);
    loop {
        let rc = unsafe {
            libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, poll_millis(deadline))
        };
        if rc >= 0 {
            return Ok(rc as usize);
        }
        match Errno::last() {
            Errno::EINTR => trace!("poll interrupted, retrying"),
            errno => return Err(native(errno)),
        }
    }
}

fn pollfd(handle: UnixHandle) -> libc::pollfd {
    libc::pollfd {
        fd: handle.0,
        events: INTEREST,
        revents: 0,
    }
}

/// Raw descriptor used as a waitable object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnixHandle(RawFd);

impl UnixHandle {
    /// Underlying descriptor
    pub fn raw(&self) -> RawFd {
        self.0
    }
}

/// Native wait services on Unix
///
/// Descriptors are borrowed; nothing here opens or closes them.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnixWaitPlatform;

impl UnixWaitPlatform {
    /// Create the platform
    pub fn new() -> Self {
        Self
    }
}

impl WaitPlatform for UnixWaitPlatform {
    type Handle = UnixHandle;

    fn resolve(&self, fd: usize) -> Result<UnixHandle, NativeError> {
        let raw = RawFd::try_from(fd).map_err(|_| native(Errno::EBADF))?;
        fstat(raw).map_err(native)?;
        Ok(UnixHandle(raw))
    }

    fn classify(&self, handle: UnixHandle) -> Result<ObjectKind, NativeError> {
        match fstat(handle.0) {
            Ok(stat) => Ok(kind_from_mode(stat.st_mode)),
            Err(errno) => {
                warn!("fstat({}) failed: {}", handle.0, errno);
                Err(native(errno))
            }
        }
    }

    fn wait_any(&self, handles: &[UnixHandle], timeout: NativeTimeout) -> WaitAny {
        let mut fds: Vec<libc::pollfd> = handles.iter().copied().map(pollfd).collect();
        match poll_fds(&mut fds, timeout) {
            Ok(0) => WaitAny::TimedOut,
            Ok(_) => {
                if fds.iter().any(|p| p.revents & libc::POLLNVAL != 0) {
                    return WaitAny::Failed(native(Errno::EBADF));
                }
                fds.iter()
                    .position(|p| p.revents & SIGNALED != 0)
                    .map(WaitAny::Signaled)
                    .unwrap_or(WaitAny::TimedOut)
            }
            Err(e) => WaitAny::Failed(e),
        }
    }

    fn wait_one(&self, handle: UnixHandle) -> WaitOne {
        let mut fds = [pollfd(handle)];
        match poll_fds(&mut fds, NativeTimeout::Millis(0)) {
            Ok(0) => WaitOne::TimedOut,
            Ok(_) if fds[0].revents & libc::POLLNVAL != 0 => WaitOne::Failed(native(Errno::EBADF)),
            Ok(_) if fds[0].revents & SIGNALED != 0 => WaitOne::Signaled,
            Ok(_) => WaitOne::TimedOut,
            Err(e) => WaitOne::Failed(e),
        }
    }

    fn sleep(&self, timeout: NativeTimeout) {
        match timeout.as_duration() {
            Some(d) => std::thread::sleep(d),
            None => loop {
                std::thread::sleep(Duration::from_secs(u32::MAX as u64));
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_mode() {
        assert_eq!(kind_from_mode(libc::S_IFREG | 0o644), ObjectKind::Disk);
        assert_eq!(kind_from_mode(libc::S_IFCHR | 0o666), ObjectKind::Char);
        assert_eq!(kind_from_mode(libc::S_IFIFO | 0o600), ObjectKind::Pipe);
        assert_eq!(kind_from_mode(libc::S_IFSOCK | 0o777), ObjectKind::Other(libc::S_IFSOCK as u32));
        assert!(!kind_from_mode(libc::S_IFDIR | 0o755).is_supported());
    }

    #[test]
    fn test_poll_millis() {
        assert_eq!(poll_millis(None), -1);
        assert_eq!(poll_millis(Some(Instant::now())), 0);
        let ms = poll_millis(Some(Instant::now() + Duration::from_millis(100)));
        assert!(ms > 0 && ms <= 100);
    }

    #[test]
    fn test_classify_closed_descriptor_fails() {
        let err = UnixWaitPlatform::new().classify(UnixHandle(1_000_000)).unwrap_err();
        assert_eq!(err, NativeError::new(Errno::EBADF as i32));
    }

    #[test]
    fn test_resolve_rejects_closed_descriptor() {
        let platform = UnixWaitPlatform::new();
        let err = platform.resolve(1_000_000).unwrap_err();
        assert_eq!(err, NativeError::new(Errno::EBADF as i32));
    }
}
