//! Multiplex Waiter Module
//!
//! Blocks the calling thread on the translated object list.

use crate::config::SelectConfig;
use crate::error::{raise, ContractViolation, SelectError};
use crate::platform::WaitPlatform;
use entities_io_multiplexing::{NativeTimeout, WaitAny};
use log::{debug, error, warn};

/// Outcome of the wait phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitVerdict {
    /// There was nothing to wait on; the timeout was slept away
    Idle,
    /// The object at this list index signaled
    Signaled(usize),
    /// Nothing signaled before the timeout
    TimedOut,
}

/// Wait until any object in `handles` signals
///
/// With an empty list this is a plain sleep of `timeout`, which never
/// returns when the timeout is infinite.
///
/// # Errors
///
/// Returns `SelectError::WaitFailed` when the native wait fails, and a
/// contract violation when it reports an index outside `handles`.
pub fn wait_for_any<P: WaitPlatform>(
    platform: &P,
    config: &SelectConfig,
    handles: &[P::Handle],
    timeout: NativeTimeout,
) -> Result<WaitVerdict, SelectError> {
    if handles.is_empty() {
        if timeout == NativeTimeout::Infinite {
            warn!("select: no descriptors and no timeout, sleeping forever");
        }
        platform.sleep(timeout);
        return Ok(WaitVerdict::Idle);
    }

    match platform.wait_any(handles, timeout) {
        WaitAny::Signaled(index) if index < handles.len() => {
            debug!("select: object {} of {} signaled", index, handles.len());
            Ok(WaitVerdict::Signaled(index))
        }
        WaitAny::Signaled(index) => Err(raise(
            config.violation_policy,
            ContractViolation::SignalOutOfRange { index, count: handles.len() },
        )),
        WaitAny::TimedOut => {
            debug!("select: timed out after {:?} on {} objects", timeout, handles.len());
            Ok(WaitVerdict::TimedOut)
        }
        WaitAny::Failed(e) => {
            error!("select: multi-object wait failed: {}", e);
            Err(SelectError::WaitFailed(e))
        }
    }
}
