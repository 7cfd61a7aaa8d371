//! Selector Module
//!
//! Runs the three phases of a select call against a [`WaitPlatform`].

use crate::classifier::{classify_outcome, ReadySets};
use crate::config::SelectConfig;
use crate::error::{raise, ContractViolation, SelectError};
use crate::platform::WaitPlatform;
use crate::translator::translate_sets;
use crate::waiter::{wait_for_any, WaitVerdict};
use entities_io_multiplexing::{DescriptorSet, Role, TimeVal, Timeout, TimeoutError};
use log::trace;

/// `select()` emulation over a native multi-object wait
///
/// Holds no per-call state; every call resolves its descriptors afresh.
#[derive(Debug, Clone)]
pub struct Selector<P> {
    platform: P,
    config: SelectConfig,
}

impl<P: WaitPlatform> Selector<P> {
    /// Create a selector with the default configuration
    pub fn new(platform: P) -> Self {
        Self::with_config(platform, SelectConfig::default())
    }

    /// Create a selector with an explicit configuration
    pub fn with_config(platform: P, config: SelectConfig) -> Self {
        Self { platform, config }
    }

    /// Native platform in use
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Configuration in use
    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    /// Wait until descriptors become ready and report which ones
    ///
    /// The input sets are not modified. On timeout (or when there was nothing
    /// to wait on) the returned sets are empty and the count is 0.
    ///
    /// # Arguments
    ///
    /// * `nfds` - Number of descriptor slots to scan, starting at 0
    /// * `read` / `write` / `except` - Interest sets; `None` if not provided
    /// * `timeout` - How long to wait; a zero duration polls
    ///
    /// # Errors
    ///
    /// Returns a contract violation for misuse (see [`ContractViolation`]),
    /// `SelectError::WaitFailed` or `SelectError::ProbeFailed` for native failures.
    pub fn wait_ready(
        &self,
        nfds: usize,
        read: Option<&DescriptorSet>,
        write: Option<&DescriptorSet>,
        except: Option<&DescriptorSet>,
        timeout: Timeout,
    ) -> Result<ReadySets, SelectError> {
        let native = timeout
            .to_native(self.config.timeout_rounding)
            .map_err(|TimeoutError::Negative(tv)| {
                raise(self.config.violation_policy, ContractViolation::NegativeTimeout(tv))
            })?;

        let translation = translate_sets(&self.platform, &self.config, nfds, [read, write, except])?;
        trace!(
            "select: nfds={} objects={} timeout={:?}",
            nfds,
            translation.handles.len(),
            native
        );

        match wait_for_any(&self.platform, &self.config, &translation.handles, native)? {
            WaitVerdict::Idle | WaitVerdict::TimedOut => Ok(ReadySets::empty()),
            WaitVerdict::Signaled(_) => classify_outcome(&self.platform, &translation.mapping),
        }
    }

    /// In-place variant with the classic `select()` calling convention
    ///
    /// On success each provided set is overwritten with its ready subset and
    /// the total readiness count is returned. A `None` timeout blocks
    /// indefinitely. On error the sets are left untouched.
    ///
    /// # Errors
    ///
    /// Same as [`Selector::wait_ready`].
    pub fn select(
        &self,
        nfds: usize,
        mut read: Option<&mut DescriptorSet>,
        mut write: Option<&mut DescriptorSet>,
        mut except: Option<&mut DescriptorSet>,
        timeout: Option<&TimeVal>,
    ) -> Result<usize, SelectError> {
        let ready = self.wait_ready(
            nfds,
            read.as_deref(),
            write.as_deref(),
            except.as_deref(),
            Timeout::from_timeval(timeout),
        )?;

        for (role, set) in [
            (Role::Read, read.as_deref_mut()),
            (Role::Write, write.as_deref_mut()),
            (Role::Except, except.as_deref_mut()),
        ] {
            if let Some(set) = set {
                set.copy_from(ready.get(role));
            }
        }

        Ok(ready.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViolationPolicy;
    use crate::platform::MockWaitPlatform;
    use entities_io_multiplexing::{NativeError, NativeTimeout, ObjectKind, WaitAny, WaitOne};

    fn pipe_platform() -> MockWaitPlatform {
        let mut platform = MockWaitPlatform::new();
        platform.expect_resolve().returning(|fd| Ok(fd as u32));
        platform.expect_classify().returning(|_| Ok(ObjectKind::Pipe));
        platform
    }

    #[test]
    fn test_select_keeps_only_ready_bits() {
        let mut platform = pipe_platform();
        platform
            .expect_wait_any()
            .withf(|_, timeout| *timeout == NativeTimeout::Millis(5000))
            .returning(|_, _| WaitAny::Signaled(0));
        platform
            .expect_wait_one()
            .returning(|h| if h == 1 { WaitOne::Signaled } else { WaitOne::TimedOut });

        let selector = Selector::new(platform);
        let mut read: DescriptorSet = [1, 2].into_iter().collect();
        let count = selector
            .select(3, Some(&mut read), None, None, Some(&TimeVal::new(5, 0)))
            .unwrap();

        assert_eq!(count, 1);
        assert!(read.is_set(1));
        assert!(!read.is_set(2));
    }

    #[test]
    fn test_timeout_clears_all_sets() {
        let mut platform = pipe_platform();
        platform.expect_wait_any().returning(|_, _| WaitAny::TimedOut);
        platform.expect_wait_one().never();

        let selector = Selector::new(platform);
        let mut read: DescriptorSet = [1].into_iter().collect();
        let mut write: DescriptorSet = [2].into_iter().collect();
        let mut except: DescriptorSet = [1, 2].into_iter().collect();
        let count = selector
            .select(
                3,
                Some(&mut read),
                Some(&mut write),
                Some(&mut except),
                Some(&TimeVal::new(0, 100_000)),
            )
            .unwrap();

        assert_eq!(count, 0);
        assert!(read.is_empty());
        assert!(write.is_empty());
        assert!(except.is_empty());
    }

    #[test]
    fn test_no_descriptors_sleeps() {
        let mut platform = MockWaitPlatform::new();
        platform
            .expect_sleep()
            .withf(|t| *t == NativeTimeout::Millis(30))
            .times(1)
            .return_const(());
        platform.expect_wait_any().never();

        let selector = Selector::new(platform);
        let count = selector.select(0, None, None, None, Some(&TimeVal::new(0, 30_000))).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_wait_failure_leaves_sets_untouched() {
        let mut platform = pipe_platform();
        platform
            .expect_wait_any()
            .returning(|_, _| WaitAny::Failed(NativeError::new(6)));

        let selector = Selector::new(platform);
        let mut read: DescriptorSet = [1, 2].into_iter().collect();
        let before = read.clone();
        let err = selector
            .select(3, Some(&mut read), None, None, None)
            .unwrap_err();
        assert_eq!(err, SelectError::WaitFailed(NativeError::new(6)));
        assert_eq!(read, before);
    }

    #[test]
    fn test_negative_timeout() {
        let platform = MockWaitPlatform::new();
        let selector = Selector::new(platform);
        let tv = TimeVal::new(0, -1);
        let err = selector.select(0, None, None, None, Some(&tv)).unwrap_err();
        assert_eq!(err, SelectError::ContractViolation(ContractViolation::NegativeTimeout(tv)));
    }

    #[test]
    fn test_ceil_rounding_config() {
        let mut platform = pipe_platform();
        platform
            .expect_wait_any()
            .withf(|_, timeout| *timeout == NativeTimeout::Millis(2))
            .returning(|_, _| WaitAny::TimedOut);

        let config = SelectConfig::default().with_timeout_rounding(
            entities_io_multiplexing::TimeoutRounding::Ceil,
        );
        let selector = Selector::with_config(platform, config);
        let read: DescriptorSet = [0].into_iter().collect();
        let ready = selector
            .wait_ready(1, Some(&read), None, None, Timeout::After(TimeVal::new(0, 1_500)))
            .unwrap();
        assert_eq!(ready, ReadySets::empty());
    }

    #[test]
    #[should_panic(expected = "has no valid handle")]
    fn test_abort_policy_panics() {
        let mut platform = MockWaitPlatform::new();
        platform.expect_resolve().returning(|_| Err(NativeError::new(6)));
        let config = SelectConfig::default().with_violation_policy(ViolationPolicy::Abort);
        let selector = Selector::with_config(platform, config);
        let read: DescriptorSet = [0].into_iter().collect();
        let _ = selector.wait_ready(1, Some(&read), None, None, Timeout::poll());
    }
}
