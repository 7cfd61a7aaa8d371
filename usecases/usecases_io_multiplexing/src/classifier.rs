//! Outcome Classifier Module
//!
//! Recovers per-descriptor readiness after the multi-object wait signaled.
//! The wait only says that *some* object is ready; every mapped object is
//! therefore re-tested with a zero timeout, once per role it appears in.

use crate::error::SelectError;
use crate::platform::WaitPlatform;
use crate::translator::RoleMapping;
use entities_io_multiplexing::{DescriptorSet, Role, WaitOne};
use log::{error, trace};

/// Ready subset of each role and the total readiness count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadySets {
    /// Descriptors ready for reading
    pub read: DescriptorSet,
    /// Descriptors ready for writing
    pub write: DescriptorSet,
    /// Descriptors with an exceptional condition
    pub except: DescriptorSet,
    /// Ready descriptors summed over all roles
    pub count: usize,
}

impl ReadySets {
    /// No descriptor ready in any role
    pub fn empty() -> Self {
        Self::default()
    }

    /// Ready set of `role`
    pub fn get(&self, role: Role) -> &DescriptorSet {
        match role {
            Role::Read => &self.read,
            Role::Write => &self.write,
            Role::Except => &self.except,
        }
    }

    fn get_mut(&mut self, role: Role) -> &mut DescriptorSet {
        match role {
            Role::Read => &mut self.read,
            Role::Write => &mut self.write,
            Role::Except => &mut self.except,
        }
    }
}

/// Test every mapped descriptor and collect the ready ones
///
/// A descriptor mapped in two roles contributes once per role to the count.
///
/// # Errors
///
/// Returns `SelectError::ProbeFailed` for the first zero-timeout test that fails.
pub fn classify_outcome<P: WaitPlatform>(
    platform: &P,
    mapping: &RoleMapping<P::Handle>,
) -> Result<ReadySets, SelectError> {
    let mut ready = ReadySets::empty();

    for role in Role::ALL {
        for (fd, handle) in mapping.mapped(role) {
            match platform.wait_one(handle) {
                WaitOne::Signaled => {
                    trace!("select: {} descriptor {} ready", role, fd);
                    ready.get_mut(role).set(fd);
                    ready.count += 1;
                }
                WaitOne::TimedOut => trace!("select: {} descriptor {} not ready", role, fd),
                WaitOne::Failed(e) => {
                    error!("select: readiness test of {} descriptor {} failed: {}", role, fd, e);
                    return Err(SelectError::ProbeFailed { fd, role, error: e });
                }
            }
        }
    }

    Ok(ready)
}
