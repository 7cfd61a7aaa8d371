//! Error Module
//!
//! Provides the two error classes of the select emulation: contract violations
//! (caller or environment misuse) and recoverable native failures.

use crate::config::ViolationPolicy;
use entities_io_multiplexing::{NativeError, ObjectKind, Role, TimeVal};
use log::error;

/// Caller or environment misuse that makes readiness reporting meaningless
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractViolation {
    /// `nfds` exceeds the number of descriptor slots the wait can track
    DescriptorRange {
        /// Requested descriptor count
        nfds: usize,
        /// Configured capacity
        capacity: usize,
    },
    /// More distinct objects than the native wait accepts
    TooManyObjects {
        /// Objects needed so far
        count: usize,
        /// Configured capacity
        capacity: usize,
    },
    /// A descriptor in a set does not resolve to a valid object
    InvalidHandle {
        /// Descriptor index
        fd: usize,
        /// Set the descriptor came from
        role: Role,
        /// Error reported by the resolver
        error: NativeError,
    },
    /// A descriptor resolved to an object kind that cannot be waited on
    UnsupportedKind {
        /// Descriptor index
        fd: usize,
        /// Set the descriptor came from
        role: Role,
        /// Kind reported by the platform
        kind: ObjectKind,
    },
    /// Timeout with negative seconds or microseconds
    NegativeTimeout(TimeVal),
    /// The multi-object wait reported an index outside the list it was given
    SignalOutOfRange {
        /// Reported index
        index: usize,
        /// Length of the list
        count: usize,
    },
}

impl std::fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractViolation::DescriptorRange { nfds, capacity } => {
                write!(f, "nfds {} exceeds wait capacity {}", nfds, capacity)
            }
            ContractViolation::TooManyObjects { count, capacity } => {
                write!(f, "{} wait objects exceed capacity {}", count, capacity)
            }
            ContractViolation::InvalidHandle { fd, role, error } => {
                write!(f, "descriptor {} ({} set) has no valid handle: {}", fd, role, error)
            }
            ContractViolation::UnsupportedKind { fd, role, kind } => {
                write!(f, "descriptor {} ({} set) is of unsupported kind {:?}", fd, role, kind)
            }
            ContractViolation::NegativeTimeout(tv) => {
                write!(f, "negative timeout ({}s, {}us)", tv.tv_sec, tv.tv_usec)
            }
            ContractViolation::SignalOutOfRange { index, count } => {
                write!(f, "wait signaled index {} of a {}-object list", index, count)
            }
        }
    }
}

impl std::error::Error for ContractViolation {}

/// Select errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    /// Contract violation reported under `ViolationPolicy::Report`
    ContractViolation(ContractViolation),
    /// The multi-object wait failed
    WaitFailed(NativeError),
    /// The zero-timeout test of one descriptor failed after the wait signaled
    ProbeFailed {
        /// Descriptor index
        fd: usize,
        /// Set the descriptor came from
        role: Role,
        /// Error reported by the platform
        error: NativeError,
    },
}

impl std::fmt::Display for SelectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectError::ContractViolation(v) => write!(f, "contract violation: {}", v),
            SelectError::WaitFailed(e) => write!(f, "multi-object wait failed: {}", e),
            SelectError::ProbeFailed { fd, role, error } => {
                write!(f, "readiness test of descriptor {} ({} set) failed: {}", fd, role, error)
            }
        }
    }
}

impl std::error::Error for SelectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SelectError::ContractViolation(v) => Some(v),
            SelectError::WaitFailed(e) => Some(e),
            SelectError::ProbeFailed { error, .. } => Some(error),
        }
    }
}

impl From<ContractViolation> for SelectError {
    fn from(v: ContractViolation) -> Self {
        SelectError::ContractViolation(v)
    }
}

/// Apply the violation policy
///
/// Logs the violation, then panics under `ViolationPolicy::Abort` or hands
/// back the error to propagate under `ViolationPolicy::Report`.
pub(crate) fn raise(policy: ViolationPolicy, violation: ContractViolation) -> SelectError {
    error!("select contract violation: {}", violation);
    match policy {
        ViolationPolicy::Abort => panic!("select contract violation: {}", violation),
        ViolationPolicy::Report => SelectError::ContractViolation(violation),
    }
}
