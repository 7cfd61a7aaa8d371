//! Wait Object Module
//!
//! Provides the vocabulary used to talk about native waitable objects:
//! what kind of object a descriptor resolved to, which role a descriptor
//! plays in a select call, and what a native wait reported.

/// Native multi-object wait capacity (`MAXIMUM_WAIT_OBJECTS`)
pub const MAXIMUM_WAIT_OBJECTS: usize = 64;

/// Kind of object a descriptor resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Seekable disk file
    Disk,
    /// Character device or console
    Char,
    /// Pipe or FIFO endpoint
    Pipe,
    /// Anything else; carries the raw native type code
    Other(u32),
}

impl ObjectKind {
    /// Whether the select emulation can wait on this kind
    pub fn is_supported(&self) -> bool {
        !matches!(self, ObjectKind::Other(_))
    }
}

/// Role a descriptor set plays in a select call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// `readfds`
    Read,
    /// `writefds`
    Write,
    /// `exceptfds`
    Except,
}

impl Role {
    /// All roles in processing order
    pub const ALL: [Role; 3] = [Role::Read, Role::Write, Role::Except];

    /// Position of the role in [`Role::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Role::Read => 0,
            Role::Write => 1,
            Role::Except => 2,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Read => write!(f, "read"),
            Role::Write => write!(f, "write"),
            Role::Except => write!(f, "except"),
        }
    }
}

/// Error reported by a native primitive (`GetLastError` / `errno` value)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeError {
    /// Raw platform error code
    pub code: i32,
}

impl NativeError {
    /// Wrap a raw platform error code
    pub const fn new(code: i32) -> Self {
        Self { code }
    }
}

impl std::fmt::Display for NativeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "native error code {}", self.code)
    }
}

impl std::error::Error for NativeError {}

/// Outcome of waiting on a list of objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitAny {
    /// The object at this index of the list signaled
    Signaled(usize),
    /// Nothing signaled before the timeout
    TimedOut,
    /// The wait itself failed
    Failed(NativeError),
}

/// Outcome of testing a single object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOne {
    /// The object is signaled
    Signaled,
    /// The object is not signaled
    TimedOut,
    /// The test failed
    Failed(NativeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_kinds() {
        assert!(ObjectKind::Disk.is_supported());
        assert!(ObjectKind::Char.is_supported());
        assert!(ObjectKind::Pipe.is_supported());
        assert!(!ObjectKind::Other(0).is_supported());
    }

    #[test]
    fn test_role_order() {
        assert_eq!(Role::ALL, [Role::Read, Role::Write, Role::Except]);
        for (i, role) in Role::ALL.iter().enumerate() {
            assert_eq!(role.index(), i);
        }
        assert_eq!(Role::Except.to_string(), "except");
    }

    #[test]
    fn test_native_error_display() {
        assert_eq!(NativeError::new(6).to_string(), "native error code 6");
    }
}
