//! Entities Layer: I/O Multiplexing
//!
//! Provides the plain data types shared by every layer of the `select()`
//! emulation: descriptor sets, timeouts, waitable-object kinds and the
//! outcomes reported by a native multi-object wait.
//!
//! ## Overview
//!
//! The `entities_io_multiplexing` crate is part of the entities layer in the CLEAN
//! architecture implementation. It has no dependencies and performs no I/O; the
//! use cases layer (`usecases_io_multiplexing`) builds the translation algorithm
//! on top of these types and the adapters/frameworks layers supply native back ends.
//!
//! ## Modules
//!
//! - **[`fd_set`](fd_set/index.html)**: Fixed-capacity descriptor bitmask (`fd_set` equivalent)
//! - **[`timeout`](timeout/index.html)**: `timeval`-style timeouts and their native millisecond form
//! - **[`wait_object`](wait_object/index.html)**: Object kinds, descriptor roles and wait outcomes
//!
//! ## Usage
//!
//! ```rust
//! use entities_io_multiplexing::{DescriptorSet, TimeVal, Timeout, TimeoutRounding, NativeTimeout};
//!
//! let mut read = DescriptorSet::new();
//! read.set(1);
//! read.set(2);
//! assert_eq!(read.count(), 2);
//!
//! let timeout = Timeout::After(TimeVal::new(0, 100_000));
//! assert_eq!(timeout.to_native(TimeoutRounding::Truncate), Ok(NativeTimeout::Millis(100)));
//! ```

pub mod fd_set;
pub mod timeout;
pub mod wait_object;

pub use fd_set::{DescriptorSet, FD_SETSIZE, NFDBITS};
pub use timeout::{NativeTimeout, TimeVal, Timeout, TimeoutError, TimeoutRounding};
pub use wait_object::{NativeError, ObjectKind, Role, WaitAny, WaitOne, MAXIMUM_WAIT_OBJECTS};
