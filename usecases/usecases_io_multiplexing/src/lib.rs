//! Use Cases Layer: I/O Multiplexing
//!
//! Emulates the descriptor-set `select()` primitive on a platform whose native
//! concurrency primitive is a bounded multi-object wait.
//!
//! ## Overview
//!
//! A call runs three phases in order:
//!
//! 1. **[`translator`](translator/index.html)**: descriptor sets are resolved into a
//!    deduplicated list of native waitable objects plus a per-role mapping.
//! 2. **[`waiter`](waiter/index.html)**: the calling thread blocks on the list until an
//!    object signals or the timeout elapses (a plain sleep when the list is empty).
//! 3. **[`classifier`](classifier/index.html)**: every mapped object is re-tested with a
//!    zero timeout so that readiness is reported per descriptor and per role.
//!
//! The native primitives are reached through the [`WaitPlatform`] trait; the
//! adapters and frameworks layers provide Unix and Windows implementations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use usecases_io_multiplexing::{Selector, SelectConfig};
//! use entities_io_multiplexing::{DescriptorSet, TimeVal};
//!
//! let selector = Selector::with_config(platform, SelectConfig::from_env());
//! let mut readfds: DescriptorSet = [1, 2].into_iter().collect();
//! let ready = selector.select(3, Some(&mut readfds), None, None, Some(&TimeVal::new(5, 0)))?;
//! ```
//!
//! ## See Also
//!
//! - [`entities_io_multiplexing`](../entities_io_multiplexing/index.html): Descriptor sets and timeouts

pub mod classifier;
pub mod config;
pub mod error;
pub mod platform;
pub mod selector;
pub mod translator;
pub mod waiter;

pub use classifier::{classify_outcome, ReadySets};
pub use config::{SelectConfig, ViolationPolicy};
pub use error::{ContractViolation, SelectError};
pub use platform::WaitPlatform;
pub use selector::Selector;
pub use translator::{translate_sets, RoleMapping, RoleSets, Translation};
pub use waiter::{wait_for_any, WaitVerdict};
