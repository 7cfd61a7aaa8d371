//! Set Translator Module
//!
//! Converts the read/write/except descriptor sets of a select call into the
//! list of native objects to wait on, remembering per role which descriptor
//! maps to which object.

use crate::config::SelectConfig;
use crate::error::{raise, ContractViolation, SelectError};
use crate::platform::WaitPlatform;
use entities_io_multiplexing::{DescriptorSet, Role};
use log::trace;

/// Input sets indexed by [`Role::index`]; `None` means the caller passed no set
pub type RoleSets<'a> = [Option<&'a DescriptorSet>; 3];

/// Per-role descriptor to handle mapping
///
/// A descriptor may appear in several roles at once; each role keeps its
/// own slot so readiness is attributed to every role independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMapping<H> {
    slots: [Vec<Option<H>>; 3],
}

impl<H: Copy> RoleMapping<H> {
    /// Create a mapping with `nfds` absent slots per role
    pub fn new(nfds: usize) -> Self {
        Self {
            slots: [vec![None; nfds], vec![None; nfds], vec![None; nfds]],
        }
    }

    /// Number of descriptor slots per role
    pub fn nfds(&self) -> usize {
        self.slots[0].len()
    }

    /// Handle recorded for `fd` in `role`
    pub fn get(&self, role: Role, fd: usize) -> Option<H> {
        self.slots[role.index()].get(fd).copied().flatten()
    }

    fn insert(&mut self, role: Role, fd: usize, handle: H) {
        self.slots[role.index()][fd] = Some(handle);
    }

    /// Iterate over `(fd, handle)` pairs recorded for `role`
    pub fn mapped(&self, role: Role) -> impl Iterator<Item = (usize, H)> + '_ {
        self.slots[role.index()]
            .iter()
            .enumerate()
            .filter_map(|(fd, slot)| slot.map(|h| (fd, h)))
    }

    /// Total number of recorded slots across all roles
    pub fn len(&self) -> usize {
        Role::ALL.iter().map(|&role| self.mapped(role).count()).sum()
    }

    /// Whether no slot is recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of the translation phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation<H> {
    /// Deduplicated objects in insertion order (read, write, except)
    pub handles: Vec<H>,
    /// Per-role descriptor to object mapping
    pub mapping: RoleMapping<H>,
}

/// Translate descriptor sets into a wait list
///
/// Scans descriptors `0..nfds` of every provided set, resolving and
/// validating each member. An object already in the list (same descriptor
/// in several roles, or aliased descriptors) is listed once.
///
/// # Arguments
///
/// * `platform` - Native services used to resolve and classify descriptors
/// * `config` - Capacity and violation policy
/// * `nfds` - Number of descriptor slots to scan
/// * `sets` - Input sets by role; they are only read
///
/// # Errors
///
/// Returns `SelectError::ContractViolation` (or panics, per policy) when
/// `nfds` or the object count exceeds the capacity, a descriptor does not
/// resolve, or it resolves to an unsupported object kind.
pub fn translate_sets<P: WaitPlatform>(
    platform: &P,
    config: &SelectConfig,
    nfds: usize,
    sets: RoleSets<'_>,
) -> Result<Translation<P::Handle>, SelectError> {
    if nfds > config.capacity {
        return Err(raise(
            config.violation_policy,
            ContractViolation::DescriptorRange { nfds, capacity: config.capacity },
        ));
    }

    let mut handles: Vec<P::Handle> = Vec::with_capacity(config.capacity);
    let mut mapping = RoleMapping::new(nfds);

    for role in Role::ALL {
        let Some(set) = sets[role.index()] else {
            continue;
        };
        for fd in (0..nfds).filter(|&fd| set.is_set(fd)) {
            let handle = platform.resolve(fd).map_err(|error| {
                raise(config.violation_policy, ContractViolation::InvalidHandle { fd, role, error })
            })?;

            if !handles.contains(&handle) {
                if handles.len() == config.capacity {
                    return Err(raise(
                        config.violation_policy,
                        ContractViolation::TooManyObjects {
                            count: handles.len() + 1,
                            capacity: config.capacity,
                        },
                    ));
                }
                let kind = platform.classify(handle).map_err(|error| {
                    raise(config.violation_policy, ContractViolation::InvalidHandle { fd, role, error })
                })?;
                if !kind.is_supported() {
                    return Err(raise(
                        config.violation_policy,
                        ContractViolation::UnsupportedKind { fd, role, kind },
                    ));
                }
                handles.push(handle);
            }

            trace!("select: {} descriptor {} -> {:?}", role, fd, handle);
            mapping.insert(role, fd, handle);
        }
    }

    Ok(Translation { handles, mapping })
}
