//! Entity identity and slot allocation.
//!
//! An [`Entity`] is a lightweight, copyable handle: the [`container::Id`] it belongs to, the index
//! of its slot and the [`Version`] that slot had when the entity was created. It owns nothing.
//!
//! # Architecture
//!
//! - **[`Version`]**: A packed (serial, exists) tag. Every create/destroy transition of a slot
//!   advances the serial, so a stale handle never matches the slot's current version again.
//!
//! - **[`Allocator`]**: Hands out slot indices. Freed indices go to a dead pool and are reused
//!   before new indices are appended, which keeps the index space compact for column storage.
//!
//! - **[`EntityRef`] / [`EntityMut`]**: Borrowed views pairing an entity with its container so the
//!   per-entity operations read as methods.
//!
//! # Generation Tracking
//!
//! ```rust,ignore
//! let a = container.create();       // index 0, serial 1 (live)
//! container.destroy(a);             // slot 0 -> serial 2 (dead)
//! let b = container.create();       // index 0, serial 3 (live)
//! assert!(!container.is_alive(a));  // serial mismatch, `a` is stale
//! assert!(container.is_alive(b));
//! ```

mod reference;
mod version;

use crossbeam::queue::SegQueue;

use crate::ecs::container;

pub use reference::{EntityMut, EntityRef};
pub use version::Version;

/// An entity in a [`Container`](crate::ecs::Container).
///
/// Entities compare equal when they name the same container, slot index and version. A handle is
/// valid while its container reports the slot live with the same version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    /// The container the entity was created in.
    container: container::Id,

    /// The slot index of the entity.
    index: usize,

    /// The version of the slot when the entity was created.
    version: Version,
}

impl Entity {
    /// An entity that belongs to no container and is never valid.
    pub const NULL: Self = Self {
        container: container::Id::NONE,
        index: 0,
        version: Version::DEAD,
    };

    #[inline]
    pub(crate) const fn new(container: container::Id, index: usize, version: Version) -> Self {
        Self {
            container,
            index,
            version,
        }
    }

    /// Get the container this entity was created in.
    #[inline]
    pub fn container(&self) -> container::Id {
        self.container
    }

    /// Get the slot index of this entity, suitable for indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Get the version this entity was issued with.
    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Is this the null entity (or any entity not bound to a container)?
    #[inline]
    pub fn is_null(&self) -> bool {
        self.container == container::Id::NONE
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

/// An allocator for entity slots.
///
/// Tracks the current [`Version`] of every slot ever handed out and a pool of freed indices.
/// Freed slots have their version bumped before they are pooled, invalidating any handle that
/// still refers to them.
#[derive(Default, Debug)]
pub struct Allocator {
    /// Current version of each slot, indexed by slot index.
    versions: Vec<Version>,

    /// Pool of indices available for reuse.
    dead_pool: SegQueue<usize>,
}

impl Allocator {
    /// Construct a new, empty allocator.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an allocator with room for `capacity` slots before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            versions: Vec::with_capacity(capacity),
            dead_pool: SegQueue::new(),
        }
    }

    /// Allocate a slot, reusing a freed index when one is available.
    ///
    /// Returns the slot index and its new (live) version.
    pub fn alloc(&mut self) -> (usize, Version) {
        let index = match self.dead_pool.pop() {
            Some(index) => index,
            None => {
                self.versions.push(Version::DEAD);
                self.versions.len() - 1
            }
        };
        (index, self.versions[index].create())
    }

    /// Free the slot at `index` if it is live with `version`.
    ///
    /// Returns `false` and does nothing when the slot is not live with that version, so freeing
    /// a stale handle twice is harmless.
    pub fn free(&mut self, index: usize, version: Version) -> bool {
        if !version.exists() || self.version(index) != version {
            return false;
        }
        self.versions[index].destroy();
        self.dead_pool.push(index);
        true
    }

    /// The current version of the slot at `index`. Slots never allocated report [`Version::DEAD`].
    #[inline]
    pub fn version(&self, index: usize) -> Version {
        self.versions.get(index).copied().unwrap_or(Version::DEAD)
    }

    /// Is the slot at `index` currently live?
    #[inline]
    pub fn is_live(&self, index: usize) -> bool {
        self.version(index).exists()
    }

    /// Is the slot at `index` live with exactly `version`?
    #[inline]
    pub fn is_current(&self, index: usize, version: Version) -> bool {
        version.exists() && self.version(index) == version
    }

    /// Number of slots ever allocated, live or dead.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.versions.len()
    }

    /// Number of live slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.versions.len() - self.dead_pool.len()
    }

    /// Are there no live slots?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
