//! Dense type ids for a container.
//!
//! This module provides [`TypeIndex`], which assigns every Rust type a container uses (component
//! types and event types alike) a small integer [`TypeId`]. Columns, component operations and
//! event signals are all stored in flat `Vec`s indexed by that integer instead of being hashed by
//! `std::any::TypeId` on every access.
//!
//! # Ownership
//!
//! Each [`Container`](super::Container) owns its own index. There are no process-wide type
//! counters, so two containers may assign different ids to the same type, and ids must never be
//! carried from one container to another.
//!
//! # Shared Registration
//!
//! Registration takes `&self`. Lookups are lock-free through a `DashMap`, and only the first
//! registration of a type takes the write lock on the info list. This lets read-only paths (building
//! a query, connecting an event handler) register a type they have not seen before.
//!
//! # Example
//!
//! ```rust,ignore
//! let index = TypeIndex::new();
//!
//! let pos_id = index.register::<Position>();
//! assert_eq!(index.get::<Position>(), Some(pos_id));
//! assert_eq!(index.register::<Position>(), pos_id);
//! ```

use std::{
    any::{TypeId as StdTypeId, type_name},
    fmt,
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicU32, Ordering},
    },
};

use dashmap::DashMap;
use log::debug;

/// A dense identifier for a type registered with a [`TypeIndex`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(u32);

impl TypeId {
    /// Construct a new Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this ID for use in indexable storage (e.g., Vec, bitset).
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for TypeId {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Metadata about a registered type.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    /// The dense type ID.
    id: TypeId,

    /// The Rust TypeId for runtime type checking.
    type_id: StdTypeId,

    /// The Rust type name, for diagnostics.
    name: &'static str,
}

impl TypeInfo {
    fn new<T: 'static>(id: TypeId) -> Self {
        Self {
            id,
            type_id: StdTypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Get the type ID.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Get the Rust TypeId.
    #[inline]
    pub fn type_id(&self) -> StdTypeId {
        self.type_id
    }

    /// Get the Rust type name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Maps Rust types to dense [`TypeId`]s, assigned in order of first registration.
pub struct TypeIndex {
    /// Map from Rust TypeId to our Id. Lock-free reads via sharded concurrent hashmap.
    type_map: DashMap<StdTypeId, TypeId>,

    /// Registered type info, indexed by id. Protected by RwLock for rare writes.
    types: RwLock<Vec<TypeInfo>>,

    /// Next available type identifier.
    next_id: AtomicU32,
}

impl Default for TypeIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeIndex {
    /// Create a new, empty type index.
    #[inline]
    pub fn new() -> Self {
        Self {
            type_map: DashMap::new(),
            types: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(0),
        }
    }

    /// Get the id of `T`, registering it on first use.
    pub fn register<T: 'static>(&self) -> TypeId {
        let std_type_id = StdTypeId::of::<T>();

        // Fast path: check if already registered (lock-free read)
        if let Some(existing) = self.type_map.get(&std_type_id) {
            return *existing;
        }

        // Slow path: use the entry API so a racing registration can't hand out two ids.
        match self.type_map.entry(std_type_id) {
            dashmap::Entry::Occupied(occupied) => *occupied.get(),
            dashmap::Entry::Vacant(vacant) => {
                let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
                let id = TypeId(self.next_id.fetch_add(1, Ordering::Relaxed));
                debug_assert_eq!(id.index(), types.len());
                types.push(TypeInfo::new::<T>(id));
                vacant.insert(id);
                debug!("registered type {} as {}", type_name::<T>(), id);
                id
            }
        }
    }

    /// Get the id of `T`, if registered.
    #[inline]
    pub fn get<T: 'static>(&self) -> Option<TypeId> {
        self.type_map
            .get(&StdTypeId::of::<T>())
            .map(|entry| *entry.value())
    }

    /// Get type info by id.
    #[inline]
    pub fn info(&self, id: TypeId) -> Option<TypeInfo> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types.get(id.index()).copied()
    }

    /// Get type info for a type, if registered.
    #[inline]
    pub fn info_of<T: 'static>(&self) -> Option<TypeInfo> {
        self.info(self.get::<T>()?)
    }

    /// Get the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.next_id.load(Ordering::Relaxed) as usize
    }

    /// Check if the index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for TypeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_list()
            .entries(types.iter().map(|info| (info.id.0, info.name)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    struct Position {
        #[allow(dead_code)]
        x: f32,
        #[allow(dead_code)]
        y: f32,
    }

    struct Velocity {
        #[allow(dead_code)]
        dx: f32,
        #[allow(dead_code)]
        dy: f32,
    }

    #[test]
    fn register_assigns_dense_ids_in_order() {
        // Given
        let index = TypeIndex::new();

        // When
        let pos_id = index.register::<Position>();
        let vel_id = index.register::<Velocity>();

        // Then
        assert_eq!(pos_id, TypeId::new(0));
        assert_eq!(vel_id, TypeId::new(1));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn register_same_type_twice_returns_same_id() {
        // Given
        let index = TypeIndex::new();

        // When
        let id1 = index.register::<Position>();
        let id2 = index.register::<Position>();

        // Then
        assert_eq!(id1, id2);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn get_unregistered_is_none() {
        let index = TypeIndex::new();

        assert!(index.get::<Position>().is_none());
        assert!(index.info_of::<Position>().is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn type_info_available_after_registration() {
        // Given
        let index = TypeIndex::new();
        let id = index.register::<Position>();

        // When
        let info = index.info(id).unwrap();

        // Then
        assert_eq!(info.id(), id);
        assert_eq!(info.type_id(), StdTypeId::of::<Position>());
        assert!(info.name().ends_with("Position"));
    }

    #[test]
    fn indices_are_independent() {
        // Given
        let first = TypeIndex::new();
        let second = TypeIndex::new();

        // When
        first.register::<Position>();
        first.register::<Velocity>();
        let vel_in_second = second.register::<Velocity>();

        // Then - No shared counter between indices
        assert_eq!(vel_in_second, TypeId::new(0));
        assert_eq!(first.get::<Velocity>(), Some(TypeId::new(1)));
    }

    #[test]
    fn concurrent_registration_same_type() {
        // Given
        let index = Arc::new(TypeIndex::new());

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let index = Arc::clone(&index);
                thread::spawn(move || index.register::<Position>())
            })
            .collect();

        // When
        let ids = handles
            .into_iter()
            .map(|h| h.join())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        // Then
        assert!(ids.iter().all(|&id| id == ids[0]));
        assert_eq!(index.len(), 1);
    }
}
