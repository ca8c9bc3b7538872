//! Per-type component storage.
//!
//! A [`Column<T>`] stores every `T` component of one container, indexed directly by entity slot
//! index. Beside the values it keeps one [`Version`] per slot: a live version marks the slot as
//! holding a constructed `T` and records the entity version the value was written for.
//!
//! ```text
//! index:     0        1        2        3
//! values:  [ Pos ] [  _  ] [ Pos ] [  _  ]     (`_` uninitialized)
//! versions: [v1+]   [v0-]   [v5+]   [v0-]       (`+` exists, `-` vacant)
//! ```
//!
//! # Replacement
//!
//! [`emplace`](Column::emplace) on an occupied slot assigns the new value over the old one. The
//! old value is dropped as part of the assignment, so at most one `T` is ever live per slot.
//!
//! # Writing from inside the column
//!
//! Copying or moving a component from one slot of a column to another slot of the same column is
//! the one place where the source can be invalidated by the write itself: if the target index is
//! past the current capacity, growth relocates the block the source lives in.
//! [`duplicate_within`](Column::duplicate_within) and [`move_within`](Column::move_within) detect
//! this with [`will_invalidate`](Column::will_invalidate) and take the value out of the block
//! before growing:
//!
//! ```text
//! will_invalidate(target, source)?
//!   yes: snapshot = clone(source) -> grow -> emplace(target, snapshot)
//!   no:  grow (no-op)             -> emplace(target, clone(source))
//! ```
//!
//! Both paths produce the same value at `target`.

use std::{
    any::{Any, type_name},
    fmt, ptr,
};

use log::debug;

use crate::ecs::{
    entity::Version,
    storage::mem::{GrowthStrategy, IndexedMemory},
};

/// Dense storage for all `T` components of a container, indexed by slot index.
pub struct Column<T> {
    /// Component values, initialized where `versions` marks the slot as existing.
    data: IndexedMemory<T>,

    /// Liveness and owning version for each addressable slot. Always `data.capacity()` long.
    versions: Vec<Version>,

    /// Number of live values.
    len: usize,
}

impl<T> Column<T> {
    /// Construct an empty column that grows with `growth`.
    pub fn new(growth: GrowthStrategy) -> Self {
        Self {
            data: IndexedMemory::new(growth),
            versions: Vec::new(),
            len: 0,
        }
    }

    /// Number of live values in the column.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of addressable slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Does slot `index` hold a value?
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.version(index).exists()
    }

    /// Does slot `index` hold a value written for exactly `version`?
    #[inline]
    pub fn contains_version(&self, index: usize, version: Version) -> bool {
        version.exists() && self.version(index) == version
    }

    /// The version recorded for slot `index`, dead if vacant or out of range.
    #[inline]
    pub fn version(&self, index: usize) -> Version {
        self.versions.get(index).copied().unwrap_or(Version::DEAD)
    }

    /// Get the value at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if !self.contains(index) {
            return None;
        }
        // SAFETY: The slot is marked live, so it holds an initialized `T`.
        Some(unsafe { &*self.data.ptr_at(index) })
    }

    /// Get the value at `index` mutably, if any.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if !self.contains(index) {
            return None;
        }
        // SAFETY: The slot is marked live, so it holds an initialized `T`.
        Some(unsafe { &mut *self.data.ptr_at_mut(index) })
    }

    /// Make slot `index` addressable, relocating the values if needed.
    pub fn reserve_for(&mut self, index: usize) {
        if let Some(previous) = self.data.reserve_for(index) {
            self.versions.resize(self.data.capacity(), Version::DEAD);
            debug!(
                "column<{}> grew from {} to {}",
                type_name::<T>(),
                previous,
                self.data.capacity()
            );
        }
    }

    /// Would writing slot `index` relocate the block `source` points into?
    #[inline]
    pub fn will_invalidate(&self, index: usize, source: *const T) -> bool {
        self.data.needs_growth_for(index) && self.data.contains_ptr(source)
    }

    /// Store `value` at `index` for an entity of `version`, replacing any existing value.
    ///
    /// A replaced value is dropped. Returns the stored value.
    pub fn emplace(&mut self, index: usize, version: Version, value: T) -> &mut T {
        debug_assert!(version.exists(), "emplace with a dead version");
        self.reserve_for(index);
        let slot = self.data.ptr_at_mut(index);
        if self.versions[index].exists() {
            // SAFETY: The slot is live. Assignment drops the old value in place.
            unsafe { *slot = value };
        } else {
            // SAFETY: The slot is addressable and vacant.
            unsafe { slot.write(value) };
            self.len += 1;
        }
        self.versions[index] = version;
        // SAFETY: Initialized just above.
        unsafe { &mut *slot }
    }

    /// Drop the value at `index`. Returns `false` if the slot was already vacant.
    pub fn erase(&mut self, index: usize) -> bool {
        if !self.contains(index) {
            return false;
        }
        // Vacate first so a panicking drop can't leave a slot marked live over a dropped value.
        self.versions[index] = Version::DEAD;
        self.len -= 1;
        // SAFETY: The slot held an initialized value and is no longer marked live.
        unsafe { ptr::drop_in_place(self.data.ptr_at_mut(index)) };
        true
    }

    /// Remove the value at `index` and return it.
    pub fn take(&mut self, index: usize) -> Option<T> {
        if !self.contains(index) {
            return None;
        }
        self.versions[index] = Version::DEAD;
        self.len -= 1;
        // SAFETY: The slot held an initialized value and is no longer marked live.
        Some(unsafe { self.data.ptr_at(index).read() })
    }

    /// Copy the value at `source` into `index` with `clone`.
    ///
    /// Safe when `index` is past the current capacity: the source is cloned before the column
    /// grows. Returns `None` if `source` is vacant.
    pub fn duplicate_within(
        &mut self,
        source: usize,
        index: usize,
        version: Version,
        clone: impl FnOnce(&T) -> T,
    ) -> Option<&mut T> {
        if !self.contains(source) {
            return None;
        }
        let source_ptr = self.data.ptr_at(source);
        let value = if self.will_invalidate(index, source_ptr) {
            // SAFETY: `source` is live and the block has not moved yet.
            let snapshot = clone(unsafe { &*source_ptr });
            self.reserve_for(index);
            snapshot
        } else {
            self.reserve_for(index);
            // SAFETY: No relocation happened, but re-derive the pointer after the reserve anyway.
            clone(unsafe { &*self.data.ptr_at(source) })
        };
        Some(self.emplace(index, version, value))
    }

    /// Move the value at `source` into `index`, leaving `source` vacant.
    ///
    /// Returns `None` if `source` is vacant. Moving a slot onto itself only updates its version.
    pub fn move_within(&mut self, source: usize, index: usize, version: Version) -> Option<&mut T> {
        if source == index {
            if !self.contains(source) {
                return None;
            }
            self.versions[index] = version;
            return self.get_mut(index);
        }
        // Taking the value out of the block is the snapshot, growth can't touch it.
        let value = self.take(source)?;
        Some(self.emplace(index, version, value))
    }

    /// Iterate live values with their slot index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        (0..self.capacity()).filter_map(move |index| self.get(index).map(|value| (index, value)))
    }

    /// Iterate live values mutably with their slot index.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> + '_ {
        let data = &mut self.data;
        self.versions
            .iter()
            .enumerate()
            .filter(|(_, version)| version.exists())
            // SAFETY: Each live index is visited once, so the references never alias.
            .map(move |(index, _)| (index, unsafe { &mut *data.ptr_at_mut(index) }))
    }
}

impl<T: Clone> Column<T> {
    /// Clone the value at `source` into `index`. See [`duplicate_within`](Self::duplicate_within).
    #[inline]
    pub fn clone_within(&mut self, source: usize, index: usize, version: Version) -> Option<&mut T> {
        self.duplicate_within(source, index, version, T::clone)
    }
}

impl<T> Drop for Column<T> {
    fn drop(&mut self) {
        if !std::mem::needs_drop::<T>() {
            return;
        }
        for index in 0..self.versions.len() {
            self.erase(index);
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("type", &type_name::<T>())
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// The type-independent view of a [`Column`], used by queries and the column registry.
pub trait ErasedColumn: Any {
    /// Does slot `index` hold a value?
    fn contains(&self, index: usize) -> bool;

    /// The version recorded for slot `index`.
    fn version(&self, index: usize) -> Version;

    /// Number of live values.
    fn len(&self) -> usize;

    /// Number of addressable slots.
    fn capacity(&self) -> usize;

    /// Name of the stored component type.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> ErasedColumn for Column<T> {
    #[inline]
    fn contains(&self, index: usize) -> bool {
        Column::contains(self, index)
    }

    #[inline]
    fn version(&self, index: usize) -> Version {
        Column::version(self, index)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn capacity(&self) -> usize {
        Column::capacity(self)
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    fn live(serial_bumps: usize) -> Version {
        let mut version = Version::DEAD;
        for _ in 0..serial_bumps {
            version.create();
            version.destroy();
        }
        version.create()
    }

    /// Counts how many instances are alive through a shared counter.
    #[derive(Debug)]
    struct Tracked {
        name: String,
        alive: Rc<Cell<i32>>,
    }

    impl Tracked {
        fn new(name: &str, alive: &Rc<Cell<i32>>) -> Self {
            alive.set(alive.get() + 1);
            Self {
                name: name.to_string(),
                alive: alive.clone(),
            }
        }
    }

    impl Clone for Tracked {
        fn clone(&self) -> Self {
            Self::new(&self.name, &self.alive)
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.alive.set(self.alive.get() - 1);
        }
    }

    #[test]
    fn emplace_and_get() {
        // Given
        let mut column = Column::<u32>::new(GrowthStrategy::default());

        // When
        column.emplace(3, live(0), 42);

        // Then
        assert!(column.contains(3));
        assert!(!column.contains(0));
        assert_eq!(column.get(3), Some(&42));
        assert_eq!(column.get(0), None);
        assert_eq!(column.get(100), None);
        assert_eq!(column.len(), 1);
        assert_eq!(column.capacity(), 4);
    }

    #[test]
    fn emplace_replaces_and_drops_previous() {
        // Given
        let alive = Rc::new(Cell::new(0));
        let mut column = Column::new(GrowthStrategy::default());
        column.emplace(0, live(0), Tracked::new("a", &alive));

        // When
        column.emplace(0, live(0), Tracked::new("b", &alive));

        // Then - Exactly one value, the last write
        assert_eq!(column.len(), 1);
        assert_eq!(alive.get(), 1);
        assert_eq!(column.get(0).map(|t| t.name.as_str()), Some("b"));
    }

    #[test]
    fn emplace_records_version() {
        let mut column = Column::<u8>::new(GrowthStrategy::default());
        let version = live(3);

        column.emplace(1, version, 9);

        assert_eq!(column.version(1), version);
        assert!(column.contains_version(1, version));
        assert!(!column.contains_version(1, live(0)));
    }

    #[test]
    fn erase_is_idempotent() {
        // Given
        let alive = Rc::new(Cell::new(0));
        let mut column = Column::new(GrowthStrategy::default());
        column.emplace(2, live(0), Tracked::new("a", &alive));

        // When / Then
        assert!(column.erase(2));
        assert!(!column.erase(2));
        assert!(!column.erase(50));
        assert_eq!(alive.get(), 0);
        assert!(column.is_empty());
    }

    #[test]
    fn take_returns_value_without_dropping() {
        let alive = Rc::new(Cell::new(0));
        let mut column = Column::new(GrowthStrategy::default());
        column.emplace(0, live(0), Tracked::new("a", &alive));

        let taken = column.take(0).unwrap();

        assert_eq!(taken.name, "a");
        assert_eq!(alive.get(), 1);
        assert!(!column.contains(0));
        assert!(column.take(0).is_none());
    }

    #[test]
    fn growth_preserves_values() {
        // Given
        let mut column = Column::<String>::new(GrowthStrategy::Exact);
        for i in 0..4 {
            column.emplace(i, live(0), format!("value-{i}"));
        }

        // When
        column.emplace(20, live(0), "far".to_string());

        // Then
        assert_eq!(column.capacity(), 21);
        for i in 0..4 {
            assert_eq!(column.get(i), Some(&format!("value-{i}")));
        }
        assert_eq!(column.get(20).map(String::as_str), Some("far"));
        assert_eq!(column.len(), 5);
    }

    #[test]
    fn will_invalidate_only_for_growth_from_inside() {
        let mut column = Column::<u64>::new(GrowthStrategy::Exact);
        column.emplace(1, live(0), 7);
        let inside = column.data.ptr_at(1);
        let outside = 7u64;

        assert!(column.will_invalidate(2, inside));
        assert!(!column.will_invalidate(1, inside));
        assert!(!column.will_invalidate(2, &outside));
    }

    #[test]
    fn clone_within_into_unallocated_index() {
        // Given - A column at capacity whose source will move on growth
        let alive = Rc::new(Cell::new(0));
        let mut aliased = Column::new(GrowthStrategy::Exact);
        aliased.emplace(0, live(0), Tracked::new("payload", &alive));
        assert!(aliased.will_invalidate(5, aliased.data.ptr_at(0)));

        // And - A column with room to spare
        let mut roomy = Column::new(GrowthStrategy::Exact);
        roomy.reserve_for(10);
        roomy.emplace(0, live(0), Tracked::new("payload", &alive));
        assert!(!roomy.will_invalidate(5, roomy.data.ptr_at(0)));

        // When
        aliased.clone_within(0, 5, live(1)).unwrap();
        roomy.clone_within(0, 5, live(1)).unwrap();

        // Then - Both paths observe the same result
        assert_eq!(aliased.get(5).map(|t| &t.name), roomy.get(5).map(|t| &t.name));
        assert_eq!(aliased.get(0).map(|t| &t.name), roomy.get(0).map(|t| &t.name));
        assert_eq!(aliased.version(5), roomy.version(5));
        assert_eq!(aliased.len(), 2);
        assert_eq!(alive.get(), 4);

        drop(aliased);
        drop(roomy);
        assert_eq!(alive.get(), 0);
    }

    #[test]
    fn clone_within_onto_itself() {
        let mut column = Column::<String>::new(GrowthStrategy::default());
        column.emplace(0, live(0), "same".to_string());

        column.clone_within(0, 0, live(0));

        assert_eq!(column.get(0).map(String::as_str), Some("same"));
        assert_eq!(column.len(), 1);
    }

    #[test]
    fn clone_within_vacant_source() {
        let mut column = Column::<u32>::new(GrowthStrategy::default());

        assert!(column.clone_within(0, 1, live(0)).is_none());
        assert!(column.is_empty());
    }

    #[test]
    fn move_within_into_unallocated_index() {
        // Given
        let alive = Rc::new(Cell::new(0));
        let mut column = Column::new(GrowthStrategy::Exact);
        column.emplace(0, live(0), Tracked::new("payload", &alive));

        // When
        let moved = column.move_within(0, 8, live(2)).map(|t| t.name.clone());

        // Then
        assert_eq!(moved.as_deref(), Some("payload"));
        assert!(!column.contains(0));
        assert!(column.contains_version(8, live(2)));
        assert_eq!(column.len(), 1);
        assert_eq!(alive.get(), 1);
    }

    #[test]
    fn iter_visits_live_values_in_index_order() {
        let mut column = Column::<i32>::new(GrowthStrategy::default());
        column.emplace(4, live(0), 40);
        column.emplace(1, live(0), 10);
        column.emplace(2, live(0), 20);
        column.erase(2);

        let values: Vec<_> = column.iter().collect();
        assert_eq!(values, vec![(1, &10), (4, &40)]);

        for (_, value) in column.iter_mut() {
            *value += 1;
        }
        assert_eq!(column.get(1), Some(&11));
        assert_eq!(column.get(4), Some(&41));
    }

    #[test]
    fn drop_releases_live_values() {
        let alive = Rc::new(Cell::new(0));
        {
            let mut column = Column::new(GrowthStrategy::default());
            for i in 0..10 {
                column.emplace(i * 2, live(0), Tracked::new("x", &alive));
            }
            column.erase(4);
            assert_eq!(alive.get(), 9);
        }
        assert_eq!(alive.get(), 0);
    }

    #[test]
    fn zero_sized_components() {
        #[derive(Debug, Clone, PartialEq)]
        struct Marker;

        let mut column = Column::new(GrowthStrategy::default());
        column.emplace(0, live(0), Marker);
        column.clone_within(0, 7, live(0));

        assert!(column.contains(7));
        assert_eq!(column.len(), 2);
    }

    #[test]
    fn erased_view() {
        let mut column = Column::<f32>::new(GrowthStrategy::default());
        column.emplace(2, live(0), 1.5);

        let erased: &dyn ErasedColumn = &column;
        assert!(erased.contains(2));
        assert_eq!(erased.len(), 1);
        assert_eq!(erased.type_name(), "f32");
        assert!(erased.as_any().downcast_ref::<Column<f32>>().is_some());
        assert!(erased.as_any().downcast_ref::<Column<u32>>().is_none());
    }
}
