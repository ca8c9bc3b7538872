//! Composable, lazy views over the entities of a container.
//!
//! A [`Query`] starts from [`Container::entities`] (every slot) or [`Container::filter`] (an
//! explicit entity list) and is narrowed by chaining:
//!
//! - **`need::<T>()`**: only entities carrying a `T`
//! - **`skip::<T>()`**: only entities *not* carrying a `T`
//! - **`load::<T>()`**: resolve the `T` column up front so rows read it without a type lookup
//!
//! Each call returns a new query, nothing is evaluated until iteration. Iterating walks slot
//! indices in ascending order (or the list in its order) and yields a [`Row`] for every live entity
//! that passes the predicates.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rusty_ecs::ecs::Container;
//!
//! let moving = container
//!     .entities()
//!     .need::<Position>()
//!     .skip::<Frozen>()
//!     .load::<Velocity>();
//!
//! for row in &moving {
//!     let position = row.get::<Position>().unwrap();
//!     let ((), velocity) = row.loaded();
//!     // ...
//! }
//!
//! // Queries are values: iterate again for a fresh pass.
//! let count = moving.iter().count();
//! ```
//!
//! # Borrowing
//!
//! A query borrows its container shared, so the container cannot change while a query is alive.
//! To mutate between steps, turn the query into an owned [`Filter`] with [`Query::filter`] and walk
//! it with [`Walker`], which re-checks each slot against the container as it is when reached.

pub mod filter;
pub mod load;

use std::{fmt, ptr};

use fixedbitset::FixedBitSet;

use crate::ecs::{
    Container,
    component::Component,
    container::TypeId,
    entity::Entity,
    storage::ErasedColumn,
};

pub use filter::{Filter, Walker};
pub use load::Load;

use filter::Candidates;

/// Where a query takes its candidates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Source<'c> {
    /// Every slot of the container, in index order.
    Slots,

    /// A caller-supplied list, in list order. Entities of other containers or dead ones are
    /// skipped.
    List(&'c [Entity]),
}

/// A lazy view of the entities of one container. See the [module docs](self).
pub struct Query<'c, L: Load = ()> {
    container: &'c Container,
    source: Source<'c>,
    need: FixedBitSet,
    skip: FixedBitSet,
    loaded: L::Columns<'c>,
}

impl<'c> Query<'c> {
    pub(crate) fn new(container: &'c Container, source: Source<'c>) -> Self {
        Self {
            container,
            source,
            need: FixedBitSet::new(),
            skip: FixedBitSet::new(),
            loaded: (),
        }
    }
}

impl<'c, L: Load> Query<'c, L> {
    /// Only yield entities carrying a `T`.
    pub fn need<T: Component>(mut self) -> Self {
        let id = self.container.types().register::<T>();
        insert(&mut self.need, id);
        self
    }

    /// Only yield entities without a `T`.
    pub fn skip<T: Component>(mut self) -> Self {
        let id = self.container.types().register::<T>();
        insert(&mut self.skip, id);
        self
    }

    /// Resolve the `T` column now so rows can read it directly. Does not filter.
    pub fn load<T: Component>(self) -> Query<'c, (L, T)> {
        Query {
            container: self.container,
            source: self.source,
            need: self.need,
            skip: self.skip,
            loaded: <(L, T)>::resolve(self.container),
        }
    }

    /// The container being queried.
    #[inline]
    pub fn container(&self) -> &'c Container {
        self.container
    }

    /// Iterate the matching rows from the start.
    pub fn iter(&self) -> Iter<'c, L> {
        let mut columns = Columns {
            need: Vec::with_capacity(self.need.count_ones(..)),
            skip: Vec::with_capacity(self.skip.count_ones(..)),
            unsatisfiable: false,
        };
        for id in self.need.ones() {
            match self.container.erased_column(TypeId::new(id as u32)) {
                Some(column) => columns.need.push(column),
                // Never stored, nothing can match.
                None => columns.unsatisfiable = true,
            }
        }
        for id in self.skip.ones() {
            // Never stored, nothing to exclude.
            if let Some(column) = self.container.erased_column(TypeId::new(id as u32)) {
                columns.skip.push(column);
            }
        }

        let end = match self.source {
            Source::Slots => self.container.capacity(),
            Source::List(entities) => entities.len(),
        };
        Iter {
            container: self.container,
            source: self.source,
            position: 0,
            end: if columns.unsatisfiable { 0 } else { end },
            columns,
            loaded: self.loaded,
        }
    }

    /// Detach the predicates into an owned [`Filter`] that can be walked while the container is
    /// mutated.
    pub fn filter(&self) -> Filter {
        let candidates = match self.source {
            Source::Slots => Candidates::Slots,
            Source::List(entities) => Candidates::List(entities.to_vec()),
        };
        Filter::new(
            self.container.id(),
            candidates,
            self.need.clone(),
            self.skip.clone(),
        )
    }
}

fn insert(set: &mut FixedBitSet, id: TypeId) {
    let index = id.index();
    if index >= set.len() {
        set.grow(index + 1);
    }
    set.insert(index);
}

impl<L: Load> Clone for Query<'_, L> {
    fn clone(&self) -> Self {
        Self {
            container: self.container,
            source: self.source,
            need: self.need.clone(),
            skip: self.skip.clone(),
            loaded: self.loaded,
        }
    }
}

impl<L: Load> fmt::Debug for Query<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("container", &self.container.id())
            .field("source", &self.source)
            .field("need", &self.need.ones().collect::<Vec<_>>())
            .field("skip", &self.skip.ones().collect::<Vec<_>>())
            .field("load", &std::any::type_name::<L>())
            .finish()
    }
}

impl<'c, L: Load> IntoIterator for Query<'c, L> {
    type Item = Row<'c, L>;
    type IntoIter = Iter<'c, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'c, L: Load> IntoIterator for &Query<'c, L> {
    type Item = Row<'c, L>;
    type IntoIter = Iter<'c, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The need and skip columns of one iteration.
#[derive(Clone)]
struct Columns<'c> {
    need: Vec<&'c dyn ErasedColumn>,
    skip: Vec<&'c dyn ErasedColumn>,
    unsatisfiable: bool,
}

impl Columns<'_> {
    #[inline]
    fn matches(&self, index: usize) -> bool {
        self.need.iter().all(|column| column.contains(index))
            && !self.skip.iter().any(|column| column.contains(index))
    }
}

/// Iterator over the rows of a [`Query`].
///
/// Two iterators over the same container compare equal when they are at the same position.
pub struct Iter<'c, L: Load = ()> {
    container: &'c Container,
    source: Source<'c>,
    position: usize,
    end: usize,
    columns: Columns<'c>,
    loaded: L::Columns<'c>,
}

impl<L: Load> Iter<'_, L> {
    /// The slot index (or list position) the next call to `next` starts from.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'c, L: Load> Iterator for Iter<'c, L> {
    type Item = Row<'c, L>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.end {
            let position = self.position;
            self.position += 1;

            let entity = match self.source {
                Source::Slots => self.container.entity_at(position),
                Source::List(entities) => Some(entities[position])
                    .filter(|&entity| self.container.is_alive(entity)),
            };
            let Some(entity) = entity else {
                continue;
            };
            if self.columns.matches(entity.index()) {
                return Some(Row {
                    entity,
                    container: self.container,
                    loaded: self.loaded,
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.end - self.position))
    }
}

impl<L: Load> Clone for Iter<'_, L> {
    fn clone(&self) -> Self {
        Self {
            container: self.container,
            source: self.source,
            position: self.position,
            end: self.end,
            columns: self.columns.clone(),
            loaded: self.loaded,
        }
    }
}

impl<L: Load> PartialEq for Iter<'_, L> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.container, other.container)
            && self.source == other.source
            && self.position == other.position
    }
}

impl<L: Load> fmt::Debug for Iter<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("container", &self.container.id())
            .field("position", &self.position)
            .field("end", &self.end)
            .finish()
    }
}

/// One matching entity of a query.
pub struct Row<'c, L: Load = ()> {
    entity: Entity,
    container: &'c Container,
    loaded: L::Columns<'c>,
}

impl<'c, L: Load> Row<'c, L> {
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Read a component of this row.
    ///
    /// Loaded types are read through their resolved column, anything else is looked up in the
    /// container.
    #[inline]
    pub fn get<T: Component>(&self) -> Option<&'c T> {
        L::find::<T>(self.loaded, self.entity.index())
            .or_else(|| self.container.get::<T>(self.entity))
    }

    #[inline]
    pub fn has<T: Component>(&self) -> bool {
        self.container.has::<T>(self.entity)
    }

    /// Every loaded component of this row, as the nested tuple built by `load`.
    #[inline]
    pub fn loaded(&self) -> L::Item<'c> {
        L::fetch(self.loaded, self.entity.index())
    }
}

impl<L: Load> Clone for Row<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: Load> Copy for Row<'_, L> {}

impl<L: Load> fmt::Debug for Row<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row").field("entity", &self.entity).finish()
    }
}
