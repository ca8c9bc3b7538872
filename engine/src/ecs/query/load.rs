//! Columns resolved once per query for direct per-row access.
//!
//! [`Query::load`](super::Query::load) extends the query's `L` parameter one type at a time,
//! building a cons-list: `()` → `((), A)` → `(((), A), B)`. Each link holds the column of its type,
//! looked up when the query is built, so reading a loaded component while iterating is a single
//! indexed access instead of a type lookup.

use std::any::{Any, TypeId};

use crate::ecs::{Container, component::Component, storage::Column};

/// A cons-list of component types whose columns are resolved up front.
pub trait Load: 'static {
    /// The resolved columns. A type never stored in the container resolves to `None`.
    type Columns<'c>: Copy;

    /// The components of one row, each `None` when the row lacks it.
    type Item<'c>;

    /// Look up every column in `container`.
    fn resolve(container: &Container) -> Self::Columns<'_>;

    /// Read every loaded component at slot `index`.
    fn fetch<'c>(columns: Self::Columns<'c>, index: usize) -> Self::Item<'c>;

    /// Read the loaded `U` at slot `index`. `None` if `U` is not loaded or the slot lacks it.
    fn find<'c, U: Component>(columns: Self::Columns<'c>, index: usize) -> Option<&'c U>;
}

impl Load for () {
    type Columns<'c> = ();
    type Item<'c> = ();

    #[inline]
    fn resolve(_container: &Container) -> Self::Columns<'_> {}

    #[inline]
    fn fetch<'c>(_columns: Self::Columns<'c>, _index: usize) -> Self::Item<'c> {}

    #[inline]
    fn find<'c, U: Component>(_columns: Self::Columns<'c>, _index: usize) -> Option<&'c U> {
        None
    }
}

impl<L: Load, T: Component> Load for (L, T) {
    type Columns<'c> = (L::Columns<'c>, Option<&'c Column<T>>);
    type Item<'c> = (L::Item<'c>, Option<&'c T>);

    #[inline]
    fn resolve(container: &Container) -> Self::Columns<'_> {
        (L::resolve(container), container.column::<T>())
    }

    #[inline]
    fn fetch<'c>(columns: Self::Columns<'c>, index: usize) -> Self::Item<'c> {
        (
            L::fetch(columns.0, index),
            columns.1.and_then(|column| column.get(index)),
        )
    }

    #[inline]
    fn find<'c, U: Component>(columns: Self::Columns<'c>, index: usize) -> Option<&'c U> {
        if TypeId::of::<U>() != TypeId::of::<T>() {
            return L::find::<U>(columns.0, index);
        }
        let value: &'c dyn Any = columns.1?.get(index)?;
        value.downcast_ref::<U>()
    }
}
