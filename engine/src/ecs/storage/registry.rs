//! The heterogeneous set of columns owned by a container.
//!
//! Columns are stored type-erased in a flat `Vec` indexed by the dense [`TypeId`] the container's
//! [`TypeIndex`](crate::ecs::container::TypeIndex) assigned to the component type. Typed access
//! downcasts back to [`Column<T>`]; a failed downcast means a type id was paired with the wrong
//! type, which is a bug in the caller and panics.

use std::any::type_name;

use log::debug;

use crate::ecs::{
    container::TypeId,
    storage::{
        column::{Column, ErasedColumn},
        mem::GrowthStrategy,
    },
};

/// One [`Column`] per component type, indexed by [`TypeId`].
#[derive(Default)]
pub struct Registry {
    /// Columns by type id index. `None` until the type first stores a value.
    columns: Vec<Option<Box<dyn ErasedColumn>>>,

    /// Growth strategy handed to new columns.
    growth: GrowthStrategy,
}

impl Registry {
    /// Construct an empty registry whose columns grow with `growth`.
    pub fn new(growth: GrowthStrategy) -> Self {
        Self {
            columns: Vec::new(),
            growth,
        }
    }

    /// Get the column for `id`, type-erased.
    #[inline]
    pub fn erased(&self, id: TypeId) -> Option<&dyn ErasedColumn> {
        self.columns.get(id.index())?.as_deref()
    }

    /// Get the column for `T`, if one has been created.
    ///
    /// # Panics
    ///
    /// Panics if the column stored under `id` is not a `Column<T>`.
    #[inline]
    pub fn get<T: 'static>(&self, id: TypeId) -> Option<&Column<T>> {
        let column = self.erased(id)?;
        Some(
            column
                .as_any()
                .downcast_ref::<Column<T>>()
                .unwrap_or_else(|| mismatch::<T>(id, column.type_name())),
        )
    }

    /// Get the column for `T` mutably, if one has been created.
    ///
    /// # Panics
    ///
    /// Panics if the column stored under `id` is not a `Column<T>`.
    #[inline]
    pub fn get_mut<T: 'static>(&mut self, id: TypeId) -> Option<&mut Column<T>> {
        let column = self.columns.get_mut(id.index())?.as_deref_mut()?;
        let name = column.type_name();
        Some(
            column
                .as_any_mut()
                .downcast_mut::<Column<T>>()
                .unwrap_or_else(|| mismatch::<T>(id, name)),
        )
    }

    /// Get the column for `T`, creating an empty one on first use.
    ///
    /// # Panics
    ///
    /// Panics if the column stored under `id` is not a `Column<T>`.
    pub fn get_or_insert<T: 'static>(&mut self, id: TypeId) -> &mut Column<T> {
        let index = id.index();
        if index >= self.columns.len() {
            self.columns.resize_with(index + 1, || None);
        }
        let growth = self.growth;
        let column = self.columns[index].get_or_insert_with(|| {
            debug!("created column<{}> at type id {}", type_name::<T>(), index);
            Box::new(Column::<T>::new(growth))
        });
        let name = column.type_name();
        column
            .as_any_mut()
            .downcast_mut::<Column<T>>()
            .unwrap_or_else(|| mismatch::<T>(id, name))
    }

    /// Number of columns created so far.
    pub fn len(&self) -> usize {
        self.columns.iter().filter(|column| column.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cold]
fn mismatch<T>(id: TypeId, stored: &str) -> ! {
    panic!(
        "column type mismatch for type id {}: requested '{}', stored '{}'",
        id.index(),
        type_name::<T>(),
        stored
    )
}
