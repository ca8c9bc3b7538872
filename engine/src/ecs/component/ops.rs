//! Per-type operations for type-erased bulk work.
//!
//! A container never knows the full set of component types it holds. The first time a component
//! type is stored, the container records a [`ComponentOps`] for it: a table of plain function
//! pointers, each monomorphized for that type. Destroying, copying or moving a whole entity then
//! walks this table instead of a static type list, so it covers every type the container has ever
//! seen.

use std::any::type_name;

use crate::ecs::{
    Container,
    component::Component,
    container::TypeId,
    entity::Entity,
    error::Result,
};

/// Type-erased operations for one component type.
#[derive(Clone, Copy)]
pub struct ComponentOps {
    /// Name of the component type.
    name: &'static str,

    /// Whether the component opted into copying.
    copyable: bool,

    contains: fn(&Container, Entity) -> bool,
    copy: fn(&mut Container, Entity, Entity) -> Result<()>,
    copy_to: fn(&Container, Entity, &mut Container, Entity) -> Result<()>,
    move_to: fn(&mut Container, Entity, &mut Container, Entity),
    destroy: fn(&mut Container, Entity) -> bool,
}

impl ComponentOps {
    /// Build the operations for `T`.
    pub fn of<T: Component>() -> Self {
        Self {
            name: type_name::<T>(),
            copyable: T::CLONE.is_some(),
            contains: contains::<T>,
            copy: copy::<T>,
            copy_to: copy_to::<T>,
            move_to: move_to::<T>,
            destroy: destroy::<T>,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn is_copyable(&self) -> bool {
        self.copyable
    }

    /// Does `entity` carry this component?
    #[inline]
    pub fn contains(&self, container: &Container, entity: Entity) -> bool {
        (self.contains)(container, entity)
    }

    /// Copy this component from `source` to `target` within one container.
    #[inline]
    pub fn copy(&self, container: &mut Container, source: Entity, target: Entity) -> Result<()> {
        (self.copy)(container, source, target)
    }

    /// Copy this component from `source` in one container to `target` in another.
    #[inline]
    pub fn copy_to(
        &self,
        from: &Container,
        source: Entity,
        to: &mut Container,
        target: Entity,
    ) -> Result<()> {
        (self.copy_to)(from, source, to, target)
    }

    /// Move this component from `source` in one container to `target` in another.
    #[inline]
    pub fn move_to(&self, from: &mut Container, source: Entity, to: &mut Container, target: Entity) {
        (self.move_to)(from, source, to, target)
    }

    /// Destroy this component on `entity`. Returns `false` if there was none.
    #[inline]
    pub fn destroy(&self, container: &mut Container, entity: Entity) -> bool {
        (self.destroy)(container, entity)
    }
}

impl std::fmt::Debug for ComponentOps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentOps")
            .field("name", &self.name)
            .field("copyable", &self.copyable)
            .finish()
    }
}

fn contains<T: Component>(container: &Container, entity: Entity) -> bool {
    container.has::<T>(entity)
}

fn copy<T: Component>(container: &mut Container, source: Entity, target: Entity) -> Result<()> {
    container.copy_component::<T>(source, target).map(drop)
}

fn copy_to<T: Component>(
    from: &Container,
    source: Entity,
    to: &mut Container,
    target: Entity,
) -> Result<()> {
    to.copy_component_from::<T>(from, source, target).map(drop)
}

fn move_to<T: Component>(from: &mut Container, source: Entity, to: &mut Container, target: Entity) {
    to.move_component_from::<T>(from, source, target);
}

fn destroy<T: Component>(container: &mut Container, entity: Entity) -> bool {
    container.destroy_component::<T>(entity)
}

/// The operations of every component type a container has stored, indexed by [`TypeId`].
#[derive(Debug, Default)]
pub struct OpsTable {
    ops: Vec<Option<ComponentOps>>,
}

impl OpsTable {
    /// Record the operations for `T` under `id`. Returns `true` the first time.
    pub fn register<T: Component>(&mut self, id: TypeId) -> bool {
        let index = id.index();
        if index >= self.ops.len() {
            self.ops.resize(index + 1, None);
        }
        if self.ops[index].is_some() {
            return false;
        }
        self.ops[index] = Some(ComponentOps::of::<T>());
        true
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> Option<ComponentOps> {
        self.ops.get(id.index()).copied().flatten()
    }

    /// Number of slots in the table, registered or not. Walk `0..slots()` with
    /// [`at`](Self::at) to visit every registered type while the container is borrowed mutably.
    #[inline]
    pub fn slots(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    pub fn at(&self, index: usize) -> Option<ComponentOps> {
        self.ops.get(index).copied().flatten()
    }

    /// Iterate the registered operations.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentOps> {
        self.ops.iter().flatten()
    }

    /// Number of registered component types.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
