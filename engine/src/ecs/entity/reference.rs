use crate::ecs::{
    Container,
    component::{Component, ComponentHandle},
    entity::Entity,
    error::Result,
};

/// A reference to a live entity with read-only access to its components.
/// The lifetime `'c` ties the reference to the borrow of the owning [`Container`].
#[derive(Clone, Copy)]
pub struct EntityRef<'c> {
    /// The entity this reference points to.
    entity: Entity,
    /// The container that owns the entity.
    container: &'c Container,
}

impl<'c> EntityRef<'c> {
    #[inline]
    pub(crate) const fn new(entity: Entity, container: &'c Container) -> Self {
        Self { entity, container }
    }

    /// Get the entity this reference points to.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Get a reference to a component on this entity.
    /// Returns `None` if the component is not present on the entity.
    #[inline]
    pub fn get<T: Component>(&self) -> Option<&'c T> {
        self.container.get::<T>(self.entity)
    }

    /// Does this entity carry a `T`?
    #[inline]
    pub fn has<T: Component>(&self) -> bool {
        self.container.has::<T>(self.entity)
    }

    /// Get a handle to the `T` component of this entity.
    #[inline]
    pub fn component<T: Component>(&self) -> Option<ComponentHandle<T>> {
        self.container.component::<T>(self.entity)
    }

    /// Copy this entity into another container.
    pub fn copy_to(&self, target: &mut Container) -> Result<Entity> {
        self.container.copy_to(self.entity, target)
    }
}

/// A reference to a live entity with full access to its components.
/// The lifetime `'c` ties the reference to the exclusive borrow of the owning [`Container`].
pub struct EntityMut<'c> {
    /// The entity this reference points to.
    entity: Entity,
    /// The container that owns the entity.
    container: &'c mut Container,
}

impl<'c> EntityMut<'c> {
    #[inline]
    pub(crate) fn new(entity: Entity, container: &'c mut Container) -> Self {
        Self { entity, container }
    }

    /// Get the entity this reference points to.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Get a reference to a component on this entity.
    /// Returns `None` if the component is not present on the entity.
    #[inline]
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.container.get::<T>(self.entity)
    }

    /// Get a mutable reference to a component on this entity.
    /// Returns `None` if the component is not present on the entity.
    #[inline]
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.container.get_mut::<T>(self.entity)
    }

    /// Does this entity carry a `T`?
    #[inline]
    pub fn has<T: Component>(&self) -> bool {
        self.container.has::<T>(self.entity)
    }

    /// Get a handle to the `T` component of this entity.
    #[inline]
    pub fn component<T: Component>(&self) -> Option<ComponentHandle<T>> {
        self.container.component::<T>(self.entity)
    }

    /// Attach `value`, replacing any existing `T`.
    pub fn create_component<T: Component>(&mut self, value: T) -> ComponentHandle<T> {
        self.container.create_component(self.entity, value)
    }

    /// Get the existing `T` or attach a default one.
    pub fn ensure_component<T: Component + Default>(&mut self) -> ComponentHandle<T> {
        self.container.ensure_component::<T>(self.entity)
    }

    /// Destroy the `T` of this entity. Returns `false` if there was none.
    pub fn destroy_component<T: Component>(&mut self) -> bool {
        self.container.destroy_component::<T>(self.entity)
    }

    /// Detach the `T` of this entity and return it.
    pub fn remove_component<T: Component>(&mut self) -> Option<T> {
        self.container.remove_component::<T>(self.entity)
    }

    /// Copy this entity within its container.
    pub fn copy(&mut self) -> Result<Entity> {
        self.container.copy(self.entity)
    }

    /// Copy this entity into another container.
    pub fn copy_to(&self, target: &mut Container) -> Result<Entity> {
        self.container.copy_to(self.entity, target)
    }

    /// Move this entity into another container, destroying it here.
    pub fn move_to(self, target: &mut Container) -> Entity {
        self.container.move_to(self.entity, target)
    }

    /// Destroy this entity.
    pub fn destroy(self) -> bool {
        self.container.destroy(self.entity)
    }

    /// Downgrade to a read-only reference.
    #[inline]
    pub fn as_readonly(&self) -> EntityRef<'_> {
        EntityRef::new(self.entity, &*self.container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::error::Error;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Position {
        x: f32,
        y: f32,
    }

    impl Component for Position {
        const CLONE: Option<fn(&Self) -> Self> = Some(Self::clone);
    }

    #[derive(Debug, PartialEq)]
    struct Health {
        hp: i32,
    }

    impl Component for Health {}

    #[test]
    fn entity_ref_reads_components() {
        // Given
        let mut container = Container::new();
        let entity = container.create_with((Position { x: 1.0, y: 2.0 },));

        // When
        let entity_ref = container.entity(entity).unwrap();

        // Then
        assert_eq!(entity_ref.entity(), entity);
        assert_eq!(entity_ref.get::<Position>(), Some(&Position { x: 1.0, y: 2.0 }));
        assert!(entity_ref.get::<Health>().is_none());
        assert!(entity_ref.has::<Position>());
        assert!(entity_ref.component::<Health>().is_none());
    }

    #[test]
    fn entity_mut_edits_components() {
        // Given
        let mut container = Container::new();
        let entity = container.create();

        // When
        let mut entity_mut = container.entity_mut(entity).unwrap();
        entity_mut.create_component(Health { hp: 10 });
        entity_mut.get_mut::<Health>().unwrap().hp -= 3;
        entity_mut.ensure_component::<Position>();

        // Then
        assert_eq!(entity_mut.get::<Health>(), Some(&Health { hp: 7 }));
        assert_eq!(entity_mut.as_readonly().get::<Position>(), Some(&Position::default()));
        assert_eq!(entity_mut.remove_component::<Health>(), Some(Health { hp: 7 }));
        assert!(entity_mut.destroy_component::<Position>());
        assert!(!entity_mut.has::<Position>());
    }

    #[test]
    fn entity_mut_copy_reports_uncopyable() {
        let mut container = Container::new();
        let entity = container.create_with((Health { hp: 1 },));

        let result = container.entity_mut(entity).unwrap().copy();

        assert!(matches!(result, Err(Error::Uncopyable { .. })));
    }

    #[test]
    fn entity_mut_move_and_destroy() {
        // Given
        let mut source = Container::new();
        let mut target = Container::new();
        let a = source.create_with((Position { x: 3.0, y: 4.0 },));
        let b = source.create();

        // When
        let moved = source.entity_mut(a).unwrap().move_to(&mut target);

        // Then
        assert!(!source.is_alive(a));
        assert_eq!(target.get::<Position>(moved), Some(&Position { x: 3.0, y: 4.0 }));
        assert!(source.entity_mut(b).unwrap().destroy());
        assert!(source.entity(b).is_none());
    }
}
