//! The container is the owner of entities and their components.
//!
//! A `Container` allocates entity slots, stores components in per-type columns, dispatches
//! whole-entity operations through a per-type operation table and broadcasts lifecycle events.
//!
//! # Architecture
//!
//! The container coordinates several subsystems:
//! - **Slot Allocator**: Hands out entity indices and versions, recycling freed slots
//! - **Type Index**: Assigns every component and event type a dense id for this container
//! - **Column Registry**: One [`Column`](crate::ecs::storage::Column) per component type
//! - **Operation Table**: A [`ComponentOps`](crate::ecs::component::ComponentOps) per component
//!   type, used to destroy, copy or move an entity without knowing its types
//! - **Broker**: One signal per event type
//!
//! # Example
//!
//! ```rust,ignore
//! use rusty_ecs::ecs::{Component, Container};
//!
//! #[derive(Component, Clone)]
//! #[component(clone)]
//! struct Position { x: f32, y: f32 }
//!
//! let mut container = Container::new();
//!
//! let e0 = container.create_with((Position { x: 0.0, y: 0.0 },));
//! let e1 = container.copy(e0)?;
//! container.get_mut::<Position>(e1).unwrap().x = 5.0;
//!
//! container.destroy(e0);
//! for row in container.entities().need::<Position>() {
//!     assert_eq!(row.entity(), e1);
//! }
//! ```
//!
//! # Validity
//!
//! Operations that read (`get`, `has`, `component`, `resolve`) return `None`/`false` for stale or
//! foreign entities. Operations that write to a specific entity panic on them; passing a dead entity
//! is a programming error. `destroy` and `destroy_component` are the exception: they are idempotent
//! and report whether they did anything.

pub mod type_index;

use std::{
    any::type_name,
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
    sync::atomic::{AtomicU32, Ordering},
};

use log::{debug, trace, warn};

use crate::ecs::{
    component::{Bundle, Component, ComponentHandle, ops::OpsTable},
    entity::{self, Entity, EntityMut, EntityRef},
    error::{Error, Result},
    event::{
        AfterCreate, AfterDestroy, BeforeCreate, Broker, Connection, Event, LifecycleSubscriber,
        Subscriber, Subscription,
    },
    query::{Query, Source},
    storage::{Column, ErasedColumn, GrowthStrategy, Registry},
};

pub use type_index::{TypeId, TypeIndex, TypeInfo};

/// A container identifier. Unique within the process, never zero for a real container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// The id of no container, used by [`Entity::NULL`].
    pub const NONE: Self = Self(0);

    /// Allocate a fresh process-unique id.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        let id = NEXT.fetch_add(1, Ordering::Relaxed);
        assert!(id != 0, "container ids exhausted");
        Self(id)
    }

    /// Get the raw identifier value.
    #[inline]
    pub const fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container#{}", self.0)
    }
}

/// Construction options for a [`Container`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Entity slots to reserve up front.
    pub initial_capacity: usize,

    /// How component columns grow when an index past their capacity is written.
    pub growth: GrowthStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            growth: GrowthStrategy::Ratio(3, 2),
        }
    }
}

/// Owner of entities, their components and their events.
pub struct Container {
    /// The container's unique identifier.
    id: Id,

    /// The options the container was built with.
    config: Config,

    /// Entity slot allocation and versions.
    slots: entity::Allocator,

    /// Dense ids for every component and event type used with this container.
    types: TypeIndex,

    /// Component columns by type id.
    columns: Registry,

    /// Per-type operations by type id, for every component type ever stored.
    ops: OpsTable,

    /// Event signals by type id.
    events: Broker,
}

impl Container {
    /// Construct an empty container with the default [`Config`].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Construct an empty container with room for `capacity` entities.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(Config {
            initial_capacity: capacity,
            ..Config::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            id: Id::next(),
            config,
            slots: entity::Allocator::with_capacity(config.initial_capacity),
            types: TypeIndex::new(),
            columns: Registry::new(config.growth),
            ops: OpsTable::default(),
            events: Broker::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The type ids assigned by this container.
    #[inline]
    pub fn types(&self) -> &TypeIndex {
        &self.types
    }

    // ---------------------------------------------------------------------------------------------
    // Entities
    // ---------------------------------------------------------------------------------------------

    /// Create an entity with no components.
    pub fn create(&mut self) -> Entity {
        let (index, version) = self.slots.alloc();
        let entity = Entity::new(self.id, index, version);
        trace!("created {:?}", entity);
        entity
    }

    /// Create an entity carrying every component of `bundle`.
    pub fn create_with<B: Bundle>(&mut self, bundle: B) -> Entity {
        let entity = self.create();
        bundle.attach(self, entity);
        entity
    }

    /// Create an entity carrying a default value of every component in `B`.
    pub fn create_default<B: Bundle + Default>(&mut self) -> Entity {
        self.create_with(B::default())
    }

    /// Destroy `entity` and every component it carries.
    ///
    /// Returns `false` and does nothing if the entity is not alive in this container.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        for index in 0..self.ops.slots() {
            if let Some(ops) = self.ops.at(index) {
                ops.destroy(self, entity);
            }
        }
        self.slots.free(entity.index(), entity.version());
        trace!("destroyed {:?}", entity);
        true
    }

    /// Is `entity` a live entity of this container?
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        entity.container() == self.id && self.slots.is_current(entity.index(), entity.version())
    }

    /// The live entity at slot `index`, if any.
    #[inline]
    pub fn entity_at(&self, index: usize) -> Option<Entity> {
        let version = self.slots.version(index);
        version
            .exists()
            .then(|| Entity::new(self.id, index, version))
    }

    /// Number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of entity slots ever allocated. Queries walk `0..capacity()`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Borrow a live entity read-only.
    pub fn entity(&self, entity: Entity) -> Option<EntityRef<'_>> {
        self.is_alive(entity).then(|| EntityRef::new(entity, self))
    }

    /// Borrow a live entity for modification.
    pub fn entity_mut(&mut self, entity: Entity) -> Option<EntityMut<'_>> {
        if !self.is_alive(entity) {
            return None;
        }
        Some(EntityMut::new(entity, self))
    }

    #[track_caller]
    fn assert_alive(&self, entity: Entity, operation: &str) {
        assert!(
            entity.container() == self.id,
            "{operation}: {entity:?} does not belong to {}",
            self.id
        );
        assert!(
            self.slots.is_current(entity.index(), entity.version()),
            "{operation}: {entity:?} is not alive"
        );
    }

    // ---------------------------------------------------------------------------------------------
    // Component access
    // ---------------------------------------------------------------------------------------------

    /// The column holding every `T`, if any `T` was ever stored.
    #[inline]
    pub(crate) fn column<T: Component>(&self) -> Option<&Column<T>> {
        self.columns.get::<T>(self.types.get::<T>()?)
    }

    #[inline]
    pub(crate) fn erased_column(&self, id: TypeId) -> Option<&dyn ErasedColumn> {
        self.columns.erased(id)
    }

    /// Does `entity` carry a `T`? `false` for dead entities.
    #[inline]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.is_alive(entity)
            && self
                .column::<T>()
                .is_some_and(|column| column.contains_version(entity.index(), entity.version()))
    }

    /// Get a handle to the `T` of `entity`, if it has one.
    #[inline]
    pub fn component<T: Component>(&self, entity: Entity) -> Option<ComponentHandle<T>> {
        self.has::<T>(entity).then(|| ComponentHandle::new(entity))
    }

    /// Get the `T` of `entity`.
    #[inline]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.is_alive(entity) {
            return None;
        }
        self.column::<T>()?.get(entity.index())
    }

    /// Get the `T` of `entity` mutably.
    #[inline]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.is_alive(entity) {
            return None;
        }
        let id = self.types.get::<T>()?;
        self.columns.get_mut::<T>(id)?.get_mut(entity.index())
    }

    /// Get the component a handle points to, if the handle is still valid.
    pub fn resolve<T: Component>(&self, handle: ComponentHandle<T>) -> Option<&T> {
        let entity = handle.entity();
        if !self.is_alive(entity) {
            return None;
        }
        let column = self.column::<T>()?;
        if !column.contains_version(handle.index(), handle.version()) {
            return None;
        }
        column.get(handle.index())
    }

    /// Get the component a handle points to mutably, if the handle is still valid.
    pub fn resolve_mut<T: Component>(&mut self, handle: ComponentHandle<T>) -> Option<&mut T> {
        if !self.is_alive(handle.entity()) {
            return None;
        }
        let id = self.types.get::<T>()?;
        let column = self.columns.get_mut::<T>(id)?;
        if !column.contains_version(handle.index(), handle.version()) {
            return None;
        }
        column.get_mut(handle.index())
    }

    // ---------------------------------------------------------------------------------------------
    // Component lifecycle
    // ---------------------------------------------------------------------------------------------

    /// Dense id of `T`, recording its operations the first time it is stored.
    fn register<T: Component>(&mut self) -> TypeId {
        let id = self.types.register::<T>();
        if self.ops.register::<T>(id) {
            debug!("{} registered component {} as {}", self.id, type_name::<T>(), id);
        }
        id
    }

    /// Store `value` on `entity`, run `hook` on it and announce it.
    fn attach<T: Component>(
        &mut self,
        entity: Entity,
        value: T,
        hook: impl FnOnce(&mut T),
    ) -> ComponentHandle<T> {
        let id = self.register::<T>();
        self.emit(&BeforeCreate::<T>::new(entity));
        let stored = self
            .columns
            .get_or_insert::<T>(id)
            .emplace(entity.index(), entity.version(), value);
        hook(stored);
        trace!("attached {} to {:?}", type_name::<T>(), entity);
        self.created(entity)
    }

    fn created<T: Component>(&self, entity: Entity) -> ComponentHandle<T> {
        let component = ComponentHandle::new(entity);
        self.emit(&AfterCreate { entity, component });
        component
    }

    fn destroying<T: Component>(&self, entity: Entity) {
        self.emit(&AfterDestroy {
            entity,
            component: ComponentHandle::<T>::new(entity),
        });
    }

    /// Attach `value` to `entity`, replacing (and dropping) any `T` it already carries.
    ///
    /// Fires [`BeforeCreate<T>`], runs [`Component::on_create`], then fires [`AfterCreate<T>`].
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not alive in this container.
    #[track_caller]
    pub fn create_component<T: Component>(&mut self, entity: Entity, value: T) -> ComponentHandle<T> {
        self.assert_alive(entity, "create_component");
        self.attach(entity, value, |stored| stored.on_create(entity))
    }

    /// Get the `T` of `entity`, attaching `T::default()` first if it has none.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not alive in this container.
    #[track_caller]
    pub fn ensure_component<T: Component + Default>(&mut self, entity: Entity) -> ComponentHandle<T> {
        self.assert_alive(entity, "ensure_component");
        match self.component::<T>(entity) {
            Some(handle) => handle,
            None => self.create_component(entity, T::default()),
        }
    }

    /// Destroy the `T` of `entity`.
    ///
    /// Runs [`Component::on_destroy`], fires [`AfterDestroy<T>`] while the value is still stored,
    /// then drops it. Returns `false` if the entity had no `T`, so repeated calls are harmless.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not alive in this container.
    #[track_caller]
    pub fn destroy_component<T: Component>(&mut self, entity: Entity) -> bool {
        self.assert_alive(entity, "destroy_component");
        let Some(id) = self.types.get::<T>() else {
            return false;
        };
        let Some(value) = self
            .columns
            .get_mut::<T>(id)
            .and_then(|column| column.get_mut(entity.index()))
        else {
            return false;
        };
        value.on_destroy(entity);
        self.destroying::<T>(entity);
        if let Some(column) = self.columns.get_mut::<T>(id) {
            column.erase(entity.index());
        }
        trace!("destroyed {} on {:?}", type_name::<T>(), entity);
        true
    }

    /// Detach the `T` of `entity` and hand it back.
    ///
    /// Fires [`AfterDestroy<T>`] while the value is still stored. The value is not dropped, so
    /// [`Component::on_destroy`] does not run.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not alive in this container.
    #[track_caller]
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.assert_alive(entity, "remove_component");
        if !self.has::<T>(entity) {
            return None;
        }
        self.destroying::<T>(entity);
        let id = self.types.get::<T>()?;
        let value = self.columns.get_mut::<T>(id)?.take(entity.index());
        trace!("removed {} from {:?}", type_name::<T>(), entity);
        value
    }

    /// Copy the `T` of `source` onto `target`, both in this container.
    ///
    /// Returns `Ok(None)` if `source` has no `T`. Copying into a slot past the column's capacity is
    /// safe: the source value is cloned before the column grows.
    ///
    /// # Panics
    ///
    /// Panics if either entity is not alive in this container.
    #[track_caller]
    pub fn copy_component<T: Component>(
        &mut self,
        source: Entity,
        target: Entity,
    ) -> Result<Option<ComponentHandle<T>>> {
        self.assert_alive(source, "copy_component");
        self.assert_alive(target, "copy_component");
        if !self.has::<T>(source) {
            return Ok(None);
        }
        let clone = T::CLONE.ok_or(Error::Uncopyable {
            component: type_name::<T>(),
        })?;
        let id = self.register::<T>();
        self.emit(&BeforeCreate::<T>::new(target));
        if let Some(copy) = self.columns.get_or_insert::<T>(id).duplicate_within(
            source.index(),
            target.index(),
            target.version(),
            clone,
        ) {
            copy.on_copy(source, target);
        }
        trace!("copied {} from {:?} to {:?}", type_name::<T>(), source, target);
        Ok(Some(self.created(target)))
    }

    /// Move the `T` of `source` onto `target`, both in this container.
    ///
    /// Fires [`AfterDestroy<T>`] for `source` before the move and the create events for `target`
    /// after it. Returns `None` if `source` has no `T`.
    ///
    /// # Panics
    ///
    /// Panics if either entity is not alive in this container.
    #[track_caller]
    pub fn move_component<T: Component>(
        &mut self,
        source: Entity,
        target: Entity,
    ) -> Option<ComponentHandle<T>> {
        self.assert_alive(source, "move_component");
        self.assert_alive(target, "move_component");
        if !self.has::<T>(source) {
            return None;
        }
        if source == target {
            return self.component::<T>(source);
        }
        let id = self.register::<T>();
        self.destroying::<T>(source);
        self.emit(&BeforeCreate::<T>::new(target));
        if let Some(moved) =
            self.columns
                .get_or_insert::<T>(id)
                .move_within(source.index(), target.index(), target.version())
        {
            moved.on_move(source, target);
        }
        trace!("moved {} from {:?} to {:?}", type_name::<T>(), source, target);
        Some(self.created(target))
    }

    /// Copy the `T` of `source` in `from` onto `target` in this container.
    ///
    /// # Panics
    ///
    /// Panics if `source` is not alive in `from` or `target` is not alive here.
    #[track_caller]
    pub fn copy_component_from<T: Component>(
        &mut self,
        from: &Container,
        source: Entity,
        target: Entity,
    ) -> Result<Option<ComponentHandle<T>>> {
        from.assert_alive(source, "copy_component_from");
        self.assert_alive(target, "copy_component_from");
        let Some(value) = from.get::<T>(source) else {
            return Ok(None);
        };
        let clone = T::CLONE.ok_or(Error::Uncopyable {
            component: type_name::<T>(),
        })?;
        let copy = clone(value);
        Ok(Some(self.attach(target, copy, |stored| {
            stored.on_copy(source, target)
        })))
    }

    /// Move the `T` of `source` in `from` onto `target` in this container.
    ///
    /// `from` fires [`AfterDestroy<T>`] first, then this container fires the create events.
    ///
    /// # Panics
    ///
    /// Panics if `source` is not alive in `from` or `target` is not alive here.
    #[track_caller]
    pub fn move_component_from<T: Component>(
        &mut self,
        from: &mut Container,
        source: Entity,
        target: Entity,
    ) -> Option<ComponentHandle<T>> {
        from.assert_alive(source, "move_component_from");
        self.assert_alive(target, "move_component_from");
        let value = from.remove_component::<T>(source)?;
        Some(self.attach(target, value, |stored| stored.on_move(source, target)))
    }

    // ---------------------------------------------------------------------------------------------
    // Whole-entity transfer
    // ---------------------------------------------------------------------------------------------

    /// Fail if `entity` carries a component that cannot be copied.
    fn check_copyable(&self, entity: Entity) -> Result<()> {
        match self
            .ops
            .iter()
            .find(|ops| !ops.is_copyable() && ops.contains(self, entity))
        {
            Some(ops) => Err(Error::Uncopyable {
                component: ops.name(),
            }),
            None => Ok(()),
        }
    }

    /// Create a new entity in this container carrying a copy of every component of `entity`.
    ///
    /// Fails with [`Error::Uncopyable`] before creating anything if any component of `entity` did
    /// not opt into copying.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not alive in this container.
    #[track_caller]
    pub fn copy(&mut self, entity: Entity) -> Result<Entity> {
        self.assert_alive(entity, "copy");
        self.check_copyable(entity)?;
        let copy = self.create();
        for index in 0..self.ops.slots() {
            if let Some(ops) = self.ops.at(index) {
                ops.copy(self, entity, copy)?;
            }
        }
        debug!("copied {:?} to {:?}", entity, copy);
        Ok(copy)
    }

    /// Create a new entity in `target` carrying a copy of every component of `entity`.
    ///
    /// Component types `target` has never seen get their columns and operations there on first
    /// use. Fails with [`Error::Uncopyable`] before creating anything if any component of `entity`
    /// did not opt into copying.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not alive in this container.
    #[track_caller]
    pub fn copy_to(&self, entity: Entity, target: &mut Container) -> Result<Entity> {
        self.assert_alive(entity, "copy_to");
        self.check_copyable(entity)?;
        let copy = target.create();
        for ops in self.ops.iter() {
            ops.copy_to(self, entity, target, copy)?;
        }
        debug!("copied {:?} to {:?}", entity, copy);
        Ok(copy)
    }

    /// Move `entity` with all of its components into `target`, destroying it here.
    ///
    /// Components are moved, not cloned, so every component type can be moved. For each component
    /// this container fires [`AfterDestroy<T>`] before `target` fires its create events.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not alive in this container.
    #[track_caller]
    pub fn move_to(&mut self, entity: Entity, target: &mut Container) -> Entity {
        self.assert_alive(entity, "move_to");
        let moved = target.create();
        for index in 0..self.ops.slots() {
            if let Some(ops) = self.ops.at(index) {
                ops.move_to(self, entity, target, moved);
            }
        }
        self.destroy(entity);
        debug!("moved {:?} to {:?}", entity, moved);
        moved
    }

    // ---------------------------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------------------------

    /// Query every live entity. Narrow it with `need`, `skip` and `load`.
    pub fn entities(&self) -> Query<'_> {
        Query::new(self, Source::Slots)
    }

    /// Query the live entities of this container among `entities`, in list order.
    pub fn filter<'c>(&'c self, entities: &'c [Entity]) -> Query<'c> {
        Query::new(self, Source::List(entities))
    }

    // ---------------------------------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------------------------------

    /// Connect a handler for events of type `E`.
    ///
    /// The handler stays connected until the returned [`Connection`] is dropped.
    pub fn connect<E: Event>(&self, handler: impl Fn(&Container, &E) + 'static) -> Connection {
        let id = self.types.register::<E>();
        trace!("{} connected handler for {}", self.id, type_name::<E>());
        self.events.signal::<E>(id).connect(handler)
    }

    /// Connect a handler for events of type `E` that stays connected until it returns `false`.
    pub fn connect_while<E: Event>(
        &self,
        handler: impl Fn(&Container, &E) -> bool + 'static,
    ) -> Connection {
        let id = self.types.register::<E>();
        trace!("{} connected handler for {}", self.id, type_name::<E>());
        self.events.signal::<E>(id).connect_while(handler)
    }

    /// Deliver events of type `E` to `subscriber`.
    ///
    /// Only a weak reference is kept. Once the subscriber is dropped, its handler disconnects itself
    /// at the next emission, even if the returned connection was detached.
    pub fn subscribe<E: Event, S: Subscriber<E>>(&self, subscriber: &Rc<RefCell<S>>) -> Connection {
        let subscriber = Rc::downgrade(subscriber);
        self.connect_while(move |container, event: &E| {
            deliver::<E, S>(&subscriber, |s| s.receive(container, event))
        })
    }

    /// Deliver the lifecycle events of `T` to `subscriber`.
    pub fn subscribe_lifecycle<T: Component, S: LifecycleSubscriber<T>>(
        &self,
        subscriber: &Rc<RefCell<S>>,
    ) -> Subscription {
        let on_create = Rc::downgrade(subscriber);
        let on_destroy = on_create.clone();
        [
            self.connect_while(move |container, event: &AfterCreate<T>| {
                deliver::<AfterCreate<T>, S>(&on_create, |s| s.on_create(container, event))
            }),
            self.connect_while(move |container, event: &AfterDestroy<T>| {
                deliver::<AfterDestroy<T>, S>(&on_destroy, |s| s.on_destroy(container, event))
            }),
        ]
        .into_iter()
        .collect()
    }

    /// Send `event` to every handler of `E`, synchronously and in connection order.
    pub fn emit<E: Event>(&self, event: &E) {
        if let Some(id) = self.types.get::<E>() {
            self.events.emit(id, self, event);
        }
    }

    /// Number of handlers connected for `E`.
    pub fn handlers<E: Event>(&self) -> usize {
        self.types
            .get::<E>()
            .map_or(0, |id| self.events.connected::<E>(id))
    }
}

/// Run `f` on a weakly held subscriber, skipping it if it is already receiving.
///
/// Returns `false` once the subscriber is gone, which disconnects its handler.
fn deliver<E, S>(subscriber: &Weak<RefCell<S>>, f: impl FnOnce(&mut S)) -> bool {
    let Some(subscriber) = subscriber.upgrade() else {
        trace!("subscriber for {} was dropped, disconnecting", type_name::<E>());
        return false;
    };
    match subscriber.try_borrow_mut() {
        Ok(mut subscriber) => f(&mut subscriber),
        Err(_) => warn!("subscriber for {} is busy, event skipped", type_name::<E>()),
    }
    true
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.id)
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("components", &self.ops.len())
            .field("types", &self.types)
            .finish()
    }
}
