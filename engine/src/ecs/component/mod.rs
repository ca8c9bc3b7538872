//! Component types and handles.
//!
//! Components are the data attached to entities. Any `'static` type can be a component by
//! implementing [`Component`], usually through `#[derive(Component)]`:
//!
//! ```rust,ignore
//! use rusty_ecs::ecs::Component;
//!
//! #[derive(Component, Clone)]
//! #[component(clone)]
//! struct Position { x: f32, y: f32 }
//!
//! #[derive(Component)]
//! struct Socket(std::net::TcpStream); // Not copyable
//! ```
//!
//! ## Copying
//!
//! A container copies an entity by copying each of its components. Rust has no way to ask "is this
//! type `Clone`?" at runtime, so a component opts in by setting [`Component::CLONE`]
//! (`#[component(clone)]` does this). Copying an entity that carries a component without it fails
//! with [`Error::Uncopyable`](crate::ecs::error::Error::Uncopyable) before anything is created.
//!
//! ## Hooks
//!
//! The provided `on_*` methods run on the component value itself at the matching step of its
//! lifecycle. They follow the value: a moved component sees `on_move` in its new home and never
//! `on_destroy` in its old one.
//!
//! ## Handles
//!
//! [`ComponentHandle<T>`] names "the `T` of this entity" by slot index and version. It holds no
//! reference, so it stays usable across column growth, and is checked against the container every
//! time it is resolved.

mod bundle;
pub(crate) mod ops;

use std::{fmt, hash, marker::PhantomData};

use crate::ecs::{
    container,
    entity::{Entity, Version},
};

pub use bundle::Bundle;
pub use ops::ComponentOps;

/// A trait representing a component in the ECS.
pub trait Component: 'static + Sized {
    /// How to duplicate this component when its entity is copied. `None` marks the component as
    /// uncopyable.
    const CLONE: Option<fn(&Self) -> Self> = None;

    /// Called after the component is stored on `entity`.
    fn on_create(&mut self, _entity: Entity) {}

    /// Called before the component is dropped from `entity`.
    fn on_destroy(&mut self, _entity: Entity) {}

    /// Called on a copy after it is stored on `target`.
    fn on_copy(&mut self, _source: Entity, _target: Entity) {}

    /// Called after the component is moved from `source` and stored on `target`.
    fn on_move(&mut self, _source: Entity, _target: Entity) {}
}

/// A non-owning handle to the `T` component of an entity.
///
/// Resolve it with [`Container::resolve`](crate::ecs::Container::resolve). A handle names the
/// `T` of one entity, not one particular value:
/// - destroying the entity invalidates it for good, even once the slot is reused
/// - destroying only the component makes it resolve to `None` until a new `T` is attached to the
///   same entity, after which it resolves to that new value
pub struct ComponentHandle<T> {
    container: container::Id,
    index: usize,
    version: Version,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ComponentHandle<T> {
    #[inline]
    pub(crate) fn new(entity: Entity) -> Self {
        Self {
            container: entity.container(),
            index: entity.index(),
            version: entity.version(),
            _marker: PhantomData,
        }
    }

    /// The entity that owns the component.
    #[inline]
    pub fn entity(&self) -> Entity {
        Entity::new(self.container, self.index, self.version)
    }

    #[inline]
    pub fn container(&self) -> container::Id {
        self.container
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }
}

impl<T> Clone for ComponentHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentHandle<T> {}

impl<T> PartialEq for ComponentHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.container == other.container
            && self.index == other.index
            && self.version == other.version
    }
}

impl<T> Eq for ComponentHandle<T> {}

impl<T> hash::Hash for ComponentHandle<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.container.hash(state);
        self.index.hash(state);
        self.version.hash(state);
    }
}

impl<T> fmt::Debug for ComponentHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHandle")
            .field("type", &std::any::type_name::<T>())
            .field("container", &self.container)
            .field("index", &self.index)
            .field("version", &self.version)
            .finish()
    }
}
