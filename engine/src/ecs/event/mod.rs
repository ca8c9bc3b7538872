//! Synchronous, type-keyed events.
//!
//! Every container owns a [`Broker`] holding one [`Signal`] per event type. Handlers are connected
//! with [`Container::connect`](crate::ecs::Container::connect) and receive the container read-only
//! alongside the event:
//!
//! ```rust,ignore
//! let connection = container.connect(|container: &Container, event: &AfterDestroy<Health>| {
//!     // The value is still stored while destroy handlers run.
//!     let last = container.resolve(event.component);
//! });
//! ```
//!
//! The container fires the lifecycle events below around every component change. Any other type
//! implementing [`Event`] can be broadcast with [`Container::emit`](crate::ecs::Container::emit).
//!
//! | Event | When |
//! |---|---|
//! | [`BeforeCreate<T>`] | Before a `T` is stored (including replacement, copy and move in). |
//! | [`AfterCreate<T>`] | After a `T` is stored and its `on_create`/`on_copy`/`on_move` hook ran. |
//! | [`AfterDestroy<T>`] | Before a `T` is erased, removed or moved out. The value is still readable. |

pub mod broker;
pub mod signal;
pub mod subscriber;

use std::{fmt, marker::PhantomData};

use crate::ecs::{
    component::{Component, ComponentHandle},
    entity::Entity,
};

pub use broker::Broker;
pub use signal::{Connection, Signal, Subscription};
pub use subscriber::{LifecycleSubscriber, Subscriber};

/// Marker trait for event types.
///
/// Events must be `'static`: no borrowed data. They are passed to handlers by reference and are
/// never stored.
pub trait Event: 'static {}

/// A `T` is about to be stored on `entity`.
pub struct BeforeCreate<T> {
    pub entity: Entity,
    _marker: PhantomData<fn() -> T>,
}

impl<T> BeforeCreate<T> {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            _marker: PhantomData,
        }
    }
}

/// A `T` was stored on `entity`.
pub struct AfterCreate<T> {
    pub entity: Entity,
    pub component: ComponentHandle<T>,
}

/// The `T` of `entity` is about to go away. It can still be resolved through `component`.
pub struct AfterDestroy<T> {
    pub entity: Entity,
    pub component: ComponentHandle<T>,
}

impl<T: Component> Event for BeforeCreate<T> {}
impl<T: Component> Event for AfterCreate<T> {}
impl<T: Component> Event for AfterDestroy<T> {}

macro_rules! lifecycle_traits {
    ($($event:ident),*) => {$(
        impl<T> Clone for $event<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $event<T> {}

        impl<T> fmt::Debug for $event<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($event))
                    .field("type", &std::any::type_name::<T>())
                    .field("entity", &self.entity)
                    .finish()
            }
        }
    )*};
}

lifecycle_traits!(BeforeCreate, AfterCreate, AfterDestroy);
