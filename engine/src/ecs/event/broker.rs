//! Per-container registry of event signals.
//!
//! This module provides [`Broker`], which owns one [`Signal`] per event type for a container.
//!
//! # Type Erasure
//!
//! Signals are stored as `Box<dyn Any>` in a flat `Vec` indexed by the container's dense
//! [`TypeId`] for the event type, the same indexing used for component columns. Typed accessors
//! downcast back to `Signal<E, Container>`.
//!
//! # Re-entrancy
//!
//! The broker sits behind a `RefCell` so it can be used through `&Container`. No borrow is held while
//! handlers run: [`emit`](Broker::emit) clones the signal handle out first, so handlers are free to
//! connect new handlers or emit further events.

use std::{any::Any, cell::RefCell};

use crate::ecs::{
    Container,
    container::TypeId,
    event::{Event, Signal},
};

/// The event signals of one container, indexed by event [`TypeId`].
#[derive(Default)]
pub struct Broker {
    /// Type-erased `Signal<E, Container>` per event type id.
    signals: RefCell<Vec<Option<Box<dyn Any>>>>,
}

impl Broker {
    /// Creates a new, empty event broker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the signal for `E` stored under `id`, creating it on first use.
    ///
    /// # Panics
    ///
    /// Panics if a signal of another event type is stored under `id`.
    pub fn signal<E: Event>(&self, id: TypeId) -> Signal<E, Container> {
        let mut signals = self.signals.borrow_mut();
        let index = id.index();
        if index >= signals.len() {
            signals.resize_with(index + 1, || None);
        }
        signals[index]
            .get_or_insert_with(|| Box::new(Signal::<E, Container>::new()))
            .downcast_ref::<Signal<E, Container>>()
            .unwrap_or_else(|| mismatch::<E>(id))
            .clone()
    }

    /// Get the signal for `E` stored under `id`, if any handler was ever connected.
    pub fn get<E: Event>(&self, id: TypeId) -> Option<Signal<E, Container>> {
        let signals = self.signals.borrow();
        let signal = signals.get(id.index())?.as_ref()?;
        Some(
            signal
                .downcast_ref::<Signal<E, Container>>()
                .unwrap_or_else(|| mismatch::<E>(id))
                .clone(),
        )
    }

    /// Send `event` to every handler of `E`.
    pub fn emit<E: Event>(&self, id: TypeId, container: &Container, event: &E) {
        // Clone the signal out, the borrow must not be held while handlers run.
        if let Some(signal) = self.get::<E>(id) {
            signal.emit(container, event);
        }
    }

    /// Number of handlers connected for `E`.
    pub fn connected<E: Event>(&self, id: TypeId) -> usize {
        self.get::<E>(id).map_or(0, |signal| signal.len())
    }
}

#[cold]
fn mismatch<E>(id: TypeId) -> ! {
    panic!(
        "signal type mismatch for type id {}: requested '{}'",
        id.index(),
        std::any::type_name::<E>()
    )
}
