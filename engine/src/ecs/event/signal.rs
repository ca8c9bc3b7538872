//! Closure-based broadcast with scoped connections.
//!
//! A [`Signal<E, C>`] holds an ordered list of handlers `Fn(&C, &E)`. [`Signal::connect`] returns a
//! [`Connection`] that removes the handler when dropped; [`Connection::detach`] gives up that
//! ownership and leaves the handler connected for the signal's lifetime. A handler connected with
//! [`Signal::connect_while`] returns `false` to disconnect itself.
//!
//! # Slots
//!
//! Handlers live in a slot list. Disconnecting tombstones the slot instead of shifting the list, and
//! the freed index goes to a hole list for reuse by later connections. Each slot carries a serial so
//! a connection can never disconnect a handler that reused its old slot.
//!
//! ```text
//! slots:  [ h0 ][ -- ][ h2 ][ h3 ]      holes: [1]
//!                 ▲
//!                 └── next connect lands here (unless an emission is running)
//! ```
//!
//! # Emission
//!
//! [`emit`](Signal::emit) calls handlers in slot order, synchronously. It fixes the number of slots
//! to visit before calling the first handler and holes are not reused while any emission is
//! running, so:
//! - a handler connected during an emission is not called by that emission
//! - a handler disconnected during an emission is not called if it was not reached yet
//! - handlers may connect, disconnect and emit re-entrantly
//!
//! The connection owns the handler's slot, not the handler's address. Moving a `Connection` moves
//! nothing the signal depends on.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

struct Slot<E, C: ?Sized> {
    /// Returns `false` to disconnect itself.
    handler: Option<Rc<dyn Fn(&C, &E) -> bool>>,
    serial: u64,
}

struct Slots<E, C: ?Sized> {
    slots: Vec<Slot<E, C>>,
    holes: Vec<usize>,
    /// Number of emissions currently running.
    emitting: usize,
    next_serial: u64,
    connected: usize,
}

impl<E, C: ?Sized> Default for Slots<E, C> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            holes: Vec::new(),
            emitting: 0,
            next_serial: 0,
            connected: 0,
        }
    }
}

/// The signal side of a connection, seen without its event type.
trait Detach {
    fn disconnect(&self, index: usize, serial: u64) -> bool;
    fn is_connected(&self, index: usize, serial: u64) -> bool;
}

impl<E, C: ?Sized> Detach for RefCell<Slots<E, C>> {
    fn disconnect(&self, index: usize, serial: u64) -> bool {
        let mut slots = self.borrow_mut();
        let Some(slot) = slots.slots.get_mut(index) else {
            return false;
        };
        if slot.serial != serial || slot.handler.is_none() {
            return false;
        }
        // Drop the handler outside the borrow, it may own anything.
        let handler = slot.handler.take();
        slots.holes.push(index);
        slots.connected -= 1;
        drop(slots);
        drop(handler);
        true
    }

    fn is_connected(&self, index: usize, serial: u64) -> bool {
        self.borrow()
            .slots
            .get(index)
            .is_some_and(|slot| slot.serial == serial && slot.handler.is_some())
    }
}

/// A synchronous broadcast of `&E` to connected handlers, with a shared context `&C`.
pub struct Signal<E, C: ?Sized = ()> {
    slots: Rc<RefCell<Slots<E, C>>>,
}

impl<E: 'static, C: ?Sized + 'static> Signal<E, C> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots::default())),
        }
    }

    /// Connect `handler`. It stays connected until the returned [`Connection`] is dropped or
    /// disconnected.
    pub fn connect(&self, handler: impl Fn(&C, &E) + 'static) -> Connection {
        self.connect_while(move |context, event| {
            handler(context, event);
            true
        })
    }

    /// Connect `handler` until it returns `false`, then disconnect it from inside the emission.
    ///
    /// The returned [`Connection`] still owns the handler and may disconnect it earlier.
    pub fn connect_while(&self, handler: impl Fn(&C, &E) -> bool + 'static) -> Connection {
        let mut slots = self.slots.borrow_mut();
        let serial = slots.next_serial;
        slots.next_serial += 1;
        slots.connected += 1;

        let slot = Slot {
            handler: Some(Rc::new(handler)),
            serial,
        };
        let reuse = if slots.emitting == 0 {
            slots.holes.pop()
        } else {
            None
        };
        let index = match reuse {
            Some(index) => {
                slots.slots[index] = slot;
                index
            }
            None => {
                slots.slots.push(slot);
                slots.slots.len() - 1
            }
        };
        drop(slots);

        let weak = Rc::downgrade(&self.slots);
        let link: Weak<dyn Detach> = weak;
        Connection {
            link: Some(Link {
                slots: link,
                index,
                serial,
            }),
        }
    }

    /// Call every connected handler with `context` and `event`, in connection slot order.
    pub fn emit(&self, context: &C, event: &E) {
        let len = {
            let mut slots = self.slots.borrow_mut();
            slots.emitting += 1;
            slots.slots.len()
        };
        let _guard = EmitGuard(&self.slots);

        for index in 0..len {
            // Clone the handler out so it can touch this signal while it runs.
            let (handler, serial) = {
                let slots = self.slots.borrow();
                let slot = &slots.slots[index];
                (slot.handler.clone(), slot.serial)
            };
            if let Some(handler) = handler
                && !handler(context, event)
            {
                self.slots.disconnect(index, serial);
            }
        }
    }

    /// Number of connected handlers.
    pub fn len(&self) -> usize {
        self.slots.borrow().connected
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Disconnect every handler. Outstanding connections become inert.
    pub fn disconnect_all(&self) {
        let handlers: Vec<_> = {
            let mut slots = self.slots.borrow_mut();
            let slots = &mut *slots;
            let mut handlers = Vec::with_capacity(slots.connected);
            for (index, slot) in slots.slots.iter_mut().enumerate() {
                if let Some(handler) = slot.handler.take() {
                    handlers.push(handler);
                    slots.holes.push(index);
                }
            }
            slots.connected = 0;
            handlers
        };
        drop(handlers);
    }
}

impl<E: 'static, C: ?Sized + 'static> Default for Signal<E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, C: ?Sized> Clone for Signal<E, C> {
    /// Clones share the same handler list.
    fn clone(&self) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
        }
    }
}

impl<E, C: ?Sized> fmt::Debug for Signal<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.borrow();
        f.debug_struct("Signal")
            .field("connected", &slots.connected)
            .field("slots", &slots.slots.len())
            .finish()
    }
}

/// Balances `emitting` even if a handler panics.
struct EmitGuard<'a, E, C: ?Sized>(&'a RefCell<Slots<E, C>>);

impl<E, C: ?Sized> Drop for EmitGuard<'_, E, C> {
    fn drop(&mut self) {
        self.0.borrow_mut().emitting -= 1;
    }
}

struct Link {
    slots: Weak<dyn Detach>,
    index: usize,
    serial: u64,
}

/// Ownership of one connected handler. Dropping it disconnects the handler.
#[must_use = "dropping a Connection disconnects its handler immediately, use `detach` to keep it"]
#[derive(Default)]
pub struct Connection {
    link: Option<Link>,
}

impl Connection {
    /// Disconnect the handler now. Returns `false` if it was already disconnected.
    pub fn disconnect(&mut self) -> bool {
        let Some(link) = self.link.take() else {
            return false;
        };
        match link.slots.upgrade() {
            Some(slots) => slots.disconnect(link.index, link.serial),
            None => false,
        }
    }

    /// Is the handler still connected to a live signal?
    pub fn is_connected(&self) -> bool {
        self.link.as_ref().is_some_and(|link| {
            link.slots
                .upgrade()
                .is_some_and(|slots| slots.is_connected(link.index, link.serial))
        })
    }

    /// Give up ownership, leaving the handler connected for the signal's lifetime.
    pub fn detach(mut self) {
        self.link = None;
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// A group of connections that are disconnected together.
#[must_use = "dropping a Subscription disconnects its handlers immediately"]
#[derive(Debug, Default)]
pub struct Subscription {
    connections: Vec<Connection>,
}

impl Subscription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the group.
    pub fn push(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Number of connections still connected.
    pub fn len(&self) -> usize {
        self.connections.iter().filter(|c| c.is_connected()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Disconnect every connection in the group.
    pub fn disconnect(&mut self) {
        for mut connection in self.connections.drain(..) {
            connection.disconnect();
        }
    }
}

impl FromIterator<Connection> for Subscription {
    fn from_iter<I: IntoIterator<Item = Connection>>(iter: I) -> Self {
        Self {
            connections: iter.into_iter().collect(),
        }
    }
}
