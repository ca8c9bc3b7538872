use crate::ecs::{
    Container,
    component::Component,
    event::{AfterCreate, AfterDestroy, Event},
};

/// An object that receives events of type `E`.
///
/// Subscribers are registered by shared ownership (`Rc<RefCell<S>>`) through
/// [`Container::subscribe`](crate::ecs::Container::subscribe). The container keeps only a weak
/// reference: dropping the subscriber stops delivery even if the returned connection is kept.
pub trait Subscriber<E: Event>: 'static {
    fn receive(&mut self, container: &Container, event: &E);
}

/// An object that observes the lifecycle of one component type.
///
/// Registered with [`Container::subscribe_lifecycle`](crate::ecs::Container::subscribe_lifecycle).
pub trait LifecycleSubscriber<T: Component>: 'static {
    /// A `T` was stored.
    fn on_create(&mut self, _container: &Container, _event: &AfterCreate<T>) {}

    /// A `T` is about to go away. It is still readable through the container.
    fn on_destroy(&mut self, _container: &Container, _event: &AfterDestroy<T>) {}
}
