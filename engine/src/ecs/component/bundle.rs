use crate::ecs::{Container, component::Component, entity::Entity};

/// A set of components attached to an entity in one call.
///
/// Implemented for tuples of up to 26 components. The tuple is fully constructed by the caller
/// before the entity exists, so there is no way to end up with a partially built entity.
///
/// ```rust,ignore
/// let entity = container.create_with((Position { x: 0.0, y: 0.0 }, Velocity { dx: 1.0, dy: 0.0 }));
/// let blank = container.create_default::<(Position, Velocity)>();
/// ```
pub trait Bundle: 'static {
    /// Attach every component of the bundle to `entity`, in tuple order.
    fn attach(self, container: &mut Container, entity: Entity);
}

impl Bundle for () {
    fn attach(self, _container: &mut Container, _entity: Entity) {}
}

macro_rules! impl_bundle {
    ($($name: ident),*) => {
        impl<$($name: Component),*> Bundle for ($($name,)*) {
            #[allow(non_snake_case)]
            fn attach(self, container: &mut Container, entity: Entity) {
                let ($($name,)*) = self;
                $(container.create_component(entity, $name);)*
            }
        }
    }
}

crate::all_tuples!(impl_bundle);
