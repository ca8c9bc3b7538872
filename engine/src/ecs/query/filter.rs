//! Owned, mutation-tolerant form of a query.
//!
//! A [`Query`](super::Query) borrows its container for as long as it is iterated, so the container
//! cannot be changed mid-walk. A [`Filter`] keeps only the type sets and the source. Its
//! [`Walker`] takes the container at every step and checks the slot against the container as it
//! is *now*:
//!
//! ```rust,ignore
//! let filter = container.entities().need::<Health>().filter();
//! let mut walker = filter.walk();
//! while let Some(entity) = walker.next(&container) {
//!     if container.get::<Health>(entity).is_some_and(|h| h.0 == 0) {
//!         container.destroy(entity);
//!     }
//! }
//! ```
//!
//! A slot destroyed before the walker reaches it is skipped. Slots already visited are not
//! revisited.

use fixedbitset::FixedBitSet;

use crate::ecs::{
    Container,
    container::{self, TypeId},
    entity::Entity,
};

/// Where a filter takes its candidates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Candidates {
    /// Every slot of the container.
    Slots,

    /// A caller-supplied list, in order.
    List(Vec<Entity>),
}

/// Type predicates and a candidate source, detached from the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    container: container::Id,
    candidates: Candidates,
    need: FixedBitSet,
    skip: FixedBitSet,
}

impl Filter {
    pub(crate) fn new(
        container: container::Id,
        candidates: Candidates,
        need: FixedBitSet,
        skip: FixedBitSet,
    ) -> Self {
        Self {
            container,
            candidates,
            need,
            skip,
        }
    }

    /// The container this filter was built for.
    #[inline]
    pub fn container(&self) -> container::Id {
        self.container
    }

    /// Start a walk from the first candidate.
    pub fn walk(&self) -> Walker<'_> {
        Walker {
            filter: self,
            position: 0,
        }
    }

    /// Does the live `entity` satisfy the type predicates right now?
    pub fn matches(&self, container: &Container, entity: Entity) -> bool {
        if !container.is_alive(entity) {
            return false;
        }
        let index = entity.index();
        let present = |id: usize| {
            container
                .erased_column(TypeId::new(id as u32))
                .is_some_and(|column| column.contains(index))
        };
        self.need.ones().all(present) && !self.skip.ones().any(present)
    }
}

/// A cursor over a [`Filter`] that re-reads the container at every step.
#[derive(Debug, Clone)]
pub struct Walker<'f> {
    filter: &'f Filter,
    position: usize,
}

impl Walker<'_> {
    /// Advance to the next candidate that is alive and matches.
    ///
    /// For a slot walk the end is the container's capacity at the time of the call, so slots
    /// allocated during the walk are visited too.
    ///
    /// # Panics
    ///
    /// Panics if `container` is not the container the filter was built for.
    #[track_caller]
    pub fn next(&mut self, container: &Container) -> Option<Entity> {
        assert!(
            container.id() == self.filter.container,
            "walker for {} used with {}",
            self.filter.container,
            container.id()
        );
        loop {
            let candidate = match &self.filter.candidates {
                Candidates::Slots => {
                    if self.position >= container.capacity() {
                        return None;
                    }
                    container.entity_at(self.position)
                }
                Candidates::List(entities) => Some(*entities.get(self.position)?),
            };
            self.position += 1;
            if let Some(entity) = candidate
                && self.filter.matches(container, entity)
            {
                return Some(entity);
            }
        }
    }

    /// Number of candidates consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use crate::ecs::{Container, component::Component};

    struct Health(u32);
    impl Component for Health {}

    struct Shield;
    impl Component for Shield {}

    #[test]
    fn walker_skips_entities_destroyed_ahead() {
        // Given
        let mut container = Container::new();
        let entities: Vec<_> = (0..4).map(|i| container.create_with((Health(i),))).collect();
        let filter = container.entities().need::<Health>().filter();
        let mut walker = filter.walk();

        // When - Destroy a slot the walker has not reached yet
        let first = walker.next(&container);
        container.destroy(entities[2]);
        let rest: Vec<_> = std::iter::from_fn(|| walker.next(&container)).collect();

        // Then
        assert_eq!(first, Some(entities[0]));
        assert_eq!(rest, vec![entities[1], entities[3]]);
    }

    #[test]
    fn walker_sees_component_changes_between_steps() {
        // Given
        let mut container = Container::new();
        let a = container.create_with((Health(1),));
        let b = container.create_with((Health(1),));
        let filter = container.entities().need::<Health>().skip::<Shield>().filter();
        let mut walker = filter.walk();

        // When
        assert_eq!(walker.next(&container), Some(a));
        container.create_component(b, Shield);
        container.create_component(a, Shield);

        // Then
        assert_eq!(walker.next(&container), None);
        assert_eq!(walker.position(), 2);
    }

    #[test]
    fn walker_may_destroy_current_entity() {
        // Given
        let mut container = Container::new();
        for i in 0..6 {
            container.create_with((Health(i % 2),));
        }
        let filter = container.entities().need::<Health>().filter();
        let mut walker = filter.walk();

        // When
        while let Some(entity) = walker.next(&container) {
            if container.get::<Health>(entity).is_some_and(|health| health.0 == 0) {
                container.destroy(entity);
            }
        }

        // Then
        assert_eq!(container.len(), 3);
        assert!(container.entities().iter().all(|row| row.get::<Health>().unwrap().0 == 1));
    }

    #[test]
    fn list_walk_keeps_order() {
        let mut container = Container::new();
        let a = container.create_with((Health(0),));
        let b = container.create();
        let c = container.create_with((Health(0),));
        let list = [c, b, a];

        let filter = container.filter(&list).need::<Health>().filter();
        let walked: Vec<_> = {
            let mut walker = filter.walk();
            std::iter::from_fn(|| walker.next(&container)).collect()
        };

        assert_eq!(walked, vec![c, a]);
    }

    #[test]
    #[should_panic(expected = "walker for")]
    fn walker_rejects_other_container() {
        let container = Container::new();
        let other = Container::new();
        let filter = container.entities().filter();

        filter.walk().next(&other);
    }
}
