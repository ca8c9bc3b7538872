//! Deterministic random populations for benchmarks.
//!
//! A [`Population`] fills a container with entities carrying a random mix of the benchmark
//! components. The mix is driven by a seeded `ChaCha8Rng`, so every run builds the same container.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rusty_ecs::ecs::{Container, Entity};

use crate::components::{Frozen, Health, Label, Position, Transform, Velocity};

/// Configuration for a benchmark population.
#[derive(Debug, Clone, Copy)]
pub struct PopulationConfig {
    /// Number of entities to create.
    pub entity_count: usize,
    /// Chance that an entity gets a `Velocity`.
    pub velocity_ratio: f64,
    /// Chance that an entity gets a `Health`.
    pub health_ratio: f64,
    /// Chance that an entity gets a `Label`.
    pub label_ratio: f64,
    /// Chance that an entity is `Frozen`.
    pub frozen_ratio: f64,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            entity_count: 10_000,
            velocity_ratio: 0.5,
            health_ratio: 0.3,
            label_ratio: 0.1,
            frozen_ratio: 0.2,
            seed: 12345,
        }
    }
}

/// A container populated from a [`PopulationConfig`].
pub struct Population {
    pub container: Container,
    pub entities: Vec<Entity>,
    rng: ChaCha8Rng,
}

impl Population {
    /// Build the population. Every entity carries a `Position`, the rest is random.
    pub fn new(config: PopulationConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut container = Container::with_capacity(config.entity_count);
        let mut entities = Vec::with_capacity(config.entity_count);

        for i in 0..config.entity_count {
            let entity = container.create_with((Position {
                x: rng.gen_range(-100.0..100.0),
                y: rng.gen_range(-100.0..100.0),
                z: rng.gen_range(-100.0..100.0),
            },));
            if rng.gen_bool(config.velocity_ratio) {
                container.create_component(
                    entity,
                    Velocity {
                        x: rng.gen_range(-10.0..10.0),
                        y: rng.gen_range(-10.0..10.0),
                        z: rng.gen_range(-10.0..10.0),
                    },
                );
            }
            if rng.gen_bool(config.health_ratio) {
                container.create_component(
                    entity,
                    Health {
                        current: 100.0,
                        max: 100.0,
                    },
                );
            }
            if rng.gen_bool(config.label_ratio) {
                container.create_component(
                    entity,
                    Label {
                        text: format!("entity-{i}"),
                    },
                );
            }
            if rng.gen_bool(config.frozen_ratio) {
                container.create_component(entity, Frozen);
            }
            entities.push(entity);
        }

        Self {
            container,
            entities,
            rng,
        }
    }

    /// A uniformly random entity of the population, alive or not.
    pub fn pick(&mut self) -> Entity {
        self.entities[self.rng.gen_range(0..self.entities.len())]
    }

    /// Destroy a random share of the population, leaving holes for slot reuse.
    pub fn thin(&mut self, ratio: f64) -> usize {
        let mut destroyed = 0;
        for &entity in &self.entities {
            if self.rng.gen_bool(ratio) && self.container.destroy(entity) {
                destroyed += 1;
            }
        }
        destroyed
    }

    /// Give every entity a heavy `Transform`.
    pub fn with_transforms(mut self) -> Self {
        for &entity in &self.entities {
            if self.container.is_alive(entity) {
                self.container.create_component(entity, Transform::default());
            }
        }
        self
    }
}
