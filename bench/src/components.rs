//! Common component types used across benchmarks.
//!
//! Sizes are representative of simulation components. Every type opts into copying so entity copy
//! benchmarks can use any mix.

use rusty_ecs::ecs::Component;

/// 3D position component (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default)]
#[component(clone)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// 3D velocity component (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default)]
#[component(clone)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// 4x4 transformation matrix (64 bytes).
#[derive(Component, Clone, Copy, Debug)]
#[component(clone)]
pub struct Transform {
    pub matrix: [[f32; 4]; 4],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            matrix: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

/// Health component for damageable entities.
#[derive(Component, Clone, Copy, Debug, Default)]
#[component(clone)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Heap-owning component, makes copies and drops non-trivial.
#[derive(Component, Clone, Debug, Default)]
#[component(clone)]
pub struct Label {
    pub text: String,
}

/// Excluded by the `skip` benchmarks.
#[derive(Component, Clone, Copy, Debug, Default)]
#[component(clone)]
pub struct Frozen;
