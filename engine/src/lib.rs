//! An in-process entity/component storage engine.
//!
//! Everything lives under [`ecs`]: a [`Container`](ecs::Container) allocates entities, stores their
//! components in per-type columns, answers queries over them and broadcasts lifecycle events.

// Lets `#[derive(Component)]` name this crate the same way inside and outside of it.
extern crate self as rusty_ecs;

pub mod ecs;
