//! Component storage for a container.
//!
//! Storage is laid out per component type, with every column indexed directly by entity slot
//! index (a sparse, index-aligned layout):
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  Registry                                                 │
//! │  - One column per component type, by dense type id        │
//! └──────────────┬──────────────────────────┬─────────────────┘
//!                │                          │
//! ┌──────────────▼──────────────┐ ┌─────────▼─────────────────┐
//! │  Column<Position>           │ │  Column<Velocity>         │
//! │  [p0][ _][p2][p3]           │ │  [ _][v1][v2]             │
//! │  per-slot versions          │ │  per-slot versions        │
//! └──────────────┬──────────────┘ └───────────────────────────┘
//!                │
//! ┌──────────────▼──────────────┐
//! │  IndexedMemory<T>           │
//! │  - Raw typed allocation     │
//! │  - Growth + relocation      │
//! └─────────────────────────────┘
//! ```
//!
//! An entity at slot `i` has component `T` exactly when `Column<T>` reports slot `i` live. There is
//! no per-entity component list; "every component of this entity" is answered by walking all
//! columns, which the container does through its per-type operation table.

pub mod column;
pub mod mem;
pub mod registry;

pub use column::{Column, ErasedColumn};
pub use mem::GrowthStrategy;
pub use registry::Registry;
