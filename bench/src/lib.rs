//! Benchmark utilities for the `rusty_ecs` storage engine.
//!
//! This crate holds the component types and population helpers shared by the Criterion
//! benchmarks in `benches/`:
//!
//! - **Entity lifecycle**: create, destroy and slot reuse
//! - **Components**: attach, replace and copy, including copies that force column growth
//! - **Queries**: need/skip/load iteration over random component mixes
//! - **Events**: emission cost with a varying number of connected handlers
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p rusty_ecs_bench
//!
//! # Run specific benchmark group
//! cargo bench -p rusty_ecs_bench -- query
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod components;
pub mod population;
