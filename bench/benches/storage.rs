//! Storage engine benchmarks using Criterion.
//!
//! These benchmarks measure individual container operations:
//! - Entity create/destroy and slot reuse
//! - Component attach, replace and copy
//! - Query iteration with need/skip/load
//! - Event emission

use std::{cell::Cell, rc::Rc};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rusty_ecs::ecs::{AfterCreate, Container, Event};
use rusty_ecs_bench::{
    components::*,
    population::{Population, PopulationConfig},
};

const COUNTS: [usize; 3] = [100, 1_000, 10_000];

fn population(count: usize) -> Population {
    Population::new(PopulationConfig {
        entity_count: count,
        ..PopulationConfig::default()
    })
}

// =============================================================================
// Entity Benchmarks
// =============================================================================

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for count in COUNTS {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("empty", count), &count, |b, &n| {
            b.iter(|| {
                let mut container = Container::new();
                for _ in 0..n {
                    black_box(container.create());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("one_component", count), &count, |b, &n| {
            b.iter(|| {
                let mut container = Container::new();
                for _ in 0..n {
                    black_box(container.create_with((Position::default(),)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("four_components", count), &count, |b, &n| {
            b.iter(|| {
                let mut container = Container::new();
                for _ in 0..n {
                    black_box(container.create_with((
                        Transform::default(),
                        Position::default(),
                        Velocity::default(),
                        Health::default(),
                    )));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("preallocated", count), &count, |b, &n| {
            b.iter(|| {
                let mut container = Container::with_capacity(n);
                for _ in 0..n {
                    black_box(container.create_with((Position::default(),)));
                }
            });
        });
    }

    group.finish();
}

fn bench_destroy(c: &mut Criterion) {
    let mut group = c.benchmark_group("destroy");

    for count in COUNTS {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("mixed", count), &count, |b, &n| {
            b.iter_batched(
                || population(n),
                |mut population| {
                    for &entity in &population.entities {
                        population.container.destroy(entity);
                    }
                    population
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("churn", count), &count, |b, &n| {
            let mut population = population(n);
            b.iter(|| {
                population.thin(0.25);
                for entity in population.entities.iter_mut() {
                    if !population.container.is_alive(*entity) {
                        *entity = population.container.create_with((Position::default(),));
                    }
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// Component Benchmarks
// =============================================================================

fn bench_components(c: &mut Criterion) {
    let mut group = c.benchmark_group("components");

    for count in COUNTS {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("replace", count), &count, |b, &n| {
            let mut population = population(n);
            b.iter(|| {
                for &entity in &population.entities {
                    population.container.create_component(entity, Health::default());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("get_random", count), &count, |b, &n| {
            let mut population = population(n);
            b.iter(|| {
                for _ in 0..n {
                    let entity = population.pick();
                    black_box(population.container.get::<Velocity>(entity));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("copy_entity", count), &count, |b, &n| {
            b.iter_batched(
                || population(n),
                |mut population| {
                    for &entity in &population.entities {
                        black_box(population.container.copy(entity).ok());
                    }
                    population
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("copy_to", count), &count, |b, &n| {
            let population = population(n);
            b.iter(|| {
                let mut target = Container::new();
                for &entity in &population.entities {
                    black_box(population.container.copy_to(entity, &mut target).ok());
                }
            });
        });
    }

    group.finish();
}

fn bench_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth");

    // Every copy lands past the column's capacity, so each one takes the snapshot path.
    group.bench_function("copy_component_past_capacity", |b| {
        b.iter(|| {
            let mut container = Container::new();
            let source = container.create_with((Label {
                text: "payload".to_string(),
            },));
            for _ in 0..1_000 {
                let target = container.create();
                black_box(container.copy_component::<Label>(source, target).ok());
            }
        });
    });

    group.finish();
}

// =============================================================================
// Query Benchmarks
// =============================================================================

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    for count in COUNTS {
        group.throughput(Throughput::Elements(count as u64));

        let population = population(count).with_transforms();
        let container = &population.container;

        group.bench_with_input(BenchmarkId::new("all", count), &count, |b, _| {
            b.iter(|| black_box(container.entities().iter().count()));
        });

        group.bench_with_input(BenchmarkId::new("need_one", count), &count, |b, _| {
            b.iter(|| {
                let mut sum = 0.0;
                for row in container.entities().need::<Position>() {
                    sum += row.get::<Position>().map_or(0.0, |p| p.x);
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("need_skip", count), &count, |b, _| {
            b.iter(|| {
                let query = container
                    .entities()
                    .need::<Position>()
                    .need::<Velocity>()
                    .skip::<Frozen>();
                black_box(query.iter().count())
            });
        });

        group.bench_with_input(BenchmarkId::new("load_two", count), &count, |b, _| {
            b.iter(|| {
                let mut sum = 0.0;
                let query = container
                    .entities()
                    .need::<Velocity>()
                    .load::<Position>()
                    .load::<Velocity>();
                for row in &query {
                    if let (((), Some(position)), Some(velocity)) = row.loaded() {
                        sum += position.x * velocity.x;
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("get_unloaded", count), &count, |b, _| {
            b.iter(|| {
                let mut sum = 0.0;
                for row in container.entities().need::<Velocity>() {
                    if let (Some(position), Some(velocity)) =
                        (row.get::<Position>(), row.get::<Velocity>())
                    {
                        sum += position.x * velocity.x;
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Event Benchmarks
// =============================================================================

struct Tick(u32);
impl Event for Tick {}

fn bench_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("events");

    for handlers in [0, 1, 16] {
        group.bench_with_input(BenchmarkId::new("emit", handlers), &handlers, |b, &n| {
            let container = Container::new();
            let total = Rc::new(Cell::new(0u64));
            let _connections: Vec<_> = (0..n)
                .map(|_| {
                    let sink = total.clone();
                    container.connect(move |_, tick: &Tick| sink.set(sink.get() + tick.0 as u64))
                })
                .collect();
            b.iter(|| container.emit(black_box(&Tick(1))));
        });

        group.bench_with_input(BenchmarkId::new("create_observed", handlers), &handlers, |b, &n| {
            b.iter(|| {
                let mut container = Container::new();
                let _connections: Vec<_> = (0..n)
                    .map(|_| container.connect(|_, event: &AfterCreate<Position>| {
                        black_box(event.entity);
                    }))
                    .collect();
                for _ in 0..1_000 {
                    black_box(container.create_with((Position::default(),)));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_create,
    bench_destroy,
    bench_components,
    bench_growth,
    bench_query,
    bench_events
);
criterion_main!(benches);
