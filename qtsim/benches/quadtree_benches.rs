//! Benchmarks for tree rebuild and the update strategies.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use qtsim::benchmark::benchmark::make_bodies;
use qtsim::{resolve_edge_collision, update_step, Quadtree, TreePolicy, UpdateStrategy, Window};

const N: usize = 2000;
const DT: f64 = 0.1;

fn bench_rebuild(c: &mut Criterion) {
    let window = Window::default();
    let bodies = make_bodies(N, &window, 42);
    let mut tree = Quadtree::new(window, TreePolicy::default());

    c.bench_function("quadtree_rebuild_2000", |b| {
        b.iter(|| {
            tree.rebuild(black_box(&bodies));
            black_box(tree.stats())
        })
    });
}

fn bench_strategies(c: &mut Criterion) {
    let window = Window::default();
    let template = make_bodies(N, &window, 42);
    let mut group = c.benchmark_group("update_step_2000");

    for strategy in UpdateStrategy::ALL {
        group.bench_function(strategy.name(), |b| {
            b.iter_batched(
                || template.clone(),
                |mut bodies| {
                    let mut tree = Quadtree::new(window, TreePolicy::default());
                    for body in bodies.iter_mut() {
                        resolve_edge_collision(body, &window);
                    }
                    tree.rebuild(&bodies);
                    black_box(update_step(&mut bodies, &tree, DT, strategy))
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rebuild, bench_strategies);
criterion_main!(benches);
