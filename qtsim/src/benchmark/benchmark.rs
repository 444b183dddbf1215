use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::simulation::collision::resolve_edge_collision;
use crate::simulation::integrator::{update_step, UpdateStrategy};
use crate::simulation::params::{SpawnLimits, TreePolicy, Window};
use crate::simulation::quadtree::Quadtree;
use crate::simulation::scenario::{random_window_position, spawn_body};
use crate::simulation::states::Body;

const DT: f64 = 0.1;

/// Helper to spawn `n` seeded random bodies inside `window`
pub fn make_bodies(n: usize, window: &Window, seed: u64) -> Vec<Body> {
    let mut rng = StdRng::seed_from_u64(seed);
    let limits = SpawnLimits::default();
    (0..n)
        .map(|_| {
            let position = random_window_position(&mut rng, window);
            spawn_body(&mut rng, position, window, &limits)
        })
        .collect()
}

/// Edge containment + rebuild + one update step, in milliseconds
fn time_frame(bodies: &mut [Body], tree: &mut Quadtree, strategy: UpdateStrategy, steps: u32) -> f64 {
    let window = *tree.window();
    let t0 = Instant::now();
    for _ in 0..steps {
        for b in bodies.iter_mut() {
            resolve_edge_collision(b, &window);
        }
        tree.rebuild(bodies);
        update_step(bodies, tree, DT, strategy);
    }
    t0.elapsed().as_secs_f64() * 1000.0 / steps as f64
}

/// Time a full tree rebuild for a range of body counts
pub fn bench_rebuild() {
    let window = Window::default();
    let ns = [500, 1000, 2000, 5000, 10000, 20000];

    println!("N,rebuild_ms");
    for n in ns {
        let bodies = make_bodies(n, &window, 42);
        let mut tree = Quadtree::new(window, TreePolicy::default());

        // Warm up
        tree.rebuild(&bodies);

        let steps = 10;
        let t0 = Instant::now();
        for _ in 0..steps {
            tree.rebuild(&bodies);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6}", n, ms);
    }
}

/// Time one frame per strategy for a range of body counts
/// Paste output directly into a spreadsheet to graph
pub fn bench_strategies() {
    let window = Window::default();

    println!("N,brute_ms,flattened_ms,branches_ms,boundary_ms");

    for n in (1000..=10000).step_by(1000) {
        // Brute force gets slow quickly; average fewer steps there
        let steps = if n <= 3000 { 5 } else { 2 };
        let template = make_bodies(n, &window, 42);

        let mut row = Vec::with_capacity(UpdateStrategy::ALL.len());
        for strategy in UpdateStrategy::ALL {
            let mut bodies = template.clone();
            let mut tree = Quadtree::new(window, TreePolicy::default());

            // Warm-up one step
            time_frame(&mut bodies, &mut tree, strategy, 1);

            row.push(time_frame(&mut bodies, &mut tree, strategy, steps));
        }

        println!("{},{:.6},{:.6},{:.6},{:.6}", n, row[0], row[1], row[2], row[3]);
    }
}
