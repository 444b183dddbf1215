//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! (`Scenario`) containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - system state (`System` with bodies at t = 0)
//! - the quadtree, rebuilt from the bodies every frame
//! - the seeded random generator used for spawning
//!
//! `Scenario::step` is the driver loop: keep bodies inside the window,
//! rebuild the tree, then run the update pass.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::configuration::config::{BodyConfig, ScenarioConfig};
use crate::configuration::error::ConfigError;
use crate::simulation::collision::resolve_edge_collision;
use crate::simulation::engine::Engine;
use crate::simulation::integrator::{update_step, StepStats};
use crate::simulation::params::{Parameters, SpawnLimits, Window};
use crate::simulation::quadtree::{Quadtree, TreeStats};
use crate::simulation::states::{Body, NVec2, System};

/// A uniformly random position inside the window
pub fn random_window_position<R: Rng + ?Sized>(rng: &mut R, window: &Window) -> NVec2 {
    NVec2::new(rng.gen_range(0.0..=window.width), rng.gen_range(0.0..=window.height))
}

/// A uniformly random direction; falls back to +x on a zero draw
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> NVec2 {
    let d = NVec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
    d.try_normalize(0.0).unwrap_or_else(|| NVec2::new(1.0, 0.0))
}

/// Spawn a body at `position` (clamped into the window) with a random
/// direction, speed and radius drawn from `limits`
pub fn spawn_body<R: Rng + ?Sized>(rng: &mut R, position: NVec2, window: &Window, limits: &SpawnLimits) -> Body {
    let x = NVec2::new(
        position.x.clamp(0.0, window.width),
        position.y.clamp(0.0, window.height),
    );
    let v = random_direction(rng) * rng.gen_range(limits.min_speed..=limits.max_speed);
    let radius = rng.gen_range(limits.min_radius..=limits.max_radius);
    Body::new(x, v, radius)
}

/// Totals over a run of several frames
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub frames: u64,
    pub contacts: usize,
    pub broad_queries: usize,
}

/// Runtime bundle: settings, state, spatial index and random source
#[derive(Debug)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
    pub spawn_limits: SpawnLimits,
    tree: Quadtree,
    rng: StdRng,
}

impl Scenario {
    /// Validate `cfg`, then materialise explicit bodies followed by
    /// `spawn.count` random ones
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let window = cfg.window();
        let engine = Engine {
            strategy: cfg.engine.strategy,
            policy: cfg.tree_policy(),
        };
        let parameters = Parameters {
            dt: cfg.parameters.dt,
            frames: cfg.parameters.frames,
            seed: cfg.parameters.seed,
        };
        let spawn_limits = cfg.spawn_limits();
        let mut rng = StdRng::seed_from_u64(parameters.seed);

        // Bodies: explicit first, in file order, then random spawns
        let mut bodies: Vec<Body> = cfg.bodies.iter().map(|bc: &BodyConfig| Body::new(
            NVec2::new(bc.x[0], bc.x[1]),
            NVec2::new(bc.v[0], bc.v[1]),
            bc.radius,
        )).collect();

        bodies.reserve(cfg.spawn.count);
        for _ in 0..cfg.spawn.count {
            let position = random_window_position(&mut rng, &window);
            bodies.push(spawn_body(&mut rng, position, &window, &spawn_limits));
        }

        info!(
            bodies = bodies.len(),
            strategy = %engine.strategy,
            split_threshold = engine.policy.split_threshold,
            depth_threshold = engine.policy.depth_threshold,
            "scenario built"
        );

        // keep the spawn generator so later additions continue its stream
        Ok(Self::with_rng(engine, parameters, window, spawn_limits, bodies, rng))
    }

    /// Assemble a scenario directly from runtime types, seeding a fresh
    /// generator from `parameters.seed`
    pub fn new(engine: Engine, parameters: Parameters, window: Window, spawn_limits: SpawnLimits, bodies: Vec<Body>) -> Self {
        let rng = StdRng::seed_from_u64(parameters.seed);
        Self::with_rng(engine, parameters, window, spawn_limits, bodies, rng)
    }

    /// Like [`Scenario::new`], but random draws continue from `rng`
    pub fn with_rng(
        engine: Engine,
        parameters: Parameters,
        window: Window,
        spawn_limits: SpawnLimits,
        bodies: Vec<Body>,
        rng: StdRng,
    ) -> Self {
        Self {
            engine,
            tree: Quadtree::new(window, engine.policy),
            parameters,
            system: System::new(bodies),
            spawn_limits,
            rng,
        }
    }

    pub fn tree(&self) -> &Quadtree {
        &self.tree
    }

    pub fn window(&self) -> &Window {
        self.tree.window()
    }

    /// Spawn a random body at `position`; it joins the tree on the next step.
    /// Returns its index in the body list.
    pub fn add_body_at(&mut self, position: NVec2) -> usize {
        let window = *self.tree.window();
        let body = spawn_body(&mut self.rng, position, &window, &self.spawn_limits);
        self.system.bodies.push(body);
        self.system.bodies.len() - 1
    }

    /// Advance one frame: edge containment, tree rebuild, update pass
    pub fn step(&mut self) -> StepStats {
        let window = *self.tree.window();
        for body in self.system.bodies.iter_mut() {
            resolve_edge_collision(body, &window);
        }

        // nothing may touch the body list between here and update_step
        self.tree.rebuild(&self.system.bodies);
        let stats = update_step(
            &mut self.system.bodies,
            &self.tree,
            self.parameters.dt,
            self.engine.strategy,
        );

        self.system.t += self.parameters.dt;

        let tree = self.tree.stats();
        debug!(
            t = self.system.t,
            contacts = stats.contacts,
            broad_queries = stats.broad_queries,
            branches = tree.branches,
            max_depth = tree.max_depth,
            max_leaf_bodies = tree.max_leaf_bodies,
            "frame"
        );

        stats
    }

    /// Run `frames` steps and total up their counters
    pub fn run(&mut self, frames: u64) -> RunSummary {
        let mut summary = RunSummary::default();
        for _ in 0..frames {
            let stats = self.step();
            summary.frames += 1;
            summary.contacts += stats.contacts;
            summary.broad_queries += stats.broad_queries;
        }
        summary
    }

    /// Shape of the tree as of the last step
    pub fn tree_stats(&self) -> TreeStats {
        self.tree.stats()
    }
}
