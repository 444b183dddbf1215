pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{Body, System, NVec2};
pub use simulation::params::{Parameters, SpawnLimits, TreePolicy, Window};
pub use simulation::engine::Engine;
pub use simulation::geometry::{point_in_rect, rect_fully_inside, rect_overlaps, Rect};
pub use simulation::collision::{resolve_edge_collision, resolve_elastic_collision, resolve_pair};
pub use simulation::quadtree::{Branch, BranchId, BranchKind, Quadtree, TreeStats};
pub use simulation::integrator::{update_step, StepStats, UpdateStrategy};
pub use simulation::scenario::{random_window_position, spawn_body, RunSummary, Scenario};

pub use configuration::config::{BodyConfig, EngineConfig, ParametersConfig, ScenarioConfig, SpawnConfig, WindowConfig};
pub use configuration::error::ConfigError;

pub use benchmark::benchmark::{bench_rebuild, bench_strategies};
