//! Numerical and shape parameters for the simulation
//!
//! - `Window`: the simulation area, also the quadtree root rectangle
//! - `TreePolicy`: split and depth thresholds shaping the quadtree
//! - `SpawnLimits`: ranges used when spawning random bodies
//! - `Parameters`: time step, frame count and random seed

use crate::simulation::geometry::Rect;
use crate::simulation::states::NVec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub width: f64,
    pub height: f64,
}

impl Window {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Rectangle spanning the whole window, top-left at the origin
    pub fn rect(&self) -> Rect {
        Rect::new(NVec2::zeros(), self.width, self.height)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

/// Shape policy for the quadtree.
///
/// A leaf forks once it already holds `split_threshold` bodies and its depth
/// does not exceed `depth_threshold`. Leaves deeper than `depth_threshold`
/// grow without bound, so no branch is ever deeper than
/// `depth_threshold + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreePolicy {
    pub split_threshold: usize, // max bodies a leaf holds before it forks
    pub depth_threshold: u32, // max depth at which forking is still permitted
}

impl TreePolicy {
    /// Deepest `depth_threshold` a tree accepts. Coincident bodies fork all the
    /// way down to it, and past this depth quadrant sides stop shrinking
    /// usefully in `f64`.
    pub const MAX_DEPTH_THRESHOLD: u32 = 32;

    pub fn new(split_threshold: usize, depth_threshold: u32) -> Self {
        Self {
            split_threshold,
            depth_threshold,
        }
    }
}

impl Default for TreePolicy {
    fn default() -> Self {
        Self::new(4, 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnLimits {
    pub min_radius: f64,
    pub max_radius: f64,
    pub min_speed: f64,
    pub max_speed: f64,
}

impl Default for SpawnLimits {
    fn default() -> Self {
        Self {
            min_radius: 1.0,
            max_radius: 8.0,
            min_speed: 50.0,
            max_speed: 200.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Parameters {
    pub dt: f64, // step size
    pub frames: u64, // number of frames the driver runs
    pub seed: u64, // deterministic seed
}
