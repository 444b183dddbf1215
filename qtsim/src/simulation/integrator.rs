//! Per-frame update: collision resolution plus explicit Euler drift
//!
//! One pass over the bodies, in place. Each body gathers collision
//! candidates, resolves against them, then moves by `v * dt`. Strategies only
//! differ in how candidates are gathered:
//!
//! - `FlattenedBodies`: `find_bodies` on the body's bounding square
//! - `LeafBranches`: `find_branches` on the bounding square, then each leaf's list
//! - `BoundaryAware`: walk the tree leaf by leaf; bodies whose bounding square
//!   sits fully inside their leaf only test that leaf, the rest fall back to
//!   a `find_branches` query from the root
//! - `BruteForce`: every unordered pair once, no tree
//!
//! Bodies resolved or moved earlier in the pass are seen at their updated
//! state by bodies visited later. There is no sub-stepping.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::simulation::collision::resolve_pair;
use crate::simulation::geometry::{rect_fully_inside, Rect};
use crate::simulation::quadtree::{BranchId, Quadtree};
use crate::simulation::states::Body;

/// How collision candidates are gathered for each body
/// strategy: "flattened" | "branches" | "boundary" | "brute_force"
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateStrategy {
    #[serde(rename = "flattened")] // query bodies of overlapping leaves as one flat list
    FlattenedBodies,

    #[serde(rename = "branches")] // query overlapping leaves, walk each leaf's list
    LeafBranches,

    #[default]
    #[serde(rename = "boundary")] // local leaf check unless the body straddles a leaf edge
    BoundaryAware,

    #[serde(rename = "brute_force")] // all pairs, ignores the tree
    BruteForce,
}

impl UpdateStrategy {
    pub const ALL: [UpdateStrategy; 4] = [
        UpdateStrategy::BruteForce,
        UpdateStrategy::FlattenedBodies,
        UpdateStrategy::LeafBranches,
        UpdateStrategy::BoundaryAware,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UpdateStrategy::FlattenedBodies => "flattened",
            UpdateStrategy::LeafBranches => "branches",
            UpdateStrategy::BoundaryAware => "boundary",
            UpdateStrategy::BruteForce => "brute_force",
        }
    }
}

impl fmt::Display for UpdateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UpdateStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UpdateStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| format!("unknown update strategy `{s}`, expected one of: flattened, branches, boundary, brute_force"))
    }
}

/// Counters from one update pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepStats {
    pub contacts: usize, // pair resolutions that found an overlap
    pub broad_queries: usize, // region queries issued against the tree
}

/// Resolve collisions and advance every body by one step of `dt`.
///
/// `tree` must have been rebuilt from `bodies` with no insertion, removal or
/// reordering since; its body indices point into this slice. `BruteForce`
/// ignores the tree.
pub fn update_step(bodies: &mut [Body], tree: &Quadtree, dt: f64, strategy: UpdateStrategy) -> StepStats {
    debug_assert!(dt >= 0.0, "time step must be non-negative, got {dt}");

    let mut pass = Pass {
        bodies,
        tree,
        dt,
        stats: StepStats::default(),
        branch_buf: Vec::new(),
        body_buf: Vec::new(),
    };

    let n = pass.bodies.len();
    match strategy {
        UpdateStrategy::FlattenedBodies => (0..n).for_each(|i| pass.flattened(i)),
        UpdateStrategy::LeafBranches => (0..n).for_each(|i| pass.leaf_branches(i)),
        UpdateStrategy::BoundaryAware => pass.boundary_aware(tree.root_id()),
        UpdateStrategy::BruteForce => (0..n).for_each(|i| pass.brute_force(i)),
    }

    pass.stats
}

/// State shared by one update pass; the query buffers are reused across bodies.
struct Pass<'a> {
    bodies: &'a mut [Body],
    tree: &'a Quadtree,
    dt: f64,
    stats: StepStats,
    branch_buf: Vec<BranchId>,
    body_buf: Vec<usize>,
}

impl<'a> Pass<'a> {
    fn bounding_square(&self, i: usize) -> Rect {
        let b = &self.bodies[i];
        Rect::bounding_square(&b.x, b.radius)
    }

    fn resolve(&mut self, i: usize, j: usize) {
        if i == j {
            return; // skip self
        }
        if resolve_pair(self.bodies, i, j) {
            self.stats.contacts += 1;
        }
    }

    // x_n+1 = x_n + dt * v
    fn integrate(&mut self, i: usize) {
        let b = &mut self.bodies[i];
        b.x += b.v * self.dt;
    }

    fn flattened(&mut self, i: usize) {
        let square = self.bounding_square(i);

        let mut found = std::mem::take(&mut self.body_buf);
        found.clear();
        self.tree.find_bodies(&square, &mut found);
        self.stats.broad_queries += 1;

        for &j in &found {
            self.resolve(i, j);
        }

        self.body_buf = found;
        self.integrate(i);
    }

    fn leaf_branches(&mut self, i: usize) {
        let square = self.bounding_square(i);
        self.resolve_in_overlapping_leaves(i, &square);
        self.integrate(i);
    }

    fn resolve_in_overlapping_leaves(&mut self, i: usize, square: &Rect) {
        let tree = self.tree;

        let mut found = std::mem::take(&mut self.branch_buf);
        found.clear();
        tree.find_branches(square, &mut found);
        self.stats.broad_queries += 1;

        for &branch_id in &found {
            for &j in tree.branch(branch_id).bodies() {
                self.resolve(i, j);
            }
        }

        self.branch_buf = found;
    }

    /// Recursive walk from `branch_id`.
    ///
    /// A circle sits inside its bounding square, so when the square is fully
    /// inside the leaf no body of another leaf can reach it unless that
    /// body's own square straddles a leaf edge, and that body will find this
    /// one through its broad query.
    fn boundary_aware(&mut self, branch_id: BranchId) {
        let tree = self.tree;
        let branch = tree.branch(branch_id);
        let leaf_rect = *branch.rect();
        let held = branch.bodies();

        for &i in held {
            let square = self.bounding_square(i);
            if rect_fully_inside(&square, &leaf_rect) {
                for &j in held {
                    self.resolve(i, j);
                }
            } else {
                self.resolve_in_overlapping_leaves(i, &square);
            }
            self.integrate(i);
        }

        for &child in branch.children() {
            self.boundary_aware(child);
        }
    }

    fn brute_force(&mut self, i: usize) {
        for j in (i + 1)..self.bodies.len() {
            self.resolve(i, j);
        }
        self.integrate(i);
    }
}
