//! # Quadtree broad phase (2D)
//!
//! This module implements a **region quadtree** over circle centres, used to
//! prune collision candidates. Instead of testing all `N²` pairs, each body
//! only looks at bodies stored in leaves that overlap its bounding square.
//!
//! ## Core Concepts
//!
//! - The window is the root rectangle. It is recursively split into four
//!   equal quadrants (top-left, top-right, bottom-left, bottom-right).
//! - Every node of the tree is a [`Branch`]. A branch is either
//!   - a **leaf**, holding indices of the bodies whose centre falls inside it, or
//!   - a **fork**, holding exactly four child branches and no bodies.
//! - A leaf forks when an insertion finds it already holding
//!   `split_threshold` bodies, provided its depth is not above
//!   `depth_threshold`. Deeper leaves simply keep growing, which bounds the
//!   tree height at `depth_threshold + 1` no matter how bodies cluster.
//! - Forks never merge back into leaves. The tree is thrown away and rebuilt
//!   from scratch every frame with [`Quadtree::rebuild`].
//!
//! ## Storage
//!
//! Branches live in one `Vec<Branch>` arena and refer to their children by
//! [`BranchId`]. The root is always id `0`. Bodies are referenced by their
//! index into the caller's `&[Body]` slice; the tree never holds a reference
//! to a body, so there is nothing a reallocation of the body list could
//! leave dangling. Indices are only meaningful for the slice the tree was
//! built from, until the next rebuild.

use tracing::trace;

use crate::simulation::geometry::{point_in_rect, rect_overlaps, Rect};
use crate::simulation::params::{TreePolicy, Window};
use crate::simulation::states::{Body, NVec2};

/// Index of a branch inside [`Quadtree::branches`]
pub type BranchId = usize;

/// Contents of a branch: bodies for a leaf, four children for a fork.
#[derive(Debug, Clone, PartialEq)]
pub enum BranchKind {
    Leaf(Vec<usize>), // indices into the body slice
    Fork([BranchId; 4]), // top-left, top-right, bottom-left, bottom-right
}

/// A single quadtree node covering the rectangle `rect`.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    depth: u32,
    rect: Rect,
    kind: BranchKind,
}

impl Branch {
    fn leaf(depth: u32, rect: Rect) -> Self {
        Self {
            depth,
            rect,
            kind: BranchKind::Leaf(Vec::new()),
        }
    }

    /// Depth of this branch, 0 at the root
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Spatial extent of this branch
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    pub fn kind(&self) -> &BranchKind {
        &self.kind
    }

    pub fn is_fork(&self) -> bool {
        matches!(self.kind, BranchKind::Fork(_))
    }

    /// Child ids; empty for a leaf
    pub fn children(&self) -> &[BranchId] {
        match &self.kind {
            BranchKind::Fork(children) => children,
            BranchKind::Leaf(_) => &[],
        }
    }

    /// Body indices held directly by this branch; empty for a fork
    pub fn bodies(&self) -> &[usize] {
        match &self.kind {
            BranchKind::Leaf(bodies) => bodies,
            BranchKind::Fork(_) => &[],
        }
    }
}

/// Shape summary of a built tree, mostly for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeStats {
    pub branches: usize, // total branches, forks included
    pub leaves: usize, // leaf branches
    pub max_depth: u32, // deepest branch
    pub max_leaf_bodies: usize, // largest leaf body list
    pub bodies: usize, // bodies stored across all leaves
}

/// A quadtree spanning the simulation window.
///
/// Built once, then [`rebuild`](Quadtree::rebuild)-ed every frame from the
/// current body list.
#[derive(Debug, Clone)]
pub struct Quadtree {
    branches: Vec<Branch>,
    window: Window,
    policy: TreePolicy,
}

impl Quadtree {
    const ROOT: BranchId = 0;

    /// Create a tree holding a single empty root leaf covering `window`.
    ///
    /// # Panics
    /// If `policy.depth_threshold` exceeds [`TreePolicy::MAX_DEPTH_THRESHOLD`].
    pub fn new(window: Window, policy: TreePolicy) -> Self {
        assert!(
            policy.depth_threshold <= TreePolicy::MAX_DEPTH_THRESHOLD,
            "depth_threshold {} exceeds the maximum of {}",
            policy.depth_threshold,
            TreePolicy::MAX_DEPTH_THRESHOLD
        );
        let mut tree = Self {
            branches: Vec::new(),
            window,
            policy,
        };
        tree.reset();
        tree
    }

    /// Drop every branch and body, leaving one empty root leaf over the window.
    pub fn reset(&mut self) {
        self.branches.clear();
        self.branches.push(Branch::leaf(0, self.window.rect()));
    }

    /// Reset, then insert every body in list order.
    ///
    /// Insertion order shapes the tree (which leaf forks first) but never
    /// changes which bodies a region query reports.
    ///
    /// # Panics
    /// If any body's position lies outside the window.
    pub fn rebuild(&mut self, bodies: &[Body]) {
        self.reset();
        for body_idx in 0..bodies.len() {
            self.add_body(body_idx, bodies);
        }
    }

    /// Insert `bodies[body_idx]` into the leaf containing its position.
    ///
    /// # Panics
    /// If the body's position lies outside the root rectangle. The root
    /// always spans the whole window, so this is a caller bug: bodies must be
    /// kept inside the window before the tree is rebuilt.
    pub fn add_body(&mut self, body_idx: usize, bodies: &[Body]) {
        let pos = bodies[body_idx].x;
        let leaf = self.find_branch(&pos).unwrap_or_else(|| {
            panic!(
                "body {body_idx} at ({}, {}) lies outside the quadtree root {:?}",
                pos.x,
                pos.y,
                self.root().rect()
            )
        });
        self.insert_into(leaf, body_idx, bodies);
    }

    /// Point location from the root.
    ///
    /// Returns the leaf whose rectangle contains `point`, or `None` if the
    /// point lies outside the window.
    pub fn find_branch(&self, point: &NVec2) -> Option<BranchId> {
        self.find_branch_from(Self::ROOT, point)
    }

    /// Point location restricted to the subtree rooted at `branch_id`.
    ///
    /// Children are tried in quadrant order and edges are inclusive, so a
    /// point on a shared edge goes to the first quadrant that touches it.
    pub fn find_branch_from(&self, branch_id: BranchId, point: &NVec2) -> Option<BranchId> {
        let branch = &self.branches[branch_id];
        if !point_in_rect(&branch.rect, point) {
            return None;
        }

        match &branch.kind {
            BranchKind::Leaf(_) => Some(branch_id),
            BranchKind::Fork(children) => children
                .iter()
                .find_map(|&child| self.find_branch_from(child, point))
                // Rounding can leave a sliver on the far edge of the fork
                // that no child rectangle covers; pick by centre instead.
                .or_else(|| Some(self.descend_nearest(branch_id, point))),
        }
    }

    /// Collect every leaf whose rectangle overlaps `region` into `out`.
    ///
    /// Forks are only recursed into, never collected. `out` must be empty on
    /// entry; the caller owns it so one buffer can serve a whole frame.
    ///
    /// Returns true if at least one leaf was found.
    pub fn find_branches(&self, region: &Rect, out: &mut Vec<BranchId>) -> bool {
        debug_assert!(out.is_empty(), "find_branches expects an empty output buffer");
        self.collect_branches(Self::ROOT, region, out);
        !out.is_empty()
    }

    /// Collect the bodies of every leaf whose rectangle overlaps `region`.
    ///
    /// This is a broad-phase filter: the result is a superset of the bodies
    /// whose centre is inside `region`. `out` must be empty on entry.
    ///
    /// Returns true if at least one body was found.
    pub fn find_bodies(&self, region: &Rect, out: &mut Vec<usize>) -> bool {
        debug_assert!(out.is_empty(), "find_bodies expects an empty output buffer");
        self.collect_bodies(Self::ROOT, region, out);
        !out.is_empty()
    }

    pub fn root_id(&self) -> BranchId {
        Self::ROOT
    }

    pub fn root(&self) -> &Branch {
        &self.branches[Self::ROOT]
    }

    /// # Panics
    /// If `id` does not name a branch of this tree.
    pub fn branch(&self, id: BranchId) -> &Branch {
        &self.branches[id]
    }

    /// All branches in allocation order; the root comes first.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Iterator over leaf branches, e.g. for drawing the partition.
    pub fn leaves(&self) -> impl Iterator<Item = &Branch> + '_ {
        self.branches.iter().filter(|b| !b.is_fork())
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn policy(&self) -> &TreePolicy {
        &self.policy
    }

    pub fn stats(&self) -> TreeStats {
        self.branches.iter().fold(TreeStats::default(), |mut stats, branch| {
            stats.branches += 1;
            stats.max_depth = stats.max_depth.max(branch.depth);
            if let BranchKind::Leaf(bodies) = &branch.kind {
                stats.leaves += 1;
                stats.bodies += bodies.len();
                stats.max_leaf_bodies = stats.max_leaf_bodies.max(bodies.len());
            }
            stats
        })
    }

    // helpers ==============================================================================

    /// Insert a body into a leaf, forking the leaf if it is full.
    ///
    /// - If the leaf holds fewer than `split_threshold` bodies, or is deeper
    ///   than `depth_threshold`, the body is appended.
    /// - Otherwise the leaf is split into four quadrant children, then the new
    ///   body followed by every body the leaf held is re-inserted through
    ///   point location from this branch. The branch is a fork from then on.
    ///
    /// Re-insertion may fork a child in turn when all bodies land in the same
    /// quadrant; depth grows by one each time, so this stops at
    /// `depth_threshold + 1`.
    fn insert_into(&mut self, branch_id: BranchId, body_idx: usize, bodies: &[Body]) {
        let TreePolicy {
            split_threshold,
            depth_threshold,
        } = self.policy;

        // Snapshot by value so no borrow of the arena is live while recursing
        let depth = self.branches[branch_id].depth;
        let rect = self.branches[branch_id].rect;

        if let BranchKind::Fork(children) = self.branches[branch_id].kind {
            // point location already descends past forks; keep the call total anyway
            let pos = bodies[body_idx].x;
            let leaf = self.descend_nearest(children[quadrant_for_point(&pos, &rect)], &pos);
            self.insert_into(leaf, body_idx, bodies);
            return;
        }

        let held = match &mut self.branches[branch_id].kind {
            BranchKind::Leaf(held) if held.len() < split_threshold || depth > depth_threshold => {
                held.push(body_idx);
                return;
            }
            BranchKind::Leaf(held) => std::mem::take(held),
            BranchKind::Fork(_) => unreachable!("forks are handled above"),
        };

        self.subdivide(branch_id, depth, &rect);
        trace!(branch = branch_id, depth, bodies = held.len() + 1, "fork");

        for idx in std::iter::once(body_idx).chain(held) {
            let pos = bodies[idx].x;
            let leaf = self
                .find_branch_from(branch_id, &pos)
                .unwrap_or_else(|| self.descend_nearest(branch_id, &pos));
            self.insert_into(leaf, idx, bodies);
        }
    }

    /// Turn `branch_id` into a fork with four fresh empty leaves.
    fn subdivide(&mut self, branch_id: BranchId, depth: u32, rect: &Rect) {
        let first = self.branches.len();
        for quadrant in rect.quadrants() {
            self.branches.push(Branch::leaf(depth + 1, quadrant));
        }
        self.branches[branch_id].kind = BranchKind::Fork([first, first + 1, first + 2, first + 3]);
    }

    /// Walk down to a leaf choosing children by centre comparison only.
    fn descend_nearest(&self, mut branch_id: BranchId, point: &NVec2) -> BranchId {
        while let BranchKind::Fork(children) = &self.branches[branch_id].kind {
            branch_id = children[quadrant_for_point(point, &self.branches[branch_id].rect)];
        }
        branch_id
    }

    fn collect_branches(&self, branch_id: BranchId, region: &Rect, out: &mut Vec<BranchId>) {
        let branch = &self.branches[branch_id];
        match &branch.kind {
            BranchKind::Leaf(_) => {
                if rect_overlaps(region, &branch.rect) {
                    out.push(branch_id);
                }
            }
            BranchKind::Fork(children) => {
                for &child in children {
                    self.collect_branches(child, region, out);
                }
            }
        }
    }

    fn collect_bodies(&self, branch_id: BranchId, region: &Rect, out: &mut Vec<usize>) {
        let branch = &self.branches[branch_id];
        match &branch.kind {
            BranchKind::Leaf(held) => {
                if !held.is_empty() && rect_overlaps(region, &branch.rect) {
                    out.extend_from_slice(held);
                }
            }
            BranchKind::Fork(children) => {
                for &child in children {
                    self.collect_bodies(child, region, out);
                }
            }
        }
    }
}

/// Quadrant index of `p` relative to the centre of `rect`.
///
/// - Bit 0 (value 1): x axis, 0 for left (x < centre.x), 1 for right
/// - Bit 1 (value 2): y axis, 0 for top (y < centre.y), 1 for bottom
///
/// This matches the child order of [`BranchKind::Fork`].
fn quadrant_for_point(p: &NVec2, rect: &Rect) -> usize {
    let center = rect.center();
    let mut idx = 0;

    if p.x >= center.x { idx |= 1; } // bit 0
    if p.y >= center.y { idx |= 2; } // bit 1

    idx
}
