//! Narrow-phase physics for circles
//!
//! Window-edge reflection and pairwise elastic collision. None of this knows
//! about the quadtree; the update strategies decide which pairs to feed in.

use crate::simulation::params::Window;
use crate::simulation::states::{Body, NVec2};

/// Offset applied along +x when two centres coincide exactly
pub const COINCIDENT_NUDGE: f64 = 0.01;

/// Reflect `v` about a unit normal `n`: v - 2 (v . n) n
fn reflect(v: &NVec2, n: &NVec2) -> NVec2 {
    v - 2.0 * v.dot(n) * n
}

/// Keep a body inside the window.
///
/// If the circle pokes past an edge, its velocity is reflected about that
/// edge's inward normal and its centre is moved so the circle just touches the
/// edge. The y axis is checked first, then x, so a body stuck in a corner is
/// corrected on both axes in one call.
///
/// Returns true if any correction was applied.
pub fn resolve_edge_collision(body: &mut Body, window: &Window) -> bool {
    let top_normal = NVec2::new(0.0, -1.0);
    let bottom_normal = -top_normal;
    let left_normal = NVec2::new(1.0, 0.0);
    let right_normal = -left_normal;

    let mut hit = false;

    if body.x.y - body.radius < 0.0 {
        body.v = reflect(&body.v, &top_normal);
        body.x.y = body.radius;
        hit = true;
    } else if body.x.y + body.radius > window.height {
        body.v = reflect(&body.v, &bottom_normal);
        body.x.y = window.height - body.radius;
        hit = true;
    }

    if body.x.x - body.radius < 0.0 {
        body.v = reflect(&body.v, &left_normal);
        body.x.x = body.radius;
        hit = true;
    } else if body.x.x + body.radius > window.width {
        body.v = reflect(&body.v, &right_normal);
        body.x.x = window.width - body.radius;
        hit = true;
    }

    hit
}

/// Resolve an elastic collision between two circles, if they overlap.
///
/// The velocity components along the line of centres are exchanged with the
/// 1D elastic formula; tangential components are untouched. Both bodies are
/// then pushed apart along the same line by half the overlap each, leaving
/// them exactly in contact.
///
/// Coincident centres have no defined line of centres, so `a` is first nudged
/// by [`COINCIDENT_NUDGE`] along +x.
///
/// Returns true if the bodies were overlapping.
pub fn resolve_elastic_collision(a: &mut Body, b: &mut Body) -> bool {
    if a.x == b.x {
        a.x.x += COINCIDENT_NUDGE;
    }

    let radius_sum = a.radius + b.radius;
    let to_b = b.x - a.x;
    let distance = to_b.norm();

    if distance >= radius_sum {
        return false;
    }

    let n = to_b / distance;

    // 1D elastic exchange along n
    let va_n = a.v.dot(&n);
    let vb_n = b.v.dot(&n);
    let total_m = a.m + b.m;
    let va_n_new = (va_n * (a.m - b.m) + 2.0 * b.m * vb_n) / total_m;
    let vb_n_new = (vb_n * (b.m - a.m) + 2.0 * a.m * va_n) / total_m;

    a.v += (va_n_new - va_n) * n;
    b.v += (vb_n_new - vb_n) * n;

    // symmetric de-overlap
    let half_overlap = (radius_sum - distance) * 0.5;
    a.x -= n * half_overlap;
    b.x += n * half_overlap;

    true
}

/// Resolve a collision between `bodies[i]` and `bodies[j]` in place.
///
/// Panics if `i == j` or either index is out of bounds.
pub fn resolve_pair(bodies: &mut [Body], i: usize, j: usize) -> bool {
    assert_ne!(i, j, "a body cannot collide with itself");
    if i < j {
        let (head, tail) = bodies.split_at_mut(j);
        resolve_elastic_collision(&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(i);
        resolve_elastic_collision(&mut tail[0], &mut head[j])
    }
}
