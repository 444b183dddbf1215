use std::collections::BTreeSet;

use proptest::prelude::*;

use qtsim::{
    point_in_rect, rect_overlaps, resolve_edge_collision, resolve_elastic_collision, Body, NVec2,
    Quadtree, Rect, TreePolicy, Window,
};

const SIDE: f64 = 100.0;

fn window() -> Window {
    Window::new(SIDE, SIDE)
}

prop_compose! {
    fn arb_body()(x in 0.0..=SIDE, y in 0.0..=SIDE, vx in -50.0..50.0, vy in -50.0..50.0, radius in 0.5..4.0) -> Body {
        Body::new(NVec2::new(x, y), NVec2::new(vx, vy), radius)
    }
}

prop_compose! {
    fn arb_policy()(split in 1usize..6, depth in 0u32..6) -> TreePolicy {
        TreePolicy::new(split, depth)
    }
}

prop_compose! {
    fn arb_region()(x in -20.0..SIDE, y in -20.0..SIDE, w in 0.0..60.0, h in 0.0..60.0) -> Rect {
        Rect::new(NVec2::new(x, y), w, h)
    }
}

fn built(bodies: &[Body], policy: TreePolicy) -> Quadtree {
    let mut tree = Quadtree::new(window(), policy);
    tree.rebuild(bodies);
    tree
}

fn close(a: &NVec2, b: &NVec2) -> bool {
    (a - b).norm() <= 1e-9 * (1.0 + a.norm().max(b.norm()))
}

proptest! {
    #[test]
    fn every_body_sits_in_the_leaf_containing_it(
        bodies in prop::collection::vec(arb_body(), 0..200),
        policy in arb_policy(),
    ) {
        let tree = built(&bodies, policy);

        for (i, b) in bodies.iter().enumerate() {
            let leaf = tree.find_branch(&b.x).expect("body inside window");
            let branch = tree.branch(leaf);
            prop_assert!(point_in_rect(branch.rect(), &b.x));
            prop_assert!(branch.bodies().contains(&i));
        }
        prop_assert_eq!(tree.stats().bodies, bodies.len());
    }

    #[test]
    fn depth_never_exceeds_threshold_plus_one(
        bodies in prop::collection::vec(arb_body(), 0..200),
        policy in arb_policy(),
    ) {
        let tree = built(&bodies, policy);
        prop_assert!(tree.stats().max_depth <= policy.depth_threshold + 1);
    }

    #[test]
    fn branches_have_zero_or_four_children(
        bodies in prop::collection::vec(arb_body(), 0..200),
        policy in arb_policy(),
    ) {
        let tree = built(&bodies, policy);

        for branch in tree.branches() {
            let n = branch.children().len();
            prop_assert!(n == 0 || n == 4);
            if branch.is_fork() {
                prop_assert!(branch.bodies().is_empty());
                for &child in branch.children() {
                    prop_assert_eq!(tree.branch(child).depth(), branch.depth() + 1);
                }
            } else if branch.depth() <= policy.depth_threshold {
                prop_assert!(branch.bodies().len() <= policy.split_threshold);
            }
        }
    }

    #[test]
    fn find_bodies_matches_overlapping_leaves(
        bodies in prop::collection::vec(arb_body(), 0..150),
        policy in arb_policy(),
        region in arb_region(),
    ) {
        let tree = built(&bodies, policy);

        let mut found = Vec::new();
        tree.find_bodies(&region, &mut found);
        let found: BTreeSet<usize> = found.into_iter().collect();

        let expected: BTreeSet<usize> = tree
            .leaves()
            .filter(|leaf| rect_overlaps(leaf.rect(), &region))
            .flat_map(|leaf| leaf.bodies().iter().copied())
            .collect();
        prop_assert_eq!(&found, &expected);

        for (i, b) in bodies.iter().enumerate() {
            if point_in_rect(&region, &b.x) {
                prop_assert!(found.contains(&i), "body {} inside region was missed", i);
            }
        }

        let mut branches = Vec::new();
        let any = tree.find_branches(&region, &mut branches);
        prop_assert_eq!(any, !branches.is_empty());
        for id in branches {
            prop_assert!(!tree.branch(id).is_fork());
            prop_assert!(rect_overlaps(tree.branch(id).rect(), &region));
        }
    }

    #[test]
    fn rebuild_is_idempotent(
        bodies in prop::collection::vec(arb_body(), 0..200),
        policy in arb_policy(),
    ) {
        let mut tree = built(&bodies, policy);
        let first = tree.branches().to_vec();
        tree.rebuild(&bodies);
        prop_assert_eq!(tree.branches(), first.as_slice());
    }

    #[test]
    fn elastic_collision_is_symmetric(a in arb_body(), b in arb_body()) {
        prop_assume!(a.x != b.x);

        let (mut a1, mut b1) = (a.clone(), b.clone());
        let hit_ab = resolve_elastic_collision(&mut a1, &mut b1);

        let (mut a2, mut b2) = (a.clone(), b.clone());
        let hit_ba = resolve_elastic_collision(&mut b2, &mut a2);

        prop_assert_eq!(hit_ab, hit_ba);
        prop_assert!(close(&a1.x, &a2.x) && close(&b1.x, &b2.x));
        prop_assert!(close(&a1.v, &a2.v) && close(&b1.v, &b2.v));
    }

    #[test]
    fn edge_resolution_keeps_circle_inside(
        x in -50.0..150.0,
        y in -50.0..150.0,
        vx in -50.0..50.0,
        vy in -50.0..50.0,
        radius in 0.5..10.0,
    ) {
        let mut body = Body::new(NVec2::new(x, y), NVec2::new(vx, vy), radius);
        let speed = body.v.norm();

        resolve_edge_collision(&mut body, &window());

        prop_assert!(body.x.x - body.radius >= -1e-9 && body.x.x + body.radius <= SIDE + 1e-9);
        prop_assert!(body.x.y - body.radius >= -1e-9 && body.x.y + body.radius <= SIDE + 1e-9);
        prop_assert!((body.v.norm() - speed).abs() <= 1e-9 * (1.0 + speed), "reflection keeps speed");
    }
}
