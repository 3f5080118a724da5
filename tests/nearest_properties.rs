use approx::assert_relative_eq;
use kd_nearest::{KdTree, KdTreeError, Side, brute_force};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_points(rng: &mut StdRng, n: usize, k: usize) -> Vec<Vec<f64>> {
    (0..n).map(|_| (0..k).map(|_| rng.gen_range(-50.0..50.0)).collect()).collect()
}

/// Points on a coarse integer lattice, so duplicates and ties are frequent.
fn lattice_points(rng: &mut StdRng, n: usize, k: usize) -> Vec<Vec<i32>> {
    (0..n).map(|_| (0..k).map(|_| rng.gen_range(0..4)).collect()).collect()
}

fn sorted(mut points: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    points.sort_by(|a, b| a.partial_cmp(b).unwrap());
    points
}

#[test]
fn test_every_point_stored_once() {
    let mut rng = StdRng::seed_from_u64(1);
    for n in [0, 1, 2, 3, 17, 256] {
        let points = random_points(&mut rng, n, 3);
        let tree = KdTree::build(points.clone()).unwrap();
        assert_eq!(tree.len(), n);
        let stored: Vec<Vec<f64>> = tree.points().map(|p| p.to_vec()).collect();
        assert_eq!(sorted(stored), sorted(points), "Tree must hold exactly the input multiset");
    }
}

#[test]
fn test_partition_invariant_holds_at_every_node() {
    let mut rng = StdRng::seed_from_u64(2);
    let points = lattice_points(&mut rng, 300, 3);
    let tree = KdTree::build(points).unwrap();
    let k = tree.dimensions().unwrap();

    for visit in tree.pre_order() {
        let node = tree.get(visit.id).unwrap();
        let axis = visit.depth % k;
        let split = node.point()[axis];

        // Collect every point below each child and compare on the split axis.
        for side in [Side::Left, Side::Right] {
            let mut stack: Vec<_> = node.child(side).into_iter().collect();
            while let Some(id) = stack.pop() {
                let below = tree.get(id).unwrap();
                match side {
                    Side::Left => assert!(below.point()[axis] < split, "Left subtree must be below the split"),
                    Side::Right => assert!(below.point()[axis] >= split, "Right subtree must be at or above the split"),
                }
                stack.extend(below.left());
                stack.extend(below.right());
            }
        }
    }
}

#[test]
fn test_self_lookup_finds_zero_distance() {
    let mut rng = StdRng::seed_from_u64(3);
    let points = random_points(&mut rng, 200, 2);
    let tree = KdTree::build(points.clone()).unwrap();
    for p in &points {
        let result = tree.nearest(p).unwrap();
        assert_eq!(&result.point, p);
        assert_eq!(result.squared_distance, 0.0);
    }
}

#[test]
fn test_nearest_matches_linear_scan() {
    let mut rng = StdRng::seed_from_u64(4);
    for k in 1..=4 {
        let points = random_points(&mut rng, 400, k);
        let tree = KdTree::build(points.clone()).unwrap();
        for goal in random_points(&mut rng, 100, k) {
            let from_tree = tree.nearest(&goal).unwrap();
            let from_scan = brute_force::nearest(&points, &goal).unwrap();
            assert_relative_eq!(from_tree.squared_distance, from_scan.squared_distance);
        }
    }
}

#[test]
fn test_nearest_matches_linear_scan_with_duplicates() {
    let mut rng = StdRng::seed_from_u64(5);
    let points = lattice_points(&mut rng, 150, 2);
    let tree = KdTree::build(points.clone()).unwrap();
    for goal in lattice_points(&mut rng, 60, 2) {
        let from_tree = tree.nearest(&goal).unwrap();
        let from_scan = brute_force::nearest(&points, &goal).unwrap();
        assert_eq!(from_tree.squared_distance, from_scan.squared_distance, "goal {goal:?}");
    }
}

#[test]
fn test_k_nearest_and_radius_match_linear_scan() {
    let mut rng = StdRng::seed_from_u64(6);
    let points = random_points(&mut rng, 300, 3);
    let tree = KdTree::build(points.clone()).unwrap();

    for goal in random_points(&mut rng, 40, 3) {
        let n = rng.gen_range(1..20);
        let from_tree: Vec<f64> = tree.k_nearest(&goal, n).unwrap().iter().map(|r| r.squared_distance).collect();
        let from_scan: Vec<f64> = brute_force::k_nearest(&points, &goal, n)
            .unwrap()
            .iter()
            .map(|r| r.squared_distance)
            .collect();
        assert_eq!(from_tree, from_scan);

        let radius_squared = rng.gen_range(0.0..400.0);
        let from_tree = sorted(tree.within_radius(&goal, radius_squared).unwrap().into_iter().map(|r| r.point).collect());
        let from_scan = sorted(
            brute_force::within_radius(&points, &goal, radius_squared)
                .unwrap()
                .into_iter()
                .map(|r| r.point)
                .collect(),
        );
        assert_eq!(from_tree, from_scan);
    }
}

#[test]
fn test_narrow_integers_match_linear_scan_when_distances_overflow() {
    // Differences reach 400, so many squared distances do not fit in i16.
    let mut rng = StdRng::seed_from_u64(9);
    let points: Vec<Vec<i16>> = (0..120).map(|_| vec![rng.gen_range(-200..200), rng.gen_range(-200..200)]).collect();
    let tree = KdTree::build(points.clone()).unwrap();

    let mut overflowed = 0;
    for _ in 0..80 {
        let goal: [i16; 2] = [rng.gen_range(-200..200), rng.gen_range(-200..200)];
        let from_tree = tree.nearest(&goal).map(|r| r.squared_distance);
        let from_scan = brute_force::nearest(&points, &goal).map(|r| r.squared_distance);
        assert_eq!(from_tree, from_scan, "goal {goal:?}");

        let n = rng.gen_range(1..40);
        let from_tree: Result<Vec<i16>, _> =
            tree.k_nearest(&goal, n).map(|found| found.iter().map(|r| r.squared_distance).collect());
        let from_scan: Result<Vec<i16>, _> =
            brute_force::k_nearest(&points, &goal, n).map(|found| found.iter().map(|r| r.squared_distance).collect());
        assert_eq!(from_tree, from_scan, "goal {goal:?}, n {n}");
        if from_tree == Err(KdTreeError::DistanceOverflow) {
            overflowed += 1;
        }

        assert_eq!(
            tree.within_radius(&goal, i16::MAX).unwrap().len(),
            brute_force::within_radius(&points, &goal, i16::MAX).unwrap().len()
        );
    }
    assert!(overflowed < 80, "Most goals should still find their neighbors");
}

#[test]
fn test_build_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(7);
    let points = lattice_points(&mut rng, 120, 3);
    let first = KdTree::build(points.clone()).unwrap();
    let second = KdTree::build(points).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_all_identical_points_terminate() {
    let points = vec![vec![2.5, -1.0]; 300];
    let (tree, stats) = KdTree::build_with_stats(points).unwrap();
    assert_eq!(tree.len(), 300);
    assert_eq!(stats.degenerate_splits, 299);

    let result = tree.nearest(&[0.0, 0.0]).unwrap();
    assert_eq!(result.point, vec![2.5, -1.0]);
    assert_eq!(tree.k_nearest(&[2.5, -1.0], 10).unwrap().len(), 10);
    assert_eq!(tree.within_radius(&[2.5, -1.0], 0.0).unwrap().len(), 300);
}

#[test]
fn test_empty_input_then_query_fails() {
    let tree: KdTree<f64> = KdTree::build(vec![]).unwrap();
    assert!(tree.is_empty());
    assert_eq!(tree.nearest(&[0.0]), Err(KdTreeError::EmptyTree));
}

#[test]
fn test_sample_scenario_against_scan() {
    let points = vec![
        vec![2.0, 3.0],
        vec![5.0, 4.0],
        vec![9.0, 6.0],
        vec![4.0, 7.0],
        vec![8.0, 1.0],
        vec![7.0, 2.0],
    ];
    let tree = KdTree::build(points.clone()).unwrap();
    let result = tree.nearest(&[3.0, 4.5]).unwrap();
    assert_eq!(result.point, vec![2.0, 3.0]);
    assert_relative_eq!(result.squared_distance, 3.25);

    let scan_min = points
        .iter()
        .map(|p| brute_force::nearest(&[p.clone()], &[3.0, 4.5]).unwrap().squared_distance)
        .fold(f64::INFINITY, f64::min);
    assert_relative_eq!(scan_min, 3.25);
}

#[test]
fn test_tree_is_shareable_across_threads() {
    let mut rng = StdRng::seed_from_u64(8);
    let points = random_points(&mut rng, 500, 2);
    let tree = KdTree::build(points.clone()).unwrap();
    let goals = random_points(&mut rng, 8, 2);

    std::thread::scope(|scope| {
        for goal in &goals {
            let tree = &tree;
            let points = &points;
            scope.spawn(move || {
                let from_tree = tree.nearest(goal).unwrap();
                let from_scan = brute_force::nearest(points, goal).unwrap();
                assert_relative_eq!(from_tree.squared_distance, from_scan.squared_distance);
            });
        }
    });
}
