use clusterstep::{Dataset, DbscanEngine, KMeansEngine, KMeansState, NOISE, NeighborIndex, Point2D};
use proptest::prelude::*;
use std::collections::HashSet;

fn coords() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0f64..200.0, 0.0f64..200.0), 1..60)
}

proptest! {
    #[test]
    fn prop_dbscan_visits_each_point_once(
        data in coords(),
        epsilon in 1.0f64..60.0,
        min_points in 1usize..8,
    ) {
        let data = Dataset::from_coords(&data);
        let mut engine = DbscanEngine::new(epsilon, min_points).unwrap();
        let (mut d, mut s) = engine.initialize(&data);
        let mut visited_at: Vec<Option<usize>> = vec![None; d.len()];

        let mut step = 0;
        while !s.is_done() {
            let (next_d, next_s) = engine.step(&d, &s);
            step += 1;
            let newly: Vec<usize> = (0..d.len())
                .filter(|&i| !d[i].visited && next_d[i].visited)
                .collect();
            prop_assert!(newly.len() <= 1);
            for i in newly {
                prop_assert!(visited_at[i].is_none());
                visited_at[i] = Some(step);
            }
            for i in 0..d.len() {
                prop_assert!(!(d[i].visited && !next_d[i].visited));
            }
            d = next_d;
            s = next_s;
        }

        prop_assert!(visited_at.iter().all(|v| v.is_some()));
        prop_assert!(d.iter().all(|p| p.cluster.is_some()));
    }

    #[test]
    fn prop_dbscan_is_deterministic(
        data in coords(),
        epsilon in 1.0f64..60.0,
        min_points in 1usize..8,
    ) {
        let data = Dataset::from_coords(&data);
        let (a, sa) = DbscanEngine::new(epsilon, min_points).unwrap().run_to_completion(&data);
        let (b, sb) = DbscanEngine::new(epsilon, min_points).unwrap().run_to_completion(&data);
        prop_assert_eq!(a, b);
        prop_assert_eq!(sa.cluster_counter(), sb.cluster_counter());
    }

    #[test]
    fn prop_dbscan_ids_are_contiguous(
        data in coords(),
        epsilon in 1.0f64..60.0,
        min_points in 1usize..8,
    ) {
        let data = Dataset::from_coords(&data);
        let (result, state) = DbscanEngine::new(epsilon, min_points).unwrap().run_to_completion(&data);

        let used: HashSet<i32> = result
            .iter()
            .filter_map(|p| p.cluster)
            .filter(|&c| c != NOISE)
            .collect();
        let expected: HashSet<i32> = (1..=state.cluster_counter()).collect();
        prop_assert_eq!(used, expected);
    }

    #[test]
    fn prop_dbscan_cluster_membership_is_final(
        data in coords(),
        epsilon in 1.0f64..60.0,
        min_points in 1usize..8,
    ) {
        let data = Dataset::from_coords(&data);
        let mut engine = DbscanEngine::new(epsilon, min_points).unwrap();
        let (mut d, mut s) = engine.initialize(&data);

        let mut counter = s.cluster_counter();
        while !s.is_done() {
            let (next_d, next_s) = engine.step(&d, &s);
            prop_assert!(next_s.cluster_counter() >= counter);
            prop_assert!(next_s.cluster_counter() <= counter + 1);
            for i in 0..d.len() {
                if let Some(c) = d[i].cluster {
                    if c >= 1 {
                        // Cluster membership is final.
                        prop_assert_eq!(next_d[i].cluster, Some(c));
                    }
                }
            }
            counter = next_s.cluster_counter();
            d = next_d;
            s = next_s;
        }
    }

    #[test]
    fn prop_dbscan_noise_is_reclaimed_by_core_neighbors(
        data in coords(),
        epsilon in 1.0f64..60.0,
        min_points in 1usize..8,
    ) {
        let data = Dataset::from_coords(&data);
        let (result, _) = DbscanEngine::new(epsilon, min_points).unwrap().run_to_completion(&data);
        let index = NeighborIndex::build(&result, epsilon);
        let is_core = |i: usize| index.neighbors(i).len() >= min_points;

        for i in 0..result.len() {
            if result[i].cluster == Some(NOISE) {
                // Noise only survives where no core point can reach it.
                prop_assert!(!is_core(i));
                prop_assert!(index.neighbors(i).into_iter().all(|n| !is_core(n)));
            } else if is_core(i) {
                let own = result[i].cluster;
                prop_assert!(index.neighbors(i).into_iter().all(|n| result[n].cluster == own
                    || (result[n].cluster.is_some_and(|c| c >= 1) && !is_core(n))));
            }
        }
    }

    #[test]
    fn prop_kmeans_assignment_is_optimal(
        data in coords(),
        centroids in prop::collection::vec((0.0f64..200.0, 0.0f64..200.0), 1..6),
    ) {
        let data = Dataset::from_coords(&data);
        let centroids: Vec<Point2D> = centroids.into_iter().map(|(x, y)| Point2D::new(x, y)).collect();
        let state = KMeansState::new(centroids.clone());
        let engine = KMeansEngine::new(centroids.len()).unwrap();

        let (assigned, next) = engine.step(&data, &state);

        let mut sizes = vec![0usize; centroids.len()];
        for p in &assigned {
            let own = p.cluster.unwrap();
            prop_assert!(own >= 1 && own as usize <= centroids.len());
            sizes[own as usize - 1] += 1;
            let own_dist = p.position().distance(&centroids[own as usize - 1]);
            for c in &centroids {
                prop_assert!(own_dist <= p.position().distance(c));
            }
        }
        for (i, &size) in sizes.iter().enumerate() {
            if size == 0 {
                prop_assert_eq!(next.centroids[i], centroids[i]);
            }
        }
    }
}
