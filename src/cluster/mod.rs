//! Clustering algorithms that advance one step at a time.
//!
//! This module provides steppable versions of:
//! - `DbscanEngine`: density-based clustering, one phase per step
//! - `KMeansEngine`: centroid clustering, one assignment + update round per step
//!
//! Both implement [`StepEngine`], the contract the run controller drives.
//! A step never mutates the snapshot it is given; it returns a new
//! `(Dataset, State)` pair.
//!
//! # Examples
//!
//! ## DBSCAN, step by step
//! ```rust
//! use clusterstep::{Dataset, DbscanEngine, Phase};
//!
//! let data = Dataset::from_coords(&[
//!     (1.0, 1.0),
//!     (1.2, 1.1),
//!     (1.1, 1.2),
//!     (8.0, 8.0),
//!     (8.1, 8.1),
//!     (8.2, 7.9),
//!     (15.0, 1.0), // Outlier
//! ]);
//!
//! let mut dbscan = DbscanEngine::new(1.0, 2).unwrap();
//! let (mut points, mut state) = dbscan.initialize(&data);
//!
//! // The first step only locates the next unvisited point.
//! (points, state) = dbscan.step(&points, &state);
//! assert_eq!(state.phase(), Phase::CheckNeighbors);
//!
//! while !dbscan.is_done(&state) {
//!     (points, state) = dbscan.step(&points, &state);
//! }
//! assert_eq!(state.cluster_counter(), 2);
//! assert_eq!(points.n_noise(), 1);
//! ```
//!
//! ## K-Means rounds
//! ```rust
//! use clusterstep::{Dataset, KMeansEngine};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let data = Dataset::from_coords(&[(1.0, 1.0), (1.5, 2.0), (3.0, 4.0), (5.0, 7.0)]);
//!
//! let kmeans = KMeansEngine::new(2).unwrap();
//! let mut rng = StdRng::seed_from_u64(42);
//! let (mut points, mut state) = kmeans.initialize(&data, &mut rng);
//!
//! for _ in 0..5 {
//!     (points, state) = kmeans.step(&points, &state);
//! }
//! assert_eq!(state.iteration, 5);
//! assert!(points.iter().all(|p| p.cluster.is_some()));
//! ```

mod dbscan;
mod engine;
mod kmeans;

pub use dbscan::{DbscanEngine, DbscanState, Phase};
pub use engine::StepEngine;
pub use kmeans::{KMeansEngine, KMeansState};
