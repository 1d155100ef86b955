//! Step-by-step clustering on synthetic 2-D data.
//!
//! `clusterstep` runs DBSCAN and K-Means as resumable state machines that a
//! caller advances one discrete step at a time, inspecting the partial result
//! between steps. Around the engines sit a dataset generator (blobs, rings,
//! half-moons, brushed points), a one-shot least-squares line fitter, and a
//! run controller that owns run/pause/speed/reset and the tick schedule.
//!
//! ```rust
//! use clusterstep::{DbscanEngine, RunController, VisualizerConfig};
//!
//! let config = VisualizerConfig::new().point_count(60).seed(1);
//! let engine = DbscanEngine::from_config(&config).unwrap();
//! let mut controller = RunController::new(engine, config).unwrap();
//!
//! while !controller.step_once().finished {}
//! assert_eq!(controller.dataset().n_visited(), 60);
//! ```

#![forbid(unsafe_code)]

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod cluster;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod driver;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod linear_model;
pub mod metrics;

pub use cluster::{DbscanEngine, DbscanState, KMeansEngine, KMeansState, Phase, StepEngine};
pub use config::VisualizerConfig;
pub use controller::{RunController, RunState, Snapshot, TickReport};
pub use dataset::{Dataset, NOISE, Point};
pub use driver::Driver;
pub use error::{Error, Result};
pub use generator::{DatasetGenerator, Shape, ViewTransform};
pub use geometry::{Bounds, NeighborIndex, Point2D};
pub use linear_model::{Equation, LinearRegression};

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;
