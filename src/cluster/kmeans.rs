use super::engine::StepEngine;
use crate::config::{VisualizerConfig, validate_k};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::geometry::{Bounds, Point2D};
use crate::Matrix;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KMeansState {
    pub centroids: Vec<Point2D>,
    pub iteration: usize,
    /// Within-cluster sum of squared distances after the latest assignment.
    pub inertia: Option<f64>,
}

impl KMeansState {
    pub fn new(centroids: Vec<Point2D>) -> Self {
        Self {
            centroids,
            iteration: 0,
            inertia: None,
        }
    }

    /// Centroid behind a 1-based cluster id as written into points.
    pub fn centroid_for(&self, cluster: i32) -> Option<Point2D> {
        usize::try_from(cluster - 1)
            .ok()
            .and_then(|i| self.centroids.get(i).copied())
    }

    pub fn centers_matrix(&self) -> Matrix {
        Matrix::from_shape_fn((self.centroids.len(), 2), |(i, j)| {
            let c = self.centroids[i];
            if j == 0 { c.x } else { c.y }
        })
    }
}

/// Lloyd iterations one round at a time.
///
/// Centroids start uniformly at random inside `bounds`, never on data
/// points. There is no convergence check: the caller decides when to stop,
/// and stepping a converged state reproduces it.
#[derive(Clone, Debug)]
pub struct KMeansEngine {
    n_clusters: usize,
    bounds: Bounds,
}

impl KMeansEngine {
    pub fn new(n_clusters: usize) -> Result<Self> {
        validate_k(n_clusters)?;
        Ok(Self {
            n_clusters,
            bounds: Bounds::default(),
        })
    }

    pub fn from_config(config: &VisualizerConfig) -> Result<Self> {
        Self::new(config.k)
    }

    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn initialize<R: Rng + ?Sized>(&self, dataset: &Dataset, rng: &mut R) -> (Dataset, KMeansState) {
        let unit = Matrix::random_using((self.n_clusters, 2), Uniform::new(0.0, 1.0), rng);
        let b = self.bounds;
        let centroids = unit
            .rows()
            .into_iter()
            .map(|row| Point2D::new(b.min_x + row[0] * b.width(), b.min_y + row[1] * b.height()))
            .collect();

        (dataset.reset_labels(), KMeansState::new(centroids))
    }

    /// One assignment round followed by one centroid update.
    pub fn step(&self, dataset: &Dataset, state: &KMeansState) -> (Dataset, KMeansState) {
        let mut data = dataset.clone();
        let k = state.centroids.len();
        let mut sums = vec![(0.0, 0.0, 0usize); k];
        let mut inertia = 0.0;

        for point in data.points_mut() {
            let (nearest, distance) = nearest_centroid(&point.position(), &state.centroids);
            point.cluster = Some(nearest as i32 + 1);
            inertia += distance * distance;

            let entry = &mut sums[nearest];
            entry.0 += point.x;
            entry.1 += point.y;
            entry.2 += 1;
        }

        let centroids = state
            .centroids
            .iter()
            .zip(&sums)
            .map(|(previous, &(sx, sy, count))| {
                if count == 0 {
                    *previous
                } else {
                    Point2D::new(sx / count as f64, sy / count as f64)
                }
            })
            .collect();

        let next = KMeansState {
            centroids,
            iteration: state.iteration + 1,
            inertia: (!data.is_empty()).then_some(inertia),
        };
        tracing::debug!(
            iteration = next.iteration,
            inertia = next.inertia,
            "kmeans step"
        );
        (data, next)
    }
}

/// Index of the closest centroid and the distance to it. Ties go to the
/// lowest index.
pub(crate) fn nearest_centroid(point: &Point2D, centroids: &[Point2D]) -> (usize, f64) {
    let mut closest = 0;
    let mut min_distance = f64::INFINITY;

    for (i, centroid) in centroids.iter().enumerate() {
        let distance = point.distance(centroid);
        if distance < min_distance {
            min_distance = distance;
            closest = i;
        }
    }

    (closest, min_distance)
}

impl StepEngine for KMeansEngine {
    type State = KMeansState;

    fn initialize(&mut self, dataset: &Dataset, rng: &mut StdRng) -> (Dataset, KMeansState) {
        KMeansEngine::initialize(self, dataset, rng)
    }

    fn step(&mut self, dataset: &Dataset, state: &KMeansState) -> (Dataset, KMeansState) {
        KMeansEngine::step(self, dataset, state)
    }

    fn with_config(&self, config: &VisualizerConfig) -> Result<Self> {
        Ok(KMeansEngine::from_config(config)?.bounds(self.bounds))
    }

    fn write_config(&self, config: &mut VisualizerConfig) {
        config.k = self.n_clusters;
    }

    fn name(&self) -> &'static str {
        "kmeans"
    }
}
