use crate::dataset::Dataset;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Bare 2-D coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        euclidean_distance(self.x, self.y, other.x, other.y)
    }
}

/// Axis-aligned coordinate domain, `[min_x, max_x) × [min_y, max_y)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self { min_x, max_x, min_y, max_y }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            self.min_x + self.width() / 2.0,
            self.min_y + self.height() / 2.0,
        )
    }

    pub fn contains(&self, p: &Point2D) -> bool {
        p.x >= self.min_x && p.x < self.max_x && p.y >= self.min_y && p.y < self.max_y
    }
}

impl Default for Bounds {
    /// The 800 × 400 canvas every generator draws into.
    fn default() -> Self {
        Self::new(0.0, 800.0, 0.0, 400.0)
    }
}

#[inline]
pub fn euclidean_distance(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ((ax - bx) * (ax - bx) + (ay - by) * (ay - by)).sqrt()
}

/// All indices within strictly less than `epsilon` of point `idx`,
/// the point itself included.
pub fn region_query(dataset: &Dataset, idx: usize, epsilon: f64) -> Vec<usize> {
    let center = dataset[idx].position();
    dataset
        .iter()
        .enumerate()
        .filter(|(_, p)| center.distance(&p.position()) < epsilon)
        .map(|(i, _)| i)
        .collect()
}

/// Precomputed `n × n` adjacency for a fixed set of coordinates and radius.
///
/// Built once per `(coordinates, epsilon)` pair and reused across steps.
#[derive(Clone, Debug)]
pub struct NeighborIndex {
    adjacency: Array2<bool>,
    coords: Vec<Point2D>,
    epsilon: f64,
}

impl NeighborIndex {
    pub fn build(dataset: &Dataset, epsilon: f64) -> Self {
        let coords: Vec<Point2D> = dataset.iter().map(|p| p.position()).collect();
        let n = coords.len();
        let mut adjacency = Array2::from_elem((n, n), false);

        for i in 0..n {
            adjacency[[i, i]] = true;
            for j in (i + 1)..n {
                let close = coords[i].distance(&coords[j]) < epsilon;
                adjacency[[i, j]] = close;
                adjacency[[j, i]] = close;
            }
        }

        Self {
            adjacency,
            coords,
            epsilon,
        }
    }

    pub fn empty() -> Self {
        Self {
            adjacency: Array2::from_elem((0, 0), false),
            coords: Vec::new(),
            epsilon: 0.0,
        }
    }

    /// Whether this index still reflects `dataset`'s coordinates and `epsilon`.
    pub fn is_current(&self, dataset: &Dataset, epsilon: f64) -> bool {
        self.epsilon == epsilon
            && self.coords.len() == dataset.len()
            && self
                .coords
                .iter()
                .zip(dataset.iter())
                .all(|(c, p)| c.x == p.x && c.y == p.y)
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Neighbors of `idx` in ascending index order, `idx` included.
    pub fn neighbors(&self, idx: usize) -> Vec<usize> {
        self.adjacency
            .row(idx)
            .iter()
            .enumerate()
            .filter(|(_, close)| **close)
            .map(|(j, _)| j)
            .collect()
    }

    pub fn are_neighbors(&self, a: usize, b: usize) -> bool {
        self.adjacency[[a, b]]
    }
}
