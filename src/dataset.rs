use crate::geometry::{Bounds, Point2D};
use crate::{Matrix, Vector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Index;

/// Label given to points DBSCAN could not attach to any dense region.
pub const NOISE: i32 = -1;

/// A single sample: coordinates plus the labels an engine writes into it.
///
/// `cluster` is `None` while unclassified, `Some(NOISE)` for noise and
/// `Some(id)` with `id >= 1` for cluster members.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub cluster: Option<i32>,
    pub visited: bool,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            cluster: None,
            visited: false,
        }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    pub fn is_noise(&self) -> bool {
        self.cluster == Some(NOISE)
    }

    /// Unclassified or noise: the labels a cluster may overwrite.
    pub fn is_claimable(&self) -> bool {
        matches!(self.cluster, None | Some(NOISE))
    }
}

/// Ordered point set. Insertion order is the order DBSCAN scans in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    points: Vec<Point>,
}

impl Dataset {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub(crate) fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    pub(crate) fn extend<I: IntoIterator<Item = Point>>(&mut self, points: I) {
        self.points.extend(points);
    }

    /// Copy with every point unclassified and unvisited.
    pub fn reset_labels(&self) -> Self {
        Self::new(
            self.points
                .iter()
                .map(|p| Point::new(p.x, p.y))
                .collect(),
        )
    }

    pub fn n_clusters(&self) -> usize {
        self.points
            .iter()
            .filter_map(|p| p.cluster)
            .filter(|&c| c >= 1)
            .collect::<HashSet<i32>>()
            .len()
    }

    pub fn n_noise(&self) -> usize {
        self.points.iter().filter(|p| p.is_noise()).count()
    }

    pub fn n_visited(&self) -> usize {
        self.points.iter().filter(|p| p.visited).count()
    }

    /// Tight bounding box of the coordinates, `None` when empty.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.points.first()?;
        let mut bounds = Bounds::new(first.x, first.x, first.y, first.y);
        for p in &self.points[1..] {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    /// `n × 2` matrix of coordinates.
    pub fn to_matrix(&self) -> Matrix {
        let mut m = Matrix::zeros((self.len(), 2));
        for (i, p) in self.points.iter().enumerate() {
            m[[i, 0]] = p.x;
            m[[i, 1]] = p.y;
        }
        m
    }

    /// `x` as a single-feature design matrix and `y` as the target, the
    /// shape the regression fitter expects.
    pub fn regression_xy(&self) -> (Matrix, Vector) {
        let x = Matrix::from_shape_fn((self.len(), 1), |(i, _)| self.points[i].x);
        let y = self.points.iter().map(|p| p.y).collect::<Vector>();
        (x, y)
    }
}

impl Index<usize> for Dataset {
    type Output = Point;

    fn index(&self, idx: usize) -> &Point {
        &self.points[idx]
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromIterator<Point> for Dataset {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
