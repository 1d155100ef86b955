//! Synthetic 2-D datasets for the visualizer.
//!
//! Every generator draws into the `800 × 400` canvas described by
//! [`Bounds::default`] and stamps its points unclassified and unvisited.
//!
//! ```rust
//! use clusterstep::{DatasetGenerator, Shape};
//!
//! let mut generator = DatasetGenerator::with_seed(7);
//! let data = generator.generate(Shape::Circles, 101).unwrap();
//! assert_eq!(data.len(), 101);
//! assert!(data.iter().all(|p| p.cluster.is_none() && !p.visited));
//! ```

use crate::config::validate_brush_radius;
use crate::dataset::{Dataset, Point};
use crate::error::{Result, invalid};
use crate::geometry::{Bounds, Point2D};
use crate::Matrix;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

const BLOB_COUNT: usize = 3;
const BLOB_SPREAD: f64 = 50.0;
const INNER_RADIUS: f64 = 80.0;
const OUTER_RADIUS: f64 = 180.0;
const MOON_RADIUS: f64 = 120.0;
const SHAPE_JITTER: f64 = 10.0;
// Screen pixels of brush radius per extra injected point.
const BRUSH_SPACING: f64 = 5.0;
/// Upper bound on points dropped by a single brush stroke.
pub const MAX_BRUSH_POINTS: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Blobs,
    Circles,
    Moons,
}

/// Pan offset and zoom factor of the host view, `screen = data * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl ViewTransform {
    pub fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    /// Map a screen position back into data space.
    pub fn invert(&self, screen: Point2D) -> Point2D {
        Point2D::new((screen.x - self.x) / self.k, (screen.y - self.y) / self.k)
    }

    pub fn apply(&self, data: Point2D) -> Point2D {
        Point2D::new(data.x * self.k + self.x, data.y * self.k + self.y)
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[derive(Clone, Debug)]
pub struct DatasetGenerator {
    rng: StdRng,
    bounds: Bounds,
}

impl DatasetGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            bounds: Bounds::default(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            bounds: Bounds::default(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn generate(&mut self, shape: Shape, count: usize) -> Result<Dataset> {
        if count == 0 {
            return Err(invalid("count", "must be at least 1"));
        }

        let data = match shape {
            Shape::Blobs => self.blobs(count),
            Shape::Circles => self.circles(count),
            Shape::Moons => self.moons(count),
        };
        tracing::debug!(?shape, count, "generated dataset");
        Ok(data)
    }

    fn blobs(&mut self, count: usize) -> Dataset {
        let per_blob = count / BLOB_COUNT;
        let mut points = Vec::with_capacity(count);

        for _ in 0..BLOB_COUNT {
            let cx = self.rng.gen_range(200.0..600.0);
            let cy = self.rng.gen_range(100.0..300.0);
            let jitter = Matrix::random_using(
                (per_blob, 2),
                Uniform::new(-BLOB_SPREAD, BLOB_SPREAD),
                &mut self.rng,
            );
            points.extend(
                jitter
                    .rows()
                    .into_iter()
                    .map(|row| Point::new(cx + row[0], cy + row[1])),
            );
        }

        let remainder = count - BLOB_COUNT * per_blob;
        let noise = Matrix::random_using((remainder, 2), Uniform::new(0.0, 1.0), &mut self.rng);
        let b = self.bounds;
        points.extend(noise.rows().into_iter().map(|row| {
            Point::new(b.min_x + row[0] * b.width(), b.min_y + row[1] * b.height())
        }));

        Dataset::new(points)
    }

    fn circles(&mut self, count: usize) -> Dataset {
        let inner = count / 2;
        let outer = count - inner;
        let center = self.bounds.center();

        let mut points = self.ring(center, INNER_RADIUS, inner);
        points.extend(self.ring(center, OUTER_RADIUS, outer));
        Dataset::new(points)
    }

    fn ring(&mut self, center: Point2D, radius: f64, n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let angle = TAU * i as f64 / n as f64;
                let r = radius + self.rng.gen_range(-SHAPE_JITTER..SHAPE_JITTER);
                Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
            })
            .collect()
    }

    fn moons(&mut self, count: usize) -> Dataset {
        let upper = count / 2;
        let lower = count - upper;
        // Upper arc opens downward; lower arc is shifted right by one radius
        // and down by half a radius and opens upward, interleaving the two.
        let upper_center = Point2D::new(340.0, 170.0);
        let lower_center = Point2D::new(
            upper_center.x + MOON_RADIUS,
            upper_center.y + MOON_RADIUS / 2.0,
        );

        let mut points = self.arc(upper_center, 1.0, upper);
        points.extend(self.arc(lower_center, -1.0, lower));
        Dataset::new(points)
    }

    fn arc(&mut self, center: Point2D, orientation: f64, n: usize) -> Vec<Point> {
        let last = n.saturating_sub(1).max(1) as f64;
        (0..n)
            .map(|i| {
                let t = PI * i as f64 / last;
                let jx = self.rng.gen_range(-SHAPE_JITTER..SHAPE_JITTER);
                let jy = self.rng.gen_range(-SHAPE_JITTER..SHAPE_JITTER);
                Point::new(
                    center.x + orientation * MOON_RADIUS * t.cos() + jx,
                    center.y + orientation * MOON_RADIUS * t.sin() + jy,
                )
            })
            .collect()
    }

    /// Noisy samples around a random line `y = slope * x + intercept`, used
    /// by the regression view.
    pub fn linear_trend(&mut self, count: usize, noise: f64) -> Result<Dataset> {
        if count == 0 {
            return Err(invalid("count", "must be at least 1"));
        }
        if !noise.is_finite() || noise < 0.0 {
            return Err(invalid("noise", "must be finite and non-negative"));
        }

        let slope = self.rng.gen_range(-1.0..1.0);
        let intercept = self.rng.gen_range(0.0..100.0);
        let b = self.bounds;

        let points = (0..count)
            .map(|_| {
                let x = self.rng.gen_range(b.min_x..b.max_x);
                let jitter = if noise > 0.0 {
                    self.rng.gen_range(-noise / 2.0..noise / 2.0)
                } else {
                    0.0
                };
                Point::new(x, slope * x + intercept + jitter)
            })
            .collect();
        Ok(Dataset::new(points))
    }

    /// Append brushed points around `center` (already in data space).
    ///
    /// `brush_radius` is in screen pixels; it is divided by the view's zoom
    /// so the brush covers the same on-screen area at any zoom level. Larger
    /// brushes drop more points. Existing points are left untouched.
    pub fn inject(
        &mut self,
        dataset: &Dataset,
        center: Point2D,
        transform: &ViewTransform,
        brush_radius: f64,
    ) -> Result<Dataset> {
        validate_brush_radius(brush_radius)?;
        if !transform.k.is_finite() || transform.k <= 0.0 {
            return Err(invalid("transform.k", "zoom factor must be positive"));
        }

        let radius = brush_radius / transform.k;
        let count = ((brush_radius / BRUSH_SPACING).floor() as usize)
            .saturating_add(1)
            .min(MAX_BRUSH_POINTS);

        let mut next = dataset.clone();
        next.extend((0..count).map(|_| {
            let angle = self.rng.gen_range(0.0..TAU);
            let r = radius * self.rng.gen_range(0.0f64..1.0).sqrt();
            Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
        }));
        tracing::debug!(added = count, total = next.len(), "injected points");
        Ok(next)
    }
}

impl Default for DatasetGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blobs_split() {
        let mut generator = DatasetGenerator::with_seed(1);
        let data = generator.generate(Shape::Blobs, 100).unwrap();
        assert_eq!(data.len(), 100);

        // 33 per blob, all within the jitter box of the center range.
        for p in &data.points()[..99] {
            assert!(p.x >= 150.0 && p.x < 650.0);
            assert!(p.y >= 50.0 && p.y < 350.0);
        }
        // One remainder noise point somewhere on the canvas.
        assert!(generator.bounds().contains(&data[99].position()));
    }

    #[test]
    fn test_circles_radii() {
        let mut generator = DatasetGenerator::with_seed(2);
        let data = generator.generate(Shape::Circles, 51).unwrap();
        let center = Point2D::new(400.0, 200.0);

        let (inner, outer) = data.points().split_at(25);
        assert_eq!(outer.len(), 26);
        for p in inner {
            let r = p.position().distance(&center);
            assert!((r - INNER_RADIUS).abs() <= SHAPE_JITTER);
        }
        for p in outer {
            let r = p.position().distance(&center);
            assert!((r - OUTER_RADIUS).abs() <= SHAPE_JITTER);
        }
    }

    #[test]
    fn test_moons_stay_on_canvas() {
        let mut generator = DatasetGenerator::with_seed(3);
        let data = generator.generate(Shape::Moons, 200).unwrap();
        assert_eq!(data.len(), 200);
        for p in &data {
            assert!(generator.bounds().contains(&p.position()));
        }
    }

    #[test]
    fn test_single_point_shapes() {
        let mut generator = DatasetGenerator::with_seed(4);
        for shape in [Shape::Blobs, Shape::Circles, Shape::Moons] {
            assert_eq!(generator.generate(shape, 1).unwrap().len(), 1);
        }
    }

    #[test]
    fn test_zero_count_rejected() {
        let mut generator = DatasetGenerator::with_seed(5);
        assert!(generator.generate(Shape::Blobs, 0).is_err());
        assert!(generator.linear_trend(0, 10.0).is_err());
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = DatasetGenerator::with_seed(9).generate(Shape::Moons, 40).unwrap();
        let b = DatasetGenerator::with_seed(9).generate(Shape::Moons, 40).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_inject_zero_radius_hits_center() {
        let mut generator = DatasetGenerator::with_seed(6);
        let mut data = generator.generate(Shape::Blobs, 30).unwrap();
        data.points_mut()[0].cluster = Some(2);
        data.points_mut()[0].visited = true;

        let center = Point2D::new(123.0, 45.0);
        let next = generator
            .inject(&data, center, &ViewTransform::identity(), 0.0)
            .unwrap();

        assert_eq!(next.len(), 31);
        assert_eq!(&next.points()[..30], data.points());
        assert_eq!(next[30].position(), center);
        assert!(next[30].cluster.is_none() && !next[30].visited);
    }

    #[test]
    fn test_inject_respects_zoom() {
        let mut generator = DatasetGenerator::with_seed(8);
        let data = Dataset::default();
        let center = Point2D::new(400.0, 200.0);
        let transform = ViewTransform::new(10.0, -5.0, 4.0);

        let next = generator.inject(&data, center, &transform, 20.0).unwrap();
        assert_eq!(next.len(), 5);
        for p in &next {
            assert!(p.position().distance(&center) <= 5.0 + 1e-9);
        }
    }

    #[test]
    fn test_inject_rejects_bad_brush() {
        let mut generator = DatasetGenerator::with_seed(8);
        let data = Dataset::default();
        let center = Point2D::new(0.0, 0.0);
        assert!(generator.inject(&data, center, &ViewTransform::identity(), -1.0).is_err());
        assert!(generator.inject(&data, center, &ViewTransform::new(0.0, 0.0, 0.0), 1.0).is_err());
        assert!(generator.inject(&data, center, &ViewTransform::identity(), 1e300).is_err());
    }

    #[test]
    fn test_inject_largest_brush_is_capped() {
        use crate::config::MAX_BRUSH_RADIUS;

        let mut generator = DatasetGenerator::with_seed(8);
        let data = Dataset::default();
        let center = Point2D::new(400.0, 200.0);

        let next = generator
            .inject(&data, center, &ViewTransform::identity(), MAX_BRUSH_RADIUS)
            .unwrap();
        assert_eq!(next.len(), MAX_BRUSH_POINTS);
        for p in &next {
            assert!(p.position().distance(&center) <= MAX_BRUSH_RADIUS + 1e-9);
        }
    }

    #[test]
    fn test_view_transform_round_trip() {
        let t = ViewTransform::new(30.0, -12.0, 2.5);
        let p = Point2D::new(100.0, 50.0);
        let back = t.invert(t.apply(p));
        assert!((back.x - p.x).abs() < 1e-10);
        assert!((back.y - p.y).abs() < 1e-10);
    }

    #[test]
    fn test_linear_trend_noise_free_is_a_line() {
        let mut generator = DatasetGenerator::with_seed(11);
        let data = generator.linear_trend(10, 0.0).unwrap();
        let (a, b) = (data[0], data[1]);
        let slope = (b.y - a.y) / (b.x - a.x);
        let intercept = a.y - slope * a.x;
        for p in &data {
            assert!((p.y - (slope * p.x + intercept)).abs() < 1e-8);
        }
    }
}
