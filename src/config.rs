use crate::error::{Result, invalid};
use crate::generator::Shape;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest tick interval a run may be scheduled with (`speed >= 1/3600`).
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(3600);

/// Largest brush accepted; keeps a single injection at a few hundred points.
pub const MAX_BRUSH_RADIUS: f64 = 1000.0;

/// Every knob the host UI can turn, validated once at the boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub epsilon: f64,
    pub min_points: usize,
    pub point_count: usize,
    pub k: usize,
    pub shape: Shape,
    pub speed: f64,
    pub brush_radius: f64,
    pub seed: Option<u64>,
}

impl VisualizerConfig {
    pub fn new() -> Self {
        Self {
            epsilon: 50.0,
            min_points: 4,
            point_count: 100,
            k: 3,
            shape: Shape::Blobs,
            speed: 1.0,
            brush_radius: 20.0,
            seed: None,
        }
    }

    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    pub fn point_count(mut self, point_count: usize) -> Self {
        self.point_count = point_count;
        self
    }

    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn brush_radius(mut self, brush_radius: f64) -> Self {
        self.brush_radius = brush_radius;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_epsilon(self.epsilon)?;
        validate_min_points(self.min_points)?;
        validate_k(self.k)?;
        validate_speed(self.speed)?;
        if self.point_count == 0 {
            return Err(invalid("point_count", "must be at least 1"));
        }
        validate_brush_radius(self.brush_radius)
    }
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_epsilon(epsilon: f64) -> Result<()> {
    if !epsilon.is_finite() || epsilon <= 0.0 {
        return Err(invalid("epsilon", "must be finite and positive"));
    }
    Ok(())
}

pub(crate) fn validate_min_points(min_points: usize) -> Result<()> {
    if min_points == 0 {
        return Err(invalid("min_points", "must be at least 1"));
    }
    Ok(())
}

pub(crate) fn validate_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(invalid("k", "must be at least 1"));
    }
    Ok(())
}

pub(crate) fn validate_speed(speed: f64) -> Result<()> {
    tick_interval(speed).map(|_| ())
}

/// `1000ms / speed`, rejecting speeds whose interval is not representable or
/// longer than [`MAX_TICK_INTERVAL`].
pub(crate) fn tick_interval(speed: f64) -> Result<Duration> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(invalid("speed", "must be finite and positive"));
    }
    match Duration::try_from_secs_f64(1.0 / speed) {
        Ok(interval) if interval <= MAX_TICK_INTERVAL => Ok(interval),
        _ => Err(invalid("speed", "must be at least one step per hour")),
    }
}

pub(crate) fn validate_brush_radius(brush_radius: f64) -> Result<()> {
    if !brush_radius.is_finite() || !(0.0..=MAX_BRUSH_RADIUS).contains(&brush_radius) {
        return Err(invalid("brush_radius", "must be between 0 and 1000"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_defaults_are_valid() {
        let config = VisualizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.epsilon, 50.0);
        assert_eq!(config.min_points, 4);
        assert_eq!(config.point_count, 100);
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            (VisualizerConfig::new().epsilon(0.0), "epsilon"),
            (VisualizerConfig::new().epsilon(f64::NAN), "epsilon"),
            (VisualizerConfig::new().min_points(0), "min_points"),
            (VisualizerConfig::new().k(0), "k"),
            (VisualizerConfig::new().speed(-1.0), "speed"),
            (VisualizerConfig::new().point_count(0), "point_count"),
            (VisualizerConfig::new().brush_radius(-2.0), "brush_radius"),
            (VisualizerConfig::new().brush_radius(1e300), "brush_radius"),
        ];
        for (config, field) in cases {
            match config.validate() {
                Err(Error::InvalidParameter { name, .. }) => assert_eq!(name, field),
                other => panic!("expected {} to be rejected, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_speed_must_fit_a_tick_interval() {
        for speed in [1e-30, 1e-5, f64::MIN_POSITIVE] {
            assert!(matches!(
                VisualizerConfig::new().speed(speed).validate(),
                Err(Error::InvalidParameter { .. })
            ));
        }
        assert!(tick_interval(0.001).is_ok());
        assert_eq!(tick_interval(4.0), Ok(Duration::from_millis(250)));
    }

    #[test]
    fn test_json_partial_config() {
        let config: VisualizerConfig =
            serde_json::from_str(r#"{"epsilon": 30.0, "shape": "moons", "seed": 7}"#).unwrap();
        assert_eq!(config.epsilon, 30.0);
        assert_eq!(config.shape, Shape::Moons);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.min_points, 4);
    }
}
