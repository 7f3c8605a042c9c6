//! Swirl curve generation.
//!
//! Every edge in the diagram is drawn as a cubic Bézier whose control
//! points are pushed sideways by a sine term. The sine is evaluated at the
//! source node's vertical position, so all edges leaving the same node share
//! one horizontal offset and fan out as a family.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rendered position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Shift by the given deltas.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Sine modulation applied to a curve's control points.
///
/// `direction` is expected to be `1.0` or `-1.0` and `amplitude` to be
/// non-negative. Neither is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwirlParameters {
    #[serde(default = "default_direction")]
    pub direction: f64,
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    #[serde(default)]
    pub phase: f64,
}

fn default_direction() -> f64 {
    SwirlParameters::DEFAULT.direction
}

fn default_amplitude() -> f64 {
    SwirlParameters::DEFAULT.amplitude
}

fn default_frequency() -> f64 {
    SwirlParameters::DEFAULT.frequency
}

impl SwirlParameters {
    /// Used for every edge that has no swirl of its own.
    pub const DEFAULT: Self = Self {
        direction: 1.0,
        amplitude: 80.0,
        frequency: 0.02,
        phase: 0.0,
    };

    pub const fn new(direction: f64, amplitude: f64, frequency: f64, phase: f64) -> Self {
        Self {
            direction,
            amplitude,
            frequency,
            phase,
        }
    }

    /// Same parameters with the direction reversed.
    pub fn flipped(self) -> Self {
        Self {
            direction: -self.direction,
            ..self
        }
    }

    /// Horizontal control-point offset for a curve leaving `source_y`.
    pub fn offset_at(&self, source_y: f64) -> f64 {
        self.direction * self.amplitude * (self.frequency * source_y + self.phase).sin()
    }
}

impl Default for SwirlParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A cubic Bézier from `source` to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwirlCurve {
    pub source: Point,
    pub control1: Point,
    pub control2: Point,
    pub target: Point,
}

impl SwirlCurve {
    /// Build the curve between two points.
    ///
    /// The offset is added on the source side and subtracted on the target
    /// side, which yields an S-shape rather than a bow. Total over all
    /// inputs; extreme parameters simply overshoot.
    pub fn new(source: Point, target: Point, swirl: &SwirlParameters) -> Self {
        let curve_height = (target.y - source.y) / 2.0;
        let swirl_offset_x = swirl.offset_at(source.y);

        Self {
            source,
            control1: Point::new(source.x + swirl_offset_x, source.y + curve_height),
            control2: Point::new(target.x - swirl_offset_x, target.y - curve_height),
            target,
        }
    }

    /// Build with the default swirl when none is attached.
    pub fn with_optional(source: Point, target: Point, swirl: Option<&SwirlParameters>) -> Self {
        Self::new(source, target, swirl.unwrap_or(&SwirlParameters::DEFAULT))
    }

    /// SVG path data: one move-to and one cubic curve-to.
    pub fn path_data(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SwirlCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M{},{}C{},{},{},{},{},{}",
            fmt_coord(self.source.x),
            fmt_coord(self.source.y),
            fmt_coord(self.control1.x),
            fmt_coord(self.control1.y),
            fmt_coord(self.control2.x),
            fmt_coord(self.control2.y),
            fmt_coord(self.target.x),
            fmt_coord(self.target.y),
        )
    }
}

/// Format a coordinate with at most three decimals. Non-finite values print as `0`.
pub fn fmt_coord(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{:.3}", value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn zero_amplitude_collapses_to_midline() {
        let source = Point::new(10.0, 20.0);
        let target = Point::new(70.0, 220.0);
        for (frequency, phase) in [(0.02, 0.0), (3.7, 1.2), (-0.5, 42.0)] {
            let swirl = SwirlParameters::new(1.0, 0.0, frequency, phase);
            let curve = SwirlCurve::new(source, target, &swirl);
            assert_eq!(curve.control1, Point::new(10.0, 120.0));
            assert_eq!(curve.control2, Point::new(70.0, 120.0));
        }
    }

    #[test]
    fn flipping_direction_mirrors_control_points() {
        let source = Point::new(30.0, 40.0);
        let target = Point::new(130.0, 240.0);
        let swirl = SwirlParameters::new(1.0, 55.0, 0.03, 0.4);

        let right = SwirlCurve::new(source, target, &swirl);
        let left = SwirlCurve::new(source, target, &swirl.flipped());

        let offset = swirl.offset_at(source.y);
        assert!(close(swirl.flipped().offset_at(source.y), -offset));
        assert!(close(right.control1.x - source.x, offset));
        assert!(close(left.control1.x - source.x, -offset));
        assert!(close(right.control2.x - target.x, -offset));
        assert!(close(left.control2.x - target.x, offset));
        assert_eq!(right.control1.y, left.control1.y);
        assert_eq!(right.control2.y, left.control2.y);
    }

    #[test]
    fn offset_is_periodic_in_source_y() {
        let swirl = SwirlParameters::new(1.0, 80.0, 0.02, 0.3);
        let period = 2.0 * PI / swirl.frequency;
        for y in [0.0, 17.5, 123.0, -40.0] {
            assert!(close(swirl.offset_at(y), swirl.offset_at(y + period)));
            assert!(close(swirl.offset_at(y), swirl.offset_at(y - 3.0 * period)));
        }
    }

    #[test]
    fn worked_example_matches() {
        let swirl = SwirlParameters::new(1.0, 100.0, 0.02, 1.0);
        let curve = SwirlCurve::new(Point::new(0.0, 0.0), Point::new(100.0, 200.0), &swirl);

        let expected = 100.0 * 1.0f64.sin();
        assert!((swirl.offset_at(0.0) - expected).abs() < EPS);
        assert!((curve.control1.x - 84.147).abs() < 1e-3);
        assert_eq!(curve.control1.y, 100.0);
        assert!((curve.control2.x - 15.853).abs() < 1e-3);
        assert_eq!(curve.control2.y, 100.0);
        assert_eq!(curve.path_data(), "M0,0C84.147,100,15.853,100,100,200");
    }

    #[test]
    fn only_source_y_drives_the_offset() {
        let swirl = SwirlParameters::DEFAULT;
        let source = Point::new(0.0, 50.0);
        let a = SwirlCurve::new(source, Point::new(10.0, 100.0), &swirl);
        let b = SwirlCurve::new(source, Point::new(-300.0, 900.0), &swirl);
        assert!(close(a.control1.x - source.x, b.control1.x - source.x));
    }

    #[test]
    fn missing_swirl_uses_exact_default() {
        let source = Point::new(5.0, 60.0);
        let target = Point::new(45.0, 160.0);
        let curve = SwirlCurve::with_optional(source, target, None);
        let expected = SwirlCurve::new(
            source,
            target,
            &SwirlParameters::new(1.0, 80.0, 0.02, 0.0),
        );
        assert_eq!(curve, expected);
    }

    #[test]
    fn partial_swirl_fills_defaults() {
        let swirl: SwirlParameters = serde_json::from_str(r#"{"amplitude": 12}"#).unwrap();
        assert_eq!(swirl, SwirlParameters::new(1.0, 12.0, 0.02, 0.0));
    }

    #[test]
    fn coordinates_are_trimmed() {
        assert_eq!(fmt_coord(12.0), "12");
        assert_eq!(fmt_coord(12.5), "12.5");
        assert_eq!(fmt_coord(-0.0001), "0");
        assert_eq!(fmt_coord(1.23456), "1.235");
        assert_eq!(fmt_coord(-7.25), "-7.25");
        assert_eq!(fmt_coord(f64::NAN), "0");
    }
}
