//! Conversions between values, angle ticks and screen positions.
//!
//! Angles are integer ticks, `TICKS_PER_CIRCLE` to a full turn, measured
//! clockwise on screen (y grows downwards) from `zero_angle`.

use crate::geometry::Point;
use std::f64::consts::{PI, TAU};

/// 16 ticks per degree.
pub const TICKS_PER_CIRCLE: i64 = 360 * 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularMapper {
    total: i64,
    zero_angle: i64,
    center: Point,
}

impl CircularMapper {
    pub fn new(total: i64, zero_angle: i64, center: Point) -> Self {
        debug_assert!(total > 0, "total must be positive");
        Self {
            total,
            zero_angle,
            center,
        }
    }

    pub fn value_to_angle(&self, value: i64) -> i64 {
        (TICKS_PER_CIRCLE as f64 * value as f64 / self.total as f64).round() as i64
    }

    /// Lossy inverse of `value_to_angle`: a round trip may drift by one unit
    /// when the total does not divide the circle evenly.
    pub fn angle_to_value(&self, angle: i64) -> i64 {
        (angle as f64 * self.total as f64 / TICKS_PER_CIRCLE as f64).round() as i64
    }

    /// Absolute screen angle in radians, for drawing.
    pub fn to_radians(&self, angle: i64) -> f64 {
        (self.zero_angle + angle) as f64 * TAU / TICKS_PER_CIRCLE as f64
    }

    pub fn angle_to_position(&self, angle: i64, radius: f64) -> Point {
        let real_angle = self.to_radians(angle);
        Point::new(
            self.center.x + (radius * real_angle.cos()).round(),
            self.center.y + (radius * real_angle.sin()).round(),
        )
    }

    /// Angle of `pos` around the center, in `[0, TICKS_PER_CIRCLE)`.
    pub fn position_to_angle(&self, pos: Point) -> i64 {
        let vector = Point::new(pos.x - self.center.x, pos.y - self.center.y);
        let zero = self.to_radians(0);
        let reference = Point::new(zero.cos(), zero.sin());
        let real_angle = clockwise_angle(reference, vector);
        let ticks = (real_angle * TICKS_PER_CIRCLE as f64 / TAU).round() as i64;
        ticks.rem_euclid(TICKS_PER_CIRCLE)
    }
}

/// Clockwise (on screen) rotation from `from` to `to`, in `[0, 2PI]`.
fn clockwise_angle(from: Point, to: Point) -> f64 {
    let cross = from.x * to.y - from.y * to.x;
    let dot = from.x * to.x + from.y * to.y;
    // atan2 covers (-PI, PI]; negating both arguments shifts it by PI.
    (-cross).atan2(-dot) + PI
}
