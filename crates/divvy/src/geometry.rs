use crate::handle::HandleMetrics;
use derive_more::From;

#[derive(Debug, Clone, Copy, PartialEq, Default, From)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Pixel geometry of the chart, supplied by the render layer on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub center: Point,
    pub radius: f64,
}

impl Geometry {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Centers the chart in a `width` x `height` area, leaving room for half a
    /// divider handle outside the rim.
    pub fn fit(width: f64, height: f64, metrics: &HandleMetrics) -> Self {
        let radius = (width.min(height) / 2.0 - metrics.divider_size / 2.0).max(0.0);
        Self {
            center: Point::new(width / 2.0, height / 2.0),
            radius,
        }
    }
}

/// Axis aligned box, used for handle bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn around(center: Point, size: f64) -> Self {
        Self {
            x: center.x - size / 2.0,
            y: center.y - size / 2.0,
            width: size,
            height: size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_uses_shorter_side() {
        let geometry = Geometry::fit(300.0, 200.0, &HandleMetrics::default());
        assert_eq!(geometry.center, Point::new(150.0, 100.0));
        assert_eq!(geometry.radius, 92.0);
    }

    #[test]
    fn test_fit_never_goes_negative() {
        let geometry = Geometry::fit(4.0, 4.0, &HandleMetrics::default());
        assert_eq!(geometry.radius, 0.0);
    }

    #[test]
    fn test_bounds_around_point() {
        let bounds = Bounds::around(Point::new(10.0, 20.0), 16.0);
        assert_eq!((bounds.x, bounds.y), (2.0, 12.0));
        assert_eq!((bounds.width, bounds.height), (16.0, 16.0));
    }

    #[test]
    fn test_point_from_tuple() {
        let p: Point = (3.0, 4.0).into();
        assert_eq!(p.distance(Point::default()), 5.0);
    }
}
