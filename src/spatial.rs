//! Spatial primitives - continuous world coordinates

use serde::{Deserialize, Serialize};

/// Point in continuous world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Static world extents supplied by the world generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub width: f64,
    pub height: f64,
}

impl MapBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// Clamp a point into `[0, width] x [0, height]`
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            clamp(p.x, 0.0, self.width.max(0.0)),
            clamp(p.y, 0.0, self.height.max(0.0)),
        )
    }
}

impl Default for MapBounds {
    fn default() -> Self {
        Self::new(2000.0, 2000.0)
    }
}

/// Static map layout: bounds plus resource node positions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldMap {
    pub bounds: MapBounds,
    #[serde(default)]
    pub trees: Vec<Point>,
    #[serde(default)]
    pub rocks: Vec<Point>,
}

/// Clamp that tolerates NaN input by collapsing it to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

/// Move `from` toward `to` by at most `step`, never overshooting.
pub fn step_toward(from: Point, to: Point, step: f64) -> Point {
    let dist = from.distance(to);
    if dist <= step || dist <= f64::EPSILON {
        return to;
    }
    let ratio = step / dist;
    Point::new(from.x + (to.x - from.x) * ratio, from.y + (to.y - from.y) * ratio)
}

/// Point `distance` units away from `threat`, along the threat->subject vector.
///
/// A subject standing exactly on the threat flees along +x.
pub fn flee_point(subject: Point, threat: Point, distance: f64, bounds: &MapBounds) -> Point {
    let dx = subject.x - threat.x;
    let dy = subject.y - threat.y;
    let len = dx.hypot(dy);
    let (ux, uy) = if len <= f64::EPSILON {
        (1.0, 0.0)
    } else {
        (dx / len, dy / len)
    };
    bounds.clamp(subject.offset(ux * distance, uy * distance))
}

/// Nearest node to `from`, or `None` when the list is empty.
pub fn nearest(from: Point, nodes: &[Point]) -> Option<Point> {
    nodes.iter().copied().min_by(|a, b| {
        from.distance(*a)
            .partial_cmp(&from.distance(*b))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Pull `p` back inside the disk at `center` with `radius`.
pub fn clamp_to_disk(p: Point, center: Point, radius: f64) -> Point {
    let dist = p.distance(center);
    if dist <= radius || dist <= f64::EPSILON {
        return p;
    }
    step_toward(center, p, radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = MapBounds::new(100.0, 50.0);
        assert_eq!(bounds.clamp(Point::new(-5.0, 60.0)), Point::new(0.0, 50.0));
        assert_eq!(bounds.clamp(Point::new(f64::NAN, 10.0)), Point::new(0.0, 10.0));
    }

    #[test]
    fn test_step_toward_does_not_overshoot() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(1.0, 0.0);
        assert_eq!(step_toward(from, to, 5.0), to);

        let mid = step_toward(from, Point::new(10.0, 0.0), 2.0);
        assert!((mid.x - 2.0).abs() < 1e-9);
        assert_eq!(mid.y, 0.0);
    }

    #[test]
    fn test_flee_point_moves_away() {
        let bounds = MapBounds::new(1000.0, 1000.0);
        let target = flee_point(Point::new(500.0, 500.0), Point::new(450.0, 500.0), 150.0, &bounds);
        assert!((target.x - 650.0).abs() < 1e-9);
        assert!((target.y - 500.0).abs() < 1e-9);

        // Clamped at the map edge
        let edge = flee_point(Point::new(990.0, 500.0), Point::new(900.0, 500.0), 150.0, &bounds);
        assert_eq!(edge.x, 1000.0);
    }

    #[test]
    fn test_nearest() {
        let nodes = [Point::new(10.0, 10.0), Point::new(2.0, 1.0), Point::new(-4.0, 0.0)];
        assert_eq!(nearest(Point::new(0.0, 0.0), &nodes), Some(Point::new(2.0, 1.0)));
        assert_eq!(nearest(Point::new(0.0, 0.0), &[]), None);
    }

    #[test]
    fn test_clamp_to_disk() {
        let center = Point::new(0.0, 0.0);
        let inside = Point::new(3.0, 0.0);
        assert_eq!(clamp_to_disk(inside, center, 5.0), inside);
        let pulled = clamp_to_disk(Point::new(10.0, 0.0), center, 5.0);
        assert!((pulled.x - 5.0).abs() < 1e-9);
    }
}
