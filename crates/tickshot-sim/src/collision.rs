//! Exact geometric predicates on 2D projections.
//!
//! Everything is computed on integers (widened to `i64` where products are
//! involved), so a given input always classifies the same way.

use tickshot_common::{Point, Point2D};

/// Checks if a point lies inside a rectangle (edges included).
#[must_use]
pub fn point_in_rect(point: Point2D, start: Point2D, width: i32, height: i32) -> bool {
    point.x >= start.x
        && point.x <= start.x + width
        && point.y >= start.y
        && point.y <= start.y + height
}

/// Checks if a circle touches or overlaps a rectangle.
///
/// A zero radius degenerates to [`point_in_rect`].
#[must_use]
pub fn circle_with_rect(
    center: Point2D,
    radius: i32,
    start: Point2D,
    width: i32,
    height: i32,
) -> bool {
    let closest_x = center.x.max(start.x).min(start.x + width);
    let closest_y = center.y.max(start.y).min(start.y + height);

    let dx = i64::from(center.x) - i64::from(closest_x);
    let dy = i64::from(center.y) - i64::from(closest_y);
    let r = i64::from(radius);

    dx * dx + dy * dy <= r * r
}

/// Checks if two rectangles touch or overlap.
#[must_use]
pub fn rect_with_rect(
    a_start: Point2D,
    a_width: i32,
    a_height: i32,
    b_start: Point2D,
    b_width: i32,
    b_height: i32,
) -> bool {
    a_start.x <= b_start.x + b_width
        && b_start.x <= a_start.x + a_width
        && a_start.y <= b_start.y + b_height
        && b_start.y <= a_start.y + a_height
}

/// Checks if two upright cylinders standing on their base points overlap.
///
/// Touching cylinders do not overlap, so two players can stand side by side.
#[must_use]
pub fn cylinder_overlap(
    a: Point,
    a_radius: i32,
    a_height: i32,
    b: Point,
    b_radius: i32,
    b_height: i32,
) -> bool {
    if a.y >= b.y + b_height || b.y >= a.y + a_height {
        return false;
    }

    let dx = i64::from(a.x) - i64::from(b.x);
    let dz = i64::from(a.z) - i64::from(b.z);
    let reach = i64::from(a_radius) + i64::from(b_radius);

    dx * dx + dz * dz < reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_in_rect_edges() {
        let start = Point2D::new(0, 0);
        assert!(point_in_rect(Point2D::new(0, 0), start, 10, 5));
        assert!(point_in_rect(Point2D::new(10, 5), start, 10, 5));
        assert!(!point_in_rect(Point2D::new(11, 5), start, 10, 5));
        assert!(!point_in_rect(Point2D::new(5, -1), start, 10, 5));
    }

    #[test]
    fn test_circle_with_rect() {
        let start = Point2D::new(10, 10);

        // Inside
        assert!(circle_with_rect(Point2D::new(12, 12), 0, start, 5, 5));
        // Exactly radius away from the left edge
        assert!(circle_with_rect(Point2D::new(7, 12), 3, start, 5, 5));
        assert!(!circle_with_rect(Point2D::new(6, 12), 3, start, 5, 5));
        // Corner uses euclidean distance: (3,4) -> 5
        assert!(circle_with_rect(Point2D::new(7, 6), 5, start, 5, 5));
        assert!(!circle_with_rect(Point2D::new(7, 6), 4, start, 5, 5));
    }

    #[test]
    fn test_rect_with_rect() {
        let a = Point2D::new(0, 0);
        assert!(rect_with_rect(a, 10, 10, Point2D::new(5, 5), 10, 10));
        assert!(rect_with_rect(a, 10, 10, Point2D::new(10, 0), 4, 4));
        assert!(!rect_with_rect(a, 10, 10, Point2D::new(11, 0), 4, 4));
        assert!(!rect_with_rect(a, 10, 10, Point2D::new(0, 11), 4, 4));
    }

    #[test]
    fn test_cylinder_overlap() {
        let a = Point::new(100, 0, 100);

        assert!(cylinder_overlap(a, 10, 50, Point::new(115, 0, 100), 10, 50));
        // Touching is not overlapping
        assert!(!cylinder_overlap(a, 10, 50, Point::new(120, 0, 100), 10, 50));
        // Standing on top of the other player
        assert!(!cylinder_overlap(a, 10, 50, Point::new(100, 50, 100), 10, 50));
        assert!(cylinder_overlap(a, 10, 50, Point::new(100, 49, 100), 10, 50));
    }
}
