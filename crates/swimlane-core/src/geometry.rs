//! Geometric primitives for diagram layout.
//!
//! This module provides the small set of geometric types the layout stage
//! needs to place process elements and route connections between them.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for four sides
//!
//! # Coordinate System
//!
//! Swimlane uses the coordinate system of the BPMN diagram-interchange format:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

/// A 2D point representing a position in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use swimlane_core::geometry::Point;
/// let p1 = Point::new(10.4, 20.6);
///
/// let rounded = p1.round();
/// assert_eq!(rounded.x(), 10.0);
/// assert_eq!(rounded.y(), 21.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Rounds both coordinates to the nearest integer.
    ///
    /// Halfway cases round away from zero, matching [`f32::round`].
    pub fn round(self) -> Self {
        Self {
            x: self.x.round(),
            y: self.y.round(),
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use swimlane_core::geometry::{Bounds, Point, Size};
    /// let task = Bounds::new_from_top_left(Point::new(100.0, 80.0), Size::new(100.0, 80.0));
    /// let event = Bounds::new_from_top_left(Point::new(280.0, 80.0), Size::new(36.0, 36.0));
    ///
    /// let combined = task.merge(&event);
    /// assert_eq!(combined.min_x(), 100.0);
    /// assert_eq!(combined.width(), 216.0);
    /// assert_eq!(combined.height(), 80.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Expands the bounds by adding insets.
    ///
    /// This decreases the minimum coordinates by left/top insets and increases
    /// the maximum coordinates by right/bottom insets.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left(),
            min_y: self.min_y - insets.top(),
            max_x: self.max_x + insets.right(),
            max_y: self.max_y + insets.bottom(),
        }
    }
}

/// Represents spacing around an element with potentially different values
/// for each side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Returns the top inset value
    pub fn top(self) -> f32 {
        self.top
    }

    /// Returns the right inset value
    pub fn right(self) -> f32 {
        self.right
    }

    /// Returns the bottom inset value
    pub fn bottom(self) -> f32 {
        self.bottom
    }

    /// Returns the left inset value
    pub fn left(self) -> f32 {
        self.left
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_point_default() {
        let point = Point::default();
        assert_eq!(point.x(), 0.0);
        assert_eq!(point.y(), 0.0);
        assert!(point.is_zero());
    }

    #[test]
    fn test_point_add() {
        let result = Point::new(1.0, 2.0).add_point(Point::new(3.0, 4.0));
        assert_eq!(result.x(), 4.0);
        assert_eq!(result.y(), 6.0);
    }

    #[test]
    fn test_point_round_half_away_from_zero() {
        let rounded = Point::new(118.5, 97.49).round();
        assert_eq!(rounded.x(), 119.0);
        assert_eq!(rounded.y(), 97.0);
    }

    #[test]
    fn test_bounds_from_top_left() {
        let bounds = Bounds::new_from_top_left(Point::new(100.0, 80.0), Size::new(36.0, 36.0));

        assert_eq!(bounds.min_x(), 100.0);
        assert_eq!(bounds.min_y(), 80.0);
        assert_eq!(bounds.max_x(), 136.0);
        assert_eq!(bounds.max_y(), 116.0);
        assert_eq!(bounds.center(), Point::new(118.0, 98.0));
        assert_eq!(bounds.to_size(), Size::new(36.0, 36.0));
    }

    #[test]
    fn test_bounds_merge_is_commutative() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 10.0), Size::new(50.0, 50.0));
        let b = Bounds::new_from_top_left(Point::new(40.0, 0.0), Size::new(10.0, 100.0));

        assert_eq!(a.merge(&b), b.merge(&a));
        assert_eq!(a.merge(&b).min_point(), Point::new(0.0, 0.0));
        assert_eq!(a.merge(&b).max_y(), 100.0);
    }

    #[test]
    fn test_bounds_add_padding() {
        let bounds = Bounds::new_from_top_left(Point::new(100.0, 300.0), Size::new(100.0, 80.0))
            .add_padding(Insets::uniform(40.0));

        assert_eq!(bounds.min_x(), 60.0);
        assert_eq!(bounds.min_y(), 260.0);
        assert_eq!(bounds.width(), 180.0);
        assert_eq!(bounds.height(), 160.0);
    }

    #[test]
    fn test_bounds_center_fractional() {
        let bounds = Bounds::new_from_top_left(Point::new(0.5, 0.25), Size::new(3.0, 3.0));
        let center = bounds.center();

        assert!(approx_eq!(f32, center.x(), 2.0, ulps = 2));
        assert!(approx_eq!(f32, center.y(), 1.75, ulps = 2));
    }

    #[test]
    fn test_insets_sides() {
        let insets = Insets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(insets.top(), 1.0);
        assert_eq!(insets.right(), 2.0);
        assert_eq!(insets.bottom(), 3.0);
        assert_eq!(insets.left(), 4.0);
    }

    #[test]
    fn test_size_is_zero() {
        assert!(Size::default().is_zero());
        assert!(!Size::new(36.0, 0.0).is_zero());
    }
}
