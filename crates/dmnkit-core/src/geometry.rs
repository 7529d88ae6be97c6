//! Geometric primitives for DMN diagram interchange.
//!
//! DMNDI expresses every shape as a `dc:Bounds` (upper-left corner plus size)
//! and every edge as an ordered list of `di:waypoint`s. The same value types
//! are used on the document side and on the graph side.
//!
//! Coordinates are `f64` because the DC schema declares them as `double`.
//! The origin is the top-left corner of the diagram; y grows downward.

/// A waypoint or corner in diagram space.
///
/// # Examples
///
/// ```
/// # use dmnkit_core::geometry::Point;
/// let service_corner = Point::new(100.0, 100.0);
/// let waypoint = Point::new(150.0, 180.0);
///
/// // Relative to the decision service, then back
/// let relative = waypoint.sub_point(service_corner);
/// assert_eq!(relative, Point::new(50.0, 80.0));
/// assert_eq!(relative.add_point(service_corner), waypoint);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn add_point(self, other: Point) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub_point(self, other: Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f64 {
        self.width
    }

    pub fn height(self) -> f64 {
        self.height
    }
}

/// An axis-aligned rectangle, stored by its corners.
///
/// A `dc:Bounds` is read with [`Bounds::new_from_top_left`] and written back
/// from [`min_point`](Self::min_point) and [`to_size`](Self::to_size).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    pub fn min_x(self) -> f64 {
        self.min_x
    }

    pub fn min_y(self) -> f64 {
        self.min_y
    }

    pub fn max_x(self) -> f64 {
        self.max_x
    }

    pub fn max_y(self) -> f64 {
        self.max_y
    }

    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// The upper-left corner, the `x`/`y` of a `dc:Bounds`.
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn max_point(self) -> Point {
        Point::new(self.max_x, self.max_y)
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Moves the bounds by `offset`, keeping the size.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dmnkit_core::geometry::{Bounds, Point, Size};
    /// let decision = Bounds::new_from_top_left(Point::new(50.0, 100.0), Size::new(100.0, 50.0));
    ///
    /// let absolute = decision.translate(Point::new(200.0, 200.0));
    /// assert_eq!(absolute.min_point(), Point::new(250.0, 300.0));
    /// assert_eq!(absolute.to_size(), decision.to_size());
    /// ```
    pub fn translate(&self, offset: Point) -> Self {
        Self::new_from_top_left(self.min_point().add_point(offset), self.to_size())
    }

    /// Moves the bounds by `-offset`, keeping the size.
    pub fn inverse_translate(&self, offset: Point) -> Self {
        Self::new_from_top_left(self.min_point().sub_point(offset), self.to_size())
    }

    /// True if the point lies inside the bounds, edges included.
    pub fn contains(&self, point: Point) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_y..=self.max_y).contains(&point.y)
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f64..1000.0,
            -1000.0f64..1000.0,
            1.0f64..500.0,
            1.0f64..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Absolute to relative framing and back restores the bounds.
    fn check_framing_roundtrip(bounds: Bounds, parent: Point) -> Result<(), TestCaseError> {
        let result = bounds.inverse_translate(parent).translate(parent);

        prop_assert!(approx_eq!(f64, result.min_x(), bounds.min_x(), epsilon = 1e-9));
        prop_assert!(approx_eq!(f64, result.min_y(), bounds.min_y(), epsilon = 1e-9));
        prop_assert!(approx_eq!(f64, result.width(), bounds.width(), epsilon = 1e-9));
        prop_assert!(approx_eq!(f64, result.height(), bounds.height(), epsilon = 1e-9));
        Ok(())
    }

    fn check_center_is_inside(bounds: Bounds) -> Result<(), TestCaseError> {
        prop_assert!(bounds.contains(bounds.center()));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn framing_roundtrip(bounds in bounds_strategy(), parent in point_strategy()) {
            check_framing_roundtrip(bounds, parent)?;
        }

        #[test]
        fn center_is_inside(bounds in bounds_strategy()) {
            check_center_is_inside(bounds)?;
        }
    }
}
