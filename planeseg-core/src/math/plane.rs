use std::fmt;

use nalgebra::Vector3;

/// A plane in implicit coordinate-form: `a·x + b·y + c·z = d`.
///
/// `(a, b, c)` is the (unnormalized) plane normal. A plane derived from three collinear points
/// has a zero normal; such planes are called degenerate and support no points
/// (see [Plane::is_degenerate]).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Plane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Plane {
    /// Computes the plane spanned by three points.
    ///
    /// The normal is the cross product of the two edge vectors `p1 - p0` and `p2 - p0`, and `d`
    /// is fixed by evaluating the plane equation at `p0`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use planeseg_core::math::Plane;
    /// # use planeseg_core::nalgebra::Vector3;
    /// let plane = Plane::from_triplet(&[
    ///     Vector3::new(0.0, 0.0, 0.0),
    ///     Vector3::new(1.0, 0.0, 0.0),
    ///     Vector3::new(0.0, 1.0, 0.0),
    /// ]);
    /// // the x/y plane: z = 0
    /// assert_eq!((plane.a, plane.b, plane.c, plane.d), (0.0, 0.0, 1.0, 0.0));
    /// ```
    pub fn from_triplet(points: &[Vector3<f64>; 3]) -> Self {
        let edge1 = points[1] - points[0];
        let edge2 = points[2] - points[0];
        let normal = edge1.cross(&edge2);
        let d = normal.dot(&points[0]);
        Self {
            a: normal.x,
            b: normal.y,
            c: normal.z,
            d,
        }
    }

    /// The (unnormalized) normal vector `(a, b, c)` of the plane
    pub fn normal(&self) -> Vector3<f64> {
        Vector3::new(self.a, self.b, self.c)
    }

    /// Returns `true` if the normal is the zero vector, i.e. the plane was derived from
    /// collinear points and does not describe a valid surface
    pub fn is_degenerate(&self) -> bool {
        self.a == 0.0 && self.b == 0.0 && self.c == 0.0
    }

    /// Perpendicular distance between `point` and the plane.
    ///
    /// For a degenerate plane the distance is undefined (NaN); callers are expected to filter
    /// degenerate planes with [Plane::is_degenerate] first.
    pub fn distance_to(&self, point: &Vector3<f64>) -> f64 {
        let numerator = (self.a * point.x + self.b * point.y + self.c * point.z - self.d).abs();
        numerator / self.normal().norm()
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6}x + {:.6}y + {:.6}z = {:.6}",
            self.a, self.b, self.c, self.d
        )
    }
}

/// A plane candidate together with its support: the number of cloud points within the distance
/// tolerance of the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaneWithSupport {
    pub plane: Plane,
    pub support: usize,
}
