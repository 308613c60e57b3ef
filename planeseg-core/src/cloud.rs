use std::iter::FromIterator;
use std::ops::Index;

use nalgebra::Vector3;

/// An ordered, in-memory 3D point cloud.
///
/// The cloud is immutable after construction, so it can be shared across any number of threads
/// (e.g. through an `Arc`) without synchronization. All planeseg algorithms only ever read from
/// the cloud.
///
/// # Examples
///
/// ```
/// # use planeseg_core::cloud::PointCloud;
/// # use planeseg_core::nalgebra::Vector3;
/// let cloud = PointCloud::new(vec![
///     Vector3::new(1.0, 2.0, 3.0),
///     Vector3::new(4.0, 5.0, 6.0),
/// ]);
/// assert_eq!(cloud.len(), 2);
/// assert_eq!(cloud[1].y, 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    points: Vec<Vector3<f64>>,
}

impl PointCloud {
    /// Creates a new point cloud from the given points. The order of the points is preserved.
    pub fn new(points: Vec<Vector3<f64>>) -> Self {
        Self { points }
    }

    /// Number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the cloud contains no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points of the cloud, in their original order
    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }
}

impl Index<usize> for PointCloud {
    type Output = Vector3<f64>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl FromIterator<Vector3<f64>> for PointCloud {
    fn from_iter<T: IntoIterator<Item = Vector3<f64>>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_iterator_preserves_order() {
        let cloud: PointCloud = (0..4).map(|i| Vector3::new(i as f64, 0.0, 0.0)).collect();
        assert_eq!(cloud.len(), 4);
        for (index, point) in cloud.points().iter().enumerate() {
            assert_eq!(point.x, index as f64);
        }
    }

    #[test]
    fn test_empty_cloud() {
        let cloud = PointCloud::default();
        assert!(cloud.is_empty());
        assert!(cloud.points().is_empty());
    }
}
