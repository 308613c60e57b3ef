use std::sync::Arc;

use anyhow::Result;
use planeseg_core::cloud::PointCloud;
use planeseg_core::math::{Plane, PlaneWithSupport};
use planeseg_core::nalgebra::Vector3;
use rayon::prelude::*;

use crate::pipeline::{self, RansacParams};

/// Finds the plane with the most supporting points in the cloud using the concurrent RANSAC
/// pipeline.
///
/// The search samples `N` random point triplets (with `N` derived from the confidence and
/// inlier-ratio parameters), derives a plane candidate from each and scores every candidate
/// against the whole cloud. The candidate supported by the most points wins; among equally
/// good candidates the one found first is kept.
///
/// The cloud is only ever read and can be shared freely while the search runs.
///
/// # Examples
///
/// ```
/// # use std::sync::Arc;
/// # use planeseg_core::cloud::PointCloud;
/// # use planeseg_core::nalgebra::Vector3;
/// # use planeseg_algorithms::pipeline::RansacParams;
/// # use planeseg_algorithms::segmentation::find_dominant_plane;
/// // a cloud lying mostly on the x/y plane, plus one outlier
/// let mut points: Vec<_> = (0..100)
///     .map(|i| Vector3::new(f64::from(i % 10), f64::from(i / 10), 0.0))
///     .collect();
/// points.push(Vector3::new(0.0, 0.0, 25.0));
/// let cloud = Arc::new(PointCloud::new(points));
///
/// let params = RansacParams {
///     confidence: 0.999,
///     inlier_ratio: 0.7,
///     epsilon: 0.5,
///     workers: 4,
///     seed: Some(7),
/// };
/// let best = find_dominant_plane(cloud, &params).unwrap();
/// assert_eq!(best.support, 100);
/// ```
///
/// # Errors
///
/// If the parameters are invalid or the cloud holds fewer than 3 points, an error is returned
/// before any pipeline stage starts.
pub fn find_dominant_plane(
    cloud: Arc<PointCloud>,
    params: &RansacParams,
) -> Result<PlaneWithSupport> {
    pipeline::run(cloud, params)
}

/// Scores a plane candidate against the cloud: counts the points whose perpendicular distance
/// to the plane is below `epsilon`.
///
/// Degenerate candidates (zero normal, derived from collinear triplets) support no points and
/// always score 0 rather than poisoning the distance computation with a division by zero.
pub fn support_of(plane: &Plane, cloud: &PointCloud, epsilon: f64) -> PlaneWithSupport {
    if plane.is_degenerate() {
        return PlaneWithSupport {
            plane: *plane,
            support: 0,
        };
    }
    let support = cloud
        .points()
        .iter()
        .filter(|&point| plane.distance_to(point) < epsilon)
        .count();
    PlaneWithSupport {
        plane: *plane,
        support,
    }
}

/// Splits the cloud into the points supporting `plane` and the remainder.
///
/// The first returned vector holds all points within `epsilon` of the plane, the second all
/// other points; together they are a permutation-free partition of the cloud. For a degenerate
/// plane every point lands in the remainder.
pub fn partition_by_plane(
    cloud: &PointCloud,
    plane: &Plane,
    epsilon: f64,
) -> (Vec<Vector3<f64>>, Vec<Vector3<f64>>) {
    if plane.is_degenerate() {
        return (Vec::new(), cloud.points().to_vec());
    }
    cloud
        .points()
        .par_iter()
        .copied()
        .partition(|point| plane.distance_to(point) < epsilon)
}
