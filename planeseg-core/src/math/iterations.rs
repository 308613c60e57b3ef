use anyhow::{ensure, Result};

/// Computes the number of RANSAC iterations required to find an outlier-free triplet with the
/// given confidence.
///
/// `confidence` is the desired probability that at least one of the sampled triplets consists
/// only of inliers, `inlier_ratio` the estimated fraction of cloud points lying on the dominant
/// plane. Both must lie strictly between 0 and 1. The returned count is
/// `ceil(ln(1 - confidence) / ln(1 - inlier_ratio³))`.
///
/// # Examples
///
/// ```
/// # use planeseg_core::math::required_iterations;
/// assert_eq!(required_iterations(0.99, 0.5).unwrap(), 35);
/// ```
///
/// # Errors
///
/// If `confidence` or `inlier_ratio` lies outside the open interval (0, 1), an error is
/// returned.
pub fn required_iterations(confidence: f64, inlier_ratio: f64) -> Result<usize> {
    ensure!(
        confidence > 0.0 && confidence < 1.0,
        "confidence must lie strictly between 0 and 1, got {}",
        confidence
    );
    ensure!(
        inlier_ratio > 0.0 && inlier_ratio < 1.0,
        "inlier ratio must lie strictly between 0 and 1, got {}",
        inlier_ratio
    );

    let iterations = ((1.0 - confidence).ln() / (1.0 - inlier_ratio.powi(3)).ln()).ceil();
    ensure!(
        iterations.is_finite() && iterations >= 1.0,
        "confidence {} and inlier ratio {} yield an unusable iteration count ({})",
        confidence,
        inlier_ratio,
        iterations
    );
    Ok(iterations as usize)
}
