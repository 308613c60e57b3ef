//! The concurrent RANSAC estimation pipeline.
//!
//! The pipeline is a chain of producer/consumer stages connected by rendezvous channels:
//!
//! ```text
//! sampler -> assembler -> limiter -> estimator -> evaluator pool (W) -> fan-in -> tracker
//! ```
//!
//! The sampler and assembler are naturally unbounded; the limiter makes the chain finite by
//! forwarding exactly N triplets and then broadcasting a one-shot [CancelToken] back to the
//! generator stages. Every downstream stage terminates through ordinary channel closure, and
//! the run joins every stage thread before returning, so a caller never observes a
//! partially-finished computation.

mod cancel;
mod stages;

pub use self::cancel::CancelToken;

use std::sync::Arc;

use anyhow::{anyhow, ensure, Result};
use log::{debug, info};
use planeseg_core::cloud::PointCloud;
use planeseg_core::math::{required_iterations, PlaneWithSupport};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Parameters of a dominant-plane search
#[derive(Debug, Clone)]
pub struct RansacParams {
    /// Desired probability that at least one sampled triplet consists only of inliers,
    /// in (0, 1)
    pub confidence: f64,
    /// Estimated fraction of cloud points lying on the dominant plane, in (0, 1)
    pub inlier_ratio: f64,
    /// Maximum point-to-plane distance for a point to count as support, > 0
    pub epsilon: f64,
    /// Number of support-evaluator worker threads, >= 1
    pub workers: usize,
    /// Seed for the point sampler. Runs with the same seed and cloud sample the same
    /// triplets, independently of the worker count. Sampling is randomly seeded when `None`.
    pub seed: Option<u64>,
}

impl RansacParams {
    /// Validates the parameters against the given cloud and computes the iteration count.
    ///
    /// # Errors
    ///
    /// If the cloud holds fewer than 3 points, `epsilon` is not positive, `workers` is zero or
    /// the confidence/inlier-ratio pair is outside the open unit interval, an error is
    /// returned and no pipeline stage is started.
    pub fn validate(&self, cloud: &PointCloud) -> Result<usize> {
        ensure!(
            cloud.len() >= 3,
            "the point cloud must hold at least 3 points to span a plane, got {}",
            cloud.len()
        );
        ensure!(
            self.epsilon > 0.0,
            "epsilon must be positive, got {}",
            self.epsilon
        );
        ensure!(self.workers >= 1, "at least one evaluator worker is required");
        required_iterations(self.confidence, self.inlier_ratio)
    }
}

/// Wires up all stages, runs the search to completion and returns the best plane found.
///
/// The dominant tracker runs on the calling thread: it exclusively owns the best result and
/// reduces the merged candidate stream with a strictly-greater replacement rule, so among
/// equally-supported candidates the earliest arrival wins.
pub(crate) fn run(cloud: Arc<PointCloud>, params: &RansacParams) -> Result<PlaneWithSupport> {
    let iterations = params.validate(&cloud)?;
    info!(
        "estimating dominant plane from {} candidate triplets over {} points using {} workers",
        iterations,
        cloud.len(),
        params.workers
    );

    let cancel = CancelToken::new();
    let rng = match params.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let mut handles = Vec::new();
    let (points, handle) = stages::spawn_sampler(Arc::clone(&cloud), cancel.clone(), rng)?;
    handles.push(handle);
    let (triplets, handle) = stages::spawn_assembler(cancel.clone(), points)?;
    handles.push(handle);
    let (limited, handle) = stages::spawn_limiter(cancel.clone(), triplets, iterations)?;
    handles.push(handle);
    let (planes, handle) = stages::spawn_estimator(limited)?;
    handles.push(handle);
    let (outputs, workers) =
        stages::spawn_evaluators(Arc::clone(&cloud), params.epsilon, params.workers, planes)?;
    handles.extend(workers);
    let (merged, forwarders) = stages::fan_in(outputs)?;
    handles.extend(forwarders);

    let best = reduce_best(merged);

    // join every stage, including the whole evaluator pool, before handing the result back
    for handle in handles {
        let stage = handle.thread().name().unwrap_or("pipeline").to_owned();
        handle
            .join()
            .map_err(|_| anyhow!("pipeline stage '{}' panicked", stage))?;
    }
    debug!(
        "pipeline terminated, best plane has {} supporting points",
        best.support
    );
    Ok(best)
}

/// Reduces a candidate stream to the best-supported plane.
///
/// Replacement requires strictly greater support, so the earliest of equally-supported
/// candidates is kept. With an empty stream the zero-support default is returned.
fn reduce_best<I: IntoIterator<Item = PlaneWithSupport>>(candidates: I) -> PlaneWithSupport {
    let mut best = PlaneWithSupport::default();
    for candidate in candidates {
        if candidate.support > best.support {
            best = candidate;
        }
    }
    best
}
