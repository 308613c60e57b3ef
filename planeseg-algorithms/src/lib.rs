#![warn(clippy::all)]
//! Algorithms for estimating the dominant plane of a point cloud.
//!
//! The central entry point is [segmentation::find_dominant_plane], which runs a RANSAC search
//! as a chain of concurrent producer/consumer stages. See the [pipeline] module for the stage
//! topology and its cancellation protocol.

// The staged producer/consumer pipeline behind the segmentation API, including the one-shot
// cancellation protocol that makes the unbounded sampling stages finite.
pub mod pipeline;
// RANSAC dominant-plane search, support counting and inlier/outlier partitioning.
pub mod segmentation;
