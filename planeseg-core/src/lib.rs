#![warn(clippy::all)]

//! Core data structures for planeseg
//!
//! Planeseg estimates the dominant planar surface in a 3D point cloud. This crate holds the
//! data model shared by all other planeseg crates: the immutable [PointCloud](crate::cloud::PointCloud),
//! the implicit-form [Plane](crate::math::Plane) and the geometry math used to derive and score
//! plane candidates.

pub extern crate nalgebra;

/// The immutable, shareable point cloud container
pub mod cloud;
/// Plane representation and the math used to derive and score plane candidates
pub mod math;
