#![warn(clippy::all)]
//! Reading and writing of point cloud files for planeseg
//!
//! Currently supports the tab-separated XYZ format: one header line followed by one point per
//! line with `x`, `y` and `z` columns.

pub mod xyz;
