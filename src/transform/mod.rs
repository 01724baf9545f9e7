//! Cartesian → spherical-harmonic transformation module.

pub mod cart2sph;

pub use cart2sph::{cart2sph_pair, c2s_matrix, SphericalTransform};
