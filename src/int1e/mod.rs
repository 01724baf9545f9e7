//! One-electron integrals.
//!
//! `OneBodyAoInt` is the shell-pair driver shared by every one-body integral
//! object: an implementor fills its buffer for one shell pair in
//! `compute_pair`, and the provided methods publish that buffer as per-chunk
//! views or assemble whole-basis matrices, serially or with rayon.

pub mod libcint;
pub mod mpot;

use std::sync::Arc;

use ndarray::Array2;
use rayon::prelude::*;

use crate::basis::{BasisSet, Shell};
use crate::error::{MultipoleError, Result};
use crate::types::cart_comp;

pub use mpot::{MultipolePotentialInt, PotentialSource};

/// Cartesian component tables for l = 0..=max_am, in CCA order.
#[derive(Debug, Clone)]
pub struct MdHelper {
    am_comps: Vec<Vec<[usize; 3]>>,
}

impl MdHelper {
    pub fn new(max_am: usize) -> Self {
        MdHelper { am_comps: (0..=max_am).map(cart_comp).collect() }
    }

    pub fn max_am(&self) -> usize { self.am_comps.len() - 1 }

    #[inline]
    pub fn comps(&self, l: usize) -> &[[usize; 3]] {
        &self.am_comps[l]
    }
}

pub trait OneBodyAoInt {
    fn basis1(&self) -> &Arc<BasisSet>;
    fn basis2(&self) -> &Arc<BasisSet>;

    /// Number of chunks (derivative components) produced per shell pair.
    fn nchunk(&self) -> usize;

    /// Fills the buffer for one shell pair.
    fn compute_pair(&mut self, s1: &Shell, s2: &Shell) -> Result<()>;

    /// Raw buffer of the last `compute_pair`: `nchunk` row-major
    /// `[n1 × n2]` blocks back to back.
    fn buffer(&self) -> &[f64];

    /// n1·n2 of the last computed shell pair.
    fn chunk_size(&self) -> usize;

    fn chunk(&self, k: usize) -> &[f64] {
        let n = self.chunk_size();
        &self.buffer()[k * n..(k + 1) * n]
    }

    /// One view per chunk; valid until the next compute call.
    fn buffers(&self) -> Vec<&[f64]> {
        (0..self.nchunk()).map(|k| self.chunk(k)).collect()
    }

    /// `compute_pair` on shells `i` of basis 1 and `j` of basis 2.
    fn compute_shell(&mut self, i: usize, j: usize) -> Result<()> {
        let bs1 = Arc::clone(self.basis1());
        let bs2 = Arc::clone(self.basis2());
        let s1 = bs1.shell(i).ok_or(MultipoleError::CapacityExceeded {
            what: "shell index in basis 1",
            requested: i,
            capacity: bs1.nshell(),
        })?;
        let s2 = bs2.shell(j).ok_or(MultipoleError::CapacityExceeded {
            what: "shell index in basis 2",
            requested: j,
            capacity: bs2.nshell(),
        })?;
        self.compute_pair(s1, s2)
    }

    /// One `nbf1 × nbf2` matrix per chunk.
    fn compute(&mut self) -> Result<Vec<Array2<f64>>> {
        let bs1 = Arc::clone(self.basis1());
        let bs2 = Arc::clone(self.basis2());
        let mut mats = vec![Array2::zeros((bs1.nbf(), bs2.nbf())); self.nchunk()];
        for (i, s1) in bs1.shells().iter().enumerate() {
            let off1 = bs1.shell_to_basis_function(i);
            for (j, s2) in bs2.shells().iter().enumerate() {
                let off2 = bs2.shell_to_basis_function(j);
                self.compute_pair(s1, s2)?;
                scatter(&mut mats, self.buffer(), off1, s1.nfunction(), off2, s2.nfunction());
            }
        }
        Ok(mats)
    }

    /// Same result as `compute`, with shell rows of basis 1 distributed over
    /// the rayon pool. Every worker evaluates on its own clone of `self`.
    fn compute_par(&self) -> Result<Vec<Array2<f64>>>
    where
        Self: Clone + Send + Sync,
    {
        let bs1 = Arc::clone(self.basis1());
        let bs2 = Arc::clone(self.basis2());
        let nchunk = self.nchunk();

        let rows: Vec<Vec<Array2<f64>>> = (0..bs1.nshell())
            .into_par_iter()
            .map_init(
                || self.clone(),
                |engine, i| -> Result<Vec<Array2<f64>>> {
                    let s1 = &bs1.shells()[i];
                    let n1 = s1.nfunction();
                    let mut block = vec![Array2::zeros((n1, bs2.nbf())); nchunk];
                    for (j, s2) in bs2.shells().iter().enumerate() {
                        engine.compute_pair(s1, s2)?;
                        let off2 = bs2.shell_to_basis_function(j);
                        scatter(&mut block, engine.buffer(), 0, n1, off2, s2.nfunction());
                    }
                    Ok(block)
                },
            )
            .collect::<Result<_>>()?;

        let mut mats = vec![Array2::zeros((bs1.nbf(), bs2.nbf())); nchunk];
        for (i, block) in rows.into_iter().enumerate() {
            let off1 = bs1.shell_to_basis_function(i);
            for (m, b) in mats.iter_mut().zip(block) {
                let (n1, n2) = b.dim();
                for r in 0..n1 {
                    for c in 0..n2 {
                        m[[off1 + r, c]] = b[[r, c]];
                    }
                }
            }
        }
        Ok(mats)
    }
}

/// Copies every `[n1 × n2]` chunk of `buffer` into its block of `mats`.
fn scatter(mats: &mut [Array2<f64>], buffer: &[f64], off1: usize, n1: usize, off2: usize, n2: usize) {
    let size = n1 * n2;
    for (k, m) in mats.iter_mut().enumerate() {
        let chunk = &buffer[k * size..(k + 1) * size];
        for a in 0..n1 {
            for b in 0..n2 {
                m[[off1 + a, off2 + b]] = chunk[a * n2 + b];
            }
        }
    }
}
