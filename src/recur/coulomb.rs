//! Hermite-Coulomb integrals R_{tuv} and their interaction kernels.
//!
//! R^{(n)}_{tuv} are derivatives of the Boys-function seed with respect to the
//! Gaussian-product center P (Helgaker, Jørgensen, Olsen, eq. 9.9.18-9.9.20):
//!
//!   R^{(n)}_{000}     = s·(−2α)^n F_n(α·|P−C|²)
//!   R^{(n)}_{t+1,u,v} = t·R^{(n+1)}_{t−1,u,v} + X_PC·R^{(n+1)}_{t,u,v}
//!
//! and symmetrically in u and v. The kernel only changes the seed (α, s);
//! the recursion is linear in the seeds, so a difference of two kernels is a
//! difference of seeds followed by a single recursion.
//!
//! Storage: R[v + d·(u + d·(t + d·n))] with d = r_am+1 for the current pair,
//! so the n = 0 slice used by the contraction is the leading d³ block.

use serde::{Deserialize, Serialize};

use crate::boys::boys_fn;
use crate::error::{MultipoleError, Result};

/// Interaction kernel of the multipole potential.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoulombKernel {
    /// Bare 1/r.
    Coulomb,
    /// Short-range part erfc(√η·r)/r. Together with `RangeSeparated` at
    /// ω = √η it reconstructs the bare kernel.
    Regularized { eta: f64 },
    /// Long-range part erf(ω·r)/r.
    RangeSeparated { omega: f64 },
}

impl Default for CoulombKernel {
    fn default() -> Self { CoulombKernel::Coulomb }
}

impl CoulombKernel {
    pub fn name(&self) -> &'static str {
        match self {
            CoulombKernel::Coulomb => "coulomb",
            CoulombKernel::Regularized { .. } => "regularized",
            CoulombKernel::RangeSeparated { .. } => "range_separated",
        }
    }

    /// Rejects negative or non-finite η and ω.
    pub fn validate(&self) -> Result<()> {
        match *self {
            CoulombKernel::Coulomb => Ok(()),
            CoulombKernel::Regularized { eta } => check_parameter("eta", eta),
            CoulombKernel::RangeSeparated { omega } => check_parameter("omega", omega),
        }
    }

    /// Writes R^{(n)}_{000} for n = 0..=nmax into `seeds`, using `fm` as
    /// Boys-function scratch. Both slices need at least nmax+1 elements.
    pub fn fill_seeds(&self, nmax: usize, p: f64, pc2: f64, fm: &mut [f64], seeds: &mut [f64]) {
        match *self {
            CoulombKernel::Coulomb => {
                attenuated_seeds(nmax, p, 1.0, pc2, fm, seeds, false);
            }
            CoulombKernel::RangeSeparated { omega } => {
                let w2 = omega * omega;
                let alpha = p * w2 / (p + w2);
                attenuated_seeds(nmax, alpha, (alpha / p).sqrt(), pc2, fm, seeds, false);
            }
            CoulombKernel::Regularized { eta } => {
                attenuated_seeds(nmax, p, 1.0, pc2, fm, seeds, false);
                let alpha = p * eta / (p + eta);
                attenuated_seeds(nmax, alpha, (alpha / p).sqrt(), pc2, fm, seeds, true);
            }
        }
    }
}

fn check_parameter(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MultipoleError::InvalidParameter { name, value })
    }
}

/// Writes scale·(−2α)^n F_n(α·pc2) into seeds[n], or subtracts it when `subtract` is set.
fn attenuated_seeds(
    nmax: usize,
    alpha: f64,
    scale: f64,
    pc2: f64,
    fm: &mut [f64],
    seeds: &mut [f64],
    subtract: bool,
) {
    boys_fn(fm, alpha * pc2, nmax);
    let mut fac = scale;
    for n in 0..=nmax {
        if subtract {
            seeds[n] -= fac * fm[n];
        } else {
            seeds[n] = fac * fm[n];
        }
        fac *= -2.0 * alpha;
    }
}

/// Owned R-tensor storage, sized once for the largest r_am the object needs.
#[derive(Debug, Clone)]
pub struct HermiteCoulomb {
    max_r_am: usize,
    r: Vec<f64>,
    fm: Vec<f64>,
    seeds: Vec<f64>,
    /// Edge length d of the last fill.
    rdim: usize,
}

impl HermiteCoulomb {
    pub fn new(max_r_am: usize) -> Self {
        let d = max_r_am + 1;
        HermiteCoulomb {
            max_r_am,
            r: vec![0.0; d * d * d * d],
            fm: vec![0.0; d],
            seeds: vec![0.0; d],
            rdim: d,
        }
    }

    pub fn max_r_am(&self) -> usize { self.max_r_am }

    /// Number of doubles held by the tensor.
    pub fn len(&self) -> usize { self.r.len() }

    pub fn is_empty(&self) -> bool { self.r.is_empty() }

    /// Builds R_{tuv} for t+u+v <= r_am at displacement `pc` = P − C.
    pub fn fill(&mut self, kernel: &CoulombKernel, r_am: usize, p: f64, pc: &[f64; 3]) -> Result<()> {
        if r_am > self.max_r_am {
            return Err(MultipoleError::CapacityExceeded {
                what: "Hermite-Coulomb tensor order",
                requested: r_am,
                capacity: self.max_r_am,
            });
        }
        let d = r_am + 1;
        self.rdim = d;
        let pc2 = pc[0] * pc[0] + pc[1] * pc[1] + pc[2] * pc[2];
        kernel.fill_seeds(r_am, p, pc2, &mut self.fm, &mut self.seeds);

        let idx = |n: usize, t: usize, u: usize, v: usize| v + d * (u + d * (t + d * n));
        let r = &mut self.r;
        for n in 0..=r_am {
            r[idx(n, 0, 0, 0)] = self.seeds[n];
        }
        // Level n only reads level n+1, which is complete by then.
        for n in (0..r_am).rev() {
            let lmax = r_am - n;
            for t in 0..=lmax {
                for u in 0..=(lmax - t) {
                    for v in 0..=(lmax - t - u) {
                        if t + u + v == 0 {
                            continue;
                        }
                        let val = if t > 0 {
                            let mut x = pc[0] * r[idx(n + 1, t - 1, u, v)];
                            if t > 1 {
                                x += (t - 1) as f64 * r[idx(n + 1, t - 2, u, v)];
                            }
                            x
                        } else if u > 0 {
                            let mut x = pc[1] * r[idx(n + 1, t, u - 1, v)];
                            if u > 1 {
                                x += (u - 1) as f64 * r[idx(n + 1, t, u - 2, v)];
                            }
                            x
                        } else {
                            let mut x = pc[2] * r[idx(n + 1, t, u, v - 1)];
                            if v > 1 {
                                x += (v - 1) as f64 * r[idx(n + 1, t, u, v - 2)];
                            }
                            x
                        };
                        r[idx(n, t, u, v)] = val;
                    }
                }
            }
        }
        Ok(())
    }

    /// R^{(0)}_{tuv} from the last `fill`.
    #[inline]
    pub fn get(&self, t: usize, u: usize, v: usize) -> f64 {
        let d = self.rdim;
        self.r[v + d * (u + d * t)]
    }
}
