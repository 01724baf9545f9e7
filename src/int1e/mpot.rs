//! Multipole potential integrals by McMurchie–Davidson.
//!
//! For a probe point C the chunk of derivative component (ex, ey, ez), with
//! d = ex+ey+ez, holds
//!
//!   ∂^d/∂C_x^ex ∂C_y^ey ∂C_z^ez  ∫ φ_i(r) K(|r − C|) φ_j(r) dr
//!
//! for d = 0..=order, chunks ordered by d and CCA order within each d. With
//! a point-charge field every charge contributes with weight −Z, so the
//! order-0 chunk is the electron–charge attraction.
//!
//! Primitive pair contribution, per chunk:
//!
//!   (−1)^d · (2π/p) c_a c_b Σ_{tuv} E^{ij}_t E^{kl}_u E^{mn}_v R_{t+ex, u+ey, v+ez}

use std::f64::consts::PI;
use std::panic::Location;
use std::sync::Arc;

use itertools::iproduct;
use log::{debug, trace};

use super::{MdHelper, OneBodyAoInt};
use crate::basis::{BasisSet, PointCharge, Shell};
use crate::config::MultipoleConfig;
use crate::error::{MultipoleError, Result};
use crate::recur::{CoulombKernel, HermiteCoulomb, HermiteExpansion};
use crate::transform::{cart2sph_pair, SphericalTransform};
use crate::types::{cart_comp, cumulative_cart_dim, ncart};

/// Primitive pairs with μ|A−B|² above this are skipped.
const EXPCUTOFF: f64 = 50.0;

/// Where the potential is probed.
#[derive(Debug, Clone, PartialEq)]
pub enum PotentialSource {
    /// A single point with unit weight.
    Origin([f64; 3]),
    /// A sum over point charges, each weighted by −Z.
    ChargeField(Vec<PointCharge>),
}

#[derive(Debug, Clone)]
pub struct MultipolePotentialInt {
    bs1: Arc<BasisSet>,
    bs2: Arc<BasisSet>,
    order: usize,
    kernel: CoulombKernel,
    source: PotentialSource,

    max_am1: usize,
    max_am2: usize,
    helper: MdHelper,
    /// Derivative components of 1/R, one list per order d.
    comps_der: Vec<Vec<[usize; 3]>>,
    transforms: Vec<SphericalTransform>,

    hermite: HermiteExpansion,
    coulomb: HermiteCoulomb,
    buffer: Vec<f64>,
    cart: Vec<f64>,
    tmp: Vec<f64>,
    chunk_size: usize,
}

impl MultipolePotentialInt {
    /// Bare 1/r potential at the origin (see `set_origin`).
    #[track_caller]
    pub fn new(bs1: Arc<BasisSet>, bs2: Arc<BasisSet>, order: usize, deriv: usize) -> Result<Self> {
        Self::with_kernel(bs1, bs2, order, deriv, CoulombKernel::Coulomb)
    }

    /// erfc(√η r)/r potential of the nuclear charges of `bs1`.
    #[track_caller]
    pub fn regularized(
        bs1: Arc<BasisSet>,
        bs2: Arc<BasisSet>,
        order: usize,
        deriv: usize,
        eta: f64,
    ) -> Result<Self> {
        Self::with_kernel(bs1, bs2, order, deriv, CoulombKernel::Regularized { eta })
    }

    /// erf(ω r)/r potential of the nuclear charges of `bs1`.
    #[track_caller]
    pub fn range_separated(
        bs1: Arc<BasisSet>,
        bs2: Arc<BasisSet>,
        order: usize,
        deriv: usize,
        omega: f64,
    ) -> Result<Self> {
        Self::with_kernel(bs1, bs2, order, deriv, CoulombKernel::RangeSeparated { omega })
    }

    /// Builds the object from a deserialized configuration. An `origin`
    /// given in the configuration replaces the default source.
    #[track_caller]
    pub fn from_config(config: &MultipoleConfig, bs1: Arc<BasisSet>, bs2: Arc<BasisSet>) -> Result<Self> {
        let mut int = Self::with_kernel(bs1, bs2, config.order, config.deriv, config.kernel)?;
        if let Some(origin) = config.origin {
            int.set_origin(origin);
        }
        Ok(int)
    }

    /// Storage is sized from the largest angular momentum in each basis;
    /// `deriv` must be 0.
    #[track_caller]
    pub fn with_kernel(
        bs1: Arc<BasisSet>,
        bs2: Arc<BasisSet>,
        order: usize,
        deriv: usize,
        kernel: CoulombKernel,
    ) -> Result<Self> {
        if deriv > 0 {
            return Err(MultipoleError::FeatureNotImplemented {
                component: "MultipolePotentialInt",
                feature: format!("derivative integrals (deriv = {})", deriv),
                location: Location::caller().to_string(),
            });
        }
        kernel.validate()?;

        let max_am1 = bs1.max_am();
        let max_am2 = bs2.max_am();
        let nchunk = cumulative_cart_dim(order);
        let buffer = vec![0.0; nchunk * ncart(max_am1) * ncart(max_am2)];
        let coulomb = HermiteCoulomb::new(max_am1 + max_am2 + order);

        let source = match kernel {
            CoulombKernel::Coulomb => PotentialSource::Origin([0.0; 3]),
            _ => PotentialSource::ChargeField(bs1.molecule().nuclear_charge_field()),
        };

        debug!(
            "MultipolePotentialInt: kernel {}, order {}, max am ({}, {}), {} chunks, buffer {} doubles, R tensor {} doubles",
            kernel.name(), order, max_am1, max_am2, nchunk, buffer.len(), coulomb.len()
        );

        Ok(MultipolePotentialInt {
            order,
            kernel,
            source,
            max_am1,
            max_am2,
            helper: MdHelper::new(max_am1.max(max_am2)),
            comps_der: (0..=order).map(cart_comp).collect(),
            transforms: SphericalTransform::table(max_am1.max(max_am2)),
            hermite: HermiteExpansion::new(max_am1, max_am2),
            coulomb,
            buffer,
            cart: Vec::new(),
            tmp: Vec::new(),
            chunk_size: 0,
            bs1,
            bs2,
        })
    }

    pub fn order(&self) -> usize { self.order }
    pub fn kernel(&self) -> &CoulombKernel { &self.kernel }
    pub fn source(&self) -> &PotentialSource { &self.source }

    /// Sets η for later calls. Only valid on the regularized kernel.
    pub fn set_eta(&mut self, eta: f64) -> Result<()> {
        match self.kernel {
            CoulombKernel::Regularized { .. } => {
                let kernel = CoulombKernel::Regularized { eta };
                kernel.validate()?;
                trace!("set eta = {}", eta);
                self.kernel = kernel;
                Ok(())
            }
            _ => Err(MultipoleError::KernelMismatch {
                expected: "regularized",
                actual: self.kernel.name(),
            }),
        }
    }

    /// Sets ω for later calls. Only valid on the range-separated kernel.
    pub fn set_omega(&mut self, omega: f64) -> Result<()> {
        match self.kernel {
            CoulombKernel::RangeSeparated { .. } => {
                let kernel = CoulombKernel::RangeSeparated { omega };
                kernel.validate()?;
                trace!("set omega = {}", omega);
                self.kernel = kernel;
                Ok(())
            }
            _ => Err(MultipoleError::KernelMismatch {
                expected: "range_separated",
                actual: self.kernel.name(),
            }),
        }
    }

    /// Probe a single point with unit weight.
    pub fn set_origin(&mut self, origin: [f64; 3]) {
        trace!("set origin = {:?}", origin);
        self.source = PotentialSource::Origin(origin);
    }

    /// Replaces the charge field with a copy of `charges`.
    pub fn set_charge_field(&mut self, charges: &[PointCharge]) -> Result<()> {
        for q in charges {
            if !q.charge.is_finite() {
                return Err(MultipoleError::InvalidParameter { name: "charge", value: q.charge });
            }
            if let Some(&x) = q.position.iter().find(|x| !x.is_finite()) {
                return Err(MultipoleError::InvalidParameter { name: "charge position", value: x });
            }
        }
        debug!("charge field replaced: {} charges", charges.len());
        self.source = PotentialSource::ChargeField(charges.to_vec());
        Ok(())
    }

    fn check_capacity(&self, am1: usize, am2: usize) -> Result<()> {
        if am1 > self.max_am1 {
            return Err(MultipoleError::CapacityExceeded {
                what: "angular momentum of shell 1",
                requested: am1,
                capacity: self.max_am1,
            });
        }
        if am2 > self.max_am2 {
            return Err(MultipoleError::CapacityExceeded {
                what: "angular momentum of shell 2",
                requested: am2,
                capacity: self.max_am2,
            });
        }
        Ok(())
    }
}

impl OneBodyAoInt for MultipolePotentialInt {
    fn basis1(&self) -> &Arc<BasisSet> { &self.bs1 }
    fn basis2(&self) -> &Arc<BasisSet> { &self.bs2 }

    fn nchunk(&self) -> usize { cumulative_cart_dim(self.order) }

    fn compute_pair(&mut self, s1: &Shell, s2: &Shell) -> Result<()> {
        let am1 = s1.am();
        let am2 = s2.am();
        self.check_capacity(am1, am2)?;

        let r_am = am1 + am2 + self.order;
        let nc1 = ncart(am1);
        let nc2 = ncart(am2);
        let size = nc1 * nc2;
        let nchunk = self.nchunk();
        self.buffer[..nchunk * size].fill(0.0);

        let a_c = s1.center();
        let b_c = s2.center();
        let ab2: f64 = (0..3).map(|k| (a_c[k] - b_c[k]).powi(2)).sum();

        // A bare origin is a unit probe, i.e. a charge of −1.
        let origin_probe;
        let sources: &[PointCharge] = match &self.source {
            PotentialSource::Origin(o) => {
                origin_probe = [PointCharge::new(-1.0, *o)];
                &origin_probe
            }
            PotentialSource::ChargeField(q) => q,
        };

        let comps1 = self.helper.comps(am1);
        let comps2 = self.helper.comps(am2);

        for (pa, pb) in iproduct!(s1.primitives(), s2.primitives()) {
            let a = pa.exponent;
            let b = pb.exponent;
            let p = a + b;
            if a * b / p * ab2 > EXPCUTOFF {
                continue;
            }
            let p_c = [
                (a * a_c[0] + b * b_c[0]) / p,
                (a * a_c[1] + b * b_c[1]) / p,
                (a * a_c[2] + b * b_c[2]) / p,
            ];
            self.hermite.fill(am1, am2, &p_c, &a_c, &b_c, a, b);
            let prefac = 2.0 * PI * pa.coefficient * pb.coefficient / p;

            for q in sources {
                if q.charge == 0.0 {
                    continue;
                }
                let pc = [
                    p_c[0] - q.position[0],
                    p_c[1] - q.position[1],
                    p_c[2] - q.position[2],
                ];
                self.coulomb.fill(&self.kernel, r_am, p, &pc)?;
                accumulate(
                    &mut self.buffer,
                    &self.hermite,
                    &self.coulomb,
                    comps1,
                    comps2,
                    &self.comps_der,
                    -q.charge * prefac,
                );
            }
        }

        // Pure transform chunk by chunk, compacting towards the front. Chunk
        // k lands in [k·n1·n2, (k+1)·n1·n2), which never reaches chunk k+1.
        let n1 = s1.nfunction();
        let n2 = s2.nfunction();
        if s1.is_pure() || s2.is_pure() {
            let t1 = if s1.is_pure() { Some(&self.transforms[am1]) } else { None };
            let t2 = if s2.is_pure() { Some(&self.transforms[am2]) } else { None };
            for k in 0..nchunk {
                self.cart.clear();
                self.cart.extend_from_slice(&self.buffer[k * size..(k + 1) * size]);
                cart2sph_pair(
                    &mut self.buffer[k * n1 * n2..(k + 1) * n1 * n2],
                    &self.cart,
                    t1,
                    t2,
                    nc1,
                    nc2,
                    &mut self.tmp,
                );
            }
        }
        self.chunk_size = n1 * n2;
        Ok(())
    }

    fn buffer(&self) -> &[f64] {
        &self.buffer[..self.nchunk() * self.chunk_size]
    }

    fn chunk_size(&self) -> usize { self.chunk_size }
}

/// Adds one primitive pair and one source to every chunk of `buffer`.
fn accumulate(
    buffer: &mut [f64],
    hermite: &HermiteExpansion,
    coulomb: &HermiteCoulomb,
    comps1: &[[usize; 3]],
    comps2: &[[usize; 3]],
    comps_der: &[Vec<[usize; 3]>],
    scale: f64,
) {
    let size = comps1.len() * comps2.len();
    let mut chunk = 0;
    for (d, comps) in comps_der.iter().enumerate() {
        let fac = if d % 2 == 0 { scale } else { -scale };
        for &[ex, ey, ez] in comps {
            let out = &mut buffer[chunk * size..(chunk + 1) * size];
            for (i1, &c1) in comps1.iter().enumerate() {
                for (i2, &c2) in comps2.iter().enumerate() {
                    let [e_x, e_y, e_z] = hermite.coefficients(c1, c2);
                    let mut val = 0.0;
                    for (t, &et) in e_x.iter().enumerate() {
                        for (u, &eu) in e_y.iter().enumerate() {
                            let etu = et * eu;
                            for (v, &ev) in e_z.iter().enumerate() {
                                val += etu * ev * coulomb.get(t + ex, u + ey, v + ez);
                            }
                        }
                    }
                    out[i1 * comps2.len() + i2] += fac * val;
                }
            }
            chunk += 1;
        }
    }
}
