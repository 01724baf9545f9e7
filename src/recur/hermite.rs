//! Hermite expansion coefficients E^{ij}_t of a Gaussian product.
//!
//! For one Cartesian axis the product of two Gaussians is re-expanded as
//!   x_A^i x_B^j exp(-a x_A²) exp(-b x_B²) = Σ_t E^{ij}_t Λ_t(x_P)
//! where Λ_t are Hermite Gaussians of exponent p = a+b centred at P.
//!
//! Recurrence (Helgaker, Jørgensen, Olsen, eq. 9.5.6/9.5.7):
//!   E^{00}_0     = exp(-μ X_AB²),  μ = ab/p
//!   E^{i+1,j}_t  = 1/(2p) E^{ij}_{t-1} + X_PA E^{ij}_t + (t+1) E^{ij}_{t+1}
//!   E^{i,j+1}_t  = 1/(2p) E^{ij}_{t-1} + X_PB E^{ij}_t + (t+1) E^{ij}_{t+1}
//!
//! Storage per axis is flat with strides fixed by the current shell pair:
//!   E[t + edim3·(j + edim2·i)],  edim2 = am2+1, edim3 = am1+am2+2.

/// Scratch for the three E-matrices, sized once for the largest shell pair.
#[derive(Debug, Clone)]
pub struct HermiteExpansion {
    max_am1: usize,
    max_am2: usize,
    ex: Vec<f64>,
    ey: Vec<f64>,
    ez: Vec<f64>,
    /// Strides of the last `fill`.
    edim2: usize,
    edim3: usize,
}

impl HermiteExpansion {
    pub fn new(max_am1: usize, max_am2: usize) -> Self {
        let size = (max_am1 + 1) * (max_am2 + 1) * (max_am1 + max_am2 + 2);
        HermiteExpansion {
            max_am1,
            max_am2,
            ex: vec![0.0; size],
            ey: vec![0.0; size],
            ez: vec![0.0; size],
            edim2: 1,
            edim3: 2,
        }
    }

    pub fn max_am(&self) -> (usize, usize) { (self.max_am1, self.max_am2) }

    /// Builds E_x, E_y, E_z for one primitive pair.
    ///
    /// `am1 <= max_am1` and `am2 <= max_am2` are checked by the caller.
    #[allow(clippy::too_many_arguments)]
    pub fn fill(
        &mut self,
        am1: usize,
        am2: usize,
        p_center: &[f64; 3],
        a_center: &[f64; 3],
        b_center: &[f64; 3],
        a: f64,
        b: f64,
    ) {
        debug_assert!(am1 <= self.max_am1 && am2 <= self.max_am2);
        let edim2 = am2 + 1;
        let edim3 = am1 + am2 + 2;
        self.edim2 = edim2;
        self.edim3 = edim3;

        let p = a + b;
        let mu = a * b / p;
        let oo2p = 0.5 / p;

        for (axis, e) in [&mut self.ex, &mut self.ey, &mut self.ez].into_iter().enumerate() {
            let xpa = p_center[axis] - a_center[axis];
            let xpb = p_center[axis] - b_center[axis];
            let xab = a_center[axis] - b_center[axis];
            fill_axis(
                &mut e[..(am1 + 1) * edim2 * edim3],
                am1, am2, edim2, edim3,
                (-mu * xab * xab).exp(), oo2p, xpa, xpb,
            );
        }
    }

    /// E_x^{i,j}, E_y^{k,l}, E_z^{m,n} as slices over t = 0..=i+j etc.
    #[inline]
    pub fn coefficients(&self, i: [usize; 3], j: [usize; 3]) -> [&[f64]; 3] {
        [
            self.row(&self.ex, i[0], j[0]),
            self.row(&self.ey, i[1], j[1]),
            self.row(&self.ez, i[2], j[2]),
        ]
    }

    #[inline]
    fn row<'a>(&self, e: &'a [f64], i: usize, j: usize) -> &'a [f64] {
        let start = self.edim3 * (j + self.edim2 * i);
        &e[start..start + i + j + 1]
    }
}

#[allow(clippy::too_many_arguments)]
fn fill_axis(
    e: &mut [f64],
    am1: usize,
    am2: usize,
    edim2: usize,
    edim3: usize,
    e000: f64,
    oo2p: f64,
    xpa: f64,
    xpb: f64,
) {
    let idx = |i: usize, j: usize, t: usize| t + edim3 * (j + edim2 * i);
    e.iter_mut().for_each(|v| *v = 0.0);
    e[0] = e000;

    for i in 0..=am1 {
        for j in 0..=am2 {
            if i == 0 && j == 0 {
                continue;
            }
            // Step from (i-1, j) when possible, else from (i, j-1).
            let (src, x) = if i > 0 { (idx(i - 1, j, 0), xpa) } else { (idx(i, j - 1, 0), xpb) };
            let tmax = i + j;
            for t in 0..=tmax {
                // E^{src}_{t} is zero for t > i+j-1; the slot is zeroed above.
                let mut v = x * e[src + t] + (t + 1) as f64 * e[src + t + 1];
                if t > 0 {
                    v += oo2p * e[src + t - 1];
                }
                e[idx(i, j, t)] = v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn e000_is_gaussian_product_factor() {
        let mut h = HermiteExpansion::new(0, 0);
        let (a, b) = (0.8, 1.3);
        let ac = [0.0, 0.1, -0.2];
        let bc = [0.4, -0.3, 0.5];
        let p = a + b;
        let pc = [
            (a * ac[0] + b * bc[0]) / p,
            (a * ac[1] + b * bc[1]) / p,
            (a * ac[2] + b * bc[2]) / p,
        ];
        h.fill(0, 0, &pc, &ac, &bc, a, b);
        let [ex, ey, ez] = h.coefficients([0; 3], [0; 3]);
        let mu = a * b / p;
        let r2: f64 = (0..3).map(|k| (ac[k] - bc[k]).powi(2)).sum();
        assert!((ex[0] * ey[0] * ez[0] - (-mu * r2).exp()).abs() < 1e-15);
    }

    #[test]
    fn one_dimensional_overlap_moments() {
        // ∫ x_A^i x_B^j exp(-a x_A²) exp(-b x_B²) dx = E^{ij}_0 · sqrt(π/p)
        let (a, b) = (0.6, 0.9);
        let (xa, xb) = (0.3, -0.5);
        let p = a + b;
        let xp = (a * xa + b * xb) / p;
        let mut h = HermiteExpansion::new(2, 2);
        h.fill(2, 2, &[xp, 0.0, 0.0], &[xa, 0.0, 0.0], &[xb, 0.0, 0.0], a, b);

        let n = 20000;
        let (lo, hi) = (-8.0_f64, 8.0_f64);
        let dx = (hi - lo) / n as f64;
        for i in 0..=2 {
            for j in 0..=2 {
                let mut s = 0.0;
                for k in 0..=n {
                    let x = lo + k as f64 * dx;
                    let w = if k == 0 || k == n { 0.5 } else { 1.0 };
                    s += w * (x - xa).powi(i as i32) * (x - xb).powi(j as i32)
                        * (-a * (x - xa).powi(2) - b * (x - xb).powi(2)).exp();
                }
                s *= dx;
                let [ex, _, _] = h.coefficients([i, 0, 0], [j, 0, 0]);
                let analytic = ex[0] * (std::f64::consts::PI / p).sqrt();
                assert!((s - analytic).abs() < 1e-10, "i={} j={}: {} vs {}", i, j, s, analytic);
            }
        }
    }

    #[test]
    fn refill_with_smaller_pair_leaves_no_stale_values() {
        let mut h = HermiteExpansion::new(3, 3);
        let c = [0.0; 3];
        h.fill(3, 3, &[0.2, 0.1, 0.0], &[0.5, 0.5, 0.5], &[-0.3, 0.0, 0.2], 1.0, 0.7);
        h.fill(1, 0, &c, &c, &c, 1.0, 1.0);
        let [ex, _, _] = h.coefficients([1, 0, 0], [0, 0, 0]);
        // Concentric Gaussians: x = X_PA·Λ_0 + 1/(2p)·Λ_1 with X_PA = 0.
        assert_eq!(ex.len(), 2);
        assert!(ex[0].abs() < 1e-15);
        assert!((ex[1] - 0.25).abs() < 1e-15);
    }
}
