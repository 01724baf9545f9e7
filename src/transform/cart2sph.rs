//! Cartesian to real solid harmonic (RSH) transformation.
//!
//! Cartesian components are in CCA order (see `types::cart_comp`) and are
//! assumed to share the normalization of the axis-aligned component x^l.
//! Spherical components are ordered m = -l..l.
//!
//! s and p shells are left in Cartesian order (x, y, z), as in libcint and
//! PySCF: for l ≤ 1 the real solid harmonics are the Cartesians themselves,
//! so the transform is the identity.
//!
//! The coefficients follow Schlegel & Frisch, IJQC 54, 83 (1995), written
//! for axis-normalized Cartesians; for l = 2 they reduce to
//!   d_{-2} = √3·xy, d_{-1} = √3·yz, d_0 = zz − (xx + yy)/2,
//!   d_{1}  = √3·xz, d_{2}  = √3/2·(xx − yy).

use crate::types::{cart_comp, ncart, nsph};

/// Dense cart → sph matrix for one angular momentum.
#[derive(Debug, Clone, PartialEq)]
pub struct SphericalTransform {
    l: usize,
    /// Row-major `[nsph × ncart]`: mat[c + s*ncart].
    mat: Vec<f64>,
}

impl SphericalTransform {
    pub fn new(l: usize) -> Self {
        SphericalTransform { l, mat: c2s_matrix(l) }
    }

    /// Transforms for l = 0..=max_l.
    pub fn table(max_l: usize) -> Vec<SphericalTransform> {
        (0..=max_l).map(SphericalTransform::new).collect()
    }

    #[inline] pub fn l(&self) -> usize { self.l }
    #[inline] pub fn ncart(&self) -> usize { ncart(self.l) }
    #[inline] pub fn nsph(&self) -> usize { nsph(self.l) }

    #[inline]
    pub fn coefficient(&self, s: usize, c: usize) -> f64 {
        self.mat[c + s * self.ncart()]
    }
}

/// Return the transformation matrix `cart → sph` for angular momentum `l`.
/// Shape: `[nfc × nfs]` where `nfc = (l+1)(l+2)/2` and `nfs = 2l+1`.
/// Storage: mat[c + s*nfc]
pub fn c2s_matrix(l: usize) -> Vec<f64> {
    let nfc = ncart(l);
    let nfs = nsph(l);
    let mut mat = vec![0.0; nfc * nfs];
    if l <= 1 {
        for c in 0..nfc {
            mat[c + c * nfc] = 1.0;
        }
        return mat;
    }
    let comps = cart_comp(l);
    for s in 0..nfs {
        let m = s as i32 - l as i32;
        for (c, &[lx, ly, lz]) in comps.iter().enumerate() {
            mat[c + s * nfc] = solid_harmonic_coefficient(
                l as i32, m, lx as i32, ly as i32, lz as i32,
            );
        }
    }
    mat
}

/// Coefficient of x^lx y^ly z^lz in the real solid harmonic (l, m).
///
/// Integer division truncates toward zero and parity(i) is −1 for odd i of
/// either sign; the selection rules below rely on both.
pub fn solid_harmonic_coefficient(l: i32, m: i32, lx: i32, ly: i32, lz: i32) -> f64 {
    let abs_m = m.abs();
    if (lx + ly - abs_m) % 2 != 0 {
        return 0.0;
    }
    let j = (lx + ly - abs_m) / 2;
    if j < 0 {
        return 0.0;
    }

    // Does the monomial contribute to the cosine (m ≥ 0) or sine (m < 0) part?
    let comp = if m >= 0 { 1 } else { -1 };
    let i = abs_m - lx;
    if comp != parity(i) {
        return 0.0;
    }

    let mut pfac = ((fact(2 * lx) * fact(2 * ly) * fact(2 * lz) / fact(2 * l))
        * (fact(l - abs_m) / fact(l))
        * (1.0 / fact(l + abs_m))
        * (1.0 / (fact(lx) * fact(ly) * fact(lz))))
        .sqrt();
    pfac /= (1u64 << l) as f64;
    if m < 0 {
        pfac *= parity((i - 1) / 2) as f64;
    } else {
        pfac *= parity(i / 2) as f64;
    }

    let i_min = j;
    let i_max = (l - abs_m) / 2;
    let mut sum = 0.0;
    for ii in i_min..=i_max {
        let pfac1 = binom(l, ii) * binom(ii, j) * parity(ii) as f64 * fact(2 * (l - ii))
            / fact(l - abs_m - 2 * ii);
        let mut sum1 = 0.0;
        let k_min = ((lx - abs_m) / 2).max(0);
        let k_max = j.min(lx / 2);
        for k in k_min..=k_max {
            if lx - 2 * k <= abs_m {
                sum1 += binom(j, k) * binom(abs_m, lx - 2 * k) * parity(k) as f64;
            }
        }
        sum += pfac1 * sum1;
    }
    sum *= (dfact_minus_one(2 * l)
        / (dfact_minus_one(2 * lx) * dfact_minus_one(2 * ly) * dfact_minus_one(2 * lz)))
        .sqrt();

    if m == 0 {
        pfac * sum
    } else {
        std::f64::consts::SQRT_2 * pfac * sum
    }
}

#[inline]
fn parity(i: i32) -> i32 {
    if i % 2 != 0 { -1 } else { 1 }
}

fn fact(n: i32) -> f64 {
    (2..=n).fold(1.0, |acc, k| acc * k as f64)
}

fn binom(n: i32, k: i32) -> f64 {
    if k < 0 || k > n {
        return 0.0;
    }
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// (k-1)!!
fn dfact_minus_one(k: i32) -> f64 {
    let mut r = 1.0;
    let mut i = k - 1;
    while i > 1 {
        r *= i as f64;
        i -= 2;
    }
    r
}

/// Transform one `[nc1 × nc2]` row-major Cartesian block into `out`.
///
/// `t1`/`t2` are `None` for shells kept Cartesian. `out` receives the
/// `[n1 × n2]` row-major result; `tmp` is resized as needed.
pub fn cart2sph_pair(
    out: &mut [f64],
    gcart: &[f64],
    t1: Option<&SphericalTransform>,
    t2: Option<&SphericalTransform>,
    nc1: usize,
    nc2: usize,
    tmp: &mut Vec<f64>,
) {
    let n1 = t1.map_or(nc1, SphericalTransform::nsph);
    let n2 = t2.map_or(nc2, SphericalTransform::nsph);

    // Bra: tmp[s1, c2] = Σ_c1 T1[s1, c1] gcart[c1, c2]
    tmp.clear();
    match t1 {
        None => tmp.extend_from_slice(&gcart[..nc1 * nc2]),
        Some(t) => {
            tmp.resize(n1 * nc2, 0.0);
            for s in 0..n1 {
                let row = &mut tmp[s * nc2..(s + 1) * nc2];
                for c in 0..nc1 {
                    let coef = t.coefficient(s, c);
                    if coef == 0.0 {
                        continue;
                    }
                    for (r, g) in row.iter_mut().zip(&gcart[c * nc2..(c + 1) * nc2]) {
                        *r += coef * g;
                    }
                }
            }
        }
    }

    // Ket: out[s1, s2] = Σ_c2 T2[s2, c2] tmp[s1, c2]
    match t2 {
        None => out[..n1 * n2].copy_from_slice(&tmp[..n1 * n2]),
        Some(t) => {
            for i in 0..n1 {
                let src = &tmp[i * nc2..(i + 1) * nc2];
                for s in 0..n2 {
                    let mut v = 0.0;
                    for (c, g) in src.iter().enumerate() {
                        v += t.coefficient(s, c) * g;
                    }
                    out[i * n2 + s] = v;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn d_shell_matches_closed_form() {
        let s3 = 3f64.sqrt();
        let s3h = s3 / 2.0;
        // Cartesian: 0=xx, 1=xy, 2=xz, 3=yy, 4=yz, 5=zz
        // Spherical: 0=d_{-2}, 1=d_{-1}, 2=d_0, 3=d_1, 4=d_2
        let expected = [
            [0.0, s3, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, s3, 0.0],
            [-0.5, 0.0, 0.0, -0.5, 0.0, 1.0],
            [0.0, 0.0, s3, 0.0, 0.0, 0.0],
            [s3h, 0.0, 0.0, -s3h, 0.0, 0.0],
        ];
        let t = SphericalTransform::new(2);
        for (s, row) in expected.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                assert!((t.coefficient(s, c) - v).abs() < 1e-14, "s={} c={}", s, c);
            }
        }
    }

    #[test]
    fn f_and_g_shell_spot_checks() {
        let f = SphericalTransform::new(3);
        // f_0 = zzz − 3/2 (xxz + yyz)
        assert!((f.coefficient(3, 9) - 1.0).abs() < 1e-14);
        assert!((f.coefficient(3, 2) + 1.5).abs() < 1e-14);
        assert!((f.coefficient(3, 7) + 1.5).abs() < 1e-14);
        // f_{-3}: xxy coefficient 3√(5/8), yyy coefficient −√(5/8)
        assert!((f.coefficient(0, 1) - 3.0 * (5.0f64 / 8.0).sqrt()).abs() < 1e-13);
        assert!((f.coefficient(0, 6) + (5.0f64 / 8.0).sqrt()).abs() < 1e-13);

        let g = SphericalTransform::new(4);
        // g_0 = 3/8 (xxxx + yyyy) + 3/4 xxyy − 3 (xxzz + yyzz) + zzzz
        for (c, v) in [(0, 0.375), (3, 0.75), (5, -3.0), (10, 0.375), (12, -3.0), (14, 1.0)] {
            assert!((g.coefficient(4, c) - v).abs() < 1e-13, "c={}", c);
        }
    }

    #[test]
    fn p_shell_stays_cartesian() {
        let t = SphericalTransform::new(1);
        for s in 0..3 {
            for c in 0..3 {
                assert_eq!(t.coefficient(s, c), if s == c { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn pair_transform_applies_both_sides() {
        let t2 = SphericalTransform::new(2);
        // s × d block: one row of six Cartesians.
        let gcart = [1.0, 0.0, 0.0, 1.0, 0.0, 1.0];
        let mut out = [0.0; 5];
        let mut tmp = Vec::new();
        cart2sph_pair(&mut out, &gcart, None, Some(&t2), 1, 6, &mut tmp);
        // xx + yy + zz is spherically symmetric: no d component survives.
        for v in out {
            assert!(v.abs() < 1e-14);
        }

        let mut back = [0.0; 5];
        let column: Vec<f64> = gcart.to_vec();
        cart2sph_pair(&mut back, &column, Some(&t2), None, 6, 1, &mut tmp);
        assert_eq!(out, back);
    }
}
