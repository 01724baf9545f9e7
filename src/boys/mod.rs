//! Boys function.
//!
//! F_m(t) = ∫₀¹ s^{2m} e^{-t·s²} ds
//!
//! Every Hermite-Coulomb integral is seeded from F_0..F_N at one argument, so
//! all orders are produced together from a single series or erf evaluation.

pub const SQRTPIE4: f64 = 0.8862269254527580;

/// Largest argument for which the series is used at each order; above it the
/// erf-seeded upward recursion is accurate enough.
const TURNOVER: [f64; 40] = [
    0., 0., 0.866, 1.295, 1.705, 2.106, 2.501, 2.892, 3.280, 3.666,
    4.050, 4.433, 4.814, 5.194, 5.573, 5.951, 6.328, 6.704, 7.079, 7.454,
    7.827, 8.200, 8.572, 8.944, 9.315, 9.685,10.054,10.423,10.791,11.159,
   11.526,11.893,12.259,12.624,12.989,13.354,13.718,14.082,14.445,14.808,
];

/// Fills f[0..=mmax] with F_0(t)..F_mmax(t).
///
/// Below the turnover point, and whenever t < mmax + ½ (where the upward
/// recursion would amplify the rounding error of F_0), F_mmax comes from its
/// power series and the lower orders from the downward recursion
///   F_{m-1}(t) = (2t·F_m(t) + e^{-t}) / (2m-1).
/// Otherwise F_0 is taken from erf and the orders are built upwards.
pub fn boys_fn(f: &mut [f64], t: f64, mmax: usize) {
    const EPS: f64 = 1e-15;
    debug_assert!(f.len() > mmax);
    if t < 1e-15 {
        let mut b = 1.0_f64;
        for fm in f.iter_mut().take(mmax + 1) { *fm = 1.0 / b; b += 2.0; }
        return;
    }
    let tp = if mmax < TURNOVER.len() { TURNOVER[mmax] } else { 4.0 + mmax as f64 * 0.378 };
    if t <= tp || t < mmax as f64 + 0.5 {
        let e = 0.5 * (-t).exp();
        let mut b = mmax as f64 + 0.5;
        let mut x = e; let mut sum = e;
        loop { b += 1.0; x *= t / b; sum += x; if x <= EPS * e { break; } }
        f[mmax] = sum / (mmax as f64 + 0.5);
        let mut bi = mmax as f64 + 0.5;
        for i in (0..mmax).rev() { bi -= 1.0; f[i] = (e + t * f[i + 1]) / bi; }
    } else {
        let sr = t.sqrt();
        f[0] = SQRTPIE4 / sr * libm::erf(sr);
        let e = (-t).exp();
        let b = 0.5 / t;
        for i in 1..=mmax { f[i] = b * ((2 * i - 1) as f64 * f[i - 1] - e); }
    }
}
