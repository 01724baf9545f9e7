//! Multipole potential integrals over libcint's `atm`/`bas`/`env` layout.
//!
//! The kernel parameters come from the global `env` slots libcint uses for
//! `rinv`-type operators:
//!   PTR_RINV_ORIG: probe origin of the bare kernel
//!   PTR_RANGE_OMEGA: ω of the range-separated and regularized kernels
//! libcint marks short-range erfc(|ω| r)/r with a negative ω, so the
//! regularized kernel takes η = ω² and accepts either sign. The long-range
//! kernel requires ω ≥ 0. Both take their charge field from the nuclear
//! charges in `atm`.
//!
//! Shells are evaluated in Cartesian form with libcint's s/p normalization
//! factors, one contraction column at a time. Output is column-major
//! `[ni × nj × nchunk]` with `ni = nfi·nctr_i`, `nj = nfj·nctr_j` unless
//! `dims` overrides the leading dimensions.

use std::sync::Arc;

use log::trace;

use super::{MultipolePotentialInt, OneBodyAoInt};
use crate::basis::{Atom, BasisSet, Molecule, Primitive, Shell};
use crate::error::{MultipoleError, Result};
use crate::recur::CoulombKernel;
use crate::types::{env_extent, ncart, AtmSlot, BasSlot, Env};

/// Which `env`-parameterised kernel to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvKernel {
    Rinv,
    ShortRange,
    RangeOmega,
}

impl EnvKernel {
    fn kernel(self, env: &Env) -> CoulombKernel {
        match self {
            EnvKernel::Rinv => CoulombKernel::Coulomb,
            EnvKernel::ShortRange => {
                let omega = env.range_omega();
                CoulombKernel::Regularized { eta: omega * omega }
            }
            EnvKernel::RangeOmega => CoulombKernel::RangeSeparated { omega: env.range_omega() },
        }
    }
}

/// Angular factor libcint folds into s and p functions.
fn common_fac_sp(l: usize) -> f64 {
    match l {
        0 => 0.282094791773878143,  // 1/sqrt(4π)
        1 => 0.488602511902919921,  // sqrt(3/(4π))
        _ => 1.0,
    }
}

/// One Cartesian `Shell` per contraction column of `bas` row `ish`.
unsafe fn shell_columns(atm: *const i32, bas: *const i32, ish: usize, env: &Env) -> Vec<Shell> {
    let b = BasSlot::from_raw(bas, ish);
    let l = b.ang_of();
    let nprim = b.nprim_of();
    let nctr = b.nctr_of();
    let center = env.coords(AtmSlot::from_raw(atm, b.atom_of()).ptr_coord());
    let exps = env.exps(b.ptr_exp(), nprim);
    let coeffs = env.coeffs(b.ptr_coeff(), nprim, nctr);
    let fac = common_fac_sp(l);

    (0..nctr)
        .map(|ic| {
            let prims = exps
                .iter()
                .enumerate()
                .map(|(ip, &e)| Primitive::new(e, coeffs[ip + ic * nprim] * fac))
                .collect();
            Shell::new(l, center, prims, false)
        })
        .collect()
}

/// Evaluates the shell pair `(shls[0], shls[1])` into `out`.
///
/// Returns 1 when any element is non-zero, 0 otherwise.
///
/// # Safety
/// Pointers must satisfy the libcint calling convention: `shls` holds two
/// indices, `atm`/`bas` hold `natm`/`nbas` rows, `env` covers every offset
/// they reference, and `out` is large enough for the result. `dims`, when
/// given, must be at least `[nfi·nctr_i, nfj·nctr_j]`.
#[allow(clippy::too_many_arguments)]
pub unsafe fn int1e_mpot_cart(
    out:   *mut f64,
    dims:  *const i32,
    shls:  *const i32,
    atm:   *const i32,
    natm:  i32,
    bas:   *const i32,
    nbas:  i32,
    env:   *const f64,
    order: usize,
    which: EnvKernel,
) -> Result<i32> {
    let natm = natm.max(0) as usize;
    let nbas = nbas.max(0) as usize;
    let shls = std::slice::from_raw_parts(shls, 2);
    for &s in shls {
        if s < 0 || s as usize >= nbas {
            return Err(MultipoleError::CapacityExceeded {
                what: "libcint shell index",
                requested: s.max(0) as usize,
                capacity: nbas,
            });
        }
    }
    let (i_sh, j_sh) = (shls[0] as usize, shls[1] as usize);
    let ev = Env::from_raw(env, env_extent(atm, natm, bas, nbas));

    let atoms: Vec<Atom> = (0..natm)
        .map(|ia| {
            let a = AtmSlot::from_raw(atm, ia);
            Atom { z: a.charge() as f64, position: ev.coords(a.ptr_coord()) }
        })
        .collect();
    let shells_i = shell_columns(atm, bas, i_sh, &ev);
    let shells_j = shell_columns(atm, bas, j_sh, &ev);
    let nfi = ncart(BasSlot::from_raw(bas, i_sh).ang_of());
    let nfj = ncart(BasSlot::from_raw(bas, j_sh).ang_of());

    let bs1 = Arc::new(BasisSet::new(Molecule::new(atoms), shells_i.clone()));
    let bs2 = Arc::new(BasisSet::new(Molecule::default(), shells_j.clone()));
    let mut engine = MultipolePotentialInt::with_kernel(bs1, bs2, order, 0, which.kernel(&ev))?;
    if which == EnvKernel::Rinv {
        engine.set_origin(ev.rinv_origin());
    }
    trace!("int1e_mpot_cart: shells ({}, {}), {:?}, order {}", i_sh, j_sh, which, order);

    let (ni, nj) = (nfi * shells_i.len(), nfj * shells_j.len());
    let (out_ni, out_nj) = if dims.is_null() {
        (ni, nj)
    } else {
        let d = std::slice::from_raw_parts(dims, 2);
        for (what, dim, need) in [("libcint dims[0]", d[0], ni), ("libcint dims[1]", d[1], nj)] {
            if dim < 0 || (dim as usize) < need {
                return Err(MultipoleError::CapacityExceeded {
                    what,
                    requested: need,
                    capacity: dim.max(0) as usize,
                });
            }
        }
        (d[0] as usize, d[1] as usize)
    };
    let nchunk = engine.nchunk();
    let out_sl = std::slice::from_raw_parts_mut(out, out_ni * out_nj * nchunk);
    out_sl.iter_mut().for_each(|v| *v = 0.0);

    let mut has_value = false;
    for (ic, si) in shells_i.iter().enumerate() {
        for (jc, sj) in shells_j.iter().enumerate() {
            engine.compute_pair(si, sj)?;
            for k in 0..nchunk {
                let chunk = engine.chunk(k);
                for a in 0..nfi {
                    for b in 0..nfj {
                        let v = chunk[a * nfj + b];
                        has_value |= v != 0.0;
                        out_sl[(ic * nfi + a) + out_ni * ((jc * nfj + b) + out_nj * k)] = v;
                    }
                }
            }
        }
    }
    Ok(if has_value { 1 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ATM_SLOTS, BAS_SLOTS, PTR_ENV_START, PTR_RANGE_OMEGA, PTR_RINV_ORIG};

    #[test]
    fn general_contraction_columns_match_separate_shells() {
        // One atom, one p shell with two primitives and two contraction columns.
        let mut env = vec![0.0; PTR_ENV_START];
        env[PTR_RINV_ORIG..PTR_RINV_ORIG + 3].copy_from_slice(&[0.3, -0.2, 0.9]);
        let ptr_coord = env.len();
        env.extend_from_slice(&[0.0, 0.0, 0.0]);
        let ptr_exp = env.len();
        env.extend_from_slice(&[1.3, 0.4]);
        let ptr_coeff = env.len();
        env.extend_from_slice(&[0.7, 0.2, -0.1, 0.9]);

        let mut atm = [0i32; ATM_SLOTS];
        atm[0] = 1;
        atm[1] = ptr_coord as i32;
        let mut bas = [0i32; BAS_SLOTS];
        bas[1] = 1;
        bas[2] = 2;
        bas[3] = 2;
        bas[5] = ptr_exp as i32;
        bas[6] = ptr_coeff as i32;

        let mut out = vec![0.0; 6 * 6];
        let shls = [0i32, 0];
        let ret = unsafe {
            int1e_mpot_cart(
                out.as_mut_ptr(), std::ptr::null(), shls.as_ptr(),
                atm.as_ptr(), 1, bas.as_ptr(), 1, env.as_ptr(), 0, EnvKernel::Rinv,
            )
        }
        .unwrap();
        assert_eq!(ret, 1);

        let fac = common_fac_sp(1);
        let col = |c0: f64, c1: f64| {
            Shell::new(1, [0.0; 3], vec![Primitive::new(1.3, c0 * fac), Primitive::new(0.4, c1 * fac)], false)
        };
        let shells = vec![col(0.7, 0.2), col(-0.1, 0.9)];
        let bs = Arc::new(BasisSet::new(Molecule::default(), shells));
        let mut mp = MultipolePotentialInt::new(bs.clone(), bs, 0, 0).unwrap();
        mp.set_origin([0.3, -0.2, 0.9]);
        let v = mp.compute().unwrap().remove(0);
        for i in 0..6 {
            for j in 0..6 {
                assert!((out[i + 6 * j] - v[[i, j]]).abs() < 1e-14, "({}, {})", i, j);
            }
        }
    }

    #[test]
    fn shell_index_is_checked() {
        let env = vec![0.0; PTR_ENV_START];
        let atm = [0i32; ATM_SLOTS];
        let bas = [0i32; BAS_SLOTS];
        let shls = [0i32, 1];
        let mut out = [0.0; 1];
        let err = unsafe {
            int1e_mpot_cart(
                out.as_mut_ptr(), std::ptr::null(), shls.as_ptr(),
                atm.as_ptr(), 1, bas.as_ptr(), 1, env.as_ptr(), 0, EnvKernel::Rinv,
            )
        }
        .unwrap_err();
        assert!(matches!(err, MultipoleError::CapacityExceeded { requested: 1, capacity: 1, .. }));
    }

    #[test]
    fn undersized_or_negative_dims_are_rejected() {
        // One s shell: the block is 1 × 1, so dims must be at least [1, 1].
        let mut env = vec![0.0; PTR_ENV_START];
        let ptr_coord = env.len();
        env.extend_from_slice(&[0.0, 0.0, 0.0]);
        let ptr_exp = env.len();
        env.push(0.8);
        let ptr_coeff = env.len();
        env.push(1.0);

        let mut atm = [0i32; ATM_SLOTS];
        atm[0] = 1;
        atm[1] = ptr_coord as i32;
        let mut bas = [0i32; BAS_SLOTS];
        bas[2] = 1;
        bas[3] = 1;
        bas[5] = ptr_exp as i32;
        bas[6] = ptr_coeff as i32;
        let shls = [0i32, 0];

        let run = |dims: [i32; 2], out: &mut [f64]| unsafe {
            int1e_mpot_cart(
                out.as_mut_ptr(), dims.as_ptr(), shls.as_ptr(),
                atm.as_ptr(), 1, bas.as_ptr(), 1, env.as_ptr(), 0, EnvKernel::Rinv,
            )
        };
        let mut out = [0.0; 4];
        assert!(matches!(
            run([-1, 1], &mut out),
            Err(MultipoleError::CapacityExceeded { what: "libcint dims[0]", requested: 1, capacity: 0 })
        ));
        assert!(matches!(
            run([1, 0], &mut out),
            Err(MultipoleError::CapacityExceeded { what: "libcint dims[1]", requested: 1, capacity: 0 })
        ));
        // Padded leading dimensions are allowed; the block lands at the top left.
        assert_eq!(run([2, 2], &mut out).unwrap(), 1);
        assert!(out[0] > 0.0);
        assert_eq!(&out[1..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn short_range_kernel_reads_omega_of_either_sign() {
        let mut env = vec![0.0; PTR_ENV_START];
        env[PTR_RANGE_OMEGA] = -0.7;
        let ev = unsafe { Env::from_raw(env.as_ptr(), env.len()) };
        let eta = match EnvKernel::ShortRange.kernel(&ev) {
            CoulombKernel::Regularized { eta } => eta,
            other => panic!("unexpected kernel {:?}", other),
        };
        assert!((eta - 0.49).abs() < 1e-15);
        assert_eq!(
            EnvKernel::RangeOmega.kernel(&ev),
            CoulombKernel::RangeSeparated { omega: -0.7 }
        );
    }
}
