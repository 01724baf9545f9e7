//! mdpot: McMurchie–Davidson multipole potential integrals.
//!
//! For a pair of Gaussian shells the crate evaluates the potential of a probe
//! point (or of a field of point charges) and its Cartesian derivatives up to
//! a chosen order, with the bare 1/r kernel, the short-range regularized
//! kernel erfc(√η r)/r, or the long-range kernel erf(ω r)/r.
//!
//! ```no_run
//! use std::sync::Arc;
//! use mdpot::{Atom, BasisSet, Molecule, MultipolePotentialInt, OneBodyAoInt, Primitive, Shell};
//!
//! let h = |z: f64| Shell::normalized(0, [0.0, 0.0, z], vec![Primitive::new(1.24, 1.0)], true);
//! let mol = Molecule::new(vec![
//!     Atom { z: 1.0, position: [0.0, 0.0, 0.0] },
//!     Atom { z: 1.0, position: [0.0, 0.0, 1.4] },
//! ]);
//! let bs = Arc::new(BasisSet::new(mol, vec![h(0.0), h(1.4)]));
//! let mut mp = MultipolePotentialInt::new(bs.clone(), bs, 1, 0)?;
//! mp.set_origin([0.0, 0.0, 0.7]);
//! let chunks = mp.compute()?;   // potential, then d/dx, d/dy, d/dz
//! # Ok::<(), mdpot::MultipoleError>(())
//! ```
//!
//! # ABI
//! The C entry points follow the libcint signature with the multipole order
//! inserted before `opt`:
//! ```c
//! int int1e_mpot{,_reg,_erf}_cart(double *out, int *dims, int *shls,
//!     int *atm, int natm, int *bas, int nbas, double *env,
//!     int order, CINTOpt *opt, double *cache);
//! ```
//! The bare kernel's probe origin is `env[PTR_RINV_ORIG..+3]`. The `_erf`
//! entry reads ω from `env[PTR_RANGE_OMEGA]` (ω ≥ 0). The `_reg` entry
//! evaluates erfc(√η r)/r with η = ω² from the same slot, where libcint's
//! short-range convention stores a negative ω. `dims` may be NULL or at
//! least `[nfi·nctr_i, nfj·nctr_j]`. `opt` and `cache` are ignored (pass
//! NULL from Python). A negative return value signals an error, which is
//! logged.

#![allow(clippy::missing_safety_doc)]

pub mod basis;
pub mod boys;
pub mod config;
pub mod error;
pub mod int1e;
pub mod recur;
pub mod transform;
pub mod types;

pub use basis::{Atom, BasisSet, Molecule, PointCharge, Primitive, Shell};
pub use config::MultipoleConfig;
pub use error::{MultipoleError, Result};
pub use int1e::{MdHelper, MultipolePotentialInt, OneBodyAoInt, PotentialSource};
pub use recur::CoulombKernel;

use int1e::libcint::EnvKernel;

// ─────────────────────────────────────────────────────────────────
// C-ABI exports
// ─────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
unsafe fn cint_entry(
    name:  &str,
    out:   *mut f64,
    dims:  *const i32,
    shls:  *const i32,
    atm:   *const i32,
    natm:  i32,
    bas:   *const i32,
    nbas:  i32,
    env:   *const f64,
    order: i32,
    which: EnvKernel,
) -> i32 {
    if order < 0 {
        log::error!("{}: negative multipole order {}", name, order);
        return -1;
    }
    match int1e::libcint::int1e_mpot_cart(
        out, dims, shls, atm, natm, bas, nbas, env, order as usize, which,
    ) {
        Ok(has_value) => has_value,
        Err(e) => {
            log::error!("{}: {}", name, e);
            -1
        }
    }
}

/// Multipole potential of the bare kernel at `env[PTR_RINV_ORIG..+3]`.
#[no_mangle]
pub unsafe extern "C" fn int1e_mpot_cart(
    out:   *mut f64,
    dims:  *const i32,
    shls:  *const i32,
    atm:   *const i32,
    natm:  i32,
    bas:   *const i32,
    nbas:  i32,
    env:   *const f64,
    order: i32,
    _opt:  *const std::ffi::c_void,
    _cache: *mut f64,
) -> i32 {
    cint_entry("int1e_mpot_cart", out, dims, shls, atm, natm, bas, nbas, env, order, EnvKernel::Rinv)
}

/// Regularized potential of the nuclei, η = ω² from `env[PTR_RANGE_OMEGA]`
/// (libcint's short-range convention stores ω < 0; either sign is accepted).
#[no_mangle]
pub unsafe extern "C" fn int1e_mpot_reg_cart(
    out:   *mut f64,
    dims:  *const i32,
    shls:  *const i32,
    atm:   *const i32,
    natm:  i32,
    bas:   *const i32,
    nbas:  i32,
    env:   *const f64,
    order: i32,
    _opt:  *const std::ffi::c_void,
    _cache: *mut f64,
) -> i32 {
    cint_entry("int1e_mpot_reg_cart", out, dims, shls, atm, natm, bas, nbas, env, order, EnvKernel::ShortRange)
}

/// Long-range potential of the nuclei, ω from `env[PTR_RANGE_OMEGA]`.
#[no_mangle]
pub unsafe extern "C" fn int1e_mpot_erf_cart(
    out:   *mut f64,
    dims:  *const i32,
    shls:  *const i32,
    atm:   *const i32,
    natm:  i32,
    bas:   *const i32,
    nbas:  i32,
    env:   *const f64,
    order: i32,
    _opt:  *const std::ffi::c_void,
    _cache: *mut f64,
) -> i32 {
    cint_entry("int1e_mpot_erf_cart", out, dims, shls, atm, natm, bas, nbas, env, order, EnvKernel::RangeOmega)
}

/// Optimizer stub (libcint compat: sets opt to NULL).
#[no_mangle]
pub unsafe extern "C" fn int1e_mpot_optimizer(
    opt: *mut *mut std::ffi::c_void,
    _atm: *const i32, _natm: i32,
    _bas: *const i32, _nbas: i32,
    _env: *const f64,
) {
    if !opt.is_null() { *opt = std::ptr::null_mut(); }
}
