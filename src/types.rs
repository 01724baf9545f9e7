//! Cartesian component bookkeeping and libcint's atm/bas/env data layout.
//!
//! libcint uses three flat integer/float arrays to describe the molecular system:
//!   atm[natm][ATM_SLOTS] : atom data
//!   bas[nbas][BAS_SLOTS] : basis function data
//!   env[]              : floating-point storage for coordinates/exponents/coefficients
//!
//! Only the slots read by the C-ABI entry points are kept here.

// ─── env global offsets (cint.h) ────────────────────────────────────────────
pub const PTR_RINV_ORIG:     usize = 4;  // 3 floats
pub const PTR_RINV_ZETA:     usize = 7;
pub const PTR_RANGE_OMEGA:   usize = 8;
pub const PTR_ENV_START:     usize = 20;

// ─── atm slot indices ────────────────────────────────────────────────────────
pub const CHARGE_OF:     usize = 0;
pub const PTR_COORD:     usize = 1;
pub const ATM_SLOTS:     usize = 6;

// ─── bas slot indices ────────────────────────────────────────────────────────
pub const ATOM_OF:       usize = 0;
pub const ANG_OF:        usize = 1;
pub const NPRIM_OF:      usize = 2;
pub const NCTR_OF:       usize = 3;
pub const PTR_EXP:       usize = 5;
pub const PTR_COEFF:     usize = 6;
pub const BAS_SLOTS:     usize = 8;

// ─── Safe views into the raw C arrays ────────────────────────────────────────

/// Read-only view of one atom row in the `atm` array.
#[derive(Debug, Clone, Copy)]
pub struct AtmSlot<'a> {
    data: &'a [i32],  // slice of ATM_SLOTS elements
}

impl<'a> AtmSlot<'a> {
    /// # Safety: `atm` must be valid for `(iatom + 1) * ATM_SLOTS` elements.
    #[inline]
    pub unsafe fn from_raw(atm: *const i32, iatom: usize) -> Self {
        let data = std::slice::from_raw_parts(atm.add(iatom * ATM_SLOTS), ATM_SLOTS);
        AtmSlot { data }
    }

    #[inline] pub fn charge(&self)    -> i32 { self.data[CHARGE_OF] }
    #[inline] pub fn ptr_coord(&self) -> usize { self.data[PTR_COORD] as usize }
}

/// Read-only view of one basis-shell row in the `bas` array.
#[derive(Debug, Clone, Copy)]
pub struct BasSlot<'a> {
    data: &'a [i32],
}

impl<'a> BasSlot<'a> {
    /// # Safety: `bas` must be valid for `(ibas + 1) * BAS_SLOTS` elements.
    #[inline]
    pub unsafe fn from_raw(bas: *const i32, ibas: usize) -> Self {
        let data = std::slice::from_raw_parts(bas.add(ibas * BAS_SLOTS), BAS_SLOTS);
        BasSlot { data }
    }

    #[inline] pub fn atom_of(&self)  -> usize { self.data[ATOM_OF]  as usize }
    #[inline] pub fn ang_of(&self)   -> usize { self.data[ANG_OF]   as usize }
    #[inline] pub fn nprim_of(&self) -> usize { self.data[NPRIM_OF] as usize }
    #[inline] pub fn nctr_of(&self)  -> usize { self.data[NCTR_OF]  as usize }
    #[inline] pub fn ptr_exp(&self)  -> usize { self.data[PTR_EXP]  as usize }
    #[inline] pub fn ptr_coeff(&self)-> usize { self.data[PTR_COEFF]as usize }
}

/// Safe wrapper around the flat `env` f64 array.
#[derive(Debug, Clone, Copy)]
pub struct Env<'a> {
    data: &'a [f64],
}

impl<'a> Env<'a> {
    /// # Safety:  caller must ensure `env` is valid for `len` elements.
    pub unsafe fn from_raw(env: *const f64, len: usize) -> Self {
        Env { data: std::slice::from_raw_parts(env, len) }
    }

    /// Three consecutive coordinates starting at `ptr`.
    pub fn coords(&self, ptr: usize) -> [f64; 3] {
        [self.data[ptr], self.data[ptr+1], self.data[ptr+2]]
    }

    /// Slice of primitive exponents for a shell.
    pub fn exps(&self, ptr: usize, nprim: usize) -> &[f64] {
        &self.data[ptr..ptr+nprim]
    }

    /// Slice of contraction coefficients for a shell (column-major: nprim × nctr).
    pub fn coeffs(&self, ptr: usize, nprim: usize, nctr: usize) -> &[f64] {
        &self.data[ptr..ptr+nprim*nctr]
    }

    pub fn rinv_origin(&self) -> [f64; 3] { self.coords(PTR_RINV_ORIG) }
    pub fn range_omega(&self) -> f64 { self.data[PTR_RANGE_OMEGA] }
}

/// Number of `env` elements addressed by the given `atm`/`bas` tables.
///
/// # Safety: `atm` and `bas` must be valid for `natm` and `nbas` rows.
pub unsafe fn env_extent(atm: *const i32, natm: usize, bas: *const i32, nbas: usize) -> usize {
    let mut len = PTR_ENV_START;
    for ia in 0..natm {
        let a = AtmSlot::from_raw(atm, ia);
        len = len.max(a.ptr_coord() + 3);
    }
    for ib in 0..nbas {
        let b = BasSlot::from_raw(bas, ib);
        len = len.max(b.ptr_exp() + b.nprim_of());
        len = len.max(b.ptr_coeff() + b.nprim_of() * b.nctr_of());
    }
    len
}

// ─── Cartesian components ────────────────────────────────────────────────────

/// Number of Cartesian GTOs for angular momentum l: (l+1)(l+2)/2
#[inline]
pub fn ncart(l: usize) -> usize { (l + 1) * (l + 2) / 2 }

/// Number of real solid harmonics for angular momentum l: 2l+1
#[inline]
pub fn nsph(l: usize) -> usize { 2 * l + 1 }

/// Total number of Cartesian components of orders 0..=order.
///
/// This is also the number of derivative chunks produced for a multipole
/// potential of maximum order `order`.
#[inline]
pub fn cumulative_cart_dim(order: usize) -> usize {
    (order + 1) * (order + 2) * (order + 3) / 6
}

/// (nx, ny, nz) tuples for all Cartesian components of angular momentum l
/// in CCA order: highest x first, then highest y within each x block.
pub fn cart_comp(l: usize) -> Vec<[usize; 3]> {
    let mut comps = Vec::with_capacity(ncart(l));
    for ix in (0..=l).rev() {
        for iy in (0..=(l - ix)).rev() {
            comps.push([ix, iy, l - ix - iy]);
        }
    }
    comps
}
