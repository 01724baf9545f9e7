//! Shells, basis sets and the point-charge description of a molecule.
//!
//! These are plain immutable inputs to the integral objects. Coordinates are
//! in bohr.

use std::f64::consts::PI;

use crate::types::{ncart, nsph};

/// One Gaussian primitive: `coefficient * exp(-exponent * r²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    pub exponent: f64,
    pub coefficient: f64,
}

impl Primitive {
    pub fn new(exponent: f64, coefficient: f64) -> Self {
        Primitive { exponent, coefficient }
    }
}

/// A contracted shell of Cartesian Gaussians sharing a center and angular momentum.
#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    l: usize,
    center: [f64; 3],
    primitives: Vec<Primitive>,
    pure: bool,
}

impl Shell {
    /// Shell with contraction coefficients taken exactly as given.
    pub fn new(l: usize, center: [f64; 3], primitives: Vec<Primitive>, pure: bool) -> Self {
        Shell { l, center, primitives, pure }
    }

    /// Shell whose coefficients are rescaled so that the axis-aligned
    /// component (e.g. x^l) of the contracted function has unit norm.
    pub fn normalized(l: usize, center: [f64; 3], primitives: Vec<Primitive>, pure: bool) -> Self {
        let sqrt_pi_cubed = PI * PI.sqrt();
        let dfact = double_factorial_minus_one(2 * l);
        let two_l = (1u64 << l) as f64;

        let mut prims: Vec<Primitive> = primitives
            .into_iter()
            .map(|p| {
                let two_alpha = 2.0 * p.exponent;
                let two_alpha_to_l32 = two_alpha.powi(l as i32 + 1) * two_alpha.sqrt();
                let norm = (two_l * two_alpha_to_l32 / (sqrt_pi_cubed * dfact)).sqrt();
                Primitive::new(p.exponent, p.coefficient * norm)
            })
            .collect();

        let mut norm = 0.0;
        for pa in &prims {
            for pb in &prims {
                let gamma = pa.exponent + pb.exponent;
                norm += dfact * sqrt_pi_cubed * pa.coefficient * pb.coefficient
                    / two_l
                    / gamma.powf(l as f64 + 1.5);
            }
        }
        let scale = 1.0 / norm.sqrt();
        for p in prims.iter_mut() {
            p.coefficient *= scale;
        }
        Shell { l, center, primitives: prims, pure }
    }

    #[inline] pub fn am(&self) -> usize { self.l }
    #[inline] pub fn center(&self) -> [f64; 3] { self.center }
    #[inline] pub fn primitives(&self) -> &[Primitive] { &self.primitives }
    #[inline] pub fn nprimitive(&self) -> usize { self.primitives.len() }
    #[inline] pub fn is_pure(&self) -> bool { self.pure }
    #[inline] pub fn ncartesian(&self) -> usize { ncart(self.l) }

    /// Number of basis functions: 2l+1 for pure shells, (l+1)(l+2)/2 otherwise.
    #[inline]
    pub fn nfunction(&self) -> usize {
        if self.pure { nsph(self.l) } else { ncart(self.l) }
    }

    /// Copy of this shell with every contraction coefficient multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        let primitives = self
            .primitives
            .iter()
            .map(|p| Primitive::new(p.exponent, p.coefficient * factor))
            .collect();
        Shell { primitives, ..self.clone() }
    }
}

/// (k-1)!! with the convention (-1)!! = 0!! = 1.
fn double_factorial_minus_one(k: usize) -> f64 {
    let mut r = 1.0;
    let mut i = k as i64 - 1;
    while i > 1 {
        r *= i as f64;
        i -= 2;
    }
    r
}

/// A nucleus: charge Z and position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    pub z: f64,
    pub position: [f64; 3],
}

/// A point charge of an external field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointCharge {
    pub charge: f64,
    pub position: [f64; 3],
}

impl PointCharge {
    pub fn new(charge: f64, position: [f64; 3]) -> Self {
        PointCharge { charge, position }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Molecule { atoms }
    }

    pub fn atoms(&self) -> &[Atom] { &self.atoms }
    pub fn natom(&self) -> usize { self.atoms.len() }

    /// Nuclear charges as a point-charge field, in atom order.
    pub fn nuclear_charge_field(&self) -> Vec<PointCharge> {
        self.atoms
            .iter()
            .map(|a| PointCharge::new(a.z, a.position))
            .collect()
    }
}

/// An ordered list of shells on a molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisSet {
    molecule: Molecule,
    shells: Vec<Shell>,
    /// First basis function of each shell.
    offsets: Vec<usize>,
    nbf: usize,
}

impl BasisSet {
    pub fn new(molecule: Molecule, shells: Vec<Shell>) -> Self {
        let mut offsets = Vec::with_capacity(shells.len());
        let mut nbf = 0;
        for sh in &shells {
            offsets.push(nbf);
            nbf += sh.nfunction();
        }
        BasisSet { molecule, shells, offsets, nbf }
    }

    pub fn molecule(&self) -> &Molecule { &self.molecule }
    pub fn shells(&self) -> &[Shell] { &self.shells }
    pub fn nshell(&self) -> usize { self.shells.len() }
    pub fn nbf(&self) -> usize { self.nbf }

    pub fn shell(&self, i: usize) -> Option<&Shell> { self.shells.get(i) }

    pub fn shell_to_basis_function(&self, i: usize) -> usize { self.offsets[i] }

    pub fn max_am(&self) -> usize {
        self.shells.iter().map(Shell::am).max().unwrap_or(0)
    }

    pub fn max_nprimitive(&self) -> usize {
        self.shells.iter().map(Shell::nprimitive).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_s_shell_has_unit_self_overlap() {
        let sh = Shell::normalized(
            0,
            [0.0; 3],
            vec![
                Primitive::new(3.42525091, 0.15432897),
                Primitive::new(0.62391373, 0.53532814),
                Primitive::new(0.16885540, 0.44463454),
            ],
            false,
        );
        let mut s = 0.0;
        for pa in sh.primitives() {
            for pb in sh.primitives() {
                s += pa.coefficient * pb.coefficient
                    * (PI / (pa.exponent + pb.exponent)).powf(1.5);
            }
        }
        assert!((s - 1.0).abs() < 1e-12, "overlap = {}", s);
    }

    #[test]
    fn basis_function_offsets() {
        let mol = Molecule::new(vec![Atom { z: 8.0, position: [0.0; 3] }]);
        let p = vec![Primitive::new(1.0, 1.0)];
        let bs = BasisSet::new(
            mol,
            vec![
                Shell::new(0, [0.0; 3], p.clone(), true),
                Shell::new(1, [0.0; 3], p.clone(), true),
                Shell::new(2, [0.0; 3], p.clone(), true),
                Shell::new(2, [0.0; 3], p, false),
            ],
        );
        assert_eq!(bs.nbf(), 1 + 3 + 5 + 6);
        assert_eq!(bs.shell_to_basis_function(3), 9);
        assert_eq!(bs.max_am(), 2);
    }
}
