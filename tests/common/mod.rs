#![allow(dead_code)]

use std::sync::Arc;

use mdpot::types::cart_comp;
use mdpot::{Atom, BasisSet, Molecule, OneBodyAoInt, Primitive, Shell};

pub const H2_BOND: f64 = 1.4;

/// STO-3G hydrogen 1s at `center`, normalized.
pub fn sto3g_h(center: [f64; 3]) -> Shell {
    Shell::normalized(
        0,
        center,
        vec![
            Primitive::new(3.42525091, 0.15432897),
            Primitive::new(0.62391373, 0.53532814),
            Primitive::new(0.16885540, 0.44463454),
        ],
        true,
    )
}

/// H₂ along z, atoms at 0 and `H2_BOND`, STO-3G.
pub fn h2_sto3g() -> Arc<BasisSet> {
    let b = [0.0, 0.0, H2_BOND];
    let mol = Molecule::new(vec![
        Atom { z: 1.0, position: [0.0; 3] },
        Atom { z: 1.0, position: b },
    ]);
    Arc::new(BasisSet::new(mol, vec![sto3g_h([0.0; 3]), sto3g_h(b)]))
}

/// Uncontracted shell with a raw (unnormalized) coefficient.
pub fn prim_shell(l: usize, center: [f64; 3], exponent: f64, coefficient: f64, pure: bool) -> Shell {
    Shell::new(l, center, vec![Primitive::new(exponent, coefficient)], pure)
}

/// Two-primitive Cartesian shell.
pub fn contracted_shell(l: usize, center: [f64; 3]) -> Shell {
    Shell::new(
        l,
        center,
        vec![Primitive::new(1.7, 0.6), Primitive::new(0.45, 0.8)],
        false,
    )
}

pub fn basis_of(shells: Vec<Shell>) -> Arc<BasisSet> {
    Arc::new(BasisSet::new(Molecule::default(), shells))
}

/// Value of every Cartesian component of `shell` at `r`, CCA order.
pub fn cartesian_values(shell: &Shell, r: [f64; 3]) -> Vec<f64> {
    let c = shell.center();
    let d = [r[0] - c[0], r[1] - c[1], r[2] - c[2]];
    let r2 = d[0] * d[0] + d[1] * d[1] + d[2] * d[2];
    let radial: f64 = shell
        .primitives()
        .iter()
        .map(|p| p.coefficient * (-p.exponent * r2).exp())
        .sum();
    cart_comp(shell.am())
        .iter()
        .map(|&[lx, ly, lz]| {
            radial * d[0].powi(lx as i32) * d[1].powi(ly as i32) * d[2].powi(lz as i32)
        })
        .collect()
}

/// Runs one shell pair and returns a copy of every chunk.
pub fn pair_chunks<T: OneBodyAoInt>(engine: &mut T, s1: &Shell, s2: &Shell) -> Vec<Vec<f64>> {
    engine.compute_pair(s1, s2).unwrap();
    engine.buffers().into_iter().map(|c| c.to_vec()).collect()
}
