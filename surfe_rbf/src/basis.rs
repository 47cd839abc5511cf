/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the kernel abstraction: constraint functionals, RBF kernels and the modified kernel.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Basis functions built from constraint functionals.
//!
//! Each constraint is a linear functional `L` applied to the field. The basis
//! function attached to a constraint is `L` applied to one argument of the
//! kernel `φ(x, ·)`, and the interpolation matrix entry between two constraints
//! is `L_i L_j φ`. Functionals decompose into point evaluations and directional
//! derivatives, so only the kernel value, its gradient and its Hessian are needed.

use crate::{error::ErrorKind, model_config::RbfKernelType, points::{Interface, Planar}};
use serde::{Deserialize, Serialize};
use surfe_rbf_utils::{AnisotropyTensor, KernelParams, KernelType, RadialKernel, RadialProfile, dot};

/// A linear functional of the scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Functional {
    /// `s(p)`
    Value([f64; 3]),
    /// `s(at) - s(reference)`
    Increment { at: [f64; 3], reference: [f64; 3] },
    /// `direction · ∇s(at)`
    Directional { at: [f64; 3], direction: [f64; 3] },
}

#[derive(Debug, Clone, Copy)]
enum Atom {
    Eval { at: [f64; 3], weight: f64 },
    Deriv { at: [f64; 3], direction: [f64; 3] },
}

impl Functional {
    fn atoms(&self) -> (Atom, Option<Atom>) {
        match *self {
            Functional::Value(at) => (Atom::Eval { at, weight: 1.0 }, None),
            Functional::Increment { at, reference } => (
                Atom::Eval { at, weight: 1.0 },
                Some(Atom::Eval {
                    at: reference,
                    weight: -1.0,
                }),
            ),
            Functional::Directional { at, direction } => (Atom::Deriv { at, direction }, None),
        }
    }

    /// The location the functional is anchored at.
    pub fn location(&self) -> [f64; 3] {
        match *self {
            Functional::Value(at) => at,
            Functional::Increment { at, .. } => at,
            Functional::Directional { at, .. } => at,
        }
    }
}

#[inline(always)]
fn sub(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline(always)]
fn scaled(v: &[f64; 3], s: f64) -> [f64; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

/// A radial kernel, optionally measuring distance in a global anisotropic metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RbfKernel {
    params: KernelParams,
    profile: RadialKernel,
    anisotropy: Option<AnisotropyTensor>,
}

impl RbfKernel {
    fn new(params: KernelParams, anisotropy: Option<AnisotropyTensor>) -> Self {
        Self {
            params,
            profile: RadialKernel::new(&params),
            anisotropy,
        }
    }

    pub fn kernel_type(&self) -> KernelType {
        self.params.kernel_type
    }

    pub fn shape_parameter(&self) -> f64 {
        self.params.shape_parameter
    }

    pub fn anisotropy(&self) -> Option<&AnisotropyTensor> {
        self.anisotropy.as_ref()
    }

    // Returns (r, G Δ) for Δ = a - b.
    #[inline(always)]
    fn separation(&self, a: &[f64; 3], b: &[f64; 3]) -> (f64, [f64; 3]) {
        let delta = sub(a, b);
        let g = match &self.anisotropy {
            Some(t) => t.apply(&delta),
            None => delta,
        };
        (dot(&delta, &g).max(0.0).sqrt(), g)
    }

    /// `φ(a, b)`
    #[inline(always)]
    pub fn value(&self, a: &[f64; 3], b: &[f64; 3]) -> f64 {
        let (r, _) = self.separation(a, b);
        self.profile.phi(r)
    }

    /// `∇_a φ(a, b)`
    #[inline(always)]
    pub fn gradient(&self, a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
        let (r, g) = self.separation(a, b);
        scaled(&g, self.profile.d1(r))
    }

    /// `∇_a ∇_a φ(a, b)`
    #[inline(always)]
    pub fn hessian(&self, a: &[f64; 3], b: &[f64; 3]) -> [[f64; 3]; 3] {
        let (r, g) = self.separation(a, b);
        let d1 = self.profile.d1(r);
        let d2 = self.profile.d2(r);
        let mut h = [[0.0; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                let metric = match &self.anisotropy {
                    Some(t) => t.metric[i][j],
                    None => (i == j) as u8 as f64,
                };
                h[i][j] = d2 * g[i] * g[j] + d1 * metric;
            }
        }
        h
    }

    // u^T H v
    #[inline(always)]
    fn hessian_form(&self, a: &[f64; 3], b: &[f64; 3], u: &[f64; 3], v: &[f64; 3]) -> f64 {
        let h = self.hessian(a, b);
        let mut total = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                total += u[i] * h[i][j] * v[j];
            }
        }
        total
    }

    #[inline(always)]
    fn atom_cross(&self, lhs: &Atom, rhs: &Atom) -> f64 {
        match (lhs, rhs) {
            (Atom::Eval { at: p, weight: wp }, Atom::Eval { at: q, weight: wq }) => {
                wp * wq * self.value(p, q)
            }
            (Atom::Deriv { at: p, direction: u }, Atom::Eval { at: q, weight: w }) => {
                w * dot(u, &self.gradient(p, q))
            }
            (Atom::Eval { at: p, weight: w }, Atom::Deriv { at: q, direction: v }) => {
                w * dot(v, &self.gradient(q, p))
            }
            (Atom::Deriv { at: p, direction: u }, Atom::Deriv { at: q, direction: v }) => {
                -self.hessian_form(p, q, u, v)
            }
        }
    }

    /// `L_lhs L_rhs φ`, the interpolation matrix entry between two functionals.
    pub fn cross(&self, lhs: &Functional, rhs: &Functional) -> f64 {
        let (l0, l1) = lhs.atoms();
        let (r0, r1) = rhs.atoms();
        let mut total = self.atom_cross(&l0, &r0);
        if let Some(r1) = &r1 {
            total += self.atom_cross(&l0, r1);
        }
        if let Some(l1) = &l1 {
            total += self.atom_cross(l1, &r0);
            if let Some(r1) = &r1 {
                total += self.atom_cross(l1, r1);
            }
        }
        total
    }

    /// Value at `x` of the basis function attached to `functional`.
    pub fn apply(&self, x: &[f64; 3], functional: &Functional) -> f64 {
        self.cross(&Functional::Value(*x), functional)
    }

    /// Gradient at `x` of the basis function attached to `functional`.
    pub fn apply_gradient(&self, x: &[f64; 3], functional: &Functional) -> [f64; 3] {
        let mut total = [0.0; 3];
        let (a0, a1) = functional.atoms();
        for atom in std::iter::once(a0).chain(a1) {
            let contribution = match atom {
                Atom::Eval { at, weight } => scaled(&self.gradient(x, &at), weight),
                Atom::Deriv { at, direction } => {
                    let h = self.hessian(&at, x);
                    [
                        -dot(&h[0], &direction),
                        -dot(&h[1], &direction),
                        -dot(&h[2], &direction),
                    ]
                }
            };
            for k in 0..3 {
                total[k] += contribution[k];
            }
        }
        total
    }
}

/// A base kernel paired with one reference point per interface group.
///
/// Interface constraints become increments relative to their group reference,
/// so only differences within a group are fixed and the group levels are
/// recovered after the solve.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifiedKernel {
    pub base: RbfKernel,
    pub references: Vec<[f64; 3]>,
}

impl ModifiedKernel {
    /// Fails when there are no interface groups.
    pub fn new(base: RbfKernel, interface_point_lists: &[Vec<Interface>]) -> Result<Self, ErrorKind> {
        if interface_point_lists.is_empty() || interface_point_lists.iter().any(|g| g.is_empty()) {
            return Err(ErrorKind::ModifiedBasisWithoutInterfaces);
        }
        Ok(Self {
            base,
            references: interface_point_lists
                .iter()
                .map(|g| g[0].point.coords())
                .collect(),
        })
    }
}

/// The kernel used to build and evaluate the interpolant.
#[derive(Debug, Clone, PartialEq)]
pub enum BasisFunction {
    Standard(RbfKernel),
    Modified(ModifiedKernel),
}

impl BasisFunction {
    pub fn kernel(&self) -> &RbfKernel {
        match self {
            BasisFunction::Standard(k) => k,
            BasisFunction::Modified(m) => &m.base,
        }
    }

    /// The functional enforcing member `member` of interface group `group`.
    ///
    /// For the modified kernel the first member is the group reference and carries
    /// no constraint, so `None` is returned for it.
    pub fn interface_functional(&self, at: [f64; 3], group: usize, member: usize) -> Option<Functional> {
        match self {
            BasisFunction::Standard(_) => Some(Functional::Value(at)),
            BasisFunction::Modified(m) => {
                let reference = *m.references.get(group)?;
                match member {
                    0 => None,
                    _ => Some(Functional::Increment { at, reference }),
                }
            }
        }
    }

    /// Reference point of interface group `group`, when the kernel is modified.
    pub fn group_reference(&self, group: usize) -> Option<[f64; 3]> {
        match self {
            BasisFunction::Standard(_) => None,
            BasisFunction::Modified(m) => m.references.get(group).copied(),
        }
    }

    #[inline(always)]
    pub fn cross(&self, lhs: &Functional, rhs: &Functional) -> f64 {
        self.kernel().cross(lhs, rhs)
    }

    #[inline(always)]
    pub fn apply(&self, x: &[f64; 3], functional: &Functional) -> f64 {
        self.kernel().apply(x, functional)
    }

    #[inline(always)]
    pub fn apply_gradient(&self, x: &[f64; 3], functional: &Functional) -> [f64; 3] {
        self.kernel().apply_gradient(x, functional)
    }
}

/// Builds the kernel for a family, optionally anisotropic.
///
/// Anisotropic kernels derive their metric from the planar normals. Returns
/// `None` when the shape parameter is unusable for a shape-dependent family or
/// when anisotropy is requested without a usable planar normal.
pub fn create_rbf_kernel(
    kernel_type: RbfKernelType,
    anisotropic: bool,
    shape_parameter: f64,
    planar: &[Planar],
) -> Option<RbfKernel> {
    let params = KernelParams::builder(kernel_type.into())
        .shape_parameter(shape_parameter)
        .build();
    if !params.is_valid() {
        return None;
    }

    let anisotropy = match anisotropic {
        true => {
            let normals: Vec<[f64; 3]> = planar.iter().map(|p| p.normal).collect();
            Some(AnisotropyTensor::from_normals(&normals)?)
        }
        false => None,
    };

    Some(RbfKernel::new(params, anisotropy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;

    const FAMILIES: [RbfKernelType; 6] = [
        RbfKernelType::Cubic,
        RbfKernelType::Gaussian,
        RbfKernelType::Multiquadric,
        RbfKernelType::InverseMultiquadric,
        RbfKernelType::ThinPlateSpline,
        RbfKernelType::Linear,
    ];

    fn planar_data() -> Vec<Planar> {
        vec![
            Planar::new(0.0, 0.0, 0.0, [0.1, 0.0, 1.0]),
            Planar::new(1.0, 0.0, 0.0, [0.0, 0.1, 1.0]),
        ]
    }

    #[test]
    fn factory_is_deterministic_for_every_family() {
        let planar = planar_data();
        for family in FAMILIES {
            for anisotropic in [false, true] {
                let k = create_rbf_kernel(family, anisotropic, 2.0, &planar).unwrap();
                assert!(k.kernel_type() == KernelType::from(family));
                assert!(k.shape_parameter() == 2.0);
                assert!(k.anisotropy().is_some() == anisotropic);
                assert!(k == create_rbf_kernel(family, anisotropic, 2.0, &planar).unwrap());
            }
        }
    }

    #[test]
    fn factory_rejects_structurally_invalid_parameters() {
        assert!(create_rbf_kernel(RbfKernelType::Gaussian, false, 0.0, &[]).is_none());
        assert!(create_rbf_kernel(RbfKernelType::Multiquadric, false, f64::NAN, &[]).is_none());
        assert!(create_rbf_kernel(RbfKernelType::Cubic, true, 1.0, &[]).is_none());
        assert!(create_rbf_kernel(RbfKernelType::Cubic, false, 0.0, &[]).is_some());
    }

    #[test]
    fn cross_is_symmetric() {
        let k = create_rbf_kernel(RbfKernelType::Gaussian, true, 1.5, &planar_data()).unwrap();
        let functionals = [
            Functional::Value([0.1, 0.2, 0.3]),
            Functional::Increment {
                at: [0.5, -0.2, 0.1],
                reference: [0.0, 0.0, 0.0],
            },
            Functional::Directional {
                at: [0.3, 0.3, -0.4],
                direction: [0.0, 0.6, 0.8],
            },
        ];
        for a in &functionals {
            for b in &functionals {
                assert!((k.cross(a, b) - k.cross(b, a)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn basis_gradient_matches_finite_differences() {
        let k = create_rbf_kernel(RbfKernelType::Cubic, false, 1.0, &[]).unwrap();
        let functionals = [
            Functional::Value([0.4, 0.1, -0.3]),
            Functional::Directional {
                at: [-0.2, 0.5, 0.2],
                direction: [1.0, 0.0, 0.0],
            },
        ];
        let x = [0.3, -0.1, 0.6];
        let h = 1e-6;
        for f in &functionals {
            let g = k.apply_gradient(&x, f);
            for axis in 0..3 {
                let mut xp = x;
                let mut xm = x;
                xp[axis] += h;
                xm[axis] -= h;
                let fd = (k.apply(&xp, f) - k.apply(&xm, f)) / (2.0 * h);
                assert!((fd - g[axis]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn directional_cross_is_derivative_of_basis() {
        let k = create_rbf_kernel(RbfKernelType::Multiquadric, false, 1.0, &[]).unwrap();
        let source = Functional::Value([0.2, 0.2, 0.2]);
        let at = [0.7, -0.1, 0.4];
        let direction = [0.0, 0.0, 1.0];
        let g = k.apply_gradient(&at, &source);
        let cross = k.cross(&Functional::Directional { at, direction }, &source);
        assert!((cross - g[2]).abs() < 1e-12);
    }

    #[test]
    fn modified_kernel_needs_interface_groups() {
        let base = create_rbf_kernel(RbfKernelType::Cubic, false, 1.0, &[]).unwrap();
        assert!(ModifiedKernel::new(base, &[]) == Err(ErrorKind::ModifiedBasisWithoutInterfaces));

        let groups = vec![vec![
            Interface::new(0.0, 0.0, 0.0, 1.0),
            Interface::new(1.0, 0.0, 0.0, 1.0),
        ]];
        let basis = BasisFunction::Modified(ModifiedKernel::new(base, &groups).unwrap());
        assert!(basis.interface_functional([0.0, 0.0, 0.0], 0, 0).is_none());
        assert!(
            basis.interface_functional([1.0, 0.0, 0.0], 0, 1)
                == Some(Functional::Increment {
                    at: [1.0, 0.0, 0.0],
                    reference: [0.0, 0.0, 0.0]
                })
        );
    }
}
