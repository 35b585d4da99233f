//! Natural cubic spline.
//!
//! The spline's second derivatives `M_i` solve the tridiagonal system
//!
//!   `h_{i-1} M_{i-1} + 2 (h_{i-1} + h_i) M_i + h_i M_{i+1} = 6 (s_i - s_{i-1})`
//!
//! with `M_0 = M_{n-1} = 0`, where `h_i` and `s_i` are the width and slope
//! of segment `i`. Every node influences every segment, so moving one
//! ordinate perturbs the whole curve. Outside the data the spline continues
//! linearly, which is its own C² continuation under natural end conditions.

use mc_core::{errors::Error, errors::Result, Real};
use nalgebra::{DMatrix, DVector};

use super::{check_nodes, locate, Interpolation1D};

/// Natural cubic spline through `(xs, ys)`.
#[derive(Debug, Clone)]
pub struct NaturalCubicSpline {
    xs: Vec<Real>,
    ys: Vec<Real>,
    /// Second derivative at each node.
    m: Vec<Real>,
}

impl NaturalCubicSpline {
    /// Fit the spline to strictly increasing `xs` and matching `ys`.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        let n = xs.len();
        let mut m = vec![0.0; n];
        if n > 2 {
            let h: Vec<Real> = xs.windows(2).map(|w| w[1] - w[0]).collect();
            let s: Vec<Real> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();
            let size = n - 2;
            let mut a = DMatrix::<Real>::zeros(size, size);
            let mut rhs = DVector::<Real>::zeros(size);
            for row in 0..size {
                let i = row + 1;
                a[(row, row)] = 2.0 * (h[i - 1] + h[i]);
                if row > 0 {
                    a[(row, row - 1)] = h[i - 1];
                }
                if row + 1 < size {
                    a[(row, row + 1)] = h[i];
                }
                rhs[row] = 6.0 * (s[i] - s[i - 1]);
            }
            let solution = a.lu().solve(&rhs).ok_or_else(|| {
                Error::Runtime("natural cubic spline system is singular".into())
            })?;
            m[1..n - 1].copy_from_slice(solution.as_slice());
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            m,
        })
    }

    /// Second derivative at each node (zero at both ends).
    pub fn second_derivatives(&self) -> &[Real] {
        &self.m
    }

    /// Value and first derivative on segment `i` at offset `t` from `xs[i]`.
    fn segment(&self, i: usize, t: Real) -> (Real, Real) {
        let h = self.xs[i + 1] - self.xs[i];
        let (mi, mj) = (self.m[i], self.m[i + 1]);
        let slope = (self.ys[i + 1] - self.ys[i]) / h;
        let b = slope - h * (2.0 * mi + mj) / 6.0;
        let c = mi / 2.0;
        let d = (mj - mi) / (6.0 * h);
        let value = self.ys[i] + t * (b + t * (c + t * d));
        let derivative = b + t * (2.0 * c + 3.0 * d * t);
        (value, derivative)
    }
}

impl Interpolation1D for NaturalCubicSpline {
    fn value(&self, x: Real) -> Real {
        let n = self.xs.len();
        if x < self.xs[0] {
            let (y0, d0) = self.segment(0, 0.0);
            return y0 + d0 * (x - self.xs[0]);
        }
        if x > self.xs[n - 1] {
            // Tangent line, so `M = 0` carries on. For log discount factors the
            // instantaneous forward past the last node stays at its value there.
            let last = n - 2;
            let (yn, dn) = self.segment(last, self.xs[n - 1] - self.xs[last]);
            return yn + dn * (x - self.xs[n - 1]);
        }
        let i = locate(&self.xs, x);
        self.segment(i, x - self.xs[i]).0
    }

    fn derivative(&self, x: Real) -> Real {
        let n = self.xs.len();
        let i = locate(&self.xs, x);
        let t = x.clamp(self.xs[0], self.xs[n - 1]) - self.xs[i];
        self.segment(i, t).1
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}
