//! 1D root finding.
//!
//! The objective is fallible: an evaluation may fail (a missing fixing, a
//! query outside a curve) and that error is returned unchanged. Both the
//! bracket search and Brent's method count evaluations against a budget.

use mc_core::errors::{Error, Result};
use mc_core::Real;

/// A converged root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    /// Abscissa.
    pub x: Real,
    /// Objective value at `x`.
    pub fx: Real,
    /// Objective evaluations spent (bracketing included).
    pub evaluations: usize,
}

/// A sign-changing interval and the objective at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Lower end.
    pub lower: Real,
    /// Upper end.
    pub upper: Real,
    /// Objective at `lower`.
    pub f_lower: Real,
    /// Objective at `upper`.
    pub f_upper: Real,
    /// Evaluations spent finding it.
    pub evaluations: usize,
}

/// Widen `[lower, upper]` geometrically around its midpoint until the
/// objective changes sign, never leaving `[floor, cap]`.
pub fn expand_bracket<F>(
    f: &mut F,
    mut lower: Real,
    mut upper: Real,
    floor: Real,
    cap: Real,
    max_evaluations: usize,
) -> Result<Bracket>
where
    F: FnMut(Real) -> Result<Real>,
{
    mc_core::ensure!(lower < upper, "bracket [{lower}, {upper}] is empty");
    mc_core::ensure!(floor <= lower && upper <= cap, "bracket outside [{floor}, {cap}]");
    let mut f_lower = f(lower)?;
    let mut f_upper = f(upper)?;
    let mut evaluations = 2;
    const GROWTH: Real = 1.6;
    while f_lower * f_upper > 0.0 {
        if evaluations >= max_evaluations || (lower <= floor && upper >= cap) {
            return Err(Error::NoBracket { lower, upper });
        }
        // Step towards the end with the smaller residual.
        if f_lower.abs() < f_upper.abs() && lower > floor {
            lower = (lower - GROWTH * (upper - lower)).max(floor);
            f_lower = f(lower)?;
        } else if upper < cap {
            upper = (upper + GROWTH * (upper - lower)).min(cap);
            f_upper = f(upper)?;
        } else {
            lower = (lower - GROWTH * (upper - lower)).max(floor);
            f_lower = f(lower)?;
        }
        evaluations += 1;
    }
    Ok(Bracket {
        lower,
        upper,
        f_lower,
        f_upper,
        evaluations,
    })
}

/// Brent's method on a sign-changing bracket.
///
/// Converges when `|f(x)| <= accuracy`, or when the bracket has shrunk to
/// floating-point resolution around `x`. Fails with
/// [`Error::MaxIterations`] once `max_evaluations` is spent.
pub fn brent<F>(f: &mut F, bracket: Bracket, accuracy: Real, max_evaluations: usize) -> Result<Root>
where
    F: FnMut(Real) -> Result<Real>,
{
    mc_core::ensure!(accuracy > 0.0, "accuracy must be positive, got {accuracy}");
    let Bracket {
        lower: mut a,
        upper: mut b,
        f_lower: mut fa,
        f_upper: mut fb,
        mut evaluations,
    } = bracket;
    if fa * fb > 0.0 {
        return Err(Error::NoBracket { lower: a, upper: b });
    }
    if fa.abs() <= accuracy && fa.abs() < fb.abs() {
        return Ok(Root { x: a, fx: fa, evaluations });
    }
    if fb.abs() <= accuracy {
        return Ok(Root { x: b, fx: fb, evaluations });
    }

    let (mut c, mut fc) = (a, fa);
    let mut d = b - a;
    let mut e = d;

    loop {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 2.0 * Real::EPSILON * b.abs().max(1e-3);
        let xm = 0.5 * (c - b);
        if fb.abs() <= accuracy || xm.abs() <= tol {
            return Ok(Root { x: b, fx: fb, evaluations });
        }
        if evaluations >= max_evaluations {
            return Err(Error::MaxIterations { iterations: evaluations });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation, or secant when a == c.
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            if 2.0 * p < (3.0 * xm * q - (tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(xm) };
        fb = f(b)?;
        evaluations += 1;
    }
}
