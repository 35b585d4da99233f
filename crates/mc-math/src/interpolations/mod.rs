//! 1D interpolation trait and the linear scheme.
//!
//! Every scheme here extrapolates linearly: outside `[x_min, x_max]` the
//! linear scheme continues its end segments and the spline its end tangents.
//! Applied to log discount factors, both keep the instantaneous forward flat
//! at its value on the last node. Callers decide whether extrapolation is
//! allowed.

use mc_core::{errors::Result, Real};

/// Natural cubic spline.
pub mod natural_cubic;

/// A 1D interpolation function `f: R → R` through a set of known points.
pub trait Interpolation1D: std::fmt::Debug + Send + Sync {
    /// Value at `x`.
    fn value(&self, x: Real) -> Real;

    /// First derivative at `x`.
    fn derivative(&self, x: Real) -> Real;

    /// Lower bound of the data.
    fn x_min(&self) -> Real;

    /// Upper bound of the data.
    fn x_max(&self) -> Real;

    /// Whether `x` lies within the data range.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

/// Index `i` of the segment `[xs[i], xs[i+1]]` containing `x`, clamped to
/// the first and last segments.
pub(crate) fn locate(xs: &[Real], x: Real) -> usize {
    let n = xs.len();
    if x <= xs[0] {
        return 0;
    }
    if x >= xs[n - 1] {
        return n - 2;
    }
    xs.partition_point(|&xi| xi <= x) - 1
}

pub(crate) fn check_nodes(xs: &[Real], ys: &[Real]) -> Result<()> {
    mc_core::ensure!(xs.len() >= 2, "need at least 2 points for interpolation");
    mc_core::ensure!(xs.len() == ys.len(), "xs and ys must have the same length");
    mc_core::ensure!(
        xs.windows(2).all(|w| w[0] < w[1]),
        "interpolation abscissae must be strictly increasing"
    );
    mc_core::ensure!(
        ys.iter().all(|y| y.is_finite()),
        "interpolation ordinates must be finite"
    );
    Ok(())
}

// ── Linear ────────────────────────────────────────────────────────────────────

/// Piecewise-linear interpolation.
///
/// Applied to log discount factors this is the log-linear scheme: piecewise
/// constant instantaneous forwards.
#[derive(Debug, Clone)]
pub struct LinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
}

impl LinearInterpolation {
    /// Build from strictly increasing `xs` and matching `ys`.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    fn slope(&self, i: usize) -> Real {
        (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl Interpolation1D for LinearInterpolation {
    fn value(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        self.ys[i] + (x - self.xs[i]) * self.slope(i)
    }

    fn derivative(&self, x: Real) -> Real {
        self.slope(locate(&self.xs, x))
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}
