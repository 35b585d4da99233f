//! Compounding conventions and the rate/compound-factor conversions built
//! on them.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::{Rate, Real, Time};

/// How interest is compounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compounding {
    /// Simple interest: `1 + r·t`
    Simple,
    /// Compounded `n` times a year: `(1 + r/n)^(n·t)`
    Compounded,
    /// Continuously compounded: `e^(r·t)`
    Continuous,
}

impl Compounding {
    /// Growth factor of one unit over `t` years at rate `r`.
    ///
    /// `periods_per_year` is only read for [`Compounding::Compounded`].
    pub fn compound_factor(self, r: Rate, t: Time, periods_per_year: u32) -> Result<Real> {
        crate::ensure!(t >= 0.0, "negative time ({t}) not allowed");
        match self {
            Compounding::Simple => Ok(1.0 + r * t),
            Compounding::Compounded => {
                let n = Self::periods(periods_per_year)?;
                Ok((1.0 + r / n).powf(n * t))
            }
            Compounding::Continuous => Ok((r * t).exp()),
        }
    }

    /// The rate that grows one unit into `compound` over `t` years.
    pub fn implied_rate(self, compound: Real, t: Time, periods_per_year: u32) -> Result<Rate> {
        crate::ensure!(compound > 0.0, "positive compound factor required, got {compound}");
        crate::ensure!(t > 0.0, "positive time required, got {t}");
        match self {
            Compounding::Simple => Ok((compound - 1.0) / t),
            Compounding::Compounded => {
                let n = Self::periods(periods_per_year)?;
                Ok((compound.powf(1.0 / (n * t)) - 1.0) * n)
            }
            Compounding::Continuous => Ok(compound.ln() / t),
        }
    }

    fn periods(periods_per_year: u32) -> Result<Real> {
        if periods_per_year == 0 {
            return Err(Error::InvalidArgument(
                "compounded rates need at least one period per year".into(),
            ));
        }
        Ok(Real::from(periods_per_year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn factors_invert() {
        for comp in [Compounding::Simple, Compounding::Compounded, Compounding::Continuous] {
            let f = comp.compound_factor(0.07, 2.5, 2).unwrap();
            let r = comp.implied_rate(f, 2.5, 2).unwrap();
            assert_abs_diff_eq!(r, 0.07, epsilon = 1e-14);
        }
    }

    #[test]
    fn simple_factor_is_linear() {
        let f = Compounding::Simple.compound_factor(0.1, 0.5, 1).unwrap();
        assert_abs_diff_eq!(f, 1.05, epsilon = 1e-15);
    }

    #[test]
    fn zero_frequency_rejected() {
        assert!(Compounding::Compounded.compound_factor(0.05, 1.0, 0).is_err());
        assert!(Compounding::Continuous.implied_rate(0.0, 1.0, 1).is_err());
    }
}
