//! Interpolation and root-finding properties on random node sets.

use approx::assert_abs_diff_eq;
use mc_math::{brent, expand_bracket, Interpolation1D, LinearInterpolation, NaturalCubicSpline};
use proptest::prelude::*;

/// Strictly increasing abscissae starting at zero, with ordinates.
fn nodes() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.01f64..5.0, -3.0f64..0.0), 2..12).prop_map(|pairs| {
        let mut x = 0.0;
        let mut xs = Vec::with_capacity(pairs.len());
        let mut ys = Vec::with_capacity(pairs.len());
        for (dx, y) in pairs {
            xs.push(x);
            ys.push(y);
            x += dx;
        }
        (xs, ys)
    })
}

proptest! {
    #[test]
    fn both_schemes_hit_their_nodes((xs, ys) in nodes()) {
        let linear = LinearInterpolation::new(&xs, &ys).unwrap();
        let spline = NaturalCubicSpline::new(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(&ys) {
            prop_assert!((linear.value(*x) - y).abs() < 1e-12);
            prop_assert!((spline.value(*x) - y).abs() < 1e-10);
        }
    }

    #[test]
    fn spline_reproduces_straight_lines(
        (xs, _) in nodes(),
        slope in -0.2f64..0.0,
        probe in 0.0f64..1.0,
    ) {
        let ys: Vec<f64> = xs.iter().map(|x| slope * x).collect();
        let spline = NaturalCubicSpline::new(&xs, &ys).unwrap();
        let x = probe * xs[xs.len() - 1];
        prop_assert!((spline.value(x) - slope * x).abs() < 1e-10);
        for m in spline.second_derivatives() {
            prop_assert!(m.abs() < 1e-9);
        }
    }

    #[test]
    fn brent_solves_monotone_objectives(root in -0.5f64..0.5, scale in 0.1f64..10.0) {
        let mut f = |x: f64| Ok::<_, mc_core::errors::Error>(scale * (x - root) + (x - root).powi(3));
        let bracket = expand_bracket(&mut f, -0.01, 0.01, -2.0, 2.0, 100).unwrap();
        let found = brent(&mut f, bracket, 1e-13, 100).unwrap();
        prop_assert!((found.x - root).abs() < 1e-12);
    }
}

#[test]
fn linear_continues_its_end_segments() {
    let linear = LinearInterpolation::new(&[0.0, 1.0, 2.0], &[0.0, -0.1, -0.3]).unwrap();
    assert_abs_diff_eq!(linear.value(3.0), -0.5, epsilon = 1e-15);
    assert_abs_diff_eq!(linear.value(-1.0), 0.1, epsilon = 1e-15);
    assert!(!linear.is_in_range(3.0));
}
