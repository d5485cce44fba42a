//! Property tests for the interpolation strategies.

use orion_math::interpolation::{
    CubicSpline, Interpolator, LinearInterpolator, LogLinearInterpolator,
};
use orion_math::MathError;
use proptest::prelude::*;

/// Strictly ascending grid with arbitrary positive gaps.
fn grid() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.01f64..2.0, -5.0f64..5.0), 2..12).prop_map(|nodes| {
        let mut x = 0.0;
        let mut xs = Vec::with_capacity(nodes.len());
        let mut ys = Vec::with_capacity(nodes.len());
        for (gap, y) in nodes {
            x += gap;
            xs.push(x);
            ys.push(y);
        }
        (xs, ys)
    })
}

fn discount_grid() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.05f64..2.0, -0.02f64..0.15), 2..12).prop_map(|nodes| {
        let mut t = 0.0;
        let mut ts = Vec::with_capacity(nodes.len());
        let mut dfs = Vec::with_capacity(nodes.len());
        for (gap, rate) in nodes {
            t += gap;
            ts.push(t);
            dfs.push((-rate * t).exp());
        }
        (ts, dfs)
    })
}

proptest! {
    #[test]
    fn linear_passes_through_nodes((xs, ys) in grid()) {
        let interp = LinearInterpolator::new(xs.clone(), ys.clone()).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            prop_assert!((interp.value_at(*x, false).unwrap() - y).abs() < 1e-9);
        }
    }

    #[test]
    fn spline_passes_through_nodes((xs, ys) in grid()) {
        let interp = CubicSpline::new(xs.clone(), ys.clone()).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            prop_assert!((interp.value_at(*x, false).unwrap() - y).abs() < 1e-8);
        }
    }

    #[test]
    fn linear_stays_within_bracket((xs, ys) in grid(), frac in 0.0f64..1.0) {
        let interp = LinearInterpolator::new(xs.clone(), ys.clone()).unwrap();
        let x = xs[0] + frac * (xs[xs.len() - 1] - xs[0]);
        let value = interp.value_at(x, false).unwrap();
        let lo = ys.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(value >= lo - 1e-12 && value <= hi + 1e-12);
    }

    #[test]
    fn log_linear_discount_factors_stay_positive((ts, dfs) in discount_grid(), frac in 0.0f64..1.0) {
        let interp = LogLinearInterpolator::new(ts.clone(), dfs).unwrap();
        let t = ts[0] + frac * (ts[ts.len() - 1] - ts[0]);
        prop_assert!(interp.value_at(t, false).unwrap() > 0.0);
    }

    #[test]
    fn extrapolation_is_gated((xs, ys) in grid(), beyond in 0.01f64..10.0) {
        let max = xs[xs.len() - 1];
        let min = xs[0];
        let strategies: Vec<Box<dyn Interpolator>> = vec![
            Box::new(LinearInterpolator::new(xs.clone(), ys.clone()).unwrap()),
            Box::new(CubicSpline::new(xs.clone(), ys.clone()).unwrap()),
        ];
        for interp in &strategies {
            for x in [max + beyond, min - beyond] {
                let is_gated = matches!(
                    interp.value_at(x, false),
                    Err(MathError::ExtrapolationNotAllowed { .. })
                );
                prop_assert!(is_gated);
                prop_assert!(interp.value_at(x, true).unwrap().is_finite());
            }
        }
    }
}
