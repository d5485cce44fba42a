//! Dated curves tagged with the kind of value they hold.
//!
//! A [`Curve`] is an interpolated grid over year fractions from a base date.
//! The marker type `K` records what the values mean, and the free functions
//! in this module accept only the curves they make sense for.

use std::fmt;
use std::marker::PhantomData;

use orion_core::types::Date;

use crate::error::{CurveError, CurveResult};
use crate::spaces::{DiscreteCurve, InterpolatedCurve, InterpolationKind, Point1D};

/// Marker for the meaning of a curve's values.
pub trait ValueKind: fmt::Debug + Clone + Copy + Send + Sync + 'static {
    /// Human-readable name of the value kind.
    const NAME: &'static str;
}

macro_rules! value_kind {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl ValueKind for $name {
            const NAME: &'static str = $label;
        }
    };
}

value_kind!(
    /// Discount factors, `P(0) = 1`.
    DiscountFactor,
    "DiscountFactor"
);
value_kind!(
    /// Continuously compounded zero rates.
    ZeroRate,
    "ZeroRate"
);
value_kind!(
    /// Volatilities, e.g. caplet volatilities by expiry.
    Volatility,
    "Volatility"
);
value_kind!(
    /// Bond yields by maturity.
    Yield,
    "Yield"
);
value_kind!(
    /// Exchange-traded prices by expiry.
    Price,
    "Price"
);
value_kind!(
    /// Spreads over a reference curve.
    Spread,
    "Spread"
);

/// An interpolated curve over year fractions from `base_date`.
#[derive(Debug, Clone)]
pub struct Curve<K: ValueKind> {
    base_date: Date,
    curve: InterpolatedCurve,
    _kind: PhantomData<K>,
}

impl<K: ValueKind> Curve<K> {
    /// Wraps an interpolated curve whose coordinates are years from `base_date`.
    pub fn new(base_date: Date, curve: InterpolatedCurve) -> Self {
        Self {
            base_date,
            curve,
            _kind: PhantomData,
        }
    }

    /// Builds a curve from times in years and values.
    pub fn from_times(
        base_date: Date,
        times: Vec<f64>,
        values: Vec<f64>,
        kind: InterpolationKind,
        allow_extrapolation: bool,
    ) -> CurveResult<Self> {
        let grid = DiscreteCurve::new(times, values)?;
        Ok(Self::new(
            base_date,
            InterpolatedCurve::new(grid, kind, allow_extrapolation)?,
        ))
    }

    /// Builds a curve from dates, converted to Actual/365 year fractions.
    pub fn from_dates(
        base_date: Date,
        dates: &[Date],
        values: Vec<f64>,
        kind: InterpolationKind,
        allow_extrapolation: bool,
    ) -> CurveResult<Self> {
        let times = dates.iter().map(|d| base_date.years_between(d)).collect();
        Self::from_times(base_date, times, values, kind, allow_extrapolation)
    }

    /// The base date.
    pub fn base_date(&self) -> Date {
        self.base_date
    }

    /// Name of the value kind.
    pub fn value_kind(&self) -> &'static str {
        K::NAME
    }

    /// The interpolated curve.
    pub fn inner(&self) -> &InterpolatedCurve {
        &self.curve
    }

    /// Year fraction from the base date to `date`.
    pub fn time_to(&self, date: Date) -> f64 {
        self.base_date.years_between(&date)
    }

    /// Value at `t` years.
    pub fn value(&self, t: f64) -> CurveResult<f64> {
        self.curve.value(t)
    }

    /// Value at `date`.
    pub fn value_at_date(&self, date: Date) -> CurveResult<f64> {
        self.curve.value(self.time_to(date))
    }

    /// The bracketing grid points, or `None` when `t` is a node.
    pub fn closest_values(&self, t: f64) -> Option<(Point1D, Point1D)> {
        self.curve.closest_values(t)
    }

    /// A new curve with the listed grid values shifted. The original is
    /// untouched.
    pub fn perturbed_copy(&self, deltas: &[(usize, f64)]) -> CurveResult<Self> {
        Ok(Self::new(self.base_date, self.curve.perturbed_copy(deltas)?))
    }
}

/// Curves that can produce discount factors.
pub trait Discounting {
    /// Discount factor at `t` years.
    fn discount_factor(&self, t: f64) -> CurveResult<f64>;
}

impl Discounting for Curve<DiscountFactor> {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        if t <= 0.0 {
            return Ok(1.0);
        }
        self.value(t)
    }
}

impl Discounting for Curve<ZeroRate> {
    /// Recomputed from the stored zero rate on every call.
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        if t <= 0.0 {
            return Ok(1.0);
        }
        Ok((-t * self.value(t)?).exp())
    }
}

/// Discount factor at `t` years.
pub fn discount_factor<C: Discounting>(curve: &C, t: f64) -> CurveResult<f64> {
    curve.discount_factor(t)
}

/// Continuously compounded zero rate at `t` years.
pub fn zero_rate<C: Discounting>(curve: &C, t: f64) -> CurveResult<f64> {
    if t <= 0.0 {
        return Err(CurveError::invalid_value(format!(
            "zero rate needs a positive time, got {t}"
        )));
    }
    let df = curve.discount_factor(t)?;
    if df <= 0.0 {
        return Err(CurveError::invalid_value(format!(
            "discount factor {df} at t={t} is not positive"
        )));
    }
    Ok(-df.ln() / t)
}

/// Continuously compounded forward rate between `t1` and `t2`.
pub fn forward_rate<C: Discounting>(curve: &C, t1: f64, t2: f64) -> CurveResult<f64> {
    if t2 <= t1 {
        return Err(CurveError::invalid_value(format!(
            "forward period end {t2} must be after start {t1}"
        )));
    }
    let df1 = curve.discount_factor(t1)?;
    let df2 = curve.discount_factor(t2)?;
    if df1 <= 0.0 || df2 <= 0.0 {
        return Err(CurveError::invalid_value("discount factors must be positive"));
    }
    Ok((df1 / df2).ln() / (t2 - t1))
}

/// Caplet volatility at expiry `t`.
pub fn caplet_volatility(curve: &Curve<Volatility>, t: f64) -> CurveResult<f64> {
    curve.value(t)
}

/// Bond yield at maturity `t`.
pub fn bond_yield(curve: &Curve<Yield>, t: f64) -> CurveResult<f64> {
    curve.value(t)
}

/// Exchange-traded price at expiry `t`.
pub fn exchange_traded_price(curve: &Curve<Price>, t: f64) -> CurveResult<f64> {
    curve.value(t)
}

/// Spread at `t`.
pub fn spread_value(curve: &Curve<Spread>, t: f64) -> CurveResult<f64> {
    curve.value(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base() -> Date {
        Date::from_ymd(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_zero_curve_discounts_on_query() {
        let curve = Curve::<ZeroRate>::from_times(
            base(),
            vec![1.0, 2.0, 5.0],
            vec![0.03, 0.035, 0.04],
            InterpolationKind::Linear,
            false,
        )
        .unwrap();
        assert_relative_eq!(discount_factor(&curve, 2.0).unwrap(), (-0.07f64).exp(), epsilon = 1e-14);
        assert_relative_eq!(zero_rate(&curve, 2.0).unwrap(), 0.035, epsilon = 1e-12);
        assert_relative_eq!(discount_factor(&curve, 0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_forward_rate_from_discount_factors() {
        let curve = Curve::<DiscountFactor>::from_times(
            base(),
            vec![1.0, 2.0],
            vec![(-0.03f64).exp(), (-0.08f64).exp()],
            InterpolationKind::LogLinear,
            false,
        )
        .unwrap();
        assert_relative_eq!(forward_rate(&curve, 1.0, 2.0).unwrap(), 0.05, epsilon = 1e-12);
        assert!(forward_rate(&curve, 2.0, 1.0).is_err());
        assert!(zero_rate(&curve, 0.0).is_err());
    }

    #[test]
    fn test_from_dates_and_value_kind() {
        let dates = [
            Date::from_ymd(2025, 1, 14).unwrap(),
            Date::from_ymd(2026, 1, 14).unwrap(),
        ];
        let curve = Curve::<Volatility>::from_dates(
            base(),
            &dates,
            vec![0.2, 0.18],
            InterpolationKind::Linear,
            true,
        )
        .unwrap();
        assert_eq!(curve.value_kind(), "Volatility");
        assert_relative_eq!(curve.value_at_date(dates[0]).unwrap(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(caplet_volatility(&curve, 1.0).unwrap(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_perturbed_copy_is_new_instance() {
        let curve = Curve::<Yield>::from_times(
            base(),
            vec![1.0, 10.0],
            vec![0.04, 0.05],
            InterpolationKind::Linear,
            false,
        )
        .unwrap();
        let bumped = curve.perturbed_copy(&[(1, 0.0001)]).unwrap();
        assert_relative_eq!(bond_yield(&curve, 10.0).unwrap(), 0.05);
        assert_relative_eq!(bond_yield(&bumped, 10.0).unwrap(), 0.0501, epsilon = 1e-12);
        assert!(curve.closest_values(5.0).is_some());
    }

    #[test]
    fn test_price_and_spread_accessors() {
        let prices = Curve::<Price>::from_times(
            base(),
            vec![0.25, 0.5],
            vec![95.5, 95.4],
            InterpolationKind::Linear,
            false,
        )
        .unwrap();
        assert_relative_eq!(exchange_traded_price(&prices, 0.25).unwrap(), 95.5);

        let spreads = Curve::<Spread>::from_times(
            base(),
            vec![1.0, 2.0],
            vec![0.001, 0.002],
            InterpolationKind::Linear,
            false,
        )
        .unwrap();
        assert_relative_eq!(spread_value(&spreads, 1.5).unwrap(), 0.0015, epsilon = 1e-12);
    }
}
