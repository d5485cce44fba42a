//! Unadjusted roll-date generation between an effective and a termination date.

use orion_core::{Date, Period, PeriodUnit, RollConvention};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::fpml::parse_stub_period_type;
use crate::schedule::calculation_period;

/// Roll dates plus the boundaries of the regular part of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnadjustedDates {
    /// Sorted unadjusted dates, both endpoints included.
    pub dates: Vec<Date>,
    /// Start of the first regular period.
    pub first_regular_period_start: Date,
    /// End of the last regular period.
    pub last_regular_period_end: Date,
}

/// Coupon dates rolled back from maturity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponDates {
    /// Sorted unadjusted coupon dates, maturity included.
    pub dates: Vec<Date>,
    /// Coupon date on or before the effective date.
    pub last_coupon_date: Date,
    /// First coupon date after it.
    pub next_coupon_date: Date,
}

fn require_positive(interval: &Period) -> EngineResult<()> {
    if interval.multiplier > 0 {
        Ok(())
    } else {
        Err(EngineError::invalid_argument(format!(
            "Period interval must be positive, got {interval}"
        )))
    }
}

/// Adds `multiplier` units of `unit` to `date`.
pub fn date_add(date: Date, unit: PeriodUnit, multiplier: i32) -> EngineResult<Date> {
    Ok(Period::new(multiplier, unit).add(date)?)
}

/// Moves `date` onto the roll day of its month.
///
/// Day-of-month conventions clamp to the month length; `EOM` takes the last
/// day; `NONE` keeps the day.
pub fn apply_roll_convention_to_date(roll_convention: RollConvention, date: Date) -> EngineResult<Date> {
    Ok(roll_convention.apply(date)?)
}

/// Dates every `period_interval` from `effective_date` up to
/// `effective_date + interval_to_termination`.
///
/// Fails unless the interval to termination is a whole number of periods.
pub fn get_unadjusted_date_schedule(
    effective_date: Date,
    interval_to_termination: Period,
    period_interval: Period,
) -> EngineResult<Vec<Date>> {
    let count = interval_to_termination.divide(&period_interval)?;
    if count <= 0 {
        return Err(EngineError::invalid_argument(format!(
            "{period_interval} does not roll towards {interval_to_termination}"
        )));
    }
    let termination = interval_to_termination.add(effective_date)?;
    let mut dates = Vec::new();
    let mut period_end = effective_date;
    loop {
        dates.push(period_end);
        period_end = date_add(period_end, period_interval.unit, period_interval.multiplier)?;
        if period_end >= termination {
            break;
        }
    }
    dates.push(termination);
    Ok(dates)
}

/// Rolls forward from the effective date.
///
/// Stops at the first roll date in the termination month, which is replaced
/// by the termination date, or at the first roll date beyond it. The
/// returned dates are strictly increasing.
pub fn get_unadjusted_dates_from_effective_date(
    effective_date: Date,
    termination_date: Date,
    period_interval: Period,
    roll_convention: RollConvention,
) -> EngineResult<UnadjustedDates> {
    require_positive(&period_interval)?;
    let mut dates = vec![effective_date];
    let next_roll = period_interval.add(effective_date)?;
    let mut roll_date = apply_roll_convention_to_date(roll_convention, next_roll)?;
    let first_regular_period_start = if next_roll == roll_date {
        effective_date
    } else {
        roll_date
    };
    let last_regular_period_end;
    dates.push(roll_date);

    loop {
        roll_date = period_interval.add(roll_date)?;
        roll_date = apply_roll_convention_to_date(roll_convention, roll_date)?;
        if roll_date <= termination_date {
            if roll_date.same_month(&termination_date) {
                dates.push(termination_date);
                last_regular_period_end = if roll_date.day() == termination_date.day() {
                    termination_date
                } else {
                    dates[dates.len() - 2]
                };
                break;
            }
            dates.push(roll_date);
        } else {
            last_regular_period_end = dates[dates.len() - 1];
            dates.push(termination_date);
            break;
        }
    }

    // a span of exactly one period reaches the end date twice
    dates.sort();
    dates.dedup();
    Ok(UnadjustedDates {
        dates,
        first_regular_period_start,
        last_regular_period_end,
    })
}

/// Rolls backward from the termination date; the mirror of
/// [`get_unadjusted_dates_from_effective_date`].
pub fn get_unadjusted_dates_from_termination_date(
    effective_date: Date,
    termination_date: Date,
    period_interval: Period,
    roll_convention: RollConvention,
) -> EngineResult<UnadjustedDates> {
    require_positive(&period_interval)?;
    let mut dates = vec![termination_date];
    let next_roll = period_interval.subtract(termination_date)?;
    let mut roll_date = apply_roll_convention_to_date(roll_convention, next_roll)?;
    let last_regular_period_end = if next_roll == roll_date {
        termination_date
    } else {
        roll_date
    };
    let first_regular_period_start;
    dates.push(roll_date);

    loop {
        roll_date = period_interval.subtract(roll_date)?;
        roll_date = apply_roll_convention_to_date(roll_convention, roll_date)?;
        if roll_date >= effective_date {
            if roll_date.same_month(&effective_date) {
                dates.push(effective_date);
                first_regular_period_start = if roll_date.day() == effective_date.day() {
                    effective_date
                } else {
                    dates[dates.len() - 2]
                };
                break;
            }
            dates.push(roll_date);
        } else {
            first_regular_period_start = dates[dates.len() - 1];
            dates.push(effective_date);
            break;
        }
    }

    // a span of exactly one period reaches the end date twice
    dates.sort();
    dates.dedup();
    Ok(UnadjustedDates {
        dates,
        first_regular_period_start,
        last_regular_period_end,
    })
}

/// String form of [`get_unadjusted_dates_from_effective_date`].
pub fn unadjusted_dates_from_effective_date(
    effective_date: Date,
    termination_date: Date,
    period_interval: &str,
    roll_convention: &str,
) -> EngineResult<UnadjustedDates> {
    get_unadjusted_dates_from_effective_date(
        effective_date,
        termination_date,
        period_interval.parse()?,
        roll_convention.parse()?,
    )
}

/// String form of [`get_unadjusted_dates_from_termination_date`].
pub fn unadjusted_dates_from_termination_date(
    effective_date: Date,
    termination_date: Date,
    period_interval: &str,
    roll_convention: &str,
) -> EngineResult<UnadjustedDates> {
    get_unadjusted_dates_from_termination_date(
        effective_date,
        termination_date,
        period_interval.parse()?,
        roll_convention.parse()?,
    )
}

/// Roll dates generated forward (`1`) or backward (`2`), with a long stub
/// split so that the irregular period is short.
pub fn get_unadjusted_dates(
    direction: i32,
    effective_date: Date,
    termination_date: Date,
    period_interval: Period,
    roll_convention: RollConvention,
) -> EngineResult<Vec<Date>> {
    match direction {
        1 => {
            let generated = get_unadjusted_dates_from_effective_date(
                effective_date,
                termination_date,
                period_interval,
                roll_convention,
            )?;
            let last_regular = generated.last_regular_period_end;
            let mut dates = generated.dates;
            // a trade shorter than one period generates a roll date past termination
            if period_interval.add(effective_date)? > termination_date {
                dates.pop();
            }
            if let (Some(&first), Some(&last)) = (dates.first(), dates.last()) {
                let regular_end = period_interval.add(last_regular)?;
                if first != last_regular && regular_end < last {
                    let at = dates.len() - 1;
                    dates.insert(at, regular_end);
                }
            }
            Ok(dates)
        }
        2 => {
            let generated = get_unadjusted_dates_from_termination_date(
                effective_date,
                termination_date,
                period_interval,
                roll_convention,
            )?;
            let first_regular = generated.first_regular_period_start;
            let mut dates = generated.dates;
            if let Some(&first) = dates.first() {
                let regular_start = period_interval.subtract(first_regular)?;
                if first != first_regular && regular_start > first {
                    dates.insert(1, regular_start);
                }
            }
            Ok(dates)
        }
        _ => Err(EngineError::out_of_range(
            "Only 1 and 2 are the valid values for this argument",
        )),
    }
}

/// Coupon dates rolled back from maturity until one falls on or before the
/// effective date.
pub fn get_unadjusted_coupon_dates_from_maturity_date(
    effective_date: Date,
    termination_date: Date,
    period_interval: Period,
    roll_convention: RollConvention,
) -> EngineResult<CouponDates> {
    require_positive(&period_interval)?;
    let mut dates = vec![termination_date];
    let mut roll_date =
        apply_roll_convention_to_date(roll_convention, period_interval.subtract(termination_date)?)?;
    dates.push(roll_date);
    loop {
        roll_date = period_interval.subtract(roll_date)?;
        roll_date = apply_roll_convention_to_date(roll_convention, roll_date)?;
        dates.push(roll_date);
        if roll_date <= effective_date {
            break;
        }
    }
    dates.sort();
    Ok(CouponDates {
        last_coupon_date: dates[0],
        next_coupon_date: dates[1],
        dates,
    })
}

/// Start dates of the calculation periods anchored on a first regular period date.
pub fn get_unadjusted_calculation_period_dates(
    effective_date: Date,
    termination_date: Date,
    period_interval: &str,
    roll_convention: &str,
    first_regular_period_date: Date,
    stub_period_type: Option<&str>,
) -> EngineResult<Vec<Date>> {
    let periods = calculation_period::generate_unadjusted_calculation_dates(
        effective_date,
        termination_date,
        first_regular_period_date,
        period_interval.parse()?,
        roll_convention.parse()?,
        parse_stub_period_type(stub_period_type)?,
    )?;
    Ok(periods.iter().map(|p| p.unadjusted_start_date).collect())
}

/// Start dates of the calculation periods whose first regular period starts
/// `interval_to_first_regular_period_start` after the effective date.
pub fn unadjusted_calculation_dates_from_first_regular_interval(
    effective_date: Date,
    termination_date: Date,
    interval_to_first_regular_period_start: &str,
    period_interval: &str,
    roll_convention: &str,
    stub_period_type: Option<&str>,
) -> EngineResult<Vec<Date>> {
    let periods = calculation_period::generate_unadjusted_calculation_dates_from_first_regular_interval(
        effective_date,
        termination_date,
        period_interval.parse()?,
        interval_to_first_regular_period_start.parse()?,
        roll_convention.parse()?,
        parse_stub_period_type(stub_period_type)?,
    )?;
    Ok(periods.iter().map(|p| p.unadjusted_start_date).collect())
}
