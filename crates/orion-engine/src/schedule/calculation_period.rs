//! Calculation periods with initial and final stubs.
//!
//! Regular periods are generated forward from the first regular period start
//! towards termination and backward from it towards the effective date. Any
//! remainder at either end becomes a stub whose shape is chosen by
//! [`StubPeriodType`].

use orion_core::{Date, Period, RollConvention};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::fpml::{CalculationPeriod, CalculationPeriodDates, CalculationPeriodFrequency, StubPeriodType};

fn add_periods(date: Date, interval: Period, count: i32) -> EngineResult<Date> {
    Ok(Period::new(interval.multiplier * count, interval.unit).add(date)?)
}

fn roll(roll_convention: RollConvention, date: Date) -> EngineResult<Date> {
    if roll_convention == RollConvention::None {
        Ok(date)
    } else {
        Ok(roll_convention.apply(date)?)
    }
}

fn require_positive(interval: Period) -> EngineResult<()> {
    if interval.multiplier > 0 {
        Ok(())
    } else {
        Err(EngineError::invalid_argument(format!(
            "Period interval must be positive, got {interval}"
        )))
    }
}

/// Start of the first regular period: one interval after `start`, rolled.
pub fn first_regular_period_start_date(
    interval: Period,
    roll_convention: RollConvention,
    start: Date,
) -> EngineResult<Date> {
    roll(roll_convention, interval.add(start)?)
}

/// End of the last regular period: one interval before `end`, rolled.
pub fn last_regular_period_end_date(
    interval: Period,
    roll_convention: RollConvention,
    end: Date,
) -> EngineResult<Date> {
    let back = Period::new(-interval.multiplier.abs(), interval.unit);
    roll(roll_convention, back.add(end)?)
}

/// Regular periods from `start` while they end on or before `end`.
///
/// The flag is true when the last regular period ends before `end`, leaving
/// an irregular remainder.
pub fn forward_regular_periods(
    start: Date,
    end: Date,
    interval: Period,
    roll_convention: RollConvention,
) -> EngineResult<(Vec<CalculationPeriod>, bool)> {
    require_positive(interval)?;
    let mut periods = Vec::new();
    let mut period_start = start;
    let mut period_end = add_periods(period_start, interval, 1)?;
    loop {
        let period = CalculationPeriod::unadjusted(
            roll(roll_convention, period_start)?,
            roll(roll_convention, period_end)?,
        );
        if period.unadjusted_end_date < end {
            periods.push(period);
            period_start = period_end;
            period_end = add_periods(period_start, interval, 1)?;
        } else if period.unadjusted_end_date == end {
            periods.push(period);
            return Ok((periods, false));
        } else {
            return Ok((periods, true));
        }
    }
}

/// Regular periods ending at `anchor`, stepping back while they start on or
/// after `earliest`.
pub fn backward_regular_periods(
    anchor: Date,
    earliest: Date,
    interval: Period,
    roll_convention: RollConvention,
) -> EngineResult<(Vec<CalculationPeriod>, bool)> {
    require_positive(interval)?;
    let mut periods = Vec::new();
    let mut period_end = anchor;
    let mut period_start = add_periods(period_end, interval, -1)?;
    loop {
        let period = CalculationPeriod::unadjusted(
            roll(roll_convention, period_start)?,
            roll(roll_convention, period_end)?,
        );
        if period.unadjusted_start_date > earliest {
            periods.insert(0, period);
            period_end = period_start;
            period_start = add_periods(period_end, interval, -1)?;
        } else if period.unadjusted_start_date == earliest {
            periods.insert(0, period);
            return Ok((periods, false));
        } else {
            return Ok((periods, true));
        }
    }
}

/// True if the period runs past one interval from its start.
pub fn is_long_stub(period: &CalculationPeriod, interval: Period) -> EngineResult<bool> {
    Ok(period.unadjusted_end_date > add_periods(period.unadjusted_start_date, interval, 1)?)
}

/// True if the period ends before one interval from its start.
pub fn is_short_stub(period: &CalculationPeriod, interval: Period) -> EngineResult<bool> {
    Ok(period.unadjusted_end_date < add_periods(period.unadjusted_start_date, interval, 1)?)
}

/// True if the first period is not exactly one interval long.
pub fn has_initial_stub(periods: &[CalculationPeriod], interval: Period) -> EngineResult<bool> {
    match periods.first() {
        Some(first) => Ok(first.unadjusted_end_date != add_periods(first.unadjusted_start_date, interval, 1)?),
        None => Ok(false),
    }
}

/// True if the final period is not exactly one interval long.
pub fn has_final_stub(periods: &[CalculationPeriod], interval: Period) -> EngineResult<bool> {
    match periods.last() {
        Some(last) => Ok(last.unadjusted_start_date != add_periods(last.unadjusted_end_date, interval, -1)?),
        None => Ok(false),
    }
}

fn set_final_stub(periods: &mut Vec<CalculationPeriod>, end: Date, stub: StubPeriodType) {
    let Some(last) = periods.last().copied() else {
        return;
    };
    if last.unadjusted_end_date >= end {
        return;
    }
    if stub == StubPeriodType::LongFinal {
        periods.pop();
        periods.push(CalculationPeriod::unadjusted(last.unadjusted_start_date, end));
    } else {
        periods.push(CalculationPeriod::unadjusted(last.unadjusted_end_date, end));
    }
}

fn set_initial_stub(periods: &mut Vec<CalculationPeriod>, start: Date, stub: StubPeriodType) {
    let Some(first) = periods.first().copied() else {
        return;
    };
    if first.unadjusted_start_date <= start {
        return;
    }
    if stub == StubPeriodType::LongInitial {
        periods[0] = CalculationPeriod::unadjusted(start, first.unadjusted_end_date);
    } else {
        periods.insert(0, CalculationPeriod::unadjusted(start, first.unadjusted_start_date));
    }
}

/// Periods from `effective_date` to `termination_date` whose regular part
/// starts at `regular_period_start`.
///
/// A remainder after the last regular period becomes a final stub, long
/// unless `stub_period_type` says otherwise. A gap before
/// `regular_period_start` becomes an initial stub, short unless an initial
/// stub type is given.
pub fn generate_unadjusted_calculation_dates(
    effective_date: Date,
    termination_date: Date,
    regular_period_start: Date,
    interval: Period,
    roll_convention: RollConvention,
    stub_period_type: Option<StubPeriodType>,
) -> EngineResult<Vec<CalculationPeriod>> {
    let (mut forward, irregular_final) =
        forward_regular_periods(regular_period_start, termination_date, interval, roll_convention)?;
    if irregular_final {
        if forward.is_empty() {
            forward.push(CalculationPeriod::unadjusted(regular_period_start, termination_date));
        } else {
            set_final_stub(
                &mut forward,
                termination_date,
                stub_period_type.unwrap_or(StubPeriodType::LongFinal),
            );
        }
    }

    let mut backward = Vec::new();
    if regular_period_start > effective_date {
        let (periods, irregular_initial) =
            backward_regular_periods(regular_period_start, effective_date, interval, roll_convention)?;
        backward = periods;
        if irregular_initial {
            let initial_stub = match stub_period_type {
                Some(stub) if stub.is_initial() => stub,
                Some(_) if regular_period_start > add_periods(effective_date, interval, 1)? => {
                    StubPeriodType::LongInitial
                }
                _ => StubPeriodType::ShortInitial,
            };
            if backward.is_empty() {
                backward.push(CalculationPeriod::unadjusted(effective_date, regular_period_start));
            } else {
                set_initial_stub(&mut backward, effective_date, initial_stub);
            }
        }
    }

    backward.extend(forward);
    log_generated(&backward);
    Ok(backward)
}

fn log_generated(periods: &[CalculationPeriod]) {
    if let (Some(first), Some(last)) = (periods.first(), periods.last()) {
        tracing::trace!(
            count = periods.len(),
            start = %first.unadjusted_start_date,
            end = %last.unadjusted_end_date,
            "generated calculation periods"
        );
    }
}

/// Periods whose first regular period starts one interval after the
/// effective date.
pub fn generate_unadjusted_calculation_dates_default(
    effective_date: Date,
    termination_date: Date,
    interval: Period,
    roll_convention: RollConvention,
    stub_period_type: Option<StubPeriodType>,
) -> EngineResult<Vec<CalculationPeriod>> {
    let regular_start = first_regular_period_start_date(interval, roll_convention, effective_date)?;
    generate_unadjusted_calculation_dates(
        effective_date,
        termination_date,
        regular_start,
        interval,
        roll_convention,
        stub_period_type,
    )
}

/// Periods whose first regular period starts
/// `interval_to_first_regular_period_start` after the effective date.
pub fn generate_unadjusted_calculation_dates_from_first_regular_interval(
    effective_date: Date,
    termination_date: Date,
    interval: Period,
    interval_to_first_regular_period_start: Period,
    roll_convention: RollConvention,
    stub_period_type: Option<StubPeriodType>,
) -> EngineResult<Vec<CalculationPeriod>> {
    let regular_start = first_regular_period_start_date(
        interval_to_first_regular_period_start,
        roll_convention,
        effective_date,
    )?;
    generate_unadjusted_calculation_dates(
        effective_date,
        termination_date,
        regular_start,
        interval,
        roll_convention,
        stub_period_type,
    )
}

/// Regular periods covering `interval_to_termination` from the effective date.
///
/// Fails unless the term is a whole number of intervals.
pub fn generate_unadjusted_calculation_dates_from_term(
    effective_date: Date,
    interval_to_termination: Period,
    interval: Period,
    roll_convention: RollConvention,
) -> EngineResult<Vec<CalculationPeriod>> {
    let start = roll(roll_convention, effective_date)?;
    interval_to_termination.divide(&interval)?;
    let termination = interval_to_termination.add(start)?;
    generate_unadjusted_calculation_dates(start, termination, start, interval, roll_convention, None)
}

/// Periods described by FpML calculation period dates.
///
/// A first period start date replaces the effective date. With neither a
/// first regular start nor a last regular end, the schedule rolls forward
/// from the effective date.
pub fn generate_from_calculation_period_dates(
    dates: &CalculationPeriodDates,
) -> EngineResult<Vec<CalculationPeriod>> {
    let effective = dates.effective_date.unadjusted_date;
    let termination = dates.termination_date.unadjusted_date;
    let frequency = dates.calculation_period_frequency;
    let start = match &dates.first_period_start_date {
        Some(first) if first.unadjusted_date != effective => first.unadjusted_date,
        _ => effective,
    };
    let stub = dates.stub_period_type;

    match (dates.first_regular_period_start_date, dates.last_regular_period_end_date) {
        (Some(first_regular), Some(last_regular)) => {
            let (regular, _) = forward_regular_periods(
                first_regular,
                termination,
                frequency.period,
                frequency.roll_convention,
            )?;
            if let Some(last) = regular.last() {
                if last.unadjusted_end_date != last_regular {
                    return Err(EngineError::out_of_range(
                        "Irregular period found between the first regular period start and last regular period end",
                    ));
                }
            }
            generate_unadjusted_calculation_dates(
                start,
                termination,
                first_regular,
                frequency.period,
                frequency.roll_convention,
                stub,
            )
        }
        (Some(first_regular), None) => generate_unadjusted_calculation_dates(
            start,
            termination,
            first_regular,
            frequency.period,
            frequency.roll_convention,
            stub,
        ),
        (None, Some(last_regular)) => generate_unadjusted_calculation_dates_from_term_date(
            start,
            termination,
            frequency.period,
            last_regular,
            frequency.roll_convention,
            stub,
        ),
        (None, None) => generate_unadjusted_calculation_dates(
            start,
            termination,
            start,
            frequency.period,
            frequency.roll_convention,
            stub,
        ),
    }
}

/// Periods whose last regular period ends at `last_regular_period_end`.
///
/// Empty when fewer than one regular period fits after the effective date.
pub fn generate_unadjusted_calculation_dates_from_term_date(
    effective_date: Date,
    termination_date: Date,
    interval: Period,
    last_regular_period_end: Date,
    roll_convention: RollConvention,
    stub_period_type: Option<StubPeriodType>,
) -> EngineResult<Vec<CalculationPeriod>> {
    let last_regular_start = add_periods(last_regular_period_end, interval, -1)?;
    if last_regular_start <= effective_date {
        return Ok(Vec::new());
    }
    let (regular, _) =
        backward_regular_periods(last_regular_start, effective_date, interval, roll_convention)?;
    match regular.first() {
        Some(first) => generate_unadjusted_calculation_dates(
            effective_date,
            termination_date,
            first.unadjusted_start_date,
            interval,
            roll_convention,
            stub_period_type,
        ),
        None => Ok(Vec::new()),
    }
}

/// `number_of_coupon_periods` regular periods ending at `termination_date`.
pub fn generate_unadjusted_calculation_dates_from_coupon_count(
    termination_date: Date,
    interval: Period,
    number_of_coupon_periods: i32,
) -> EngineResult<Vec<CalculationPeriod>> {
    if number_of_coupon_periods < 1 {
        return Err(EngineError::invalid_argument(
            "the number of coupon periods must be greater than zero",
        ));
    }
    let mut periods = Vec::with_capacity(number_of_coupon_periods as usize);
    let mut end = termination_date;
    for coupon in 1..=number_of_coupon_periods {
        let start = add_periods(termination_date, interval, -coupon)?;
        periods.insert(0, CalculationPeriod::unadjusted(start, end));
        end = start;
    }
    Ok(periods)
}

/// Periods stepped back from `termination_date` until the effective date is
/// reached.
///
/// With `full_first_coupon` the first period is a whole interval and may
/// start before the effective date; otherwise it is cut at the effective date.
pub fn generate_unadjusted_calculation_dates_full_first_coupon(
    effective_date: Date,
    termination_date: Date,
    interval: Period,
    full_first_coupon: bool,
) -> EngineResult<Vec<CalculationPeriod>> {
    require_positive(interval)?;
    let mut periods = Vec::new();
    let mut end = termination_date;
    let mut coupon = 1;
    loop {
        let mut start = add_periods(termination_date, interval, -coupon)?;
        let reached = start <= effective_date;
        if reached && !full_first_coupon {
            start = effective_date;
        }
        periods.insert(0, CalculationPeriod::unadjusted(start, end));
        if reached {
            return Ok(periods);
        }
        end = start;
        coupon += 1;
    }
}

/// A generated set of calculation periods and the terms that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationPeriodSchedule {
    effective_date: Option<Date>,
    termination_date: Date,
    period_interval: Period,
    roll_convention: RollConvention,
    periods: Vec<CalculationPeriod>,
}

impl CalculationPeriodSchedule {
    fn build(
        effective_date: Option<Date>,
        termination_date: Date,
        period_interval: Period,
        roll_convention: RollConvention,
        periods: Vec<CalculationPeriod>,
    ) -> Self {
        Self {
            effective_date,
            termination_date,
            period_interval,
            roll_convention,
            periods,
        }
    }

    /// Schedule described by FpML calculation period dates.
    pub fn from_calculation_period_dates(dates: &CalculationPeriodDates) -> EngineResult<Self> {
        let periods = generate_from_calculation_period_dates(dates)?;
        Ok(Self::build(
            Some(dates.effective_date.unadjusted_date),
            dates.termination_date.unadjusted_date,
            dates.calculation_period_frequency.period,
            dates.calculation_period_frequency.roll_convention,
            periods,
        ))
    }

    /// Regular schedule over a whole number of intervals, with no roll convention.
    pub fn from_term(effective_date: Date, interval_to_termination: Period, interval: Period) -> EngineResult<Self> {
        Self::from_term_with_frequency(
            effective_date,
            interval_to_termination,
            CalculationPeriodFrequency::new(interval, RollConvention::None),
        )
    }

    /// Regular schedule over a whole number of intervals rolled on the frequency's roll day.
    pub fn from_term_with_frequency(
        effective_date: Date,
        interval_to_termination: Period,
        frequency: CalculationPeriodFrequency,
    ) -> EngineResult<Self> {
        let periods = generate_unadjusted_calculation_dates_from_term(
            effective_date,
            interval_to_termination,
            frequency.period,
            frequency.roll_convention,
        )?;
        Ok(Self::build(
            Some(effective_date),
            interval_to_termination.add(effective_date)?,
            frequency.period,
            frequency.roll_convention,
            periods,
        ))
    }

    /// Schedule whose first regular period starts one interval after the effective date.
    pub fn new(
        effective_date: Date,
        termination_date: Date,
        interval: Period,
        roll_convention: RollConvention,
        stub_period_type: Option<StubPeriodType>,
    ) -> EngineResult<Self> {
        let periods = generate_unadjusted_calculation_dates_default(
            effective_date,
            termination_date,
            interval,
            roll_convention,
            stub_period_type,
        )?;
        Ok(Self::build(
            Some(effective_date),
            termination_date,
            interval,
            roll_convention,
            periods,
        ))
    }

    /// Schedule whose regular part starts at `regular_period_start`.
    pub fn with_regular_period_start(
        effective_date: Date,
        termination_date: Date,
        regular_period_start: Date,
        interval: Period,
        roll_convention: RollConvention,
        stub_period_type: Option<StubPeriodType>,
    ) -> EngineResult<Self> {
        let periods = generate_unadjusted_calculation_dates(
            effective_date,
            termination_date,
            regular_period_start,
            interval,
            roll_convention,
            stub_period_type,
        )?;
        Ok(Self::build(
            Some(effective_date),
            termination_date,
            interval,
            roll_convention,
            periods,
        ))
    }

    /// Schedule whose regular part ends at `last_regular_period_end`.
    pub fn from_term_date(
        effective_date: Date,
        termination_date: Date,
        interval: Period,
        last_regular_period_end: Date,
        roll_convention: RollConvention,
        stub_period_type: Option<StubPeriodType>,
    ) -> EngineResult<Self> {
        let periods = generate_unadjusted_calculation_dates_from_term_date(
            effective_date,
            termination_date,
            interval,
            last_regular_period_end,
            roll_convention,
            stub_period_type,
        )?;
        Ok(Self::build(
            Some(effective_date),
            termination_date,
            interval,
            roll_convention,
            periods,
        ))
    }

    /// `number_of_coupon_periods` regular periods ending at `termination_date`.
    pub fn from_term_date_with_coupon_count(
        termination_date: Date,
        interval: Period,
        number_of_coupon_periods: i32,
    ) -> EngineResult<Self> {
        let periods =
            generate_unadjusted_calculation_dates_from_coupon_count(termination_date, interval, number_of_coupon_periods)?;
        Ok(Self::build(
            periods.first().map(|p| p.unadjusted_start_date),
            termination_date,
            interval,
            RollConvention::None,
            periods,
        ))
    }

    /// Periods stepped back from termination, optionally keeping a full first coupon.
    pub fn from_term_date_full_first_coupon(
        effective_date: Date,
        termination_date: Date,
        interval: Period,
        full_first_coupon: bool,
    ) -> EngineResult<Self> {
        let periods = generate_unadjusted_calculation_dates_full_first_coupon(
            effective_date,
            termination_date,
            interval,
            full_first_coupon,
        )?;
        Ok(Self::build(
            Some(effective_date),
            termination_date,
            interval,
            RollConvention::None,
            periods,
        ))
    }

    /// The generated periods.
    pub fn periods(&self) -> &[CalculationPeriod] {
        &self.periods
    }

    /// Consumes the schedule, returning its periods.
    pub fn into_periods(self) -> Vec<CalculationPeriod> {
        self.periods
    }

    /// Effective date, when the schedule was built from one.
    pub fn effective_date(&self) -> Option<Date> {
        self.effective_date
    }

    /// Termination date.
    pub fn termination_date(&self) -> Date {
        self.termination_date
    }

    /// Regular period length.
    pub fn period_interval(&self) -> Period {
        self.period_interval
    }

    /// Roll convention of the regular dates.
    pub fn roll_convention(&self) -> RollConvention {
        self.roll_convention
    }

    /// Unadjusted start of every period.
    pub fn unadjusted_start_dates(&self) -> Vec<Date> {
        self.periods.iter().map(|p| p.unadjusted_start_date).collect()
    }

    /// Unadjusted end of every period.
    pub fn unadjusted_end_dates(&self) -> Vec<Date> {
        self.periods.iter().map(|p| p.unadjusted_end_date).collect()
    }

    /// True if the first period is irregular.
    pub fn has_initial_stub(&self) -> EngineResult<bool> {
        has_initial_stub(&self.periods, self.period_interval)
    }

    /// True if the final period is irregular.
    pub fn has_final_stub(&self) -> EngineResult<bool> {
        has_final_stub(&self.periods, self.period_interval)
    }

    /// True if `period` is a short or long stub of this schedule's interval.
    pub fn is_stub(&self, period: &CalculationPeriod) -> EngineResult<bool> {
        Ok(is_short_stub(period, self.period_interval)? || is_long_stub(period, self.period_interval)?)
    }

    /// First period exactly one interval long.
    pub fn first_regular_period(&self) -> EngineResult<Option<&CalculationPeriod>> {
        for period in &self.periods {
            if !self.is_stub(period)? {
                return Ok(Some(period));
            }
        }
        Ok(None)
    }

    /// Last period exactly one interval long.
    pub fn last_regular_period(&self) -> EngineResult<Option<&CalculationPeriod>> {
        for period in self.periods.iter().rev() {
            if !self.is_stub(period)? {
                return Ok(Some(period));
            }
        }
        Ok(None)
    }
}
