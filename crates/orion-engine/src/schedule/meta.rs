//! Meta schedules: roll dates driven by a list of `(frequency, period, roll)`
//! segments instead of a single regular interval.

use orion_core::{Date, Period, RollConvention};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::schedule::date_scheduler;

/// One segment of a meta schedule: roll every `roll_frequency` for `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaScheduleItem {
    /// Interval between rolls in this segment.
    pub roll_frequency: Period,
    /// Length of the segment.
    pub period: Period,
    /// Roll day applied to each generated date.
    pub roll_convention: RollConvention,
}

impl MetaScheduleItem {
    /// Creates a segment.
    #[must_use]
    pub fn new(roll_frequency: Period, period: Period, roll_convention: RollConvention) -> Self {
        Self {
            roll_frequency,
            period,
            roll_convention,
        }
    }

    /// Parses a segment from its text form, e.g. `("3M", "1Y", "15")`.
    pub fn parse(roll_frequency: &str, period: &str, roll_convention: &str) -> EngineResult<Self> {
        Ok(Self::new(
            roll_frequency.parse()?,
            period.parse()?,
            roll_convention.parse()?,
        ))
    }

    fn number_of_rolls(&self) -> EngineResult<i32> {
        Ok(self.period.divide(&self.roll_frequency)?)
    }

    fn months_per_roll(&self) -> EngineResult<i32> {
        match self.roll_frequency.to_months() {
            Some(months) if months > 0 => Ok(months),
            _ => Err(EngineError::not_supported("Month periods are the only ones supported.")),
        }
    }
}

/// Drops repeated dates, keeping the first occurrence of each.
pub fn remove_duplicates(dates: Vec<Date>) -> Vec<Date> {
    let mut result: Vec<Date> = Vec::with_capacity(dates.len());
    for date in dates {
        if !result.contains(&date) {
            result.push(date);
        }
    }
    result
}

fn roll(roll_convention: RollConvention, date: Date) -> EngineResult<Date> {
    date_scheduler::apply_roll_convention_to_date(roll_convention, date)
}

/// Dates every `interval` between `start` and `end`, both included.
///
/// Backward generation steps from `end`, so any irregular period falls at
/// the start.
pub fn unadjusted_dates_2(
    start: Date,
    end: Date,
    interval: Period,
    roll_convention: RollConvention,
    backward: bool,
) -> EngineResult<Vec<Date>> {
    let months = match interval.to_months() {
        Some(months) if months > 0 => months,
        _ => return Err(EngineError::not_supported("Month periods are the only ones supported.")),
    };
    let mut results = Vec::new();
    if backward {
        let mut roll_date = end;
        while roll_date > start {
            results.push(roll_date);
            roll_date = roll(roll_convention, roll_date.add_months(-months)?)?;
        }
        results.push(start);
        results.reverse();
    } else {
        let mut roll_date = start;
        while roll_date < end {
            results.push(roll_date);
            roll_date = roll(roll_convention, roll_date.add_months(months)?)?;
        }
        results.push(end);
    }
    Ok(remove_duplicates(results))
}

/// Dates generated segment by segment between `start` and `end`.
///
/// Forward generation lays the segments out from `start`; backward
/// generation lays them out in reverse from `end`.
pub fn unadjusted_dates_3(
    start: Date,
    end: Date,
    items: &[MetaScheduleItem],
    backward: bool,
) -> EngineResult<Vec<Date>> {
    let mut results = Vec::new();
    let mut offset_from_previous = 0;
    if backward {
        for item in items.iter().rev() {
            let rolls = item.number_of_rolls()?;
            let months = item.months_per_roll()?;
            let mut offset = 0;
            for roll_number in 1..=rolls {
                offset = roll_number * months;
                let date = end.add_months(-offset + offset_from_previous)?;
                results.insert(0, roll(item.roll_convention, date)?);
            }
            offset_from_previous -= offset;
        }
        results.insert(0, start);
        results.push(end);
    } else {
        results.push(start);
        for item in items {
            let rolls = item.number_of_rolls()?;
            let months = item.months_per_roll()?;
            let mut offset = 0;
            for roll_number in 1..=rolls {
                offset = roll_number * months;
                let date = start.add_months(offset + offset_from_previous)?;
                results.push(roll(item.roll_convention, date)?);
            }
            offset_from_previous += offset;
        }
        results.push(end);
    }
    Ok(remove_duplicates(results))
}

/// Roll dates after `start` from cumulative month offsets of each segment.
///
/// `start` itself is not included.
pub fn unadjusted_dates_from_meta(items: &[MetaScheduleItem], start: Date) -> EngineResult<Vec<Date>> {
    let mut offsets: Vec<(i32, RollConvention)> = Vec::new();
    for item in items {
        let rolls = item.number_of_rolls()?;
        let months = item.months_per_roll()?;
        for _ in 0..rolls {
            let last = offsets.last().map_or(0, |(offset, _)| *offset);
            offsets.push((last + months, item.roll_convention));
        }
    }
    let dates = offsets
        .into_iter()
        .map(|(offset, roll_convention)| roll(roll_convention, start.add_months(offset)?))
        .collect::<EngineResult<Vec<_>>>()?;
    Ok(remove_duplicates(dates))
}

/// Dates from the segments, continued with `default_interval` rolls when the
/// segments stop short of the far end.
///
/// With `from_start_date` the segments are laid out forward from `start`;
/// otherwise backward from `end`. The result is sorted and distinct.
pub fn unadjusted_dates_extended(
    items: &[MetaScheduleItem],
    start: Date,
    end: Date,
    default_interval: Period,
    default_roll_convention: RollConvention,
    from_start_date: bool,
) -> EngineResult<Vec<Date>> {
    let (from, to, sign) = if from_start_date {
        (start, end, 1)
    } else {
        (end, start, -1)
    };
    let past = |date: Date| if from_start_date { date > to } else { date < to };

    let mut offsets: Vec<(Period, RollConvention)> = Vec::new();
    for item in items {
        let rolls = item.number_of_rolls()?;
        if rolls == 0 {
            return Err(EngineError::invalid_argument(
                "Invalid period interval specified. The period interval is greater than the duration interval",
            ));
        }
        let step = Period::new(item.roll_frequency.multiplier * sign, item.roll_frequency.unit);
        for _ in 0..rolls {
            offsets.push((step, item.roll_convention));
        }
    }

    let mut result = Vec::new();
    if offsets.is_empty() {
        let defaults = if from_start_date {
            date_scheduler::get_unadjusted_dates_from_effective_date(start, end, default_interval, default_roll_convention)?
        } else {
            date_scheduler::get_unadjusted_dates_from_termination_date(start, end, default_interval, default_roll_convention)?
        };
        result.extend(defaults.dates);
    } else {
        result.push(from);
        let mut reference = from;
        for (step, roll_convention) in offsets {
            let unadjusted = step.add(reference)?;
            let rolled = roll(roll_convention, unadjusted)?;
            if past(rolled) {
                result.push(to);
                break;
            }
            result.push(rolled);
            reference = unadjusted;
        }
        if let Some(&last) = result.last() {
            let short = if from_start_date { last < to } else { last > to };
            if short && last < end {
                let defaults = if from_start_date {
                    date_scheduler::get_unadjusted_dates_from_effective_date(
                        last,
                        to,
                        default_interval,
                        default_roll_convention,
                    )?
                } else {
                    date_scheduler::get_unadjusted_dates_from_termination_date(
                        to,
                        last,
                        default_interval,
                        default_roll_convention,
                    )?
                };
                result.extend(defaults.dates);
            }
        }
    }

    let mut result = remove_duplicates(result);
    result.sort();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn items() -> Vec<MetaScheduleItem> {
        vec![
            MetaScheduleItem::parse("3M", "6M", "NONE").unwrap(),
            MetaScheduleItem::parse("6M", "1Y", "NONE").unwrap(),
        ]
    }

    #[test]
    fn test_dates_2_forward_and_backward() {
        let forward =
            unadjusted_dates_2(d(2024, 1, 10), d(2024, 12, 1), Period::months(3), RollConvention::None, false)
                .unwrap();
        assert_eq!(
            forward,
            vec![d(2024, 1, 10), d(2024, 4, 10), d(2024, 7, 10), d(2024, 10, 10), d(2024, 12, 1)]
        );
        let backward =
            unadjusted_dates_2(d(2024, 1, 10), d(2024, 12, 1), Period::months(3), RollConvention::None, true)
                .unwrap();
        assert_eq!(
            backward,
            vec![d(2024, 1, 10), d(2024, 3, 1), d(2024, 6, 1), d(2024, 9, 1), d(2024, 12, 1)]
        );
    }

    #[test]
    fn test_dates_2_rejects_day_intervals() {
        let err = unadjusted_dates_2(d(2024, 1, 10), d(2024, 12, 1), Period::days(10), RollConvention::None, false)
            .unwrap_err();
        assert_eq!(err.to_string(), "Month periods are the only ones supported.");
    }

    #[test]
    fn test_dates_3_forward() {
        let dates = unadjusted_dates_3(d(2024, 1, 15), d(2025, 7, 15), &items(), false).unwrap();
        assert_eq!(
            dates,
            vec![d(2024, 1, 15), d(2024, 4, 15), d(2024, 7, 15), d(2025, 1, 15), d(2025, 7, 15)]
        );
    }

    #[test]
    fn test_dates_3_backward_mirrors_forward_on_exact_fit() {
        let dates = unadjusted_dates_3(d(2024, 1, 15), d(2025, 7, 15), &items(), true).unwrap();
        assert_eq!(
            dates,
            vec![d(2024, 1, 15), d(2024, 4, 15), d(2024, 7, 15), d(2025, 1, 15), d(2025, 7, 15)]
        );
    }

    #[test]
    fn test_dates_from_meta_excludes_start() {
        let dates = unadjusted_dates_from_meta(&items(), d(2024, 1, 15)).unwrap();
        assert_eq!(dates, vec![d(2024, 4, 15), d(2024, 7, 15), d(2025, 1, 15), d(2025, 7, 15)]);
    }

    #[test]
    fn test_extended_continues_with_defaults() {
        let dates = unadjusted_dates_extended(
            &items()[..1],
            d(2024, 1, 15),
            d(2025, 1, 15),
            Period::months(6),
            RollConvention::None,
            true,
        )
        .unwrap();
        assert_eq!(dates, vec![d(2024, 1, 15), d(2024, 4, 15), d(2024, 7, 15), d(2025, 1, 15)]);
    }

    #[test]
    fn test_extended_without_items_uses_defaults() {
        let dates = unadjusted_dates_extended(
            &[],
            d(2024, 1, 15),
            d(2025, 1, 15),
            Period::months(6),
            RollConvention::None,
            false,
        )
        .unwrap();
        assert_eq!(dates, vec![d(2024, 1, 15), d(2024, 7, 15), d(2025, 1, 15)]);
    }

    #[test]
    fn test_extended_rejects_oversized_frequency() {
        let oversized = [MetaScheduleItem::new(Period::years(1), Period::months(6), RollConvention::None)];
        assert!(unadjusted_dates_extended(
            &oversized,
            d(2024, 1, 15),
            d(2025, 1, 15),
            Period::months(6),
            RollConvention::None,
            true,
        )
        .is_err());
    }

    #[test]
    fn test_remove_duplicates_keeps_order() {
        let dates = remove_duplicates(vec![d(2024, 3, 1), d(2024, 1, 1), d(2024, 3, 1)]);
        assert_eq!(dates, vec![d(2024, 3, 1), d(2024, 1, 1)]);
    }
}
