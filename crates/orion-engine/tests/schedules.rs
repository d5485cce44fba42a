//! Schedule generation scenarios and properties.

use std::sync::Arc;

use orion_engine::prelude::*;
use orion_engine::schedule::{calculation_period, date_scheduler, meta};
use proptest::prelude::*;

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

fn engine() -> CalendarEngine {
    let config = EngineConfig::default();
    let cache = InMemoryCache::new();
    cache
        .insert(
            config.date_rules_key(),
            &DateRules::new(vec![DateRuleProfile::new("Sydney", "AUSY")]),
        )
        .unwrap();
    let mut ausy = BusinessCenterHolidays::new("AUSY");
    for (date, name) in [
        (d(2024, 1, 1), "New Year's Day"),
        (d(2024, 1, 26), "Australia Day"),
        (d(2024, 3, 29), "Good Friday"),
        (d(2024, 4, 1), "Easter Monday"),
        (d(2024, 4, 25), "Anzac Day"),
        (d(2024, 6, 10), "King's Birthday"),
        (d(2024, 8, 5), "Bank Holiday"),
        (d(2024, 10, 7), "Labour Day"),
        (d(2024, 12, 25), "Christmas Day"),
        (d(2024, 12, 26), "Boxing Day"),
        (d(2025, 1, 1), "New Year's Day"),
        (d(2025, 1, 27), "Australia Day"),
    ] {
        ausy = ausy.with_holiday(date, name);
    }
    cache.insert(config.holidays_key("AUSY"), &ausy).unwrap();
    CalendarEngine::new(Arc::new(cache), config).unwrap()
}

// =============================================================================
// UNADJUSTED SCHEDULES
// =============================================================================

#[test]
fn quarterly_schedule_from_effective_date() {
    let generated = date_scheduler::get_unadjusted_dates_from_effective_date(
        d(2024, 1, 15),
        d(2025, 1, 15),
        Period::months(3),
        RollConvention::Day(15),
    )
    .unwrap();
    assert_eq!(
        generated.dates,
        vec![d(2024, 1, 15), d(2024, 4, 15), d(2024, 7, 15), d(2024, 10, 15), d(2025, 1, 15)]
    );
    assert_eq!(generated.first_regular_period_start, d(2024, 1, 15));
    assert_eq!(generated.last_regular_period_end, d(2025, 1, 15));
}

#[test]
fn invalid_direction_is_out_of_range() {
    let err = date_scheduler::get_unadjusted_dates(
        3,
        d(2024, 1, 15),
        d(2025, 1, 15),
        Period::months(3),
        RollConvention::None,
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::OutOfRange { .. }));
    assert!(err.to_string().contains("Only 1 and 2 are the valid values"));
}

#[test]
fn unsupported_roll_convention_on_a_date() {
    let err = date_scheduler::apply_roll_convention_to_date(RollConvention::Imm, d(2024, 1, 15)).unwrap_err();
    assert!(err.to_string().contains("supplied value is not supported"));
}

#[test]
fn calculation_period_dates_with_short_initial_stub() {
    let starts = date_scheduler::get_unadjusted_calculation_period_dates(
        d(2024, 2, 1),
        d(2025, 1, 15),
        "3M",
        "15",
        d(2024, 4, 15),
        None,
    )
    .unwrap();
    assert_eq!(starts, vec![d(2024, 2, 1), d(2024, 4, 15), d(2024, 7, 15), d(2024, 10, 15)]);
}

#[test]
fn fpml_calculation_period_dates() {
    let mut dates = CalculationPeriodDates::new(
        AdjustableDate::new(d(2024, 1, 15), None),
        AdjustableDate::new(d(2025, 3, 15), None),
        CalculationPeriodFrequency::new(Period::months(6), RollConvention::Day(15)),
        BusinessDayAdjustments::none(),
    );
    dates.stub_period_type = Some(StubPeriodType::ShortFinal);
    let schedule = CalculationPeriodSchedule::from_calculation_period_dates(&dates).unwrap();
    assert_eq!(
        schedule.unadjusted_start_dates(),
        vec![d(2024, 1, 15), d(2024, 7, 15), d(2025, 1, 15)]
    );
    assert!(schedule.has_final_stub().unwrap());
    assert!(!schedule.has_initial_stub().unwrap());
}

#[test]
fn meta_schedule_rows() {
    let dates = engine()
        .get_meta_dates_schedule(&[["3M", "6M", "NONE"], ["6M", "1Y", "NONE"]], d(2024, 1, 15), "", "")
        .unwrap();
    assert_eq!(dates, vec![d(2024, 4, 15), d(2024, 7, 15), d(2025, 1, 15), d(2025, 7, 15)]);

    let items = [MetaScheduleItem::parse("3M", "6M", "26").unwrap()];
    let unadjusted = meta::unadjusted_dates_from_meta(&items, d(2023, 10, 26)).unwrap();
    assert_eq!(unadjusted, vec![d(2024, 1, 26), d(2024, 4, 26)]);
    let adjusted = engine()
        .get_dates_schedule(&items, d(2023, 10, 26), "AUSY", "FOLLOWING")
        .unwrap();
    assert_eq!(adjusted, vec![d(2024, 1, 29), d(2024, 4, 26)]);
}

// =============================================================================
// ADJUSTED SCHEDULES
// =============================================================================

#[test]
fn adjusted_dates_from_effective_date() {
    let dates = engine()
        .adjusted_dates_from_effective_date(d(2023, 10, 26), d(2024, 4, 26), "3M", "26", "AUSY", "MODFOLLOWING")
        .unwrap();
    assert_eq!(dates, vec![d(2023, 10, 26), d(2024, 1, 29), d(2024, 4, 26)]);
}

#[test]
fn adjusted_calculation_date_schedule_and_payments() {
    let engine = engine();
    let adjustments = BusinessDayAdjustments::parse("MODFOLLOWING", "AUSY").unwrap();
    let periods = engine
        .get_adjusted_calculation_date_schedule(d(2023, 10, 26), Period::months(6), Period::months(3), &adjustments)
        .unwrap();
    assert_eq!(periods.len(), 2);
    assert_eq!(periods[0].adjusted_end_date, Some(d(2024, 1, 29)));
    assert_eq!(periods[1].adjusted_start_date, Some(d(2024, 1, 29)));

    let standard = engine
        .get_adjusted_payment_calculation_date_schedule(
            d(2023, 10, 26),
            Period::months(6),
            Period::months(3),
            &adjustments,
            DiscountingType::Standard,
        )
        .unwrap();
    assert_eq!(standard[0].adjusted_payment_date, d(2024, 1, 29));

    let fra = engine
        .get_adjusted_payment_calculation_date_schedule(
            d(2023, 10, 26),
            Period::months(6),
            Period::months(3),
            &adjustments,
            DiscountingType::Fra,
        )
        .unwrap();
    assert_eq!(fra[1].adjusted_payment_date, d(2024, 1, 29));
    assert_eq!(fra[1].calculation_periods.len(), 1);
}

#[test]
fn adjusted_calculation_period_start_dates() {
    let starts = engine()
        .get_adjusted_calculation_period_dates(
            d(2023, 10, 26),
            d(2024, 7, 26),
            "3M",
            "26",
            d(2023, 10, 26),
            None,
            &["Sydney"],
            "FOLLOWING",
        )
        .unwrap();
    assert_eq!(starts, vec![d(2023, 10, 26), d(2024, 1, 29), d(2024, 4, 26)]);
}

#[test]
fn adjusted_date_schedule_collapses_duplicates() {
    // Saturday 27 and Sunday 28 April both roll to Monday 29 April
    let adjustments = BusinessDayAdjustments::parse("FOLLOWING", "AUSY").unwrap();
    let dates = engine()
        .get_adjusted_date_schedule(d(2024, 4, 26), Period::days(2), Period::days(1), &adjustments)
        .unwrap();
    assert_eq!(dates, vec![d(2024, 4, 26), d(2024, 4, 29)]);
}

#[test]
fn adjusted_dates_2_and_3() {
    let engine = engine();
    let adjustments = BusinessDayAdjustments::parse("FOLLOWING", "AUSY").unwrap();
    let two = engine
        .get_adjusted_dates2(
            d(2023, 10, 26),
            d(2024, 4, 26),
            Period::months(3),
            RollConvention::None,
            false,
            &adjustments,
        )
        .unwrap();
    assert_eq!(two, vec![d(2023, 10, 26), d(2024, 1, 29), d(2024, 4, 26)]);

    let items = [MetaScheduleItem::new(Period::months(3), Period::months(6), RollConvention::None)];
    let three = engine
        .get_adjusted_dates3(d(2023, 10, 26), d(2024, 4, 26), &items, true, &adjustments)
        .unwrap();
    assert_eq!(three, two);
}

#[test]
fn adjusted_dates_from_termination_date() {
    let dates = engine()
        .adjusted_dates_from_termination_date(d(2023, 12, 1), d(2024, 7, 26), "3M", "26", "AUSY", "FOLLOWING")
        .unwrap();
    assert_eq!(dates, vec![d(2023, 12, 1), d(2024, 1, 29), d(2024, 4, 26), d(2024, 7, 26)]);
}

#[test]
fn reset_and_fixing_dates_follow_the_calculation_periods() {
    let engine = engine();
    let adjustments = BusinessDayAdjustments::parse("MODFOLLOWING", "AUSY").unwrap();
    let periods = engine
        .get_adjusted_calculation_date_schedule(d(2023, 10, 26), Period::months(6), Period::months(3), &adjustments)
        .unwrap();
    let resets = ResetDates {
        reset_relative_to: ResetRelativeTo::CalculationPeriodStartDate,
        fixing_dates: RelativeDateOffset::new(
            Period::days(-2),
            Some(DayType::Business),
            BusinessDayConvention::Preceding,
            Some(BusinessCenters::parse("AUSY")),
        ),
        reset_frequency: Period::months(3),
        reset_dates_adjustments: adjustments,
    };
    let frequency = CalculationPeriodFrequency::new(Period::months(3), RollConvention::None);
    let reset_dates = engine.get_reset_dates(&resets, &frequency, &periods).unwrap();
    assert_eq!(reset_dates, vec![d(2023, 10, 26), d(2024, 1, 29)]);

    // two business days back from Monday 29 January skips Australia Day
    let fixings = engine.get_fixing_dates_for_resets(&resets, &reset_dates).unwrap();
    assert_eq!(fixings, vec![d(2023, 10, 24), d(2024, 1, 24)]);
}

#[test]
fn calculation_periods_from_first_regular_interval() {
    let starts = date_scheduler::unadjusted_calculation_dates_from_first_regular_interval(
        d(2024, 2, 1),
        d(2025, 1, 15),
        "2M",
        "3M",
        "15",
        None,
    )
    .unwrap();
    assert_eq!(starts, vec![d(2024, 2, 1), d(2024, 4, 15), d(2024, 7, 15), d(2024, 10, 15)]);
}

#[test]
fn schedules_anchored_on_the_termination_date() {
    let schedule = CalculationPeriodSchedule::from_term_date(
        d(2024, 2, 1),
        d(2025, 1, 15),
        Period::months(3),
        d(2025, 1, 15),
        RollConvention::Day(15),
        None,
    )
    .unwrap();
    assert_eq!(
        schedule.unadjusted_start_dates(),
        vec![d(2024, 2, 1), d(2024, 4, 15), d(2024, 7, 15), d(2024, 10, 15)]
    );
    assert!(schedule.has_initial_stub().unwrap());

    let counted = CalculationPeriodSchedule::from_term_date_with_coupon_count(d(2025, 1, 15), Period::months(6), 2)
        .unwrap();
    assert_eq!(counted.effective_date(), Some(d(2024, 1, 15)));
    assert_eq!(counted.unadjusted_end_dates(), vec![d(2024, 7, 15), d(2025, 1, 15)]);
    let err = CalculationPeriodSchedule::from_term_date_with_coupon_count(d(2025, 1, 15), Period::months(6), 0)
        .unwrap_err();
    assert!(err.to_string().contains("the number of coupon periods must be greater than zero"));

    let full = CalculationPeriodSchedule::from_term_date_full_first_coupon(
        d(2024, 3, 1),
        d(2025, 1, 15),
        Period::months(6),
        true,
    )
    .unwrap();
    assert_eq!(full.unadjusted_start_dates(), vec![d(2024, 1, 15), d(2024, 7, 15)]);
    let cut = CalculationPeriodSchedule::from_term_date_full_first_coupon(
        d(2024, 3, 1),
        d(2025, 1, 15),
        Period::months(6),
        false,
    )
    .unwrap();
    assert_eq!(cut.unadjusted_start_dates(), vec![d(2024, 3, 1), d(2024, 7, 15)]);
}

// =============================================================================
// PROPERTIES
// =============================================================================

fn month_interval() -> impl Strategy<Value = Period> {
    prop_oneof![
        Just(Period::months(1)),
        Just(Period::months(3)),
        Just(Period::months(6)),
        Just(Period::years(1)),
    ]
}

fn date_strategy() -> impl Strategy<Value = Date> {
    (0i64..3000).prop_map(|offset| d(2020, 1, 1).add_days(offset))
}

proptest! {
    #[test]
    fn forward_schedule_is_sorted_and_bounded(
        effective in date_strategy(),
        length in 40i64..2000,
        interval in month_interval(),
    ) {
        let termination = effective.add_days(length);
        prop_assume!(interval.add(effective).unwrap() <= termination);
        let generated = date_scheduler::get_unadjusted_dates_from_effective_date(
            effective,
            termination,
            interval,
            RollConvention::None,
        )
        .unwrap();
        prop_assert_eq!(generated.dates.first().copied(), Some(effective));
        prop_assert_eq!(generated.dates.last().copied(), Some(termination));
        prop_assert!(generated.dates.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn directions_agree_on_whole_periods(
        effective in date_strategy(),
        interval in month_interval(),
        periods in 1i32..8,
    ) {
        // day-of-month roll matching the anchor; days past the 28th are
        // covered by the EOM property below
        prop_assume!(effective.day() <= 28);
        let roll = RollConvention::Day(effective.day());
        let termination = Period::new(interval.multiplier * periods, interval.unit).add(effective).unwrap();
        let forward =
            date_scheduler::get_unadjusted_dates_from_effective_date(effective, termination, interval, roll).unwrap();
        let backward =
            date_scheduler::get_unadjusted_dates_from_termination_date(effective, termination, interval, roll).unwrap();
        prop_assert_eq!(forward.dates.len(), usize::try_from(periods).unwrap() + 1);
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(
            date_scheduler::get_unadjusted_dates(1, effective, termination, interval, roll).unwrap(),
            date_scheduler::get_unadjusted_dates(2, effective, termination, interval, roll).unwrap()
        );
    }

    #[test]
    fn directions_agree_on_month_end_anchors(
        effective in date_strategy(),
        interval in month_interval(),
        periods in 1i32..8,
    ) {
        let effective = effective.end_of_month();
        let termination = Period::new(interval.multiplier * periods, interval.unit)
            .add(effective)
            .unwrap()
            .end_of_month();
        let forward =
            date_scheduler::get_unadjusted_dates_from_effective_date(effective, termination, interval, RollConvention::Eom)
                .unwrap();
        let backward =
            date_scheduler::get_unadjusted_dates_from_termination_date(effective, termination, interval, RollConvention::Eom)
                .unwrap();
        prop_assert_eq!(forward.dates.len(), usize::try_from(periods).unwrap() + 1);
        prop_assert!(forward.dates.iter().all(Date::is_end_of_month));
        prop_assert_eq!(forward.dates, backward.dates);
    }

    #[test]
    fn calculation_periods_are_contiguous(
        effective in date_strategy(),
        length in 40i64..2000,
        interval in month_interval(),
    ) {
        let termination = effective.add_days(length);
        let periods = calculation_period::generate_unadjusted_calculation_dates(
            effective,
            termination,
            effective,
            interval,
            RollConvention::None,
            None,
        )
        .unwrap();
        prop_assert_eq!(periods.first().map(|p| p.unadjusted_start_date), Some(effective));
        prop_assert_eq!(periods.last().map(|p| p.unadjusted_end_date), Some(termination));
        for pair in periods.windows(2) {
            prop_assert_eq!(pair[0].unadjusted_end_date, pair[1].unadjusted_start_date);
        }
        for period in &periods {
            prop_assert!(period.unadjusted_start_date < period.unadjusted_end_date);
        }
    }

    #[test]
    fn following_never_moves_a_date_backwards(date in date_strategy()) {
        let engine = engine();
        let rolled = engine.roll(&["AUSY"], date, "FOLLOWING").unwrap();
        prop_assert!(rolled >= date);
        prop_assert!(engine.is_business_day(&["AUSY"], rolled).unwrap());
    }
}
