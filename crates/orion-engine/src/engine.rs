//! The calendar engine facade.
//!
//! `CalendarEngine` resolves calendar names against the date rule profiles in
//! an [`ObjectCache`], builds consolidated holiday calendars from the cached
//! business centre holidays, and uses them to adjust dates and schedules.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use orion_engine::{CalendarEngine, EngineConfig, InMemoryCache};
//!
//! let cache = Arc::new(InMemoryCache::new());
//! // ... load date rules and holidays into the cache ...
//! let engine = CalendarEngine::new(cache, EngineConfig::default())?;
//! let adjusted = engine.roll(&["Sydney"], date, "MODFOLLOWING")?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use orion_core::calendars::{
    imm, step_business_days, BusinessCalendar, BusinessDayConvention, HolidayCalendar,
    SignificantDay, NONE_CALENDAR,
};
use orion_core::{Date, DayType, Offset, Period, PeriodUnit, RollConvention};
use tracing::{debug, info, warn};

use crate::cache::ObjectCache;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::fpml::{
    AdjustableDate, BusinessCenters, BusinessDayAdjustments, CalculationPeriod,
    CalculationPeriodFrequency, DiscountingType, PaymentCalculationPeriod, RelativeDateOffset,
    ResetDates, ResetRelativeTo,
};
use crate::parser::DateRuleParser;
use crate::reference_data::{BusinessCenterHolidays, DateRules};
use crate::schedule::{date_scheduler, meta, CalculationPeriodSchedule, MetaScheduleItem};

// =============================================================================
// ENGINE
// =============================================================================

/// Business calendar and date adjustment engine backed by an object cache.
#[derive(Clone)]
pub struct CalendarEngine {
    cache: Arc<dyn ObjectCache>,
    config: EngineConfig,
}

impl std::fmt::Debug for CalendarEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CalendarEngine {
    /// Creates an engine over `cache`.
    ///
    /// Fails with [`EngineError::ConfigurationMissing`] when the cache holds no
    /// date rules or no business centre holidays for the namespace.
    pub fn new(cache: Arc<dyn ObjectCache>, config: EngineConfig) -> EngineResult<Self> {
        let engine = Self { cache, config };
        engine.cache_date_rules()?;
        engine.cache_business_center_holidays()?;
        info!(namespace = %engine.config.namespace, "Calendar engine ready");
        Ok(engine)
    }

    /// Creates an engine with the default configuration.
    pub fn with_defaults(cache: Arc<dyn ObjectCache>) -> EngineResult<Self> {
        Self::new(cache, EngineConfig::default())
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn cache_date_rules(&self) -> EngineResult<()> {
        self.require_items(&self.config.date_rules_query())
    }

    fn cache_business_center_holidays(&self) -> EngineResult<()> {
        self.require_items(&self.config.holidays_query())
    }

    fn require_items(&self, query: &str) -> EngineResult<()> {
        let items = self.cache.load_items(query)?;
        if items.is_empty() {
            warn!(query, "Reference data query yielded no results");
            return Err(EngineError::configuration_missing(query));
        }
        debug!(query, count = items.len(), "Reference data available");
        Ok(())
    }

    // =========================================================================
    // REFERENCE DATA
    // =========================================================================

    /// The date rule profiles of the namespace.
    pub fn date_rules(&self) -> EngineResult<DateRules> {
        let key = self.config.date_rules_key();
        self.cache
            .as_ref()
            .load_typed::<DateRules>(&key)?
            .ok_or_else(|| EngineError::configuration_missing(key))
    }

    /// Resolves calendar names against the date rule profiles.
    pub fn date_rule_parser<S: AsRef<str>>(&self, names: &[S]) -> EngineResult<DateRuleParser> {
        Ok(DateRuleParser::new(names, &self.date_rules()?))
    }

    fn business_center_holidays(&self, centre: &str) -> EngineResult<Option<BusinessCenterHolidays>> {
        self.cache
            .as_ref()
            .load_typed::<BusinessCenterHolidays>(&self.config.holidays_key(centre))
    }

    // =========================================================================
    // CALENDARS
    // =========================================================================

    /// Consolidated calendar for a set of business centres.
    ///
    /// Names that resolve to no enabled profile are ignored; when none
    /// resolves, the result is the weekend-only default calendar.
    pub fn to_business_calendar(&self, centres: &BusinessCenters) -> EngineResult<HolidayCalendar> {
        self.build_calendar(centres.as_slice(), None)
    }

    /// Consolidated calendar for the named calendars.
    pub fn get_calendar<S: AsRef<str>>(&self, names: &[S]) -> EngineResult<HolidayCalendar> {
        self.build_calendar(&Self::dedupe(names), None)
    }

    /// Consolidated calendar holding only the holidays of `years`.
    pub fn get_calendar_for_years<S: AsRef<str>>(
        &self,
        years: &[i32],
        names: &[S],
    ) -> EngineResult<HolidayCalendar> {
        self.build_calendar(&Self::dedupe(names), Some(years))
    }

    fn build_calendar<S: AsRef<str>>(
        &self,
        names: &[S],
        years: Option<&[i32]>,
    ) -> EngineResult<HolidayCalendar> {
        let parser = self.date_rule_parser(names)?;
        let centres = parser.fpml_names();
        let days = match years {
            Some(years) => self.get_significant_dates_for_years(years, centres)?,
            None => self.get_significant_dates(centres)?,
        };
        let name = if centres.is_empty() {
            self.config.default_calendar.clone()
        } else {
            parser.calendar_name()
        };
        debug!(calendar = %name, holidays = days.len(), "Built business calendar");
        Ok(HolidayCalendar::new(name, days))
    }

    /// Names of every enabled calendar profile.
    pub fn calendars_supported(&self) -> EngineResult<Vec<String>> {
        let rules = self.date_rules()?;
        let mut calendars: Vec<String> = Vec::new();
        for profile in rules.profiles.iter().filter(|profile| profile.enabled) {
            if !calendars.contains(&profile.name) {
                calendars.push(profile.name.clone());
            }
        }
        Ok(calendars)
    }

    /// Business centre codes of the supported subset of `names`.
    pub fn calendars_supported_for<S: AsRef<str>>(&self, names: &[S]) -> EngineResult<Vec<String>> {
        Ok(self.date_rule_parser(&Self::dedupe(names))?.calendars_supported())
    }

    /// True iff every name resolves to an enabled profile.
    pub fn is_valid_business_calendar<S: AsRef<str>>(&self, names: &[S]) -> EngineResult<bool> {
        Ok(self.date_rule_parser(names)?.is_valid())
    }

    /// The supported business centres of `names`, each mapped to `true`.
    pub fn is_valid_calendar<S: AsRef<str>>(&self, names: &[S]) -> EngineResult<BTreeMap<String, bool>> {
        let mut result = BTreeMap::new();
        for centre in self.calendars_supported_for(names)? {
            result.entry(centre).or_insert(true);
        }
        Ok(result)
    }

    /// Holiday dates of all `centres`, sorted and distinct.
    pub fn get_business_centre_holiday_dates<S: AsRef<str>>(&self, centres: &[S]) -> EngineResult<Vec<Date>> {
        let mut dates = Vec::new();
        for centre in centres {
            if let Some(record) = self.business_center_holidays(centre.as_ref())? {
                dates.extend(record.dates());
            }
        }
        dates.sort();
        dates.dedup();
        Ok(dates)
    }

    /// Significant days of `centres`, attributed to each centre.
    ///
    /// A `NONE` centre stops the lookup; centres with no cached holidays
    /// contribute nothing.
    pub fn get_significant_dates<S: AsRef<str>>(&self, centres: &[S]) -> EngineResult<Vec<SignificantDay>> {
        self.collect_significant_dates(centres, |_| true)
    }

    /// Significant days of `centres` falling in `years`.
    pub fn get_significant_dates_for_years<S: AsRef<str>>(
        &self,
        years: &[i32],
        centres: &[S],
    ) -> EngineResult<Vec<SignificantDay>> {
        self.collect_significant_dates(centres, |date| years.contains(&date.year()))
    }

    fn collect_significant_dates<S: AsRef<str>>(
        &self,
        centres: &[S],
        keep: impl Fn(Date) -> bool,
    ) -> EngineResult<Vec<SignificantDay>> {
        let mut days = Vec::new();
        for centre in centres {
            let centre = centre.as_ref();
            if centre == NONE_CALENDAR {
                return Ok(days);
            }
            match self.business_center_holidays(centre)? {
                Some(record) => days.extend(
                    record
                        .dates()
                        .filter(|date| keep(*date))
                        .map(|date| SignificantDay::new(date, centre)),
                ),
                None => debug!(centre, "No holidays cached for business centre"),
            }
        }
        Ok(days)
    }

    // =========================================================================
    // CALENDAR FUNCTIONS
    // =========================================================================

    /// True if `date` is a business day in every named calendar.
    pub fn is_business_day<S: AsRef<str>>(&self, names: &[S], date: Date) -> EngineResult<bool> {
        Ok(self.get_calendar(names)?.is_business_day(date))
    }

    /// True if `date` is a weekend or holiday in any named calendar.
    pub fn is_holiday<S: AsRef<str>>(&self, names: &[S], date: Date) -> EngineResult<bool> {
        Ok(self.get_calendar(names)?.is_holiday(date))
    }

    /// Every holiday held in `[start, end]`, weekend-dated ones included.
    pub fn holidays_between<S: AsRef<str>>(&self, names: &[S], start: Date, end: Date) -> EngineResult<Vec<Date>> {
        Ok(self.get_calendar(names)?.holidays_between_dates(start, end))
    }

    /// Business days in `[start, end]`.
    pub fn business_days_between<S: AsRef<str>>(
        &self,
        names: &[S],
        start: Date,
        end: Date,
    ) -> EngineResult<Vec<Date>> {
        Ok(self.get_calendar(names)?.business_days_between_dates(start, end))
    }

    /// Advances `date` by a period such as `"3M"` or `"-2D"`, then rolls.
    ///
    /// An empty day type counts calendar days.
    pub fn advance<S: AsRef<str>>(
        &self,
        names: &[S],
        date: Date,
        day_type: &str,
        period: &str,
        convention: &str,
    ) -> EngineResult<Date> {
        let calendar = self.get_calendar(names)?;
        let day_type = if day_type.is_empty() {
            DayType::Calendar
        } else {
            day_type.parse()?
        };
        let offset = Offset::new(period.parse()?, Some(day_type));
        Ok(calendar.advance_offset(date, &offset, convention.parse()?)?)
    }

    /// Rolls `date` with a business day convention code.
    pub fn roll<S: AsRef<str>>(&self, names: &[S], date: Date, convention: &str) -> EngineResult<Date> {
        Ok(self.get_calendar(names)?.roll(date, convention.parse()?)?)
    }

    /// Sorted, comma separated, lower-cased list.
    pub fn array_to_sorted_string_list<S: AsRef<str>>(items: &[S]) -> String {
        let mut list: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
        list.sort_unstable();
        list.join(",").to_lowercase()
    }

    /// Distinct names in first-seen order.
    pub fn dedupe<S: AsRef<str>>(names: &[S]) -> Vec<String> {
        let mut result: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if !result.iter().any(|seen| seen == name) {
                result.push(name.to_string());
            }
        }
        result
    }

    /// Last trading day of a futures code such as `"EDZ4"`.
    ///
    /// A one digit year resolves to the first matching year on or after the
    /// decade of `reference`.
    pub fn last_trading_day(&self, reference: Date, futures_code: &str) -> EngineResult<Date> {
        Ok(imm::break_code_into_prefix_and_year(futures_code)?.last_trading_day(reference)?)
    }

    /// IMM last trading days of each year, optionally main cycle only.
    pub fn last_trading_days(years: &[i32], main_cycle: bool) -> EngineResult<Vec<Date>> {
        let mut days = Vec::new();
        for &year in years {
            days.extend(imm::last_trading_days(year, main_cycle)?);
        }
        Ok(days)
    }

    // =========================================================================
    // ADJUSTED DATES
    // =========================================================================

    fn adjustment_calendar(&self, adjustments: &BusinessDayAdjustments) -> EngineResult<Option<HolidayCalendar>> {
        if adjustments.business_day_convention == BusinessDayConvention::None {
            return Ok(None);
        }
        self.to_business_calendar(&adjustments.business_centers).map(Some)
    }

    /// Applies the date's adjustments.
    ///
    /// No adjustments or a `NONE` convention returns the unadjusted date,
    /// without consulting any calendar.
    pub fn to_adjusted_date(&self, date: &AdjustableDate) -> EngineResult<Date> {
        match &date.date_adjustments {
            Some(adjustments) => self.to_adjusted_date_with_adjustments(date.unadjusted_date, adjustments),
            None => Ok(date.unadjusted_date),
        }
    }

    /// Offsets `reference` and rolls the result.
    ///
    /// Without a day type or without centres the offset counts calendar
    /// days; without centres the weekend-only calendar is used.
    pub fn to_adjusted_date_relative(&self, reference: Date, offset: &RelativeDateOffset) -> EngineResult<Date> {
        if offset.business_day_convention == BusinessDayConvention::None {
            return Ok(reference);
        }
        let (calendar, day_type) = match &offset.business_centers {
            Some(centres) => (
                self.to_business_calendar(centres)?,
                offset.day_type.unwrap_or(DayType::Calendar),
            ),
            None => (HolidayCalendar::hell(), DayType::Calendar),
        };
        let advance = Offset::new(offset.period, Some(day_type));
        Ok(calendar.advance_offset(reference, &advance, offset.business_day_convention)?)
    }

    /// Adjusts `date` with a convention code and a `-` or `,` separated centre list.
    pub fn to_adjusted_date_str(&self, date: Date, convention: &str, centres: &str) -> EngineResult<Date> {
        self.to_adjusted_date(&AdjustableDate::parse(date, convention, centres)?)
    }

    /// Rolls `date` with the given adjustments.
    pub fn to_adjusted_date_with_adjustments(
        &self,
        date: Date,
        adjustments: &BusinessDayAdjustments,
    ) -> EngineResult<Date> {
        match self.adjustment_calendar(adjustments)? {
            Some(calendar) => Ok(calendar.roll(date, adjustments.business_day_convention)?),
            None => Ok(date),
        }
    }

    /// Offsets `date`, rolling after every business day step.
    ///
    /// Business day offsets are only supported in days; a negative count
    /// steps backwards. Calendar offsets are plain period arithmetic.
    pub fn to_adjusted_date_with_offset(
        &self,
        date: Date,
        adjustments: &BusinessDayAdjustments,
        offset: &Offset,
    ) -> EngineResult<Date> {
        let day_type = offset.day_type.unwrap_or(DayType::Calendar);
        match day_type {
            DayType::Business => {
                if offset.period.unit != PeriodUnit::Day {
                    return Err(EngineError::not_supported(format!(
                        "{} not supported in conjunction with '{} day type'",
                        offset.period.unit, day_type
                    )));
                }
                let calendar = self.to_business_calendar(&adjustments.business_centers)?;
                let step = if offset.period.multiplier < 0 { -1 } else { 1 };
                let mut current = date;
                for _ in 0..offset.period.multiplier.unsigned_abs() {
                    current = calendar.roll(current.add_days(step), adjustments.business_day_convention)?;
                }
                Ok(current)
            }
            DayType::Calendar => Ok(offset.add(date)?),
        }
    }

    /// Adds a tenor to `date`.
    ///
    /// Defaults: the weekend-only calendar, `FOLLOWING`, and business days for
    /// day tenors or calendar days otherwise.
    pub fn add_period(
        &self,
        date: Date,
        tenor: &str,
        calendars: &str,
        convention: &str,
        day_type: &str,
    ) -> EngineResult<Date> {
        let calendars = if calendars.is_empty() {
            orion_core::calendars::HELL_CALENDAR
        } else {
            calendars
        };
        let calendar = self.to_business_calendar(&BusinessCenters::parse(calendars))?;
        Self::add_period_with(&calendar, date, tenor, convention, day_type)
    }

    /// Adds each tenor to `date` with one calendar built from `calendars`.
    pub fn add_periods<S: AsRef<str>, C: AsRef<str>>(
        &self,
        date: Date,
        day_type: &str,
        tenors: &[S],
        convention: &str,
        calendars: &[C],
    ) -> EngineResult<Vec<Date>> {
        let calendar = self.calendar_from_names(calendars)?;
        tenors
            .iter()
            .map(|tenor| Self::add_period_with(&calendar, date, tenor.as_ref(), convention, day_type))
            .collect()
    }

    /// Adds `tenor` to each date with one calendar built from `calendars`.
    pub fn add_periods_to_dates<C: AsRef<str>>(
        &self,
        dates: &[Date],
        day_type: &str,
        tenor: &str,
        convention: &str,
        calendars: &[C],
    ) -> EngineResult<Vec<Date>> {
        let calendar = self.calendar_from_names(calendars)?;
        dates
            .iter()
            .map(|date| Self::add_period_with(&calendar, *date, tenor, convention, day_type))
            .collect()
    }

    fn calendar_from_names<C: AsRef<str>>(&self, calendars: &[C]) -> EngineResult<HolidayCalendar> {
        let joined = calendars.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("-");
        self.to_business_calendar(&BusinessCenters::parse(&joined))
    }

    fn add_period_with(
        calendar: &HolidayCalendar,
        date: Date,
        tenor: &str,
        convention: &str,
        day_type: &str,
    ) -> EngineResult<Date> {
        let period: Period = tenor.parse()?;
        let convention = if convention.is_empty() {
            BusinessDayConvention::Following
        } else {
            convention.parse()?
        };
        let day_type = if day_type.is_empty() {
            if period.unit == PeriodUnit::Day {
                DayType::Business
            } else {
                DayType::Calendar
            }
        } else {
            day_type.parse()?
        };
        Ok(calendar.advance_offset(date, &Offset::new(period, Some(day_type)), convention)?)
    }

    // =========================================================================
    // SCHEDULES
    // =========================================================================

    /// Rolls forward from the effective date, then adjusts every date.
    pub fn adjusted_dates_from_effective_date(
        &self,
        effective_date: Date,
        termination_date: Date,
        period_interval: &str,
        roll_convention: &str,
        centres: &str,
        convention: &str,
    ) -> EngineResult<Vec<Date>> {
        let unadjusted = date_scheduler::unadjusted_dates_from_effective_date(
            effective_date,
            termination_date,
            period_interval,
            roll_convention,
        )?;
        self.adjusted_date_schedule(&unadjusted.dates, &BusinessDayAdjustments::parse(convention, centres)?)
    }

    /// Rolls backward from the termination date, then adjusts every date.
    pub fn adjusted_dates_from_termination_date(
        &self,
        effective_date: Date,
        termination_date: Date,
        period_interval: &str,
        roll_convention: &str,
        centres: &str,
        convention: &str,
    ) -> EngineResult<Vec<Date>> {
        let unadjusted = date_scheduler::unadjusted_dates_from_termination_date(
            effective_date,
            termination_date,
            period_interval,
            roll_convention,
        )?;
        self.adjusted_date_schedule(&unadjusted.dates, &BusinessDayAdjustments::parse(convention, centres)?)
    }

    /// Adjusts every date with one calendar.
    pub fn adjusted_date_schedule(
        &self,
        dates: &[Date],
        adjustments: &BusinessDayAdjustments,
    ) -> EngineResult<Vec<Date>> {
        match self.adjustment_calendar(adjustments)? {
            Some(calendar) => dates
                .iter()
                .map(|date| Ok(calendar.roll(*date, adjustments.business_day_convention)?))
                .collect(),
            None => Ok(dates.to_vec()),
        }
    }

    /// Adjusted start dates of the calculation periods anchored on a first
    /// regular period date.
    #[allow(clippy::too_many_arguments)]
    pub fn get_adjusted_calculation_period_dates<S: AsRef<str>>(
        &self,
        effective_date: Date,
        termination_date: Date,
        period_interval: &str,
        roll_convention: &str,
        first_regular_period_date: Date,
        stub_period_type: Option<&str>,
        calendars: &[S],
        convention: &str,
    ) -> EngineResult<Vec<Date>> {
        let starts = date_scheduler::get_unadjusted_calculation_period_dates(
            effective_date,
            termination_date,
            period_interval,
            roll_convention,
            first_regular_period_date,
            stub_period_type,
        )?;
        let calendar = self.get_calendar(calendars)?;
        let convention: BusinessDayConvention = convention.parse()?;
        starts
            .into_iter()
            .map(|date| Ok(calendar.advance(date, 0, PeriodUnit::Day, DayType::Calendar, convention)?))
            .collect()
    }

    /// Regular calculation periods over `interval_to_termination` with
    /// adjusted boundaries.
    pub fn get_adjusted_calculation_date_schedule(
        &self,
        effective_date: Date,
        interval_to_termination: Period,
        period_interval: Period,
        adjustments: &BusinessDayAdjustments,
    ) -> EngineResult<Vec<CalculationPeriod>> {
        let schedule = CalculationPeriodSchedule::from_term(effective_date, interval_to_termination, period_interval)?;
        let calendar = self.adjustment_calendar(adjustments)?;
        let adjust = |date: Date| -> EngineResult<Date> {
            match &calendar {
                Some(calendar) => Ok(calendar.roll(date, adjustments.business_day_convention)?),
                None => Ok(date),
            }
        };
        schedule
            .into_periods()
            .into_iter()
            .map(|period| {
                let start = adjust(period.unadjusted_start_date)?;
                let end = adjust(period.unadjusted_end_date)?;
                Ok(period.with_adjusted(start, end))
            })
            .collect()
    }

    /// One payment per calculation period: on the adjusted end date for
    /// standard discounting, otherwise on the adjusted start date.
    pub fn get_adjusted_payment_calculation_date_schedule(
        &self,
        effective_date: Date,
        interval_to_termination: Period,
        period_interval: Period,
        adjustments: &BusinessDayAdjustments,
        discounting_type: DiscountingType,
    ) -> EngineResult<Vec<PaymentCalculationPeriod>> {
        let periods = self.get_adjusted_calculation_date_schedule(
            effective_date,
            interval_to_termination,
            period_interval,
            adjustments,
        )?;
        Ok(periods
            .into_iter()
            .map(|period| {
                let payment = if discounting_type == DiscountingType::Standard {
                    period.adjusted_end_date
                } else {
                    period.adjusted_start_date
                };
                PaymentCalculationPeriod {
                    adjusted_payment_date: payment.unwrap_or(period.unadjusted_end_date),
                    calculation_periods: vec![period],
                }
            })
            .collect())
    }

    /// Regular dates over `interval_to_termination`, rolled and distinct.
    pub fn get_adjusted_date_schedule(
        &self,
        effective_date: Date,
        interval_to_termination: Period,
        period_interval: Period,
        adjustments: &BusinessDayAdjustments,
    ) -> EngineResult<Vec<Date>> {
        let unadjusted =
            date_scheduler::get_unadjusted_date_schedule(effective_date, interval_to_termination, period_interval)?;
        let calendar = self.to_business_calendar(&adjustments.business_centers)?;
        let mut dates: Vec<Date> = Vec::with_capacity(unadjusted.len());
        for date in unadjusted {
            let rolled = calendar.roll(date, adjustments.business_day_convention)?;
            if !dates.contains(&rolled) {
                dates.push(rolled);
            }
        }
        Ok(dates)
    }

    /// Meta schedule from rows of `(roll frequency, period, roll convention)` text.
    pub fn get_meta_dates_schedule<S: AsRef<str>>(
        &self,
        rows: &[[S; 3]],
        start: Date,
        calendar: &str,
        convention: &str,
    ) -> EngineResult<Vec<Date>> {
        let items = rows
            .iter()
            .map(|[frequency, period, roll]| MetaScheduleItem::parse(frequency.as_ref(), period.as_ref(), roll.as_ref()))
            .collect::<EngineResult<Vec<_>>>()?;
        self.get_dates_schedule(&items, start, calendar, convention)
    }

    /// Meta schedule dates, adjusted unless the calendar or convention is empty.
    pub fn get_dates_schedule(
        &self,
        items: &[MetaScheduleItem],
        start: Date,
        calendar: &str,
        convention: &str,
    ) -> EngineResult<Vec<Date>> {
        if calendar.is_empty() || convention.is_empty() {
            return meta::unadjusted_dates_from_meta(items, start);
        }
        self.get_adjusted_dates(items, start, &BusinessDayAdjustments::parse(convention, calendar)?)
    }

    /// Adjusted meta schedule dates after `start`.
    pub fn get_adjusted_dates(
        &self,
        items: &[MetaScheduleItem],
        start: Date,
        adjustments: &BusinessDayAdjustments,
    ) -> EngineResult<Vec<Date>> {
        let unadjusted = meta::unadjusted_dates_from_meta(items, start)?;
        self.adjusted_date_schedule(&unadjusted, adjustments)
    }

    /// Adjusted dates every `interval` between `start` and `end`.
    pub fn get_adjusted_dates2(
        &self,
        start: Date,
        end: Date,
        interval: Period,
        roll_convention: RollConvention,
        backward: bool,
        adjustments: &BusinessDayAdjustments,
    ) -> EngineResult<Vec<Date>> {
        let unadjusted = meta::unadjusted_dates_2(start, end, interval, roll_convention, backward)?;
        self.adjusted_date_schedule(&unadjusted, adjustments)
    }

    /// Adjusted dates laid out segment by segment between `start` and `end`.
    pub fn get_adjusted_dates3(
        &self,
        start: Date,
        end: Date,
        items: &[MetaScheduleItem],
        backward: bool,
        adjustments: &BusinessDayAdjustments,
    ) -> EngineResult<Vec<Date>> {
        let unadjusted = meta::unadjusted_dates_3(start, end, items, backward)?;
        self.adjusted_date_schedule(&unadjusted, adjustments)
    }

    // =========================================================================
    // FIXING AND RESET DATES
    // =========================================================================

    /// Fixing date of each adjusted reset date.
    ///
    /// Only non-positive business day offsets are supported: each fixing date
    /// is `|n|` business days before its reset date.
    pub fn get_fixing_dates(
        &self,
        fixing_offset: &RelativeDateOffset,
        adjusted_reset_dates: &[Date],
    ) -> EngineResult<Vec<Date>> {
        let period = fixing_offset.period;
        let supported = fixing_offset.day_type == Some(DayType::Business)
            && period.unit == PeriodUnit::Day
            && period.multiplier <= 0;
        if !supported {
            let day_type = fixing_offset
                .day_type
                .map_or_else(|| "Unspecified".to_string(), |day_type| day_type.to_string());
            return Err(EngineError::not_supported(format!(
                "[{day_type} {} {} days] fixing day offset is not supported.",
                period.unit, period.multiplier
            )));
        }
        let calendar = match &fixing_offset.business_centers {
            Some(centres) => self.to_business_calendar(centres)?,
            None => HolidayCalendar::hell(),
        };
        Ok(adjusted_reset_dates
            .iter()
            .map(|reset| step_business_days(&calendar, *reset, period.multiplier))
            .collect())
    }

    /// Fixing dates for a stream's reset terms.
    pub fn get_fixing_dates_for_resets(
        &self,
        reset_dates: &ResetDates,
        adjusted_reset_dates: &[Date],
    ) -> EngineResult<Vec<Date>> {
        self.get_fixing_dates(&reset_dates.fixing_dates, adjusted_reset_dates)
    }

    /// Adjusted reset date of each calculation period.
    ///
    /// The reset frequency must equal the calculation period frequency.
    pub fn get_reset_dates(
        &self,
        reset_dates: &ResetDates,
        calculation_frequency: &CalculationPeriodFrequency,
        periods: &[CalculationPeriod],
    ) -> EngineResult<Vec<Date>> {
        let reset = reset_dates.reset_frequency;
        let calculation = calculation_frequency.period;
        if reset.unit != calculation.unit {
            return Err(EngineError::not_supported(format!(
                "Reset period type ({}) and calculation period type ({}) are different. This is not supported.",
                reset.unit, calculation.unit
            )));
        }
        if reset.multiplier != calculation.multiplier {
            return Err(EngineError::not_supported(format!(
                "Reset period frequency ({reset}) is not equal to calculation period frequency ({calculation}). This is not supported."
            )));
        }
        let unadjusted: Vec<Date> = periods
            .iter()
            .map(|period| match reset_dates.reset_relative_to {
                ResetRelativeTo::CalculationPeriodStartDate => period.unadjusted_start_date,
                ResetRelativeTo::CalculationPeriodEndDate => period.unadjusted_end_date,
            })
            .collect();
        self.adjusted_date_schedule(&unadjusted, &reset_dates.reset_dates_adjustments)
    }
}
