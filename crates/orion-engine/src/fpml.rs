//! FpML-style date and schedule types consumed by the calendar engine.

use std::fmt;
use std::str::FromStr;

use orion_core::calendars::BusinessDayConvention;
use orion_core::{Date, DayType, Period, RollConvention};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// An ordered list of business centre codes or calendar names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BusinessCenters {
    /// Centre codes, e.g. `["AUSY", "GBLO"]`.
    pub business_centers: Vec<String>,
}

impl BusinessCenters {
    /// Wraps a list of centres.
    #[must_use]
    pub fn new<S: Into<String>>(centers: impl IntoIterator<Item = S>) -> Self {
        Self {
            business_centers: centers.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits `"AUSY-GBLO"` or `"AUSY,GBLO"` into centres. Blank segments are skipped.
    #[must_use]
    pub fn parse(centers: &str) -> Self {
        Self::new(
            centers
                .split(['-', ','])
                .map(str::trim)
                .filter(|segment| !segment.is_empty()),
        )
    }

    /// True when no centre is listed.
    pub fn is_empty(&self) -> bool {
        self.business_centers.is_empty()
    }

    /// The centres as string slices.
    pub fn as_slice(&self) -> &[String] {
        &self.business_centers
    }
}

impl fmt::Display for BusinessCenters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.business_centers.join("-"))
    }
}

/// A business day convention applied against a set of centres.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDayAdjustments {
    /// How a non-business day is moved.
    pub business_day_convention: BusinessDayConvention,
    /// Calendars defining business days.
    #[serde(default)]
    pub business_centers: BusinessCenters,
}

impl BusinessDayAdjustments {
    /// Creates adjustments.
    #[must_use]
    pub fn new(business_day_convention: BusinessDayConvention, business_centers: BusinessCenters) -> Self {
        Self {
            business_day_convention,
            business_centers,
        }
    }

    /// No adjustment and no centres.
    #[must_use]
    pub fn none() -> Self {
        Self::new(BusinessDayConvention::None, BusinessCenters::default())
    }

    /// Parses a convention code and a `-` or `,` separated centre list.
    pub fn parse(convention: &str, centers: &str) -> EngineResult<Self> {
        Ok(Self::new(convention.parse()?, BusinessCenters::parse(centers)))
    }
}

/// An unadjusted date with optional adjustments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustableDate {
    /// The date before adjustment.
    pub unadjusted_date: Date,
    /// Adjustments; `None` leaves the date as is.
    #[serde(default)]
    pub date_adjustments: Option<BusinessDayAdjustments>,
}

impl AdjustableDate {
    /// Creates an adjustable date.
    #[must_use]
    pub fn new(unadjusted_date: Date, date_adjustments: Option<BusinessDayAdjustments>) -> Self {
        Self {
            unadjusted_date,
            date_adjustments,
        }
    }

    /// Parses a convention code and centre list for `unadjusted_date`.
    pub fn parse(unadjusted_date: Date, convention: &str, centers: &str) -> EngineResult<Self> {
        Ok(Self::new(
            unadjusted_date,
            Some(BusinessDayAdjustments::parse(convention, centers)?),
        ))
    }
}

/// An offset from a reference date, rolled against a set of centres.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeDateOffset {
    /// Offset period.
    pub period: Period,
    /// Day type; `None` when unspecified.
    #[serde(default)]
    pub day_type: Option<DayType>,
    /// Convention applied to the offset date.
    pub business_day_convention: BusinessDayConvention,
    /// Centres; `None` means the weekend-only calendar.
    #[serde(default)]
    pub business_centers: Option<BusinessCenters>,
}

impl RelativeDateOffset {
    /// Creates an offset.
    #[must_use]
    pub fn new(
        period: Period,
        day_type: Option<DayType>,
        business_day_convention: BusinessDayConvention,
        business_centers: Option<BusinessCenters>,
    ) -> Self {
        Self {
            period,
            day_type,
            business_day_convention,
            business_centers,
        }
    }
}

/// Which end of a schedule carries the irregular period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StubPeriodType {
    /// Initial period shorter than the regular interval.
    ShortInitial,
    /// Initial period longer than the regular interval.
    LongInitial,
    /// Final period shorter than the regular interval.
    ShortFinal,
    /// Final period longer than the regular interval.
    LongFinal,
}

impl StubPeriodType {
    /// True for the two initial stub types.
    pub fn is_initial(self) -> bool {
        matches!(self, StubPeriodType::ShortInitial | StubPeriodType::LongInitial)
    }
}

impl fmt::Display for StubPeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StubPeriodType::ShortInitial => "ShortInitial",
            StubPeriodType::LongInitial => "LongInitial",
            StubPeriodType::ShortFinal => "ShortFinal",
            StubPeriodType::LongFinal => "LongFinal",
        };
        write!(f, "{name}")
    }
}

impl FromStr for StubPeriodType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shortinitial" => Ok(StubPeriodType::ShortInitial),
            "longinitial" => Ok(StubPeriodType::LongInitial),
            "shortfinal" => Ok(StubPeriodType::ShortFinal),
            "longfinal" => Ok(StubPeriodType::LongFinal),
            _ => Err(EngineError::invalid_argument(format!(
                "Unknown stub period type: {s}"
            ))),
        }
    }
}

/// Parses an optional stub type, treating blank input as absent.
pub fn parse_stub_period_type(s: Option<&str>) -> EngineResult<Option<StubPeriodType>> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some),
    }
}

/// One calculation period, before and after adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationPeriod {
    /// Unadjusted accrual start.
    pub unadjusted_start_date: Date,
    /// Unadjusted accrual end.
    pub unadjusted_end_date: Date,
    /// Adjusted accrual start, once set.
    #[serde(default)]
    pub adjusted_start_date: Option<Date>,
    /// Adjusted accrual end, once set.
    #[serde(default)]
    pub adjusted_end_date: Option<Date>,
}

impl CalculationPeriod {
    /// An unadjusted period.
    #[must_use]
    pub fn unadjusted(start: Date, end: Date) -> Self {
        Self {
            unadjusted_start_date: start,
            unadjusted_end_date: end,
            adjusted_start_date: None,
            adjusted_end_date: None,
        }
    }

    /// The same period with adjusted dates set.
    #[must_use]
    pub fn with_adjusted(mut self, start: Date, end: Date) -> Self {
        self.adjusted_start_date = Some(start);
        self.adjusted_end_date = Some(end);
        self
    }
}

/// How the payment date of a period is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiscountingType {
    /// Paid at the end of the period.
    #[default]
    Standard,
    /// FRA discounting: paid at the start of the period.
    #[serde(rename = "FRA")]
    Fra,
    /// FRA yield discounting: paid at the start of the period.
    #[serde(rename = "FRAYield")]
    FraYield,
}

/// A payment date and the calculation periods it settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCalculationPeriod {
    /// Adjusted payment date.
    pub adjusted_payment_date: Date,
    /// Periods settled on that date.
    pub calculation_periods: Vec<CalculationPeriod>,
}

/// Regular period length and the day regular dates fall on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationPeriodFrequency {
    /// Regular period length.
    pub period: Period,
    /// Day of month regular dates fall on.
    #[serde(default)]
    pub roll_convention: RollConvention,
}

impl CalculationPeriodFrequency {
    /// Creates a frequency.
    #[must_use]
    pub fn new(period: Period, roll_convention: RollConvention) -> Self {
        Self {
            period,
            roll_convention,
        }
    }

    /// The regular interval.
    pub fn interval(&self) -> Period {
        self.period
    }
}

/// Terms defining a stream's calculation periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationPeriodDates {
    /// First accrual start.
    pub effective_date: AdjustableDate,
    /// Last accrual end.
    pub termination_date: AdjustableDate,
    /// Regular period length and roll day.
    pub calculation_period_frequency: CalculationPeriodFrequency,
    /// Adjustments applied to every period boundary.
    pub calculation_period_dates_adjustments: BusinessDayAdjustments,
    /// Accrual start overriding the effective date.
    #[serde(default)]
    pub first_period_start_date: Option<AdjustableDate>,
    /// Start of the first regular period.
    #[serde(default)]
    pub first_regular_period_start_date: Option<Date>,
    /// End of the last regular period.
    #[serde(default)]
    pub last_regular_period_end_date: Option<Date>,
    /// Preferred stub shape.
    #[serde(default)]
    pub stub_period_type: Option<StubPeriodType>,
}

impl CalculationPeriodDates {
    /// Regular schedule between two dates with no stub overrides.
    #[must_use]
    pub fn new(
        effective_date: AdjustableDate,
        termination_date: AdjustableDate,
        calculation_period_frequency: CalculationPeriodFrequency,
        calculation_period_dates_adjustments: BusinessDayAdjustments,
    ) -> Self {
        Self {
            effective_date,
            termination_date,
            calculation_period_frequency,
            calculation_period_dates_adjustments,
            first_period_start_date: None,
            first_regular_period_start_date: None,
            last_regular_period_end_date: None,
            stub_period_type: None,
        }
    }
}

/// Which calculation period date a reset is fixed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResetRelativeTo {
    /// Reset on the period start.
    CalculationPeriodStartDate,
    /// Reset on the period end.
    CalculationPeriodEndDate,
}

/// Reset and fixing terms of a floating stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetDates {
    /// Anchor of each reset within its calculation period.
    pub reset_relative_to: ResetRelativeTo,
    /// Fixing offset from each reset date.
    pub fixing_dates: RelativeDateOffset,
    /// Reset frequency.
    pub reset_frequency: Period,
    /// Adjustments applied to reset dates.
    pub reset_dates_adjustments: BusinessDayAdjustments,
}
