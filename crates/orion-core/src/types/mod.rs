//! Domain types for calendar and schedule calculations.
//!
//! - [`Date`]: Calendar date
//! - [`Period`]: Signed multiple of a [`PeriodUnit`]
//! - [`Offset`]: Period plus [`DayType`]
//! - [`RollConvention`]: Day on which regular schedule dates fall

mod date;
mod period;
mod roll_convention;

pub use date::{days_in_month, is_leap_year, Date};
pub use period::{DayType, Offset, Period, PeriodUnit};
pub use roll_convention::RollConvention;
