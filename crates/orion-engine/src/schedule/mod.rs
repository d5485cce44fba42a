//! Unadjusted schedule generation.
//!
//! - [`date_scheduler`]: regular roll dates between two dates, forward or backward
//! - [`calculation_period`]: calculation periods with initial and final stubs
//! - [`meta`]: roll dates driven by a list of frequency segments

pub mod calculation_period;
pub mod date_scheduler;
pub mod meta;

pub use calculation_period::CalculationPeriodSchedule;
pub use date_scheduler::{CouponDates, UnadjustedDates};
pub use meta::MetaScheduleItem;
