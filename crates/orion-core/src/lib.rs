//! # Orion Core
//!
//! Core date, period and business calendar types for the Orion analytics library.
//!
//! This crate provides the foundational building blocks used throughout Orion:
//!
//! - **Types**: `Date`, `Period`, `Offset`, `DayType` and roll conventions
//! - **Business Day Calendars**: holiday sets keyed by business centre, merged
//!   into consolidated calendars with a weekend + holiday business-day predicate
//! - **Conventions**: business-day rolling (`FOLLOWING`, `MODFOLLOWING`, ...)
//!   and period/offset arithmetic
//! - **Date Rules**: helpers for deriving holidays (Easter, nth weekday, equinoxes)
//!   and IMM/futures last trading dates
//!
//! ## Example
//!
//! ```rust
//! use orion_core::prelude::*;
//!
//! let calendar = HolidayCalendar::hell();
//! let saturday = Date::from_ymd(2024, 1, 13).unwrap();
//! let monday = calendar.roll(saturday, BusinessDayConvention::Following).unwrap();
//! assert_eq!(monday, Date::from_ymd(2024, 1, 15).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::cast_possible_truncation)]

pub mod calendars;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        BusinessCalendar, BusinessCenterCalendar, BusinessDayConvention, HolidayCalendar,
        SignificantDay,
    };
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Date, DayType, Offset, Period, PeriodUnit, RollConvention};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Date, DayType, Offset, Period, PeriodUnit, RollConvention};
