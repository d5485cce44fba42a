//! # Orion Engine
//!
//! Calendar engine and schedule generation for the Orion analytics library.
//!
//! This crate wires the core calendar types to reference data:
//!
//! - **Object cache**: the [`ObjectCache`] collaborator the engine reads
//!   date rule profiles and business centre holidays from, with an
//!   in-memory implementation
//! - **Calendar engine**: [`CalendarEngine`] resolves calendar names,
//!   builds consolidated holiday calendars and adjusts dates
//! - **Schedules**: unadjusted roll dates, calculation periods with stubs,
//!   meta schedules, and adjusted payment, reset and fixing dates
//! - **Configuration**: namespace and cache key markers loaded from TOML,
//!   plus `tracing` subscriber setup
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use orion_engine::prelude::*;
//!
//! let config = EngineConfig::default();
//! let cache = InMemoryCache::new();
//! cache
//!     .insert(
//!         config.date_rules_key(),
//!         &DateRules::new(vec![DateRuleProfile::new("Sydney", "AUSY")]),
//!     )
//!     .unwrap();
//! let australia_day = Date::from_ymd(2024, 1, 26).unwrap();
//! cache
//!     .insert(
//!         config.holidays_key("AUSY"),
//!         &BusinessCenterHolidays::new("AUSY").with_holiday(australia_day, "Australia Day"),
//!     )
//!     .unwrap();
//!
//! let engine = CalendarEngine::new(Arc::new(cache), config).unwrap();
//! let rolled = engine.roll(&["Sydney"], australia_day, "FOLLOWING").unwrap();
//! assert_eq!(rolled, Date::from_ymd(2024, 1, 29).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::similar_names)]

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod fpml;
pub mod parser;
pub mod reference_data;
pub mod schedule;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cache::{CacheItem, InMemoryCache, ObjectCache};
    pub use crate::config::{init_tracing, EngineConfig};
    pub use crate::engine::CalendarEngine;
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::fpml::{
        AdjustableDate, BusinessCenters, BusinessDayAdjustments, CalculationPeriod,
        CalculationPeriodDates, CalculationPeriodFrequency, DiscountingType,
        PaymentCalculationPeriod, RelativeDateOffset, ResetDates, ResetRelativeTo,
        StubPeriodType,
    };
    pub use crate::parser::DateRuleParser;
    pub use crate::reference_data::{
        BusinessCenterHolidays, DateRuleProfile, DateRules, HolidayRecord,
    };
    pub use crate::schedule::{
        CalculationPeriodSchedule, CouponDates, MetaScheduleItem, UnadjustedDates,
    };
    pub use orion_core::prelude::*;
}

// Re-export commonly used types at crate root
pub use cache::{CacheItem, InMemoryCache, ObjectCache};
pub use config::{init_tracing, EngineConfig};
pub use engine::CalendarEngine;
pub use error::{EngineError, EngineResult};
pub use parser::DateRuleParser;
