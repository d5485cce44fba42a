//! IMM dates and short-term interest rate futures codes.
//!
//! Futures expire on the third Wednesday of the contract month. Contract
//! months are identified by a single letter (`F` = January ... `Z` =
//! December) followed by the last digit of the year, e.g. `H4` for March 2024.
//! Exchange codes prefix that with the contract, e.g. `EDZ5` or `IRH4`.

use chrono::Weekday;
use std::fmt;

use super::rules::nth_weekday_in_month;
use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Contract month letters, January first.
pub const MONTH_CODES: [char; 12] = ['F', 'G', 'H', 'J', 'K', 'M', 'N', 'Q', 'U', 'V', 'X', 'Z'];

/// Quarterly (main cycle) contract month letters.
pub const MAIN_CYCLE_CODES: [char; 4] = ['H', 'M', 'U', 'Z'];

/// Recognised exchange contract prefixes.
pub const FUTURES_CODE_PREFIXES: [&str; 12] = [
    "ED", "ER", "RA", "BAX", "L", "ES", "EY", "HR", "IR", "IB", "W", "ICE_B",
];

const YEARS_IN_DECADE: i32 = 10;

/// The third Wednesday of a month.
pub fn third_wednesday(year: i32, month: u32) -> CoreResult<Date> {
    nth_weekday_in_month(year, month, 3, Weekday::Wed)
}

/// True when `date` can be a last trading date: a Wednesday between the 15th
/// and the 21st, in a quarterly month when `main_cycle` is set.
#[must_use]
pub fn is_last_trading_date(date: Date, main_cycle: bool) -> bool {
    if date.weekday() != Weekday::Wed || date.day() < 15 || date.day() > 21 {
        return false;
    }
    !main_cycle || date.month() % 3 == 0
}

/// The first last trading date strictly after `reference`.
pub fn next_last_trading_date(reference: Date, main_cycle: bool) -> CoreResult<Date> {
    let cycle: u32 = if main_cycle { 3 } else { 1 };
    let mut reference = reference;
    loop {
        let mut year = reference.year();
        let mut month = reference.month();
        let skip = cycle - month % cycle;
        if skip != cycle || reference.day() > 21 {
            month += skip;
            if month > 12 {
                month -= 12;
                year += 1;
            }
        }
        let candidate = third_wednesday(year, month)?;
        if candidate > reference {
            return Ok(candidate);
        }
        reference = Date::from_ymd(year, month, 22)?;
    }
}

/// Last trading dates of a year: quarterly when `main_cycle`, else monthly.
pub fn last_trading_days(year: i32, main_cycle: bool) -> CoreResult<Vec<Date>> {
    let step = if main_cycle { 3 } else { 1 };
    (1..=12)
        .step_by(step)
        .map(|month| next_last_trading_date(Date::from_ymd(year, month, 1)?, main_cycle))
        .collect()
}

/// Letter for a contract month (1-12).
#[must_use]
pub fn code_for_month(month: u32) -> Option<char> {
    MONTH_CODES.get((month as usize).checked_sub(1)?).copied()
}

/// Contract month (1-12) for a letter, case-insensitive.
#[must_use]
pub fn month_for_code(code: char) -> Option<u32> {
    let upper = code.to_ascii_uppercase();
    MONTH_CODES
        .iter()
        .position(|c| *c == upper)
        .map(|index| index as u32 + 1)
}

/// Absolute futures code (`"H4"`) of a last trading date.
#[must_use]
pub fn futures_code(date: Date) -> Option<String> {
    if !is_last_trading_date(date, false) {
        return None;
    }
    code_for_month(date.month())
        .map(|code| format!("{code}{}", date.year().rem_euclid(YEARS_IN_DECADE)))
}

/// Absolute code of the next contract expiring after `reference`.
pub fn next_futures_code(reference: Date, main_cycle: bool) -> CoreResult<String> {
    let date = next_last_trading_date(reference, main_cycle)?;
    futures_code(date)
        .ok_or_else(|| CoreError::invalid_date(format!("{date} is not a last trading date")))
}

/// Code of the nearest quarterly contract that has not expired on `reference`.
pub fn next_absolute_main_cycle_code(reference: Date) -> CoreResult<String> {
    let mut year = reference.year();
    let mut month = reference.month();
    if month % 3 == 0 && reference >= third_wednesday(year, month)? {
        if month == 12 {
            month = 1;
            year += 1;
        } else {
            month += 1;
        }
    }
    let quarter_month = month.div_ceil(3) * 3;
    let code = code_for_month(quarter_month)
        .ok_or_else(|| CoreError::out_of_range(format!("month {quarter_month}")))?;
    Ok(format!("{code}{}", year.rem_euclid(YEARS_IN_DECADE)))
}

/// The quarterly contract following an absolute code: `H8` -> `M8`, `Z9` -> `H0`.
pub fn following_main_cycle_code(absolute_code: &str) -> CoreResult<String> {
    let not_absolute = || {
        CoreError::invalid_argument(format!(
            "{absolute_code} is not recognised as absolute futures code. Examples are: 'H8', 'Z9', etc"
        ))
    };
    let mut chars = absolute_code.chars();
    let (Some(month_code), Some(year_char), None) = (chars.next(), chars.next(), chars.next())
    else {
        return Err(not_absolute());
    };
    let year = year_char.to_digit(10).ok_or_else(not_absolute)?;
    let index = MAIN_CYCLE_CODES
        .iter()
        .position(|c| *c == month_code.to_ascii_uppercase())
        .ok_or_else(not_absolute)?;
    if index == MAIN_CYCLE_CODES.len() - 1 {
        Ok(format!("{}{}", MAIN_CYCLE_CODES[0], (year + 1) % 10))
    } else {
        Ok(format!("{}{year}", MAIN_CYCLE_CODES[index + 1]))
    }
}

/// The `nth` (1-based) quarterly contract code from `reference`.
pub fn nth_main_cycle_code(reference: Date, nth: u32) -> CoreResult<String> {
    let mut code = next_absolute_main_cycle_code(reference)?;
    for _ in 1..nth {
        code = following_main_cycle_code(&code)?;
    }
    Ok(code)
}

/// True for two-character absolute codes such as `"Z5"`.
#[must_use]
pub fn is_futures_code(code: &str, main_cycle: bool) -> bool {
    let mut chars = code.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(month), Some(year), None) => {
            let upper = month.to_ascii_uppercase();
            let month_ok = if main_cycle {
                MAIN_CYCLE_CODES.contains(&upper)
            } else {
                MONTH_CODES.contains(&upper)
            };
            month_ok && year.is_ascii_digit()
        }
        _ => false,
    }
}

/// The first year on or after `reference_year` that ends in `last_digit`.
#[must_use]
pub fn next_year(reference_year: i32, last_digit: i32) -> i32 {
    let year = reference_year - reference_year.rem_euclid(YEARS_IN_DECADE) + last_digit;
    if year < reference_year {
        year + YEARS_IN_DECADE
    } else {
        year
    }
}

fn match_prefix(code: &str) -> CoreResult<&'static str> {
    FUTURES_CODE_PREFIXES
        .iter()
        .find(|prefix| code.starts_with(**prefix))
        .copied()
        .ok_or_else(|| {
            CoreError::invalid_argument("Futures code prefix has not been identified as such.")
        })
}

/// A contract prefix with an absolute month/year code, e.g. `EDZ5`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FuturesCode {
    /// Exchange contract prefix.
    pub prefix: &'static str,
    /// Contract month letter.
    pub month_code: char,
    /// Last digit of the contract year.
    pub year_digit: i32,
}

impl FuturesCode {
    /// Contract month (1-12).
    pub fn month(&self) -> CoreResult<u32> {
        month_for_code(self.month_code).ok_or_else(|| {
            CoreError::invalid_argument(format!("{} is not a futures month code", self.month_code))
        })
    }

    /// Expiry of the contract, resolving the year digit against the decade of
    /// `reference`. A digit smaller than the reference year's last digit rolls
    /// into the next decade.
    pub fn last_trading_day(&self, reference: Date) -> CoreResult<Date> {
        let month = self.month()?;
        let reference_year = reference.year();
        let decade = reference_year - reference_year.rem_euclid(YEARS_IN_DECADE);
        let mut year = decade + self.year_digit;
        if self.year_digit < reference_year.rem_euclid(YEARS_IN_DECADE) {
            year += YEARS_IN_DECADE;
        }
        third_wednesday(year, month)
    }
}

impl fmt::Display for FuturesCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prefix, self.month_code, self.year_digit)
    }
}

/// Splits an exchange code such as `"IRH4"` into prefix, month and year digit.
pub fn break_code_into_prefix_and_year(code: &str) -> CoreResult<FuturesCode> {
    let prefix = match_prefix(code)?;
    let rest = &code[prefix.len()..];
    let invalid = || CoreError::invalid_argument(format!("{code} is not a valid futures code!"));
    let mut chars = rest.chars();
    let month_code = chars
        .next()
        .filter(|c| month_for_code(*c).is_some())
        .ok_or_else(invalid)?;
    let year_digit = chars
        .next()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(invalid)?;
    Ok(FuturesCode {
        prefix,
        month_code: month_code.to_ascii_uppercase(),
        year_digit: year_digit as i32,
    })
}

/// True when the code is a prefix followed by a contract position (`"ED3"`).
pub fn is_relative_code(code: &str) -> CoreResult<bool> {
    let prefix = match_prefix(code)?;
    Ok(code[prefix.len()..].parse::<u32>().is_ok())
}

/// Converts a relative code (`"ED2"`: second quarterly contract) into an
/// absolute one (`"EDM4"`) as of `reference`.
pub fn relative_to_absolute_code(code: &str, reference: Date) -> CoreResult<String> {
    let prefix = match_prefix(code)?;
    let position = code[prefix.len()..].parse::<u32>().map_err(|_| {
        CoreError::invalid_argument(format!("{code} is not a relative futures code"))
    })?;
    let absolute = nth_main_cycle_code(reference, position.max(1))?;
    Ok(format!("{prefix}{absolute}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_third_wednesday() {
        assert_eq!(third_wednesday(2024, 3).unwrap(), d(2024, 3, 20));
        assert_eq!(third_wednesday(2024, 6).unwrap(), d(2024, 6, 19));
    }

    #[test]
    fn test_is_last_trading_date() {
        assert!(is_last_trading_date(d(2024, 3, 20), true));
        assert!(!is_last_trading_date(d(2024, 4, 17), true));
        assert!(is_last_trading_date(d(2024, 4, 17), false));
        assert!(!is_last_trading_date(d(2024, 3, 13), false));
    }

    #[test]
    fn test_next_last_trading_date() {
        assert_eq!(
            next_last_trading_date(d(2024, 1, 10), true).unwrap(),
            d(2024, 3, 20)
        );
        // On expiry day the next contract is returned
        assert_eq!(
            next_last_trading_date(d(2024, 3, 20), true).unwrap(),
            d(2024, 6, 19)
        );
        assert_eq!(
            next_last_trading_date(d(2024, 12, 25), true).unwrap(),
            d(2025, 3, 19)
        );
        assert_eq!(
            next_last_trading_date(d(2024, 1, 10), false).unwrap(),
            d(2024, 1, 17)
        );
    }

    #[test]
    fn test_last_trading_days() {
        let days = last_trading_days(2024, true).unwrap();
        assert_eq!(
            days,
            vec![d(2024, 3, 20), d(2024, 6, 19), d(2024, 9, 18), d(2024, 12, 18)]
        );
        assert_eq!(last_trading_days(2024, false).unwrap().len(), 12);
    }

    #[test]
    fn test_codes() {
        assert_eq!(code_for_month(3), Some('H'));
        assert_eq!(code_for_month(13), None);
        assert_eq!(month_for_code('z'), Some(12));
        assert_eq!(futures_code(d(2024, 3, 20)).as_deref(), Some("H4"));
        assert_eq!(next_futures_code(d(2024, 3, 21), true).unwrap(), "M4");
    }

    #[test]
    fn test_main_cycle_codes() {
        assert_eq!(next_absolute_main_cycle_code(d(2024, 1, 10)).unwrap(), "H4");
        assert_eq!(next_absolute_main_cycle_code(d(2024, 3, 20)).unwrap(), "M4");
        assert_eq!(next_absolute_main_cycle_code(d(2024, 12, 20)).unwrap(), "H5");
        assert_eq!(following_main_cycle_code("H8").unwrap(), "M8");
        assert_eq!(following_main_cycle_code("Z9").unwrap(), "H0");
        assert!(following_main_cycle_code("H10").is_err());
        assert_eq!(nth_main_cycle_code(d(2024, 1, 10), 3).unwrap(), "U4");
    }

    #[test]
    fn test_is_futures_code() {
        assert!(is_futures_code("Z5", true));
        assert!(!is_futures_code("F5", true));
        assert!(is_futures_code("f5", false));
        assert!(!is_futures_code("Z", false));
    }

    #[test]
    fn test_break_code_and_resolve_year() {
        let code = break_code_into_prefix_and_year("IRH4").unwrap();
        assert_eq!(code.prefix, "IR");
        assert_eq!(code.month_code, 'H');
        assert_eq!(code.year_digit, 4);
        assert_eq!(code.to_string(), "IRH4");
        assert_eq!(code.last_trading_day(d(2023, 6, 1)).unwrap(), d(2024, 3, 20));

        // Digit below the reference year's digit rolls into the next decade
        let wrapped = break_code_into_prefix_and_year("EDZ1").unwrap();
        assert_eq!(wrapped.last_trading_day(d(2028, 1, 1)).unwrap(), d(2031, 12, 17));

        assert!(break_code_into_prefix_and_year("XXH4").is_err());
        assert!(break_code_into_prefix_and_year("EDA4").is_err());
    }

    #[test]
    fn test_relative_codes() {
        assert!(is_relative_code("ED3").unwrap());
        assert!(!is_relative_code("EDH4").unwrap());
        assert_eq!(
            relative_to_absolute_code("ED2", d(2024, 1, 10)).unwrap(),
            "EDM4"
        );
    }

    #[test]
    fn test_next_year() {
        assert_eq!(next_year(2024, 6), 2026);
        assert_eq!(next_year(2024, 3), 2033);
    }
}
