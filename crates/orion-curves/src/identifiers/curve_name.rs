//! Curve-name grammar.
//!
//! A curve name is hyphen-delimited: `<index-name-with-hyphens>[-<tenor>]`.
//! The first segment is the currency. The last segment is a tenor only when
//! it parses as a period and at least two segments precede it, so
//! `AUD-LIBOR-BBA-6M` carries the tenor `6M` while `AUD-LIBOR-BBA` and
//! `AUD-6M` do not.

use std::fmt;
use std::str::FromStr;

use orion_core::types::Period;

use crate::error::{CurveError, CurveResult};

/// A parsed curve name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveName {
    /// First segment, e.g. `AUD`.
    pub currency: String,
    /// Everything before the tenor, e.g. `AUD-LIBOR-BBA`.
    pub index_name: String,
    /// Trailing tenor, e.g. `6M`.
    pub tenor: Option<Period>,
}

impl CurveName {
    /// Builds a curve name from an index name and optional tenor.
    pub fn new(index_name: impl Into<String>, tenor: Option<Period>) -> CurveResult<Self> {
        let index_name = index_name.into();
        let currency = index_name
            .split('-')
            .next()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| CurveError::invalid_identifier(index_name.clone()))?
            .to_string();
        Ok(Self {
            currency,
            index_name,
            tenor,
        })
    }

    /// The tenor as text, e.g. `6M`.
    pub fn tenor_text(&self) -> Option<String> {
        self.tenor.map(|t| t.to_string())
    }
}

/// Parses a curve name.
pub fn parse_curve_name(name: &str) -> CurveResult<CurveName> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.split('-').any(str::is_empty) {
        return Err(CurveError::invalid_identifier(name));
    }
    let segments: Vec<&str> = trimmed.split('-').collect();
    let tenor = match segments.last() {
        Some(last) if segments.len() > 2 => last.parse::<Period>().ok(),
        _ => None,
    };
    let index_name = match tenor {
        Some(_) => segments[..segments.len() - 1].join("-"),
        None => trimmed.to_string(),
    };
    CurveName::new(index_name, tenor)
}

impl fmt::Display for CurveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tenor {
            Some(tenor) => write!(f, "{}-{}", self.index_name, tenor),
            None => write!(f, "{}", self.index_name),
        }
    }
}

impl FromStr for CurveName {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_curve_name(s)
    }
}
