//! Pricing-structure identifiers.
//!
//! Identifiers address curves in the object cache. The short form is
//! `Type.CurveName[.BaseDate[.Algorithm]]`; the unique form prefixes the
//! market: `Market.{market}.{Type}.{CurveName}`.

use std::fmt;
use std::str::FromStr;

use orion_core::types::{Date, Period};
use serde::{Deserialize, Serialize};

use super::curve_name::parse_curve_name;
use super::pricing_structure_type::PricingStructureType;
use crate::error::{CurveError, CurveResult};

/// Algorithm recorded when none is given.
pub const DEFAULT_ALGORITHM: &str = "Default";

/// Data-type prefix of unique identifiers.
pub const MARKET_DATA_TYPE: &str = "Market";

/// Source system recorded when none is given.
pub const DEFAULT_SOURCE_SYSTEM: &str = "Orion";

/// Identifies one pricing structure (curve, surface or cube).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingStructureIdentifier {
    pricing_structure_type: PricingStructureType,
    curve_name: String,
    base_date: Option<Date>,
    algorithm: String,
    source_system: String,
    market: Option<String>,
    market_date: Option<Date>,
    stress_name: Option<String>,
    explicit_id: Option<String>,
}

impl PricingStructureIdentifier {
    /// Creates an identifier with the default algorithm.
    pub fn new(
        pricing_structure_type: PricingStructureType,
        curve_name: impl Into<String>,
        base_date: Option<Date>,
    ) -> Self {
        Self {
            pricing_structure_type,
            curve_name: curve_name.into(),
            base_date,
            algorithm: DEFAULT_ALGORITHM.to_string(),
            source_system: DEFAULT_SOURCE_SYSTEM.to_string(),
            market: None,
            market_date: None,
            stress_name: None,
            explicit_id: None,
        }
    }

    /// Parses `Type.CurveName[.BaseDate[.Algorithm]]`.
    ///
    /// The parsed string is kept verbatim as the identifier's id.
    pub fn parse(id: &str) -> CurveResult<Self> {
        let parts: Vec<&str> = id.split('.').collect();
        if parts.len() < 2 || parts[1].trim().is_empty() {
            return Err(CurveError::invalid_identifier(id));
        }
        let pricing_structure_type = parts[0]
            .parse::<PricingStructureType>()
            .map_err(|_| CurveError::invalid_identifier(id))?;
        let base_date = match parts.get(2) {
            Some(text) => Some(Date::parse(text).map_err(|_| CurveError::invalid_identifier(id))?),
            None => None,
        };
        let mut identifier = Self::new(pricing_structure_type, parts[1], base_date);
        if let Some(algorithm) = parts.get(3) {
            identifier.algorithm = (*algorithm).to_string();
        }
        identifier.explicit_id = Some(id.to_string());
        Ok(identifier)
    }

    /// Sets the algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    /// Sets the market and optional market date.
    #[must_use]
    pub fn with_market(mut self, market: impl Into<String>, market_date: Option<Date>) -> Self {
        self.market = Some(market.into());
        self.market_date = market_date;
        self
    }

    /// Sets the stress scenario name, appended to the built id.
    #[must_use]
    pub fn with_stress(mut self, stress_name: impl Into<String>) -> Self {
        self.stress_name = Some(stress_name.into());
        self
    }

    /// Sets the source system.
    #[must_use]
    pub fn with_source_system(mut self, source_system: impl Into<String>) -> Self {
        self.source_system = source_system.into();
        self
    }

    /// The pricing-structure type.
    pub fn pricing_structure_type(&self) -> PricingStructureType {
        self.pricing_structure_type
    }

    /// The curve name.
    pub fn curve_name(&self) -> &str {
        &self.curve_name
    }

    /// The base date, if given.
    pub fn base_date(&self) -> Option<Date> {
        self.base_date
    }

    /// The algorithm.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// The market, if given.
    pub fn market(&self) -> Option<&str> {
        self.market.as_deref()
    }

    /// The stress scenario name, if given.
    pub fn stress_name(&self) -> Option<&str> {
        self.stress_name.as_deref()
    }

    /// `{source_system}.Market`.
    pub fn domain(&self) -> String {
        format!("{}.{}", self.source_system, MARKET_DATA_TYPE)
    }

    /// The currency: the first hyphen segment of the curve name.
    pub fn currency(&self) -> &str {
        self.curve_name.split('-').next().unwrap_or_default()
    }

    /// The index name: the curve name without its tenor.
    pub fn index_name(&self) -> CurveResult<String> {
        Ok(parse_curve_name(&self.curve_name)?.index_name)
    }

    /// The index tenor, if the curve name ends with one.
    pub fn index_tenor(&self) -> CurveResult<Option<Period>> {
        Ok(parse_curve_name(&self.curve_name)?.tenor)
    }

    /// Credit curves: the reference entity, the second hyphen segment.
    pub fn credit_instrument_id(&self) -> Option<&str> {
        self.curve_name.split('-').nth(1)
    }

    /// Credit curves: the seniority, the third hyphen segment.
    pub fn credit_seniority(&self) -> Option<&str> {
        self.curve_name.split('-').nth(2)
    }

    /// `{Type}.{CurveName}[.{stress}]`, with basis and spread types folded
    /// into the family they extend.
    pub fn build_id(&self) -> String {
        let id_type = self.pricing_structure_type.id_type();
        match &self.stress_name {
            Some(stress) => format!("{}.{}.{}", id_type, self.curve_name, stress),
            None => format!("{}.{}", id_type, self.curve_name),
        }
    }

    /// The id: the parsed string when built by [`parse`](Self::parse),
    /// otherwise [`build_id`](Self::build_id).
    pub fn id(&self) -> String {
        self.explicit_id.clone().unwrap_or_else(|| self.build_id())
    }

    /// `{market}` or `{market}.{market_date}`.
    pub fn market_and_date(&self) -> Option<String> {
        self.market.as_ref().map(|market| match self.market_date {
            Some(date) => format!("{market}.{date}"),
            None => market.clone(),
        })
    }

    /// `Market.{market_and_date}.{id}`, or `Market.{id}` without a market.
    pub fn unique_id(&self) -> String {
        match self.market_and_date() {
            Some(market) => format!("{}.{}.{}", MARKET_DATA_TYPE, market, self.build_id()),
            None => format!("{}.{}", MARKET_DATA_TYPE, self.build_id()),
        }
    }
}

impl fmt::Display for PricingStructureIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for PricingStructureIdentifier {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Unique id of an FX curve: `Market.{market}.FxCurve.{ccy1}-{ccy2}[.{stress}]`.
///
/// With `invert` the currency order is swapped.
pub fn fx_curve_identifier(
    market: &str,
    base_currency: &str,
    quote_currency: &str,
    stress: Option<&str>,
    invert: bool,
) -> String {
    let (first, second) = if invert {
        (quote_currency, base_currency)
    } else {
        (base_currency, quote_currency)
    };
    let curve = format!("{}.{}-{}", PricingStructureType::FxCurve, first, second);
    market_curve_identifier(market, &curve, stress)
}

/// Unique id of a curve in a market: `Market.{market}.{curve_id}[.{stress}]`.
pub fn market_curve_identifier(market: &str, curve_id: &str, stress: Option<&str>) -> String {
    match stress {
        Some(stress) => format!("{MARKET_DATA_TYPE}.{market}.{curve_id}.{stress}"),
        None => format!("{MARKET_DATA_TYPE}.{market}.{curve_id}"),
    }
}
