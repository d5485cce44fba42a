//! Pricing-structure types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CurveError;

macro_rules! pricing_structure_types {
    ($($(#[$doc:meta])* $variant:ident),+ $(,)?) => {
        /// The type segment of a pricing-structure identifier.
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum PricingStructureType {
            $($(#[$doc])* $variant,)+
        }

        impl PricingStructureType {
            /// Every type, in declaration order.
            pub const ALL: &'static [PricingStructureType] = &[$(PricingStructureType::$variant),+];

            /// The name used in identifiers.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(PricingStructureType::$variant => stringify!($variant),)+
                }
            }
        }
    };
}

pricing_structure_types!(
    /// Projection curve for a rate index.
    RateCurve,
    /// Basis curve over a rate curve.
    RateBasisCurve,
    /// Rate curve for centrally cleared trades.
    ClearedRateCurve,
    /// Spread over a rate curve.
    RateSpreadCurve,
    /// Cross-currency spread curve.
    XccySpreadCurve,
    /// Cross-currency rate curve.
    RateXccyCurve,
    /// Discount curve.
    DiscountCurve,
    /// Discount curve implied by bonds.
    BondDiscountCurve,
    /// Bond yield curve.
    BondCurve,
    /// Bond repo/financing curve.
    BondFinancingCurve,
    /// Basis over a bond financing curve.
    BondFinancingBasisCurve,
    /// Inflation index curve.
    InflationCurve,
    /// FX forward curve.
    FxCurve,
    /// Commodity forward curve.
    CommodityCurve,
    /// Spread over a commodity curve.
    CommoditySpreadCurve,
    /// Credit (survival/hazard) curve.
    CreditCurve,
    /// Equity forward curve.
    EquityCurve,
    /// Exchange-traded futures price curve.
    ExchangeTradedCurve,
    /// Caplet volatility curve.
    CapVolatilityCurve,
    /// Swaption/cap volatility matrix.
    RateVolatilityMatrix,
    /// ATM rate volatility matrix.
    RateATMVolatilityMatrix,
    /// Rate volatility cube.
    RateVolatilityCube,
    /// FX volatility surface.
    FxVolatilityMatrix,
    /// Equity volatility surface.
    EquityVolatilityMatrix,
    /// Equity volatility surface with a wing smile.
    EquityWingVolatilityMatrix,
    /// Commodity volatility surface.
    CommodityVolatilityMatrix,
    /// SABR-parameterised volatility surface.
    SABRSurface,
);

impl PricingStructureType {
    /// The type used in the id segment. Basis and spread curves share the
    /// addressing of the curve family they extend.
    pub fn id_type(&self) -> PricingStructureType {
        match self {
            Self::RateBasisCurve
            | Self::ClearedRateCurve
            | Self::BondFinancingCurve
            | Self::BondFinancingBasisCurve
            | Self::RateSpreadCurve
            | Self::XccySpreadCurve => Self::RateCurve,
            Self::BondDiscountCurve | Self::RateXccyCurve => Self::DiscountCurve,
            Self::CommoditySpreadCurve => Self::CommodityCurve,
            other => *other,
        }
    }
}

impl fmt::Display for PricingStructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PricingStructureType {
    type Err = CurveError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| CurveError::unknown_pricing_structure_type(s))
    }
}
