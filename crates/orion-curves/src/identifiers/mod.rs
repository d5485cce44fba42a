//! Pricing-structure identifiers: the string keys that address curves in
//! the object cache.

mod curve_name;
mod identifier;
mod pricing_structure_type;

pub use curve_name::{parse_curve_name, CurveName};
pub use identifier::{
    fx_curve_identifier, market_curve_identifier, PricingStructureIdentifier, DEFAULT_ALGORITHM,
    DEFAULT_SOURCE_SYSTEM, MARKET_DATA_TYPE,
};
pub use pricing_structure_type::PricingStructureType;
