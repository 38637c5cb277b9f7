//! Discount policy engine - Maps contracted kWh and loyalty tier to a
//! contracted discount percentage.
//!
//! The table is fixed: each kWh breakpoint carries one percentage per loyalty
//! tier. Selection scans the breakpoints in descending order and takes the
//! first one less than or equal to the contracted consumption, so a
//! subscriber at 3,099 kWh lands on the 1,100 tier. Below the lowest
//! breakpoint no discount applies at all, which is a distinct outcome from a
//! 0% discount.

use crate::errors::{Error, Result};

/// Loyalty tier of a subscriber's plan contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loyalty {
    /// No loyalty commitment
    None,
    /// One-year commitment
    OneYear,
    /// Two-year commitment
    TwoYears,
}

impl Loyalty {
    /// Parses the persisted literal (`"none"`, `"oneYear"`, `"twoYears"`).
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "none" => Ok(Self::None),
            "oneYear" => Ok(Self::OneYear),
            "twoYears" => Ok(Self::TwoYears),
            other => Err(Error::Validation {
                message: format!("Unknown loyalty tier: {other}"),
            }),
        }
    }

    /// The literal stored in the database for this tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::OneYear => "oneYear",
            Self::TwoYears => "twoYears",
        }
    }
}

/// Discount table rows: (kWh breakpoint, % none, % one year, % two years).
/// Kept sorted descending by breakpoint; selection is a first-match scan.
const DISCOUNT_TABLE: [(f64, f64, f64, f64); 5] = [
    (7000.0, 20.0, 25.0, 28.0),
    (3100.0, 18.0, 22.0, 25.0),
    (1100.0, 16.0, 20.0, 22.0),
    (600.0, 14.0, 17.0, 20.0),
    (400.0, 12.0, 15.0, 18.0),
];

/// Returns the discount percentage for the given contracted consumption and
/// loyalty tier, or `None` when the consumption is below the lowest
/// breakpoint (no applicable tier).
#[must_use]
pub fn discount_percent(contracted_kwh: f64, loyalty: Loyalty) -> Option<f64> {
    DISCOUNT_TABLE
        .iter()
        .find(|(breakpoint, _, _, _)| contracted_kwh >= *breakpoint)
        .map(|(_, none, one_year, two_years)| match loyalty {
            Loyalty::None => *none,
            Loyalty::OneYear => *one_year,
            Loyalty::TwoYears => *two_years,
        })
}

/// Plan contract attributes relevant to discount derivation.
#[derive(Debug, Clone)]
pub struct PlanContract {
    /// Consumption informed by the subscriber at signup, in kWh
    pub informed_kwh: f64,
    /// Contracted monthly consumption in kWh
    pub contracted_kwh: f64,
    /// Loyalty tier
    pub loyalty: Loyalty,
    /// Contracted discount percentage; an explicit value always wins
    pub discount_percent: Option<f64>,
}

/// Fills in the derived discount on a contract that does not already carry
/// an explicit one. The table is consulted only when the informed consumption
/// is positive; an existing value is never overwritten.
pub fn apply_default_discount(contract: &mut PlanContract) {
    if contract.discount_percent.is_some() || contract.informed_kwh <= 0.0 {
        return;
    }
    contract.discount_percent = discount_percent(contract.contracted_kwh, contract.loyalty);
}
