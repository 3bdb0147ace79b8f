pub mod comparison;
pub mod costs;
pub mod error;
pub mod fees;
pub mod formatting;
pub mod inputs;
pub mod jurisdiction;
pub mod mortgage;
pub mod time_value;
pub mod types;
pub mod validation;

#[cfg(feature = "savings")]
pub mod savings;

pub use comparison::engine::{compare_buy_vs_rent, run_comparison, BetterChoice, BuyVsRentResults};
pub use error::HearthError;
pub use inputs::{BuyScenarioInputs, BuyVsRentInputs, RentScenarioInputs};
pub use jurisdiction::{JurisdictionConfig, ModelingOptions, Region};
pub use types::*;
pub use validation::{validate, ValidationIssue};

/// Standard result type for all hearth operations
pub type HearthResult<T> = Result<T, HearthError>;
