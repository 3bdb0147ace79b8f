use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HearthError;
use crate::fees::purchase::{ClosingCostStrategy, PurchaseFees};
use crate::formatting::CurrencyFormat;
use crate::inputs::BuyVsRentInputs;
use crate::jurisdiction::presets;
use crate::validation::ValidationBounds;
use crate::HearthResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Local names for the concepts the engine models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminology {
    pub property_tax: String,
    pub property_tax_rate: String,
    pub hoa_fees: String,
    pub closing_costs: String,
    pub selling_costs: String,
    pub selling_costs_percent: String,
    pub home_insurance: String,
    pub renters_insurance: String,
    pub down_payment: String,
    pub mortgage: String,
    pub rent: String,
}

/// Guidance shown next to the inputs that are hardest to estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpText {
    pub interest_rate: String,
    pub property_tax_rate: String,
    pub appreciation_rate: String,
    pub investment_return_rate: String,
    pub closing_costs: String,
    pub selling_costs: String,
    pub maintenance_rate: String,
}

/// Modelling choices on which reasonable implementations disagree. Every run
/// reports the values it used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelingOptions {
    /// Renter starts with down payment + closing costs invested, rather than
    /// the down payment alone.
    #[serde(default)]
    pub include_closing_costs_in_renter_initial_investment: bool,
    /// Buyer invests the monthly gap whenever owning costs less than renting
    /// (typically after the loan is retired).
    #[serde(default = "default_true")]
    pub model_buyer_side_investment: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ModelingOptions {
    fn default() -> Self {
        Self {
            include_closing_costs_in_renter_initial_investment: false,
            model_buyer_side_investment: true,
        }
    }
}

/// Everything jurisdiction-specific the engine needs, injected by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionConfig {
    pub code: String,
    pub name: String,
    pub currency: CurrencyFormat,
    pub terminology: Terminology,
    pub help_text: HelpText,
    pub defaults: BuyVsRentInputs,
    pub validation: ValidationBounds,
    pub closing_costs: ClosingCostStrategy,
    #[serde(default)]
    pub modeling: ModelingOptions,
}

/// Built-in jurisdictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "ZA")]
    SouthAfrica,
    #[serde(rename = "US")]
    UnitedStates,
}

// ---------------------------------------------------------------------------
// Impls
// ---------------------------------------------------------------------------

impl JurisdictionConfig {
    /// Parse a custom jurisdiction from JSON and run [`JurisdictionConfig::check`].
    pub fn from_json(json: &str) -> HearthResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Consistency checks for configs loaded from outside the crate.
    pub fn check(&self) -> HearthResult<()> {
        if self.code.trim().is_empty() {
            return Err(HearthError::InvalidConfiguration(
                "jurisdiction code is required".into(),
            ));
        }
        self.closing_costs.check()?;
        self.validation.check()?;
        if self.defaults.buy.loan_term_years == 0 || self.defaults.time_horizon_years == 0 {
            return Err(HearthError::InvalidConfiguration(format!(
                "{} defaults must have a non-zero loan term and time horizon",
                self.code
            )));
        }
        Ok(())
    }

    /// Fresh copy of the jurisdiction's default scenario.
    pub fn default_inputs(&self) -> BuyVsRentInputs {
        self.defaults.clone()
    }

    /// One-time purchase costs for `inputs` under this jurisdiction's rules.
    pub fn purchase_fees(&self, inputs: &BuyVsRentInputs) -> PurchaseFees {
        inputs.buy.purchase_fees(&self.closing_costs)
    }

    pub fn with_modeling(mut self, modeling: ModelingOptions) -> Self {
        self.modeling = modeling;
        self
    }
}

impl Region {
    pub const ALL: [Region; 2] = [Region::SouthAfrica, Region::UnitedStates];

    pub fn code(&self) -> &'static str {
        match self {
            Region::SouthAfrica => "ZA",
            Region::UnitedStates => "US",
        }
    }

    pub fn config(&self) -> JurisdictionConfig {
        match self {
            Region::SouthAfrica => presets::south_africa(),
            Region::UnitedStates => presets::united_states(),
        }
    }
}

impl FromStr for Region {
    type Err = HearthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ZA" | "SA" => Ok(Region::SouthAfrica),
            "US" | "USA" => Ok(Region::UnitedStates),
            other => Err(HearthError::UnknownRegion(other.to_string())),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
