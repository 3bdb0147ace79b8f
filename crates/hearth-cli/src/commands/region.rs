use clap::Args;
use serde_json::Value;

use hearth_core::jurisdiction::{JurisdictionConfig, Region};

use crate::input;

/// Where the jurisdiction rules come from.
#[derive(Args, Debug, Clone)]
pub struct JurisdictionArgs {
    /// Built-in region code: ZA (South Africa) or US (United States)
    #[arg(long, default_value = "ZA")]
    pub region: String,

    /// Custom jurisdiction file (JSON or YAML); takes precedence over --region
    #[arg(long)]
    pub config: Option<String>,
}

/// Overrides for the modelling choices a jurisdiction ships with.
#[derive(Args, Debug, Clone)]
pub struct ModelingArgs {
    /// Seed the renter's portfolio with the closing costs as well as the deposit
    #[arg(long)]
    pub include_closing_costs: bool,

    /// Do not invest the owner's monthly savings once owning is cheaper
    #[arg(long)]
    pub no_buyer_investment: bool,
}

#[derive(Args)]
pub struct DefaultsArgs {
    #[command(flatten)]
    pub jurisdiction: JurisdictionArgs,

    /// Print only the default scenario inputs
    #[arg(long)]
    pub inputs_only: bool,
}

impl JurisdictionArgs {
    pub fn load(&self) -> Result<JurisdictionConfig, Box<dyn std::error::Error>> {
        let config = match self.config {
            Some(ref path) => {
                let config: JurisdictionConfig = input::file::read_document(path)?;
                config.check()?;
                config
            }
            None => self.region.parse::<Region>()?.config(),
        };
        tracing::debug!(region = %config.code, "loaded jurisdiction");
        Ok(config)
    }
}

impl ModelingArgs {
    pub fn apply(&self, config: JurisdictionConfig) -> JurisdictionConfig {
        let mut modeling = config.modeling;
        if self.include_closing_costs {
            modeling.include_closing_costs_in_renter_initial_investment = true;
        }
        if self.no_buyer_investment {
            modeling.model_buyer_side_investment = false;
        }
        config.with_modeling(modeling)
    }
}

pub fn run_defaults(args: DefaultsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = args.jurisdiction.load()?;
    if args.inputs_only {
        Ok(serde_json::to_value(config.default_inputs())?)
    } else {
        Ok(serde_json::to_value(config)?)
    }
}
