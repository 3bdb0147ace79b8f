use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use hearth_core::comparison::sensitivity::{
    run_sensitivity, SensitivityInput, SensitivityParameter, SensitivityVariable,
};

use crate::commands::compare::ScenarioArgs;
use crate::commands::region::{JurisdictionArgs, ModelingArgs};
use crate::input;

#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to a JSON or YAML file with a full sensitivity request
    /// (`base_inputs`, `variable_1`, `variable_2`)
    #[arg(long)]
    pub request: Option<String>,

    /// First axis as name:min:max:step (e.g. appreciation_rate:2:8:1)
    #[arg(long)]
    pub var1: Option<String>,

    /// Second axis as name:min:max:step (e.g. investment_return_rate:6:14:2)
    #[arg(long)]
    pub var2: Option<String>,

    #[command(flatten)]
    pub scenario: ScenarioArgs,

    #[command(flatten)]
    pub jurisdiction: JurisdictionArgs,

    #[command(flatten)]
    pub modeling: ModelingArgs,
}

fn parse_variable(arg: &str) -> Result<SensitivityVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = arg.split(':').collect();
    if parts.len() != 4 {
        return Err(format!("'{arg}': expected name:min:max:step").into());
    }
    let parameter: SensitivityParameter = parts[0].parse()?;
    let number = |s: &str| -> Result<Decimal, Box<dyn std::error::Error>> {
        s.trim()
            .parse::<Decimal>()
            .map_err(|e| format!("'{s}' in '{arg}': {e}").into())
    };
    Ok(SensitivityVariable {
        parameter,
        min: number(parts[1])?,
        max: number(parts[2])?,
        step: number(parts[3])?,
    })
}

pub fn run_sensitivity_grid(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = args.modeling.apply(args.jurisdiction.load()?);

    let request: SensitivityInput = if let Some(ref path) = args.request {
        input::file::read_document(path)?
    } else {
        let var1 = args.var1.as_deref().ok_or("--var1 is required")?;
        let var2 = args.var2.as_deref().ok_or("--var2 is required")?;
        SensitivityInput {
            base_inputs: args.scenario.load(&config)?,
            variable_1: parse_variable(var1)?,
            variable_2: parse_variable(var2)?,
        }
    };

    let result = run_sensitivity(&request, &config)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_variable() {
        let var = parse_variable("appreciation-rate:2:8:1.5").unwrap();
        assert_eq!(var.parameter, SensitivityParameter::AppreciationRate);
        assert_eq!(var.min, dec!(2));
        assert_eq!(var.max, dec!(8));
        assert_eq!(var.step, dec!(1.5));
    }

    #[test]
    fn test_parse_variable_rejects_bad_shapes() {
        assert!(parse_variable("appreciation_rate:2:8").is_err());
        assert!(parse_variable("appreciation_rate:a:8:1").is_err());
        assert!(parse_variable("mystery:1:2:1").is_err());
    }
}
