use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;

use crate::comparison::engine::{compare_buy_vs_rent, BetterChoice};
use crate::error::HearthError;
use crate::inputs::BuyVsRentInputs;
use crate::jurisdiction::JurisdictionConfig;
use crate::types::*;
use crate::HearthResult;

/// Largest grid a single sweep may evaluate.
const MAX_CELLS: usize = 2_500;

/// Inputs that can be swept, all expressed as percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityParameter {
    AppreciationRate,
    InvestmentReturnRate,
    InterestRate,
    RentIncreaseRate,
    DownPaymentPercent,
    PropertyTaxRate,
}

impl SensitivityParameter {
    pub const ALL: [SensitivityParameter; 6] = [
        SensitivityParameter::AppreciationRate,
        SensitivityParameter::InvestmentReturnRate,
        SensitivityParameter::InterestRate,
        SensitivityParameter::RentIncreaseRate,
        SensitivityParameter::DownPaymentPercent,
        SensitivityParameter::PropertyTaxRate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SensitivityParameter::AppreciationRate => "appreciation_rate",
            SensitivityParameter::InvestmentReturnRate => "investment_return_rate",
            SensitivityParameter::InterestRate => "interest_rate",
            SensitivityParameter::RentIncreaseRate => "rent_increase_rate",
            SensitivityParameter::DownPaymentPercent => "down_payment_percent",
            SensitivityParameter::PropertyTaxRate => "property_tax_rate",
        }
    }

    /// The parameter's value in `inputs`.
    pub fn read(&self, inputs: &BuyVsRentInputs) -> Percent {
        match self {
            SensitivityParameter::AppreciationRate => inputs.buy.appreciation_rate,
            SensitivityParameter::InvestmentReturnRate => inputs.investment_return_rate,
            SensitivityParameter::InterestRate => inputs.buy.interest_rate,
            SensitivityParameter::RentIncreaseRate => inputs.rent.rent_increase_rate,
            SensitivityParameter::DownPaymentPercent => inputs.buy.down_payment_percent,
            SensitivityParameter::PropertyTaxRate => inputs.buy.property_tax_rate,
        }
    }

    pub fn apply(&self, inputs: &mut BuyVsRentInputs, value: Percent) {
        match self {
            SensitivityParameter::AppreciationRate => inputs.buy.appreciation_rate = value,
            SensitivityParameter::InvestmentReturnRate => inputs.investment_return_rate = value,
            SensitivityParameter::InterestRate => inputs.buy.interest_rate = value,
            SensitivityParameter::RentIncreaseRate => inputs.rent.rent_increase_rate = value,
            SensitivityParameter::DownPaymentPercent => inputs.buy.down_payment_percent = value,
            SensitivityParameter::PropertyTaxRate => inputs.buy.property_tax_rate = value,
        }
    }
}

impl FromStr for SensitivityParameter {
    type Err = HearthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| HearthError::InvalidInput {
                field: "parameter".into(),
                reason: format!("unknown sensitivity parameter '{s}'"),
            })
    }
}

/// One axis of the grid, swept from `min` to `max` in `step` increments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityVariable {
    pub parameter: SensitivityParameter,
    pub min: Percent,
    pub max: Percent,
    pub step: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    pub base_inputs: BuyVsRentInputs,
    pub variable_1: SensitivityVariable,
    pub variable_2: SensitivityVariable,
}

/// Output of a 2-way sweep of the buy-vs-rent difference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub variable_1_name: String,
    pub variable_2_name: String,
    pub variable_1_values: Vec<Decimal>,
    pub variable_2_values: Vec<Decimal>,
    /// matrix[i][j] = rent minus buy net worth at (values_1[i], values_2[j]);
    /// `None` where the projection could not run
    pub matrix: Vec<Vec<Option<Money>>>,
    pub better_choice: Vec<Vec<Option<BetterChoice>>>,
    /// Difference at the unmodified base inputs
    pub base_case_value: Money,
    /// Grid cell closest to the base inputs (row, col)
    pub base_case_position: (usize, usize),
}

/// Generate the sweep values for a variable from min to max with step.
fn generate_sweep_values(var: &SensitivityVariable) -> HearthResult<Vec<Decimal>> {
    if var.step <= Decimal::ZERO {
        return Err(HearthError::InvalidInput {
            field: format!("variable:{}", var.parameter.name()),
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(HearthError::InvalidInput {
            field: format!("variable:{}", var.parameter.name()),
            reason: "Min must be <= max".into(),
        });
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        values.push(current);
        current += var.step;
        if values.len() > MAX_CELLS {
            break;
        }
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

/// Find the closest index to a target value in a sorted list.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Sweep two inputs across a grid and project every cell.
///
/// Cells whose inputs the engine rejects (e.g. a down payment above 100%)
/// are left empty and reported as warnings rather than failing the sweep.
pub fn run_sensitivity(
    input: &SensitivityInput,
    config: &JurisdictionConfig,
) -> HearthResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.variable_1.parameter == input.variable_2.parameter {
        return Err(HearthError::InvalidInput {
            field: "variable_2".into(),
            reason: "Sensitivity variables must differ".into(),
        });
    }

    let v1_values = generate_sweep_values(&input.variable_1)?;
    let v2_values = generate_sweep_values(&input.variable_2)?;
    if v1_values.len() * v2_values.len() > MAX_CELLS {
        return Err(HearthError::InvalidInput {
            field: "variable_1".into(),
            reason: format!("Grid exceeds {MAX_CELLS} cells; widen the steps"),
        });
    }

    let base = compare_buy_vs_rent(&input.base_inputs, config)?;

    let mut matrix = Vec::with_capacity(v1_values.len());
    let mut choices = Vec::with_capacity(v1_values.len());
    for v1 in &v1_values {
        let mut row = Vec::with_capacity(v2_values.len());
        let mut choice_row = Vec::with_capacity(v2_values.len());
        for v2 in &v2_values {
            let mut cell = input.base_inputs.clone();
            input.variable_1.parameter.apply(&mut cell, *v1);
            input.variable_2.parameter.apply(&mut cell, *v2);
            match compare_buy_vs_rent(&cell, config) {
                Ok(res) => {
                    row.push(Some(res.difference));
                    choice_row.push(Some(res.better_choice));
                }
                Err(e) => {
                    warnings.push(format!("Evaluation failed at ({v1}, {v2}): {e}"));
                    row.push(None);
                    choice_row.push(None);
                }
            }
        }
        matrix.push(row);
        choices.push(choice_row);
    }

    let base_row = closest_index(&v1_values, input.variable_1.parameter.read(&input.base_inputs));
    let base_col = closest_index(&v2_values, input.variable_2.parameter.read(&input.base_inputs));

    tracing::debug!(
        rows = v1_values.len(),
        cols = v2_values.len(),
        failed = warnings.len(),
        "sensitivity sweep complete"
    );

    let output = SensitivityOutput {
        variable_1_name: input.variable_1.parameter.name().to_string(),
        variable_2_name: input.variable_2.parameter.name().to_string(),
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        matrix,
        better_choice: choices,
        base_case_value: base.difference,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "2-Way Sensitivity of Rent-minus-Buy Net Worth",
        &serde_json::json!({
            "variable_1": input.variable_1.parameter.name(),
            "variable_2": input.variable_2.parameter.name(),
            "output_metric": "difference",
            "region": config.code,
            "time_horizon_years": input.base_inputs.time_horizon_years,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jurisdiction::Region;
    use rust_decimal_macros::dec;

    fn sample_input(config: &JurisdictionConfig) -> SensitivityInput {
        SensitivityInput {
            base_inputs: config.default_inputs(),
            variable_1: SensitivityVariable {
                parameter: SensitivityParameter::AppreciationRate,
                min: dec!(1),
                max: dec!(6),
                step: dec!(1),
            },
            variable_2: SensitivityVariable {
                parameter: SensitivityParameter::InvestmentReturnRate,
                min: dec!(6),
                max: dec!(12),
                step: dec!(2),
            },
        }
    }

    #[test]
    fn test_grid_shape() {
        let config = Region::UnitedStates.config();
        let result = run_sensitivity(&sample_input(&config), &config).unwrap();
        let out = &result.result;

        assert_eq!(out.variable_1_name, "appreciation_rate");
        // 1..=6 => 6 values; 6, 8, 10, 12 => 4 values
        assert_eq!(out.variable_1_values.len(), 6);
        assert_eq!(out.variable_2_values.len(), 4);
        assert_eq!(out.matrix.len(), 6);
        assert!(out.matrix.iter().all(|row| row.len() == 4));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_investment_return_favours_renting() {
        let config = Region::UnitedStates.config();
        let out = run_sensitivity(&sample_input(&config), &config).unwrap().result;
        for (idx, row) in out.matrix.iter().enumerate() {
            let low = row[0].unwrap();
            let high = row[3].unwrap();
            assert!(high > low, "row {idx}: {high} !> {low}");
        }
        // at a 6% return, faster appreciation helps the owner
        assert!(out.matrix[5][0].unwrap() < out.matrix[0][0].unwrap());
    }

    #[test]
    fn test_base_case_matches_direct_run() {
        let config = Region::UnitedStates.config();
        let input = sample_input(&config);
        let out = run_sensitivity(&input, &config).unwrap().result;
        let direct = compare_buy_vs_rent(&input.base_inputs, &config).unwrap();
        assert_eq!(out.base_case_value, direct.difference);
        // base appreciation 3.5 sits between 3 and 4; base return 10 is exact
        assert_eq!(out.variable_2_values[out.base_case_position.1], dec!(10));
    }

    #[test]
    fn test_rejected_cells_become_warnings() {
        let config = Region::UnitedStates.config();
        let mut input = sample_input(&config);
        input.variable_1 = SensitivityVariable {
            parameter: SensitivityParameter::DownPaymentPercent,
            min: dec!(90),
            max: dec!(110),
            step: dec!(10),
        };
        let result = run_sensitivity(&input, &config).unwrap();
        assert!(result.result.matrix[2].iter().all(Option::is_none));
        assert_eq!(result.warnings.len(), 4);
    }

    #[test]
    fn test_extreme_appreciation_sweep_degrades_to_warnings() {
        let config = Region::SouthAfrica.config();
        let mut input = sample_input(&config);
        input.base_inputs.time_horizon_years = 50;
        input.variable_1 = SensitivityVariable {
            parameter: SensitivityParameter::AppreciationRate,
            min: dec!(0),
            max: dec!(200),
            step: dec!(100),
        };
        let result = run_sensitivity(&input, &config).unwrap();
        let matrix = &result.result.matrix;
        assert_eq!(matrix.len(), 3);
        assert!(matrix[0].iter().all(Option::is_some));
        assert!(matrix[2].iter().all(Option::is_none));
        assert!(result.warnings.len() >= 4);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.starts_with("Evaluation failed at (200")));
    }

    #[test]
    fn test_parameter_names_parse() {
        for p in SensitivityParameter::ALL {
            assert_eq!(p.name().parse::<SensitivityParameter>().unwrap(), p);
        }
        assert_eq!(
            "Rent-Increase-Rate".parse::<SensitivityParameter>().unwrap(),
            SensitivityParameter::RentIncreaseRate
        );
        assert!("wacc".parse::<SensitivityParameter>().is_err());
    }

    #[test]
    fn test_invalid_sweeps() {
        let config = Region::UnitedStates.config();
        let mut input = sample_input(&config);
        input.variable_1.step = Decimal::ZERO;
        assert!(run_sensitivity(&input, &config).is_err());

        let mut same = sample_input(&config);
        same.variable_2.parameter = SensitivityParameter::AppreciationRate;
        assert!(run_sensitivity(&same, &config).is_err());
    }
}
