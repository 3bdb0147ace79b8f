use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use hearth_core::types::round_cents;
use hearth_core::with_metadata;

use crate::commands::region::JurisdictionArgs;

#[derive(Args)]
pub struct PurchaseFeesArgs {
    /// Purchase price (defaults to the region's default price)
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Down payment as a percentage of price
    #[arg(long, conflicts_with = "loan")]
    pub down_payment: Option<Decimal>,

    /// Loan amount; 0 for a cash purchase
    #[arg(long)]
    pub loan: Option<Decimal>,

    #[command(flatten)]
    pub jurisdiction: JurisdictionArgs,
}

pub fn run_purchase_fees(args: PurchaseFeesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let config = args.jurisdiction.load()?;
    let defaults = &config.defaults.buy;

    let price = args.price.unwrap_or(defaults.home_price);
    if price < Decimal::ZERO {
        return Err("--price cannot be negative".into());
    }
    let loan = match (args.loan, args.down_payment) {
        (Some(loan), _) => loan,
        (None, Some(pct)) => round_cents(price * (Decimal::ONE_HUNDRED - pct) / Decimal::ONE_HUNDRED),
        (None, None) => {
            round_cents(price * (Decimal::ONE_HUNDRED - defaults.down_payment_percent) / Decimal::ONE_HUNDRED)
        }
    };

    let mut warnings = Vec::new();
    if loan > price {
        warnings.push("Loan exceeds the purchase price".to_string());
    }

    let fees = config.closing_costs.estimate(price, loan.max(Decimal::ZERO));

    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata(
        "One-time purchase costs",
        &serde_json::json!({
            "region": config.code,
            "price": price.to_string(),
            "loan": loan.to_string(),
        }),
        warnings,
        elapsed,
        fees,
    );
    Ok(serde_json::to_value(output)?)
}
