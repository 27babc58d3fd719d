//! Add command: record a single transaction.
//!
//! Client-side validation runs before anything touches the network;
//! validation failures print inline and block submission.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::Args;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;
use tracing::info;

use crate::api::transactions::{NewTransaction, TransactionType};
use crate::data_paths::DataPaths;
use crate::query::QueryService;

#[derive(Args, Clone)]
pub struct AddArgs {
    /// Ticker symbol
    #[arg(long, short = 't')]
    pub ticker: String,

    /// Transaction type
    #[arg(long = "type", value_enum)]
    pub tx_type: TransactionType,

    /// Transaction date (YYYY-MM-DD)
    #[arg(long, short = 'd')]
    pub date: String,

    /// Number of shares
    #[arg(long, short = 'n')]
    pub quantity: Option<Decimal>,

    /// Total amount
    #[arg(long, short = 'a')]
    pub amount: Decimal,

    /// Price per share
    #[arg(long, short = 'p')]
    pub price: Option<Decimal>,

    /// Fees paid
    #[arg(long)]
    pub fees: Option<Decimal>,

    /// Free-form note
    #[arg(long)]
    pub notes: Option<String>,

    /// Update an existing transaction by id instead of creating one
    #[arg(long)]
    pub update: Option<i64>,
}

pub struct AddCommand {
    args: AddArgs,
}

impl AddCommand {
    pub fn new(args: AddArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, service: &QueryService, _data_paths: &DataPaths) -> Result<()> {
        let new = match validate(&self.args) {
            Ok(new) => new,
            Err(errors) => {
                println!("{}", "❌ Transaction not submitted:".bright_red());
                for error in &errors {
                    println!("   {} {}", "•".bright_red(), error);
                }
                return Err(anyhow!("validation failed"));
            }
        };

        let (verb, saved) = match self.args.update {
            Some(id) => ("Updated", service.update_transaction(id, &new).await?),
            None => ("Recorded", service.create_transaction(&new).await?),
        };
        info!(id = saved.id, ticker = %saved.ticker, "transaction saved");

        println!(
            "{} {} {} {} {} for {} (id {})",
            "✓".bright_green(),
            verb,
            saved.transaction_type,
            saved.quantity,
            saved.ticker,
            format!("${:.2}", saved.total_amount).bright_green(),
            saved.id
        );
        Ok(())
    }
}

/// All failures are collected so the user fixes everything in one pass.
fn validate(args: &AddArgs) -> std::result::Result<NewTransaction, Vec<String>> {
    let mut errors = Vec::new();

    let ticker = args.ticker.trim().to_uppercase();
    if ticker.is_empty() {
        errors.push("ticker must not be empty".to_string());
    }

    if NaiveDate::parse_from_str(&args.date, "%Y-%m-%d").is_err() {
        errors.push(format!("'{}' is not a valid YYYY-MM-DD date", args.date));
    }

    let needs_quantity = matches!(
        args.tx_type,
        TransactionType::Buy | TransactionType::Sell | TransactionType::Split
    );
    let quantity = args.quantity.unwrap_or_default();
    if needs_quantity && quantity <= Decimal::ZERO {
        errors.push(format!(
            "{} transactions require a positive --quantity",
            args.tx_type
        ));
    }

    if args.amount == Decimal::ZERO && args.tx_type != TransactionType::Split {
        errors.push("--amount must be non-zero".to_string());
    }

    if let Some(fees) = args.fees {
        if fees < Decimal::ZERO {
            errors.push("--fees must not be negative".to_string());
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewTransaction {
        ticker,
        transaction_type: args.tx_type,
        transaction_date: args.date.clone(),
        quantity,
        total_amount: args.amount,
        price_per_share: args.price,
        fees: args.fees,
        notes: args.notes.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args(tx_type: TransactionType) -> AddArgs {
        AddArgs {
            ticker: "aapl".to_string(),
            tx_type,
            date: "2026-08-01".to_string(),
            quantity: Some(dec!(10)),
            amount: dec!(1500),
            price: Some(dec!(150)),
            fees: None,
            notes: None,
            update: None,
        }
    }

    #[test]
    fn test_valid_buy_normalizes_ticker() {
        let new = validate(&args(TransactionType::Buy)).unwrap();
        assert_eq!(new.ticker, "AAPL");
        assert_eq!(new.quantity, dec!(10));
    }

    #[test]
    fn test_buy_requires_positive_quantity() {
        let mut invalid = args(TransactionType::Buy);
        invalid.quantity = None;
        let errors = validate(&invalid).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("quantity")));
    }

    #[test]
    fn test_dividend_does_not_require_quantity() {
        let mut dividend = args(TransactionType::Dividend);
        dividend.quantity = None;
        assert!(validate(&dividend).is_ok());
    }

    #[test]
    fn test_bad_date_blocks_submission() {
        let mut invalid = args(TransactionType::Buy);
        invalid.date = "08/01/2026".to_string();
        let errors = validate(&invalid).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("YYYY-MM-DD")));
    }

    #[test]
    fn test_errors_accumulate() {
        let mut invalid = args(TransactionType::Sell);
        invalid.ticker = " ".to_string();
        invalid.date = "not-a-date".to_string();
        invalid.quantity = Some(dec!(-1));
        let errors = validate(&invalid).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
