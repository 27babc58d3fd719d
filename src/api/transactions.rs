//! Transactions resource: CRUD, summary statistics and the two-phase CSV
//! import (dry-run validation, then commit).

use reqwest::multipart;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Buy,
    Sell,
    Dividend,
    Fee,
    Split,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
            TransactionType::Dividend => "DIVIDEND",
            TransactionType::Fee => "FEE",
            TransactionType::Split => "SPLIT",
            TransactionType::Transfer => "TRANSFER",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A server-owned transaction record. Ids are assigned by the backend;
/// the client never invents one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: Option<String>,
    pub ticker: String,
    pub transaction_type: TransactionType,
    pub transaction_date: String,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub total_amount: Decimal,
    pub price_per_share: Option<Decimal>,
    pub fees: Option<Decimal>,
    pub notes: Option<String>,
}

/// Payload for creating or updating a transaction
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    pub ticker: String,
    pub transaction_type: TransactionType,
    pub transaction_date: String,
    pub quantity: Decimal,
    pub total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_share: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub ticker: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<u32>,
}

impl TransactionQuery {
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ticker) = &self.ticker {
            params.push(("ticker", ticker.clone()));
        }
        if let Some(tx_type) = self.transaction_type {
            params.push(("transaction_type", tx_type.as_str().to_string()));
        }
        if let Some(start) = &self.start_date {
            params.push(("start_date", start.clone()));
        }
        if let Some(end) = &self.end_date {
            params.push(("end_date", end.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }

    /// Stable string form used as the cache key parameter component
    pub fn cache_params(&self) -> String {
        self.to_params()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSummary {
    #[serde(default)]
    pub total_transactions: u32,
    #[serde(default)]
    pub by_type: std::collections::BTreeMap<String, u32>,
    #[serde(default)]
    pub total_invested: f64,
    #[serde(default)]
    pub total_proceeds: f64,
    #[serde(default)]
    pub total_dividends: f64,
    #[serde(default)]
    pub total_fees: f64,
}

/// One row of a dry-run preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPreview {
    pub ticker: Option<String>,
    pub transaction_type: Option<String>,
    pub transaction_date: Option<String>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub total_amount: f64,
}

/// Result of a CSV import request.
///
/// A dry run parses and validates without persisting; `errors` carries one
/// string per rejected row. `imported` is only meaningful on a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub total_rows: u32,
    #[serde(default)]
    pub valid_rows: u32,
    #[serde(default)]
    pub imported: u32,
    #[serde(default)]
    pub transactions: Vec<TransactionPreview>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ImportReport {
    /// The commit action stays blocked until a preview comes back clean
    pub fn can_commit(&self) -> bool {
        self.errors.is_empty() && self.valid_rows > 0
    }
}

impl ApiClient {
    pub async fn transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, ApiError> {
        self.get_json("/transactions", &query.to_params(), "transactions")
            .await
    }

    pub async fn transaction(&self, id: i64) -> Result<Transaction, ApiError> {
        self.get_json(&format!("/transactions/{id}"), &[], "transaction")
            .await
    }

    pub async fn create_transaction(&self, new: &NewTransaction) -> Result<Transaction, ApiError> {
        self.post_json("/transactions", new, "create transaction")
            .await
    }

    pub async fn update_transaction(
        &self,
        id: i64,
        update: &NewTransaction,
    ) -> Result<Transaction, ApiError> {
        self.put_json(&format!("/transactions/{id}"), update, "update transaction")
            .await
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/transactions/{id}"), "delete transaction")
            .await
    }

    pub async fn transaction_summary(&self) -> Result<TransactionSummary, ApiError> {
        self.get_json("/transactions/summary", &[], "transaction summary")
            .await
    }

    /// Upload a CSV for import. This is the only multipart endpoint; with
    /// `dry_run` the backend parses and validates but persists nothing.
    pub async fn import_transactions(
        &self,
        file_name: &str,
        contents: Vec<u8>,
        dry_run: bool,
    ) -> Result<ImportReport, ApiError> {
        let part = multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);

        let builder = self
            .http()
            .post(self.endpoint("/transactions/import"))
            .query(&[("dry_run", dry_run.to_string())])
            .multipart(form);

        match self.request(builder, "csv import").await? {
            Some(report) => Ok(report),
            None => Err(ApiError::Decode {
                context: "csv import",
                source: <serde_json::Error as serde::de::Error>::custom("empty import response"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_round_trips_screaming_case() {
        let tx_type: TransactionType = serde_json::from_str(r#""DIVIDEND""#).unwrap();
        assert_eq!(tx_type, TransactionType::Dividend);
        assert_eq!(serde_json::to_string(&tx_type).unwrap(), r#""DIVIDEND""#);
    }

    #[test]
    fn test_query_params_omit_unset_fields() {
        let query = TransactionQuery {
            ticker: Some("AAPL".to_string()),
            transaction_type: Some(TransactionType::Buy),
            ..Default::default()
        };
        let params = query.to_params();
        assert_eq!(
            params,
            vec![
                ("ticker", "AAPL".to_string()),
                ("transaction_type", "BUY".to_string()),
            ]
        );
        assert_eq!(query.cache_params(), "ticker=AAPL&transaction_type=BUY");
        assert_eq!(TransactionQuery::default().cache_params(), "");
    }

    #[test]
    fn test_import_commit_gate() {
        let clean = ImportReport {
            dry_run: true,
            total_rows: 3,
            valid_rows: 3,
            ..blank_report()
        };
        assert!(clean.can_commit());

        let with_errors = ImportReport {
            dry_run: true,
            total_rows: 3,
            valid_rows: 2,
            errors: vec!["row 3: invalid ticker".to_string()],
            ..blank_report()
        };
        assert!(!with_errors.can_commit());

        let empty = ImportReport {
            dry_run: true,
            ..blank_report()
        };
        assert!(!empty.can_commit());
    }

    fn blank_report() -> ImportReport {
        ImportReport {
            dry_run: false,
            total_rows: 0,
            valid_rows: 0,
            imported: 0,
            transactions: Vec::new(),
            errors: Vec::new(),
        }
    }
}
