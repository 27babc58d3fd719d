//! Local sort, filter and free-text search over holdings and
//! transactions.
//!
//! Search is case-insensitive substring matching; categorical filters
//! treat `all` (any case) as "no filter". Sorting uses an explicit
//! two-level comparator — a deterministic secondary key (symbol or id,
//! ascending) breaks primary-key ties, so equal values never land in an
//! engine-defined order. Missing numerics compare as 0, missing strings
//! as the empty string.

use std::cmp::Ordering;

use crate::api::portfolio::Holding;
use crate::api::transactions::{Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HoldingSort {
    Symbol,
    Value,
    Weight,
    GainLoss,
    GainLossPercent,
    Quantity,
    Price,
    Sector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TransactionSort {
    Date,
    Ticker,
    Amount,
    Quantity,
    Type,
}

/// A categorical filter value of `all` means "no filter"
fn effective_filter(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.eq_ignore_ascii_case("all"))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn filter_holdings(holdings: &[Holding], sector: Option<&str>, search: Option<&str>) -> Vec<Holding> {
    let sector = effective_filter(sector);

    holdings
        .iter()
        .filter(|h| {
            if let Some(sector) = sector {
                if !h.sector_label().eq_ignore_ascii_case(sector) {
                    return false;
                }
            }
            if let Some(query) = search {
                let name = h.company_name.as_deref().unwrap_or("");
                if !contains_ci(&h.symbol, query) && !contains_ci(name, query) {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}

pub fn sort_holdings(holdings: &mut [Holding], field: HoldingSort, descending: bool) {
    holdings.sort_by(|a, b| {
        let primary = match field {
            HoldingSort::Symbol => a.symbol.cmp(&b.symbol),
            HoldingSort::Value => cmp_f64(a.value, b.value),
            HoldingSort::Weight => cmp_f64(a.weight_or_zero(), b.weight_or_zero()),
            HoldingSort::GainLoss => cmp_f64(a.gain_loss_or_zero(), b.gain_loss_or_zero()),
            HoldingSort::GainLossPercent => cmp_f64(
                a.gain_loss_percent.unwrap_or(0.0),
                b.gain_loss_percent.unwrap_or(0.0),
            ),
            HoldingSort::Quantity => cmp_f64(a.quantity, b.quantity),
            HoldingSort::Price => cmp_f64(a.last_price, b.last_price),
            HoldingSort::Sector => a.sector_label().cmp(b.sector_label()),
        };
        // ties fall through to the symbol so equal keys order the same way
        // every render
        let ordering = primary.then_with(|| a.symbol.cmp(&b.symbol));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

pub fn filter_transactions(
    transactions: &[Transaction],
    tx_type: Option<TransactionType>,
    ticker: Option<&str>,
    search: Option<&str>,
) -> Vec<Transaction> {
    let ticker = effective_filter(ticker);

    transactions
        .iter()
        .filter(|t| {
            if let Some(tx_type) = tx_type {
                if t.transaction_type != tx_type {
                    return false;
                }
            }
            if let Some(ticker) = ticker {
                if !t.ticker.eq_ignore_ascii_case(ticker) {
                    return false;
                }
            }
            if let Some(query) = search {
                let notes = t.notes.as_deref().unwrap_or("");
                if !contains_ci(&t.ticker, query) && !contains_ci(notes, query) {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}

pub fn sort_transactions(transactions: &mut [Transaction], field: TransactionSort, descending: bool) {
    transactions.sort_by(|a, b| {
        let primary = match field {
            TransactionSort::Date => a.transaction_date.cmp(&b.transaction_date),
            TransactionSort::Ticker => a.ticker.cmp(&b.ticker),
            TransactionSort::Amount => a.total_amount.cmp(&b.total_amount),
            TransactionSort::Quantity => a.quantity.cmp(&b.quantity),
            TransactionSort::Type => a.transaction_type.as_str().cmp(b.transaction_type.as_str()),
        };
        let ordering = primary.then_with(|| a.id.cmp(&b.id));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holding(symbol: &str, value: f64, weight: f64, sector: &str) -> Holding {
        Holding {
            symbol: symbol.to_string(),
            company_name: Some(format!("{symbol} Inc")),
            quantity: 1.0,
            last_price: value,
            value,
            cost_basis: None,
            gain_loss: None,
            gain_loss_percent: None,
            portfolio_weight: Some(weight),
            sector: Some(sector.to_string()),
            industry: None,
            last_updated: None,
        }
    }

    fn sample_holdings() -> Vec<Holding> {
        vec![
            holding("MSFT", 1000.0, 50.0, "Technology"),
            holding("AAPL", 1000.0, 50.0, "Technology"),
            holding("XOM", 500.0, 25.0, "Energy"),
        ]
    }

    fn transaction(id: i64, ticker: &str, tx_type: TransactionType, date: &str) -> Transaction {
        Transaction {
            id,
            account_id: None,
            ticker: ticker.to_string(),
            transaction_type: tx_type,
            transaction_date: date.to_string(),
            quantity: dec!(10),
            total_amount: dec!(1000),
            price_per_share: None,
            fees: None,
            notes: Some("quarterly rebalance".to_string()),
        }
    }

    #[test]
    fn test_absent_sector_yields_empty_set() {
        let filtered = filter_holdings(&sample_holdings(), Some("Utilities"), None);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_all_sector_returns_unfiltered() {
        let holdings = sample_holdings();
        assert_eq!(filter_holdings(&holdings, Some("all"), None).len(), holdings.len());
        assert_eq!(filter_holdings(&holdings, Some("All"), None).len(), holdings.len());
        assert_eq!(filter_holdings(&holdings, None, None).len(), holdings.len());
    }

    #[test]
    fn test_search_is_case_insensitive_over_symbol_and_name() {
        let holdings = sample_holdings();
        let by_symbol = filter_holdings(&holdings, None, Some("aapl"));
        assert_eq!(by_symbol.len(), 1);
        assert_eq!(by_symbol[0].symbol, "AAPL");

        let by_name = filter_holdings(&holdings, None, Some("xom inc"));
        assert_eq!(by_name.len(), 1);
    }

    #[test]
    fn test_sort_toggle_reverses_order() {
        let mut holdings = sample_holdings();
        sort_holdings(&mut holdings, HoldingSort::Value, false);
        let ascending: Vec<_> = holdings.iter().map(|h| h.symbol.clone()).collect();

        sort_holdings(&mut holdings, HoldingSort::Value, true);
        let descending: Vec<_> = holdings.iter().map(|h| h.symbol.clone()).collect();

        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(descending, reversed);
    }

    #[test]
    fn test_value_tie_breaks_on_symbol() {
        // AAPL and MSFT tie on value; the secondary key makes the order
        // deterministic
        let mut holdings = sample_holdings();
        sort_holdings(&mut holdings, HoldingSort::Value, true);
        assert_eq!(holdings[0].symbol, "MSFT");
        assert_eq!(holdings[1].symbol, "AAPL");

        sort_holdings(&mut holdings, HoldingSort::Symbol, false);
        assert_eq!(holdings[0].symbol, "AAPL");
        assert_eq!(holdings[1].symbol, "MSFT");
    }

    #[test]
    fn test_transaction_type_and_ticker_filters() {
        let transactions = vec![
            transaction(1, "AAPL", TransactionType::Buy, "2026-01-05"),
            transaction(2, "AAPL", TransactionType::Dividend, "2026-02-01"),
            transaction(3, "MSFT", TransactionType::Buy, "2026-03-01"),
        ];

        let buys = filter_transactions(&transactions, Some(TransactionType::Buy), None, None);
        assert_eq!(buys.len(), 2);

        let aapl_buys =
            filter_transactions(&transactions, Some(TransactionType::Buy), Some("aapl"), None);
        assert_eq!(aapl_buys.len(), 1);
        assert_eq!(aapl_buys[0].id, 1);

        let all = filter_transactions(&transactions, None, Some("ALL"), None);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_transaction_search_covers_notes() {
        let transactions = vec![transaction(1, "AAPL", TransactionType::Buy, "2026-01-05")];
        assert_eq!(
            filter_transactions(&transactions, None, None, Some("REBALANCE")).len(),
            1
        );
        assert!(filter_transactions(&transactions, None, None, Some("dividend")).is_empty());
    }

    #[test]
    fn test_transaction_date_sort_ties_on_id() {
        let mut transactions = vec![
            transaction(5, "MSFT", TransactionType::Buy, "2026-01-05"),
            transaction(2, "AAPL", TransactionType::Buy, "2026-01-05"),
        ];
        sort_transactions(&mut transactions, TransactionSort::Date, false);
        assert_eq!(transactions[0].id, 2);
        assert_eq!(transactions[1].id, 5);
    }
}
