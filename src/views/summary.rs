//! Page-local summary reductions over already-fetched arrays.
//!
//! Missing numerics count as zero and every percentage guards the zero
//! denominator, so an empty or half-populated portfolio renders as zeros
//! instead of NaN.

use crate::api::portfolio::Holding;

/// Percentage weight of `value` in `total`; 0.0 on a zero total
pub fn weight_percent(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        value / total * 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingsTotals {
    pub total_value: f64,
    pub total_gain_loss: f64,
    pub total_cost_basis: f64,
    /// Gain over cost basis; 0.0 when no cost basis is known
    pub gain_loss_percent: f64,
}

pub fn holdings_totals(holdings: &[Holding]) -> HoldingsTotals {
    let total_value: f64 = holdings.iter().map(|h| h.value).sum();
    let total_gain_loss: f64 = holdings.iter().map(|h| h.gain_loss_or_zero()).sum();
    let total_cost_basis: f64 = holdings.iter().filter_map(|h| h.cost_basis).sum();

    let gain_loss_percent = if total_cost_basis == 0.0 {
        0.0
    } else {
        total_gain_loss / total_cost_basis * 100.0
    };

    HoldingsTotals {
        total_value,
        total_gain_loss,
        total_cost_basis,
        gain_loss_percent,
    }
}

/// Value-weighted average of per-holding gain percentages
pub fn weighted_average_gain_percent(holdings: &[Holding]) -> f64 {
    let total_value: f64 = holdings.iter().map(|h| h.value).sum();
    if total_value == 0.0 {
        return 0.0;
    }
    holdings
        .iter()
        .map(|h| h.value / total_value * h.gain_loss_percent.unwrap_or(0.0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(symbol: &str, value: f64, gain_loss: Option<f64>, gain_pct: Option<f64>) -> Holding {
        Holding {
            symbol: symbol.to_string(),
            company_name: None,
            quantity: 0.0,
            last_price: 0.0,
            value,
            cost_basis: gain_loss.map(|g| value - g),
            gain_loss,
            gain_loss_percent: gain_pct,
            portfolio_weight: None,
            sector: None,
            industry: None,
            last_updated: None,
        }
    }

    #[test]
    fn test_weight_percent_guards_zero_total() {
        assert_eq!(weight_percent(500.0, 0.0), 0.0);
        assert_eq!(weight_percent(500.0, 1000.0), 50.0);
        assert!(!weight_percent(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_totals_over_empty_portfolio_are_zero() {
        let totals = holdings_totals(&[]);
        assert_eq!(totals, HoldingsTotals::default());
        assert!(!totals.gain_loss_percent.is_nan());
    }

    #[test]
    fn test_totals_treat_missing_fields_as_zero() {
        let holdings = vec![
            holding("AAPL", 1000.0, Some(100.0), Some(11.1)),
            holding("MSFT", 1000.0, None, None),
        ];
        let totals = holdings_totals(&holdings);
        assert_eq!(totals.total_value, 2000.0);
        assert_eq!(totals.total_gain_loss, 100.0);
        // only AAPL contributed a cost basis
        assert_eq!(totals.total_cost_basis, 900.0);
    }

    #[test]
    fn test_weighted_average_gain_guards_zero_value() {
        let zeroed = vec![holding("AAPL", 0.0, None, Some(5.0))];
        assert_eq!(weighted_average_gain_percent(&zeroed), 0.0);

        let holdings = vec![
            holding("AAPL", 3000.0, None, Some(10.0)),
            holding("MSFT", 1000.0, None, Some(-2.0)),
        ];
        let avg = weighted_average_gain_percent(&holdings);
        assert!((avg - 7.0).abs() < 1e-9);
    }
}
