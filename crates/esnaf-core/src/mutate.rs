//! # Balance / Stock Mutators
//!
//! The two rules that define the derived fields, as pure functions of
//! (current value, signed delta). No independent state.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  addSale(+125,50)      → balance + 12550                            │
//! │  addPayment(125,50)    → balance − 12550  (sign flip upstream)      │
//! │  updateSale            → balance + (new − old)                      │
//! │  deleteSale            → balance − stored total  (reversal)         │
//! │                                                                     │
//! │  The coordinator issues these as relative SQL updates               │
//! │  (`SET balance = balance + ?`), which is the same function          │
//! │  applied server-side.                                               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Results may go negative in both directions: negative stock and
//! negative/positive balances are valid, alert-worthy states, not errors.

use crate::money::Money;

/// Applies a signed delta to a customer balance.
#[inline]
pub fn apply_balance_delta(balance: Money, delta: Money) -> Money {
    balance + delta
}

/// Applies a signed delta to a product stock level.
#[inline]
pub fn apply_stock_delta(stock: i64, delta: i64) -> i64 {
    stock + delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_delta_roundtrip() {
        let balance = Money::zero();
        let after_sale = apply_balance_delta(balance, Money::from_kurus(12550));
        assert_eq!(after_sale.kurus(), 12550);

        let after_payment = apply_balance_delta(after_sale, Money::from_kurus(-12550));
        assert!(after_payment.is_zero());
    }

    #[test]
    fn test_balance_may_go_negative() {
        // Shop owes the customer: valid state
        let balance = apply_balance_delta(Money::zero(), Money::from_kurus(-5000));
        assert_eq!(balance.kurus(), -5000);
    }

    #[test]
    fn test_stock_delta_allows_negative() {
        assert_eq!(apply_stock_delta(15, -2), 13);
        assert_eq!(apply_stock_delta(13, -9), 4);
        // Oversold: allowed, surfaced as a high alert instead
        assert_eq!(apply_stock_delta(4, -10), -6);
    }
}
