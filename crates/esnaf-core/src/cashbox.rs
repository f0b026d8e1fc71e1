//! # Daily Cashbox Reconciliation Math
//!
//! Pure computation for the cash-drawer day cycle. The ledger crate gathers
//! the SQL sums; this module owns the arithmetic and the calendar-day rule.
//!
//! ## Day Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  OPEN (implicit, no stored entity)                                  │
//! │    opening_cash = latest CashboxEntry.counted_cash  (0 if none)     │
//! │    cash_in      = Σ |total| of today's completed cash orders        │
//! │    card_in      = Σ |total| of today's completed card orders        │
//! │    cash_out     = Σ of today's expense amounts                      │
//! │    expected     = opening + cash_in − cash_out                      │
//! │         │                                                           │
//! │         ▼  close_day(counted_cash, counted_card)                    │
//! │  CLOSED (one immutable CashboxEntry appended)                       │
//! │    cash_difference = counted_cash − expected                        │
//! │                                                                     │
//! │  "Today" is a local calendar date match (year/month/day),           │
//! │  not a rolling 24-hour window.                                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Double-closing the same calendar day is not prevented: each close simply
//! appends another entry. Retained behavior, pending product clarification.

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};

use crate::money::Money;

// =============================================================================
// Day Totals
// =============================================================================

/// The open-state inputs of the current day, gathered by the store layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTotals {
    /// Previous close's counted cash, or zero when no entry exists yet.
    pub opening_cash: Money,
    pub cash_in: Money,
    pub card_in: Money,
    pub cash_out: Money,
}

impl DayTotals {
    /// What should be in the drawer right now.
    #[inline]
    pub fn expected_cash(&self) -> Money {
        self.opening_cash + self.cash_in - self.cash_out
    }

    /// Freezes the expected-vs-counted comparison for a day close.
    pub fn close(&self, counted_cash: Money, counted_card: Money) -> DayClose {
        let expected_cash = self.expected_cash();
        DayClose {
            opening_cash: self.opening_cash,
            cash_in: self.cash_in,
            card_in: self.card_in,
            cash_out: self.cash_out,
            expected_cash,
            counted_cash,
            counted_card,
            cash_difference: counted_cash - expected_cash,
        }
    }
}

/// All fields of one closed day, ready to persist as a `CashboxEntry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayClose {
    pub opening_cash: Money,
    pub cash_in: Money,
    pub card_in: Money,
    pub cash_out: Money,
    pub expected_cash: Money,
    pub counted_cash: Money,
    pub counted_card: Money,
    pub cash_difference: Money,
}

/// Recomputes the variance after an entry edit.
///
/// Edits only re-derive `cash_difference` from the (possibly edited)
/// counted and stored expected values; they never recompute
/// `expected_cash` from live order/expense data.
#[inline]
pub fn cash_difference(counted_cash: Money, expected_cash: Money) -> Money {
    counted_cash - expected_cash
}

// =============================================================================
// Calendar Day
// =============================================================================

/// UTC bounds `[start, end)` of the local calendar day containing `now`.
///
/// The store layer filters today's orders and expenses with these bounds,
/// so "today" follows the shop's wall clock, not UTC midnight.
pub fn local_day_bounds(now: DateTime<Local>) -> (DateTime<Utc>, DateTime<Utc>) {
    let date = now.date_naive();
    let start = Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
        .earliest()
        .unwrap_or(now);
    let end = start + chrono::Duration::days(1);
    (start.with_timezone(&Utc), end.with_timezone(&Utc))
}

/// Whether two instants fall on the same local calendar date.
pub fn same_local_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    let (a, b) = (a.with_timezone(&Local), b.with_timezone(&Local));
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kurus(k: i64) -> Money {
        Money::from_kurus(k)
    }

    #[test]
    fn test_expected_cash() {
        // opening 500,00 + in 2.350,50 − out 450,00 = 2.400,50
        let totals = DayTotals {
            opening_cash: kurus(50000),
            cash_in: kurus(235050),
            card_in: kurus(120000),
            cash_out: kurus(45000),
        };
        assert_eq!(totals.expected_cash().kurus(), 240050);
    }

    #[test]
    fn test_close_computes_variance() {
        let totals = DayTotals {
            opening_cash: kurus(50000),
            cash_in: kurus(235050),
            card_in: kurus(120000),
            cash_out: kurus(45000),
        };
        // Operator counts 2.400,00 against expected 2.400,50
        let close = totals.close(kurus(240000), kurus(120000));
        assert_eq!(close.expected_cash.kurus(), 240050);
        assert_eq!(close.cash_difference.kurus(), -50);
        assert_eq!(close.counted_card.kurus(), 120000);
    }

    #[test]
    fn test_card_in_does_not_affect_drawer() {
        let base = DayTotals {
            opening_cash: kurus(10000),
            cash_in: kurus(5000),
            card_in: Money::zero(),
            cash_out: Money::zero(),
        };
        let with_card = DayTotals {
            card_in: kurus(999999),
            ..base
        };
        assert_eq!(base.expected_cash(), with_card.expected_cash());
    }

    #[test]
    fn test_edit_recomputes_difference_only() {
        let diff = cash_difference(kurus(240000), kurus(240050));
        assert_eq!(diff.kurus(), -50);
    }

    #[test]
    fn test_local_day_bounds_cover_now() {
        let now = Local::now();
        let (start, end) = local_day_bounds(now);
        let now_utc = now.with_timezone(&Utc);
        assert!(start <= now_utc && now_utc < end);
        assert_eq!(end - start, chrono::Duration::days(1));
    }

    #[test]
    fn test_same_local_day() {
        let now = Utc::now();
        assert!(same_local_day(now, now));
        assert!(!same_local_day(now, now - chrono::Duration::days(2)));
    }
}
