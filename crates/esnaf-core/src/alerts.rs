//! # Alert Generator
//!
//! Stateless, read-side recompute of operational warnings. Triggered by the
//! change feed whenever products, customers, or orders change; never
//! persisted, never mutating.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  stock < 0                                   → HIGH   (oversold)    │
//! │  0 < stock ≤ low_stock_threshold             → MEDIUM (low stock)   │
//! │  balance > 0 AND newest order > 30 days old  → LOW    (overdue)     │
//! │                                                                     │
//! │  Output sorted high-severity first.                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};

use crate::money::Money;
use crate::types::{AlertSeverity, Customer, MonitoringAlert, Order, Product};
use crate::OVERDUE_BALANCE_DAYS;

/// Recomputes the full alert list from current entity state.
///
/// `now` is passed in by the caller; this crate never reads the clock.
/// Customers with a positive balance but no orders at all are skipped:
/// there is no order date to measure staleness against.
pub fn recompute(
    products: &[Product],
    customers: &[Customer],
    orders: &[Order],
    now: DateTime<Utc>,
) -> Vec<MonitoringAlert> {
    let mut alerts = Vec::new();

    for product in products {
        if product.is_negative_stock() {
            alerts.push(MonitoringAlert {
                id: format!("negative-stock-{}", product.id),
                severity: AlertSeverity::High,
                title: format!("Eksi stok: {}", product.name),
                description: format!(
                    "{} stoğu {} adete düştü; satışlar stoktan fazla işlenmiş.",
                    product.name, product.stock_qty
                ),
                timestamp: now,
            });
        } else if product.is_low_stock() {
            alerts.push(MonitoringAlert {
                id: format!("low-stock-{}", product.id),
                severity: AlertSeverity::Medium,
                title: format!("Düşük stok: {}", product.name),
                description: format!(
                    "{} stoğu {} adet kaldı (eşik: {}).",
                    product.name, product.stock_qty, product.low_stock_threshold
                ),
                timestamp: now,
            });
        }
    }

    let cutoff = now - Duration::days(OVERDUE_BALANCE_DAYS);
    for customer in customers {
        if !customer.owes_shop() {
            continue;
        }
        let newest = orders
            .iter()
            .filter(|o| o.customer_id == customer.id)
            .map(|o| o.date)
            .max();
        if let Some(date) = newest {
            if date < cutoff {
                alerts.push(MonitoringAlert {
                    id: format!("overdue-balance-{}", customer.id),
                    severity: AlertSeverity::Low,
                    title: format!("Geciken bakiye: {}", customer.name),
                    description: format!(
                        "{} borcu {}; son hareketi {} gününü geçti.",
                        customer.name,
                        Money::from_kurus(customer.balance_kurus),
                        OVERDUE_BALANCE_DAYS
                    ),
                    timestamp: now,
                });
            }
        }
    }

    // High first; stable sort keeps entity order within a severity band
    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
    alerts
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderStatus, ProductKind};

    fn product(id: &str, stock: i64, threshold: i64) -> Product {
        Product {
            id: id.into(),
            owner_id: "owner".into(),
            name: format!("Ürün {id}"),
            kind: ProductKind::RedMeat,
            stock_qty: stock,
            price_kurus: 10000,
            cost_kurus: 7000,
            low_stock_threshold: threshold,
            created_at: Utc::now(),
        }
    }

    fn customer(id: &str, balance: i64) -> Customer {
        Customer {
            id: id.into(),
            owner_id: "owner".into(),
            name: format!("Müşteri {id}"),
            email: None,
            balance_kurus: balance,
            created_at: Utc::now(),
        }
    }

    fn order(customer_id: &str, days_ago: i64) -> Order {
        Order {
            id: format!("o-{customer_id}-{days_ago}"),
            owner_id: "owner".into(),
            customer_id: customer_id.into(),
            customer_name: "x".into(),
            description: "kıyma".into(),
            items: 1,
            total_kurus: 10000,
            status: OrderStatus::Completed,
            date: Utc::now() - Duration::days(days_ago),
            payment_method: None,
        }
    }

    #[test]
    fn test_stock_thresholds() {
        // 13 with threshold 5: healthy. 4: low. -2: negative.
        let products = vec![
            product("ok", 13, 5),
            product("low", 4, 5),
            product("neg", -2, 5),
        ];
        let alerts = recompute(&products, &[], &[], Utc::now());

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].severity, AlertSeverity::High);
        assert_eq!(alerts[0].id, "negative-stock-neg");
        assert_eq!(alerts[1].severity, AlertSeverity::Medium);
        assert_eq!(alerts[1].id, "low-stock-low");
    }

    #[test]
    fn test_exact_threshold_is_low() {
        let products = vec![product("edge", 5, 5)];
        let alerts = recompute(&products, &[], &[], Utc::now());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Medium);
    }

    #[test]
    fn test_overdue_balance() {
        let customers = vec![customer("stale", 8875), customer("fresh", 8875)];
        let orders = vec![order("stale", 45), order("fresh", 2)];
        let alerts = recompute(&[], &customers, &orders, Utc::now());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Low);
        assert_eq!(alerts[0].id, "overdue-balance-stale");
    }

    #[test]
    fn test_settled_and_orderless_customers_skipped() {
        // Settled (0) and credit (−) balances never alert; a positive
        // balance with no orders has no date to compare, also skipped
        let customers = vec![
            customer("settled", 0),
            customer("credit", -5000),
            customer("no-orders", 12000),
        ];
        let alerts = recompute(&[], &customers, &[], Utc::now());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_sorted_high_first() {
        let products = vec![product("low", 3, 5), product("neg", -1, 5)];
        let customers = vec![customer("stale", 100)];
        let orders = vec![order("stale", 60)];
        let alerts = recompute(&products, &customers, &orders, Utc::now());

        let severities: Vec<_> = alerts.iter().map(|a| a.severity).collect();
        assert_eq!(
            severities,
            vec![AlertSeverity::High, AlertSeverity::Medium, AlertSeverity::Low]
        );
    }

    #[test]
    fn test_recompute_is_deterministic() {
        let products = vec![product("a", -1, 5), product("b", 2, 5)];
        let now = Utc::now();
        let first = recompute(&products, &[], &[], now);
        let second = recompute(&products, &[], &[], now);
        let ids_first: Vec<_> = first.iter().map(|a| &a.id).collect();
        let ids_second: Vec<_> = second.iter().map(|a| &a.id).collect();
        assert_eq!(ids_first, ids_second);
    }
}
