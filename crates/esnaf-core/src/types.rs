//! # Domain Types
//!
//! Core domain types for the Esnaf Defteri ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐    ┌───────────────┐    ┌──────────────────┐    │
//! │  │   Customer    │    │    Product    │    │      Order       │    │
//! │  │  ───────────  │    │  ───────────  │    │  ──────────────  │    │
//! │  │  id (UUID)    │◄───│  id (UUID)    │    │  id (UUID)       │    │
//! │  │  balance ◄────┼─┐  │  stock_qty ◄──┼─┐  │  customer_id ────┼──┐ │
//! │  │  (derived)    │ │  │  (derived)    │ │  │  total (signed)  │  │ │
//! │  └───────────────┘ │  └───────────────┘ │  └──────────────────┘  │ │
//! │                    │                    │                        │ │
//! │     Σ order totals─┘   Σ adjustment ────┘   sentinel "cash-sale"─┘ │
//! │                          quantities          skips the balance     │
//! │                                                                     │
//! │  Expense, CashboxEntry, Supplier, StaffMember: no derived fields   │
//! │  MonitoringAlert: ephemeral, recomputed on read, never persisted   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Derived Entity Pattern
//! `Customer.balance` and `Product.stock_qty` are defined as running sums
//! over a dependent collection. They are only ever written together with the
//! order / adjustment that changes them, inside one transaction — that is
//! the coordinator's whole job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product Kind
// =============================================================================

/// Product category for a butcher-shop-style retailer.
///
/// Serde accepts the Turkish labels the original forms submit
/// (e.g. "Kırmızı Et") as aliases of the canonical snake_case names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    #[serde(alias = "Kırmızı Et")]
    RedMeat,
    #[serde(alias = "Beyaz Et")]
    Poultry,
    #[serde(alias = "Sakatat")]
    Offal,
    #[serde(alias = "Şarküteri")]
    Deli,
    #[serde(alias = "Diğer")]
    Other,
}

impl Default for ProductKind {
    fn default() -> Self {
        ProductKind::Other
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order (credit sale, cash sale, or payment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Paid / booked; the only status the cashbox counts.
    Completed,
    /// Recorded but not settled.
    Pending,
    /// Cancelled; kept for history.
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Completed
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How money changed hands. Drives the cashbox cash/card split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash into the drawer.
    Cash,
    /// Card terminal; never enters the drawer.
    Card,
}

// =============================================================================
// Adjustment Category
// =============================================================================

/// Reason for a stock adjustment.
///
/// Turkish aliases match the labels the original forms and the assistant
/// submit ("Bozulma" = spoilage, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentCategory {
    /// Goods received from a supplier.
    #[serde(alias = "Alış", alias = "Alım")]
    Purchase,
    /// Stock consumed by a sale.
    #[serde(alias = "Satış")]
    Sale,
    /// Spoiled / discarded goods.
    #[serde(alias = "Bozulma")]
    Spoilage,
    /// Returned goods back into stock.
    #[serde(alias = "İade")]
    Return,
    /// Physical count correction.
    #[serde(alias = "Sayım")]
    CountCorrection,
    #[serde(alias = "Diğer")]
    Other,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer account with a running balance.
///
/// ## Balance Invariant
/// `balance_kurus` always equals the sum of `total_kurus` over all of this
/// customer's non-deleted orders (cash-sale orders excluded). Positive means
/// the customer owes the shop, negative means the shop owes the customer.
/// Only the Transaction Coordinator writes this field (plus the explicit
/// manual-override operation).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owner identity this record belongs to.
    pub owner_id: String,

    pub name: String,

    pub email: Option<String>,

    /// Derived field: signed running sum of order totals, in kuruş.
    pub balance_kurus: i64,

    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Returns the balance as a Money type.
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_kurus(self.balance_kurus)
    }

    /// Positive balance means the customer owes the shop.
    #[inline]
    pub fn owes_shop(&self) -> bool {
        self.balance_kurus > 0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product with a derived stock level.
///
/// ## Stock Invariant
/// `stock_qty` always equals the sum of `quantity` over this product's
/// stock adjustments, seeded at 0 on creation. Negative stock is a valid,
/// alert-worthy state, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,

    pub owner_id: String,

    pub name: String,

    pub kind: ProductKind,

    /// Derived field: signed running sum of adjustment quantities.
    pub stock_qty: i64,

    /// Sale price in kuruş.
    pub price_kurus: i64,

    /// Purchase cost in kuruş (margin reporting).
    pub cost_kurus: i64,

    /// Stock at or below this level raises a medium alert.
    pub low_stock_threshold: i64,

    pub created_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_kurus(self.price_kurus)
    }

    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_kurus(self.cost_kurus)
    }

    /// Stock has gone below zero (oversold).
    #[inline]
    pub fn is_negative_stock(&self) -> bool {
        self.stock_qty < 0
    }

    /// Stock is positive but at or below the configured threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_qty > 0 && self.stock_qty <= self.low_stock_threshold
    }
}

// =============================================================================
// Order
// =============================================================================

/// A ledger movement against a customer account: credit sale, cash sale,
/// or payment.
///
/// ## Sign Convention
/// `total_kurus > 0` = sale / debt increase, `total_kurus < 0` = payment /
/// debt decrease. For any order whose `customer_id` is not the cash-sale
/// sentinel, the customer's balance reflects this total exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,

    pub owner_id: String,

    /// Customer UUID, or [`crate::CASH_SALE_CUSTOMER_ID`] for an order not
    /// tied to any account (no balance effect).
    pub customer_id: String,

    /// Customer name at write time (snapshot pattern). Goes stale if the
    /// customer is renamed later; accepted behavior.
    pub customer_name: String,

    pub description: String,

    /// Number of line items, derived by counting comma-separated segments of
    /// `description`. A free-text heuristic retained for compatibility.
    pub items: i64,

    /// Signed amount in kuruş.
    pub total_kurus: i64,

    pub status: OrderStatus,

    pub date: DateTime<Utc>,

    /// How the money moved; `None` for pure on-account bookings.
    pub payment_method: Option<PaymentMethod>,
}

impl Order {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_kurus(self.total_kurus)
    }

    /// True when this order carries the cash-sale sentinel and must not
    /// touch any customer balance.
    #[inline]
    pub fn is_cash_sale(&self) -> bool {
        self.customer_id == crate::CASH_SALE_CUSTOMER_ID
    }
}

/// Derives the `items` count from a free-text description.
///
/// Splits on commas and counts segments, exactly as the original forms do.
/// "kuzu pirzola, kıyma" -> 2. An empty description still counts as 1
/// segment; retained quirk, flagged for product clarification.
pub fn item_count(description: &str) -> i64 {
    description.split(',').count() as i64
}

// =============================================================================
// Stock Adjustment
// =============================================================================

/// A signed stock movement against a product.
///
/// Same create/delete-with-reversal lifecycle as [`Order`], but against
/// `Product.stock_qty`. Note the documented asymmetry: *updating* an
/// adjustment overwrites fields without re-applying the quantity delta.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockAdjustment {
    pub id: String,

    pub owner_id: String,

    pub product_id: String,

    /// Product name at write time (snapshot pattern).
    pub product_name: String,

    /// Signed quantity; negative decreases stock.
    pub quantity: i64,

    pub description: String,

    pub category: AdjustmentCategory,

    pub date: DateTime<Utc>,
}

// =============================================================================
// Expense
// =============================================================================

/// A cash outflow. Always positive; no derived-entity side effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: String,

    pub owner_id: String,

    pub date: DateTime<Utc>,

    pub description: String,

    pub category: String,

    /// Validated positive on entry, in kuruş.
    pub amount_kurus: i64,
}

impl Expense {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_kurus(self.amount_kurus)
    }
}

// =============================================================================
// Cashbox Entry
// =============================================================================

/// One day-close record: the frozen expected-vs-counted comparison.
///
/// Append-only. The most recent entry's `counted_cash_kurus` becomes the
/// next day's opening cash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CashboxEntry {
    pub id: String,

    pub owner_id: String,

    pub date: DateTime<Utc>,

    pub opening_cash_kurus: i64,

    /// Σ |total| over the day's completed cash orders.
    pub cash_in_kurus: i64,

    /// Σ |total| over the day's completed card orders.
    pub card_in_kurus: i64,

    /// Σ of the day's expense amounts.
    pub cash_out_kurus: i64,

    /// opening + cash_in − cash_out, frozen at close time.
    pub expected_cash_kurus: i64,

    /// What the operator physically counted.
    pub counted_cash_kurus: i64,

    pub counted_card_kurus: i64,

    /// counted_cash − expected_cash.
    pub cash_difference_kurus: i64,
}

impl CashboxEntry {
    #[inline]
    pub fn expected_cash(&self) -> Money {
        Money::from_kurus(self.expected_cash_kurus)
    }

    #[inline]
    pub fn cash_difference(&self) -> Money {
        Money::from_kurus(self.cash_difference_kurus)
    }
}

// =============================================================================
// Supplier / Staff
// =============================================================================

/// A supplier contact. Flat record, simple CRUD, no derived invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub phone: Option<String>,
    /// Free-text note of what they supply.
    pub product_kinds: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A staff member. Flat record, simple CRUD.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StaffMember {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Monitoring Alert
// =============================================================================

/// Alert severity. Ordering is used only for sort priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

/// An operational warning recomputed from live entity state.
///
/// Ephemeral by design: never persisted, fully rebuilt whenever products,
/// customers, or orders change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringAlert {
    /// Deterministic id derived from the subject entity, so re-renders of
    /// the same condition dedupe naturally.
    pub id: String,
    pub severity: AlertSeverity,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_count_splits_on_commas() {
        assert_eq!(item_count("kuzu pirzola, kıyma, sucuk"), 3);
        assert_eq!(item_count("tek kalem"), 1);
        // Documented quirk: an empty description is still one segment
        assert_eq!(item_count(""), 1);
    }

    #[test]
    fn test_cash_sale_sentinel() {
        let mut order = Order {
            id: "o1".into(),
            owner_id: "owner".into(),
            customer_id: crate::CASH_SALE_CUSTOMER_ID.into(),
            customer_name: "Peşin Satış".into(),
            description: "kıyma".into(),
            items: 1,
            total_kurus: 5000,
            status: OrderStatus::Completed,
            date: Utc::now(),
            payment_method: Some(PaymentMethod::Cash),
        };
        assert!(order.is_cash_sale());

        order.customer_id = "some-customer".into();
        assert!(!order.is_cash_sale());
    }

    #[test]
    fn test_product_stock_predicates() {
        let mut product = Product {
            id: "p1".into(),
            owner_id: "owner".into(),
            name: "Kuzu Pirzola".into(),
            kind: ProductKind::RedMeat,
            stock_qty: 15,
            price_kurus: 45000,
            cost_kurus: 30000,
            low_stock_threshold: 5,
            created_at: Utc::now(),
        };
        assert!(!product.is_low_stock());
        assert!(!product.is_negative_stock());

        product.stock_qty = 4;
        assert!(product.is_low_stock());

        product.stock_qty = -2;
        assert!(product.is_negative_stock());
        assert!(!product.is_low_stock());
    }

    #[test]
    fn test_adjustment_category_turkish_aliases() {
        let cat: AdjustmentCategory = serde_json::from_str("\"Bozulma\"").unwrap();
        assert_eq!(cat, AdjustmentCategory::Spoilage);

        let cat: AdjustmentCategory = serde_json::from_str("\"count_correction\"").unwrap();
        assert_eq!(cat, AdjustmentCategory::CountCorrection);
    }

    #[test]
    fn test_alert_severity_ordering() {
        assert!(AlertSeverity::High > AlertSeverity::Medium);
        assert!(AlertSeverity::Medium > AlertSeverity::Low);
    }
}
