//! # esnaf-core: Pure Business Logic for Esnaf Defteri
//!
//! This crate is the **heart** of the Esnaf Defteri bookkeeping system. It
//! contains the ledger rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Esnaf Defteri Architecture                        │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │            Callers (UI forms / AI assistant)                │   │
//! │  │    addSale, addPayment, addStockAdjustment, closeDay, ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │ action payloads                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                 esnaf-ledger (coordinator)                  │   │
//! │  │    one SQLite transaction per primary+derived write pair    │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │               ★ esnaf-core (THIS CRATE) ★                   │   │
//! │  │                                                             │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌───────┐ │   │
//! │  │  │  types  │ │  money  │ │ mutate  │ │ cashbox │ │alerts │ │   │
//! │  │  │Customer │ │  Money  │ │ balance │ │DayTotals│ │ re-   │ │   │
//! │  │  │ Product │ │ (kuruş) │ │  stock  │ │DayClose │ │compute│ │   │
//! │  │  │  Order  │ │         │ │  delta  │ │         │ │       │ │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └─────────┘ └───────┘ │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Golden Rule: NO I/O
//! Everything here is a pure function of its inputs, including the clock:
//! callers pass `now` in explicitly. This makes every invariant testable
//! without a database.
//!
//! ## Example
//! ```rust
//! use esnaf_core::money::Money;
//! use esnaf_core::mutate::apply_balance_delta;
//!
//! // addSale(total = ₺125,50) on a settled account
//! let balance = apply_balance_delta(Money::zero(), Money::from_kurus(12550));
//! assert_eq!(balance.kurus(), 12550);
//!
//! // addPayment flips the sign before applying
//! let balance = apply_balance_delta(balance, -Money::from_kurus(12550));
//! assert!(balance.is_zero());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod alerts;
pub mod cashbox;
pub mod error;
pub mod money;
pub mod mutate;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use esnaf_core::Money` instead of
// `use esnaf_core::money::Money`

pub use error::{ValidationError, ValidationResult};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default owner identity for single-owner runtime.
///
/// The schema scopes every table by `owner_id` (authentication resolves the
/// real identity at the boundary); this constant keeps a single-shop
/// deployment working without that integration.
pub const DEFAULT_OWNER_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Reserved customer id marking an order as a cash sale.
///
/// Orders carrying this sentinel are not tied to any customer account and
/// must never touch a balance; the coordinator checks it on every
/// sale-side operation.
pub const CASH_SALE_CUSTOMER_ID: &str = "cash-sale";

/// A positive balance whose newest order is older than this many days
/// raises an overdue alert.
pub const OVERDUE_BALANCE_DAYS: i64 = 30;

/// Maximum length of name fields.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of free-text descriptions.
pub const MAX_DESCRIPTION_LEN: usize = 500;
