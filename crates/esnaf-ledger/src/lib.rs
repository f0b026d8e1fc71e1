//! # esnaf-ledger: SQLite Persistence and Transaction Coordination
//!
//! The store layer of Esnaf Defteri: connection pooling, schema migrations,
//! per-entity repositories, the transaction coordinator, the live change
//! feed, and the assistant action dispatcher.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         esnaf-ledger                                │
//! │                                                                     │
//! │   actions ──────► coordinator ──────► repository::* ──────► SQLite  │
//! │   (assistant        (one txn per        (SQL per entity)            │
//! │    JSON)            primary+derived                                 │
//! │                     write pair)                                     │
//! │                          │                                          │
//! │                          └────► feed (broadcast, after commit)      │
//! │                                                                     │
//! │   pool: Database handle = SqlitePool + ChangeFeed                   │
//! │   migrations: embedded, run on connect                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Discipline
//! Repositories expose reads on the pool and writes as transaction-scoped
//! associated functions. Nothing outside the [`coordinator::Coordinator`]
//! calls a write that touches a derived field (`balance_kurus`,
//! `stock_qty`), which is how the ledger invariants stay provable.
//!
//! ## Example
//! ```rust,ignore
//! use esnaf_ledger::{Database, DbConfig};
//! use esnaf_core::Money;
//!
//! let db = Database::new(DbConfig::new("defter.db")).await?;
//! let ledger = db.coordinator();
//!
//! let customer = ledger.add_customer("Ahmet Yılmaz", None, None).await?;
//! ledger
//!     .add_sale(&customer.id, "2kg kıyma, 1kg sucuk", Money::from_kurus(12550))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod actions;
pub mod coordinator;
pub mod error;
pub mod feed;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use actions::{dispatch, Action, ActionOutcome};
pub use coordinator::Coordinator;
pub use error::{LedgerError, LedgerResult, StoreError, StoreResult};
pub use feed::{ChangeEvent, ChangeFeed, Collection};
pub use pool::{Database, DbConfig};
