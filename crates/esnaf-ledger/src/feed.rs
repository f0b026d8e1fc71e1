//! # Change Feed
//!
//! Live-update stream for filtered collections: after every committed
//! coordinator operation, one event per touched collection is broadcast.
//! Readers (tables, the alert view) re-query on receipt.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  coordinator.add_sale(...) ── commit ──► publish(Orders)            │
//! │                                          publish(Customers)         │
//! │                                               │                     │
//! │             ┌─────────────────────────────────┼──────────────┐      │
//! │             ▼                                 ▼              ▼      │
//! │        orders table                    balance column   alert view  │
//! │        re-queries                      re-queries       recomputes  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Eventually consistent by design: events fire after commit, subscribers
//! catch up asynchronously. A subscriber that lags past the channel
//! capacity sees `RecvError::Lagged` and should simply re-query everything.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

/// Entity collections a reader can subscribe for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Customers,
    Products,
    Orders,
    StockAdjustments,
    Expenses,
    CashboxEntries,
    Suppliers,
    StaffMembers,
}

/// One committed change: which collection, for which owner.
///
/// Deliberately carries no row data; readers hold their own filters and
/// re-query, which keeps owner scoping enforced at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub owner_id: String,
}

/// Broadcast fan-out of change events.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    /// Creates a feed with the given buffered capacity per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        ChangeFeed { tx }
    }

    /// Subscribes to all subsequent change events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Publishes one event. A send with no live subscribers is not an
    /// error; the feed is best-effort by contract.
    pub fn publish(&self, collection: Collection, owner_id: &str) {
        trace!(?collection, owner_id, "change event");
        let _ = self.tx.send(ChangeEvent {
            collection,
            owner_id: owner_id.to_string(),
        });
    }

    /// Publishes one event per touched collection after a commit.
    pub fn publish_all(&self, collections: &[Collection], owner_id: &str) {
        for &collection in collections {
            self.publish(collection, owner_id);
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        // Enough buffer for a burst of operations before a UI catches up
        ChangeFeed::new(64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
