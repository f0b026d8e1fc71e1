//! # Repository Layer
//!
//! One repository per entity collection. All reads are owner-scoped
//! instance methods on the pool; all writes are associated functions
//! taking a `&mut SqliteConnection`, so the coordinator can compose a
//! primary write and its derived write inside one transaction.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  coordinator.add_sale(...)                                          │
//! │      │                                                              │
//! │      ├── tx = pool.begin()                                          │
//! │      ├── OrderRepository::insert(&mut tx, order)        ← primary   │
//! │      ├── CustomerRepository::apply_balance_delta(&mut tx, ..)       │
//! │      │                                                  ← derived   │
//! │      └── tx.commit()          (all-or-nothing)                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cashbox;
pub mod contact;
pub mod customer;
pub mod expense;
pub mod order;
pub mod product;
pub mod stock;
