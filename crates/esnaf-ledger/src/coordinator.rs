//! # Transaction Coordinator
//!
//! The one component with real invariants. Every operation that touches a
//! derived field executes its primary write (order / adjustment) and its
//! at-most-one derived write (balance / stock) inside a single SQLite
//! transaction, so no code path can observe or persist an order without
//! its balance update, nor an adjustment without its stock update.
//!
//! ## Operation Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  1. validate input          (ValidationError ⇒ store untouched)     │
//! │  2. resolve secondary entity (NotFound ⇒ abort, no writes)          │
//! │  3. begin transaction                                               │
//! │  4. primary write  + derived write (relative UPDATE)                │
//! │  5. commit          (rollback on any error in 4)                    │
//! │  6. publish change-feed events                                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What This Does NOT Do
//! It does not serialize two independent operations against the same
//! customer from different devices; last write wins there. The atomic batch
//! only guarantees a single operation's multi-row effect is all-or-nothing.

use chrono::{Local, Utc};
use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::feed::{ChangeFeed, Collection};
use crate::repository::cashbox::{generate_cashbox_entry_id, CashboxRepository};
use crate::repository::contact::{generate_contact_id, StaffRepository, SupplierRepository};
use crate::repository::customer::{generate_customer_id, CustomerRepository};
use crate::repository::expense::{generate_expense_id, ExpenseRepository};
use crate::repository::order::{generate_order_id, OrderRepository};
use crate::repository::product::{generate_product_id, ProductRepository};
use crate::repository::stock::{generate_adjustment_id, StockAdjustmentRepository};
use esnaf_core::cashbox::{cash_difference, local_day_bounds, DayTotals};
use esnaf_core::{
    alerts, item_count, validation, AdjustmentCategory, CashboxEntry, Customer, Expense,
    MonitoringAlert, Money, Order, OrderStatus, PaymentMethod, Product, ProductKind, StaffMember,
    StockAdjustment, Supplier, CASH_SALE_CUSTOMER_ID,
};

/// Display name snapshotted onto cash-sale orders.
const CASH_SALE_NAME: &str = "Peşin Satış";

/// Default description for payments recorded without one.
const DEFAULT_PAYMENT_DESCRIPTION: &str = "Ödeme";

/// Executes ledger operations as atomic units, scoped to one owner.
///
/// Cheap to clone and create; holds only pool and feed handles.
#[derive(Debug, Clone)]
pub struct Coordinator {
    pool: sqlx::SqlitePool,
    feed: ChangeFeed,
    owner_id: String,
}

impl Coordinator {
    /// Creates a coordinator. Use [`crate::Database::coordinator_for`]
    /// rather than constructing this directly.
    pub fn new(pool: sqlx::SqlitePool, feed: ChangeFeed, owner_id: String) -> Self {
        Coordinator {
            pool,
            feed,
            owner_id,
        }
    }

    /// The owner identity all operations are scoped to.
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    fn adjustments(&self) -> StockAdjustmentRepository {
        StockAdjustmentRepository::new(self.pool.clone())
    }

    fn expenses(&self) -> ExpenseRepository {
        ExpenseRepository::new(self.pool.clone())
    }

    fn cashbox(&self) -> CashboxRepository {
        CashboxRepository::new(self.pool.clone())
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Creates a customer, optionally with an opening-balance order.
    ///
    /// The opening balance is booked as a regular order in the same
    /// transaction, so the balance invariant holds from the first row.
    pub async fn add_customer(
        &self,
        name: &str,
        email: Option<&str>,
        opening_balance: Option<Money>,
    ) -> LedgerResult<Customer> {
        validation::validate_name(name)?;
        if let Some(email) = email {
            validation::validate_email(email)?;
        }

        let customer = Customer {
            id: generate_customer_id(),
            owner_id: self.owner_id.clone(),
            name: name.trim().to_string(),
            email: email.map(|e| e.trim().to_string()),
            balance_kurus: opening_balance.map(|b| b.kurus()).unwrap_or(0),
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;
        CustomerRepository::insert(&mut tx, &customer).await?;

        if let Some(balance) = opening_balance.filter(|b| !b.is_zero()) {
            let order = Order {
                id: generate_order_id(),
                owner_id: self.owner_id.clone(),
                customer_id: customer.id.clone(),
                customer_name: customer.name.clone(),
                description: "Devir bakiyesi".to_string(),
                items: 1,
                total_kurus: balance.kurus(),
                status: OrderStatus::Completed,
                date: Utc::now(),
                payment_method: None,
            };
            OrderRepository::insert(&mut tx, &order).await?;
        }
        tx.commit().await?;

        self.feed
            .publish_all(&[Collection::Customers, Collection::Orders], &self.owner_id);
        info!(id = %customer.id, name = %customer.name, "Customer created");
        Ok(customer)
    }

    /// Updates a customer's profile fields (never the balance).
    pub async fn update_customer(
        &self,
        id: &str,
        name: &str,
        email: Option<&str>,
    ) -> LedgerResult<()> {
        validation::validate_id("customerId", id)?;
        validation::validate_name(name)?;
        if let Some(email) = email {
            validation::validate_email(email)?;
        }

        let mut conn = self.pool.acquire().await?;
        let rows =
            CustomerRepository::update_profile(&mut conn, &self.owner_id, id, name.trim(), email)
                .await?;
        if rows == 0 {
            return Err(LedgerError::not_found("Customer", id));
        }

        self.feed.publish(Collection::Customers, &self.owner_id);
        Ok(())
    }

    /// Full manual balance override: the only sanctioned direct edit of
    /// the derived field.
    pub async fn set_customer_balance(&self, id: &str, balance: Money) -> LedgerResult<()> {
        validation::validate_id("customerId", id)?;

        let mut conn = self.pool.acquire().await?;
        let rows = CustomerRepository::set_balance(&mut conn, &self.owner_id, id, balance).await?;
        if rows == 0 {
            return Err(LedgerError::not_found("Customer", id));
        }

        self.feed.publish(Collection::Customers, &self.owner_id);
        info!(id = %id, balance = %balance, "Customer balance overridden");
        Ok(())
    }

    /// Cascade-deletes a customer together with all of its orders, as one
    /// atomic batch. A missing customer is a successful no-op.
    pub async fn delete_customer(&self, id: &str) -> LedgerResult<()> {
        validation::validate_id("customerId", id)?;

        let mut tx = self.pool.begin().await?;
        let orders_removed = OrderRepository::delete_for_customer(&mut tx, &self.owner_id, id).await?;
        let rows = CustomerRepository::delete(&mut tx, &self.owner_id, id).await?;
        tx.commit().await?;

        if rows == 0 {
            debug!(id = %id, "delete_customer: already gone, no-op");
            return Ok(());
        }

        self.feed
            .publish_all(&[Collection::Customers, Collection::Orders], &self.owner_id);
        info!(id = %id, orders_removed, "Customer deleted with cascade");
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Creates a product with stock seeded at 0. Opening stock arrives
    /// through [`Self::add_stock_adjustment`], keeping the stock invariant
    /// exact from creation.
    pub async fn add_product(
        &self,
        name: &str,
        kind: ProductKind,
        price: Money,
        cost: Money,
        low_stock_threshold: i64,
    ) -> LedgerResult<Product> {
        validation::validate_name(name)?;

        let product = Product {
            id: generate_product_id(),
            owner_id: self.owner_id.clone(),
            name: name.trim().to_string(),
            kind,
            stock_qty: 0,
            price_kurus: price.kurus(),
            cost_kurus: cost.kurus(),
            low_stock_threshold,
            created_at: Utc::now(),
        };

        let mut conn = self.pool.acquire().await?;
        ProductRepository::insert(&mut conn, &product).await?;

        self.feed.publish(Collection::Products, &self.owner_id);
        info!(id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Updates catalog fields of a product (never the stock level).
    pub async fn update_product(&self, product: &Product) -> LedgerResult<()> {
        validation::validate_id("productId", &product.id)?;
        validation::validate_name(&product.name)?;

        let scoped = Product {
            owner_id: self.owner_id.clone(),
            ..product.clone()
        };

        let mut conn = self.pool.acquire().await?;
        let rows = ProductRepository::update_catalog(&mut conn, &scoped).await?;
        if rows == 0 {
            return Err(LedgerError::not_found("Product", &product.id));
        }

        self.feed.publish(Collection::Products, &self.owner_id);
        Ok(())
    }

    /// Cascade-deletes a product together with all of its stock
    /// adjustments, as one atomic batch. Missing product: no-op.
    pub async fn delete_product(&self, id: &str) -> LedgerResult<()> {
        validation::validate_id("productId", id)?;

        let mut tx = self.pool.begin().await?;
        let adjustments_removed =
            StockAdjustmentRepository::delete_for_product(&mut tx, &self.owner_id, id).await?;
        let rows = ProductRepository::delete(&mut tx, &self.owner_id, id).await?;
        tx.commit().await?;

        if rows == 0 {
            debug!(id = %id, "delete_product: already gone, no-op");
            return Ok(());
        }

        self.feed.publish_all(
            &[Collection::Products, Collection::StockAdjustments],
            &self.owner_id,
        );
        info!(id = %id, adjustments_removed, "Product deleted with cascade");
        Ok(())
    }

    // =========================================================================
    // Sales / Payments (orders + balance)
    // =========================================================================

    /// Records a credit sale: Order(total > 0) plus balance increase, one
    /// transaction. The cash-sale sentinel is exempt from the customer
    /// lookup and skips the balance step entirely.
    pub async fn add_sale(
        &self,
        customer_id: &str,
        description: &str,
        total: Money,
    ) -> LedgerResult<Order> {
        validation::validate_id("customerId", customer_id)?;
        validation::validate_description(description)?;
        validation::validate_positive_amount("total", total)?;

        let customer_name = self.resolve_customer_name(customer_id).await?;

        let order = Order {
            id: generate_order_id(),
            owner_id: self.owner_id.clone(),
            customer_id: customer_id.to_string(),
            customer_name,
            description: description.trim().to_string(),
            items: item_count(description.trim()),
            total_kurus: total.kurus(),
            status: OrderStatus::Completed,
            date: Utc::now(),
            payment_method: None,
        };

        self.insert_order_applying_balance(order).await
    }

    /// Records a payment: the caller submits a positive amount, the sign
    /// flip to a negative order total happens here.
    pub async fn add_payment(
        &self,
        customer_id: &str,
        total: Money,
        description: Option<&str>,
        payment_method: PaymentMethod,
    ) -> LedgerResult<Order> {
        validation::validate_id("customerId", customer_id)?;
        validation::validate_positive_amount("total", total)?;
        if let Some(description) = description {
            validation::validate_description(description)?;
        }

        let customer_name = self.resolve_customer_name(customer_id).await?;
        let description = description
            .map(|d| d.trim().to_string())
            .unwrap_or_else(|| DEFAULT_PAYMENT_DESCRIPTION.to_string());

        let order = Order {
            id: generate_order_id(),
            owner_id: self.owner_id.clone(),
            customer_id: customer_id.to_string(),
            customer_name,
            items: item_count(&description),
            description,
            total_kurus: (-total).kurus(),
            status: OrderStatus::Completed,
            date: Utc::now(),
            payment_method: Some(payment_method),
        };

        self.insert_order_applying_balance(order).await
    }

    /// Records a cash sale: an order under the sentinel customer id, with
    /// no balance mutation at all.
    pub async fn add_cash_sale(
        &self,
        description: &str,
        total: Money,
        payment_method: PaymentMethod,
    ) -> LedgerResult<Order> {
        validation::validate_description(description)?;
        validation::validate_positive_amount("total", total)?;

        let order = Order {
            id: generate_order_id(),
            owner_id: self.owner_id.clone(),
            customer_id: CASH_SALE_CUSTOMER_ID.to_string(),
            customer_name: CASH_SALE_NAME.to_string(),
            description: description.trim().to_string(),
            items: item_count(description.trim()),
            total_kurus: total.kurus(),
            status: OrderStatus::Completed,
            date: Utc::now(),
            payment_method: Some(payment_method),
        };

        self.insert_order_applying_balance(order).await
    }

    /// Rewrites a stored order and applies the total's delta to the
    /// (possibly unchanged) customer's balance, unless the sentinel.
    /// Fails with `NotFound` and performs no writes when the order does
    /// not exist.
    pub async fn update_sale(&self, order: &Order) -> LedgerResult<Order> {
        validation::validate_id("orderId", &order.id)?;
        validation::validate_description(&order.description)?;

        let prior = self
            .orders()
            .get_by_id(&self.owner_id, &order.id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Order", &order.id))?;

        let description = order.description.trim().to_string();
        let updated = Order {
            owner_id: self.owner_id.clone(),
            items: item_count(&description),
            description,
            ..order.clone()
        };
        let delta = updated.total() - prior.total();

        let mut tx = self.pool.begin().await?;
        let rows = OrderRepository::update(&mut tx, &updated).await?;
        if rows == 0 {
            return Err(LedgerError::not_found("Order", &order.id));
        }
        if !updated.is_cash_sale() && !delta.is_zero() {
            let rows = CustomerRepository::apply_balance_delta(
                &mut tx,
                &self.owner_id,
                &updated.customer_id,
                delta,
            )
            .await?;
            if rows == 0 {
                return Err(LedgerError::not_found("Customer", &updated.customer_id));
            }
        }
        tx.commit().await?;

        self.feed
            .publish_all(&[Collection::Orders, Collection::Customers], &self.owner_id);
        info!(id = %updated.id, delta = %delta, "Sale updated");
        Ok(updated)
    }

    /// Deletes an order and reverses its balance effect. A missing order
    /// is a successful no-op, by design, not an error.
    pub async fn delete_sale(&self, order_id: &str) -> LedgerResult<()> {
        validation::validate_id("orderId", order_id)?;

        let Some(prior) = self.orders().get_by_id(&self.owner_id, order_id).await? else {
            debug!(id = %order_id, "delete_sale: already gone, no-op");
            return Ok(());
        };

        let mut tx = self.pool.begin().await?;
        OrderRepository::delete(&mut tx, &self.owner_id, order_id).await?;
        if !prior.is_cash_sale() {
            // Reversal: subtract the stored total. Zero affected rows means
            // the customer is already gone and there is nothing to reverse.
            let rows = CustomerRepository::apply_balance_delta(
                &mut tx,
                &self.owner_id,
                &prior.customer_id,
                -prior.total(),
            )
            .await?;
            if rows == 0 {
                debug!(customer_id = %prior.customer_id, "reversal target missing");
            }
        }
        tx.commit().await?;

        self.feed
            .publish_all(&[Collection::Orders, Collection::Customers], &self.owner_id);
        info!(id = %order_id, total = %prior.total(), "Sale deleted with reversal");
        Ok(())
    }

    /// Snapshot lookup for the order's `customer_name`; also the
    /// existence check that aborts the operation before any write.
    async fn resolve_customer_name(&self, customer_id: &str) -> LedgerResult<String> {
        if customer_id == CASH_SALE_CUSTOMER_ID {
            return Ok(CASH_SALE_NAME.to_string());
        }
        let customer = self
            .customers()
            .get_by_id(&self.owner_id, customer_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Customer", customer_id))?;
        Ok(customer.name)
    }

    /// Shared tail of the three order-creating operations: primary insert
    /// plus derived balance update, one transaction.
    async fn insert_order_applying_balance(&self, order: Order) -> LedgerResult<Order> {
        let mut tx = self.pool.begin().await?;
        OrderRepository::insert(&mut tx, &order).await?;
        if !order.is_cash_sale() {
            let rows = CustomerRepository::apply_balance_delta(
                &mut tx,
                &self.owner_id,
                &order.customer_id,
                order.total(),
            )
            .await?;
            if rows == 0 {
                // Customer vanished between lookup and write: abort both
                return Err(LedgerError::not_found("Customer", &order.customer_id));
            }
        }
        tx.commit().await?;

        self.feed
            .publish_all(&[Collection::Orders, Collection::Customers], &self.owner_id);
        info!(
            id = %order.id,
            customer_id = %order.customer_id,
            total = %order.total(),
            "Order recorded"
        );
        Ok(order)
    }

    // =========================================================================
    // Stock adjustments (adjustments + stock)
    // =========================================================================

    /// Records a stock adjustment and moves the product's stock by the
    /// signed quantity, one transaction. `NotFound` when the product does
    /// not resolve.
    pub async fn add_stock_adjustment(
        &self,
        product_id: &str,
        quantity: i64,
        description: &str,
        category: AdjustmentCategory,
    ) -> LedgerResult<StockAdjustment> {
        validation::validate_id("productId", product_id)?;
        validation::validate_adjustment_quantity(quantity)?;
        validation::validate_description(description)?;

        let product = self
            .products()
            .get_by_id(&self.owner_id, product_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Product", product_id))?;

        let adjustment = StockAdjustment {
            id: generate_adjustment_id(),
            owner_id: self.owner_id.clone(),
            product_id: product_id.to_string(),
            product_name: product.name,
            quantity,
            description: description.trim().to_string(),
            category,
            date: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;
        StockAdjustmentRepository::insert(&mut tx, &adjustment).await?;
        let rows =
            ProductRepository::apply_stock_delta(&mut tx, &self.owner_id, product_id, quantity)
                .await?;
        if rows == 0 {
            return Err(LedgerError::not_found("Product", product_id));
        }
        tx.commit().await?;

        self.feed.publish_all(
            &[Collection::StockAdjustments, Collection::Products],
            &self.owner_id,
        );
        info!(
            id = %adjustment.id,
            product_id = %product_id,
            quantity,
            "Stock adjustment recorded"
        );
        Ok(adjustment)
    }

    /// Overwrites a stored adjustment's fields WITHOUT re-applying the
    /// quantity to the product's stock.
    ///
    /// This mirrors the reference behavior: unlike `update_sale`, no delta
    /// is computed, so editing the quantity drifts stock away from the
    /// adjustment sum. Known limitation, kept deliberately pending a
    /// product-owner decision; do not "fix" silently.
    pub async fn update_stock_adjustment(&self, adjustment: &StockAdjustment) -> LedgerResult<()> {
        validation::validate_id("adjustmentId", &adjustment.id)?;
        validation::validate_adjustment_quantity(adjustment.quantity)?;
        validation::validate_description(&adjustment.description)?;

        let scoped = StockAdjustment {
            owner_id: self.owner_id.clone(),
            ..adjustment.clone()
        };

        let mut conn = self.pool.acquire().await?;
        let rows = StockAdjustmentRepository::update_fields(&mut conn, &scoped).await?;
        if rows == 0 {
            return Err(LedgerError::not_found("StockAdjustment", &adjustment.id));
        }

        self.feed
            .publish(Collection::StockAdjustments, &self.owner_id);
        info!(id = %adjustment.id, "Stock adjustment fields updated (no stock delta)");
        Ok(())
    }

    /// Deletes an adjustment and reverses its stock effect. Missing
    /// adjustment: successful no-op.
    pub async fn delete_stock_adjustment(&self, id: &str) -> LedgerResult<()> {
        validation::validate_id("adjustmentId", id)?;

        let Some(prior) = self.adjustments().get_by_id(&self.owner_id, id).await? else {
            debug!(id = %id, "delete_stock_adjustment: already gone, no-op");
            return Ok(());
        };

        let mut tx = self.pool.begin().await?;
        StockAdjustmentRepository::delete(&mut tx, &self.owner_id, id).await?;
        let rows = ProductRepository::apply_stock_delta(
            &mut tx,
            &self.owner_id,
            &prior.product_id,
            -prior.quantity,
        )
        .await?;
        if rows == 0 {
            debug!(product_id = %prior.product_id, "reversal target missing");
        }
        tx.commit().await?;

        self.feed.publish_all(
            &[Collection::StockAdjustments, Collection::Products],
            &self.owner_id,
        );
        info!(id = %id, quantity = prior.quantity, "Stock adjustment deleted with reversal");
        Ok(())
    }

    // =========================================================================
    // Expenses
    // =========================================================================

    /// Records an expense. Always a positive cash outflow; no derived
    /// side effect beyond the cashbox's read-time sum.
    pub async fn add_expense(
        &self,
        description: &str,
        category: &str,
        amount: Money,
    ) -> LedgerResult<Expense> {
        validation::validate_description(description)?;
        validation::validate_positive_amount("amount", amount)?;

        let expense = Expense {
            id: generate_expense_id(),
            owner_id: self.owner_id.clone(),
            date: Utc::now(),
            description: description.trim().to_string(),
            category: category.trim().to_string(),
            amount_kurus: amount.kurus(),
        };

        let mut conn = self.pool.acquire().await?;
        ExpenseRepository::insert(&mut conn, &expense).await?;

        self.feed.publish(Collection::Expenses, &self.owner_id);
        info!(id = %expense.id, amount = %amount, "Expense recorded");
        Ok(expense)
    }

    /// Overwrites a stored expense.
    pub async fn update_expense(&self, expense: &Expense) -> LedgerResult<()> {
        validation::validate_id("expenseId", &expense.id)?;
        validation::validate_description(&expense.description)?;
        validation::validate_positive_amount("amount", expense.amount())?;

        let scoped = Expense {
            owner_id: self.owner_id.clone(),
            ..expense.clone()
        };

        let mut conn = self.pool.acquire().await?;
        let rows = ExpenseRepository::update(&mut conn, &scoped).await?;
        if rows == 0 {
            return Err(LedgerError::not_found("Expense", &expense.id));
        }

        self.feed.publish(Collection::Expenses, &self.owner_id);
        Ok(())
    }

    /// Deletes an expense. Missing expense: successful no-op.
    pub async fn delete_expense(&self, id: &str) -> LedgerResult<()> {
        validation::validate_id("expenseId", id)?;

        let mut conn = self.pool.acquire().await?;
        let rows = ExpenseRepository::delete(&mut conn, &self.owner_id, id).await?;
        if rows == 0 {
            debug!(id = %id, "delete_expense: already gone, no-op");
            return Ok(());
        }

        self.feed.publish(Collection::Expenses, &self.owner_id);
        Ok(())
    }

    // =========================================================================
    // Cashbox
    // =========================================================================

    /// The implicit open state of the current local calendar day.
    pub async fn day_totals(&self) -> LedgerResult<DayTotals> {
        let opening_cash = self
            .cashbox()
            .latest(&self.owner_id)
            .await?
            .map(|e| Money::from_kurus(e.counted_cash_kurus))
            .unwrap_or_default();

        let (start, end) = local_day_bounds(Local::now());
        let cash_in = self
            .orders()
            .sum_completed_abs_total(&self.owner_id, PaymentMethod::Cash, start, end)
            .await?;
        let card_in = self
            .orders()
            .sum_completed_abs_total(&self.owner_id, PaymentMethod::Card, start, end)
            .await?;
        let cash_out = self
            .expenses()
            .sum_for_range(&self.owner_id, start, end)
            .await?;

        Ok(DayTotals {
            opening_cash,
            cash_in: Money::from_kurus(cash_in),
            card_in: Money::from_kurus(card_in),
            cash_out: Money::from_kurus(cash_out),
        })
    }

    /// Closes the day: freezes the expected-vs-counted comparison into one
    /// immutable cashbox entry. A second close on the same calendar day
    /// simply appends another entry (not guarded, retained behavior).
    pub async fn close_day(
        &self,
        counted_cash: Money,
        counted_card: Money,
    ) -> LedgerResult<CashboxEntry> {
        validation::validate_counted_amount("countedCash", counted_cash)?;
        validation::validate_counted_amount("countedCard", counted_card)?;

        let close = self.day_totals().await?.close(counted_cash, counted_card);

        let entry = CashboxEntry {
            id: generate_cashbox_entry_id(),
            owner_id: self.owner_id.clone(),
            date: Utc::now(),
            opening_cash_kurus: close.opening_cash.kurus(),
            cash_in_kurus: close.cash_in.kurus(),
            card_in_kurus: close.card_in.kurus(),
            cash_out_kurus: close.cash_out.kurus(),
            expected_cash_kurus: close.expected_cash.kurus(),
            counted_cash_kurus: close.counted_cash.kurus(),
            counted_card_kurus: close.counted_card.kurus(),
            cash_difference_kurus: close.cash_difference.kurus(),
        };

        let mut conn = self.pool.acquire().await?;
        CashboxRepository::insert(&mut conn, &entry).await?;

        self.feed.publish(Collection::CashboxEntries, &self.owner_id);
        info!(
            id = %entry.id,
            expected = %entry.expected_cash(),
            difference = %entry.cash_difference(),
            "Day closed"
        );
        Ok(entry)
    }

    /// Edits a stored entry: re-derives `cash_difference` from the edited
    /// counted/expected values and overwrites. Never recomputes
    /// `expected_cash` from live order/expense data.
    pub async fn update_cashbox_entry(&self, entry: &CashboxEntry) -> LedgerResult<CashboxEntry> {
        validation::validate_id("entryId", &entry.id)?;

        let updated = CashboxEntry {
            owner_id: self.owner_id.clone(),
            cash_difference_kurus: cash_difference(
                Money::from_kurus(entry.counted_cash_kurus),
                Money::from_kurus(entry.expected_cash_kurus),
            )
            .kurus(),
            ..entry.clone()
        };

        let mut conn = self.pool.acquire().await?;
        let rows = CashboxRepository::update(&mut conn, &updated).await?;
        if rows == 0 {
            return Err(LedgerError::not_found("CashboxEntry", &entry.id));
        }

        self.feed.publish(Collection::CashboxEntries, &self.owner_id);
        Ok(updated)
    }

    // =========================================================================
    // Suppliers / Staff
    // =========================================================================

    /// Creates a supplier record.
    pub async fn add_supplier(
        &self,
        name: &str,
        phone: Option<&str>,
        product_kinds: Option<&str>,
    ) -> LedgerResult<Supplier> {
        validation::validate_name(name)?;

        let supplier = Supplier {
            id: generate_contact_id(),
            owner_id: self.owner_id.clone(),
            name: name.trim().to_string(),
            phone: phone.map(str::to_string),
            product_kinds: product_kinds.map(str::to_string),
            created_at: Utc::now(),
        };

        let mut conn = self.pool.acquire().await?;
        SupplierRepository::insert(&mut conn, &supplier).await?;

        self.feed.publish(Collection::Suppliers, &self.owner_id);
        Ok(supplier)
    }

    /// Overwrites a supplier record.
    pub async fn update_supplier(&self, supplier: &Supplier) -> LedgerResult<()> {
        validation::validate_id("supplierId", &supplier.id)?;
        validation::validate_name(&supplier.name)?;

        let scoped = Supplier {
            owner_id: self.owner_id.clone(),
            ..supplier.clone()
        };

        let mut conn = self.pool.acquire().await?;
        let rows = SupplierRepository::update(&mut conn, &scoped).await?;
        if rows == 0 {
            return Err(LedgerError::not_found("Supplier", &supplier.id));
        }

        self.feed.publish(Collection::Suppliers, &self.owner_id);
        Ok(())
    }

    /// Deletes a supplier. Missing supplier: successful no-op.
    pub async fn delete_supplier(&self, id: &str) -> LedgerResult<()> {
        validation::validate_id("supplierId", id)?;

        let mut conn = self.pool.acquire().await?;
        SupplierRepository::delete(&mut conn, &self.owner_id, id).await?;

        self.feed.publish(Collection::Suppliers, &self.owner_id);
        Ok(())
    }

    /// Creates a staff member record.
    pub async fn add_staff_member(
        &self,
        name: &str,
        role: Option<&str>,
        phone: Option<&str>,
    ) -> LedgerResult<StaffMember> {
        validation::validate_name(name)?;

        let staff = StaffMember {
            id: generate_contact_id(),
            owner_id: self.owner_id.clone(),
            name: name.trim().to_string(),
            role: role.map(str::to_string),
            phone: phone.map(str::to_string),
            created_at: Utc::now(),
        };

        let mut conn = self.pool.acquire().await?;
        StaffRepository::insert(&mut conn, &staff).await?;

        self.feed.publish(Collection::StaffMembers, &self.owner_id);
        Ok(staff)
    }

    /// Overwrites a staff member record.
    pub async fn update_staff_member(&self, staff: &StaffMember) -> LedgerResult<()> {
        validation::validate_id("staffId", &staff.id)?;
        validation::validate_name(&staff.name)?;

        let scoped = StaffMember {
            owner_id: self.owner_id.clone(),
            ..staff.clone()
        };

        let mut conn = self.pool.acquire().await?;
        let rows = StaffRepository::update(&mut conn, &scoped).await?;
        if rows == 0 {
            return Err(LedgerError::not_found("StaffMember", &staff.id));
        }

        self.feed.publish(Collection::StaffMembers, &self.owner_id);
        Ok(())
    }

    /// Deletes a staff member. Missing record: successful no-op.
    pub async fn delete_staff_member(&self, id: &str) -> LedgerResult<()> {
        validation::validate_id("staffId", id)?;

        let mut conn = self.pool.acquire().await?;
        StaffRepository::delete(&mut conn, &self.owner_id, id).await?;

        self.feed.publish(Collection::StaffMembers, &self.owner_id);
        Ok(())
    }

    // =========================================================================
    // Read-side views
    // =========================================================================

    /// Recomputes the full monitoring alert list from current state.
    /// Pure read: derived as a function of products, customers, orders.
    pub async fn monitoring_alerts(&self) -> LedgerResult<Vec<MonitoringAlert>> {
        let products = self.products().list(&self.owner_id).await?;
        let customers = self.customers().list(&self.owner_id).await?;
        let orders = self.orders().list(&self.owner_id).await?;
        Ok(alerts::recompute(&products, &customers, &orders, Utc::now()))
    }
}

// =============================================================================
// Integration Tests (in-memory database)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use esnaf_core::AlertSeverity;

    async fn test_db() -> Database {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Balance invariant check: the stored balance must equal the sum of
    /// the customer's order totals.
    async fn assert_balance_invariant(db: &Database, owner: &str, customer_id: &str) {
        let customer = db
            .customers()
            .get_by_id(owner, customer_id)
            .await
            .unwrap()
            .unwrap();
        let sum: i64 = db
            .orders()
            .list_for_customer(owner, customer_id)
            .await
            .unwrap()
            .iter()
            .map(|o| o.total_kurus)
            .sum();
        assert_eq!(customer.balance_kurus, sum, "balance invariant violated");
    }

    // -------------------------------------------------------------------------
    // Sales and payments
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_add_sale_updates_balance_and_snapshots_name() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let customer = ledger.add_customer("Ahmet Yılmaz", None, None).await.unwrap();
        let order = ledger
            .add_sale(&customer.id, "2kg kıyma, 1kg sucuk", Money::from_kurus(12550))
            .await
            .unwrap();

        assert_eq!(order.total_kurus, 12550);
        assert_eq!(order.customer_name, "Ahmet Yılmaz");
        assert_eq!(order.items, 2);
        assert_eq!(order.status, OrderStatus::Completed);

        let customer = db
            .customers()
            .get_by_id(ledger.owner_id(), &customer.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.balance_kurus, 12550);
        assert_balance_invariant(&db, ledger.owner_id(), &customer.id).await;
    }

    #[tokio::test]
    async fn test_add_payment_stores_negative_total() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let customer = ledger
            .add_customer("Borçlu", None, Some(Money::from_kurus(50000)))
            .await
            .unwrap();
        let payment = ledger
            .add_payment(&customer.id, Money::from_kurus(20000), None, PaymentMethod::Cash)
            .await
            .unwrap();

        assert_eq!(payment.total_kurus, -20000);
        assert_eq!(payment.payment_method, Some(PaymentMethod::Cash));

        let customer = db
            .customers()
            .get_by_id(ledger.owner_id(), &customer.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.balance_kurus, 30000);
        assert_balance_invariant(&db, ledger.owner_id(), &customer.id).await;
    }

    #[tokio::test]
    async fn test_cash_sale_touches_no_balance() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let customer = ledger.add_customer("Müşteri", None, None).await.unwrap();
        let order = ledger
            .add_cash_sale("1kg kuşbaşı", Money::from_kurus(40000), PaymentMethod::Cash)
            .await
            .unwrap();

        assert!(order.is_cash_sale());
        assert_eq!(order.customer_name, CASH_SALE_NAME);

        let customer = db
            .customers()
            .get_by_id(ledger.owner_id(), &customer.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.balance_kurus, 0);
    }

    #[tokio::test]
    async fn test_add_sale_unknown_customer_writes_nothing() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let err = ledger
            .add_sale("no-such-customer", "kıyma", Money::from_kurus(1000))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));

        // Failed operation must not leave a dangling order behind
        let orders = db.orders().list(ledger.owner_id()).await.unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_add_sale_rejects_non_positive_total() {
        let db = test_db().await;
        let ledger = db.coordinator();
        let customer = ledger.add_customer("Müşteri", None, None).await.unwrap();

        let err = ledger
            .add_sale(&customer.id, "kıyma", Money::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_sale_applies_delta_to_new_customer() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let a = ledger.add_customer("A", None, None).await.unwrap();
        let b = ledger.add_customer("B", None, None).await.unwrap();
        let order = ledger
            .add_sale(&a.id, "kıyma", Money::from_kurus(10000))
            .await
            .unwrap();

        // Reassign the order to B with a new total: the delta lands on B,
        // A keeps the original total on its balance. Retained behavior.
        let edited = Order {
            customer_id: b.id.clone(),
            total_kurus: 15000,
            ..order
        };
        ledger.update_sale(&edited).await.unwrap();

        let a = db.customers().get_by_id(ledger.owner_id(), &a.id).await.unwrap().unwrap();
        let b = db.customers().get_by_id(ledger.owner_id(), &b.id).await.unwrap().unwrap();
        assert_eq!(a.balance_kurus, 10000);
        assert_eq!(b.balance_kurus, 5000);
    }

    #[tokio::test]
    async fn test_update_sale_trims_stored_description() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let customer = ledger.add_customer("Müşteri", None, None).await.unwrap();
        let order = ledger
            .add_sale(&customer.id, "kıyma", Money::from_kurus(5000))
            .await
            .unwrap();

        let edited = Order {
            description: "  kuzu pirzola, kıyma  ".into(),
            ..order
        };
        let updated = ledger.update_sale(&edited).await.unwrap();
        assert_eq!(updated.description, "kuzu pirzola, kıyma");
        assert_eq!(updated.items, 2);

        let stored = db
            .orders()
            .get_by_id(ledger.owner_id(), &updated.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.description, "kuzu pirzola, kıyma");
    }

    #[tokio::test]
    async fn test_update_sale_rolls_back_when_balance_write_fails() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let customer = ledger.add_customer("Müşteri", None, None).await.unwrap();
        let order = ledger
            .add_sale(&customer.id, "kıyma", Money::from_kurus(10000))
            .await
            .unwrap();

        // Pull the customer row out from under the order, bypassing the
        // cascade, so the balance update inside the batch hits zero rows
        let mut conn = db.pool().acquire().await.unwrap();
        CustomerRepository::delete(&mut conn, ledger.owner_id(), &customer.id)
            .await
            .unwrap();
        drop(conn);

        let edited = Order {
            total_kurus: 99999,
            ..order.clone()
        };
        let err = ledger.update_sale(&edited).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));

        // The order rewrite happened inside the same transaction and must
        // have rolled back with it
        let stored = db
            .orders()
            .get_by_id(ledger.owner_id(), &order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_kurus, 10000);
    }

    #[tokio::test]
    async fn test_update_sale_missing_order_is_not_found() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let phantom = Order {
            id: "ghost".into(),
            owner_id: ledger.owner_id().to_string(),
            customer_id: CASH_SALE_CUSTOMER_ID.into(),
            customer_name: CASH_SALE_NAME.into(),
            description: "kıyma".into(),
            items: 1,
            total_kurus: 1000,
            status: OrderStatus::Completed,
            date: Utc::now(),
            payment_method: Some(PaymentMethod::Cash),
        };
        let err = ledger.update_sale(&phantom).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_sale_reverses_balance() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let customer = ledger.add_customer("Müşteri", None, None).await.unwrap();
        let order = ledger
            .add_sale(&customer.id, "kıyma", Money::from_kurus(12550))
            .await
            .unwrap();
        ledger.delete_sale(&order.id).await.unwrap();

        let customer = db
            .customers()
            .get_by_id(ledger.owner_id(), &customer.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.balance_kurus, 0);
        assert_balance_invariant(&db, ledger.owner_id(), &customer.id).await;
    }

    #[tokio::test]
    async fn test_delete_missing_sale_is_noop() {
        let db = test_db().await;
        let ledger = db.coordinator();
        ledger.delete_sale("no-such-order").await.unwrap();
    }

    // -------------------------------------------------------------------------
    // Stock adjustments
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_stock_adjustment_moves_stock() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let product = ledger
            .add_product(
                "Kuzu Pirzola",
                ProductKind::RedMeat,
                Money::from_kurus(45000),
                Money::from_kurus(30000),
                5,
            )
            .await
            .unwrap();
        ledger
            .add_stock_adjustment(&product.id, 15, "açılış sayımı", AdjustmentCategory::Purchase)
            .await
            .unwrap();
        let adjustment = ledger
            .add_stock_adjustment(&product.id, -2, "bozuk ürün", AdjustmentCategory::Spoilage)
            .await
            .unwrap();

        assert_eq!(adjustment.product_name, "Kuzu Pirzola");

        let product = db
            .products()
            .get_by_id(ledger.owner_id(), &product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.stock_qty, 13);
    }

    #[tokio::test]
    async fn test_update_adjustment_does_not_reapply_stock() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let product = ledger
            .add_product("Sucuk", ProductKind::Deli, Money::from_kurus(30000), Money::from_kurus(20000), 3)
            .await
            .unwrap();
        let adjustment = ledger
            .add_stock_adjustment(&product.id, 10, "alım", AdjustmentCategory::Purchase)
            .await
            .unwrap();

        // Editing the quantity rewrites the row only; stock stays at 10
        let edited = StockAdjustment {
            quantity: 99,
            ..adjustment
        };
        ledger.update_stock_adjustment(&edited).await.unwrap();

        let product = db
            .products()
            .get_by_id(ledger.owner_id(), &product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.stock_qty, 10);

        let stored = db
            .adjustments()
            .get_by_id(ledger.owner_id(), &edited.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.quantity, 99);
    }

    #[tokio::test]
    async fn test_delete_adjustment_reverses_stock() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let product = ledger
            .add_product("Kıyma", ProductKind::RedMeat, Money::from_kurus(35000), Money::from_kurus(25000), 3)
            .await
            .unwrap();
        let adjustment = ledger
            .add_stock_adjustment(&product.id, -4, "satış", AdjustmentCategory::Sale)
            .await
            .unwrap();
        ledger.delete_stock_adjustment(&adjustment.id).await.unwrap();

        let product = db
            .products()
            .get_by_id(ledger.owner_id(), &product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.stock_qty, 0);
    }

    #[tokio::test]
    async fn test_adjustment_unknown_product_writes_nothing() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let err = ledger
            .add_stock_adjustment("ghost", 5, "alım", AdjustmentCategory::Purchase)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
        assert!(db.adjustments().list(ledger.owner_id()).await.unwrap().is_empty());
    }

    // -------------------------------------------------------------------------
    // Cascade deletes
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_delete_customer_cascades_orders() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let customer = ledger.add_customer("Müşteri", None, None).await.unwrap();
        ledger
            .add_sale(&customer.id, "kıyma", Money::from_kurus(5000))
            .await
            .unwrap();
        ledger
            .add_sale(&customer.id, "sucuk", Money::from_kurus(3000))
            .await
            .unwrap();

        ledger.delete_customer(&customer.id).await.unwrap();

        assert!(db.customers().get_by_id(ledger.owner_id(), &customer.id).await.unwrap().is_none());
        assert!(db.orders().list(ledger.owner_id()).await.unwrap().is_empty());

        // And again: missing customer deletes are silent no-ops
        ledger.delete_customer(&customer.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_product_cascades_adjustments() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let product = ledger
            .add_product("Sucuk", ProductKind::Deli, Money::from_kurus(30000), Money::from_kurus(20000), 3)
            .await
            .unwrap();
        ledger
            .add_stock_adjustment(&product.id, 8, "alım", AdjustmentCategory::Purchase)
            .await
            .unwrap();

        ledger.delete_product(&product.id).await.unwrap();

        assert!(db.products().get_by_id(ledger.owner_id(), &product.id).await.unwrap().is_none());
        assert!(db.adjustments().list(ledger.owner_id()).await.unwrap().is_empty());
    }

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_opening_balance_books_an_order() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let customer = ledger
            .add_customer("Eski Müşteri", None, Some(Money::from_kurus(75000)))
            .await
            .unwrap();
        assert_eq!(customer.balance_kurus, 75000);
        assert_balance_invariant(&db, ledger.owner_id(), &customer.id).await;
    }

    #[tokio::test]
    async fn test_set_customer_balance_override() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let customer = ledger.add_customer("Müşteri", None, None).await.unwrap();
        ledger
            .set_customer_balance(&customer.id, Money::from_kurus(-2500))
            .await
            .unwrap();

        let customer = db
            .customers()
            .get_by_id(ledger.owner_id(), &customer.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.balance_kurus, -2500);
    }

    #[tokio::test]
    async fn test_update_customer_never_touches_balance() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let customer = ledger
            .add_customer("Yanlış İsim", None, Some(Money::from_kurus(10000)))
            .await
            .unwrap();
        ledger
            .update_customer(&customer.id, "Doğru İsim", Some("dogru@example.com"))
            .await
            .unwrap();

        let customer = db
            .customers()
            .get_by_id(ledger.owner_id(), &customer.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.name, "Doğru İsim");
        assert_eq!(customer.balance_kurus, 10000);
    }

    // -------------------------------------------------------------------------
    // Cashbox
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_close_day_reconciliation() {
        let db = test_db().await;
        let ledger = db.coordinator();

        // Yesterday's close: 500,00 counted becomes today's opening cash
        ledger
            .close_day(Money::from_kurus(50000), Money::zero())
            .await
            .unwrap();

        let customer = ledger.add_customer("Müşteri", None, None).await.unwrap();
        ledger
            .add_cash_sale("kuşbaşı", Money::from_kurus(200000), PaymentMethod::Cash)
            .await
            .unwrap();
        ledger
            .add_payment(&customer.id, Money::from_kurus(35050), None, PaymentMethod::Cash)
            .await
            .unwrap();
        ledger
            .add_cash_sale("şarküteri", Money::from_kurus(120000), PaymentMethod::Card)
            .await
            .unwrap();
        ledger
            .add_expense("et alımı", "Tedarik", Money::from_kurus(45000))
            .await
            .unwrap();

        let entry = ledger
            .close_day(Money::from_kurus(240000), Money::from_kurus(120000))
            .await
            .unwrap();

        assert_eq!(entry.opening_cash_kurus, 50000);
        // Payment's |−350,50| counts into the drawer alongside the cash sale
        assert_eq!(entry.cash_in_kurus, 235050);
        assert_eq!(entry.card_in_kurus, 120000);
        assert_eq!(entry.cash_out_kurus, 45000);
        assert_eq!(entry.expected_cash_kurus, 240050);
        assert_eq!(entry.cash_difference_kurus, -50);
    }

    #[tokio::test]
    async fn test_double_close_appends_second_entry() {
        let db = test_db().await;
        let ledger = db.coordinator();

        ledger.close_day(Money::from_kurus(10000), Money::zero()).await.unwrap();
        ledger.close_day(Money::from_kurus(10000), Money::zero()).await.unwrap();

        let entries = db.cashbox().list(ledger.owner_id()).await.unwrap();
        assert_eq!(entries.len(), 2);
        // Second close opened from the first close's counted cash
        assert!(entries.iter().any(|e| e.opening_cash_kurus == 0));
        assert!(entries.iter().any(|e| e.opening_cash_kurus == 10000));
    }

    #[tokio::test]
    async fn test_update_cashbox_entry_recomputes_difference_only() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let entry = ledger
            .close_day(Money::from_kurus(10000), Money::zero())
            .await
            .unwrap();

        // Operator corrects the count; expected stays frozen
        let edited = CashboxEntry {
            counted_cash_kurus: 9950,
            ..entry
        };
        let updated = ledger.update_cashbox_entry(&edited).await.unwrap();
        assert_eq!(updated.expected_cash_kurus, entry.expected_cash_kurus);
        assert_eq!(
            updated.cash_difference_kurus,
            9950 - entry.expected_cash_kurus
        );
    }

    // -------------------------------------------------------------------------
    // Alerts and feed
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_oversell_raises_high_alert() {
        let db = test_db().await;
        let ledger = db.coordinator();

        let product = ledger
            .add_product("Kıyma", ProductKind::RedMeat, Money::from_kurus(35000), Money::from_kurus(25000), 3)
            .await
            .unwrap();
        ledger
            .add_stock_adjustment(&product.id, -1, "satış", AdjustmentCategory::Sale)
            .await
            .unwrap();

        let alerts = ledger.monitoring_alerts().await.unwrap();
        let alert = alerts
            .iter()
            .find(|a| a.id == format!("negative-stock-{}", product.id))
            .expect("negative stock alert missing");
        assert_eq!(alert.severity, AlertSeverity::High);
    }

    #[tokio::test]
    async fn test_feed_publishes_after_commit() {
        let db = test_db().await;
        let mut rx = db.subscribe();
        let ledger = db.coordinator();

        ledger.add_customer("Müşteri", None, None).await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.collection, Collection::Customers);
        assert_eq!(event.owner_id, ledger.owner_id());
    }

    // -------------------------------------------------------------------------
    // Owner scoping
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_owner_isolation() {
        let db = test_db().await;
        let shop_a = db.coordinator_for("owner-a");
        let shop_b = db.coordinator_for("owner-b");

        let customer = shop_a.add_customer("A'nın Müşterisi", None, None).await.unwrap();

        // Shop B can neither see nor bill shop A's customer
        assert!(db.customers().get_by_id("owner-b", &customer.id).await.unwrap().is_none());
        let err = shop_b
            .add_sale(&customer.id, "kıyma", Money::from_kurus(1000))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }
}
