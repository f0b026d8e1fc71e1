//! # Assistant Action Dispatch
//!
//! Normalization layer between the AI assistant's JSON action payloads and
//! the coordinator. The assistant emits tagged objects like:
//!
//! ```json
//! { "type": "addSale", "customerId": "…", "description": "2kg kıyma",
//!   "totalKurus": 12550 }
//! ```
//!
//! Deserialization is the validation boundary: an unknown `type` or a
//! missing/ill-typed field becomes a `ValidationError` before any store
//! access, so malformed assistant output can never reach the coordinator.
//! Turkish category labels ("Bozulma") are accepted through the enum's
//! serde aliases, matching what the language model actually produces.
//!
//! Every action routes through the coordinator, so assistant-initiated
//! writes get exactly the same atomic batches as form-initiated ones.

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::coordinator::Coordinator;
use crate::error::LedgerResult;
use esnaf_core::{AdjustmentCategory, Money, PaymentMethod, ValidationError};

// =============================================================================
// Action Payloads
// =============================================================================

/// One assistant-proposed ledger mutation, tagged by `type`.
///
/// The wire shape is camelCase throughout; amounts arrive as integer kuruş.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    #[serde(rename_all = "camelCase")]
    AddSale {
        customer_id: String,
        description: String,
        total_kurus: i64,
    },
    #[serde(rename_all = "camelCase")]
    AddPayment {
        customer_id: String,
        total_kurus: i64,
        description: Option<String>,
        #[serde(default = "default_payment_method")]
        payment_method: PaymentMethod,
    },
    #[serde(rename_all = "camelCase")]
    AddExpense {
        description: String,
        category: String,
        amount_kurus: i64,
    },
    #[serde(rename_all = "camelCase")]
    AddStockAdjustment {
        product_id: String,
        quantity: i64,
        description: String,
        category: AdjustmentCategory,
    },
    DeleteCustomer { id: String },
    DeleteProduct { id: String },
    DeleteSale { id: String },
    DeleteExpense { id: String },
    DeleteStockAdjustment { id: String },
}

/// Payments with no stated method are treated as cash: that is what a
/// shop counter payment is unless told otherwise.
fn default_payment_method() -> PaymentMethod {
    PaymentMethod::Cash
}

/// What the dispatcher reports back to the assistant loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// The tag of the action that ran, e.g. `"addSale"`.
    pub kind: &'static str,
    /// Id of the entity created, when the action created one.
    pub entity_id: Option<String>,
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a raw assistant payload into an [`Action`].
///
/// Any shape mismatch surfaces as a `ValidationError` on the synthetic
/// `action` field, keeping malformed payloads in the same error channel as
/// bad form input.
pub fn parse_action(payload: &Value) -> LedgerResult<Action> {
    serde_json::from_value(payload.clone()).map_err(|e| {
        ValidationError::InvalidFormat {
            field: "action".to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

// =============================================================================
// Dispatch
// =============================================================================

/// Parses and executes one assistant payload against the coordinator.
pub async fn dispatch(coordinator: &Coordinator, payload: &Value) -> LedgerResult<ActionOutcome> {
    let action = parse_action(payload)?;
    execute(coordinator, action).await
}

/// Executes an already-parsed action.
pub async fn execute(coordinator: &Coordinator, action: Action) -> LedgerResult<ActionOutcome> {
    match action {
        Action::AddSale {
            customer_id,
            description,
            total_kurus,
        } => {
            let order = coordinator
                .add_sale(&customer_id, &description, Money::from_kurus(total_kurus))
                .await?;
            done("addSale", Some(order.id))
        }
        Action::AddPayment {
            customer_id,
            total_kurus,
            description,
            payment_method,
        } => {
            let order = coordinator
                .add_payment(
                    &customer_id,
                    Money::from_kurus(total_kurus),
                    description.as_deref(),
                    payment_method,
                )
                .await?;
            done("addPayment", Some(order.id))
        }
        Action::AddExpense {
            description,
            category,
            amount_kurus,
        } => {
            let expense = coordinator
                .add_expense(&description, &category, Money::from_kurus(amount_kurus))
                .await?;
            done("addExpense", Some(expense.id))
        }
        Action::AddStockAdjustment {
            product_id,
            quantity,
            description,
            category,
        } => {
            let adjustment = coordinator
                .add_stock_adjustment(&product_id, quantity, &description, category)
                .await?;
            done("addStockAdjustment", Some(adjustment.id))
        }
        Action::DeleteCustomer { id } => {
            coordinator.delete_customer(&id).await?;
            done("deleteCustomer", None)
        }
        Action::DeleteProduct { id } => {
            coordinator.delete_product(&id).await?;
            done("deleteProduct", None)
        }
        Action::DeleteSale { id } => {
            coordinator.delete_sale(&id).await?;
            done("deleteSale", None)
        }
        Action::DeleteExpense { id } => {
            coordinator.delete_expense(&id).await?;
            done("deleteExpense", None)
        }
        Action::DeleteStockAdjustment { id } => {
            coordinator.delete_stock_adjustment(&id).await?;
            done("deleteStockAdjustment", None)
        }
    }
}

fn done(kind: &'static str, entity_id: Option<String>) -> LedgerResult<ActionOutcome> {
    info!(kind, entity_id = entity_id.as_deref(), "Assistant action executed");
    Ok(ActionOutcome { kind, entity_id })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_add_sale() {
        let action = parse_action(&json!({
            "type": "addSale",
            "customerId": "c1",
            "description": "2kg kıyma, 1kg sucuk",
            "totalKurus": 12550
        }))
        .unwrap();

        match action {
            Action::AddSale {
                customer_id,
                total_kurus,
                ..
            } => {
                assert_eq!(customer_id, "c1");
                assert_eq!(total_kurus, 12550);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_parse_turkish_category_alias() {
        let action = parse_action(&json!({
            "type": "addStockAdjustment",
            "productId": "p1",
            "quantity": -2,
            "description": "bozuk ürün",
            "category": "Bozulma"
        }))
        .unwrap();

        match action {
            Action::AddStockAdjustment { category, .. } => {
                assert_eq!(category, AdjustmentCategory::Spoilage);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_parse_payment_defaults_to_cash() {
        let action = parse_action(&json!({
            "type": "addPayment",
            "customerId": "c1",
            "totalKurus": 5000
        }))
        .unwrap();

        match action {
            Action::AddPayment {
                payment_method,
                description,
                ..
            } => {
                assert_eq!(payment_method, PaymentMethod::Cash);
                assert!(description.is_none());
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_is_validation_error() {
        let err = parse_action(&json!({ "type": "formatDisk" })).unwrap_err();
        assert!(matches!(
            err,
            crate::error::LedgerError::Validation(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_missing_field_is_validation_error() {
        // addSale without a total
        let err = parse_action(&json!({
            "type": "addSale",
            "customerId": "c1",
            "description": "kıyma"
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            crate::error::LedgerError::Validation(ValidationError::InvalidFormat { .. })
        ));
    }
}
