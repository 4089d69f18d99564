use crate::core::identity::Identifiable;
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    Draft,
    Submitted,
    Received,
    Cancelled,
}

/// A purchase order row as rendered on the purchase order screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: String,
    pub po_number: String,
    pub part_number: String,
    pub quantity: u32,
    pub status: PurchaseOrderStatus,
    pub updated_at: i64,
}

impl PurchaseOrder {
    /// A new order that has not been persisted yet. The id is filled in by the collection.
    pub fn draft(
        po_number: impl Into<String>,
        part_number: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            id: String::new(),
            po_number: po_number.into(),
            part_number: part_number.into(),
            quantity,
            status: PurchaseOrderStatus::Draft,
            updated_at: Utc::now().timestamp_millis(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now().timestamp_millis();
    }
}

impl Identifiable for PurchaseOrder {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }

    fn set_key(&mut self, key: String) {
        self.id = key;
    }
}

#[cfg(test)]
mod purchase_order_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_create_a_draft_without_identity() {
        let order = PurchaseOrder::draft("PO-1001", "MS20470AD4-6", 250);
        assert!(order.id.is_empty());
        assert_eq!(order.status, PurchaseOrderStatus::Draft);
        assert_eq!(order.quantity, 250);
    }

    #[rstest]
    fn it_should_expose_the_id_as_key() {
        let mut order = PurchaseOrder::draft("PO-1001", "MS20470AD4-6", 250);
        order.set_key("po-1".to_string());
        assert_eq!(order.key(), "po-1");
    }

    #[rstest]
    fn it_should_serialize_status_in_snake_case() {
        let value = serde_json::to_value(PurchaseOrderStatus::Submitted).unwrap();
        assert_eq!(value, serde_json::json!("submitted"));
    }
}
