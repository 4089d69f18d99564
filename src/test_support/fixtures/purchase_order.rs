// Shared test fixture for PurchaseOrder rows.
// Defaults come from json/purchase_order.json; setters override single fields.

use crate::core::purchase_order::{PurchaseOrder, PurchaseOrderStatus};
use std::fs;

pub struct PurchaseOrderBuilder {
    inner: PurchaseOrder,
}

impl Default for PurchaseOrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl PurchaseOrderBuilder {
    pub fn new() -> Self {
        let json_str =
            fs::read_to_string("./src/test_support/fixtures/json/purchase_order.json").unwrap();
        Self {
            inner: serde_json::from_str(&json_str).unwrap(),
        }
    }

    pub fn id(mut self, v: impl Into<String>) -> Self {
        self.inner.id = v.into();
        self
    }

    pub fn po_number(mut self, v: impl Into<String>) -> Self {
        self.inner.po_number = v.into();
        self
    }

    pub fn quantity(mut self, v: u32) -> Self {
        self.inner.quantity = v;
        self
    }

    pub fn status(mut self, v: PurchaseOrderStatus) -> Self {
        self.inner.status = v;
        self
    }

    pub fn build(self) -> PurchaseOrder {
        self.inner
    }
}
