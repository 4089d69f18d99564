// Minimal keyed entity for collection tests.

use crate::core::identity::Identifiable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub v: i64,
}

impl Row {
    pub fn new(id: impl Into<String>, v: i64) -> Self {
        Self { id: id.into(), v }
    }
}

impl Identifiable for Row {
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }

    fn set_key(&mut self, key: String) {
        self.id = key;
    }
}
