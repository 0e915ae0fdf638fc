#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use dodecahedron::models::Model;

/// Sample row type shared by the file-backed repository tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub reference: String,
    pub sku: String,
    pub quantity: i64,
}

impl Model for OrderLine {
    fn reference(&self) -> String {
        self.reference.clone()
    }
}

pub fn order_line(reference: &str, sku: &str, quantity: i64) -> OrderLine {
    OrderLine {
        reference: reference.to_string(),
        sku: sku.to_string(),
        quantity,
    }
}
