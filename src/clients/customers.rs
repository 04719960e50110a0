//! Customer resource types.
//!
//! Only the fields the store-credit flows touch are modeled; everything
//! else in the Admin API's customer payload is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// A customer record, as returned by
/// `GET /admin/api/{version}/customers/{id}.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Customer {
    /// Shopify's numeric customer id.
    pub id: u64,
    /// The customer's email, echoed back on updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Freeform note field. The store-credit flows keep the balance here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Wire envelope: single-customer payloads nest under a `customer` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerEnvelope {
    /// The wrapped customer.
    pub customer: Customer,
}
