//! Order Ledger Models
//!
//! One parent `order` per checkout plus one `vendor_order` per distinct
//! vendor present in the cart. Line lists are immutable after creation;
//! only the status fields advance afterwards.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

// =============================================================================
// Status enums
// =============================================================================

/// Order status
///
/// Happy path runs strictly forward from `Pending` to `Delivered`;
/// `Cancelled` and `Returned` are side exits. `Confirmed`, `OutForDelivery`
/// and `Returned` are display states of the parent order and cannot be set
/// through the vendor status update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    OutForDelivery,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    /// Statuses a vendor may set on its own sub-orders
    pub fn is_vendor_settable(self) -> bool {
        matches!(
            self,
            OrderStatus::Pending
                | OrderStatus::Processing
                | OrderStatus::Shipped
                | OrderStatus::Delivered
                | OrderStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

// =============================================================================
// Embedded value objects
// =============================================================================

/// Shipping address (all fields required at checkout)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

/// One line of an order: catalog snapshot taken at checkout time
///
/// `unit_price` is the catalog price read server-side, never a
/// client-supplied value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    /// Record link to the vendor owning the product
    #[serde(with = "serde_helpers::record_id")]
    pub vendor: RecordId,
}

// =============================================================================
// Order (parent, one per checkout)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
    pub shipping_address: ShippingAddress,
    /// Aggregate of the sibling vendor-order statuses, never written directly
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// VendorOrder (sub-order, one per vendor per checkout)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorOrder {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Record link to the parent order
    #[serde(with = "serde_helpers::record_id")]
    pub main_order: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub vendor: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    /// Subset of the parent's lines owned by this vendor
    pub lines: Vec<OrderLine>,
    pub subtotal: Decimal,
    pub shipping_address: ShippingAddress,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// API Request / Response Types
// =============================================================================

/// One requested cart line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    #[serde(default)]
    pub product_id: String,
    /// Signed so malformed negative quantities reach validation instead of
    /// failing JSON decoding
    #[serde(default)]
    pub quantity: i64,
}

/// Checkout payload: the client's cart snapshot plus shipping address
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: ShippingAddress,
}

/// Vendor status-transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Checkout result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order_id: String,
}
