//! Database models

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod serde_helpers;
pub mod user;
pub mod vendor;

pub use cart::CartLine;
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use order::{
    CreateOrderRequest, CreatedOrder, Order, OrderItemRequest, OrderLine, OrderStatus,
    PaymentStatus, ShippingAddress, UpdateStatusRequest, VendorOrder,
};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use user::User;
pub use vendor::Vendor;
