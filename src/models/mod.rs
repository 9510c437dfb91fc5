//! Stored records and the read models derived from them

pub mod aggregate;
pub mod food;
pub mod invoice;
pub mod order;
pub mod order_item;
pub mod table;

pub use aggregate::{InvoiceView, OrderAggregate, OrderLine};
pub use food::Food;
pub use invoice::{Invoice, PaymentMethod, PaymentStatus};
pub use order::Order;
pub use order_item::OrderItem;
pub use table::Table;

/// Collection names, shared with databases written by earlier deployments
pub mod collections {
    pub const FOOD: &str = "food";
    pub const INVOICE: &str = "invoice";
    pub const ORDER: &str = "order";
    pub const ORDER_ITEM: &str = "orderItem";
    pub const TABLE: &str = "table";
}

/// Stable string key derived from a freshly generated internal id
pub(crate) fn stable_key(id: &uuid::Uuid) -> String {
    id.simple().to_string()
}
