//! Order aggregation, invoice views and the invoice/order-item lifecycles
//!
//! Every service receives its store handle at construction. None of them
//! holds mutable state of its own, so clones are cheap and can be shared
//! across requests.

pub mod aggregator;
pub mod invoice_view;
pub mod invoices;
pub mod order_items;

pub use aggregator::OrderAggregator;
pub use invoice_view::InvoiceProjector;
pub use invoices::{CreateInvoice, InvoiceManager, InvoiceUpdate};
pub use order_items::{
    CreateOrderItems, CreatedOrder, NewOrderItem, OrderItemManager, OrderItemUpdate,
};
