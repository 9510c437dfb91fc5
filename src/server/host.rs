//! Shared state behind every HTTP handler
//!
//! The host owns the single store client of the process and the services
//! built on it. Handlers receive it as `State<Arc<ServerHost>>`.

use crate::config::WritePolicy;
use crate::core::RecordStore;
use crate::services::{InvoiceManager, InvoiceProjector, OrderItemManager};
use std::sync::Arc;

pub struct ServerHost {
    /// Store client shared by all services
    pub store: Arc<dyn RecordStore>,

    pub invoices: InvoiceManager,
    pub invoice_views: InvoiceProjector,
    pub order_items: OrderItemManager,
}

impl ServerHost {
    pub fn new(store: Arc<dyn RecordStore>, policy: WritePolicy) -> Self {
        Self {
            invoices: InvoiceManager::new(store.clone(), policy),
            invoice_views: InvoiceProjector::new(store.clone()),
            order_items: OrderItemManager::new(store.clone(), policy),
            store,
        }
    }
}
