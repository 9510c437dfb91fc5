//! Macro-generated suite running the services over a given backend.
//!
//! # Generated Tests
//!
//! ## Aggregation
//! - `test_table_four_order_totals`: 2 x 10.00 + 1 x 5.50 at table 4
//! - `test_one_group_per_order`: N items, one row, count N
//! - `test_order_without_items_is_empty`
//! - `test_missing_food_degrades_to_empty_fields`
//! - `test_unseated_order_has_no_table_fields`
//!
//! ## Invoices
//! - `test_create_invoice_defaults`: PENDING, due one day later
//! - `test_create_invoice_for_unknown_order`
//! - `test_invoice_view`: payment fields folded with the aggregate
//! - `test_invoice_view_for_order_without_items`
//! - `test_invoice_view_unknown_invoice`
//! - `test_repeated_paid_update`: same status, advancing `updated_at`
//! - `test_update_unknown_invoice_upserts` / `..._strict`
//! - `test_invoice_view_for_upserted_invoice`: no order, so no aggregate
//!
//! ## Order items
//! - `test_create_order_items_rounds_prices`
//! - `test_create_order_items_validates_before_writing`
//! - `test_update_order_item`

/// Generate the service suite
///
/// `$factory` must evaluate to an `Arc<dyn RecordStore>` backed by empty
/// collections. It is re-evaluated for each test.
#[macro_export]
macro_rules! service_tests {
    ($factory:expr) => {
        mod service_contract_tests {
            use super::*;
            use std::sync::Arc;
            use chrono::Duration;
            use tavola::config::WritePolicy;
            use tavola::core::store::{find_as, find_one_as};
            use tavola::core::{Filter, RecordStore, TavolaError, ValidationError};
            use tavola::models::collections::{INVOICE, ORDER, ORDER_ITEM};
            use tavola::models::{Invoice, Order, OrderItem, PaymentMethod, PaymentStatus};
            use tavola::services::{
                CreateInvoice, CreateOrderItems, InvoiceManager, InvoiceProjector, InvoiceUpdate,
                NewOrderItem, OrderAggregator, OrderItemManager, OrderItemUpdate,
            };

            fn create_request(order_id: &str) -> CreateInvoice {
                CreateInvoice {
                    order_id: order_id.to_string(),
                    payment_status: None,
                    payment_method: None,
                }
            }

            // ==================================================================
            // Aggregation
            // ==================================================================

            #[tokio::test]
            async fn test_table_four_order_totals() {
                let store: Arc<dyn RecordStore> = $factory;
                let fixture = seed_table_four_order(&*store).await;

                let rows = OrderAggregator::new(store.clone())
                    .aggregate_by_order(&fixture.order.order_id)
                    .await
                    .unwrap();

                assert_eq!(rows.len(), 1);
                let row = &rows[0];
                assert_eq!(row.payment_due, price(2550));
                assert_eq!(row.total_count, 2);
                assert_eq!(row.table_number, Some(4));
                assert_eq!(row.table_id.as_deref(), Some(fixture.table.table_id.as_str()));
                assert_eq!(row.order_id.as_deref(), Some(fixture.order.order_id.as_str()));

                let mut names: Vec<_> = row
                    .order_items
                    .iter()
                    .filter_map(|line| line.food_name.clone())
                    .collect();
                names.sort();
                assert_eq!(names, vec!["Pizza".to_string(), "Tiramisu".to_string()]);

                let pizza_line = row
                    .order_items
                    .iter()
                    .find(|line| line.food_name.as_deref() == Some("Pizza"))
                    .unwrap();
                assert_eq!(pizza_line.amount, Some(price(2000)));
                assert_eq!(pizza_line.price, Some(price(1000)));
                assert_eq!(pizza_line.quantity, Some(2));
                assert_eq!(pizza_line.total_count, 1);
                assert_eq!(pizza_line.table_number, Some(4));
                assert_eq!(pizza_line.food_image.as_deref(), Some("pizza.jpg"));
            }

            #[tokio::test]
            async fn test_one_group_per_order() {
                let store: Arc<dyn RecordStore> = $factory;
                let food = seed_food(&*store, "Soup", 325).await;
                let table = seed_table(&*store, 9).await;
                let order = seed_order(&*store, Some(&table.table_id)).await;
                let other = seed_order(&*store, Some(&table.table_id)).await;
                for _ in 0..5 {
                    seed_item(&*store, &order.order_id, &food.food_id, 1, 325).await;
                }
                seed_item(&*store, &other.order_id, &food.food_id, 1, 325).await;

                let rows = OrderAggregator::new(store.clone())
                    .aggregate_by_order(&order.order_id)
                    .await
                    .unwrap();
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].total_count, 5);
                assert_eq!(rows[0].order_items.len(), 5);
                assert_eq!(rows[0].payment_due, price(1625));
            }

            #[tokio::test]
            async fn test_order_without_items_is_empty() {
                let store: Arc<dyn RecordStore> = $factory;
                let order = seed_order(&*store, None).await;
                let rows = OrderAggregator::new(store.clone())
                    .aggregate_by_order(&order.order_id)
                    .await
                    .unwrap();
                assert!(rows.is_empty());
            }

            #[tokio::test]
            async fn test_missing_food_degrades_to_empty_fields() {
                let store: Arc<dyn RecordStore> = $factory;
                let fixture = seed_table_four_order(&*store).await;
                seed_item(&*store, &fixture.order.order_id, "deleted-food", 3, 700).await;

                let rows = OrderAggregator::new(store.clone())
                    .aggregate_by_order(&fixture.order.order_id)
                    .await
                    .unwrap();
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].total_count, 3);
                assert_eq!(rows[0].payment_due, price(2550));

                let orphan = rows[0]
                    .order_items
                    .iter()
                    .find(|line| line.food_name.is_none())
                    .expect("line for the missing food");
                assert_eq!(orphan.amount, None);
                assert_eq!(orphan.price, None);
                assert_eq!(orphan.quantity, Some(3));
                assert_eq!(orphan.table_number, Some(4));
            }

            #[tokio::test]
            async fn test_unseated_order_has_no_table_fields() {
                let store: Arc<dyn RecordStore> = $factory;
                let food = seed_food(&*store, "Coffee", 250).await;
                seed_table(&*store, 1).await;
                let order = seed_order(&*store, None).await;
                seed_item(&*store, &order.order_id, &food.food_id, 2, 250).await;

                let rows = OrderAggregator::new(store.clone())
                    .aggregate_by_order(&order.order_id)
                    .await
                    .unwrap();
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].table_number, None);
                assert_eq!(rows[0].table_id, None);
                assert_eq!(rows[0].payment_due, price(500));
            }

            // ==================================================================
            // Invoices
            // ==================================================================

            #[tokio::test]
            async fn test_create_invoice_defaults() {
                let store: Arc<dyn RecordStore> = $factory;
                let order = seed_order(&*store, None).await;
                let manager = InvoiceManager::new(store.clone(), WritePolicy::default());

                let invoice = manager.create(create_request(&order.order_id)).await.unwrap();
                assert_eq!(invoice.payment_status, Some(PaymentStatus::Pending));
                assert_eq!(invoice.payment_method, None);
                assert_eq!(invoice.payment_due_date - invoice.created_at, Duration::days(1));

                let stored: Invoice = find_one_as(
                    &*store,
                    INVOICE,
                    &Filter::eq("invoice_id", invoice.invoice_id.as_str()),
                )
                .await
                .unwrap()
                .expect("invoice persisted");
                assert_eq!(stored.payment_status, Some(PaymentStatus::Pending));
                assert_eq!(stored.order_id, order.order_id);
            }

            #[tokio::test]
            async fn test_create_invoice_for_unknown_order() {
                let store: Arc<dyn RecordStore> = $factory;
                let manager = InvoiceManager::new(store.clone(), WritePolicy::default());

                let err = manager.create(create_request("no-such-order")).await.unwrap_err();
                assert!(matches!(
                    err,
                    TavolaError::Validation(ValidationError::UnknownReference { entity: "order", .. })
                ));
                assert!(store.find(INVOICE, &Filter::all()).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_invoice_view() {
                let store: Arc<dyn RecordStore> = $factory;
                let fixture = seed_table_four_order(&*store).await;
                let invoice = InvoiceManager::new(store.clone(), WritePolicy::default())
                    .create(create_request(&fixture.order.order_id))
                    .await
                    .unwrap();

                let view = InvoiceProjector::new(store.clone())
                    .project(&invoice.invoice_id)
                    .await
                    .unwrap();
                assert_eq!(view.invoice_id, invoice.invoice_id);
                assert_eq!(view.order_id, fixture.order.order_id);
                assert_eq!(view.payment_method, "null");
                assert_eq!(view.payment_status, PaymentStatus::Pending);
                assert_eq!(view.payment_due, price(2550));
                assert_eq!(view.table_number, Some(4));
                assert_eq!(view.order_details.len(), 2);
                assert_eq!(view.payment_due_date, invoice.payment_due_date);
            }

            #[tokio::test]
            async fn test_invoice_view_shows_recorded_method() {
                let store: Arc<dyn RecordStore> = $factory;
                let fixture = seed_table_four_order(&*store).await;
                let invoice = InvoiceManager::new(store.clone(), WritePolicy::default())
                    .create(CreateInvoice {
                        order_id: fixture.order.order_id.clone(),
                        payment_status: Some(PaymentStatus::Paid),
                        payment_method: Some(PaymentMethod::Card),
                    })
                    .await
                    .unwrap();

                let view = InvoiceProjector::new(store.clone())
                    .project(&invoice.invoice_id)
                    .await
                    .unwrap();
                assert_eq!(view.payment_method, "CARD");
                assert_eq!(view.payment_status, PaymentStatus::Paid);
            }

            #[tokio::test]
            async fn test_invoice_view_for_order_without_items() {
                let store: Arc<dyn RecordStore> = $factory;
                let order = seed_order(&*store, None).await;
                let invoice = InvoiceManager::new(store.clone(), WritePolicy::default())
                    .create(create_request(&order.order_id))
                    .await
                    .unwrap();

                let err = InvoiceProjector::new(store.clone())
                    .project(&invoice.invoice_id)
                    .await
                    .unwrap_err();
                match err {
                    TavolaError::Aggregation { order_id } => assert_eq!(order_id, order.order_id),
                    other => panic!("expected Aggregation, got {other:?}"),
                }
            }

            #[tokio::test]
            async fn test_invoice_view_unknown_invoice() {
                let store: Arc<dyn RecordStore> = $factory;
                let err = InvoiceProjector::new(store.clone())
                    .project("missing")
                    .await
                    .unwrap_err();
                assert!(matches!(err, TavolaError::NotFound { entity: "invoice", .. }));
            }

            #[tokio::test]
            async fn test_repeated_paid_update() {
                let store: Arc<dyn RecordStore> = $factory;
                let order = seed_order(&*store, None).await;
                let manager = InvoiceManager::new(store.clone(), WritePolicy::default());
                let invoice = manager.create(create_request(&order.order_id)).await.unwrap();
                let filter = Filter::eq("invoice_id", invoice.invoice_id.as_str());
                let paid = || InvoiceUpdate {
                    payment_status: Some(PaymentStatus::Paid),
                    ..Default::default()
                };

                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                manager.update(&invoice.invoice_id, paid()).await.unwrap();
                let first: Invoice = find_one_as(&*store, INVOICE, &filter).await.unwrap().unwrap();

                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                let outcome = manager.update(&invoice.invoice_id, paid()).await.unwrap();
                let second: Invoice = find_one_as(&*store, INVOICE, &filter).await.unwrap().unwrap();

                assert_eq!(outcome.matched_count, 1);
                assert_eq!(first.payment_status, Some(PaymentStatus::Paid));
                assert_eq!(second.payment_status, Some(PaymentStatus::Paid));
                assert!(second.updated_at > first.updated_at);
                assert!(first.updated_at > invoice.updated_at);
                assert_eq!(second.payment_due_date, invoice.payment_due_date);
                assert_eq!(second.payment_method, None);
            }

            #[tokio::test]
            async fn test_update_unknown_invoice_upserts() {
                let store: Arc<dyn RecordStore> = $factory;
                let manager = InvoiceManager::new(store.clone(), WritePolicy::default());
                let outcome = manager
                    .update(
                        "ghost",
                        InvoiceUpdate {
                            payment_method: Some(PaymentMethod::Cash),
                            ..Default::default()
                        },
                    )
                    .await
                    .unwrap();
                assert!(outcome.created());

                let created = store
                    .find_one(INVOICE, &Filter::eq("invoice_id", "ghost"))
                    .await
                    .unwrap()
                    .unwrap();
                assert_eq!(created["payment_method"], "CASH");
                assert!(created.get("order_id").is_none());
                assert!(created.get("updated_at").is_some());
            }

            #[tokio::test]
            async fn test_invoice_view_for_upserted_invoice() {
                let store: Arc<dyn RecordStore> = $factory;
                let manager = InvoiceManager::new(store.clone(), WritePolicy::default());
                let outcome = manager
                    .update(
                        "ghost",
                        InvoiceUpdate {
                            payment_status: Some(PaymentStatus::Paid),
                            ..Default::default()
                        },
                    )
                    .await
                    .unwrap();
                assert!(outcome.created());

                let err = InvoiceProjector::new(store.clone())
                    .project("ghost")
                    .await
                    .unwrap_err();
                assert!(
                    matches!(err, TavolaError::Aggregation { .. }),
                    "got {err:?}"
                );
                assert_eq!(err.error_code(), "AGGREGATION_ERROR");
            }

            #[tokio::test]
            async fn test_update_unknown_invoice_strict() {
                let store: Arc<dyn RecordStore> = $factory;
                let manager = InvoiceManager::new(store.clone(), WritePolicy::strict());
                let err = manager
                    .update("ghost", InvoiceUpdate::default())
                    .await
                    .unwrap_err();
                assert!(matches!(err, TavolaError::NotFound { entity: "invoice", .. }));
                assert!(store.find(INVOICE, &Filter::all()).await.unwrap().is_empty());
            }

            // ==================================================================
            // Order items
            // ==================================================================

            #[tokio::test]
            async fn test_create_order_items_rounds_prices() {
                let store: Arc<dyn RecordStore> = $factory;
                let food = seed_food(&*store, "Pasta", 1000).await;
                let table = seed_table(&*store, 2).await;
                let manager = OrderItemManager::new(store.clone(), WritePolicy::default());

                let created = manager
                    .create(CreateOrderItems {
                        table_id: Some(table.table_id.clone()),
                        order_items: vec![NewOrderItem {
                            food_id: food.food_id.clone(),
                            quantity: 1,
                            unit_price: 9.999,
                        }],
                    })
                    .await
                    .unwrap();

                assert_eq!(created.order_items.len(), 1);
                let item = manager.get(&created.order_items[0].order_item_id).await.unwrap();
                assert_eq!(item.unit_price, price(1000));
                assert_eq!(item.order_id, created.order_id);

                let order: Order = find_one_as(
                    &*store,
                    ORDER,
                    &Filter::eq("order_id", created.order_id.as_str()),
                )
                .await
                .unwrap()
                .expect("order created with its items");
                assert_eq!(order.table_id, Some(table.table_id));

                let rows = manager.items_by_order(&created.order_id).await.unwrap();
                assert_eq!(rows[0].table_number, Some(2));
            }

            #[tokio::test]
            async fn test_create_order_items_validates_before_writing() {
                let store: Arc<dyn RecordStore> = $factory;
                let manager = OrderItemManager::new(store.clone(), WritePolicy::default());

                let err = manager
                    .create(CreateOrderItems {
                        table_id: None,
                        order_items: vec![
                            NewOrderItem {
                                food_id: "f1".into(),
                                quantity: 1,
                                unit_price: 2.0,
                            },
                            NewOrderItem {
                                food_id: "f2".into(),
                                quantity: 0,
                                unit_price: 2.0,
                            },
                        ],
                    })
                    .await
                    .unwrap_err();
                assert!(matches!(err, TavolaError::Validation(_)));
                assert!(store.find(ORDER, &Filter::all()).await.unwrap().is_empty());
                assert!(manager.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_update_order_item() {
                let store: Arc<dyn RecordStore> = $factory;
                let fixture = seed_table_four_order(&*store).await;
                let manager = OrderItemManager::new(store.clone(), WritePolicy::strict());
                let target = &fixture.items[1];

                manager
                    .update(
                        &target.order_item_id,
                        OrderItemUpdate {
                            quantity: Some(4),
                            unit_price: Some(5.556),
                            ..Default::default()
                        },
                    )
                    .await
                    .unwrap();

                let items: Vec<OrderItem> = find_as(
                    &*store,
                    ORDER_ITEM,
                    &Filter::eq("order_item_id", target.order_item_id.as_str()),
                )
                .await
                .unwrap();
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].quantity, 4);
                assert_eq!(items[0].unit_price, price(556));
                assert_eq!(items[0].food_id, fixture.tiramisu.food_id);

                let err = manager
                    .update("missing", OrderItemUpdate::default())
                    .await
                    .unwrap_err();
                assert!(matches!(err, TavolaError::NotFound { .. }));
            }
        }
    };
}
