//! Sales service

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use shared::models::{GreenBean, Sale, ROASTED_PRODUCT_ID};
use shared::types::{PaymentMethod, ProductType};
use shared::validation;

use crate::error::{AppError, AppResult};
use crate::providers::documents::{document_data, with_owner, Collection};
use crate::providers::DocumentStore;
use crate::store::{Action, Store};

use super::notifications::Notifier;
use super::require_user;

/// Input for a checkout
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSaleInput {
    pub product_type: ProductType,
    /// Required when selling green beans; ignored for roasted coffee.
    pub green_bean_id: Option<Uuid>,
    pub quantity: Decimal,
    pub price_per_kg: Decimal,
    pub payment_method: PaymentMethod,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

pub struct SalesService {
    store: Arc<Store>,
    documents: Arc<dyn DocumentStore>,
    notifier: Notifier,
}

impl SalesService {
    pub fn new(store: Arc<Store>, documents: Arc<dyn DocumentStore>, notifier: Notifier) -> Self {
        Self {
            store,
            documents,
            notifier,
        }
    }

    /// Record one transaction.
    ///
    /// `total_amount` is always `quantity * price_per_kg` at creation time.
    /// Green-bean sales are rejected before any mutation when they would
    /// drive the lot negative, and trigger a compensating decrement after
    /// the sale write succeeds.
    pub async fn record_sale(&self, input: RecordSaleInput) -> AppResult<Sale> {
        let user = require_user(&self.store)?;

        validation::validate_positive_quantity(input.quantity)
            .map_err(|msg| AppError::validation("quantity", msg, "Jumlah harus positif"))?;
        validation::validate_positive_price(input.price_per_kg)
            .map_err(|msg| AppError::validation("pricePerKg", msg, "Harga harus positif"))?;
        if let Some(phone) = input.customer_phone.as_deref() {
            validation::validate_phone(phone).map_err(|msg| {
                AppError::validation("customerPhone", msg, "Nomor telepon tidak valid")
            })?;
        }

        let bean = match input.product_type {
            ProductType::Green => {
                let bean_id = input.green_bean_id.ok_or_else(|| {
                    AppError::validation(
                        "greenBeanId",
                        "Select a green bean lot",
                        "Pilih biji kopi hijau",
                    )
                })?;
                let bean = self
                    .store
                    .state()
                    .green_beans
                    .into_iter()
                    .find(|bean| bean.id == bean_id)
                    .ok_or_else(|| AppError::NotFound("Green bean".to_string()))?;

                if input.quantity > bean.quantity {
                    return Err(AppError::InsufficientStock(format!(
                        "{} has only {}kg left",
                        bean.variety, bean.quantity
                    )));
                }
                Some(bean)
            }
            ProductType::Roasted => None,
        };

        let total_amount = input.quantity * input.price_per_kg;
        let sale = Sale {
            id: Uuid::new_v4(),
            product_type: input.product_type,
            product_id: match &bean {
                Some(bean) => bean.id.to_string(),
                None => ROASTED_PRODUCT_ID.to_string(),
            },
            quantity: input.quantity,
            price_per_kg: input.price_per_kg,
            total_amount,
            payment_method: input.payment_method,
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
            sale_date: Utc::now(),
            staff_id: user.id,
        };

        let data = with_owner(document_data(&sale)?, user.id);
        let id = match self.documents.create(Collection::Sales, data).await {
            Ok(id) => id,
            Err(e) => {
                self.notifier.write_failed(&e);
                return Err(e);
            }
        };

        let sale = Sale { id, ..sale };
        self.store.dispatch(Action::AddSale(sale.clone()));

        // Green sales decrement the lot in a second, independent write.
        if let Some(bean) = bean {
            let new_quantity = bean.quantity - sale.quantity;
            if let Err(e) = self
                .documents
                .update(
                    Collection::GreenBeans,
                    bean.id,
                    json!({ "quantity": new_quantity }),
                )
                .await
            {
                tracing::error!(
                    sale = %sale.id,
                    bean = %bean.id,
                    "compensating inventory decrement failed after sale write: {}",
                    e
                );
                self.notifier.error(
                    "Stok Tidak Sinkron",
                    format!(
                        "Penjualan tercatat tetapi stok {} gagal dikurangi",
                        bean.variety
                    ),
                );
                return Err(AppError::CompensationFailed(e.to_string()));
            }

            let updated = GreenBean {
                quantity: new_quantity,
                ..bean
            };
            self.store.dispatch(Action::UpdateGreenBean(updated.clone()));
            if updated.is_low_stock() {
                self.notifier.low_stock(&updated);
            }
        }

        self.notifier.success(
            "Penjualan Berhasil",
            format!("Penjualan {}kg berhasil dicatat", sale.quantity),
        );
        Ok(sale)
    }
}
