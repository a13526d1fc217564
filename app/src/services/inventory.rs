//! Green-bean inventory service

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use shared::models::{GreenBean, MovementDirection};
use shared::validation;

use crate::error::{AppError, AppResult};
use crate::providers::documents::{document_data, with_owner, Collection};
use crate::providers::DocumentStore;
use crate::store::{Action, Store};

use super::notifications::Notifier;
use super::{generate_batch_number, require_user};

/// Input for a purchase entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGreenBeanInput {
    pub supplier_name: String,
    pub variety: String,
    pub origin: String,
    pub quantity: Decimal,
    pub purchase_price_per_kg: Decimal,
    pub low_stock_threshold: Decimal,
}

pub struct InventoryService {
    store: Arc<Store>,
    documents: Arc<dyn DocumentStore>,
    notifier: Notifier,
}

impl InventoryService {
    pub fn new(store: Arc<Store>, documents: Arc<dyn DocumentStore>, notifier: Notifier) -> Self {
        Self {
            store,
            documents,
            notifier,
        }
    }

    /// Record a purchased lot. Generates the `GB-` batch number.
    pub async fn create_bean(&self, input: CreateGreenBeanInput) -> AppResult<GreenBean> {
        let user = require_user(&self.store)?;

        validation::validate_name(&input.supplier_name)
            .map_err(|msg| AppError::validation("supplierName", msg, "Nama pemasok wajib diisi"))?;
        validation::validate_name(&input.variety)
            .map_err(|msg| AppError::validation("variety", msg, "Varietas wajib diisi"))?;
        validation::validate_positive_quantity(input.quantity)
            .map_err(|msg| AppError::validation("quantity", msg, "Jumlah harus positif"))?;
        validation::validate_positive_price(input.purchase_price_per_kg)
            .map_err(|msg| AppError::validation("purchasePricePerKg", msg, "Harga harus positif"))?;
        validation::validate_threshold(input.low_stock_threshold).map_err(|msg| {
            AppError::validation("lowStockThreshold", msg, "Batas minimum tidak boleh negatif")
        })?;

        let now = Utc::now();
        let bean = GreenBean {
            id: Uuid::new_v4(),
            supplier_name: input.supplier_name,
            variety: input.variety,
            origin: input.origin,
            quantity: input.quantity,
            purchase_price_per_kg: input.purchase_price_per_kg,
            entry_date: now,
            batch_number: generate_batch_number("GB", now),
            low_stock_threshold: input.low_stock_threshold,
        };

        let data = with_owner(document_data(&bean)?, user.id);
        let id = match self.documents.create(Collection::GreenBeans, data).await {
            Ok(id) => id,
            Err(e) => {
                self.notifier.write_failed(&e);
                return Err(e);
            }
        };

        let bean = GreenBean { id, ..bean };
        self.store.dispatch(Action::AddGreenBean(bean.clone()));
        self.notifier.success(
            "Stok Ditambahkan",
            format!("{} {}kg masuk ke inventori", bean.variety, bean.quantity),
        );
        Ok(bean)
    }

    /// Replace an existing lot's fields.
    pub async fn update_bean(&self, bean: GreenBean) -> AppResult<()> {
        require_user(&self.store)?;

        validation::validate_threshold(bean.low_stock_threshold).map_err(|msg| {
            AppError::validation("lowStockThreshold", msg, "Batas minimum tidak boleh negatif")
        })?;
        if bean.quantity < Decimal::ZERO {
            return Err(AppError::validation(
                "quantity",
                "Quantity cannot be negative",
                "Jumlah tidak boleh negatif",
            ));
        }

        if let Err(e) = self
            .documents
            .update(Collection::GreenBeans, bean.id, document_data(&bean)?)
            .await
        {
            self.notifier.write_failed(&e);
            return Err(e);
        }

        self.store.dispatch(Action::UpdateGreenBean(bean));
        Ok(())
    }

    /// Remove a lot entirely.
    pub async fn delete_bean(&self, id: Uuid) -> AppResult<()> {
        require_user(&self.store)?;

        if let Err(e) = self.documents.delete(Collection::GreenBeans, id).await {
            self.notifier.write_failed(&e);
            return Err(e);
        }

        self.store.dispatch(Action::DeleteGreenBean(id));
        Ok(())
    }

    /// Manual stock adjustment in either direction.
    ///
    /// Outgoing movements are rejected before any mutation when they would
    /// drive the balance negative.
    pub async fn record_movement(
        &self,
        bean_id: Uuid,
        direction: MovementDirection,
        quantity: Decimal,
    ) -> AppResult<GreenBean> {
        require_user(&self.store)?;
        validation::validate_positive_quantity(quantity)
            .map_err(|msg| AppError::validation("quantity", msg, "Jumlah harus positif"))?;

        let bean = self
            .store
            .state()
            .green_beans
            .into_iter()
            .find(|bean| bean.id == bean_id)
            .ok_or_else(|| AppError::NotFound("Green bean".to_string()))?;

        let new_quantity = match direction {
            MovementDirection::In => bean.quantity + quantity,
            MovementDirection::Out => {
                if quantity > bean.quantity {
                    return Err(AppError::InsufficientStock(format!(
                        "{} has only {}kg left",
                        bean.variety, bean.quantity
                    )));
                }
                bean.quantity - quantity
            }
        };

        if let Err(e) = self
            .documents
            .update(
                Collection::GreenBeans,
                bean.id,
                json!({ "quantity": new_quantity }),
            )
            .await
        {
            self.notifier.write_failed(&e);
            return Err(e);
        }

        let updated = GreenBean {
            quantity: new_quantity,
            ..bean
        };
        self.store.dispatch(Action::UpdateGreenBean(updated.clone()));

        let verb = match direction {
            MovementDirection::In => "Penambahan",
            MovementDirection::Out => "Pengurangan",
        };
        self.notifier.success(
            "Stok Diperbarui",
            format!("{} stok {}: {}kg", verb, updated.variety, quantity),
        );
        if updated.is_low_stock() {
            self.notifier.low_stock(&updated);
        }
        Ok(updated)
    }
}
