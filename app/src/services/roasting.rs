//! Roasting profile and session service

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use shared::models::{GreenBean, RoastingProfile, RoastingSession};
use shared::validation;

use crate::config::RoastingConfig;
use crate::error::{AppError, AppResult};
use crate::providers::documents::{document_data, with_owner, Collection};
use crate::providers::DocumentStore;
use crate::store::{Action, Store};

use super::notifications::Notifier;
use super::{generate_batch_number, require_user};

/// Input for creating a roasting profile
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileInput {
    pub name: String,
    pub temperature_curve: String,
    pub target_duration: i32,
    pub notes: String,
}

/// Input for recording a roasting session
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionInput {
    pub green_bean_id: Uuid,
    pub profile_id: Uuid,
    pub green_bean_quantity: Decimal,
    /// Yield in percent of the green input; the configured policy default
    /// (80%) applies when absent.
    pub yield_percent: Option<u32>,
    pub quality_score: Option<Decimal>,
    pub notes: Option<String>,
}

pub struct RoastingService {
    store: Arc<Store>,
    documents: Arc<dyn DocumentStore>,
    notifier: Notifier,
    config: RoastingConfig,
}

impl RoastingService {
    pub fn new(
        store: Arc<Store>,
        documents: Arc<dyn DocumentStore>,
        notifier: Notifier,
        config: RoastingConfig,
    ) -> Self {
        Self {
            store,
            documents,
            notifier,
            config,
        }
    }

    // ========================================================================
    // Profiles
    // ========================================================================

    pub async fn create_profile(&self, input: CreateProfileInput) -> AppResult<RoastingProfile> {
        let user = require_user(&self.store)?;

        validation::validate_name(&input.name)
            .map_err(|msg| AppError::validation("name", msg, "Nama profil wajib diisi"))?;
        validation::validate_target_duration(input.target_duration)
            .map_err(|msg| AppError::validation("targetDuration", msg, "Durasi harus positif"))?;

        let profile = RoastingProfile {
            id: Uuid::new_v4(),
            name: input.name,
            temperature_curve: input.temperature_curve,
            target_duration: input.target_duration,
            notes: input.notes,
            created_by: user.id,
            created_at: Utc::now(),
        };

        let data = with_owner(document_data(&profile)?, user.id);
        let id = match self.documents.create(Collection::RoastingProfiles, data).await {
            Ok(id) => id,
            Err(e) => {
                self.notifier.write_failed(&e);
                return Err(e);
            }
        };

        let profile = RoastingProfile { id, ..profile };
        self.store
            .dispatch(Action::AddRoastingProfile(profile.clone()));
        Ok(profile)
    }

    pub async fn update_profile(&self, profile: RoastingProfile) -> AppResult<()> {
        require_user(&self.store)?;
        validation::validate_target_duration(profile.target_duration)
            .map_err(|msg| AppError::validation("targetDuration", msg, "Durasi harus positif"))?;

        if let Err(e) = self
            .documents
            .update(
                Collection::RoastingProfiles,
                profile.id,
                document_data(&profile)?,
            )
            .await
        {
            self.notifier.write_failed(&e);
            return Err(e);
        }

        self.store.dispatch(Action::UpdateRoastingProfile(profile));
        Ok(())
    }

    pub async fn delete_profile(&self, id: Uuid) -> AppResult<()> {
        require_user(&self.store)?;

        if let Err(e) = self.documents.delete(Collection::RoastingProfiles, id).await {
            self.notifier.write_failed(&e);
            return Err(e);
        }

        self.store.dispatch(Action::DeleteRoastingProfile(id));
        Ok(())
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Record a roasting session and decrement the consumed lot.
    ///
    /// The session write and the compensating decrement are two independent
    /// operations; when the second fails after the first succeeded the
    /// divergence is logged distinctly and surfaced to the caller.
    pub async fn create_session(&self, input: CreateSessionInput) -> AppResult<RoastingSession> {
        let user = require_user(&self.store)?;

        validation::validate_positive_quantity(input.green_bean_quantity)
            .map_err(|msg| AppError::validation("greenBeanQuantity", msg, "Jumlah harus positif"))?;
        if let Some(score) = input.quality_score {
            validation::validate_quality_score(score).map_err(|msg| {
                AppError::validation("qualityScore", msg, "Skor harus di antara 0 dan 10")
            })?;
        }

        let state = self.store.state();
        let bean = state
            .green_beans
            .iter()
            .find(|bean| bean.id == input.green_bean_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Green bean".to_string()))?;
        if !state
            .roasting_profiles
            .iter()
            .any(|profile| profile.id == input.profile_id)
        {
            return Err(AppError::NotFound("Roasting profile".to_string()));
        }

        if input.green_bean_quantity > bean.quantity {
            return Err(AppError::InsufficientStock(format!(
                "{} has only {}kg left",
                bean.variety, bean.quantity
            )));
        }

        let yield_percent = input
            .yield_percent
            .unwrap_or(self.config.default_yield_percent);
        if yield_percent == 0 || yield_percent > 100 {
            return Err(AppError::validation(
                "yieldPercent",
                "Yield must be between 1 and 100 percent",
                "Rendemen harus di antara 1 dan 100 persen",
            ));
        }
        let roasted_quantity =
            input.green_bean_quantity * Decimal::from(yield_percent) / Decimal::from(100);

        let now = Utc::now();
        let session = RoastingSession {
            id: Uuid::new_v4(),
            green_bean_id: bean.id,
            green_bean_quantity: input.green_bean_quantity,
            roasted_quantity,
            profile_id: input.profile_id,
            roast_date: now,
            roaster_id: user.id,
            batch_number: generate_batch_number("RS", now),
            quality_score: input.quality_score,
            notes: input.notes,
        };

        let data = with_owner(document_data(&session)?, user.id);
        let id = match self.documents.create(Collection::RoastingSessions, data).await {
            Ok(id) => id,
            Err(e) => {
                self.notifier.write_failed(&e);
                return Err(e);
            }
        };

        let session = RoastingSession { id, ..session };
        self.store
            .dispatch(Action::AddRoastingSession(session.clone()));

        // Compensating decrement of the consumed lot. Not transactional with
        // the session write; see the error path below.
        let new_quantity = bean.quantity - session.green_bean_quantity;
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
                session = %session.id,
                bean = %bean.id,
                "compensating inventory decrement failed after session write: {}",
                e
            );
            self.notifier.error(
                "Stok Tidak Sinkron",
                format!(
                    "Sesi roasting tercatat tetapi stok {} gagal dikurangi",
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

        self.notifier.success(
            "Roasting Selesai",
            format!("{}kg biji kopi berhasil di-roasting", session.roasted_quantity),
        );
        if updated.is_low_stock() {
            self.notifier.low_stock(&updated);
        }
        Ok(session)
    }
}
