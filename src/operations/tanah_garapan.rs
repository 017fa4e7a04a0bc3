//! Tanah Garapan register mutations and queries

use crate::error::{CoreError, CoreResult};
use crate::infrastructure::database::entities::activity_log::LogAction;
use crate::infrastructure::database::entities::tanah_garapan;
use crate::operations::logs::ActivityLogService;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TanahGarapanInput {
    pub letak_tanah: String,
    pub nama_pemegang_hak: String,
    pub letter_c: String,
    pub nomor_surat_keterangan_garapan: String,
    pub luas: i32,
    pub keterangan: Option<String>,
}

impl TanahGarapanInput {
    fn validate(&self) -> CoreResult<()> {
        if self.luas <= 0 {
            return Err(CoreError::Validation {
                field: "luas",
                message: "must be a positive number".to_string(),
            });
        }
        Ok(())
    }
}

pub struct TanahGarapanService;

impl TanahGarapanService {
    /// All entries, newest first
    pub async fn list(db: &DatabaseConnection) -> CoreResult<Vec<tanah_garapan::Model>> {
        Ok(tanah_garapan::Entity::find()
            .order_by_desc(tanah_garapan::Column::CreatedAt)
            .all(db)
            .await?)
    }

    pub async fn get(db: &DatabaseConnection, uuid: Uuid) -> CoreResult<tanah_garapan::Model> {
        tanah_garapan::Entity::find()
            .filter(tanah_garapan::Column::Uuid.eq(uuid))
            .one(db)
            .await?
            .ok_or(CoreError::NotFound("Tanah Garapan entry"))
    }

    /// Entries grouped under one letak_tanah, ordered by holder name.
    /// An empty group reports NotFound, matching the print-view contract.
    pub async fn by_letak_tanah(
        db: &DatabaseConnection,
        letak_tanah: &str,
    ) -> CoreResult<Vec<tanah_garapan::Model>> {
        let entries = tanah_garapan::Entity::find()
            .filter(tanah_garapan::Column::LetakTanah.eq(letak_tanah))
            .order_by_asc(tanah_garapan::Column::NamaPemegangHak)
            .all(db)
            .await?;
        if entries.is_empty() {
            return Err(CoreError::NotFound("Tanah Garapan entry"));
        }
        Ok(entries)
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: TanahGarapanInput,
        actor: &str,
    ) -> CoreResult<tanah_garapan::Model> {
        input.validate()?;

        let txn = db.begin().await?;

        let created = tanah_garapan::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            letak_tanah: Set(input.letak_tanah.clone()),
            nama_pemegang_hak: Set(input.nama_pemegang_hak.clone()),
            letter_c: Set(input.letter_c.clone()),
            nomor_surat_keterangan_garapan: Set(input.nomor_surat_keterangan_garapan.clone()),
            luas: Set(input.luas),
            keterangan: Set(input.keterangan.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        ActivityLogService::record(
            &txn,
            actor,
            LogAction::CreateTanahGarapan,
            format!(
                "Created new entry for '{}' in '{}'.",
                created.nama_pemegang_hak, created.letak_tanah
            ),
            None,
        )
        .await?;

        txn.commit().await?;
        Ok(created)
    }

    pub async fn update(
        db: &DatabaseConnection,
        uuid: Uuid,
        input: TanahGarapanInput,
        actor: &str,
    ) -> CoreResult<tanah_garapan::Model> {
        input.validate()?;

        let txn = db.begin().await?;

        let existing = tanah_garapan::Entity::find()
            .filter(tanah_garapan::Column::Uuid.eq(uuid))
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("Tanah Garapan entry"))?;

        let mut active: tanah_garapan::ActiveModel = existing.into();
        active.letak_tanah = Set(input.letak_tanah.clone());
        active.nama_pemegang_hak = Set(input.nama_pemegang_hak.clone());
        active.letter_c = Set(input.letter_c.clone());
        active.nomor_surat_keterangan_garapan = Set(input.nomor_surat_keterangan_garapan.clone());
        active.luas = Set(input.luas);
        active.keterangan = Set(input.keterangan.clone());
        let updated = active.update(&txn).await?;

        ActivityLogService::record(
            &txn,
            actor,
            LogAction::UpdateTanahGarapan,
            format!(
                "Updated entry for '{}' in '{}'.",
                updated.nama_pemegang_hak, updated.letak_tanah
            ),
            None,
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Delete an entry, snapshotting the full row. No-op when already gone.
    pub async fn delete(db: &DatabaseConnection, uuid: Uuid, actor: &str) -> CoreResult<()> {
        let txn = db.begin().await?;

        let Some(existing) = tanah_garapan::Entity::find()
            .filter(tanah_garapan::Column::Uuid.eq(uuid))
            .one(&txn)
            .await?
        else {
            return Ok(());
        };

        let snapshot = serde_json::to_value(&existing)?;
        let details = format!(
            "Deleted entry for '{}' in '{}'.",
            existing.nama_pemegang_hak, existing.letak_tanah
        );
        tanah_garapan::Entity::delete_by_id(existing.id)
            .exec(&txn)
            .await?;

        ActivityLogService::record(
            &txn,
            actor,
            LogAction::DeleteTanahGarapan,
            details,
            Some(snapshot),
        )
        .await?;

        txn.commit().await?;
        Ok(())
    }
}
