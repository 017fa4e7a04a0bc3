//! Certificate mutations and queries

use crate::error::{CoreError, CoreResult};
use crate::infrastructure::database::entities::activity_log::LogAction;
use crate::infrastructure::database::entities::certificate;
use crate::operations::logs::ActivityLogService;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Field set for creating or updating a certificate. Structural validity
/// (presence, formats) is the form layer's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateInput {
    pub kode: String,
    pub nama_pemegang: Vec<String>,
    pub surat_hak: String,
    pub no_sertifikat: String,
    pub lokasi_tanah: String,
    pub luas_m2: i32,
    pub tgl_terbit: chrono::DateTime<Utc>,
    pub surat_ukur: String,
    pub nib: String,
    pub pendaftaran_pertama: chrono::DateTime<Utc>,
}

impl CertificateInput {
    /// Trimmed, non-empty holder names in original order
    fn holder_names(&self) -> Vec<String> {
        self.nama_pemegang
            .iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }

    fn validate(&self) -> CoreResult<Vec<String>> {
        if self.luas_m2 <= 0 {
            return Err(CoreError::Validation {
                field: "luas_m2",
                message: "must be a positive number".to_string(),
            });
        }
        let names = self.holder_names();
        if names.is_empty() {
            return Err(CoreError::Validation {
                field: "nama_pemegang",
                message: "at least one holder name is required".to_string(),
            });
        }
        Ok(names)
    }
}

pub struct CertificateService;

impl CertificateService {
    /// All certificates, newest first
    pub async fn list(db: &DatabaseConnection) -> CoreResult<Vec<certificate::Model>> {
        Ok(certificate::Entity::find()
            .order_by_desc(certificate::Column::CreatedAt)
            .all(db)
            .await?)
    }

    pub async fn get(db: &DatabaseConnection, uuid: Uuid) -> CoreResult<certificate::Model> {
        certificate::Entity::find()
            .filter(certificate::Column::Uuid.eq(uuid))
            .one(db)
            .await?
            .ok_or(CoreError::NotFound("Certificate"))
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: CertificateInput,
        actor: &str,
    ) -> CoreResult<certificate::Model> {
        let names = input.validate()?;

        let txn = db.begin().await?;

        Self::check_unique(&txn, &input, None).await?;

        let now = Utc::now();
        let created = certificate::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            kode: Set(input.kode.clone()),
            nama_pemegang: Set(serde_json::json!(names)),
            surat_hak: Set(input.surat_hak.clone()),
            no_sertifikat: Set(input.no_sertifikat.clone()),
            lokasi_tanah: Set(input.lokasi_tanah.clone()),
            luas_m2: Set(input.luas_m2),
            tgl_terbit: Set(input.tgl_terbit),
            surat_ukur: Set(input.surat_ukur.clone()),
            nib: Set(input.nib.clone()),
            pendaftaran_pertama: Set(input.pendaftaran_pertama),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            CoreError::from_insert_err(
                "certificate",
                &[
                    ("no_sertifikat", input.no_sertifikat.as_str()),
                    ("nib", input.nib.as_str()),
                ],
                e,
            )
        })?;

        ActivityLogService::record(
            &txn,
            actor,
            LogAction::CreateCertificate,
            format!(
                "Created certificate '{}' for {}.",
                created.no_sertifikat,
                names.join(", ")
            ),
            None,
        )
        .await?;

        txn.commit().await?;
        info!(no_sertifikat = %created.no_sertifikat, "certificate created");
        Ok(created)
    }

    pub async fn update(
        db: &DatabaseConnection,
        uuid: Uuid,
        input: CertificateInput,
        actor: &str,
    ) -> CoreResult<certificate::Model> {
        let names = input.validate()?;

        let txn = db.begin().await?;

        let existing = certificate::Entity::find()
            .filter(certificate::Column::Uuid.eq(uuid))
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("Certificate"))?;

        Self::check_unique(&txn, &input, Some(uuid)).await?;

        let mut active: certificate::ActiveModel = existing.into();
        active.kode = Set(input.kode.clone());
        active.nama_pemegang = Set(serde_json::json!(names));
        active.surat_hak = Set(input.surat_hak.clone());
        active.no_sertifikat = Set(input.no_sertifikat.clone());
        active.lokasi_tanah = Set(input.lokasi_tanah.clone());
        active.luas_m2 = Set(input.luas_m2);
        active.tgl_terbit = Set(input.tgl_terbit);
        active.surat_ukur = Set(input.surat_ukur.clone());
        active.nib = Set(input.nib.clone());
        active.pendaftaran_pertama = Set(input.pendaftaran_pertama);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        ActivityLogService::record(
            &txn,
            actor,
            LogAction::UpdateCertificate,
            format!("Updated certificate '{}'.", updated.no_sertifikat),
            None,
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Delete a certificate, snapshotting the full row into the log entry.
    /// Deleting an id that is already gone is a no-op.
    pub async fn delete(db: &DatabaseConnection, uuid: Uuid, actor: &str) -> CoreResult<()> {
        let txn = db.begin().await?;

        let Some(existing) = certificate::Entity::find()
            .filter(certificate::Column::Uuid.eq(uuid))
            .one(&txn)
            .await?
        else {
            return Ok(());
        };

        let snapshot = serde_json::to_value(&existing)?;
        let no_sertifikat = existing.no_sertifikat.clone();
        certificate::Entity::delete_by_id(existing.id)
            .exec(&txn)
            .await?;

        ActivityLogService::record(
            &txn,
            actor,
            LogAction::DeleteCertificate,
            format!("Deleted certificate '{}'.", no_sertifikat),
            Some(snapshot),
        )
        .await?;

        txn.commit().await?;
        info!(%no_sertifikat, "certificate deleted");
        Ok(())
    }

    /// Re-check every externally-unique field, excluding `exclude` when
    /// updating that row in place
    async fn check_unique<C: ConnectionTrait>(
        conn: &C,
        input: &CertificateInput,
        exclude: Option<Uuid>,
    ) -> CoreResult<()> {
        let mut by_sertifikat = certificate::Entity::find()
            .filter(certificate::Column::NoSertifikat.eq(&input.no_sertifikat));
        let mut by_nib = certificate::Entity::find().filter(certificate::Column::Nib.eq(&input.nib));
        if let Some(uuid) = exclude {
            by_sertifikat = by_sertifikat.filter(certificate::Column::Uuid.ne(uuid));
            by_nib = by_nib.filter(certificate::Column::Uuid.ne(uuid));
        }

        if by_sertifikat.one(conn).await?.is_some() {
            return Err(CoreError::Conflict {
                entity: "certificate",
                field: "no_sertifikat".to_string(),
                value: input.no_sertifikat.clone(),
            });
        }
        if by_nib.one(conn).await?.is_some() {
            return Err(CoreError::Conflict {
                entity: "certificate",
                field: "nib".to_string(),
                value: input.nib.clone(),
            });
        }
        Ok(())
    }
}
