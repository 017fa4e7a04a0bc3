//! Data recovery from deletion snapshots
//!
//! A `DELETE_*` log entry's payload is the only surviving copy of the row
//! it removed. Restoration decodes that snapshot into a per-action variant,
//! rebuilds a creation field set (identity and timestamps stripped), and
//! inserts a brand-new row; the original identity is never reused.

use crate::auth::password;
use crate::error::{CoreError, CoreResult};
use crate::infrastructure::database::entities::activity_log::{self, LogAction, RestoreTarget};
use crate::infrastructure::database::entities::user::UserRole;
use crate::infrastructure::database::entities::{attendance, certificate, tanah_garapan, user};
use crate::operations::logs::ActivityLogService;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

/// Result of a restore attempt; failures are outcomes, not errors
#[derive(Debug, Clone, Serialize)]
pub struct RestoreOutcome {
    pub success: bool,
    pub message: String,
}

impl RestoreOutcome {
    fn ok(details: &str) -> Self {
        Self {
            success: true,
            message: format!("Data restored successfully. {}", details),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Snapshot of a deleted certificate, as reconstructed from the log
/// payload. Identity and timestamp fields of the stored row fall away
/// during deserialization.
#[derive(Debug, Deserialize)]
struct CertificateSnapshot {
    kode: String,
    #[serde(default)]
    nama_pemegang: serde_json::Value,
    surat_hak: String,
    no_sertifikat: String,
    lokasi_tanah: String,
    luas_m2: i32,
    tgl_terbit: DateTime<Utc>,
    surat_ukur: String,
    nib: String,
    pendaftaran_pertama: DateTime<Utc>,
}

impl CertificateSnapshot {
    /// Holder names as stored; anything not list-shaped collapses to an
    /// empty array
    fn normalized_holders(&self) -> serde_json::Value {
        if self.nama_pemegang.is_array() {
            self.nama_pemegang.clone()
        } else {
            serde_json::json!([])
        }
    }
}

/// The stored password hash is deliberately absent: a restored account
/// always gets a fresh credential.
#[derive(Debug, Deserialize)]
struct UserSnapshot {
    name: String,
    email: String,
    role: UserRole,
}

#[derive(Debug, Deserialize)]
struct TanahGarapanSnapshot {
    letak_tanah: String,
    nama_pemegang_hak: String,
    letter_c: String,
    nomor_surat_keterangan_garapan: String,
    luas: i32,
    #[serde(default)]
    keterangan: Option<String>,
}

/// The denormalized user object in the payload is dropped; only the
/// user_id reference survives.
#[derive(Debug, Deserialize)]
struct AttendanceSnapshot {
    user_id: Uuid,
    date: NaiveDate,
    check_in: DateTime<Utc>,
    #[serde(default)]
    check_out: Option<DateTime<Utc>>,
}

/// Deletion payload decoded per the fixed action-to-table mapping
#[derive(Debug)]
enum RestorePayload {
    Certificate(CertificateSnapshot),
    User(UserSnapshot),
    TanahGarapan(TanahGarapanSnapshot),
    Attendance(AttendanceSnapshot),
}

impl RestorePayload {
    /// Decode a payload for a recoverable action; `None` when the action
    /// is not a recoverable deletion
    fn decode(
        action: LogAction,
        payload: serde_json::Value,
    ) -> Result<Option<Self>, serde_json::Error> {
        let Some(target) = action.restore_target() else {
            return Ok(None);
        };
        Ok(Some(match target {
            RestoreTarget::Certificate => {
                RestorePayload::Certificate(serde_json::from_value(payload)?)
            }
            RestoreTarget::User => RestorePayload::User(serde_json::from_value(payload)?),
            RestoreTarget::TanahGarapan => {
                RestorePayload::TanahGarapan(serde_json::from_value(payload)?)
            }
            RestoreTarget::Attendance => {
                RestorePayload::Attendance(serde_json::from_value(payload)?)
            }
        }))
    }
}

pub struct RestoreService;

impl RestoreService {
    /// Replay a deletion snapshot back into its table.
    ///
    /// Every failure mode is reported through the outcome message; callers
    /// never see raw database or decoding errors.
    pub async fn restore(db: &DatabaseConnection, log_uuid: Uuid, actor: &str) -> RestoreOutcome {
        match Self::try_restore(db, log_uuid, actor).await {
            Ok(outcome) => outcome,
            Err(CoreError::Conflict { field, .. }) => RestoreOutcome::failed(format!(
                "Restore failed: An item with the same unique value ({}) already exists.",
                field
            )),
            Err(err) => {
                error!("Restore failed: {}", err);
                RestoreOutcome::failed("An unexpected error occurred during restoration.")
            }
        }
    }

    async fn try_restore(
        db: &DatabaseConnection,
        log_uuid: Uuid,
        actor: &str,
    ) -> CoreResult<RestoreOutcome> {
        let entry = activity_log::Entity::find()
            .filter(activity_log::Column::Uuid.eq(log_uuid))
            .one(db)
            .await?;

        let Some(entry) = entry else {
            return Ok(RestoreOutcome::failed(
                "Log entry not found or no data to restore.",
            ));
        };
        let Some(payload) = entry.payload.clone() else {
            return Ok(RestoreOutcome::failed(
                "Log entry not found or no data to restore.",
            ));
        };

        let Some(decoded) = RestorePayload::decode(entry.action, payload)? else {
            return Ok(RestoreOutcome::failed(
                "This log entry is not a recoverable deletion.",
            ));
        };

        let txn = db.begin().await?;

        let details = match decoded {
            RestorePayload::Certificate(snapshot) => {
                let restored = Self::insert_certificate(&txn, snapshot).await?;
                format!("Restored certificate '{}'.", restored.no_sertifikat)
            }
            RestorePayload::User(snapshot) => {
                let restored = Self::insert_user(&txn, snapshot).await?;
                format!(
                    "Restored user '{}'. A new temporary password was set.",
                    restored.name
                )
            }
            RestorePayload::TanahGarapan(snapshot) => {
                let restored = Self::insert_tanah_garapan(&txn, snapshot).await?;
                format!(
                    "Restored Tanah Garapan entry for '{}'.",
                    restored.nama_pemegang_hak
                )
            }
            RestorePayload::Attendance(snapshot) => {
                let restored = Self::insert_attendance(&txn, snapshot).await?;
                format!(
                    "Restored attendance for user ID '{}' on {}.",
                    restored.user_id, restored.date
                )
            }
        };

        ActivityLogService::record(&txn, actor, LogAction::RestoreData, details.clone(), None)
            .await?;

        txn.commit().await?;
        Ok(RestoreOutcome::ok(&details))
    }

    async fn insert_certificate(
        txn: &DatabaseTransaction,
        snapshot: CertificateSnapshot,
    ) -> CoreResult<certificate::Model> {
        let now = Utc::now();
        certificate::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            kode: Set(snapshot.kode.clone()),
            nama_pemegang: Set(snapshot.normalized_holders()),
            surat_hak: Set(snapshot.surat_hak.clone()),
            no_sertifikat: Set(snapshot.no_sertifikat.clone()),
            lokasi_tanah: Set(snapshot.lokasi_tanah.clone()),
            luas_m2: Set(snapshot.luas_m2),
            tgl_terbit: Set(snapshot.tgl_terbit),
            surat_ukur: Set(snapshot.surat_ukur.clone()),
            nib: Set(snapshot.nib.clone()),
            pendaftaran_pertama: Set(snapshot.pendaftaran_pertama),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| {
            CoreError::from_insert_err(
                "certificate",
                &[
                    ("no_sertifikat", snapshot.no_sertifikat.as_str()),
                    ("nib", snapshot.nib.as_str()),
                ],
                e,
            )
        })
    }

    async fn insert_user(
        txn: &DatabaseTransaction,
        snapshot: UserSnapshot,
    ) -> CoreResult<user::Model> {
        // The snapshot's hash is discarded; a throwaway credential takes
        // its place and its plaintext is dropped on the floor
        let temporary = password::generate_temporary();
        let password_hash = password::hash(&temporary)?;

        user::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            name: Set(snapshot.name.clone()),
            email: Set(snapshot.email.clone()),
            role: Set(snapshot.role),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| CoreError::from_insert_err("user", &[("email", snapshot.email.as_str())], e))
    }

    async fn insert_tanah_garapan(
        txn: &DatabaseTransaction,
        snapshot: TanahGarapanSnapshot,
    ) -> CoreResult<tanah_garapan::Model> {
        Ok(tanah_garapan::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            letak_tanah: Set(snapshot.letak_tanah),
            nama_pemegang_hak: Set(snapshot.nama_pemegang_hak),
            letter_c: Set(snapshot.letter_c),
            nomor_surat_keterangan_garapan: Set(snapshot.nomor_surat_keterangan_garapan),
            luas: Set(snapshot.luas),
            keterangan: Set(snapshot.keterangan),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(txn)
        .await?)
    }

    async fn insert_attendance(
        txn: &DatabaseTransaction,
        snapshot: AttendanceSnapshot,
    ) -> CoreResult<attendance::Model> {
        let now = Utc::now();
        let date = snapshot.date.to_string();
        attendance::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            user_id: Set(snapshot.user_id),
            date: Set(snapshot.date),
            check_in: Set(snapshot.check_in),
            check_out: Set(snapshot.check_out),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| CoreError::from_insert_err("attendance", &[("date", date.as_str())], e))
    }
}
