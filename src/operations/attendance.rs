//! Attendance check-in/out and record management

use crate::error::{CoreError, CoreResult};
use crate::infrastructure::database::entities::activity_log::LogAction;
use crate::infrastructure::database::entities::{attendance, user};
use crate::operations::logs::ActivityLogService;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const HISTORY_LIMIT: u64 = 30;

/// Update field set. Outer `None` leaves a field unchanged; an inner `None`
/// for check_out clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceChanges {
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<Option<DateTime<Utc>>>,
}

/// Listing filter; all parts optional
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub user_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub struct AttendanceService;

impl AttendanceService {
    /// Record a check-in for today. At most one attendance row exists per
    /// user per calendar day, whatever the time of day.
    pub async fn check_in(
        db: &DatabaseConnection,
        user_id: Uuid,
        user_name: &str,
    ) -> CoreResult<attendance::Model> {
        let now = Utc::now();
        let today = now.date_naive();

        let txn = db.begin().await?;

        let existing = attendance::Entity::find()
            .filter(attendance::Column::UserId.eq(user_id))
            .filter(attendance::Column::Date.eq(today))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(Self::day_conflict(user_id, today));
        }

        let created = attendance::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            date: Set(today),
            check_in: Set(now),
            check_out: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            // Lost a race with a concurrent check-in for the same day
            match CoreError::from_insert_err("check-in", &[], e) {
                CoreError::Conflict { .. } => Self::day_conflict(user_id, today),
                other => other,
            }
        })?;

        ActivityLogService::record(
            &txn,
            user_name,
            LogAction::CheckIn,
            format!("User {} checked in.", user_name),
            None,
        )
        .await?;

        txn.commit().await?;
        Ok(created)
    }

    /// Record the check-out on an open attendance row
    pub async fn check_out(
        db: &DatabaseConnection,
        uuid: Uuid,
        user_name: &str,
    ) -> CoreResult<attendance::Model> {
        let txn = db.begin().await?;

        let existing = attendance::Entity::find()
            .filter(attendance::Column::Uuid.eq(uuid))
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("Attendance record"))?;

        if existing.check_out.is_some() {
            return Err(CoreError::Validation {
                field: "check_out",
                message: "user has already checked out".to_string(),
            });
        }

        let now = Utc::now();
        let check_in = existing.check_in;
        if now <= check_in {
            return Err(CoreError::Validation {
                field: "check_out",
                message: "check-out must be after check-in".to_string(),
            });
        }

        let mut active: attendance::ActiveModel = existing.into();
        active.check_out = Set(Some(now));
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        ActivityLogService::record(
            &txn,
            user_name,
            LogAction::CheckOut,
            format!("User {} checked out.", user_name),
            None,
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Today's attendance row for a user, if any
    pub async fn today_for_user(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> CoreResult<Option<attendance::Model>> {
        Ok(attendance::Entity::find()
            .filter(attendance::Column::UserId.eq(user_id))
            .filter(attendance::Column::Date.eq(Utc::now().date_naive()))
            .one(db)
            .await?)
    }

    /// Most recent attendance rows for a user, capped at 30 entries
    pub async fn history(
        db: &DatabaseConnection,
        user_id: Uuid,
    ) -> CoreResult<Vec<attendance::Model>> {
        Ok(attendance::Entity::find()
            .filter(attendance::Column::UserId.eq(user_id))
            .order_by_desc(attendance::Column::Date)
            .limit(HISTORY_LIMIT)
            .all(db)
            .await?)
    }

    /// Attendance rows with their users joined, newest first
    pub async fn records(
        db: &DatabaseConnection,
        filter: AttendanceFilter,
    ) -> CoreResult<Vec<(attendance::Model, Option<user::Model>)>> {
        let mut query = attendance::Entity::find().find_also_related(user::Entity);

        if let Some(user_id) = filter.user_id {
            query = query.filter(attendance::Column::UserId.eq(user_id));
        }
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            query = query
                .filter(attendance::Column::Date.gte(start))
                .filter(attendance::Column::Date.lte(end));
        }

        Ok(query
            .order_by_desc(attendance::Column::Date)
            .all(db)
            .await?)
    }

    /// Correct the check-in/out times on a record
    pub async fn update(
        db: &DatabaseConnection,
        uuid: Uuid,
        changes: AttendanceChanges,
        actor: &str,
    ) -> CoreResult<attendance::Model> {
        let txn = db.begin().await?;

        let (existing, related_user) = attendance::Entity::find()
            .filter(attendance::Column::Uuid.eq(uuid))
            .find_also_related(user::Entity)
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("Attendance record"))?;

        let check_in = changes.check_in.unwrap_or(existing.check_in);
        let check_out = changes.check_out.unwrap_or(existing.check_out);
        if let Some(out) = check_out {
            if out <= check_in {
                return Err(CoreError::Validation {
                    field: "check_out",
                    message: "check-out must be after check-in".to_string(),
                });
            }
        }

        let date = existing.date;
        let mut active: attendance::ActiveModel = existing.into();
        active.check_in = Set(check_in);
        active.check_out = Set(check_out);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        let user_name = related_user
            .map(|u| u.name)
            .unwrap_or_else(|| updated.user_id.to_string());
        ActivityLogService::record(
            &txn,
            actor,
            LogAction::UpdateAttendance,
            format!("Updated attendance for {} on {}.", user_name, date),
            None,
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Delete a record, snapshotting the row plus the denormalized user it
    /// pointed at. No-op when already gone.
    pub async fn delete(db: &DatabaseConnection, uuid: Uuid, actor: &str) -> CoreResult<()> {
        let txn = db.begin().await?;

        let Some((existing, related_user)) = attendance::Entity::find()
            .filter(attendance::Column::Uuid.eq(uuid))
            .find_also_related(user::Entity)
            .one(&txn)
            .await?
        else {
            return Ok(());
        };

        let mut snapshot = serde_json::to_value(&existing)?;
        snapshot["user"] = match &related_user {
            Some(u) => serde_json::json!({ "uuid": u.uuid, "name": u.name }),
            None => serde_json::Value::Null,
        };

        let user_name = related_user
            .map(|u| u.name)
            .unwrap_or_else(|| existing.user_id.to_string());
        let details = format!("Deleted attendance for {} on {}.", user_name, existing.date);
        attendance::Entity::delete_by_id(existing.id)
            .exec(&txn)
            .await?;

        ActivityLogService::record(
            &txn,
            actor,
            LogAction::DeleteAttendance,
            details,
            Some(snapshot),
        )
        .await?;

        txn.commit().await?;
        Ok(())
    }

    fn day_conflict(user_id: Uuid, date: NaiveDate) -> CoreError {
        CoreError::Conflict {
            entity: "check-in",
            field: "user_id, date".to_string(),
            value: format!("{} on {}", user_id, date),
        }
    }
}
