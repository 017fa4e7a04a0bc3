//! Activity log append and listing

use crate::error::CoreResult;
use crate::infrastructure::database::entities::activity_log::{self, LogAction};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};
use uuid::Uuid;

pub struct ActivityLogService;

impl ActivityLogService {
    /// All log entries, most recent first. Restartable plain re-query; any
    /// filtering or pagination is the presentation layer's concern.
    pub async fn list(db: &DatabaseConnection) -> CoreResult<Vec<activity_log::Model>> {
        Ok(activity_log::Entity::find()
            .order_by_desc(activity_log::Column::Timestamp)
            .order_by_desc(activity_log::Column::Id)
            .all(db)
            .await?)
    }

    /// Append one entry. Runs on any connection so mutation services can
    /// call it inside their own transaction.
    pub(crate) async fn record<C>(
        conn: &C,
        actor: &str,
        action: LogAction,
        details: String,
        payload: Option<serde_json::Value>,
    ) -> Result<activity_log::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        activity_log::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            actor: Set(actor.to_string()),
            action: Set(action),
            details: Set(details),
            timestamp: Set(Utc::now()),
            payload: Set(payload),
            ..Default::default()
        }
        .insert(conn)
        .await
    }
}
