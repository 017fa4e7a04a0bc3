//! User account mutations and queries

use crate::auth::password;
use crate::error::{CoreError, CoreResult};
use crate::infrastructure::database::entities::activity_log::LogAction;
use crate::infrastructure::database::entities::user::{self, UserRole};
use crate::operations::logs::ActivityLogService;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub password: String,
}

/// Update field set; a `None` password keeps the stored hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub password: Option<String>,
}

pub struct UserService;

impl UserService {
    /// All users, newest first
    pub async fn list(db: &DatabaseConnection) -> CoreResult<Vec<user::Model>> {
        Ok(user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(db)
            .await?)
    }

    pub async fn get(db: &DatabaseConnection, uuid: Uuid) -> CoreResult<user::Model> {
        user::Entity::find()
            .filter(user::Column::Uuid.eq(uuid))
            .one(db)
            .await?
            .ok_or(CoreError::NotFound("User"))
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: NewUser,
        actor: &str,
    ) -> CoreResult<user::Model> {
        if input.password.is_empty() {
            return Err(CoreError::Validation {
                field: "password",
                message: "a password is required for new users".to_string(),
            });
        }

        let txn = db.begin().await?;

        Self::check_unique(&txn, &input.email, None).await?;

        let password_hash = password::hash(&input.password)?;
        let created = user::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            name: Set(input.name.clone()),
            email: Set(input.email.clone()),
            role: Set(input.role),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| CoreError::from_insert_err("user", &[("email", input.email.as_str())], e))?;

        ActivityLogService::record(
            &txn,
            actor,
            LogAction::CreateUser,
            format!(
                "Created new user '{}' with role '{}'.",
                created.name,
                created.role.as_str()
            ),
            None,
        )
        .await?;

        txn.commit().await?;
        info!(email = %created.email, "user created");
        Ok(created)
    }

    pub async fn update(
        db: &DatabaseConnection,
        uuid: Uuid,
        changes: UserChanges,
        actor: &str,
    ) -> CoreResult<user::Model> {
        let txn = db.begin().await?;

        let existing = user::Entity::find()
            .filter(user::Column::Uuid.eq(uuid))
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("User"))?;

        Self::check_unique(&txn, &changes.email, Some(uuid)).await?;

        let mut active: user::ActiveModel = existing.into();
        active.name = Set(changes.name.clone());
        active.email = Set(changes.email.clone());
        active.role = Set(changes.role);
        if let Some(new_password) = changes.password.as_deref().filter(|p| !p.is_empty()) {
            active.password_hash = Set(password::hash(new_password)?);
        }
        let updated = active.update(&txn).await?;

        ActivityLogService::record(
            &txn,
            actor,
            LogAction::UpdateUser,
            format!("Updated user '{}'.", updated.name),
            None,
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Delete a user, snapshotting the full row. The hash is part of the
    /// snapshot for completeness; it is never surfaced and a restore
    /// discards it. No-op when already gone.
    pub async fn delete(db: &DatabaseConnection, uuid: Uuid, actor: &str) -> CoreResult<()> {
        let txn = db.begin().await?;

        let Some(existing) = user::Entity::find()
            .filter(user::Column::Uuid.eq(uuid))
            .one(&txn)
            .await?
        else {
            return Ok(());
        };

        let snapshot = serde_json::to_value(&existing)?;
        let name = existing.name.clone();
        user::Entity::delete_by_id(existing.id).exec(&txn).await?;

        ActivityLogService::record(
            &txn,
            actor,
            LogAction::DeleteUser,
            format!("Deleted user '{}'.", name),
            Some(snapshot),
        )
        .await?;

        txn.commit().await?;
        info!(%name, "user deleted");
        Ok(())
    }

    async fn check_unique<C: ConnectionTrait>(
        conn: &C,
        email: &str,
        exclude: Option<Uuid>,
    ) -> CoreResult<()> {
        let mut query = user::Entity::find().filter(user::Column::Email.eq(email));
        if let Some(uuid) = exclude {
            query = query.filter(user::Column::Uuid.ne(uuid));
        }
        if query.one(conn).await?.is_some() {
            return Err(CoreError::Conflict {
                entity: "user",
                field: "email".to_string(),
                value: email.to_string(),
            });
        }
        Ok(())
    }
}
