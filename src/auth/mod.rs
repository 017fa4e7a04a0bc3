//! Credential checks against the user table
//!
//! Session storage and role gating live in the caller; this module only
//! answers whether a credential pair matches a stored account.

use crate::error::CoreResult;
use crate::infrastructure::database::entities::user::{self, UserRole};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod password;

/// Authenticated identity handed back to the session layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// Verify an email/password pair. Returns `None` on unknown email or bad
/// password alike; callers cannot tell which check failed.
pub async fn login(
    db: &DatabaseConnection,
    email: &str,
    pass: &str,
) -> CoreResult<Option<AuthUser>> {
    let Some(account) = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    if !password::verify(pass, &account.password_hash) {
        return Ok(None);
    }

    Ok(Some(AuthUser {
        uuid: account.uuid,
        name: account.name,
        email: account.email,
        role: account.role,
    }))
}
