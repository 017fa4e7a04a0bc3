//! Activity log entity for tracking mutations and restorations

use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub uuid: Uuid,

    /// Display name/email of the actor, captured as plain text so the
    /// entry survives actor deletion
    #[sea_orm(indexed)]
    pub actor: String,

    #[sea_orm(indexed)]
    pub action: LogAction,

    /// Human-readable summary of the mutation
    pub details: String,

    #[sea_orm(indexed)]
    pub timestamp: DateTimeUtc,

    /// Full structural snapshot of the affected row at time of deletion;
    /// present only for DELETE_* actions
    #[sea_orm(column_type = "Json", nullable)]
    pub payload: Option<Json>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogAction {
    #[sea_orm(string_value = "CREATE_CERTIFICATE")]
    CreateCertificate,
    #[sea_orm(string_value = "UPDATE_CERTIFICATE")]
    UpdateCertificate,
    #[sea_orm(string_value = "DELETE_CERTIFICATE")]
    DeleteCertificate,
    #[sea_orm(string_value = "CREATE_USER")]
    CreateUser,
    #[sea_orm(string_value = "UPDATE_USER")]
    UpdateUser,
    #[sea_orm(string_value = "DELETE_USER")]
    DeleteUser,
    #[sea_orm(string_value = "CREATE_TANAH_GARAPAN")]
    CreateTanahGarapan,
    #[sea_orm(string_value = "UPDATE_TANAH_GARAPAN")]
    UpdateTanahGarapan,
    #[sea_orm(string_value = "DELETE_TANAH_GARAPAN")]
    DeleteTanahGarapan,
    #[sea_orm(string_value = "CHECK_IN")]
    CheckIn,
    #[sea_orm(string_value = "CHECK_OUT")]
    CheckOut,
    #[sea_orm(string_value = "UPDATE_ATTENDANCE")]
    UpdateAttendance,
    #[sea_orm(string_value = "DELETE_ATTENDANCE")]
    DeleteAttendance,
    #[sea_orm(string_value = "RESTORE_DATA")]
    RestoreData,
}

/// Entity table a recoverable deletion restores into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreTarget {
    Certificate,
    User,
    TanahGarapan,
    Attendance,
}

impl LogAction {
    /// Fixed mapping from action to the table a non-null payload can be
    /// restored into. Actions outside this set never expose a restore
    /// affordance.
    pub fn restore_target(&self) -> Option<RestoreTarget> {
        match self {
            LogAction::DeleteCertificate => Some(RestoreTarget::Certificate),
            LogAction::DeleteUser => Some(RestoreTarget::User),
            LogAction::DeleteTanahGarapan => Some(RestoreTarget::TanahGarapan),
            LogAction::DeleteAttendance => Some(RestoreTarget::Attendance),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            uuid: Set(Uuid::new_v4()),
            timestamp: Set(chrono::Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}
