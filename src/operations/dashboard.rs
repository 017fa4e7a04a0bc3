//! Dashboard summary queries

use crate::error::CoreResult;
use crate::infrastructure::database::entities::{activity_log, certificate, user};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
};
use serde::Serialize;

const RECENT_CERTIFICATES: u64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub certificates_count: u64,
    pub users_count: u64,
    pub logs_count: u64,
    pub recent_certificates: Vec<certificate::Model>,
    pub certificate_type_counts: Vec<GroupCount>,
    pub user_role_counts: Vec<GroupCount>,
}

pub struct DashboardService;

impl DashboardService {
    pub async fn summary(db: &DatabaseConnection) -> CoreResult<DashboardSummary> {
        let certificates_count = certificate::Entity::find().count(db).await?;
        let users_count = user::Entity::find().count(db).await?;
        let logs_count = activity_log::Entity::find().count(db).await?;

        let recent_certificates = certificate::Entity::find()
            .order_by_desc(certificate::Column::TglTerbit)
            .limit(RECENT_CERTIFICATES)
            .all(db)
            .await?;

        let certificate_type_counts = certificate::Entity::find()
            .select_only()
            .column(certificate::Column::SuratHak)
            .column_as(certificate::Column::Id.count(), "count")
            .group_by(certificate::Column::SuratHak)
            .into_tuple::<(String, i64)>()
            .all(db)
            .await?
            .into_iter()
            .map(|(key, count)| GroupCount { key, count })
            .collect();

        let user_role_counts = user::Entity::find()
            .select_only()
            .column(user::Column::Role)
            .column_as(user::Column::Id.count(), "count")
            .group_by(user::Column::Role)
            .into_tuple::<(String, i64)>()
            .all(db)
            .await?
            .into_iter()
            .map(|(key, count)| GroupCount { key, count })
            .collect();

        Ok(DashboardSummary {
            certificates_count,
            users_count,
            logs_count,
            recent_certificates,
            certificate_type_counts,
            user_role_counts,
        })
    }
}
