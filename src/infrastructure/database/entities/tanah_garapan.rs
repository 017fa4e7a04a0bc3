//! Tanah Garapan (land occupancy) register entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tanah_garapan_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub uuid: Uuid,

    /// Logical grouping key; not constrained
    #[sea_orm(indexed)]
    pub letak_tanah: String,

    pub nama_pemegang_hak: String,

    pub letter_c: String,

    pub nomor_surat_keterangan_garapan: String,

    pub luas: i32,

    pub keterangan: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
