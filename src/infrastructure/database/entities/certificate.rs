//! Land certificate entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "certificates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub uuid: Uuid,

    pub kode: String,

    /// Ordered list of holder names, stored as a JSON array
    #[sea_orm(column_type = "Json")]
    pub nama_pemegang: Json,

    pub surat_hak: String,

    #[sea_orm(unique)]
    pub no_sertifikat: String,

    pub lokasi_tanah: String,

    pub luas_m2: i32,

    pub tgl_terbit: DateTimeUtc,

    pub surat_ukur: String,

    #[sea_orm(unique)]
    pub nib: String,

    pub pendaftaran_pertama: DateTimeUtc,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Holder names as plain strings; non-string array members are skipped
    pub fn holder_names(&self) -> Vec<String> {
        self.nama_pemegang
            .as_array()
            .map(|names| {
                names
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
