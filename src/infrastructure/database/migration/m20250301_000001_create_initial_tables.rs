//! Initial migration to create the register tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create certificates table
        manager
            .create_table(
                Table::create()
                    .table(Certificates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Certificates::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Certificates::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Certificates::Kode).string().not_null())
                    .col(ColumnDef::new(Certificates::NamaPemegang).json().not_null())
                    .col(ColumnDef::new(Certificates::SuratHak).string().not_null())
                    .col(ColumnDef::new(Certificates::NoSertifikat).string().not_null().unique_key())
                    .col(ColumnDef::new(Certificates::LokasiTanah).string().not_null())
                    .col(ColumnDef::new(Certificates::LuasM2).integer().not_null())
                    .col(ColumnDef::new(Certificates::TglTerbit).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Certificates::SuratUkur).string().not_null())
                    .col(ColumnDef::new(Certificates::Nib).string().not_null().unique_key())
                    .col(ColumnDef::new(Certificates::PendaftaranPertama).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Certificates::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Certificates::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        // Create tanah_garapan_entries table
        manager
            .create_table(
                Table::create()
                    .table(TanahGarapanEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TanahGarapanEntries::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(TanahGarapanEntries::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(TanahGarapanEntries::LetakTanah).string().not_null())
                    .col(ColumnDef::new(TanahGarapanEntries::NamaPemegangHak).string().not_null())
                    .col(ColumnDef::new(TanahGarapanEntries::LetterC).string().not_null())
                    .col(ColumnDef::new(TanahGarapanEntries::NomorSuratKeteranganGarapan).string().not_null())
                    .col(ColumnDef::new(TanahGarapanEntries::Luas).integer().not_null())
                    .col(ColumnDef::new(TanahGarapanEntries::Keterangan).string())
                    .col(ColumnDef::new(TanahGarapanEntries::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tanah_garapan_letak_tanah")
                    .table(TanahGarapanEntries::Table)
                    .col(TanahGarapanEntries::LetakTanah)
                    .to_owned(),
            )
            .await?;

        // Create attendance table; user_id is a weak reference to
        // users.uuid, deliberately without a foreign key so records remain
        // restorable after their user is deleted
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Attendance::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Attendance::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Attendance::UserId).uuid().not_null())
                    .col(ColumnDef::new(Attendance::Date).date().not_null())
                    .col(ColumnDef::new(Attendance::CheckIn).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Attendance::CheckOut).timestamp_with_time_zone())
                    .col(ColumnDef::new(Attendance::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Attendance::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        // At most one attendance row per user per calendar day
        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_user_id_date")
                    .table(Attendance::Table)
                    .col(Attendance::UserId)
                    .col(Attendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_user_id")
                    .table(Attendance::Table)
                    .col(Attendance::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TanahGarapanEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Certificates::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Certificates {
    Table,
    Id,
    Uuid,
    Kode,
    NamaPemegang,
    SuratHak,
    NoSertifikat,
    LokasiTanah,
    LuasM2,
    TglTerbit,
    SuratUkur,
    Nib,
    PendaftaranPertama,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Uuid,
    Name,
    Email,
    Role,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TanahGarapanEntries {
    Table,
    Id,
    Uuid,
    LetakTanah,
    NamaPemegangHak,
    LetterC,
    NomorSuratKeteranganGarapan,
    Luas,
    Keterangan,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    Uuid,
    UserId,
    Date,
    CheckIn,
    CheckOut,
    CreatedAt,
    UpdatedAt,
}
