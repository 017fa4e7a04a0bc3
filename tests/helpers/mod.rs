#![allow(dead_code)]

//! Shared setup for integration tests

use chrono::{TimeZone, Utc};
use pkp_core::infrastructure::database::entities::activity_log::{self, LogAction};
use pkp_core::infrastructure::database::entities::user::UserRole;
use pkp_core::operations::certificates::CertificateInput;
use pkp_core::operations::logs::ActivityLogService;
use pkp_core::operations::tanah_garapan::TanahGarapanInput;
use pkp_core::operations::users::NewUser;
use pkp_core::Core;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// Core over a throwaway database; the temp dir must outlive the test
pub struct TestCore {
    pub core: Core,
    _dir: TempDir,
}

impl TestCore {
    pub fn db(&self) -> &DatabaseConnection {
        self.core.db()
    }
}

pub async fn open_core() -> TestCore {
    let dir = TempDir::new().unwrap();
    let core = Core::open(dir.path().to_path_buf()).await.unwrap();
    TestCore { core, _dir: dir }
}

pub fn certificate_input(no_sertifikat: &str, nib: &str) -> CertificateInput {
    CertificateInput {
        kode: "C-01".to_string(),
        nama_pemegang: vec!["Alice".to_string()],
        surat_hak: "Hak Milik".to_string(),
        no_sertifikat: no_sertifikat.to_string(),
        lokasi_tanah: "Jl. Kenanga No. 5".to_string(),
        luas_m2: 100,
        tgl_terbit: Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap(),
        surat_ukur: "SU-11/2023".to_string(),
        nib: nib.to_string(),
        pendaftaran_pertama: Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap(),
    }
}

pub fn new_user(name: &str, email: &str, password: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        role: UserRole::User,
        password: password.to_string(),
    }
}

pub fn tanah_garapan_input(nama_pemegang_hak: &str, letak_tanah: &str) -> TanahGarapanInput {
    TanahGarapanInput {
        letak_tanah: letak_tanah.to_string(),
        nama_pemegang_hak: nama_pemegang_hak.to_string(),
        letter_c: "LC-7".to_string(),
        nomor_surat_keterangan_garapan: "SKG-001".to_string(),
        luas: 250,
        keterangan: None,
    }
}

/// All log entries carrying the given action, most recent first
pub async fn logs_with_action(
    db: &DatabaseConnection,
    action: LogAction,
) -> Vec<activity_log::Model> {
    ActivityLogService::list(db)
        .await
        .unwrap()
        .into_iter()
        .filter(|entry| entry.action == action)
        .collect()
}
