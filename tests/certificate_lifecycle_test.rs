//! Certificate mutations: uniqueness, audit trail, delete/restore round trip

mod helpers;

use helpers::{certificate_input, logs_with_action, open_core};
use pkp_core::infrastructure::database::entities::activity_log::LogAction;
use pkp_core::infrastructure::database::entities::certificate;
use pkp_core::operations::certificates::CertificateService;
use pkp_core::operations::logs::ActivityLogService;
use pkp_core::operations::restore::RestoreService;
use pkp_core::CoreError;
use sea_orm::EntityTrait;
use uuid::Uuid;

#[tokio::test]
async fn duplicate_no_sertifikat_yields_named_conflict() {
    let test = open_core().await;
    let db = test.db();

    CertificateService::create(db, certificate_input("SERT-001", "NIB-001"), "admin@pkp")
        .await
        .unwrap();

    let err = CertificateService::create(db, certificate_input("SERT-001", "NIB-002"), "admin@pkp")
        .await
        .unwrap_err();
    match err {
        CoreError::Conflict { field, value, .. } => {
            assert_eq!(field, "no_sertifikat");
            assert_eq!(value, "SERT-001");
        }
        other => panic!("expected conflict, got {:?}", other),
    }

    // Exactly one row and one CREATE entry survived
    assert_eq!(CertificateService::list(db).await.unwrap().len(), 1);
    assert_eq!(
        logs_with_action(db, LogAction::CreateCertificate).await.len(),
        1
    );
}

#[tokio::test]
async fn duplicate_nib_yields_named_conflict() {
    let test = open_core().await;
    let db = test.db();

    CertificateService::create(db, certificate_input("SERT-001", "NIB-001"), "admin@pkp")
        .await
        .unwrap();

    let err = CertificateService::create(db, certificate_input("SERT-002", "NIB-001"), "admin@pkp")
        .await
        .unwrap_err();
    match err {
        CoreError::Conflict { field, value, .. } => {
            assert_eq!(field, "nib");
            assert_eq!(value, "NIB-001");
        }
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn update_ignores_the_row_itself_but_conflicts_with_others() {
    let test = open_core().await;
    let db = test.db();

    let first = CertificateService::create(db, certificate_input("SERT-001", "NIB-001"), "admin@pkp")
        .await
        .unwrap();
    CertificateService::create(db, certificate_input("SERT-002", "NIB-002"), "admin@pkp")
        .await
        .unwrap();

    // Re-saving the row with its own unique values is not a conflict
    let mut input = certificate_input("SERT-001", "NIB-001");
    input.lokasi_tanah = "Jl. Mawar No. 2".to_string();
    let updated = CertificateService::update(db, first.uuid, input, "admin@pkp")
        .await
        .unwrap();
    assert_eq!(updated.lokasi_tanah, "Jl. Mawar No. 2");

    // Taking another row's no_sertifikat is a conflict
    let err = CertificateService::update(
        db,
        first.uuid,
        certificate_input("SERT-002", "NIB-001"),
        "admin@pkp",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CoreError::Conflict { .. }));

    assert_eq!(
        logs_with_action(db, LogAction::UpdateCertificate).await.len(),
        1
    );
}

#[tokio::test]
async fn updating_a_missing_certificate_is_not_found() {
    let test = open_core().await;
    let db = test.db();

    let err = CertificateService::update(
        db,
        Uuid::new_v4(),
        certificate_input("SERT-404", "NIB-404"),
        "admin@pkp",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn deleting_a_missing_certificate_is_a_silent_noop() {
    let test = open_core().await;
    let db = test.db();

    let ghost = Uuid::new_v4();
    CertificateService::delete(db, ghost, "admin@pkp").await.unwrap();
    CertificateService::delete(db, ghost, "admin@pkp").await.unwrap();

    assert!(ActivityLogService::list(db).await.unwrap().is_empty());
}

#[tokio::test]
async fn validation_failure_persists_nothing() {
    let test = open_core().await;
    let db = test.db();

    let mut input = certificate_input("SERT-001", "NIB-001");
    input.luas_m2 = 0;
    let err = CertificateService::create(db, input, "admin@pkp")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { field: "luas_m2", .. }));

    assert!(CertificateService::list(db).await.unwrap().is_empty());
    assert!(ActivityLogService::list(db).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_then_restore_round_trip() {
    let test = open_core().await;
    let db = test.db();

    let original = CertificateService::create(
        db,
        certificate_input("SERT-001", "NIB-001"),
        "admin@pkp",
    )
    .await
    .unwrap();

    CertificateService::delete(db, original.uuid, "admin@pkp")
        .await
        .unwrap();
    assert!(CertificateService::list(db).await.unwrap().is_empty());

    // The deletion entry carries the full row as its payload
    let deletions = logs_with_action(db, LogAction::DeleteCertificate).await;
    assert_eq!(deletions.len(), 1);
    let payload = deletions[0].payload.as_ref().expect("deletion payload");
    assert_eq!(payload["no_sertifikat"], "SERT-001");
    assert_eq!(payload["nama_pemegang"], serde_json::json!(["Alice"]));

    let outcome = RestoreService::restore(db, deletions[0].uuid, "admin@pkp").await;
    assert!(outcome.success, "restore failed: {}", outcome.message);

    // A new row exists with the old fields but a fresh identity
    let restored = &CertificateService::list(db).await.unwrap()[0];
    assert_eq!(restored.no_sertifikat, original.no_sertifikat);
    assert_eq!(restored.nib, original.nib);
    assert_eq!(restored.nama_pemegang, original.nama_pemegang);
    assert_eq!(restored.tgl_terbit, original.tgl_terbit);
    assert_ne!(restored.uuid, original.uuid);

    assert_eq!(logs_with_action(db, LogAction::RestoreData).await.len(), 1);
}

#[tokio::test]
async fn log_listing_is_most_recent_first() {
    let test = open_core().await;
    let db = test.db();

    CertificateService::create(db, certificate_input("SERT-001", "NIB-001"), "admin@pkp")
        .await
        .unwrap();
    CertificateService::create(db, certificate_input("SERT-002", "NIB-002"), "admin@pkp")
        .await
        .unwrap();

    let entries = ActivityLogService::list(db).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].details.contains("SERT-002"));
    assert!(entries[1].details.contains("SERT-001"));
}

#[tokio::test]
async fn create_entries_carry_no_payload() {
    let test = open_core().await;
    let db = test.db();

    let created = CertificateService::create(
        db,
        certificate_input("SERT-001", "NIB-001"),
        "admin@pkp",
    )
    .await
    .unwrap();
    CertificateService::update(
        db,
        created.uuid,
        certificate_input("SERT-001", "NIB-001"),
        "admin@pkp",
    )
    .await
    .unwrap();
    CertificateService::delete(db, created.uuid, "admin@pkp")
        .await
        .unwrap();

    for entry in ActivityLogService::list(db).await.unwrap() {
        match entry.action {
            LogAction::DeleteCertificate => assert!(entry.payload.is_some()),
            _ => assert!(entry.payload.is_none()),
        }
    }

    // Stored rows really are gone: the payload is the only copy
    assert!(certificate::Entity::find().all(db).await.unwrap().is_empty());
}
