//! User lifecycle: login, deletion snapshots, credential rotation on restore

mod helpers;

use helpers::{logs_with_action, new_user, open_core};
use pkp_core::auth;
use pkp_core::infrastructure::database::entities::activity_log::LogAction;
use pkp_core::operations::restore::RestoreService;
use pkp_core::operations::users::{UserChanges, UserService};
use pkp_core::CoreError;

#[tokio::test]
async fn login_accepts_valid_and_rejects_invalid_credentials() {
    let test = open_core().await;
    let db = test.db();

    UserService::create(db, new_user("Budi", "budi@pkp.go.id", "hunter2hunter2"), "admin@pkp")
        .await
        .unwrap();

    let authed = auth::login(db, "budi@pkp.go.id", "hunter2hunter2")
        .await
        .unwrap()
        .expect("valid credentials should authenticate");
    assert_eq!(authed.name, "Budi");

    assert!(auth::login(db, "budi@pkp.go.id", "wrong")
        .await
        .unwrap()
        .is_none());
    assert!(auth::login(db, "nobody@pkp.go.id", "hunter2hunter2")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn duplicate_email_yields_named_conflict() {
    let test = open_core().await;
    let db = test.db();

    UserService::create(db, new_user("Budi", "budi@pkp.go.id", "pw-one-111"), "admin@pkp")
        .await
        .unwrap();
    let err = UserService::create(db, new_user("Badu", "budi@pkp.go.id", "pw-two-222"), "admin@pkp")
        .await
        .unwrap_err();
    match err {
        CoreError::Conflict { field, value, .. } => {
            assert_eq!(field, "email");
            assert_eq!(value, "budi@pkp.go.id");
        }
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn deletion_snapshot_keeps_hash_but_restore_discards_it() {
    let test = open_core().await;
    let db = test.db();

    let original = UserService::create(
        db,
        new_user("Budi", "budi@pkp.go.id", "hunter2hunter2"),
        "admin@pkp",
    )
    .await
    .unwrap();

    UserService::delete(db, original.uuid, "admin@pkp").await.unwrap();

    // The snapshot is a technically complete record, hash included
    let deletions = logs_with_action(db, LogAction::DeleteUser).await;
    assert_eq!(deletions.len(), 1);
    let payload = deletions[0].payload.as_ref().expect("deletion payload");
    assert_eq!(payload["email"], "budi@pkp.go.id");
    assert_eq!(payload["password_hash"], original.password_hash);

    let outcome = RestoreService::restore(db, deletions[0].uuid, "admin@pkp").await;
    assert!(outcome.success, "restore failed: {}", outcome.message);
    assert!(
        outcome.message.contains("temporary password"),
        "message must state a new temporary password was issued: {}",
        outcome.message
    );

    // Identity is new, profile fields survive
    let restored = &UserService::list(db).await.unwrap()[0];
    assert_ne!(restored.uuid, original.uuid);
    assert_eq!(restored.name, "Budi");
    assert_eq!(restored.email, "budi@pkp.go.id");
    assert_eq!(restored.role, original.role);

    // The old credential is dead: the snapshot hash was never reused
    assert_ne!(restored.password_hash, original.password_hash);
    assert!(auth::login(db, "budi@pkp.go.id", "hunter2hunter2")
        .await
        .unwrap()
        .is_none());

    assert_eq!(logs_with_action(db, LogAction::RestoreData).await.len(), 1);
}

#[tokio::test]
async fn restore_fails_when_email_is_taken_again() {
    let test = open_core().await;
    let db = test.db();

    let original = UserService::create(
        db,
        new_user("Budi", "budi@pkp.go.id", "hunter2hunter2"),
        "admin@pkp",
    )
    .await
    .unwrap();
    UserService::delete(db, original.uuid, "admin@pkp").await.unwrap();

    // Someone re-registers the email before the restore happens
    UserService::create(db, new_user("Badu", "budi@pkp.go.id", "pw-two-222"), "admin@pkp")
        .await
        .unwrap();

    let deletion = &logs_with_action(db, LogAction::DeleteUser).await[0];
    let outcome = RestoreService::restore(db, deletion.uuid, "admin@pkp").await;
    assert!(!outcome.success);
    assert!(
        outcome.message.contains("email"),
        "conflict message must name the field: {}",
        outcome.message
    );

    // The failed attempt left no trace
    assert!(logs_with_action(db, LogAction::RestoreData).await.is_empty());
    assert_eq!(UserService::list(db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_without_password_keeps_the_stored_hash() {
    let test = open_core().await;
    let db = test.db();

    let created = UserService::create(
        db,
        new_user("Budi", "budi@pkp.go.id", "hunter2hunter2"),
        "admin@pkp",
    )
    .await
    .unwrap();

    let updated = UserService::update(
        db,
        created.uuid,
        UserChanges {
            name: "Budi Santoso".to_string(),
            email: "budi@pkp.go.id".to_string(),
            role: created.role,
            password: None,
        },
        "admin@pkp",
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Budi Santoso");
    assert_eq!(updated.password_hash, created.password_hash);
    assert!(auth::login(db, "budi@pkp.go.id", "hunter2hunter2")
        .await
        .unwrap()
        .is_some());
}
