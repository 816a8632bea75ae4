use chrono::Duration;
use mvc_template::{
    application::{
        dto::{PageRequest, RoleView},
        ports::time::Clock,
    },
    domain::{
        errors::DomainError,
        model::ColumnValue,
        role::{Permission, PermissionKey, Role, RolePermission},
    },
    infrastructure::persistence::{
        Filter, SqlAuditLogger, UnitOfWork, read_models::audit_log_page,
    },
};
use serde_json::{Value, json};
use std::sync::Arc;

mod support;
use support::{LoggerEvent, RecordingAuditLogger, TestClock, fixed_now, memory_context};

#[tokio::test]
async fn insert_assigns_ids_and_clears_pending_changes() {
    let context = memory_context().await;
    let mut uow = UnitOfWork::new(context);

    let roles = [Role::new("Readers", fixed_now()), Role::new("Writers", fixed_now())];
    uow.insert_range(&roles);
    assert!(uow.has_changes());

    let report = uow.commit().await.unwrap();
    assert_eq!(report.inserted_ids.len(), 2);
    assert!(!uow.has_changes());

    let stored: Role = uow.get(report.inserted_ids[1]).await.unwrap().unwrap();
    assert_eq!(stored.title, "Writers");
    assert_eq!(uow.select::<Role>().await.unwrap().len(), 2);
}

#[tokio::test]
async fn update_never_rewrites_creation_date() {
    let context = memory_context().await;
    let mut uow = UnitOfWork::new(context);
    uow.insert(&Role::new("Readers", fixed_now()));
    let id = uow.commit().await.unwrap().first_inserted_id().unwrap();

    let mut role: Role = uow.get(id).await.unwrap().unwrap();
    role.title = "Editors".into();
    role.creation_date = fixed_now() + Duration::days(3);
    uow.update(&role);
    let report = uow.commit().await.unwrap();
    assert_eq!(report.updated, 1);

    let stored: Role = uow.get(id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Editors");
    assert_eq!(stored.creation_date, fixed_now());
}

#[tokio::test]
async fn delete_removes_rows() {
    let context = memory_context().await;
    let mut uow = UnitOfWork::new(context);
    uow.insert(&Role::new("Readers", fixed_now()));
    let id = uow.commit().await.unwrap().first_inserted_id().unwrap();

    uow.delete_by_id::<Role>(id);
    assert_eq!(uow.commit().await.unwrap().deleted, 1);
    assert!(uow.get::<Role>(id).await.unwrap().is_none());
}

#[tokio::test]
async fn update_after_delete_keeps_the_row() {
    let context = memory_context().await;
    let mut uow = UnitOfWork::new(context);
    uow.insert(&Role::new("Readers", fixed_now()));
    let id = uow.commit().await.unwrap().first_inserted_id().unwrap();

    let mut role: Role = uow.get(id).await.unwrap().unwrap();
    uow.delete(&role);
    role.title = "Renamed".into();
    uow.update(&role);

    let report = uow.commit().await.unwrap();
    assert_eq!((report.updated, report.deleted), (1, 0));
    let stored: Role = uow.get(id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Renamed");
}

#[tokio::test]
async fn referencing_inserts_receive_the_parent_id_in_one_commit() {
    let context = memory_context().await;
    let clock: Arc<dyn Clock> = Arc::new(TestClock::default());
    let logger = SqlAuditLogger::new(None, clock);
    let mut uow = UnitOfWork::with_logger(context.clone(), Box::new(logger));

    let key = PermissionKey::new(None, "Profile", "Edit");
    uow.insert(&Permission::new(&key, fixed_now()));
    let permission_id = uow.commit().await.unwrap().first_inserted_id().unwrap();

    let role = uow.insert(&Role::new("Readers", fixed_now()));
    uow.insert_referencing(
        &RolePermission::new(0, permission_id, fixed_now()),
        "role_id",
        role,
    );
    let report = uow.commit().await.unwrap();
    let role_id = report.inserted_ids[0];

    let grants = uow
        .select_where::<RolePermission>(Filter::Eq("role_id", role_id.into()))
        .await
        .unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].permission_id, permission_id);

    let (logs, _) = audit_log_page(&context, PageRequest::default())
        .await
        .unwrap();
    let granted = logs
        .iter()
        .find(|log| log.entity_name == "RolePermission")
        .unwrap();
    let changes: Value = serde_json::from_str(&granted.changes).unwrap();
    let role_change = changes
        .as_array()
        .unwrap()
        .iter()
        .find(|change| change["property"] == "role_id")
        .unwrap();
    assert_eq!(role_change["after"], json!(role_id));
}

#[tokio::test]
async fn projections_convert_models_to_views() {
    let context = memory_context().await;
    let mut uow = UnitOfWork::new(context);
    uow.insert(&Role::new("Readers", fixed_now()));
    let id = uow.commit().await.unwrap().first_inserted_id().unwrap();

    let view: RoleView = uow.get_as::<Role, RoleView>(id).await.unwrap().unwrap();
    assert_eq!(view.title, "Readers");

    let role: Role = uow.get(id).await.unwrap().unwrap();
    let converted: RoleView = uow.to(role);
    assert_eq!(converted, view);
}

#[tokio::test]
async fn select_where_matches_case_insensitively_and_checks_columns() {
    let context = memory_context().await;
    let mut uow = UnitOfWork::new(context);
    uow.insert(&Role::new("Readers", fixed_now()));
    uow.commit().await.unwrap();

    let found = uow
        .select_where::<Role>(Filter::EqIgnoreCase("title", "READERS".into()))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let exact = uow
        .select_where::<Role>(Filter::Eq("title", ColumnValue::from("READERS")))
        .await
        .unwrap();
    assert!(exact.is_empty());

    let err = uow
        .select_where::<Role>(Filter::Eq("passhash", ColumnValue::Null))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn commit_logs_before_writing_and_saves_after() {
    let context = memory_context().await;
    let logger = RecordingAuditLogger::default();
    let mut uow = UnitOfWork::with_logger(context, Box::new(logger.clone()));

    uow.insert(&Role::new("Readers", fixed_now()));
    let id = uow.commit().await.unwrap().first_inserted_id().unwrap();

    assert_eq!(
        logger.events(),
        vec![
            LoggerEvent::Log(vec!["Role".into()]),
            LoggerEvent::Save(vec![id]),
        ]
    );
}

#[tokio::test]
async fn empty_commit_still_logs_and_saves() {
    let context = memory_context().await;
    let logger = RecordingAuditLogger::default();
    let mut uow = UnitOfWork::with_logger(context, Box::new(logger.clone()));

    let report = uow.commit().await.unwrap();

    assert_eq!(report.inserted_ids.len() + report.updated + report.deleted, 0);
    assert_eq!(
        logger.events(),
        vec![LoggerEvent::Log(Vec::new()), LoggerEvent::Save(Vec::new())]
    );
}

#[tokio::test]
async fn failed_commit_discards_the_log_and_writes_nothing() {
    let context = memory_context().await;
    let logger = RecordingAuditLogger::default();
    let mut uow = UnitOfWork::with_logger(context, Box::new(logger.clone()));

    uow.insert(&Role::new("Readers", fixed_now()));
    uow.insert(&Role::new("x".repeat(129), fixed_now()));

    assert!(uow.commit().await.is_err());
    assert_eq!(logger.saves(), 0);
    assert_eq!(logger.events().last(), Some(&LoggerEvent::Discard));
    assert!(!uow.has_changes());
    assert!(uow.select::<Role>().await.unwrap().is_empty());
}

#[tokio::test]
async fn updating_a_missing_row_rolls_back_the_whole_commit() {
    let context = memory_context().await;
    let mut uow = UnitOfWork::new(context);

    uow.insert(&Role::new("Readers", fixed_now()));
    let mut ghost = Role::new("Ghost", fixed_now());
    ghost.id = 404;
    uow.update(&ghost);

    let err = uow.commit().await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
    assert!(uow.select::<Role>().await.unwrap().is_empty());
}

#[tokio::test]
async fn sql_audit_logger_records_actor_action_and_diff() {
    let context = memory_context().await;
    let clock: Arc<dyn Clock> = Arc::new(TestClock::default());
    let logger = SqlAuditLogger::new(Some(7), Arc::clone(&clock));
    let mut uow = UnitOfWork::with_logger(context.clone(), Box::new(logger));

    uow.insert(&Role::new("Readers", fixed_now()));
    let id = uow.commit().await.unwrap().first_inserted_id().unwrap();

    let mut role: Role = uow.get(id).await.unwrap().unwrap();
    role.title = "Editors".into();
    uow.update(&role);
    uow.commit().await.unwrap();

    // An update that changes nothing is not audited.
    uow.update(&role);
    uow.commit().await.unwrap();

    let (logs, total) = audit_log_page(&context, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 2);

    let edited = &logs[0];
    assert_eq!(edited.action, "Edited");
    assert_eq!(edited.entity_name, "Role");
    assert_eq!(edited.entity_id, id);
    assert_eq!(edited.account_id, Some(7));
    assert_eq!(edited.creation_date, fixed_now());
    let changes: Value = serde_json::from_str(&edited.changes).unwrap();
    assert_eq!(
        changes,
        json!([{ "property": "title", "before": "Readers", "after": "Editors" }])
    );

    let created = &logs[1];
    assert_eq!(created.action, "Created");
    assert_eq!(created.entity_id, id);
}
