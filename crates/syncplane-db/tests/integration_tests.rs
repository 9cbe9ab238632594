//! Integration tests for syncplane-db.
//!
//! These tests require a running PostgreSQL instance.
//! Run with: `cargo test -p syncplane-db --features integration`

#![cfg(feature = "integration")]

mod common;

use chrono::{Duration, Utc};
use common::TestContext;
use serde_json::json;
use syncplane_db::{
    Actor, ActorCatalog, ActorDefinition, ActorType, Connection, ConnectionQuery,
    ConnectionStatus, CreateConnection, CreateSyncOperation, CreateWorkspace, DbError, Job,
    JobConfigType, JobStatus, OperatorType, ResourcesQuery, SyncOperation, UpdateActor,
    UpdateConnection, Workspace,
};
use uuid::Uuid;

async fn create_connection(ctx: &TestContext, source: &Actor, destination: &Actor) -> Connection {
    let input = CreateConnection {
        name: "users-sync".to_string(),
        source_id: source.actor_id,
        destination_id: destination.actor_id,
        status: ConnectionStatus::Active,
        schedule_cron: None,
        catalog: json!({"streams": []}),
        operation_ids: vec![],
    };
    Connection::create(&ctx.pool, &input)
        .await
        .expect("Failed to create connection")
}

#[tokio::test]
async fn test_workspace_lookup_by_slug() {
    let ctx = TestContext::new().await;
    let workspace = ctx.create_workspace("acme").await;

    let found = Workspace::get_by_slug(&ctx.pool, &workspace.slug, false)
        .await
        .unwrap();
    assert_eq!(found.workspace_id, workspace.workspace_id);

    let err = Workspace::get_by_slug(&ctx.pool, "no-such-slug", false)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_workspace_tombstone_hides_it_and_its_actors() {
    let ctx = TestContext::new().await;
    let workspace = ctx.create_workspace("doomed").await;
    let source = ctx
        .create_actor(ActorType::Source, workspace.workspace_id, "pg")
        .await;

    assert!(Workspace::tombstone(&ctx.pool, workspace.workspace_id)
        .await
        .unwrap());

    assert!(Workspace::find_by_id(&ctx.pool, workspace.workspace_id, false)
        .await
        .unwrap()
        .is_none());
    assert!(Workspace::find_by_id(&ctx.pool, workspace.workspace_id, true)
        .await
        .unwrap()
        .is_some());

    let actor = Actor::get(&ctx.pool, ActorType::Source, source.actor_id)
        .await
        .unwrap();
    assert!(actor.tombstone);
}

#[tokio::test]
async fn test_actor_update_and_missing_actor() {
    let ctx = TestContext::new().await;
    let workspace = ctx.create_workspace("updates").await;
    let source = ctx
        .create_actor(ActorType::Source, workspace.workspace_id, "pg")
        .await;

    let update = UpdateActor {
        name: Some("pg-renamed".to_string()),
        configuration: None,
    };
    let updated = Actor::update(&ctx.pool, ActorType::Source, source.actor_id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "pg-renamed");
    assert_eq!(updated.configuration, source.configuration);

    // A source is not visible as a destination.
    let err = Actor::get(&ctx.pool, ActorType::Destination, source.actor_id)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_workspace_paginated_name_filter() {
    let ctx = TestContext::new().await;
    let marker = Uuid::new_v4().simple().to_string();
    let orders = ctx.create_workspace(&format!("orders-{marker}")).await;
    let users = ctx.create_workspace(&format!("users-{marker}")).await;

    let query = ResourcesQuery {
        workspace_ids: vec![orders.workspace_id, users.workspace_id],
        include_deleted: false,
        page_size: Some(10),
        row_offset: 0,
        name_contains: Some(format!("ORDERS-{marker}")),
    };
    let page = Workspace::list_paginated(&ctx.pool, &query).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].workspace_id, orders.workspace_id);
}

#[tokio::test]
async fn test_private_definition_requires_grant() {
    let ctx = TestContext::new().await;
    let workspace = ctx.create_workspace("grants").await;
    let definition_id = ctx.create_definition(ActorType::Source, false).await;

    assert!(
        !Workspace::can_use_definition(&ctx.pool, definition_id, workspace.workspace_id)
            .await
            .unwrap()
    );

    ActorDefinition::grant_to_workspace(&ctx.pool, definition_id, workspace.workspace_id)
        .await
        .unwrap();
    // Granting twice is harmless.
    ActorDefinition::grant_to_workspace(&ctx.pool, definition_id, workspace.workspace_id)
        .await
        .unwrap();

    assert!(
        Workspace::can_use_definition(&ctx.pool, definition_id, workspace.workspace_id)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_upcoming_breaking_changes_skip_past_deadlines() {
    let ctx = TestContext::new().await;
    let definition_id = ctx.create_definition(ActorType::Destination, true).await;
    let today = Utc::now().date_naive();

    for (version, deadline) in [
        ("1.0.0", today - Duration::days(30)),
        ("2.0.0", today + Duration::days(30)),
    ] {
        sqlx::query(
            r"
            INSERT INTO actor_definition_breaking_change
                (definition_id, version, message, upgrade_deadline, migration_documentation_url)
            VALUES ($1, $2, 'schema changed', $3, 'https://docs.example.com/migrate')
            ",
        )
        .bind(definition_id)
        .bind(version)
        .bind(deadline)
        .execute(&ctx.pool)
        .await
        .unwrap();
    }

    let upcoming = ActorDefinition::upcoming_breaking_changes(&ctx.pool, definition_id, today)
        .await
        .unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].version, "2.0.0");
}

#[tokio::test]
async fn test_connection_deprecation_and_workspace_lookup() {
    let ctx = TestContext::new().await;
    let workspace = ctx.create_workspace("wiring").await;
    let source = ctx
        .create_actor(ActorType::Source, workspace.workspace_id, "pg")
        .await;
    let destination = ctx
        .create_actor(ActorType::Destination, workspace.workspace_id, "warehouse")
        .await;
    let connection = create_connection(&ctx, &source, &destination).await;

    assert_eq!(
        Connection::workspace_id_for(&ctx.pool, connection.connection_id)
            .await
            .unwrap(),
        workspace.workspace_id
    );
    assert_eq!(
        Workspace::count_connections(&ctx.pool, workspace.workspace_id)
            .await
            .unwrap(),
        1
    );

    assert!(Connection::deprecate(&ctx.pool, connection.connection_id)
        .await
        .unwrap());
    // Deprecation is terminal.
    assert!(!Connection::deprecate(&ctx.pool, connection.connection_id)
        .await
        .unwrap());

    let live = Connection::list_by_source(&ctx.pool, source.actor_id, false)
        .await
        .unwrap();
    assert!(live.is_empty());
    let all = Connection::list_by_source(&ctx.pool, source.actor_id, true)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_active_sync_ids_filter_by_source() {
    let ctx = TestContext::new().await;
    let workspace = ctx.create_workspace("active").await;
    let source_a = ctx
        .create_actor(ActorType::Source, workspace.workspace_id, "a")
        .await;
    let source_b = ctx
        .create_actor(ActorType::Source, workspace.workspace_id, "b")
        .await;
    let destination = ctx
        .create_actor(ActorType::Destination, workspace.workspace_id, "dw")
        .await;
    let conn_a = create_connection(&ctx, &source_a, &destination).await;
    let conn_b = create_connection(&ctx, &source_b, &destination).await;

    let query = ConnectionQuery {
        workspace_id: workspace.workspace_id,
        source_ids: vec![source_a.actor_id],
        destination_ids: vec![],
        include_deleted: false,
    };
    let ids = Workspace::list_active_sync_ids(&ctx.pool, &query)
        .await
        .unwrap();
    assert_eq!(ids, vec![conn_a.connection_id]);

    let pause = UpdateConnection {
        status: Some(ConnectionStatus::Inactive),
        ..Default::default()
    };
    Connection::update(&ctx.pool, conn_b.connection_id, &pause)
        .await
        .unwrap()
        .unwrap();
    let query = ConnectionQuery {
        source_ids: vec![],
        ..query
    };
    let ids = Workspace::list_active_sync_ids(&ctx.pool, &query)
        .await
        .unwrap();
    assert_eq!(ids, vec![conn_a.connection_id]);
}

#[tokio::test]
async fn test_operation_links_follow_updates_and_tombstone() {
    let ctx = TestContext::new().await;
    let workspace = ctx.create_workspace("ops").await;
    let source = ctx
        .create_actor(ActorType::Source, workspace.workspace_id, "pg")
        .await;
    let destination = ctx
        .create_actor(ActorType::Destination, workspace.workspace_id, "dw")
        .await;
    let connection = create_connection(&ctx, &source, &destination).await;

    let mut operations = Vec::new();
    for name in ["normalize", "notify"] {
        let input = CreateSyncOperation {
            workspace_id: workspace.workspace_id,
            name: name.to_string(),
            operator_type: OperatorType::Webhook,
            operator_config: json!({"url": "https://hooks.example.com"}),
        };
        operations.push(SyncOperation::create(&ctx.pool, &input).await.unwrap());
    }
    let ids: Vec<Uuid> = operations.iter().map(|o| o.operation_id).collect();

    Connection::update_operation_ids(&ctx.pool, connection.connection_id, &ids)
        .await
        .unwrap();
    let mut attached = Connection::operation_ids(&ctx.pool, connection.connection_id)
        .await
        .unwrap();
    attached.sort();
    let mut expected = ids.clone();
    expected.sort();
    assert_eq!(attached, expected);

    assert!(SyncOperation::tombstone(&ctx.pool, ids[0]).await.unwrap());
    let attached = Connection::operation_ids(&ctx.pool, connection.connection_id)
        .await
        .unwrap();
    assert_eq!(attached, vec![ids[1]]);

    let err = SyncOperation::get(&ctx.pool, ids[0]).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_catalog_is_stored_once_per_content() {
    let ctx = TestContext::new().await;
    let workspace = ctx.create_workspace("catalogs").await;
    let source = ctx
        .create_actor(ActorType::Source, workspace.workspace_id, "pg")
        .await;
    let catalog = json!({"streams": [{"name": "users"}]});

    let first = ActorCatalog::write_for_actor(&ctx.pool, source.actor_id, &catalog, "cfg", "1.0.0")
        .await
        .unwrap();
    let second =
        ActorCatalog::write_for_actor(&ctx.pool, source.actor_id, &catalog, "cfg", "1.0.0")
            .await
            .unwrap();
    assert_eq!(first, second);

    let latest = ActorCatalog::most_recent_for_actor(&ctx.pool, source.actor_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, first);
    assert_eq!(latest.catalog, catalog);

    assert!(ActorCatalog::most_recent_for_actor(&ctx.pool, Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_job_cancel_only_changes_live_jobs() {
    let ctx = TestContext::new().await;
    let scope = Uuid::new_v4().to_string();

    let job = Job::create(&ctx.pool, JobConfigType::Sync, &scope)
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(
        Job::find_active_for_scope(&ctx.pool, &scope)
            .await
            .unwrap()
            .map(|j| j.id),
        Some(job.id)
    );

    let cancelled = Job::cancel(&ctx.pool, job.id).await.unwrap().unwrap();
    assert_eq!(cancelled.status, JobStatus::Cancelled);
    assert!(Job::find_active_for_scope(&ctx.pool, &scope)
        .await
        .unwrap()
        .is_none());

    // Cancelling again returns the job unchanged.
    let again = Job::cancel(&ctx.pool, job.id).await.unwrap().unwrap();
    assert_eq!(again.status, JobStatus::Cancelled);

    assert!(Job::cancel(&ctx.pool, i64::MAX).await.unwrap().is_none());
    assert!(Job::get(&ctx.pool, i64::MAX).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_workspace_name_filter_matches_wildcards_literally() {
    let ctx = TestContext::new().await;
    let marker = Uuid::new_v4().simple().to_string();
    let underscored = ctx.create_workspace(&format!("a_b-{marker}")).await;
    let plain = ctx.create_workspace(&format!("axb-{marker}")).await;
    let percent = ctx.create_workspace(&format!("100%-{marker}")).await;

    let mut query = ResourcesQuery {
        workspace_ids: vec![
            underscored.workspace_id,
            plain.workspace_id,
            percent.workspace_id,
        ],
        include_deleted: false,
        page_size: Some(10),
        row_offset: 0,
        name_contains: Some("a_b".to_string()),
    };
    let page = Workspace::list_paginated(&ctx.pool, &query).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].workspace_id, underscored.workspace_id);

    query.name_contains = Some("%".to_string());
    let page = Workspace::list_paginated(&ctx.pool, &query).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].workspace_id, percent.workspace_id);
}

#[tokio::test]
async fn test_duplicate_slug_is_a_conflict() {
    let ctx = TestContext::new().await;
    let workspace = ctx.create_workspace("taken").await;

    let input = CreateWorkspace {
        name: "Taken again".to_string(),
        slug: workspace.slug.clone(),
        email: None,
    };
    let err = Workspace::create(&ctx.pool, &input).await.unwrap_err();
    assert!(DbError::from(err).is_conflict());
}

#[tokio::test]
async fn test_count_active_syncs_skips_paused_and_deprecated() {
    let ctx = TestContext::new().await;
    let workspace = ctx.create_workspace("counting").await;
    let source = ctx
        .create_actor(ActorType::Source, workspace.workspace_id, "pg")
        .await;
    let destination = ctx
        .create_actor(ActorType::Destination, workspace.workspace_id, "dw")
        .await;
    let active = create_connection(&ctx, &source, &destination).await;
    let paused = create_connection(&ctx, &source, &destination).await;
    let deprecated = create_connection(&ctx, &source, &destination).await;

    let pause = UpdateConnection {
        status: Some(ConnectionStatus::Inactive),
        ..Default::default()
    };
    Connection::update(&ctx.pool, paused.connection_id, &pause)
        .await
        .unwrap()
        .unwrap();
    Connection::deprecate(&ctx.pool, deprecated.connection_id)
        .await
        .unwrap();

    assert_eq!(
        Workspace::count_active_syncs(&ctx.pool, workspace.workspace_id)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        Workspace::count_connections(&ctx.pool, workspace.workspace_id)
            .await
            .unwrap(),
        2
    );
    assert_ne!(active.connection_id, paused.connection_id);
}

#[tokio::test]
async fn test_actor_tombstone_deprecates_its_connections() {
    let ctx = TestContext::new().await;
    let workspace = ctx.create_workspace("actor-delete").await;
    let source = ctx
        .create_actor(ActorType::Source, workspace.workspace_id, "pg")
        .await;
    let destination = ctx
        .create_actor(ActorType::Destination, workspace.workspace_id, "dw")
        .await;
    let connection = create_connection(&ctx, &source, &destination).await;

    let deprecated = Actor::tombstone(&ctx.pool, ActorType::Destination, destination.actor_id)
        .await
        .unwrap();
    assert_eq!(deprecated, Some(1));

    let connection = Connection::get(&ctx.pool, connection.connection_id)
        .await
        .unwrap();
    assert_eq!(connection.status, ConnectionStatus::Deprecated);
    assert!(
        Actor::get(&ctx.pool, ActorType::Destination, destination.actor_id)
            .await
            .unwrap()
            .tombstone
    );

    // A second delete finds nothing live and writes nothing.
    assert_eq!(
        Actor::tombstone(&ctx.pool, ActorType::Destination, destination.actor_id)
            .await
            .unwrap(),
        None
    );
    // The wrong actor type does not match.
    assert_eq!(
        Actor::tombstone(&ctx.pool, ActorType::Destination, source.actor_id)
            .await
            .unwrap(),
        None
    );
    assert!(
        !Actor::get(&ctx.pool, ActorType::Source, source.actor_id)
            .await
            .unwrap()
            .tombstone
    );
}

#[tokio::test]
async fn test_workspace_tombstone_deprecates_connections() {
    let ctx = TestContext::new().await;
    let workspace = ctx.create_workspace("cascade").await;
    let source = ctx
        .create_actor(ActorType::Source, workspace.workspace_id, "pg")
        .await;
    let destination = ctx
        .create_actor(ActorType::Destination, workspace.workspace_id, "dw")
        .await;
    let connection = create_connection(&ctx, &source, &destination).await;

    assert!(Workspace::tombstone(&ctx.pool, workspace.workspace_id)
        .await
        .unwrap());

    let connection = Connection::get(&ctx.pool, connection.connection_id)
        .await
        .unwrap();
    assert_eq!(connection.status, ConnectionStatus::Deprecated);
    assert_eq!(
        Workspace::count_active_syncs(&ctx.pool, workspace.workspace_id)
            .await
            .unwrap(),
        0
    );

    // Already deleted.
    assert!(!Workspace::tombstone(&ctx.pool, workspace.workspace_id)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_connection_update_replaces_operations() {
    let ctx = TestContext::new().await;
    let workspace = ctx.create_workspace("relink").await;
    let source = ctx
        .create_actor(ActorType::Source, workspace.workspace_id, "pg")
        .await;
    let destination = ctx
        .create_actor(ActorType::Destination, workspace.workspace_id, "dw")
        .await;
    let connection = create_connection(&ctx, &source, &destination).await;

    let input = CreateSyncOperation {
        workspace_id: workspace.workspace_id,
        name: "normalize".to_string(),
        operator_type: OperatorType::Normalization,
        operator_config: json!({}),
    };
    let operation = SyncOperation::create(&ctx.pool, &input).await.unwrap();

    let update = UpdateConnection {
        name: Some("users-sync-v2".to_string()),
        operation_ids: Some(vec![operation.operation_id]),
        ..Default::default()
    };
    let updated = Connection::update(&ctx.pool, connection.connection_id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "users-sync-v2");
    assert_eq!(
        Connection::operation_ids(&ctx.pool, connection.connection_id)
            .await
            .unwrap(),
        vec![operation.operation_id]
    );

    // Leaving the list unset keeps the links.
    let rename = UpdateConnection {
        name: Some("users-sync-v3".to_string()),
        ..Default::default()
    };
    Connection::update(&ctx.pool, connection.connection_id, &rename)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        Connection::operation_ids(&ctx.pool, connection.connection_id)
            .await
            .unwrap(),
        vec![operation.operation_id]
    );

    let clear = UpdateConnection {
        operation_ids: Some(vec![]),
        ..Default::default()
    };
    Connection::update(&ctx.pool, connection.connection_id, &clear)
        .await
        .unwrap()
        .unwrap();
    assert!(Connection::operation_ids(&ctx.pool, connection.connection_id)
        .await
        .unwrap()
        .is_empty());

    // A missing connection leaves no links behind.
    let missing = Uuid::new_v4();
    let relink = UpdateConnection {
        operation_ids: Some(vec![operation.operation_id]),
        ..Default::default()
    };
    assert!(Connection::update(&ctx.pool, missing, &relink)
        .await
        .unwrap()
        .is_none());
    assert!(Connection::operation_ids(&ctx.pool, missing)
        .await
        .unwrap()
        .is_empty());
}
