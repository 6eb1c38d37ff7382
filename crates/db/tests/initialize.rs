use std::time::Duration;

use orders_db::{
    initialize, ColumnDef, ConnectionDescriptor, ConnectionError, Database, EntityMapping,
};

fn probe_mapping() -> EntityMapping {
    EntityMapping::new(
        "Probe",
        "orders_db_probe",
        vec![
            ColumnDef::new("id", "BIGINT").primary_key(),
            ColumnDef::new("label", "TEXT").nullable(),
        ],
    )
}

#[tokio::test]
async fn unreachable_server_fails_with_connect_error() {
    let descriptor = ConnectionDescriptor::builder()
        .host("127.0.0.1")
        .port(1)
        .username("myuser")
        .password("mypassword")
        .database("orders_db")
        .mapping(probe_mapping())
        .acquire_timeout(Duration::from_millis(300))
        .build()
        .unwrap();

    let err = initialize(descriptor).await.unwrap_err();

    match err {
        ConnectionError::Connect {
            host,
            port,
            database,
            ..
        } => {
            assert_eq!(host, "127.0.0.1");
            assert_eq!(port, 1);
            assert_eq!(database, "orders_db");
        }
        other => panic!("expected Connect error, got {other:?}"),
    }
}

#[tokio::test]
async fn lazy_handle_does_not_connect() {
    let descriptor = ConnectionDescriptor::builder()
        .host("127.0.0.1")
        .port(1)
        .mapping(probe_mapping())
        .build()
        .unwrap();

    let database = Database::lazy(descriptor.clone());

    assert_eq!(database.descriptor(), &descriptor);
    assert_eq!(database.pool().size(), 0);
}

fn live_descriptor(synchronize: bool) -> ConnectionDescriptor {
    let var = |name: &str, default: &str| {
        std::env::var(name).unwrap_or_else(|_| default.to_string())
    };

    ConnectionDescriptor::builder()
        .host(var("ORDERS_TEST_DB_HOST", "localhost"))
        .port(var("ORDERS_TEST_DB_PORT", "5432").parse().unwrap())
        .username(var("ORDERS_TEST_DB_USER", "myuser"))
        .password(var("ORDERS_TEST_DB_PASSWORD", "mypassword"))
        .database(var("ORDERS_TEST_DB_NAME", "orders_db"))
        .mapping(probe_mapping())
        .synchronize(synchronize)
        .acquire_timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

async fn probe_table_exists(database: &Database) -> bool {
    let (exists,): (bool,) = sqlx::query_as("SELECT to_regclass('orders_db_probe') IS NOT NULL")
        .fetch_one(database.pool())
        .await
        .unwrap();
    exists
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn reachable_server_yields_usable_handle() {
    let database = initialize(live_descriptor(false)).await.unwrap();

    database.ping().await.unwrap();

    database.close().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn synchronize_creates_mapped_tables() {
    let database = initialize(live_descriptor(true)).await.unwrap();

    assert!(probe_table_exists(&database).await);

    sqlx::query("DROP TABLE orders_db_probe")
        .execute(database.pool())
        .await
        .unwrap();
    database.close().await;
}
