use assert_cmd::Command;

fn service() -> Command {
    let mut cmd = Command::cargo_bin("orders-service").unwrap();
    cmd.env("ORDERS_CONFIG_DIR", "/nonexistent/orders-config")
        .env("ORDERS_ENV", "local")
        .env("RUST_LOG", "info")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn unreachable_database_exits_with_status_one() {
    let output = service()
        .env("ORDERS_DATABASE__HOST", "127.0.0.1")
        .env("ORDERS_DATABASE__PORT", "1")
        .env("ORDERS_DATABASE__ACQUIRE_TIMEOUT_MS", "300")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("orders service failed to start"), "{stderr}");
    assert!(stderr.contains("error during database initialization"), "{stderr}");
    assert!(!stderr.contains("connected to PostgreSQL"), "{stderr}");
}

#[test]
fn invalid_rust_log_still_logs_startup_failure() {
    let output = service()
        .env("RUST_LOG", "orders=notalevel")
        .env("ORDERS_DATABASE__HOST", "127.0.0.1")
        .env("ORDERS_DATABASE__PORT", "1")
        .env("ORDERS_DATABASE__ACQUIRE_TIMEOUT_MS", "300")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ignoring invalid RUST_LOG directives"), "{stderr}");
    assert!(stderr.contains("orders service failed to start"), "{stderr}");
}

#[test]
fn synchronize_in_production_exits_before_connecting() {
    let output = service()
        .env("ORDERS_ENV", "production")
        .env("ORDERS_DATABASE__SYNCHRONIZE", "true")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("synchronize"), "{stderr}");
    assert!(!stderr.contains("bootstrap starting"), "{stderr}");
}
