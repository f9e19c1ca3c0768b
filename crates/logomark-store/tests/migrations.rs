use logomark_store::migrate::latest_version;
use logomark_store::Store;
use tempfile::TempDir;

#[test]
fn migrations_apply_once() {
    let store = Store::open_in_memory().expect("open in memory");
    assert_eq!(store.schema_version().expect("version before"), 0);
    store.migrate().expect("migrate");
    store.migrate().expect("migrate again");

    let version: i64 = store
        .connection()
        .query_row("SELECT version FROM logomark_schema LIMIT 1;", [], |row| {
            row.get(0)
        })
        .expect("schema version");
    assert_eq!(version, latest_version());
    assert_eq!(store.schema_version().expect("version"), latest_version());
}

#[test]
fn newer_database_is_rejected() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
        .connection()
        .execute("UPDATE logomark_schema SET version = 99;", [])
        .expect("bump version");

    let err = store.migrate().expect_err("should refuse");
    assert!(err.to_string().contains("newer than available migrations"));
}

#[cfg(unix)]
#[test]
fn database_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("logomark.sqlite3");
    let store = Store::open(&db_path).expect("open store");
    store.migrate().expect("migrate");
    drop(store);

    let store = Store::open(&db_path).expect("reopen store");
    store.migrate().expect("migrate");
    let mode = std::fs::metadata(&db_path)
        .expect("metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o077, 0);
}
