//! The identifier and result hooks as seen through `CaseQuery` and the
//! provided `DatabaseClient` methods.

mod common;

use common::{RecordingClient, TestError};
use serde_json::json;
use tablekit_core::{CaseQuery, CoreError, DatabaseClient, Dialect, Grammar, TableBuilder};

fn case_client(dialect: Dialect) -> RecordingClient {
    RecordingClient::with_grammar(Grammar::new(dialect).with_case_transforms(true))
}

#[test]
fn insert_wraps_identifiers_and_binds_values() {
    let client = case_client(Dialect::Sqlite);
    let query = CaseQuery::new(&client);

    query
        .insert("userAccounts", &json!({ "displayName": "Ada", "isAdmin": true }))
        .unwrap();

    let statements = client.statements.borrow();
    let (sql, params) = &statements[0];
    assert_eq!(
        sql,
        "INSERT INTO \"user_accounts\" (\"display_name\", \"is_admin\") VALUES (?, ?)"
    );
    assert_eq!(params, &vec![json!("Ada"), json!(true)]);
}

#[test]
fn insert_uses_numbered_placeholders_on_postgres() {
    let client = case_client(Dialect::Postgres);
    CaseQuery::new(&client)
        .insert("t", &json!({ "a": 1, "bC": 2 }))
        .unwrap();
    assert_eq!(
        client.sql()[0],
        "INSERT INTO \"t\" (\"a\", \"b_c\") VALUES ($1, $2)"
    );
}

#[test]
fn insert_ignore_per_dialect() {
    let client = case_client(Dialect::MySql);
    CaseQuery::new(&client)
        .insert_ignore("roleNames", &json!({ "roleId": 1 }))
        .unwrap();
    assert_eq!(
        client.sql()[0],
        "INSERT INTO `role_names` (`role_id`) VALUES (?) ON DUPLICATE KEY UPDATE `role_id` = `role_id`"
    );
}

#[test]
fn insert_rejects_non_object_rows() {
    let client = case_client(Dialect::Sqlite);
    let query = CaseQuery::new(&client);

    for row in [json!([1, 2]), json!("x"), json!({})] {
        let err = query.insert("t", &row).unwrap_err();
        assert!(matches!(err, TestError::Core(CoreError::InvalidRow(ref t)) if t == "t"));
    }
    assert!(client.sql().is_empty());
}

#[test]
fn select_camelizes_rows() {
    let client = case_client(Dialect::Sqlite);
    *client.rows.borrow_mut() = vec![
        json!({ "user_id": 1, "profile_data": { "avatar_url": "a.png" } }),
        json!({ "user_id": 2, "profile_data": null }),
    ];

    let rows = CaseQuery::new(&client).select_all("userAccounts").unwrap();

    assert_eq!(client.sql()[0], "SELECT * FROM \"user_accounts\"");
    assert_eq!(
        rows,
        vec![
            json!({ "userId": 1, "profileData": { "avatarUrl": "a.png" } }),
            json!({ "userId": 2, "profileData": null }),
        ]
    );
}

#[test]
fn select_leaves_rows_alone_without_case_transforms() {
    let client = RecordingClient::new();
    *client.rows.borrow_mut() = vec![json!({ "user_id": 1 })];
    let rows = CaseQuery::new(&client).select("SELECT 1", &[]).unwrap();
    assert_eq!(rows, vec![json!({ "user_id": 1 })]);
}

#[test]
fn count_reads_row_count_column() {
    let client = case_client(Dialect::Sqlite);
    *client.rows.borrow_mut() = vec![json!({ "row_count": 12 })];
    assert_eq!(CaseQuery::new(&client).count("someTable").unwrap(), 12);
    assert_eq!(
        client.sql()[0],
        "SELECT COUNT(*) AS row_count FROM \"some_table\""
    );
}

#[test]
fn create_table_runs_follow_up_statements() {
    let client = case_client(Dialect::Sqlite);
    let mut b = TableBuilder::new("auditLog");
    b.increments("id");
    b.after_create("CREATE INDEX idx_audit ON audit_log(id)");

    client.create_table(&b).unwrap();

    let sql = client.sql();
    assert_eq!(sql.len(), 2);
    assert!(sql[0].starts_with("CREATE TABLE IF NOT EXISTS \"audit_log\""));
    assert_eq!(sql[1], "CREATE INDEX idx_audit ON audit_log(id)");
}

#[test]
fn create_table_surfaces_render_errors() {
    let client = case_client(Dialect::Sqlite);
    let err = client.create_table(&TableBuilder::new("empty")).unwrap_err();
    assert!(matches!(err, TestError::Core(CoreError::InvalidTable { .. })));
}

#[test]
fn dialect_specific_statements() {
    let sqlite = case_client(Dialect::Sqlite);
    sqlite.create_extension_uuid_ossp().unwrap();
    assert!(sqlite.sql().is_empty());
    sqlite.set_foreign_key_checks(false).unwrap();
    sqlite.truncate("someTable").unwrap();
    assert_eq!(
        sqlite.sql(),
        ["PRAGMA foreign_keys = OFF", "DELETE FROM \"some_table\""]
    );

    let pg = case_client(Dialect::Postgres);
    pg.create_extension_uuid_ossp().unwrap();
    assert_eq!(pg.sql(), ["CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\""]);
    assert!(matches!(
        pg.set_foreign_key_checks(true),
        Err(TestError::Core(CoreError::UnsupportedDialect { .. }))
    ));
}
