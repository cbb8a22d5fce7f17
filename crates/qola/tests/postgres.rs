//! End-to-end tests against a live PostgreSQL.
//!
//! Skipped unless `DATABASE_URL` is set (a `.env` file is honored).

use qola::{
    FetchMode, GatewayConfig, Mode, Outcome, PgGateway, QolaError, Query, Table, Value, execute,
};

fn try_gateway() -> Option<PgGateway> {
    let _ = dotenvy::dotenv();
    let config = GatewayConfig::from_env().ok()?;
    Some(PgGateway::new(config).expect("DATABASE_URL is not a valid connection string"))
}

/// Recreate a scratch table; each test uses its own name.
async fn reset(gateway: &PgGateway, name: &'static str) -> Table {
    execute(gateway, format!("DROP TABLE IF EXISTS {}", name), (), FetchMode::None)
        .await
        .unwrap();
    execute(
        gateway,
        format!(
            "CREATE TABLE {} (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                note TEXT,
                qty INT NOT NULL DEFAULT 0
            )",
            name
        ),
        (),
        FetchMode::None,
    )
    .await
    .unwrap();
    Table::new(name, "id")
}

#[tokio::test]
async fn crud_round_trip() {
    let Some(gateway) = try_gateway() else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let items = reset(&gateway, "qola_it_crud").await;

    let inserted = Query::new(items)
        .set("name", "widget")
        .set("note", "")
        .set("qty", 3)
        .insert(&gateway)
        .await
        .unwrap();
    assert_eq!(inserted, 1);

    let row = Query::new(items)
        .select(["id", "name", "note", "qty"])
        .and_where("name = ?", "widget")
        .fetch_one(&gateway)
        .await
        .unwrap()
        .expect("inserted row");
    assert_eq!(row.get("note"), Some(&Value::Null));
    assert_eq!(row.get("qty"), Some(&Value::Int(3)));
    let id = row.try_get("id").unwrap().as_i64().unwrap();

    let updated = Query::new(items)
        .set("qty", qola::Expr::raw("qty + ?", 2))
        .key(id)
        .update(&gateway)
        .await
        .unwrap();
    assert_eq!(updated, 1);

    let rows = Query::new(items).key(id).fetch(&gateway).await.unwrap();
    assert_eq!(rows[0].get("qty"), Some(&Value::Int(5)));

    let deleted = Query::new(items).key(id).delete(&gateway).await.unwrap();
    assert_eq!(deleted, 1);
    assert!(Query::new(items).fetch(&gateway).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_statement_propagates_and_rolls_back() {
    let Some(gateway) = try_gateway() else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let items = reset(&gateway, "qola_it_rollback").await;

    let err = Query::new(items)
        .set("name", "widget")
        .set("missing_column", 1)
        .insert(&gateway)
        .await
        .unwrap_err();
    assert!(matches!(err, QolaError::Query(_)));

    // The connection stays usable after the rollback.
    let outcome = execute(&gateway, "SELECT 1 AS one", (), FetchMode::One)
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Row(_)));
}

#[tokio::test]
async fn swallowed_failure_is_empty() {
    let Some(gateway) = try_gateway() else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let swallowing = PgGateway::new(gateway.config().clone().swallow_failures()).unwrap();

    let rows = Query::new(Table::new("qola_it_no_such_table", "id"))
        .fetch(&swallowing)
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn unique_violation_is_classified() {
    let Some(gateway) = try_gateway() else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let items = reset(&gateway, "qola_it_unique").await;

    let q = Query::new(items).set("id", 1i64).set("name", "a");
    q.insert(&gateway).await.unwrap();
    let err = q.insert(&gateway).await.unwrap_err();
    assert!(err.is_unique_violation());
    assert_eq!(q.to_sql(Mode::Insert), "INSERT INTO qola_it_unique (id,name) VALUES (?,?)");
}
