use super::*;
use crate::row::RowExt;
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};
use std::str::FromStr;

async fn try_connect() -> Option<tokio_postgres::Client> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

fn object(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => unreachable!("test input is an object"),
    }
}

#[test]
fn update_fragment_composes_with_trailing_id() {
    let set = partial_update(&object(json!({"title": "New", "salary": 10})), &ColumnMap::new())
        .unwrap();
    let id_idx = set.next_placeholder();
    let q = Query::from_fragment(set, |set| {
        format!("UPDATE jobs SET {set} WHERE id = ${id_idx} RETURNING id")
    })
    .bind(7_i32);

    assert_eq!(
        q.sql(),
        r#"UPDATE jobs SET "title"=$1, "salary"=$2 WHERE id = $3 RETURNING id"#
    );
    assert_eq!(q.param_count(), 3);
}

#[test]
fn query_helper_keeps_sql_verbatim() {
    let q = query("SELECT 1 WHERE $1 = $1").bind(1_i32);
    assert_eq!(q.sql(), "SELECT 1 WHERE $1 = $1");
    assert_eq!(q.params_ref().len(), 1);
}

#[test]
fn bind_all_appends_in_order() {
    let q = query("SELECT $1, $2").bind_all([BindValue::Int(1), BindValue::from("a")]);
    assert_eq!(q.param_count(), 2);
}

#[tokio::test]
async fn bind_values_convert_to_column_types() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let row = query("SELECT $1::int4 AS i, $2::numeric AS n, $3::text AS t, $4::int4 AS missing")
        .bind_all([
            BindValue::Int(41),
            BindValue::from("0.25"),
            BindValue::from("x"),
            BindValue::Null,
        ])
        .fetch_opt(&client)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(row.try_get_column::<i32>("i").unwrap(), 41);
    assert_eq!(
        row.try_get_column::<Decimal>("n").unwrap(),
        Decimal::from_str("0.25").unwrap()
    );
    assert_eq!(row.try_get_column::<String>("t").unwrap(), "x");
    assert_eq!(row.try_get_column::<Option<i32>>("missing").unwrap(), None);
}

#[tokio::test]
async fn partial_update_round_trips_through_postgres() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    query("CREATE TEMP TABLE pu_jobs (id int PRIMARY KEY, title text, salary int, equity numeric)")
        .execute(&client)
        .await
        .unwrap();
    query("INSERT INTO pu_jobs VALUES (1, 'old', 1, 0)")
        .execute(&client)
        .await
        .unwrap();

    let set = partial_update(
        &object(json!({"salary": 500, "equity": "0.5", "title": "new"})),
        &ColumnMap::new(),
    )
    .unwrap();
    let id_idx = set.next_placeholder();
    let affected = Query::from_fragment(set, |set| {
        format!("UPDATE pu_jobs SET {set} WHERE id = ${id_idx}")
    })
    .bind(1_i32)
    .execute(&client)
    .await
    .unwrap();
    assert_eq!(affected, 1);

    let row = query("SELECT title, salary, equity FROM pu_jobs WHERE id = 1")
        .fetch_opt(&client)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.try_get_column::<String>("title").unwrap(), "new");
    assert_eq!(row.try_get_column::<i32>("salary").unwrap(), 500);
    assert_eq!(
        row.try_get_column::<Decimal>("equity").unwrap(),
        Decimal::from_str("0.5").unwrap()
    );
}

#[tokio::test]
async fn fetch_one_as_zero_rows_is_not_found() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    struct One(i32);
    impl crate::row::FromRow for One {
        fn from_row(row: &tokio_postgres::Row) -> crate::error::JoblyResult<Self> {
            Ok(One(row.try_get_column("n")?))
        }
    }

    let err = query("SELECT 1 AS n WHERE FALSE")
        .fetch_one_as::<One>(&client)
        .await
        .err()
        .unwrap();
    assert!(err.is_not_found());
}
