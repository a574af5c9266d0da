use sqlx::PgPool;

/// All `id` columns must be bigint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_pks_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert_eq!(data_type, "bigint", "Table {table}.id should be bigint");
    }
}

/// Every table (except _sqlx_migrations) must have created_at and updated_at as timestamptz.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_tables_have_timestamps(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table,) in &tables {
        for col in ["created_at", "updated_at"] {
            let result: Option<(String,)> = sqlx::query_as(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public'
                   AND table_name = $1
                   AND column_name = $2",
            )
            .bind(table)
            .bind(col)
            .fetch_optional(&pool)
            .await
            .unwrap();

            let (data_type,) =
                result.unwrap_or_else(|| panic!("Table {table} is missing column {col}"));
            assert_eq!(
                data_type, "timestamp with time zone",
                "Table {table}.{col} should be timestamptz, got {data_type}"
            );
        }
    }
}

/// No character varying columns; TEXT plus CHECK constraints instead.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, column_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(rows.is_empty(), "Found VARCHAR columns: {rows:?}");
}

/// Every table with updated_at has a trigger maintaining it.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_triggers_exist(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND column_name = 'updated_at'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table,) in &tables {
        let trigger = format!("trg_{table}_updated_at");
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM information_schema.triggers
                WHERE event_object_table = $1 AND trigger_name = $2
             )",
        )
        .bind(table)
        .bind(&trigger)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(exists, "Table {table} is missing trigger {trigger}");
    }
}

/// The database refuses statuses and districts outside the known sets.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_check_constraints_reject_unknown_codes(pool: PgPool) {
    let err = sqlx::query(
        "INSERT INTO users (username, full_name, email, password_hash, district, role_id)
         VALUES ('someone', 'Кто-то', 'a@b.c', 'x', 'Central', 2)",
    )
    .execute(&pool)
    .await
    .unwrap_err();
    assert!(err.to_string().contains("ck_users_district"), "{err}");

    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, full_name, email, password_hash, district, role_id)
         VALUES ('someone', 'Кто-то', 'a@b.c', 'x', 'Kirovsky', 2)
         RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let category_id: i64 =
        sqlx::query_scalar("INSERT INTO categories (name) VALUES ('Roads') RETURNING id")
            .fetch_one(&pool)
            .await
            .unwrap();

    let err = sqlx::query(
        "INSERT INTO requests (title, description, category_id, status, user_id)
         VALUES ('t', 'd', $1, 'archived', $2)",
    )
    .bind(category_id)
    .bind(user_id)
    .execute(&pool)
    .await
    .unwrap_err();
    assert!(err.to_string().contains("ck_requests_status"), "{err}");
}
