use sqlx::SqlitePool;

/// Full bootstrap test: migrate, verify every table exists.
#[sqlx::test(migrator = "pawres_db::MIGRATOR")]
async fn test_full_bootstrap(pool: SqlitePool) {
    let tables = [
        "users",
        "animals",
        "rescue_reports",
        "adoption_requests",
        "audit_log",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should exist and start empty");
    }
}

/// Foreign key enforcement must be on for every connection; the delete
/// rules in the schema are meaningless without it.
#[sqlx::test(migrator = "pawres_db::MIGRATOR")]
async fn test_foreign_keys_enforced(pool: SqlitePool) {
    let result = sqlx::query(
        "INSERT INTO adoption_requests (user_id, contact, created_at, updated_at)
         VALUES (9999, 'x@example.com', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await;

    assert!(
        result.is_err(),
        "insert referencing a missing user must violate the FK"
    );
}

/// The partial unique index allows at most one approved request per animal.
#[sqlx::test(migrator = "pawres_db::MIGRATOR")]
async fn test_approved_unique_index(pool: SqlitePool) {
    let now = "2024-01-01T00:00:00Z";
    sqlx::query(&format!(
        "INSERT INTO users (name, email, created_at, updated_at)
         VALUES ('A', 'a@example.com', '{now}', '{now}')"
    ))
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(&format!(
        "INSERT INTO animals (species, status, created_at, updated_at)
         VALUES ('Dog', 'healthy', '{now}', '{now}')"
    ))
    .execute(&pool)
    .await
    .unwrap();

    let insert_approved = format!(
        "INSERT INTO adoption_requests
            (user_id, animal_id, contact, status, created_at, updated_at)
         VALUES (1, 1, 'a@example.com', 'approved', '{now}', '{now}')"
    );
    sqlx::query(&insert_approved).execute(&pool).await.unwrap();

    let second = sqlx::query(&insert_approved).execute(&pool).await;
    assert!(
        second.is_err(),
        "a second approved request for the same animal must be rejected"
    );

    // A denied request for the same animal is fine.
    sqlx::query(&format!(
        "INSERT INTO adoption_requests
            (user_id, animal_id, contact, status, created_at, updated_at)
         VALUES (1, 1, 'a@example.com', 'denied', '{now}', '{now}')"
    ))
    .execute(&pool)
    .await
    .unwrap();
}
