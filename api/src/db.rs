use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// A migrated in-memory database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create test database")
}
