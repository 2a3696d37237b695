use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::user::User;

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn username_exists(pool: &SqlitePool, username: &str) -> AppResult<bool> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

pub async fn email_exists(pool: &SqlitePool, email: &str) -> AppResult<bool> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}

pub async fn update_password(pool: &SqlitePool, id: i64, password_hash: &str) -> AppResult<()> {
    sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn create_and_find() {
        let pool = test_pool().await;
        let user = create(&pool, "alice", "alice@example.com", "phc-string")
            .await
            .unwrap();
        assert_eq!(user.username, "alice");

        let by_name = find_by_username(&pool, "alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);

        let by_email = find_by_email(&pool, "alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        assert!(find_by_username(&pool, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn exists_checks() {
        let pool = test_pool().await;
        assert!(!username_exists(&pool, "alice").await.unwrap());

        create(&pool, "alice", "alice@example.com", "phc-string")
            .await
            .unwrap();

        assert!(username_exists(&pool, "alice").await.unwrap());
        assert!(email_exists(&pool, "alice@example.com").await.unwrap());
        assert!(!email_exists(&pool, "other@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_by_schema() {
        let pool = test_pool().await;
        create(&pool, "alice", "alice@example.com", "phc-string")
            .await
            .unwrap();

        let dup = create(&pool, "alice", "second@example.com", "phc-string").await;
        assert!(dup.is_err());
    }

    #[tokio::test]
    async fn password_rotation() {
        let pool = test_pool().await;
        let user = create(&pool, "alice", "alice@example.com", "old-hash")
            .await
            .unwrap();

        update_password(&pool, user.id, "new-hash").await.unwrap();

        let reloaded = find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.password_hash, "new-hash");
    }
}
