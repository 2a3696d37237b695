use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppResult;

#[derive(Debug, sqlx::FromRow)]
pub struct StoredRefreshToken {
    pub id: String,
    pub user_id: i64,
    pub revoked: bool,
}

/// Persist the hash of a freshly issued refresh token, optionally
/// linking it to the token it rotated out.
pub async fn insert(
    pool: &SqlitePool,
    user_id: i64,
    token_hash: &str,
    ttl_secs: i64,
    parent_token_id: Option<&str>,
) -> AppResult<String> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let expires_at: DateTime<Utc> = now + Duration::seconds(ttl_secs);

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at, parent_token_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .bind(parent_token_id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(id)
}

pub async fn find_by_hash(
    pool: &SqlitePool,
    token_hash: &str,
) -> AppResult<Option<StoredRefreshToken>> {
    let stored = sqlx::query_as::<_, StoredRefreshToken>(
        "SELECT id, user_id, revoked FROM refresh_tokens WHERE token_hash = ?",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(stored)
}

pub async fn revoke(pool: &SqlitePool, id: &str) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked = 1, revoked_at = ?
        WHERE id = ?
        "#,
    )
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Revoke every active refresh token a user holds. Used on logout,
/// credential rotation, and token-reuse detection.
pub async fn revoke_all_for_user(pool: &SqlitePool, user_id: i64) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked = 1, revoked_at = ?
        WHERE user_id = ? AND revoked = 0
        "#,
    )
    .bind(Utc::now())
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> (SqlitePool, i64) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        let user = users::create(&pool, "alice", "alice@example.com", "phc-string")
            .await
            .unwrap();
        (pool, user.id)
    }

    #[tokio::test]
    async fn insert_find_revoke() {
        let (pool, uid) = test_pool().await;

        let id = insert(&pool, uid, "hash-a", 3600, None).await.unwrap();
        let stored = find_by_hash(&pool, "hash-a").await.unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.user_id, uid);
        assert!(!stored.revoked);

        revoke(&pool, &id).await.unwrap();
        let stored = find_by_hash(&pool, "hash-a").await.unwrap().unwrap();
        assert!(stored.revoked);

        assert!(find_by_hash(&pool, "unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn revoke_all_only_touches_one_user() {
        let (pool, uid) = test_pool().await;
        let other = users::create(&pool, "bob", "bob@example.com", "phc-string")
            .await
            .unwrap();

        insert(&pool, uid, "hash-a", 3600, None).await.unwrap();
        insert(&pool, uid, "hash-b", 3600, None).await.unwrap();
        insert(&pool, other.id, "hash-c", 3600, None).await.unwrap();

        revoke_all_for_user(&pool, uid).await.unwrap();

        assert!(find_by_hash(&pool, "hash-a").await.unwrap().unwrap().revoked);
        assert!(find_by_hash(&pool, "hash-b").await.unwrap().unwrap().revoked);
        assert!(!find_by_hash(&pool, "hash-c").await.unwrap().unwrap().revoked);
    }
}
