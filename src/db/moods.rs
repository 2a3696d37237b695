//! The mood ledger. Statistics are never stored here; callers re-derive
//! them from these rows on demand.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::mood::MoodEntry;

pub async fn insert(
    pool: &SqlitePool,
    user_id: i64,
    level: i32,
    note: &str,
    recorded_at: DateTime<Utc>,
) -> AppResult<MoodEntry> {
    let entry = sqlx::query_as::<_, MoodEntry>(
        r#"
        INSERT INTO moods (user_id, level, note, recorded_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(level)
    .bind(note)
    .bind(recorded_at)
    .fetch_one(pool)
    .await?;

    Ok(entry)
}

pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> AppResult<Vec<MoodEntry>> {
    let entries = sqlx::query_as::<_, MoodEntry>(
        r#"
        SELECT * FROM moods
        WHERE user_id = ?
        ORDER BY recorded_at DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Update level/note of an entry owned by `user_id`. Returns false when
/// the id does not exist or belongs to another account.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    level: i32,
    note: &str,
) -> AppResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE moods SET level = ?, note = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(level)
    .bind(note)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: i64, user_id: i64) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM moods WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Most recent entry recorded on the given calendar day, if any.
pub async fn latest_on_date(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> AppResult<Option<MoodEntry>> {
    let day_start = date.and_time(NaiveTime::MIN).and_utc();
    let day_end = day_start + chrono::Duration::days(1);

    let entry = sqlx::query_as::<_, MoodEntry>(
        r#"
        SELECT * FROM moods
        WHERE user_id = ? AND recorded_at >= ? AND recorded_at < ?
        ORDER BY recorded_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(day_start)
    .bind(day_end)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// Distinct calendar dates with at least one entry, newest first. This
/// is the input the streak computation expects.
pub async fn dates_desc(pool: &SqlitePool, user_id: i64) -> AppResult<Vec<NaiveDate>> {
    let timestamps = sqlx::query_scalar::<_, DateTime<Utc>>(
        r#"
        SELECT recorded_at FROM moods
        WHERE user_id = ?
        ORDER BY recorded_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut dates: Vec<NaiveDate> = Vec::new();
    for ts in timestamps {
        let date = ts.date_naive();
        if dates.last() != Some(&date) {
            dates.push(date);
        }
    }

    Ok(dates)
}

/// All recorded levels for an account, in no particular order.
pub async fn levels_for_user(pool: &SqlitePool, user_id: i64) -> AppResult<Vec<i32>> {
    let levels = sqlx::query_scalar::<_, i32>("SELECT level FROM moods WHERE user_id = ?")
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users;
    use chrono::TimeZone;
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

    fn at(date: NaiveDate, hour: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn insert_and_list_newest_first() {
        let (pool, uid) = test_pool().await;
        let day = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();

        insert(&pool, uid, 4, "rough morning", at(day, 9))
            .await
            .unwrap();
        insert(&pool, uid, 7, "better now", at(day, 18)).await.unwrap();

        let entries = list_for_user(&pool, uid, 10).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, 7);
        assert_eq!(entries[1].level, 4);

        let limited = list_for_user(&pool, uid, 1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].level, 7);
    }

    #[tokio::test]
    async fn update_and_delete_scoped_to_owner() {
        let (pool, uid) = test_pool().await;
        let day = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let entry = insert(&pool, uid, 5, "", at(day, 12)).await.unwrap();

        assert!(update(&pool, entry.id, uid, 8, "revised").await.unwrap());
        let entries = list_for_user(&pool, uid, 10).await.unwrap();
        assert_eq!(entries[0].level, 8);
        assert_eq!(entries[0].note, "revised");

        // Another account cannot touch the row.
        assert!(!update(&pool, entry.id, uid + 1, 1, "").await.unwrap());
        assert!(!delete(&pool, entry.id, uid + 1).await.unwrap());

        assert!(delete(&pool, entry.id, uid).await.unwrap());
        assert!(!delete(&pool, entry.id, uid).await.unwrap());
    }

    #[tokio::test]
    async fn latest_on_date_picks_newest_of_day() {
        let (pool, uid) = test_pool().await;
        let day = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let other_day = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

        insert(&pool, uid, 3, "", at(other_day, 22)).await.unwrap();
        insert(&pool, uid, 4, "", at(day, 8)).await.unwrap();
        insert(&pool, uid, 9, "", at(day, 20)).await.unwrap();

        let latest = latest_on_date(&pool, uid, day).await.unwrap().unwrap();
        assert_eq!(latest.level, 9);

        let empty_day = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        assert!(latest_on_date(&pool, uid, empty_day).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn dates_desc_dedupes_days() {
        let (pool, uid) = test_pool().await;
        let d1 = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();

        insert(&pool, uid, 5, "", at(d1, 9)).await.unwrap();
        insert(&pool, uid, 6, "", at(d1, 21)).await.unwrap();
        insert(&pool, uid, 7, "", at(d2, 12)).await.unwrap();

        let dates = dates_desc(&pool, uid).await.unwrap();
        assert_eq!(dates, vec![d2, d1]);
    }

    #[tokio::test]
    async fn levels_scoped_to_user() {
        let (pool, uid) = test_pool().await;
        let other = users::create(&pool, "bob", "bob@example.com", "phc-string")
            .await
            .unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();

        insert(&pool, uid, 4, "", at(day, 9)).await.unwrap();
        insert(&pool, uid, 8, "", at(day, 10)).await.unwrap();
        insert(&pool, other.id, 1, "", at(day, 11)).await.unwrap();

        let mut levels = levels_for_user(&pool, uid).await.unwrap();
        levels.sort_unstable();
        assert_eq!(levels, vec![4, 8]);
    }
}
