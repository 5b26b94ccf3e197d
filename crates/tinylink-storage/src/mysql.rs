use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::{MySqlPool, Row};
use tinylink_core::error::{Result, StorageError};
use tinylink_core::{ReadRepository, Repository, ShortCode, ShortLink};

/// MySQL implementation of the repository contract.
///
/// Uniqueness is enforced by the `short_code` primary key, so a plain
/// `INSERT` is already create-if-absent: a duplicate key surfaces as a unique
/// violation and maps to [`StorageError::Conflict`]. The schema lives in
/// `ddl/mysql/short_links.sql`; `short_code` uses a binary collation so codes
/// stay case-sensitive.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

/// `created_at` is stored as nanoseconds since the Unix epoch, which an
/// `i64` covers until 2262.
fn created_at_to_column(created_at: Timestamp) -> Result<i64> {
    i64::try_from(created_at.as_nanosecond()).map_err(|_| {
        StorageError::InvalidData(format!(
            "created_at {created_at} does not fit a nanosecond BIGINT"
        ))
    })
}

fn created_at_from_column(nanos: i64) -> Result<Timestamp> {
    Timestamp::from_nanosecond(i128::from(nanos)).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", nanos))
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLink>> {
        let row = sqlx::query(
            r#"
            SELECT short_code, target_url, created_at
            FROM short_links
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
        let target: String = row.try_get("target_url").map_err(map_sqlx_error)?;
        let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

        Ok(Some(ShortLink {
            id: ShortCode::new_unchecked(short_code),
            target,
            created_at: created_at_from_column(created_at)?,
        }))
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, link: ShortLink) -> Result<()> {
        let created_at = created_at_to_column(link.created_at)?;
        let result = sqlx::query(
            r#"
            INSERT INTO short_links (short_code, target_url, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(link.id.as_str())
        .bind(&link.target)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(link.id.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_at_column_keeps_nanoseconds() {
        let created_at: Timestamp = "2025-02-19T21:20:00.123456789Z".parse().unwrap();
        let column = created_at_to_column(created_at).unwrap();

        assert_eq!(column % 1_000_000_000, 123_456_789);
        assert_eq!(created_at_from_column(column).unwrap(), created_at);
    }

    #[test]
    fn created_at_before_epoch_round_trips() {
        let created_at: Timestamp = "1969-07-20T20:17:40.5Z".parse().unwrap();
        let column = created_at_to_column(created_at).unwrap();
        assert_eq!(created_at_from_column(column).unwrap(), created_at);
    }

    #[test]
    fn created_at_beyond_bigint_range_is_invalid_data() {
        let far_future: Timestamp = "2300-01-01T00:00:00Z".parse().unwrap();
        assert!(matches!(
            created_at_to_column(far_future),
            Err(StorageError::InvalidData(_))
        ));
    }
}
