use async_trait::async_trait;
use sqlx::PgPool;

use crate::data::star_repository::{StarRepository, StarState};
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresStarRepository {
    pool: PgPool,
}

impl PostgresStarRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_count(&self, post_id: i64) -> Result<Option<i64>, DomainError> {
        sqlx::query_scalar::<_, i64>("SELECT star_count FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_star_db_error)
    }
}

#[async_trait]
impl StarRepository for PostgresStarRepository {
    async fn star(&self, user_id: i64, post_id: i64) -> Result<StarState, DomainError> {
        // Membership insert and counter increment happen in one statement;
        // the increment fires only when the insert actually added a row.
        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            WITH ins AS (
                INSERT INTO post_stars (user_id, post_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, post_id) DO NOTHING
                RETURNING post_id
            )
            UPDATE posts
            SET star_count = star_count + 1
            FROM ins
            WHERE posts.id = ins.post_id
            RETURNING posts.star_count
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_star_db_error)?;

        if let Some(star_count) = updated {
            return Ok(StarState {
                starred: true,
                star_count,
            });
        }

        // Already starred: report the current state.
        match self.current_count(post_id).await? {
            Some(star_count) => Ok(StarState {
                starred: true,
                star_count,
            }),
            None => Err(DomainError::NotFound("post".to_string())),
        }
    }

    async fn unstar(&self, user_id: i64, post_id: i64) -> Result<StarState, DomainError> {
        // The decrement fires only when a membership row was actually removed,
        // so the counter cannot drop below the set's cardinality.
        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            WITH del AS (
                DELETE FROM post_stars
                WHERE user_id = $1 AND post_id = $2
                RETURNING post_id
            )
            UPDATE posts
            SET star_count = star_count - 1
            FROM del
            WHERE posts.id = del.post_id
            RETURNING posts.star_count
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_star_db_error)?;

        if let Some(star_count) = updated {
            return Ok(StarState {
                starred: false,
                star_count,
            });
        }

        match self.current_count(post_id).await? {
            Some(star_count) => Ok(StarState {
                starred: false,
                star_count,
            }),
            None => Err(DomainError::NotFound("post".to_string())),
        }
    }

    async fn is_starred(&self, user_id: i64, post_id: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM post_stars WHERE user_id = $1 AND post_id = $2)",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_star_db_error)
    }

    async fn starred_post_ids(&self, user_id: i64) -> Result<Vec<i64>, DomainError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT post_id FROM post_stars WHERE user_id = $1 ORDER BY created_at DESC, post_id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_star_db_error)
    }
}

fn map_star_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        let resource = match db_err.constraint() {
            Some("post_stars_user_id_fkey") => "user",
            Some("post_stars_post_id_fkey") => "post",
            _ => "post",
        };
        return DomainError::NotFound(resource.to_string());
    }
    DomainError::Unexpected(err.to_string())
}
