use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateRoutineRequest, Routine, UpdateRoutineRequest},
    error::{AppError, Result},
    repository::RoutineRepository,
};

#[derive(FromRow)]
struct RoutineRow {
    id: String,
    title: String,
    description: String,
    image: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<RoutineRow> for Routine {
    fn from(row: RoutineRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            image: row.image,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        }
    }
}

pub struct SqliteRoutineRepository {
    pool: SqlitePool,
}

impl SqliteRoutineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoutineRepository for SqliteRoutineRepository {
    async fn create(&self, routine: CreateRoutineRequest) -> Result<Routine> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO routines (id, title, description, image, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id)
        .bind(&routine.title)
        .bind(&routine.description)
        .bind(&routine.image)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(&id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created routine".to_string())
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Routine>> {
        let row = sqlx::query_as::<_, RoutineRow>(
            "SELECT id, title, description, image, created_at, updated_at FROM routines WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(Routine::from))
    }

    async fn list(&self) -> Result<Vec<Routine>> {
        let rows = sqlx::query_as::<_, RoutineRow>(
            r#"
            SELECT id, title, description, image, created_at, updated_at
            FROM routines
            ORDER BY created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Routine::from).collect())
    }

    async fn update(&self, id: &str, update: UpdateRoutineRequest) -> Result<Option<Routine>> {
        let Some(current) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let title = update.title.unwrap_or(current.title);
        let description = update.description.unwrap_or(current.description);
        let image = update.image.or(current.image);
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE routines
            SET title = ?, description = ?, image = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&title)
        .bind(&description)
        .bind(&image)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM routines WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
