use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateProgramRequest, Exercise, UpdateProgramRequest, WorkoutProgram},
    error::{AppError, Result},
    repository::ProgramRepository,
};

#[derive(FromRow)]
struct ProgramRow {
    id: String,
    name: String,
    description: Option<String>,
    exercises: String,
    created_by: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteProgramRepository {
    pool: SqlitePool,
}

impl SqliteProgramRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_program(row: ProgramRow) -> Result<WorkoutProgram> {
        let exercises: Vec<Exercise> = serde_json::from_str(&row.exercises)?;
        Ok(WorkoutProgram {
            id: row.id,
            name: row.name,
            description: row.description,
            exercises,
            created_by: row.created_by,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl ProgramRepository for SqliteProgramRepository {
    async fn create(&self, program: CreateProgramRequest, created_by: Option<String>) -> Result<WorkoutProgram> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();
        let exercises = serde_json::to_string(&program.exercises)?;

        sqlx::query(
            r#"
            INSERT INTO workout_programs (id, name, description, exercises, created_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id)
        .bind(&program.name)
        .bind(&program.description)
        .bind(&exercises)
        .bind(&created_by)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(&id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created program".to_string())
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<WorkoutProgram>> {
        let row = sqlx::query_as::<_, ProgramRow>(
            r#"
            SELECT id, name, description, exercises, created_by, created_at, updated_at
            FROM workout_programs
            WHERE id = ?
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_program).transpose()
    }

    async fn list(&self) -> Result<Vec<WorkoutProgram>> {
        let rows = sqlx::query_as::<_, ProgramRow>(
            r#"
            SELECT id, name, description, exercises, created_by, created_at, updated_at
            FROM workout_programs
            ORDER BY created_at DESC
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_program).collect()
    }

    async fn update(&self, id: &str, update: UpdateProgramRequest) -> Result<Option<WorkoutProgram>> {
        let Some(current) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let name = update.name.unwrap_or(current.name);
        let description = update.description.or(current.description);
        let exercises = serde_json::to_string(&update.exercises.unwrap_or(current.exercises))?;
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE workout_programs
            SET name = ?, description = ?, exercises = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&name)
        .bind(&description)
        .bind(&exercises)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workout_programs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
