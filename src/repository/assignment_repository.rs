use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Assignment, AssignmentStatus, ProgressEntry, UpdateAssignmentRequest},
    error::{AppError, Result},
    repository::AssignmentRepository,
};

#[derive(FromRow)]
struct AssignmentRow {
    id: String,
    program_id: String,
    client_id: String,
    status: String,
    progress: String,
    created_by: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteAssignmentRepository {
    pool: SqlitePool,
}

impl SqliteAssignmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_assignment(row: AssignmentRow) -> Result<Assignment> {
        let status = AssignmentStatus::from_str(&row.status)
            .ok_or_else(|| AppError::Database(format!("Invalid assignment status: {}", row.status)))?;
        let progress: Vec<ProgressEntry> = serde_json::from_str(&row.progress)?;

        Ok(Assignment {
            id: row.id,
            program_id: row.program_id,
            client_id: row.client_id,
            status,
            progress,
            created_by: row.created_by,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    async fn write(&self, assignment: &Assignment) -> Result<()> {
        let progress = serde_json::to_string(&assignment.progress)?;
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE program_assignments
            SET status = ?, progress = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(assignment.status.as_str())
        .bind(&progress)
        .bind(now)
        .bind(&assignment.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl AssignmentRepository for SqliteAssignmentRepository {
    async fn create(&self, program_id: &str, client_id: &str, created_by: Option<String>) -> Result<Assignment> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO program_assignments (
                id, program_id, client_id, status, progress, created_by, created_at, updated_at
            ) VALUES (?, ?, ?, ?, '[]', ?, ?, ?)
            "#
        )
        .bind(&id)
        .bind(program_id)
        .bind(client_id)
        .bind(AssignmentStatus::Assigned.as_str())
        .bind(&created_by)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(&id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created assignment".to_string())
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Assignment>> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT id, program_id, client_id, status, progress, created_by, created_at, updated_at
            FROM program_assignments
            WHERE id = ?
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(Self::row_to_assignment).transpose()
    }

    async fn find_by_client(&self, client_id: &str) -> Result<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT id, program_id, client_id, status, progress, created_by, created_at, updated_at
            FROM program_assignments
            WHERE client_id = ?
            ORDER BY created_at DESC
            "#
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_assignment).collect()
    }

    async fn update(&self, id: &str, update: UpdateAssignmentRequest) -> Result<Option<Assignment>> {
        let Some(mut assignment) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(status) = update.status {
            assignment.status = status;
        }
        self.write(&assignment).await?;

        self.find_by_id(id).await
    }

    async fn add_progress(&self, id: &str, entry: ProgressEntry) -> Result<Option<Assignment>> {
        let Some(mut assignment) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        assignment.progress.push(entry);
        // Logging a session moves a fresh assignment along
        if assignment.status == AssignmentStatus::Assigned {
            assignment.status = AssignmentStatus::InProgress;
        }
        self.write(&assignment).await?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM program_assignments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
