use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreatePriceRequest, Price, UpdatePriceRequest},
    error::{AppError, Result},
    repository::PriceRepository,
};

#[derive(FromRow)]
struct PriceRow {
    id: String,
    title: String,
    amount: f64,
    features: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqlitePriceRepository {
    pool: SqlitePool,
}

impl SqlitePriceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_price(row: PriceRow) -> Price {
        // Feature lines are display-only, so an unreadable list just shows empty
        let features = serde_json::from_str(&row.features).unwrap_or_else(|e| {
            tracing::warn!("Price {} has unreadable features ({}); showing none", row.id, e);
            Vec::new()
        });

        Price {
            id: row.id,
            title: row.title,
            amount: row.amount,
            features,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        }
    }
}

#[async_trait]
impl PriceRepository for SqlitePriceRepository {
    async fn create(&self, price: CreatePriceRequest) -> Result<Price> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();
        let features = serde_json::to_string(&price.features)?;

        sqlx::query(
            r#"
            INSERT INTO prices (id, title, amount, features, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id)
        .bind(&price.title)
        .bind(price.amount)
        .bind(&features)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(&id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created price".to_string())
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Price>> {
        let row = sqlx::query_as::<_, PriceRow>(
            "SELECT id, title, amount, features, created_at, updated_at FROM prices WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(Self::row_to_price))
    }

    async fn list(&self) -> Result<Vec<Price>> {
        let rows = sqlx::query_as::<_, PriceRow>(
            r#"
            SELECT id, title, amount, features, created_at, updated_at
            FROM prices
            ORDER BY amount ASC, title COLLATE NOCASE
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Self::row_to_price).collect())
    }

    async fn update(&self, id: &str, update: UpdatePriceRequest) -> Result<Option<Price>> {
        let Some(current) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let title = update.title.unwrap_or(current.title);
        let amount = update.amount.unwrap_or(current.amount);
        let features = serde_json::to_string(&update.features.unwrap_or(current.features))?;
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE prices
            SET title = ?, amount = ?, features = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&title)
        .bind(amount)
        .bind(&features)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM prices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
