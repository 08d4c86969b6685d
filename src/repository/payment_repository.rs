use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{dates::parse_calendar_date, NewPayment, Payment, PaymentQuery, PlanType, UpdatePaymentRequest},
    error::{AppError, Result},
    repository::PaymentRepository,
};

const PAYMENT_COLUMNS: &str = r#"
    SELECT id, client_id, user_id, plan_type, amount, start_date,
           selected_dates, duration_days, created_at, updated_at
    FROM payments
"#;

#[derive(FromRow)]
struct PaymentRow {
    id: String,
    client_id: String,
    user_id: Option<String>,
    plan_type: String,
    amount: f64,
    start_date: String,
    selected_dates: Option<String>,
    duration_days: Option<i64>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqlitePaymentRepository {
    pool: SqlitePool,
}

impl SqlitePaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Rows that no longer parse still load, but never grant access: an
    /// unreadable start date turns the plan into `PlanType::Unknown` dated
    /// at creation, and a `selected_dates` column that is not a list of
    /// dates leaves no selected days.
    fn row_to_payment(row: PaymentRow) -> Payment {
        let created_at = DateTime::from_naive_utc_and_offset(row.created_at, Utc);

        let (plan_type, date) = match parse_calendar_date(&row.start_date) {
            Some(date) => (PlanType::parse(&row.plan_type), date),
            None => {
                tracing::warn!(
                    "Payment {} has unreadable start date {:?}; treating it as not covering any day",
                    row.id,
                    row.start_date
                );
                (PlanType::Unknown(row.plan_type.clone()), created_at.date_naive())
            }
        };

        let selected_dates = row
            .selected_dates
            .as_deref()
            .map(|raw| Self::decode_dates(&row.id, raw));

        Payment {
            id: row.id,
            client_id: row.client_id,
            user_id: row.user_id,
            plan_type,
            amount: row.amount,
            date,
            selected_dates,
            duration_days: row.duration_days,
            created_at,
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        }
    }

    // Entries that no longer parse are dropped so the payment still loads;
    // a "per several" payment left without days simply grants no access.
    fn decode_dates(payment_id: &str, raw: &str) -> Vec<NaiveDate> {
        let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Payment {} has unreadable selected dates ({}); ignoring them", payment_id, e);
                return Vec::new();
            }
        };

        entries
            .iter()
            .filter_map(|entry| {
                let parsed = entry.as_str().and_then(parse_calendar_date);
                if parsed.is_none() {
                    tracing::warn!("Skipping unreadable selected date {} on payment {}", entry, payment_id);
                }
                parsed
            })
            .collect()
    }

    fn encode_dates(dates: &Option<Vec<NaiveDate>>) -> Option<String> {
        dates.as_ref().map(|dates| {
            let entries: Vec<String> = dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect();
            serde_json::Value::from(entries).to_string()
        })
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn create(&self, payment: NewPayment) -> Result<Payment> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, client_id, user_id, plan_type, amount, start_date,
                selected_dates, duration_days, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&id)
        .bind(&payment.client_id)
        .bind(&payment.user_id)
        .bind(payment.plan_type.as_str())
        .bind(payment.amount)
        .bind(payment.date.format("%Y-%m-%d").to_string())
        .bind(Self::encode_dates(&payment.selected_dates))
        .bind(payment.duration_days)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(&id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created payment".to_string())
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!("{PAYMENT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(Self::row_to_payment))
    }

    async fn find_by_client(&self, client_id: &str) -> Result<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            "{PAYMENT_COLUMNS} WHERE client_id = ? ORDER BY start_date DESC, created_at DESC"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Self::row_to_payment).collect())
    }

    async fn list(&self, query: PaymentQuery) -> Result<Vec<Payment>> {
        if matches!(&query.client_ids, Some(ids) if ids.is_empty()) {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(PAYMENT_COLUMNS);
        builder.push(" WHERE 1 = 1");

        if let Some(ids) = &query.client_ids {
            builder.push(" AND client_id IN (");
            let mut separated = builder.separated(", ");
            for id in ids {
                separated.push_bind(id.clone());
            }
            separated.push_unseparated(")");
        }
        if let Some(year) = query.year {
            builder
                .push(" AND CAST(strftime('%Y', start_date) AS INTEGER) = ")
                .push_bind(year);
        }
        if let Some(month) = query.month {
            builder
                .push(" AND CAST(strftime('%m', start_date) AS INTEGER) = ")
                .push_bind(month as i64);
        }

        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset);

        let rows = builder
            .build_query_as::<PaymentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Self::row_to_payment).collect())
    }

    async fn update(&self, id: &str, update: UpdatePaymentRequest) -> Result<Option<Payment>> {
        let Some(current) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let plan_type = update.plan_type.unwrap_or(current.plan_type);
        let amount = update.amount.unwrap_or(current.amount);
        let date = update.date.unwrap_or(current.date);
        let selected_dates = update.selected_dates.or(current.selected_dates);
        let duration_days = update.duration_days.or(current.duration_days);
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE payments
            SET plan_type = ?,
                amount = ?,
                start_date = ?,
                selected_dates = ?,
                duration_days = ?,
                updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(plan_type.as_str())
        .bind(amount)
        .bind(date.format("%Y-%m-%d").to_string())
        .bind(Self::encode_dates(&selected_dates))
        .bind(duration_days)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
