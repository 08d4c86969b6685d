use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::{PaymentRepository, UserRepository},
};

/// Listing filters as they come from the admin table.
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    /// Matches client name, email or id.
    pub search: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub limit: i64,
    pub offset: i64,
}

pub struct PaymentService {
    payments: Arc<dyn PaymentRepository>,
    users: Arc<dyn UserRepository>,
}

impl PaymentService {
    pub fn new(payments: Arc<dyn PaymentRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { payments, users }
    }

    /// Record a payment on behalf of `actor`, who must be an admin.
    pub async fn record_payment(&self, actor: &User, request: CreatePaymentRequest) -> Result<Payment> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden);
        }

        let client_id = request.client_id.trim().to_string();
        if client_id.is_empty() {
            return Err(AppError::Validation("clientId is required".to_string()));
        }

        let selected_dates = normalize_dates(request.selected_dates);
        validate_terms(&request.plan_type, request.amount, &selected_dates, request.duration_days)?;

        if self.users.find_by_id(&client_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Client {} not found", client_id)));
        }

        let payment = self
            .payments
            .create(NewPayment {
                client_id,
                user_id: Some(actor.id.clone()),
                plan_type: request.plan_type,
                amount: request.amount,
                date: request.date,
                selected_dates,
                duration_days: request.duration_days,
            })
            .await?;

        tracing::info!(
            "Recorded {} payment {} for client {} (by {})",
            payment.plan_type,
            payment.id,
            payment.client_id,
            actor.id
        );
        Ok(payment)
    }

    pub async fn update_payment(&self, id: &str, mut request: UpdatePaymentRequest) -> Result<Payment> {
        let current = self
            .payments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        request.selected_dates = normalize_dates(request.selected_dates);

        // Validate the record as it will look after the patch
        let plan_type = request.plan_type.as_ref().unwrap_or(&current.plan_type);
        let amount = request.amount.unwrap_or(current.amount);
        let selected_dates = request.selected_dates.as_ref().or(current.selected_dates.as_ref()).cloned();
        let duration_days = request.duration_days.or(current.duration_days);
        validate_terms(plan_type, amount, &selected_dates, duration_days)?;

        let updated = self
            .payments
            .update(id, request)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        tracing::info!("Updated payment {}", id);
        Ok(updated)
    }

    pub async fn delete_payment(&self, id: &str) -> Result<()> {
        if !self.payments.delete(id).await? {
            return Err(AppError::NotFound("Payment not found".to_string()));
        }
        tracing::info!("Deleted payment {}", id);
        Ok(())
    }

    pub async fn get_payment(&self, id: &str, as_of: NaiveDate) -> Result<PaymentView> {
        let payment = self
            .payments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        self.decorate(vec![payment], as_of)
            .await
            .pop()
            .ok_or_else(|| AppError::Internal("Payment view missing after decoration".to_string()))
    }

    pub async fn list_payments(&self, filter: PaymentFilter, as_of: NaiveDate) -> Result<Vec<PaymentView>> {
        let client_ids = match filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => Some(
                self.users
                    .search(term)
                    .await?
                    .into_iter()
                    .map(|u| u.id)
                    .collect::<Vec<_>>(),
            ),
            None => None,
        };

        let payments = self
            .payments
            .list(PaymentQuery {
                client_ids,
                year: filter.year,
                month: filter.month,
                limit: filter.limit,
                offset: filter.offset,
            })
            .await?;

        Ok(self.decorate(payments, as_of).await)
    }

    /// A client's payments split into those granting access on `as_of` and
    /// the rest.
    pub async fn client_payments(&self, client_id: &str, as_of: NaiveDate) -> Result<ClientPayments> {
        let payments = self.payments.find_by_client(client_id).await?;
        let (active, inactive): (Vec<_>, Vec<_>) = self
            .decorate(payments, as_of)
            .await
            .into_iter()
            .partition(|view| view.coverage.active);

        Ok(ClientPayments {
            client_id: client_id.to_string(),
            as_of,
            active,
            inactive,
        })
    }

    // Decoration is best effort: a missing or unreadable user leaves the
    // summary empty instead of failing the listing.
    async fn decorate(&self, payments: Vec<Payment>, as_of: NaiveDate) -> Vec<PaymentView> {
        let mut summaries: HashMap<String, Option<ClientSummary>> = HashMap::new();
        let mut views = Vec::with_capacity(payments.len());

        for payment in payments {
            let client = self.summary(&mut summaries, Some(&payment.client_id)).await;
            let recorded_by = self.summary(&mut summaries, payment.user_id.as_deref()).await;
            let coverage = payment.coverage(as_of);
            views.push(PaymentView {
                payment,
                client,
                recorded_by,
                coverage,
            });
        }

        views
    }

    async fn summary(
        &self,
        cache: &mut HashMap<String, Option<ClientSummary>>,
        id: Option<&str>,
    ) -> Option<ClientSummary> {
        let id = id?;
        if let Some(cached) = cache.get(id) {
            return cached.clone();
        }

        let summary = match self.users.find_by_id(id).await {
            Ok(user) => user.as_ref().map(ClientSummary::from),
            Err(e) => {
                tracing::warn!("Failed to load user {} for payment listing: {}", id, e);
                None
            }
        };
        cache.insert(id.to_string(), summary.clone());
        summary
    }
}

fn normalize_dates(dates: Option<Vec<NaiveDate>>) -> Option<Vec<NaiveDate>> {
    dates.map(|mut dates| {
        dates.sort();
        dates.dedup();
        dates
    })
}

fn validate_terms(
    plan_type: &PlanType,
    amount: f64,
    selected_dates: &Option<Vec<NaiveDate>>,
    duration_days: Option<i64>,
) -> Result<()> {
    if !plan_type.is_known() {
        return Err(AppError::Validation(format!(
            "Invalid plan type: {}. Expected one of: per day, per week, per month, per several",
            plan_type
        )));
    }

    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::Validation("Amount must be a positive number".to_string()));
    }

    if matches!(duration_days, Some(days) if days <= 0) {
        return Err(AppError::Validation("durationDays must be positive".to_string()));
    }

    if *plan_type == PlanType::PerSeveral
        && selected_dates.as_ref().map_or(true, |dates| dates.is_empty())
    {
        return Err(AppError::Validation(
            "per several payments need at least one selected date".to_string(),
        ));
    }

    Ok(())
}
