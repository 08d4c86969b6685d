use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::dates::{deserialize_date, deserialize_opt_date, deserialize_opt_dates};
use super::entitlement::Coverage;
use super::user::ClientSummary;

/// Billing/coverage category of a payment.
///
/// Unrecognized strings are kept verbatim in [`PlanType::Unknown`] so that
/// older rows still load; such payments never grant access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlanType {
    PerDay,
    PerWeek,
    PerMonth,
    PerSeveral,
    Unknown(String),
}

impl PlanType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "per day" => PlanType::PerDay,
            "per week" => PlanType::PerWeek,
            "per month" => PlanType::PerMonth,
            "per several" => PlanType::PerSeveral,
            _ => PlanType::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PlanType::PerDay => "per day",
            PlanType::PerWeek => "per week",
            PlanType::PerMonth => "per month",
            PlanType::PerSeveral => "per several",
            PlanType::Unknown(raw) => raw.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, PlanType::Unknown(_))
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PlanType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PlanType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(PlanType::parse(&raw))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub client_id: String,
    /// Staff member who recorded the payment.
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub amount: f64,
    /// Coverage start date.
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_dates: Option<Vec<NaiveDate>>,
    /// Legacy day count used by early "per several" payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields the store needs to insert a payment. The id and timestamps are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub client_id: String,
    pub user_id: Option<String>,
    pub plan_type: PlanType,
    pub amount: f64,
    pub date: NaiveDate,
    pub selected_dates: Option<Vec<NaiveDate>>,
    pub duration_days: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub client_id: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub amount: f64,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_opt_dates")]
    pub selected_dates: Option<Vec<NaiveDate>>,
    #[serde(default)]
    pub duration_days: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    #[serde(default, rename = "type")]
    pub plan_type: Option<PlanType>,
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_opt_dates")]
    pub selected_dates: Option<Vec<NaiveDate>>,
    #[serde(default)]
    pub duration_days: Option<i64>,
}

/// Filters for listing payments.
#[derive(Debug, Clone, Default)]
pub struct PaymentQuery {
    /// Restrict to these clients. `Some(vec![])` matches nothing.
    pub client_ids: Option<Vec<String>>,
    /// Calendar year of the coverage start date.
    pub year: Option<i32>,
    /// Month (1-12) of the coverage start date.
    pub month: Option<u32>,
    pub limit: i64,
    pub offset: i64,
}

/// A payment as presented to people: the stored record, who it belongs to,
/// and its coverage evaluated on a given day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    #[serde(flatten)]
    pub payment: Payment,
    pub client: Option<ClientSummary>,
    pub recorded_by: Option<ClientSummary>,
    pub coverage: Coverage,
}

/// A client's payments split by whether they grant access today.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayments {
    pub client_id: String,
    pub as_of: NaiveDate,
    pub active: Vec<PaymentView>,
    pub inactive: Vec<PaymentView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_type_parse() {
        assert_eq!(PlanType::parse("per day"), PlanType::PerDay);
        assert_eq!(PlanType::parse("Per Week"), PlanType::PerWeek);
        assert_eq!(PlanType::parse(" per month "), PlanType::PerMonth);
        assert_eq!(PlanType::parse("per several"), PlanType::PerSeveral);
        assert_eq!(
            PlanType::parse("per year"),
            PlanType::Unknown("per year".to_string())
        );
        assert!(!PlanType::parse("").is_known());
    }

    #[test]
    fn test_plan_type_wire_format() {
        assert_eq!(serde_json::to_string(&PlanType::PerMonth).unwrap(), "\"per month\"");
        let unknown: PlanType = serde_json::from_str("\"weekly-ish\"").unwrap();
        assert_eq!(unknown.as_str(), "weekly-ish");
    }

    #[test]
    fn test_create_request_accepts_frontend_payload() {
        let request: CreatePaymentRequest = serde_json::from_str(
            r#"{
                "clientId": "u1",
                "type": "per several",
                "amount": 30,
                "date": "2025-03-01T00:00:00.000Z",
                "selectedDates": ["2025-03-01", "2025-03-10"]
            }"#,
        )
        .unwrap();

        assert_eq!(request.client_id, "u1");
        assert_eq!(request.plan_type, PlanType::PerSeveral);
        assert_eq!(request.amount, 30.0);
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(request.selected_dates.map(|d| d.len()), Some(2));
        assert!(request.duration_days.is_none());
    }
}
