use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::payment::{Payment, PlanType};
use super::user::ClientSummary;

/// Reasons a credential could not be checked, or was refused.
///
/// An expired or not-yet-started payment is not an error: it comes back as
/// a normal result with `valid: false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum VerificationError {
    #[error("could not read credential: {reason}")]
    ParseError { reason: String },

    #[error("credential signature does not match")]
    InvalidSignature,

    #[error("payment {payment_id} not found")]
    NotFound {
        #[serde(rename = "paymentId")]
        payment_id: String,
    },

    #[error("credential names client {claimed} but the payment belongs to {actual}")]
    IdentityMismatch { claimed: String, actual: String },

    #[error("payment store unavailable: {reason}")]
    StoreUnavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDetails {
    pub identity_matches: bool,
    pub within_coverage: bool,
    pub plan_type: PlanType,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<VerificationDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<VerificationError>,
}

impl VerificationResult {
    pub fn rejected(error: VerificationError) -> Self {
        Self {
            valid: false,
            details: None,
            payment: None,
            client: None,
            error: Some(error),
        }
    }

    /// True when the store could not be consulted, as opposed to the
    /// credential being bad.
    pub fn is_store_failure(&self) -> bool {
        matches!(self.error, Some(VerificationError::StoreUnavailable { .. }))
    }
}
