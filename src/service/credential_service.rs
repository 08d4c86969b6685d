use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    domain::{credential, *},
    error::{AppError, Result},
    repository::{PaymentRepository, UserRepository},
};

/// What a client's "show my QR" action receives.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedCredential {
    pub payment_id: String,
    pub client_id: String,
    /// Text encoded into the QR code.
    pub payload: String,
    pub qr_svg: String,
    pub coverage: Coverage,
}

/// Issues credentials for payments and verifies scanned ones against the
/// payment store.
pub struct CredentialService {
    payments: Arc<dyn PaymentRepository>,
    users: Arc<dyn UserRepository>,
    signer: Option<CredentialSigner>,
}

impl CredentialService {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        users: Arc<dyn UserRepository>,
        signer: Option<CredentialSigner>,
    ) -> Self {
        Self { payments, users, signer }
    }

    pub fn signs_credentials(&self) -> bool {
        self.signer.is_some()
    }

    pub async fn issue_for_payment(&self, payment_id: &str, as_of: NaiveDate) -> Result<IssuedCredential> {
        let payment = self
            .payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        let mut issued = credential::issue(&payment.client_id, &payment.id);
        if let Some(signer) = &self.signer {
            issued = signer.sign(issued);
        }

        Ok(IssuedCredential {
            payload: issued.encode(),
            qr_svg: issued.to_qr_svg()?,
            coverage: payment.coverage(as_of),
            payment_id: payment.id,
            client_id: payment.client_id,
        })
    }

    /// Check a scanned payload.
    ///
    /// Nothing in the payload is trusted beyond the two ids: the payment is
    /// re-read from the store, its owner compared with the claimed client,
    /// and its coverage recomputed for `as_of`. Every failure comes back as
    /// a distinct [`VerificationError`]; an expired payment is a normal
    /// result with `valid == false`.
    pub async fn verify(&self, raw: &str, as_of: NaiveDate) -> VerificationResult {
        let claimed = match Credential::parse(raw) {
            Ok(claimed) => claimed,
            Err(e) => {
                tracing::debug!("Rejected unreadable credential: {}", e);
                return VerificationResult::rejected(VerificationError::ParseError {
                    reason: e.to_string(),
                });
            }
        };

        if let Some(signer) = &self.signer {
            if !signer.verify(&claimed) {
                tracing::warn!(
                    "Credential for payment {} failed signature check",
                    claimed.payment_id
                );
                return VerificationResult::rejected(VerificationError::InvalidSignature);
            }
        }

        let payment = match self.payments.find_by_id(&claimed.payment_id).await {
            Ok(Some(payment)) => payment,
            Ok(None) => {
                tracing::info!("Credential names unknown payment {}", claimed.payment_id);
                return VerificationResult::rejected(VerificationError::NotFound {
                    payment_id: claimed.payment_id,
                });
            }
            Err(e) => {
                tracing::error!("Payment store lookup failed during verification: {}", e);
                return VerificationResult::rejected(VerificationError::StoreUnavailable {
                    reason: e.to_string(),
                });
            }
        };

        if payment.client_id != claimed.client_id {
            tracing::warn!(
                "Credential for payment {} claims client {} but payment belongs to {}",
                payment.id,
                claimed.client_id,
                payment.client_id
            );
            return VerificationResult::rejected(VerificationError::IdentityMismatch {
                claimed: claimed.client_id,
                actual: payment.client_id,
            });
        }

        let coverage = payment.coverage(as_of);
        let client = self.client_summary(&payment.client_id).await;

        tracing::info!(
            "Verified payment {} for client {}: valid={}",
            payment.id,
            payment.client_id,
            coverage.active
        );

        VerificationResult {
            valid: coverage.active,
            details: Some(VerificationDetails {
                identity_matches: true,
                within_coverage: coverage.active,
                plan_type: payment.plan_type.clone(),
                start: coverage.start,
                end: coverage.end,
                as_of,
            }),
            payment: Some(payment),
            client,
            error: None,
        }
    }

    // Decoration only; verification never fails because of it.
    async fn client_summary(&self, client_id: &str) -> Option<ClientSummary> {
        match self.users.find_by_id(client_id).await {
            Ok(user) => user.as_ref().map(ClientSummary::from),
            Err(e) => {
                tracing::warn!("Could not load client {} for verification output: {}", client_id, e);
                None
            }
        }
    }
}
