//! QR credential payloads.
//!
//! A credential is a lookup key, not proof of payment: it names a payment
//! and the client claiming it, and the verifier re-reads the payment from the
//! store before trusting anything. The wire form is compact JSON:
//!
//! ```json
//! {"clientId":"u1","paymentId":"p1"}
//! ```
//!
//! When a signing secret is configured, issued payloads also carry
//! `"sig"`, a hex HMAC-SHA256 over the two ids.
//!
//! Older clients encoded `{"user": {...}, "payment": {...}}` with the
//! amount, plan and dates copied in. Those payloads still parse, but only
//! `user.id` and `payment.id` are kept.

use hmac::{Hmac, Mac};
use qrcode::{render::svg, QrCode};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub client_id: String,
    pub payment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialParseError {
    #[error("payload is not a credential: {0}")]
    Malformed(String),
    #[error("credential is missing the {0} field")]
    MissingId(&'static str),
}

/// Build an unsigned credential for a payment.
pub fn issue(client_id: impl Into<String>, payment_id: impl Into<String>) -> Credential {
    Credential {
        client_id: client_id.into(),
        payment_id: payment_id.into(),
        sig: None,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WirePayload {
    Current(CurrentPayload),
    Legacy(LegacyPayload),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentPayload {
    client_id: String,
    payment_id: String,
    #[serde(default)]
    sig: Option<String>,
}

// Everything besides the two ids is ignored on purpose.
#[derive(Deserialize)]
struct LegacyPayload {
    user: LegacyRef,
    payment: LegacyRef,
}

#[derive(Deserialize)]
struct LegacyRef {
    id: LegacyId,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyId {
    Text(String),
    Number(i64),
}

impl LegacyId {
    fn into_string(self) -> String {
        match self {
            LegacyId::Text(s) => s,
            LegacyId::Number(n) => n.to_string(),
        }
    }
}

impl Credential {
    /// Textual form embedded in the QR code.
    pub fn encode(&self) -> String {
        // A struct of plain strings always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn parse(raw: &str) -> std::result::Result<Self, CredentialParseError> {
        let wire: WirePayload = serde_json::from_str(raw.trim())
            .map_err(|e| CredentialParseError::Malformed(e.to_string()))?;

        let credential = match wire {
            WirePayload::Current(p) => Credential {
                client_id: p.client_id,
                payment_id: p.payment_id,
                sig: p.sig,
            },
            WirePayload::Legacy(p) => Credential {
                client_id: p.user.id.into_string(),
                payment_id: p.payment.id.into_string(),
                sig: None,
            },
        };

        if credential.client_id.is_empty() {
            return Err(CredentialParseError::MissingId("clientId"));
        }
        if credential.payment_id.is_empty() {
            return Err(CredentialParseError::MissingId("paymentId"));
        }

        Ok(credential)
    }

    /// Render the encoded payload as an SVG QR code.
    pub fn to_qr_svg(&self) -> Result<String> {
        let code = QrCode::new(self.encode().as_bytes())
            .map_err(|e| AppError::Internal(format!("QR encoding failed: {}", e)))?;

        Ok(code
            .render::<svg::Color>()
            .min_dimensions(240, 240)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build())
    }
}

/// Signs and checks credential payloads with a shared secret.
#[derive(Clone)]
pub struct CredentialSigner {
    mac: HmacSha256,
}

impl CredentialSigner {
    pub fn new(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(AppError::Internal(
                "credential signing secret must not be empty".to_string(),
            ));
        }
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(Self { mac })
    }

    pub fn sign(&self, mut credential: Credential) -> Credential {
        credential.sig = Some(hex::encode(self.digest(&credential)));
        credential
    }

    pub fn verify(&self, credential: &Credential) -> bool {
        let Some(provided) = credential.sig.as_deref().and_then(|s| hex::decode(s).ok()) else {
            return false;
        };
        let expected = self.digest(credential);
        expected.as_slice().ct_eq(provided.as_slice()).into()
    }

    fn digest(&self, credential: &Credential) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(credential.client_id.as_bytes());
        mac.update(b"\n");
        mac.update(credential.payment_id.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for CredentialSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CredentialSigner(..)")
    }
}
