use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A plan advertised on the public pricing table. Purely descriptive: what a
/// client actually bought is recorded as a [`super::Payment`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePriceRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePriceRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(range(min = 0.0))]
    pub amount: Option<f64>,
    pub features: Option<Vec<String>>,
}

/// A workout routine shown on the public landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Image URL.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoutineRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(url)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoutineRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(url)]
    pub image: Option<String>,
}

/// Trim feature lines and drop the blank ones an editor leaves behind.
pub fn clean_features(features: Vec<String>) -> Vec<String> {
    features
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_features() {
        let features = vec![
            " Open gym access ".to_string(),
            "".to_string(),
            "   ".to_string(),
            "Locker".to_string(),
        ];
        assert_eq!(clean_features(features), vec!["Open gym access", "Locker"]);
    }

    #[test]
    fn test_price_request_validation() {
        let request: CreatePriceRequest =
            serde_json::from_str(r#"{"title": "Monthly", "amount": 30}"#).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.features.is_empty());

        let negative = CreatePriceRequest {
            amount: -1.0,
            ..request.clone()
        };
        assert!(negative.validate().is_err());

        let untitled = CreatePriceRequest {
            title: String::new(),
            ..request
        };
        assert!(untitled.validate().is_err());
    }

    #[test]
    fn test_routine_image_must_be_url() {
        let routine = CreateRoutineRequest {
            title: "Push day".to_string(),
            description: "Chest, shoulders, triceps".to_string(),
            image: Some("not a url".to_string()),
        };
        assert!(routine.validate().is_err());

        let routine = CreateRoutineRequest {
            image: Some("https://example.com/push.jpg".to_string()),
            ..routine
        };
        assert!(routine.validate().is_ok());
    }
}
