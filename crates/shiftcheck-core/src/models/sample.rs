use serde::{Deserialize, Serialize};

use crate::utils::format_timestamp;

/// A laboratory sample as reported by the backend.
///
/// Timestamps are kept as the raw strings the backend sends; some
/// deployments include an offset and some don't.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Sample {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub folio: Option<i64>,
    #[serde(rename(deserialize = "clientid"), default)]
    pub client_id: Option<i64>,
    #[serde(rename(deserialize = "patientid"), default)]
    pub patient_id: Option<i64>,
    #[serde(rename(deserialize = "examid"), default)]
    pub exam_id: Option<i64>,
    #[serde(rename(deserialize = "examname"), default)]
    pub exam_name: Option<String>,
    #[serde(rename(deserialize = "createdat"), default)]
    pub created_at: Option<String>,
    #[serde(rename(deserialize = "receivedat"), default)]
    pub received_at: Option<String>,
    #[serde(rename(deserialize = "processedat"), default)]
    pub processed_at: Option<String>,
    /// Release timestamp. Its presence alone decides pending vs. completed.
    #[serde(rename(deserialize = "validatedat"), default)]
    pub validated_at: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub outsourcer: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(rename(deserialize = "birthdate"), default)]
    pub birth_date: Option<String>,
}

impl Sample {
    pub fn is_completed(&self) -> bool {
        self.validated_at.is_some()
    }

    pub fn is_pending(&self) -> bool {
        !self.is_completed()
    }

    pub fn folio_display(&self) -> String {
        match self.folio {
            Some(folio) => format!("#{}", folio),
            None => "No folio".to_string(),
        }
    }

    pub fn exam_display(&self) -> &str {
        self.exam_name.as_deref().unwrap_or("Unknown exam")
    }

    pub fn received_display(&self) -> String {
        self.received_at
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::json::from_str_ci;

    #[test]
    fn test_sample_state_follows_release_timestamp() {
        let pending: Sample = from_str_ci(r#"{"id": 7, "folio": 1001}"#).unwrap();
        assert!(pending.is_pending());
        assert!(!pending.is_completed());

        let released: Sample =
            from_str_ci(r#"{"id": 8, "validatedAt": "2024-01-15T10:30:00"}"#).unwrap();
        assert!(released.is_completed());
        assert!(!released.is_pending());
    }

    #[test]
    fn test_parse_sample_any_casing() {
        let json = r#"{"Id": 9, "Folio": 55, "ExamName": "Glucosa", "RECEIVEDAT": "2024-03-01T08:00:00", "priority": "Alta"}"#;
        let sample: Sample = from_str_ci(json).unwrap();
        assert_eq!(sample.id, 9);
        assert_eq!(sample.folio, Some(55));
        assert_eq!(sample.exam_name.as_deref(), Some("Glucosa"));
        assert_eq!(sample.received_at.as_deref(), Some("2024-03-01T08:00:00"));
        assert_eq!(sample.priority.as_deref(), Some("Alta"));
    }

    #[test]
    fn test_folio_display() {
        let mut sample: Sample = from_str_ci(r#"{"id": 1}"#).unwrap();
        assert_eq!(sample.folio_display(), "No folio");
        sample.folio = Some(42);
        assert_eq!(sample.folio_display(), "#42");
    }
}
