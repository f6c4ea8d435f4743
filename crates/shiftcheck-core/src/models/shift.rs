use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A work shift definition used to tag a handover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Shift {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// Time of day as `HH:MM:SS`
    #[serde(rename(deserialize = "starttime"), default)]
    pub start_time: String,
    #[serde(rename(deserialize = "endtime"), default)]
    pub end_time: String,
    #[serde(rename(deserialize = "isactive"), default)]
    pub is_active: bool,
}

impl Shift {
    /// Format the shift span as "HH:MM - HH:MM"
    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            Self::short_time(&self.start_time),
            Self::short_time(&self.end_time)
        )
    }

    fn short_time(time: &str) -> String {
        NaiveTime::parse_from_str(time, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|_| time.chars().take(5).collect())
    }
}
