use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A personnel record in the `profiles` table.
///
/// `user_id` carries the owning identifier the backend's row-level
/// security policies filter on; every insert must stamp it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub service_number: String,
    pub rank: String,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_joining: Option<DateTime<Utc>>,
}

/// A row in `training_records`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub user_id: Uuid,
    pub training_name: String,
    pub training_type: String,
    pub start_date: String,
    /// "scheduled" | "in_progress" | "completed"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A row in `missions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub mission_name: String,
    pub mission_type: String,
    pub start_date: DateTime<Utc>,
    /// "planned" | "active" | "completed"
    pub status: String,
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The creating user is recorded as commander.
    pub commander_id: Uuid,
}
