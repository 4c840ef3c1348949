use serde::{Deserialize, Serialize};

use crate::models::Stage;

/// Job application model
///
/// An application belongs to exactly one [`Stage`] at any instant; moving it
/// between stages goes through `ApplicationRepo::set_stage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Option<i64>,
    pub uuid: String,
    pub company: String,
    pub role: String,
    pub stage: Stage,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub created_ts: i64,
    pub modified_ts: i64,
}

impl Application {
    /// Create a new application in the first pipeline stage
    pub fn new(company: String, role: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            uuid: uuid::Uuid::new_v4().to_string(),
            company,
            role,
            stage: Stage::ToApply,
            url: None,
            notes: None,
            created_ts: now,
            modified_ts: now,
        }
    }

    /// Check if the application is still in play (not rejected/ghosted)
    pub fn is_active(&self) -> bool {
        !self.stage.is_terminal()
    }
}
