use serde::{Deserialize, Serialize};

use super::models::Week;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeekStatus {
    Open,
    PredictionsLocked,
    Complete,
}

impl WeekStatus {
    pub fn as_str(&self) -> &str {
        match self {
            WeekStatus::Open => "open",
            WeekStatus::PredictionsLocked => "locked",
            WeekStatus::Complete => "complete",
        }
    }
}

impl Week {
    pub fn status(&self) -> WeekStatus {
        if self.is_complete {
            WeekStatus::Complete
        } else if self.predictions_locked {
            WeekStatus::PredictionsLocked
        } else {
            WeekStatus::Open
        }
    }

    pub fn accepts_predictions(&self) -> bool {
        self.status() == WeekStatus::Open
    }
}
