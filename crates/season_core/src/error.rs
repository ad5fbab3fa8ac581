use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cannot fit {required} games for {team} into {available} available days")]
    Capacity { team: String, required: usize, available: usize },

    #[error("No remaining games to record for {team}")]
    NoRemainingGames { team: String },

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid playoff round: {0} (expected 1-4)")]
    InvalidPlayoffRound(u8),

    #[error("Cannot move calendar back from {current} to {requested}")]
    DateRegression { current: NaiveDate, requested: NaiveDate },

    #[error("Team not found: {0}")]
    TeamNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CalendarError {
    /// Raised before any generation work starts
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CalendarError::Configuration(_)
                | CalendarError::TeamNotFound(_)
                | CalendarError::Json(_)
                | CalendarError::Yaml(_)
        )
    }

    /// Stable short code used by the JSON API
    pub fn code(&self) -> &'static str {
        match self {
            CalendarError::Configuration(_) => "E_CONFIG",
            CalendarError::Capacity { .. } => "E_CAPACITY",
            CalendarError::NoRemainingGames { .. } => "E_NO_REMAINING_GAMES",
            CalendarError::InvalidEvent(_) => "E_INVALID_EVENT",
            CalendarError::InvalidPlayoffRound(_) => "E_PLAYOFF_ROUND",
            CalendarError::DateRegression { .. } => "E_DATE_REGRESSION",
            CalendarError::TeamNotFound(_) => "E_TEAM_NOT_FOUND",
            CalendarError::Json(_) => "E_JSON",
            CalendarError::Yaml(_) => "E_YAML",
        }
    }
}

pub type Result<T> = std::result::Result<T, CalendarError>;
