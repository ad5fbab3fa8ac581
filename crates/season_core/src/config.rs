//! # Schedule Configuration
//!
//! Every tuning constant of the schedule generator lives here so a league
//! can be re-balanced without touching the generator.
//!
//! ```rust
//! use season_core::config::ScheduleConfig;
//!
//! let config = ScheduleConfig::default();
//! assert!(config.validate().is_ok());
//! let compressed = ScheduleConfig::compressed();
//! assert!(compressed.back_to_back_factor > config.back_to_back_factor);
//! ```

use crate::error::{CalendarError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEED: u64 = 0x5EA5_0A11;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Master seed; every team derives its own generator from it
    pub seed: u64,
    /// Games against each division rival
    pub division_games: u8,
    /// Games against same-conference, non-division opponents in the upper tier
    pub conference_high_games: u8,
    /// Games against same-conference, non-division opponents in the lower tier
    pub conference_low_games: u8,
    /// How many conference opponents land in the lower tier. Split evenly over
    /// the other divisions of the conference and rounded down, so with three
    /// divisions a value of 5 yields 4 lower-tier opponents.
    pub conference_low_tier_size: u8,
    /// Games against each opposite-conference opponent
    pub other_conference_games: u8,
    /// Accept-probability multiplier for a day right after a game day
    pub back_to_back_factor: f64,
    /// Inflation of the base accept probability
    pub placement_slack: f64,
    /// Chance that a regular-season game is nationally broadcast
    pub broadcast_probability: f64,
    pub broadcasters: Vec<String>,
    /// Keep the all-star window free of regular-season games
    pub skip_all_star_break: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            division_games: 4,
            conference_high_games: 4,
            conference_low_games: 3,
            conference_low_tier_size: 4,
            other_conference_games: 2,
            back_to_back_factor: 0.35,
            placement_slack: 1.15,
            broadcast_probability: 0.12,
            broadcasters: vec![
                "ESPN".to_string(),
                "TNT".to_string(),
                "ABC".to_string(),
                "NBA TV".to_string(),
            ],
            skip_all_star_break: true,
        }
    }
}

impl ScheduleConfig {
    /// Standard 82-game league (default)
    pub fn standard() -> Self {
        Self::default()
    }

    /// Short seasons: back-to-backs are tolerated much more
    pub fn compressed() -> Self {
        Self { back_to_back_factor: 0.8, placement_slack: 1.3, ..Self::default() }
    }

    /// Fixed seed, no national broadcasts
    pub fn testing(seed: u64) -> Self {
        Self { seed, broadcast_probability: 0.0, ..Self::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("back_to_back_factor", self.back_to_back_factor),
            ("broadcast_probability", self.broadcast_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(CalendarError::Configuration(format!(
                    "{name} must be within 0.0..=1.0, got {value}"
                )));
            }
        }

        if !self.placement_slack.is_finite() || self.placement_slack <= 0.0 {
            return Err(CalendarError::Configuration(format!(
                "placement_slack must be positive, got {}",
                self.placement_slack
            )));
        }

        let quotas = [
            ("division_games", self.division_games),
            ("conference_high_games", self.conference_high_games),
            ("conference_low_games", self.conference_low_games),
            ("other_conference_games", self.other_conference_games),
        ];
        if let Some((name, _)) = quotas.iter().find(|(_, games)| *games == 0) {
            return Err(CalendarError::Configuration(format!("{name} must be at least 1")));
        }

        if self.broadcasters.iter().all(|b| b.trim().is_empty()) {
            return Err(CalendarError::Configuration(
                "at least one broadcaster is required".to_string(),
            ));
        }

        Ok(())
    }

    /// Picks a broadcaster by index, skipping blank entries
    pub(crate) fn broadcaster(&self, index: usize) -> Option<&str> {
        let named: Vec<&str> =
            self.broadcasters.iter().map(String::as_str).filter(|b| !b.trim().is_empty()).collect();
        if named.is_empty() {
            return None;
        }
        Some(named[index % named.len()])
    }
}
