use serde::{Deserialize, Serialize};

use crate::calendar::{
    classify_league_phase, classify_team_phase, CalendarEvent, LeagueCalendar, LeagueKeyDates,
    ScheduleGenerator, SeasonCalendar, SeasonPhase,
};
use crate::config::ScheduleConfig;
use crate::error::{CalendarError, Result};
use crate::league::{LeagueStructure, QuotaTable};
use chrono::NaiveDate;

pub const SCHEMA_VERSION: u8 = 1;

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn to_api_error(err: CalendarError) -> String {
    err_code(err.code(), err)
}

/// Shared by every request: which league year and how to seed it
#[derive(Debug, Clone, Deserialize)]
pub struct LeagueCalendarRequest {
    pub season_year: i32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub config: Option<ScheduleConfig>,
}

impl LeagueCalendarRequest {
    pub fn resolved_config(&self) -> ScheduleConfig {
        let config = self.config.clone().unwrap_or_default();
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamScheduleSummary {
    pub team_id: String,
    pub total_games: usize,
    pub home_games: usize,
    pub back_to_backs: usize,
    pub national_broadcasts: usize,
    pub first_game: Option<NaiveDate>,
    pub last_game: Option<NaiveDate>,
}

impl TeamScheduleSummary {
    pub fn from_calendar(calendar: &SeasonCalendar) -> Self {
        let games: Vec<&CalendarEvent> = calendar.events().iter().filter(|e| e.is_game()).collect();
        Self {
            team_id: calendar.team_id().to_string(),
            total_games: games.len(),
            home_games: calendar.home_games(),
            back_to_backs: calendar.back_to_back_count(),
            national_broadcasts: games.iter().filter(|g| g.is_national_broadcast()).count(),
            first_game: games.first().map(|g| g.date()),
            last_game: games.last().map(|g| g.date()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeagueCalendarResponse {
    pub schema_version: u8,
    pub season_year: i32,
    pub current_date: NaiveDate,
    pub current_phase: SeasonPhase,
    pub teams: Vec<TeamScheduleSummary>,
}

pub fn build_league_calendar(request: &LeagueCalendarRequest) -> Result<LeagueCalendar> {
    LeagueCalendar::new(request.season_year, &LeagueStructure::standard(), &request.resolved_config())
}

pub fn build_league_calendar_json(request_json: &str) -> std::result::Result<String, String> {
    let request: LeagueCalendarRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code("E_REQUEST", format!("invalid league calendar request: {e}")))?;
    let league = build_league_calendar(&request).map_err(to_api_error)?;

    let response = LeagueCalendarResponse {
        schema_version: SCHEMA_VERSION,
        season_year: league.season_year(),
        current_date: league.current_date(),
        current_phase: league.current_phase(),
        teams: league.teams().map(TeamScheduleSummary::from_calendar).collect(),
    };
    serde_json::to_string(&response).map_err(|e| err_code("E_JSON", e))
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamScheduleRequest {
    #[serde(flatten)]
    pub league: LeagueCalendarRequest,
    pub team_id: String,
    /// Current date of the returned calendar; defaults to opening night
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamScheduleResponse {
    pub schema_version: u8,
    pub team_id: String,
    pub season_year: i32,
    pub current_date: NaiveDate,
    pub current_phase: SeasonPhase,
    /// -1 when no unplayed game is left
    pub days_until_next_game: i64,
    pub summary: TeamScheduleSummary,
    pub events: Vec<CalendarEvent>,
}

/// Generates a single team's calendar without building the rest of the league
pub fn team_schedule(request: &TeamScheduleRequest) -> Result<SeasonCalendar> {
    let structure = LeagueStructure::standard();
    if !structure.contains(&request.team_id) {
        return Err(CalendarError::TeamNotFound(request.team_id.clone()));
    }
    let config = request.league.resolved_config();
    let season_year = request.league.season_year;
    let key_dates = LeagueKeyDates::for_season(season_year)?.team_dates();

    let quotas = QuotaTable::build(&structure, &config, season_year)?;
    let generator = ScheduleGenerator::new(&quotas, &config);
    let start = request.as_of.unwrap_or(key_dates.season_start);
    SeasonCalendar::generate(&generator, &request.team_id, key_dates, start)
}

pub fn team_schedule_json(request_json: &str) -> std::result::Result<String, String> {
    let request: TeamScheduleRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code("E_REQUEST", format!("invalid team schedule request: {e}")))?;
    let calendar = team_schedule(&request).map_err(to_api_error)?;

    let response = TeamScheduleResponse {
        schema_version: SCHEMA_VERSION,
        team_id: calendar.team_id().to_string(),
        season_year: calendar.season_year(),
        current_date: calendar.current_date(),
        current_phase: calendar.current_phase(),
        days_until_next_game: calendar.days_until_next_game().unwrap_or(-1),
        summary: TeamScheduleSummary::from_calendar(&calendar),
        events: calendar.events().to_vec(),
    };
    serde_json::to_string(&response).map_err(|e| err_code("E_JSON", e))
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseResponse {
    pub date: NaiveDate,
    pub league_phase: SeasonPhase,
    pub team_phase: SeasonPhase,
}

pub fn phase_for_date(season_year: i32, date: NaiveDate) -> Result<PhaseResponse> {
    let dates = LeagueKeyDates::for_season(season_year)?;
    Ok(PhaseResponse {
        date,
        league_phase: classify_league_phase(date, &dates),
        team_phase: classify_team_phase(date, &dates.team_dates()),
    })
}

pub fn phase_for_date_json(season_year: i32, date: &str) -> std::result::Result<String, String> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| err_code("E_REQUEST", format!("invalid date {date}: {e}")))?;
    let response = phase_for_date(season_year, date).map_err(to_api_error)?;
    serde_json::to_string(&response).map_err(|e| err_code("E_JSON", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_league_calendar_json() {
        let json = build_league_calendar_json(r#"{"season_year": 2025, "seed": 3}"#).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["season_year"], 2025);
        assert_eq!(value["current_phase"], "Draft");
        let teams = value["teams"].as_array().unwrap();
        assert_eq!(teams.len(), 30);
        assert!(teams.iter().all(|t| t["total_games"] == 82));
    }

    #[test]
    fn test_team_schedule_json() {
        let json = team_schedule_json(r#"{"season_year": 2025, "seed": 3, "team_id": "PHX"}"#).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["team_id"], "PHX");
        assert_eq!(value["summary"]["total_games"], 82);
        assert_eq!(value["current_phase"], "RegularSeason");
        assert!(value["days_until_next_game"].as_i64().unwrap() >= 0);
    }

    #[test]
    fn test_team_schedule_matches_league_build() {
        let request = TeamScheduleRequest {
            league: LeagueCalendarRequest { season_year: 2025, seed: Some(4), config: None },
            team_id: "OKC".to_string(),
            as_of: None,
        };
        let single = team_schedule(&request).unwrap();
        let league = build_league_calendar(&request.league).unwrap();
        assert_eq!(single.events(), league.team("OKC").unwrap().events());
    }

    #[test]
    fn test_unknown_team_error_code() {
        let err = team_schedule_json(r#"{"season_year": 2025, "team_id": "XXX"}"#).unwrap_err();
        assert!(err.starts_with("E_TEAM_NOT_FOUND"));
    }

    #[test]
    fn test_days_until_sentinel_after_season() {
        let json = team_schedule_json(
            r#"{"season_year": 2025, "team_id": "BOS", "as_of": "2026-05-01"}"#,
        )
        .unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["days_until_next_game"], -1);
        assert_eq!(value["current_phase"], "Playoffs");
    }

    #[test]
    fn test_phase_json() {
        let json = phase_for_date_json(2025, "2026-02-05").unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["league_phase"], "TradeDeadline");
        assert_eq!(value["team_phase"], "TradeDeadline");
        assert!(phase_for_date_json(2025, "not-a-date").unwrap_err().starts_with("E_REQUEST"));
    }

    #[test]
    fn test_season_year_overflow_is_an_error() {
        let err = team_schedule_json(r#"{"season_year": 2147483647, "team_id": "BOS"}"#).unwrap_err();
        assert!(err.starts_with("E_CONFIG"), "{err}");
        let err = build_league_calendar_json(r#"{"season_year": 2147483647}"#).unwrap_err();
        assert!(err.starts_with("E_CONFIG"), "{err}");
        assert!(phase_for_date_json(2147483647, "2026-01-01").unwrap_err().starts_with("E_CONFIG"));
    }

    #[test]
    fn test_bad_request() {
        assert!(build_league_calendar_json("{").unwrap_err().starts_with("E_REQUEST"));
        let err = build_league_calendar_json(
            r#"{"season_year": 2025, "config": {"broadcast_probability": 2.0}}"#,
        )
        .unwrap_err();
        assert!(err.starts_with("E_CONFIG"));
    }
}
