//! # season_core - Deterministic Franchise Season Calendar
//!
//! Builds a full league year for a 30-team, two-conference league:
//! quota-balanced 82-game schedules, phase classification from the draft
//! through the championship celebration, and 2-2-1-1-1 playoff series.
//!
//! ## Features
//! - Same seed + same season year = same schedule for every team
//! - Reciprocal opponent quotas (A plays B exactly as often as B plays A)
//! - Per-team calendars generated in parallel
//! - JSON API for game-engine integration

// Builder-style constructors take many parameters
#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod league;

pub use api::{build_league_calendar_json, phase_for_date_json, team_schedule_json};
pub use calendar::{
    CalendarEvent, EventKind, LeagueCalendar, LeagueKeyDates, PlayoffSeriesRequest,
    ScheduleGenerator, SeasonCalendar, SeasonKeyDates, SeasonPhase,
};
pub use config::ScheduleConfig;
pub use error::{CalendarError, Result};
pub use league::{Conference, LeagueStructure, QuotaTable, TeamInfo};
